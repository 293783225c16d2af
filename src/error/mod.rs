//! Error handling module for cliprompt.
//!
//! The completion request path never surfaces errors: every failure degrades
//! to "no suggestions". Errors defined here are used by configuration loading,
//! the line editor, the one-shot CLI commands and by completion providers,
//! whose failures are logged and swallowed by the population worker.
//!
//! # Example
//!
//! ```rust,no_run
//! use cliprompt::error::{ProviderError, PromptError, Result};
//!
//! fn list_clusters() -> Result<Vec<String>> {
//!     Err(ProviderError::Unauthorized.into())
//! }
//!
//! match list_clusters() {
//!     Err(PromptError::Provider(e)) => eprintln!("{e}"),
//!     _ => {}
//! }
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, PromptError, ProviderError, Result};
