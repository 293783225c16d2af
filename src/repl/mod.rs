//! Interactive shell
//!
//! The REPL reads lines with reedline, renders a session-aware prompt and
//! forwards Tab presses to the completion engine in [`completion`].
//! - `completer`: adapter from the engine to reedline's `Completer`
//! - `engine`: line editor setup, builtin commands and the read loop
//! - `hinter`: history hints; also passes every edit to the completion engine
//! - `prompt`: prompt showing the logged in user
//! - `shared_state`: session state, also used as the completion gate

pub mod completion;
mod completer;
mod engine;
mod hinter;
mod prompt;
mod shared_state;

pub use completer::PromptCompleter;
pub use engine::{Dispatcher, ReplCommand, ReplEngine};
pub use hinter::CompletionHinter;
pub use prompt::ShellPrompt;
pub use shared_state::SharedState;

#[cfg(test)]
mod tests;
