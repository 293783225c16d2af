use std::{fmt, io};

/// Crate-wide `Result` type using [`PromptError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, PromptError>;

/// Top-level error type for cliprompt operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum PromptError {
    /// Configuration errors.
    Config(ConfigError),

    /// Completion provider errors.
    Provider(ProviderError),

    /// Line editor and terminal errors.
    Repl(String),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },

    /// Unsupported shell for script generation.
    UnsupportedShell(String),
}

/// Errors raised by completion providers while fetching suggestions.
///
/// These never reach the terminal: the population worker logs them and
/// stores an empty suggestion list instead.
#[derive(Debug)]
pub enum ProviderError {
    /// The backing service rejected or failed the request.
    RequestFailed(String),

    /// The session is not allowed to list this resource.
    Unauthorized,

    /// The provider did not answer within the configured budget.
    Timeout,

    /// The provider panicked while producing suggestions.
    Panicked(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::Config(e) => write!(f, "Configuration error: {e}"),
            PromptError::Provider(e) => write!(f, "Completion provider error: {e}"),
            PromptError::Repl(msg) => write!(f, "Line editor error: {msg}"),
            PromptError::Io(e) => write!(f, "I/O error: {e}"),
            PromptError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
            ConfigError::UnsupportedShell(shell) => {
                write!(
                    f,
                    "Unsupported shell: {shell}. Supported shells: bash, zsh, fish, powershell, elvish"
                )
            }
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::RequestFailed(msg) => write!(f, "Request failed: {msg}"),
            ProviderError::Unauthorized => write!(f, "Not authorized"),
            ProviderError::Timeout => write!(f, "Timed out"),
            ProviderError::Panicked(msg) => write!(f, "Provider panicked: {msg}"),
        }
    }
}

impl std::error::Error for PromptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PromptError::Io(e) => Some(e),
            _ => None,
        }
    }
}
impl std::error::Error for ConfigError {}
impl std::error::Error for ProviderError {}

/* ========================= Conversions to PromptError ========================= */

impl From<io::Error> for PromptError {
    fn from(err: io::Error) -> Self {
        PromptError::Io(err)
    }
}

impl From<ConfigError> for PromptError {
    fn from(err: ConfigError) -> Self {
        PromptError::Config(err)
    }
}

impl From<ProviderError> for PromptError {
    fn from(err: ProviderError) -> Self {
        PromptError::Provider(err)
    }
}

impl From<reedline::ReedlineError> for PromptError {
    fn from(err: reedline::ReedlineError) -> Self {
        PromptError::Repl(err.to_string())
    }
}

impl From<toml::de::Error> for PromptError {
    fn from(err: toml::de::Error) -> Self {
        PromptError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<toml::ser::Error> for PromptError {
    fn from(err: toml::ser::Error) -> Self {
        PromptError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<serde_json::Error> for PromptError {
    fn from(err: serde_json::Error) -> Self {
        PromptError::Generic(format!("JSON error: {err}"))
    }
}

impl From<String> for PromptError {
    fn from(msg: String) -> Self {
        PromptError::Generic(msg)
    }
}

impl From<&str> for PromptError {
    fn from(msg: &str) -> Self {
        PromptError::Generic(msg.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err: PromptError = ProviderError::RequestFailed("503".to_string()).into();
        assert_eq!(err.to_string(), "Completion provider error: Request failed: 503");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "completion.provider_timeout_ms".to_string(),
            value: "0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value '0' for field 'completion.provider_timeout_ms'"
        );
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error;

        let err: PromptError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("I/O error"));
    }
}
