use std::sync::{Arc, PoisonError, RwLock};

use crate::config::PromptConfig;
use crate::repl::completion::CompletionGate;
use crate::tree::CommandNode;

/// Session state shared between the REPL loop, the prompt and the completion gate.
#[derive(Debug, Clone)]
pub struct SharedState {
    /// Program name shown in the prompt
    program_name: Arc<str>,

    /// Logged in user, `None` when logged out
    user: Arc<RwLock<Option<String>>>,

    /// Color output setting
    color_enabled: Arc<RwLock<bool>>,
}

impl SharedState {
    /// Create a new, logged out session.
    ///
    /// * `program_name` - Name of the CLI
    pub fn new(program_name: &str) -> Self {
        Self::with_config(&PromptConfig {
            program_name: program_name.to_string(),
            ..PromptConfig::default()
        })
    }

    /// Create a new, logged out session from prompt configuration.
    pub fn with_config(config: &PromptConfig) -> Self {
        Self {
            program_name: Arc::from(config.program_name.as_str()),
            user: Arc::new(RwLock::new(None)),
            color_enabled: Arc::new(RwLock::new(config.color_output)),
        }
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    /// Mark the session as authenticated
    pub fn login(&self, user: impl Into<String>) {
        let user = user.into();
        tracing::info!(user = %user, "logged in");
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    pub fn logout(&self) {
        tracing::info!("logged out");
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Current user, if logged in
    pub fn user(&self) -> Option<String> {
        self.user.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn color_enabled(&self) -> bool {
        *self.color_enabled.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_color_enabled(&self, enabled: bool) {
        *self.color_enabled.write().unwrap_or_else(PoisonError::into_inner) = enabled;
    }
}

/// Dynamic suggestions need an authenticated session
impl CompletionGate for SharedState {
    fn can_complete(&self, _node: &CommandNode) -> bool {
        self.is_logged_in()
    }
}
