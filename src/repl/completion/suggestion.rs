//! Suggestion value type

use serde::Serialize;

/// A completion candidate.
///
/// A suggestion with blank `text` and a non-empty `description` is a
/// *message*: a non-selectable hint rendered in the menu.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Suggestion {
    /// Text inserted when selected
    pub text: String,
    /// Description shown next to the text
    pub description: String,
}

impl Suggestion {
    pub fn new(text: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            description: description.into(),
        }
    }

    /// Suggestion carrying only a hint message
    pub fn message(description: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            description: description.into(),
        }
    }

    pub fn is_message(&self) -> bool {
        self.text.trim().is_empty() && !self.description.trim().is_empty()
    }

    /// Blank text with no description carries nothing to show
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() || !self.description.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_suggestion() {
        let msg = Suggestion::message("Log in to see clusters");
        assert!(msg.is_message());
        assert!(msg.is_valid());
        assert!(!Suggestion::new("lkc-1", "").is_message());
    }

    #[test]
    fn test_blank_suggestion_is_invalid() {
        assert!(!Suggestion::new(" ", "").is_valid());
    }
}
