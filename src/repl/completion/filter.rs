//! Drops suggestions the user already typed

use super::suggestion::Suggestion;

/// Text given to message suggestions so the menu still renders them
pub const MESSAGE_PLACEHOLDER: &str = " ";

/// Remove suggestions whose text already occurs anywhere in `line`.
///
/// Messages always pass and get [`MESSAGE_PLACEHOLDER`] as their text;
/// suggestions without text or description are dropped.
pub fn filter_typed(line: &str, suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    suggestions
        .into_iter()
        .filter(Suggestion::is_valid)
        .filter_map(|s| {
            if s.is_message() {
                Some(Suggestion::new(MESSAGE_PLACEHOLDER, s.description))
            } else if line.contains(s.text.as_str()) {
                None
            } else {
                Some(s)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_typed_text() {
        let line = "kafka topic describe orders ";
        let out = filter_typed(
            line,
            vec![Suggestion::new("orders", ""), Suggestion::new("payments", "")],
        );
        assert_eq!(out, vec![Suggestion::new("payments", "")]);
    }

    #[test]
    fn test_messages_pass() {
        let out = filter_typed("kafka ", vec![Suggestion::message("Log in first")]);
        assert_eq!(out, vec![Suggestion::new(" ", "Log in first")]);
    }

    #[test]
    fn test_invalid_dropped() {
        assert!(filter_typed("x ", vec![Suggestion::new("", "")]).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let line = "api-key create --resource lkc-1 ";
        let input = vec![
            Suggestion::new("lkc-1", "orders cluster"),
            Suggestion::new("lkc-2", "payments cluster"),
            Suggestion::message("2 clusters"),
            Suggestion::new(" ", ""),
        ];
        let once = filter_typed(line, input);
        let twice = filter_typed(line, once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }
}
