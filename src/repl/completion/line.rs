//! Line model with cursor awareness for completion
//!
//! Wraps the raw input line and cursor offset and answers the questions every
//! completion component asks: what has been typed before the cursor, which
//! word is being typed, and whether the cursor sits between tokens.

use shlex::Shlex;

/// Input line and cursor of one completion request
#[derive(Debug, Clone)]
pub struct Line {
    text: String,
    cursor: usize,
    tokens: Vec<String>,
    open_quote: bool,
}

impl Line {
    /// Create a line model
    ///
    /// # Arguments
    /// * `text` - The full input line
    /// * `cursor` - Cursor position (byte index), clamped to a char boundary
    pub fn new(text: &str, cursor: usize) -> Self {
        let mut cursor = cursor.min(text.len());
        while !text.is_char_boundary(cursor) {
            cursor -= 1;
        }

        let (tokens, open_quote) = Self::tokenize(&text[..cursor]);

        Self {
            text: text.to_string(),
            cursor,
            tokens,
            open_quote,
        }
    }

    /// Shell-style split that keeps the well-formed tokens before a broken quote
    fn tokenize(input: &str) -> (Vec<String>, bool) {
        let mut lexer = Shlex::new(input);
        let tokens: Vec<String> = lexer.by_ref().collect();
        (tokens, lexer.had_error)
    }

    /// The whole line, including text after the cursor
    pub fn current_line(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn text_before_cursor(&self) -> &str {
        &self.text[..self.cursor]
    }

    /// Text between the last whitespace and the cursor
    pub fn word_before_cursor(&self) -> &str {
        let before = self.text_before_cursor();
        let start = before
            .rfind(char::is_whitespace)
            .map(|i| i + before[i..].chars().next().map_or(1, char::len_utf8))
            .unwrap_or(0);
        &before[start..]
    }

    /// Byte offset where the word being typed starts
    pub fn completion_start(&self) -> usize {
        self.cursor - self.word_before_cursor().len()
    }

    pub fn ends_with_whitespace(&self) -> bool {
        self.text_before_cursor()
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace)
    }

    /// A quote opened before the cursor was never closed
    pub fn has_open_quote(&self) -> bool {
        self.open_quote
    }

    /// Cursor sits after a complete token, ready for the next one
    pub fn is_between_tokens(&self) -> bool {
        self.ends_with_whitespace() && !self.open_quote
    }

    /// Tokens before the cursor
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Tokens the user has finished typing
    pub fn committed_tokens(&self) -> &[String] {
        if self.is_between_tokens() || self.open_quote {
            &self.tokens
        } else {
            &self.tokens[..self.tokens.len().saturating_sub(1)]
        }
    }

    pub fn last_token(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_before_cursor() {
        let line = Line::new("kafka clu", 9);
        assert_eq!(line.word_before_cursor(), "clu");
        assert_eq!(line.completion_start(), 6);
        assert!(!line.ends_with_whitespace());
    }

    #[test]
    fn test_trailing_whitespace() {
        let line = Line::new("kafka cluster ", 14);
        assert_eq!(line.word_before_cursor(), "");
        assert!(line.is_between_tokens());
        assert_eq!(line.committed_tokens(), ["kafka", "cluster"]);
    }

    #[test]
    fn test_committed_tokens_exclude_partial_word() {
        let line = Line::new("kafka clu", 9);
        assert_eq!(line.tokens(), ["kafka", "clu"]);
        assert_eq!(line.committed_tokens(), ["kafka"]);
        assert_eq!(line.last_token(), Some("clu"));
    }

    #[test]
    fn test_cursor_in_middle() {
        let line = Line::new("kafka cluster list", 6);
        assert_eq!(line.text_before_cursor(), "kafka ");
        assert_eq!(line.current_line(), "kafka cluster list");
        assert_eq!(line.tokens(), ["kafka"]);
    }

    #[test]
    fn test_quoted_tokens() {
        let line = Line::new("topic create \"my topic\" ", 24);
        assert_eq!(line.tokens(), ["topic", "create", "my topic"]);
        assert!(line.is_between_tokens());
    }

    #[test]
    fn test_unbalanced_quote_keeps_leading_tokens() {
        let line = Line::new("topic create \"my ", 17);
        assert_eq!(line.tokens(), ["topic", "create"]);
        assert!(line.has_open_quote());
        assert!(!line.is_between_tokens());
    }

    #[test]
    fn test_cursor_clamped() {
        let line = Line::new("ab", 10);
        assert_eq!(line.cursor(), 2);

        let line = Line::new("é", 1);
        assert_eq!(line.cursor(), 0);
    }

    #[test]
    fn test_empty_line() {
        let line = Line::new("", 0);
        assert!(line.tokens().is_empty());
        assert!(!line.is_between_tokens());
        assert_eq!(line.word_before_cursor(), "");
        assert!(line.committed_tokens().is_empty());
    }
}
