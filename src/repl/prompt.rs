//! Prompt showing the program name and session state

use std::borrow::Cow;

use nu_ansi_term::Color;
use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

use super::shared_state::SharedState;

/// Prompt for the interactive shell
///
/// Reads the session on every render, so logging in or out is reflected on
/// the next line without rebuilding the editor.
pub struct ShellPrompt {
    state: SharedState,
}

impl ShellPrompt {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }

    fn plain_left(&self) -> String {
        match self.state.user() {
            Some(user) => format!("{} ({})> ", self.state.program_name(), user),
            None => format!("{} (logged out)> ", self.state.program_name()),
        }
    }
}

impl Prompt for ShellPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        if !self.state.color_enabled() {
            return self.plain_left().into();
        }

        let name = Color::Cyan.bold().paint(self.state.program_name());
        match self.state.user() {
            Some(user) => format!("{} ({})> ", name, Color::Green.paint(user)).into(),
            None => format!("{} ({})> ", name, Color::Yellow.paint("logged out")).into(),
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        "... ".into()
    }

    fn render_prompt_history_search_indicator(&self, history_search: PromptHistorySearch) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        format!("({}reverse-search: {}) ", prefix, history_search.term).into()
    }
}
