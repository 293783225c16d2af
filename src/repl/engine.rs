use std::sync::Arc;

use reedline::{
    ColumnarMenu, Emacs, FileBackedHistory, KeyCode, KeyModifiers, MenuBuilder, Reedline, ReedlineEvent,
    ReedlineMenu, Signal, default_emacs_keybindings,
};

use crate::config::HistoryConfig;
use crate::error::Result;
use crate::tree::CommandTree;

use super::completer::PromptCompleter;
use super::completion::ShellCompleter;
use super::hinter::CompletionHinter;
use super::prompt::ShellPrompt;
use super::shared_state::SharedState;

/// Name of the Tab-triggered completion menu
const COMPLETION_MENU: &str = "completion_menu";

/// A parsed line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Blank line
    Empty,
    /// `login [user]`
    Login(Option<String>),
    /// `logout`
    Logout,
    /// `help`
    Help,
    /// `exit` or `quit`
    Exit,
    /// Any other command, as shell-style tokens
    Run(Vec<String>),
    /// Input that could not be tokenized
    Invalid(String),
}

impl ReplCommand {
    pub fn parse(input: &str) -> Self {
        let Some(tokens) = shlex::split(input) else {
            return ReplCommand::Invalid("unbalanced quotes".to_string());
        };

        match tokens.first().map(String::as_str) {
            None => ReplCommand::Empty,
            Some("login") => ReplCommand::Login(tokens.get(1).cloned()),
            Some("logout") => ReplCommand::Logout,
            Some("help") => ReplCommand::Help,
            Some("exit") | Some("quit") => ReplCommand::Exit,
            Some(_) => ReplCommand::Run(tokens),
        }
    }
}

/// Executes parsed input against the session and command tree
pub struct Dispatcher {
    state: SharedState,
    tree: Arc<CommandTree>,
}

impl Dispatcher {
    pub fn new(state: SharedState, tree: Arc<CommandTree>) -> Self {
        Self { state, tree }
    }

    /// Execute one command and return the text to print
    pub fn execute(&self, command: &ReplCommand) -> String {
        match command {
            ReplCommand::Empty | ReplCommand::Exit => String::new(),
            ReplCommand::Login(Some(user)) => {
                self.state.login(user.clone());
                format!("Logged in as {}", user)
            }
            ReplCommand::Login(None) => "Usage: login <email>".to_string(),
            ReplCommand::Logout => {
                self.state.logout();
                "Logged out".to_string()
            }
            ReplCommand::Help => self.help(),
            ReplCommand::Run(tokens) => self.resolve(tokens),
            ReplCommand::Invalid(reason) => format!("Invalid input: {}", reason),
        }
    }

    fn help(&self) -> String {
        let root = self.tree.root();
        let visible: Vec<_> = root.children().iter().filter(|c| !c.is_hidden()).collect();
        let width = visible.iter().map(|c| c.name().len()).max().unwrap_or(0);

        let mut out = String::from("Available commands:\n");
        for child in visible {
            out.push_str(&format!("  {:<width$}  {}\n", child.name(), child.about(), width = width));
        }
        out.push_str("\nPress Tab to complete commands, flags and resource names.");
        out
    }

    /// Resolve tokens against the tree and describe the command they name
    fn resolve(&self, tokens: &[String]) -> String {
        let walk = self.tree.walk(tokens);
        let node = walk.node();
        let program = self.tree.root().name();

        if node.is_root() {
            return format!("Unknown command: {}", tokens.join(" "));
        }
        if !walk.probe.unknown().is_empty() {
            return format!("Unknown flag(s): {}", walk.probe.unknown().join(", "));
        }
        if let Some(flag) = &walk.pending_flag {
            return format!("Flag --{} needs a value", flag.name);
        }
        if walk.residual.is_empty() && !node.children().is_empty() {
            let names: Vec<&str> = node
                .children()
                .iter()
                .filter(|c| !c.is_hidden())
                .map(|c| c.name())
                .collect();
            return format!("{} {}: choose one of {}", program, node.command_path(), names.join(", "));
        }

        let mut out = format!("Would run: {} {}", program, node.command_path());
        if !walk.residual.is_empty() {
            out.push_str(&format!(" [args: {}]", walk.residual.join(" ")));
        }
        let flags: Vec<String> = node
            .flags()
            .filter(|f| walk.probe.is_set(&f.name))
            .map(|f| match walk.probe.values(&f.name) {
                [] => f.name.clone(),
                values => format!("{}={}", f.name, values.join(",")),
            })
            .collect();
        if !flags.is_empty() {
            out.push_str(&format!(" [flags: {}]", flags.join(", ")));
        }
        if !self.state.is_logged_in() {
            out.push_str("\n(not logged in)");
        }
        out
    }
}

/// REPL engine for interactive command entry
pub struct ReplEngine {
    /// Line editor for command input
    editor: Reedline,

    /// Prompt reading the shared session
    prompt: ShellPrompt,

    /// Executes parsed input
    dispatcher: Dispatcher,

    /// Whether to continue running
    running: bool,
}

impl ReplEngine {
    /// Create a new REPL engine
    ///
    /// # Arguments
    /// * `shared_state` - Session shared with the completion gate
    /// * `completer` - Completion entry point
    /// * `history_config` - History configuration
    ///
    /// # Returns
    /// * `Result<Self>` - New REPL engine or error
    pub fn new(shared_state: SharedState, completer: ShellCompleter, history_config: &HistoryConfig) -> Result<Self> {
        let tree = Arc::clone(completer.engine().tree());

        let completion_menu = Box::new(ColumnarMenu::default().with_name(COMPLETION_MENU));
        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );

        let mut editor = Reedline::create()
            .with_hinter(Box::new(CompletionHinter::new(completer.clone())))
            .with_completer(Box::new(PromptCompleter::new(completer)))
            .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
            .with_edit_mode(Box::new(Emacs::new(keybindings)))
            .with_ansi_colors(shared_state.color_enabled());

        if history_config.persist {
            let history = FileBackedHistory::with_file(history_config.max_size, history_config.file_path.clone())?;
            editor = editor.with_history(Box::new(history));
        }

        Ok(Self {
            editor,
            prompt: ShellPrompt::new(shared_state.clone()),
            dispatcher: Dispatcher::new(shared_state, tree),
            running: true,
        })
    }

    /// Read a single line of input
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Input line, empty on Ctrl-C, None on Ctrl-D
    pub fn read_line(&mut self) -> Result<Option<String>> {
        match self.editor.read_line(&self.prompt)? {
            Signal::Success(line) => Ok(Some(line)),
            Signal::CtrlD => Ok(None),
            _ => Ok(Some(String::new())),
        }
    }

    /// Parse and execute one line of input
    pub fn process_input(&mut self, input: &str) -> String {
        let command = ReplCommand::parse(input);
        tracing::debug!(?command, "processing input");
        if command == ReplCommand::Exit {
            self.running = false;
        }
        self.dispatcher.execute(&command)
    }

    /// Check if REPL is still running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run until `exit` or end of input
    pub fn run(&mut self) -> Result<()> {
        while self.is_running() {
            let Some(input) = self.read_line()? else {
                break;
            };
            let output = self.process_input(&input);
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Ok(())
    }
}
