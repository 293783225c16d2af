//! Command-line interface for cliprompt
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading, validation and CLI overrides
//! - Wiring the completion engine shared by the shell and one-shot completion
//! - The non-interactive subcommands (version, completion, config, complete)

pub mod completion;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::runtime::Handle;

use crate::commands::{self, InMemoryCatalog};
use crate::config::{Config, LogLevel};
use crate::error::Result;
use crate::formatter::{OutputFormat, SuggestionFormatter};
use crate::repl::SharedState;
use crate::repl::completion::{CompletionEngine, ShellCompleter};
use crate::tree::CommandTree;

/// Interactive shell for the cloud CLI with live, cache-backed completion
#[derive(Parser, Debug)]
#[command(
    name = "cliprompt",
    version,
    about = "Interactive shell with live completion for the cloud CLI",
    long_about = "An interactive shell for a tree-structured cloud CLI. Subcommands and flags
complete from the command tree; resource names and flag values are loaded in the background
and appear on the next keystroke."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Start the session logged in as this user
    #[arg(short = 'u', long, value_name = "EMAIL")]
    pub user: Option<String>,

    /// Provider timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Simulated catalog latency in milliseconds
    #[arg(long, value_name = "MS")]
    pub latency: Option<u64>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Quiet mode (minimal output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for cliprompt
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Generate shell completion script for the cloud CLI
    Completion {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Compute completions for a single line
    Complete {
        /// Line to complete; the cursor sits at its end unless --cursor is given
        #[arg(value_name = "LINE", allow_hyphen_values = true)]
        line: String,

        /// Cursor position (byte offset)
        #[arg(long, value_name = "POS")]
        cursor: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Replay the line's command prefixes and wait for background loading first
        #[arg(long)]
        settle: bool,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Parse the process arguments and load configuration
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Build from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);
        Ok(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Apply CLI arguments on top of the loaded configuration
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        if args.no_color {
            config.prompt.color_output = false;
        }

        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
        if let Some(path) = &args.log_file {
            config.logging.file_path = Some(path.clone());
        }

        // Zero would make every provider call time out
        if let Some(timeout) = args.timeout.filter(|t| *t > 0) {
            config.completion.provider_timeout_ms = timeout;
        }
        if let Some(latency) = args.latency {
            config.completion.catalog_latency_ms = latency;
        }
    }

    /// Session state for the shell, logged in when `--user` was given
    pub fn session(&self) -> SharedState {
        let state = SharedState::with_config(&self.config.prompt);
        if let Some(user) = &self.args.user {
            state.login(user.clone());
        }
        state
    }

    /// Build the completion engine for the `cloud` tree
    ///
    /// # Arguments
    /// * `runtime` - Runtime that runs background population
    /// * `session` - Session gating dynamic completion
    pub fn completion_engine(&self, runtime: Handle, session: &SharedState) -> Result<Arc<CompletionEngine>> {
        let tree = Arc::new(CommandTree::from_clap(&commands::command()));
        let engine = CompletionEngine::new(tree, runtime, &self.config.completion)
            .with_gate(Arc::new(session.clone()));
        let catalog = InMemoryCatalog::sample(self.config.completion.catalog_latency());
        commands::register(&engine, Arc::new(catalog))?;
        Ok(Arc::new(engine))
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if subcommand was handled, false to continue
    pub fn handle_subcommand(&self, runtime: &Handle) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Version) => {
                self.show_version();
                Ok(true)
            }
            Some(Commands::Completion { shell }) => {
                completion::write_completion(shell, &self.config.prompt.program_name, &mut io::stdout())?;
                Ok(true)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
                Ok(true)
            }
            Some(Commands::Complete {
                line,
                cursor,
                format,
                settle,
            }) => {
                let output = self.complete_once(runtime, line, cursor.unwrap_or(line.len()), *format, *settle)?;
                println!("{}", output);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Show version information
    fn show_version(&self) {
        println!("cliprompt version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    /// One-shot completion of `line`
    fn complete_once(
        &self,
        runtime: &Handle,
        line: &str,
        cursor: usize,
        format: OutputFormat,
        settle: bool,
    ) -> Result<String> {
        let session = self.session();
        let engine = self.completion_engine(runtime.clone(), &session)?;
        let completer = ShellCompleter::new(Arc::clone(&engine));

        if settle {
            completer.replay_prefixes(line, cursor);
            engine.wait_for_population();
        }

        let (start, suggestions) = completer.complete(line, cursor);
        SuggestionFormatter::new(format, self.config.prompt.color_output).format(line, start, &suggestions)
    }

    /// Handle config subcommand
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return;
        }

        match Config::load_from_file(Some(path.as_path())) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {}", e),
            },
            Err(e) => println!("❌ Failed to load configuration: {}", e),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        println!("Configuration file: {}", self.get_config_path().display());
        println!();
        println!("=== Effective Configuration ===");
        println!();
        println!("{}", self.config.to_toml_string()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }

    /// Print banner with version and session info
    pub fn print_banner(&self, session: &SharedState) {
        if self.args.quiet {
            return;
        }
        println!("cliprompt {}", env!("CARGO_PKG_VERSION"));
        match session.user() {
            Some(user) => println!("Logged in as {}", user),
            None => println!("Not logged in; type `login <email>` to see resource suggestions"),
        }
        println!("Press Tab to complete, `help` for commands, `exit` to leave.");
    }
}
