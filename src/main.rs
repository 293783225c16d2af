//! cliprompt - interactive shell for the `cloud` CLI
//!
//! Commands, flags and resource names complete on Tab. Resource lists are
//! fetched in the background the moment a command is entered, so they are
//! usually cached by the time they are needed.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode
//! cliprompt --user dev@example.com
//!
//! # One-shot completion
//! cliprompt complete --settle -- "kafka cluster describe "
//! ```

use std::fs::OpenOptions;
use std::sync::Mutex;

use tokio::runtime::{Builder, Runtime};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use cliprompt::cli::CliInterface;
use cliprompt::error::Result;
use cliprompt::repl::ReplEngine;
use cliprompt::repl::completion::ShellCompleter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// The REPL blocks on terminal input, so it runs on the main thread while
/// completion fetches run on the worker threads of a separate runtime.
fn run() -> Result<()> {
    let runtime = build_runtime()?;
    let cli = CliInterface::new()?;

    initialize_logging(&cli)?;

    if cli.handle_subcommand(runtime.handle())? {
        return Ok(());
    }

    let session = cli.session();
    let engine = cli.completion_engine(runtime.handle().clone(), &session)?;
    let completer = ShellCompleter::new(engine);
    let mut repl = ReplEngine::new(session.clone(), completer, &cli.config().history)?;

    cli.print_banner(&session);
    repl.run()?;

    tracing::debug!("shell closed");
    Ok(())
}

fn build_runtime() -> Result<Runtime> {
    Ok(Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("completion")
        .enable_all()
        .build()?)
}

/// Initialize logging from the resolved configuration
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to the
/// configured file, or stderr so stdout stays usable for scripts.
fn initialize_logging(cli: &CliInterface) -> Result<()> {
    let logging = &cli.config().logging;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(logging.level.as_directive()));

    let writer = match &logging.file_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(logging.file_path.is_none())
        .with_target(false);

    if logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
    Ok(())
}
