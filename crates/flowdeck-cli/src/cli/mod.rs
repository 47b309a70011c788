//! CLI entry and dispatch.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use flowdeck_tui::config::{self, Config};
use flowdeck_tui::{TerminalOutput, block_on_detached, install_panic_hook};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

use commands::dialogs::Deck;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "FLOWDECK_LOG";

#[derive(Parser)]
#[command(name = "flowdeck")]
#[command(version)]
#[command(about = "Interactive terminal dialogs for workflow scripts")]
#[command(
    after_help = "Dialogs are drawn on stderr. The answer is printed on stdout; \
                  cancelling or answering no exits with status 1."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// File whose lines are shown dimmed behind the dialog
    #[arg(long, value_name = "FILE", global = true)]
    background: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Pick one entry from a list and print its value
    Select {
        /// Title shown in the frame border
        #[arg(long, default_value = "Select")]
        title: String,

        /// Entry as NAME=VALUE, NAME, or ---LABEL for a separator (repeatable)
        #[arg(long = "entry", value_name = "SPEC", required = true)]
        entries: Vec<String>,
    },
    /// Ask a yes/no question; exits 0 for yes and 1 for no
    Confirm {
        #[arg(long, default_value = "Confirm")]
        title: String,

        /// The question to ask
        #[arg(value_name = "MESSAGE")]
        message: String,
    },
    /// Read a single line of text and print it
    Input {
        #[arg(long, default_value = "Input")]
        title: String,

        /// Hint shown while the value is empty
        #[arg(long)]
        placeholder: Option<String>,

        /// Text shown above the input line
        #[arg(value_name = "PROMPT", default_value = "")]
        prompt: String,
    },
    /// Edit multi-line text and print it (Ctrl+S submits)
    Edit {
        #[arg(long, default_value = "Edit")]
        title: String,

        /// Text the editor starts with
        #[arg(long, default_value = "")]
        initial: String,

        /// Text shown above the editor
        #[arg(value_name = "PROMPT", default_value = "")]
        prompt: String,
    },
    /// Run a command behind a spinner and exit with its status
    Run {
        /// Status text shown next to the spinner
        #[arg(long, default_value = "Working")]
        message: String,

        /// The command and its arguments
        #[arg(value_name = "COMMAND", required = true, trailing_var_arg = true)]
        command: Vec<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

/// How a command finished, for the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    /// Cancelled dialog or a "no" answer.
    Declined,
    /// A wrapped command finished with this non-zero status.
    Exited(i32),
}

pub fn run() -> Result<Outcome> {
    let cli = Cli::parse();

    let config = Config::load().context("load config")?;
    let _log_guard = match init_tracing(&config, &config::paths::logs_dir()) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: file logging disabled: {err:#}");
            None
        }
    };

    install_panic_hook(TerminalOutput::Stderr);

    // one tokio runtime for everything; a stdin read left parked by a key
    // timeout must not hold the process open
    block_on_detached(dispatch(cli, config))?
}

async fn dispatch(cli: Cli, config: Config) -> Result<Outcome> {
    let Cli {
        command,
        background,
    } = cli;

    match command {
        Commands::Config { command } => {
            match command {
                ConfigCommands::Path => commands::config::path(),
                ConfigCommands::Init => commands::config::init()?,
            }
            Ok(Outcome::Accepted)
        }
        Commands::Run { message, command } => {
            commands::run::run(&config, &message, &command).await
        }
        Commands::Select { title, entries } => {
            let mut deck = Deck::open(config, background.as_deref())?;
            deck.select(&title, &entries).await
        }
        Commands::Confirm { title, message } => {
            let mut deck = Deck::open(config, background.as_deref())?;
            deck.confirm(&title, &message).await
        }
        Commands::Input {
            title,
            placeholder,
            prompt,
        } => {
            let mut deck = Deck::open(config, background.as_deref())?;
            deck.input(&title, &prompt, placeholder.as_deref()).await
        }
        Commands::Edit {
            title,
            initial,
            prompt,
        } => {
            let mut deck = Deck::open(config, background.as_deref())?;
            deck.edit(&title, &prompt, &initial).await
        }
    }
}

/// Routes `tracing` output to a daily log file; the terminal belongs to the
/// dialogs.
///
/// The filter comes from `FLOWDECK_LOG`, then the config's `log_level`, then
/// `info`.
fn init_tracing(config: &Config, logs_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("create log directory {}", logs_dir.display()))?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("flowdeck")
        .filename_suffix("log")
        .build(logs_dir)
        .context("create log file appender")?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(log_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .context("install tracing subscriber")?;

    Ok(guard)
}

fn log_filter(config: &Config) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    let level = config.log_level.as_deref().unwrap_or("info");
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}
