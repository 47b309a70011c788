//! Run a command behind a status spinner.

use std::io::{self, Write};

use anyhow::{Context, Result};
use flowdeck_tui::{Config, StatusOverlay};
use tokio::process::Command;

use crate::cli::Outcome;

/// Runs `command` with its output captured while a spinner shows `message`
/// on stderr, then replays the output.
///
/// The spinner repaints every `spinner_interval_ms` from the config.
pub async fn run(config: &Config, message: &str, command: &[String]) -> Result<Outcome> {
    let (program, args) = command.split_first().context("No command given")?;

    let overlay = StatusOverlay::start(io::stderr(), message, config.spinner_interval());
    let output = Command::new(program).args(args).output().await;
    overlay.stop().await?;

    let output = output.with_context(|| format!("run {program}"))?;
    io::stdout()
        .write_all(&output.stdout)
        .context("write command stdout")?;
    io::stderr()
        .write_all(&output.stderr)
        .context("write command stderr")?;

    tracing::debug!(program = %program, status = %output.status, "command finished");
    Ok(match output.status.code() {
        Some(0) => Outcome::Accepted,
        Some(code) => Outcome::Exited(code),
        // Killed by a signal.
        None => Outcome::Declined,
    })
}
