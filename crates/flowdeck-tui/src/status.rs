//! Animated one-line status indicator.
//!
//! Runs on its own repeating timer, independent of key input. The owner must
//! call [`StatusOverlay::stop`]; dropping a running overlay cancels the timer
//! and logs a warning.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveToColumn, Show};
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::terminal::TermSize;
use crate::text::truncate_ansi;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// One status line: spinner glyph for `frame`, then the message cut to fit.
pub fn status_line(frame: usize, message: &str, width: usize) -> String {
    let glyph = FRAMES[frame % FRAMES.len()];
    let text = truncate_ansi(message, width.saturating_sub(2));
    format!("{} {text}", glyph.cyan())
}

pub struct StatusOverlay<W> {
    message: Arc<Mutex<String>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<W>>,
}

impl<W> StatusOverlay<W>
where
    W: Write + Send + 'static,
{
    /// Starts repainting `message` on `out` every `interval`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(out: W, message: impl Into<String>, interval: Duration) -> Self {
        let message = Arc::new(Mutex::new(message.into()));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(spin(out, Arc::clone(&message), interval, cancel.clone()));
        Self {
            message,
            cancel,
            task: Some(task),
        }
    }

    /// Shown from the next tick on.
    pub fn set_message(&self, message: impl Into<String>) {
        *self.message.lock().unwrap_or_else(PoisonError::into_inner) = message.into();
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the timer, clears the status line and shows the cursor.
    ///
    /// # Errors
    /// Returns an error if the timer task panicked or the terminal write fails.
    pub async fn stop(mut self) -> Result<()> {
        let Some(task) = self.task.take() else {
            return Ok(());
        };
        self.cancel.cancel();
        let mut out = task.await.context("Status task failed")?;
        execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine), Show)
            .context("Failed to clear status line")
    }
}

impl<W> Drop for StatusOverlay<W> {
    fn drop(&mut self) {
        if self.task.take().is_some() {
            tracing::warn!("status overlay dropped without stop(); cancelling its timer");
            self.cancel.cancel();
        }
    }
}

async fn spin<W: Write>(
    mut out: W,
    message: Arc<Mutex<String>>,
    interval: Duration,
    cancel: CancellationToken,
) -> W {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frame = 0usize;

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let text = message.lock().unwrap_or_else(PoisonError::into_inner).clone();
                let line = status_line(frame, &text, usize::from(TermSize::detect().cols));
                if let Err(err) = repaint(&mut out, &line) {
                    tracing::warn!("status repaint failed: {err:#}");
                    break;
                }
                frame = frame.wrapping_add(1);
            }
        }
    }
    out
}

fn repaint<W: Write>(out: &mut W, line: &str) -> Result<()> {
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Hide,
        Print(line)
    )?;
    out.flush().context("Failed to flush status line")
}
