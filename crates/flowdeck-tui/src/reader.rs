//! Async key reader.
//!
//! Reads raw chunks from a byte source while holding the terminal input modes,
//! and resolves to exactly one decoded [`KeyEvent`]. Unrecognized chunks are
//! skipped without releasing the modes.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::keys::{KeyEvent, decode};
use crate::terminal::{InputModeGuard, TerminalModes};

const READ_BUFFER_SIZE: usize = 8192;

/// Returned when a key read exceeds the configured timeout.
#[derive(Debug)]
pub struct KeyReadTimeout(pub Duration);

impl std::fmt::Display for KeyReadTimeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No key received within {}s", self.0.as_secs())
    }
}

impl std::error::Error for KeyReadTimeout {}

pub struct KeyReader<R, M> {
    source: R,
    modes: M,
    timeout: Option<Duration>,
    buf: Vec<u8>,
}

impl<R, M> KeyReader<R, M>
where
    R: AsyncRead + Unpin,
    M: TerminalModes,
{
    pub fn new(source: R, modes: M) -> Self {
        Self {
            source,
            modes,
            timeout: None,
            buf: vec![0; READ_BUFFER_SIZE],
        }
    }

    /// Fails each read that waits longer than `timeout`. `None` waits forever.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn modes(&self) -> &M {
        &self.modes
    }

    /// Waits for the next recognized key.
    ///
    /// # Errors
    /// Returns an error if the terminal modes cannot be set, the source is
    /// closed or fails, or the read times out ([`KeyReadTimeout`]).
    pub async fn next_key(&mut self) -> Result<KeyEvent> {
        let _guard = InputModeGuard::acquire(&mut self.modes)?;

        loop {
            let read = self.source.read(&mut self.buf);
            let n = match self.timeout {
                Some(limit) => tokio::time::timeout(limit, read)
                    .await
                    .map_err(|_elapsed| KeyReadTimeout(limit))?,
                None => read.await,
            }
            .context("Failed to read terminal input")?;

            if n == 0 {
                anyhow::bail!("Terminal input stream closed");
            }

            let chunk = &self.buf[..n];
            match decode(chunk) {
                Some(event) => {
                    tracing::trace!(key = event.name(), "key decoded");
                    return Ok(event);
                }
                None => {
                    tracing::trace!(bytes = ?chunk, "ignoring unrecognized input");
                }
            }
        }
    }
}
