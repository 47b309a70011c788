//! Dialog runtime.
//!
//! Drives one [`Dialog`] at a time: paint, wait for a key, update, repeat.
//! Dialogs never run concurrently; each call borrows the runtime mutably.

use std::future::Future;
use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, Stdin};
use tracing::debug;

use crate::config::Config;
use crate::dialogs::{
    ConfirmDialog, Dialog, DialogStep, FrameContext, InputDialog, MultilineDialog, SelectDialog,
    SelectEntry,
};
use crate::overlay::{paint, show_cursor};
use crate::reader::KeyReader;
use crate::terminal::{CrosstermModes, TermSize, TerminalModes, TerminalOutput};

/// Runs `future` to completion on a fresh runtime, then shuts the runtime
/// down without waiting for blocking tasks.
///
/// tokio reads stdin on a blocking thread that cannot be cancelled. After a
/// timed-out key read that thread stays parked until the next byte arrives,
/// and an ordinary runtime drop would wait for it.
///
/// # Errors
/// Returns an error if the runtime cannot be created.
pub fn block_on_detached<F: Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    let output = rt.block_on(future);
    rt.shutdown_background();
    Ok(output)
}

/// Where a running dialog is in its lifecycle.
enum DialogState<D: Dialog> {
    Open(D),
    Resolved(D::Output),
}

pub struct DialogRuntime<R, M, W> {
    keys: KeyReader<R, M>,
    out: W,
    config: Config,
    size: fn() -> TermSize,
}

/// Runtime on the process's stdin and a standard output stream.
pub type StdioRuntime = DialogRuntime<Stdin, CrosstermModes, Box<dyn Write + Send>>;

impl StdioRuntime {
    pub fn stdio(config: Config, output: TerminalOutput) -> Self {
        let keys = KeyReader::new(tokio::io::stdin(), CrosstermModes::new(output))
            .with_timeout(config.read_timeout());
        Self {
            keys,
            out: output.writer(),
            config,
            size: TermSize::detect,
        }
    }
}

impl<R, M, W> DialogRuntime<R, M, W>
where
    R: AsyncRead + Unpin,
    M: TerminalModes,
    W: Write,
{
    /// The terminal size is probed with [`TermSize::detect`] before each paint.
    pub fn new(source: R, modes: M, out: W, config: Config) -> Self {
        let keys = KeyReader::new(source, modes).with_timeout(config.read_timeout());
        Self {
            keys,
            out,
            config,
            size: TermSize::detect,
        }
    }

    /// Replaces the terminal size probe.
    #[must_use]
    pub fn with_size_probe(mut self, probe: fn() -> TermSize) -> Self {
        self.size = probe;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Runs `dialog` until it resolves, over `background`.
    ///
    /// The cursor is hidden while the dialog is open and shown again once it
    /// ends, also when it ends with an error.
    ///
    /// # Errors
    /// Returns an error if reading a key or painting fails.
    pub async fn run<D: Dialog>(&mut self, dialog: D, background: &[String]) -> Result<D::Output> {
        let name = dialog.name();
        debug!(dialog = name, "dialog opened");

        let result = self.drive(dialog, background).await;
        let shown = show_cursor(&mut self.out);
        let output = result?;
        shown?;

        debug!(dialog = name, "dialog resolved");
        Ok(output)
    }

    async fn drive<D: Dialog>(&mut self, dialog: D, background: &[String]) -> Result<D::Output> {
        let mut state = DialogState::Open(dialog);
        loop {
            state = match state {
                DialogState::Open(mut dialog) => {
                    let size = (self.size)();
                    let ctx = FrameContext::new(&self.config, size);
                    paint(&mut self.out, background, &dialog.frame(&ctx), size)?;

                    let key = self.keys.next_key().await?;
                    match dialog.handle_key(&key, &ctx) {
                        DialogStep::Stay => DialogState::Open(dialog),
                        DialogStep::Resolve(output) => DialogState::Resolved(output),
                    }
                }
                DialogState::Resolved(output) => return Ok(output),
            };
        }
    }

    /// Picks one entry. `None` on cancel.
    ///
    /// # Errors
    /// See [`DialogRuntime::run`].
    pub async fn select(
        &mut self,
        title: &str,
        entries: Vec<SelectEntry>,
        background: &[String],
    ) -> Result<Option<String>> {
        self.run(SelectDialog::new(title, entries), background).await
    }

    /// Asks a yes/no question. Cancelling answers `false`.
    ///
    /// # Errors
    /// See [`DialogRuntime::run`].
    pub async fn confirm(
        &mut self,
        title: &str,
        message: &str,
        background: &[String],
    ) -> Result<bool> {
        self.run(ConfirmDialog::new(title, message), background).await
    }

    /// Reads one trimmed line. `None` on cancel or blank input.
    ///
    /// # Errors
    /// See [`DialogRuntime::run`].
    pub async fn input(
        &mut self,
        title: &str,
        prompt: &str,
        placeholder: Option<&str>,
        background: &[String],
    ) -> Result<Option<String>> {
        let mut dialog = InputDialog::new(title, prompt);
        if let Some(placeholder) = placeholder {
            dialog = dialog.with_placeholder(placeholder);
        }
        self.run(dialog, background).await
    }

    /// Edits multi-line text, submitted with Ctrl+S. `None` on cancel or
    /// blank input.
    ///
    /// # Errors
    /// See [`DialogRuntime::run`].
    pub async fn multiline_input(
        &mut self,
        title: &str,
        prompt: &str,
        initial: &str,
        background: &[String],
    ) -> Result<Option<String>> {
        let dialog = MultilineDialog::new(title, prompt).with_initial(initial);
        self.run(dialog, background).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::reader::testing::ChunkedSource;
    use crate::terminal::testing::RecordingModes;

    type TestRuntime = DialogRuntime<ChunkedSource, RecordingModes, Vec<u8>>;

    const SHOW_CURSOR: &str = "\x1b[?25h";
    const HIDE_CURSOR: &str = "\x1b[?25l";

    fn runtime(chunks: &[&[u8]]) -> TestRuntime {
        DialogRuntime::new(
            ChunkedSource::new(chunks.iter().copied()),
            RecordingModes::default(),
            Vec::new(),
            Config::default(),
        )
        .with_size_probe(|| TermSize::new(80, 24))
    }

    fn written(rt: &TestRuntime) -> String {
        String::from_utf8_lossy(rt.output()).into_owned()
    }

    fn background() -> Vec<String> {
        vec!["main  ✓ clean".to_string()]
    }

    #[tokio::test]
    async fn test_select_moves_then_resolves() {
        let mut rt = runtime(&[b"\x1b[B", b"\r"]);
        let entries = vec![
            SelectEntry::item("A", "a"),
            SelectEntry::separator("—"),
            SelectEntry::item("B", "b"),
        ];

        let picked = rt.select("Pick", entries, &background()).await.unwrap();

        assert_eq!(picked.as_deref(), Some("b"));
        let out = written(&rt);
        assert_eq!(out.matches(HIDE_CURSOR).count(), 2);
        assert!(out.ends_with(SHOW_CURSOR));
        assert!(out.contains("main  ✓ clean"));
    }

    #[tokio::test]
    async fn test_confirm_escape_is_false() {
        let mut rt = runtime(&[b"\x1b"]);
        let answer = rt.confirm("Confirm", "Proceed?", &[]).await.unwrap();
        assert!(!answer);
    }

    #[tokio::test]
    async fn test_input_skips_unknown_sequences_and_trims() {
        let mut rt = runtime(&[b" ", b"o", b"\x1b[24~", b"k", b" ", b"\r"]);
        let value = rt.input("Name", "Branch:", None, &[]).await.unwrap();
        assert_eq!(value.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_multiline_uses_commit_key() {
        let mut rt = runtime(&[b"\r", b"more", b"\x13"]);
        let value = rt
            .multiline_input("Notes", "", "first", &[])
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("first\nmore"));
    }

    #[test]
    fn test_detached_shutdown_skips_parked_blocking_reads() {
        let started = Instant::now();

        let value = block_on_detached(async {
            drop(tokio::task::spawn_blocking(|| {
                std::thread::sleep(Duration::from_secs(10));
            }));
            7
        })
        .unwrap();

        assert_eq!(value, 7);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_stdin_read_timeout_then_prompt_shutdown() {
        let started = Instant::now();

        let result = block_on_detached(async {
            let mut reader = KeyReader::new(tokio::io::stdin(), RecordingModes::default())
                .with_timeout(Some(Duration::from_millis(100)));
            reader.next_key().await
        })
        .unwrap();

        // Either the read timed out, or stdin was already closed.
        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_cursor_is_shown_when_input_closes() {
        let mut rt = runtime(&[b"a"]);

        let err = rt.input("Name", "", None, &[]).await.unwrap_err();

        assert!(err.to_string().contains("closed"));
        assert!(written(&rt).ends_with(SHOW_CURSOR));
        assert!(!rt.keys.modes().raw);
    }
}
