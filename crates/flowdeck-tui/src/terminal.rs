//! Terminal mode management.
//!
//! Raw mode and bracketed paste are process-wide flags. They are held only
//! while a key read is pending, through [`InputModeGuard`], which restores
//! the state that preceded the read on every exit path (including panics,
//! through `install_panic_hook`).

use std::io::{self, Write};
use std::panic;

use anyhow::{Context, Result};
use crossterm::cursor::Show;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled};

/// Fallback size used when the terminal does not report one.
pub const DEFAULT_COLS: u16 = 80;
pub const DEFAULT_ROWS: u16 = 24;

/// Which standard stream dialogs are drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalOutput {
    #[default]
    Stdout,
    /// Keeps stdout free for results when the caller captures it.
    Stderr,
}

impl TerminalOutput {
    pub fn writer(self) -> Box<dyn Write + Send> {
        match self {
            TerminalOutput::Stdout => Box::new(io::stdout()),
            TerminalOutput::Stderr => Box::new(io::stderr()),
        }
    }
}

/// Terminal size in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSize {
    pub cols: u16,
    pub rows: u16,
}

impl Default for TermSize {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
        }
    }
}

impl TermSize {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Queries the terminal, falling back to 80x24 for each dimension that is
    /// unavailable or reported as zero.
    pub fn detect() -> Self {
        let (cols, rows) = crossterm::terminal::size().unwrap_or((0, 0));
        Self::from_reported(cols, rows)
    }

    pub fn from_reported(cols: u16, rows: u16) -> Self {
        Self {
            cols: if cols == 0 { DEFAULT_COLS } else { cols },
            rows: if rows == 0 { DEFAULT_ROWS } else { rows },
        }
    }
}

/// Control over the terminal input modes a key read needs.
pub trait TerminalModes {
    fn is_raw_mode(&self) -> Result<bool>;
    fn set_raw_mode(&mut self, enabled: bool) -> Result<()>;
    fn set_bracketed_paste(&mut self, enabled: bool) -> Result<()>;
}

/// `TerminalModes` backed by crossterm, emitting escape codes on `output`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosstermModes {
    output: TerminalOutput,
}

impl CrosstermModes {
    pub fn new(output: TerminalOutput) -> Self {
        Self { output }
    }
}

impl TerminalModes for CrosstermModes {
    fn is_raw_mode(&self) -> Result<bool> {
        is_raw_mode_enabled().context("Failed to query raw mode")
    }

    fn set_raw_mode(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            enable_raw_mode().context("Failed to enable raw mode")
        } else {
            disable_raw_mode().context("Failed to disable raw mode")
        }
    }

    fn set_bracketed_paste(&mut self, enabled: bool) -> Result<()> {
        let mut out = self.output.writer();
        if enabled {
            execute!(out, EnableBracketedPaste).context("Failed to enable bracketed paste")
        } else {
            execute!(out, DisableBracketedPaste).context("Failed to disable bracketed paste")
        }
    }
}

/// Holds raw mode and bracketed paste for the duration of one key read.
///
/// On drop, bracketed paste is disabled and raw mode is put back to whatever
/// it was when the guard was acquired, so nested reads leave an outer read's
/// raw mode intact.
pub struct InputModeGuard<'a, M: TerminalModes> {
    modes: &'a mut M,
    was_raw: bool,
}

impl<'a, M: TerminalModes> InputModeGuard<'a, M> {
    /// Enables raw mode and bracketed paste.
    ///
    /// # Errors
    /// Returns an error if the modes cannot be queried or changed. Any raw
    /// mode change already made is rolled back.
    pub fn acquire(modes: &'a mut M) -> Result<Self> {
        let was_raw = modes.is_raw_mode()?;
        modes.set_raw_mode(true)?;
        let guard = Self { modes, was_raw };
        guard.modes.set_bracketed_paste(true)?;
        Ok(guard)
    }
}

impl<M: TerminalModes> Drop for InputModeGuard<'_, M> {
    fn drop(&mut self) {
        if let Err(err) = self.modes.set_bracketed_paste(false) {
            tracing::warn!("bracketed paste not restored: {err:#}");
        }
        if let Err(err) = self.modes.set_raw_mode(self.was_raw) {
            tracing::warn!("raw mode not restored: {err:#}");
        }
    }
}

/// Restores terminal state: paste off, cursor visible, raw mode off.
///
/// Idempotent and safe to call when nothing was enabled.
///
/// # Errors
/// Returns an error if raw mode cannot be disabled.
pub fn restore_terminal(output: TerminalOutput) -> Result<()> {
    let mut out = output.writer();
    let _ = execute!(out, DisableBracketedPaste, Show);
    disable_raw_mode().context("Failed to disable raw mode")?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before printing the panic.
pub fn install_panic_hook(output: TerminalOutput) {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(output);
        original_hook(panic_info);
    }));
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records every mode change; shares the log so tests can inspect it
    /// after the modes were moved into a reader.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingModes {
        pub raw: bool,
        pub log: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingModes {
        pub fn starting_raw(raw: bool) -> Self {
            Self {
                raw,
                ..Self::default()
            }
        }

        pub fn entries(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    impl TerminalModes for RecordingModes {
        fn is_raw_mode(&self) -> Result<bool> {
            Ok(self.raw)
        }

        fn set_raw_mode(&mut self, enabled: bool) -> Result<()> {
            self.raw = enabled;
            self.log.lock().unwrap().push(format!("raw={enabled}"));
            Ok(())
        }

        fn set_bracketed_paste(&mut self, enabled: bool) -> Result<()> {
            self.log.lock().unwrap().push(format!("paste={enabled}"));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingModes;
    use super::*;

    #[test]
    fn test_guard_restores_prior_raw_off() {
        let mut modes = RecordingModes::starting_raw(false);
        {
            let _guard = InputModeGuard::acquire(&mut modes).unwrap();
        }
        assert!(!modes.raw);
        assert_eq!(
            modes.entries(),
            vec!["raw=true", "paste=true", "paste=false", "raw=false"]
        );
    }

    #[test]
    fn test_guard_keeps_outer_raw_mode() {
        let mut modes = RecordingModes::starting_raw(true);
        {
            let _guard = InputModeGuard::acquire(&mut modes).unwrap();
        }
        assert!(modes.raw);
        assert_eq!(modes.entries().last().unwrap(), "raw=true");
    }

    #[test]
    fn test_size_falls_back_per_dimension() {
        assert_eq!(TermSize::from_reported(0, 0), TermSize::new(80, 24));
        assert_eq!(TermSize::from_reported(120, 0), TermSize::new(120, 24));
        assert_eq!(TermSize::from_reported(0, 40), TermSize::new(80, 40));
        assert_eq!(TermSize::from_reported(100, 30), TermSize::new(100, 30));
    }
}
