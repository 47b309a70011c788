//! Modal overlay compositing.
//!
//! Paints the caller's background dimmed at the origin, then a modal frame
//! centered on the terminal. The terminal cursor stays hidden while a dialog
//! is open and is only shown again once the dialog resolves.

use std::io::Write;

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};

use crate::frame::ModalFrame;
use crate::terminal::TermSize;
use crate::text::{dim, sanitize_line, truncate_ansi};

/// 1-based screen position of the modal's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalOrigin {
    pub row: u16,
    pub col: u16,
}

/// Centers a `width` x `height` block, never above row 1 or left of column 1.
pub fn modal_origin(size: TermSize, width: usize, height: usize) -> ModalOrigin {
    let center = |total: u16, extent: usize| -> u16 {
        let total = usize::from(total);
        let start = total.saturating_sub(extent) / 2 + 1;
        u16::try_from(start).unwrap_or(u16::MAX).max(1)
    };
    ModalOrigin {
        row: center(size.rows, height),
        col: center(size.cols, width),
    }
}

/// Background lines as painted: sanitized, dimmed and cut to the terminal.
pub fn dimmed_background(background: &[String], size: TermSize) -> Vec<String> {
    background
        .iter()
        .take(usize::from(size.rows))
        .map(|line| dim(&truncate_ansi(&sanitize_line(line), usize::from(size.cols))))
        .collect()
}

/// Paints one full overlay frame.
///
/// Leaves the hidden cursor just below the modal, so stray log output does
/// not overwrite it.
///
/// # Errors
/// Returns an error if writing to the terminal fails.
pub fn paint<W: Write>(
    out: &mut W,
    background: &[String],
    modal: &ModalFrame,
    size: TermSize,
) -> Result<()> {
    queue!(out, Clear(ClearType::All), Hide)?;

    for (row, line) in dimmed_background(background, size).iter().enumerate() {
        queue!(out, MoveTo(0, row as u16), Print(line))?;
    }

    let origin = modal_origin(size, modal.width, modal.height());
    let (x, y) = (origin.col - 1, origin.row - 1);
    for (i, line) in modal.lines.iter().enumerate() {
        queue!(out, MoveTo(x, y.saturating_add(i as u16)), Print(line))?;
    }

    let below = y.saturating_add(modal.height() as u16);
    queue!(out, MoveTo(0, below))?;
    out.flush().context("Failed to flush overlay")
}

/// Shows the terminal cursor again.
///
/// # Errors
/// Returns an error if writing to the terminal fails.
pub fn show_cursor<W: Write>(out: &mut W) -> Result<()> {
    execute!(out, Show).context("Failed to show cursor")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameBuilder;

    #[test]
    fn test_origin_is_centered() {
        let origin = modal_origin(TermSize::new(80, 24), 40, 10);
        assert_eq!(origin, ModalOrigin { row: 8, col: 21 });
    }

    #[test]
    fn test_origin_clamps_on_small_terminal() {
        let origin = modal_origin(TermSize::new(20, 5), 60, 12);
        assert_eq!(origin, ModalOrigin { row: 1, col: 1 });
    }

    #[test]
    fn test_background_is_dimmed_and_cut() {
        let bg = vec![
            "\x1b[32mgreen status\x1b[0m".to_string(),
            "x".repeat(50),
            "third".to_string(),
        ];
        let painted = dimmed_background(&bg, TermSize::new(10, 2));
        assert_eq!(painted.len(), 2);
        assert_eq!(painted[0], "\x1b[2mgreen sta…\x1b[0m");
        assert!(painted[1].starts_with("\x1b[2m"));
    }

    #[test]
    fn test_paint_writes_background_then_modal() {
        let modal = FrameBuilder::new(10).row("hi").build();
        let mut out = Vec::new();

        paint(&mut out, &["bg".to_string()], &modal, TermSize::new(20, 10)).unwrap();

        let text = String::from_utf8(out).unwrap();
        let bg_at = text.find("\x1b[2mbg").unwrap();
        let modal_at = text.find('┌').unwrap();
        assert!(text.starts_with("\x1b[2J"));
        assert!(text.contains("\x1b[?25l"));
        assert!(bg_at < modal_at);
        // modal: 3 rows at row 4 (1-based), col 6; cursor parked on row 7
        assert!(text.contains("\x1b[4;6H"));
        assert!(text.ends_with("\x1b[7;1H"));
        assert!(!text.contains("\x1b[?25h"));
    }
}
