//! Dialog controllers.
//!
//! Each dialog is self-contained: it owns its state, its key handler and its
//! frame builder. The runtime drives it through render, key, update until the
//! handler returns [`DialogStep::Resolve`].
//!
//! ## Module Structure
//!
//! - `select.rs`: pick one value from a list with separators
//! - `confirm.rs`: yes/no question
//! - `input.rs`: single-line text entry
//! - `multiline.rs`: cursor-aware multi-line editor

pub mod confirm;
pub mod input;
pub mod multiline;
pub mod select;

use std::ops::Range;

pub use confirm::{ConfirmDialog, build_confirm_content};
pub use input::InputDialog;
pub use multiline::MultilineDialog;
pub use select::{SelectDialog, SelectEntry, build_select_content};

use crate::config::Config;
use crate::frame::{MIN_FRAME_WIDTH, ModalFrame};
use crate::keys::KeyEvent;
use crate::terminal::TermSize;

/// Outcome of handling one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogStep<T> {
    Stay,
    Resolve(T),
}

/// Sizing a dialog needs to lay itself out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext {
    /// Total modal width, borders included.
    pub width: usize,
    pub max_list_rows: usize,
    pub multiline_rows: usize,
}

impl FrameContext {
    /// Fits the configured modal width into the terminal, leaving a margin.
    pub fn new(config: &Config, size: TermSize) -> Self {
        let available = usize::from(size.cols).saturating_sub(2);
        Self {
            width: config.modal_width.min(available).max(MIN_FRAME_WIDTH),
            max_list_rows: config.max_list_rows.max(1),
            multiline_rows: config.multiline_rows.max(1),
        }
    }

    /// Columns available for row content inside the frame.
    pub fn inner_width(&self) -> usize {
        self.width - 4
    }
}

impl Default for FrameContext {
    fn default() -> Self {
        Self::new(&Config::default(), TermSize::default())
    }
}

/// An interactive modal.
pub trait Dialog {
    type Output;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn frame(&self, ctx: &FrameContext) -> ModalFrame;

    fn handle_key(&mut self, key: &KeyEvent, ctx: &FrameContext) -> DialogStep<Self::Output>;
}

/// Range of `total` items to show so that `focus` is visible in `rows` rows.
pub fn visible_window(total: usize, focus: usize, rows: usize) -> Range<usize> {
    if total <= rows {
        return 0..total;
    }
    let start = focus.saturating_sub(rows / 2).min(total - rows);
    start..start + rows
}

/// Trims `value`; `None` when nothing is left.
pub(crate) fn trimmed_or_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_window_keeps_focus_in_view() {
        assert_eq!(visible_window(5, 4, 10), 0..5);
        assert_eq!(visible_window(20, 0, 5), 0..5);
        assert_eq!(visible_window(20, 10, 5), 8..13);
        assert_eq!(visible_window(20, 19, 5), 15..20);
    }

    #[test]
    fn test_frame_context_fits_terminal() {
        let config = Config::default();
        assert_eq!(FrameContext::new(&config, TermSize::new(200, 50)).width, 64);
        assert_eq!(FrameContext::new(&config, TermSize::new(40, 20)).width, 38);
        assert_eq!(
            FrameContext::new(&config, TermSize::new(4, 4)).width,
            MIN_FRAME_WIDTH
        );
    }

    #[test]
    fn test_trimmed_or_none() {
        assert_eq!(trimmed_or_none("  hi \n"), Some("hi".to_string()));
        assert_eq!(trimmed_or_none(" \n\t"), None);
    }
}
