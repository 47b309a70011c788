//! Selection list dialog.

use crossterm::style::Stylize;

use super::{Dialog, DialogStep, FrameContext, visible_window};
use crate::frame::{FrameBuilder, KeyHint, ModalFrame};
use crate::keys::{Key, KeyEvent};
use crate::text::truncate_ansi;

const MARKER: &str = "❯ ";
const INDENT: &str = "  ";

/// One line in a selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectEntry {
    Item { name: String, value: String },
    /// Decorative label; never selectable.
    Separator(String),
}

impl SelectEntry {
    pub fn item(name: impl Into<String>, value: impl Into<String>) -> Self {
        SelectEntry::Item {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn separator(label: impl Into<String>) -> Self {
        SelectEntry::Separator(label.into())
    }

    pub fn is_selectable(&self) -> bool {
        matches!(self, SelectEntry::Item { .. })
    }
}

/// Renders one row per entry. `index` counts selectable entries only.
pub fn build_select_content(entries: &[SelectEntry], index: usize, width: usize) -> Vec<String> {
    let mut selectable = 0;
    entries
        .iter()
        .map(|entry| match entry {
            SelectEntry::Item { name, .. } => {
                let current = selectable == index;
                selectable += 1;
                let name = truncate_ansi(name, width.saturating_sub(MARKER.chars().count()));
                if current {
                    format!("{}{}", MARKER.cyan(), name.cyan().bold())
                } else {
                    format!("{INDENT}{name}")
                }
            }
            SelectEntry::Separator(label) => {
                format!("{INDENT}{}", label.as_str().dark_grey())
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct SelectDialog {
    title: String,
    entries: Vec<SelectEntry>,
    /// Entry positions of the selectable items, in order.
    selectable: Vec<usize>,
    index: usize,
}

impl SelectDialog {
    pub fn new(title: impl Into<String>, entries: Vec<SelectEntry>) -> Self {
        let selectable = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_selectable())
            .map(|(i, _)| i)
            .collect();
        Self {
            title: title.into(),
            entries,
            selectable,
            index: 0,
        }
    }

    /// Index into the selectable entries.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_value(&self) -> Option<&str> {
        let entry = self.selectable.get(self.index)?;
        match &self.entries[*entry] {
            SelectEntry::Item { value, .. } => Some(value),
            SelectEntry::Separator(_) => None,
        }
    }
}

impl Dialog for SelectDialog {
    type Output = Option<String>;

    fn name(&self) -> &'static str {
        "select"
    }

    fn frame(&self, ctx: &FrameContext) -> ModalFrame {
        let content = build_select_content(&self.entries, self.index, ctx.inner_width());
        let focus = self.selectable.get(self.index).copied().unwrap_or(0);
        let window = visible_window(content.len(), focus, ctx.max_list_rows);
        let scrolled = window.len() < content.len();

        let mut builder = FrameBuilder::new(ctx.width)
            .title(&self.title)
            .rows(content[window].iter().cloned());
        if self.selectable.is_empty() {
            builder = builder.row(format!("{INDENT}{}", "(nothing to select)".dark_grey()));
        }
        if scrolled {
            let position = format!("{}/{}", self.index + 1, self.selectable.len());
            builder = builder.row(format!("{INDENT}{}", position.dark_grey()));
        }
        builder
            .hints(&[
                KeyHint::new("↑↓", "navigate"),
                KeyHint::new("Enter", "select"),
                KeyHint::new("Esc", "cancel"),
            ])
            .build()
    }

    fn handle_key(&mut self, key: &KeyEvent, _ctx: &FrameContext) -> DialogStep<Self::Output> {
        match key.key {
            Key::Escape => DialogStep::Resolve(None),
            Key::Enter => DialogStep::Resolve(self.current_value().map(str::to_string)),
            Key::Up => {
                self.index = self.index.saturating_sub(1);
                DialogStep::Stay
            }
            Key::Down => {
                if self.index + 1 < self.selectable.len() {
                    self.index += 1;
                }
                DialogStep::Stay
            }
            _ => DialogStep::Stay,
        }
    }
}
