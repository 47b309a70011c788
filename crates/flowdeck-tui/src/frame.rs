//! Fixed-width bordered frames.
//!
//! Every line a frame produces is exactly `width` visible columns, escape
//! sequences excluded. The compositor relies on this to keep the modal
//! aligned with the background grid.

use crossterm::style::{Color, Stylize};

use crate::text::{fit_to_width, truncate_ansi, visible_width};

/// Narrowest frame that still has room for borders and padding.
pub const MIN_FRAME_WIDTH: usize = 8;

/// A rendered block of equal-width lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalFrame {
    pub width: usize,
    pub lines: Vec<String>,
}

impl ModalFrame {
    pub fn height(&self) -> usize {
        self.lines.len()
    }
}

/// Keyboard hint shown in a frame footer.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint<'a> {
    pub key: &'a str,
    pub action: &'a str,
}

impl<'a> KeyHint<'a> {
    pub fn new(key: &'a str, action: &'a str) -> Self {
        Self { key, action }
    }
}

fn border_line(width: usize, left: char, right: char, title: Option<&str>, color: Color) -> String {
    let inner = width.saturating_sub(2);
    let label = title
        .filter(|t| !t.is_empty())
        .map(|t| truncate_ansi(&format!(" {t} "), inner))
        .unwrap_or_default();
    let label_width = visible_width(&label);
    let left_fill = (inner - label_width) / 2;
    let right_fill = inner - label_width - left_fill;

    let mut line = format!("{left}{}", "─".repeat(left_fill)).with(color).to_string();
    if !label.is_empty() {
        line.push_str(&label.with(color).bold().to_string());
    }
    line.push_str(
        &format!("{}{right}", "─".repeat(right_fill))
            .with(color)
            .to_string(),
    );
    line
}

/// `┌──── title ────┐`
pub fn top_border(width: usize, title: Option<&str>, color: Color) -> String {
    border_line(width, '┌', '┐', title, color)
}

/// `├──── title ────┤`
pub fn mid_border(width: usize, title: Option<&str>, color: Color) -> String {
    border_line(width, '├', '┤', title, color)
}

/// `├──────────────┤`
pub fn divider(width: usize, color: Color) -> String {
    border_line(width, '├', '┤', None, color)
}

/// `└──────────────┘`
pub fn bottom_border(width: usize, color: Color) -> String {
    border_line(width, '└', '┘', None, color)
}

/// `│ content      │`, padded or truncated to fit.
pub fn content_row(width: usize, content: &str, color: Color) -> String {
    let bar = "│".with(color).to_string();
    let body = fit_to_width(content, width.saturating_sub(4));
    format!("{bar} {body} {bar}")
}

/// Centers `content` within `width` visible columns.
pub fn center(content: &str, width: usize) -> String {
    let content = truncate_ansi(content, width);
    let pad = width.saturating_sub(visible_width(&content)) / 2;
    fit_to_width(&format!("{}{content}", " ".repeat(pad)), width)
}

/// Renders `key action • key action`.
pub fn hints_line(hints: &[KeyHint<'_>], highlight: Color) -> String {
    let mut out = String::new();
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            out.push_str(&" • ".dark_grey().to_string());
        }
        out.push_str(&hint.key.with(highlight).to_string());
        out.push_str(&format!(" {}", hint.action).dark_grey().to_string());
    }
    out
}

enum Part {
    Row(String),
    Section(String),
    Divider,
}

/// Builds a [`ModalFrame`] row by row.
pub struct FrameBuilder {
    width: usize,
    color: Color,
    title: Option<String>,
    parts: Vec<Part>,
    footer: Option<String>,
}

impl FrameBuilder {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(MIN_FRAME_WIDTH),
            color: Color::Cyan,
            title: None,
            parts: Vec::new(),
            footer: None,
        }
    }

    /// Width available to row content (inside borders and padding).
    pub fn inner_width(&self) -> usize {
        self.width - 4
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn row(mut self, content: impl Into<String>) -> Self {
        self.parts.push(Part::Row(content.into()));
        self
    }

    #[must_use]
    pub fn rows<I, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parts
            .extend(rows.into_iter().map(|r| Part::Row(r.into())));
        self
    }

    #[must_use]
    pub fn blank(self) -> Self {
        self.row(String::new())
    }

    /// Mid border carrying a label.
    #[must_use]
    pub fn section(mut self, title: impl Into<String>) -> Self {
        self.parts.push(Part::Section(title.into()));
        self
    }

    #[must_use]
    pub fn divider(mut self) -> Self {
        self.parts.push(Part::Divider);
        self
    }

    /// Footer row of key hints below a divider.
    #[must_use]
    pub fn hints(mut self, hints: &[KeyHint<'_>]) -> Self {
        if !hints.is_empty() {
            self.footer = Some(hints_line(hints, self.color));
        }
        self
    }

    pub fn build(self) -> ModalFrame {
        let Self {
            width,
            color,
            title,
            parts,
            footer,
        } = self;

        let mut lines = Vec::with_capacity(parts.len() + 4);
        lines.push(top_border(width, title.as_deref(), color));
        for part in parts {
            lines.push(match part {
                Part::Row(content) => content_row(width, &content, color),
                Part::Section(label) => mid_border(width, Some(&label), color),
                Part::Divider => divider(width, color),
            });
        }
        if let Some(footer) = footer {
            lines.push(divider(width, color));
            lines.push(content_row(width, &center(&footer, width - 4), color));
        }
        lines.push(bottom_border(width, color));

        ModalFrame { width, lines }
    }
}
