//! Single-line input dialog.
//!
//! There is no interior cursor: typing appends and Backspace removes the last
//! character. When the value overflows, its tail is shown so the most recent
//! input stays visible.

use crossterm::style::Stylize;

use super::{Dialog, DialogStep, FrameContext, trimmed_or_none};
use crate::frame::{FrameBuilder, KeyHint, ModalFrame};
use crate::keys::{Key, KeyEvent};
use crate::layout::visual_lines;
use crate::text::truncate_start_with_ellipsis;

const PROMPT: &str = "> ";
const CURSOR: &str = "█";

/// Renders `> value█`, keeping the end of `value` when it is too wide.
pub fn build_input_line(value: &str, placeholder: Option<&str>, width: usize) -> String {
    let max_text = width.saturating_sub(PROMPT.len() + 1);
    let prompt = PROMPT.dark_grey();
    match placeholder {
        Some(placeholder) if value.is_empty() => {
            let hint = truncate_start_with_ellipsis(placeholder, max_text);
            format!("{prompt}{}{}", CURSOR.yellow(), hint.dark_grey())
        }
        _ => {
            let tail = truncate_start_with_ellipsis(value, max_text);
            format!("{prompt}{}{}", tail.yellow(), CURSOR.yellow())
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputDialog {
    title: String,
    prompt: String,
    placeholder: Option<String>,
    value: String,
}

impl InputDialog {
    pub fn new(title: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            prompt: prompt.into(),
            placeholder: None,
            value: String::new(),
        }
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Dialog for InputDialog {
    type Output = Option<String>;

    fn name(&self) -> &'static str {
        "input"
    }

    fn frame(&self, ctx: &FrameContext) -> ModalFrame {
        let width = ctx.inner_width();
        let mut builder = FrameBuilder::new(ctx.width).title(&self.title);
        if !self.prompt.is_empty() {
            builder = builder
                .rows(visual_lines(&self.prompt, width).into_iter().map(|l| l.text))
                .blank();
        }
        builder
            .row(build_input_line(
                &self.value,
                self.placeholder.as_deref(),
                width,
            ))
            .hints(&[KeyHint::new("Enter", "submit"), KeyHint::new("Esc", "cancel")])
            .build()
    }

    fn handle_key(&mut self, key: &KeyEvent, _ctx: &FrameContext) -> DialogStep<Self::Output> {
        match &key.key {
            Key::Enter => DialogStep::Resolve(trimmed_or_none(&self.value)),
            Key::Escape => DialogStep::Resolve(None),
            Key::Backspace => {
                self.value.pop();
                DialogStep::Stay
            }
            Key::Char(ch) => {
                self.value.push(*ch);
                DialogStep::Stay
            }
            Key::Paste(text) => {
                self.value
                    .extend(text.chars().filter(|c| *c != '\n' && *c != '\r'));
                DialogStep::Stay
            }
            _ => DialogStep::Stay,
        }
    }
}
