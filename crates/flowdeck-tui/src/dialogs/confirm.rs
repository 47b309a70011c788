//! Yes/no confirmation dialog.
//!
//! Escape resolves to `false`; there is no separate cancel value.

use crossterm::style::{Color, Stylize};

use super::{Dialog, DialogStep, FrameContext};
use crate::frame::{FrameBuilder, KeyHint, ModalFrame, center};
use crate::keys::{Key, KeyEvent};
use crate::layout::visual_lines;
use crate::text::reverse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Yes,
    No,
}

impl Choice {
    fn toggled(self) -> Self {
        match self {
            Choice::Yes => Choice::No,
            Choice::No => Choice::Yes,
        }
    }
}

fn button(label: &str, selected: bool) -> String {
    let padded = format!(" {label} ");
    if selected {
        reverse(&padded.bold().to_string())
    } else {
        padded
    }
}

/// Message rows wrapped to `width`, a blank row, then the centered buttons.
pub fn build_confirm_content(message: &str, selected_yes: bool, width: usize) -> Vec<String> {
    let mut rows: Vec<String> = visual_lines(message, width)
        .into_iter()
        .map(|line| line.text)
        .collect();
    rows.push(String::new());
    let buttons = format!(
        "{}   {}",
        button("Yes", selected_yes),
        button("No", !selected_yes)
    );
    rows.push(center(&buttons, width));
    rows
}

#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    title: String,
    message: String,
    choice: Choice,
}

impl ConfirmDialog {
    /// Starts with "Yes" highlighted.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            choice: Choice::Yes,
        }
    }

    #[must_use]
    pub fn with_default(mut self, yes: bool) -> Self {
        self.choice = if yes { Choice::Yes } else { Choice::No };
        self
    }

    pub fn selected_yes(&self) -> bool {
        self.choice == Choice::Yes
    }
}

impl Dialog for ConfirmDialog {
    type Output = bool;

    fn name(&self) -> &'static str {
        "confirm"
    }

    fn frame(&self, ctx: &FrameContext) -> ModalFrame {
        FrameBuilder::new(ctx.width)
            .title(&self.title)
            .color(Color::Yellow)
            .rows(build_confirm_content(
                &self.message,
                self.selected_yes(),
                ctx.inner_width(),
            ))
            .hints(&[
                KeyHint::new("y/n", "answer"),
                KeyHint::new("Tab", "toggle"),
                KeyHint::new("Esc", "no"),
            ])
            .build()
    }

    fn handle_key(&mut self, key: &KeyEvent, _ctx: &FrameContext) -> DialogStep<bool> {
        match key.key {
            Key::Enter => DialogStep::Resolve(self.selected_yes()),
            Key::Escape => DialogStep::Resolve(false),
            Key::Char('y' | 'Y') => DialogStep::Resolve(true),
            Key::Char('n' | 'N') => DialogStep::Resolve(false),
            Key::Up | Key::Down | Key::Tab => {
                self.choice = self.choice.toggled();
                DialogStep::Stay
            }
            _ => DialogStep::Stay,
        }
    }
}
