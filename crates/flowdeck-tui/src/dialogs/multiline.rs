//! Multi-line editor dialog.
//!
//! Enter inserts a newline; the commit key (Ctrl+S) submits. Cursor movement
//! follows the wrapped rows on screen, see [`crate::layout`].

use crossterm::style::Stylize;

use super::{Dialog, DialogStep, FrameContext, trimmed_or_none, visible_window};
use crate::frame::{FrameBuilder, KeyHint, ModalFrame};
use crate::keys::{Key, KeyEvent};
use crate::layout::{
    VisualLine, char_to_byte_index, cursor_to_visual_position, move_end, move_home, move_vertical,
    move_word_left, move_word_right, visual_lines,
};
use crate::text::reverse;

#[derive(Debug, Clone)]
pub struct MultilineDialog {
    title: String,
    prompt: String,
    value: String,
    /// Character offset into `value`.
    cursor: usize,
}

impl MultilineDialog {
    pub fn new(title: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            prompt: prompt.into(),
            value: String::new(),
            cursor: 0,
        }
    }

    /// Pre-fills the buffer and puts the cursor at its end.
    #[must_use]
    pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
        self.value = initial.into();
        self.cursor = self.len();
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn insert(&mut self, text: &str) {
        let at = char_to_byte_index(&self.value, self.cursor);
        self.value.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    /// Removes the character starting at char offset `at`.
    fn remove_at(&mut self, at: usize) {
        let start = char_to_byte_index(&self.value, at);
        let end = char_to_byte_index(&self.value, at + 1);
        self.value.replace_range(start..end, "");
    }

    fn body_rows(&self, lines: &[VisualLine], rows: usize) -> Vec<String> {
        let pos = cursor_to_visual_position(lines, self.cursor);
        let window = visible_window(lines.len(), pos.row, rows);

        let mut out: Vec<String> = lines[window.clone()]
            .iter()
            .zip(window)
            .map(|(line, row)| {
                if row == pos.row {
                    render_cursor_line(&line.text, pos.col)
                } else {
                    line.text.clone()
                }
            })
            .collect();
        out.resize(rows.max(out.len()), String::new());
        out
    }
}

/// Draws the cursor cell in reverse video at character `col`.
fn render_cursor_line(text: &str, col: usize) -> String {
    let at = char_to_byte_index(text, col);
    let (before, rest) = text.split_at(at);
    let mut chars = rest.chars();
    match chars.next() {
        Some(ch) => format!("{before}{}{}", reverse(&ch.to_string()), chars.as_str()),
        None => format!("{before}{}", reverse(" ")),
    }
}

impl Dialog for MultilineDialog {
    type Output = Option<String>;

    fn name(&self) -> &'static str {
        "multiline_input"
    }

    fn frame(&self, ctx: &FrameContext) -> ModalFrame {
        let inner = ctx.inner_width();
        let lines = visual_lines(&self.value, wrap_width(ctx));
        let pos = cursor_to_visual_position(&lines, self.cursor);

        let mut builder = FrameBuilder::new(ctx.width).title(&self.title);
        if !self.prompt.is_empty() {
            builder = builder
                .rows(visual_lines(&self.prompt, inner).into_iter().map(|l| l.text))
                .divider();
        }
        let status = format!("Ln {}, Col {}", pos.row + 1, pos.col + 1);
        builder
            .rows(self.body_rows(&lines, ctx.multiline_rows))
            .divider()
            .row(status.dark_grey().to_string())
            .hints(&[
                KeyHint::new("Ctrl+S", "submit"),
                KeyHint::new("Enter", "newline"),
                KeyHint::new("Esc", "cancel"),
            ])
            .build()
    }

    fn handle_key(&mut self, key: &KeyEvent, ctx: &FrameContext) -> DialogStep<Self::Output> {
        let width = wrap_width(ctx);
        match &key.key {
            Key::Commit => return DialogStep::Resolve(trimmed_or_none(&self.value)),
            Key::Escape => return DialogStep::Resolve(None),
            Key::Enter => self.insert("\n"),
            Key::Char(ch) => self.insert(ch.encode_utf8(&mut [0; 4])),
            Key::Paste(text) => self.insert(text),
            Key::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.remove_at(self.cursor);
                }
            }
            Key::Delete => {
                if self.cursor < self.len() {
                    self.remove_at(self.cursor);
                }
            }
            Key::Left => self.cursor = self.cursor.saturating_sub(1),
            Key::Right => self.cursor = (self.cursor + 1).min(self.len()),
            Key::Up => self.cursor = move_vertical(&self.value, self.cursor, width, -1),
            Key::Down => self.cursor = move_vertical(&self.value, self.cursor, width, 1),
            Key::Home => self.cursor = move_home(&self.value, self.cursor, width),
            Key::End => self.cursor = move_end(&self.value, self.cursor, width),
            Key::WordLeft => self.cursor = move_word_left(&self.value, self.cursor),
            Key::WordRight => self.cursor = move_word_right(&self.value, self.cursor),
            Key::Tab => {}
        }
        DialogStep::Stay
    }
}

/// Wrap width for the buffer: one column is kept free for the cursor cell.
fn wrap_width(ctx: &FrameContext) -> usize {
    ctx.inner_width().saturating_sub(1).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::decode;
    use crate::text::{strip_ansi, visible_width};

    fn ctx(width: usize) -> FrameContext {
        FrameContext {
            width,
            max_list_rows: 10,
            multiline_rows: 4,
        }
    }

    fn press(
        dialog: &mut MultilineDialog,
        key: Key,
        ctx: &FrameContext,
    ) -> DialogStep<Option<String>> {
        dialog.handle_key(&KeyEvent::new(key, ""), ctx)
    }

    fn type_text(dialog: &mut MultilineDialog, text: &str, ctx: &FrameContext) {
        for ch in text.chars() {
            press(dialog, Key::Char(ch), ctx);
        }
    }

    #[test]
    fn test_enter_inserts_newline_commit_submits() {
        let ctx = ctx(40);
        let mut dialog = MultilineDialog::new("Notes", "");
        type_text(&mut dialog, "one", &ctx);
        assert_eq!(press(&mut dialog, Key::Enter, &ctx), DialogStep::Stay);
        type_text(&mut dialog, "two ", &ctx);

        assert_eq!(dialog.value(), "one\ntwo ");
        assert_eq!(
            press(&mut dialog, Key::Commit, &ctx),
            DialogStep::Resolve(Some("one\ntwo".to_string()))
        );
    }

    #[test]
    fn test_commit_on_blank_is_none_and_escape_cancels() {
        let ctx = ctx(40);
        let mut dialog = MultilineDialog::new("Notes", "").with_initial(" \n ");
        assert_eq!(press(&mut dialog, Key::Commit, &ctx), DialogStep::Resolve(None));

        let mut dialog = MultilineDialog::new("Notes", "").with_initial("keep");
        assert_eq!(press(&mut dialog, Key::Escape, &ctx), DialogStep::Resolve(None));
    }

    #[test]
    fn test_insert_and_delete_in_the_middle() {
        let ctx = ctx(40);
        let mut dialog = MultilineDialog::new("Notes", "").with_initial("héllo");
        press(&mut dialog, Key::Left, &ctx);
        press(&mut dialog, Key::Left, &ctx);
        type_text(&mut dialog, "X", &ctx);
        assert_eq!(dialog.value(), "hélXlo");
        assert_eq!(dialog.cursor(), 4);

        press(&mut dialog, Key::Backspace, &ctx);
        press(&mut dialog, Key::Backspace, &ctx);
        assert_eq!(dialog.value(), "hélo");
        press(&mut dialog, Key::Delete, &ctx);
        assert_eq!(dialog.value(), "héo");
        assert_eq!(dialog.cursor(), 2);
    }

    #[test]
    fn test_backspace_and_delete_at_edges_are_noops() {
        let ctx = ctx(40);
        let mut dialog = MultilineDialog::new("Notes", "").with_initial("ab");
        press(&mut dialog, Key::Delete, &ctx);
        assert_eq!(dialog.value(), "ab");
        press(&mut dialog, Key::Home, &ctx);
        press(&mut dialog, Key::Backspace, &ctx);
        assert_eq!(dialog.value(), "ab");
        assert_eq!(dialog.cursor(), 0);
    }

    #[test]
    fn test_paste_inserts_at_cursor() {
        let ctx = ctx(40);
        let mut dialog = MultilineDialog::new("Notes", "").with_initial("start end");
        for _ in 0..3 {
            press(&mut dialog, Key::Left, &ctx);
        }
        dialog.handle_key(&KeyEvent::paste("a\nb ".to_string()), &ctx);
        assert_eq!(dialog.value(), "start a\nb end");
        assert_eq!(dialog.cursor(), 10);
    }

    #[test]
    fn test_pasted_controls_do_not_reach_the_frame() {
        let ctx = ctx(40);
        let mut dialog = MultilineDialog::new("Notes", "");
        let paste = decode(b"\x1b[200~a\tb\x1b[31mred\r\nnext\x1b[201~").unwrap();
        dialog.handle_key(&paste, &ctx);

        assert_eq!(dialog.value(), "a    bred\nnext");
        let frame = dialog.frame(&ctx);
        assert!(frame.lines.iter().all(|l| !l.contains('\t') && !l.contains("\x1b[31m")));
        assert!(frame.lines.iter().any(|l| strip_ansi(l).contains("a    bred")));
        assert!(frame.lines.iter().all(|l| visible_width(l) == 40));
    }

    #[test]
    fn test_vertical_movement_uses_wrapped_rows() {
        // inner width 10, wrap width 9: "hello" / "world"
        let ctx = ctx(14);
        let mut dialog = MultilineDialog::new("Notes", "").with_initial("hello world");
        press(&mut dialog, Key::Up, &ctx);
        assert_eq!(dialog.cursor(), 5);
        press(&mut dialog, Key::Home, &ctx);
        assert_eq!(dialog.cursor(), 0);
        press(&mut dialog, Key::Down, &ctx);
        assert_eq!(dialog.cursor(), 6);
        press(&mut dialog, Key::End, &ctx);
        assert_eq!(dialog.cursor(), 11);
    }

    #[test]
    fn test_word_jumps() {
        let ctx = ctx(40);
        let mut dialog = MultilineDialog::new("Notes", "").with_initial("git push origin");
        press(&mut dialog, Key::WordLeft, &ctx);
        assert_eq!(dialog.cursor(), 9);
        press(&mut dialog, Key::WordLeft, &ctx);
        assert_eq!(dialog.cursor(), 4);
        press(&mut dialog, Key::WordRight, &ctx);
        assert_eq!(dialog.cursor(), 8);
    }

    #[test]
    fn test_cursor_cell_is_reversed() {
        assert_eq!(render_cursor_line("abc", 1), "a\x1b[7mb\x1b[27mc");
        assert_eq!(render_cursor_line("abc", 3), "abc\x1b[7m \x1b[27m");
    }

    #[test]
    fn test_frame_keeps_cursor_row_visible() {
        let ctx = ctx(20);
        let text = (1..=10).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let dialog = MultilineDialog::new("Notes", "Body:").with_initial(text);

        let frame = dialog.frame(&ctx);
        let plain: Vec<String> = frame.lines.iter().map(|l| strip_ansi(l)).collect();

        assert!(plain.iter().any(|l| l.contains("line 10")));
        assert!(plain.iter().any(|l| l.contains("line 7")));
        assert!(!plain.iter().any(|l| l.contains("line 6")));
        assert!(plain.iter().any(|l| l.contains("Ln 10, Col 8")));
        assert!(frame.lines.iter().all(|l| visible_width(l) == 20));
    }

    #[test]
    fn test_frame_has_fixed_body_height() {
        let ctx = ctx(30);
        let short = MultilineDialog::new("Notes", "").frame(&ctx);
        let long = MultilineDialog::new("Notes", "")
            .with_initial("a\nb\nc\nd\ne\nf")
            .frame(&ctx);
        assert_eq!(short.height(), long.height());
    }
}
