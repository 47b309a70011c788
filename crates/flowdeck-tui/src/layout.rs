//! Visual line layout for wrapped text editing.
//!
//! A logical buffer (which may contain `\n`) is wrapped to a fixed width.
//! Offsets are character indices into the logical buffer. Each visual line
//! records where it starts in the buffer, so a cursor offset maps to exactly
//! one `(row, col)` and back.

/// One on-screen row of a wrapped buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualLine {
    pub text: String,
    /// Offset of the row's first character in the logical buffer.
    pub global_offset: usize,
    /// Length of `text` in characters.
    pub len: usize,
}

impl VisualLine {
    fn new(chars: &[char], global_offset: usize) -> Self {
        Self {
            text: chars.iter().collect(),
            global_offset,
            len: chars.len(),
        }
    }

    /// Offset one past the row's last character.
    pub fn end_offset(&self) -> usize {
        self.global_offset + self.len
    }
}

/// Cursor location in visual space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub row: usize,
    pub col: usize,
}

/// Wraps `text` to `width` characters.
///
/// Long logical lines break at the last space at or before the width
/// boundary, or hard-break at `width` when there is none. A break space is
/// not rendered but still occupies one offset. Every logical line yields at
/// least one row, so an empty or trailing line is still addressable.
pub fn visual_lines(text: &str, width: usize) -> Vec<VisualLine> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut offset = 0;

    for logical in text.split('\n') {
        let chars: Vec<char> = logical.chars().collect();
        let mut rest = &chars[..];
        let mut pos = offset;

        while rest.len() > width {
            let break_at = rest[..=width]
                .iter()
                .rposition(|c| *c == ' ')
                .filter(|idx| *idx > 0);
            match break_at {
                Some(idx) => {
                    lines.push(VisualLine::new(&rest[..idx], pos));
                    pos += idx + 1;
                    rest = &rest[idx + 1..];
                }
                None => {
                    lines.push(VisualLine::new(&rest[..width], pos));
                    pos += width;
                    rest = &rest[width..];
                }
            }
        }
        lines.push(VisualLine::new(rest, pos));

        offset += chars.len() + 1;
    }

    lines
}

/// Finds the row containing `offset`.
///
/// A row's range is inclusive at its end, so a cursor right after the last
/// character of a row belongs to that row rather than the next one.
pub fn cursor_to_visual_position(lines: &[VisualLine], offset: usize) -> CursorPosition {
    for (row, line) in lines.iter().enumerate() {
        if offset >= line.global_offset && offset <= line.end_offset() {
            return CursorPosition {
                row,
                col: offset - line.global_offset,
            };
        }
    }

    // Offsets past the buffer clamp to the end of the last row.
    let row = lines.len().saturating_sub(1);
    CursorPosition {
        row,
        col: lines.get(row).map_or(0, |line| line.len),
    }
}

/// Moves the cursor one visual row up (`-1`) or down (`1`).
///
/// The column is clamped to the target row's length. It is not remembered
/// across moves, so repeated moves through a short row drift left.
pub fn move_vertical(text: &str, offset: usize, width: usize, direction: isize) -> usize {
    let lines = visual_lines(text, width);
    let pos = cursor_to_visual_position(&lines, offset);
    let Some(target) = pos.row.checked_add_signed(direction) else {
        return offset;
    };
    match lines.get(target) {
        Some(line) => line.global_offset + pos.col.min(line.len),
        None => offset,
    }
}

/// Start of the current visual row.
pub fn move_home(text: &str, offset: usize, width: usize) -> usize {
    let lines = visual_lines(text, width);
    let pos = cursor_to_visual_position(&lines, offset);
    lines[pos.row].global_offset
}

/// End of the current visual row.
pub fn move_end(text: &str, offset: usize, width: usize) -> usize {
    let lines = visual_lines(text, width);
    let pos = cursor_to_visual_position(&lines, offset);
    lines[pos.row].end_offset()
}

/// Returns true if the character is part of a word (alphanumeric or underscore).
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Skips non-word characters, then word characters, leftwards.
pub fn move_word_left(text: &str, offset: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut idx = offset.min(chars.len());
    while idx > 0 && !is_word_char(chars[idx - 1]) {
        idx -= 1;
    }
    while idx > 0 && is_word_char(chars[idx - 1]) {
        idx -= 1;
    }
    idx
}

/// Skips non-word characters, then word characters, rightwards.
pub fn move_word_right(text: &str, offset: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut idx = offset.min(chars.len());
    while idx < chars.len() && !is_word_char(chars[idx]) {
        idx += 1;
    }
    while idx < chars.len() && is_word_char(chars[idx]) {
        idx += 1;
    }
    idx
}

/// Byte index of the `col`-th character, or `line.len()` past the end.
pub fn char_to_byte_index(line: &str, col: usize) -> usize {
    if col == 0 {
        return 0;
    }
    line.char_indices()
        .nth(col)
        .map_or(line.len(), |(i, _)| i)
}
