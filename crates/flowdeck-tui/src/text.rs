//! ANSI-aware text utilities.
//!
//! Widths are display columns of the text with escape sequences removed.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// SGR reset.
pub const RESET: &str = "\x1b[0m";
pub const ELLIPSIS: char = '…';

/// Splits `s` into escape sequences and visible characters.
enum Segment<'a> {
    Escape(&'a str),
    Char(char),
}

fn segments(s: &str) -> impl Iterator<Item = Segment<'_>> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let ch = rest.chars().next()?;
        if ch == '\x1b' {
            let len = escape_len(rest);
            let (seq, tail) = rest.split_at(len);
            rest = tail;
            Some(Segment::Escape(seq))
        } else {
            rest = &rest[ch.len_utf8()..];
            Some(Segment::Char(ch))
        }
    })
}

/// Byte length of the escape sequence at the start of `s` (which begins with ESC).
fn escape_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.get(1) {
        // CSI: parameters and intermediates, then one final byte in 0x40..=0x7e.
        Some(b'[') => bytes[2..]
            .iter()
            .position(|b| (0x40..=0x7e).contains(b))
            .map_or(bytes.len(), |i| i + 3),
        // OSC: terminated by BEL or ST (ESC \).
        Some(b']') => {
            let mut i = 2;
            while i < bytes.len() {
                if bytes[i] == 0x07 {
                    return i + 1;
                }
                if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                    return i + 2;
                }
                i += 1;
            }
            bytes.len()
        }
        Some(_) => 1 + s[1..].chars().next().map_or(0, char::len_utf8),
        None => 1,
    }
}

/// Removes escape sequences, keeping visible text.
pub fn strip_ansi(s: &str) -> String {
    segments(s)
        .filter_map(|segment| match segment {
            Segment::Char(ch) => Some(ch),
            Segment::Escape(_) => None,
        })
        .collect()
}

/// Display width of `s` ignoring escape sequences.
pub fn visible_width(s: &str) -> usize {
    if !s.contains('\x1b') {
        return s.width();
    }
    strip_ansi(s).width()
}

/// Truncates `text` to at most `max` visible columns.
///
/// Escape sequences are copied whole and never split. When truncation
/// happens, the kept prefix is followed by a color reset and `…`.
pub fn truncate_ansi(text: &str, max: usize) -> String {
    if visible_width(text) <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let budget = max - 1;
    let mut out = String::with_capacity(text.len());
    let mut used = 0;
    for segment in segments(text) {
        match segment {
            Segment::Escape(seq) => out.push_str(seq),
            Segment::Char(ch) => {
                let w = ch.width().unwrap_or(0);
                if used + w > budget {
                    break;
                }
                out.push(ch);
                used += w;
            }
        }
    }
    out.push_str(RESET);
    out.push(ELLIPSIS);
    out
}

/// Pads `text` with trailing spaces up to `width` visible columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let visible = visible_width(text);
    if visible >= width {
        return text.to_string();
    }
    format!("{text}{}", " ".repeat(width - visible))
}

/// Truncates or pads so the result is exactly `width` visible columns.
pub fn fit_to_width(text: &str, width: usize) -> String {
    let truncated = truncate_ansi(text, width);
    // A wide char skipped at the boundary can leave one column short.
    pad_to_width(&truncated, width)
}

/// Keeps the end of `text`, prefixing `…` when the start was cut (plain text).
pub fn truncate_start_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return ELLIPSIS.to_string();
    }
    let mut kept = Vec::new();
    let mut width = 0;
    for ch in text.chars().rev() {
        let w = ch.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        kept.push(ch);
        width += w;
    }
    std::iter::once(ELLIPSIS).chain(kept.into_iter().rev()).collect()
}

/// Replaces tabs and drops control characters so a line renders on one row.
pub fn sanitize_line(s: &str) -> String {
    s.replace('\t', "    ")
        .chars()
        .filter(|c| !c.is_control() || *c == '\x1b')
        .collect()
}

/// Wraps `text` in SGR dim, discarding any styling it had.
pub fn dim(text: &str) -> String {
    format!("\x1b[2m{}{RESET}", strip_ansi(text))
}

/// Wraps `text` in SGR reverse video.
pub fn reverse(text: &str) -> String {
    format!("\x1b[7m{text}\x1b[27m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_removes_csi_and_osc() {
        assert_eq!(strip_ansi("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(strip_ansi("\x1b[38;5;14mcyan\x1b[39m!"), "cyan!");
        assert_eq!(strip_ansi("\x1b]8;;http://x\x07link\x1b]8;;\x07"), "link");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn test_visible_width_ignores_escapes() {
        assert_eq!(visible_width("\x1b[1mbold\x1b[22m"), 4);
        assert_eq!(visible_width("中文"), 4);
    }

    #[test]
    fn test_truncate_ansi_short_text_unchanged() {
        assert_eq!(truncate_ansi("hello", 5), "hello");
        assert_eq!(truncate_ansi("\x1b[31mhi\x1b[0m", 2), "\x1b[31mhi\x1b[0m");
    }

    #[test]
    fn test_truncate_ansi_appends_reset_and_ellipsis() {
        assert_eq!(truncate_ansi("hello world", 8), "hello w\x1b[0m…");
        let styled = truncate_ansi("\x1b[31mred text here\x1b[0m", 5);
        assert!(styled.starts_with("\x1b[31mred "));
        assert!(styled.ends_with("\x1b[0m…"));
        assert_eq!(visible_width(&styled), 5);
    }

    #[test]
    fn test_truncate_ansi_never_splits_escape() {
        let text = "ab\x1b[38;5;200mcdef";
        let out = truncate_ansi(text, 4);
        assert!(out.starts_with("ab\x1b[38;5;200mc"));
        assert_eq!(strip_ansi(&out), "abc…");
    }

    #[test]
    fn test_truncate_ansi_tiny_widths() {
        assert_eq!(truncate_ansi("hello", 0), "");
        assert_eq!(truncate_ansi("hello", 1), "\x1b[0m…");
    }

    #[test]
    fn test_pad_counts_visible_width() {
        assert_eq!(pad_to_width("\x1b[2mab\x1b[0m", 4), "\x1b[2mab\x1b[0m  ");
        assert_eq!(pad_to_width("abcdef", 3), "abcdef");
    }

    #[test]
    fn test_fit_to_width_is_exact() {
        assert_eq!(visible_width(&fit_to_width("a中文字", 4)), 4);
        assert_eq!(visible_width(&fit_to_width("", 6)), 6);
        assert_eq!(visible_width(&fit_to_width("0123456789", 6)), 6);
    }

    #[test]
    fn test_truncate_start_keeps_tail() {
        assert_eq!(truncate_start_with_ellipsis("hello", 10), "hello");
        assert_eq!(truncate_start_with_ellipsis("hello world", 6), "…world");
        assert_eq!(truncate_start_with_ellipsis("hello", 1), "…");
    }

    #[test]
    fn test_sanitize_line_expands_tabs() {
        assert_eq!(sanitize_line("a\tb\x07"), "a    b");
    }

    #[test]
    fn test_dim_discards_original_colors() {
        assert_eq!(dim("\x1b[31mred\x1b[0m"), "\x1b[2mred\x1b[0m");
    }
}
