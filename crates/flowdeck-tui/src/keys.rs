//! Key decoding for raw terminal input.
//!
//! A single read from the terminal yields a chunk of bytes. `decode` turns one
//! chunk into at most one [`KeyEvent`]:
//!
//! - a chunk starting with the bracketed-paste start marker is pasted text
//! - a chunk matching an entry of the escape table is a named key
//! - a single printable character is a literal key
//! - any other multi-character chunk without a leading escape is treated as an
//!   unbracketed paste burst
//!
//! Everything else is unknown and yields `None`; the reader waits for the next
//! chunk in that case.

use crate::text::strip_ansi;

/// Bracketed paste start marker.
pub const PASTE_START: &str = "\x1b[200~";
/// Bracketed paste end marker.
pub const PASTE_END: &str = "\x1b[201~";

/// A classified key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Delete,
    WordLeft,
    WordRight,
    Tab,
    Enter,
    Backspace,
    /// Submit shortcut for multi-line editing (Ctrl+S).
    Commit,
    /// Esc or Ctrl+C. Callers that need to tell the two apart look at `raw`.
    Escape,
    Char(char),
    Paste(String),
}

/// One decoded terminal input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    /// The chunk as received (lossy UTF-8). For pastes, the normalized text.
    pub raw: String,
}

impl KeyEvent {
    pub fn new(key: Key, raw: impl Into<String>) -> Self {
        Self {
            key,
            raw: raw.into(),
        }
    }

    /// Builds a paste event; `raw` mirrors the pasted text.
    pub fn paste(text: String) -> Self {
        Self {
            raw: text.clone(),
            key: Key::Paste(text),
        }
    }

    /// Short symbolic name, used for logging.
    pub fn name(&self) -> &str {
        match &self.key {
            Key::Up => "up",
            Key::Down => "down",
            Key::Left => "left",
            Key::Right => "right",
            Key::Home => "home",
            Key::End => "end",
            Key::Delete => "delete",
            Key::WordLeft => "wordLeft",
            Key::WordRight => "wordRight",
            Key::Tab => "tab",
            Key::Enter => "enter",
            Key::Backspace => "backspace",
            Key::Commit => "commit",
            Key::Escape => "escape",
            Key::Char(_) => self.raw.as_str(),
            Key::Paste(_) => "paste",
        }
    }
}

const SEQUENCES: &[(&str, Key)] = &[
    ("\x1b[A", Key::Up),
    ("\x1b[B", Key::Down),
    ("\x1b[C", Key::Right),
    ("\x1b[D", Key::Left),
    ("\x1b[H", Key::Home),
    ("\x1b[1~", Key::Home),
    ("\x1b[F", Key::End),
    ("\x1b[4~", Key::End),
    ("\x1b[3~", Key::Delete),
    ("\x1b[1;5D", Key::WordLeft),
    ("\x1bb", Key::WordLeft),
    ("\x1b[1;5C", Key::WordRight),
    ("\x1bf", Key::WordRight),
    ("\t", Key::Tab),
    ("\r", Key::Enter),
    ("\n", Key::Enter),
    ("\x7f", Key::Backspace),
    ("\x08", Key::Backspace),
    ("\x13", Key::Commit),
    ("\x1b", Key::Escape),
    ("\x03", Key::Escape),
];

/// Decodes one raw input chunk. Returns `None` for unrecognized input.
pub fn decode(chunk: &[u8]) -> Option<KeyEvent> {
    let text = String::from_utf8_lossy(chunk);

    if let Some(rest) = text.strip_prefix(PASTE_START) {
        // An end marker split into a later read is not reassembled.
        let body = rest.find(PASTE_END).map_or(rest, |end| &rest[..end]);
        return Some(KeyEvent::paste(clean_paste(body)));
    }

    if let Some((_, key)) = SEQUENCES.iter().find(|(seq, _)| *seq == text) {
        return Some(KeyEvent::new(key.clone(), text));
    }

    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if u32::from(ch) >= 32 => Some(KeyEvent::new(Key::Char(ch), text)),
        (Some(first), Some(_)) if first != '\x1b' => {
            let filtered = clean_paste(&text);
            if filtered.is_empty() {
                None
            } else {
                Some(KeyEvent::paste(filtered))
            }
        }
        _ => None,
    }
}

/// Pasted text as it may be inserted into a dialog row.
///
/// Escape sequences are removed, line endings become `\n`, tabs expand to
/// four spaces and any other control character is dropped.
pub fn clean_paste(text: &str) -> String {
    normalize_newlines(&strip_ansi(text))
        .replace('\t', "    ")
        .chars()
        .filter(|c| *c == '\n' || !c.is_control())
        .collect()
}

/// Converts `\r\n` and bare `\r` to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
