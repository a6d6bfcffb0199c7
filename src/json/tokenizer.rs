//! Resumable byte-level JSON scanner (component B, §4.B).
//!
//! The tokenizer consumes a flat byte buffer through a cursor and emits one
//! [`Token`] per call to [`Tokenizer::next_token`]. When a token would
//! require bytes past the end of the buffer (a split UTF-8 code point, or a
//! string/number/keyword cut off mid-value), the call returns `Ok(None)`
//! and leaves the cursor exactly where it was: the caller appends more
//! bytes and calls again. State that spans calls — the read state, a
//! pending escape, and the in-progress value buffer — lives on `Tokenizer`
//! itself, which is what makes this resumable (invariant 1, §3).

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
    Colon,
    Comma,
    String,
    Number,
    True,
    False,
    Null,
}

/// A single completed token. `text` is only meaningful for `String` and
/// `Number`; other kinds carry an empty buffer.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    Search,
    InString,
    InNonString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    None,
    Whitespace,
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
    Backslash,
    Quote,
    Colon,
    Comma,
}

fn classify_control(byte0: u8) -> Control {
    match byte0 {
        b' ' | b'\t' | b'\r' | b'\n' | 0x0c => Control::Whitespace,
        b'{' => Control::ObjectOpen,
        b'}' => Control::ObjectClose,
        b'[' => Control::ArrayOpen,
        b']' => Control::ArrayClose,
        b'\\' => Control::Backslash,
        b'"' => Control::Quote,
        b':' => Control::Colon,
        b',' => Control::Comma,
        _ => Control::None,
    }
}

/// Classifies the UTF-8 length of the code point starting at `buf[pos]`.
/// Returns `None` both at true end-of-buffer and when the declared length
/// runs past the available bytes (a split code point) — in both cases the
/// caller needs more data before progress can resume.
fn utf8_char_len(buf: &[u8], pos: usize) -> Option<usize> {
    let byte0 = *buf.get(pos)?;
    let len = if byte0 & 0x80 == 0 {
        1
    } else if byte0 & 0xF0 == 0xF0 {
        4
    } else if byte0 & 0xE0 == 0xE0 {
        3
    } else {
        2
    };
    if pos + len > buf.len() { None } else { Some(len) }
}

fn classify_keyword(tag: &[u8]) -> TokenKind {
    if tag.starts_with(b"true") {
        TokenKind::True
    } else if tag.starts_with(b"false") {
        TokenKind::False
    } else if tag.starts_with(b"null") {
        TokenKind::Null
    } else {
        TokenKind::Number
    }
}

#[derive(Debug, Error)]
#[error("json tokenizer reached an unrecoverable state")]
pub struct TokenizeError;

pub struct Tokenizer {
    state: ReadState,
    escape_pending: bool,
    tag_buffer: Vec<u8>,
    errored: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            state: ReadState::Search,
            escape_pending: false,
            tag_buffer: Vec::new(),
            errored: false,
        }
    }

    pub fn has_errored(&self) -> bool {
        self.errored
    }

    /// Attempts to produce the next token starting at `*cursor`. On success
    /// advances `*cursor` past the consumed bytes. Returns `Ok(None)` if
    /// `buf[*cursor..]` does not yet contain a full token; `*cursor` is left
    /// unchanged so the same call can be retried once more bytes are fed.
    pub fn next_token(&mut self, buf: &[u8], cursor: &mut usize) -> Result<Option<Token>, TokenizeError> {
        if self.errored {
            return Err(TokenizeError);
        }

        loop {
            let pos = *cursor;
            let Some(ch_len) = utf8_char_len(buf, pos) else {
                return Ok(None);
            };
            let byte0 = buf[pos];
            let control = classify_control(byte0);

            match self.state {
                ReadState::Search => match control {
                    Control::Whitespace => *cursor += ch_len,
                    Control::Backslash => {
                        self.errored = true;
                        return Err(TokenizeError);
                    }
                    Control::ObjectOpen => {
                        *cursor += ch_len;
                        return Ok(Some(self.emit(TokenKind::ObjectOpen)));
                    }
                    Control::ObjectClose => {
                        *cursor += ch_len;
                        return Ok(Some(self.emit(TokenKind::ObjectClose)));
                    }
                    Control::ArrayOpen => {
                        *cursor += ch_len;
                        return Ok(Some(self.emit(TokenKind::ArrayOpen)));
                    }
                    Control::ArrayClose => {
                        *cursor += ch_len;
                        return Ok(Some(self.emit(TokenKind::ArrayClose)));
                    }
                    Control::Colon => {
                        *cursor += ch_len;
                        return Ok(Some(self.emit(TokenKind::Colon)));
                    }
                    Control::Comma => {
                        *cursor += ch_len;
                        return Ok(Some(self.emit(TokenKind::Comma)));
                    }
                    Control::Quote => {
                        *cursor += ch_len;
                        self.state = ReadState::InString;
                    }
                    Control::None => {
                        // Reconsume the same byte in IN_NONSTRING; don't advance.
                        self.state = ReadState::InNonString;
                    }
                },

                ReadState::InString => {
                    if self.escape_pending {
                        self.escape_pending = false;
                        self.push(buf, pos, ch_len);
                        *cursor += ch_len;
                    } else if control == Control::Backslash {
                        self.escape_pending = true;
                        self.push(buf, pos, ch_len);
                        *cursor += ch_len;
                    } else if control == Control::Quote {
                        *cursor += ch_len;
                        self.state = ReadState::Search;
                        return Ok(Some(self.emit(TokenKind::String)));
                    } else {
                        self.push(buf, pos, ch_len);
                        *cursor += ch_len;
                    }
                }

                ReadState::InNonString => {
                    if matches!(control, Control::ArrayClose | Control::ObjectClose | Control::Comma) {
                        // Reconsume the terminator in SEARCH; don't advance.
                        self.state = ReadState::Search;
                        let kind = classify_keyword(&self.tag_buffer);
                        return Ok(Some(self.emit(kind)));
                    }
                    self.push(buf, pos, ch_len);
                    *cursor += ch_len;
                }
            }
        }
    }

    fn push(&mut self, buf: &[u8], pos: usize, len: usize) {
        self.tag_buffer.extend_from_slice(&buf[pos..pos + len]);
    }

    fn emit(&mut self, kind: TokenKind) -> Token {
        let text = std::mem::take(&mut self.tag_buffer);
        Token { kind, text }
    }
}
