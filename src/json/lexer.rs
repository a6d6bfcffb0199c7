//! Path-stack JSON lexer (component C, §4.C).
//!
//! Consumes [`Token`](super::tokenizer::Token)s from the tokenizer and turns
//! them into [`LexEvent`]s carrying a full path from the document root: a
//! sequence of object keys and array indices. Object member names are paired
//! with their following value here — a bare string token inside an object,
//! while no name is pending, is the name, not a value — so downstream code
//! never has to reason about JSON grammar, only about paths.

use super::tokenizer::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LexEvent {
    EnterObject { path: Vec<PathSegment> },
    ExitObject { path: Vec<PathSegment> },
    EnterArray { path: Vec<PathSegment> },
    ExitArray { path: Vec<PathSegment> },
    /// A leaf value (string, number, boolean, or null) at `path`. Booleans
    /// are rendered as `"1"`/`"0"` (§4.C); null carries `is_null` with an
    /// empty `text`. Strings keep their escape sequences verbatim — no
    /// unescaping is performed (open question, §9).
    Value { path: Vec<PathSegment>, text: String, is_null: bool },
}

enum Frame {
    Object { attach_path: Vec<PathSegment>, pending_name: Option<String> },
    Array { attach_path: Vec<PathSegment>, index: usize },
}

/// Decodes token text as UTF-8, falling back to a lossy conversion for
/// malformed input rather than failing the whole stream over one field.
fn decode_text(bytes: &[u8]) -> String {
    match simdutf8::basic::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

#[derive(Default)]
pub struct Lexer {
    stack: Vec<Frame>,
}

impl Lexer {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn feed(&mut self, token: Token, emit: &mut dyn FnMut(LexEvent)) {
        match token.kind {
            TokenKind::Colon | TokenKind::Comma => {}
            TokenKind::ObjectOpen => self.open(true, emit),
            TokenKind::ArrayOpen => self.open(false, emit),
            TokenKind::ObjectClose => self.close(true, emit),
            TokenKind::ArrayClose => self.close(false, emit),
            TokenKind::String => self.scalar(decode_text(&token.text), true, false, emit),
            TokenKind::Number => self.scalar(decode_text(&token.text), false, false, emit),
            TokenKind::True => self.scalar("1".to_string(), false, false, emit),
            TokenKind::False => self.scalar("0".to_string(), false, false, emit),
            TokenKind::Null => self.scalar(String::new(), false, true, emit),
        }
    }

    fn path_for_new_value(&self) -> Vec<PathSegment> {
        self.stack
            .iter()
            .map(|frame| match frame {
                Frame::Object { pending_name, .. } => {
                    PathSegment::Key(pending_name.clone().expect("member name set before its value"))
                }
                Frame::Array { index, .. } => PathSegment::Index(*index),
            })
            .collect()
    }

    fn advance_after_value(&mut self) {
        if let Some(top) = self.stack.last_mut() {
            match top {
                Frame::Object { pending_name, .. } => *pending_name = None,
                Frame::Array { index, .. } => *index += 1,
            }
        }
    }

    fn scalar(&mut self, text: String, is_string: bool, is_null: bool, emit: &mut dyn FnMut(LexEvent)) {
        if is_string {
            if let Some(Frame::Object { pending_name, .. }) = self.stack.last_mut() {
                if pending_name.is_none() {
                    *pending_name = Some(text);
                    return;
                }
            }
        }
        let path = self.path_for_new_value();
        emit(LexEvent::Value { path, text, is_null });
        self.advance_after_value();
    }

    fn open(&mut self, is_object: bool, emit: &mut dyn FnMut(LexEvent)) {
        let attach_path = self.path_for_new_value();
        if is_object {
            emit(LexEvent::EnterObject { path: attach_path.clone() });
            self.stack.push(Frame::Object { attach_path, pending_name: None });
        } else {
            emit(LexEvent::EnterArray { path: attach_path.clone() });
            self.stack.push(Frame::Array { attach_path, index: 0 });
        }
    }

    fn close(&mut self, is_object: bool, emit: &mut dyn FnMut(LexEvent)) {
        let Some(frame) = self.stack.pop() else { return };
        match (is_object, frame) {
            (true, Frame::Object { attach_path, .. }) => emit(LexEvent::ExitObject { path: attach_path }),
            (false, Frame::Array { attach_path, .. }) => emit(LexEvent::ExitArray { path: attach_path }),
            // A mismatched bracket from a malformed stream; nothing sane to emit.
            (_, _) => {}
        }
        self.advance_after_value();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::tokenizer::Tokenizer;

    fn lex(input: &[u8]) -> Vec<LexEvent> {
        let mut tokenizer = Tokenizer::new();
        let mut lexer = Lexer::new();
        let mut cursor = 0;
        let mut events = Vec::new();
        while let Some(token) = tokenizer.next_token(input, &mut cursor).expect("no parse error") {
            lexer.feed(token, &mut |e| events.push(e));
        }
        events
    }

    #[test]
    fn object_member_name_paired_with_value() {
        let events = lex(br#"{"infoUri":"http://x"}"#);
        assert_eq!(
            events,
            vec![
                LexEvent::EnterObject { path: vec![] },
                LexEvent::Value {
                    path: vec![PathSegment::Key("infoUri".into())],
                    text: "http://x".into(),
                    is_null: false,
                },
                LexEvent::ExitObject { path: vec![] },
            ]
        );
    }

    #[test]
    fn array_elements_get_sequential_indices() {
        let events = lex(br#"{"data":[["a",1],["b",2]]}"#);
        let data_key = || PathSegment::Key("data".into());
        assert!(events.contains(&LexEvent::EnterArray { path: vec![data_key()] }));
        assert!(events.contains(&LexEvent::Value {
            path: vec![data_key(), PathSegment::Index(1), PathSegment::Index(1)],
            text: "2".into(),
            is_null: false,
        }));
    }

    #[test]
    fn null_and_booleans_carry_textual_form() {
        let events = lex(br#"{"a":null,"b":true,"c":false}"#);
        assert!(events.contains(&LexEvent::Value {
            path: vec![PathSegment::Key("a".into())],
            text: String::new(),
            is_null: true,
        }));
        assert!(events.contains(&LexEvent::Value {
            path: vec![PathSegment::Key("b".into())],
            text: "1".into(),
            is_null: false,
        }));
        assert!(events.contains(&LexEvent::Value {
            path: vec![PathSegment::Key("c".into())],
            text: "0".into(),
            is_null: false,
        }));
    }

    #[test]
    fn nested_objects_build_multi_segment_paths() {
        let events = lex(br#"{"error":{"failureInfo":{"type":"USER_ERROR"}}}"#);
        assert!(events.contains(&LexEvent::Value {
            path: vec![
                PathSegment::Key("error".into()),
                PathSegment::Key("failureInfo".into()),
                PathSegment::Key("type".into()),
            ],
            text: "USER_ERROR".into(),
            is_null: false,
        }));
    }
}
