//! Streaming JSON reader: tokenizer → lexer → projector (§4.A–§4.D).
//!
//! [`JsonStream`] is the single entry point the query driver uses. It owns
//! the byte buffer, so callers just hand it whatever arrived on the wire —
//! any chunk size, any split point, including mid-character and mid-string —
//! and get back the [`ProjectedEvent`]s that became decodable.

pub mod lexer;
pub mod projector;
pub mod tokenizer;

pub use projector::ProjectedEvent;
pub use tokenizer::TokenizeError;

use lexer::Lexer;
use projector::Projector;
use tokenizer::Tokenizer;

pub struct JsonStream {
    tokenizer: Tokenizer,
    lexer: Lexer,
    projector: Projector,
    buffer: Vec<u8>,
}

impl Default for JsonStream {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonStream {
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            lexer: Lexer::new(),
            projector: Projector::new(),
            buffer: Vec::new(),
        }
    }

    /// Feeds a chunk of response bytes, returning every event the chunk
    /// made decodable. Bytes that don't yet complete a token (at most a
    /// few, per the UTF-8/escape tail invariant in §4.A) stay buffered for
    /// the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<ProjectedEvent>, TokenizeError> {
        self.buffer.extend_from_slice(chunk);
        let mut cursor = 0;
        let mut events = Vec::new();

        let Self { tokenizer, lexer, projector, buffer } = self;

        while let Some(token) = tokenizer.next_token(buffer, &mut cursor)? {
            lexer.feed(token, &mut |lex_event| {
                if let Some(projected) = projector.project(&lex_event) {
                    events.push(projected);
                }
            });
        }

        buffer.drain(..cursor);
        Ok(events)
    }

    /// Clears the lexer's path stack between HTTP replies (§4.E): each
    /// reply is a fresh JSON document, but the tokenizer's cross-chunk tail
    /// and buffer keep running across the whole query's byte stream.
    pub fn reset_for_next_reply(&mut self) {
        self.lexer = Lexer::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_feed_produces_full_event_set() {
        let mut stream = JsonStream::new();
        let events = stream
            .feed(br#"{"infoUri":"http://x","columns":[{"name":"a","type":"bigint"}],"data":[[1]]}"#)
            .expect("valid json");
        assert!(events.contains(&ProjectedEvent::InfoUri("http://x".into())));
        assert!(events.contains(&ProjectedEvent::ColumnName("a".into())));
        assert!(events.contains(&ProjectedEvent::Cell { text: "1".into(), is_null: false }));
    }

    #[test]
    fn split_feeds_produce_the_same_events_as_one() {
        let whole: &[u8] = br#"{"nextUri":"http://next","stats":{"state":"RUNNING"},"data":[["a",1]]}"#;

        let mut whole_stream = JsonStream::new();
        let expected = whole_stream.feed(whole).expect("valid json");

        for split_at in 1..whole.len() {
            let (first, second) = whole.split_at(split_at);
            let mut stream = JsonStream::new();
            let mut got = stream.feed(first).expect("valid json");
            got.extend(stream.feed(second).expect("valid json"));
            assert_eq!(got, expected, "mismatch when split at byte {split_at}");
        }
    }

    #[test]
    fn byte_at_a_time_feed_still_resolves() {
        let whole: &[u8] = br#"{"error":{"failureInfo":{"type":"USER_ERROR","message":"nope"}}}"#;
        let mut stream = JsonStream::new();
        let mut events = Vec::new();
        for byte in whole {
            events.extend(stream.feed(std::slice::from_ref(byte)).expect("valid json"));
        }
        assert!(events.contains(&ProjectedEvent::ErrorType("USER_ERROR".into())));
        assert!(events.contains(&ProjectedEvent::ErrorMessage("nope".into())));
    }
}
