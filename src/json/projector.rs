//! Protocol projector (component D, §4.D).
//!
//! Matches the paths produced by the lexer against the handful of shapes
//! the `/v1/statement` response can take and turns them into
//! [`ProjectedEvent`]s the query driver understands. Everything outside
//! these shapes — extra fields future server versions might add — is
//! silently ignored, which is what lets this client keep working against
//! responses it wasn't written against (non-goal, §1).

use super::lexer::{LexEvent, PathSegment};

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectedEvent {
    InfoUri(String),
    NextUri(String),
    PartialCancelUri(String),
    ColumnBegin,
    ColumnName(String),
    ColumnType(String),
    RowBegin,
    Cell { text: String, is_null: bool },
    RowEnd,
    StatsState(String),
    ErrorType(String),
    ErrorMessage(String),
}

fn is_array_element_of(path: &[PathSegment], key: &str) -> bool {
    matches!(path, [PathSegment::Key(k), PathSegment::Index(_)] if k == key)
}

fn project_value(path: &[PathSegment], text: String, is_null: bool) -> Option<ProjectedEvent> {
    use PathSegment::{Index, Key};

    match path {
        [Key(k)] if k == "infoUri" => Some(ProjectedEvent::InfoUri(text)),
        [Key(k)] if k == "nextUri" => Some(ProjectedEvent::NextUri(text)),
        [Key(k)] if k == "partialCancelUri" => Some(ProjectedEvent::PartialCancelUri(text)),
        [Key(c), Index(_), Key(f)] if c == "columns" && f == "name" => Some(ProjectedEvent::ColumnName(text)),
        [Key(c), Index(_), Key(f)] if c == "columns" && f == "type" => Some(ProjectedEvent::ColumnType(text)),
        [Key(d), Index(_), Index(_)] if d == "data" => Some(ProjectedEvent::Cell { text, is_null }),
        [Key(s), Key(f)] if s == "stats" && f == "state" => Some(ProjectedEvent::StatsState(text)),
        [Key(e), Key(fi), Key(f)] if e == "error" && fi == "failureInfo" && f == "type" => {
            Some(ProjectedEvent::ErrorType(text))
        }
        [Key(e), Key(fi), Key(f)] if e == "error" && fi == "failureInfo" && f == "message" => {
            Some(ProjectedEvent::ErrorMessage(text))
        }
        _ => None,
    }
}

#[derive(Default)]
pub struct Projector;

impl Projector {
    pub fn new() -> Self {
        Self
    }

    pub fn project(&mut self, event: &LexEvent) -> Option<ProjectedEvent> {
        match event {
            LexEvent::EnterObject { path } if is_array_element_of(path, "columns") => Some(ProjectedEvent::ColumnBegin),
            LexEvent::EnterArray { path } if is_array_element_of(path, "data") => Some(ProjectedEvent::RowBegin),
            LexEvent::ExitArray { path } if is_array_element_of(path, "data") => Some(ProjectedEvent::RowEnd),
            LexEvent::Value { path, text, is_null } => project_value(path, text.clone(), *is_null),
            _ => None,
        }
    }
}
