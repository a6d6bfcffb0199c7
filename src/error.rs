use thiserror::Error;

use crate::transport::TransportError;

pub type Result<T> = core::result::Result<T, Error>;

/// Client-side error taxonomy reported through the result accessor API.
///
/// This is never unwound as a panic: the query driver treats every one of
/// these as terminal data on the result, matching the protocol's own
/// distinction between a client-side failure and a server-reported one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientErrorKind {
    #[default]
    Ok,
    BadRequestData,
    ServerError,
    MaxRetriesReached,
    TransportError,
    ParseJsonError,
}

impl ClientErrorKind {
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl std::fmt::Display for ClientErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Ok => "ok",
            Self::BadRequestData => "bad request data",
            Self::ServerError => "server error",
            Self::MaxRetriesReached => "maximum retries reached",
            Self::TransportError => "transport error",
            Self::ParseJsonError => "json parse error",
        };
        f.write_str(text)
    }
}

/// Top-level error returned by fallible, `Result`-returning entry points
/// (client construction, query submission). Terminal states reached while a
/// query is already running are recorded on the result via
/// [`ClientErrorKind`] instead of propagated as an `Err`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("bad configuration: {0}")]
    BadConfig(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("json parse error: {0}")]
    Parse(String),
}
