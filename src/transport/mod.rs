//! The HTTP transport contract.
//!
//! The core query driver never talks to a socket directly. It drives
//! requests through the [`Transport`] trait, which is the Rust-native
//! restatement of libcurl's `WRITEFUNCTION` + `CURLINFO_RESPONSE_CODE` pair
//! that the original client built on: response bytes are streamed through a
//! sink closure as they arrive, and the sink can request early abort
//! (cancellation, or a fatal parse failure) by returning `false`.
//!
//! One concrete implementation, [`reqwest_transport::ReqwestTransport`],
//! ships behind the `reqwest-transport` feature (on by default). Tests
//! exercise the driver against an in-memory double instead.

#[cfg(feature = "reqwest-transport")]
pub mod reqwest_transport;

use std::time::Duration;

use auto_impl::auto_impl;
use thiserror::Error;

/// HTTP method used for a single request issued by the query driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

/// A single outgoing request, fully assembled by the driver.
#[derive(Debug, Clone)]
pub struct TransportRequest<'a> {
    pub method: Method,
    pub url: &'a str,
    pub headers: &'a [(&'a str, &'a str)],
    pub body: Option<&'a [u8]>,
    pub connect_timeout: Duration,
}

/// Opaque transport-layer failure (DNS, connect, TLS, read, write).
#[derive(Debug, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// The seam between the query driver and the network.
///
/// `execute` streams the response body through `sink` one chunk at a time.
/// `sink` returns `false` to request early abort; when it does, `execute`
/// should stop reading and return whatever status code it already knows (or
/// an error if none is known yet). A normal, fully-drained response returns
/// `Ok(status_code)`.
#[auto_impl(&, Box, Arc)]
pub trait Transport {
    fn execute(
        &self,
        request: TransportRequest<'_>,
        sink: &mut dyn FnMut(&[u8]) -> bool,
    ) -> Result<u16, TransportError>;
}
