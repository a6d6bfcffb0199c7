//! Client library for Presto's HTTP query protocol (`/v1/statement`).
//!
//! A caller submits a SQL statement through [`Client::query`] and receives,
//! through two callbacks, a column schema once it is discovered and a stream
//! of row records as the server produces them. The library owns the full
//! lifecycle of a query: submission, long-poll follow-up, row extraction,
//! cancellation, retry on transient overload, and teardown.

pub mod client;
pub mod column;
pub mod constant;
pub mod error;
pub mod json;
pub mod opts;
pub mod result;
pub mod transport;

mod driver;

pub use client::Client;
pub use column::{Column, FieldType};
pub use error::{ClientErrorKind, Error, Result};
pub use opts::ClientOpts;
pub use result::{QueryResult, QueryStatus};
pub use transport::{Transport, TransportError, TransportRequest};

#[cfg(feature = "reqwest-transport")]
pub use transport::reqwest_transport::ReqwestTransport;
