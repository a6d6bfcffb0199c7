//! Client handle (component G, §4.G).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::instrument;

use crate::driver;
use crate::error::{Error, Result};
use crate::opts::ClientOpts;
use crate::result::QueryResult;
use crate::transport::Transport;

#[cfg(feature = "reqwest-transport")]
use crate::transport::reqwest_transport::ReqwestTransport;

/// Process-level handle: configuration plus a roster of live queries' cancel
/// flags, so [`Client::cancel_all`] can be called from any thread without
/// the caller needing to track individual result handles (§4.G, §5).
pub struct Client {
    opts: ClientOpts,
    transport: Arc<dyn Transport>,
    roster: Mutex<Vec<Arc<AtomicBool>>>,
}

impl Client {
    /// Builds a client with the default transport.
    ///
    /// Requires the `reqwest-transport` feature (on by default). Callers
    /// supplying their own [`Transport`] should use [`Client::with_transport`]
    /// instead.
    #[cfg(feature = "reqwest-transport")]
    pub fn new(opts: ClientOpts) -> Result<Self> {
        let transport = ReqwestTransport::new(opts.connect_timeout).map_err(Error::Transport)?;
        Ok(Self::with_transport(opts, transport))
    }

    /// Builds a client around a caller-supplied [`Transport`].
    pub fn with_transport(opts: ClientOpts, transport: impl Transport + 'static) -> Self {
        Self::with_shared_transport(opts, Arc::new(transport))
    }

    /// Builds a client around a transport the caller retains a handle to —
    /// useful for tests that inspect a mock transport's call log after the
    /// query returns.
    pub fn with_shared_transport(opts: ClientOpts, transport: Arc<dyn Transport>) -> Self {
        Self { opts, transport, roster: Mutex::new(Vec::new()) }
    }

    /// Submits `sql` and blocks until the query reaches a terminal state.
    ///
    /// `describe` fires exactly once, as soon as the column schema is known.
    /// `row` fires once per delivered row. Both run synchronously on the
    /// calling thread (§5) before this call returns.
    #[instrument(skip_all)]
    pub fn query(
        &self,
        sql: &str,
        describe: impl FnMut(&QueryResult),
        row: impl FnMut(&QueryResult),
    ) -> Result<QueryResult> {
        if self.opts.server.is_empty() {
            return Err(Error::BadConfig("server must not be empty".to_string()));
        }

        let cancel_flag = Arc::new(AtomicBool::new(false));
        self.roster.lock().expect("roster mutex poisoned").push(Arc::clone(&cancel_flag));

        let mut result = QueryResult::new(Arc::clone(&cancel_flag));
        driver::run(self.transport.as_ref(), &self.opts, sql, &mut result, describe, row);

        self.roster
            .lock()
            .expect("roster mutex poisoned")
            .retain(|flag| !Arc::ptr_eq(flag, &cancel_flag));

        Ok(result)
    }

    /// Requests cancellation of every query currently running under this
    /// client, from whatever thread calls this (§5's cross-thread cancel
    /// requirement).
    pub fn cancel_all(&self) {
        for flag in self.roster.lock().expect("roster mutex poisoned").iter() {
            flag.store(true, Ordering::SeqCst);
        }
    }

    /// Number of queries currently registered (running or just finishing
    /// teardown). Mainly useful for tests.
    pub fn live_query_count(&self) -> usize {
        self.roster.lock().expect("roster mutex poisoned").len()
    }

    /// Releases the transport and drops the roster. Idempotent-safe only if
    /// the caller does not use the handle afterward (§4.G); `Drop` already
    /// performs the same release, so this mostly exists to make teardown an
    /// explicit, visible step at call sites that want one.
    pub fn close(self) {
        drop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{TransportError, TransportRequest};

    struct StubTransport;

    impl Transport for StubTransport {
        fn execute(
            &self,
            _request: TransportRequest<'_>,
            _sink: &mut dyn FnMut(&[u8]) -> bool,
        ) -> std::result::Result<u16, TransportError> {
            Ok(200)
        }
    }

    #[test]
    fn rejects_empty_server() {
        let client = Client::with_transport(ClientOpts { server: String::new(), ..ClientOpts::default() }, StubTransport);
        let err = client.query("select 1", |_| {}, |_| {}).unwrap_err();
        assert!(matches!(err, Error::BadConfig(_)));
    }

    #[test]
    fn roster_clears_after_query_completes() {
        let client = Client::with_transport(ClientOpts::new("localhost"), StubTransport);
        let _ = client.query("select 1", |_| {}, |_| {});
        assert_eq!(client.live_query_count(), 0);
    }

    #[test]
    fn cancel_all_is_a_noop_with_no_live_queries() {
        let client = Client::with_transport(ClientOpts::new("localhost"), StubTransport);
        client.cancel_all();
        assert_eq!(client.live_query_count(), 0);
    }
}
