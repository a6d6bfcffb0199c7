//! Protocol-level constants for the Presto HTTP client.

use std::time::Duration;

/// URL suffix added to the server root to start a query.
pub const QUERY_PATH: &str = "/v1/statement";

/// Client name sent in the `User-Agent` header and reported to the server.
pub const SOURCE: &str = "presto-client-rs";

/// Crate version reported alongside [`SOURCE`] in the default user agent.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Connect timeout for every individual HTTP request.
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Poll interval used while no row has been delivered yet.
pub const UPDATE_WAIT: Duration = Duration::from_millis(1500);

/// Poll interval used once at least one row has been delivered.
pub const RETRIEVE_WAIT: Duration = Duration::from_millis(50);

/// Base wait time multiplied by the retry count after a 503 response.
pub const RETRY_WAIT_BASE: Duration = Duration::from_millis(100);

/// Maximum number of retries for a request answered with HTTP 503.
pub const MAXIMUM_RETRIES: u32 = 5;

/// Default TCP port of a Presto coordinator.
pub const DEFAULT_PORT: u16 = 8080;

/// Default catalog name.
pub const DEFAULT_CATALOG: &str = "hive";

/// Default schema name.
pub const DEFAULT_SCHEMA: &str = "default";

/// HTTP status code expected for POST/GET requests.
pub const EXPECT_HTTP_GET_POST: u16 = 200;

/// HTTP status code expected for DELETE (cancel) requests.
pub const EXPECT_HTTP_DELETE: u16 = 204;

/// HTTP status code signalling the server is busy and the request should be retried.
pub const EXPECT_HTTP_BUSY: u16 = 503;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_wait_matches_budget() {
        // S3/S5 in the testable-properties section: total wait for k retries is 100*(1+2+...+k) ms.
        let waits: u64 = (1..=5).map(|n| RETRY_WAIT_BASE.as_millis() as u64 * n).sum();
        assert_eq!(waits, 1500);
    }

    #[test]
    fn poll_intervals_favor_flowing_rows() {
        assert!(RETRIEVE_WAIT < UPDATE_WAIT);
    }
}
