use std::time::Duration;

use smart_default::SmartDefault;

use crate::constant;

/// Configuration for a [`Client`](crate::client::Client).
///
/// ```
/// use presto_client::ClientOpts;
///
/// let mut opts = ClientOpts::new("presto.example.com");
/// opts.port = 9000;
/// opts.catalog = "tpch".to_string();
/// ```
#[derive(Debug, Clone, SmartDefault)]
pub struct ClientOpts {
    /// Hostname or IP address of the Presto coordinator.
    #[default("localhost".to_string())]
    pub server: String,

    /// TCP port of the Presto coordinator.
    #[default(constant::DEFAULT_PORT)]
    pub port: u16,

    /// Catalog name passed via `X-Presto-Catalog`.
    #[default(constant::DEFAULT_CATALOG.to_string())]
    pub catalog: String,

    /// Schema name passed via `X-Presto-Schema`.
    #[default(constant::DEFAULT_SCHEMA.to_string())]
    pub schema: String,

    /// Username passed via `X-Presto-User`. Defaults to the `USER`
    /// environment variable, falling back to `"unknown"` when it is unset
    /// (OS username lookup proper is a CLI-layer concern, out of scope here).
    #[default(default_user())]
    pub user: String,

    /// Value sent as the `User-Agent` header.
    #[default(format!("{}/{}", constant::SOURCE, constant::VERSION))]
    pub user_agent: String,

    /// Connect timeout applied to every POST/GET/DELETE request.
    #[default(constant::CONNECT_TIMEOUT)]
    pub connect_timeout: Duration,
}

fn default_user() -> String {
    std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
}

impl ClientOpts {
    /// Start from defaults, overriding only the server address.
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Self::default()
        }
    }
}
