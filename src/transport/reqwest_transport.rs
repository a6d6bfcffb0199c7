//! Default [`Transport`](super::Transport) implementation built on
//! `reqwest`'s blocking client, mirroring the synchronous, single-threaded
//! transport the core's concurrency model assumes (§5).

use std::io::Read;

use super::{Method, Transport, TransportError, TransportRequest};

/// A blocking-`reqwest`-backed transport.
///
/// One `reqwest::blocking::Client` is reused across requests so connection
/// pooling and the configured connect timeout apply uniformly, the same way
/// a single libcurl easy-handle was reused across POST/GET/DELETE in the
/// original client.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(connect_timeout: std::time::Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransportError(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn execute(
        &self,
        request: TransportRequest<'_>,
        sink: &mut dyn FnMut(&[u8]) -> bool,
    ) -> Result<u16, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(request.url),
            Method::Post => self.client.post(request.url),
            Method::Delete => self.client.delete(request.url),
        };

        for (name, value) in request.headers {
            builder = builder.header(*name, *value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body.to_vec());
        }

        let mut response = builder.send().map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();

        let mut buf = [0_u8; 8192];
        loop {
            let n = response
                .read(&mut buf)
                .map_err(|e| TransportError(e.to_string()))?;
            if n == 0 {
                break;
            }
            if !sink(&buf[..n]) {
                break;
            }
        }

        Ok(status)
    }
}
