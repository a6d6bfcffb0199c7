//! In-memory [`Transport`] double that replays a scripted sequence of HTTP
//! responses per URL, used to drive the query driver through S1-S6 (§8)
//! without a real network.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use presto_client::transport::{Method, Transport, TransportError, TransportRequest};

pub struct ScriptedResponse {
    pub status: u16,
    pub chunks: Vec<&'static [u8]>,
}

impl ScriptedResponse {
    pub fn ok(body: &'static [u8]) -> Self {
        Self { status: 200, chunks: vec![body] }
    }

    pub fn ok_chunked(chunks: Vec<&'static [u8]>) -> Self {
        Self { status: 200, chunks }
    }

    pub fn busy() -> Self {
        Self { status: 503, chunks: vec![] }
    }
}

#[derive(Default)]
pub struct MockTransport {
    scripts: RefCell<HashMap<String, VecDeque<ScriptedResponse>>>,
    pub delete_calls: RefCell<Vec<String>>,
    pub get_calls: RefCell<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, url: impl Into<String>, response: ScriptedResponse) {
        self.scripts.borrow_mut().entry(url.into()).or_default().push_back(response);
    }
}

impl Transport for MockTransport {
    fn execute(
        &self,
        request: TransportRequest<'_>,
        sink: &mut dyn FnMut(&[u8]) -> bool,
    ) -> Result<u16, TransportError> {
        match request.method {
            Method::Delete => {
                self.delete_calls.borrow_mut().push(request.url.to_string());
                return Ok(204);
            }
            Method::Get => self.get_calls.borrow_mut().push(request.url.to_string()),
            Method::Post => {}
        }

        let mut scripts = self.scripts.borrow_mut();
        let queue = scripts
            .get_mut(request.url)
            .ok_or_else(|| TransportError(format!("no script for {}", request.url)))?;
        let response = queue
            .pop_front()
            .ok_or_else(|| TransportError(format!("script exhausted for {}", request.url)))?;

        for chunk in &response.chunks {
            if !sink(chunk) {
                break;
            }
        }
        Ok(response.status)
    }
}
