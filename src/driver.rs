//! Query driver (component F, §4.F).
//!
//! Runs the POST → (GET → GET → …) long-poll loop for one query: builds
//! requests, drives them through a [`Transport`], classifies responses,
//! retries on 503, and feeds response bytes through the JSON pipeline,
//! invoking the user's describe/row callbacks as events land. This module
//! is private; [`crate::Client::query`] is the only entry point.

use std::thread;

use tracing::{debug, warn};

use crate::constant;
use crate::error::ClientErrorKind;
use crate::json::{JsonStream, ProjectedEvent};
use crate::opts::ClientOpts;
use crate::result::{QueryResult, QueryStatus};
use crate::transport::{Method, Transport, TransportRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Posting,
    Polling,
    Done,
}

/// Drives `result` to completion, calling `describe` once and `row` once
/// per delivered row. Blocks the calling thread for the query's whole
/// lifetime (§5: single-threaded cooperative scheduling).
pub(crate) fn run(
    transport: &dyn Transport,
    opts: &ClientOpts,
    sql: &str,
    result: &mut QueryResult,
    mut describe: impl FnMut(&QueryResult),
    mut row: impl FnMut(&QueryResult),
) {
    result.set_status(QueryStatus::Running);
    let mut json = JsonStream::new();
    let mut state = State::Posting;
    let mut next_url = format!("http://{}:{}{}", opts.server, opts.port, constant::QUERY_PATH);

    while state != State::Done {
        if result.is_cancel_requested() {
            cancel(transport, opts, result);
            break;
        }

        let method = match state {
            State::Posting => Method::Post,
            State::Polling => Method::Get,
            State::Done => unreachable!(),
        };

        match issue_with_retry(transport, opts, method, &next_url, sql, result, &mut json, &mut describe, &mut row) {
            RequestOutcome::Terminated => {
                if result.is_cancel_requested() {
                    cancel(transport, opts, result);
                }
                state = State::Done;
            }
            RequestOutcome::Continue => {
                state = State::Polling;
                match result.next_uri() {
                    Some(uri) => next_url = uri.to_string(),
                    None => {
                        finish(result);
                        state = State::Done;
                    }
                }
            }
        }

        if state == State::Polling {
            let wait = if result.has_delivered_a_row() {
                constant::RETRIEVE_WAIT
            } else {
                constant::UPDATE_WAIT
            };
            thread::sleep(wait);
        }
    }
}

enum RequestOutcome {
    /// A response was parsed; check `next_uri` to decide what's next.
    Continue,
    /// The driver already reached a terminal state (error or cancel).
    Terminated,
}

#[allow(clippy::too_many_arguments)]
fn issue_with_retry(
    transport: &dyn Transport,
    opts: &ClientOpts,
    method: Method,
    url: &str,
    sql: &str,
    result: &mut QueryResult,
    json: &mut JsonStream,
    describe: &mut impl FnMut(&QueryResult),
    row: &mut impl FnMut(&QueryResult),
) -> RequestOutcome {
    let mut attempt: u32 = 0;
    loop {
        json.reset_for_next_reply();
        let cancel_flag = result.cancel_flag();
        let user_agent = opts.user_agent.clone();
        let headers: Vec<(&str, &str)> = match method {
            Method::Post => vec![
                ("X-Presto-Source", constant::SOURCE),
                ("X-Presto-User", opts.user.as_str()),
                ("X-Presto-Catalog", opts.catalog.as_str()),
                ("X-Presto-Schema", opts.schema.as_str()),
                ("User-Agent", user_agent.as_str()),
            ],
            Method::Get => vec![("User-Agent", user_agent.as_str())],
            Method::Delete => vec![],
        };
        let body = match method {
            Method::Post => Some(sql.as_bytes()),
            _ => None,
        };
        let request = TransportRequest {
            method,
            url,
            headers: &headers,
            body,
            connect_timeout: opts.connect_timeout,
        };

        let mut parse_failed = false;
        let status = transport.execute(request, &mut |chunk| {
            if cancel_flag.load(std::sync::atomic::Ordering::SeqCst) {
                return false;
            }
            match json.feed(chunk) {
                Ok(events) => {
                    apply_events(result, events, describe, row);
                    true
                }
                Err(_) => {
                    parse_failed = true;
                    false
                }
            }
        });

        if result.is_cancel_requested() {
            return RequestOutcome::Terminated;
        }

        if parse_failed {
            warn!("json parse error mid-response");
            result.set_client_error_code(ClientErrorKind::ParseJsonError);
            result.set_status(QueryStatus::Failed);
            return RequestOutcome::Terminated;
        }

        let status = match status {
            Ok(code) => code,
            Err(e) => {
                warn!(error = %e, "transport error");
                result.set_client_error_code(ClientErrorKind::TransportError);
                result.set_transport_error_text(e.0);
                result.set_status(QueryStatus::Failed);
                return RequestOutcome::Terminated;
            }
        };

        let expected = match method {
            Method::Post | Method::Get => constant::EXPECT_HTTP_GET_POST,
            Method::Delete => constant::EXPECT_HTTP_DELETE,
        };

        if status == expected {
            debug!(status, "request succeeded");
            return RequestOutcome::Continue;
        }

        if status == constant::EXPECT_HTTP_BUSY {
            attempt += 1;
            if attempt > constant::MAXIMUM_RETRIES {
                warn!("maximum retries reached");
                result.set_client_error_code(ClientErrorKind::MaxRetriesReached);
                result.set_status(QueryStatus::Failed);
                return RequestOutcome::Terminated;
            }
            let wait = constant::RETRY_WAIT_BASE * attempt;
            debug!(attempt, wait_ms = wait.as_millis() as u64, "server busy, retrying");
            thread::sleep(wait);
            continue;
        }

        warn!(status, "unexpected http status");
        result.set_client_error_code(ClientErrorKind::ServerError);
        result.set_transport_error_text(status.to_string());
        result.set_status(QueryStatus::Failed);
        return RequestOutcome::Terminated;
    }
}

fn apply_events(
    result: &mut QueryResult,
    events: Vec<ProjectedEvent>,
    describe: &mut impl FnMut(&QueryResult),
    row: &mut impl FnMut(&QueryResult),
) {
    for event in events {
        match event {
            ProjectedEvent::InfoUri(uri) => result.set_info_uri(uri),
            ProjectedEvent::NextUri(uri) => result.set_next_uri(Some(uri)),
            ProjectedEvent::PartialCancelUri(uri) => result.set_cancel_uri(uri),
            ProjectedEvent::StatsState(state) => result.set_last_state(state),
            ProjectedEvent::ColumnBegin => result.begin_column(),
            ProjectedEvent::ColumnName(name) => result.set_last_column_name(name),
            ProjectedEvent::ColumnType(type_text) => result.set_last_column_type(&type_text),
            ProjectedEvent::RowBegin => {
                result.begin_row();
                maybe_fire_describe(result, describe);
            }
            ProjectedEvent::Cell { text, is_null } => {
                if result.write_cell(text, is_null) {
                    row(result);
                    result.end_row();
                }
            }
            ProjectedEvent::RowEnd => {}
            ProjectedEvent::ErrorType(line) | ProjectedEvent::ErrorMessage(line) => {
                result.append_error_line(&line);
            }
        }
    }

    if result.column_count() > 0 {
        maybe_fire_describe(result, describe);
    }
}

fn maybe_fire_describe(result: &mut QueryResult, describe: &mut impl FnMut(&QueryResult)) {
    if result.column_count() > 0 && result.describe_should_fire() {
        describe(result);
    }
}

fn finish(result: &mut QueryResult) {
    result.set_next_uri(None);
    if result.server_error_message().is_empty() {
        result.set_status(QueryStatus::Succeeded);
    } else {
        result.set_status(QueryStatus::Failed);
    }
}

fn cancel(transport: &dyn Transport, opts: &ClientOpts, result: &mut QueryResult) {
    let Some(uri) = result.cancel_uri().map(|s| s.to_string()) else {
        result.set_status(QueryStatus::Failed);
        return;
    };
    debug!("cancelling query");
    let request = TransportRequest {
        method: Method::Delete,
        url: &uri,
        headers: &[],
        body: None,
        connect_timeout: opts.connect_timeout,
    };
    // Best-effort: the DELETE's outcome is not reported (§4.F).
    let _ = transport.execute(request, &mut |_| true);
    if result.server_error_message().is_empty() {
        result.set_status(QueryStatus::Succeeded);
    } else {
        result.set_status(QueryStatus::Failed);
    }
}
