//! Result state (component E, §3, §4.E).
//!
//! Owns everything that accumulates over the life of one query: the column
//! schema, the row under assembly, the status, the last URIs the server
//! handed back, and the accumulated error text. The query driver is the only
//! writer; callbacks and external callers only read through the accessor
//! API below, plus [`QueryResult::request_cancel`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::column::{Column, FieldType};
use crate::error::ClientErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    None,
    Running,
    Succeeded,
    Failed,
}

/// State of one query, from submission through termination.
///
/// Exclusively owned: its column vector, tokenizer/lexer, response buffer
/// and transport handle are never shared with another result (§3,
/// Ownership). The cancel flag is the one exception — it is an
/// `Arc<AtomicBool>` so a caller can request cancellation from another
/// thread through [`crate::Client::cancel_all`] while this result's driver
/// loop is blocked on this thread (§5).
pub struct QueryResult {
    columns: Vec<Column>,
    current_cell_index: i32,
    status: QueryStatus,
    info_uri: Option<String>,
    next_uri: Option<String>,
    cancel_uri: Option<String>,
    last_state: String,
    accumulated_error: String,
    cancel_requested: Arc<AtomicBool>,
    client_error_code: ClientErrorKind,
    transport_error_text: String,
    row_delivered: bool,
    describe_fired: bool,
}

impl QueryResult {
    pub(crate) fn new(cancel_requested: Arc<AtomicBool>) -> Self {
        Self {
            columns: Vec::new(),
            current_cell_index: -1,
            status: QueryStatus::None,
            info_uri: None,
            next_uri: None,
            cancel_uri: None,
            last_state: String::new(),
            accumulated_error: String::new(),
            cancel_requested,
            client_error_code: ClientErrorKind::Ok,
            transport_error_text: String::new(),
            row_delivered: false,
            describe_fired: false,
        }
    }

    // --- accessor API (§6) ---

    pub fn status(&self) -> QueryStatus {
        self.status
    }

    /// Last `stats.state` text reported by the server, e.g. `"RUNNING"`.
    pub fn last_state(&self) -> &str {
        &self.last_state
    }

    /// Aggregated `error.failureInfo.{type,message}` text across replies.
    pub fn server_error_message(&self) -> &str {
        &self.accumulated_error
    }

    pub fn client_error_code(&self) -> ClientErrorKind {
        self.client_error_code
    }

    pub fn transport_error_text(&self) -> &str {
        &self.transport_error_text
    }

    pub fn info_uri(&self) -> Option<&str> {
        self.info_uri.as_deref()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_name(&self, index: usize) -> &str {
        self.columns.get(index).map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn column_type(&self, index: usize) -> FieldType {
        self.columns.get(index).map(|c| c.field_type).unwrap_or_default()
    }

    pub fn column_type_name(&self, index: usize) -> &'static str {
        self.column_type(index).type_name()
    }

    pub fn cell_text(&self, index: usize) -> &str {
        self.columns.get(index).map(|c| c.cell_text()).unwrap_or("")
    }

    /// Out-of-range cells read as null, matching the accessor contract that
    /// a non-existent cell reports empty/null rather than erroring.
    pub fn cell_is_null(&self, index: usize) -> bool {
        self.columns.get(index).map(|c| c.cell_is_null()).unwrap_or(true)
    }

    /// Requests cancellation. Safe to call from inside a row/describe
    /// callback (sets the flag this result's own driver loop observes) or,
    /// via a clone obtained through [`crate::Client::cancel_all`], from any
    /// other thread. Sticky: once true, stays true (invariant 6, §3).
    pub fn request_cancel(&self) {
        self.cancel_requested.store(true, Ordering::SeqCst);
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::SeqCst)
    }

    // --- driver-internal mutation points ---

    pub(crate) fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel_requested)
    }

    pub(crate) fn begin_column(&mut self) {
        self.columns.push(Column::new(String::new()));
    }

    pub(crate) fn set_last_column_name(&mut self, name: String) {
        if let Some(col) = self.columns.last_mut() {
            col.name = name;
        }
    }

    pub(crate) fn set_last_column_type(&mut self, type_text: &str) {
        if let Some(col) = self.columns.last_mut() {
            col.field_type = FieldType::from_wire(type_text);
        }
    }

    pub(crate) fn begin_row(&mut self) {
        self.current_cell_index = 0;
    }

    /// Writes one cell and advances the cursor. Returns `true` when that
    /// cell was the row's last column — the caller (the driver) is then
    /// responsible for invoking the row callback and must follow up with
    /// [`QueryResult::end_row`].
    pub(crate) fn write_cell(&mut self, text: String, is_null: bool) -> bool {
        let index = self.current_cell_index.max(0) as usize;
        if let Some(col) = self.columns.get_mut(index) {
            col.cell_text = text;
            col.cell_is_null = is_null;
        }
        let is_last = index + 1 >= self.columns.len();
        if !is_last {
            self.current_cell_index += 1;
        }
        is_last
    }

    /// Ends the row under assembly. Sticky: once a row has been emitted,
    /// [`QueryResult::has_delivered_a_row`] stays true for the rest of the
    /// query, which is what governs the poll-interval choice (§4.F).
    pub(crate) fn end_row(&mut self) {
        self.current_cell_index = -1;
        self.row_delivered = true;
    }

    pub(crate) fn has_delivered_a_row(&self) -> bool {
        self.row_delivered
    }

    pub(crate) fn set_info_uri(&mut self, uri: String) {
        self.info_uri = Some(uri);
    }

    pub(crate) fn set_next_uri(&mut self, uri: Option<String>) {
        self.next_uri = uri;
    }

    pub(crate) fn next_uri(&self) -> Option<&str> {
        self.next_uri.as_deref()
    }

    pub(crate) fn set_cancel_uri(&mut self, uri: String) {
        self.cancel_uri = Some(uri);
    }

    pub(crate) fn cancel_uri(&self) -> Option<&str> {
        self.cancel_uri.as_deref()
    }

    pub(crate) fn set_last_state(&mut self, state: String) {
        self.last_state = state;
    }

    /// Appends a line to the accumulated error text. Lines are joined with
    /// `\n` and never reordered or de-duplicated (§9).
    pub(crate) fn append_error_line(&mut self, line: &str) {
        if !self.accumulated_error.is_empty() {
            self.accumulated_error.push('\n');
        }
        self.accumulated_error.push_str(line);
    }

    pub(crate) fn set_status(&mut self, status: QueryStatus) {
        self.status = status;
    }

    pub(crate) fn set_client_error_code(&mut self, code: ClientErrorKind) {
        self.client_error_code = code;
    }

    pub(crate) fn set_transport_error_text(&mut self, text: String) {
        self.transport_error_text = text;
    }

    /// Sticky describe-callback gate (§4.D): returns `true` the first time
    /// it is called, `false` on every call after.
    pub(crate) fn describe_should_fire(&mut self) -> bool {
        if self.describe_fired {
            false
        } else {
            self.describe_fired = true;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_result() -> QueryResult {
        QueryResult::new(Arc::new(AtomicBool::new(false)))
    }

    #[test]
    fn row_completes_on_last_column() {
        let mut result = new_result();
        result.begin_column();
        result.set_last_column_name("a".into());
        result.begin_column();
        result.set_last_column_name("b".into());

        result.begin_row();
        assert!(!result.write_cell("x".into(), false));
        assert!(result.write_cell("1".into(), false));
        result.end_row();

        assert_eq!(result.cell_text(0), "x");
        assert_eq!(result.cell_text(1), "1");
    }

    #[test]
    fn out_of_range_accessors_read_empty_not_error() {
        let result = new_result();
        assert_eq!(result.column_name(9), "");
        assert_eq!(result.cell_text(9), "");
        assert!(result.cell_is_null(9));
        assert_eq!(result.column_type(9), FieldType::Undefined);
    }

    #[test]
    fn describe_fires_exactly_once() {
        let mut result = new_result();
        assert!(result.describe_should_fire());
        assert!(!result.describe_should_fire());
        assert!(!result.describe_should_fire());
    }

    #[test]
    fn cancel_flag_is_sticky_and_shared() {
        let result = new_result();
        let handle = result.cancel_flag();
        assert!(!result.is_cancel_requested());
        handle.store(true, Ordering::SeqCst);
        assert!(result.is_cancel_requested());
    }

    #[test]
    fn error_lines_append_with_newline_join() {
        let mut result = new_result();
        result.append_error_line("SYNTAX_ERROR");
        result.append_error_line("line 1:8: mismatched input");
        assert_eq!(result.server_error_message(), "SYNTAX_ERROR\nline 1:8: mismatched input");
    }
}
