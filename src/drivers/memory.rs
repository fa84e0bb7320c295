use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{MyRsError, Result};
use crate::settings::ConnectOptions;
use crate::traits::{Connection, Cursor, CursorShape, DatabaseDriver};
use crate::types::{ResultSet, Value};

/// A recorded statement execution for verification.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedStatement {
    /// Id of the connection the statement ran on. Ids start at 1 and grow
    /// with every connect, so two statements sharing an id shared a
    /// connection.
    pub conn: usize,
    pub sql: String,
    pub params: Option<Vec<Value>>,
    pub shape: CursorShape,
}

/// A connection lifecycle event observed by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnEvent {
    Connect { conn: usize, autocommit: bool },
    Autocommit { conn: usize, autocommit: bool },
    Commit { conn: usize },
    Rollback { conn: usize },
    Close { conn: usize },
}

struct MemoryInner {
    responses: Mutex<VecDeque<ResultSet>>,
    default_response: Mutex<ResultSet>,
    statements: Mutex<Vec<RecordedStatement>>,
    events: Mutex<Vec<ConnEvent>>,
    fail_next_connect: Mutex<Option<String>>,
    fail_next_execute: Mutex<Option<String>>,
    next_conn: AtomicUsize,
}

/// An in-memory database driver for testing.
///
/// Allows configuring canned responses, verifying executed statements, and
/// inspecting the connection lifecycle (connects, commits, rollbacks,
/// closes) that the engine produced.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use myrs::drivers::{MemoryDriver, MemoryResponse};
///
/// let driver = Arc::new(
///     MemoryDriver::new().with_response(
///         MemoryResponse::new()
///             .columns(&["id", "name"])
///             .row(vec![1.into(), "Alice".into()])
///             .build(),
///     ),
/// );
/// ```
pub struct MemoryDriver {
    inner: Arc<MemoryInner>,
}

impl MemoryDriver {
    /// Create a new in-memory driver with no canned responses.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                responses: Mutex::new(VecDeque::new()),
                default_response: Mutex::new(ResultSet::empty()),
                statements: Mutex::new(Vec::new()),
                events: Mutex::new(Vec::new()),
                fail_next_connect: Mutex::new(None),
                fail_next_execute: Mutex::new(None),
                next_conn: AtomicUsize::new(1),
            }),
        }
    }

    /// Add a canned response. Every statement execution consumes one
    /// response in FIFO order, whether or not it fetches.
    pub fn with_response(self, response: ResultSet) -> Self {
        self.inner.responses.lock().unwrap().push_back(response);
        self
    }

    /// Add multiple responses to be consumed by subsequent statements.
    pub fn with_responses(self, responses: impl IntoIterator<Item = ResultSet>) -> Self {
        let mut queue = self.inner.responses.lock().unwrap();
        for response in responses {
            queue.push_back(response);
        }
        drop(queue);
        self
    }

    /// Set the response used when no queued responses remain.
    pub fn with_default_response(self, response: ResultSet) -> Self {
        *self.inner.default_response.lock().unwrap() = response;
        self
    }

    /// Make the next connect attempt fail with
    /// [`MyRsError::ConnectionFailed`].
    pub fn fail_next_connect(&self, message: impl Into<String>) {
        *self.inner.fail_next_connect.lock().unwrap() = Some(message.into());
    }

    /// Make the next execute fail with [`MyRsError::QueryFailed`].
    pub fn fail_next_execute(&self, message: impl Into<String>) {
        *self.inner.fail_next_execute.lock().unwrap() = Some(message.into());
    }

    /// Get all recorded statement executions.
    pub fn statements(&self) -> Vec<RecordedStatement> {
        self.inner.statements.lock().unwrap().clone()
    }

    /// Get the last recorded statement, if any.
    pub fn last_statement(&self) -> Option<RecordedStatement> {
        self.inner.statements.lock().unwrap().last().cloned()
    }

    /// Get the connection lifecycle journal.
    pub fn events(&self) -> Vec<ConnEvent> {
        self.inner.events.lock().unwrap().clone()
    }

    /// Clear recorded statements and the lifecycle journal.
    pub fn clear_recorded(&self) {
        self.inner.statements.lock().unwrap().clear();
        self.inner.events.lock().unwrap().clear();
    }

    /// Assert that the last statement matches the expected SQL and
    /// parameters.
    pub fn assert_last_statement(&self, expected_sql: &str, expected_params: Option<&[Value]>) {
        let last = self.last_statement().expect("No statements were recorded");
        assert_eq!(
            last.sql, expected_sql,
            "SQL mismatch.\nExpected: {}\nActual: {}",
            expected_sql, last.sql
        );
        assert_eq!(
            last.params.as_deref(),
            expected_params,
            "Parameters mismatch.\nExpected: {:?}\nActual: {:?}",
            expected_params,
            last.params
        );
    }

    /// Assert that exactly n statements were executed.
    pub fn assert_statement_count(&self, expected: usize) {
        let actual = self.inner.statements.lock().unwrap().len();
        assert_eq!(
            actual, expected,
            "Statement count mismatch. Expected: {}, Actual: {}",
            expected, actual
        );
    }
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for MemoryDriver {
    fn name(&self) -> &str {
        "memory"
    }

    async fn connect(&self, options: &ConnectOptions) -> Result<Box<dyn Connection>> {
        if let Some(message) = self.inner.fail_next_connect.lock().unwrap().take() {
            return Err(MyRsError::ConnectionFailed(message));
        }
        let id = self.inner.next_conn.fetch_add(1, Ordering::SeqCst);
        self.inner.events.lock().unwrap().push(ConnEvent::Connect {
            conn: id,
            autocommit: options.autocommit,
        });
        Ok(Box::new(MemoryConnection {
            id,
            inner: Arc::clone(&self.inner),
        }))
    }
}

struct MemoryConnection {
    id: usize,
    inner: Arc<MemoryInner>,
}

impl MemoryConnection {
    fn record(&self, event: ConnEvent) {
        self.inner.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn cursor<'a>(&'a mut self, shape: CursorShape) -> Result<Box<dyn Cursor + 'a>> {
        Ok(Box::new(MemoryCursor {
            conn: self,
            shape,
            fetched: None,
        }))
    }

    async fn set_autocommit(&mut self, autocommit: bool) -> Result<()> {
        self.record(ConnEvent::Autocommit {
            conn: self.id,
            autocommit,
        });
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        self.record(ConnEvent::Commit { conn: self.id });
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.record(ConnEvent::Rollback { conn: self.id });
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.record(ConnEvent::Close { conn: self.id });
        Ok(())
    }
}

struct MemoryCursor<'a> {
    conn: &'a mut MemoryConnection,
    shape: CursorShape,
    fetched: Option<ResultSet>,
}

#[async_trait]
impl Cursor for MemoryCursor<'_> {
    async fn execute(&mut self, sql: &str, params: Option<&[Value]>) -> Result<()> {
        if let Some(message) = self.conn.inner.fail_next_execute.lock().unwrap().take() {
            return Err(MyRsError::QueryFailed(message));
        }

        self.conn
            .inner
            .statements
            .lock()
            .unwrap()
            .push(RecordedStatement {
                conn: self.conn.id,
                sql: sql.to_string(),
                params: params.map(|p| p.to_vec()),
                shape: self.shape,
            });

        // Next queued response, or the default when the queue is empty.
        let response = self
            .conn
            .inner
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.conn.inner.default_response.lock().unwrap().clone());
        self.fetched = Some(response);
        Ok(())
    }

    async fn fetch_all(&mut self) -> Result<ResultSet> {
        Ok(self.fetched.take().unwrap_or_else(ResultSet::empty))
    }
}

/// Builder for canned responses.
pub struct MemoryResponse {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl MemoryResponse {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Set the column names for the response.
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Add a row of values.
    pub fn row(mut self, values: Vec<Value>) -> Self {
        self.rows.push(values);
        self
    }

    /// Build the [`ResultSet`].
    pub fn build(self) -> ResultSet {
        ResultSet::new(self.columns, self.rows)
    }
}

impl Default for MemoryResponse {
    fn default() -> Self {
        Self::new()
    }
}
