use std::fmt;
use std::sync::Arc;

use crate::builders::{Query, Statement};
use crate::drivers::DriverRegistry;
use crate::error::{MyRsError, Result};
use crate::settings::ConnectSettings;
use crate::traits::{Connection, CursorShape, DatabaseDriver};
use crate::transaction::TransactionState;
use crate::types::{Record, ResultSet, Value};

/// Main entry point for myrs.
///
/// Owns the resolved driver, the transaction bookkeeping, and the record
/// of the last statement handed to a driver. Statements are built through
/// [`from_table`](MyRsClient::from_table) and executed by the builder's
/// terminal methods.
pub struct MyRsClient {
    driver: Arc<dyn DatabaseDriver>,
    settings: ConnectSettings,
    tx: TransactionState,
    last_query: String,
    last_params: Option<Vec<Value>>,
}

impl fmt::Debug for MyRsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MyRsClient")
            .field("driver", &self.driver.name())
            .field("in_transaction", &self.tx.is_open())
            .field("last_query", &self.last_query)
            .finish_non_exhaustive()
    }
}

impl MyRsClient {
    /// Creates a client, resolving the driver from the registry: the
    /// settings' pinned driver name when present, otherwise the first
    /// registered driver.
    pub fn new(settings: ConnectSettings, registry: &DriverRegistry) -> Result<Self> {
        let driver = registry.resolve(settings.driver.as_deref())?;
        Ok(Self::with_driver(settings, driver))
    }

    /// Creates a client with a caller-supplied driver, bypassing the
    /// registry. Useful for tests and custom drivers.
    pub fn with_driver(settings: ConnectSettings, driver: Arc<dyn DatabaseDriver>) -> Self {
        Self {
            driver,
            settings,
            tx: TransactionState::default(),
            last_query: String::new(),
            last_params: None,
        }
    }

    /// Starts building a statement against `table`. The returned builder
    /// borrows this client and is consumed by its terminal method, so no
    /// clause can leak into the next statement.
    pub fn from_table(&mut self, table: impl Into<String>) -> Query<'_> {
        Query::new(self, table.into())
    }

    /// Opens a transaction. No connection is dialed yet: the first
    /// statement executed while the transaction is open dials one with
    /// autocommit disabled, and every later statement reuses it. A no-op
    /// while a transaction is already open.
    pub fn begin_transaction(&mut self) {
        if !self.tx.is_open() {
            tracing::debug!("transaction opened");
        }
        self.tx.begin();
    }

    /// Ends the open transaction: commits when `success` is true, rolls
    /// back otherwise, then closes the cached connection. A transaction
    /// that never executed a statement ends without touching the driver,
    /// and ending when no transaction is open is a no-op.
    pub async fn end_transaction(&mut self, success: bool) -> Result<()> {
        let mut conn = match self.tx.finish() {
            Some(conn) => conn,
            None => return Ok(()),
        };
        tracing::debug!(committed = success, "transaction closed");
        let outcome = if success {
            conn.commit().await
        } else {
            conn.rollback().await
        };
        let closed = conn.close().await;
        outcome.and(closed)
    }

    /// Executes a raw SQL string, bypassing the builder but not the
    /// engine: the statement joins the open transaction (if any) and is
    /// recorded for introspection. Statements starting with `SELECT`
    /// (case-insensitive) are fetched; everything else returns `None`.
    pub async fn raw_execute(
        &mut self,
        sql: &str,
        params: Option<&[Value]>,
    ) -> Result<Option<ResultSet>> {
        let statement = Statement {
            sql: sql.to_string(),
            params: params.map(|p| p.to_vec()).unwrap_or_default(),
        };
        let fetch = is_select_statement(sql);
        self.run(statement, CursorShape::Positional, fetch).await
    }

    /// Like [`raw_execute`](MyRsClient::raw_execute), but fetches SELECT
    /// rows through a mapped cursor, returning column-keyed records.
    pub async fn raw_execute_mapped(
        &mut self,
        sql: &str,
        params: Option<&[Value]>,
    ) -> Result<Option<Vec<Record>>> {
        let statement = Statement {
            sql: sql.to_string(),
            params: params.map(|p| p.to_vec()).unwrap_or_default(),
        };
        let fetch = is_select_statement(sql);
        let rows = self.run(statement, CursorShape::Mapped, fetch).await?;
        Ok(rows.map(ResultSet::into_records))
    }

    /// SQL text of the last statement handed to the engine, or an empty
    /// string when none ran yet.
    pub fn get_last_query(&self) -> &str {
        &self.last_query
    }

    /// Parameters of the last statement, `None` when it bound no values.
    pub fn get_last_parameters(&self) -> Option<&[Value]> {
        self.last_params.as_deref()
    }

    /// Last statement and parameters together.
    pub fn get_last_query_info(&self) -> (&str, Option<&[Value]>) {
        (self.get_last_query(), self.get_last_parameters())
    }

    pub(crate) async fn execute_statement(&mut self, statement: Statement) -> Result<()> {
        self.run(statement, CursorShape::Positional, false)
            .await
            .map(|_| ())
    }

    pub(crate) async fn fetch_rows(
        &mut self,
        statement: Statement,
        shape: CursorShape,
    ) -> Result<ResultSet> {
        let rows = self.run(statement, shape, true).await?;
        Ok(rows.unwrap_or_else(ResultSet::empty))
    }

    pub(crate) async fn fetch_count(&mut self, statement: Statement) -> Result<i64> {
        let result = self.fetch_rows(statement, CursorShape::Positional).await?;
        match result.rows.first().and_then(|row| row.first()) {
            Some(Value::Int(n)) => Ok(*n),
            Some(Value::Text(s)) => s.parse().map_err(|_| MyRsError::Decode {
                column: "COUNT(*)".to_string(),
                message: format!("expected an integer, got '{s}'"),
            }),
            Some(other) => Err(MyRsError::Decode {
                column: "COUNT(*)".to_string(),
                message: format!("expected an integer, got {other:?}"),
            }),
            None => Err(MyRsError::Decode {
                column: "COUNT(*)".to_string(),
                message: "empty result".to_string(),
            }),
        }
    }

    /// Core execution path. Records the statement, acquires a connection
    /// per the transaction policy, executes through a cursor of the
    /// requested shape, and fetches when asked to.
    async fn run(
        &mut self,
        statement: Statement,
        shape: CursorShape,
        fetch: bool,
    ) -> Result<Option<ResultSet>> {
        self.last_query = statement.sql.clone();
        self.last_params = if statement.params.is_empty() {
            None
        } else {
            Some(statement.params.clone())
        };

        tracing::debug!(
            sql = %statement.sql,
            params = statement.params.len(),
            in_transaction = self.tx.is_open(),
            "executing statement"
        );

        if self.tx.is_open() {
            // Transaction statements share one cached connection with
            // autocommit off; end_transaction settles and closes it.
            let options = self.settings.connect_options(false);
            let conn = self
                .tx
                .connection_or_connect(self.driver.as_ref(), &options)
                .await?;
            run_on_connection(conn.as_mut(), &statement, shape, fetch).await
        } else {
            // Ephemeral connection per statement, closed on every path.
            let options = self.settings.connect_options(self.settings.autocommit);
            let mut conn = self.driver.connect(&options).await?;
            let result = run_on_connection(conn.as_mut(), &statement, shape, fetch).await;
            let closed = conn.close().await;
            match result {
                Ok(rows) => closed.map(|_| rows),
                Err(err) => Err(err),
            }
        }
    }
}

async fn run_on_connection(
    conn: &mut dyn Connection,
    statement: &Statement,
    shape: CursorShape,
    fetch: bool,
) -> Result<Option<ResultSet>> {
    let mut cursor = conn.cursor(shape).await?;
    let params = if statement.params.is_empty() {
        None
    } else {
        Some(statement.params.as_slice())
    };
    cursor.execute(&statement.sql, params).await?;
    if fetch {
        Ok(Some(cursor.fetch_all().await?))
    } else {
        Ok(None)
    }
}

fn is_select_statement(sql: &str) -> bool {
    let head = sql.trim_start();
    head.get(..6)
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case("select"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::MemoryDriver;

    #[test]
    fn test_select_detection() {
        assert!(is_select_statement("SELECT 1"));
        assert!(is_select_statement("  select * from t"));
        assert!(is_select_statement("SeLeCt now()"));
        assert!(!is_select_statement("UPDATE t SET a = 1"));
        assert!(!is_select_statement("sel"));
        assert!(!is_select_statement(""));
    }

    #[test]
    fn test_debug_names_driver_without_credentials() {
        let settings = ConnectSettings::new("app", "secret", "localhost", "appdb");
        let client = MyRsClient::with_driver(settings, Arc::new(MemoryDriver::new()));

        let rendered = format!("{client:?}");
        assert!(rendered.contains("MyRsClient"));
        assert!(rendered.contains("memory"));
        assert!(!rendered.contains("secret"));
    }
}
