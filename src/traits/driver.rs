use async_trait::async_trait;

use crate::error::Result;
use crate::settings::ConnectOptions;
use crate::types::{ResultSet, Value};

/// Row shape requested when opening a cursor: positional rows, or rows
/// keyed by column name for [`Record`](crate::Record) access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    Positional,
    Mapped,
}

/// Trait for database driver implementations.
///
/// Drivers are responsible for:
/// - Dialing connections from [`ConnectOptions`]
/// - Binding [`Value`] parameters to the native client types
/// - Executing statements and shaping fetches into a [`ResultSet`]
///
/// Statements arrive with MySQL client-style `%s` placeholders, one per
/// parameter, in parameter order.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Name this driver registers under.
    fn name(&self) -> &str;

    /// Opens a new connection.
    async fn connect(&self, options: &ConnectOptions) -> Result<Box<dyn Connection>>;
}

/// One live connection.
///
/// The engine owns every connection it opens and closes it on all exit
/// paths; transaction connections are closed by `end_transaction`.
#[async_trait]
pub trait Connection: Send {
    /// Opens a cursor. The cursor borrows the connection exclusively, so
    /// it is dropped before commit, rollback, or close can run.
    async fn cursor<'a>(&'a mut self, shape: CursorShape) -> Result<Box<dyn Cursor + 'a>>;

    /// Toggles autocommit on the live connection.
    async fn set_autocommit(&mut self, autocommit: bool) -> Result<()>;

    async fn commit(&mut self) -> Result<()>;

    async fn rollback(&mut self) -> Result<()>;

    async fn close(&mut self) -> Result<()>;
}

/// A cursor over one statement execution.
#[async_trait]
pub trait Cursor: Send {
    /// Executes a statement. `params` is `None` when the statement bound
    /// no values.
    async fn execute(&mut self, sql: &str, params: Option<&[Value]>) -> Result<()>;

    /// Fetches every row produced by the last `execute`.
    async fn fetch_all(&mut self) -> Result<ResultSet>;
}
