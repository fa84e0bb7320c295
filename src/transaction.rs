use crate::error::Result;
use crate::settings::ConnectOptions;
use crate::traits::{Connection, DatabaseDriver};

/// Transaction bookkeeping: an open flag plus the connection cached by the
/// first statement executed inside the transaction.
///
/// The cached connection is owned exclusively here. The engine borrows it
/// per statement, and [`finish`](TransactionState::finish) hands it back
/// so the caller can commit or roll back and then close it.
#[derive(Default)]
pub(crate) struct TransactionState {
    open: bool,
    conn: Option<Box<dyn Connection>>,
}

impl TransactionState {
    pub(crate) fn is_open(&self) -> bool {
        self.open
    }

    /// Opens the transaction. Idempotent while one is already open.
    pub(crate) fn begin(&mut self) {
        self.open = true;
    }

    /// Closes the bookkeeping and hands back the cached connection, if any
    /// statement ever acquired one.
    pub(crate) fn finish(&mut self) -> Option<Box<dyn Connection>> {
        self.open = false;
        self.conn.take()
    }

    /// Returns the transaction's connection, dialing one on first use.
    pub(crate) async fn connection_or_connect(
        &mut self,
        driver: &dyn DatabaseDriver,
        options: &ConnectOptions,
    ) -> Result<&mut Box<dyn Connection>> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => driver.connect(options).await?,
        };
        Ok(self.conn.insert(conn))
    }
}

/// Runs a block of statements inside one transaction.
///
/// Begins a transaction on the client, evaluates the block, then ends the
/// transaction with the block's outcome: `Ok` commits, `Err` rolls back.
/// The block must evaluate to a [`Result`](crate::Result); an error from
/// ending the transaction supersedes the block's own outcome.
///
/// # Example
///
/// ```ignore
/// let outcome: myrs::Result<()> = myrs::transaction!(client, {
///     client
///         .from_table("orders")
///         .set_field("state", "paid")
///         .where_eq("id", 7)
///         .update()
///         .await?;
///     client
///         .from_table("events")
///         .set_field("kind", "payment")
///         .create()
///         .await?;
///     Ok(())
/// });
/// ```
#[macro_export]
macro_rules! transaction {
    ($client:expr, $body:block) => {{
        $client.begin_transaction();
        let __tx_result = async { $body }.await;
        match $client.end_transaction(__tx_result.is_ok()).await {
            Ok(()) => __tx_result,
            Err(__tx_end_err) => Err(__tx_end_err),
        }
    }};
}
