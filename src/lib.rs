//! myrs - A fluent, driver-agnostic MySQL statement builder and executor
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use myrs::{ConnectSettings, DriverRegistry, MyRsClient};
//!
//! // Register the drivers this host ships, then build a client.
//! let mut registry = DriverRegistry::new();
//! registry.register(Arc::new(MyMysqlDriver::new()));
//! let settings = ConnectSettings::new("app", "secret", "127.0.0.1", "appdb");
//! let mut client = MyRsClient::new(settings, &registry)?;
//!
//! // Execute an INSERT
//! client
//!     .from_table("users")
//!     .set_field("name", "Alice")
//!     .set_field("age", 30)
//!     .create()
//!     .await?;
//!
//! // Execute a SELECT
//! let adults = client
//!     .from_table("users")
//!     .where_gte("age", 18)
//!     .order_by_desc(["age"])
//!     .find_records()
//!     .await?;
//!
//! for record in adults.into_records() {
//!     let name = record.get("name")?;
//! }
//! ```

pub mod builders;
pub mod clauses;
pub mod drivers;
pub mod error;
pub mod expr;
pub mod ident;
pub mod settings;
pub mod traits;
pub mod types;

mod client;
mod transaction;

// Re-export main types for convenient access
pub use builders::{Query, RowPayload};
pub use client::MyRsClient;
pub use drivers::DriverRegistry;
pub use error::{MyRsError, Result};
pub use expr::{raw, ColumnExpr, IntoColumnList, SqlExpr};
pub use settings::{ConnectOptions, ConnectSettings};
pub use traits::{Connection, Cursor, CursorShape, DatabaseDriver};
pub use types::{Record, ResultSet, Value};
