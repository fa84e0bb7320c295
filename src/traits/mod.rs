mod driver;

pub use driver::{Connection, Cursor, CursorShape, DatabaseDriver};
