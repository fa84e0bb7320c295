mod row;
mod value;

pub use row::{Record, ResultSet};
pub use value::Value;
