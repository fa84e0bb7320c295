mod query;
mod render;

pub use self::query::{Query, RowPayload};

pub(crate) use self::render::Statement;
