mod having;
mod join_clause;
mod where_clause;

pub use having::{CompareOp, HavingClause};
pub use join_clause::{JoinClause, JoinKind};
pub use where_clause::{WhereClause, WhereOp};
