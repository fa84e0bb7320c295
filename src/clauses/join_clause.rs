use crate::error::Result;
use crate::ident::quote_identifier;

/// Join flavor. CROSS joins carry no ON condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Cross,
}

impl JoinKind {
    fn keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// Represents one join, rendered directly after FROM (or the previous
/// join) in declaration order. The ON condition is trusted SQL text; the
/// joined table name goes through identifier quoting.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    kind: JoinKind,
    table: String,
    on: Option<String>,
}

impl JoinClause {
    pub(crate) fn inner(table: impl Into<String>, on: impl Into<String>) -> Self {
        JoinClause {
            kind: JoinKind::Inner,
            table: table.into(),
            on: Some(on.into()),
        }
    }

    pub(crate) fn left(table: impl Into<String>, on: impl Into<String>) -> Self {
        JoinClause {
            kind: JoinKind::Left,
            table: table.into(),
            on: Some(on.into()),
        }
    }

    pub(crate) fn cross(table: impl Into<String>) -> Self {
        JoinClause {
            kind: JoinKind::Cross,
            table: table.into(),
            on: None,
        }
    }

    /// Builds the SQL fragment for this join.
    pub(crate) fn build_sql(&self) -> Result<String> {
        let table = quote_identifier(&self.table)?;
        match &self.on {
            Some(condition) => Ok(format!("{} {} ON {}", self.kind.keyword(), table, condition)),
            None => Ok(format!("{} {}", self.kind.keyword(), table)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_join_fragment() {
        let join = JoinClause::inner("orders", "users.id = orders.user_id");
        assert_eq!(
            join.build_sql().unwrap(),
            "INNER JOIN `orders` ON users.id = orders.user_id"
        );
    }

    #[test]
    fn test_left_join_fragment() {
        let join = JoinClause::left("profiles", "users.id = profiles.user_id");
        assert_eq!(
            join.build_sql().unwrap(),
            "LEFT JOIN `profiles` ON users.id = profiles.user_id"
        );
    }

    #[test]
    fn test_cross_join_has_no_on_clause() {
        let join = JoinClause::cross("colors");
        assert_eq!(join.build_sql().unwrap(), "CROSS JOIN `colors`");
    }

    #[test]
    fn test_join_table_is_validated() {
        let join = JoinClause::inner("orders; --", "1=1");
        assert!(join.build_sql().is_err());
    }
}
