use crate::error::Result;
use crate::expr::ColumnExpr;
use crate::types::Value;

/// Comparison operator usable in a HAVING predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

/// Represents a single HAVING predicate over a grouped result. The target
/// is usually an aggregate expression; predicates join with AND in
/// declaration order. Only legal once at least one GROUP BY term is set.
#[derive(Debug, Clone, PartialEq)]
pub struct HavingClause {
    term: ColumnExpr,
    op: CompareOp,
    value: Value,
}

impl HavingClause {
    pub(crate) fn new(term: ColumnExpr, op: CompareOp, value: Value) -> Self {
        HavingClause { term, op, value }
    }

    /// Builds the SQL fragment for this predicate, pushing its bound value
    /// onto `params`.
    pub(crate) fn build_sql(&self, params: &mut Vec<Value>) -> Result<String> {
        let term = self.term.render()?;
        params.push(self.value.clone());
        Ok(format!("{} {} %s", term, self.op.as_sql()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::SqlExpr;

    #[test]
    fn test_aggregate_fragment() {
        let clause = HavingClause::new(
            ColumnExpr::from(SqlExpr::new("COUNT(*)")),
            CompareOp::Gt,
            Value::Int(1),
        );
        let mut params = Vec::new();
        let sql = clause.build_sql(&mut params).unwrap();

        assert_eq!(sql, "COUNT(*) > %s");
        assert_eq!(params, vec![Value::Int(1)]);
    }

    #[test]
    fn test_plain_column_is_quoted() {
        let clause = HavingClause::new(ColumnExpr::from("total"), CompareOp::Lte, Value::Int(10));
        let mut params = Vec::new();
        let sql = clause.build_sql(&mut params).unwrap();

        assert_eq!(sql, "`total` <= %s");
    }
}
