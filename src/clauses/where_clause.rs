use crate::error::Result;
use crate::ident::quote_identifier;
use crate::types::Value;

/// Operator of a single WHERE predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhereOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl WhereOp {
    fn as_sql(&self) -> &'static str {
        match self {
            WhereOp::Eq => "=",
            WhereOp::Gt => ">",
            WhereOp::Gte => ">=",
            WhereOp::Lt => "<",
            WhereOp::Lte => "<=",
            WhereOp::Like => "LIKE",
            WhereOp::In => "IN",
            WhereOp::NotIn => "NOT IN",
            WhereOp::IsNull => "IS NULL",
            WhereOp::IsNotNull => "IS NOT NULL",
        }
    }
}

/// The bound side of a predicate: one scalar, a list for IN/NOT IN, or
/// nothing for null checks.
#[derive(Debug, Clone, PartialEq)]
enum WhereValue {
    Scalar(Value),
    List(Vec<Value>),
    Absent,
}

/// Represents a single WHERE predicate.
/// Predicates are joined with AND in declaration order at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    column: String,
    op: WhereOp,
    value: WhereValue,
}

impl WhereClause {
    /// Creates a comparison predicate: column <op> value
    pub(crate) fn compare(column: impl Into<String>, op: WhereOp, value: Value) -> Self {
        WhereClause {
            column: column.into(),
            op,
            value: WhereValue::Scalar(value),
        }
    }

    /// Creates an IN / NOT IN predicate over a list of values.
    pub(crate) fn list(column: impl Into<String>, op: WhereOp, values: Vec<Value>) -> Self {
        WhereClause {
            column: column.into(),
            op,
            value: WhereValue::List(values),
        }
    }

    /// Creates an IS NULL / IS NOT NULL predicate.
    pub(crate) fn null_check(column: impl Into<String>, op: WhereOp) -> Self {
        WhereClause {
            column: column.into(),
            op,
            value: WhereValue::Absent,
        }
    }

    /// Builds the SQL fragment for this predicate, pushing bound values
    /// onto `params` in placeholder order.
    ///
    /// An empty IN list is not valid SQL, so it renders as the constant
    /// predicate `1=0` (nothing matches) and an empty NOT IN list as `1=1`
    /// (everything matches), neither contributing parameters.
    pub(crate) fn build_sql(&self, params: &mut Vec<Value>) -> Result<String> {
        let column = quote_identifier(&self.column)?;
        match &self.value {
            WhereValue::Absent => Ok(format!("{} {}", column, self.op.as_sql())),
            WhereValue::List(values) if values.is_empty() => {
                if self.op == WhereOp::NotIn {
                    Ok("1=1".to_string())
                } else {
                    Ok("1=0".to_string())
                }
            }
            WhereValue::List(values) => {
                params.extend(values.iter().cloned());
                let placeholders = vec!["%s"; values.len()].join(", ");
                Ok(format!("{} {} ({})", column, self.op.as_sql(), placeholders))
            }
            WhereValue::Scalar(value) => {
                params.push(value.clone());
                Ok(format!("{} {} %s", column, self.op.as_sql()))
            }
        }
    }
}
