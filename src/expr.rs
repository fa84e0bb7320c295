use crate::error::Result;
use crate::ident::quote_identifier;

/// A caller-trusted SQL fragment that bypasses identifier quoting.
///
/// Use it wherever a bare column name is not enough: aggregates, computed
/// expressions, function calls. The content is rendered verbatim, so it
/// must never contain untrusted input.
///
/// # Example
/// ```
/// use myrs::SqlExpr;
///
/// let count = SqlExpr::new("COUNT(*)");
/// assert_eq!(count.as_str(), "COUNT(*)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SqlExpr(String);

impl SqlExpr {
    pub fn new(sql: impl Into<String>) -> Self {
        SqlExpr(sql.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Shorthand for [`SqlExpr::new`].
pub fn raw(sql: impl Into<String>) -> SqlExpr {
    SqlExpr::new(sql)
}

/// A projection/grouping/ordering term: either a plain identifier that is
/// validated and backtick-quoted at render time, or a raw expression used
/// verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnExpr {
    Ident(String),
    Raw(SqlExpr),
}

impl ColumnExpr {
    pub(crate) fn render(&self) -> Result<String> {
        match self {
            ColumnExpr::Ident(name) => quote_identifier(name),
            ColumnExpr::Raw(expr) => Ok(expr.as_str().to_string()),
        }
    }
}

impl From<&str> for ColumnExpr {
    fn from(value: &str) -> Self {
        ColumnExpr::Ident(value.to_string())
    }
}

impl From<String> for ColumnExpr {
    fn from(value: String) -> Self {
        ColumnExpr::Ident(value)
    }
}

impl From<SqlExpr> for ColumnExpr {
    fn from(value: SqlExpr) -> Self {
        ColumnExpr::Raw(value)
    }
}

/// Conversion into an ordered list of column terms, accepted by `group_by`
/// and `order_by_asc`/`order_by_desc`.
///
/// A single `&str` may name several comma-separated columns, with empty
/// segments dropped; slice, array, and `Vec` inputs contribute one term
/// per element (no splitting); a [`SqlExpr`] is a single raw term.
pub trait IntoColumnList {
    fn into_column_list(self) -> Vec<ColumnExpr>;
}

impl IntoColumnList for &str {
    fn into_column_list(self) -> Vec<ColumnExpr> {
        self.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| ColumnExpr::Ident(part.to_string()))
            .collect()
    }
}

impl IntoColumnList for String {
    fn into_column_list(self) -> Vec<ColumnExpr> {
        self.as_str().into_column_list()
    }
}

impl IntoColumnList for SqlExpr {
    fn into_column_list(self) -> Vec<ColumnExpr> {
        vec![ColumnExpr::Raw(self)]
    }
}

impl IntoColumnList for ColumnExpr {
    fn into_column_list(self) -> Vec<ColumnExpr> {
        vec![self]
    }
}

impl IntoColumnList for Vec<&str> {
    fn into_column_list(self) -> Vec<ColumnExpr> {
        self.into_iter()
            .map(|name| ColumnExpr::Ident(name.to_string()))
            .collect()
    }
}

impl IntoColumnList for Vec<String> {
    fn into_column_list(self) -> Vec<ColumnExpr> {
        self.into_iter().map(ColumnExpr::Ident).collect()
    }
}

impl IntoColumnList for Vec<ColumnExpr> {
    fn into_column_list(self) -> Vec<ColumnExpr> {
        self
    }
}

impl IntoColumnList for &[&str] {
    fn into_column_list(self) -> Vec<ColumnExpr> {
        self.iter()
            .map(|name| ColumnExpr::Ident(name.to_string()))
            .collect()
    }
}

impl<const N: usize> IntoColumnList for [&str; N] {
    fn into_column_list(self) -> Vec<ColumnExpr> {
        self.as_slice().into_column_list()
    }
}
