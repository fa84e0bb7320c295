use crate::builders::render::{build_statement, Statement, StatementKind};
use crate::clauses::{CompareOp, HavingClause, JoinClause, WhereClause, WhereOp};
use crate::client::MyRsClient;
use crate::error::Result;
use crate::expr::{ColumnExpr, IntoColumnList};
use crate::traits::CursorShape;
use crate::types::{Record, ResultSet, Value};

/// One logical record for INSERT (or the single record for UPDATE): an
/// insertion-ordered column/value mapping. Re-assigning a column updates
/// the value in place without changing the column's position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowPayload {
    fields: Vec<(String, Value)>,
}

impl RowPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column, chainable.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn insert(&mut self, column: String, value: Value) {
        if let Some(slot) = self.fields.iter_mut().find(|(c, _)| *c == column) {
            slot.1 = value;
        } else {
            self.fields.push((column, value));
        }
    }

    pub(crate) fn columns(&self) -> Vec<&str> {
        self.fields.iter().map(|(c, _)| c.as_str()).collect()
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, v)| v)
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(c, v)| (c.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RowPayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RowPayload::default();
        for (column, value) in iter {
            row.insert(column.into(), value.into());
        }
        row
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for RowPayload {
    fn from(fields: Vec<(K, V)>) -> Self {
        fields.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for RowPayload {
    fn from(fields: [(K, V); N]) -> Self {
        fields.into_iter().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub(crate) fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SelectTerm {
    pub(crate) expr: ColumnExpr,
    pub(crate) alias: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct OrderTerm {
    pub(crate) expr: ColumnExpr,
    pub(crate) direction: SortDirection,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct LimitClause {
    pub(crate) count: i64,
    pub(crate) offset: Option<i64>,
}

/// Everything a statement accumulates before rendering.
#[derive(Debug, Clone, Default)]
pub(crate) struct QueryState {
    pub(crate) table: Option<String>,
    pub(crate) selects: Vec<SelectTerm>,
    pub(crate) wheres: Vec<WhereClause>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) group_by: Vec<ColumnExpr>,
    pub(crate) havings: Vec<HavingClause>,
    pub(crate) order_by: Vec<OrderTerm>,
    pub(crate) limit: Option<LimitClause>,
    pub(crate) rows: Vec<RowPayload>,
    pub(crate) empty_batch: bool,
}

/// A single statement under construction.
///
/// Obtained from [`MyRsClient::from_table`]; accumulates clauses through
/// the chainable methods and is consumed by one of the terminal methods
/// ([`create`](Query::create), [`update`](Query::update),
/// [`delete`](Query::delete), [`count`](Query::count),
/// [`find_records`](Query::find_records)). Consuming the builder is what
/// guarantees no clause leaks into the next statement: the next one starts
/// from a fresh `from_table` call.
pub struct Query<'a> {
    client: &'a mut MyRsClient,
    state: QueryState,
}

impl<'a> Query<'a> {
    pub(crate) fn new(client: &'a mut MyRsClient, table: String) -> Self {
        let state = QueryState {
            table: Some(table),
            ..QueryState::default()
        };
        Self { client, state }
    }

    /// Adds a projection term: a column name (quoted) or a raw
    /// [`SqlExpr`](crate::SqlExpr) passed through verbatim.
    pub fn select(mut self, column: impl Into<ColumnExpr>) -> Self {
        self.state.selects.push(SelectTerm {
            expr: column.into(),
            alias: None,
        });
        self
    }

    /// Adds a projection term with an `AS` alias. The alias is validated
    /// and quoted like any other identifier.
    pub fn select_as(mut self, column: impl Into<ColumnExpr>, alias: impl Into<String>) -> Self {
        self.state.selects.push(SelectTerm {
            expr: column.into(),
            alias: Some(alias.into()),
        });
        self
    }

    pub fn where_eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.compare(column, WhereOp::Eq, value)
    }

    pub fn where_gt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.compare(column, WhereOp::Gt, value)
    }

    pub fn where_gte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.compare(column, WhereOp::Gte, value)
    }

    pub fn where_lt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.compare(column, WhereOp::Lt, value)
    }

    pub fn where_lte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.compare(column, WhereOp::Lte, value)
    }

    pub fn where_like(self, column: impl Into<String>, pattern: impl Into<Value>) -> Self {
        self.compare(column, WhereOp::Like, pattern)
    }

    /// Membership test. An empty list renders the contradiction `1=0`, so
    /// the statement matches nothing instead of failing.
    pub fn where_in<V: Into<Value>>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.state
            .wheres
            .push(WhereClause::list(column, WhereOp::In, values));
        self
    }

    /// Negated membership test. An empty list renders the tautology `1=1`,
    /// matching everything.
    pub fn where_not_in<V: Into<Value>>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.state
            .wheres
            .push(WhereClause::list(column, WhereOp::NotIn, values));
        self
    }

    pub fn where_is_null(mut self, column: impl Into<String>) -> Self {
        self.state
            .wheres
            .push(WhereClause::null_check(column, WhereOp::IsNull));
        self
    }

    pub fn where_is_not_null(mut self, column: impl Into<String>) -> Self {
        self.state
            .wheres
            .push(WhereClause::null_check(column, WhereOp::IsNotNull));
        self
    }

    fn compare(mut self, column: impl Into<String>, op: WhereOp, value: impl Into<Value>) -> Self {
        self.state
            .wheres
            .push(WhereClause::compare(column, op, value.into()));
        self
    }

    /// Sets one column of the statement's first payload row, creating the
    /// row when this is the first field. Setting the same column again
    /// overwrites the value in place.
    pub fn set_field(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.first_row_mut().insert(column.into(), value.into());
        self
    }

    /// Merges several columns into the first payload row, in iteration
    /// order.
    pub fn set_fields<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let row = self.first_row_mut();
        for (column, value) in fields {
            row.insert(column.into(), value.into());
        }
        self
    }

    /// Appends a complete payload row for a multi-row INSERT. Every
    /// appended row must carry the first row's columns in the same order,
    /// checked when the statement renders.
    pub fn add_row(mut self, row: impl Into<RowPayload>) -> Self {
        self.state.rows.push(row.into());
        self
    }

    /// Appends several payload rows. An empty batch is an error, reported
    /// with `Validation` when the INSERT renders.
    pub fn add_rows<R: Into<RowPayload>>(mut self, rows: impl IntoIterator<Item = R>) -> Self {
        let mut appended = false;
        for row in rows {
            self.state.rows.push(row.into());
            appended = true;
        }
        if !appended {
            self.state.empty_batch = true;
        }
        self
    }

    /// Replaces the grouping terms. Accepts a single column, a
    /// comma-separated list in one `&str`, or a slice of columns.
    pub fn group_by(mut self, columns: impl IntoColumnList) -> Self {
        self.state.group_by = columns.into_column_list();
        self
    }

    pub fn having_eq(self, term: impl Into<ColumnExpr>, value: impl Into<Value>) -> Self {
        self.having(term, CompareOp::Eq, value)
    }

    pub fn having_gt(self, term: impl Into<ColumnExpr>, value: impl Into<Value>) -> Self {
        self.having(term, CompareOp::Gt, value)
    }

    pub fn having_gte(self, term: impl Into<ColumnExpr>, value: impl Into<Value>) -> Self {
        self.having(term, CompareOp::Gte, value)
    }

    pub fn having_lt(self, term: impl Into<ColumnExpr>, value: impl Into<Value>) -> Self {
        self.having(term, CompareOp::Lt, value)
    }

    pub fn having_lte(self, term: impl Into<ColumnExpr>, value: impl Into<Value>) -> Self {
        self.having(term, CompareOp::Lte, value)
    }

    fn having(mut self, term: impl Into<ColumnExpr>, op: CompareOp, value: impl Into<Value>) -> Self {
        self.state
            .havings
            .push(HavingClause::new(term.into(), op, value.into()));
        self
    }

    /// Appends ascending sort terms.
    pub fn order_by_asc(self, columns: impl IntoColumnList) -> Self {
        self.order_by(columns, SortDirection::Asc)
    }

    /// Appends descending sort terms.
    pub fn order_by_desc(self, columns: impl IntoColumnList) -> Self {
        self.order_by(columns, SortDirection::Desc)
    }

    fn order_by(mut self, columns: impl IntoColumnList, direction: SortDirection) -> Self {
        for expr in columns.into_column_list() {
            self.state.order_by.push(OrderTerm { expr, direction });
        }
        self
    }

    /// Caps the number of rows returned. The count renders as a validated
    /// integer literal, not a parameter.
    pub fn limit(mut self, count: i64) -> Self {
        self.state.limit = Some(LimitClause {
            count,
            offset: None,
        });
        self
    }

    /// Caps the number of rows returned, skipping `offset` rows first.
    pub fn limit_offset(mut self, count: i64, offset: i64) -> Self {
        self.state.limit = Some(LimitClause {
            count,
            offset: Some(offset),
        });
        self
    }

    pub fn inner_join(mut self, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.state.joins.push(JoinClause::inner(table, on));
        self
    }

    pub fn left_join(mut self, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.state.joins.push(JoinClause::left(table, on));
        self
    }

    pub fn cross_join(mut self, table: impl Into<String>) -> Self {
        self.state.joins.push(JoinClause::cross(table));
        self
    }

    fn first_row_mut(&mut self) -> &mut RowPayload {
        if self.state.rows.is_empty() {
            self.state.rows.push(RowPayload::default());
        }
        &mut self.state.rows[0]
    }

    pub(crate) fn build(&self, kind: StatementKind) -> Result<Statement> {
        build_statement(&self.state, kind)
    }

    /// Renders and executes an INSERT from the accumulated payload rows.
    pub async fn create(self) -> Result<()> {
        let statement = self.build(StatementKind::Insert)?;
        self.client.execute_statement(statement).await
    }

    /// Renders and executes an UPDATE. Fails before touching the driver
    /// when no WHERE clause was added.
    pub async fn update(self) -> Result<()> {
        let statement = self.build(StatementKind::Update)?;
        self.client.execute_statement(statement).await
    }

    /// Renders and executes a DELETE. Fails before touching the driver
    /// when no WHERE clause was added.
    pub async fn delete(self) -> Result<()> {
        let statement = self.build(StatementKind::Delete)?;
        self.client.execute_statement(statement).await
    }

    /// Renders a `SELECT COUNT(*)` honoring the accumulated clauses and
    /// returns the scalar.
    pub async fn count(self) -> Result<i64> {
        let statement = self.build(StatementKind::Count)?;
        self.client.fetch_count(statement).await
    }

    /// Renders and executes the SELECT, fetching all rows positionally.
    pub async fn find_records(self) -> Result<ResultSet> {
        let statement = self.build(StatementKind::Select)?;
        self.client
            .fetch_rows(statement, CursorShape::Positional)
            .await
    }

    /// Renders and executes the SELECT through a mapped cursor, returning
    /// one column-keyed [`Record`] per row.
    pub async fn find_records_mapped(self) -> Result<Vec<Record>> {
        let statement = self.build(StatementKind::Select)?;
        let result = self.client.fetch_rows(statement, CursorShape::Mapped).await?;
        Ok(result.into_records())
    }
}
