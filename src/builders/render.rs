use crate::builders::query::QueryState;
use crate::error::{MyRsError, Result};
use crate::ident::quote_identifier;
use crate::types::Value;

/// Terminal statement kind. Decides which accumulated clauses render and
/// which template is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Count,
}

/// A rendered statement: SQL text plus its ordered parameter list.
/// Placeholders are MySQL client-style (`%s`), one per parameter.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Statement {
    pub(crate) sql: String,
    pub(crate) params: Vec<Value>,
}

/// Renders the accumulated builder state into a parameterized statement.
///
/// Pure function over the state; every statement-level rule is enforced
/// here, strictly before anything reaches a driver.
pub(crate) fn build_statement(state: &QueryState, kind: StatementKind) -> Result<Statement> {
    let table = match &state.table {
        Some(table) => quote_identifier(table)?,
        None => {
            return Err(MyRsError::validation(
                "Table is not set. Call from_table() first.",
            ))
        }
    };

    if let Some(limit) = &state.limit {
        if limit.count < 0 {
            return Err(MyRsError::validation("LIMIT must not be negative."));
        }
        if matches!(limit.offset, Some(offset) if offset < 0) {
            return Err(MyRsError::validation("OFFSET must not be negative."));
        }
    }

    match kind {
        StatementKind::Select => render_select(state, &table, false),
        StatementKind::Count => render_select(state, &table, true),
        StatementKind::Insert => render_insert(state, &table),
        StatementKind::Update => render_update(state, &table),
        StatementKind::Delete => render_delete(state, &table),
    }
}

fn render_select(state: &QueryState, table: &str, count: bool) -> Result<Statement> {
    let mut sql = String::with_capacity(256);
    let mut params = Vec::new();

    // Projection
    sql.push_str("SELECT ");
    if count {
        // COUNT forces the projection, ignoring any user-set select list.
        sql.push_str("COUNT(*)");
    } else if state.selects.is_empty() {
        sql.push('*');
    } else {
        for (i, term) in state.selects.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&term.expr.render()?);
            if let Some(alias) = &term.alias {
                sql.push_str(" AS ");
                sql.push_str(&quote_identifier(alias)?);
            }
        }
    }

    sql.push_str(" FROM ");
    sql.push_str(table);

    for join in &state.joins {
        sql.push(' ');
        sql.push_str(&join.build_sql()?);
    }

    push_where(state, &mut sql, &mut params)?;

    if !state.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        for (i, term) in state.group_by.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&term.render()?);
        }
    }

    if !state.havings.is_empty() {
        if state.group_by.is_empty() {
            return Err(MyRsError::validation("HAVING without GROUP BY"));
        }
        sql.push_str(" HAVING ");
        for (i, clause) in state.havings.iter().enumerate() {
            if i > 0 {
                sql.push_str(" AND ");
            }
            sql.push_str(&clause.build_sql(&mut params)?);
        }
    }

    if !state.order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        for (i, term) in state.order_by.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&term.expr.render()?);
            sql.push(' ');
            sql.push_str(term.direction.keyword());
        }
    }

    // Validated non-negative above, so rendering literals is safe.
    if let Some(limit) = &state.limit {
        sql.push_str(" LIMIT ");
        sql.push_str(&limit.count.to_string());
        if let Some(offset) = limit.offset {
            sql.push_str(" OFFSET ");
            sql.push_str(&offset.to_string());
        }
    }

    Ok(Statement { sql, params })
}

fn render_insert(state: &QueryState, table: &str) -> Result<Statement> {
    if state.empty_batch {
        return Err(MyRsError::validation(
            "add_rows() was given an empty batch.",
        ));
    }
    if state.rows.is_empty() {
        return Err(MyRsError::validation(
            "No data to insert. Call set_field() or add_row() first.",
        ));
    }
    let columns = state.rows[0].columns();
    if columns.is_empty() {
        return Err(MyRsError::validation("Insert payload has no columns."));
    }
    for row in &state.rows[1..] {
        if row.columns() != columns {
            return Err(MyRsError::validation(
                "All insert rows must share the first row's columns, in the same order.",
            ));
        }
    }

    let mut sql = String::with_capacity(256);
    let mut params = Vec::new();

    sql.push_str("INSERT INTO ");
    sql.push_str(table);
    sql.push_str(" (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&quote_identifier(column)?);
    }
    sql.push_str(") VALUES ");

    let group = format!("({})", vec!["%s"; columns.len()].join(", "));
    for (i, row) in state.rows.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&group);
        params.extend(row.values().cloned());
    }

    Ok(Statement { sql, params })
}

fn render_update(state: &QueryState, table: &str) -> Result<Statement> {
    if state.wheres.is_empty() {
        return Err(MyRsError::validation(
            "UPDATE without WHERE is blocked for safety.",
        ));
    }
    let row = match state.rows.first() {
        Some(row) if !row.is_empty() => row,
        _ => {
            return Err(MyRsError::validation(
                "No fields to update. Call set_field() first.",
            ))
        }
    };

    let mut sql = String::with_capacity(256);
    let mut params = Vec::new();

    sql.push_str("UPDATE ");
    sql.push_str(table);
    sql.push_str(" SET ");
    for (i, (column, value)) in row.entries().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&quote_identifier(column)?);
        sql.push_str(" = %s");
        params.push(value.clone());
    }

    push_where(state, &mut sql, &mut params)?;

    Ok(Statement { sql, params })
}

fn render_delete(state: &QueryState, table: &str) -> Result<Statement> {
    if state.wheres.is_empty() {
        return Err(MyRsError::validation(
            "DELETE without WHERE is blocked for safety.",
        ));
    }

    let mut sql = String::with_capacity(128);
    let mut params = Vec::new();

    sql.push_str("DELETE FROM ");
    sql.push_str(table);

    push_where(state, &mut sql, &mut params)?;

    Ok(Statement { sql, params })
}

/// Appends ` WHERE ...` with predicates joined by AND in declaration
/// order, pushing bound values onto `params` as placeholders are emitted.
fn push_where(state: &QueryState, sql: &mut String, params: &mut Vec<Value>) -> Result<()> {
    if state.wheres.is_empty() {
        return Ok(());
    }
    sql.push_str(" WHERE ");
    for (i, clause) in state.wheres.iter().enumerate() {
        if i > 0 {
            sql.push_str(" AND ");
        }
        sql.push_str(&clause.build_sql(params)?);
    }
    Ok(())
}
