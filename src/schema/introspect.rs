//! Catalog enumeration and result-shape inspection

use rusqlite::{Connection, Statement};
use std::vec;
use tracing::{debug, trace};

use super::resolve::TypeMappingPolicy;
use super::types::{ColumnDescriptor, TableDescriptor, Target, TargetKind};
use crate::error::Result;

/// Build the catalog query. `filter` is raw SQL appended after the kind restriction.
pub fn catalog_query(filter: &str) -> String {
    let filter = filter.trim();
    let mut sql = String::from(
        "SELECT type, name, tbl_name FROM sqlite_master WHERE (type = 'table' OR type = 'view')",
    );
    if !filter.is_empty() {
        sql.push(' ');
        sql.push_str(filter);
    }
    sql.push_str(" ORDER BY tbl_name, type");
    sql
}

/// Enumerate the tables and views matching `filter`.
///
/// The returned iterator is finite and one-shot; call again to re-query.
pub fn list_targets(conn: &Connection, filter: &str) -> Result<vec::IntoIter<Target>> {
    let sql = catalog_query(filter);
    debug!("Catalog query: {}", sql);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        let kind: String = row.get(0)?;
        let name: String = row.get(1)?;
        Ok((kind, name))
    })?;

    let mut targets = Vec::new();
    for row in rows {
        let (kind, name) = row?;
        match TargetKind::parse(&kind) {
            Some(kind) => targets.push(Target { kind, name }),
            None => trace!("Ignoring catalog entry '{}' of type '{}'", name, kind),
        }
    }

    Ok(targets.into_iter())
}

/// Column names and declared types of a prepared statement, in ordinal order
pub fn describe_columns(stmt: &Statement<'_>) -> Vec<ColumnDescriptor> {
    stmt.columns()
        .iter()
        .enumerate()
        .map(|(ordinal, column)| ColumnDescriptor::new(column.name(), column.decl_type(), ordinal))
        .collect()
}

/// Default representative query for a target
pub fn representative_query(name: &str) -> String {
    format!("SELECT * FROM {}", quote_identifier(name))
}

/// Inspect a target's result shape and resolve every column's type.
///
/// Columns containing the disallowed marker are dropped before resolution,
/// and the remaining columns are renumbered so ordinals stay contiguous.
pub fn describe_target(
    conn: &Connection,
    target: &Target,
    query: Option<&str>,
    policy: TypeMappingPolicy,
) -> Result<TableDescriptor> {
    let sql = match query {
        Some(query) => query.to_string(),
        None => representative_query(&target.name),
    };
    let stmt = conn.prepare(&sql)?;

    let mut columns = Vec::new();
    for column in describe_columns(&stmt) {
        if column.is_synthetic() {
            debug!(
                "Skipping column '{}' of '{}': name contains a disallowed character",
                column.name, target.name
            );
            continue;
        }
        let ordinal = columns.len();
        columns.push(ColumnDescriptor { ordinal, ..column });
    }

    let types = columns
        .iter()
        .map(|c| policy.resolve_column(&target.name, &c.name, c.declared_type.as_deref()))
        .collect();

    Ok(TableDescriptor {
        name: target.name.clone(),
        kind: target.kind,
        columns,
        types,
    })
}

/// Double-quote an SQL identifier, doubling embedded quotes
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
