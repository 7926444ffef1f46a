use rusqlite::Row;

use super::sql_value::{FromSqlValue, SqlValue};
use crate::error::{Error, Result};
use crate::schema::ColumnDescriptor;

/// Ordinal cursor over one result row.
///
/// Each [`read`](RowReader::read) consumes the next column. A record's
/// extraction sequence must therefore read its fields in the same order as
/// the `SELECT` list that produced the row.
pub struct RowReader<'r, 's> {
    row: &'r Row<'s>,
    columns: &'r [ColumnDescriptor],
    pos: usize,
}

impl<'r, 's> RowReader<'r, 's> {
    pub fn new(row: &'r Row<'s>, columns: &'r [ColumnDescriptor]) -> Self {
        Self { row, columns, pos: 0 }
    }

    /// Read the next column as `T`
    pub fn read<T: FromSqlValue>(&mut self) -> Result<T> {
        self.read_value().map(T::from_sql_value)
    }

    /// Read the next column as a detached [`SqlValue`]
    pub fn read_value(&mut self) -> Result<SqlValue> {
        let index = self.pos;
        let column = self.columns.get(index).ok_or(Error::ColumnOutOfRange {
            index,
            available: self.columns.len(),
        })?;
        let value = self.row.get_ref(index)?;
        self.pos += 1;
        Ok(SqlValue::from_value_ref(value, column.declared_type.as_deref()))
    }

    /// Skip the next column
    pub fn skip(&mut self) {
        self.pos += 1;
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Descriptor of the column the next read consumes
    pub fn current_column(&self) -> Option<&ColumnDescriptor> {
        self.columns.get(self.pos)
    }

    pub fn remaining(&self) -> usize {
        self.columns.len().saturating_sub(self.pos)
    }
}
