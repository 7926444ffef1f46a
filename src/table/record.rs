//! Contracts a generated record implements

use std::fmt;

use crate::error::Result;
use crate::value::{RowReader, SqlString, SqlValue, ToSqlText, WideString};

/// A typed row of one table or view.
///
/// Field order is load-bearing: [`extract`](Record::extract) reads columns
/// in the order of [`columns`](Record::columns), which is also the order of
/// [`select_column_names`](Record::select_column_names).
pub trait Record: Default + Clone {
    type StrType: SqlString;

    fn table_name() -> Self::StrType;

    /// Column names joined with `", "`
    fn column_names() -> Self::StrType;

    /// Double-quoted column names joined with `", "`, for a `SELECT` list
    fn select_column_names() -> Self::StrType;

    fn column_count() -> usize;

    fn columns() -> &'static [&'static str];

    /// Every field as a quoted SQL literal, comma separated, in column order
    fn values(&self) -> Self::StrType;

    /// Populate every field from the row, one ordinal read per field
    fn extract(&mut self, row: &mut RowReader<'_, '_>) -> Result<()>;

    fn get_field(&self, column: &str) -> Option<SqlValue>;

    /// Returns false when the record has no such column
    fn set_field(&mut self, column: &str, value: SqlValue) -> bool;

    /// Copy every field whose column name `other` shares
    fn set_data<R: Record>(&mut self, other: &R) {
        for column in Self::columns() {
            if let Some(value) = other.get_field(column) {
                self.set_field(column, value);
            }
        }
    }

    fn from_row(row: &mut RowReader<'_, '_>) -> Result<Self> {
        let mut record = Self::default();
        record.extract(row)?;
        Ok(record)
    }
}

/// Destination for a record's delimited field output
pub trait FieldSink {
    /// Write a value as is
    fn field(&mut self, value: &dyn ToSqlText) -> fmt::Result;

    /// Write a text value in double quotes, doubling embedded quotes
    fn quoted(&mut self, value: &dyn ToSqlText) -> fmt::Result;

    /// Write the sink's delimiter
    fn delimit(&mut self) -> fmt::Result;
}

fn quote_field(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// [`FieldSink`] over any [`fmt::Write`]
pub struct NarrowSink<'a, W: fmt::Write + ?Sized> {
    out: &'a mut W,
    delimiter: &'a str,
}

impl<'a, W: fmt::Write + ?Sized> NarrowSink<'a, W> {
    pub fn new(out: &'a mut W, delimiter: &'a str) -> Self {
        Self { out, delimiter }
    }
}

impl<W: fmt::Write + ?Sized> FieldSink for NarrowSink<'_, W> {
    fn field(&mut self, value: &dyn ToSqlText) -> fmt::Result {
        self.out.write_str(&value.sql_text())
    }

    fn quoted(&mut self, value: &dyn ToSqlText) -> fmt::Result {
        self.out.write_str(&quote_field(&value.sql_text()))
    }

    fn delimit(&mut self) -> fmt::Result {
        self.out.write_str(self.delimiter)
    }
}

/// [`FieldSink`] appending UTF-16 to a [`WideString`]
pub struct WideSink<'a> {
    out: &'a mut WideString,
    delimiter: &'a str,
}

impl<'a> WideSink<'a> {
    pub fn new(out: &'a mut WideString, delimiter: &'a str) -> Self {
        Self { out, delimiter }
    }
}

impl FieldSink for WideSink<'_> {
    fn field(&mut self, value: &dyn ToSqlText) -> fmt::Result {
        self.out.push_str(&value.sql_text());
        Ok(())
    }

    fn quoted(&mut self, value: &dyn ToSqlText) -> fmt::Result {
        self.out.push_str(&quote_field(&value.sql_text()));
        Ok(())
    }

    fn delimit(&mut self) -> fmt::Result {
        self.out.push_str(self.delimiter);
        Ok(())
    }
}

/// Delimited stream output of a record
pub trait RecordStream {
    /// Default delimiter between fields
    fn delimiter() -> &'static str;

    /// Write every field in column order, delimiting between fields
    fn write_fields<S: FieldSink + ?Sized>(&self, sink: &mut S) -> fmt::Result;
}

/// Wide counterpart of [`fmt::Display`]
pub trait WideDisplay {
    fn fmt_wide(&self, out: &mut WideString) -> fmt::Result;

    fn to_wide_string(&self) -> WideString {
        let mut out = WideString::new();
        // WideSink never fails
        let _ = self.fmt_wide(&mut out);
        out
    }
}
