//! Everything a generated record unit refers to.
//!
//! Units bring this into scope with `use sqlite_record_builder::prelude::*;`.

pub use crate::table::{
    ActionIfOpen, Database, FieldSink, NarrowSink, Record, RecordStream, Table, TableArgs, TableBase,
    TableStreamBase, WideDisplay, WideSink,
};
pub use crate::value::types::*;
pub use crate::value::{
    sql_literal, sql_text, sql_wliteral, sql_wtext, FromSqlValue, RowReader, SqlValue, ToSqlText,
};
