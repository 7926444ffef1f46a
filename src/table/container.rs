//! Generic typed row container

use rusqlite::Connection;
use std::fmt;
use std::ops::Index;
use std::path::PathBuf;
use std::slice;
use tracing::{debug, trace};

use super::database::{expand_env_vars, Database};
use super::record::{NarrowSink, Record, RecordStream, WideSink};
use crate::error::{Error, Result};
use crate::schema::{describe_columns, quote_identifier};
use crate::value::{RowReader, WideString};

/// Optional arguments for populating a [`Table`]. Any combination may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableArgs {
    /// Raw SQL appended after `FROM "<table>"`, e.g. `WHERE id > 3`
    pub where_clause: Option<String>,
    /// Statement executed before the query runs
    pub pre_execute: Option<String>,
    /// Query this database file instead of the supplied connection
    pub db_file: Option<PathBuf>,
    /// Check the query's column names against the record before extracting
    pub validate_columns: bool,
}

impl TableArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_clause(mut self, clause: impl Into<String>) -> Self {
        self.where_clause = Some(clause.into());
        self
    }

    pub fn pre_execute(mut self, sql: impl Into<String>) -> Self {
        self.pre_execute = Some(sql.into());
        self
    }

    pub fn db_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_file = Some(path.into());
        self
    }

    pub fn validate_columns(mut self, validate: bool) -> Self {
        self.validate_columns = validate;
        self
    }
}

enum Source<'db> {
    Detached,
    Shared(&'db Connection),
    Owned(Connection),
}

impl Source<'_> {
    fn connection(&self) -> Result<&Connection> {
        match self {
            Source::Detached => Err(Error::NotOpen),
            Source::Shared(conn) => Ok(conn),
            Source::Owned(conn) => Ok(conn),
        }
    }
}

/// Self-description shared by every table container
pub trait TableBase {
    fn table_name(&self) -> String;
    fn column_names(&self) -> String;
    fn column_count(&self) -> usize;
    fn row_count(&self) -> usize;
}

/// [`TableBase`] plus delimited output of every record
pub trait TableStreamBase: TableBase {
    fn out(&self, w: &mut dyn fmt::Write) -> fmt::Result;
    fn out_wide(&self, out: &mut WideString) -> fmt::Result;
}

fn quoted_table_name<T: Record>() -> String {
    quote_identifier(&T::table_name().to_string())
}

/// `SELECT` statement for a record type
pub fn select_query<T: Record>(where_clause: Option<&str>) -> String {
    let mut sql = format!(
        "SELECT {} FROM {}",
        T::select_column_names(),
        quoted_table_name::<T>()
    );
    if let Some(clause) = where_clause.map(str::trim).filter(|c| !c.is_empty()) {
        sql.push(' ');
        sql.push_str(clause);
    }
    sql
}

fn fetch<T: Record>(conn: &Connection, sql: &str, args: &TableArgs) -> Result<Vec<T>> {
    if let Some(pre) = args.pre_execute.as_deref().filter(|s| !s.trim().is_empty()) {
        debug!("Pre-executing: {}", pre);
        conn.execute_batch(pre)?;
    }

    debug!("Querying: {}", sql);
    let mut stmt = conn.prepare(sql)?;
    let columns = describe_columns(&stmt);

    if args.validate_columns {
        let actual: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        if actual != T::columns() {
            return Err(Error::ColumnMismatch {
                table: T::table_name().to_string(),
                expected: T::columns().iter().map(|c| c.to_string()).collect(),
                actual: actual.iter().map(|c| c.to_string()).collect(),
            });
        }
    }

    let mut records = Vec::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut reader = RowReader::new(row, &columns);
        records.push(T::from_row(&mut reader)?);
    }

    trace!("Fetched {} rows from {}", records.len(), T::table_name());
    Ok(records)
}

/// Records of type `T` materialized from a query, owned by the container
pub struct Table<'db, T: Record> {
    records: Vec<T>,
    source: Source<'db>,
    args: TableArgs,
    init_query: String,
    delimiter: Option<String>,
}

impl<'db, T: Record> Table<'db, T> {
    /// Query the open database in `db`
    pub fn new(db: &'db Database, args: TableArgs) -> Result<Self> {
        Self::with_connection(db.connection()?, args)
    }

    /// Query `conn`, or `args.db_file` when set
    pub fn with_connection(conn: &'db Connection, args: TableArgs) -> Result<Self> {
        let source = match &args.db_file {
            Some(path) => {
                let path = PathBuf::from(expand_env_vars(&path.to_string_lossy()));
                if !path.exists() {
                    return Err(Error::MissingDatabase(path));
                }
                Source::Owned(Connection::open(&path)?)
            }
            None => Source::Shared(conn),
        };
        let init_query = select_query::<T>(args.where_clause.as_deref());

        let mut table = Self {
            records: Vec::new(),
            source,
            args,
            init_query,
            delimiter: None,
        };
        table.re_query()?;
        Ok(table)
    }

    /// Wrap existing records without querying. SQL actions fail with
    /// [`Error::NotOpen`].
    pub fn from_records(records: Vec<T>) -> Self {
        Self {
            records,
            source: Source::Detached,
            args: TableArgs::default(),
            init_query: select_query::<T>(None),
            delimiter: None,
        }
    }

    /// Wrap existing records without querying, keeping `conn` for SQL actions
    pub fn with_records(conn: &'db Connection, records: Vec<T>) -> Self {
        Self {
            source: Source::Shared(conn),
            ..Self::from_records(records)
        }
    }

    /// An unpopulated, detached table
    pub fn empty() -> Self {
        Self::from_records(Vec::new())
    }

    fn connection(&self) -> Result<&Connection> {
        self.source.connection()
    }

    // Records in memory

    pub fn get(&self) -> &[T] {
        &self.records
    }

    pub fn get_mut(&mut self) -> &mut Vec<T> {
        &mut self.records
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }

    pub fn append(&mut self, records: impl IntoIterator<Item = T>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a copy of every record in `other`, matching fields by column name
    pub fn add_data<'a, R: Record + 'a>(&mut self, other: impl IntoIterator<Item = &'a R>) {
        for source in other {
            let mut record = T::default();
            record.set_data(source);
            self.records.push(record);
        }
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    // SQL actions

    /// The query this table was populated with
    pub fn select_sql(&self) -> &str {
        &self.init_query
    }

    fn insert_sql(verb: &str, record: &T) -> String {
        format!(
            "{} INTO {} ({}) VALUES ({})",
            verb,
            quoted_table_name::<T>(),
            T::select_column_names(),
            record.values()
        )
    }

    /// Insert every record, optionally deleting all rows first
    pub fn insert(&self, delete_all_first: bool) -> Result<()> {
        if delete_all_first {
            self.delete_all()?;
        }
        let conn = self.connection()?;
        for record in &self.records {
            conn.execute_batch(&Self::insert_sql("INSERT", record))?;
        }
        Ok(())
    }

    /// Insert or replace every record, optionally deleting all rows first
    pub fn update_db(&self, delete_all_first: bool) -> Result<()> {
        if delete_all_first {
            self.delete_all()?;
        }
        let conn = self.connection()?;
        for record in &self.records {
            conn.execute_batch(&Self::insert_sql("INSERT OR REPLACE", record))?;
        }
        Ok(())
    }

    /// Add `record` to the container and insert it
    pub fn insert_one(&mut self, record: T) -> Result<()> {
        self.connection()?
            .execute_batch(&Self::insert_sql("INSERT", &record))?;
        self.records.push(record);
        Ok(())
    }

    /// Insert or replace one record without adding it to the container
    pub fn update_one(&self, record: &T) -> Result<()> {
        self.connection()?
            .execute_batch(&Self::insert_sql("INSERT OR REPLACE", record))?;
        Ok(())
    }

    /// Delete every row of the table. The records in memory are kept.
    pub fn delete_all(&self) -> Result<()> {
        let sql = format!("DELETE FROM {}", quoted_table_name::<T>());
        self.connection()?.execute_batch(&sql)?;
        Ok(())
    }

    /// Execute arbitrary SQL against the table's connection
    pub fn execute(&self, sql: &str) -> Result<usize> {
        Ok(self.connection()?.execute(sql, [])?)
    }

    /// Clear the records and run the query the table was populated with again
    pub fn re_query(&mut self) -> Result<()> {
        let records = fetch::<T>(self.connection()?, &self.init_query, &self.args)?;
        self.records = records;
        Ok(())
    }
}

impl<'db, T: Record> Index<usize> for Table<'db, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.records[index]
    }
}

impl<'a, 'db, T: Record> IntoIterator for &'a Table<'db, T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<T: Record> TableBase for Table<'_, T> {
    fn table_name(&self) -> String {
        T::table_name().to_string()
    }

    fn column_names(&self) -> String {
        T::column_names().to_string()
    }

    fn column_count(&self) -> usize {
        T::column_count()
    }

    fn row_count(&self) -> usize {
        self.records.len()
    }
}

impl<'db, T: Record + RecordStream> Table<'db, T> {
    /// Delimiter used between fields; the record's default until set
    pub fn delimiter(&self) -> &str {
        self.delimiter.as_deref().unwrap_or(T::delimiter())
    }

    pub fn set_delimiter(&mut self, delimiter: impl Into<String>) {
        self.delimiter = Some(delimiter.into());
    }

    /// Write every record on its own line
    pub fn out<W: fmt::Write + ?Sized>(&self, w: &mut W) -> fmt::Result {
        let delimiter = self.delimiter();
        for record in &self.records {
            record.write_fields(&mut NarrowSink::new(&mut *w, delimiter))?;
            w.write_char('\n')?;
        }
        Ok(())
    }

    /// Wide counterpart of [`out`](Table::out)
    pub fn out_wide(&self, out: &mut WideString) -> fmt::Result {
        let delimiter = self.delimiter();
        for record in &self.records {
            record.write_fields(&mut WideSink::new(&mut *out, delimiter))?;
            *out += "\n";
        }
        Ok(())
    }
}

impl<T: Record + RecordStream> TableStreamBase for Table<'_, T> {
    fn out(&self, w: &mut dyn fmt::Write) -> fmt::Result {
        Table::out(self, w)
    }

    fn out_wide(&self, out: &mut WideString) -> fmt::Result {
        Table::out_wide(self, out)
    }
}

impl<T: Record + RecordStream> fmt::Display for Table<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.out(f)
    }
}

impl<T: Record + fmt::Debug> fmt::Debug for Table<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("query", &self.init_query)
            .field("records", &self.records)
            .finish()
    }
}
