// SQL_TABLE_PERSON_H

use std::fmt;
use sqlite_record_builder::prelude::*;

pub type StrType = String;
pub type Text = StrType;

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct sql_table_Person {
    id: Integer,
    name: Text,
    bio: Clob,
}

impl sql_table_Person {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_record<R: Record>(record: &R) -> Self {
        let mut this = Self::default();
        this.set_data(record);
        this
    }
}

impl Record for sql_table_Person {
    type StrType = StrType;

    fn table_name() -> StrType {
        String::from("Person")
    }

    fn column_names() -> StrType {
        String::from("id, name, bio")
    }

    fn select_column_names() -> StrType {
        String::from("\"id\", \"name\", \"bio\"")
    }

    fn column_count() -> usize {
        3
    }

    fn columns() -> &'static [&'static str] {
        &["id", "name", "bio"]
    }

    fn values(&self) -> StrType {
        let mut values = StrType::new();
        values += &sql_literal(&self.id);
        values += ",";
        values += &sql_literal(&self.name);
        values += ",";
        values += &sql_literal(&self.bio);
        values
    }

    fn extract(&mut self, row: &mut RowReader<'_, '_>) -> sqlite_record_builder::Result<()> {
        self.id = row.read()?;
        self.name = row.read()?;
        self.bio = row.read()?;
        Ok(())
    }

    fn get_field(&self, column: &str) -> Option<SqlValue> {
        match column {
            "id" => Some(SqlValue::from(self.id)),
            "name" => Some(SqlValue::from(self.name.clone())),
            "bio" => Some(SqlValue::from(self.bio.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, column: &str, value: SqlValue) -> bool {
        match column {
            "id" => self.id = FromSqlValue::from_sql_value(value),
            "name" => self.name = FromSqlValue::from_sql_value(value),
            "bio" => self.bio = FromSqlValue::from_sql_value(value),
            _ => return false,
        }
        true
    }
}

impl sql_table_Person {
    pub fn get_id(&self) -> &Integer {
        &self.id
    }

    pub fn get_name(&self) -> &Text {
        &self.name
    }

    pub fn get_bio(&self) -> &Clob {
        &self.bio
    }

    pub fn set_id(&mut self, value: Integer) {
        self.id = value;
    }

    pub fn set_name(&mut self, value: Text) {
        self.name = value;
    }

    pub fn set_bio(&mut self, value: Clob) {
        self.bio = value;
    }
}

impl RecordStream for sql_table_Person {
    fn delimiter() -> &'static str {
        ","
    }

    fn write_fields<S: FieldSink + ?Sized>(&self, sink: &mut S) -> fmt::Result {
        sink.field(&self.id)?;
        sink.delimit()?;
        sink.quoted(&self.name)?;
        sink.delimit()?;
        sink.quoted(&self.bio)?;
        Ok(())
    }
}

impl fmt::Display for sql_table_Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_fields(&mut NarrowSink::new(f, Self::delimiter()))
    }
}

impl WideDisplay for sql_table_Person {
    fn fmt_wide(&self, out: &mut WideString) -> fmt::Result {
        self.write_fields(&mut WideSink::new(out, Self::delimiter()))
    }
}

// end of SQL_TABLE_PERSON_H
