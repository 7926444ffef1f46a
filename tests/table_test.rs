//! Round trip between a generated record unit and the `Table` container.
//!
//! `fixtures/sql_table_person.rs` is the generator's output for
//! `Person(id INTEGER, name TEXT, bio CLOB)` with comments excluded. It is
//! compiled here and checked against fresh generator output, so a change to
//! the emitter that breaks the marshalling contract fails this file.

use pretty_assertions::assert_eq;
use sqlite_record_builder::prelude::*;
use sqlite_record_builder::schema::{Target, TargetKind};
use sqlite_record_builder::writer::{FeatureOptions, GenerationOptions, Generator, OutputOptions, StrOptions};
use sqlite_record_builder::{Error, WideString};
use tempfile::TempDir;

#[path = "fixtures/sql_table_person.rs"]
mod sql_table_person;

use sql_table_person::sql_table_Person as Person;

const PERSON_SCHEMA: &str = "
    CREATE TABLE Person (id INTEGER PRIMARY KEY, name TEXT, bio CLOB);
    INSERT INTO Person VALUES (1, 'Ada', 'Analytical engine');
    INSERT INTO Person VALUES (2, 'Grace', NULL);
";

fn person_db() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.execute(PERSON_SCHEMA).unwrap();
    db
}

fn person(id: i32, name: &str) -> Person {
    let mut p = Person::new();
    p.set_id(id);
    p.set_name(name.to_string());
    p
}

fn non_blank_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|line| !line.trim().is_empty()).collect()
}

// =============================================================================
// Generated unit
// =============================================================================

#[test]
fn test_fixture_matches_generator() {
    let db = person_db();
    let options = GenerationOptions::new(
        StrOptions::string(),
        FeatureOptions {
            exclude_comments: true,
            ..FeatureOptions::max()
        },
        OutputOptions::sql_dir(),
    );
    let generator = Generator::new(db.connection().unwrap(), options);
    let target = Target {
        kind: TargetKind::Table,
        name: "Person".to_string(),
    };
    let output = OutputOptions {
        prefix: "sql_table_".to_string(),
        ..OutputOptions::sql_dir()
    };

    let unit = generator.render(&target, None, &output).unwrap();
    assert_eq!(unit.type_name, "sql_table_Person");
    assert_eq!(
        non_blank_lines(&unit.text),
        non_blank_lines(include_str!("fixtures/sql_table_person.rs"))
    );
}

// =============================================================================
// Populating and streaming
// =============================================================================

#[test]
fn test_populate() {
    let db = person_db();
    let table: Table<Person> = Table::new(&db, TableArgs::new()).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.select_sql(), "SELECT \"id\", \"name\", \"bio\" FROM \"Person\"");
    assert_eq!(*table[0].get_id(), 1);
    assert_eq!(table[0].get_name(), "Ada");
    assert_eq!(table[0].get_bio().to_string_lossy(), "Analytical engine");
    // NULL reads as the default value
    assert!(table[1].get_bio().is_empty());

    let names: Vec<&str> = table.iter().map(|p| p.get_name().as_str()).collect();
    assert_eq!(names, vec!["Ada", "Grace"]);
}

#[test]
fn test_self_description() {
    let db = person_db();
    let table: Table<Person> = Table::new(&db, TableArgs::new()).unwrap();
    let base: &dyn TableBase = &table;

    assert_eq!(base.table_name(), "Person");
    assert_eq!(base.column_names(), "id, name, bio");
    assert_eq!(base.column_count(), 3);
    assert_eq!(base.row_count(), 2);
}

#[test]
fn test_stream_output() {
    let db = person_db();
    let mut table: Table<Person> = Table::new(&db, TableArgs::new()).unwrap();

    let expected = "1,\"Ada\",\"Analytical engine\"\n2,\"Grace\",\"\"\n";
    assert_eq!(table.to_string(), expected);
    assert_eq!(table[0].to_string(), "1,\"Ada\",\"Analytical engine\"");

    let mut wide = WideString::new();
    table.out_wide(&mut wide).unwrap();
    assert_eq!(wide, WideString::from(expected));
    assert_eq!(table[1].to_wide_string(), WideString::from("2,\"Grace\",\"\""));

    table.set_delimiter("|");
    let mut text = String::new();
    table.out(&mut text).unwrap();
    assert_eq!(text, "1|\"Ada\"|\"Analytical engine\"\n2|\"Grace\"|\"\"\n");
}

#[test]
fn test_where_and_pre_execute() {
    let db = person_db();

    let table: Table<Person> = Table::new(&db, TableArgs::new().where_clause("WHERE id > 1")).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table[0].get_name(), "Grace");

    let args = TableArgs::new()
        .pre_execute("INSERT INTO Person VALUES (3, 'Hedy', NULL)")
        .where_clause("ORDER BY id DESC");
    let table: Table<Person> = Table::new(&db, args).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table[0].get_name(), "Hedy");
}

#[test]
fn test_db_file_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("people.db");
    let file_db = Database::from_connection(rusqlite::Connection::open(&path).unwrap());
    file_db
        .execute(
            "CREATE TABLE Person (id INTEGER PRIMARY KEY, name TEXT, bio CLOB);
             INSERT INTO Person VALUES (10, 'Barbara', NULL);",
        )
        .unwrap();

    let db = person_db();
    let table: Table<Person> = Table::new(&db, TableArgs::new().db_file(&path)).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table[0].get_name(), "Barbara");

    let missing = TableArgs::new().db_file(dir.path().join("missing.db"));
    assert!(matches!(Table::<Person>::new(&db, missing), Err(Error::MissingDatabase(_))));
}

// =============================================================================
// SQL actions
// =============================================================================

#[test]
fn test_insert_one_escapes_quotes() {
    let db = person_db();
    let mut table: Table<Person> = Table::new(&db, TableArgs::new()).unwrap();

    table.insert_one(person(3, "O'Brien")).unwrap();
    assert_eq!(table.len(), 3);

    table.re_query().unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table[2].get_name(), "O'Brien");
}

#[test]
fn test_insert_after_delete_all() {
    let db = person_db();
    let mut table: Table<Person> = Table::new(&db, TableArgs::new()).unwrap();
    table.push(person(4, "Katherine"));

    table.insert(true).unwrap();
    table.re_query().unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table[2].get_name(), "Katherine");

    // Inserting the same rows again violates the primary key
    assert!(matches!(table.insert(false), Err(Error::Sqlite(_))));
}

#[test]
fn test_update_db_replaces() {
    let db = person_db();
    let mut table: Table<Person> = Table::new(&db, TableArgs::new()).unwrap();

    table.get_mut()[0].set_name("Augusta".to_string());
    table.update_db(false).unwrap();
    table.re_query().unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table[0].get_name(), "Augusta");

    let mut grace = table[1].clone();
    grace.set_bio(Clob::from("Compilers"));
    table.update_one(&grace).unwrap();
    table.re_query().unwrap();
    assert_eq!(table[1].get_bio().to_string_lossy(), "Compilers");
}

#[test]
fn test_delete_all_keeps_records() {
    let db = person_db();
    let mut table: Table<Person> = Table::new(&db, TableArgs::new()).unwrap();

    table.delete_all().unwrap();
    assert_eq!(table.len(), 2);

    table.re_query().unwrap();
    assert!(table.is_empty());
}

#[test]
fn test_execute() {
    let db = person_db();
    let table: Table<Person> = Table::new(&db, TableArgs::new()).unwrap();
    assert_eq!(table.execute("UPDATE Person SET bio = 'x'").unwrap(), 2);
}

#[test]
fn test_detached_tables() {
    let mut table = Table::<Person>::from_records(vec![person(1, "Ada")]);
    assert_eq!(table.len(), 1);
    assert!(matches!(table.re_query(), Err(Error::NotOpen)));
    assert!(matches!(table.delete_all(), Err(Error::NotOpen)));

    table.append(vec![person(2, "Grace"), person(3, "Hedy")]);
    assert_eq!(table.len(), 3);

    let empty = Table::<Person>::empty();
    assert!(empty.is_empty());

    let closed = Database::new();
    assert!(matches!(Table::<Person>::new(&closed, TableArgs::new()), Err(Error::NotOpen)));
}

#[test]
fn test_cross_record_copy() {
    let db = person_db();
    let table: Table<Person> = Table::new(&db, TableArgs::new()).unwrap();

    let copy = Person::from_record(&table[0]);
    assert_eq!(copy, table[0]);

    let mut other = Table::<Person>::empty();
    other.add_data(&table);
    assert_eq!(other.get(), table.get());

    let mut blank = Person::new();
    assert!(blank.set_field("name", SqlValue::from("Joan")));
    assert!(!blank.set_field("missing", SqlValue::Null));
    assert_eq!(blank.get_field("name"), Some(SqlValue::from("Joan")));
    assert_eq!(blank.get_field("missing"), None);
}

#[test]
fn test_with_records_inserts() {
    let db = person_db();
    let conn = db.connection().unwrap();
    let table = Table::with_records(conn, vec![person(5, "Radia")]);
    table.insert(false).unwrap();

    let all: Table<Person> = Table::with_connection(conn, TableArgs::new()).unwrap();
    assert_eq!(all.len(), 3);
}

/// A record for a table whose name contains a double quote
#[derive(Debug, Clone, Default)]
struct Quoted {
    x: i32,
}

impl Record for Quoted {
    type StrType = String;

    fn table_name() -> String {
        "we\"ird".to_string()
    }

    fn column_names() -> String {
        "x".to_string()
    }

    fn select_column_names() -> String {
        "\"x\"".to_string()
    }

    fn column_count() -> usize {
        1
    }

    fn columns() -> &'static [&'static str] {
        &["x"]
    }

    fn values(&self) -> String {
        sql_literal(&self.x)
    }

    fn extract(&mut self, row: &mut RowReader<'_, '_>) -> sqlite_record_builder::Result<()> {
        self.x = row.read()?;
        Ok(())
    }

    fn get_field(&self, _column: &str) -> Option<SqlValue> {
        None
    }

    fn set_field(&mut self, _column: &str, _value: SqlValue) -> bool {
        false
    }
}

#[test]
fn test_table_name_with_quote() {
    let db = Database::open_in_memory().unwrap();
    db.execute("CREATE TABLE \"we\"\"ird\" (x INTEGER); INSERT INTO \"we\"\"ird\" VALUES (7);")
        .unwrap();

    let mut table: Table<Quoted> = Table::new(&db, TableArgs::new().validate_columns(true)).unwrap();
    assert_eq!(table.select_sql(), "SELECT \"x\" FROM \"we\"\"ird\"");
    assert_eq!(table.len(), 1);
    assert_eq!(table[0].x, 7);

    table.insert_one(Quoted { x: 8 }).unwrap();
    table.re_query().unwrap();
    assert_eq!(table.len(), 2);

    table.delete_all().unwrap();
    table.re_query().unwrap();
    assert!(table.is_empty());
}

// =============================================================================
// Column validation
// =============================================================================

/// A record whose `SELECT` list disagrees with its declared column order
#[derive(Debug, Clone, Default)]
struct Swapped {
    id: i32,
    name: String,
}

impl Record for Swapped {
    type StrType = String;

    fn table_name() -> String {
        "Person".to_string()
    }

    fn column_names() -> String {
        "id, name".to_string()
    }

    fn select_column_names() -> String {
        "\"name\", \"id\"".to_string()
    }

    fn column_count() -> usize {
        2
    }

    fn columns() -> &'static [&'static str] {
        &["id", "name"]
    }

    fn values(&self) -> String {
        format!("{},{}", sql_literal(&self.id), sql_literal(&self.name))
    }

    fn extract(&mut self, row: &mut RowReader<'_, '_>) -> sqlite_record_builder::Result<()> {
        self.id = row.read()?;
        self.name = row.read()?;
        Ok(())
    }

    fn get_field(&self, _column: &str) -> Option<SqlValue> {
        None
    }

    fn set_field(&mut self, _column: &str, _value: SqlValue) -> bool {
        false
    }
}

#[test]
fn test_column_order_mismatch() {
    let db = person_db();

    // Ordinal extraction shifts silently
    let table: Table<Swapped> = Table::new(&db, TableArgs::new()).unwrap();
    assert_eq!(table[0].id, 0);
    assert_eq!(table[0].name, "1");

    let result = Table::<Swapped>::new(&db, TableArgs::new().validate_columns(true));
    match result {
        Err(Error::ColumnMismatch { table, expected, actual }) => {
            assert_eq!(table, "Person");
            assert_eq!(expected, vec!["id", "name"]);
            assert_eq!(actual, vec!["name", "id"]);
        }
        other => panic!("expected a column mismatch, got {:?}", other.map(|t| t.len())),
    }
}

#[test]
fn test_validation_accepts_generated_record() {
    let db = person_db();
    let table: Table<Person> = Table::new(&db, TableArgs::new().validate_columns(true)).unwrap();
    assert_eq!(table.len(), 2);
}
