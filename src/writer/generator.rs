//! Drives introspection and emission for one target or a whole catalog

use rusqlite::Connection;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, trace, warn};

use super::index_gen::{emit_index, IndexEntry, INDEX_BASE_NAME};
use super::options::{GenerationOptions, OutputOptions};
use super::record_gen::{bare_ident, emit_record, sanitize_ident};
use crate::error::Result;
use crate::schema::{describe_target, list_targets, TableDescriptor, Target};

/// Emitted text for one target, and where it was (or should have been) written
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedUnit {
    pub target: Target,
    pub type_name: String,
    pub path: PathBuf,
    pub text: String,
    /// False when the destination file could not be written
    pub written: bool,
}

/// Outcome of [`Generator::generate_all`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    /// Written units, in catalog order
    pub created: Vec<GeneratedUnit>,
    /// Units whose file could not be written
    pub failed: Vec<GeneratedUnit>,
    /// Targets whose columns could not be read, e.g. a view over a dropped table
    pub skipped: Vec<Target>,
    /// Path of the index unit, if it was written
    pub index: Option<PathBuf>,
}

impl GenerationReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Generates record units from the schema behind one connection
pub struct Generator<'c> {
    conn: &'c Connection,
    options: GenerationOptions,
}

impl<'c> Generator<'c> {
    pub fn new(conn: &'c Connection, options: GenerationOptions) -> Self {
        Self { conn, options }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Introspect `target` through its representative query, or `query` when given
    pub fn describe(&self, target: &Target, query: Option<&str>) -> Result<TableDescriptor> {
        describe_target(self.conn, target, query, self.options.features.policy())
    }

    /// Build a unit's text without touching the file system
    pub fn render(
        &self,
        target: &Target,
        query: Option<&str>,
        output: &OutputOptions,
    ) -> Result<GeneratedUnit> {
        let type_name = sanitize_ident(&output.type_name(&target.name));
        self.render_as(target, query, output, type_name)
    }

    fn render_as(
        &self,
        target: &Target,
        query: Option<&str>,
        output: &OutputOptions,
        type_name: String,
    ) -> Result<GeneratedUnit> {
        let desc = self.describe(target, query)?;
        let options = GenerationOptions {
            output: output.clone(),
            ..self.options.clone()
        };
        let text = emit_record(&desc, &type_name, &options);

        Ok(GeneratedUnit {
            target: target.clone(),
            path: output.path_for(bare_ident(&type_name)),
            type_name,
            text,
            written: false,
        })
    }

    /// Generate and write the unit for one target
    pub fn generate(&self, target: &Target) -> Result<GeneratedUnit> {
        self.generate_with_query(target, None)
    }

    /// Generate and write the unit for one target, shaped by an explicit query
    pub fn generate_with_query(&self, target: &Target, query: Option<&str>) -> Result<GeneratedUnit> {
        ensure_dest_folder(&self.options.output)?;
        let mut unit = self.render(target, query, &self.options.output)?;
        unit.written = write_unit(&unit.path, &unit.text);
        Ok(unit)
    }

    /// Output options for a target, with the prefix extended by the catalog
    /// kind when `namespace_by_kind` is set
    fn output_for(&self, target: &Target, namespace_by_kind: bool) -> OutputOptions {
        let mut output = self.options.output.clone();
        if namespace_by_kind {
            output.prefix = format!("{}{}_", output.prefix, target.kind);
        }
        output
    }

    /// Generate a unit for every table and view matching `filter`, then the index unit.
    ///
    /// A target whose columns can not be read is reported in
    /// [`GenerationReport::skipped`], a unit whose file can not be written in
    /// [`GenerationReport::failed`], and the run continues either way. Type
    /// names that collide after sanitizing get a numeric suffix.
    pub fn generate_all(&self, filter: &str, namespace_by_kind: bool) -> Result<GenerationReport> {
        ensure_dest_folder(&self.options.output)?;
        let mut report = GenerationReport::default();
        let mut taken = HashSet::from([self.index_type_name()]);

        for target in list_targets(self.conn, filter)? {
            let output = self.output_for(&target, namespace_by_kind);
            let type_name = unique_type_name(&mut taken, sanitize_ident(&output.type_name(&target.name)));
            let mut unit = match self.render_as(&target, None, &output, type_name) {
                Ok(unit) => unit,
                Err(e) => {
                    warn!("Skipping {} '{}': {}", target.kind, target.name, e);
                    report.skipped.push(target);
                    continue;
                }
            };
            unit.written = write_unit(&unit.path, &unit.text);
            if unit.written {
                trace!("Created {} for {} '{}'", unit.path.display(), target.kind, target.name);
                report.created.push(unit);
            } else {
                report.failed.push(unit);
            }
        }

        report.index = self.write_index(&report.created);

        info!(
            "Created {} units in {}",
            report.created.len(),
            self.options.output.dest_folder.display()
        );
        if !report.failed.is_empty() {
            warn!("{} units could not be written", report.failed.len());
        }
        if !report.skipped.is_empty() {
            warn!("{} tables or views were skipped", report.skipped.len());
        }
        Ok(report)
    }

    /// Text of the index unit listing `units`
    pub fn render_index(&self, units: &[GeneratedUnit]) -> (String, String) {
        let output = &self.options.output;
        let index_name = self.index_type_name();
        let entries: Vec<IndexEntry> = units
            .iter()
            .map(|unit| IndexEntry {
                type_name: unit.type_name.clone(),
                file_name: output.file_name(bare_ident(&unit.type_name)),
            })
            .collect();
        let text = emit_index(&index_name, &entries, &self.options);
        (index_name, text)
    }

    fn index_type_name(&self) -> String {
        sanitize_ident(&self.options.output.type_name(INDEX_BASE_NAME))
    }

    fn write_index(&self, units: &[GeneratedUnit]) -> Option<PathBuf> {
        let (index_name, text) = self.render_index(units);
        let path = self.options.output.path_for(bare_ident(&index_name));
        if write_unit(&path, &text) {
            trace!("Created index {}", path.display());
            Some(path)
        } else {
            None
        }
    }
}

fn ensure_dest_folder(output: &OutputOptions) -> Result<()> {
    if !output.dest_folder.exists() {
        debug!("Creating output folder {}", output.dest_folder.display());
        fs::create_dir_all(&output.dest_folder)?;
    }
    Ok(())
}

/// Reserve `type_name`, or the first free `<type_name>_<n>` when it is taken
fn unique_type_name(taken: &mut HashSet<String>, type_name: String) -> String {
    if taken.insert(type_name.clone()) {
        return type_name;
    }
    let bare = bare_ident(&type_name).to_string();
    let mut n = 2;
    loop {
        let candidate = sanitize_ident(&format!("{}_{}", bare, n));
        if taken.insert(candidate.clone()) {
            warn!("Type name '{}' is already used; using '{}'", type_name, candidate);
            return candidate;
        }
        n += 1;
    }
}

/// Write one unit; a failure is reported and swallowed
fn write_unit(path: &std::path::Path, text: &str) -> bool {
    match fs::write(path, text) {
        Ok(()) => true,
        Err(e) => {
            warn!("Could not open {} for writing: {}", path.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TargetKind;
    use tempfile::TempDir;

    fn schema() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Person (id INTEGER, name TEXT, bio CLOB);
             CREATE VIEW PersonNames AS SELECT name FROM Person;",
        )
        .unwrap();
        conn
    }

    fn options_in(dir: &TempDir) -> GenerationOptions {
        let mut options = GenerationOptions::default();
        options.output.dest_folder = dir.path().join("SQL");
        options
    }

    #[test]
    fn test_generate_all_namespaced() {
        let conn = schema();
        let dir = TempDir::new().unwrap();
        let generator = Generator::new(&conn, options_in(&dir));

        let report = generator.generate_all("", true).unwrap();
        let names: Vec<_> = report.created.iter().map(|u| u.type_name.as_str()).collect();
        assert_eq!(names, vec!["sql_table_Person", "sql_view_PersonNames"]);
        assert!(report.is_complete());

        let index = report.index.unwrap();
        assert_eq!(index.file_name().unwrap(), "sql_Master_Header.rs");
        let index_text = fs::read_to_string(index).unwrap();
        assert!(index_text.contains("pub mod sql_table_Person;"));
        assert!(dir.path().join("SQL/sql_view_PersonNames.rs").exists());
    }

    #[test]
    fn test_generate_all_flat_names() {
        let conn = schema();
        let dir = TempDir::new().unwrap();
        let generator = Generator::new(&conn, options_in(&dir));

        let report = generator.generate_all("AND type = 'table'", false).unwrap();
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.created[0].type_name, "sql_Person");
    }

    #[test]
    fn test_generate_with_query() {
        let conn = schema();
        let dir = TempDir::new().unwrap();
        let generator = Generator::new(&conn, options_in(&dir));
        let target = Target {
            kind: TargetKind::Table,
            name: "Person".to_string(),
        };

        let unit = generator
            .generate_with_query(&target, Some("SELECT id, name FROM Person"))
            .unwrap();
        assert!(unit.written);
        assert!(unit.text.contains("String::from(\"id, name\")"));
        assert!(!unit.text.contains("bio"));
    }

    #[test]
    fn test_unwritable_unit_is_reported() {
        let conn = schema();
        let dir = TempDir::new().unwrap();
        let options = options_in(&dir);
        fs::create_dir_all(&options.output.dest_folder).unwrap();
        // A directory where the file should go makes the write fail
        fs::create_dir(options.output.dest_folder.join("sql_table_Person.rs")).unwrap();

        let generator = Generator::new(&conn, options);
        let report = generator.generate_all("", true).unwrap();
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].type_name, "sql_table_Person");
        assert_eq!(report.created.len(), 1);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_unreadable_target_is_skipped() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Gone (x INTEGER);
             CREATE VIEW Broken AS SELECT x FROM Gone;
             CREATE TABLE Person (id INTEGER, name TEXT);
             DROP TABLE Gone;",
        )
        .unwrap();
        let dir = TempDir::new().unwrap();
        let generator = Generator::new(&conn, options_in(&dir));

        let report = generator.generate_all("", true).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "Broken");
        assert_eq!(report.created.len(), 1);
        assert!(report.created[0].written);
        assert!(!report.is_complete());

        let index_text = fs::read_to_string(report.index.unwrap()).unwrap();
        assert!(index_text.contains("pub mod sql_table_Person;"));
        assert!(!index_text.contains("Broken"));
    }

    #[test]
    fn test_colliding_type_names() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE \"a b\" (id INTEGER);
             CREATE TABLE a_b (name TEXT);
             CREATE TABLE Master_Header (id INTEGER);",
        )
        .unwrap();
        let dir = TempDir::new().unwrap();
        let generator = Generator::new(&conn, options_in(&dir));

        let report = generator.generate_all("", false).unwrap();
        let names: Vec<_> = report.created.iter().map(|u| u.type_name.as_str()).collect();
        assert_eq!(names, vec!["sql_Master_Header_2", "sql_a_b", "sql_a_b_2"]);
        assert!(report.is_complete());

        let out = dir.path().join("SQL");
        assert!(fs::read_to_string(out.join("sql_a_b.rs")).unwrap().contains("\"a b\""));
        assert!(fs::read_to_string(out.join("sql_a_b_2.rs")).unwrap().contains("a_b"));
        let index_text = fs::read_to_string(report.index.unwrap()).unwrap();
        assert_eq!(index_text.matches("pub mod sql_a_b;").count(), 1);
        assert!(index_text.contains("pub mod sql_a_b_2;"));
        assert!(index_text.contains("pub mod sql_Master_Header_2;"));
    }
}
