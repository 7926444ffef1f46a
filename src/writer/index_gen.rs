//! The index unit: one module declaration per generated record, plus an
//! optional smoke-test block that populates and prints every table

use super::options::GenerationOptions;
use super::record_gen::{bare_ident, guard_token};
use super::source::{Section, SourceBuilder};

/// Base name of the index unit before prefix and postfix are applied
pub const INDEX_BASE_NAME: &str = "Master_Header";

/// A unit listed by the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub type_name: String,
    pub file_name: String,
}

/// Whether the smoke-test block can be emitted for these options
pub fn emits_example(options: &GenerationOptions) -> bool {
    let features = &options.features;
    !features.exclude_index_example && !features.exclude_table_interface && !features.exclude_stream
}

pub fn emit_index(index_name: &str, entries: &[IndexEntry], options: &GenerationOptions) -> String {
    let guard = guard_token(index_name);
    let comments = !options.features.exclude_comments;
    let mut src = SourceBuilder::new();

    if comments {
        src.section("header")
            .line("// Index of every generated record unit. Declare this file as a module to")
            .line("// bring all of them into scope.");
    }
    src.section("guard").line(format!("// {}", guard));

    let modules = src.section("modules");
    for entry in entries {
        modules
            .line("#[allow(non_snake_case)]")
            .line(format!("#[path = {:?}]", entry.file_name))
            .line(format!("pub mod {};", entry.type_name));
    }

    if emits_example(options) && !entries.is_empty() {
        emit_example(src.section("example"), entries, options);
    }

    src.section("guard_end").line(format!("// end of {}", guard));
    src.build()
}

fn emit_example(s: &mut Section, entries: &[IndexEntry], options: &GenerationOptions) {
    let commented = options.features.comment_out_example;
    if commented {
        s.line("/*");
    }
    s.line("// Populates a Table for every generated record and prints each one.")
        .line("// Useful as a first check that every unit compiles and reads its rows.")
        .line("use std::collections::BTreeMap;");
    let extra = options.output.extra_use_line();
    if !extra.is_empty() {
        s.line(extra);
    }
    s.blank()
        .line("pub fn test_populating_all_tables(")
        .line("    db: &Database,")
        .line(") -> sqlite_record_builder::Result<BTreeMap<String, Box<dyn TableStreamBase + '_>>> {")
        .line("    let mut tables: BTreeMap<String, Box<dyn TableStreamBase + '_>> = BTreeMap::new();");
    for entry in entries {
        s.line(format!(
            "    tables.insert({:?}.to_string(), Box::new(Table::<{}::{}>::new(db, TableArgs::new())?));",
            bare_ident(&entry.type_name),
            entry.type_name,
            entry.type_name
        ));
    }
    s.line("    Ok(tables)")
        .line("}")
        .blank()
        .line("pub fn test_all_tables(db: &Database) -> sqlite_record_builder::Result<()> {")
        .line("    for (name, table) in test_populating_all_tables(db)? {")
        .line("        let mut text = String::new();")
        .line("        table")
        .line("            .out(&mut text)")
        .line("            .map_err(std::io::Error::other)?;")
        .line("        println!(\"{} ({} rows)\", name, table.row_count());")
        .line("        print!(\"{}\", text);")
        .line("    }")
        .line("    Ok(())")
        .line("}");
    if commented {
        s.line("*/");
    }
}
