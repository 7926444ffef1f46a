//! Record unit emission for one table or view

use std::collections::HashSet;

use super::options::{FeatureOptions, GenerationOptions};
use super::source::{Section, SourceBuilder};
use crate::schema::{quote_identifier, SemanticType, TableDescriptor};

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that can not be raw identifiers
const RESERVED: &[&str] = &["_", "crate", "self", "Self", "super"];

/// Turn an SQL name into a Rust identifier.
///
/// Characters other than ASCII alphanumerics and `_` become `_`, a leading
/// digit gets a `_` prefix, and keywords become raw identifiers.
pub fn sanitize_ident(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if RESERVED.contains(&ident.as_str()) {
        ident.push('_');
    } else if KEYWORDS.contains(&ident.as_str()) {
        ident.insert_str(0, "r#");
    }
    ident
}

/// Identifier without a raw prefix, for composing other names
pub fn bare_ident(ident: &str) -> &str {
    ident.trim_start_matches("r#")
}

/// Marker token placed at the top and bottom of a unit
pub fn guard_token(type_name: &str) -> String {
    format!("{}_H", bare_ident(type_name).to_uppercase())
}

/// Rust string literal for `s`
fn rust_literal(s: &str) -> String {
    format!("{:?}", s)
}

/// One emitted field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column name as the database spells it
    pub column: String,
    /// Field identifier
    pub ident: String,
    pub semantic: SemanticType,
}

impl FieldSpec {
    pub fn getter(&self) -> String {
        format!("get_{}", bare_ident(&self.ident))
    }

    pub fn setter(&self) -> String {
        format!("set_{}", bare_ident(&self.ident))
    }

    pub fn rust_type(&self) -> &'static str {
        self.semantic.rust_type()
    }

    /// Field value for `SqlValue::from`, cloned unless `Copy`
    fn owned_value(&self) -> String {
        if self.semantic.is_copy() {
            format!("self.{}", self.ident)
        } else {
            format!("self.{}.clone()", self.ident)
        }
    }
}

/// Fields of a descriptor, with identifiers made unique
pub fn field_specs(desc: &TableDescriptor) -> Vec<FieldSpec> {
    let mut seen = HashSet::new();
    desc.fields()
        .map(|(column, semantic)| {
            let base = sanitize_ident(&column.name);
            let mut ident = base.clone();
            let mut n = 2;
            while !seen.insert(ident.clone()) {
                ident = format!("{}_{}", bare_ident(&base), n);
                n += 1;
            }
            FieldSpec {
                column: column.name.clone(),
                ident,
                semantic,
            }
        })
        .collect()
}

/// Emit the complete record unit for `desc`
pub fn emit_record(desc: &TableDescriptor, type_name: &str, options: &GenerationOptions) -> String {
    let fields = field_specs(desc);
    let features = &options.features;
    let comments = !features.exclude_comments;
    let guard = guard_token(type_name);
    let mut src = SourceBuilder::new();

    if comments {
        emit_header(src.section("header"), desc, type_name, &fields, features);
    }
    src.section("guard").line(format!("// {}", guard));
    emit_uses(src.section("uses"), options);
    src.section("aliases")
        .line(format!("pub type StrType = {};", options.strings.str_type))
        .line("pub type Text = StrType;");
    emit_struct(src.section("struct"), type_name, &fields, features);
    emit_constructors(src.section("constructors"), type_name, features);
    if !features.exclude_table_interface {
        emit_record_impl(src.section("record"), desc, type_name, &fields, options);
    }
    emit_accessors(src.section("accessors"), type_name, &fields, features);
    if !features.exclude_stream {
        emit_stream(src.section("stream"), type_name, &fields, features);
    }
    src.section("guard_end").line(format!("// end of {}", guard));

    src.build()
}

fn emit_header(
    s: &mut Section,
    desc: &TableDescriptor,
    type_name: &str,
    fields: &[FieldSpec],
    features: &FeatureOptions,
) {
    let access = |field: &FieldSpec| {
        if features.emit_get() {
            format!("{}()", field.getter())
        } else {
            field.ident.clone()
        }
    };

    s.line(format!(
        "// Record for {} \"{}\", generated by sqlite-record-builder. Do not edit.",
        desc.kind, desc.name
    ));
    if features.exclude_table_interface {
        return;
    }
    s.line("//")
        .line("// Example usage (Table container):")
        .line("//     let db = Database::open(\"mydatabase.db\")?;")
        .line(format!(
            "//     let my_tbl: Table<{}> = Table::new(&db, TableArgs::new())?;",
            type_name
        ));
    if !features.exclude_stream {
        s.line("//     for row in &my_tbl {")
            .line("//         println!(\"{}\", row);")
            .line("//     }");
    }
    if let Some(first) = fields.first() {
        s.line("//     for i in 0..my_tbl.len() {")
            .line(format!("//         println!(\"{{:?}}\", my_tbl[i].{});", access(first)))
            .line("//     }");
    }
    if fields.len() > 1 {
        if let Some(last) = fields.last() {
            s.line("//     for row in my_tbl.iter() {")
                .line(format!("//         println!(\"{{:?}}\", row.{});", access(last)))
                .line("//     }");
        }
    }
}

fn emit_uses(s: &mut Section, options: &GenerationOptions) {
    if !options.features.exclude_stream {
        s.line("use std::fmt;");
    }
    let extra = options.output.extra_use_line();
    if !extra.is_empty() {
        s.line(extra.clone());
    }
    let str_use = options.strings.str_use.trim();
    if !str_use.is_empty() && str_use != extra {
        s.line(str_use);
    }
}

fn emit_struct(s: &mut Section, type_name: &str, fields: &[FieldSpec], features: &FeatureOptions) {
    let vis = if features.public_members { "pub " } else { "" };
    s.line("#[allow(non_camel_case_types)]")
        .line("#[derive(Debug, Clone, Default, PartialEq)]")
        .line(format!("pub struct {} {{", type_name));
    if !features.exclude_comments && !fields.is_empty() {
        s.line("    // A member variable for each field in the table");
    }
    for field in fields {
        s.line(format!("    {}{}: {},", vis, field.ident, field.rust_type()));
    }
    s.line("}");
}

fn emit_constructors(s: &mut Section, type_name: &str, features: &FeatureOptions) {
    let comments = !features.exclude_comments;
    s.line(format!("impl {} {{", type_name));
    if comments {
        s.line("    // Constructors");
    }
    s.line("    pub fn new() -> Self {")
        .line("        Self::default()")
        .line("    }");
    if !features.exclude_table_interface {
        s.blank();
        if comments {
            s.line("    /// Copies the fields shared with another (or the same) table/view, matched by column name");
        }
        s.line("    pub fn from_record<R: Record>(record: &R) -> Self {")
            .line("        let mut this = Self::default();")
            .line("        this.set_data(record);")
            .line("        this")
            .line("    }");
    }
    s.line("}");
}

fn emit_record_impl(
    s: &mut Section,
    desc: &TableDescriptor,
    type_name: &str,
    fields: &[FieldSpec],
    options: &GenerationOptions,
) {
    let strings = &options.strings;
    let column_names = fields
        .iter()
        .map(|f| f.column.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let select_names = fields
        .iter()
        .map(|f| quote_identifier(&f.column))
        .collect::<Vec<_>>()
        .join(", ");
    let column_list = fields
        .iter()
        .map(|f| rust_literal(&f.column))
        .collect::<Vec<_>>()
        .join(", ");

    s.line(format!("impl Record for {} {{", type_name));
    if !options.features.exclude_comments {
        s.line("    // Self-description and row extraction used by Table");
    }
    s.line("    type StrType = StrType;")
        .blank()
        .line("    fn table_name() -> StrType {")
        .line(format!("        {}", strings.literal(&rust_literal(&desc.name))))
        .line("    }")
        .blank()
        .line("    fn column_names() -> StrType {")
        .line(format!("        {}", strings.literal(&rust_literal(&column_names))))
        .line("    }")
        .blank()
        .line("    fn select_column_names() -> StrType {")
        .line(format!("        {}", strings.literal(&rust_literal(&select_names))))
        .line("    }")
        .blank()
        .line("    fn column_count() -> usize {")
        .line(format!("        {}", fields.len()))
        .line("    }")
        .blank()
        .line("    fn columns() -> &'static [&'static str] {")
        .line(format!("        &[{}]", column_list))
        .line("    }")
        .blank();

    // values
    s.line("    fn values(&self) -> StrType {");
    if fields.is_empty() {
        s.line("        StrType::new()");
    } else {
        s.line("        let mut values = StrType::new();");
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                s.line("        values += \",\";");
            }
            s.line(format!(
                "        values += &{}(&self.{});",
                strings.to_str, field.ident
            ));
        }
        s.line("        values");
    }
    s.line("    }").blank();

    // extract
    let row = if fields.is_empty() { "_row" } else { "row" };
    s.line(format!(
        "    fn extract(&mut self, {}: &mut RowReader<'_, '_>) -> sqlite_record_builder::Result<()> {{",
        row
    ));
    for field in fields {
        s.line(format!("        self.{} = row.read()?;", field.ident));
    }
    s.line("        Ok(())").line("    }").blank();

    // get_field
    if fields.is_empty() {
        s.line("    fn get_field(&self, _column: &str) -> Option<SqlValue> {")
            .line("        None")
            .line("    }")
            .blank()
            .line("    fn set_field(&mut self, _column: &str, _value: SqlValue) -> bool {")
            .line("        false")
            .line("    }");
    } else {
        s.line("    fn get_field(&self, column: &str) -> Option<SqlValue> {")
            .line("        match column {");
        for field in fields {
            s.line(format!(
                "            {} => Some(SqlValue::from({})),",
                rust_literal(&field.column),
                field.owned_value()
            ));
        }
        s.line("            _ => None,")
            .line("        }")
            .line("    }")
            .blank()
            .line("    fn set_field(&mut self, column: &str, value: SqlValue) -> bool {")
            .line("        match column {");
        for field in fields {
            s.line(format!(
                "            {} => self.{} = FromSqlValue::from_sql_value(value),",
                rust_literal(&field.column),
                field.ident
            ));
        }
        s.line("            _ => return false,")
            .line("        }")
            .line("        true")
            .line("    }");
    }
    s.line("}");
}

fn emit_accessors(s: &mut Section, type_name: &str, fields: &[FieldSpec], features: &FeatureOptions) {
    let emit_get = features.emit_get();
    let emit_set = !features.exclude_set;
    if fields.is_empty() || (!emit_get && !emit_set) {
        return;
    }
    let comments = !features.exclude_comments;

    s.line(format!("impl {} {{", type_name));
    if emit_get {
        if comments {
            if features.public_members {
                s.line("    // A get_ function for each field in the table.");
            } else {
                s.line("    // A get_ function for each field in the table, which allows read-only access to private member variables.");
            }
        }
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                s.blank();
            }
            s.line(format!(
                "    pub fn {}(&self) -> &{} {{",
                field.getter(),
                field.rust_type()
            ))
            .line(format!("        &self.{}", field.ident))
            .line("    }");
        }
    }
    if emit_set {
        if emit_get {
            s.blank();
        }
        if comments {
            s.line("    // A set_ function for each field in the table.");
        }
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                s.blank();
            }
            s.line(format!(
                "    pub fn {}(&mut self, value: {}) {{",
                field.setter(),
                field.rust_type()
            ))
            .line(format!("        self.{} = value;", field.ident))
            .line("    }");
        }
    }
    s.line("}");
}

fn emit_stream(s: &mut Section, type_name: &str, fields: &[FieldSpec], features: &FeatureOptions) {
    if !features.exclude_comments {
        s.line("// Delimited output used by Table::out, Display and WideDisplay");
    }
    let sink = if fields.is_empty() { "_sink" } else { "sink" };
    s.line(format!("impl RecordStream for {} {{", type_name))
        .line("    fn delimiter() -> &'static str {")
        .line(format!("        {}", rust_literal(&features.delimiter)))
        .line("    }")
        .blank()
        .line(format!(
            "    fn write_fields<S: FieldSink + ?Sized>(&self, {}: &mut S) -> fmt::Result {{",
            sink
        ));
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            s.line("        sink.delimit()?;");
        }
        let method = if field.semantic.is_text() { "quoted" } else { "field" };
        s.line(format!("        sink.{}(&self.{})?;", method, field.ident));
    }
    s.line("        Ok(())")
        .line("    }")
        .line("}")
        .blank()
        .line(format!("impl fmt::Display for {} {{", type_name))
        .line("    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {")
        .line("        self.write_fields(&mut NarrowSink::new(f, Self::delimiter()))")
        .line("    }")
        .line("}")
        .blank()
        .line(format!("impl WideDisplay for {} {{", type_name))
        .line("    fn fmt_wide(&self, out: &mut WideString) -> fmt::Result {")
        .line("        self.write_fields(&mut WideSink::new(out, Self::delimiter()))")
        .line("    }")
        .line("}");
}
