use std::fmt;

/// Column names containing this character are skipped during generation.
///
/// Some catalog views expose synthetic columns such as `sqlite_master:1`
/// whose names can not be mapped onto a record field. The filter also drops
/// a legitimately named column that happens to contain the marker.
pub const DISALLOWED_COLUMN_MARKER: char = ':';

/// Semantic type a declared column type resolves to.
///
/// The first group is the full SQLite sub-type taxonomy. The `Basic*`
/// variants are the only results of the basic-types-only policy, apart from
/// [`SemanticType::Blob`] and [`SemanticType::Clob`], which have no basic
/// equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    // Integer family
    Integer,
    Int,
    Int2,
    Int8,
    Tinyint,
    Smallint,
    Mediumint,
    Bigint,
    UBigint,
    Boolean,
    // Real family
    Real,
    Double,
    DoublePrecision,
    Float,
    Numeric,
    Decimal,
    // Temporal
    Date,
    Datetime,
    // Large objects
    Blob,
    Clob,
    // Narrow text
    Text,
    Character,
    Varchar,
    // Wide text
    Nchar,
    Nvarchar,
    // Basic-types-only policy
    BasicInt,
    BasicDouble,
    BasicString,
    BasicWideString,
}

impl SemanticType {
    /// Fallback for absent or unrecognized declared types
    pub const FALLBACK: SemanticType = SemanticType::Text;

    /// Type name used for the field in a generated record.
    ///
    /// Sub-type names resolve through the aliases in `sqlite_record_builder::types`;
    /// `Text` resolves to the unit's own `StrType` alias.
    pub fn rust_type(self) -> &'static str {
        match self {
            SemanticType::Integer => "Integer",
            SemanticType::Int => "Int",
            SemanticType::Int2 => "Int2",
            SemanticType::Int8 => "Int8",
            SemanticType::Tinyint => "Tinyint",
            SemanticType::Smallint => "Smallint",
            SemanticType::Mediumint => "Mediumint",
            SemanticType::Bigint => "Bigint",
            SemanticType::UBigint => "UBigint",
            SemanticType::Boolean => "Boolean",
            SemanticType::Real => "Real",
            SemanticType::Double => "Double",
            SemanticType::DoublePrecision => "DoublePrcsn",
            SemanticType::Float => "Float",
            SemanticType::Numeric => "Numeric",
            SemanticType::Decimal => "Decimal",
            SemanticType::Date => "Date",
            SemanticType::Datetime => "Datetime",
            SemanticType::Blob => "Blob",
            SemanticType::Clob => "Clob",
            SemanticType::Text => "Text",
            SemanticType::Character => "Character",
            SemanticType::Varchar => "Varchar",
            SemanticType::Nchar => "Nchar",
            SemanticType::Nvarchar => "Nvarchar",
            SemanticType::BasicInt => "i32",
            SemanticType::BasicDouble => "f64",
            SemanticType::BasicString => "String",
            SemanticType::BasicWideString => "WideString",
        }
    }

    /// True for the types written quoted by the stream contract
    pub fn is_text(self) -> bool {
        matches!(
            self,
            SemanticType::Text
                | SemanticType::Character
                | SemanticType::Varchar
                | SemanticType::Nchar
                | SemanticType::Nvarchar
                | SemanticType::Clob
                | SemanticType::BasicString
                | SemanticType::BasicWideString
        )
    }

    pub fn is_wide_text(self) -> bool {
        matches!(
            self,
            SemanticType::Nchar | SemanticType::Nvarchar | SemanticType::BasicWideString
        )
    }

    /// Whether the field type is `Copy`
    pub fn is_copy(self) -> bool {
        !self.is_text() && self != SemanticType::Blob
    }

    /// True for the four results of the basic-types-only policy
    pub fn is_basic(self) -> bool {
        matches!(
            self,
            SemanticType::BasicInt
                | SemanticType::BasicDouble
                | SemanticType::BasicString
                | SemanticType::BasicWideString
        )
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rust_type())
    }
}

/// Catalog kind of a generation target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetKind {
    Table,
    View,
}

impl TargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Table => "table",
            TargetKind::View => "view",
        }
    }

    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "table" => Some(TargetKind::Table),
            "view" => Some(TargetKind::View),
            _ => None,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table or view enumerated from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub kind: TargetKind,
    pub name: String,
}

/// One column of a query's result shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub declared_type: Option<String>,
    pub ordinal: usize,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, declared_type: Option<&str>, ordinal: usize) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.map(str::to_string),
            ordinal,
        }
    }

    /// Whether the column is dropped by the [`DISALLOWED_COLUMN_MARKER`] filter
    pub fn is_synthetic(&self) -> bool {
        self.name.contains(DISALLOWED_COLUMN_MARKER)
    }
}

/// Resolved shape of one generation target.
///
/// `columns` and `types` are parallel and ordered by ordinal position.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDescriptor {
    pub name: String,
    pub kind: TargetKind,
    pub columns: Vec<ColumnDescriptor>,
    pub types: Vec<SemanticType>,
}

impl TableDescriptor {
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Columns paired with their resolved types
    pub fn fields(&self) -> impl Iterator<Item = (&ColumnDescriptor, SemanticType)> {
        self.columns.iter().zip(self.types.iter().copied())
    }

    pub fn first_column(&self) -> Option<&str> {
        self.columns.first().map(|c| c.name.as_str())
    }

    pub fn last_column(&self) -> Option<&str> {
        if self.columns.len() < 2 {
            return None;
        }
        self.columns.last().map(|c| c.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_column() {
        assert!(ColumnDescriptor::new("sqlite_master:1", None, 0).is_synthetic());
        assert!(!ColumnDescriptor::new("name", Some("TEXT"), 1).is_synthetic());
    }

    #[test]
    fn test_target_kind_parse() {
        assert_eq!(TargetKind::parse("table"), Some(TargetKind::Table));
        assert_eq!(TargetKind::parse("view"), Some(TargetKind::View));
        assert_eq!(TargetKind::parse("index"), None);
        assert_eq!(TargetKind::View.to_string(), "view");
    }

    #[test]
    fn test_text_classification() {
        assert!(SemanticType::Clob.is_text());
        assert!(!SemanticType::Blob.is_text());
        assert!(SemanticType::Nvarchar.is_wide_text());
        assert!(!SemanticType::Varchar.is_wide_text());
        assert_eq!(SemanticType::DoublePrecision.rust_type(), "DoublePrcsn");
        assert!(SemanticType::Datetime.is_copy());
        assert!(!SemanticType::Clob.is_copy());
        assert!(!SemanticType::Blob.is_copy());
    }
}
