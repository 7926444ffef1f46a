//! Declared column type → [`SemanticType`] resolution

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::types::SemanticType;

/// How a declared type is matched against the normalized (uppercased) input
#[derive(Debug, Clone, Copy)]
enum Pattern {
    Exact(&'static str),
    Prefix(&'static str),
}

impl Pattern {
    fn matches(self, declared: &str) -> bool {
        match self {
            Pattern::Exact(token) => declared == token,
            Pattern::Prefix(token) => declared.starts_with(token),
        }
    }
}

/// Full sub-type taxonomy. Longer prefixes come before any prefix they contain.
const FULL_PATTERNS: &[(Pattern, SemanticType)] = &[
    (Pattern::Exact("INTEGER"), SemanticType::Integer),
    (Pattern::Exact("INT"), SemanticType::Int),
    (Pattern::Exact("INT2"), SemanticType::Int2),
    (Pattern::Exact("INT8"), SemanticType::Int8),
    (Pattern::Exact("TINYINT"), SemanticType::Tinyint),
    (Pattern::Exact("SMALLINT"), SemanticType::Smallint),
    (Pattern::Exact("MEDIUMINT"), SemanticType::Mediumint),
    (Pattern::Exact("BOOLEAN"), SemanticType::Boolean),
    (Pattern::Exact("BIGINT"), SemanticType::Bigint),
    (Pattern::Exact("UNSIGNED BIG INT"), SemanticType::UBigint),
    (Pattern::Exact("DATE"), SemanticType::Date),
    (Pattern::Exact("DATETIME"), SemanticType::Datetime),
    (Pattern::Exact("NUMERIC"), SemanticType::Numeric),
    (Pattern::Prefix("DECIMAL"), SemanticType::Decimal),
    (Pattern::Exact("REAL"), SemanticType::Real),
    (Pattern::Exact("DOUBLE PRECISION"), SemanticType::DoublePrecision),
    (Pattern::Exact("DOUBLE"), SemanticType::Double),
    (Pattern::Exact("FLOAT"), SemanticType::Float),
    (Pattern::Exact("TEXT"), SemanticType::Text),
    (Pattern::Prefix("NATIVE CHARACTER"), SemanticType::Nchar),
    (Pattern::Prefix("VARYING CHARACTER"), SemanticType::Varchar),
    (Pattern::Prefix("CHARACTER"), SemanticType::Character),
    (Pattern::Prefix("NVARCHAR"), SemanticType::Nvarchar),
    (Pattern::Prefix("VARCHAR"), SemanticType::Varchar),
    (Pattern::Prefix("NCHAR"), SemanticType::Nchar),
];

/// Basic-types-only reduction, mirroring SQLite's type affinity
const BASIC_PATTERNS: &[(Pattern, SemanticType)] = &[
    (Pattern::Exact("INTEGER"), SemanticType::BasicInt),
    (Pattern::Exact("INT"), SemanticType::BasicInt),
    (Pattern::Exact("INT2"), SemanticType::BasicInt),
    (Pattern::Exact("INT8"), SemanticType::BasicInt),
    (Pattern::Exact("TINYINT"), SemanticType::BasicInt),
    (Pattern::Exact("SMALLINT"), SemanticType::BasicInt),
    (Pattern::Exact("MEDIUMINT"), SemanticType::BasicInt),
    (Pattern::Exact("BIGINT"), SemanticType::BasicInt),
    (Pattern::Exact("UNSIGNED BIG INT"), SemanticType::BasicInt),
    (Pattern::Exact("REAL"), SemanticType::BasicDouble),
    (Pattern::Exact("DOUBLE PRECISION"), SemanticType::BasicDouble),
    (Pattern::Exact("DOUBLE"), SemanticType::BasicDouble),
    (Pattern::Exact("FLOAT"), SemanticType::BasicDouble),
    (Pattern::Prefix("DECIMAL"), SemanticType::BasicDouble),
    (Pattern::Exact("NUMERIC"), SemanticType::BasicDouble),
    (Pattern::Exact("BOOLEAN"), SemanticType::BasicDouble),
    (Pattern::Exact("DATE"), SemanticType::BasicDouble),
    (Pattern::Exact("DATETIME"), SemanticType::BasicDouble),
    (Pattern::Exact("TEXT"), SemanticType::BasicString),
    (Pattern::Prefix("NATIVE CHARACTER"), SemanticType::BasicWideString),
    (Pattern::Prefix("VARYING CHARACTER"), SemanticType::BasicString),
    (Pattern::Prefix("CHARACTER"), SemanticType::BasicString),
    (Pattern::Prefix("NVARCHAR"), SemanticType::BasicWideString),
    (Pattern::Prefix("VARCHAR"), SemanticType::BasicString),
    (Pattern::Prefix("NCHAR"), SemanticType::BasicWideString),
];

/// Type mapping policy used by the resolver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMappingPolicy {
    /// Collapse every declared type onto `i32`, `f64`, `String` or `WideString`
    pub basic_types_only: bool,
}

impl TypeMappingPolicy {
    pub const FULL: TypeMappingPolicy = TypeMappingPolicy {
        basic_types_only: false,
    };
    pub const BASIC: TypeMappingPolicy = TypeMappingPolicy {
        basic_types_only: true,
    };

    fn patterns(self) -> &'static [(Pattern, SemanticType)] {
        if self.basic_types_only {
            BASIC_PATTERNS
        } else {
            FULL_PATTERNS
        }
    }

    /// Resolve a declared type. Total: every input yields a type, and anything
    /// unmatched falls back to [`SemanticType::FALLBACK`].
    pub fn resolve(self, declared: Option<&str>) -> SemanticType {
        let Some(declared) = declared else {
            return SemanticType::FALLBACK;
        };
        let normalized = declared.trim().to_ascii_uppercase();

        // BLOB and CLOB have no reduction to a basic type.
        match normalized.as_str() {
            "BLOB" => return SemanticType::Blob,
            "CLOB" => return SemanticType::Clob,
            _ => {}
        }

        self.patterns()
            .iter()
            .find(|(pattern, _)| pattern.matches(&normalized))
            .map(|(_, semantic)| *semantic)
            .unwrap_or(SemanticType::FALLBACK)
    }

    /// Resolve the type of one column, logging the decision.
    ///
    /// An absent declared type is expected for computed view columns and is
    /// only logged at debug level. An unrecognized one is logged as a warning.
    pub fn resolve_column(self, table: &str, column: &str, declared: Option<&str>) -> SemanticType {
        let semantic = self.resolve(declared);

        match declared {
            None => {
                debug!(
                    "No declared type for column '{}' in table/view '{}'; using default type '{}'",
                    column,
                    table,
                    SemanticType::FALLBACK
                );
            }
            Some(declared) if semantic == SemanticType::FALLBACK && !self.is_known(declared) => {
                warn!(
                    "Unknown declared type '{}' for column '{}' in table/view '{}'; using default type '{}'",
                    declared,
                    column,
                    table,
                    SemanticType::FALLBACK
                );
            }
            Some(_) => {
                trace!(
                    "Using type '{}' for column '{}' in table/view '{}'",
                    semantic,
                    column,
                    table
                );
            }
        }

        semantic
    }

    /// Whether a declared type matches a pattern (rather than falling back)
    pub fn is_known(self, declared: &str) -> bool {
        let normalized = declared.trim().to_ascii_uppercase();
        normalized == "BLOB"
            || normalized == "CLOB"
            || self
                .patterns()
                .iter()
                .any(|(pattern, _)| pattern.matches(&normalized))
    }
}
