//! Generation options: string representation, feature toggles and output placement

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::schema::TypeMappingPolicy;

/// Text type used by generated records, and the syntax to produce it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrOptions {
    /// `StrType` of the generated unit
    pub str_type: String,
    /// Function rendering a field as an SQL literal of `str_type`
    pub to_str: String,
    /// Code placed before a string literal to make a `str_type`
    pub literal_pre: String,
    /// Code placed after a string literal to make a `str_type`
    pub literal_post: String,
    /// `use` line `str_type` needs, if any
    pub str_use: String,
}

impl StrOptions {
    /// `String` text
    pub fn string() -> Self {
        Self {
            str_type: "String".to_string(),
            to_str: "sql_literal".to_string(),
            literal_pre: "String::from(".to_string(),
            literal_post: ")".to_string(),
            str_use: String::new(),
        }
    }

    /// UTF-16 `WideString` text
    pub fn wide_string() -> Self {
        Self {
            str_type: "WideString".to_string(),
            to_str: "sql_wliteral".to_string(),
            literal_pre: "WideString::from(".to_string(),
            literal_post: ")".to_string(),
            str_use: "use sqlite_record_builder::WideString;".to_string(),
        }
    }

    /// Wrap a Rust string literal (including its quotes) into `str_type`
    pub fn literal(&self, quoted: &str) -> String {
        format!("{}{}{}", self.literal_pre, quoted, self.literal_post)
    }
}

impl Default for StrOptions {
    fn default() -> Self {
        Self::string()
    }
}

/// Feature toggles for the emitted record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureOptions {
    /// Written between fields by the stream output
    pub delimiter: String,
    pub public_members: bool,
    /// Ignored when members are private
    pub exclude_get: bool,
    pub exclude_set: bool,
    pub exclude_stream: bool,
    pub exclude_comments: bool,
    pub exclude_table_interface: bool,
    pub basic_types_only: bool,
    /// No smoke-test block in the index unit
    pub exclude_index_example: bool,
    /// Emit the smoke-test block inside a block comment
    pub comment_out_example: bool,
}

impl FeatureOptions {
    /// Everything, with private members
    pub fn max() -> Self {
        Self {
            delimiter: ",".to_string(),
            public_members: false,
            exclude_get: false,
            exclude_set: false,
            exclude_stream: false,
            exclude_comments: false,
            exclude_table_interface: false,
            basic_types_only: false,
            exclude_index_example: false,
            comment_out_example: true,
        }
    }

    /// Public members and the table interface only
    pub fn min() -> Self {
        Self {
            public_members: true,
            exclude_get: true,
            exclude_set: true,
            exclude_stream: true,
            exclude_comments: true,
            ..Self::max()
        }
    }

    /// Public data members only; not usable with `Table`
    pub fn vars() -> Self {
        Self {
            exclude_table_interface: true,
            ..Self::min()
        }
    }

    pub fn policy(&self) -> TypeMappingPolicy {
        TypeMappingPolicy {
            basic_types_only: self.basic_types_only,
        }
    }

    /// Get accessors are always emitted for private members
    pub fn emit_get(&self) -> bool {
        !self.exclude_get || !self.public_members
    }
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self::max()
    }
}

/// Where units are written and how they are named
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    pub dest_folder: PathBuf,
    pub prefix: String,
    pub postfix: String,
    pub file_ext: String,
    /// Additional `use` path for every unit
    pub extra_use: String,
}

impl OutputOptions {
    /// Units in the `SQL` sub folder
    pub fn sql_dir() -> Self {
        Self {
            dest_folder: PathBuf::from("SQL"),
            prefix: "sql_".to_string(),
            postfix: String::new(),
            file_ext: "rs".to_string(),
            extra_use: "sqlite_record_builder::prelude::*".to_string(),
        }
    }

    /// Units in the current folder
    pub fn base_dir() -> Self {
        Self {
            dest_folder: PathBuf::from("."),
            ..Self::sql_dir()
        }
    }

    pub fn type_name(&self, target: &str) -> String {
        format!("{}{}{}", self.prefix, target, self.postfix)
    }

    pub fn file_name(&self, type_name: &str) -> String {
        format!("{}.{}", type_name, self.file_ext)
    }

    pub fn path_for(&self, type_name: &str) -> PathBuf {
        self.dest_folder.join(self.file_name(type_name))
    }

    /// The extra `use` as a full statement, or empty
    pub fn extra_use_line(&self) -> String {
        let path = self.extra_use.trim().trim_start_matches("use ").trim_end_matches(';');
        if path.is_empty() {
            String::new()
        } else {
            format!("use {};", path)
        }
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::sql_dir()
    }
}

/// All three option groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub strings: StrOptions,
    pub features: FeatureOptions,
    pub output: OutputOptions,
}

impl GenerationOptions {
    pub fn new(strings: StrOptions, features: FeatureOptions, output: OutputOptions) -> Self {
        Self {
            strings,
            features,
            output,
        }
    }

    /// Load options from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
