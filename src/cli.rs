use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use crate::table::Database;
use crate::writer::{
    clean_output, remove_dest_folder, FeatureOptions, GenerationOptions, GenerationReport, Generator,
    StrOptions,
};

#[derive(Parser, Debug)]
#[command(name = "sqlite-record-builder")]
#[command(version, about = "Generate typed Rust record modules from a SQLite schema")]
pub struct Cli {
    /// Verbosity: 0 = none, 1 = error, 2 = warn, 3 = info, 4 = debug, 5 = detail
    #[arg(short, long, global = true, default_value_t = 3, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one record unit per table and view, plus an index unit
    Generate(GenerateArgs),

    /// List the tables and views that would be generated
    List {
        /// SQLite database file
        database: PathBuf,

        /// Extra predicate on sqlite_master, e.g. "AND name LIKE 'P%'"
        #[arg(short = 'w', long = "where")]
        filter: Option<String>,
    },
}

/// Text type of the generated records
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrTypeArg {
    /// UTF-8 `String`
    String,
    /// UTF-16 `WideString`
    Wstring,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// SQLite database file
    pub database: PathBuf,

    /// Extra predicate on sqlite_master, e.g. "AND name LIKE 'P%'"
    #[arg(short = 'w', long = "where")]
    pub filter: Option<String>,

    /// JSON options file used as the base; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Destination folder
    #[arg(short = 'f', long)]
    pub folder: Option<PathBuf>,

    /// Type and file name prefix
    #[arg(short = 'a', long)]
    pub prefix: Option<String>,

    /// Type and file name postfix
    #[arg(short = 'z', long)]
    pub postfix: Option<String>,

    /// File extension of the units
    #[arg(short = 'y', long)]
    pub fileext: Option<String>,

    /// Additional `use` path for every unit
    #[arg(short = 'i', long)]
    pub include: Option<String>,

    /// Text type of the generated records
    #[arg(short = 't', long, value_enum)]
    pub strtype: Option<StrTypeArg>,

    /// Delimiter written between fields by the stream output
    #[arg(short = 'e', long)]
    pub delimit: Option<String>,

    /// Make data members public
    #[arg(long)]
    pub public: bool,

    /// No get_ accessors (ignored unless members are public)
    #[arg(long)]
    pub xgetfnc: bool,

    /// No set_ accessors
    #[arg(long)]
    pub xsetfnc: bool,

    /// No stream output
    #[arg(long)]
    pub xstream: bool,

    /// No comments
    #[arg(long)]
    pub xcmmnt: bool,

    /// No Record implementation; records can not be used with Table
    #[arg(long)]
    pub xinterf: bool,

    /// Map every column to i32, f64, String or WideString (Blob and Clob are kept)
    #[arg(long)]
    pub basic_types: bool,

    /// No smoke-test block in the index unit
    #[arg(long)]
    pub xvalid: bool,

    /// Emit the index smoke-test block as live code instead of a comment
    #[arg(long)]
    pub live_valid: bool,

    /// Do not prefix names with the catalog kind (table_/view_)
    #[arg(long)]
    pub no_kind_prefix: bool,

    /// Delete existing prefix*postfix.ext files in the destination folder first
    #[arg(long)]
    pub clean: bool,

    /// Remove the destination folder first
    #[arg(long)]
    pub rmdir: bool,
}

impl GenerateArgs {
    /// Apply the explicit flags on top of `options`
    pub fn apply(&self, mut options: GenerationOptions) -> GenerationOptions {
        if let Some(strtype) = self.strtype {
            options.strings = match strtype {
                StrTypeArg::String => StrOptions::string(),
                StrTypeArg::Wstring => StrOptions::wide_string(),
            };
        }

        let features: &mut FeatureOptions = &mut options.features;
        if let Some(delimit) = &self.delimit {
            features.delimiter = delimit.clone();
        }
        features.public_members |= self.public;
        features.exclude_get |= self.xgetfnc;
        features.exclude_set |= self.xsetfnc;
        features.exclude_stream |= self.xstream;
        features.exclude_comments |= self.xcmmnt;
        features.exclude_table_interface |= self.xinterf;
        features.basic_types_only |= self.basic_types;
        features.exclude_index_example |= self.xvalid;
        if self.live_valid {
            features.comment_out_example = false;
        }

        let output = &mut options.output;
        if let Some(folder) = &self.folder {
            output.dest_folder = folder.clone();
        }
        if let Some(prefix) = &self.prefix {
            output.prefix = prefix.clone();
        }
        if let Some(postfix) = &self.postfix {
            output.postfix = postfix.clone();
        }
        if let Some(ext) = &self.fileext {
            output.file_ext = ext.trim_start_matches('.').to_string();
        }
        if let Some(include) = &self.include {
            output.extra_use = include.clone();
        }

        options
    }

    /// Open the database, then stage the destination folder and generate
    /// every unit. A missing database fails before any output is removed.
    pub fn run(&self, options: GenerationOptions) -> anyhow::Result<GenerationReport> {
        let db = Database::open(&self.database)
            .with_context(|| format!("Failed to open database {:?}", self.database))?;

        if self.rmdir && remove_dest_folder(&options.output)? {
            info!("Removed {:?}", options.output.dest_folder);
        }
        if self.clean {
            let deleted = clean_output(&options.output)?;
            info!("Deleted {} existing units", deleted);
        }

        let generator = Generator::new(db.connection()?, options);
        generator
            .generate_all(self.filter.as_deref().unwrap_or(""), !self.no_kind_prefix)
            .context("Generation failed")
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
