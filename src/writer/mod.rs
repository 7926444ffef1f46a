pub mod files;
pub mod generator;
pub mod index_gen;
pub mod options;
pub mod record_gen;
pub mod source;

pub use files::{clean_output, remove_dest_folder};
pub use generator::{GeneratedUnit, GenerationReport, Generator};
pub use index_gen::{emit_index, IndexEntry, INDEX_BASE_NAME};
pub use options::{FeatureOptions, GenerationOptions, OutputOptions, StrOptions};
pub use record_gen::{emit_record, field_specs, guard_token, sanitize_ident, FieldSpec};
pub use source::{Section, SourceBuilder};
