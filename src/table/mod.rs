pub mod container;
pub mod database;
pub mod record;

pub use container::{select_query, Table, TableArgs, TableBase, TableStreamBase};
pub use database::{expand_env_vars, ActionIfOpen, Database};
pub use record::{FieldSink, NarrowSink, Record, RecordStream, WideDisplay, WideSink};
