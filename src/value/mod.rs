pub mod datetime;
pub mod extract;
pub mod lob;
pub mod render;
pub mod sql_value;
pub mod text;
pub mod types;

pub use datetime::{Date, Datetime};
pub use extract::RowReader;
pub use lob::{Blob, Clob};
pub use render::{quote_literal, sql_literal, sql_text, sql_wliteral, sql_wtext, ToSqlText};
pub use sql_value::{FromSqlValue, SqlValue};
pub use text::{is_wide_declared, SqlString, WideString};
