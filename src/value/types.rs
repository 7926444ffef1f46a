//! Field types for each SQLite sub-type name.
//!
//! Generated records name their fields with these aliases so the declared
//! column type stays visible in the record definition.

pub use super::datetime::{Date, Datetime};
pub use super::lob::{Blob, Clob};
pub use super::text::WideString;

pub type Integer = i32;
pub type Int = i32;
pub type Int2 = i32;
pub type Int8 = i32;
pub type Tinyint = u8;
pub type Smallint = i16;
pub type Mediumint = i32;
pub type Bigint = i64;
pub type UBigint = u64;
pub type Boolean = bool;

pub type Numeric = f64;
pub type Decimal = f64;
pub type Real = f64;
pub type DoublePrcsn = f64;
pub type Double = f64;
pub type Float = f64;

pub type Character = String;
pub type Varchar = String;
pub type Nchar = WideString;
pub type Nvarchar = WideString;
