//! Field values rendered as text and as SQL literals

use super::datetime::{Date, Datetime};
use super::lob::{Blob, Clob};
use super::sql_value::SqlValue;
use super::text::WideString;

/// Quote `s` as an SQL string literal, doubling embedded single quotes
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Text rendering of a field value
pub trait ToSqlText {
    fn sql_text(&self) -> String;

    /// The value as an SQL literal for `INSERT ... VALUES (..)`
    fn sql_literal(&self) -> String {
        quote_literal(&self.sql_text())
    }
}

macro_rules! display_sql_text {
    ($($ty:ty),*) => {
        $(
            impl ToSqlText for $ty {
                fn sql_text(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_sql_text!(i64, i32, i16, u8, u64, f64, str, String, WideString, Clob, Date, Datetime);

impl ToSqlText for bool {
    fn sql_text(&self) -> String {
        if *self { "1" } else { "0" }.to_string()
    }
}

impl ToSqlText for Blob {
    fn sql_text(&self) -> String {
        self.to_string()
    }

    fn sql_literal(&self) -> String {
        format!("X'{}'", self.to_hex())
    }
}

impl ToSqlText for SqlValue {
    fn sql_text(&self) -> String {
        self.to_text()
    }

    fn sql_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Blob(bytes) => Blob(bytes.clone()).sql_literal(),
            other => quote_literal(&other.to_text()),
        }
    }
}

/// Narrow text of any field value
pub fn sql_text<T: ToSqlText + ?Sized>(value: &T) -> String {
    value.sql_text()
}

/// Wide text of any field value
pub fn sql_wtext<T: ToSqlText + ?Sized>(value: &T) -> WideString {
    WideString::from(value.sql_text())
}

/// Narrow SQL literal of any field value
pub fn sql_literal<T: ToSqlText + ?Sized>(value: &T) -> String {
    value.sql_literal()
}

/// Wide SQL literal of any field value
pub fn sql_wliteral<T: ToSqlText + ?Sized>(value: &T) -> WideString {
    WideString::from(value.sql_literal())
}
