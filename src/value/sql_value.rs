use rusqlite::types::ValueRef;
use tracing::warn;

use super::datetime::{Date, Datetime};
use super::lob::{Blob, Clob};
use super::text::{is_wide_declared, WideString};

/// A column value detached from the row it was read from
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    WideText(WideString),
    Blob(Vec<u8>),
    Date(Date),
    Datetime(Datetime),
}

/// Parse integer text the way SQLite's numeric affinity would, else 0
fn parse_integer(s: &str) -> i64 {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        .unwrap_or(0)
}

fn parse_real(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(0.0)
}

impl SqlValue {
    /// Copy a borrowed column value out of its row.
    ///
    /// Text is decoded wide when the declared type is `NCHAR`, `NVARCHAR` or
    /// `NATIVE CHARACTER`, otherwise as narrow UTF-8 with invalid sequences
    /// replaced.
    pub fn from_value_ref(value: ValueRef<'_>, declared_type: Option<&str>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(f) => SqlValue::Real(f),
            ValueRef::Text(bytes) => {
                let text = String::from_utf8_lossy(bytes);
                if is_wide_declared(declared_type) {
                    SqlValue::WideText(WideString::from(text.as_ref()))
                } else {
                    SqlValue::Text(text.into_owned())
                }
            }
            ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn as_i64(&self) -> i64 {
        match self {
            SqlValue::Null | SqlValue::Blob(_) | SqlValue::Date(_) | SqlValue::Datetime(_) => 0,
            SqlValue::Integer(i) => *i,
            SqlValue::Real(f) => *f as i64,
            SqlValue::Text(s) => parse_integer(s),
            SqlValue::WideText(w) => parse_integer(&w.to_string_lossy()),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            SqlValue::Null | SqlValue::Blob(_) | SqlValue::Date(_) | SqlValue::Datetime(_) => 0.0,
            SqlValue::Integer(i) => *i as f64,
            SqlValue::Real(f) => *f,
            SqlValue::Text(s) => parse_real(s),
            SqlValue::WideText(w) => parse_real(&w.to_string_lossy()),
        }
    }

    /// Narrow text rendering. NULL renders as the empty string.
    pub fn to_text(&self) -> String {
        match self {
            SqlValue::Null => String::new(),
            SqlValue::Integer(i) => i.to_string(),
            SqlValue::Real(f) => f.to_string(),
            SqlValue::Text(s) => s.clone(),
            SqlValue::WideText(w) => w.to_string_lossy(),
            SqlValue::Blob(b) => String::from_utf8_lossy(b).into_owned(),
            SqlValue::Date(d) => d.to_string(),
            SqlValue::Datetime(dt) => dt.to_string(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            SqlValue::Null => Vec::new(),
            SqlValue::Blob(b) => b,
            SqlValue::Text(s) => s.into_bytes(),
            other => other.to_text().into_bytes(),
        }
    }
}

/// Lossy conversion out of a [`SqlValue`].
///
/// NULL converts to the type's default. Conversions never fail: text that
/// does not parse as a number converts to zero, and text that does not parse
/// as a date converts to the zero date.
pub trait FromSqlValue: Sized {
    fn from_sql_value(value: SqlValue) -> Self;
}

impl FromSqlValue for SqlValue {
    fn from_sql_value(value: SqlValue) -> Self {
        value
    }
}

macro_rules! integer_from_sql_value {
    ($($ty:ty),*) => {
        $(
            impl FromSqlValue for $ty {
                fn from_sql_value(value: SqlValue) -> Self {
                    value.as_i64() as $ty
                }
            }
        )*
    };
}

integer_from_sql_value!(i64, i32, i16, u8, u64);

impl FromSqlValue for bool {
    fn from_sql_value(value: SqlValue) -> Self {
        value.as_f64() != 0.0
    }
}

impl FromSqlValue for f64 {
    fn from_sql_value(value: SqlValue) -> Self {
        value.as_f64()
    }
}

impl FromSqlValue for String {
    fn from_sql_value(value: SqlValue) -> Self {
        match value {
            SqlValue::Text(s) => s,
            other => other.to_text(),
        }
    }
}

impl FromSqlValue for WideString {
    fn from_sql_value(value: SqlValue) -> Self {
        match value {
            SqlValue::WideText(w) => w,
            other => WideString::from(other.to_text()),
        }
    }
}

impl FromSqlValue for Blob {
    fn from_sql_value(value: SqlValue) -> Self {
        Blob(value.into_bytes())
    }
}

impl FromSqlValue for Clob {
    fn from_sql_value(value: SqlValue) -> Self {
        Clob(value.into_bytes())
    }
}

impl FromSqlValue for Date {
    fn from_sql_value(value: SqlValue) -> Self {
        match value {
            SqlValue::Null => Date::default(),
            SqlValue::Date(d) => d,
            SqlValue::Datetime(dt) => dt.date(),
            SqlValue::Text(s) => Date::parse(&s),
            SqlValue::WideText(w) => Date::parse(&w.to_string_lossy()),
            other => {
                warn!("Could not convert value {:?} into a date", other);
                Date::default()
            }
        }
    }
}

impl FromSqlValue for Datetime {
    fn from_sql_value(value: SqlValue) -> Self {
        match value {
            SqlValue::Null => Datetime::default(),
            SqlValue::Datetime(dt) => dt,
            SqlValue::Date(d) => Datetime::from(d),
            SqlValue::Text(s) => Datetime::parse(&s),
            SqlValue::WideText(w) => Datetime::parse(&w.to_string_lossy()),
            other => {
                warn!("Could not convert value {:?} into a date", other);
                Datetime::default()
            }
        }
    }
}

macro_rules! integer_into_sql_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(value: $ty) -> Self {
                    SqlValue::Integer(i64::from(value))
                }
            }
        )*
    };
}

integer_into_sql_value!(i64, i32, i16, u8, bool);

impl From<u64> for SqlValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => SqlValue::Integer(i),
            Err(_) => SqlValue::Real(value as f64),
        }
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<WideString> for SqlValue {
    fn from(value: WideString) -> Self {
        SqlValue::WideText(value)
    }
}

impl From<Blob> for SqlValue {
    fn from(value: Blob) -> Self {
        SqlValue::Blob(value.0)
    }
}

impl From<Clob> for SqlValue {
    fn from(value: Clob) -> Self {
        SqlValue::Text(value.to_string_lossy())
    }
}

impl From<Date> for SqlValue {
    fn from(value: Date) -> Self {
        SqlValue::Date(value)
    }
}

impl From<Datetime> for SqlValue {
    fn from(value: Datetime) -> Self {
        SqlValue::Datetime(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_decoding_follows_declared_type() {
        let narrow = SqlValue::from_value_ref(ValueRef::Text(b"Ada"), Some("VARCHAR(10)"));
        assert_eq!(narrow, SqlValue::Text("Ada".to_string()));

        let wide = SqlValue::from_value_ref(ValueRef::Text(b"Ada"), Some("NVARCHAR(10)"));
        assert_eq!(wide, SqlValue::WideText(WideString::from("Ada")));

        let unknown = SqlValue::from_value_ref(ValueRef::Text(b"Ada"), None);
        assert_eq!(unknown, SqlValue::Text("Ada".to_string()));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let value = SqlValue::from_value_ref(ValueRef::Text(&[b'a', 0xFF]), Some("TEXT"));
        assert_eq!(value, SqlValue::Text("a\u{FFFD}".to_string()));
    }

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(i32::from_sql_value(SqlValue::Integer(42)), 42);
        assert_eq!(i32::from_sql_value(SqlValue::Text(" 17 ".to_string())), 17);
        assert_eq!(i32::from_sql_value(SqlValue::Text("abc".to_string())), 0);
        assert_eq!(i64::from_sql_value(SqlValue::Real(3.9)), 3);
        assert_eq!(f64::from_sql_value(SqlValue::Integer(2)), 2.0);
        assert_eq!(f64::from_sql_value(SqlValue::Null), 0.0);
        assert!(bool::from_sql_value(SqlValue::Integer(1)));
        assert!(!bool::from_sql_value(SqlValue::Null));
    }

    #[test]
    fn test_null_is_default() {
        assert_eq!(String::from_sql_value(SqlValue::Null), "");
        assert!(WideString::from_sql_value(SqlValue::Null).is_empty());
        assert!(Date::from_sql_value(SqlValue::Null).is_zero());
        assert_eq!(Blob::from_sql_value(SqlValue::Null), Blob::default());
    }

    #[test]
    fn test_date_conversions() {
        let date = Date::from_sql_value(SqlValue::Text("2001-09-09".to_string()));
        assert_eq!(date.to_string(), "2001-09-09");
        assert!(Date::from_sql_value(SqlValue::Text("not-a-date".to_string())).is_zero());
        assert!(Datetime::from_sql_value(SqlValue::Integer(5)).is_zero());
    }

    #[test]
    fn test_into_sql_value() {
        assert_eq!(SqlValue::from(true), SqlValue::Integer(1));
        assert_eq!(SqlValue::from(u64::MAX), SqlValue::Real(u64::MAX as f64));
        assert_eq!(SqlValue::from(Clob::from("x")), SqlValue::Text("x".to_string()));
    }
}
