//! Narrow and wide text representations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

/// Declared-type prefixes that select wide decoding
const WIDE_PREFIXES: &[&str] = &["NCHAR", "NVARCHAR", "NATIVE CHARACTER"];

/// Whether a declared column type selects wide text decoding.
///
/// Absent and unrecognized declared types decode as narrow text.
pub fn is_wide_declared(declared: Option<&str>) -> bool {
    let Some(declared) = declared else {
        return false;
    };
    let normalized = declared.trim().to_ascii_uppercase();
    WIDE_PREFIXES.iter().any(|p| normalized.starts_with(p))
}

/// Text stored as UTF-16 code units
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WideString(Vec<u16>);

impl WideString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_units(units: Vec<u16>) -> Self {
        Self(units)
    }

    pub fn as_units(&self) -> &[u16] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push_str(&mut self, s: &str) {
        self.0.extend(s.encode_utf16());
    }

    pub fn push_wide(&mut self, other: &WideString) {
        self.0.extend_from_slice(&other.0);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Decode to UTF-8, replacing unpaired surrogates
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.0)
    }
}

impl From<&str> for WideString {
    fn from(s: &str) -> Self {
        Self(s.encode_utf16().collect())
    }
}

impl From<String> for WideString {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<&String> for WideString {
    fn from(s: &String) -> Self {
        Self::from(s.as_str())
    }
}

impl fmt::Display for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl AddAssign<&str> for WideString {
    fn add_assign(&mut self, rhs: &str) {
        self.push_str(rhs);
    }
}

impl AddAssign<&WideString> for WideString {
    fn add_assign(&mut self, rhs: &WideString) {
        self.push_wide(rhs);
    }
}

impl PartialEq<&str> for WideString {
    fn eq(&self, other: &&str) -> bool {
        self.0.iter().copied().eq(other.encode_utf16())
    }
}

/// String type a record uses for its self-description
pub trait SqlString: Default + Clone + fmt::Debug + fmt::Display + for<'a> From<&'a str> {
    /// Whether values of this type are written through the wide stream
    const WIDE: bool;
}

impl SqlString for String {
    const WIDE: bool = false;
}

impl SqlString for WideString {
    const WIDE: bool = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_declared() {
        assert!(is_wide_declared(Some("NVARCHAR(100)")));
        assert!(is_wide_declared(Some("nchar(5)")));
        assert!(is_wide_declared(Some("NATIVE CHARACTER(70)")));
        assert!(!is_wide_declared(Some("VARCHAR(100)")));
        assert!(!is_wide_declared(Some("CHARACTER(20)")));
        assert!(!is_wide_declared(Some("GEOMETRY")));
        assert!(!is_wide_declared(None));
    }

    #[test]
    fn test_wide_string_round_trip() {
        let mut wide = WideString::from("Zoë");
        wide += " ";
        wide += &WideString::from("𝄞");
        assert_eq!(wide.to_string(), "Zoë 𝄞");
        assert_eq!(wide.len(), 6);
        assert!(wide == "Zoë 𝄞");
        assert!(WideString::new().is_empty());
    }

    #[test]
    fn test_lossy_decode() {
        let wide = WideString::from_units(vec![0x0041, 0xD800]);
        assert_eq!(wide.to_string_lossy(), "A\u{FFFD}");
    }
}
