//! Cell values of an offer sheet.
//!
//! Spreadsheet columns mix text, numbers and blanks freely, so every cell is a small
//! tagged value. Comparisons that work on text (search, cap status, offer lookup) go
//! through [`CellValue::to_text`], which is the single coercion rule for the crate.

use std::borrow::Cow;
use std::fmt;

/// Largest integer magnitude an `f64` represents exactly (2^53).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, Default)]
pub enum CellValue {
    Text(String),
    Number(f64),
    #[default]
    Empty,
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Text form used for search, cap-status and offer-id comparisons.
    ///
    /// Whole numbers print without a fractional part (`5.0` -> `"5"`); other numbers use
    /// the shortest round-trip form; empty cells are `""`.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s.as_str()),
            Self::Number(n) => Cow::Owned(format_number(*n)),
            Self::Empty => Cow::Borrowed(""),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_EXACT_INT {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Equality is by variant: text compares exactly, numbers numerically, and a text cell
/// never equals a number cell even when they print the same. NaN equals NaN so a NaN
/// filter option matches the cells it came from.
impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Empty, Self::Empty) => true,
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text_whole_number_has_no_fraction() {
        assert_eq!(CellValue::Number(5.0).to_text(), "5");
        assert_eq!(CellValue::Number(-12.0).to_text(), "-12");
        assert_eq!(CellValue::Number(2.5).to_text(), "2.5");
    }

    #[test]
    fn test_to_text_non_finite_and_huge() {
        assert_eq!(CellValue::Number(f64::NAN).to_text(), "NaN");
        assert_eq!(CellValue::Number(1e20).to_text(), "100000000000000000000");
    }

    #[test]
    fn test_empty_is_blank_text() {
        assert_eq!(CellValue::Empty.to_text(), "");
        assert!(CellValue::Empty.is_empty());
        assert!(!CellValue::text("").is_empty());
    }

    #[test]
    fn test_equality_is_per_variant() {
        assert_eq!(CellValue::text("IN"), CellValue::text("IN"));
        assert_ne!(CellValue::text("IN"), CellValue::text("in"));
        assert_eq!(CellValue::Number(3.0), CellValue::from(3i64));
        assert_ne!(CellValue::text("3"), CellValue::Number(3.0));
        assert_eq!(CellValue::Empty, CellValue::from(None::<String>));
    }

    #[test]
    fn test_nan_equals_nan() {
        assert_eq!(CellValue::Number(f64::NAN), CellValue::Number(f64::NAN));
        assert_ne!(CellValue::Number(f64::NAN), CellValue::Number(1.5));
        assert_ne!(CellValue::Number(f64::NAN), CellValue::text("NaN"));
    }
}
