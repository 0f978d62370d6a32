use super::resolve::{FieldMap, LogicalField};
use crate::dataset::Dataset;
use crate::value::CellValue;
use std::fmt;

/// Sentinel selection text meaning "no constraint".
pub const ALL: &str = "All";

/// What the user picked for one filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Choice {
    #[default]
    All,
    Only(CellValue),
}

impl Choice {
    /// Text selection as it arrives from a prompt: the literal `All` is the sentinel,
    /// anything else is an exact text value.
    pub fn parse(s: &str) -> Self {
        if s == ALL {
            Self::All
        } else {
            Self::Only(CellValue::text(s))
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(v) => write!(f, "{}", v),
        }
    }
}

/// One `(field, choice)` step of the filter chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub field: LogicalField,
    pub choice: Choice,
}

impl Selection {
    pub fn new(field: LogicalField, choice: Choice) -> Self {
        Self { field, choice }
    }
}

/// Apply each selection in order as an exact-equality filter, each step narrowing the
/// previous step's output. Selections whose field is missing from the sheet, or whose
/// choice is [`Choice::All`], leave the rows untouched.
pub fn apply_filters(dataset: &Dataset, fields: &FieldMap, selections: &[Selection]) -> Dataset {
    selections
        .iter()
        .fold(dataset.clone(), |current, selection| {
            let Choice::Only(wanted) = &selection.choice else {
                return current;
            };
            let Some(column) = fields.resolve(&current, selection.field) else {
                return current;
            };
            current.retain_rows(|row| row.get(column.index) == Some(wanted))
        })
}
