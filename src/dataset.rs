//! In-memory offer table.
//!
//! A [`Dataset`] is immutable once built. Narrowing it (filters, search) produces a new
//! `Dataset` that shares the column names and row storage of its parent, so the raw sheet
//! handed in by the data source is never touched.

use crate::value::CellValue;
use std::fmt;
use std::sync::Arc;

pub type Row = Arc<[CellValue]>;

/// A row whose cell count differs from the header width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeError {
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} has {} cells, expected {}",
            self.row + 1,
            self.found,
            self.expected
        )
    }
}

impl std::error::Error for ShapeError {}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Arc<[String]>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset, rejecting any row that does not have one cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, ShapeError> {
        let expected = columns.len();
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(ShapeError {
                row,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self {
            columns: columns.into(),
            rows: rows.into_iter().map(Row::from).collect(),
        })
    }

    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns: columns.into(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// New dataset with the same columns holding the rows that satisfy `keep`, in order.
    pub fn retain_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        Self {
            columns: Arc::clone(&self.columns),
            rows: self
                .rows
                .iter()
                .filter(|r| keep(r))
                .cloned()
                .collect(),
        }
    }

    /// Distinct values of a column in first-seen order. Empty cells are skipped.
    pub fn distinct_values(&self, column: usize) -> Vec<CellValue> {
        let mut seen: Vec<CellValue> = Vec::new();
        for value in self.rows.iter().filter_map(|r| r.get(column)) {
            if !value.is_empty() && !seen.contains(value) {
                seen.push(value.clone());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            vec!["Region".into(), "Offer".into()],
            vec![
                vec!["IN".into(), "X".into()],
                vec!["US".into(), CellValue::Empty],
                vec!["IN".into(), "Z".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let err = Dataset::new(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into(), "2".into()], vec!["3".into()]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ShapeError {
                row: 1,
                expected: 2,
                found: 1
            }
        );
        assert_eq!(err.to_string(), "row 2 has 1 cells, expected 2");
    }

    #[test]
    fn test_retain_rows_keeps_order_and_leaves_source_alone() {
        let ds = sample();
        let narrowed = ds.retain_rows(|r| r[0] == CellValue::text("IN"));
        assert_eq!(narrowed.len(), 2);
        assert_eq!(narrowed.cell(0, 1), Some(&CellValue::text("X")));
        assert_eq!(narrowed.cell(1, 1), Some(&CellValue::text("Z")));
        assert_eq!(narrowed.columns(), ds.columns());
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn test_distinct_values_first_seen_order() {
        let ds = sample();
        assert_eq!(
            ds.distinct_values(0),
            vec![CellValue::text("IN"), CellValue::text("US")]
        );
        assert_eq!(
            ds.distinct_values(1),
            vec![CellValue::text("X"), CellValue::text("Z")]
        );
        assert!(ds.distinct_values(9).is_empty());
    }

    #[test]
    fn test_distinct_values_collapses_nan() {
        let ds = Dataset::new(
            vec!["Region".into()],
            vec![
                vec![CellValue::Number(f64::NAN)],
                vec![CellValue::Number(f64::NAN)],
                vec![CellValue::Number(1.5)],
            ],
        )
        .unwrap();
        let values = ds.distinct_values(0);
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].to_text(), "NaN");
        assert_eq!(values[1], CellValue::Number(1.5));
    }
}
