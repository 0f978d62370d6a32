use super::resolve::ResolvedColumn;
use crate::dataset::Dataset;
use crate::value::CellValue;

/// Selection text meaning "no offer picked".
pub const NONE: &str = "None";

/// Every field of one offer row, in sheet column order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBrief {
    pub fields: Vec<(String, CellValue)>,
}

impl RecordBrief {
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Brief for the first row (in `dataset` order) whose offer cell text equals `selected`.
///
/// `dataset` is the current filtered view, so an offer that was narrowed out yields
/// `None` rather than a stale record.
pub fn project(
    dataset: &Dataset,
    offer: Option<&ResolvedColumn>,
    selected: Option<&str>,
) -> Option<RecordBrief> {
    let offer = offer?;
    let selected = selected.filter(|s| *s != NONE)?;
    let row = dataset.rows().iter().find(|row| {
        row.get(offer.index)
            .is_some_and(|cell| cell.to_text() == selected)
    })?;
    Some(RecordBrief {
        fields: dataset
            .columns()
            .iter()
            .cloned()
            .zip(row.iter().cloned())
            .collect(),
    })
}
