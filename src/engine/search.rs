use super::resolve::ResolvedColumn;
use crate::dataset::Dataset;

/// Keep rows whose offer cell contains `term`, ignoring case. An empty term or a sheet
/// without an offer column leaves the rows as they are; blank cells never match.
pub fn apply_search(dataset: &Dataset, offer: Option<&ResolvedColumn>, term: &str) -> Dataset {
    let Some(offer) = offer else {
        return dataset.clone();
    };
    if term.is_empty() {
        return dataset.clone();
    }
    let needle = term.to_lowercase();
    dataset.retain_rows(|row| match row.get(offer.index) {
        Some(cell) if !cell.is_empty() => cell.to_text().to_lowercase().contains(&needle),
        _ => false,
    })
}
