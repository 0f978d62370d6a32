use super::resolve::ResolvedColumn;
use crate::dataset::Dataset;

/// Placard counts for a whole sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub active: usize,
}

/// Count all rows, and the rows whose cap status reads "yes" in any case.
///
/// Callers pass the raw sheet: placards describe the catalog, not the filtered view.
pub fn summarize(dataset: &Dataset, cap: Option<&ResolvedColumn>) -> Summary {
    let active = cap.map_or(0, |cap| {
        dataset
            .rows()
            .iter()
            .filter(|row| {
                row.get(cap.index)
                    .is_some_and(|cell| cell.to_text().to_lowercase() == "yes")
            })
            .count()
    });
    Summary {
        total: dataset.len(),
        active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::resolve::resolve;
    use crate::value::CellValue;

    #[test]
    fn test_counts_yes_in_any_case() {
        let ds = Dataset::new(
            vec!["Current Cap".into()],
            vec![
                vec!["Yes".into()],
                vec!["YES".into()],
                vec!["no".into()],
                vec![" yes".into()],
                vec![CellValue::Empty],
                vec![1i64.into()],
            ],
        )
        .unwrap();
        let cap = resolve(ds.columns(), "current cap");
        assert_eq!(
            summarize(&ds, cap.as_ref()),
            Summary {
                total: 6,
                active: 2
            }
        );
    }

    #[test]
    fn test_missing_cap_column_counts_zero_active() {
        let ds = Dataset::new(vec!["Offer".into()], vec![vec!["A".into()]]).unwrap();
        assert_eq!(
            summarize(&ds, None),
            Summary {
                total: 1,
                active: 0
            }
        );
    }

    #[test]
    fn test_empty_sheet() {
        let ds = Dataset::empty(vec!["Current Cap".into()]);
        let cap = resolve(ds.columns(), "Current Cap");
        let s = summarize(&ds, cap.as_ref());
        assert_eq!(s, Summary::default());
        assert!(s.active <= s.total);
    }
}
