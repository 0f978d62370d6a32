//! Presentation-side state and the per-load data derived from a sheet.
//!
//! [`Sheet`] holds everything computed once per load (resolved columns, placard counts,
//! filter options). [`DashboardState`] is what the user has chosen; it is passed to the
//! engine explicitly on every pass rather than living in globals.

use crate::dataset::Dataset;
use crate::engine::{
    project, summarize, Choice, FieldMap, LogicalField, OfferQuery, RecordBrief, ResolvedFields,
    Summary,
};

/// A loaded sheet plus what is derived from it once per load.
#[derive(Debug, Clone)]
pub struct Sheet {
    raw: Dataset,
    fields: FieldMap,
    resolved: ResolvedFields,
    summary: Summary,
    options: Vec<(LogicalField, Vec<Choice>)>,
}

impl Sheet {
    pub fn new(raw: Dataset, fields: FieldMap) -> Self {
        let resolved = fields.resolve_all(&raw);
        let summary = summarize(&raw, resolved.get(LogicalField::CurrentCap));
        let options = LogicalField::FILTERABLE
            .into_iter()
            .map(|field| {
                let mut choices = vec![Choice::All];
                if let Some(col) = resolved.get(field) {
                    choices.extend(raw.distinct_values(col.index).into_iter().map(Choice::Only));
                }
                (field, choices)
            })
            .collect();
        Self {
            raw,
            fields,
            resolved,
            summary,
            options,
        }
    }

    pub fn raw(&self) -> &Dataset {
        &self.raw
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn resolved(&self) -> &ResolvedFields {
        &self.resolved
    }

    /// Placard counts over the whole sheet, independent of any filter.
    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// "All" followed by the sheet's distinct values for `field`, in first-seen order.
    /// Only "All" when the field has no column.
    pub fn options(&self, field: LogicalField) -> &[Choice] {
        self.options
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, c)| c.as_slice())
            .unwrap_or(&[])
    }

    pub fn offer_text(&self, view: &Dataset, row: usize) -> Option<String> {
        let col = self.resolved.get(LogicalField::Offer)?;
        view.cell(row, col.index)
            .filter(|c| !c.is_empty())
            .map(|c| c.to_text().into_owned())
    }
}

/// What the user currently has selected.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub query: OfferQuery,
    pub selected_offer: Option<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            query: OfferQuery::unconstrained(),
            selected_offer: None,
        }
    }
}

impl DashboardState {
    /// The rows to show: filter chain over the raw sheet, then search.
    pub fn view(&self, sheet: &Sheet) -> Dataset {
        self.query.run(sheet.raw(), sheet.fields(), sheet.resolved())
    }

    /// Brief for the selected offer within `view`, the currently shown rows.
    pub fn brief(&self, sheet: &Sheet, view: &Dataset) -> Option<RecordBrief> {
        project(
            view,
            sheet.resolved().get(LogicalField::Offer),
            self.selected_offer.as_deref(),
        )
    }

    /// Move `field`'s choice `step` places through the sheet's options, wrapping around.
    /// Returns false when the field has nothing to pick from.
    pub fn cycle(&mut self, sheet: &Sheet, field: LogicalField, step: isize) -> bool {
        let options = sheet.options(field);
        if options.len() < 2 {
            return false;
        }
        let current = self
            .query
            .choice(field)
            .and_then(|c| options.iter().position(|o| o == c))
            .unwrap_or(0);
        let len = options.len() as isize;
        let next = (current as isize + step).rem_euclid(len) as usize;
        self.query.set(field, options[next].clone());
        true
    }

    /// Drop choices the sheet no longer offers (after a reload).
    pub fn retain_valid(&mut self, sheet: &Sheet) {
        for selection in self.query.selections.iter_mut() {
            if !sheet.options(selection.field).contains(&selection.choice) {
                selection.choice = Choice::All;
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::CellValue;

    fn sheet() -> Sheet {
        let raw = Dataset::new(
            vec!["Region".into(), "Offer".into(), "Current Cap".into()],
            vec![
                vec!["IN".into(), "X".into(), "Yes".into()],
                vec!["US".into(), "Y".into(), "No".into()],
                vec!["IN".into(), "Z".into(), "Yes".into()],
            ],
        )
        .unwrap();
        Sheet::new(raw, FieldMap::default())
    }

    #[test]
    fn test_options_and_summary() {
        let sheet = sheet();
        assert_eq!(
            sheet.options(LogicalField::Region),
            &[
                Choice::All,
                Choice::Only(CellValue::text("IN")),
                Choice::Only(CellValue::text("US"))
            ]
        );
        assert_eq!(sheet.options(LogicalField::CampaignType), &[Choice::All]);
        assert_eq!(
            sheet.summary(),
            Summary {
                total: 3,
                active: 2
            }
        );
    }

    #[test]
    fn test_cycle_wraps_both_ways() {
        let sheet = sheet();
        let mut state = DashboardState::default();
        assert!(state.cycle(&sheet, LogicalField::Region, 1));
        assert_eq!(
            state.query.choice(LogicalField::Region),
            Some(&Choice::parse("IN"))
        );
        assert!(state.cycle(&sheet, LogicalField::Region, -2));
        assert_eq!(
            state.query.choice(LogicalField::Region),
            Some(&Choice::parse("US"))
        );
        assert!(!state.cycle(&sheet, LogicalField::CampaignType, 1));
    }

    #[test]
    fn test_summary_ignores_view() {
        let sheet = sheet();
        let mut state = DashboardState::default();
        state.query.set(LogicalField::Region, Choice::parse("US"));
        assert_eq!(state.view(&sheet).len(), 1);
        assert_eq!(sheet.summary().total, 3);
    }

    #[test]
    fn test_brief_tracks_view() {
        let sheet = sheet();
        let mut state = DashboardState {
            selected_offer: Some("X".into()),
            ..Default::default()
        };
        let view = state.view(&sheet);
        assert!(state.brief(&sheet, &view).is_some());

        state.query.set(LogicalField::Region, Choice::parse("US"));
        let view = state.view(&sheet);
        assert_eq!(state.brief(&sheet, &view), None);
    }

    #[test]
    fn test_retain_valid_resets_stale_choices() {
        let sheet = sheet();
        let mut state = DashboardState::default();
        state.query.set(LogicalField::Region, Choice::parse("EU"));
        state.query.set(LogicalField::CurrentCap, Choice::parse("Yes"));
        state.retain_valid(&sheet);
        assert_eq!(state.query.choice(LogicalField::Region), Some(&Choice::All));
        assert_eq!(
            state.query.choice(LogicalField::CurrentCap),
            Some(&Choice::parse("Yes"))
        );
    }
}
