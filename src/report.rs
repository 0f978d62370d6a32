//! Plain-text rendering of the dashboard for `--print`.

use crate::dashboard::{DashboardState, Sheet};
use crate::engine::{Choice, LogicalField};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fmt::Write;

/// Parse a `FIELD=VALUE` filter argument. The value is matched against the sheet's
/// option list by text so numeric cells can be selected from the command line.
pub fn parse_filter(sheet: &Sheet, arg: &str) -> Result<(LogicalField, Choice)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| eyre!("filter {:?} must look like FIELD=VALUE", arg))?;
    let field = LogicalField::from_key(key)
        .filter(|f| LogicalField::FILTERABLE.contains(f))
        .ok_or_else(|| {
            eyre!(
                "unknown filter field {:?}; expected one of: {}",
                key.trim(),
                LogicalField::FILTERABLE.map(|f| f.key()).join(", ")
            )
        })?;
    let choice = match Choice::parse(value) {
        Choice::All => Choice::All,
        Choice::Only(text) => sheet
            .options(field)
            .iter()
            .find(|c| matches!(c, Choice::Only(v) if v.to_text() == text.to_text()))
            .cloned()
            .unwrap_or(Choice::Only(text)),
    };
    Ok((field, choice))
}

/// Build the state described by the `--filter`, `--search` and `--brief` arguments.
pub fn state_from_args(
    sheet: &Sheet,
    filters: &[String],
    search: Option<&str>,
    brief: Option<&str>,
) -> Result<DashboardState> {
    let mut state = DashboardState::default();
    for arg in filters {
        let (field, choice) = parse_filter(sheet, arg)?;
        state.query.set(field, choice);
    }
    state.query.search = search.unwrap_or_default().to_string();
    state.selected_offer = brief.map(str::to_string);
    Ok(state)
}

/// Placards, active filters, the narrowed table (tab-separated) and the brief.
pub fn render(sheet: &Sheet, state: &DashboardState) -> String {
    let mut out = String::new();
    let summary = sheet.summary();
    let _ = writeln!(out, "Total Offers: {}", summary.total);
    let _ = writeln!(out, "Active Offers: {}", summary.active);

    for selection in &state.query.selections {
        if sheet.resolved().get(selection.field).is_some() {
            let _ = writeln!(out, "{}: {}", selection.field, selection.choice);
        }
    }
    if !state.query.search.is_empty() {
        let _ = writeln!(out, "Search: {}", state.query.search);
    }
    out.push('\n');

    let view = state.view(sheet);
    let _ = writeln!(out, "{}", view.columns().join("\t"));
    for row in view.rows() {
        let cells: Vec<String> = row.iter().map(|c| c.to_text().into_owned()).collect();
        let _ = writeln!(out, "{}", cells.join("\t"));
    }
    let _ = writeln!(out, "({} of {} offers)", view.len(), summary.total);

    if state.selected_offer.is_some() {
        out.push('\n');
        match state.brief(sheet, &view) {
            Some(brief) => {
                let width = brief
                    .fields
                    .iter()
                    .map(|(name, _)| name.chars().count())
                    .max()
                    .unwrap_or(0);
                for (name, value) in &brief.fields {
                    let _ = writeln!(out, "{:<width$}  {}", name, value, width = width);
                }
            }
            None => {
                let _ = writeln!(out, "No matching offer");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::engine::FieldMap;
    use crate::value::CellValue;

    fn sheet() -> Sheet {
        let raw = Dataset::new(
            vec!["Region".into(), "Offer".into(), "Payout".into()],
            vec![
                vec!["IN".into(), "X".into(), 5i64.into()],
                vec!["US".into(), "Y".into(), 7i64.into()],
            ],
        )
        .unwrap();
        Sheet::new(raw, FieldMap::default().with_label(LogicalField::CampaignType, "Payout"))
    }

    #[test]
    fn test_parse_filter_matches_numbers_by_text() {
        let sheet = sheet();
        let (field, choice) = parse_filter(&sheet, "campaign-type=7").unwrap();
        assert_eq!(field, LogicalField::CampaignType);
        assert_eq!(choice, Choice::Only(CellValue::Number(7.0)));
    }

    #[test]
    fn test_parse_filter_errors() {
        let sheet = sheet();
        assert!(parse_filter(&sheet, "region").is_err());
        assert!(parse_filter(&sheet, "payout=5").is_err());
        assert!(parse_filter(&sheet, "offer=X").is_err());
        assert_eq!(
            parse_filter(&sheet, "Region=All").unwrap().1,
            Choice::All
        );
    }

    #[test]
    fn test_render_lists_view_and_brief() {
        let sheet = sheet();
        let state = state_from_args(&sheet, &["region=IN".to_string()], None, Some("X")).unwrap();
        let text = render(&sheet, &state);
        assert!(text.contains("Total Offers: 2\n"));
        assert!(text.contains("Region: IN\n"));
        assert!(text.contains("IN\tX\t5\n"));
        assert!(!text.contains("US\tY"));
        assert!(text.contains("(1 of 2 offers)"));
        assert!(text.contains("Payout  5\n"));
    }

    #[test]
    fn test_render_no_match() {
        let sheet = sheet();
        let state = state_from_args(&sheet, &["region=US".to_string()], None, Some("X")).unwrap();
        assert!(render(&sheet, &state).contains("No matching offer"));
    }
}
