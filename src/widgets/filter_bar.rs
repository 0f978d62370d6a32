use crate::dashboard::{DashboardState, Sheet};
use crate::engine::{Choice, LogicalField};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// One dropdown per filterable field, showing its current choice.
pub struct FilterBar {
    entries: Vec<FilterEntry>,
    focus: Option<usize>,
    enabled: bool,
}

struct FilterEntry {
    label: String,
    choice: String,
    /// False when the sheet has no column for the field.
    available: bool,
}

impl FilterBar {
    pub fn new(sheet: Option<&Sheet>, state: &DashboardState) -> Self {
        let entries = LogicalField::FILTERABLE
            .into_iter()
            .map(|field| {
                let available = sheet.is_some_and(|s| s.resolved().get(field).is_some());
                let label = sheet
                    .map(|s| s.fields().label(field).to_string())
                    .unwrap_or_else(|| field.default_label().to_string());
                let choice = state
                    .query
                    .choice(field)
                    .map(Choice::to_string)
                    .unwrap_or_else(|| Choice::All.to_string());
                FilterEntry {
                    label,
                    choice,
                    available,
                }
            })
            .collect();
        Self {
            entries,
            focus: None,
            enabled: sheet.is_some(),
        }
    }

    pub fn with_focus(mut self, focus: Option<usize>) -> Self {
        self.focus = focus;
        self
    }
}

impl Widget for &FilterBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let constraints = vec![Constraint::Ratio(1, self.entries.len().max(1) as u32); self.entries.len()];
        let cells = Layout::new(Direction::Horizontal, constraints).split(area);

        for (i, entry) in self.entries.iter().enumerate() {
            let focused = self.enabled && self.focus == Some(i);
            let (border, text) = match (self.enabled && entry.available, focused) {
                (false, _) => (Color::DarkGray, Color::DarkGray),
                (true, true) => (Color::Yellow, Color::White),
                (true, false) => (Color::Gray, Color::White),
            };
            let mut value_style = Style::default().fg(text);
            if focused {
                value_style = value_style.add_modifier(Modifier::BOLD);
            }
            let line = if entry.available || !self.enabled {
                Line::from(vec![
                    Span::styled("◂ ", Style::default().fg(border)),
                    Span::styled(entry.choice.clone(), value_style),
                    Span::styled(" ▸", Style::default().fg(border)),
                ])
            } else {
                Line::from(Span::styled("(no column)", value_style))
            };
            Paragraph::new(line)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" {} ", entry.label))
                        .border_style(Style::default().fg(border)),
                )
                .render(cells[i], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::engine::FieldMap;

    fn render(bar: &FilterBar) -> String {
        let area = Rect::new(0, 0, 80, 3);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_shows_choices_and_missing_columns() {
        let raw = Dataset::new(
            vec!["Region".into(), "Offer".into()],
            vec![vec!["IN".into(), "X".into()]],
        )
        .unwrap();
        let sheet = Sheet::new(raw, FieldMap::default());
        let mut state = DashboardState::default();
        state.cycle(&sheet, LogicalField::Region, 1);

        let text = render(&FilterBar::new(Some(&sheet), &state).with_focus(Some(0)));
        assert!(text.contains("Region"));
        assert!(text.contains("◂ IN ▸"));
        assert!(text.contains("(no column)"));
    }

    #[test]
    fn test_without_sheet_uses_default_labels() {
        let text = render(&FilterBar::new(None, &DashboardState::default()));
        assert!(text.contains("Agency Access"));
        assert!(text.contains("◂ All ▸"));
    }
}
