use crate::engine::RecordBrief;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Field/value listing for the selected offer.
pub struct BriefPanel<'a> {
    offer: &'a str,
    brief: Option<&'a RecordBrief>,
    max_value_width: usize,
}

impl<'a> BriefPanel<'a> {
    pub fn new(offer: &'a str, brief: Option<&'a RecordBrief>) -> Self {
        Self {
            offer,
            brief,
            max_value_width: 80,
        }
    }

    pub fn with_max_value_width(mut self, width: usize) -> Self {
        self.max_value_width = if width == 0 { usize::MAX } else { width };
        self
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let Some(brief) = self.brief else {
            return vec![Line::from(Span::styled(
                "No matching offer in the current view",
                Style::default().fg(Color::DarkGray),
            ))];
        };
        let name_width = brief
            .fields
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0);
        brief
            .fields
            .iter()
            .map(|(name, value)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<width$}  ", name, width = name_width),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(truncate(&value.to_text(), self.max_value_width)),
                ])
            })
            .collect()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

impl Widget for &BriefPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(Span::styled(
                        format!(" {} ", self.offer),
                        Style::default().add_modifier(Modifier::BOLD),
                    ))
                    .title_bottom(" Esc close "),
            )
            .render(area, buf);
    }
}
