use crate::engine::Summary;
use crate::widgets::controls::format_number_with_commas;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

/// Whole-catalog counts shown above the table. Height 3.
pub struct Placards {
    pub summary: Summary,
}

impl Widget for &Placards {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cells = Layout::new(
            Direction::Horizontal,
            [
                Constraint::Length(24),
                Constraint::Length(24),
                Constraint::Fill(1),
            ],
        )
        .split(area);

        let items = [
            ("Total Offers", self.summary.total, Color::Blue),
            ("Active Offers", self.summary.active, Color::Green),
        ];
        for (i, (label, count, color)) in items.into_iter().enumerate() {
            let line = Line::from(vec![
                Span::raw(format!("{}: ", label)),
                Span::styled(
                    format_number_with_commas(count),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]);
            Paragraph::new(line)
                .centered()
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(color)),
                )
                .render(cells[i], buf);
        }
    }
}
