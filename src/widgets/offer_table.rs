use crate::dataset::Dataset;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Row, StatefulWidget, Table, TableState, Widget},
};

/// Column widths are capped so one long cell does not squeeze the rest off screen.
const MAX_COLUMN_WIDTH: usize = 40;

/// The current view of the sheet.
pub struct OfferTable<'a> {
    view: &'a Dataset,
    row_numbers: bool,
    title: String,
}

impl<'a> OfferTable<'a> {
    pub fn new(view: &'a Dataset) -> Self {
        Self {
            view,
            row_numbers: false,
            title: " Offers ".to_string(),
        }
    }

    pub fn with_row_numbers(mut self, row_numbers: bool) -> Self {
        self.row_numbers = row_numbers;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn widths(&self) -> Vec<Constraint> {
        let mut widths: Vec<Constraint> = Vec::with_capacity(self.view.columns().len() + 1);
        if self.row_numbers {
            let digits = self.view.len().max(1).to_string().len();
            widths.push(Constraint::Length(digits as u16));
        }
        for (i, name) in self.view.columns().iter().enumerate() {
            let widest = self
                .view
                .rows()
                .iter()
                .map(|r| r[i].to_text().chars().count())
                .max()
                .unwrap_or(0)
                .max(name.chars().count())
                .min(MAX_COLUMN_WIDTH);
            widths.push(Constraint::Length(widest as u16));
        }
        widths
    }
}

impl StatefulWidget for OfferTable<'_> {
    type State = TableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TableState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title.clone());

        if self.view.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            Line::from("No offers match the current filters")
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .render(inner, buf);
            return;
        }

        let header_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let mut header: Vec<Cell> = Vec::new();
        if self.row_numbers {
            header.push(Cell::from("#"));
        }
        header.extend(self.view.columns().iter().map(|c| Cell::from(c.as_str())));

        let rows = self.view.rows().iter().enumerate().map(|(i, row)| {
            let mut cells: Vec<Cell> = Vec::with_capacity(row.len() + 1);
            if self.row_numbers {
                cells.push(Cell::from((i + 1).to_string()).style(Style::default().fg(Color::DarkGray)));
            }
            cells.extend(row.iter().map(|v| Cell::from(v.to_text().into_owned())));
            Row::new(cells)
        });

        let table = Table::new(rows, self.widths())
            .column_spacing(2)
            .block(block)
            .header(Row::new(header).style(header_style))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        StatefulWidget::render(table, area, buf, state);
    }
}
