use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Paragraph, Widget},
};

/// Bottom bar: key hints on the left, shown/total offer counts on the right.
pub struct Controls {
    /// (shown, total) offers; None while nothing is loaded.
    pub row_count: Option<(usize, usize)>,
    pub custom_controls: Option<Vec<(&'static str, &'static str)>>,
    pub bg_color: Color,
    pub key_color: Color,
    pub label_color: Color,
    /// When true, show a spinner frame at far right.
    pub busy: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            row_count: None,
            custom_controls: None,
            bg_color: Color::Indexed(236),
            key_color: Color::Cyan,
            label_color: Color::White,
            busy: false,
        }
    }
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row_count(mut self, shown: usize, total: usize) -> Self {
        self.row_count = Some((shown, total));
        self
    }

    pub fn with_custom_controls(mut self, controls: Vec<(&'static str, &'static str)>) -> Self {
        self.custom_controls = Some(controls);
        self
    }

    pub fn with_busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }
}

impl Widget for &Controls {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .style(Style::default().bg(self.bg_color))
            .render(area, buf);

        const DEFAULT_CONTROLS: [(&str, &str); 8] = [
            ("Tab", "Filter"),
            ("←→", "Change"),
            ("/", "Search"),
            ("Enter", "Brief"),
            ("x", "Clear"),
            ("r", "Reload"),
            ("?", "Help"),
            ("q", "Quit"),
        ];

        let controls: Vec<(&str, &str)> = match &self.custom_controls {
            Some(custom) => custom.to_vec(),
            None => DEFAULT_CONTROLS.to_vec(),
        };

        // Key: key.len() + 1 (trailing space). Label: action.len() + 1 (gap before next key).
        let pair_width = |(key, action): &(&str, &str)| -> u16 {
            (key.chars().count() as u16 + 1) + (action.chars().count() as u16 + 1)
        };

        const SPINNER_WIDTH: u16 = 3;
        const COUNT_WIDTH: u16 = 24;
        let right_reserved =
            (if self.row_count.is_some() { COUNT_WIDTH + 1 } else { 1 }) + SPINNER_WIDTH;
        let mut available = area.width.saturating_sub(right_reserved);

        let mut n_show = 0;
        for pair in controls.iter() {
            let need = pair_width(pair);
            if available < need {
                break;
            }
            available -= need;
            n_show += 1;
        }

        let mut constraints: Vec<Constraint> = controls
            .iter()
            .take(n_show)
            .flat_map(|(key, action)| {
                [
                    Constraint::Length(key.chars().count() as u16 + 1),
                    Constraint::Length(action.chars().count() as u16 + 1),
                ]
            })
            .collect();
        constraints.push(Constraint::Fill(1));
        if self.row_count.is_some() {
            constraints.push(Constraint::Length(COUNT_WIDTH));
        }
        constraints.push(Constraint::Length(SPINNER_WIDTH));

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);

        let base = Style::default().bg(self.bg_color);
        let key_style = base.fg(self.key_color);
        let label_style = base.fg(self.label_color);

        for (i, (key, action)) in controls.iter().take(n_show).enumerate() {
            let j = i * 2;
            Paragraph::new(*key).style(key_style).render(layout[j], buf);
            Paragraph::new(*action)
                .style(label_style)
                .render(layout[j + 1], buf);
        }

        let fill_idx = n_show * 2;
        if let Some((shown, total)) = self.row_count {
            Paragraph::new(format!(
                "Offers: {} / {}",
                format_number_with_commas(shown),
                format_number_with_commas(total)
            ))
            .style(label_style)
            .right_aligned()
            .render(layout[fill_idx + 1], buf);
        }

        let spinner_idx = fill_idx + if self.row_count.is_some() { 2 } else { 1 };
        Paragraph::new(if self.busy { "…" } else { " " })
            .style(key_style)
            .centered()
            .render(layout[spinner_idx], buf);
    }
}

pub(crate) fn format_number_with_commas(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}
