use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Paragraph, Widget},
};
use std::time::Duration;

#[derive(Default)]
pub struct DebugState {
    pub num_events: usize,
    pub num_frames: usize,
    pub num_key_events: usize,
    pub last_key_event_name: String,
    /// Last action taken (e.g. "cycle_filter") for debugging key handling.
    pub last_action: String,
    pub enabled: bool,
    /// How long the last sheet load took, and how many rows it produced.
    pub last_load: Option<(Duration, usize)>,
    /// How long the last filter/search pass took.
    pub last_pass: Option<Duration>,
}

impl DebugState {
    pub fn on_key(&mut self, event: &crossterm::event::KeyEvent) {
        self.num_key_events += 1;
        self.last_key_event_name = format!("{:?}", event.code);
    }
}

impl Widget for &DebugState {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let load = self
            .last_load
            .map(|(d, rows)| format!("{}ms/{}rows", d.as_millis(), rows))
            .unwrap_or_else(|| "-".to_string());
        let pass = self
            .last_pass
            .map(|d| format!("{}us", d.as_micros()))
            .unwrap_or_else(|| "-".to_string());
        Paragraph::new(format!(
            "events={} keys={} last_key={} last_action={} frames={} load={} pass={}",
            self.num_events,
            self.num_key_events,
            self.last_key_event_name,
            self.last_action,
            self.num_frames,
            load,
            pass
        ))
        .render(area, buf);
    }
}
