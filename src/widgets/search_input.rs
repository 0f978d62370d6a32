use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};
use tui_textarea::{CursorMove, Input, Key, TextArea};

/// Event emitted by SearchInput
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchInputEvent {
    None,
    Changed, // Term edited; the view should be refreshed
    Submit,  // Enter pressed
    Cancel,  // Esc pressed
}

/// Single-line offer search box wrapping tui-textarea.
pub struct SearchInput {
    textarea: TextArea<'static>,
    value: String,
    focused: bool,
}

impl SearchInput {
    pub fn new() -> Self {
        let mut input = Self {
            textarea: TextArea::default(),
            value: String::new(),
            focused: false,
        };
        input.apply_style();
        input
    }

    fn apply_style(&mut self) {
        self.textarea
            .set_style(Style::default().fg(Color::White));
        self.textarea.set_cursor_line_style(Style::default());
        self.textarea
            .set_placeholder_text("Search offer names (/ to edit)");
        self.textarea
            .set_placeholder_style(Style::default().fg(Color::DarkGray));
        self.apply_cursor();
    }

    fn apply_cursor(&mut self) {
        if self.focused {
            self.textarea
                .set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
        } else {
            // Same style as the text hides the cursor.
            let style = self.textarea.style();
            self.textarea.set_cursor_style(style);
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        self.apply_cursor();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: &str) {
        let single_line = value.replace(['\n', '\r'], " ");
        self.textarea = TextArea::new(vec![single_line.clone()]);
        self.value = single_line;
        self.apply_style();
        self.textarea.move_cursor(CursorMove::End);
    }

    pub fn clear(&mut self) {
        self.set_value("");
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> SearchInputEvent {
        match event.code {
            KeyCode::Enter => return SearchInputEvent::Submit,
            KeyCode::Esc => return SearchInputEvent::Cancel,
            _ => {}
        }
        let input = key_event_to_input(event);
        if matches!(input.key, Key::Char('\n') | Key::Char('\r') | Key::Null) {
            return SearchInputEvent::None;
        }
        self.textarea.input(input);
        let value = self.textarea.lines().first().cloned().unwrap_or_default();
        if value == self.value {
            return SearchInputEvent::None;
        }
        self.value = value;
        SearchInputEvent::Changed
    }
}

impl Default for SearchInput {
    fn default() -> Self {
        Self::new()
    }
}

fn key_event_to_input(event: &KeyEvent) -> Input {
    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => Key::Null,
    };
    Input {
        key,
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        alt: event.modifiers.contains(KeyModifiers::ALT),
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
    }
}

impl Widget for &SearchInput {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        block.render(area, buf);
        self.textarea.render(inner, buf);

        for y in inner.y..inner.bottom() {
            for x in inner.x..inner.right() {
                let cell = &mut buf[(x, y)];
                let style = cell.style().remove_modifier(Modifier::UNDERLINED);
                cell.set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_reports_changes() {
        let mut input = SearchInput::new();
        assert_eq!(
            input.handle_key(&key(KeyCode::Char('z'))),
            SearchInputEvent::Changed
        );
        assert_eq!(input.value(), "z");
        assert_eq!(
            input.handle_key(&key(KeyCode::Backspace)),
            SearchInputEvent::Changed
        );
        assert_eq!(input.value(), "");
        assert_eq!(
            input.handle_key(&key(KeyCode::Backspace)),
            SearchInputEvent::None
        );
    }

    #[test]
    fn test_enter_and_esc() {
        let mut input = SearchInput::new();
        input.set_value("abc");
        assert_eq!(input.handle_key(&key(KeyCode::Enter)), SearchInputEvent::Submit);
        assert_eq!(input.handle_key(&key(KeyCode::Esc)), SearchInputEvent::Cancel);
        assert_eq!(input.value(), "abc");
    }

    #[test]
    fn test_set_value_flattens_newlines() {
        let mut input = SearchInput::new();
        input.set_value("a\nb");
        assert_eq!(input.value(), "a b");
        input.clear();
        assert_eq!(input.value(), "");
    }
}
