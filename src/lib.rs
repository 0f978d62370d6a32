use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::{Path, PathBuf};
use std::time::Instant;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Clear, Paragraph, StatefulWidget, TableState, Wrap,
};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod engine;
pub mod error_display;
pub mod render;
pub mod report;
pub mod source;
pub mod value;
pub mod widgets;

pub use config::{AppConfig, ConfigManager};
pub use dashboard::{DashboardState, Sheet};
pub use dataset::Dataset;
pub use offerdash_cli::{Args, CompressionFormat, FileFormat};
pub use source::{FormatError, SourceError};
pub use value::CellValue;

use engine::LogicalField;
use render::{app_layout, centered_rect};
use widgets::brief::BriefPanel;
use widgets::controls::Controls;
use widgets::debug::DebugState;
use widgets::filter_bar::FilterBar;
use widgets::offer_table::OfferTable;
use widgets::placards::Placards;
use widgets::search_input::{SearchInput, SearchInputEvent};

/// Application name used for the config directory and other app-specific paths
pub const APP_NAME: &str = "offerdash";

const DEFAULT_INFER_SCHEMA_LENGTH: usize = 1000;

/// How to read an offer sheet. CLI arguments win over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenOptions {
    /// Overrides extension-based detection.
    pub format: Option<FileFormat>,
    /// Overrides extension-based detection.
    pub compression: Option<CompressionFormat>,
    /// Delimited files only; must be ASCII.
    pub delimiter: Option<char>,
    pub has_header: bool,
    pub skip_rows: usize,
    pub infer_schema_length: usize,
    /// Excel sheet by name or zero-based index. First sheet when unset.
    pub excel_sheet: Option<String>,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenOptions {
    pub fn new() -> Self {
        Self {
            format: None,
            compression: None,
            delimiter: None,
            has_header: true,
            skip_rows: 0,
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
            excel_sheet: None,
        }
    }

    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_compression(mut self, compression: CompressionFormat) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    pub fn with_excel_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.excel_sheet = Some(sheet.into());
        self
    }

    /// Create OpenOptions from CLI args and config, with CLI args taking precedence
    pub fn from_args_and_config(args: &Args, config: &AppConfig) -> Self {
        let loading = &config.file_loading;
        Self {
            format: args.format,
            compression: args.compression,
            delimiter: args.delimiter.or(loading.delimiter),
            has_header: match args.no_header {
                Some(no_header) => !no_header,
                None => loading.has_header.unwrap_or(true),
            },
            skip_rows: args.skip_rows.or(loading.skip_rows).unwrap_or(0),
            infer_schema_length: args
                .infer_schema_length
                .or(loading.infer_schema_length)
                .unwrap_or(DEFAULT_INFER_SCHEMA_LENGTH),
            excel_sheet: args.excel_sheet.clone(),
        }
    }
}

impl From<&Args> for OpenOptions {
    fn from(args: &Args) -> Self {
        Self::from_args_and_config(args, &AppConfig::default())
    }
}

pub enum AppEvent {
    Key(KeyEvent),
    Open(PathBuf, OpenOptions),
    DoLoad(PathBuf, OpenOptions), // Internal event to actually perform loading after UI update
    Reload,
    Exit,
    Resize(u16, u16), // resized (width, height)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

pub struct App {
    config: AppConfig,
    path: Option<PathBuf>,
    options: OpenOptions,
    sheet: Option<Sheet>,
    state: DashboardState,
    view: Dataset,
    table_state: TableState,
    /// User-facing message for the last failed load. Filtering is off until a reload succeeds.
    load_error: Option<String>,
    loading: bool,
    input_mode: InputMode,
    search: SearchInput,
    /// Index into `LogicalField::FILTERABLE`.
    filter_focus: usize,
    brief_open: bool,
    show_help: bool,
    debug: DebugState,
}

impl App {
    pub fn new(config: AppConfig) -> App {
        let mut app = App {
            path: None,
            options: OpenOptions::new(),
            sheet: None,
            state: DashboardState::default(),
            view: Dataset::empty(Vec::new()),
            table_state: TableState::default(),
            load_error: None,
            loading: false,
            input_mode: InputMode::Normal,
            search: SearchInput::new(),
            filter_focus: 0,
            brief_open: false,
            show_help: false,
            debug: DebugState::default(),
            config,
        };
        if app.config.debug.enabled {
            app.enable_debug();
        }
        app
    }

    pub fn enable_debug(&mut self) {
        self.debug.enabled = true;
    }

    pub fn sheet(&self) -> Option<&Sheet> {
        self.sheet.as_ref()
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Rows currently shown in the table.
    pub fn view(&self) -> &Dataset {
        &self.view
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn is_brief_open(&self) -> bool {
        self.brief_open
    }

    pub fn focused_filter(&self) -> LogicalField {
        LogicalField::FILTERABLE[self.filter_focus]
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.table_state.selected()
    }

    fn load(&mut self, path: &Path, options: &OpenOptions) {
        let start = Instant::now();
        match source::load(path, options) {
            Ok(raw) => {
                let rows = raw.len();
                let sheet = Sheet::new(raw, self.config.fields.field_map());
                self.state.retain_valid(&sheet);
                self.sheet = Some(sheet);
                self.load_error = None;
                self.debug.last_load = Some((start.elapsed(), rows));
                self.refresh();
            }
            Err(e) => {
                self.sheet = None;
                self.view = Dataset::empty(Vec::new());
                self.table_state.select(None);
                self.brief_open = false;
                self.load_error = Some(error_display::user_message_from_source(&e));
                self.debug.last_action = "load_failed".to_string();
            }
        }
    }

    /// Recompute the view after any selection change and keep the cursor on a real row.
    fn refresh(&mut self) {
        let Some(sheet) = &self.sheet else {
            return;
        };
        let start = Instant::now();
        self.view = self.state.view(sheet);
        self.debug.last_pass = Some(start.elapsed());
        let selected = match (self.view.len(), self.table_state.selected()) {
            (0, _) => None,
            (len, Some(i)) => Some(i.min(len - 1)),
            (_, None) => Some(0),
        };
        self.table_state.select(selected);
    }

    fn cycle_focused(&mut self, step: isize) {
        let field = self.focused_filter();
        if let Some(sheet) = &self.sheet {
            if self.state.cycle(sheet, field, step) {
                self.debug.last_action = format!("cycle_filter:{}", field.key());
                self.refresh();
            }
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.view.is_empty() {
            return;
        }
        let last = self.view.len() as isize - 1;
        let current = self.table_state.selected().unwrap_or(0) as isize;
        self.table_state
            .select(Some((current + delta).clamp(0, last) as usize));
    }

    fn open_brief(&mut self) {
        let Some(sheet) = &self.sheet else {
            return;
        };
        let offer = self
            .table_state
            .selected()
            .and_then(|row| sheet.offer_text(&self.view, row));
        if let Some(offer) = offer {
            self.debug.last_action = "open_brief".to_string();
            self.state.selected_offer = Some(offer);
            self.brief_open = true;
        }
    }

    fn clear_selections(&mut self) {
        self.state.reset();
        self.search.clear();
        self.brief_open = false;
        self.debug.last_action = "clear".to_string();
        self.refresh();
    }

    fn search_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        match self.search.handle_key(event) {
            SearchInputEvent::Changed => {
                self.state.query.search = self.search.value().to_string();
                self.refresh();
            }
            SearchInputEvent::Submit => {
                self.input_mode = InputMode::Normal;
                self.search.set_focused(false);
            }
            SearchInputEvent::Cancel => {
                self.search.clear();
                self.state.query.search.clear();
                self.input_mode = InputMode::Normal;
                self.search.set_focused(false);
                self.refresh();
            }
            SearchInputEvent::None => {}
        }
        None
    }

    fn key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        self.debug.on_key(event);

        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppEvent::Exit);
        }
        if self.input_mode == InputMode::Search {
            return self.search_key(event);
        }
        if self.show_help {
            if matches!(event.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return None;
        }

        match event.code {
            KeyCode::Char('q') => return Some(AppEvent::Exit),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('r') => return Some(AppEvent::Reload),
            KeyCode::Esc if self.brief_open => self.brief_open = false,
            _ if self.sheet.is_none() => {}
            KeyCode::Tab => {
                self.filter_focus = (self.filter_focus + 1) % LogicalField::FILTERABLE.len();
            }
            KeyCode::BackTab => {
                let n = LogicalField::FILTERABLE.len();
                self.filter_focus = (self.filter_focus + n - 1) % n;
            }
            KeyCode::Left | KeyCode::Char('h') => self.cycle_focused(-1),
            KeyCode::Right | KeyCode::Char('l') => self.cycle_focused(1),
            KeyCode::Char('x') => self.clear_selections(),
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                self.search.set_focused(true);
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(10),
            KeyCode::PageUp => self.move_selection(-10),
            KeyCode::Home | KeyCode::Char('g') => self.move_selection(isize::MIN / 2),
            KeyCode::End | KeyCode::Char('G') => self.move_selection(isize::MAX / 2),
            KeyCode::Enter => self.open_brief(),
            _ => {}
        }
        None
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        self.debug.num_events += 1;
        match event {
            AppEvent::Key(key) => self.key(key),
            AppEvent::Open(path, options) => {
                // Render the loading notice before blocking on the read
                self.path = Some(path.clone());
                self.options = options.clone();
                self.loading = true;
                Some(AppEvent::DoLoad(path.clone(), options.clone()))
            }
            AppEvent::DoLoad(path, options) => {
                self.load(path, options);
                self.loading = false;
                None
            }
            AppEvent::Reload => {
                let path = self.path.clone()?;
                self.debug.last_action = "reload".to_string();
                Some(AppEvent::Open(path, self.options.clone()))
            }
            AppEvent::Resize(_, _) | AppEvent::Exit => None,
        }
    }

    fn controls(&self) -> Controls {
        let mut controls = Controls::new().with_busy(self.loading);
        if let Some(sheet) = &self.sheet {
            controls = controls.with_row_count(self.view.len(), sheet.summary().total);
        }
        if self.input_mode == InputMode::Search {
            controls = controls.with_custom_controls(vec![("Enter", "Keep"), ("Esc", "Clear")]);
        } else if self.sheet.is_none() {
            controls = controls.with_custom_controls(vec![("r", "Reload"), ("q", "Quit")]);
        } else if self.brief_open {
            controls = controls.with_custom_controls(vec![
                ("Esc", "Close"),
                ("↑↓", "Move"),
                ("Enter", "Brief"),
                ("q", "Quit"),
            ]);
        }
        controls
    }

    fn render_message(area: Rect, buf: &mut Buffer, title: &str, lines: Vec<Line>, color: Color) {
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(format!(" {} ", title))
                    .border_style(Style::default().fg(color)),
            )
            .render(area, buf);
    }

    fn render_help(area: Rect, buf: &mut Buffer) {
        const KEYS: [(&str, &str); 12] = [
            ("Tab / Shift-Tab", "Focus next / previous filter"),
            ("← → / h l", "Change the focused filter"),
            ("/", "Search offer names"),
            ("Enter", "Brief for the offer under the cursor"),
            ("Esc", "Close the brief"),
            ("↑ ↓ / j k", "Move"),
            ("PgUp PgDn", "Move by page"),
            ("Home End / g G", "First / last offer"),
            ("x", "Clear filters and search"),
            ("r", "Reload the sheet"),
            ("?", "Toggle this help"),
            ("q / Ctrl-C", "Quit"),
        ];
        let lines: Vec<Line> = KEYS
            .iter()
            .map(|(key, action)| {
                Line::from(vec![
                    Span::styled(format!("{:<18}", key), Style::default().fg(Color::Cyan)),
                    Span::raw(*action),
                ])
            })
            .collect();
        Clear.render(area, buf);
        Self::render_message(area, buf, "Help", lines, Color::Cyan);
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.debug.num_frames += 1;
        let layout = app_layout(area, self.debug.enabled);

        Placards {
            summary: self.sheet.as_ref().map(Sheet::summary).unwrap_or_default(),
        }
        .render(layout.placards, buf);

        let focus = (self.input_mode == InputMode::Normal).then_some(self.filter_focus);
        FilterBar::new(self.sheet.as_ref(), &self.state)
            .with_focus(focus)
            .render(layout.filters, buf);

        self.search.render(layout.search, buf);

        if self.loading {
            let name = self
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            App::render_message(
                layout.table,
                buf,
                "Loading",
                vec![Line::from(format!("Reading {}…", name))],
                Color::Yellow,
            );
        } else if let Some(message) = &self.load_error {
            App::render_message(
                layout.table,
                buf,
                "Error",
                vec![
                    Line::from(Span::styled(
                        message.clone(),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from("Filtering is disabled. Press r to reload or q to quit."),
                ],
                Color::Red,
            );
        } else if let Some(sheet) = &self.sheet {
            let title = self
                .path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| format!(" {} ", n.to_string_lossy()))
                .unwrap_or_else(|| " Offers ".to_string());
            OfferTable::new(&self.view)
                .with_row_numbers(self.config.display.row_numbers)
                .with_title(title)
                .render(layout.table, buf, &mut self.table_state);

            if self.brief_open {
                let brief = self.state.brief(sheet, &self.view);
                let offer = self.state.selected_offer.as_deref().unwrap_or_default();
                let popup = centered_rect(layout.table, 70, 80);
                BriefPanel::new(offer, brief.as_ref())
                    .with_max_value_width(self.config.display.max_brief_value_width)
                    .render(popup, buf);
            }
        } else {
            App::render_message(
                layout.table,
                buf,
                "Offers",
                vec![Line::from("No sheet loaded")],
                Color::DarkGray,
            );
        }

        self.controls().render(layout.control_bar, buf);

        if self.show_help {
            App::render_help(centered_rect(area, 60, 60), buf);
        }

        if let Some(debug_area) = layout.debug {
            self.debug.render(debug_area, buf);
        }
    }
}
