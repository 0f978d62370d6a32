use crate::engine::{FieldMap, LogicalField};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get path to a specific config file within the config directory
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Generate default configuration template as a string with comments.
    /// All fields are commented out so defaults are used, but users can uncomment to override.
    pub fn generate_default_config(&self) -> Result<String> {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| eyre!("Failed to serialize default config: {}", e))?;

        Ok(Self::comment_all_fields(toml_str, Self::collect_all_comments()))
    }

    /// Collect all field comments from struct constants into a map keyed by dotted path
    fn collect_all_comments() -> HashMap<String, String> {
        let mut comments = HashMap::new();
        for (field, comment) in APP_COMMENTS {
            comments.insert(field.to_string(), comment.to_string());
        }
        let sections: [(&str, &[(&str, &str)]); 4] = [
            ("file_loading", FILE_LOADING_COMMENTS),
            ("fields", FIELDS_COMMENTS),
            ("display", DISPLAY_COMMENTS),
            ("debug", DEBUG_COMMENTS),
        ];
        for (section, entries) in sections {
            for (field, comment) in entries {
                comments.insert(format!("{}.{}", section, field), comment.to_string());
            }
        }
        comments
    }

    /// Comment out all fields in TOML and add comments.
    /// Also adds missing Option fields as commented-out `# field = null`.
    fn comment_all_fields(toml: String, comments: HashMap<String, String>) -> String {
        let mut result = String::new();
        result.push_str("# offerdash configuration file\n");
        result
            .push_str("# This file uses TOML format. See https://toml.io/ for syntax reference.\n");
        result.push('\n');

        let mut current_section = String::new();
        let mut seen_fields: HashSet<String> = HashSet::new();

        for line in toml.lines() {
            if let Some(section) = Self::extract_section_name(line) {
                if let Some(header) = SECTION_HEADERS.iter().find(|(s, _)| *s == section) {
                    result.push_str(header.1);
                    result.push('\n');
                }
                result.push_str("# ");
                result.push_str(line);
                result.push('\n');
                current_section = section;
                continue;
            }

            if let Some(field_path) = Self::extract_field_path(line, &current_section) {
                if let Some(comment) = comments.get(&field_path) {
                    for comment_line in comment.lines() {
                        result.push_str("# ");
                        result.push_str(comment_line);
                        result.push('\n');
                    }
                }
                seen_fields.insert(field_path);
                result.push_str("# ");
                result.push_str(line);
                result.push('\n');
            } else {
                result.push_str(line);
                result.push('\n');
            }
        }

        Self::add_missing_option_fields(result, &comments, &seen_fields)
    }

    /// Add Option fields that were not serialized because they are None
    fn add_missing_option_fields(
        mut result: String,
        comments: &HashMap<String, String>,
        seen_fields: &HashSet<String>,
    ) -> String {
        let option_fields = [
            "file_loading.delimiter",
            "file_loading.has_header",
            "file_loading.skip_rows",
            "file_loading.infer_schema_length",
        ];

        let mut missing_by_section: Vec<(&str, Vec<&str>)> = Vec::new();
        for field_path in option_fields {
            if seen_fields.contains(field_path) || !comments.contains_key(field_path) {
                continue;
            }
            if let Some((section, _)) = field_path.split_once('.') {
                match missing_by_section.iter_mut().find(|(s, _)| *s == section) {
                    Some((_, fields)) => fields.push(field_path),
                    None => missing_by_section.push((section, vec![field_path])),
                }
            }
        }

        for (section, fields) in &missing_by_section {
            let section_header = format!("# [{}]", section);
            let Some(section_pos) = result.find(&section_header) else {
                continue;
            };
            let after_header_start = section_pos + section_header.len();
            let newline_pos = result[after_header_start..].find('\n').unwrap_or(0);
            let insert_pos = after_header_start + newline_pos + 1;

            let mut new_content = String::new();
            for field_path in fields {
                if let Some(comment) = comments.get(*field_path) {
                    for comment_line in comment.lines() {
                        new_content.push_str("# ");
                        new_content.push_str(comment_line);
                        new_content.push('\n');
                    }
                }
                let field_name = field_path.rsplit('.').next().unwrap_or(field_path);
                new_content.push_str(&format!("# {} = null\n", field_name));
            }
            result.insert_str(insert_pos, &new_content);
        }

        result
    }

    /// Extract section name from TOML line like "[display]"
    fn extract_section_name(line: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            Some(trimmed[1..trimmed.len() - 1].to_string())
        } else {
            None
        }
    }

    /// Extract dotted field path from an assignment line
    fn extract_field_path(line: &str, current_section: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('[') {
            return None;
        }
        let (field_name, _) = trimmed.split_once('=')?;
        let field_name = field_name.trim();
        if current_section.is_empty() {
            Some(field_name.to_string())
        } else {
            Some(format!("{}.{}", current_section, field_name))
        }
    }

    /// Write default configuration to config file
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, self.generate_default_config()?)?;

        Ok(config_path)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub file_loading: FileLoadingConfig,
    pub fields: FieldsConfig,
    pub display: DisplayConfig,
    pub debug: DebugConfig,
}

const APP_COMMENTS: &[(&str, &str)] = &[(
    "version",
    "Configuration format version (for future compatibility)",
)];

const SECTION_HEADERS: &[(&str, &str)] = &[
    (
        "file_loading",
        "# ============================================================================\n# File Loading Defaults\n# ============================================================================",
    ),
    (
        "fields",
        "# ============================================================================\n# Offer Fields\n# ============================================================================\n# Column header each dashboard field is read from. Matching ignores case and\n# leading/trailing spaces. A field whose column is missing is simply not shown.",
    ),
    (
        "display",
        "# ============================================================================\n# Display Settings\n# ============================================================================",
    ),
    (
        "debug",
        "# ============================================================================\n# Debug Settings\n# ============================================================================",
    ),
];

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FileLoadingConfig {
    pub delimiter: Option<char>,
    pub has_header: Option<bool>,
    pub skip_rows: Option<usize>,
    pub infer_schema_length: Option<usize>,
}

const FILE_LOADING_COMMENTS: &[(&str, &str)] = &[
    (
        "delimiter",
        "Field delimiter for CSV-like files, e.g. \";\". Unset = from extension (csv , tsv tab, psv |)",
    ),
    ("has_header", "Whether delimited files have a header row (default true)"),
    ("skip_rows", "Rows to skip before the header row"),
    (
        "infer_schema_length",
        "Rows used to infer CSV column types (default 1000)",
    ),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldsConfig {
    pub region: String,
    pub agency_access: String,
    pub current_cap: String,
    pub offer: String,
    pub campaign_type: String,
}

const FIELDS_COMMENTS: &[(&str, &str)] = &[
    ("region", "Column holding the offer's region"),
    ("agency_access", "Column telling whether agencies may run the offer"),
    (
        "current_cap",
        "Column holding cap status; \"yes\" (any case) counts as an active offer",
    ),
    ("offer", "Column holding the offer name, used for search and record briefs"),
    ("campaign_type", "Column holding the campaign type"),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub row_numbers: bool,
    pub event_poll_interval_ms: u64,
    /// Longest value shown in the record brief before truncation (0 = no limit).
    pub max_brief_value_width: usize,
}

const DISPLAY_COMMENTS: &[(&str, &str)] = &[
    ("row_numbers", "Display row numbers on the left side of the offer table"),
    (
        "event_poll_interval_ms",
        "How often to poll for key events, in milliseconds (> 0)",
    ),
    (
        "max_brief_value_width",
        "Longest value shown in the record brief before it is cut with an ellipsis (0 = no limit)",
    ),
];

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    pub enabled: bool,
}

const DEBUG_COMMENTS: &[(&str, &str)] = &[("enabled", "Enable debug overlay by default")];

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            file_loading: FileLoadingConfig::default(),
            fields: FieldsConfig::default(),
            display: DisplayConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            region: LogicalField::Region.default_label().to_string(),
            agency_access: LogicalField::AgencyAccess.default_label().to_string(),
            current_cap: LogicalField::CurrentCap.default_label().to_string(),
            offer: LogicalField::Offer.default_label().to_string(),
            campaign_type: LogicalField::CampaignType.default_label().to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            row_numbers: false,
            event_poll_interval_ms: 25,
            max_brief_value_width: 80,
        }
    }
}

impl AppConfig {
    /// Load configuration from all layers (default → user)
    pub fn load(app_name: &str) -> Result<Self> {
        let manager = ConfigManager::new(app_name)?;
        Self::load_from(&manager)
    }

    /// Load the user config file managed by `manager` on top of the defaults
    pub fn load_from(manager: &ConfigManager) -> Result<Self> {
        let config_path = manager.config_path("config.toml");
        let mut config = AppConfig::default();
        config.merge(Self::load_user_config(&config_path)?);

        config.validate().map_err(|e| {
            eyre!("Invalid configuration in {}: {}", config_path.display(), e)
        })?;

        Ok(config)
    }

    fn load_user_config(config_path: &Path) -> Result<AppConfig> {
        if !config_path.exists() {
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(config_path).map_err(|e| {
            eyre!(
                "Failed to read config file at {}: {}",
                config_path.display(),
                e
            )
        })?;

        toml::from_str(&content).map_err(|e| {
            eyre!(
                "Failed to parse config file at {}: {}",
                config_path.display(),
                e
            )
        })
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: AppConfig) {
        if other.version != AppConfig::default().version {
            self.version = other.version;
        }
        self.file_loading.merge(other.file_loading);
        self.fields.merge(other.fields);
        self.display.merge(other.display);
        self.debug.merge(other.debug);
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.version.starts_with("0.1") {
            return Err(eyre!(
                "Unsupported config version: {}. Expected 0.1.x",
                self.version
            ));
        }

        if let Some(d) = self.file_loading.delimiter {
            if !d.is_ascii() {
                return Err(eyre!("file_loading.delimiter must be an ASCII character, got {:?}", d));
            }
        }

        if self.display.event_poll_interval_ms == 0 {
            return Err(eyre!("event_poll_interval_ms must be greater than 0"));
        }

        for field in LogicalField::ALL {
            if self.fields.label(field).trim().is_empty() {
                return Err(eyre!("fields.{} must not be empty", field.key().replace('-', "_")));
            }
        }

        Ok(())
    }
}

impl FileLoadingConfig {
    pub fn merge(&mut self, other: Self) {
        if other.delimiter.is_some() {
            self.delimiter = other.delimiter;
        }
        if other.has_header.is_some() {
            self.has_header = other.has_header;
        }
        if other.skip_rows.is_some() {
            self.skip_rows = other.skip_rows;
        }
        if other.infer_schema_length.is_some() {
            self.infer_schema_length = other.infer_schema_length;
        }
    }
}

impl FieldsConfig {
    pub fn merge(&mut self, other: Self) {
        let default = FieldsConfig::default();
        for field in LogicalField::ALL {
            let label = other.label(field);
            if label != default.label(field) {
                *self.label_mut(field) = label.to_string();
            }
        }
    }

    pub fn label(&self, field: LogicalField) -> &str {
        match field {
            LogicalField::Region => &self.region,
            LogicalField::AgencyAccess => &self.agency_access,
            LogicalField::CurrentCap => &self.current_cap,
            LogicalField::Offer => &self.offer,
            LogicalField::CampaignType => &self.campaign_type,
        }
    }

    fn label_mut(&mut self, field: LogicalField) -> &mut String {
        match field {
            LogicalField::Region => &mut self.region,
            LogicalField::AgencyAccess => &mut self.agency_access,
            LogicalField::CurrentCap => &mut self.current_cap,
            LogicalField::Offer => &mut self.offer,
            LogicalField::CampaignType => &mut self.campaign_type,
        }
    }

    pub fn field_map(&self) -> FieldMap {
        LogicalField::ALL
            .into_iter()
            .fold(FieldMap::default(), |map, f| map.with_label(f, self.label(f)))
    }
}

impl DisplayConfig {
    pub fn merge(&mut self, other: Self) {
        let default = DisplayConfig::default();
        if other.row_numbers != default.row_numbers {
            self.row_numbers = other.row_numbers;
        }
        if other.event_poll_interval_ms != default.event_poll_interval_ms {
            self.event_poll_interval_ms = other.event_poll_interval_ms;
        }
        if other.max_brief_value_width != default.max_brief_value_width {
            self.max_brief_value_width = other.max_brief_value_width;
        }
    }
}

impl DebugConfig {
    pub fn merge(&mut self, other: Self) {
        let default = DebugConfig::default();
        if other.enabled != default.enabled {
            self.enabled = other.enabled;
        }
    }
}
