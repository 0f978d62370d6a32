//! Shared CLI definitions for offerdash.
//!
//! Used by the main application and by the build script (manpage) and
//! gen_docs binary (command-line-options markdown).

use clap::{CommandFactory, Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// File format for offer sheets (used to bypass extension-based detection).
/// When `--format` is not specified, format is auto-detected from the file extension.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
    /// Pipe-separated values
    Psv,
    /// JSON array of row objects
    Json,
    /// Parquet columnar format
    Parquet,
    /// Excel (.xls, .xlsx, .xlsm, .xlsb)
    Excel,
}

impl FileFormat {
    /// Detect file format from path extension, ignoring a trailing compression suffix
    /// (`offers.csv.gz` is Csv). Returns None when extension is missing or unknown.
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem_path;
        let path = if CompressionFormat::from_extension(path).is_some() {
            stem_path = path.with_extension("");
            stem_path.as_path()
        } else {
            path
        };
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Parse format from extension string (e.g. "csv", "xlsx").
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            "psv" => Some(Self::Psv),
            "json" => Some(Self::Json),
            "parquet" => Some(Self::Parquet),
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Field separator implied by the format, for delimited text formats.
    pub fn default_delimiter(&self) -> Option<u8> {
        match self {
            Self::Csv => Some(b','),
            Self::Tsv => Some(b'\t'),
            Self::Psv => Some(b'|'),
            Self::Json | Self::Parquet | Self::Excel => None,
        }
    }
}

/// Compression format for offer sheets
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Gzip compression (.gz)
    Gzip,
    /// Zstandard compression (.zst)
    Zstd,
    /// Bzip2 compression (.bz2)
    Bzip2,
    /// XZ compression (.xz)
    Xz,
}

impl CompressionFormat {
    /// Detect compression format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            match ext.to_lowercase().as_str() {
                "gz" => Some(Self::Gzip),
                "zst" | "zstd" => Some(Self::Zstd),
                "bz2" | "bz" => Some(Self::Bzip2),
                "xz" => Some(Self::Xz),
                _ => None,
            }
        } else {
            None
        }
    }

    /// Get file extension for this compression format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Gzip => "gz",
            Self::Zstd => "zst",
            Self::Bzip2 => "bz2",
            Self::Xz => "xz",
        }
    }
}

/// Command-line arguments for offerdash
#[derive(Clone, Parser, Debug)]
#[command(
    name = "offerdash",
    version,
    about = "Affiliate offers dashboard in the terminal",
    long_about = "Load a sheet of affiliate offers and narrow it down by region, agency \
                  access, cap status and campaign type, search offer names, and inspect \
                  a single offer's full record."
)]
pub struct Args {
    /// Path to the offers sheet (CSV, TSV, PSV, JSON, Parquet or Excel; CSV may be compressed)
    #[arg(required_unless_present = "generate_config", value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Force file format (csv, tsv, psv, json, parquet, excel).
    /// By default format is auto-detected from the file extension.
    #[arg(long = "format", value_enum)]
    pub format: Option<FileFormat>,

    /// Specify the compression format explicitly (gzip, zstd, bzip2, xz)
    /// If not specified, compression is auto-detected from file extension.
    #[arg(long = "compression", value_enum)]
    pub compression: Option<CompressionFormat>,

    /// Field delimiter for delimited text files (single ASCII character)
    #[arg(long = "delimiter")]
    pub delimiter: Option<char>,

    /// Specify that the file has no header row
    #[arg(long = "no-header")]
    pub no_header: Option<bool>,

    /// Skip this many rows before the header when reading a delimited file
    #[arg(long = "skip-rows")]
    pub skip_rows: Option<usize>,

    /// Number of rows to use when inferring CSV column types (default: 1000)
    #[arg(long = "infer-schema-length", value_name = "N")]
    pub infer_schema_length: Option<usize>,

    /// Excel sheet to load: 0-based index (e.g. 0) or sheet name (e.g. "Offers")
    #[arg(long = "sheet", value_name = "SHEET")]
    pub excel_sheet: Option<String>,

    /// Enable debug mode to show operational information
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Print the dashboard as plain text and exit instead of starting the interactive view
    #[arg(long = "print", action)]
    pub print: bool,

    /// Filter to apply in --print mode, as FIELD=VALUE (repeatable). FIELD is one of
    /// region, agency-access, current-cap, campaign-type. VALUE "All" means no constraint.
    #[arg(long = "filter", value_name = "FIELD=VALUE", requires = "print")]
    pub filters: Vec<String>,

    /// Offer-name search term for --print mode (case-insensitive substring)
    #[arg(long = "search", value_name = "TERM", requires = "print")]
    pub search: Option<String>,

    /// Offer to show as a record brief in --print mode
    #[arg(long = "brief", value_name = "OFFER", requires = "print")]
    pub brief: Option<String>,

    /// Generate default configuration file at ~/.config/offerdash/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,
}

/// Escape `|` and newlines for use in markdown table cells.
fn escape_table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Render command-line options as markdown.
///
/// Used by the gen_docs binary; output is written to stdout.
pub fn render_options_markdown() -> String {
    let mut cmd = Args::command();
    cmd.build();

    let mut out = String::from("# Command Line Options\n\n");

    out.push_str("## Usage\n\n```\n");
    let usage = cmd.render_usage();
    out.push_str(&usage.to_string());
    out.push_str("\n```\n\n");

    out.push_str("## Options\n\n");
    out.push_str("| Option | Description |\n");
    out.push_str("|--------|-------------|\n");

    for arg in cmd.get_arguments() {
        let id = arg.get_id().as_ref().to_string();
        if id == "help" || id == "version" {
            continue;
        }

        let placeholder: String = arg
            .get_value_names()
            .map(|names| {
                names
                    .iter()
                    .map(|n: &clap::builder::Str| format!("<{}>", n.as_ref() as &str))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        // The only positional is the sheet path, optional with --generate-config.
        let option_str = match arg.get_long() {
            None => format!("[{placeholder}]"),
            Some(long) if arg.get_action().takes_values() && !placeholder.is_empty() => {
                format!("--{long} {placeholder}")
            }
            Some(long) => format!("--{long}"),
        };

        let help = arg
            .get_help()
            .map(|h| escape_table_cell(&h.to_string()))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(&format!("| `{option_str}` | {help} |\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_detection() {
        assert_eq!(
            CompressionFormat::from_extension(Path::new("offers.csv.gz")),
            Some(CompressionFormat::Gzip)
        );
        assert_eq!(
            CompressionFormat::from_extension(Path::new("offers.csv.zst")),
            Some(CompressionFormat::Zstd)
        );
        assert_eq!(
            CompressionFormat::from_extension(Path::new("offers.csv.bz2")),
            Some(CompressionFormat::Bzip2)
        );
        assert_eq!(
            CompressionFormat::from_extension(Path::new("offers.csv.xz")),
            Some(CompressionFormat::Xz)
        );
        assert_eq!(
            CompressionFormat::from_extension(Path::new("offers.csv")),
            None
        );
        assert_eq!(CompressionFormat::from_extension(Path::new("offers")), None);
    }

    #[test]
    fn test_file_format_from_path() {
        assert_eq!(
            FileFormat::from_path(Path::new("offers.xlsx")),
            Some(FileFormat::Excel)
        );
        assert_eq!(
            FileFormat::from_path(Path::new("offers.CSV")),
            Some(FileFormat::Csv)
        );
        assert_eq!(
            FileFormat::from_path(Path::new("offers.tsv.gz")),
            Some(FileFormat::Tsv)
        );
        assert_eq!(FileFormat::from_path(Path::new("offers.gz")), None);
        assert_eq!(FileFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_default_delimiter() {
        assert_eq!(FileFormat::Psv.default_delimiter(), Some(b'|'));
        assert_eq!(FileFormat::Excel.default_delimiter(), None);
    }

    #[test]
    fn test_args_parse_print_mode() {
        let args = Args::try_parse_from([
            "offerdash",
            "offers.csv",
            "--print",
            "--filter",
            "region=IN",
            "--filter",
            "current-cap=Yes",
            "--search",
            "z",
        ])
        .unwrap();
        assert!(args.print);
        assert_eq!(args.filters, vec!["region=IN", "current-cap=Yes"]);
        assert_eq!(args.search.as_deref(), Some("z"));
    }

    #[test]
    fn test_filter_requires_print() {
        assert!(Args::try_parse_from(["offerdash", "offers.csv", "--filter", "region=IN"]).is_err());
    }

    #[test]
    fn test_path_optional_with_generate_config() {
        let args = Args::try_parse_from(["offerdash", "--generate-config"]).unwrap();
        assert!(args.path.is_none());
        assert!(Args::try_parse_from(["offerdash"]).is_err());
    }

    #[test]
    fn test_render_options_markdown_lists_flags() {
        let md = render_options_markdown();
        assert!(md.contains("--filter"));
        assert!(md.contains("--sheet"));
        assert!(!md.contains("`--help`"));
        assert!(md.contains("| `[<PATH>]` |"));
        assert!(md.contains("| `--sheet <SHEET>` |"));
        assert!(md.contains("| `--debug` |"));
    }
}
