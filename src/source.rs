//! Loading an offer sheet from disk into a [`Dataset`].
//!
//! Delimited text, JSON and Parquet go through Polars (after in-memory decompression
//! when the file is compressed); Excel workbooks are read with calamine. Either way the
//! result is converted cell by cell into [`CellValue`]s so the engine never sees a
//! reader-specific type.

use crate::dataset::{Dataset, ShapeError};
use crate::value::CellValue;
use crate::{CompressionFormat, FileFormat, OpenOptions};
use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use std::fs::{self, File};
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to turn a location into a dataset.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The location does not exist or cannot be read.
    #[error("{}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The bytes were readable but are not a table.
    #[error("{}: {kind}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        kind: FormatError,
    },
}

impl SourceError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Unavailable { path, .. } | Self::Format { path, .. } => path,
        }
    }

    fn unavailable(path: &Path, source: io::Error) -> Self {
        Self::Unavailable {
            path: path.to_path_buf(),
            source,
        }
    }

    fn format(path: &Path, kind: impl Into<FormatError>) -> Self {
        Self::Format {
            path: path.to_path_buf(),
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unrecognized file type; pass --format")]
    UnknownFormat,
    #[error("delimiter {0:?} is not a single ASCII character")]
    Delimiter(char),
    #[error("decompression failed: {0}")]
    Decompress(#[source] io::Error),
    #[error(transparent)]
    Polars(#[from] PolarsError),
    #[error("Excel: {0}")]
    Excel(#[from] calamine::Error),
    #[error("Excel: {0}")]
    Sheet(String),
    #[error("inconsistent columns: {0}")]
    Shape(#[from] ShapeError),
}

/// Load the sheet at `path`.
pub fn load(path: &Path, options: &OpenOptions) -> Result<Dataset, SourceError> {
    let meta = fs::metadata(path).map_err(|e| SourceError::unavailable(path, e))?;
    if meta.is_dir() {
        return Err(SourceError::unavailable(
            path,
            io::Error::other("Is a directory"),
        ));
    }

    let format = options
        .format
        .or_else(|| FileFormat::from_path(path))
        .ok_or_else(|| SourceError::format(path, FormatError::UnknownFormat))?;

    match format {
        FileFormat::Excel => load_excel(path, options.excel_sheet.as_deref()),
        FileFormat::Csv | FileFormat::Tsv | FileFormat::Psv => {
            let bytes = read_bytes(path, options)?;
            let delimiter = match options.delimiter {
                Some(c) if c.is_ascii() => c as u8,
                Some(c) => return Err(SourceError::format(path, FormatError::Delimiter(c))),
                None => format.default_delimiter().unwrap_or(b','),
            };
            read_delimited(bytes, delimiter, options).map_err(|e| SourceError::format(path, e))
        }
        FileFormat::Json => {
            let bytes = read_bytes(path, options)?;
            JsonReader::new(Cursor::new(bytes))
                .finish()
                .map_err(FormatError::from)
                .and_then(|df| dataset_from_frame(&df))
                .map_err(|e| SourceError::format(path, e))
        }
        FileFormat::Parquet => {
            let bytes = read_bytes(path, options)?;
            ParquetReader::new(Cursor::new(bytes))
                .finish()
                .map_err(FormatError::from)
                .and_then(|df| dataset_from_frame(&df))
                .map_err(|e| SourceError::format(path, e))
        }
    }
}

/// Whole file contents, decompressed when the options or the extension say so.
fn read_bytes(path: &Path, options: &OpenOptions) -> Result<Vec<u8>, SourceError> {
    let compression = options
        .compression
        .or_else(|| CompressionFormat::from_extension(path));
    let Some(compression) = compression else {
        return fs::read(path).map_err(|e| SourceError::unavailable(path, e));
    };

    let file = File::open(path).map_err(|e| SourceError::unavailable(path, e))?;
    let reader = BufReader::new(file);
    let mut decoder: Box<dyn Read> = match compression {
        CompressionFormat::Gzip => Box::new(flate2::read::MultiGzDecoder::new(reader)),
        CompressionFormat::Zstd => Box::new(
            zstd::stream::read::Decoder::with_buffer(reader)
                .map_err(|e| SourceError::format(path, FormatError::Decompress(e)))?,
        ),
        CompressionFormat::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
        CompressionFormat::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
    };
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| SourceError::format(path, FormatError::Decompress(e)))?;
    Ok(decompressed)
}

fn read_delimited(
    bytes: Vec<u8>,
    delimiter: u8,
    options: &OpenOptions,
) -> Result<Dataset, FormatError> {
    let mut read_options = CsvReadOptions::default();
    read_options.has_header = options.has_header;
    read_options.skip_rows = options.skip_rows;
    read_options.infer_schema_length = Some(options.infer_schema_length);
    read_options = read_options.map_parse_options(|opts| opts.with_separator(delimiter));
    let df = CsvReader::new(Cursor::new(bytes))
        .with_options(read_options)
        .finish()?;
    dataset_from_frame(&df)
}

/// Header text for column `idx`: trimmed, with a generated name for blanks.
fn header_name(raw: &str, idx: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("column_{}", idx + 1)
    } else {
        trimmed.to_string()
    }
}

fn text_cell(s: &str) -> CellValue {
    if s.is_empty() {
        CellValue::Empty
    } else {
        CellValue::text(s)
    }
}

fn any_value_cell(value: AnyValue) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Empty,
        AnyValue::String(s) => text_cell(s),
        AnyValue::StringOwned(s) => text_cell(s.as_str()),
        AnyValue::Boolean(b) => CellValue::text(b.to_string()),
        AnyValue::Int32(n) => CellValue::Number(n as f64),
        AnyValue::Int64(n) => CellValue::Number(n as f64),
        AnyValue::UInt32(n) => CellValue::Number(n as f64),
        AnyValue::UInt64(n) => CellValue::Number(n as f64),
        AnyValue::Float32(n) => CellValue::Number(n as f64),
        AnyValue::Float64(n) => CellValue::Number(n),
        other => text_cell(&other.str_value()),
    }
}

fn dataset_from_frame(df: &DataFrame) -> Result<Dataset, FormatError> {
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .enumerate()
        .map(|(idx, name)| header_name(name.as_str(), idx))
        .collect();
    let mut rows: Vec<Vec<CellValue>> = (0..df.height())
        .map(|_| Vec::with_capacity(columns.len()))
        .collect();
    for column in df.get_columns() {
        for (idx, row) in rows.iter_mut().enumerate() {
            row.push(any_value_cell(column.get(idx)?));
        }
    }
    Ok(Dataset::new(columns, rows)?)
}

fn load_excel(path: &Path, sheet: Option<&str>) -> Result<Dataset, SourceError> {
    let fail = |kind: FormatError| SourceError::format(path, kind);
    let mut workbook = open_workbook_auto(path).map_err(|e| fail(e.into()))?;
    if workbook.sheet_names().is_empty() {
        return Err(fail(FormatError::Sheet("workbook has no worksheets".into())));
    }
    let range = match sheet {
        Some(sel) => match sel.parse::<usize>() {
            Ok(idx) => workbook
                .worksheet_range_at(idx)
                .ok_or_else(|| fail(FormatError::Sheet(format!("no sheet at index {}", idx))))?
                .map_err(|e| fail(e.into()))?,
            Err(_) => workbook
                .worksheet_range(sel)
                .map_err(|e| fail(e.into()))?,
        },
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| fail(FormatError::Sheet("no first sheet".into())))?
            .map_err(|e| fail(e.into()))?,
    };

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Dataset::empty(Vec::new()));
    };
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let raw = calamine::DataType::as_string(c).unwrap_or_else(|| c.to_string());
            header_name(&raw, idx)
        })
        .collect();
    let body: Vec<Vec<CellValue>> = rows
        .map(|r| {
            (0..columns.len())
                .map(|idx| r.get(idx).map(excel_cell).unwrap_or_default())
                .collect()
        })
        .collect();
    Dataset::new(columns, body).map_err(|e| fail(e.into()))
}

fn excel_cell(cell: &Data) -> CellValue {
    use calamine::DataType;
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => text_cell(s),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::text(b.to_string()),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) if dt.time() == chrono::NaiveTime::MIN => {
                CellValue::text(dt.format("%Y-%m-%d").to_string())
            }
            Some(dt) => CellValue::text(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => text_cell(&cell.to_string()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => text_cell(s),
        #[allow(unreachable_patterns)]
        _ => text_cell(&cell.to_string()),
    }
}
