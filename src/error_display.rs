//! User-facing error message formatting.
//!
//! Uses typed error matching (SourceError, PolarsError variants, io::ErrorKind) rather
//! than string parsing to produce actionable, one-line messages.

use crate::source::{FormatError, SourceError};
use polars::prelude::PolarsError;
use std::io;

/// One-line message for a failed sheet load, naming the file.
pub fn user_message_from_source(err: &SourceError) -> String {
    let path = err.path().display();
    match err {
        SourceError::Unavailable { source, .. } => {
            format!("Cannot open {}: {}", path, user_message_from_io(source, None))
        }
        SourceError::Format { kind, .. } => {
            format!("Cannot read {} as an offer sheet: {}", path, user_message_from_format(kind))
        }
    }
}

fn user_message_from_format(err: &FormatError) -> String {
    match err {
        FormatError::Polars(e) => user_message_from_polars(e),
        FormatError::Decompress(e) => {
            format!("Decompression failed. {}", user_message_from_io(e, None))
        }
        other => other.to_string(),
    }
}

/// Format a PolarsError as a user-facing message by matching on its variant.
pub fn user_message_from_polars(err: &PolarsError) -> String {
    use polars::prelude::PolarsError as PE;

    match err {
        PE::ColumnNotFound(msg) => format!("Column not found: {}", msg),
        PE::Duplicate(msg) => format!("Duplicate column name: {}", msg),
        PE::IO { error, msg } => {
            user_message_from_io(error.as_ref(), msg.as_ref().map(|m| m.as_ref()))
        }
        PE::NoData(msg) => format!("No data: {}", msg),
        PE::SchemaMismatch(msg) => format!("Schema mismatch: {}", msg),
        PE::ShapeMismatch(msg) => format!("Row shape mismatch: {}", msg),
        PE::ComputeError(msg) => simplify_compute_message(msg),
        PE::Context { error, msg } => {
            let inner = user_message_from_polars(error);
            format!("{}: {}", msg, inner)
        }
        #[allow(unreachable_patterns)]
        _ => err.to_string(),
    }
}

/// Format an io::Error as a user-facing message by matching on ErrorKind.
pub fn user_message_from_io(err: &io::Error, context: Option<&str>) -> String {
    use std::io::ErrorKind;

    let base: String = match err.kind() {
        ErrorKind::NotFound => "File or directory not found.".to_string(),
        ErrorKind::PermissionDenied => "Permission denied. Check read access.".to_string(),
        ErrorKind::InvalidData | ErrorKind::InvalidInput => {
            "Invalid or corrupted data.".to_string()
        }
        ErrorKind::UnexpectedEof => "Unexpected end of file.".to_string(),
        ErrorKind::OutOfMemory => "Out of memory.".to_string(),
        ErrorKind::Other => {
            let msg = err.to_string();
            if msg.contains("Is a directory") {
                return "Path is a directory, not a file.".to_string();
            }
            return match context {
                Some(ctx) if !ctx.is_empty() => format!("I/O error: {} {}", msg, ctx),
                _ => msg,
            };
        }
        _ => err.to_string(),
    };

    match context {
        Some(ctx) if !ctx.is_empty() => format!("{} {}", base, ctx),
        _ => base,
    }
}

/// Polars compute errors for malformed CSV are long; keep only the first line.
fn simplify_compute_message(msg: &str) -> String {
    let first = msg.lines().next().unwrap_or(msg).trim();
    if first.is_empty() {
        "Could not parse the file.".to_string()
    } else {
        first.to_string()
    }
}
