//! Error types for the booking core.
//!
//! The store and table operations return these typed errors so the UI can
//! tell a broken workbook apart from a single malformed currency cell. The
//! application glue wraps them in `anyhow` like every other failure.

use std::io;
use std::path::PathBuf;

/// Failures while reading or writing the backing workbook.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The workbook file does not exist.
    #[error("workbook not found: {}", .0.display())]
    Missing(PathBuf),

    /// The file exists but could not be opened as an xlsx workbook.
    #[error("failed to open workbook {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    /// A single sheet could not be read.
    #[error("failed to read sheet '{sheet}'")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::XlsxError,
    },

    /// Building the xlsx payload failed (invalid sheet name, cell limits).
    #[error("failed to render workbook")]
    Render(#[from] rust_xlsxwriter::XlsxError),

    /// Writing the rendered workbook to disk failed.
    #[error("failed to write workbook {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures while deriving numeric data from a table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// A currency cell still is not a number once the marker is removed.
    #[error("row {row}, column '{column}': '{value}' is not a currency amount")]
    Currency {
        /// Zero-based data row index (the header is not counted).
        row: usize,
        column: String,
        value: String,
    },

    /// The table lacks a column the derivation needs.
    #[error("table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },
}

/// Invalid values in the environment or on the command line.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported weekday locale '{0}' (expected 'de' or 'en')")]
    WeekdayLocale(String),

    #[error("could not locate home directory for the log file")]
    HomeDir,
}
