//! Error types for styled table export.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for table export operations.
pub type Result<T> = std::result::Result<T, XlsxTableError>;

/// Fatal errors aborting an export run.
#[derive(Error, Debug)]
pub enum XlsxTableError {
    /// Filesystem failure on the target path or its directory.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Existing workbook could not be opened or parsed.
    #[error("Failed to read workbook {}: {message}", path.display())]
    WorkbookRead {
        /// Workbook path.
        path: PathBuf,
        /// Reader error text.
        message: String,
    },

    /// Existing workbook could not be edited or re-serialized.
    #[error("Failed to edit workbook {}: {message}", path.display())]
    WorkbookEdit {
        /// Workbook path.
        path: PathBuf,
        /// Editor error text.
        message: String,
    },

    /// Workbook assembly or serialization failed.
    #[error("xlsx write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Table value access failed.
    #[error("Failed to access table value: {0}")]
    Data(#[from] polars::error::PolarsError),

    /// Table shape is inconsistent.
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Caller options are invalid.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Row or column index outside xlsx limits.
    #[error("Index overflow: {0}")]
    IndexOverflow(String),
}

impl XlsxTableError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn workbook_read(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::WorkbookRead {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn workbook_edit(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::WorkbookEdit {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
