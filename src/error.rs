//! Error handling for BOM conversion operations.
//!
//! Provides error types with context for reading spreadsheets, validating
//! conversion requests, and the structural self-checks of the hierarchy engine.
//! Row-level data problems never surface here; they become exclusion records.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BomError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Spreadsheet error in file: {path} - {reason}")]
    Spreadsheet { path: PathBuf, reason: String },

    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Unsupported file type '{extension}' for {path} (supported: xlsx, xls, csv)")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Input table is empty: {path}")]
    EmptyTable { path: PathBuf },

    #[error("Missing required columns {missing:?}. Columns found: {found:?}")]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("Root assembly code is required for this conversion")]
    MissingAssemblyCode,

    #[error("Invalid root assembly code '{code}': {reason}")]
    InvalidAssemblyCode { code: String, reason: String },

    #[error("Table too large to process: {rows} rows exceeds limit of {limit}")]
    TableTooLarge { rows: usize, limit: usize },

    #[error(
        "Relationship count verification failed: expected {expected} rows, generated {generated}. {summary}"
    )]
    VerificationFailed {
        expected: usize,
        generated: usize,
        summary: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// User-facing message category for each failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    FileNotFound,
    Permission,
    UnreadableTable,
    Validation,
    TooLarge,
    Verification,
    Internal,
}

impl BomError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BomError::InputNotFound { .. } => ErrorCategory::FileNotFound,
            BomError::PermissionDenied { .. } => ErrorCategory::Permission,
            BomError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                ErrorCategory::FileNotFound
            }
            BomError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                ErrorCategory::Permission
            }
            BomError::Polars(_)
            | BomError::Spreadsheet { .. }
            | BomError::UnsupportedFormat { .. }
            | BomError::EmptyTable { .. } => ErrorCategory::UnreadableTable,
            BomError::MissingColumns { .. }
            | BomError::MissingAssemblyCode
            | BomError::InvalidAssemblyCode { .. } => ErrorCategory::Validation,
            BomError::TableTooLarge { .. } => ErrorCategory::TooLarge,
            BomError::VerificationFailed { .. } => ErrorCategory::Verification,
            BomError::Io(_) | BomError::Configuration { .. } => ErrorCategory::Internal,
        }
    }

    /// Map an I/O failure on `path` to the most specific variant
    pub fn from_io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => BomError::InputNotFound { path: path.into() },
            std::io::ErrorKind::PermissionDenied => {
                BomError::PermissionDenied { path: path.into() }
            }
            _ => BomError::Io(error),
        }
    }
}

impl ErrorCategory {
    /// Short headline shown before the detailed error message
    pub fn headline(&self) -> &'static str {
        match self {
            ErrorCategory::FileNotFound => "Structure file not found",
            ErrorCategory::Permission => "Permission error accessing file",
            ErrorCategory::UnreadableTable => "Could not read spreadsheet",
            ErrorCategory::Validation => "Validation error",
            ErrorCategory::TooLarge => "File too large to process, try a smaller file",
            ErrorCategory::Verification => "Structural verification failed",
            ErrorCategory::Internal => "Unexpected error during conversion",
        }
    }
}

pub type Result<T> = std::result::Result<T, BomError>;
