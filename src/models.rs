//! Core data structures and types for BOM conversion.
//!
//! Defines source rows, the records produced by the hierarchy engine,
//! processing statistics and conversion results used throughout the library.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::constants::HEADER_LINE_OFFSET;

/// One row of the engineering spreadsheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRow {
    /// 0-based index among the data rows
    pub index: usize,
    pub position: String,
    /// Raw quantity cell as read
    pub quantity_raw: String,
    pub drawing_number: String,
    pub material_code: String,
    pub description: String,
    pub material_type: Option<String>,
    pub weight: Option<String>,
}

impl SourceRow {
    /// Spreadsheet line number of this row (header is line 1)
    pub fn line_number(&self) -> usize {
        self.index + HEADER_LINE_OFFSET
    }

    /// Quantity as a number; blank or non-numeric cells yield `None`
    pub fn quantity(&self) -> Option<f64> {
        parse_quantity(&self.quantity_raw)
    }
}

/// Parse a quantity cell, accepting a decimal comma
pub fn parse_quantity(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Format an aggregated quantity the way the importer expects it
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Why a source row was left out of the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExclusionReason {
    CaretMarker,
    NoValidCode,
    UnparseableLevel,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::CaretMarker => write!(f, "caret marker present in drawing number"),
            ExclusionReason::NoValidCode => write!(f, "no valid code (drawing number invalid or missing)"),
            ExclusionReason::UnparseableLevel => write!(f, "unparseable level (invalid position)"),
        }
    }
}

/// A source row filtered out before the relationship pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionRecord {
    pub reason: ExclusionReason,
    pub line_number: usize,
    pub position: String,
    pub quantity: String,
    pub drawing_number: String,
    pub material_code: String,
}

/// A valid row placed in its level bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeveledRow {
    pub position: String,
    pub quantity: Option<f64>,
    pub code: String,
    pub index: usize,
}

impl LeveledRow {
    pub fn line_number(&self) -> usize {
        self.index + HEADER_LINE_OFFSET
    }
}

/// Resolved parent-child relationship with its aggregated quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub parent: String,
    pub child: String,
    pub quantity: f64,
}

/// One occurrence of a code repeated under the same parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateRecord {
    pub line_number: usize,
    pub position: String,
    pub quantity: Option<f64>,
    pub code: String,
    /// 1-based rank among the occurrences
    pub rank: usize,
    pub occurrences: usize,
    pub consolidated_quantity: f64,
}

/// A parent-child pair that absorbed several occurrences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationRecord {
    pub parent: String,
    pub child: String,
    pub quantity: f64,
    pub occurrences: usize,
    /// First-seen position of the child under this parent
    pub child_position: String,
}

/// Processing statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub excluded_rows: usize,
    pub duplicate_rows: usize,
    pub consolidated_rows: usize,
    pub generated_relationships: usize,
    pub warnings: Vec<String>,
}

/// A flat table ready for the tabular sink
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Write the header line
    pub include_header: bool,
    /// Prefix the file with a UTF-8 byte order mark
    pub include_bom: bool,
}

impl OutputTable {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            include_header: true,
            include_bom: true,
        }
    }

    pub fn without_header(mut self) -> Self {
        self.include_header = false;
        self
    }

    pub fn without_bom(mut self) -> Self {
        self.include_bom = false;
        self
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of a single conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub success: bool,
    pub message: String,
    pub output_file: Option<PathBuf>,
    pub stats: Option<ProcessingStats>,
    pub warnings: Vec<String>,
}

impl ConversionResult {
    pub fn succeeded(
        message: impl Into<String>,
        output_file: Option<PathBuf>,
        stats: ProcessingStats,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            output_file,
            warnings: stats.warnings.clone(),
            stats: Some(stats),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            output_file: None,
            stats: None,
            warnings: Vec::new(),
        }
    }
}
