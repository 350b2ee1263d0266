//! Input table loading.
//!
//! Spreadsheets (`xlsx`/`xls`) are read with calamine, CSV files with the
//! polars CSV reader. Either way the result is a [`SourceTable`]: the header
//! row and every data row as text, in source order.

use calamine::{Reader, open_workbook_auto};
use polars::prelude::{CsvReadOptions, SerReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::fields::normalize_header;
use crate::config::{ColumnMapping, ConverterConfig};
use crate::error::{BomError, Result};
use crate::models::SourceRow;

/// Anything that can produce a [`SourceTable`]
pub trait TableSource {
    fn load(&self) -> Result<SourceTable>;
}

/// Header row and data rows of an input table, all cells as text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SourceTable {
    /// Load a table, choosing the reader by file extension
    pub fn from_path(path: &Path, config: &ConverterConfig) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "csv" => CsvSource::new(path, config.separator).load(),
            "xlsx" | "xls" => SpreadsheetSource::new(path).load(),
            _ => Err(BomError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column with exactly this header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
    }

    /// Index of the first column whose normalized header is one of `keys`,
    /// else `fallback` when the table is wide enough
    pub fn find_column(&self, keys: &[String], fallback: Option<usize>) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| {
                let normalized = normalize_header(h);
                keys.iter().any(|k| *k == normalized)
            })
            .or_else(|| fallback.filter(|&i| i < self.headers.len()))
    }

    /// Cell at `row`, `column`; missing cells read as empty
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Every value of one column, in row order
    pub fn column_values(&self, column: usize) -> Vec<&str> {
        (0..self.rows.len()).map(|row| self.cell(row, column)).collect()
    }

    /// Required columns absent from the header row
    pub fn missing_columns(&self, mapping: &ColumnMapping) -> Vec<String> {
        mapping
            .required()
            .into_iter()
            .filter(|name| self.column_index(name).is_none())
            .map(str::to_string)
            .collect()
    }

    /// Resolve where the optional columns live
    pub fn layout(&self, mapping: &ColumnMapping) -> ColumnLayout {
        let weight_header = self.find_column(&mapping.weight_keys, None);
        let layout = ColumnLayout {
            description: self.find_column(&mapping.description_keys, mapping.description_fallback),
            weight: weight_header.or_else(|| self.find_column(&[], mapping.weight_fallback)),
            weight_by_header: weight_header.is_some(),
            material_type: self.find_column(&mapping.material_type_keys, None),
        };
        debug!("Column layout: {:?}", layout);
        layout
    }

    /// Map every data row onto the named fields of a [`SourceRow`]
    pub fn source_rows(&self, mapping: &ColumnMapping) -> Result<Vec<SourceRow>> {
        let missing = self.missing_columns(mapping);
        if !missing.is_empty() {
            return Err(BomError::MissingColumns {
                missing,
                found: self.headers.clone(),
            });
        }

        let required = |name: &str| self.column_index(name).unwrap_or_default();
        let position = required(&mapping.position);
        let quantity = required(&mapping.quantity);
        let drawing_number = required(&mapping.drawing_number);
        let material_code = required(&mapping.material_code);
        let layout = self.layout(mapping);

        let rows = (0..self.rows.len())
            .map(|index| SourceRow {
                index,
                position: self.cell(index, position).to_string(),
                quantity_raw: self.cell(index, quantity).to_string(),
                drawing_number: self.cell(index, drawing_number).to_string(),
                material_code: self.cell(index, material_code).to_string(),
                description: layout
                    .description
                    .map(|c| self.cell(index, c).to_string())
                    .unwrap_or_default(),
                material_type: layout.material_type.map(|c| self.cell(index, c).to_string()),
                weight: layout.weight.map(|c| self.cell(index, c).to_string()),
            })
            .collect();

        Ok(rows)
    }
}

/// Resolved positions of the optional columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    pub description: Option<usize>,
    pub weight: Option<usize>,
    /// The weight column was found by its header, not by position
    pub weight_by_header: bool,
    pub material_type: Option<usize>,
}

/// Drop empty rows at the end of a sheet; interior rows keep their line numbers
fn trim_trailing_blank_rows(rows: &mut Vec<Vec<String>>) {
    while rows
        .last()
        .is_some_and(|row| row.iter().all(|c| c.trim().is_empty()))
    {
        rows.pop();
    }
}

/// Excel workbook source, first sheet only
#[derive(Debug, Clone)]
pub struct SpreadsheetSource {
    path: PathBuf,
}

impl SpreadsheetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn error(&self, reason: impl Into<String>) -> BomError {
        BomError::Spreadsheet {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}

impl TableSource for SpreadsheetSource {
    fn load(&self) -> Result<SourceTable> {
        std::fs::metadata(&self.path).map_err(|e| BomError::from_io(&self.path, e))?;

        let mut workbook = open_workbook_auto(&self.path).map_err(|e| self.error(e.to_string()))?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| self.error("workbook has no sheets"))?;
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| self.error(e.to_string()))?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header) => header.iter().map(|c| c.to_string().trim().to_string()).collect(),
            None => Vec::new(),
        };

        let mut data: Vec<Vec<String>> = rows
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        trim_trailing_blank_rows(&mut data);

        info!(
            "Read {} rows from sheet '{}' of {}",
            data.len(),
            sheet_name,
            self.path.display()
        );

        Ok(SourceTable {
            path: self.path.clone(),
            headers,
            rows: data,
        })
    }
}

/// Delimited text source; every column is read as a string
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    separator: u8,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>, separator: u8) -> Self {
        Self {
            path: path.into(),
            separator,
        }
    }
}

impl TableSource for CsvSource {
    fn load(&self) -> Result<SourceTable> {
        std::fs::metadata(&self.path).map_err(|e| BomError::from_io(&self.path, e))?;

        let separator = self.separator;
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|options| options.with_separator(separator))
            .try_into_reader_with_file_path(Some(self.path.clone()))?
            .finish()?;

        let headers: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut rows = vec![Vec::with_capacity(headers.len()); df.height()];
        for column in df.get_columns() {
            let values = column.as_materialized_series().str()?;
            for (row, value) in rows.iter_mut().zip(values.into_iter()) {
                row.push(value.unwrap_or_default().to_string());
            }
        }
        trim_trailing_blank_rows(&mut rows);

        info!("Read {} rows from {}", rows.len(), self.path.display());

        Ok(SourceTable {
            path: self.path.clone(),
            headers,
            rows,
        })
    }
}
