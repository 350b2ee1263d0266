//! Configuration management and validation.
//!
//! Provides the configuration structure for conversion parameters: which
//! columns to read, the NEO record constants, and the thresholds used by
//! request validation and by the per-converter warnings.

use crate::constants::{self, defaults};
use crate::error::{BomError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where each named field lives in the source table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub position: String,
    pub quantity: String,
    pub drawing_number: String,
    pub material_code: String,

    /// Normalized header names accepted for the description column
    pub description_keys: Vec<String>,

    /// Column index used when no description header matches
    pub description_fallback: Option<usize>,

    /// Normalized header names accepted for the weight column
    pub weight_keys: Vec<String>,

    /// Column index used when no weight header matches
    pub weight_fallback: Option<usize>,

    /// Normalized header names accepted for the material type column
    pub material_type_keys: Vec<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        let owned = |keys: &[&str]| keys.iter().map(|k| k.to_string()).collect();
        Self {
            position: constants::COLUMN_POSITION.to_string(),
            quantity: constants::COLUMN_QUANTITY.to_string(),
            drawing_number: constants::COLUMN_DRAWING_NUMBER.to_string(),
            material_code: constants::COLUMN_MATERIAL_CODE.to_string(),
            description_keys: owned(constants::DESCRIPTION_HEADER_KEYS),
            description_fallback: Some(constants::DESCRIPTION_FALLBACK_INDEX),
            weight_keys: owned(constants::WEIGHT_HEADER_KEYS),
            weight_fallback: Some(constants::WEIGHT_FALLBACK_INDEX),
            material_type_keys: owned(constants::MATERIAL_TYPE_HEADER_KEYS),
        }
    }
}

impl ColumnMapping {
    /// Names of the columns that must be present
    pub fn required(&self) -> Vec<&str> {
        vec![
            self.position.as_str(),
            self.quantity.as_str(),
            self.drawing_number.as_str(),
            self.material_code.as_str(),
        ]
    }
}

/// Global configuration for BOM conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Source column layout
    pub columns: ColumnMapping,

    /// Accepted input extensions (lowercase, without dot)
    pub supported_extensions: Vec<String>,

    /// Field separator for CSV input and every generated file
    pub separator: u8,

    /// Input size above which a warning is emitted
    pub max_file_size_mb: u64,

    /// Row count above which a warning is emitted
    pub large_table_rows: usize,

    /// Row count above which the table is refused
    pub max_table_rows: usize,

    /// Company column of NEO records
    pub company_code: String,

    /// Loss column of NEO records
    pub loss_constant: String,

    /// Depth above which a position is flagged
    pub max_expected_depth: usize,

    /// Normalized code length above which a code is flagged
    pub max_code_length: usize,

    /// Registration field length limit
    pub max_field_length: usize,

    /// Description length limit
    pub max_description_length: usize,

    /// Write the audit report next to the structure file
    pub write_report: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            supported_extensions: defaults::SUPPORTED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            separator: defaults::SEPARATOR,
            max_file_size_mb: defaults::MAX_FILE_SIZE_MB,
            large_table_rows: defaults::LARGE_TABLE_ROWS,
            max_table_rows: defaults::MAX_TABLE_ROWS,
            company_code: constants::COMPANY_CODE.to_string(),
            loss_constant: constants::LOSS_CONSTANT.to_string(),
            max_expected_depth: defaults::MAX_EXPECTED_DEPTH,
            max_code_length: defaults::MAX_CODE_LENGTH,
            max_field_length: defaults::MAX_FIELD_LENGTH,
            max_description_length: defaults::MAX_DESCRIPTION_LENGTH,
            write_report: true,
        }
    }
}

impl ConverterConfig {
    /// Use a custom column layout
    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    /// Use a different field separator
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    /// Refuse tables above `max_rows`
    pub fn with_max_table_rows(mut self, max_rows: usize) -> Self {
        self.max_table_rows = max_rows;
        self
    }

    /// Skip the audit report
    pub fn without_report(mut self) -> Self {
        self.write_report = false;
        self
    }

    pub fn is_supported_extension(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.supported_extensions.iter().any(|e| *e == extension)
    }

    /// Check internal consistency before a run
    pub fn validate(&self) -> Result<()> {
        if self.supported_extensions.is_empty() {
            return Err(BomError::Configuration {
                message: "At least one input extension must be supported".to_string(),
            });
        }
        if self.separator.is_ascii_alphanumeric() || self.separator == b'"' {
            return Err(BomError::Configuration {
                message: format!("Invalid field separator '{}'", self.separator as char),
            });
        }
        if self.max_table_rows == 0 {
            return Err(BomError::Configuration {
                message: "max_table_rows must be greater than zero".to_string(),
            });
        }
        if self.columns.required().iter().any(|c| c.trim().is_empty()) {
            return Err(BomError::Configuration {
                message: "Required column names cannot be blank".to_string(),
            });
        }

        debug!(
            "Configuration validated: separator='{}', extensions={:?}",
            self.separator as char, self.supported_extensions
        );
        Ok(())
    }
}
