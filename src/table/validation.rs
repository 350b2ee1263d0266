//! Conversion request validation.
//!
//! Hard problems become errors; soft ones (large files, empty columns, long
//! codes) are returned as warning strings for the run summary.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::reader::SourceTable;
use crate::config::ConverterConfig;
use crate::constants::defaults;
use crate::error::{BomError, Result};

static ASSEMBLY_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.]+$").expect("assembly code pattern is a valid regex")
});

/// Check that `path` is an existing file with a supported extension
pub fn validate_input_file(path: &Path, config: &ConverterConfig) -> Result<Vec<String>> {
    let metadata = std::fs::metadata(path).map_err(|e| BomError::from_io(path, e))?;
    if !metadata.is_file() {
        return Err(BomError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if !config.is_supported_extension(&extension) {
        return Err(BomError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        });
    }

    let mut warnings = Vec::new();
    let size_mb = metadata.len() as f64 / (1024.0 * 1024.0);
    if size_mb > config.max_file_size_mb as f64 {
        warn!("Large input file: {:.1}MB", size_mb);
        warnings.push(format!(
            "File is very large: {:.1}MB (recommended maximum: {}MB)",
            size_mb, config.max_file_size_mb
        ));
    }

    debug!("Input file accepted: {}", path.display());
    Ok(warnings)
}

/// Check a loaded table: not empty, required columns present, size in range
pub fn validate_table(table: &SourceTable, config: &ConverterConfig) -> Result<Vec<String>> {
    if table.is_empty() {
        return Err(BomError::EmptyTable {
            path: table.path.clone(),
        });
    }

    let missing = table.missing_columns(&config.columns);
    if !missing.is_empty() {
        return Err(BomError::MissingColumns {
            missing,
            found: table.headers.clone(),
        });
    }

    if table.len() > config.max_table_rows {
        return Err(BomError::TableTooLarge {
            rows: table.len(),
            limit: config.max_table_rows,
        });
    }

    let mut warnings = Vec::new();
    for name in config.columns.required() {
        let Some(index) = table.column_index(name) else {
            continue;
        };
        if table.column_values(index).iter().all(|v| v.trim().is_empty()) {
            warn!("Column '{}' is completely empty", name);
            warnings.push(format!("Column '{}' is completely empty", name));
        }
    }

    if table.len() > config.large_table_rows {
        warnings.push(format!(
            "Large table with {} rows, processing may be slow",
            table.len()
        ));
    }

    Ok(warnings)
}

/// Check the root assembly code; `required` is set for the structure conversion
pub fn validate_assembly_code(code: Option<&str>, required: bool) -> Result<Vec<String>> {
    let code = code.map(str::trim).unwrap_or("");
    if code.is_empty() {
        return if required {
            Err(BomError::MissingAssemblyCode)
        } else {
            Ok(Vec::new())
        };
    }

    if !ASSEMBLY_CODE.is_match(code) {
        return Err(BomError::InvalidAssemblyCode {
            code: code.to_string(),
            reason: "use only letters, digits and '.'".to_string(),
        });
    }

    let mut warnings = Vec::new();
    if code.chars().count() > defaults::MAX_ASSEMBLY_CODE_LENGTH {
        warnings.push(format!(
            "Assembly code is very long (recommended maximum: {} characters)",
            defaults::MAX_ASSEMBLY_CODE_LENGTH
        ));
    }
    Ok(warnings)
}

/// Keep letters, digits and dots, uppercased
pub fn sanitize_assembly_code(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
