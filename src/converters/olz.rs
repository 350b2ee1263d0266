//! OLZ verification: purchased parts of the BOM that are missing from the
//! list of registered parts.
//!
//! The reference list is a CSV or spreadsheet whose code column is found by
//! header (`Codigo`, `Cod`) or else taken as the first column.

use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{ConversionInput, ConversionKind, ConversionOutput, Converter, stem_file_name};
use crate::config::ConverterConfig;
use crate::constants::{MISSING_OLZ_HEADERS, OLZ_FILE_STEM, STATUS_NOT_REGISTERED};
use crate::error::Result;
use crate::hierarchy::{classify_rows, is_purchased_part, unique_components};
use crate::models::OutputTable;
use crate::table::SourceTable;
use crate::table::fields::{normalize_header, sanitize_field};

const REFERENCE_CODE_HEADERS: &[&str] = &["codigo", "cod"];

pub struct OlzVerificationConverter;

/// Registered codes from the reference list.
///
/// A missing or unreadable list yields an empty set and a warning, so every
/// purchased part is reported as missing.
pub fn load_reference_codes(
    path: Option<&Path>,
    config: &ConverterConfig,
) -> (HashSet<String>, Option<String>) {
    let Some(path) = path.filter(|p| p.is_file()) else {
        warn!("OLZ reference list not available");
        return (
            HashSet::new(),
            Some("OLZ reference list not found, every purchased part is reported".to_string()),
        );
    };

    let table = match SourceTable::from_path(path, config) {
        Ok(table) => table,
        Err(e) => {
            warn!("Could not read OLZ reference list {}: {}", path.display(), e);
            return (
                HashSet::new(),
                Some(format!("Could not read OLZ reference list: {}", e)),
            );
        }
    };

    let column = table
        .headers
        .iter()
        .position(|h| REFERENCE_CODE_HEADERS.contains(&normalize_header(h).as_str()))
        .unwrap_or(0);

    let codes: HashSet<String> = table
        .column_values(column)
        .into_iter()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();

    debug!(
        "Loaded {} reference codes from column {} of {}",
        codes.len(),
        column,
        path.display()
    );
    (codes, None)
}

impl Converter for OlzVerificationConverter {
    fn kind(&self) -> ConversionKind {
        ConversionKind::OlzVerification
    }

    fn output_file_name(&self, assembly_code: Option<&str>) -> String {
        stem_file_name(OLZ_FILE_STEM, assembly_code)
    }

    fn convert(&self, input: &ConversionInput<'_>) -> Result<ConversionOutput> {
        let mut stats = classify_rows(input.rows).stats;
        let (reference, warning) = load_reference_codes(input.reference_file, input.config);
        stats.warnings.extend(warning);

        let purchased: Vec<_> = unique_components(input.rows)
            .into_iter()
            .filter(|component| is_purchased_part(&component.code))
            .collect();

        let mut table = OutputTable::new(MISSING_OLZ_HEADERS);
        for component in purchased.iter().filter(|c| !reference.contains(&c.code)) {
            table.push_row(vec![
                component.code.clone(),
                sanitize_field(&component.row.description),
                component.row.drawing_number.clone(),
                STATUS_NOT_REGISTERED.to_string(),
            ]);
        }
        stats.generated_relationships = table.len();

        info!(
            "OLZ verification: {} purchased parts, {} missing",
            purchased.len(),
            table.len()
        );

        if table.is_empty() {
            return Ok(ConversionOutput {
                table: None,
                report: None,
                stats,
                message: format!(
                    "{} OLZ codes found, all present in the reference list. No file generated",
                    purchased.len()
                ),
            });
        }

        Ok(ConversionOutput {
            message: format!(
                "{} OLZ codes found, {} not in the reference list",
                purchased.len(),
                table.len()
            ),
            table: Some(table),
            report: None,
            stats,
        })
    }
}
