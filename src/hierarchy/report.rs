//! Audit report assembly.
//!
//! Flattens exclusions, duplicates, consolidations and the children of
//! consolidated assemblies into one table with the same columns as the source
//! spreadsheet, followed by summary rows and an arithmetic balance:
//! every data row is either excluded, consolidated into an edge, emitted as an
//! edge, or left unattached.

use super::builder::{RelationshipGraph, is_child_position};
use super::classifier::ClassifiedRows;
use crate::constants::{self, REPORT_HEADERS};
use crate::models::{ExclusionReason, OutputTable, format_quantity};

const NOT_APPLICABLE: &str = "N/A";

/// Row balance of one structure conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBalance {
    pub input_rows: usize,
    pub excluded: usize,
    pub duplicates: usize,
    pub consolidations: usize,
    pub output_rows: usize,
}

impl RowBalance {
    pub fn from_parts(classified: &ClassifiedRows, graph: &RelationshipGraph) -> Self {
        Self {
            input_rows: classified.stats.total_rows,
            excluded: classified.exclusions.len(),
            duplicates: graph.duplicates.len(),
            consolidations: graph.consolidations.len(),
            output_rows: graph.edges.len(),
        }
    }

    /// Valid rows that produced no edge (orphans and repeated sub-trees)
    pub fn unattached(&self) -> i64 {
        self.input_rows as i64 - self.excluded as i64 - self.duplicates as i64
            - self.output_rows as i64
            + self.consolidations as i64
    }
}

fn record(
    reason: impl Into<String>,
    line: impl Into<String>,
    position: impl Into<String>,
    quantity: impl Into<String>,
    drawing: impl Into<String>,
    material: impl Into<String>,
) -> Vec<String> {
    vec![
        reason.into(),
        line.into(),
        position.into(),
        quantity.into(),
        drawing.into(),
        material.into(),
    ]
}

fn optional_quantity(quantity: Option<f64>) -> String {
    quantity.map(format_quantity).unwrap_or_default()
}

/// Assemble the audit table for one structure conversion
pub fn assemble_report(classified: &ClassifiedRows, graph: &RelationshipGraph) -> OutputTable {
    let mut table = OutputTable::new(REPORT_HEADERS);

    table.push_row(record(
        "Spreadsheet header",
        "1",
        "Header",
        NOT_APPLICABLE,
        constants::REQUIRED_COLUMNS.join(";"),
        NOT_APPLICABLE,
    ));

    for exclusion in &classified.exclusions {
        table.push_row(record(
            exclusion.reason.to_string(),
            exclusion.line_number.to_string(),
            exclusion.position.clone(),
            exclusion.quantity.clone(),
            exclusion.drawing_number.clone(),
            exclusion.material_code.clone(),
        ));
    }

    for duplicate in &graph.duplicates {
        table.push_row(record(
            format!(
                "Duplicate assembly {}/{} (consolidated to qty {})",
                duplicate.rank,
                duplicate.occurrences,
                format_quantity(duplicate.consolidated_quantity)
            ),
            duplicate.line_number.to_string(),
            duplicate.position.clone(),
            optional_quantity(duplicate.quantity),
            duplicate.code.clone(),
            format!("Duplicate {}", duplicate.rank),
        ));
    }

    for consolidation in &graph.consolidations {
        table.push_row(record(
            format!(
                "Consolidated relationship (final qty {})",
                format_quantity(consolidation.quantity)
            ),
            NOT_APPLICABLE,
            format!("Parent: {}", consolidation.parent),
            format_quantity(consolidation.quantity),
            format!("Child: {}", consolidation.child),
            format!("Consolidated from {} occurrences", consolidation.occurrences),
        ));
    }

    for consolidation in &graph.consolidations {
        for row in classified.levels.values().flatten() {
            if is_child_position(&consolidation.child_position, &row.position) {
                table.push_row(record(
                    format!(
                        "Child of consolidated assembly (parent qty {})",
                        format_quantity(consolidation.quantity)
                    ),
                    row.line_number().to_string(),
                    row.position.clone(),
                    optional_quantity(row.quantity),
                    row.code.clone(),
                    format!(
                        "Parent: {} ({}x)",
                        consolidation.child, consolidation.occurrences
                    ),
                ));
            }
        }
    }

    let balance = RowBalance::from_parts(classified, graph);
    table.push_row(record(
        "=== STATISTICAL SUMMARY ===",
        NOT_APPLICABLE,
        format!(
            "Total spreadsheet lines (with header): {}",
            balance.input_rows + 1
        ),
        format!("Data rows: {}", balance.input_rows),
        format!("Generated CSV rows: {}", balance.output_rows),
        format!(
            "Removed: {} | Duplicates: {} | Consolidated: {}",
            balance.excluded + 1,
            balance.duplicates,
            balance.consolidations
        ),
    ));

    table.push_row(record(
        "=== REMOVAL BREAKDOWN ===",
        NOT_APPLICABLE,
        format!(
            "Ignored for '^': {}",
            classified.count_excluded(ExclusionReason::CaretMarker)
        ),
        format!(
            "No valid code: {}",
            classified.count_excluded(ExclusionReason::NoValidCode)
        ),
        format!(
            "Invalid level: {}",
            classified.count_excluded(ExclusionReason::UnparseableLevel)
        ),
        format!("Valid processed: {}", balance.input_rows - balance.excluded),
    ));

    table.push_row(record(
        "=== ARITHMETIC BALANCE ===",
        NOT_APPLICABLE,
        format!("Input rows: {}", balance.input_rows),
        format!(
            "Excluded: {} | Duplicates: {} | Consolidations: {}",
            balance.excluded, balance.duplicates, balance.consolidations
        ),
        format!("Output rows: {}", balance.output_rows),
        format!("Unattached rows: {}", balance.unattached()),
    ));

    table
}
