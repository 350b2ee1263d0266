//! Hierarchical structure conversion: `EMP;MTG;COD;QTD;PER` edges under the
//! root assembly, with the audit report of everything left out.

use tracing::{info, warn};

use super::{ConversionInput, ConversionKind, ConversionOutput, Converter};
use crate::constants::{REPORT_FILE_PREFIX, STRUCTURE_FILE_PREFIX, STRUCTURE_HEADERS};
use crate::error::{BomError, Result};
use crate::hierarchy::{assemble_report, find_z_parents, process_structure};
use crate::models::{OutputTable, format_quantity};

pub struct StructureConverter;

/// Name of the audit report written next to the structure file
pub fn report_file_name(assembly_code: &str) -> String {
    format!("{}{}.csv", REPORT_FILE_PREFIX, assembly_code)
}

impl Converter for StructureConverter {
    fn kind(&self) -> ConversionKind {
        ConversionKind::Structure
    }

    fn output_file_name(&self, assembly_code: Option<&str>) -> String {
        format!("{}{}.csv", STRUCTURE_FILE_PREFIX, assembly_code.unwrap_or_default())
    }

    fn convert(&self, input: &ConversionInput<'_>) -> Result<ConversionOutput> {
        let root = input.assembly_code.ok_or(BomError::MissingAssemblyCode)?;
        let outcome = process_structure(input.rows, root)?;

        let mut table = OutputTable::new(STRUCTURE_HEADERS);
        for edge in &outcome.graph.edges {
            table.push_row(vec![
                input.config.company_code.clone(),
                edge.parent.clone(),
                edge.child.clone(),
                format_quantity(edge.quantity),
                input.config.loss_constant.clone(),
            ]);
        }

        let mut stats = outcome.stats.clone();
        let z_parents = find_z_parents(&outcome.graph.edges);
        if !z_parents.is_empty() {
            warn!("{} relationships have a Z code as parent", z_parents.len());
            for entry in &z_parents {
                stats.warnings.push(format!("Z code used as parent. {}", entry.describe()));
            }
        }

        let report = input
            .config
            .write_report
            .then(|| assemble_report(&outcome.classified, &outcome.graph));

        info!(
            "Structure for {}: {} relationships from {} rows",
            root,
            table.len(),
            stats.total_rows
        );

        let message = format!(
            "Structure generated with {} relationships ({} rows excluded, {} duplicates consolidated)",
            table.len(),
            stats.excluded_rows,
            stats.duplicate_rows
        );

        Ok(ConversionOutput {
            table: Some(table),
            report,
            stats,
            message,
        })
    }
}
