//! Hierarchy engine.
//!
//! Turns the rows of an engineering BOM spreadsheet into a deduplicated set of
//! parent-child edges. The engine is pure: it never touches the filesystem and
//! receives the root assembly code as a parameter.
//!
//! Pipeline: code normalization and level parsing inside the classifier, then
//! the breadth-first builder, the verifier, and finally the report assembler
//! and the Z-parent inspection over the results.

pub mod builder;
pub mod classifier;
pub mod code;
pub mod inspection;
pub mod level;
pub mod report;
pub mod verifier;

#[cfg(test)]
pub mod tests;

pub use builder::{RelationshipGraph, build_relationships, is_child_position};
pub use classifier::{ClassifiedRows, CodedRow, classify_rows, unique_components};
pub use code::{is_purchased_part, normalize_code};
pub use inspection::{ZParentEntry, find_z_parents};
pub use level::parse_level;
pub use report::{RowBalance, assemble_report};
pub use verifier::{VerificationReport, verify};

use crate::error::Result;
use crate::models::{ProcessingStats, SourceRow};

/// Everything one structure pass produces
#[derive(Debug, Clone)]
pub struct StructureOutcome {
    pub classified: ClassifiedRows,
    pub graph: RelationshipGraph,
    pub verification: VerificationReport,
    pub stats: ProcessingStats,
}

/// Classify, build and verify in one call.
///
/// Fails only when the verifier finds a broken edge set; no output exists at
/// that point.
pub fn process_structure(rows: &[SourceRow], root_code: &str) -> Result<StructureOutcome> {
    let classified = classify_rows(rows);
    let graph = build_relationships(&classified, root_code);

    let mut stats = classified.stats.clone();
    stats.duplicate_rows = graph.duplicates.len();
    stats.consolidated_rows = graph.consolidations.len();
    stats.generated_relationships = graph.edges.len();

    let verification = verify(&graph.edge_quantities, &graph.edges, &stats)?;

    Ok(StructureOutcome {
        classified,
        graph,
        verification,
        stats,
    })
}
