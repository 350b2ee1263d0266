//! Structural self-check of the relationship pass.
//!
//! The number of emitted edges must equal the number of distinct
//! (parent, child) pairs that received a quantity. A mismatch means an edge
//! was emitted twice or computed without being emitted.

use std::collections::HashMap;
use tracing::{debug, error};

use crate::error::{BomError, Result};
use crate::models::{Edge, ProcessingStats};

/// Counts compared by the verifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationReport {
    pub expected: usize,
    pub generated: usize,
}

impl VerificationReport {
    pub fn is_ok(&self) -> bool {
        self.expected == self.generated
    }
}

/// Compare distinct aggregated pairs against emitted edges
pub fn check_edges(
    edge_quantities: &HashMap<(String, String), f64>,
    edges: &[Edge],
) -> VerificationReport {
    VerificationReport {
        expected: edge_quantities.len(),
        generated: edges.len(),
    }
}

/// Verify the edge set, failing hard with diagnostic counts on mismatch
pub fn verify(
    edge_quantities: &HashMap<(String, String), f64>,
    edges: &[Edge],
    stats: &ProcessingStats,
) -> Result<VerificationReport> {
    let report = check_edges(edge_quantities, edges);
    if report.is_ok() {
        debug!("Verification OK: {} relationships", report.generated);
        return Ok(report);
    }

    error!(
        "Relationship verification failed: expected {}, generated {}",
        report.expected, report.generated
    );
    Err(BomError::VerificationFailed {
        expected: report.expected,
        generated: report.generated,
        summary: format!(
            "Spreadsheet lines (with header): {}; data rows: {}; excluded: {}; valid: {}",
            stats.total_rows + 1,
            stats.total_rows,
            stats.excluded_rows,
            stats.valid_rows
        ),
    })
}
