//! Row classification: one pass over the source table.
//!
//! Each row is either placed in the bucket of its hierarchy level or turned
//! into an exclusion record. The first failing rule wins:
//! caret marker, then missing code, then unparseable level.

use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

use super::code::{CodeWarning, normalize_code};
use super::level::{is_anomalous_depth, parse_level};
use crate::constants::CARET_MARKER;
use crate::models::{ExclusionReason, ExclusionRecord, LeveledRow, ProcessingStats, SourceRow};

/// Result of classifying every source row
#[derive(Debug, Clone, Default)]
pub struct ClassifiedRows {
    /// Valid rows grouped by depth, source order preserved inside each bucket
    pub levels: BTreeMap<usize, Vec<LeveledRow>>,
    /// Last code seen for each position
    pub code_by_position: HashMap<String, String>,
    pub exclusions: Vec<ExclusionRecord>,
    pub stats: ProcessingStats,
}

impl ClassifiedRows {
    pub fn rows_at(&self, level: usize) -> &[LeveledRow] {
        self.levels.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count_excluded(&self, reason: ExclusionReason) -> usize {
        self.exclusions.iter().filter(|e| e.reason == reason).count()
    }
}

fn has_caret(drawing_number: &str) -> bool {
    drawing_number.contains(CARET_MARKER)
}

fn exclusion(row: &SourceRow, reason: ExclusionReason) -> ExclusionRecord {
    ExclusionRecord {
        reason,
        line_number: row.line_number(),
        position: row.position.trim().to_string(),
        quantity: row.quantity_raw.clone(),
        drawing_number: row.drawing_number.clone(),
        material_code: row.material_code.clone(),
    }
}

/// Classify source rows into level buckets and exclusion records
pub fn classify_rows(rows: &[SourceRow]) -> ClassifiedRows {
    let mut classified = ClassifiedRows::default();
    let mut warnings = Vec::new();

    for row in rows {
        if has_caret(&row.drawing_number) {
            debug!("Line {}: caret in drawing number, excluded", row.line_number());
            classified
                .exclusions
                .push(exclusion(row, ExclusionReason::CaretMarker));
            continue;
        }

        let Some(normalized) = normalize_code(&row.drawing_number) else {
            debug!("Line {}: no valid code, excluded", row.line_number());
            classified
                .exclusions
                .push(exclusion(row, ExclusionReason::NoValidCode));
            continue;
        };

        match normalized.warning {
            Some(CodeWarning::TooShort) => warnings.push(format!(
                "Line {}: drawing number '{}' too short, used unchanged",
                row.line_number(),
                normalized.code
            )),
            Some(CodeWarning::TooLong) => warnings.push(format!(
                "Line {}: code '{}' unusually long",
                row.line_number(),
                normalized.code
            )),
            None => {}
        }

        let Some(level) = parse_level(&row.position) else {
            debug!("Line {}: unparseable position, excluded", row.line_number());
            classified
                .exclusions
                .push(exclusion(row, ExclusionReason::UnparseableLevel));
            continue;
        };

        if is_anomalous_depth(level) {
            warnings.push(format!(
                "Line {}: position '{}' is {} levels deep",
                row.line_number(),
                row.position.trim(),
                level
            ));
        }

        let quantity = row.quantity();
        if quantity.is_none() && !row.quantity_raw.trim().is_empty() {
            warn!(
                "Line {}: non-numeric quantity '{}' counted as 0",
                row.line_number(),
                row.quantity_raw
            );
            warnings.push(format!(
                "Line {}: non-numeric quantity '{}' counted as 0",
                row.line_number(),
                row.quantity_raw.trim()
            ));
        }

        let position = row.position.trim().to_string();
        classified
            .code_by_position
            .insert(position.clone(), normalized.code.clone());
        classified.levels.entry(level).or_default().push(LeveledRow {
            position,
            quantity,
            code: normalized.code,
            index: row.index,
        });
    }

    let valid_rows: usize = classified.levels.values().map(Vec::len).sum();
    classified.stats = ProcessingStats {
        total_rows: rows.len(),
        valid_rows,
        excluded_rows: classified.exclusions.len(),
        warnings,
        ..Default::default()
    };

    info!(
        "Classified {} rows: {} valid, {} excluded across {} levels",
        rows.len(),
        valid_rows,
        classified.exclusions.len(),
        classified.levels.len()
    );

    classified
}

/// A source row paired with its normalized code
#[derive(Debug, Clone)]
pub struct CodedRow<'a> {
    pub row: &'a SourceRow,
    pub code: String,
}

/// First occurrence of every component code, in source order.
///
/// Applies the same exclusion rules as [`classify_rows`] for caret markers and
/// missing codes; positions are not inspected. Used by the flat converters.
pub fn unique_components(rows: &[SourceRow]) -> Vec<CodedRow<'_>> {
    let mut seen = HashSet::new();
    let mut components = Vec::new();

    for row in rows {
        if has_caret(&row.drawing_number) {
            continue;
        }
        let Some(normalized) = normalize_code(&row.drawing_number) else {
            continue;
        };
        if seen.insert(normalized.code.clone()) {
            components.push(CodedRow {
                row,
                code: normalized.code,
            });
        }
    }

    debug!("{} unique component codes", components.len());
    components
}
