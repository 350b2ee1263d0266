//! Material update: raw material code and weight of each manufactured part.
//!
//! Hoses (raw material `Z20…`) are sold by length, so their `PES` column holds
//! metres read from the description instead of kilograms.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

use super::{ConversionInput, ConversionKind, ConversionOutput, Converter, stem_file_name};
use crate::constants::{
    HOSE_MATERIAL_PREFIX, MATERIAL_HEADERS, MATERIALS_FILE_STEM, PURCHASED_PART_PREFIX,
    defaults,
};
use crate::error::Result;
use crate::hierarchy::{CodedRow, classify_rows, is_purchased_part, unique_components};
use crate::models::{OutputTable, SourceRow};
use crate::table::fields::{format_decimal_comma, parse_decimal};

static MILLIMETRES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*mm").expect("millimetre pattern is a valid regex")
});

pub struct MaterialUpdateConverter;

/// Reduce a raw material reference to one of `NNNNNN`, `ZNNNNN`, `ZNNNNNN`.
///
/// Text after `" - "` is dropped; the last five or six digits are kept.
/// Returns `None` when not enough digits remain.
pub fn format_material_code(raw: &str) -> Option<String> {
    let upper = raw.trim().to_uppercase();
    let head = upper.split(" - ").next().unwrap_or_default().trim();
    if head.is_empty() {
        return None;
    }

    let digits: Vec<char> = head.chars().filter(char::is_ascii_digit).collect();
    let last = |n: usize| digits[digits.len() - n..].iter().collect::<String>();

    if head.starts_with(PURCHASED_PART_PREFIX) {
        match digits.len() {
            n if n >= 6 => Some(format!("{}{}", PURCHASED_PART_PREFIX, last(6))),
            5 => Some(format!("{}{}", PURCHASED_PART_PREFIX, last(5))),
            _ => None,
        }
    } else if digits.len() >= 6 {
        Some(last(6))
    } else {
        None
    }
}

/// Metres from the last `<n> mm` in a description (`… 5920mm` -> `5,92`)
pub fn hose_length_from_description(description: &str) -> Option<String> {
    let captures = MILLIMETRES.captures_iter(description).last()?;
    let millimetres = parse_decimal(&captures[1])?;
    Some(format_decimal_comma(millimetres / 1000.0))
}

/// `PES` value for one part, with a warning when a default was used
fn weight_or_length(
    row: &SourceRow,
    code: &str,
    material: &str,
    weight_by_header: bool,
) -> (String, Option<String>) {
    let line = row.line_number();

    if material.starts_with(HOSE_MATERIAL_PREFIX) {
        return match hose_length_from_description(&row.description) {
            Some(length) => (length, None),
            None => (
                defaults::DEFAULT_HOSE_LENGTH.to_string(),
                Some(format!(
                    "Line {}: hose length not found for code {} (Z20)",
                    line, code
                )),
            ),
        };
    }

    if !weight_by_header {
        return (
            defaults::DEFAULT_MATERIAL_WEIGHT.to_string(),
            Some(format!(
                "Line {}: PESO column missing, using default for code {}",
                line, code
            )),
        );
    }

    let raw = row.weight.as_deref().unwrap_or_default();
    if raw.trim().is_empty() {
        return (defaults::EMPTY_MATERIAL_WEIGHT.to_string(), None);
    }
    match parse_decimal(raw) {
        Some(value) => (format_decimal_comma(value), None),
        None => (
            defaults::DEFAULT_MATERIAL_WEIGHT.to_string(),
            Some(format!(
                "Line {}: could not read PES for code {}, using default",
                line, code
            )),
        ),
    }
}

/// Manufactured parts whose raw material reference can be formatted
fn material_candidates<'a>(rows: &'a [SourceRow]) -> Vec<(CodedRow<'a>, String)> {
    unique_components(rows)
        .into_iter()
        .filter(|component| !is_purchased_part(&component.code))
        .filter_map(|component| {
            let material = format_material_code(&component.row.material_code)?;
            Some((component, material))
        })
        .collect()
}

impl Converter for MaterialUpdateConverter {
    fn kind(&self) -> ConversionKind {
        ConversionKind::Materials
    }

    fn output_file_name(&self, assembly_code: Option<&str>) -> String {
        stem_file_name(MATERIALS_FILE_STEM, assembly_code)
    }

    fn convert(&self, input: &ConversionInput<'_>) -> Result<ConversionOutput> {
        let mut stats = classify_rows(input.rows).stats;
        let mut records = Vec::new();

        let candidates = material_candidates(input.rows);
        debug!("{} manufactured parts with a valid MAP", candidates.len());
        for (component, material) in candidates {
            let (weight, warning) = weight_or_length(
                component.row,
                &component.code,
                &material,
                input.layout.weight_by_header,
            );
            if let Some(warning) = warning {
                stats.warnings.push(warning);
            }
            records.push(vec![
                input.config.company_code.clone(),
                component.code,
                material,
                weight,
                input.config.loss_constant.clone(),
            ]);
        }
        records.sort_by(|a, b| a[1].cmp(&b[1]));

        let mut table = OutputTable::new(MATERIAL_HEADERS);
        for record in records {
            table.push_row(record);
        }
        stats.generated_relationships = table.len();

        info!("Material update: {} records", table.len());
        Ok(ConversionOutput {
            message: format!("Material update generated with {} components", table.len()),
            table: Some(table),
            report: None,
            stats,
        })
    }
}
