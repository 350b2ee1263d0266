//! Parts registration: one record per manufactured part or assembly.
//!
//! Purchased (Z) parts are registered elsewhere and left out.

use tracing::info;

use super::{ConversionInput, ConversionKind, ConversionOutput, Converter, stem_file_name};
use crate::constants::{PARTS_FILE_STEM, PARTS_HEADERS, PARTS_PROPERTIES, defaults};
use crate::error::Result;
use crate::hierarchy::{classify_rows, is_purchased_part, unique_components};
use crate::models::OutputTable;
use crate::table::fields::{parse_decimal, sanitize_field};

pub struct PartsRegistrationConverter;

/// Weight as the importer expects it: dot decimal, at most two places,
/// no trailing zeros (`1,50` -> `1.5`, `2,00` -> `2`); unreadable -> `0`
pub fn normalize_part_weight(raw: Option<&str>) -> String {
    match raw.and_then(parse_decimal) {
        Some(value) => {
            let formatted = format!("{:.2}", value);
            formatted
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string()
        }
        None => defaults::DEFAULT_PART_WEIGHT.to_string(),
    }
}

impl Converter for PartsRegistrationConverter {
    fn kind(&self) -> ConversionKind {
        ConversionKind::Parts
    }

    fn output_file_name(&self, assembly_code: Option<&str>) -> String {
        stem_file_name(PARTS_FILE_STEM, assembly_code)
    }

    fn convert(&self, input: &ConversionInput<'_>) -> Result<ConversionOutput> {
        let mut records: Vec<Vec<String>> = unique_components(input.rows)
            .into_iter()
            .filter(|component| !is_purchased_part(&component.code))
            .map(|component| {
                let mut record = vec![
                    component.code.clone(),
                    sanitize_field(&component.row.description),
                ];
                record.extend(PARTS_PROPERTIES.iter().map(|p| p.to_string()));
                record.push(normalize_part_weight(component.row.weight.as_deref()));
                record
            })
            .collect();
        records.sort_by(|a, b| a[0].cmp(&b[0]));

        let limit = input.config.max_field_length;
        let mut stats = classify_rows(input.rows).stats;
        for (i, record) in records.iter().enumerate() {
            let long_field = [("Code", &record[0]), ("Description", &record[1])]
                .into_iter()
                .find(|(_, text)| text.chars().count() > limit);
            if let Some((field, text)) = long_field {
                stats.warnings.push(format!(
                    "Line {}: {} too long for code {} (len={})",
                    i + 1,
                    field,
                    record[0],
                    text.chars().count()
                ));
            }
        }

        let mut table = OutputTable::new(PARTS_HEADERS).without_header().without_bom();
        for record in records {
            table.push_row(record);
        }
        stats.generated_relationships = table.len();

        info!("Parts registration: {} records", table.len());
        Ok(ConversionOutput {
            message: format!("Registration file generated with {} parts and assemblies", table.len()),
            table: Some(table),
            report: None,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConverterConfig;
    use crate::models::SourceRow;

    fn row(index: usize, drawing: &str, description: &str, weight: Option<&str>) -> SourceRow {
        SourceRow {
            index,
            position: (index + 1).to_string(),
            quantity_raw: "1".to_string(),
            drawing_number: drawing.to_string(),
            description: description.to_string(),
            weight: weight.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_part_weight() {
        assert_eq!(normalize_part_weight(Some("1,50")), "1.5");
        assert_eq!(normalize_part_weight(Some("2")), "2");
        assert_eq!(normalize_part_weight(Some("0,126")), "0.13");
        assert_eq!(normalize_part_weight(Some("abc")), "0");
        assert_eq!(normalize_part_weight(None), "0");
    }

    #[test]
    fn test_registration_records_sorted_without_purchased_parts() {
        let config = ConverterConfig::default();
        let rows = vec![
            row(0, "OLG20-01-0001", "Suporte;\nlateral", Some("1,5")),
            row(1, "OLZ-03-058-032", "Parafuso", None),
            row(2, "OLC10-01-0001", "Chapa", Some("")),
            row(3, "OLG20-01-0001", "Repetido", None),
        ];
        let input = ConversionInput::new(&rows, &config);
        let output = PartsRegistrationConverter.convert(&input).unwrap();
        let table = output.table.unwrap();

        assert!(!table.include_header);
        assert!(!table.include_bom);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.rows[0],
            vec!["C10010001", "Chapa", "3", "4", "107", "108", "16", "3", "S", "0"]
        );
        assert_eq!(table.rows[1][0], "G20010001");
        assert_eq!(table.rows[1][1], "Suporte, lateral");
        assert_eq!(table.rows[1][9], "1.5");
        assert_eq!(output.stats.generated_relationships, 2);
    }

    #[test]
    fn test_long_description_warns() {
        let config = ConverterConfig::default();
        let long = "X".repeat(101);
        let rows = vec![row(0, "OLG20-01-0001", &long, None)];
        let output = PartsRegistrationConverter
            .convert(&ConversionInput::new(&rows, &config))
            .unwrap();
        assert_eq!(
            output.stats.warnings,
            vec!["Line 1: Description too long for code G20010001 (len=101)"]
        );
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            PartsRegistrationConverter.output_file_name(Some("G1")),
            "CADASTRO DE PEÇAS G1.csv"
        );
    }
}
