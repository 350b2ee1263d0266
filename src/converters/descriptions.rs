//! Description update: `code;description` for every component, purchased parts
//! included.

use tracing::info;

use super::{ConversionInput, ConversionKind, ConversionOutput, Converter, stem_file_name};
use crate::constants::{DESCRIPTIONS_FILE_STEM, DESCRIPTION_HEADERS};
use crate::error::Result;
use crate::hierarchy::{classify_rows, unique_components};
use crate::models::OutputTable;
use crate::table::fields::sanitize_field;

pub struct DescriptionUpdateConverter;

/// Problem with a description, if any
fn description_issue(description: &str, limit: usize) -> Option<String> {
    let length = description.chars().count();
    if description.trim().is_empty() {
        Some("empty description".to_string())
    } else if length > limit {
        Some(format!("description too long ({} characters)", length))
    } else {
        None
    }
}

impl Converter for DescriptionUpdateConverter {
    fn kind(&self) -> ConversionKind {
        ConversionKind::Descriptions
    }

    fn output_file_name(&self, assembly_code: Option<&str>) -> String {
        stem_file_name(DESCRIPTIONS_FILE_STEM, assembly_code)
    }

    fn convert(&self, input: &ConversionInput<'_>) -> Result<ConversionOutput> {
        let mut stats = classify_rows(input.rows).stats;
        let mut records = Vec::new();

        for component in unique_components(input.rows) {
            let description = sanitize_field(&component.row.description);
            if let Some(issue) =
                description_issue(&description, input.config.max_description_length)
            {
                stats.warnings.push(format!(
                    "Line {}: {} for code {}",
                    component.row.line_number(),
                    issue,
                    component.code
                ));
            }
            records.push(vec![component.code, description]);
        }
        records.sort_by(|a, b| a[0].cmp(&b[0]));

        let mut table = OutputTable::new(DESCRIPTION_HEADERS).without_header();
        for record in records {
            table.push_row(record);
        }
        stats.generated_relationships = table.len();

        info!("Description update: {} records", table.len());
        Ok(ConversionOutput {
            message: format!("Description update generated with {} components", table.len()),
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

    fn row(index: usize, drawing: &str, description: &str) -> SourceRow {
        SourceRow {
            index,
            position: (index + 1).to_string(),
            quantity_raw: "1".to_string(),
            drawing_number: drawing.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_all_codes_sorted_with_bom_and_no_header() {
        let config = ConverterConfig::default();
        let rows = vec![
            row(0, "OLZ-03-058-032", "Parafuso M8"),
            row(1, "OLG12-06-1001", "Base\tsoldada"),
            row(2, "OLG12-06-1001^", "Ignorada"),
        ];
        let output = DescriptionUpdateConverter
            .convert(&ConversionInput::new(&rows, &config))
            .unwrap();
        let table = output.table.unwrap();

        assert!(!table.include_header);
        assert!(table.include_bom);
        assert_eq!(
            table.rows,
            vec![
                vec!["G12061001".to_string(), "Base soldada".to_string()],
                vec!["Z03058032".to_string(), "Parafuso M8".to_string()],
            ]
        );
        assert!(output.stats.warnings.is_empty());
    }

    #[test]
    fn test_empty_and_long_descriptions_warn_with_line() {
        let config = ConverterConfig::default();
        let long = "D".repeat(81);
        let rows = vec![row(0, "OLG1-1", "  "), row(1, "OLG1-2", &long)];
        let output = DescriptionUpdateConverter
            .convert(&ConversionInput::new(&rows, &config))
            .unwrap();

        assert_eq!(
            output.stats.warnings,
            vec![
                "Line 2: empty description for code G11",
                "Line 3: description too long (81 characters) for code G12",
            ]
        );
        assert_eq!(output.table.unwrap().len(), 2);
    }
}
