//! Integration tests for the hierarchy engine
//!
//! Drives classification, building and verification together over small
//! spreadsheets written as tuples.


use crate::models::SourceRow;

/// Build source rows from `(position, quantity, drawing number, material)` tuples
pub fn rows(data: &[(&str, &str, &str, &str)]) -> Vec<SourceRow> {
    data.iter()
        .enumerate()
        .map(|(index, (position, quantity, drawing, material))| SourceRow {
            index,
            position: position.to_string(),
            quantity_raw: quantity.to_string(),
            drawing_number: drawing.to_string(),
            material_code: material.to_string(),
            ..Default::default()
        })
        .collect()
}
