//! Integration tests for the processor module
//!
//! Drives complete conversion runs over small `;`-separated BOM files written
//! to temporary directories.

pub mod basic_processing;

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const BOM_HEADER: &str = "ITEM;QTD;DESCRIÇÃO;N° DESENHO;CODIGO MP20;PESO";

/// Write a BOM table to `<temp>/bom.csv`
pub fn write_bom(temp_dir: &TempDir, rows: &[&str]) -> PathBuf {
    let mut content = String::from(BOM_HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');

    let path = temp_dir.path().join("bom.csv");
    fs::write(&path, content).unwrap();
    path
}

/// A small two-level assembly with a repeated sub-assembly and a caret row
pub fn sample_bom(temp_dir: &TempDir) -> PathBuf {
    write_bom(
        temp_dir,
        &[
            "1;2;Base soldada;OLG12-06-1001;123456 - CHAPA;12,5",
            "1.1;4;Parafuso M8;OLZ-03-058-032;Z03058;",
            "1.2;1;Chapa lateral;OLC15-02-2001;654321;3",
            "2;1;Base soldada;OLG12-06-1001;123456 - CHAPA;12,5",
            "3;1;Mangueira 1/2 1500mm;OLG30-01-0001;Z200001;",
            "4;1;Obsoleto;OLG99-99-9999^;111111;1",
        ],
    )
}

/// Read a generated file, without its byte order mark
pub fn read_output(path: &std::path::Path) -> String {
    let text = fs::read_to_string(path).unwrap();
    text.trim_start_matches('\u{feff}').to_string()
}
