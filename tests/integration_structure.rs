//! End-to-end structure conversion through the public API
//!
//! Reads a `;`-separated BOM from disk, builds the relationship graph and
//! writes the NEO structure table, the way the command-line tool does.

use bom_structure::hierarchy::find_z_parents;
use bom_structure::{
    BomProcessor, ConversionKind, ConverterConfig, SourceTable, TableSink, process_structure,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const BOM: &str = "\u{feff}ITEM;QTD;DESCRIÇÃO;N° DESENHO;CODIGO MP20;PESO
1;1;Chassi;OLG10-01-0001;100001;50
1.1;2;Travessa;OLG10-02-0001;100002;5
1.1.1;4;Parafuso;OLZ-03-058-032;;
1.2;2;Travessa;OLG10-02-0001;100002;5
2;1;Kit fixação;OLZ-09-000-001;;
2.1;3;Arruela;OLZ-03-010-001;;
";

fn write_bom(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("chassi.csv");
    fs::write(&path, BOM).unwrap();
    path
}

#[test]
fn test_structure_from_csv_file() {
    let dir = TempDir::new().unwrap();
    let path = write_bom(&dir);
    let config = ConverterConfig::default();

    let table = SourceTable::from_path(&path, &config).unwrap();
    assert_eq!(table.len(), 6);
    let rows = table.source_rows(&config.columns).unwrap();
    assert_eq!(rows[0].description, "Chassi");

    let outcome = process_structure(&rows, "MAQ01").unwrap();
    let edges: Vec<_> = outcome
        .graph
        .edges
        .iter()
        .map(|e| (e.parent.as_str(), e.child.as_str(), e.quantity))
        .collect();

    // the repeated sub-assembly under the same parent is consolidated
    assert_eq!(
        edges,
        vec![
            ("MAQ01", "G10010001", 1.0),
            ("MAQ01", "Z09000001", 1.0),
            ("G10010001", "G10020001", 4.0),
            ("Z09000001", "Z03010001", 3.0),
            ("G10020001", "Z03058032", 4.0),
        ]
    );
    assert!(outcome.verification.is_ok());
    assert_eq!(outcome.stats.consolidated_rows, 1);

    let z_parents = find_z_parents(&outcome.graph.edges);
    assert_eq!(z_parents.len(), 1);
    assert_eq!(z_parents[0].parent, "Z09000001");
}

#[test]
fn test_processor_writes_structure_folder() {
    let dir = TempDir::new().unwrap();
    let path = write_bom(&dir);

    let summary = BomProcessor::new(path, Some("MAQ01".to_string()))
        .with_console_output(false)
        .run(ConversionKind::Structure)
        .unwrap();

    assert!(summary.all_succeeded());
    let folder = dir.path().join("ESTRUTURA MAQ01");
    assert!(folder.join("chassi.csv").exists());

    let text = fs::read_to_string(folder.join("ESTRUTURA_MAQ01.csv")).unwrap();
    let lines: Vec<_> = text.trim_start_matches('\u{feff}').lines().collect();
    assert_eq!(lines[0], "EMP;MTG;COD;QTD;PER");
    assert_eq!(lines.len(), 6);
    assert!(lines.contains(&"001;G10010001;G10020001;4;0"));

    let warnings = &summary.results[0].warnings;
    assert!(
        warnings
            .iter()
            .any(|w| w.starts_with("Z code used as parent") && w.contains("Z09000001"))
    );
}

#[test]
fn test_sink_round_trip_through_source_table() {
    let dir = TempDir::new().unwrap();
    let path = write_bom(&dir);
    let config = ConverterConfig::default();
    let rows = SourceTable::from_path(&path, &config)
        .unwrap()
        .source_rows(&config.columns)
        .unwrap();

    let outcome = process_structure(&rows, "MAQ01").unwrap();
    let mut table = bom_structure::OutputTable::new(&["MTG", "COD"]);
    for edge in &outcome.graph.edges {
        table.push_row(vec![edge.parent.clone(), edge.child.clone()]);
    }
    let written = dir.path().join("out").join("edges.csv");
    TableSink::new(config.separator)
        .write_table(&written, &table)
        .unwrap();

    let reread = SourceTable::from_path(&written, &config).unwrap();
    assert_eq!(reread.column_index("MTG"), Some(0));
    assert_eq!(reread.column_index("COD"), Some(1));
    assert_eq!(reread.len(), outcome.graph.edges.len());
}
