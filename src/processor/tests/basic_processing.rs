//! Single-conversion runs

use super::{read_output, sample_bom, write_bom};
use crate::converters::ConversionKind;
use crate::processor::BomProcessor;
use std::fs;
use tempfile::TempDir;

fn processor(input: std::path::PathBuf, code: &str) -> BomProcessor {
    BomProcessor::new(input, Some(code.to_string())).with_console_output(false)
}

#[test]
fn test_structure_run_writes_structure_report_and_input_copy() {
    let temp_dir = TempDir::new().unwrap();
    let input = sample_bom(&temp_dir);

    let summary = processor(input, "ROOT").run(ConversionKind::Structure).unwrap();

    let folder = temp_dir.path().join("ESTRUTURA ROOT");
    assert_eq!(summary.output_dir, folder);
    assert!(summary.all_succeeded());
    assert!(folder.join("bom.csv").exists());

    let structure = folder.join("ESTRUTURA_ROOT.csv");
    assert_eq!(summary.results[0].output_file.as_ref(), Some(&structure));
    let bytes = fs::read(&structure).unwrap();
    assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));

    let text = read_output(&structure);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "EMP;MTG;COD;QTD;PER",
            "001;ROOT;G12061001;3;0",
            "001;ROOT;G30010001;1;0",
            "001;G12061001;Z03058032;4;0",
            "001;G12061001;C15022001;1;0",
        ]
    );

    let report = read_output(&folder.join("RELATORIO_REMOVIDOS_ROOT.csv"));
    assert!(report.starts_with("MOTIVO;LINHA_XLSX;ITEM;QTD;N° DESENHO;CODIGO MP20"));
    assert!(report.contains("OLG99-99-9999^"));
    assert!(report.contains("Unattached rows: 0"));

    let stats = summary.results[0].stats.as_ref().unwrap();
    assert_eq!(stats.total_rows, 6);
    assert_eq!(stats.excluded_rows, 1);
    assert_eq!(stats.duplicate_rows, 2);
    assert_eq!(stats.generated_relationships, 4);
}

#[test]
fn test_structure_without_report() {
    let temp_dir = TempDir::new().unwrap();
    let input = sample_bom(&temp_dir);
    let out = temp_dir.path().join("out");

    let summary = processor(input, "ROOT")
        .with_output_dir(Some(out.clone()))
        .with_report(false)
        .run(ConversionKind::Structure)
        .unwrap();

    assert_eq!(summary.output_dir, out);
    assert!(out.join("ESTRUTURA_ROOT.csv").exists());
    assert!(!out.join("RELATORIO_REMOVIDOS_ROOT.csv").exists());
    // no input copy when the folder was chosen explicitly
    assert!(!out.join("bom.csv").exists());
}

#[test]
fn test_parts_registration_run() {
    let temp_dir = TempDir::new().unwrap();
    let input = sample_bom(&temp_dir);

    let summary = processor(input, "ROOT").run(ConversionKind::Parts).unwrap();
    let path = temp_dir.path().join("CADASTRO DE PEÇAS ROOT.csv");
    assert_eq!(summary.results[0].output_file.as_ref(), Some(&path));

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "C15022001;Chapa lateral;3;4;107;108;16;3;S;3",
            "G12061001;Base soldada;3;4;107;108;16;3;S;12.5",
            "G30010001;Mangueira 1/2 1500mm;3;4;107;108;16;3;S;0",
        ]
    );
}

#[test]
fn test_material_update_run() {
    let temp_dir = TempDir::new().unwrap();
    let input = sample_bom(&temp_dir);

    processor(input, "ROOT").run(ConversionKind::Materials).unwrap();
    let text = read_output(&temp_dir.path().join("ATUALIZAÇÃO DE MATÉRIA PRIMA ROOT.csv"));
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "EMP;COD;MAP;PES;PER",
            "001;C15022001;654321;3,00;0",
            "001;G12061001;123456;12,50;0",
            "001;G30010001;Z200001;1,50;0",
        ]
    );
}

#[test]
fn test_olz_verification_with_reference() {
    let temp_dir = TempDir::new().unwrap();
    let input = sample_bom(&temp_dir);
    let reference = temp_dir.path().join("registered.csv");
    fs::write(&reference, "Codigo;Descricao\nZ03058032;Parafuso M8\n").unwrap();

    let summary = processor(input, "ROOT")
        .with_reference_file(Some(reference))
        .run(ConversionKind::OlzVerification)
        .unwrap();

    assert!(summary.results[0].success);
    assert!(summary.results[0].output_file.is_none());
    assert!(!temp_dir.path().join("OLZ FALTANTES ROOT.csv").exists());
}

#[test]
fn test_sibling_conversion_without_assembly_code() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_bom(&temp_dir, &["1;1;Base;OLG12-06-1001;123456;1"]);

    BomProcessor::new(input, None)
        .with_console_output(false)
        .run(ConversionKind::Descriptions)
        .unwrap();

    let text = read_output(&temp_dir.path().join("ATUALIZAÇÃO DE DESCRIÇÕES.csv"));
    assert_eq!(text.lines().collect::<Vec<_>>(), vec!["G12061001;Base"]);
}

#[test]
fn test_summary_serializes_to_json() {
    let temp_dir = TempDir::new().unwrap();
    let input = sample_bom(&temp_dir);

    let summary = processor(input, "ROOT").run(ConversionKind::Structure).unwrap();
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["conversion"], "structure");
    assert_eq!(json["results"][0]["success"], true);
    assert_eq!(json["results"][0]["stats"]["generated_relationships"], 4);
}

#[test]
fn test_blank_description_is_an_empty_field() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_bom(
        &temp_dir,
        &["1;1;;OLG12-06-1001;123456;", "1.1;;Parafuso;OLZ-03-058-032;;"],
    );

    let summary = BomProcessor::new(input, None)
        .with_console_output(false)
        .run(ConversionKind::Parts)
        .unwrap();
    assert!(summary.all_succeeded());

    let text = fs::read_to_string(temp_dir.path().join("CADASTRO DE PEÇAS.csv")).unwrap();
    assert_eq!(text.lines().next(), Some("G12061001;;3;4;107;108;16;3;S;0"));
    assert!(!text.contains("\"\""));
}
