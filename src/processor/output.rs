//! Output directory policy.
//!
//! An explicit directory always wins. Otherwise the structure conversion gets
//! its own `ESTRUTURA <code>` folder next to the input, holding a copy of the
//! input file, and a complete run gets `CADASTRO COMPLETO <code>`. Everything
//! else is written beside the input file.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::{COMPLETE_DIR_PREFIX, STRUCTURE_DIR_PREFIX};
use crate::converters::ConversionKind;
use crate::error::{BomError, Result};

/// Directory containing `input`, `.` for a bare file name
pub fn input_directory(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn prefixed_dir(prefix: &str, assembly_code: Option<&str>) -> String {
    format!("{}{}", prefix, assembly_code.unwrap_or_default())
        .trim_end()
        .to_string()
}

/// Where the outputs of `kind` go
pub fn resolve_output_dir(
    input: &Path,
    explicit: Option<&Path>,
    kind: ConversionKind,
    assembly_code: Option<&str>,
) -> PathBuf {
    let directory = match (explicit, kind) {
        (Some(dir), ConversionKind::All) => dir.join(prefixed_dir(COMPLETE_DIR_PREFIX, assembly_code)),
        (Some(dir), _) => dir.to_path_buf(),
        (None, ConversionKind::Structure) => {
            input_directory(input).join(prefixed_dir(STRUCTURE_DIR_PREFIX, assembly_code))
        }
        (None, ConversionKind::All) => {
            input_directory(input).join(prefixed_dir(COMPLETE_DIR_PREFIX, assembly_code))
        }
        (None, _) => input_directory(input),
    };
    debug!("Output directory for {}: {}", kind, directory.display());
    directory
}

/// Whether the input file is copied next to the outputs
pub fn copies_input(explicit: Option<&Path>, kind: ConversionKind) -> bool {
    explicit.is_none() && kind == ConversionKind::Structure
}

/// Create the output directory
pub fn prepare_output_dir(directory: &Path) -> Result<()> {
    std::fs::create_dir_all(directory).map_err(|e| BomError::from_io(directory, e))
}

/// Copy the input file into `directory`; failures are only warned about
pub fn copy_input_file(input: &Path, directory: &Path) -> Option<String> {
    let Some(file_name) = input.file_name() else {
        return Some(format!("Could not copy input file {}", input.display()));
    };
    let target = directory.join(file_name);
    match std::fs::copy(input, &target) {
        Ok(_) => {
            debug!("Copied input to {}", target.display());
            None
        }
        Err(e) => {
            warn!("Could not copy input file to {}: {}", target.display(), e);
            Some(format!("Could not copy input file to output folder: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_structure_gets_own_folder() {
        let dir = resolve_output_dir(
            Path::new("/data/bom.xlsx"),
            None,
            ConversionKind::Structure,
            Some("G1"),
        );
        assert_eq!(dir, PathBuf::from("/data/ESTRUTURA G1"));
        assert!(copies_input(None, ConversionKind::Structure));
    }

    #[test]
    fn test_explicit_dir_wins() {
        let explicit = Path::new("/out");
        let dir = resolve_output_dir(
            Path::new("/data/bom.xlsx"),
            Some(explicit),
            ConversionKind::Structure,
            Some("G1"),
        );
        assert_eq!(dir, PathBuf::from("/out"));
        assert!(!copies_input(Some(explicit), ConversionKind::Structure));

        let all = resolve_output_dir(
            Path::new("/data/bom.xlsx"),
            Some(explicit),
            ConversionKind::All,
            Some("G1"),
        );
        assert_eq!(all, PathBuf::from("/out/CADASTRO COMPLETO G1"));
    }

    #[test]
    fn test_sibling_conversions_write_beside_input() {
        let dir = resolve_output_dir(Path::new("bom.csv"), None, ConversionKind::Parts, None);
        assert_eq!(dir, PathBuf::from("."));
        let all = resolve_output_dir(Path::new("/d/bom.csv"), None, ConversionKind::All, None);
        assert_eq!(all, PathBuf::from("/d/CADASTRO COMPLETO"));
    }

    #[test]
    fn test_copy_input_file() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("bom.csv");
        fs::write(&input, "ITEM\n").unwrap();
        let out = temp.path().join("out");
        prepare_output_dir(&out).unwrap();

        assert!(copy_input_file(&input, &out).is_none());
        assert!(out.join("bom.csv").exists());
        assert!(copy_input_file(&temp.path().join("absent.csv"), &out).is_some());
    }
}
