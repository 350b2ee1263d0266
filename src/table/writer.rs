//! Output table writing via the polars CSV writer

use polars::prelude::{Column, CsvWriter, DataFrame, SerWriter};
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::error::{BomError, Result};
use crate::models::OutputTable;

/// Writes [`OutputTable`]s as delimited text
#[derive(Debug, Clone, Copy)]
pub struct TableSink {
    separator: u8,
}

impl TableSink {
    pub fn new(separator: u8) -> Self {
        Self { separator }
    }

    /// Write `table` to `path`, honouring its header and byte order mark flags.
    ///
    /// Blank cells are written as nulls so they come out as empty fields;
    /// polars quotes empty strings.
    pub fn write_table(&self, path: &Path, table: &OutputTable) -> Result<()> {
        let columns: Vec<Column> = table
            .headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let values: Vec<Option<&str>> = table
                    .rows
                    .iter()
                    .map(|row| row.get(i).map(String::as_str).filter(|v| !v.is_empty()))
                    .collect();
                Column::new(header.as_str().into(), values)
            })
            .collect();
        let mut df = DataFrame::new(columns)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| BomError::from_io(parent, e))?;
        }
        let mut file = File::create(path).map_err(|e| BomError::from_io(path, e))?;

        CsvWriter::new(&mut file)
            .include_header(table.include_header)
            .include_bom(table.include_bom)
            .with_separator(self.separator)
            .finish(&mut df)?;

        debug!("Wrote {} rows to {}", table.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> OutputTable {
        let mut table = OutputTable::new(&["EMP", "MTG", "COD"]);
        table.push_row(vec!["001".into(), "ROOT".into(), "G1".into()]);
        table.push_row(vec!["001".into(), "G1".into(), "Z2".into()]);
        table
    }

    #[test]
    fn test_header_and_bom_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        TableSink::new(b';').write_table(&path, &sample()).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines, vec!["EMP;MTG;COD", "001;ROOT;G1", "001;G1;Z2"]);
    }

    #[test]
    fn test_headerless_without_bom() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let table = sample().without_header().without_bom();
        TableSink::new(b';').write_table(&path, &table).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().next(), Some("001;ROOT;G1"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_blank_cells_are_empty_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.csv");
        let mut table = OutputTable::new(&["A", "B", "C"]).without_header().without_bom();
        table.push_row(vec!["a".into(), "".into(), "c".into()]);
        table.push_row(vec!["x;y".into(), "1".into(), "".into()]);
        TableSink::new(b';').write_table(&path, &table).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines, vec!["a;;c", "\"x;y\";1;"]);
    }
}
