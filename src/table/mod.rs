//! Tabular collaborators: reading input tables, writing output tables and
//! validating conversion requests.

pub mod fields;
pub mod reader;
pub mod validation;
pub mod writer;

pub use fields::{normalize_header, sanitize_field};
pub use reader::{ColumnLayout, CsvSource, SourceTable, SpreadsheetSource, TableSource};
pub use validation::{
    sanitize_assembly_code, validate_assembly_code, validate_input_file, validate_table,
};
pub use writer::TableSink;
