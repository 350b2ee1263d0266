//! BOM Structure Library
//!
//! Converts hierarchical engineering Bill-of-Materials spreadsheets into the
//! flat record files imported by the NEO ERP.
//!
//! This library provides tools for:
//! - Reading BOM tables from xlsx, xls and `;`-separated csv files
//! - Normalizing drawing numbers into component codes
//! - Turning dotted positions into deduplicated parent-child relationships
//! - Verifying the generated structure and auditing every removed row
//! - Writing parts registration, description and raw material updates
//! - Listing purchased parts missing from the registered parts list

pub mod cli;
pub mod config;
pub mod constants;
pub mod converters;
pub mod error;
pub mod hierarchy;
pub mod models;
pub mod processor;
pub mod table;

// Re-export commonly used types
pub use config::{ColumnMapping, ConverterConfig};
pub use converters::{ConversionKind, Converter};
pub use error::{BomError, Result};
pub use hierarchy::{StructureOutcome, process_structure};
pub use models::{ConversionResult, Edge, OutputTable, ProcessingStats, SourceRow};
pub use processor::{BomProcessor, RunSummary};
pub use table::{SourceTable, TableSink};
