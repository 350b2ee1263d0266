//! Conversion strategies.
//!
//! Every conversion reads the same classified rows. A strategy only decides
//! which records it emits for them and how the output file is named. The
//! hierarchy engine is shared by all of them.

pub mod descriptions;
pub mod materials;
pub mod olz;
pub mod parts;
pub mod structure;

pub use descriptions::DescriptionUpdateConverter;
pub use materials::MaterialUpdateConverter;
pub use olz::OlzVerificationConverter;
pub use parts::PartsRegistrationConverter;
pub use structure::StructureConverter;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::config::ConverterConfig;
use crate::error::Result;
use crate::models::{OutputTable, ProcessingStats, SourceRow};
use crate::table::ColumnLayout;

/// Conversion selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversionKind {
    /// Parent-child structure for the NEO structure importer
    Structure,
    /// Registration records for manufactured parts and assemblies
    Parts,
    /// Description updates for every component
    Descriptions,
    /// Raw material and weight updates for manufactured parts
    Materials,
    /// Purchased (OLZ) parts missing from the reference list
    OlzVerification,
    /// Parts, descriptions, materials and OLZ verification in one run
    All,
}

impl ConversionKind {
    /// Conversions executed by an `All` run, in order
    pub const COMPLETE_SEQUENCE: [ConversionKind; 4] = [
        ConversionKind::Parts,
        ConversionKind::Descriptions,
        ConversionKind::Materials,
        ConversionKind::OlzVerification,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConversionKind::Structure => "Hierarchical structure",
            ConversionKind::Parts => "Parts registration",
            ConversionKind::Descriptions => "Description update",
            ConversionKind::Materials => "Material update",
            ConversionKind::OlzVerification => "OLZ verification",
            ConversionKind::All => "Complete registration",
        }
    }

    /// Only the structure needs a root to hang level-0 rows under
    pub fn requires_assembly_code(&self) -> bool {
        matches!(self, ConversionKind::Structure)
    }

    /// The strategy for a single conversion; `All` has none of its own
    pub fn converter(&self) -> Option<Box<dyn Converter>> {
        match self {
            ConversionKind::Structure => Some(Box::new(StructureConverter)),
            ConversionKind::Parts => Some(Box::new(PartsRegistrationConverter)),
            ConversionKind::Descriptions => Some(Box::new(DescriptionUpdateConverter)),
            ConversionKind::Materials => Some(Box::new(MaterialUpdateConverter)),
            ConversionKind::OlzVerification => Some(Box::new(OlzVerificationConverter)),
            ConversionKind::All => None,
        }
    }
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a converter gets to work with
#[derive(Debug, Clone, Copy)]
pub struct ConversionInput<'a> {
    pub rows: &'a [SourceRow],
    pub layout: ColumnLayout,
    pub assembly_code: Option<&'a str>,
    pub config: &'a ConverterConfig,
    /// Registered purchased parts, used by the OLZ verification
    pub reference_file: Option<&'a Path>,
}

impl<'a> ConversionInput<'a> {
    pub fn new(rows: &'a [SourceRow], config: &'a ConverterConfig) -> Self {
        Self {
            rows,
            layout: ColumnLayout::default(),
            assembly_code: None,
            config,
            reference_file: None,
        }
    }

    pub fn with_layout(mut self, layout: ColumnLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_assembly_code(mut self, code: Option<&'a str>) -> Self {
        self.assembly_code = code.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn with_reference_file(mut self, path: Option<&'a Path>) -> Self {
        self.reference_file = path;
        self
    }
}

/// Tables produced by one converter, not yet written
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// Main output; `None` when there is nothing to write
    pub table: Option<OutputTable>,
    /// Audit report of the structure conversion
    pub report: Option<OutputTable>,
    pub stats: ProcessingStats,
    pub message: String,
}

/// One conversion strategy
pub trait Converter {
    fn kind(&self) -> ConversionKind;

    /// File name of the main output for `assembly_code`
    fn output_file_name(&self, assembly_code: Option<&str>) -> String;

    fn convert(&self, input: &ConversionInput<'_>) -> Result<ConversionOutput>;
}

/// `"<stem> <code>.csv"`, or `"<stem>.csv"` without a code
pub(crate) fn stem_file_name(stem: &str, assembly_code: Option<&str>) -> String {
    match assembly_code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => format!("{} {}.csv", stem, code),
        None => format!("{}.csv", stem),
    }
}
