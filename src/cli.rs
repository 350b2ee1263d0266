//! Command-line interface for the BOM converter
//!
//! One invocation runs one conversion over one input table. Output and
//! reference locations can also come from the environment.

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::converters::ConversionKind;
use crate::table::sanitize_assembly_code;

/// Convert engineering BOM spreadsheets into NEO ERP import files
#[derive(Debug, Clone, Parser)]
#[command(
    name = "bom-structure",
    version,
    about = "Convert hierarchical BOM spreadsheets into NEO ERP import files",
    long_about = "Reads an engineering bill of materials (xlsx, xls or ;-separated csv) \
                  whose rows carry dotted positions, and writes the parent-child structure \
                  table, parts registration, description and raw material updates, or the \
                  list of purchased parts missing from the registered parts list."
)]
pub struct Args {
    /// BOM spreadsheet to convert
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Conversion to run
    #[arg(short = 'c', long = "conversion", value_enum, default_value = "structure")]
    pub conversion: ConversionKind,

    /// Code of the root assembly; required for the structure conversion
    #[arg(short = 'a', long = "assembly-code", value_name = "CODE")]
    pub assembly_code: Option<String>,

    /// Directory for every generated file
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        env = "BOM_OUTPUT_DIR"
    )]
    pub output_dir: Option<PathBuf>,

    /// Registered purchased parts, used by the OLZ verification
    #[arg(long = "reference-file", value_name = "FILE", env = "BOM_REFERENCE_FILE")]
    pub reference_file: Option<PathBuf>,

    /// Skip the removal report of the structure conversion
    #[arg(long = "no-report")]
    pub no_report: bool,

    /// Print the run summary as JSON instead of colored text
    #[arg(long = "json")]
    pub json: bool,

    /// Increase logging verbosity (-v: debug, -vv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Assembly code reduced to letters, digits and dots, uppercased
    pub fn assembly_code(&self) -> Option<String> {
        let raw = self.assembly_code.as_deref()?;
        let sanitized = sanitize_assembly_code(raw);
        if sanitized != raw.trim() {
            warn!("Assembly code '{}' sanitized to '{}'", raw, sanitized);
        }
        Some(sanitized).filter(|c| !c.is_empty())
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bom_structure={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}
