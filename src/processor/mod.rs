//! Conversion orchestration.
//!
//! Runs one conversion request end to end: validate the request, load and
//! check the input table, dispatch the selected converter(s), resolve the
//! output directory, write the tables and report what happened.

pub mod output;

#[cfg(test)]
pub mod tests;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::config::ConverterConfig;
use crate::converters::{ConversionInput, ConversionKind, Converter, structure};
use crate::error::Result;
use crate::models::ConversionResult;
use crate::table::{
    SourceTable, TableSink, validate_assembly_code, validate_input_file, validate_table,
};

/// Outcome of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input: PathBuf,
    pub conversion: ConversionKind,
    pub output_dir: PathBuf,
    pub results: Vec<ConversionResult>,
    /// Request-level warnings (file size, empty columns, input copy)
    pub warnings: Vec<String>,
    pub processing_time_ms: u128,
}

impl RunSummary {
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }
}

/// Main processor for BOM conversions
#[derive(Debug)]
pub struct BomProcessor {
    input: PathBuf,
    assembly_code: Option<String>,
    config: ConverterConfig,
    output_dir: Option<PathBuf>,
    reference_file: Option<PathBuf>,
    console: bool,
}

impl BomProcessor {
    /// Create a processor for `input`; the assembly code is optional except
    /// for the structure conversion
    pub fn new(input: impl Into<PathBuf>, assembly_code: Option<String>) -> Self {
        Self {
            input: input.into(),
            assembly_code: assembly_code
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            config: ConverterConfig::default(),
            output_dir: None,
            reference_file: None,
            console: true,
        }
    }

    pub fn with_config(mut self, config: ConverterConfig) -> Self {
        self.config = config;
        self
    }

    /// Write every output into `dir` instead of the default locations
    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }

    /// List of registered purchased parts for the OLZ verification
    pub fn with_reference_file(mut self, path: Option<PathBuf>) -> Self {
        self.reference_file = path;
        self
    }

    pub fn with_report(mut self, enabled: bool) -> Self {
        self.config.write_report = enabled;
        self
    }

    /// Print colored progress and summaries to stdout
    pub fn with_console_output(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Run one conversion request
    pub fn run(&self, kind: ConversionKind) -> Result<RunSummary> {
        let start_time = Instant::now();
        let code = self.assembly_code.as_deref();

        self.config.validate()?;
        let mut warnings = validate_assembly_code(code, kind.requires_assembly_code())?;
        warnings.extend(validate_input_file(&self.input, &self.config)?);

        if self.console {
            println!("{}", format!("Starting {}", kind.label()).bright_green().bold());
            println!("  {} {}", "Input:".bright_cyan(), self.input.display());
            if let Some(code) = code {
                println!("  {} {}", "Assembly:".bright_cyan(), code);
            }
            println!("\n{}", "Reading table...".bright_yellow());
        }

        let table = SourceTable::from_path(&self.input, &self.config)?;
        warnings.extend(validate_table(&table, &self.config)?);
        let rows = table.source_rows(&self.config.columns)?;
        let layout = table.layout(&self.config.columns);
        for warning in &warnings {
            warn!("{}", warning);
        }

        let output_dir =
            output::resolve_output_dir(&self.input, self.output_dir.as_deref(), kind, code);
        output::prepare_output_dir(&output_dir)?;
        if output::copies_input(self.output_dir.as_deref(), kind) {
            warnings.extend(output::copy_input_file(&self.input, &output_dir));
        }

        if self.console {
            println!(
                "  {} {} rows, writing to {}",
                "Loaded".bright_green(),
                rows.len().to_string().bright_white().bold(),
                output_dir.display()
            );
        }

        let input = ConversionInput::new(&rows, &self.config)
            .with_layout(layout)
            .with_assembly_code(code)
            .with_reference_file(self.reference_file.as_deref());

        let results = match kind.converter() {
            Some(converter) => vec![self.run_converter(converter.as_ref(), &input, &output_dir)?],
            None => self.run_sequence(&input, &output_dir),
        };

        let summary = RunSummary {
            input: self.input.clone(),
            conversion: kind,
            output_dir,
            results,
            warnings,
            processing_time_ms: start_time.elapsed().as_millis(),
        };
        if self.console {
            print_summary(&summary);
        }
        Ok(summary)
    }

    /// Parts, descriptions, materials and OLZ verification; a failure is
    /// recorded and the next conversion still runs
    fn run_sequence(&self, input: &ConversionInput<'_>, output_dir: &Path) -> Vec<ConversionResult> {
        let progress = if self.console {
            let pb = ProgressBar::new(ConversionKind::COMPLETE_SEQUENCE.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let mut results = Vec::new();
        for kind in ConversionKind::COMPLETE_SEQUENCE {
            progress.set_message(kind.label());
            let Some(converter) = kind.converter() else {
                continue;
            };
            let result = match self.run_converter(converter.as_ref(), input, output_dir) {
                Ok(result) => result,
                Err(e) => {
                    error!("{} failed: {}", kind, e);
                    ConversionResult::failed(format!("{} failed: {}", kind, e))
                }
            };
            results.push(result);
            progress.inc(1);
        }
        progress.finish_with_message("Complete registration finished");
        results
    }

    /// Convert, then write the main table and the structure report
    fn run_converter(
        &self,
        converter: &dyn Converter,
        input: &ConversionInput<'_>,
        output_dir: &Path,
    ) -> Result<ConversionResult> {
        info!("Running {}", converter.kind());
        let output = converter.convert(input)?;
        let sink = TableSink::new(self.config.separator);

        let output_file = match &output.table {
            Some(table) => {
                let path = output_dir.join(converter.output_file_name(input.assembly_code));
                sink.write_table(&path, table)?;
                info!("Wrote {} records to {}", table.len(), path.display());
                Some(path)
            }
            None => None,
        };

        let mut stats = output.stats;
        if let (Some(report), Some(code)) = (&output.report, input.assembly_code) {
            let path = output_dir.join(structure::report_file_name(code));
            match sink.write_table(&path, report) {
                Ok(()) => info!("Wrote report to {}", path.display()),
                Err(e) => {
                    warn!("Could not write report {}: {}", path.display(), e);
                    stats
                        .warnings
                        .push(format!("Could not write removal report: {}", e));
                }
            }
        }

        Ok(ConversionResult::succeeded(output.message, output_file, stats))
    }
}

fn print_summary(summary: &RunSummary) {
    println!("\n{}", "Conversion Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        summary.processing_time_ms.to_string().bright_white()
    );
    for result in &summary.results {
        if result.success {
            println!("  {} {}", "OK".bright_green().bold(), result.message);
        } else {
            println!("  {} {}", "FAILED".bright_red().bold(), result.message);
        }
        if let Some(path) = &result.output_file {
            println!("    {} {}", "File:".bright_cyan(), path.display());
        }
        if let Some(stats) = &result.stats {
            println!(
                "    {} {} rows, {} valid, {} excluded",
                "Rows:".bright_cyan(),
                stats.total_rows,
                stats.valid_rows,
                stats.excluded_rows
            );
        }
        for warning in &result.warnings {
            println!("    {} {}", "Warning:".bright_yellow(), warning);
        }
    }
    for warning in &summary.warnings {
        println!("  {} {}", "Warning:".bright_yellow(), warning);
    }
}
