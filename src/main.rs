use anyhow::Context;
use bom_structure::BomProcessor;
use bom_structure::cli::{Args, setup_logging};
use clap::Parser;
use std::process;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    match run(&args) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Run the requested conversion; `Ok(false)` when a conversion of a complete
/// run failed
fn run(args: &Args) -> anyhow::Result<bool> {
    let processor = BomProcessor::new(args.input.clone(), args.assembly_code())
        .with_output_dir(args.output_dir.clone())
        .with_reference_file(args.reference_file.clone())
        .with_report(!args.no_report)
        .with_console_output(!args.json);

    let summary = processor.run(args.conversion).map_err(|e| {
        let headline = e.category().headline();
        anyhow::Error::new(e).context(headline)
    })?;

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .context("Failed to serialize run summary")?;
        println!("{}", json);
    }

    Ok(summary.all_succeeded())
}
