use log::info;
use std::env;
use std::process;
use tally::{DocumentError, ReportDocument, render_listing};

/// A simple CLI that paginates a report document and lists every node with
/// its function values.
fn main() -> Result<(), DocumentError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Paginates a JSON report document and prints the function values per page.");
        eprintln!();
        eprintln!("Usage: {} <path/to/report.json>", args[0]);
        eprintln!();
        eprintln!("Set RUST_LOG=debug to follow the layout passes.");
        process::exit(1);
    }

    let document = ReportDocument::from_file(&args[1])?;
    let report = document.run()?;
    info!(
        "Converged after {} layout passes, {} bands replayed.",
        report.passes(),
        report.replayed_bands()
    );

    let functions: Vec<&str> = document
        .definition
        .functions
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    print!("{}", render_listing(&report, &functions));
    Ok(())
}
