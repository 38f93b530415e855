//! elfsleuth — concurrent ELF signature scanner.
//!
//! Thin binary entry point: argument handling and wiring only. All
//! scanning logic lives in the `elfsleuth-core` crate.
//!
//! ```text
//! elfsleuth <root_directory> <signature_file>
//! ```
//!
//! Infected files are listed on stdout, per-file scan failures on stderr.
//! Exit code 0 when the scan ran to completion (infections or not), 1 on
//! usage errors, a bad signature file, or an unreadable root.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use elfsleuth_core::report::ConsoleSink;
use elfsleuth_core::scanner::{run_scan, ScanOptions};
use elfsleuth_core::signature::Signature;
use elfsleuth_core::walk;

fn main() -> ExitCode {
    // Structured logging to stderr — stdout is reserved for the report.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        let exe = args.first().map(String::as_str).unwrap_or("elfsleuth");
        eprintln!("Usage: {exe} <root_directory> <signature_file>");
        return ExitCode::from(1);
    }

    match run(PathBuf::from(&args[1]), PathBuf::from(&args[2])) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(1)
        }
    }
}

fn run(root: PathBuf, signature_path: PathBuf) -> anyhow::Result<()> {
    let signature = Signature::load(&signature_path)?;
    let candidates = walk::enumerate(&root)?;

    println!("Scanning started...\n");

    let sink = Arc::new(ConsoleSink::new());
    let summary = run_scan(candidates, &signature, &ScanOptions::default(), sink);

    println!("\nScan completed.");
    println!(
        "{} files checked, {} ELF, {} infected, {} errors in {:.2?}",
        summary.files_seen, summary.elf_files, summary.infected, summary.errors, summary.duration
    );
    Ok(())
}
