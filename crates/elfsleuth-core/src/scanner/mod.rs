//! Scanner module — orchestrates per-file classification and scanning.
//!
//! For each candidate path the orchestrator submits one task to the worker
//! pool: classify the file by magic, and if it is ELF, run the boundary
//! scanner. Exactly one [`ScanOutcome`] is produced per path; only the
//! anomalous ones (`Infected`, `Error`) reach the report sink. Task bodies
//! run under `catch_unwind` so even an unexpected fault becomes a visible
//! `Error` outcome instead of a silently lost file.

pub mod boundary;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::classify::FileMagic;
use crate::pool::WorkerPool;
use crate::report::{ReportSink, ScanOutcome, ScanReport};
use crate::signature::Signature;

/// Knobs for a scan run.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Worker thread count; defaults to the detected hardware parallelism.
    pub worker_threads: Option<usize>,
    /// Magic that marks a file as scannable. ELF unless overridden.
    pub magic: FileMagic,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            worker_threads: None,
            magic: FileMagic::ELF,
        }
    }
}

/// Running totals for one scan, reported once at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    /// Candidate paths submitted to the pool.
    pub files_seen: u64,
    /// Files that passed magic classification (clean or infected).
    pub elf_files: u64,
    /// Files in which the signature was found.
    pub infected: u64,
    /// Files that could not be scanned (including trapped task faults).
    pub errors: u64,
    pub duration: Duration,
}

#[derive(Default)]
struct Counters {
    clean: AtomicU64,
    infected: AtomicU64,
    errors: AtomicU64,
}

/// Classify one path and, if it is ELF, scan it for the signature.
///
/// Infallible by contract: every failure mode maps onto a `ScanOutcome`
/// variant.
fn scan_one(path: &Path, signature: &Signature, magic: FileMagic) -> ScanOutcome {
    if !magic.matches_file(path) {
        return ScanOutcome::NotElf;
    }
    match boundary::contains_signature(path, signature) {
        Ok(true) => ScanOutcome::Infected,
        Ok(false) => ScanOutcome::Clean,
        Err(err) => ScanOutcome::Error(err.to_string()),
    }
}

/// Scan every candidate path on a fixed worker pool, reporting anomalies
/// to `sink`, and block until all work has drained.
///
/// The path list is frozen before submission; submission itself runs on
/// the calling thread and never blocks (unbounded queue). Completion order
/// across files is unspecified, but each path yields at most one report.
pub fn run_scan(
    paths: Vec<PathBuf>,
    signature: &Signature,
    options: &ScanOptions,
    sink: Arc<dyn ReportSink>,
) -> ScanSummary {
    let start = Instant::now();
    let threads = options.worker_threads.unwrap_or_else(num_cpus::get);
    let files_seen = paths.len() as u64;

    info!(
        files = files_seen,
        workers = threads,
        signature_len = signature.len(),
        "starting scan"
    );

    let pool = WorkerPool::new(threads);
    let counters = Arc::new(Counters::default());

    for path in paths {
        let signature = signature.clone();
        let sink = sink.clone();
        let counters = counters.clone();
        let magic = options.magic;

        pool.submit(move || {
            let outcome =
                catch_unwind(AssertUnwindSafe(|| scan_one(&path, &signature, magic)))
                    .unwrap_or_else(|_| {
                        ScanOutcome::Error("scan task panicked unexpectedly".into())
                    });

            match &outcome {
                ScanOutcome::NotElf => return,
                ScanOutcome::Clean => {
                    counters.clean.fetch_add(1, Ordering::Relaxed);
                    return;
                }
                ScanOutcome::Infected => {
                    counters.infected.fetch_add(1, Ordering::Relaxed);
                    debug!(path = %path.display(), "signature found");
                }
                ScanOutcome::Error(message) => {
                    counters.errors.fetch_add(1, Ordering::Relaxed);
                    debug!(path = %path.display(), %message, "scan failed");
                }
            }
            sink.report(&ScanReport { path, outcome });
        });
    }

    // Deterministic join: every queued task finishes before this returns.
    // catch_unwind above converts faults into Error outcomes, so the
    // pool-level trap only fires if outcome bookkeeping itself panics.
    let trapped = pool.shutdown_and_drain();

    let infected = counters.infected.load(Ordering::Relaxed);
    let errors = counters.errors.load(Ordering::Relaxed) + trapped;
    let clean = counters.clean.load(Ordering::Relaxed);
    let summary = ScanSummary {
        files_seen,
        elf_files: clean + infected,
        infected,
        errors,
        duration: start.elapsed(),
    };

    info!(
        infected = summary.infected,
        errors = summary.errors,
        elf_files = summary.elf_files,
        duration_ms = summary.duration.as_millis() as u64,
        "scan complete"
    );
    summary
}
