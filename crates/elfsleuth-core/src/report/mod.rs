//! Scan outcomes and the serialized report sink.
//!
//! Workers produce exactly one [`ScanOutcome`] per candidate path. Only the
//! anomalous outcomes (`Infected`, `Error`) are handed to the [`ReportSink`];
//! clean and non-ELF files are counted but never printed, matching the
//! tool's purpose of surfacing infections rather than inventory.
//!
//! The sink is the only mutable resource shared across workers, so each
//! implementation serializes its writes internally. The critical section is
//! a single line write — it is never held across file I/O.

use std::path::PathBuf;

use parking_lot::Mutex;

/// The verdict for a single candidate path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Leading bytes did not match the ELF magic; the file was not scanned.
    NotElf,
    /// ELF file scanned front to back, signature absent.
    Clean,
    /// The signature occurs somewhere in the file's content.
    Infected,
    /// The file could not be scanned (open/read failure, or a trapped
    /// task fault). Scanning of other files is unaffected.
    Error(String),
}

/// One per-file verdict, paired with the path it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub path: PathBuf,
    pub outcome: ScanOutcome,
}

/// Destination for anomalous scan outcomes.
///
/// Implementations must be safe to call from many worker threads at once;
/// lines from concurrent reports must never interleave.
pub trait ReportSink: Send + Sync {
    fn report(&self, report: &ScanReport);
}

/// Report sink writing to the terminal.
///
/// Infections go to stdout, per-file errors to stderr. One mutex guards
/// both streams so a burst of mixed reports still produces whole lines.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    lock: Mutex<()>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for ConsoleSink {
    fn report(&self, report: &ScanReport) {
        let _guard = self.lock.lock();
        match &report.outcome {
            ScanOutcome::Infected => {
                println!("!!! File {} is infected!", report.path.display());
            }
            ScanOutcome::Error(message) => {
                eprintln!("Error scanning {}: {message}", report.path.display());
            }
            ScanOutcome::NotElf | ScanOutcome::Clean => {}
        }
    }
}

/// Report sink that records everything in memory.
///
/// Used by the integration tests and by embedders that post-process
/// results instead of printing them.
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<ScanReport>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy out everything reported so far.
    pub fn snapshot(&self) -> Vec<ScanReport> {
        self.reports.lock().clone()
    }

    /// Paths reported with the given outcome, sorted for stable assertions.
    pub fn paths_with(&self, outcome: &ScanOutcome) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .reports
            .lock()
            .iter()
            .filter(|r| r.outcome == *outcome)
            .map(|r| r.path.clone())
            .collect();
        paths.sort();
        paths
    }
}

impl ReportSink for MemorySink {
    fn report(&self, report: &ScanReport) {
        self.reports.lock().push(report.clone());
    }
}
