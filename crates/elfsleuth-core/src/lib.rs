//! elfsleuth core — concurrent ELF signature scanning.
//!
//! This crate contains all scanning logic with zero CLI dependencies.
//! It is designed to be reusable across different frontends (CLI, TUI,
//! service wrappers).
//!
//! # Modules
//!
//! - [`signature`] — Loading and holding the byte signature to search for.
//! - [`classify`] — ELF magic-number sniffing.
//! - [`scanner`] — Per-file boundary-safe scanning and scan orchestration.
//! - [`pool`] — Fixed-size worker pool draining a FIFO task queue.
//! - [`walk`] — Candidate file enumeration over a directory tree.
//! - [`report`] — Scan outcomes and the serialized report sink.

pub mod classify;
pub mod pool;
pub mod report;
pub mod scanner;
pub mod signature;
pub mod walk;
