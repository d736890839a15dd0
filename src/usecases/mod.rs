//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the tracker's core workflows. Each use case is a self-contained
//! business operation.
//!
//! Use cases:
//! - `FreebetLedger`: CRUD and extraction-outcome recording
//! - `StatsReporter`: real-time monthly aggregation and archival

pub mod ledger;
pub mod stats_reporter;

pub use ledger::FreebetLedger;
pub use stats_reporter::StatsReporter;
