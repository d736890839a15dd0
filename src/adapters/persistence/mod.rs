//! Persistence Adapters - Local File Storage Tier
//!
//! Implements the repository ports with plain files: the ledger as an
//! atomic-write JSON document and the monthly statistics archive as an
//! append-only JSONL log. No database dependency — lightweight and
//! crash-recoverable.

pub mod local;
pub mod stats_log;

pub use local::LocalFreebetStore;
pub use stats_log::StatsLog;
