//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `FreebetStore` / `StatsArchive`: ledger and stats persistence tiers
//! - `Clock`: injected time source for cache expiry and stats

pub mod clock;
pub mod repository;

pub use clock::{Clock, ManualClock, SystemClock};
pub use repository::{FreebetStore, StatsArchive, StorageTier, Stored};
