//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP clients and servers, file I/O, metrics).
//! Each sub-module groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `api`: remote ledger tier over a PostgREST-style REST endpoint
//! - `persistence`: local ledger tier and stats archive on plain files
//! - `cache` / `tiered`: TTL read cache and the two-tier composite
//! - `http`: inbound JSON API
//! - `metrics`: Prometheus metrics export and health checks

pub mod api;
pub mod cache;
pub mod http;
pub mod metrics;
pub mod persistence;
pub mod tiered;
