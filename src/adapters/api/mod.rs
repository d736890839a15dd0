//! Remote Store Adapters - HTTP Access to the Hosted Ledger
//!
//! Retrying reqwest client plus the `FreebetStore` implementation over a
//! PostgREST-style REST endpoint.

pub mod client;
pub mod freebets;

pub use client::{RestClient, RestClientConfig};
pub use freebets::RemoteFreebetStore;
