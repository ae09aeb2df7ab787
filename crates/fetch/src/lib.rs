//! `partcheck-fetch` — catalog transport and fetch orchestration.
//!
//! The transport is a black box to the engine: it returns an HTTP status
//! plus the raw body, failing only when the network call itself cannot
//! complete. The orchestrator owns deduplication, bounded parallelism,
//! and per-batch memoization.

mod client;
mod orchestrator;

pub use client::{CatalogClient, FetchError};
pub use orchestrator::{FetchConfig, Orchestrator};
