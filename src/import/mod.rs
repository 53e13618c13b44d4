//! Import pipeline for Granary.
//!
//! This module implements the ingestion pipeline: fetching role metadata
//! from the repository host, validating and normalizing it, reconciling the
//! catalog's set-valued relations, and finalizing the import task state
//! machine. Every run appends to an ordered, immutable diagnostic log that
//! observers can poll before the run ends. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Manifest parsing and normalization in [`manifest`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod manifest;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
