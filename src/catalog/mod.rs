//! Persistent role catalog for Granary.
//!
//! The catalog models the durable side of the system: roles with their
//! descriptive metadata, the shared tag and platform entities, per-role
//! release history, and the namespace profiles mirrored from the upstream
//! host. The import pipeline reconciles into this model; the catalog itself
//! never reaches back out to the repository host. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
