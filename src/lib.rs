//! Granary: role catalog and import pipeline.
//!
//! This crate ingests content packages ("roles") described by metadata files
//! in an external version-controlled repository, validates and normalizes
//! that metadata, and reconciles it into a relational catalog that also
//! tracks tags, supported platforms, inter-role dependencies, and release
//! history. Every ingestion run is an auditable import task with its own
//! lifecycle and append-only diagnostic log.
//!
//! # Architecture
//!
//! Granary follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, APIs, etc.)
//!
//! # Modules
//!
//! - [`catalog`]: Persistent role catalog model and storage
//! - [`import`]: Import task lifecycle and the ingestion pipeline

pub mod catalog;
pub mod import;
pub mod text;
