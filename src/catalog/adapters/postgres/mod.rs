//! `PostgreSQL` catalog adapter built on Diesel.

mod models;
mod repository;
mod schema;

pub use repository::{CatalogPgPool, PostgresCatalog};
