//! `PostgreSQL` import task adapter built on Diesel.

mod models;
mod repository;
mod schema;

pub use repository::{ImportPgPool, PostgresImportTasks};
