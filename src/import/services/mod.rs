//! Orchestration services for the import pipeline.

mod diagnostics;
mod fetcher;
mod importer;
mod reconcile;
mod sweep;

pub use diagnostics::DiagnosticRecorder;
pub use fetcher::{FetchFailure, MetadataFetcher};
pub use importer::{ImportError, ImportOutcome, RoleImportService};
pub use reconcile::{SetDelta, plan_set};
pub use sweep::{STUCK_IMPORT_MAX_AGE_SECS, STUCK_IMPORT_MESSAGE, StuckImportSweeper};
