//! SafeComms Storage - SQLite persistence layer.
//!
//! Records failures of the service's collaborators (transport,
//! secondary classifier, storage itself) for operator review. The match
//! engine never produces records here: it has no failure path on
//! well-formed input.
//!
//! # Example
//!
//! ```
//! use safecomms_storage::Database;
//!
//! let db = Database::in_memory().unwrap();
//! let report = db.report_error("classifier", "/check/text-ai", "model unavailable").unwrap();
//! assert!(report.is_open());
//! ```

mod database;
pub mod error;
pub mod models;
mod pool;
pub mod repository;
mod schema;

pub use database::Database;
pub use error::{Result, StorageError};
pub use models::{ErrorReport, NewErrorReport};
pub use pool::ConnectionPool;
pub use repository::ReportsRepo;
