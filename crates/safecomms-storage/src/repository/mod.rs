//! Database repositories for each table.

pub mod reports;

pub use reports::ReportsRepo;
