//! Core library for keyscout.
//!
//! keyscout connects to a MySQL server using a `user[:password]@tcp(host[:port])/database`
//! DSN, lists databases and tables, and prints the column schema of every
//! table whose name suggests it stores API channels, providers or keys.
//!
//! # Security Guarantees
//! - Passwords are held in zeroizing containers and masked in all output
//! - All database operations are read-only metadata queries
//!
//! # Architecture
//! - [`security`]: DSN parsing and credential storage
//! - [`source`]: metadata source trait and the MySQL implementation
//! - [`matcher`]: suspect-table keyword heuristic
//! - [`inspector`]: the parse → connect → query sequence
//! - [`report`]: console rendering

pub mod error;
pub mod inspector;
pub mod logging;
pub mod matcher;
pub mod models;
pub mod report;
pub mod security;
pub mod source;

// Re-export commonly used types
pub use error::{KeyscoutError, Result};
pub use inspector::{inspect, run};
pub use logging::init_logging;
pub use models::{ColumnInfo, InspectionReport, SuspectTable};
pub use security::{Credentials, Dsn};
pub use source::MetadataSource;
