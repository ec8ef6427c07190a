//! Error types for keyscout.
//!
//! Every variant renders without the DSN password. Parse failures describe
//! which part of the connection string was wrong, never its contents beyond
//! the non-secret fields.

use thiserror::Error;

/// Exit status for configuration problems and runtime failures.
pub const EXIT_FAILURE: u8 = 1;

/// Exit status when the binary was built without a database driver.
pub const EXIT_DRIVER_UNAVAILABLE: u8 = 2;

/// Main error type for keyscout operations.
#[derive(Debug, Error)]
pub enum KeyscoutError {
    /// No connection string was supplied (flag and `MYSQL_DSN` both empty)
    #[error("MYSQL_DSN is required")]
    MissingDsn,

    /// The connection string does not have the `user[:password]@tcp(host[:port])/database` shape
    #[error("parse MYSQL_DSN failed: {reason}")]
    MalformedDsn { reason: String },

    /// The binary was compiled without support for the requested driver
    #[error("missing dependency: {driver} driver (rebuild with `--features {driver}`)")]
    DriverUnavailable { driver: &'static str },

    /// Database connection failed
    #[error("Database connection failed: {context}")]
    Connection {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A metadata query failed
    #[error("Query failed: {context}")]
    Query {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration or bootstrap error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Writing the report failed
    #[error("Failed to write report")]
    Output {
        #[from]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results with KeyscoutError
pub type Result<T> = std::result::Result<T, KeyscoutError>;

impl KeyscoutError {
    /// Creates a malformed-DSN error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDsn {
            reason: reason.into(),
        }
    }

    /// Creates a connection error with context
    pub fn connection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a query error with context
    pub fn query_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Query {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Process exit status for this error.
    ///
    /// Only a missing driver gets its own status; missing or malformed
    /// configuration and every runtime failure exit with 1.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::DriverUnavailable { .. } => EXIT_DRIVER_UNAVAILABLE,
            Self::MissingDsn
            | Self::MalformedDsn { .. }
            | Self::Configuration { .. }
            | Self::Connection { .. }
            | Self::Query { .. }
            | Self::Output { .. } => EXIT_FAILURE,
        }
    }
}
