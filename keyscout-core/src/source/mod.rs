//! Metadata sources.
//!
//! The inspector talks to the database through [`MetadataSource`], so the
//! query sequence can be exercised without a server.
//!
//! # Module Structure
//! - `mysql`: `sqlx` MySQL implementation (feature `mysql`)

#[cfg(feature = "mysql")]
pub mod mysql;

use crate::Result;
use crate::models::ColumnInfo;
use crate::security::Dsn;
use async_trait::async_trait;

/// Read-only access to a server's metadata catalog.
///
/// Methods take `&mut self`: a source wraps a single connection and the
/// queries run strictly one after another.
#[async_trait]
pub trait MetadataSource: Send {
    /// Lists every database visible to the credential.
    async fn list_databases(&mut self) -> Result<Vec<String>>;

    /// Lists the tables of the current database in alphabetical order.
    async fn list_tables(&mut self) -> Result<Vec<String>>;

    /// Lists the columns of `table` in the current database, in ordinal order.
    async fn list_columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>>;

    /// Releases the underlying connection. Calling it twice is a no-op.
    async fn close(&mut self) -> Result<()>;

    /// Name of the driver backing this source.
    fn driver(&self) -> &'static str;
}

/// Opens a metadata source for `dsn`.
///
/// # Errors
/// - [`KeyscoutError::DriverUnavailable`](crate::KeyscoutError::DriverUnavailable)
///   when the crate was built without the `mysql` feature
/// - [`KeyscoutError::Connection`](crate::KeyscoutError::Connection) when the
///   server cannot be reached or rejects the credential
#[cfg(feature = "mysql")]
pub async fn connect(dsn: &Dsn) -> Result<Box<dyn MetadataSource>> {
    let source = mysql::MySqlSource::connect(dsn).await?;
    Ok(Box::new(source))
}

/// Opens a metadata source for `dsn`.
///
/// This build has no database driver compiled in, so it always fails with
/// [`KeyscoutError::DriverUnavailable`](crate::KeyscoutError::DriverUnavailable).
#[cfg(not(feature = "mysql"))]
pub async fn connect(dsn: &Dsn) -> Result<Box<dyn MetadataSource>> {
    tracing::debug!("No driver compiled in for {}", dsn);
    Err(crate::KeyscoutError::DriverUnavailable { driver: "mysql" })
}
