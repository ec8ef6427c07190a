//! Schema inspection: databases, tables, then columns of suspect tables.
//!
//! All queries run strictly in sequence over one connection. The connection
//! is closed before returning, whether inspection succeeded or not.

use crate::Result;
use crate::matcher::suspect_tables;
use crate::models::{InspectionReport, SuspectTable};
use crate::security::Dsn;
use crate::source::{self, MetadataSource};

/// Runs the three metadata queries against an open source.
///
/// # Errors
/// Returns the first query error; nothing after it is attempted.
pub async fn inspect(
    source: &mut dyn MetadataSource,
    current_database: &str,
) -> Result<InspectionReport> {
    tracing::debug!("Listing databases");
    let databases = source.list_databases().await?;
    tracing::info!("Found {} databases", databases.len());

    tracing::debug!("Listing tables of {}", current_database);
    let tables = source.list_tables().await?;
    tracing::info!("Found {} tables in {}", tables.len(), current_database);

    let mut suspects = Vec::new();
    for name in suspect_tables(&tables) {
        tracing::debug!("Listing columns of suspect table {}", name);
        let columns = source.list_columns(name).await?;
        suspects.push(SuspectTable {
            name: name.to_string(),
            columns,
        });
    }
    tracing::info!("{} suspect tables", suspects.len());

    Ok(InspectionReport {
        databases,
        current_database: current_database.to_string(),
        tables,
        suspects,
    })
}

/// Inspects `source` and closes it afterwards, on success and failure alike.
///
/// An inspection error takes precedence over a close error.
pub async fn inspect_and_close(
    mut source: Box<dyn MetadataSource>,
    current_database: &str,
) -> Result<InspectionReport> {
    let outcome = inspect(source.as_mut(), current_database).await;

    match (outcome, source.close().await) {
        (Ok(report), Ok(())) => Ok(report),
        (Ok(_), Err(close_error)) => Err(close_error),
        (Err(e), close_result) => {
            if let Err(close_error) = close_result {
                tracing::warn!("Failed to close {} connection: {}", source.driver(), close_error);
            }
            Err(e)
        }
    }
}

/// Connects with `dsn`, inspects, and releases the connection.
///
/// # Errors
/// - [`KeyscoutError::DriverUnavailable`](crate::KeyscoutError::DriverUnavailable) without a compiled-in driver
/// - [`KeyscoutError::Connection`](crate::KeyscoutError::Connection) if connecting fails
/// - [`KeyscoutError::Query`](crate::KeyscoutError::Query) if a metadata query fails
pub async fn run(dsn: &Dsn) -> Result<InspectionReport> {
    let source = source::connect(dsn).await?;
    inspect_and_close(source, &dsn.database).await
}
