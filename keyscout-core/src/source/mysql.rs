//! MySQL metadata source.
//!
//! # Security Features
//! - The session is switched to `READ ONLY` right after connecting
//! - Table names are bound as parameters, never interpolated into SQL
//! - The password never appears in `Debug` output or error context

use super::MetadataSource;
use crate::Result;
use crate::error::KeyscoutError;
use crate::models::ColumnInfo;
use crate::security::Dsn;
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection, Executor, Row};
use std::io;

// Names are cast to CHAR to avoid VARBINARY decoding issues on MySQL 8.0+
const LIST_DATABASES_QUERY: &str = r#"
    SELECT CAST(SCHEMA_NAME AS CHAR) AS SCHEMA_NAME
    FROM INFORMATION_SCHEMA.SCHEMATA
    ORDER BY SCHEMA_NAME
"#;

const LIST_TABLES_QUERY: &str = r#"
    SELECT CAST(TABLE_NAME AS CHAR) AS TABLE_NAME
    FROM INFORMATION_SCHEMA.TABLES
    WHERE TABLE_SCHEMA = DATABASE()
    ORDER BY TABLE_NAME
"#;

const LIST_COLUMNS_QUERY: &str = r#"
    SELECT
        CAST(COLUMN_NAME AS CHAR) AS COLUMN_NAME,
        CAST(DATA_TYPE AS CHAR) AS DATA_TYPE
    FROM INFORMATION_SCHEMA.COLUMNS
    WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
    ORDER BY ORDINAL_POSITION
"#;

/// Single-connection MySQL source.
pub struct MySqlSource {
    conn: Option<MySqlConnection>,
    address: String,
}

impl std::fmt::Debug for MySqlSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlSource")
            .field("address", &self.address)
            .field("open", &self.conn.is_some())
            .finish_non_exhaustive()
    }
}

/// Builds connect options field by field from the parsed DSN.
pub fn connect_options(dsn: &Dsn) -> MySqlConnectOptions {
    let options = MySqlConnectOptions::new()
        .host(&dsn.host)
        .port(dsn.port)
        .username(dsn.user())
        .database(&dsn.database);

    if dsn.credentials.has_password() {
        options.password(dsn.password())
    } else {
        options
    }
}

impl MySqlSource {
    /// Connects to the server named by `dsn` and selects its database.
    ///
    /// # Errors
    /// Returns [`KeyscoutError::Connection`] if the server is unreachable,
    /// rejects the credential, or refuses the read-only session.
    pub async fn connect(dsn: &Dsn) -> Result<Self> {
        tracing::info!("Connecting to {}", dsn);

        let mut conn = MySqlConnection::connect_with(&connect_options(dsn))
            .await
            .map_err(|e| {
                KeyscoutError::connection_failed(format!("connect to {}", dsn.address()), e)
            })?;

        if let Err(e) = conn.execute("SET SESSION TRANSACTION READ ONLY").await {
            let _ = conn.close().await;
            return Err(KeyscoutError::connection_failed(
                "switch session to read-only",
                e,
            ));
        }

        tracing::debug!("Connected to {} (read-only session)", dsn.address());

        Ok(Self {
            conn: Some(conn),
            address: dsn.address(),
        })
    }

    fn conn(&mut self) -> Result<&mut MySqlConnection> {
        self.conn.as_mut().ok_or_else(|| {
            KeyscoutError::connection_failed(
                format!("connection to {} already closed", self.address),
                io::Error::from(io::ErrorKind::NotConnected),
            )
        })
    }
}

#[async_trait]
impl MetadataSource for MySqlSource {
    async fn list_databases(&mut self) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(LIST_DATABASES_QUERY)
            .fetch_all(self.conn()?)
            .await
            .map_err(|e| KeyscoutError::query_failed("list databases", e))
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(LIST_TABLES_QUERY)
            .fetch_all(self.conn()?)
            .await
            .map_err(|e| KeyscoutError::query_failed("list tables", e))
    }

    async fn list_columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>> {
        let rows = sqlx::query(LIST_COLUMNS_QUERY)
            .bind(table)
            .fetch_all(self.conn()?)
            .await
            .map_err(|e| KeyscoutError::query_failed(format!("list columns of {}", table), e))?;

        rows.iter()
            .map(|row| {
                let name: String = row
                    .try_get("COLUMN_NAME")
                    .map_err(|e| KeyscoutError::query_failed("decode COLUMN_NAME", e))?;
                let data_type: String = row
                    .try_get("DATA_TYPE")
                    .map_err(|e| KeyscoutError::query_failed("decode DATA_TYPE", e))?;
                Ok(ColumnInfo::new(name, data_type))
            })
            .collect()
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            tracing::debug!("Closing connection to {}", self.address);
            conn.close()
                .await
                .map_err(|e| KeyscoutError::connection_failed("close connection", e))?;
        }
        Ok(())
    }

    fn driver(&self) -> &'static str {
        "mysql"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_options_from_dsn() {
        let dsn = Dsn::parse("root:secret@tcp(db.internal:3307)/myapp").unwrap();
        let options = connect_options(&dsn);

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 3307);
        assert_eq!(options.get_username(), "root");
        assert_eq!(options.get_database(), Some("myapp"));
    }

    #[test]
    fn test_metadata_queries_are_ordered_and_scoped() {
        for query in [LIST_DATABASES_QUERY, LIST_TABLES_QUERY, LIST_COLUMNS_QUERY] {
            assert!(query.contains("INFORMATION_SCHEMA."), "{}", query);
            assert!(query.contains("AS CHAR"), "{}", query);
        }
        assert!(LIST_DATABASES_QUERY.contains("FROM INFORMATION_SCHEMA.SCHEMATA"));
        assert!(LIST_DATABASES_QUERY.trim_end().ends_with("ORDER BY SCHEMA_NAME"));
        assert!(LIST_TABLES_QUERY.contains("TABLE_SCHEMA = DATABASE()"));
        assert!(LIST_TABLES_QUERY.trim_end().ends_with("ORDER BY TABLE_NAME"));
        assert!(LIST_COLUMNS_QUERY.contains("TABLE_NAME = ?"));
        assert!(LIST_COLUMNS_QUERY.trim_end().ends_with("ORDER BY ORDINAL_POSITION"));
    }

    #[tokio::test]
    async fn test_closed_source_reports_connection_error() {
        let mut source = MySqlSource {
            conn: None,
            address: "db:3306".to_string(),
        };

        let error = source.list_databases().await.unwrap_err();
        assert!(matches!(error, KeyscoutError::Connection { .. }));
        assert_eq!(
            error.to_string(),
            "Database connection failed: connection to db:3306 already closed"
        );
        assert_eq!(error.exit_code(), 1);

        // Closing an already-closed source is a no-op
        source.close().await.unwrap();
        assert!(matches!(
            source.list_columns("api_keys").await,
            Err(KeyscoutError::Connection { .. })
        ));
    }

    #[tokio::test]
    async fn test_mysql_connect_refused_is_connection_error() {
        // Port 1 on loopback is never a MySQL server
        let dsn = Dsn::parse("invalid:topsecret@tcp(127.0.0.1:1)/invalid").unwrap();

        let error = MySqlSource::connect(&dsn).await.unwrap_err();
        assert!(matches!(error, KeyscoutError::Connection { .. }));
        assert_eq!(error.exit_code(), 1);
        assert!(!format!("{:?}", error).contains("topsecret"));
    }
}
