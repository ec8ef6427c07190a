//! Read-only metadata snapshots produced by an inspection run.

/// A column of a suspect table, in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Declared data type as reported by `INFORMATION_SCHEMA.COLUMNS.DATA_TYPE`
    pub data_type: String,
}

impl ColumnInfo {
    /// Creates a column entry.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A table whose name matched the suspect keywords, with its columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspectTable {
    /// Table name
    pub name: String,
    /// Columns in ordinal order
    pub columns: Vec<ColumnInfo>,
}

/// Everything gathered during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectionReport {
    /// Databases visible to the credential
    pub databases: Vec<String>,
    /// Database named in the DSN
    pub current_database: String,
    /// Tables in the current database, alphabetical
    pub tables: Vec<String>,
    /// Suspect tables with their column schemas
    pub suspects: Vec<SuspectTable>,
}
