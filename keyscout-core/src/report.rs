//! Plain-text rendering of an [`InspectionReport`].
//!
//! The layout is meant for people reading a terminal; it is not a stable
//! machine-readable format.

use crate::models::InspectionReport;
use std::io::{self, Write};

/// Writes the report as indented, line-oriented text.
///
/// The suspect section is left out entirely when no table matched.
pub fn render<W: Write>(report: &InspectionReport, out: &mut W) -> io::Result<()> {
    writeln!(out, "databases:")?;
    for database in &report.databases {
        writeln!(out, "  - {}", database)?;
    }

    writeln!(out)?;
    writeln!(out, "current_database: {}", report.current_database)?;
    writeln!(out, "tables:")?;
    for table in &report.tables {
        writeln!(out, "  - {}", table)?;
    }

    if report.suspects.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "suspect_tables:")?;
    for suspect in &report.suspects {
        writeln!(out, "  - {}", suspect.name)?;
        for column in &suspect.columns {
            writeln!(out, "       {} ({})", column.name, column.data_type)?;
        }
    }

    Ok(())
}

/// Renders the report to a `String`.
pub fn render_to_string(report: &InspectionReport) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail
    let _ = render(report, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}
