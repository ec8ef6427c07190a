//! Suspect-table heuristic.
//!
//! A table is "suspect" when its name contains one of a fixed set of
//! keywords that hint at API channels, providers or stored credentials.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Keywords matched case-insensitively anywhere in a table name.
pub const SUSPECT_KEYWORDS: [&str; 6] = ["api", "center", "channel", "provider", "key", "credential"];

fn suspect_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!("(?i)({})", SUSPECT_KEYWORDS.join("|")))
            .expect("Invalid suspect table pattern")
    })
}

/// Returns true when `table` contains any suspect keyword, ignoring case.
///
/// ```rust
/// use keyscout_core::matcher::is_suspect;
///
/// assert!(is_suspect("ApiKeys"));
/// assert!(!is_suspect("orders"));
/// ```
pub fn is_suspect(table: &str) -> bool {
    suspect_pattern().is_match(table)
}

/// Filters `tables` down to the suspect ones, sorted and de-duplicated.
pub fn suspect_tables<'a, I, S>(tables: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + ?Sized + 'a,
{
    tables
        .into_iter()
        .map(|t| t.as_ref())
        .filter(|t| is_suspect(t))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
