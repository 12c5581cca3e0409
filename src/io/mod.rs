//! Whitespace-table file I/O.
//!
//! All tables are plain ascii: `#`-prefixed comment lines are skipped, the
//! first content line names the columns, and rows are whitespace-separated.
//! Column names are matched case-insensitively and a handful of legacy
//! aliases from older proposal tools are accepted.

pub mod capacity_table;
pub mod output;
pub mod target_table;

pub use capacity_table::read_capacity_table;
pub use output::{read_result_table, write_result_table, write_summary};
pub use target_table::{read_target_table, LoadedTargets};

use std::collections::HashMap;
use std::path::Path;

use crate::error::{PlannerError, PlannerResult};

/// A parsed ascii table: header names (normalized to lowercase) mapped to
/// their column position, plus the data rows with their 1-based line numbers.
pub(crate) struct AsciiTable {
    pub columns: HashMap<String, usize>,
    pub rows: Vec<(usize, Vec<String>)>,
}

/// Split a table file into header and rows.
///
/// Aliases are applied to header names after lowercasing, so legacy column
/// spellings resolve to their canonical names.
pub(crate) fn parse_ascii_table(
    path: &Path,
    content: &str,
    aliases: &[(&str, &str)],
) -> PlannerResult<AsciiTable> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

    let (_, header) = lines
        .next()
        .ok_or_else(|| PlannerError::table_format(path, "file contains no header line"))?;

    let mut columns = HashMap::new();
    for (pos, raw) in header.split_whitespace().enumerate() {
        let mut name = raw.to_ascii_lowercase();
        if let Some((_, canonical)) = aliases.iter().find(|(alias, _)| *alias == name) {
            name = canonical.to_string();
        }
        if columns.insert(name.clone(), pos).is_some() {
            return Err(PlannerError::table_format(
                path,
                format!("duplicate column '{name}'"),
            ));
        }
    }

    let rows = lines
        .map(|(line, l)| (line, l.split_whitespace().map(str::to_string).collect()))
        .collect();

    Ok(AsciiTable { columns, rows })
}

impl AsciiTable {
    /// Position of a required column.
    pub fn require(&self, path: &Path, name: &str) -> PlannerResult<usize> {
        self.columns.get(name).copied().ok_or_else(|| {
            PlannerError::table_format(path, format!("required column '{name}' not found"))
        })
    }
}
