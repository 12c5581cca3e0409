//! Trimester capacity table reader.

use std::fs;
use std::path::Path;

use log::info;

use super::parse_ascii_table;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{CapacityRow, CapacityTable};

const CAPACITY_ALIASES: &[(&str, &str)] = &[("visits_hetdex", "hetdex")];

/// Read the per-LST capacity table for one trimester.
///
/// Expected columns: `lst all dark gray hetdex` (the legacy `LST` /
/// `visits_HETDEX` spellings are accepted). Capacity tables are operational
/// configuration, so unlike target tables any malformed row is fatal.
pub fn read_capacity_table<P: AsRef<Path>>(path: P) -> PlannerResult<CapacityTable> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| PlannerError::io(path, e))?;

    let table = parse_ascii_table(path, &content, CAPACITY_ALIASES)?;
    let columns = [
        table.require(path, "lst")?,
        table.require(path, "all")?,
        table.require(path, "dark")?,
        table.require(path, "gray")?,
        table.require(path, "hetdex")?,
    ];
    let n_columns = table.columns.len();

    let mut rows = Vec::with_capacity(table.rows.len());
    for (line, fields) in &table.rows {
        if fields.len() != n_columns {
            return Err(PlannerError::table_format(
                path,
                format!(
                    "line {line}: expected {n_columns} fields, found {}",
                    fields.len()
                ),
            ));
        }
        let mut values = [0.0f64; 5];
        for (slot, &col) in values.iter_mut().zip(&columns) {
            *slot = fields[col].parse::<f64>().map_err(|e| {
                PlannerError::table_format(path, format!("line {line}: '{}': {e}", fields[col]))
            })?;
        }
        rows.push(CapacityRow::new(
            values[0], values[1], values[2], values[3], values[4],
        ));
    }

    if rows.is_empty() {
        return Err(PlannerError::table_format(path, "no capacity rows"));
    }

    info!("loaded {} LST bins from {}", rows.len(), path.display());
    Ok(CapacityTable { rows })
}
