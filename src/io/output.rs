//! Writers for the enriched result table and the JSON run summary.
//!
//! The result table is written as an aligned whitespace table that this
//! module can also read back: re-reading a written table reproduces the
//! computed columns exactly. Absent LST windows are stored as `-99` with a
//! visit count of 0, matching the operational convention.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::info;

use super::parse_ascii_table;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{LstWindow, Target, TargetResult, MISSING_LST};

const RESULT_COLUMNS: &[&str] = &[
    "target_id",
    "ra",
    "dec",
    "t_exp",
    "num_visits",
    "lst_1_start",
    "lst_1_stop",
    "track_1_visits",
    "lst_2_start",
    "lst_2_stop",
    "track_2_visits",
    "insufficient_coverage",
];

fn ensure_writable(path: &Path, overwrite: bool) -> PlannerResult<()> {
    if path.exists() && !overwrite {
        return Err(PlannerError::OutputExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| PlannerError::io(parent, e))?;
        }
    }
    Ok(())
}

/// Write the enriched target table.
pub fn write_result_table<P: AsRef<Path>>(
    path: P,
    results: &[TargetResult],
    overwrite: bool,
) -> PlannerResult<()> {
    let path = path.as_ref();
    ensure_writable(path, overwrite)?;

    let mut out = String::new();
    let id_width = results
        .iter()
        .map(|r| r.target.target_id.len())
        .chain([RESULT_COLUMNS[0].len()])
        .max()
        .unwrap_or(12);

    out.push_str(&format!(
        "{:<id_width$} {:>10} {:>9} {:>10} {:>10} {:>12} {:>12} {:>14} {:>12} {:>12} {:>14} {:>21}\n",
        RESULT_COLUMNS[0],
        RESULT_COLUMNS[1],
        RESULT_COLUMNS[2],
        RESULT_COLUMNS[3],
        RESULT_COLUMNS[4],
        RESULT_COLUMNS[5],
        RESULT_COLUMNS[6],
        RESULT_COLUMNS[7],
        RESULT_COLUMNS[8],
        RESULT_COLUMNS[9],
        RESULT_COLUMNS[10],
        RESULT_COLUMNS[11],
    ));

    for result in results {
        let t = &result.target;
        let (s1, e1, v1) = window_fields(&result.track1);
        let (s2, e2, v2) = window_fields(&result.track2);
        out.push_str(&format!(
            "{:<id_width$} {:>10.4} {:>9.4} {:>10.1} {:>10} {:>12.6} {:>12.6} {:>14} {:>12.6} {:>12.6} {:>14} {:>21}\n",
            t.target_id,
            t.ra.value(),
            t.dec.value(),
            t.t_exp.value(),
            t.num_visits,
            s1,
            e1,
            v1,
            s2,
            e2,
            v2,
            result.insufficient_coverage,
        ));
    }

    fs::write(path, out).map_err(|e| PlannerError::io(path, e))?;
    info!("result table written to {}", path.display());
    Ok(())
}

fn window_fields(window: &Option<LstWindow>) -> (f64, f64, u32) {
    match window {
        Some(w) => (w.start.value(), w.stop.value(), w.visits),
        None => (MISSING_LST, MISSING_LST, 0),
    }
}

/// Read a previously written result table back into memory.
pub fn read_result_table<P: AsRef<Path>>(path: P) -> PlannerResult<Vec<TargetResult>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| PlannerError::io(path, e))?;
    let table = parse_ascii_table(path, &content, &[])?;

    let mut cols = [0usize; 12];
    for (slot, name) in cols.iter_mut().zip(RESULT_COLUMNS) {
        *slot = table.require(path, name)?;
    }

    let mut results = Vec::with_capacity(table.rows.len());
    for (line, fields) in &table.rows {
        if fields.len() != RESULT_COLUMNS.len() {
            return Err(PlannerError::table_format(
                path,
                format!(
                    "line {line}: expected {} fields, found {}",
                    RESULT_COLUMNS.len(),
                    fields.len()
                ),
            ));
        }
        let number = |col: usize| -> PlannerResult<f64> {
            fields[cols[col]].parse::<f64>().map_err(|e| {
                PlannerError::table_format(path, format!("line {line}: '{}': {e}", fields[cols[col]]))
            })
        };
        let target = Target::new(
            fields[cols[0]].clone(),
            number(1)?,
            number(2)?,
            number(3)?,
            number(4)? as u32,
        );
        let track1 = read_window(number(5)?, number(6)?, number(7)? as u32);
        let track2 = read_window(number(8)?, number(9)?, number(10)? as u32);
        let insufficient_coverage = match fields[cols[11]].as_str() {
            "true" | "True" => true,
            "false" | "False" => false,
            other => {
                return Err(PlannerError::table_format(
                    path,
                    format!("line {line}: invalid flag '{other}'"),
                ))
            }
        };
        results.push(TargetResult {
            target,
            track1,
            track2,
            insufficient_coverage,
        });
    }
    Ok(results)
}

fn read_window(start: f64, stop: f64, visits: u32) -> Option<LstWindow> {
    if visits == 0 || start <= MISSING_LST {
        return None;
    }
    Some(LstWindow {
        start: start.into(),
        stop: stop.into(),
        visits,
    })
}

/// Write a JSON document (the run summary) next to the result table.
pub fn write_summary<P: AsRef<Path>, T: serde::Serialize>(
    path: P,
    value: &T,
    overwrite: bool,
) -> PlannerResult<()> {
    let path = path.as_ref();
    ensure_writable(path, overwrite)?;
    let mut file = fs::File::create(path).map_err(|e| PlannerError::io(path, e))?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| PlannerError::Configuration(format!("summary serialization failed: {e}")))?;
    file.write_all(json.as_bytes())
        .and_then(|_| file.write_all(b"\n"))
        .map_err(|e| PlannerError::io(path, e))?;
    info!("run summary written to {}", path.display());
    Ok(())
}
