//! Target input table reader.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::{debug, info};

use super::parse_ascii_table;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{RowError, RowErrorReason, Target};

/// Legacy column spellings accepted in target tables.
const TARGET_ALIASES: &[(&str, &str)] = &[
    ("id", "target_id"),
    ("exptime", "t_exp"),
    ("nvis", "num_visits"),
];

/// The outcome of loading a target table: syntactically valid targets plus
/// the rows that had to be skipped.
#[derive(Debug, Default)]
pub struct LoadedTargets {
    pub targets: Vec<Target>,
    pub errors: Vec<RowError>,
}

/// Read a target table from an ascii file.
///
/// Expected columns: `target_id ra dec t_exp [num_visits]` (legacy aliases
/// `ID`, `exptime`, `Nvis` accepted, all names case-insensitive). A missing
/// required column is fatal; a malformed row only excludes that row.
///
/// Range validation of coordinates and exposure times is the visit
/// calculator's job; this reader is purely syntactic.
pub fn read_target_table<P: AsRef<Path>>(path: P) -> PlannerResult<LoadedTargets> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| PlannerError::io(path, e))?;

    let table = parse_ascii_table(path, &content, TARGET_ALIASES)?;
    let id_col = table.require(path, "target_id")?;
    let ra_col = table.require(path, "ra")?;
    let dec_col = table.require(path, "dec")?;
    let t_exp_col = table.require(path, "t_exp")?;
    let num_visits_col = table.columns.get("num_visits").copied();
    if num_visits_col.is_none() {
        info!("no num_visits column found, assuming each target is observed once");
    }

    let n_columns = table.columns.len();
    let mut loaded = LoadedTargets::default();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for (line, fields) in &table.rows {
        let row_label = fields
            .first()
            .cloned()
            .unwrap_or_else(|| format!("line {line}"));
        let fail = |reason: RowErrorReason| RowError {
            target_id: row_label.clone(),
            line: Some(*line),
            reason,
        };

        if fields.len() != n_columns {
            loaded.errors.push(fail(RowErrorReason::Malformed(format!(
                "expected {n_columns} fields, found {}",
                fields.len()
            ))));
            continue;
        }

        let target_id = fields[id_col].clone();
        let (ra, dec, t_exp) = match parse_coordinates(fields, ra_col, dec_col, t_exp_col) {
            Ok(values) => values,
            Err(reason) => {
                loaded.errors.push(fail(reason));
                continue;
            }
        };

        if !seen_ids.insert(target_id.clone()) {
            loaded.errors.push(fail(RowErrorReason::DuplicateId));
            continue;
        }

        let num_visits = match num_visits_col {
            Some(col) => match fields[col].parse::<f64>() {
                Ok(n) if n >= 1.0 => n as u32,
                Ok(n) => {
                    debug!("target {target_id}: num_visits {n} is not positive, using 1");
                    1
                }
                Err(e) => {
                    loaded.errors.push(fail(RowErrorReason::Malformed(format!(
                        "num_visits '{}': {e}",
                        fields[col]
                    ))));
                    continue;
                }
            },
            None => 1,
        };

        loaded.targets.push(Target::new(target_id, ra, dec, t_exp, num_visits));
    }

    info!(
        "loaded {} targets from {} ({} rows skipped)",
        loaded.targets.len(),
        path.display(),
        loaded.errors.len()
    );
    Ok(loaded)
}

fn parse_coordinates(
    fields: &[String],
    ra_col: usize,
    dec_col: usize,
    t_exp_col: usize,
) -> Result<(f64, f64, f64), RowErrorReason> {
    let parse = |col: usize, name: &str| {
        fields[col]
            .parse::<f64>()
            .map_err(|e| RowErrorReason::Malformed(format!("{name} '{}': {e}", fields[col])))
    };
    Ok((
        parse(ra_col, "ra")?,
        parse(dec_col, "dec")?,
        parse(t_exp_col, "t_exp")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_table(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_canonical_columns() {
        let file = write_table(
            "# PI targets\n\
             target_id ra dec t_exp num_visits\n\
             m81 148.888 69.065 3600 2\n\
             m101 210.802 54.349 1800 1\n",
        );
        let loaded = read_target_table(file.path()).unwrap();
        assert_eq!(loaded.targets.len(), 2);
        assert!(loaded.errors.is_empty());
        assert_eq!(loaded.targets[0].target_id, "m81");
        assert_eq!(loaded.targets[0].num_visits, 2);
        assert!((loaded.targets[1].ra.value() - 210.802).abs() < 1e-9);
    }

    #[test]
    fn test_accepts_legacy_aliases() {
        let file = write_table(
            "ID ra dec exptime Nvis\n\
             a 10.0 20.0 600 3\n",
        );
        let loaded = read_target_table(file.path()).unwrap();
        assert_eq!(loaded.targets.len(), 1);
        assert_eq!(loaded.targets[0].num_visits, 3);
        assert!((loaded.targets[0].t_exp.value() - 600.0).abs() < 1e-12);
    }

    #[test]
    fn test_num_visits_defaults_to_one_when_column_absent() {
        let file = write_table(
            "target_id ra dec t_exp\n\
             a 10.0 20.0 600\n",
        );
        let loaded = read_target_table(file.path()).unwrap();
        assert_eq!(loaded.targets[0].num_visits, 1);
    }

    #[test]
    fn test_non_positive_num_visits_defaults_to_one() {
        let file = write_table(
            "target_id ra dec t_exp num_visits\n\
             a 10.0 20.0 600 0\n\
             b 11.0 20.0 600 -2\n",
        );
        let loaded = read_target_table(file.path()).unwrap();
        assert_eq!(loaded.targets.len(), 2);
        assert!(loaded.targets.iter().all(|t| t.num_visits == 1));
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let file = write_table("target_id ra t_exp\na 10.0 600\n");
        let err = read_target_table(file.path()).unwrap_err();
        assert!(matches!(err, PlannerError::TableFormat { .. }));
    }

    #[test]
    fn test_malformed_rows_are_skipped_not_fatal() {
        let file = write_table(
            "target_id ra dec t_exp\n\
             good 10.0 20.0 600\n\
             short 10.0 20.0\n\
             bad_ra abc 20.0 600\n",
        );
        let loaded = read_target_table(file.path()).unwrap();
        assert_eq!(loaded.targets.len(), 1);
        assert_eq!(loaded.errors.len(), 2);
        assert_eq!(loaded.errors[0].line, Some(3));
    }

    #[test]
    fn test_duplicate_ids_reported() {
        let file = write_table(
            "target_id ra dec t_exp\n\
             a 10.0 20.0 600\n\
             a 11.0 21.0 700\n",
        );
        let loaded = read_target_table(file.path()).unwrap();
        assert_eq!(loaded.targets.len(), 1);
        assert!(matches!(
            loaded.errors[0].reason,
            RowErrorReason::DuplicateId
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_target_table("/nonexistent/targets.dat").unwrap_err();
        match err {
            PlannerError::Io { path, .. } => {
                assert!(path.to_string_lossy().contains("targets.dat"))
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
