//! Overview plot: demanded visits vs. available queue time over LST.
//!
//! One PNG per run. Capacity appears as line curves (all / dark / grey+dark
//! queue time), demand as filled per-bin areas split by track class. The x
//! axis runs over the trimester's shifted LST frame; labels are folded back
//! to clock hours.

use std::error::Error;
use std::path::Path;

use anyhow::{anyhow, Result};
use log::info;
use plotters::prelude::*;

use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::models::CapacityTable;

const SINGLE_COLOR: RGBColor = BLUE;
const EAST_COLOR: RGBColor = RED;
const WEST_COLOR: RGBColor = GREEN;
const GREY_CURVE: RGBColor = RGBColor(128, 128, 128);

/// Render the overview histogram for a run.
pub fn render_overview_plot(
    path: &Path,
    table: &CapacityTable,
    config: &PlannerConfig,
    overwrite: bool,
) -> Result<()> {
    if path.exists() && !overwrite {
        return Err(PlannerError::OutputExists(path.to_path_buf()).into());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| PlannerError::io(parent, e))?;
        }
    }

    draw(path, table, config).map_err(|e| anyhow!("failed to render {}: {e}", path.display()))?;
    info!("overview plot written to {}", path.display());
    Ok(())
}

fn draw(path: &Path, table: &CapacityTable, config: &PlannerConfig) -> Result<(), Box<dyn Error>> {
    let offset = config.trimester.lst_offset().value();
    let x_range = (offset - 0.5)..(offset + 24.5);

    let peak = table
        .rows
        .iter()
        .flat_map(|r| [r.all, r.dark + r.gray, r.east_tracks, r.west_tracks, r.single_tracks])
        .fold(0.0f64, f64::max);
    let y_max = (peak * 1.15).max(70.0);

    let hetdex_note = if config.include_hetdex {
        "subtracting HETDEX allocations"
    } else {
        "not including HETDEX fields"
    };
    let caption = format!(
        "PI target visits for {}-{} ({hetdex_note})",
        config.year, config.trimester
    );

    let root = BitMapBackend::new(path, (1300, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("LST [h]")
        .y_desc("N visits (including weather/etc)")
        .x_label_formatter(&|v| {
            let clock = if *v > 24.0 { *v - 24.0 } else { *v };
            format!("{clock:.0}")
        })
        .y_labels(10)
        .draw()?;

    // Demand areas first so the capacity curves stay readable on top.
    let series = [
        ("Single tracks (N/S)", SINGLE_COLOR.mix(0.8), bin_points(table, |r| r.single_tracks)),
        ("East tracks", EAST_COLOR.mix(0.3), bin_points(table, |r| r.east_tracks)),
        ("West tracks", WEST_COLOR.mix(0.3), bin_points(table, |r| r.west_tracks)),
    ];
    for (label, color, points) in series {
        chart
            .draw_series(AreaSeries::new(points, 0.0, color))?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 12, y + 4)], color.filled()));
    }

    let curves = [
        ("All (bright+gray+dark)", BLACK, 3, bin_points(table, |r| r.all)),
        ("Gray (gray+dark)", GREY_CURVE, 2, bin_points(table, |r| r.dark + r.gray)),
        ("Dark", BLACK, 1, bin_points(table, |r| r.dark)),
    ];
    for (label, color, width, points) in curves {
        let style = color.stroke_width(width);
        chart
            .draw_series(LineSeries::new(points, style))?
            .label(label)
            .legend(move |(x, y)| {
                PathElement::new([(x, y), (x + 12, y)], color.stroke_width(width))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn bin_points(
    table: &CapacityTable,
    value: fn(&crate::models::CapacityRow) -> f64,
) -> Vec<(f64, f64)> {
    table.rows.iter().map(|r| (r.lst, value(r))).collect()
}
