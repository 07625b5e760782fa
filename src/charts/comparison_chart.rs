use chrono::{DateTime, Duration, Utc};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

use crate::error::{ProcessingError, Result};
use crate::models::{Component, ComparisonRecord};
use crate::utils::LinearFit;

const ROYAL_BLUE: RGBColor = RGBColor(65, 105, 225);
const DARK_ORANGE: RGBColor = RGBColor(255, 140, 0);
const SEA_GREEN: RGBColor = RGBColor(46, 139, 87);
const PURPLE: RGBColor = RGBColor(128, 0, 128);

const PANEL_HEIGHT: u32 = 450;
const FIGURE_WIDTH: u32 = 1800;

fn component_color(component: Component) -> RGBColor {
    match component {
        Component::Ghi => ROYAL_BLUE,
        Component::Dhi => DARK_ORANGE,
        Component::Dni => SEA_GREEN,
    }
}

fn chart_err<E: std::fmt::Display>(err: E) -> ProcessingError {
    ProcessingError::Chart(err.to_string())
}

/// Render the multi-panel comparison figure for one location: per
/// component a bias-over-time scatter and a measured-vs-modeled scatter
/// with the fitted and 1:1 lines, plus a cloud panel pair when cloud
/// cover is available.
pub fn render_comparison(
    title: &str,
    records: &[ComparisonRecord],
    fits: &[(Component, Option<LinearFit>)],
    output_path: &Path,
) -> Result<()> {
    if records.is_empty() {
        return Err(ProcessingError::MissingData(
            "no comparison records to plot".to_string(),
        ));
    }

    let has_cloud = records.iter().any(|r| r.cloud_cover.is_some());
    let rows: usize = if has_cloud { 4 } else { 3 };
    let height = PANEL_HEIGHT * rows as u32;

    let root = BitMapBackend::new(output_path, (FIGURE_WIDTH, height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let root = root
        .titled(
            &format!("Comparison of CAMS Model vs. Ground Measurements in {title}"),
            ("sans-serif", 30).into_font(),
        )
        .map_err(chart_err)?;

    let areas = root.split_evenly((rows, 2));

    for (index, &component) in Component::ALL.iter().enumerate() {
        let fit = fits
            .iter()
            .find(|(c, _)| *c == component)
            .and_then(|(_, fit)| *fit);
        draw_bias_panel(&areas[2 * index], component, records)?;
        draw_scatter_panel(&areas[2 * index + 1], component, records, fit)?;
    }

    if has_cloud {
        draw_cloud_bias_panel(&areas[6], records)?;
        draw_ratio_panel(&areas[7], records)?;
    }

    root.present().map_err(chart_err)?;
    Ok(())
}

fn time_range(records: &[ComparisonRecord]) -> (DateTime<Utc>, DateTime<Utc>) {
    let min = records.iter().map(|r| r.time).min();
    let max = records.iter().map(|r| r.time).max();
    match (min, max) {
        (Some(min), Some(max)) if max > min => (min, max),
        // degenerate single-timestamp data still needs a non-empty axis
        (Some(min), _) => (min, min + Duration::minutes(10)),
        _ => {
            let epoch = DateTime::<Utc>::UNIX_EPOCH;
            (epoch, epoch + Duration::minutes(10))
        }
    }
}

fn bias_limit(biases: impl Iterator<Item = f64>) -> f64 {
    let max_abs = biases.map(f64::abs).fold(0.0f64, f64::max);
    (max_abs * 1.1).max(1.0)
}

fn draw_bias_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    component: Component,
    records: &[ComparisonRecord],
) -> Result<()> {
    let color = component_color(component);
    let (t_min, t_max) = time_range(records);
    let limit = bias_limit(records.iter().map(|r| r.bias(component)));

    let mut chart = ChartBuilder::on(area)
        .caption(format!("{component} Bias"), ("sans-serif", 22).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(t_min..t_max, -limit..limit)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(format!("Bias {component} [W/m²]"))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new([(t_min, 0.0), (t_max, 0.0)], &BLACK))
        .map_err(chart_err)?;

    chart
        .draw_series(
            records
                .iter()
                .map(|r| Circle::new((r.time, r.bias(component)), 2, color.mix(0.5).filled())),
        )
        .map_err(chart_err)?
        .label(format!("{component} Bias (CAMS - Ground)"))
        .legend(move |(x, y)| Circle::new((x + 5, y), 4, color.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_err)?;

    Ok(())
}

fn draw_scatter_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    component: Component,
    records: &[ComparisonRecord],
    fit: Option<LinearFit>,
) -> Result<()> {
    let color = component_color(component);
    let max_val = records
        .iter()
        .flat_map(|r| [r.ground(component), r.model(component)])
        .fold(0.0f64, f64::max)
        .max(1.0)
        * 1.05;

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("{component} Comparison (n={})", records.len()),
            ("sans-serif", 22).into_font(),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..max_val, 0.0..max_val)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(format!("Measured {component} (Ground) [W/m²]"))
        .y_desc(format!("Calculated {component} (CAMS) [W/m²]"))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(records.iter().map(|r| {
            Circle::new(
                (r.ground(component), r.model(component)),
                2,
                color.mix(0.7).filled(),
            )
        }))
        .map_err(chart_err)?;

    if let Some(fit) = fit {
        chart
            .draw_series(LineSeries::new(
                [
                    (0.0, fit.intercept),
                    (max_val, fit.slope * max_val + fit.intercept),
                ],
                RED.stroke_width(2),
            ))
            .map_err(chart_err)?
            .label(format!(
                "Fit: y={:.2}x + {:.1} (R²={:.3})",
                fit.slope, fit.intercept, fit.r_squared
            ))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 12, y)], RED.stroke_width(2)));
    }

    chart
        .draw_series(LineSeries::new([(0.0, 0.0), (max_val, max_val)], &BLACK))
        .map_err(chart_err)?
        .label("1:1 Line")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 12, y)], BLACK));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_err)?;

    Ok(())
}

fn draw_cloud_bias_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    records: &[ComparisonRecord],
) -> Result<()> {
    let points: Vec<(f64, f64)> = records
        .iter()
        .filter_map(|r| r.cloud_cover.map(|cloud| (cloud, r.bias(Component::Ghi))))
        .collect();
    let limit = bias_limit(points.iter().map(|(_, bias)| *bias));

    let mut chart = ChartBuilder::on(area)
        .caption("GHI Bias vs. Cloud Coverage", ("sans-serif", 22).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..105.0, -limit..limit)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Cloud Coverage (from CAMS, %)")
        .y_desc("GHI Bias [W/m²]")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new([(0.0, 0.0), (105.0, 0.0)], &BLACK))
        .map_err(chart_err)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(cloud, bias)| Circle::new((cloud, bias), 3, ROYAL_BLUE.mix(0.3).filled())),
        )
        .map_err(chart_err)?;

    Ok(())
}

fn draw_ratio_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    records: &[ComparisonRecord],
) -> Result<()> {
    let (t_min, t_max) = time_range(records);
    let points: Vec<(DateTime<Utc>, f64)> = records
        .iter()
        .filter_map(|r| r.ghi_dhi_ratio().map(|ratio| (r.time, ratio)))
        .collect();
    let max_ratio = points
        .iter()
        .map(|(_, ratio)| *ratio)
        .fold(0.0f64, f64::max)
        .max(1.0)
        * 1.05;

    let mut chart = ChartBuilder::on(area)
        .caption(
            "GHI to DHI Ratio from Ground Measurements",
            ("sans-serif", 22).into_font(),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(t_min..t_max, 0.0..max_ratio)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Ratio GHI / DHI")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(time, ratio)| Circle::new((time, ratio), 2, PURPLE.mix(0.5).filled())),
        )
        .map_err(chart_err)?;

    Ok(())
}
