//! Year-distribution chart
//!
//! Renders movie count by release year as an SVG line plot with a marker and
//! value label on every point and an annotation on the peak year.

use crate::output::stats::YearStats;
use crate::TopReelError;
use plotters::prelude::*;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (1200, 600);
const LINE_COLOR: RGBColor = RGBColor(0xe7, 0x4c, 0x3c);
const LABEL_COLOR: RGBColor = RGBColor(0x2c, 0x3e, 0x50);
const PEAK_COLOR: RGBColor = RGBColor(0x34, 0x98, 0xdb);
const SOURCE_COLOR: RGBColor = RGBColor(0x7f, 0x8c, 0x8d);

/// Narrowest year span the x axis is allowed to show
const MIN_YEAR_SPAN: i32 = 5;

fn chart_error<E: std::fmt::Display>(error: E) -> TopReelError {
    TopReelError::Chart(error.to_string())
}

/// X axis bounds: one year of padding on each side, widened for tiny spans
fn year_axis(earliest: i32, latest: i32) -> (i32, i32) {
    let (mut low, mut high) = (earliest - 1, latest + 1);
    if high - low < MIN_YEAR_SPAN {
        low -= 2;
        high += 2;
    }
    (low, high)
}

/// Renders the year-distribution chart to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Chart written
/// * `Err(TopReelError::Chart)` - No valid years to plot, or drawing failed
pub fn render_year_chart(stats: &YearStats, output_path: &Path) -> Result<(), TopReelError> {
    let (earliest, latest, peak_year) =
        match (stats.earliest_year, stats.latest_year, stats.peak_year) {
            (Some(earliest), Some(latest), Some(peak)) => (earliest, latest, peak),
            _ => return Err(TopReelError::Chart("no valid years to plot".to_string())),
        };

    let (x_min, x_max) = year_axis(earliest, latest);
    let y_max = stats.peak_count + 3;
    let points: Vec<(i32, u64)> = stats.counts.iter().map(|(&y, &c)| (y, c)).collect();

    let root = SVGBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Douban Top 250: movies per release year", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x_min..x_max, 0u64..y_max)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Movies")
        .x_labels(15)
        .x_label_formatter(&|year| year.to_string())
        .light_line_style(WHITE.mix(0.0))
        .bold_line_style(BLACK.mix(0.1))
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(LineSeries::new(
            points.iter().copied(),
            LINE_COLOR.stroke_width(2),
        ))
        .map_err(chart_error)?;

    chart
        .draw_series(points.iter().map(|&(year, count)| {
            EmptyElement::at((year, count))
                + Circle::new((0, 0), 5, LINE_COLOR.filled())
                + Text::new(
                    count.to_string(),
                    (-4, -22),
                    ("sans-serif", 12).into_font().color(&LABEL_COLOR),
                )
        }))
        .map_err(chart_error)?;

    let peak_label = format!("Peak: {} ({} movies)", peak_year, stats.peak_count);
    chart
        .draw_series(std::iter::once(
            EmptyElement::at((peak_year, stats.peak_count))
                + PathElement::new(vec![(0, -26), (0, -60)], PEAK_COLOR.stroke_width(2))
                + Text::new(
                    peak_label,
                    (-60, -80),
                    ("sans-serif", 15).into_font().color(&PEAK_COLOR),
                ),
        ))
        .map_err(chart_error)?;

    let (width, height) = CHART_SIZE;
    root.draw(&Text::new(
        "Source: Douban Movie Top 250",
        (width as i32 / 2 - 90, height as i32 - 18),
        ("sans-serif", 12).into_font().color(&SOURCE_COLOR),
    ))
    .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}
