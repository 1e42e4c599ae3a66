use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

// Two stacked panels on a black background, sent wave on top in
// yellow, received signal below in red.
pub fn render<P: AsRef<Path>>(
    sent: &[i32],
    received: &[i32],
    path: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(&path, (1000, 500)).into_drawing_area();
    root.fill(&BLACK)?;

    let (upper, lower) = root.split_vertically(250);
    draw_panel(&upper, "Sent Sine Wave Data", sent, &YELLOW)?;
    draw_panel(&lower, "Received Signal Data", received, &RED)?;

    root.present()?;
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<SVGBackend, Shift>,
    title: &str,
    samples: &[i32],
    color: &RGBColor,
) -> Result<(), Box<dyn std::error::Error>> {
    let (y_min, y_max) = y_bounds(samples);
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 18).into_font().color(&WHITE))
        .margin(10)
        .x_label_area_size(24)
        .y_label_area_size(56)
        .build_cartesian_2d(0..samples.len(), y_min..y_max)?;

    chart
        .configure_mesh()
        .axis_style(&WHITE)
        .bold_line_style(WHITE.mix(0.4))
        .light_line_style(WHITE.mix(0.1))
        .label_style(("sans-serif", 12).into_font().color(&WHITE))
        .draw()?;

    chart.draw_series(LineSeries::new(
        samples.iter().enumerate().map(|(i, &sample)| (i, sample)),
        color.stroke_width(3),
    ))?;
    Ok(())
}

fn y_bounds(samples: &[i32]) -> (i32, i32) {
    let min = samples.iter().copied().min().unwrap_or(-1);
    let max = samples.iter().copied().max().unwrap_or(1);
    // keep the range non-degenerate for flat or empty signals
    let pad = ((max as i64 - min as i64) / 10).max(1) as i32;
    (min.saturating_sub(pad), max.saturating_add(pad))
}
