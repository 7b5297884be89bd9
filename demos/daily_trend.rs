//! demos/daily_trend.rs
//!
//! Loads the Shunyi dataset, resamples the selected years to daily means and
//! plots the daily PM2.5 trend in the browser.
//!
//! To run this demo:
//! cargo run --example daily_trend --features plotting -- [PATH] [YEAR...]

use std::error::Error;
use std::path::PathBuf;

use plotlars::{Axis, Legend, Line, Plot, Rgb, Text, TimeSeriesPlot};
use pm25_dashboard::{daily_resample, Dashboard, YearFilter, DEFAULT_DATA_PATH};
use polars::prelude::*;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let source = args.next().map_or_else(|| PathBuf::from(DEFAULT_DATA_PATH), PathBuf::from);
    let years: Vec<i32> = args.map(|y| y.parse()).collect::<Result<_, _>>()?;
    let filter = if years.is_empty() {
        YearFilter::All
    } else {
        YearFilter::years(years)
    };

    // 1. Load through the dashboard cache
    let dashboard = Dashboard::new();
    let table = dashboard.load(Some(&source))?;

    // 2. Filter and resample to one row per calendar day
    let filtered = table.filtered(&filter)?;
    let daily = daily_resample(&filtered, table.schema())?;
    println!("{} days selected", daily.height());

    // 3. Plot
    plot_daily(&daily, &table.schema().concentration);
    Ok(())
}

fn plot_daily(data: &DataFrame, concentration: &str) {
    TimeSeriesPlot::builder()
        .data(data)
        .x("date")
        .y(concentration)
        .size(6)
        .colors(vec![Rgb(200, 60, 40)])
        .lines(vec![Line::Solid])
        .plot_title(Text::from("Daily PM2.5").font("Arial").size(18))
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("date")
        .y_title(Text::from("µg/m³").color(Rgb(0, 0, 0)))
        .y_axis(
            &Axis::new()
                .value_color(Rgb(0, 0, 0))
                .show_grid(false)
                .zero_line_color(Rgb(0, 0, 0)),
        )
        .build()
        .plot();
}
