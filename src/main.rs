//! Terminal front end: parses a selection, computes the views and prints them.

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use pm25_dashboard::{Category, Dashboard, ViewMode, Views, YearFilter, DEFAULT_DATA_PATH};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pm25-dashboard")]
#[command(about = "Summarise hourly PM2.5 observations of a monitoring station", long_about = None)]
struct Cli {
    /// CSV file with the station observations
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Comma separated years to keep, e.g. 2014,2015
    #[arg(short, long, value_delimiter = ',', conflicts_with_all = ["from", "to"])]
    years: Option<Vec<i32>>,

    /// First year of an inclusive range
    #[arg(long)]
    from: Option<i32>,

    /// Last year of an inclusive range
    #[arg(long)]
    to: Option<i32>,

    /// Sampling of the trend series
    #[arg(long, value_enum, default_value_t = View::Daily)]
    view: View,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    Daily,
    Hourly,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
}

impl Cli {
    fn year_filter(&self, available: impl Fn() -> Option<(i32, i32)>) -> Result<YearFilter> {
        if let Some(years) = &self.years {
            return Ok(YearFilter::years(years.iter().copied()));
        }
        if self.from.is_none() && self.to.is_none() {
            return Ok(YearFilter::All);
        }
        let Some((first, last)) = available() else {
            return Ok(YearFilter::All);
        };
        let start = self.from.unwrap_or(first);
        let end = self.to.unwrap_or(last);
        if start > end {
            bail!("--from {start} is after --to {end}");
        }
        Ok(YearFilter::range(start, end))
    }

    fn view_mode(&self) -> ViewMode {
        match self.view {
            View::Daily => ViewMode::DailyAverage,
            View::Hourly => ViewMode::HourlyData,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let dashboard = Dashboard::new().with_default_source(&cli.data);
    let table = dashboard.load(None)?;
    if table.is_empty() {
        warn!("{:?} contains no observations", table.source());
    }
    info!(
        "{} observations covering years {:?} from {:?}",
        table.height(),
        table.years(),
        table.source()
    );

    let years = cli.year_filter(|| {
        let first = table.years().first().copied()?;
        let last = table.years().last().copied()?;
        Some((first, last))
    })?;
    let views = dashboard
        .views()
        .years(years)
        .view_mode(cli.view_mode())
        .call()?;

    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&views)?),
        Format::Table => print_tables(&views),
    }
    Ok(())
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn print_tables(views: &Views) {
    println!("{} observations selected, trend: {}", views.observations, views.view_mode);

    println!("\nMonthly mean");
    for month in &views.monthly_trend {
        println!(
            "  {}-{:02}  {:>8}",
            month.year,
            month.month,
            fmt_value(month.concentration)
        );
    }

    println!("\nDays per category");
    let percentages = views.daily_category_counts.percentages();
    for (category, count) in views.daily_category_counts.iter() {
        println!(
            "  {:<32} {:>5}  {:>6.2}%",
            category.label(),
            count,
            percentages[category.severity()]
        );
    }

    println!("\nCategory share per hour (%)");
    let header: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!("{:>8}", c.severity()))
        .collect();
    println!("  hour {}", header.join(""));
    for hour in &views.hourly_distribution.hours {
        let cells: Vec<String> = hour.percentages.iter().map(|p| format!("{p:>8.2}")).collect();
        println!("  {:>4} {}", hour.hour, cells.join(""));
    }
    for category in Category::ALL {
        println!("  {} = {}", category.severity(), category.label());
    }

    println!("\nCorrelation");
    let matrix = &views.correlation;
    println!(
        "  {:>8} {}",
        "",
        matrix
            .columns
            .iter()
            .map(|c| format!("{c:>8}"))
            .collect::<Vec<_>>()
            .join(" ")
    );
    for (name, row) in matrix.columns.iter().zip(&matrix.values) {
        let cells: Vec<String> = row.iter().map(|r| format!("{:>8}", fmt_value(*r))).collect();
        println!("  {:>8} {}", name, cells.join(" "));
    }

    if let (Some(first), Some(last)) = (views.trend.first(), views.trend.last()) {
        println!(
            "\nTrend: {} points from {} to {}",
            views.trend.len(),
            first.timestamp,
            last.timestamp
        );
    }
}
