//! The filter → aggregate pipeline, run in full for every selection.

use crate::aggregate::correlation::correlation_matrix;
use crate::aggregate::daily::{daily_aggregates, daily_resample};
use crate::aggregate::error::AggregateError;
use crate::aggregate::hourly::{hourly_category_distribution, hourly_series};
use crate::aggregate::monthly::monthly_trend;
use crate::error::DashboardError;
use crate::observations::cache::DatasetCache;
use crate::observations::table::ObservationTable;
use crate::types::filter::{ViewFilter, ViewMode};
use crate::types::views::{TrendPoint, Views};
use chrono::NaiveTime;
use log::debug;
use std::path::Path;

/// Computes every view for `filter` from an already loaded table.
///
/// Nothing is cached between calls; an empty selection produces empty views.
pub fn compute_views(
    table: &ObservationTable,
    filter: &ViewFilter,
) -> Result<Views, AggregateError> {
    let schema = table.schema();
    let filtered = table.filtered(&filter.years)?;

    let monthly_trend = monthly_trend(&filtered, schema)?;
    let daily = daily_aggregates(&daily_resample(&filtered, schema)?, schema)?;
    let trend = match filter.view_mode {
        ViewMode::DailyAverage => daily
            .iter()
            .map(|day| TrendPoint {
                timestamp: day.date.and_time(NaiveTime::default()),
                concentration: day.concentration,
            })
            .collect(),
        ViewMode::HourlyData => hourly_series(&filtered, schema)?,
    };
    let daily_category_counts = daily.iter().filter_map(|day| day.category).collect();
    let hourly_distribution = hourly_category_distribution(&filtered, schema)?;
    let correlation = correlation_matrix(&filtered, &schema.correlation_columns())?;

    debug!(
        "Computed views for {:?}: {} observations, {} months, {} days",
        filter.years,
        filtered.height(),
        monthly_trend.len(),
        daily.len()
    );

    Ok(Views {
        view_mode: filter.view_mode,
        observations: filtered.height(),
        monthly_trend,
        daily,
        trend,
        daily_category_counts,
        hourly_distribution,
        correlation,
    })
}

/// Loads `source` through `cache` (reading it only the first time) and computes the views.
pub fn run(
    cache: &DatasetCache,
    source: &Path,
    filter: &ViewFilter,
) -> Result<Views, DashboardError> {
    let table = cache.get_or_load(source)?;
    Ok(compute_views(&table, filter)?)
}
