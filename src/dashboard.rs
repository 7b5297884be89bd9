//! This module provides the main entry point of the crate: a [`Dashboard`] owns
//! the dataset cache and answers view requests for a filter selection.

use crate::error::DashboardError;
use crate::observations::cache::DatasetCache;
use crate::observations::table::ObservationTable;
use crate::pipeline;
use crate::types::filter::{ViewFilter, ViewMode, YearFilter};
use crate::types::schema::{DatasetSchema, DEFAULT_DATA_PATH};
use crate::types::views::Views;
use bon::bon;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loads observation tables (once per path) and computes views for them.
///
/// This is what a presentation layer holds on to between interactions: each
/// interaction calls [`Dashboard::views`] with the current selection, and only
/// the first call for a given path reads the file.
///
/// # Examples
///
/// ```no_run
/// # use pm25_dashboard::{Dashboard, DashboardError, ViewMode, YearFilter};
/// # fn main() -> Result<(), DashboardError> {
/// let dashboard = Dashboard::new();
///
/// let views = dashboard
///     .views()
///     .years(YearFilter::years([2014, 2015]))
///     .view_mode(ViewMode::HourlyData)
///     .call()?;
///
/// for month in &views.monthly_trend {
///     println!("{}-{:02}: {:?}", month.year, month.month, month.concentration);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Dashboard {
    cache: DatasetCache,
    default_source: PathBuf,
}

#[bon]
impl Dashboard {
    /// Creates a dashboard for the default Shunyi dataset layout, reading
    /// [`DEFAULT_DATA_PATH`] unless another source is passed.
    pub fn new() -> Self {
        Self::with_schema(DatasetSchema::default())
    }

    /// Creates a dashboard for a custom column layout.
    pub fn with_schema(schema: DatasetSchema) -> Self {
        Self {
            cache: DatasetCache::new(schema),
            default_source: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }

    /// Uses `source` when no explicit source is given to [`Dashboard::load`] or
    /// [`Dashboard::views`].
    pub fn with_default_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.default_source = source.into();
        self
    }

    pub fn schema(&self) -> &DatasetSchema {
        self.cache.schema()
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// Loads (or returns the cached) table for `source`, or for the default source.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Ingest`] if the file is missing, unreadable,
    /// lacks a required column, or contains a row without a valid timestamp
    /// under the strict timestamp policy.
    pub fn load(&self, source: Option<&Path>) -> Result<Arc<ObservationTable>, DashboardError> {
        let source = source.unwrap_or(&self.default_source);
        Ok(self.cache.get_or_load(source)?)
    }

    /// Computes all views for one selection.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.source(&Path)`: Optional. Dataset to use. Defaults to the dashboard's default source.
    /// * `.years(YearFilter)`: Optional. Years to keep. Defaults to [`YearFilter::All`].
    /// * `.view_mode(ViewMode)`: Optional. Sampling of the trend series.
    ///   Defaults to [`ViewMode::DailyAverage`].
    ///
    /// # Errors
    ///
    /// Loading errors as for [`Dashboard::load`]; [`DashboardError::Aggregate`]
    /// if a dataframe operation fails.
    #[builder]
    pub fn views(
        &self,
        source: Option<&Path>,
        years: Option<YearFilter>,
        view_mode: Option<ViewMode>,
    ) -> Result<Views, DashboardError> {
        let filter = ViewFilter::new(years.unwrap_or_default(), view_mode.unwrap_or_default());
        let source = source.unwrap_or(&self.default_source);
        pipeline::run(&self.cache, source, &filter)
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observations::error::IngestError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_views_builder() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "year,month,day,hour,PM2.5,TEMP,PRES,WSPM")?;
        writeln!(file, "2015,6,1,12,55,30,1000,2")?;
        writeln!(file, "2016,6,1,12,45,31,1001,3")?;
        file.flush()?;

        let dashboard = Dashboard::new().with_default_source(file.path());
        assert_eq!(dashboard.load(None)?.years().len(), 2);

        let views = dashboard.views().years(YearFilter::range(2016, 2017)).call()?;
        assert_eq!(views.observations, 1);
        assert_eq!(views.monthly_trend.len(), 1);
        assert_eq!(views.view_mode, ViewMode::DailyAverage);
        assert_eq!(dashboard.cache().len(), 1);
        Ok(())
    }

    #[test]
    fn test_missing_default_source() {
        let dashboard = Dashboard::new().with_default_source("/missing/pm25.csv");
        let result = dashboard.views().call();
        assert!(matches!(
            result,
            Err(DashboardError::Ingest(IngestError::SourceNotFound(_)))
        ));
    }
}
