//! Describes the column layout of the source CSV and the columns derived during
//! ingestion.

use bon::Builder;

/// Default location of the Shunyi station dataset, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "Data/PRSA_Data_Shunyi_20130301-20170228.csv";

// Columns added (or overwritten) by ingestion.
pub const COL_DATETIME: &str = "datetime";
pub const COL_HOUR: &str = "hour";
pub const COL_MONTH: &str = "month";
pub const COL_YEAR: &str = "year";
pub const COL_DAY_OF_WEEK: &str = "dayofweek";
pub const COL_IS_WEEKEND: &str = "is_weekend";

// Columns added by aggregation.
pub const COL_DATE: &str = "date";
pub const COL_CATEGORY_SUFFIX: &str = "_category";

/// What to do with rows whose `year/month/day/hour` do not form a valid timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// Fail the whole load on the first invalid row.
    #[default]
    Strict,
    /// Drop invalid rows and keep loading.
    DropInvalid,
}

/// Names the columns the pipeline depends on.
///
/// The defaults match the PRSA Shunyi export: `PM2.5` as the concentration,
/// `TEMP`, `PRES` and `WSPM` as weather covariates, and `NA` marking missing
/// values.
///
/// ```rust
/// use pm25_dashboard::{DatasetSchema, TimestampPolicy};
///
/// let schema = DatasetSchema::builder()
///     .concentration("PM10")
///     .timestamp_policy(TimestampPolicy::DropInvalid)
///     .build();
/// assert_eq!(schema.concentration, "PM10");
/// assert_eq!(schema.weather, vec!["TEMP", "PRES", "WSPM"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct DatasetSchema {
    #[builder(into, default = String::from("year"))]
    pub year: String,
    #[builder(into, default = String::from("month"))]
    pub month: String,
    #[builder(into, default = String::from("day"))]
    pub day: String,
    #[builder(into, default = String::from("hour"))]
    pub hour: String,
    /// Pollutant concentration column.
    #[builder(into, default = String::from("PM2.5"))]
    pub concentration: String,
    /// Weather covariates used for the correlation matrix. Columns missing from
    /// the source are skipped.
    #[builder(default = vec!["TEMP".to_string(), "PRES".to_string(), "WSPM".to_string()])]
    pub weather: Vec<String>,
    /// Sentinel string that marks a missing value in any column.
    #[builder(into, default = String::from("NA"))]
    pub missing_marker: String,
    #[builder(default)]
    pub timestamp_policy: TimestampPolicy,
}

impl Default for DatasetSchema {
    fn default() -> Self {
        DatasetSchema::builder().build()
    }
}

impl DatasetSchema {
    /// Name of the per-row category column, e.g. `PM2.5_category`.
    pub fn category_column(&self) -> String {
        format!("{}{}", self.concentration, COL_CATEGORY_SUFFIX)
    }

    /// Concentration followed by the weather covariates, in configured order.
    pub fn correlation_columns(&self) -> Vec<&str> {
        std::iter::once(self.concentration.as_str())
            .chain(self.weather.iter().map(String::as_str))
            .collect()
    }

    /// The four source columns a timestamp is built from.
    pub(crate) fn timestamp_columns(&self) -> [&str; 4] {
        [
            self.year.as_str(),
            self.month.as_str(),
            self.day.as_str(),
            self.hour.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema() {
        let schema = DatasetSchema::default();
        assert_eq!(schema.concentration, "PM2.5");
        assert_eq!(schema.missing_marker, "NA");
        assert_eq!(schema.timestamp_policy, TimestampPolicy::Strict);
        assert_eq!(schema.category_column(), "PM2.5_category");
        assert_eq!(
            schema.correlation_columns(),
            vec!["PM2.5", "TEMP", "PRES", "WSPM"]
        );
        assert_eq!(schema.timestamp_columns(), ["year", "month", "day", "hour"]);
    }

    #[test]
    fn test_builder_overrides() {
        let schema = DatasetSchema::builder()
            .weather(vec!["TEMP".into()])
            .missing_marker("")
            .build();
        assert_eq!(schema.correlation_columns(), vec!["PM2.5", "TEMP"]);
        assert_eq!(schema.missing_marker, "");
    }
}
