//! The selection handed to the pipeline by the presentation layer.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Which years of observations are kept.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum YearFilter {
    /// No restriction.
    #[default]
    All,
    /// Only the listed years. An empty set selects nothing.
    Years(BTreeSet<i32>),
    /// Inclusive range of years.
    Range { start: i32, end: i32 },
}

impl YearFilter {
    pub fn years(years: impl IntoIterator<Item = i32>) -> Self {
        YearFilter::Years(years.into_iter().collect())
    }

    pub fn range(start: i32, end: i32) -> Self {
        YearFilter::Range { start, end }
    }

    /// Whether an observation from `year` passes the filter.
    pub fn contains(&self, year: i32) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Years(years) => years.contains(&year),
            YearFilter::Range { start, end } => (*start..=*end).contains(&year),
        }
    }
}

/// How the trend series is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ViewMode {
    /// One point per calendar day, the daily mean.
    #[default]
    DailyAverage,
    /// The raw hourly observations.
    HourlyData,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::DailyAverage => write!(f, "Daily Average"),
            ViewMode::HourlyData => write!(f, "Hourly Data"),
        }
    }
}

/// Current user selection: the only input the pipeline takes from the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewFilter {
    pub years: YearFilter,
    pub view_mode: ViewMode,
}

impl ViewFilter {
    pub fn new(years: YearFilter, view_mode: ViewMode) -> Self {
        Self { years, view_mode }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_filter_contains() {
        assert!(YearFilter::All.contains(1999));

        let set = YearFilter::years([2014, 2016]);
        assert!(set.contains(2014));
        assert!(!set.contains(2015));

        let range = YearFilter::range(2014, 2015);
        assert!(range.contains(2014));
        assert!(range.contains(2015));
        assert!(!range.contains(2016));

        assert!(!YearFilter::years([]).contains(2014));
    }

    #[test]
    fn test_view_mode_display() {
        assert_eq!(ViewMode::DailyAverage.to_string(), "Daily Average");
        assert_eq!(ViewMode::HourlyData.to_string(), "Hourly Data");
    }
}
