//! Plain result types produced by the aggregation pipeline.
//!
//! These are what the presentation layer renders; none of them hold a
//! reference back into the loaded table.

use crate::types::category::Category;
use crate::types::filter::ViewMode;
use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Mean concentration of one (year, month) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMean {
    pub year: i32,
    pub month: u32,
    /// `None` when every observation of the month lacks a concentration.
    pub concentration: Option<f64>,
}

/// One calendar day of the daily resample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    /// Daily mean concentration; `None` for a day without any value.
    pub concentration: Option<f64>,
    /// Category of the daily mean (not a vote over hourly categories).
    pub category: Option<Category>,
    /// Daily mean of every numeric source column, keyed by column name.
    pub means: BTreeMap<String, Option<f64>>,
}

impl DailyAggregate {
    /// True when the day had no observations at all.
    pub fn is_empty(&self) -> bool {
        self.means.values().all(Option::is_none)
    }
}

/// One point of the trend line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: NaiveDateTime,
    pub concentration: Option<f64>,
}

/// Number of items per category, indexed by [`Category::severity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryCounts {
    counts: [usize; 6],
}

impl CategoryCounts {
    pub fn increment(&mut self, category: Category) {
        self.counts[category.severity()] += 1;
    }

    pub fn get(&self, category: Category) -> usize {
        self.counts[category.severity()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// All six categories in ascending severity, including zero counts.
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Share of each category in percent. All zeros when nothing was counted.
    pub fn percentages(&self) -> [f64; 6] {
        let total = self.total();
        if total == 0 {
            return [0.0; 6];
        }
        self.counts.map(|count| count as f64 * 100.0 / total as f64)
    }
}

impl FromIterator<Category> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut counts = CategoryCounts::default();
        for category in iter {
            counts.increment(category);
        }
        counts
    }
}

impl Serialize for CategoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for (category, count) in self.iter() {
            map.serialize_entry(category.label(), &count)?;
        }
        map.end()
    }
}

/// Category breakdown for a single hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourShare {
    pub hour: u32,
    /// Observations of this hour that had a category.
    pub observations: usize,
    /// Percent per category in ascending severity; sums to 100, or all zero
    /// when `observations == 0`.
    pub percentages: [f64; 6],
}

impl HourShare {
    pub fn percentage(&self, category: Category) -> f64 {
        self.percentages[category.severity()]
    }
}

/// Hour-of-day (0-23) category distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyDistribution {
    pub hours: Vec<HourShare>,
}

impl HourlyDistribution {
    pub fn hour(&self, hour: u32) -> Option<&HourShare> {
        self.hours.get(hour as usize)
    }
}

/// Symmetric Pearson correlation matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` is the coefficient of `columns[i]` and `columns[j]`,
    /// `None` when fewer than two complete pairs exist or a side is constant.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Everything the dashboard shows for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Views {
    pub view_mode: ViewMode,
    /// Number of observations that passed the filter.
    pub observations: usize,
    pub monthly_trend: Vec<MonthlyMean>,
    pub daily: Vec<DailyAggregate>,
    /// Daily means or raw hourly values, depending on `view_mode`.
    pub trend: Vec<TrendPoint>,
    /// Days per category of the daily mean.
    pub daily_category_counts: CategoryCounts,
    pub hourly_distribution: HourlyDistribution,
    pub correlation: CorrelationMatrix,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_counts() {
        let counts: CategoryCounts = [Category::Good, Category::Good, Category::Hazardous]
            .into_iter()
            .collect();
        assert_eq!(counts.get(Category::Good), 2);
        assert_eq!(counts.get(Category::Moderate), 0);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.iter().count(), 6);

        let pct = counts.percentages();
        assert!((pct.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_counts_have_zero_percentages() {
        assert_eq!(CategoryCounts::default().percentages(), [0.0; 6]);
    }

    #[test]
    fn test_counts_serialize_all_labels() -> Result<(), Box<dyn std::error::Error>> {
        let counts: CategoryCounts = [Category::VeryUnhealthy].into_iter().collect();
        let json = serde_json::to_value(counts)?;
        assert_eq!(json["Very Unhealthy"], 1);
        assert_eq!(json["Good"], 0);
        assert_eq!(json.as_object().map(|o| o.len()), Some(6));
        Ok(())
    }
}
