use crate::aggregate::error::AggregateError;
use crate::types::category::Category;
use crate::types::schema::{DatasetSchema, COL_DATETIME, COL_HOUR};
use crate::types::views::{CategoryCounts, HourShare, HourlyDistribution, TrendPoint};
use crate::utils::{datetime_values, float_values, int_values};
use polars::prelude::DataFrame;

const HOURS_PER_DAY: usize = 24;

/// Per hour of day, the share (in percent) of each category among the
/// observations of that hour.
///
/// Observations without a concentration have no category and are not counted.
/// An hour with nothing to count yields all-zero percentages.
pub fn hourly_category_distribution(
    filtered: &DataFrame,
    schema: &DatasetSchema,
) -> Result<HourlyDistribution, AggregateError> {
    let mut counts = [CategoryCounts::default(); HOURS_PER_DAY];

    if filtered.height() > 0 {
        let hours = int_values(filtered, COL_HOUR)?;
        let concentrations = float_values(filtered, &schema.concentration)?;
        for (hour, value) in hours.into_iter().zip(concentrations) {
            let slot = hour
                .and_then(|h| usize::try_from(h).ok())
                .and_then(|h| counts.get_mut(h));
            if let (Some(slot), Some(category)) = (slot, Category::from_concentration(value)) {
                slot.increment(category);
            }
        }
    }

    let hours = counts
        .iter()
        .zip(0u32..)
        .map(|(count, hour)| HourShare {
            hour,
            observations: count.total(),
            percentages: count.percentages(),
        })
        .collect();
    Ok(HourlyDistribution { hours })
}

/// The raw concentration series of `filtered`, in row order.
pub fn hourly_series(
    filtered: &DataFrame,
    schema: &DatasetSchema,
) -> Result<Vec<TrendPoint>, AggregateError> {
    if filtered.height() == 0 {
        return Ok(Vec::new());
    }
    let timestamps = datetime_values(filtered, COL_DATETIME)?;
    let concentrations = float_values(filtered, &schema.concentration)?;
    Ok(timestamps
        .into_iter()
        .zip(concentrations)
        .filter_map(|(timestamp, concentration)| {
            Some(TrendPoint {
                timestamp: timestamp?,
                concentration,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_percentages_per_hour() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            COL_HOUR => [0i32, 0, 0, 0, 5, 5],
            "PM2.5" => [Some(10.0f64), Some(60.0), Some(70.0), None, Some(400.0), Some(301.0)]
        )?;
        let dist = hourly_category_distribution(&df, &DatasetSchema::default())?;
        assert_eq!(dist.hours.len(), 24);

        let midnight = dist.hour(0).unwrap();
        assert_eq!(midnight.observations, 3);
        assert!((midnight.percentage(Category::Good) - 100.0 / 3.0).abs() < 1e-9);
        assert!((midnight.percentage(Category::Moderate) - 200.0 / 3.0).abs() < 1e-9);

        let five = dist.hour(5).unwrap();
        assert_eq!(five.percentage(Category::Hazardous), 100.0);

        for share in &dist.hours {
            let sum: f64 = share.percentages.iter().sum();
            if share.observations > 0 {
                assert!((sum - 100.0).abs() < 1e-9, "hour {} sums to {}", share.hour, sum);
            } else {
                assert_eq!(share.percentages, [0.0; 6]);
            }
        }
        Ok(())
    }

    #[test]
    fn test_hour_with_only_missing_values() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            COL_HOUR => [7i32, 7],
            "PM2.5" => [None::<f64>, None]
        )?;
        let dist = hourly_category_distribution(&df, &DatasetSchema::default())?;
        let seven = dist.hour(7).unwrap();
        assert_eq!(seven.observations, 0);
        assert_eq!(seven.percentages, [0.0; 6]);
        Ok(())
    }

    #[test]
    fn test_empty_input_gives_24_zero_hours() -> Result<(), Box<dyn std::error::Error>> {
        let df = DataFrame::empty();
        let dist = hourly_category_distribution(&df, &DatasetSchema::default())?;
        assert_eq!(dist.hours.len(), 24);
        assert!(dist.hours.iter().all(|h| h.observations == 0));
        assert!(hourly_series(&df, &DatasetSchema::default())?.is_empty());
        Ok(())
    }
}
