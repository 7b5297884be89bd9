use crate::aggregate::error::AggregateError;
use crate::types::category::Category;
use crate::types::schema::{DatasetSchema, COL_DATE, COL_DATETIME};
use crate::types::views::DailyAggregate;
use crate::utils::{date_values, float_values, numeric_columns};
use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;
use std::collections::BTreeMap;

/// Resamples `filtered` to one row per calendar day.
///
/// Rows are bucketed by the date of their `datetime` column and every numeric
/// column is averaged, ignoring nulls. Every day from the first to the last
/// observed day gets a row; a day without observations has null means, which
/// keeps "no data" apart from "zero pollution".
///
/// The concentration category is derived from the daily mean and stored in
/// `<concentration>_category`.
///
/// Returns an empty frame when `filtered` is empty.
pub fn daily_resample(
    filtered: &DataFrame,
    schema: &DatasetSchema,
) -> Result<DataFrame, AggregateError> {
    if filtered.height() == 0 {
        return Ok(DataFrame::empty());
    }

    let numeric = numeric_columns(filtered);
    let means: Vec<Expr> = numeric
        .iter()
        .map(|name| col(name.as_str()).cast(DataType::Float64).mean())
        .collect();

    let buckets = filtered
        .clone()
        .lazy()
        .group_by([col(COL_DATETIME).cast(DataType::Date).alias(COL_DATE)])
        .agg(means)
        .collect()?;

    let calendar = calendar_frame(&buckets)?;
    let mut daily = calendar
        .lazy()
        .join(
            buckets.lazy(),
            [col(COL_DATE)],
            [col(COL_DATE)],
            JoinArgs::new(JoinType::Left),
        )
        .sort([COL_DATE], SortMultipleOptions::default())
        .collect()?;

    // Aggregate first, categorise second.
    let categories: Vec<Option<&str>> = float_values(&daily, &schema.concentration)?
        .into_iter()
        .map(|mean| Category::from_concentration(mean).map(Category::label))
        .collect();
    daily.with_column(Series::new(schema.category_column().into(), categories))?;

    debug!(
        "Resampled {} observations into {} days",
        filtered.height(),
        daily.height()
    );
    Ok(daily)
}

/// Every date between the earliest and latest bucket, inclusive.
fn calendar_frame(buckets: &DataFrame) -> Result<DataFrame, AggregateError> {
    let dates: Vec<NaiveDate> = date_values(buckets, COL_DATE)?
        .into_iter()
        .flatten()
        .collect();
    let days: Vec<NaiveDate> = match (dates.iter().min(), dates.iter().max()) {
        (Some(first), Some(last)) => first.iter_days().take_while(|d| d <= last).collect(),
        _ => Vec::new(),
    };
    let column = DateChunked::from_naive_date(COL_DATE.into(), days)
        .into_series()
        .into_column();
    Ok(DataFrame::new(vec![column])?)
}

/// Typed rows of a frame produced by [`daily_resample`].
pub fn daily_aggregates(
    daily: &DataFrame,
    schema: &DatasetSchema,
) -> Result<Vec<DailyAggregate>, AggregateError> {
    if daily.height() == 0 {
        return Ok(Vec::new());
    }

    let dates = date_values(daily, COL_DATE)?;
    let concentration = float_values(daily, &schema.concentration)?;
    let columns = numeric_columns(daily)
        .into_iter()
        .map(|name| float_values(daily, &name).map(|values| (name, values)))
        .collect::<Result<Vec<_>, _>>()?;

    let rows = dates
        .into_iter()
        .enumerate()
        .filter_map(|(i, date)| {
            let means: BTreeMap<String, Option<f64>> = columns
                .iter()
                .map(|(name, values)| (name.clone(), values[i]))
                .collect();
            Some(DailyAggregate {
                date: date?,
                concentration: concentration[i],
                category: Category::from_concentration(concentration[i]),
                means,
            })
        })
        .collect();
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2013, 3, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    fn frame(stamps: &[NaiveDateTime], pm: &[Option<f64>], temp: &[Option<f64>]) -> DataFrame {
        let datetime = DatetimeChunked::from_naive_datetime(
            COL_DATETIME.into(),
            stamps.iter().copied(),
            TimeUnit::Milliseconds,
        )
        .into_series()
        .into_column();
        DataFrame::new(vec![
            datetime,
            Column::new("PM2.5".into(), pm),
            Column::new("TEMP".into(), temp),
            Column::new("station".into(), vec!["Shunyi"; stamps.len()]),
        ])
        .unwrap()
    }

    #[test]
    fn test_category_of_daily_mean() -> Result<(), Box<dyn std::error::Error>> {
        let df = frame(
            &[at(1, 0), at(1, 1), at(1, 2), at(1, 3)],
            &[Some(10.0), Some(20.0), None, Some(40.0)],
            &[Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
        );
        let schema = DatasetSchema::default();
        let rows = daily_aggregates(&daily_resample(&df, &schema)?, &schema)?;

        assert_eq!(rows.len(), 1);
        let mean = rows[0].concentration.unwrap();
        assert!((mean - 70.0 / 3.0).abs() < 1e-9);
        assert_eq!(rows[0].category, Some(Category::Good));
        assert_eq!(rows[0].means.get("TEMP"), Some(&Some(2.5)));
        assert!(!rows[0].means.contains_key("station"));
        Ok(())
    }

    #[test]
    fn test_empty_days_are_emitted_as_absent() -> Result<(), Box<dyn std::error::Error>> {
        let df = frame(
            &[at(3, 5), at(1, 0), at(1, 12)],
            &[Some(0.0), Some(120.0), Some(180.0)],
            &[None, None, None],
        );
        let schema = DatasetSchema::default();
        let daily = daily_resample(&df, &schema)?;
        let rows = daily_aggregates(&daily, &schema)?;

        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![at(1, 0).date(), at(2, 0).date(), at(3, 0).date()]);

        assert_eq!(rows[0].concentration, Some(150.0));
        assert_eq!(rows[0].category, Some(Category::UnhealthyForSensitive));
        // 2 March: no observations.
        assert_eq!(rows[1].concentration, None);
        assert_eq!(rows[1].category, None);
        assert!(rows[1].is_empty());
        // 3 March: a real zero.
        assert_eq!(rows[2].concentration, Some(0.0));
        assert_eq!(rows[2].category, Some(Category::Good));

        let labels: Vec<Option<&str>> =
            daily.column("PM2.5_category")?.str()?.into_iter().collect();
        assert_eq!(labels, vec![Some("Unhealthy for Sensitive"), None, Some("Good")]);
        Ok(())
    }

    #[test]
    fn test_empty_input() -> Result<(), Box<dyn std::error::Error>> {
        let df = frame(&[], &[], &[]);
        let schema = DatasetSchema::default();
        let daily = daily_resample(&df, &schema)?;
        assert_eq!(daily.height(), 0);
        assert!(daily_aggregates(&daily, &schema)?.is_empty());
        Ok(())
    }
}
