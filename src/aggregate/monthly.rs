use crate::aggregate::error::AggregateError;
use crate::types::schema::{DatasetSchema, COL_MONTH, COL_YEAR};
use crate::types::views::MonthlyMean;
use crate::utils::{float_values, int_values};
use polars::prelude::*;

/// Mean concentration per (year, month) present in `filtered`, ascending.
///
/// Months without observations are absent from the output rather than zero.
pub fn monthly_trend(
    filtered: &DataFrame,
    schema: &DatasetSchema,
) -> Result<Vec<MonthlyMean>, AggregateError> {
    if filtered.height() == 0 {
        return Ok(Vec::new());
    }
    let concentration = schema.concentration.as_str();

    let grouped = filtered
        .clone()
        .lazy()
        .group_by([col(COL_YEAR), col(COL_MONTH)])
        .agg([col(concentration)
            .cast(DataType::Float64)
            .mean()
            .alias(concentration)])
        .sort([COL_YEAR, COL_MONTH], SortMultipleOptions::default())
        .collect()?;

    let years = int_values(&grouped, COL_YEAR)?;
    let months = int_values(&grouped, COL_MONTH)?;
    let means = float_values(&grouped, concentration)?;

    Ok(years
        .into_iter()
        .zip(months)
        .zip(means)
        .filter_map(|((year, month), concentration)| {
            Some(MonthlyMean {
                year: year?,
                month: u32::try_from(month?).ok()?,
                concentration,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_by_year_and_month() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            COL_YEAR => [2014i32, 2013, 2013, 2013, 2014],
            COL_MONTH => [1i32, 3, 3, 4, 1],
            "PM2.5" => [Some(100.0f64), Some(10.0), Some(30.0), None, Some(50.0)]
        )?;
        let trend = monthly_trend(&df, &DatasetSchema::default())?;

        assert_eq!(
            trend,
            vec![
                MonthlyMean { year: 2013, month: 3, concentration: Some(20.0) },
                MonthlyMean { year: 2013, month: 4, concentration: None },
                MonthlyMean { year: 2014, month: 1, concentration: Some(75.0) },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_empty_input() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            COL_YEAR => Vec::<i32>::new(),
            COL_MONTH => Vec::<i32>::new(),
            "PM2.5" => Vec::<f64>::new()
        )?;
        assert!(monthly_trend(&df, &DatasetSchema::default())?.is_empty());
        Ok(())
    }
}
