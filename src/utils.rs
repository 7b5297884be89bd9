use crate::aggregate::error::AggregateError;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Retrieves a column by name from a DataFrame.
pub(crate) fn get_column<'a>(df: &'a DataFrame, col: &str) -> Result<&'a Column, AggregateError> {
    df.column(col)
        .map_err(|e| AggregateError::ColumnNotFound(col.to_string(), e))
}

fn cast_column(
    df: &DataFrame,
    col: &str,
    dtype: DataType,
    expected: &'static str,
) -> Result<Column, AggregateError> {
    get_column(df, col)?
        .cast(&dtype)
        .map_err(|e| AggregateError::ColumnType {
            column: col.to_string(),
            expected,
            source: e,
        })
}

/// Reads a numeric column as optional floats, casting integers as needed.
pub(crate) fn float_values(df: &DataFrame, col: &str) -> Result<Vec<Option<f64>>, AggregateError> {
    let casted = cast_column(df, col, DataType::Float64, "f64")?;
    let values = casted.f64()?.into_iter().collect();
    Ok(values)
}

pub(crate) fn int_values(df: &DataFrame, col: &str) -> Result<Vec<Option<i32>>, AggregateError> {
    let casted = cast_column(df, col, DataType::Int32, "i32")?;
    let values = casted.i32()?.into_iter().collect();
    Ok(values)
}

pub(crate) fn date_values(
    df: &DataFrame,
    col: &str,
) -> Result<Vec<Option<NaiveDate>>, AggregateError> {
    let column = get_column(df, col)?;
    let dates = column.date().map_err(|e| AggregateError::ColumnType {
        column: col.to_string(),
        expected: "date",
        source: e,
    })?;
    Ok(dates.as_date_iter().collect())
}

pub(crate) fn datetime_values(
    df: &DataFrame,
    col: &str,
) -> Result<Vec<Option<NaiveDateTime>>, AggregateError> {
    let column = get_column(df, col)?;
    let datetimes = column.datetime().map_err(|e| AggregateError::ColumnType {
        column: col.to_string(),
        expected: "datetime",
        source: e,
    })?;
    Ok(datetimes.as_datetime_iter().collect())
}

/// Numeric in the dataframe sense: integers and floats, not booleans or temporals.
pub(crate) fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Names of all numeric columns, in frame order.
pub(crate) fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|c| is_numeric(c.dtype()))
        .map(|c| c.name().to_string())
        .collect()
}
