use crate::observations::error::IngestError;
use crate::observations::table::ObservationTable;
use crate::types::schema::{
    DatasetSchema, TimestampPolicy, COL_DATETIME, COL_DAY_OF_WEEK, COL_HOUR, COL_IS_WEEKEND,
    COL_MONTH, COL_YEAR,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use log::{debug, info, warn};
use polars::prelude::*;
use std::path::Path;

/// Reads the source CSV and normalises it into an [`ObservationTable`].
#[derive(Debug, Clone)]
pub struct ObservationLoader {
    schema: DatasetSchema,
}

impl ObservationLoader {
    pub fn new(schema: DatasetSchema) -> ObservationLoader {
        ObservationLoader { schema }
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    /// Loads and normalises the dataset at `path`.
    ///
    /// Steps, in order: the missing-value sentinel becomes null, every text
    /// column that parses completely as numbers becomes numeric, one timestamp
    /// is built per row from the year/month/day/hour columns, and the calendar
    /// fields are derived from that timestamp. Row order is kept as read.
    ///
    /// A missing file is an error; no other location is tried.
    pub fn load(&self, path: &Path) -> Result<ObservationTable, IngestError> {
        ensure_source_exists(path)?;

        let frame = self.read_csv(path)?;
        let mut frame = coerce_numeric_columns(frame);

        let timestamps = self.build_timestamps(&frame, path)?;
        let timestamps = match self.schema.timestamp_policy {
            TimestampPolicy::Strict => timestamps
                .into_iter()
                .enumerate()
                .map(|(row, ts)| ts.ok_or_else(|| self.invalid_timestamp(&frame, path, row)))
                .collect::<Result<Vec<_>, _>>()?,
            TimestampPolicy::DropInvalid => {
                let keep: Vec<bool> = timestamps.iter().map(Option::is_some).collect();
                let dropped = keep.iter().filter(|k| !**k).count();
                if dropped > 0 {
                    warn!(
                        "Dropping {} rows with invalid timestamps from {:?}",
                        dropped, path
                    );
                    let mask = BooleanChunked::from_slice("keep".into(), &keep);
                    frame = frame
                        .filter(&mask)
                        .map_err(|e| IngestError::DerivedColumns {
                            path: path.to_path_buf(),
                            source: e,
                        })?;
                }
                timestamps.into_iter().flatten().collect()
            }
        };

        with_calendar_columns(&mut frame, &timestamps).map_err(|e| {
            IngestError::DerivedColumns {
                path: path.to_path_buf(),
                source: e,
            }
        })?;

        info!(
            "Loaded {} observations ({} columns) from {:?}",
            frame.height(),
            frame.width(),
            path
        );
        Ok(ObservationTable::new(frame, self.schema.clone(), path))
    }

    fn read_csv(&self, path: &Path) -> Result<DataFrame, IngestError> {
        let null_values = NullValues::AllColumnsSingle(self.schema.missing_marker.as_str().into());

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            // Infer dtypes from every row.
            .with_infer_schema_length(None)
            .with_parse_options(CsvParseOptions::default().with_null_values(Some(null_values)))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| IngestError::CsvRead {
                path: path.to_path_buf(),
                source: e,
            })?
            .finish()
            .map_err(|e| IngestError::CsvRead {
                path: path.to_path_buf(),
                source: e,
            })?;

        let required = self
            .schema
            .timestamp_columns()
            .into_iter()
            .chain(std::iter::once(self.schema.concentration.as_str()));
        for column in required {
            if frame.column(column).is_err() {
                return Err(IngestError::MissingColumn {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                });
            }
        }

        Ok(frame)
    }

    /// One entry per row; `None` where the four fields are not a real calendar hour.
    fn build_timestamps(
        &self,
        frame: &DataFrame,
        path: &Path,
    ) -> Result<Vec<Option<NaiveDateTime>>, IngestError> {
        let [year, month, day, hour] = self
            .schema
            .timestamp_columns()
            .map(|name| integer_column(frame, name, path));
        let (year, month, day, hour) = (year?, month?, day?, hour?);

        let timestamps = year
            .into_iter()
            .zip(month.into_iter())
            .zip(day.into_iter())
            .zip(hour.into_iter())
            .map(|(((y, m), d), h)| compose_timestamp(y, m, d, h))
            .collect();
        Ok(timestamps)
    }

    fn invalid_timestamp(&self, frame: &DataFrame, path: &Path, row: usize) -> IngestError {
        let field = |name: &str| {
            integer_column(frame, name, path)
                .ok()
                .and_then(|values| values.get(row).copied().flatten())
        };
        IngestError::InvalidTimestamp {
            path: path.to_path_buf(),
            row,
            year: field(&self.schema.year),
            month: field(&self.schema.month),
            day: field(&self.schema.day),
            hour: field(&self.schema.hour),
        }
    }
}

fn ensure_source_exists(path: &Path) -> Result<(), IngestError> {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Ok(()),
        Ok(_) => Err(IngestError::NotAFile(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(IngestError::SourceNotFound(path.to_path_buf()))
        }
        Err(e) => Err(IngestError::SourceMetadata(path.to_path_buf(), e)),
    }
}

/// Converts every text column that parses fully as numbers to `f64`.
/// Columns with any non-numeric value (station names, wind directions) are left as they are.
fn coerce_numeric_columns(mut frame: DataFrame) -> DataFrame {
    let text_columns: Vec<PlSmallStr> = frame
        .get_columns()
        .iter()
        .filter(|c| c.dtype() == &DataType::String)
        .map(|c| c.name().clone())
        .collect();

    for name in text_columns {
        let Ok(column) = frame.column(name.as_str()) else {
            continue;
        };
        // A value that does not parse becomes null in a lenient cast.
        let coerced = column
            .cast(&DataType::Float64)
            .ok()
            .filter(|cast| cast.null_count() == column.null_count());
        match coerced {
            Some(cast) => {
                if frame.with_column(cast).is_ok() {
                    debug!("Coerced column '{}' to f64", name);
                }
            }
            None => debug!("Column '{}' kept as text", name),
        }
    }
    frame
}

/// Reads a timestamp field as whole numbers. Fractional or non-numeric values become `None`.
fn integer_column(
    frame: &DataFrame,
    name: &str,
    path: &Path,
) -> Result<Vec<Option<i64>>, IngestError> {
    let column = frame.column(name).map_err(|_| IngestError::MissingColumn {
        path: path.to_path_buf(),
        column: name.to_string(),
    })?;
    let non_numeric = |e| IngestError::NonNumericColumn {
        path: path.to_path_buf(),
        column: name.to_string(),
        source: e,
    };
    let casted = column.cast(&DataType::Float64).map_err(non_numeric)?;
    let values = casted
        .f64()
        .map_err(non_numeric)?
        .into_iter()
        .map(|value| value.and_then(whole_number))
        .collect();
    Ok(values)
}

fn whole_number(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= i32::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn compose_timestamp(
    year: Option<i64>,
    month: Option<i64>,
    day: Option<i64>,
    hour: Option<i64>,
) -> Option<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(
        i32::try_from(year?).ok()?,
        u32::try_from(month?).ok()?,
        u32::try_from(day?).ok()?,
    )?;
    date.and_hms_opt(u32::try_from(hour?).ok()?, 0, 0)
}

/// Adds the `datetime` column and (over)writes hour, month, year, dayofweek and is_weekend.
fn with_calendar_columns(frame: &mut DataFrame, timestamps: &[NaiveDateTime]) -> PolarsResult<()> {
    let datetime = DatetimeChunked::from_naive_datetime(
        COL_DATETIME.into(),
        timestamps.iter().copied(),
        TimeUnit::Milliseconds,
    );
    let hour: Vec<i32> = timestamps.iter().map(|t| t.hour() as i32).collect();
    let month: Vec<i32> = timestamps.iter().map(|t| t.month() as i32).collect();
    let year: Vec<i32> = timestamps.iter().map(|t| t.year()).collect();
    let day_of_week: Vec<i32> = timestamps
        .iter()
        .map(|t| t.weekday().num_days_from_monday() as i32)
        .collect();
    let is_weekend: Vec<bool> = day_of_week.iter().map(|d| *d >= 5).collect();

    frame.with_column(datetime.into_series())?;
    frame.with_column(Series::new(COL_HOUR.into(), hour))?;
    frame.with_column(Series::new(COL_MONTH.into(), month))?;
    frame.with_column(Series::new(COL_YEAR.into(), year))?;
    frame.with_column(Series::new(COL_DAY_OF_WEEK.into(), day_of_week))?;
    frame.with_column(Series::new(COL_IS_WEEKEND.into(), is_weekend))?;
    Ok(())
}
