use crate::aggregate::error::AggregateError;
use crate::filtering::ObservationFilterExt;
use crate::types::filter::YearFilter;
use crate::types::schema::{DatasetSchema, COL_YEAR};
use crate::utils::int_values;
use polars::prelude::{DataFrame, IntoLazy, LazyFrame};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// The normalised observation set of one source file.
///
/// Built once by [`crate::ObservationLoader`] and never mutated afterwards;
/// every view is computed from a filtered copy.
#[derive(Debug, Clone)]
pub struct ObservationTable {
    frame: DataFrame,
    schema: DatasetSchema,
    source: PathBuf,
    years: BTreeSet<i32>,
}

impl ObservationTable {
    pub(crate) fn new(frame: DataFrame, schema: DatasetSchema, source: &Path) -> Self {
        let years = int_values(&frame, COL_YEAR)
            .map(|values| values.into_iter().flatten().collect())
            .unwrap_or_default();
        Self {
            frame,
            schema,
            source: source.to_path_buf(),
            years,
        }
    }

    /// The normalised rows, in source order, including the derived calendar columns.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    /// Path the table was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Distinct years present, ascending. These are the options (and the
    /// default selection) of the year picker.
    pub fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Rows whose year passes `years`, in source order.
    ///
    /// When none of the table's years pass, the result is an empty frame with
    /// the table's columns.
    pub fn filtered(&self, years: &YearFilter) -> Result<DataFrame, AggregateError> {
        if !self.years.iter().any(|year| years.contains(*year)) {
            return Ok(self.frame.clear());
        }
        Ok(self.lazy().filter_years(years).collect()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn table() -> Result<ObservationTable, PolarsError> {
        let frame = df!(
            COL_YEAR => [2013i32, 2014, 2014],
            "PM2.5" => [Some(10.0f64), None, Some(30.0)]
        )?;
        Ok(ObservationTable::new(
            frame,
            DatasetSchema::default(),
            Path::new("shunyi.csv"),
        ))
    }

    #[test]
    fn test_filtered_by_years() -> Result<(), Box<dyn std::error::Error>> {
        let table = table()?;
        assert_eq!(table.years().iter().copied().collect::<Vec<_>>(), vec![2013, 2014]);
        assert_eq!(table.source(), Path::new("shunyi.csv"));
        assert!(!table.is_empty());

        assert_eq!(table.filtered(&YearFilter::years([2014]))?.height(), 2);
        assert_eq!(table.filtered(&YearFilter::range(2010, 2013))?.height(), 1);
        assert_eq!(table.filtered(&YearFilter::All)?.height(), 3);
        Ok(())
    }

    #[test]
    fn test_unmatched_years_keep_columns() -> Result<(), Box<dyn std::error::Error>> {
        let table = table()?;
        let filters = [
            YearFilter::years([]),
            YearFilter::years([2020]),
            YearFilter::range(2015, 2016),
        ];
        for filter in filters {
            let filtered = table.filtered(&filter)?;
            assert_eq!(filtered.height(), 0);
            assert_eq!(filtered.get_column_names(), table.frame().get_column_names());
        }
        Ok(())
    }
}
