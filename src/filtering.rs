use crate::types::filter::YearFilter;
use crate::types::schema::COL_YEAR;
use polars::prelude::{col, lit, LazyFrame};

pub trait ObservationFilterExt {
    /// Keeps the rows whose derived `year` column passes `years`.
    ///
    /// An empty year set keeps nothing; the result is an empty frame with the
    /// same schema, not an error.
    fn filter_years(self, years: &YearFilter) -> LazyFrame;

    /// Filters by an inclusive year range.
    fn filter_year_range(self, start_year: i32, end_year: i32) -> LazyFrame;
}

impl ObservationFilterExt for LazyFrame {
    fn filter_years(self, years: &YearFilter) -> LazyFrame {
        match years {
            YearFilter::All => self,
            YearFilter::Years(selected) => {
                let predicate = selected
                    .iter()
                    .fold(lit(false), |acc, year| acc.or(col(COL_YEAR).eq(lit(*year))));
                self.filter(predicate)
            }
            YearFilter::Range { start, end } => self.filter_year_range(*start, *end),
        }
    }

    fn filter_year_range(self, start_year: i32, end_year: i32) -> LazyFrame {
        self.filter(
            col(COL_YEAR)
                .gt_eq(lit(start_year))
                .and(col(COL_YEAR).lt_eq(lit(end_year))),
        )
    }
}
