mod aggregate;
mod dashboard;
mod error;
mod filtering;
mod observations;
mod pipeline;
mod types;
mod utils;

pub use dashboard::Dashboard;
pub use error::DashboardError;
pub use pipeline::{compute_views, run};

pub use filtering::ObservationFilterExt;

pub use observations::cache::DatasetCache;
pub use observations::error::IngestError;
pub use observations::loader::ObservationLoader;
pub use observations::table::ObservationTable;

pub use aggregate::correlation::{correlation_matrix, pearson};
pub use aggregate::daily::{daily_aggregates, daily_resample};
pub use aggregate::error::AggregateError;
pub use aggregate::hourly::{hourly_category_distribution, hourly_series};
pub use aggregate::monthly::monthly_trend;

pub use types::category::{Category, ParseCategoryError};
pub use types::filter::{ViewFilter, ViewMode, YearFilter};
pub use types::schema::*;
pub use types::views::*;
