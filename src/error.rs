use crate::aggregate::error::AggregateError;
use crate::observations::error::IngestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}
