use thiserror::Error;

use crate::driver::DriverError;
use crate::entity::EntityError;
use crate::value::ValueError;

/// A builder-syntax or compile-time semantic failure.
///
/// Captured inside the immutable builder when a mutator is given bad input,
/// and surfaced when the builder is compiled or executed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("invalid filter {0:?}")]
    InvalidFilter(String),

    #[error("invalid operator {operator:?} in filter {filter:?}")]
    InvalidOperator { operator: String, filter: String },

    #[error("invalid order {0:?}")]
    InvalidOrder(String),

    #[error("empty order")]
    EmptyOrder,

    #[error("query limit overflow: {0}")]
    LimitOverflow(i64),

    /// A filter referenced a column absent from the codec.
    #[error("field {0:?} not found")]
    UnknownField(String),
}

/// Any failure surfaced while compiling, executing, or iterating a query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Reported by the external driver; propagated verbatim.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// A scanned cell could not be written into its field.
    #[error("cannot bind column {column}: {source}")]
    Bind { column: String, source: ValueError },

    /// The reserved end-of-results sentinel: iteration has completed.
    #[error("query has no more results")]
    Done,
}

impl QueryError {
    /// True for the end-of-results sentinel.
    pub fn is_done(&self) -> bool {
        matches!(self, QueryError::Done)
    }
}
