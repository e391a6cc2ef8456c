//! Result iteration over the driver's row cursor.

use std::sync::Arc;

use crate::driver::Rows;
use crate::entity::{ColumnBinding, Entity};

use super::errors::QueryError;
use super::select::Query;

/// The result of running a [`Query`].
///
/// Owns the live cursor and must be driven by a single caller. Once
/// [`QueryError::Done`] has been returned the cursor is already closed;
/// further `next` calls keep reporting `Done`.
pub struct RowIter<T: Entity> {
    query: Query<T>,
    cql: String,
    cursor: Option<Box<dyn Rows>>,
    err: Option<QueryError>,
}

impl<T: Entity> RowIter<T> {
    pub(crate) fn open(query: Query<T>, cql: String, rows: Box<dyn Rows>) -> Self {
        RowIter {
            query,
            cql,
            cursor: Some(rows),
            err: None,
        }
    }

    pub(crate) fn failed(query: Query<T>, err: QueryError) -> Self {
        RowIter {
            query,
            cql: String::new(),
            cursor: None,
            err: Some(err),
        }
    }

    /// The compiled statement this iterator is consuming; empty when the
    /// query never compiled.
    pub fn statement(&self) -> &str {
        &self.cql
    }

    /// Load the next result row into `dst`. Returns [`QueryError::Done`]
    /// once the results are exhausted.
    pub async fn next(&mut self, dst: &mut T) -> Result<(), QueryError> {
        if let Some(err) = self.err.take() {
            return Err(err);
        }
        let codec = Arc::clone(self.query.codec());
        ColumnBinding::new(codec.as_ref(), dst)
            .load(&mut self.cursor)
            .await
    }

    /// Close the underlying cursor; a no-op once it is gone.
    pub async fn close(&mut self) -> Result<(), QueryError> {
        match self.cursor.take() {
            Some(rows) => Ok(rows.close().await?),
            None => Ok(()),
        }
    }
}
