//! The fluent read-query builder.

use std::sync::Arc;

use crate::driver::Driver;
use crate::entity::{Descriptor, Entity, EntityError, Registry};
use crate::value::Value;

use super::errors::{BuildError, QueryError};
use super::filter::{parse_filter, parse_order, where_clause, Filter, Order};
use super::iter::RowIter;

/// An immutable read query over an entity type.
///
/// Every mutator returns a new `Query` and never changes its receiver, so a
/// builder chain can be branched and reused from any intermediate point.
/// Bad mutator input is captured in the builder state and surfaced when the
/// query is compiled or executed; mutators on an errored builder are
/// passthroughs.
pub struct Query<T: Entity> {
    codec: Arc<Descriptor<T>>,
    state: Result<SelectState, BuildError>,
}

#[derive(Clone)]
struct SelectState {
    filters: Vec<Filter>,
    orders: Vec<Order>,
    projection: Vec<String>,
    limit: i32,
}

impl<T: Entity> Clone for Query<T> {
    fn clone(&self) -> Self {
        Query {
            codec: Arc::clone(&self.codec),
            state: self.state.clone(),
        }
    }
}

impl<T: Entity> Query<T> {
    /// New query; the table name comes from the entity's sentinel field.
    pub fn new(registry: &Registry) -> Result<Self, EntityError> {
        Ok(Query::with_codec(registry.describe::<T>()?))
    }

    /// New query against an explicitly named table.
    pub fn with_table(registry: &Registry, table: &str) -> Result<Self, EntityError> {
        Ok(Query::with_codec(registry.describe_with_table::<T>(table)?))
    }

    fn with_codec(codec: Arc<Descriptor<T>>) -> Self {
        Query {
            codec,
            state: Ok(SelectState {
                filters: Vec::new(),
                orders: Vec::new(),
                projection: Vec::new(),
                limit: -1,
            }),
        }
    }

    pub(crate) fn codec(&self) -> &Arc<Descriptor<T>> {
        &self.codec
    }

    fn derive(&self, apply: impl FnOnce(SelectState) -> Result<SelectState, BuildError>) -> Self {
        Query {
            codec: Arc::clone(&self.codec),
            state: self.state.clone().and_then(apply),
        }
    }

    /// Derivative query with a field-based filter. `expr` is a field name
    /// followed by one of `<`, `<=`, `=`, `>=`, `>`. Multiple filters are
    /// AND'ed together.
    pub fn filter(&self, expr: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.derive(|mut state| {
            state.filters.push(parse_filter(expr, value)?);
            Ok(state)
        })
    }

    /// Derivative query with a field-based sort order; prefix the field
    /// with `-` to sort descending.
    ///
    /// Orders are validated and recorded but not yet rendered into the
    /// compiled statement.
    pub fn order(&self, field: &str) -> Self {
        self.derive(|mut state| {
            state.orders.push(parse_order(field)?);
            Ok(state)
        })
    }

    /// Derivative query yielding only the given columns, verbatim.
    pub fn project<I>(&self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let projection: Vec<String> = columns.into_iter().map(Into::into).collect();
        self.derive(|mut state| {
            state.projection = projection;
            Ok(state)
        })
    }

    /// Derivative query with a limit on the number of results. A negative
    /// value means unlimited.
    pub fn limit(&self, limit: i64) -> Self {
        self.derive(|mut state| {
            state.limit = i32::try_from(limit).map_err(|_| BuildError::LimitOverflow(limit))?;
            Ok(state)
        })
    }

    /// Compile to statement text plus its positional arguments.
    pub fn to_cql(&self) -> Result<(String, Vec<Value>), BuildError> {
        let state = self.state.as_ref().map_err(Clone::clone)?;
        let columns = if state.projection.is_empty() {
            self.codec.column_list()
        } else {
            state.projection.join(",")
        };
        let mut cql = format!("SELECT {} FROM {}", columns, self.codec.table());
        let (clause, args) = where_clause(self.codec.as_ref(), &state.filters)?;
        cql.push_str(&clause);
        if state.limit > 0 {
            cql.push_str(&format!(" LIMIT {}", state.limit));
        }
        // TODO: render ORDER BY from state.orders once clustering-order
        // handling is settled; entries are accepted but unrendered for now.
        Ok((cql, args))
    }

    /// Execute the query and wrap the driver cursor in a [`RowIter`].
    ///
    /// Compilation and execution failures are primed on the returned
    /// iterator and surface on its first `next` call.
    pub async fn run(&self, driver: &dyn Driver) -> RowIter<T> {
        let (cql, args) = match self.to_cql() {
            Ok(compiled) => compiled,
            Err(err) => return RowIter::failed(self.clone(), err.into()),
        };
        log::debug!("running query: {cql}");
        match driver.query(&cql, &args).await {
            Ok(rows) => RowIter::open(self.clone(), cql, rows),
            Err(err) => RowIter::failed(self.clone(), QueryError::Driver(err)),
        }
    }

    /// Capture the first query result in `dst`, then close the iterator.
    /// An empty result set reports [`QueryError::Done`].
    pub async fn first(&self, driver: &dyn Driver, dst: &mut T) -> Result<(), QueryError> {
        let mut iter = self.run(driver).await;
        match iter.next(dst).await {
            Ok(()) => iter.close().await,
            Err(err) => {
                // the row-pull error wins over a secondary close failure
                let _ = iter.close().await;
                Err(err)
            }
        }
    }
}
