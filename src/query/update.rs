//! The fluent partial-update builder.

use std::collections::HashMap;
use std::sync::Arc;

use crate::driver::Driver;
use crate::entity::{Descriptor, Entity, EntityError, Registry};
use crate::value::Value;

use super::errors::{BuildError, QueryError};
use super::filter::{parse_filter, where_clause, Filter};

/// An immutable partial-update statement over an entity type.
///
/// Same copy-on-write discipline as [`Query`](super::Query): every mutator
/// returns a new value, bad input is captured until compile or run, and
/// mutators on an errored builder are passthroughs.
pub struct Update<T: Entity> {
    codec: Arc<Descriptor<T>>,
    state: Result<UpdateState, BuildError>,
}

#[derive(Clone, Default)]
struct UpdateState {
    filters: Vec<Filter>,
    assignments: HashMap<String, Value>,
    ttl: i64,
}

impl<T: Entity> Clone for Update<T> {
    fn clone(&self) -> Self {
        Update {
            codec: Arc::clone(&self.codec),
            state: self.state.clone(),
        }
    }
}

impl<T: Entity> Update<T> {
    /// New update; the table name comes from the entity's sentinel field.
    pub fn new(registry: &Registry) -> Result<Self, EntityError> {
        Ok(Update::with_codec(registry.describe::<T>()?))
    }

    /// New update against an explicitly named table.
    pub fn with_table(registry: &Registry, table: &str) -> Result<Self, EntityError> {
        Ok(Update::with_codec(registry.describe_with_table::<T>(table)?))
    }

    fn with_codec(codec: Arc<Descriptor<T>>) -> Self {
        Update {
            codec,
            state: Ok(UpdateState::default()),
        }
    }

    fn derive(&self, apply: impl FnOnce(UpdateState) -> Result<UpdateState, BuildError>) -> Self {
        Update {
            codec: Arc::clone(&self.codec),
            state: self.state.clone().and_then(apply),
        }
    }

    /// Derivative update with a field-based filter; same grammar and
    /// compile-time validation as query filters.
    pub fn filter(&self, expr: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.derive(|mut state| {
            state.filters.push(parse_filter(expr, value)?);
            Ok(state)
        })
    }

    /// Derivative update assigning `value` to `column`. Assigning the same
    /// column again overwrites the earlier value.
    pub fn set(&self, column: &str, value: impl Into<Value>) -> Self {
        let column = column.to_owned();
        let value = value.into();
        self.derive(|mut state| {
            state.assignments.insert(column, value);
            Ok(state)
        })
    }

    /// Derivative update applying a time-to-live in seconds; only rendered
    /// when positive.
    pub fn ttl(&self, ttl: i64) -> Self {
        self.derive(|mut state| {
            state.ttl = ttl;
            Ok(state)
        })
    }

    /// Compile to statement text plus its positional arguments.
    ///
    /// Assignment arguments precede filter arguments. Assignments render in
    /// the map's iteration order, which is not stable across calls; callers
    /// must not rely on it when more than one column is set.
    pub fn to_cql(&self) -> Result<(String, Vec<Value>), BuildError> {
        let state = self.state.as_ref().map_err(Clone::clone)?;
        let using_ttl = if state.ttl > 0 {
            format!(" USING TTL {} ", state.ttl)
        } else {
            " ".to_owned()
        };
        let mut cql = format!("UPDATE {}{}SET ", self.codec.table(), using_ttl);
        let mut args = Vec::with_capacity(state.assignments.len() + state.filters.len());
        if !state.assignments.is_empty() {
            let mut sets = Vec::with_capacity(state.assignments.len());
            for (column, value) in &state.assignments {
                sets.push(format!("{} = ?", column));
                args.push(value.clone());
            }
            cql.push_str(&sets.join(", "));
        }
        let (clause, where_args) = where_clause(self.codec.as_ref(), &state.filters)?;
        cql.push_str(&clause);
        args.extend(where_args);
        Ok((cql, args))
    }

    /// The statement text alone.
    pub fn cql(&self) -> Result<String, BuildError> {
        self.to_cql().map(|(cql, _)| cql)
    }

    /// Compile and execute; no result rows are expected. Driver errors are
    /// returned unchanged.
    pub async fn run(&self, driver: &dyn Driver) -> Result<(), QueryError> {
        let (cql, args) = self.to_cql()?;
        log::debug!("running update: {cql}");
        driver.execute(&cql, &args).await?;
        Ok(())
    }
}
