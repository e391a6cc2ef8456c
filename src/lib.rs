//! cqlmap - Typed CQL query construction and row mapping
//!
//! This crate lets a caller declare a record type, annotate its fields with
//! storage-column names, and build, execute, and iterate CQL read queries or
//! run partial-update statements without hand-writing statement text:
//! - Per-type field/column codecs, derived once and cached in a [`Registry`]
//! - Fluent, immutable [`Query`] and [`Update`] builders compiling to
//!   statement text plus positional arguments
//! - Row iteration over the driver's cursor with a reserved end-of-results
//!   sentinel ([`QueryError::Done`])
//!
//! The wire driver itself is an external collaborator reached through the
//! [`Driver`] and [`Rows`] traits.

pub mod driver;
pub mod entity;
pub mod query;
pub mod value;

#[cfg(test)]
pub mod testing;

pub use driver::{Driver, DriverError, Rows};
pub use entity::{save_entity, Descriptor, Entity, EntityError, FieldSpec, Registry};
pub use query::{BuildError, Query, QueryError, RowIter, Update};
pub use value::{Value, ValueError};
