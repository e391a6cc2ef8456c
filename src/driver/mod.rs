//! Seam to the external wire driver.
//!
//! The transport, pooling, retry, and consistency machinery all live behind
//! these traits; this crate only compiles statements and hands them over.

use async_trait::async_trait;
use thiserror::Error;

use crate::value::Value;

/// Error reported by the underlying driver, propagated verbatim.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct DriverError(#[from] pub Box<dyn std::error::Error + Send + Sync>);

impl DriverError {
    pub fn new<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        DriverError(err.into())
    }
}

/// A connected driver session able to execute parameterized statements.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Execute a read statement and return a forward-only row cursor.
    async fn query(&self, cql: &str, values: &[Value]) -> Result<Box<dyn Rows>, DriverError>;

    /// Execute a statement with no expected result rows.
    async fn execute(&self, cql: &str, values: &[Value]) -> Result<(), DriverError>;
}

/// A forward-only result cursor.
///
/// Scan-level failures surface through [`Rows::close`], matching the wire
/// driver contract: `scan` only distinguishes "row" from "no further rows".
#[async_trait]
pub trait Rows: Send {
    /// Column names of the result rows, in scan order.
    fn columns(&self) -> &[String];

    /// The next row's values in column order, or `None` once exhausted.
    async fn scan(&mut self) -> Option<Vec<Value>>;

    /// Release the cursor, reporting any deferred error.
    async fn close(self: Box<Self>) -> Result<(), DriverError>;
}
