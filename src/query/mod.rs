//! Query and update builders, the filter grammar, and result iteration.

mod errors;
mod filter;
mod iter;
mod select;
mod update;

pub use errors::{BuildError, QueryError};
pub use iter::RowIter;
pub use select::Query;
pub use update::Update;
