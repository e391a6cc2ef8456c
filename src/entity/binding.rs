//! Binding of one codec to one record instance, for loading rows out of a
//! cursor and saving records through the driver.

use crate::driver::{Driver, Rows};
use crate::query::QueryError;
use crate::value::Value;

use super::{Descriptor, Entity, Registry};

/// Adapts a record instance for column-wise loading.
pub(crate) struct ColumnBinding<'a, T: Entity> {
    codec: &'a Descriptor<T>,
    record: &'a mut T,
}

impl<'a, T: Entity> ColumnBinding<'a, T> {
    pub(crate) fn new(codec: &'a Descriptor<T>, record: &'a mut T) -> Self {
        ColumnBinding { codec, record }
    }

    /// Populate the record from the cursor's next row.
    ///
    /// Cursor columns without a mapping are left unbound. At exhaustion the
    /// cursor is closed (close errors propagate as-is) and
    /// [`QueryError::Done`] is returned.
    pub(crate) async fn load(&mut self, cursor: &mut Option<Box<dyn Rows>>) -> Result<(), QueryError> {
        let scanned = match cursor.as_mut() {
            Some(rows) => {
                let columns: Vec<String> = rows.columns().to_vec();
                let row = rows.scan().await;
                row.map(|values| (columns, values))
            }
            None => return Err(QueryError::Done),
        };
        match scanned {
            Some((columns, values)) => {
                for (column, value) in columns.iter().zip(values) {
                    if let Some(accessor) = self.codec.accessor(column) {
                        (accessor.set)(self.record, value).map_err(|source| {
                            QueryError::Bind {
                                column: column.clone(),
                                source,
                            }
                        })?;
                    }
                }
                Ok(())
            }
            None => {
                if let Some(rows) = cursor.take() {
                    rows.close().await?;
                }
                Err(QueryError::Done)
            }
        }
    }
}

/// Save a record instance: compile and execute the INSERT statement for all
/// of its included columns.
pub async fn save_entity<T: Entity>(
    driver: &dyn Driver,
    registry: &Registry,
    record: &T,
) -> Result<(), QueryError> {
    let codec = registry.describe::<T>()?;

    // one pass assembles columns, placeholders, and arguments together;
    // their orderings must agree exactly
    let mut columns = Vec::new();
    let mut placeholders = Vec::new();
    let mut values: Vec<Value> = Vec::new();
    for (name, accessor) in codec.storage_columns() {
        columns.push(name);
        placeholders.push("?");
        values.push((accessor.get)(record));
    }

    let cql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        codec.table(),
        columns.join(","),
        placeholders.join(",")
    );
    log::debug!("saving entity: {cql}");
    driver.execute(&cql, &values).await?;
    Ok(())
}
