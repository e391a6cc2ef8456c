//! Codec derivation and the per-type codec cache.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::{Accessor, Entity, EntityError, EXCLUDED_MARKER, TABLE_FIELD};

/// The derived mapping between a record type's fields and its storage
/// columns, in field declaration order.
///
/// Column names are assumed unique; when two fields map to the same column
/// the later declaration wins in the name lookup. Excluded fields never
/// appear in the lookup.
pub struct Descriptor<T> {
    table: String,
    columns: Vec<Column<T>>,
    by_name: HashMap<String, usize>,
}

pub(crate) struct Column<T> {
    pub(crate) name: String,
    pub(crate) options: String,
    pub(crate) excluded: bool,
    pub(crate) accessor: Option<Accessor<T>>,
}

impl<T> std::fmt::Debug for Descriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Descriptor")
            .field("table", &self.table)
            .field(
                "columns",
                &self
                    .columns
                    .iter()
                    .map(|column| column.name.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<T: Entity> Descriptor<T> {
    fn derive(table: Option<&str>) -> Result<Self, EntityError> {
        let mut columns = Vec::new();
        let mut by_name = HashMap::new();
        let mut table_name = table.map(str::to_owned);

        for (index, spec) in T::fields().into_iter().enumerate() {
            let (mut name, options) = match spec.tag.split_once(',') {
                Some((name, options)) => (name.to_owned(), options.to_owned()),
                None => (spec.tag.to_owned(), String::new()),
            };
            if name.is_empty() {
                name = spec.field.to_owned();
            }
            if spec.field == TABLE_FIELD {
                if name.is_empty() || name == EXCLUDED_MARKER {
                    return Err(EntityError::InvalidTableName {
                        name,
                        type_name: std::any::type_name::<T>(),
                    });
                }
                // an explicitly supplied table name takes precedence
                if table_name.is_none() {
                    table_name = Some(name.clone());
                }
                name = EXCLUDED_MARKER.to_owned();
            }
            let excluded = name == EXCLUDED_MARKER;
            if !excluded {
                // last write wins on duplicate column names
                by_name.insert(name.clone(), index);
            }
            columns.push(Column {
                name,
                options,
                excluded,
                accessor: spec.accessor,
            });
        }

        let table = table_name.ok_or(EntityError::MissingTableName {
            type_name: std::any::type_name::<T>(),
        })?;
        Ok(Descriptor {
            table,
            columns,
            by_name,
        })
    }

    /// The storage table this type maps to.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Whether `column` is a mapped, included column.
    pub fn contains(&self, column: &str) -> bool {
        self.by_name.contains_key(column)
    }

    /// The free-form options tail of a mapped column's annotation.
    pub fn options(&self, column: &str) -> Option<&str> {
        self.by_name
            .get(column)
            .map(|&index| self.columns[index].options.as_str())
    }

    /// All included column names in declaration order, comma-joined.
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .filter(|column| !column.excluded)
            .map(|column| column.name.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub(crate) fn accessor(&self, column: &str) -> Option<&Accessor<T>> {
        self.by_name
            .get(column)
            .and_then(|&index| self.columns[index].accessor.as_ref())
    }

    /// Included columns with their accessors, in declaration order.
    pub(crate) fn storage_columns(&self) -> impl Iterator<Item = (&str, &Accessor<T>)> {
        self.columns.iter().filter(|column| !column.excluded).filter_map(|column| {
            column
                .accessor
                .as_ref()
                .map(|accessor| (column.name.as_str(), accessor))
        })
    }
}

/// The per-type codec cache.
///
/// An owned object with the lifetime of the application or session; pass it
/// to builder constructors. Codecs are derived lazily, memoized for the
/// registry's lifetime, and never evicted. A single mutex covers
/// lookup-and-derive as one critical section, so concurrent callers racing
/// on the same type converge on one shared descriptor and never observe a
/// half-built one; a failed derivation leaves no entry behind.
#[derive(Default)]
pub struct Registry {
    codecs: Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec for `T`, resolving the table name from the sentinel field.
    pub fn describe<T: Entity>(&self) -> Result<Arc<Descriptor<T>>, EntityError> {
        self.lookup_or_derive::<T>(None)
    }

    /// Codec for `T` against an explicitly named table.
    ///
    /// The cache is keyed by type alone: whichever entry point derives a
    /// type first fixes its table name for this registry's lifetime.
    pub fn describe_with_table<T: Entity>(
        &self,
        table: &str,
    ) -> Result<Arc<Descriptor<T>>, EntityError> {
        self.lookup_or_derive::<T>(Some(table))
    }

    fn lookup_or_derive<T: Entity>(
        &self,
        table: Option<&str>,
    ) -> Result<Arc<Descriptor<T>>, EntityError> {
        let mut codecs = self
            .codecs
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = codecs.get(&TypeId::of::<T>()) {
            if let Ok(codec) = Arc::clone(existing).downcast::<Descriptor<T>>() {
                return Ok(codec);
            }
        }
        let codec = Arc::new(Descriptor::<T>::derive(table)?);
        let erased: Arc<dyn Any + Send + Sync> = codec.clone();
        codecs.insert(TypeId::of::<T>(), erased);
        Ok(codec)
    }
}
