use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// The table sentinel resolved to an empty or excluded name.
    #[error("table name {name:?} not allowed for {type_name}")]
    InvalidTableName {
        name: String,
        type_name: &'static str,
    },

    /// Neither the sentinel field nor the construction entry point supplied
    /// a table name.
    #[error("no table name resolved for {type_name}")]
    MissingTableName { type_name: &'static str },
}
