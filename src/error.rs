use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    /// An attribute key that is not a column of the model's table
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),

    /// The backing table could not be introspected
    #[error("failed to resolve schema for table '{table}': {reason}")]
    SchemaResolution { table: String, reason: String },

    /// A through/source association name with no registered spec
    #[error("association '{name}' is not registered on model '{model}'")]
    AssociationNotRegistered { model: String, name: String },

    /// An association resolved to the wrong cardinality
    #[error("association resolved to {actual}, expected {expected}")]
    AssociationKind {
        expected: &'static str,
        actual: &'static str,
    },

    /// A model name with no entry in the registry
    #[error("model '{0}' is not registered")]
    ModelNotRegistered(String),

    /// A model registered twice with conflicting table names
    #[error("model '{0}' is already registered with a different table")]
    AlreadyRegistered(String),

    /// A `where` call with no predicates; unconditional scans go through `all`
    #[error("empty predicate map; use all() for an unconditional scan")]
    EmptyPredicates,

    /// A table or column name that is not a bare SQL identifier
    #[error("invalid SQL identifier '{0}'")]
    InvalidIdentifier(String),

    /// Rusqlite specific errors
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for database operations
pub type Result<T> = std::result::Result<T, RecordError>;
