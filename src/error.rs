use sqlx::Error as SqlxError;
use sqlx::error::ErrorKind as DbErrorKind;
use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, InsightsError>;

/// Coarse classification of every [`InsightsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Storage could not be opened or the schema could not be written.
    Startup,
    /// A table or column that does not exist was referenced.
    Schema,
    /// Primary-key, type or range constraint violated.
    Constraint,
    /// Any other statement failure.
    Execution,
    /// Configuration could not be loaded.
    Config,
}

#[derive(Debug, ThisError)]
pub enum InsightsError {
    #[error("Failed to open or initialize database: {0}")]
    Startup(#[source] SqlxError),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Table {table} has no column named {column}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("Insert into {0} supplied no fields")]
    EmptyInsert(&'static str),

    #[error("Delete from {0} requires at least one predicate term")]
    EmptyPredicate(&'static str),

    #[error("Database rejected statement schema: {0}")]
    SchemaRejected(#[source] SqlxError),

    #[error("Column {table}.{column} expects {expected}, got {found}")]
    TypeMismatch {
        table: &'static str,
        column: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(#[source] SqlxError),

    #[error("Database error: {0}")]
    DatabaseError(#[source] SqlxError),

    #[error("Failed to decode {table}.{column}: {reason}")]
    Decode {
        table: &'static str,
        column: &'static str,
        reason: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl InsightsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InsightsError::Startup(_) => ErrorKind::Startup,
            InsightsError::UnknownTable(_)
            | InsightsError::UnknownColumn { .. }
            | InsightsError::EmptyInsert(_)
            | InsightsError::SchemaRejected(_) => ErrorKind::Schema,
            InsightsError::TypeMismatch { .. }
            | InsightsError::InvalidField { .. }
            | InsightsError::ConstraintViolation(_) => ErrorKind::Constraint,
            InsightsError::EmptyPredicate(_)
            | InsightsError::DatabaseError(_)
            | InsightsError::Decode { .. }
            | InsightsError::Json(_) => ErrorKind::Execution,
            InsightsError::Config(_) => ErrorKind::Config,
        }
    }

    /// Classify an error raised by the engine while running a statement.
    pub fn from_statement(err: SqlxError) -> Self {
        let SqlxError::Database(db_err) = &err else {
            return InsightsError::DatabaseError(err);
        };
        match db_err.kind() {
            DbErrorKind::UniqueViolation
            | DbErrorKind::ForeignKeyViolation
            | DbErrorKind::NotNullViolation
            | DbErrorKind::CheckViolation => InsightsError::ConstraintViolation(err),
            _ => {
                let message = db_err.message();
                if message.contains("no such table")
                    || message.contains("no such column")
                    || message.contains("has no column named")
                {
                    InsightsError::SchemaRejected(err)
                } else if message.contains("constraint failed") || message.contains("datatype mismatch")
                {
                    InsightsError::ConstraintViolation(err)
                } else {
                    InsightsError::DatabaseError(err)
                }
            }
        }
    }
}

impl From<figment::Error> for InsightsError {
    fn from(e: figment::Error) -> Self {
        InsightsError::Config(Box::new(e))
    }
}
