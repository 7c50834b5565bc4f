use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlWrapperError {
    /// `select` was handed something that is neither a SQL string nor a request object.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The table name sanitized to nothing.
    #[error("[sqlite-wrapper.{operation}]: table is undefined")]
    MissingTable { operation: &'static str },

    #[error("[sqlite-wrapper.update]: no fields to update")]
    NoFieldsToUpdate,

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}

impl SqlWrapperError {
    /// True for errors raised by the query builder before anything reached the executor.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::MissingTable { .. } | Self::NoFieldsToUpdate
        )
    }
}

impl From<tokio::task::JoinError> for SqlWrapperError {
    fn from(err: tokio::task::JoinError) -> Self {
        SqlWrapperError::ExecutionError(format!("sqlite spawn_blocking join error: {err}"))
    }
}
