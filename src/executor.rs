use async_trait::async_trait;

use crate::error::SqlWrapperError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Outcome of a write statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatementOutcome {
    /// Rows changed by the statement.
    pub rows_affected: usize,
    /// Row id of the most recent successful insert on the connection.
    pub last_insert_id: i64,
}

/// Runs compiled statements against a database.
///
/// Implementations receive the SQL text and positional parameters exactly as the builder
/// produced them and report driver errors without interpretation.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Executes a parameterless batch of statements.
    async fn execute_batch(&self, query: &str) -> Result<(), SqlWrapperError>;

    /// Executes a single SELECT statement and returns the result set.
    async fn execute_query(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlWrapperError>;

    /// Executes a single INSERT, UPDATE or DELETE.
    async fn execute_statement(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<StatementOutcome, SqlWrapperError>;
}
