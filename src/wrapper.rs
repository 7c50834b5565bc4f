use serde_json::Value as JsonValue;

use crate::error::SqlWrapperError;
use crate::executor::SqlExecutor;
use crate::query_builder::{BuilderOptions, QueryBuilder, Record, SelectInput, WhereSpec};
use crate::results::ResultSet;

#[cfg(feature = "sqlite")]
use crate::config::WrapperOptions;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteConnection;

/// Select/insert/update/delete on top of an executor.
///
/// Every call compiles its request first; validation errors are returned before the executor
/// is touched. Executor errors are passed through unchanged.
///
/// # Examples
/// ```rust,no_run
/// use sqlite_wrapper::prelude::*;
///
/// # async fn demo() -> Result<(), SqlWrapperError> {
/// let db = SqliteWrapper::open_in_memory().await?;
/// db.database()
///     .execute_batch("create table users (id integer primary key, name text)")
///     .await?;
///
/// let id = db.insert("users", &Record::new().set("name", "Ann")).await?;
/// let rows = db
///     .select(SelectRequest::new("users").filter(WhereSpec::eq("id", id)))
///     .await?;
/// assert_eq!(rows.len(), 1);
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct SqliteWrapper<E> {
    executor: E,
    builder: QueryBuilder,
}

impl<E: SqlExecutor> SqliteWrapper<E> {
    pub fn new(executor: E, options: BuilderOptions) -> Self {
        Self {
            executor,
            builder: QueryBuilder::new(options),
        }
    }

    /// The underlying executor.
    pub fn database(&self) -> &E {
        &self.executor
    }

    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    pub fn set_log_queries(&mut self, log_queries: bool) {
        self.builder.set_log_queries(log_queries);
    }

    pub fn log_queries(&self) -> bool {
        self.builder.options().log_queries
    }

    /// Release the wrapper and hand back the executor.
    pub fn into_inner(self) -> E {
        self.executor
    }

    /// Run a select given as raw SQL or a [`SelectRequest`](crate::query_builder::SelectRequest).
    ///
    /// On error the caller can fall back to an empty result with `.unwrap_or_default()`.
    ///
    /// # Errors
    /// `MissingTable` for a request without a usable table, otherwise executor errors.
    pub async fn select(
        &self,
        request: impl Into<SelectInput>,
    ) -> Result<ResultSet, SqlWrapperError> {
        let qp = self.builder.select(&request.into())?;
        self.executor.execute_query(&qp.query, &qp.params).await
    }

    /// Like [`select`](Self::select) for a dynamic JSON request (string or object).
    ///
    /// # Errors
    /// `InvalidArgument` when `request` is neither a string nor a request object, then as
    /// [`select`](Self::select).
    pub async fn select_json(&self, request: &JsonValue) -> Result<ResultSet, SqlWrapperError> {
        let input = SelectInput::from_json(request).inspect_err(|err| {
            tracing::error!(operation = "select", error = %err, "rejected before execution");
        })?;
        self.select(input).await
    }

    /// Insert one row and return its generated row id.
    ///
    /// # Errors
    /// Executor errors, including the one raised for an unusable table name.
    pub async fn insert(&self, table: &str, record: &Record) -> Result<i64, SqlWrapperError> {
        let qp = self.builder.insert(table, record);
        let outcome = self.executor.execute_statement(&qp.query, &qp.params).await?;
        Ok(outcome.last_insert_id)
    }

    /// Update the rows matching `filter` (all rows when `None`) and return how many changed.
    ///
    /// # Errors
    /// `MissingTable`, `NoFieldsToUpdate`, otherwise executor errors.
    pub async fn update(
        &self,
        table: &str,
        changes: &Record,
        filter: Option<&WhereSpec>,
    ) -> Result<usize, SqlWrapperError> {
        let qp = self.builder.update(table, changes, filter)?;
        let outcome = self.executor.execute_statement(&qp.query, &qp.params).await?;
        Ok(outcome.rows_affected)
    }

    /// Delete the rows matching `filter` and return how many were removed.
    ///
    /// `None` deletes every row in the table.
    ///
    /// # Errors
    /// `MissingTable`, otherwise executor errors.
    pub async fn delete(
        &self,
        table: &str,
        filter: Option<&WhereSpec>,
    ) -> Result<usize, SqlWrapperError> {
        let qp = self.builder.delete(table, filter)?;
        let outcome = self.executor.execute_statement(&qp.query, &qp.params).await?;
        Ok(outcome.rows_affected)
    }
}

#[cfg(feature = "sqlite")]
impl SqliteWrapper<SqliteConnection> {
    /// Open the database named in `options`.
    ///
    /// # Errors
    /// Returns `SqlWrapperError::SqliteError` if the database cannot be opened.
    pub async fn open(options: WrapperOptions) -> Result<Self, SqlWrapperError> {
        let conn = SqliteConnection::open(&options.db_path).await?;
        Ok(Self::new(conn, options.builder_options()))
    }

    /// # Errors
    /// Returns `SqlWrapperError::SqliteError` if the database cannot be created.
    pub async fn open_in_memory() -> Result<Self, SqlWrapperError> {
        Self::open(WrapperOptions::new(":memory:")).await
    }

    /// Close the connection. Clones of the executor keep it alive until they are dropped.
    pub fn close(self) {
        tracing::debug!(path = self.executor.path(), "closing sqlite database");
        drop(self.executor);
    }
}
