use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::SqlWrapperError;
use crate::executor::{SqlExecutor, StatementOutcome};
use crate::results::ResultSet;
use crate::types::RowValues;

use super::params::Params;
use super::query::build_result_set;

pub(crate) type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

/// A single `SQLite` connection driven from tokio's blocking pool.
///
/// Clones share the connection; statements from all clones run one at a time.
#[derive(Clone)]
pub struct SqliteConnection {
    conn: SharedSqliteConnection,
    path: Arc<str>,
}

impl SqliteConnection {
    /// Open (or create) the database at `path`. `:memory:` opens a private in-memory database.
    ///
    /// File-backed databases are switched to WAL journaling.
    ///
    /// # Errors
    /// Returns `SqlWrapperError::SqliteError` if the file cannot be opened or the pragma fails.
    pub async fn open(path: &str) -> Result<Self, SqlWrapperError> {
        let path_owned = path.to_owned();
        let conn = tokio::task::spawn_blocking(move || {
            let conn = rusqlite::Connection::open(&path_owned)?;
            if !is_memory_path(&path_owned) {
                conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            }
            Ok::<_, SqlWrapperError>(conn)
        })
        .await??;
        tracing::debug!(path, "opened sqlite database");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Arc::from(path),
        })
    }

    /// # Errors
    /// Returns `SqlWrapperError::SqliteError` if the database cannot be created.
    pub async fn open_in_memory() -> Result<Self, SqlWrapperError> {
        Self::open(":memory:").await
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run synchronous `rusqlite` logic against the connection.
    ///
    /// # Errors
    /// Propagates the callback's error, or `ExecutionError` if the blocking task panicked.
    pub async fn with_connection<F, R>(&self, func: F) -> Result<R, SqlWrapperError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlWrapperError> + Send + 'static,
        R: Send + 'static,
    {
        run_blocking(Arc::clone(&self.conn), func).await
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SqlExecutor for SqliteConnection {
    /// Runs the batch in its own transaction unless one is already open.
    async fn execute_batch(&self, query: &str) -> Result<(), SqlWrapperError> {
        let sql_owned = query.to_owned();
        self.with_connection(move |guard| {
            if guard.is_autocommit() {
                let tx = guard.transaction()?;
                tx.execute_batch(&sql_owned)?;
                tx.commit()?;
            } else {
                guard.execute_batch(&sql_owned)?;
            }
            Ok(())
        })
        .await
    }

    async fn execute_query(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlWrapperError> {
        let sql_owned = query.to_owned();
        let params_owned = Params::convert(params);
        self.with_connection(move |guard| {
            let mut stmt = guard.prepare(&sql_owned)?;
            build_result_set(&mut stmt, &params_owned)
        })
        .await
    }

    async fn execute_statement(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<StatementOutcome, SqlWrapperError> {
        let sql_owned = query.to_owned();
        let params_owned = Params::convert(params);
        self.with_connection(move |guard| {
            let mut stmt = guard.prepare_cached(&sql_owned)?;
            let refs = params_owned.as_refs();
            let rows_affected = stmt.execute(&refs[..])?;
            drop(stmt);
            Ok(StatementOutcome {
                rows_affected,
                last_insert_id: guard.last_insert_rowid(),
            })
        })
        .await
    }
}

pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, SqlWrapperError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlWrapperError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await?
}

fn is_memory_path(path: &str) -> bool {
    path == ":memory:"
        || path.is_empty()
        || path.starts_with("file::memory:")
        || path.contains("mode=memory")
}
