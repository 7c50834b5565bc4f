use crate::query_builder::{BuilderOptions, InListMode};

#[cfg(feature = "sqlite")]
use crate::error::SqlWrapperError;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteConnection;
#[cfg(feature = "sqlite")]
use crate::wrapper::SqliteWrapper;

/// Options for opening a wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperOptions {
    pub db_path: String,
    pub log_queries: bool,
    pub in_list_mode: InListMode,
}

impl WrapperOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            log_queries: false,
            in_list_mode: InListMode::default(),
        }
    }

    #[must_use]
    pub fn builder(db_path: impl Into<String>) -> WrapperOptionsBuilder {
        WrapperOptionsBuilder::new(db_path)
    }

    #[must_use]
    pub fn with_log_queries(mut self, log_queries: bool) -> Self {
        self.log_queries = log_queries;
        self
    }

    /// The part of the options the query builder cares about.
    #[must_use]
    pub fn builder_options(&self) -> BuilderOptions {
        BuilderOptions::default()
            .with_log_queries(self.log_queries)
            .with_in_list_mode(self.in_list_mode)
    }
}

/// Fluent builder for [`WrapperOptions`].
///
/// ```rust,no_run
/// use sqlite_wrapper::prelude::*;
///
/// # async fn demo() -> Result<(), SqlWrapperError> {
/// let db = WrapperOptions::builder("app.db")
///     .log_queries(true)
///     .in_list_mode(InListMode::Parameterized)
///     .open()
///     .await?;
/// # let _ = db;
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct WrapperOptionsBuilder {
    opts: WrapperOptions,
}

impl WrapperOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: WrapperOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn log_queries(mut self, log_queries: bool) -> Self {
        self.opts.log_queries = log_queries;
        self
    }

    #[must_use]
    pub fn in_list_mode(mut self, mode: InListMode) -> Self {
        self.opts.in_list_mode = mode;
        self
    }

    #[must_use]
    pub fn finish(self) -> WrapperOptions {
        self.opts
    }

    /// Open the database described by these options.
    ///
    /// # Errors
    /// Returns `SqlWrapperError` if the database cannot be opened.
    #[cfg(feature = "sqlite")]
    pub async fn open(self) -> Result<SqliteWrapper<SqliteConnection>, SqlWrapperError> {
        SqliteWrapper::open(self.finish()).await
    }
}
