//! Structured request -> `(sql, params)` compilation.
//!
//! The compilers in the submodules are pure functions. [`QueryBuilder`] wraps them with the
//! per-instance options: how membership lists are rendered and whether compiled statements are
//! logged.

use crate::error::SqlWrapperError;
use crate::query::QueryAndParams;

mod dml;
mod ident;
mod select;
mod where_clause;

pub use dml::{Record, compile_delete, compile_insert, compile_update};
pub use ident::safe_name;
pub use select::{FieldList, SelectInput, SelectRequest, compile_select};
pub use where_clause::{
    CompiledWhere, EqualityMap, InListMode, WhereSpec, WhereValue, compile_where,
};

/// Options held by a [`QueryBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuilderOptions {
    /// Emit every compiled statement as a `tracing` info event.
    pub log_queries: bool,
    pub in_list_mode: InListMode,
}

impl BuilderOptions {
    #[must_use]
    pub fn with_log_queries(mut self, log_queries: bool) -> Self {
        self.log_queries = log_queries;
        self
    }

    #[must_use]
    pub fn with_in_list_mode(mut self, mode: InListMode) -> Self {
        self.in_list_mode = mode;
        self
    }
}

/// Compiles requests into statements.
///
/// # Examples
/// ```rust
/// use sqlite_wrapper::prelude::*;
///
/// let builder = QueryBuilder::default();
/// let qp = builder
///     .select(&SelectRequest::new("users").filter(WhereSpec::eq("name", "Ann")).into())
///     .unwrap();
/// assert_eq!(qp.query, "select * from users where name = ?");
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    options: BuilderOptions,
}

impl QueryBuilder {
    #[must_use]
    pub fn new(options: BuilderOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> BuilderOptions {
        self.options
    }

    pub fn set_log_queries(&mut self, log_queries: bool) {
        self.options.log_queries = log_queries;
    }

    /// # Errors
    /// Returns `MissingTable` when a structured request has no usable table.
    pub fn select(&self, input: &SelectInput) -> Result<QueryAndParams, SqlWrapperError> {
        let compiled = compile_select(input, self.options.in_list_mode);
        self.finish("select", compiled)
    }

    /// Infallible: a bad table name only fails once executed.
    #[must_use]
    pub fn insert(&self, table: &str, record: &Record) -> QueryAndParams {
        let qp = compile_insert(table, record);
        self.log("insert", &qp);
        qp
    }

    /// # Errors
    /// Returns `MissingTable` or `NoFieldsToUpdate`.
    pub fn update(
        &self,
        table: &str,
        changes: &Record,
        filter: Option<&WhereSpec>,
    ) -> Result<QueryAndParams, SqlWrapperError> {
        let compiled = compile_update(table, changes, filter, self.options.in_list_mode);
        self.finish("update", compiled)
    }

    /// # Errors
    /// Returns `MissingTable` when the table sanitizes to nothing.
    pub fn delete(
        &self,
        table: &str,
        filter: Option<&WhereSpec>,
    ) -> Result<QueryAndParams, SqlWrapperError> {
        let compiled = compile_delete(table, filter, self.options.in_list_mode);
        self.finish("delete", compiled)
    }

    fn finish(
        &self,
        operation: &'static str,
        compiled: Result<QueryAndParams, SqlWrapperError>,
    ) -> Result<QueryAndParams, SqlWrapperError> {
        match compiled {
            Ok(qp) => {
                self.log(operation, &qp);
                Ok(qp)
            }
            Err(err) => {
                tracing::error!(operation, error = %err, "rejected before execution");
                Err(err)
            }
        }
    }

    fn log(&self, operation: &'static str, qp: &QueryAndParams) {
        if self.options.log_queries {
            tracing::info!(
                target: "sqlite_wrapper::query",
                operation,
                sql = %qp.query,
                params = ?qp.params,
                "compiled statement"
            );
        }
    }
}
