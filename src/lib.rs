//! Structured select/insert/update/delete requests compiled to parameterized SQL for SQLite.
//!
//! The [`query_builder`] turns requests into [`QueryAndParams`]; a [`SqlExecutor`] runs them.
//! [`SqliteWrapper`] ties the two together.

pub mod config;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod query;
pub mod query_builder;
pub mod results;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod types;
pub mod wrapper;

pub use config::{WrapperOptions, WrapperOptionsBuilder};
pub use error::SqlWrapperError;
pub use executor::{SqlExecutor, StatementOutcome};
pub use query::QueryAndParams;
pub use query_builder::{
    BuilderOptions, EqualityMap, FieldList, InListMode, QueryBuilder, Record, SelectInput,
    SelectRequest, WhereSpec, WhereValue,
};
pub use results::{CustomDbRow, ResultSet};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteConnection;
pub use types::RowValues;
pub use wrapper::SqliteWrapper;
