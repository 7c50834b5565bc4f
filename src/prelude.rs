//! Convenient imports for common functionality.

pub use crate::config::{WrapperOptions, WrapperOptionsBuilder};
pub use crate::error::SqlWrapperError;
pub use crate::executor::{SqlExecutor, StatementOutcome};
pub use crate::query::QueryAndParams;
pub use crate::query_builder::{
    BuilderOptions, CompiledWhere, EqualityMap, FieldList, InListMode, QueryBuilder, Record,
    SelectInput, SelectRequest, WhereSpec, WhereValue,
};
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::types::RowValues;
pub use crate::wrapper::SqliteWrapper;

#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteConnection;
