// SQLite executor.
//
// - connection: the shared rusqlite connection and its `SqlExecutor` impl
// - params: `RowValues` -> rusqlite value conversion
// - query: row extraction and result-set building

pub mod connection;
pub mod params;
pub mod query;

pub use connection::SqliteConnection;
pub use params::{Params, row_value_to_sqlite_value};
pub use query::build_result_set;
