use crate::types::RowValues;

/// A SQL string and its bound parameters bundled together.
///
/// Every builder operation produces one of these; the placeholders in `query` are positional
/// `?` markers matched in order against `params`:
/// ```rust
/// use sqlite_wrapper::prelude::*;
///
/// let qp = QueryAndParams::new(
///     "insert into t (id, name) values (?, ?)",
///     vec![RowValues::Int(1), RowValues::Text("alice".into())],
/// );
/// assert_eq!(qp.placeholder_count(), qp.params.len());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAndParams {
    /// The SQL query string
    pub query: String,
    /// The parameters to be bound to the query
    pub params: Vec<RowValues>,
}

impl QueryAndParams {
    /// Create a new `QueryAndParams` with the given query string and parameters
    pub fn new(query: impl Into<String>, params: Vec<RowValues>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }

    /// Create a new `QueryAndParams` with no parameters
    pub fn new_without_params(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: Vec::new(),
        }
    }

    /// Number of `?` characters in the statement text.
    ///
    /// This is a plain character count: a `?` inside an inlined string literal counts too.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.query.matches('?').count()
    }
}
