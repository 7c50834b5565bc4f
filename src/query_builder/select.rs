//! Select requests and their compilation.
//!
//! A select is either verbatim SQL or a [`SelectRequest`]; only the latter is compiled.

use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use crate::error::SqlWrapperError;
use crate::query::QueryAndParams;

use super::ident::safe_name;
use super::where_clause::{InListMode, WhereSpec, compile_where};

/// Column list of a select: either a preformatted string or a list of names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldList {
    Raw(String),
    Columns(Vec<String>),
}

impl FieldList {
    /// Render the list, falling back to `*` when it renders empty.
    #[must_use]
    pub fn render(&self) -> String {
        let rendered = match self {
            FieldList::Raw(s) => s.clone(),
            FieldList::Columns(cols) => cols.join(", "),
        };
        if rendered.is_empty() {
            "*".to_string()
        } else {
            rendered
        }
    }
}

impl From<&str> for FieldList {
    fn from(value: &str) -> Self {
        FieldList::Raw(value.to_owned())
    }
}

impl From<Vec<&str>> for FieldList {
    fn from(value: Vec<&str>) -> Self {
        FieldList::Columns(value.into_iter().map(str::to_owned).collect())
    }
}

impl From<Vec<String>> for FieldList {
    fn from(value: Vec<String>) -> Self {
        FieldList::Columns(value)
    }
}

/// Structured select.
///
/// `order`, `limit` and `offset` are only emitted when non-empty / non-zero, so
/// `limit(0)` is the same as no limit at all.
///
/// ```rust
/// use sqlite_wrapper::prelude::*;
///
/// let req = SelectRequest::new("users")
///     .fields(vec!["id", "name"])
///     .filter(WhereSpec::eq("active", true))
///     .order("name desc")
///     .limit(10);
/// # let _ = req;
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SelectRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub table: String,
    #[serde(default)]
    pub fields: Option<FieldList>,
    #[serde(default, rename = "where")]
    pub filter: Option<WhereSpec>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

impl SelectRequest {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn fields(mut self, fields: impl Into<FieldList>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: impl Into<WhereSpec>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

// A `null` table is treated like a missing one.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// What `select` accepts: verbatim SQL or a structured request.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectInput {
    Raw(String),
    Structured(SelectRequest),
}

impl From<&str> for SelectInput {
    fn from(value: &str) -> Self {
        SelectInput::Raw(value.to_owned())
    }
}

impl From<String> for SelectInput {
    fn from(value: String) -> Self {
        SelectInput::Raw(value)
    }
}

impl From<SelectRequest> for SelectInput {
    fn from(value: SelectRequest) -> Self {
        SelectInput::Structured(value)
    }
}

impl SelectInput {
    /// Interpret a dynamic JSON value: a string is raw SQL, an object is a [`SelectRequest`].
    ///
    /// # Errors
    /// Returns `InvalidArgument` for any other JSON value or an object that does not describe a
    /// request (for example a negative `limit`).
    pub fn from_json(value: &JsonValue) -> Result<Self, SqlWrapperError> {
        match value {
            JsonValue::String(sql) => Ok(SelectInput::Raw(sql.clone())),
            JsonValue::Object(_) => SelectRequest::deserialize(value)
                .map(SelectInput::Structured)
                .map_err(|e| SqlWrapperError::InvalidArgument(format!("bad select request: {e}"))),
            _ => Err(SqlWrapperError::InvalidArgument(
                "First argument in select must be either a string or an object".to_string(),
            )),
        }
    }
}

/// Compile a select into SQL and the where-clause parameters.
///
/// # Errors
/// Returns `MissingTable` when a structured request's table sanitizes to nothing.
pub fn compile_select(
    input: &SelectInput,
    mode: InListMode,
) -> Result<QueryAndParams, SqlWrapperError> {
    let req = match input {
        SelectInput::Raw(sql) => return Ok(QueryAndParams::new_without_params(sql.as_str())),
        SelectInput::Structured(req) => req,
    };

    let table = safe_name(&req.table).ok_or(SqlWrapperError::MissingTable {
        operation: "select",
    })?;
    let fields = req
        .fields
        .as_ref()
        .map_or_else(|| "*".to_string(), FieldList::render);
    let filter = compile_where(req.filter.as_ref(), mode);

    let mut sql = format!("select {fields} from {table}{}", filter.fragment);
    if let Some(order) = req.order.as_deref().filter(|o| !o.is_empty()) {
        sql.push_str(" order by ");
        sql.push_str(order);
    }
    if let Some(limit) = req.limit.filter(|n| *n != 0) {
        sql.push_str(&format!(" limit {limit}"));
    }
    if let Some(offset) = req.offset.filter(|n| *n != 0) {
        sql.push_str(&format!(" offset {offset}"));
    }

    Ok(QueryAndParams::new(sql, filter.params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::EqualityMap;
    use crate::types::RowValues;
    use serde_json::json;

    fn compile(req: SelectRequest) -> QueryAndParams {
        compile_select(&req.into(), InListMode::Inline).unwrap()
    }

    #[test]
    fn bare_table_selects_everything() {
        let qp = compile(SelectRequest::new("users"));
        assert_eq!(qp.query, "select * from users");
        assert!(qp.params.is_empty());
    }

    #[test]
    fn full_request_orders_clauses() {
        let qp = compile(
            SelectRequest::new("users")
                .fields(vec!["id", "name"])
                .filter(WhereSpec::eq("name", "Ann"))
                .order("name desc")
                .limit(10)
                .offset(20),
        );
        assert_eq!(
            qp.query,
            "select id, name from users where name = ? order by name desc limit 10 offset 20"
        );
        assert_eq!(qp.params, vec![RowValues::Text("Ann".into())]);
    }

    #[test]
    fn zero_limit_and_offset_are_dropped() {
        let qp = compile(
            SelectRequest::new("users")
                .filter(WhereSpec::eq("name", "Ann"))
                .limit(0)
                .offset(0)
                .order(""),
        );
        assert_eq!(qp.query, "select * from users where name = ?");
        assert_eq!(qp.params, vec![RowValues::Text("Ann".into())]);
    }

    #[test]
    fn membership_is_inlined() {
        let qp = compile(
            SelectRequest::new("users").filter(EqualityMap::new().is_in("id", [1, 2, 3])),
        );
        assert_eq!(qp.query, "select * from users where id IN (1,2,3)");
        assert!(qp.params.is_empty());
    }

    #[test]
    fn empty_field_lists_fall_back_to_star() {
        let qp = compile(SelectRequest::new("t").fields(""));
        assert_eq!(qp.query, "select * from t");
        let qp = compile(SelectRequest::new("t").fields(Vec::<String>::new()));
        assert_eq!(qp.query, "select * from t");
        let qp = compile(SelectRequest::new("t").fields("count(*) as n"));
        assert_eq!(qp.query, "select count(*) as n from t");
    }

    #[test]
    fn table_is_sanitized() {
        let qp = compile(SelectRequest::new("users; drop table users"));
        assert_eq!(qp.query, "select * from users");

        let err = compile_select(&SelectRequest::new("--x").into(), InListMode::Inline)
            .unwrap_err();
        assert!(matches!(
            err,
            SqlWrapperError::MissingTable {
                operation: "select"
            }
        ));
    }

    #[test]
    fn raw_sql_is_verbatim() {
        let qp = compile_select(&"select 1".into(), InListMode::Inline).unwrap();
        assert_eq!(qp, QueryAndParams::new_without_params("select 1"));
    }

    #[test]
    fn json_requests() {
        let input = SelectInput::from_json(&json!({
            "table": "users",
            "fields": ["id"],
            "where": {"name": "Ann"},
            "limit": 5
        }))
        .unwrap();
        let qp = compile_select(&input, InListMode::Inline).unwrap();
        assert_eq!(qp.query, "select id from users where name = ? limit 5");

        for missing in [json!({"where": {"a": 1}}), json!({"table": null, "where": {"a": 1}})] {
            let input = SelectInput::from_json(&missing).unwrap();
            assert!(matches!(
                compile_select(&input, InListMode::Inline),
                Err(SqlWrapperError::MissingTable {
                    operation: "select"
                })
            ));
        }

        for bad in [json!(1), json!(true), json!(null), json!([1])] {
            assert!(matches!(
                SelectInput::from_json(&bad),
                Err(SqlWrapperError::InvalidArgument(_))
            ));
        }
        assert!(matches!(
            SelectInput::from_json(&json!({"table": "t", "limit": -1})),
            Err(SqlWrapperError::InvalidArgument(_))
        ));
    }

    #[test]
    fn compiling_twice_is_identical() {
        let input: SelectInput = SelectRequest::new("users")
            .filter(EqualityMap::new().eq("a", 1).is_in("b", ["x"]))
            .limit(3)
            .into();
        let first = compile_select(&input, InListMode::Inline).unwrap();
        let second = compile_select(&input, InListMode::Inline).unwrap();
        assert_eq!(first, second);
    }
}
