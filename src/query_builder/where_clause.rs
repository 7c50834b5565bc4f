//! Where-clause compilation.
//!
//! A [`WhereSpec`] is either an equality map (`field -> value`, ANDed) or a raw clause with its
//! own positional parameters. Compiling one yields a [`CompiledWhere`]: an empty fragment or
//! `" where " + conditions`, plus the parameters for its placeholders.

use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use crate::error::SqlWrapperError;
use crate::types::RowValues;

/// How array values in an equality map are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InListMode {
    /// Inline the elements as literals: `id IN (1,2,3)`, no parameters.
    ///
    /// Elements are not escaped. Only use this with trusted values.
    #[default]
    Inline,
    /// Bind each element: `id IN (?,?,?)` with one parameter per element.
    Parameterized,
}

/// Right-hand side of one equality-map entry.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereValue {
    /// `field = ?`
    Scalar(RowValues),
    /// `field IN (...)`
    List(Vec<RowValues>),
}

impl WhereValue {
    pub fn scalar(value: impl Into<RowValues>) -> Self {
        WhereValue::Scalar(value.into())
    }

    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        WhereValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Ordered `field -> value` conditions, ANDed together.
///
/// Setting a field twice replaces the value but keeps its original position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EqualityMap {
    entries: Vec<(String, WhereValue)>,
}

impl EqualityMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality test.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.insert(field, WhereValue::scalar(value));
        self
    }

    /// Add a membership test.
    #[must_use]
    pub fn is_in<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        self.insert(field, WhereValue::list(values));
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: WhereValue) {
        let field = field.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == field) {
            slot.1 = value;
        } else {
            self.entries.push((field, value));
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WhereValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A where specification.
///
/// ```rust
/// use sqlite_wrapper::prelude::*;
///
/// let by_name = WhereSpec::from(EqualityMap::new().eq("name", "Ann"));
/// let raw = WhereSpec::raw("name like ? or surname like ?", vec!["A%".into(), "B%".into()]);
/// # let _ = (by_name, raw);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum WhereSpec {
    Equality(EqualityMap),
    Raw {
        clause: String,
        params: Vec<RowValues>,
    },
}

impl Default for WhereSpec {
    fn default() -> Self {
        WhereSpec::Equality(EqualityMap::default())
    }
}

impl From<EqualityMap> for WhereSpec {
    fn from(map: EqualityMap) -> Self {
        WhereSpec::Equality(map)
    }
}

impl WhereSpec {
    /// Single equality test, `field = ?`.
    pub fn eq(field: impl Into<String>, value: impl Into<RowValues>) -> Self {
        WhereSpec::Equality(EqualityMap::new().eq(field, value))
    }

    /// Raw clause used verbatim. An empty clause means "no filter".
    pub fn raw(clause: impl Into<String>, params: Vec<RowValues>) -> Self {
        let clause = clause.into();
        if clause.is_empty() {
            WhereSpec::default()
        } else {
            WhereSpec::Raw { clause, params }
        }
    }

    /// Build a `WhereSpec` from a dynamic JSON value.
    ///
    /// An object with a non-empty string `clause` is a raw clause (its optional `params` must
    /// be an array); any other object is an equality map in key order, where array values become
    /// membership tests. `null` and `""` mean no filter.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for values that are not objects, and `ParameterError` when a
    /// raw clause carries non-array `params`.
    pub fn from_json(value: &JsonValue) -> Result<Self, SqlWrapperError> {
        let obj = match value {
            JsonValue::Null => return Ok(WhereSpec::default()),
            JsonValue::String(s) if s.is_empty() => return Ok(WhereSpec::default()),
            JsonValue::Object(obj) => obj,
            other => {
                return Err(SqlWrapperError::InvalidArgument(format!(
                    "where must be an object, got {other}"
                )));
            }
        };

        if let Some(JsonValue::String(clause)) = obj.get("clause")
            && !clause.is_empty()
        {
            let params = match obj.get("params") {
                None | Some(JsonValue::Null) => Vec::new(),
                Some(JsonValue::Array(items)) => {
                    items.iter().cloned().map(RowValues::from).collect()
                }
                Some(other) => {
                    return Err(SqlWrapperError::ParameterError(format!(
                        "where.params must be an array, got {other}"
                    )));
                }
            };
            return Ok(WhereSpec::Raw {
                clause: clause.clone(),
                params,
            });
        }

        let mut map = EqualityMap::new();
        for (field, value) in obj {
            let value = match value {
                JsonValue::Array(items) => {
                    WhereValue::List(items.iter().cloned().map(RowValues::from).collect())
                }
                scalar => WhereValue::Scalar(RowValues::from(scalar.clone())),
            };
            map.insert(field.clone(), value);
        }
        Ok(WhereSpec::Equality(map))
    }
}

impl<'de> Deserialize<'de> for WhereSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        WhereSpec::from_json(&value).map_err(serde::de::Error::custom)
    }
}

/// Output of [`compile_where`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledWhere {
    /// `""` or `" where ..."`
    pub fragment: String,
    pub params: Vec<RowValues>,
}

impl CompiledWhere {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragment.is_empty()
    }
}

/// Compile an optional where spec.
///
/// Raw clauses pass through untouched; no check is made that their placeholder count matches
/// their parameters. Equality-map scalars become `field = ?`. Equality-map lists follow `mode`.
#[must_use]
pub fn compile_where(spec: Option<&WhereSpec>, mode: InListMode) -> CompiledWhere {
    match spec {
        None => CompiledWhere::default(),
        Some(WhereSpec::Raw { clause, params }) => {
            if clause.is_empty() {
                return CompiledWhere::default();
            }
            CompiledWhere {
                fragment: format!(" where {clause}"),
                params: params.clone(),
            }
        }
        Some(WhereSpec::Equality(map)) => {
            let mut terms = Vec::with_capacity(map.len());
            let mut params = Vec::new();
            for (field, value) in map.iter() {
                match value {
                    WhereValue::Scalar(v) => {
                        terms.push(format!("{field} = ?"));
                        params.push(v.clone());
                    }
                    WhereValue::List(values) => match mode {
                        InListMode::Inline => {
                            terms.push(format!("{field} IN ({})", inline_list(values)));
                        }
                        InListMode::Parameterized => {
                            let marks = vec!["?"; values.len()].join(",");
                            terms.push(format!("{field} IN ({marks})"));
                            params.extend(values.iter().cloned());
                        }
                    },
                }
            }
            if terms.is_empty() {
                CompiledWhere::default()
            } else {
                CompiledWhere {
                    fragment: format!(" where {}", terms.join(" and ")),
                    params,
                }
            }
        }
    }
}

// Quoting is decided by the first element only.
fn inline_list(values: &[RowValues]) -> String {
    let quoted = values.first().is_some_and(RowValues::is_string_like);
    values
        .iter()
        .map(|v| {
            let literal = literal(v);
            if quoted {
                format!("\"{literal}\"")
            } else {
                literal
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

// Non-finite floats have no SQL literal form and render as `null`.
fn literal(value: &RowValues) -> String {
    match value {
        RowValues::Int(i) => i.to_string(),
        RowValues::Float(f) if !f.is_finite() => "null".to_string(),
        RowValues::Float(f) => f.to_string(),
        RowValues::Text(s) => s.clone(),
        RowValues::Bool(b) => i64::from(*b).to_string(),
        RowValues::Timestamp(dt) => dt.format("%F %T%.f").to_string(),
        RowValues::Null => "null".to_string(),
        RowValues::JSON(json) => json.to_string(),
        RowValues::Blob(bytes) => {
            let hex: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
            format!("X'{hex}'")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile(spec: &WhereSpec) -> CompiledWhere {
        compile_where(Some(spec), InListMode::Inline)
    }

    #[test]
    fn absent_and_empty_specs_compile_to_nothing() {
        assert_eq!(compile_where(None, InListMode::Inline), CompiledWhere::default());
        assert!(compile(&WhereSpec::default()).is_empty());
        assert!(compile(&WhereSpec::raw("", vec![RowValues::Int(1)])).is_empty());
    }

    #[test]
    fn scalars_become_placeholders_in_key_order() {
        let spec = WhereSpec::from(EqualityMap::new().eq("name", "Ann").eq("age", 30));
        let out = compile(&spec);
        assert_eq!(out.fragment, " where name = ? and age = ?");
        assert_eq!(
            out.params,
            vec![RowValues::Text("Ann".into()), RowValues::Int(30)]
        );
        assert_eq!(out.fragment.matches('?').count(), out.params.len());
    }

    #[test]
    fn raw_clause_passes_through() {
        let params = vec![RowValues::Text("A%".into()), RowValues::Text("B%".into())];
        let spec = WhereSpec::raw("name like ? OR surname like ?", params.clone());
        let out = compile(&spec);
        assert_eq!(out.fragment, " where name like ? OR surname like ?");
        assert_eq!(out.params, params);
    }

    #[test]
    fn lists_are_inlined_by_default() {
        let spec = WhereSpec::from(EqualityMap::new().is_in("id", [1, 2, 3]));
        let out = compile(&spec);
        assert_eq!(out.fragment, " where id IN (1,2,3)");
        assert!(out.params.is_empty());
    }

    #[test]
    fn string_lists_are_double_quoted_without_escaping() {
        let spec = WhereSpec::from(EqualityMap::new().is_in("name", ["Ann", "Bo\"b"]));
        assert_eq!(compile(&spec).fragment, " where name IN (\"Ann\",\"Bo\"b\")");
    }

    #[test]
    fn first_element_decides_quoting() {
        let mixed = WhereSpec::from(EqualityMap::new().is_in(
            "v",
            vec![RowValues::Int(1), RowValues::Text("x".into())],
        ));
        assert_eq!(compile(&mixed).fragment, " where v IN (1,x)");

        let mixed = WhereSpec::from(EqualityMap::new().is_in(
            "v",
            vec![RowValues::Text("x".into()), RowValues::Int(1)],
        ));
        assert_eq!(compile(&mixed).fragment, " where v IN (\"x\",\"1\")");
    }

    #[test]
    fn parameterized_mode_binds_list_elements() {
        let spec = WhereSpec::from(
            EqualityMap::new()
                .eq("active", true)
                .is_in("id", [4, 5, 6]),
        );
        let out = compile_where(Some(&spec), InListMode::Parameterized);
        assert_eq!(out.fragment, " where active = ? and id IN (?,?,?)");
        assert_eq!(
            out.params,
            vec![
                RowValues::Bool(true),
                RowValues::Int(4),
                RowValues::Int(5),
                RowValues::Int(6)
            ]
        );
    }

    #[test]
    fn inline_literals_per_value_type() {
        let seen = chrono::NaiveDateTime::parse_from_str("2024-01-01 08:00:01", "%F %T").unwrap();
        let spec = WhereSpec::from(
            EqualityMap::new()
                .is_in("f", [1.5, -0.25])
                .is_in("b", [true, false])
                .is_in("n", [RowValues::Null, RowValues::Int(2)])
                .is_in("x", [RowValues::Blob(vec![0xde, 0xad, 0x01])]),
        );
        let out = compile(&spec);
        assert_eq!(
            out.fragment,
            " where f IN (1.5,-0.25) and b IN (1,0) and n IN (null,2) and x IN (X'DEAD01')"
        );
        assert!(out.params.is_empty());

        let spec = WhereSpec::from(EqualityMap::new().is_in(
            "seen",
            [RowValues::Timestamp(seen), RowValues::Text("later".into())],
        ));
        assert_eq!(
            compile(&spec).fragment,
            " where seen IN (\"2024-01-01 08:00:01\",\"later\")"
        );
    }

    #[test]
    fn quoting_follows_the_first_element() {
        let spec = WhereSpec::from(EqualityMap::new().is_in(
            "v",
            [RowValues::Int(1), RowValues::Text("a".into())],
        ));
        assert_eq!(compile(&spec).fragment, " where v IN (1,a)");

        let spec = WhereSpec::from(EqualityMap::new().is_in(
            "v",
            [RowValues::Text("a".into()), RowValues::Bool(true)],
        ));
        assert_eq!(compile(&spec).fragment, " where v IN (\"a\",\"1\")");
    }

    #[test]
    fn non_finite_floats_inline_as_null() {
        let spec = WhereSpec::from(
            EqualityMap::new().is_in("f", [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 2.5]),
        );
        assert_eq!(compile(&spec).fragment, " where f IN (null,null,null,2.5)");

        let out = compile_where(Some(&spec), InListMode::Parameterized);
        assert_eq!(out.fragment, " where f IN (?,?,?,?)");
        assert!(out.params[3].as_float().is_some_and(|f| (f - 2.5).abs() < f64::EPSILON));
    }

    #[test]
    fn empty_list_renders_empty_set() {
        let spec = WhereSpec::from(EqualityMap::new().is_in("id", Vec::<i64>::new()));
        assert_eq!(compile(&spec).fragment, " where id IN ()");
        let out = compile_where(Some(&spec), InListMode::Parameterized);
        assert_eq!(out.fragment, " where id IN ()");
        assert!(out.params.is_empty());
    }

    #[test]
    fn json_with_clause_is_raw() {
        let spec = WhereSpec::from_json(&json!({"clause": "a > ?", "params": [5]})).unwrap();
        assert_eq!(
            spec,
            WhereSpec::Raw {
                clause: "a > ?".into(),
                params: vec![RowValues::Int(5)]
            }
        );

        let no_params = WhereSpec::from_json(&json!({"clause": "a is null"})).unwrap();
        assert_eq!(compile(&no_params).params, Vec::<RowValues>::new());
    }

    #[test]
    fn json_with_empty_clause_is_an_equality_map() {
        let spec = WhereSpec::from_json(&json!({"clause": "", "name": "Ann"})).unwrap();
        let out = compile(&spec);
        assert_eq!(out.fragment, " where clause = ? and name = ?");
        assert_eq!(
            out.params,
            vec![RowValues::Text(String::new()), RowValues::Text("Ann".into())]
        );
    }

    #[test]
    fn json_map_keeps_key_order_and_lists() {
        let spec = WhereSpec::from_json(&json!({"z": 1, "a": ["x", "y"], "m": null})).unwrap();
        let out = compile(&spec);
        assert_eq!(out.fragment, " where z = ? and a IN (\"x\",\"y\") and m = ?");
        assert_eq!(out.params, vec![RowValues::Int(1), RowValues::Null]);
    }

    #[test]
    fn json_rejects_non_objects() {
        assert!(matches!(
            WhereSpec::from_json(&json!(5)),
            Err(SqlWrapperError::InvalidArgument(_))
        ));
        assert!(matches!(
            WhereSpec::from_json(&json!({"clause": "a = ?", "params": 1})),
            Err(SqlWrapperError::ParameterError(_))
        ));
        assert_eq!(WhereSpec::from_json(&json!(null)).unwrap(), WhereSpec::default());
    }
}
