//! Typed filter predicates
//!
//! Query strings describe filters in two shapes:
//!
//! - plain keys: `category=fruit` (equality; repeating the key means "any of")
//! - bracketed keys: `price[gt]=10`, `price[lte]=20`, `category[in]=fruit,veg`
//!
//! Both end up as a [`FilterPredicate`]: per field, a list of tagged
//! [`Condition`]s. Only the exact tokens `gt`, `gte`, `lt`, `lte` and `in` are
//! operators, so a field called `rating` or a value like `"light"` is never
//! mistaken for one.
//!
//! ```text
//! price[gt]=10&category=light
//!     => {"price": {"$gt": "10"}, "category": "light"}
//! ```

use super::document::{loose_cmp, loose_eq, lookup_path};
use super::params::{RawParameters, RawValue};
use crate::core::error::QueryError;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Comparison operators accepted inside brackets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl FilterOperator {
    /// Parse an exact operator token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "gt" => Some(FilterOperator::Gt),
            "gte" => Some(FilterOperator::Gte),
            "lt" => Some(FilterOperator::Lt),
            "lte" => Some(FilterOperator::Lte),
            "in" => Some(FilterOperator::In),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::In => "in",
        }
    }
}

/// A single condition on one field
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals(String),
    GreaterThan(String),
    GreaterOrEqual(String),
    LessThan(String),
    LessOrEqual(String),
    In(Vec<String>),
}

impl Condition {
    fn from_operator(operator: FilterOperator, value: String) -> Self {
        match operator {
            FilterOperator::Gt => Condition::GreaterThan(value),
            FilterOperator::Gte => Condition::GreaterOrEqual(value),
            FilterOperator::Lt => Condition::LessThan(value),
            FilterOperator::Lte => Condition::LessOrEqual(value),
            FilterOperator::In => Condition::In(split_list(&value)),
        }
    }

    /// The document store's tag for this condition (`$gt`, `$in`, ...)
    pub fn store_tag(&self) -> &'static str {
        match self {
            Condition::Equals(_) => "$eq",
            Condition::GreaterThan(_) => "$gt",
            Condition::GreaterOrEqual(_) => "$gte",
            Condition::LessThan(_) => "$lt",
            Condition::LessOrEqual(_) => "$lte",
            Condition::In(_) => "$in",
        }
    }

    /// The operand as JSON: a string, or an array of strings for `In`
    pub fn operand(&self) -> Value {
        match self {
            Condition::Equals(v)
            | Condition::GreaterThan(v)
            | Condition::GreaterOrEqual(v)
            | Condition::LessThan(v)
            | Condition::LessOrEqual(v) => Value::String(v.clone()),
            Condition::In(values) => {
                Value::Array(values.iter().cloned().map(Value::String).collect())
            }
        }
    }

    /// Evaluate against the field's stored value; a missing field never matches
    pub fn matches(&self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return false;
        };

        let ordered = |raw: &str, accept: fn(Ordering) -> bool| match value {
            Value::Array(items) => items
                .iter()
                .any(|item| loose_cmp(item, raw).is_some_and(accept)),
            _ => loose_cmp(value, raw).is_some_and(accept),
        };

        match self {
            Condition::Equals(raw) => loose_eq(value, raw),
            Condition::In(candidates) => candidates.iter().any(|raw| loose_eq(value, raw)),
            Condition::GreaterThan(raw) => ordered(raw, Ordering::is_gt),
            Condition::GreaterOrEqual(raw) => ordered(raw, Ordering::is_ge),
            Condition::LessThan(raw) => ordered(raw, Ordering::is_lt),
            Condition::LessOrEqual(raw) => ordered(raw, Ordering::is_le),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

fn bracket_key_regex() -> &'static Regex {
    static BRACKET_KEY: OnceLock<Regex> = OnceLock::new();
    BRACKET_KEY.get_or_init(|| {
        // field[op] or field[op][] ; an empty op (field[]) is a plain list
        Regex::new(r"^(?P<field>[^\[\]]+)\[(?P<op>[^\[\]]*)\](?:\[\])?$")
            .expect("bracket key pattern is valid")
    })
}

/// Per-field conditions that a document must all satisfy
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPredicate {
    fields: IndexMap<String, Vec<Condition>>,
}

impl FilterPredicate {
    /// An empty predicate matches every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition on `field`
    pub fn with(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.push(field, condition);
        self
    }

    pub fn push(&mut self, field: impl Into<String>, condition: Condition) {
        self.fields.entry(field.into()).or_default().push(condition);
    }

    /// Build from filter parameters (reserved directives already removed)
    pub fn from_params(params: &RawParameters) -> Result<Self, QueryError> {
        let mut predicate = Self::new();

        for (key, raw) in params.iter() {
            if !key.contains('[') && !key.contains(']') {
                predicate.push(key, plain_condition(raw));
                continue;
            }

            let captures =
                bracket_key_regex()
                    .captures(key)
                    .ok_or_else(|| QueryError::InvalidFilterSyntax {
                        key: key.to_string(),
                        message: "malformed bracket expression".to_string(),
                    })?;
            let field = &captures["field"];
            let token = &captures["op"];

            if token.is_empty() {
                let values = raw.values().into_iter().map(String::from).collect();
                predicate.push(field, Condition::In(values));
                continue;
            }

            let operator =
                FilterOperator::from_token(token).ok_or_else(|| QueryError::InvalidFilterSyntax {
                    key: key.to_string(),
                    message: format!("unknown operator '{}'", token),
                })?;

            let condition = match (operator, raw) {
                (FilterOperator::In, RawValue::Multi(values)) => {
                    Condition::In(values.iter().flat_map(|v| split_list(v)).collect())
                }
                (_, RawValue::Single(value)) => Condition::from_operator(operator, value.clone()),
                (_, RawValue::Multi(_)) => {
                    return Err(QueryError::InvalidFilterSyntax {
                        key: key.to_string(),
                        message: format!("operator '{}' expects a single value", token),
                    });
                }
            };
            predicate.push(field, condition);
        }

        Ok(predicate)
    }

    /// Build from the nested JSON form, e.g. `{"price": {"gt": "10"}}`
    ///
    /// A nested object must consist of operator tokens only.
    pub fn from_json(value: &Value) -> Result<Self, QueryError> {
        let object = value
            .as_object()
            .ok_or_else(|| QueryError::InvalidFilterSyntax {
                key: String::new(),
                message: "filter must be a JSON object".to_string(),
            })?;

        let mut predicate = Self::new();
        for (field, spec) in object {
            match spec {
                Value::Object(operators) => {
                    for (token, operand) in operators {
                        let operator = FilterOperator::from_token(token).ok_or_else(|| {
                            QueryError::InvalidFilterSyntax {
                                key: field.clone(),
                                message: format!("unknown operator '{}'", token),
                            }
                        })?;
                        let condition = match (operator, operand) {
                            (FilterOperator::In, Value::Array(items)) => Condition::In(
                                items
                                    .iter()
                                    .map(|item| scalar_to_string(field, item))
                                    .collect::<Result<_, _>>()?,
                            ),
                            _ => Condition::from_operator(
                                operator,
                                scalar_to_string(field, operand)?,
                            ),
                        };
                        predicate.push(field.clone(), condition);
                    }
                }
                Value::Array(items) => {
                    let values = items
                        .iter()
                        .map(|item| scalar_to_string(field, item))
                        .collect::<Result<_, _>>()?;
                    predicate.push(field.clone(), Condition::In(values));
                }
                scalar => {
                    predicate.push(
                        field.clone(),
                        Condition::Equals(scalar_to_string(field, scalar)?),
                    );
                }
            }
        }

        Ok(predicate)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of filtered fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: &str) -> Option<&[Condition]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Condition])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Canonical JSON form with store operator tags
    ///
    /// A lone equality stays a literal; everything else becomes an object of
    /// tagged operands. A tag repeated on one field goes into a root `$and`
    /// so no condition is lost.
    pub fn to_json(&self) -> Value {
        let mut root = Map::new();
        let mut overflow = Vec::new();
        for (field, conditions) in &self.fields {
            let rendered = match conditions.as_slice() {
                [Condition::Equals(value)] => Value::String(value.clone()),
                _ => {
                    let mut operators = Map::new();
                    for condition in conditions {
                        let tag = condition.store_tag();
                        if operators.contains_key(tag) {
                            let mut single = Map::new();
                            single.insert(tag.to_string(), condition.operand());
                            let mut clause = Map::new();
                            clause.insert(field.clone(), Value::Object(single));
                            overflow.push(Value::Object(clause));
                        } else {
                            operators.insert(tag.to_string(), condition.operand());
                        }
                    }
                    Value::Object(operators)
                }
            };
            root.insert(field.clone(), rendered);
        }
        if !overflow.is_empty() {
            root.insert("$and".to_string(), Value::Array(overflow));
        }
        Value::Object(root)
    }

    /// Whether `doc` satisfies every condition
    pub fn matches(&self, doc: &Value) -> bool {
        self.fields.iter().all(|(field, conditions)| {
            let value = lookup_path(doc, field);
            conditions.iter().all(|condition| condition.matches(value))
        })
    }
}

fn plain_condition(raw: &RawValue) -> Condition {
    match raw {
        RawValue::Single(value) => Condition::Equals(value.clone()),
        RawValue::Multi(values) => Condition::In(values.clone()),
    }
}

fn scalar_to_string(field: &str, value: &Value) -> Result<String, QueryError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(QueryError::InvalidFilterSyntax {
            key: field.to_string(),
            message: "operands must be strings, numbers or booleans".to_string(),
        }),
    }
}
