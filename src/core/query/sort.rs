//! Sort directives (`sort=-price,name`)

use super::document::{compare_values, lookup_path};
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// `1` / `-1`, as document stores expect
    pub fn as_i32(&self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Ordered sort keys; earlier keys take precedence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    /// Parse a comma separated directive. A leading `-` sorts descending.
    ///
    /// # Example
    /// ```
    /// use foods::core::query::{SortKey, SortSpec};
    ///
    /// let spec = SortSpec::parse("-name,calories");
    /// assert_eq!(spec.keys(), &[SortKey::desc("name"), SortKey::asc("calories")]);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let keys = raw
            .split(',')
            .map(str::trim)
            .filter_map(|part| match part.strip_prefix('-') {
                Some(field) if !field.is_empty() => Some(SortKey::desc(field)),
                Some(_) => None,
                None => {
                    let field = part.strip_prefix('+').unwrap_or(part);
                    (!field.is_empty()).then(|| SortKey::asc(field))
                }
            })
            .collect();
        Self { keys }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whitespace delimited form, e.g. `-name calories`
    pub fn to_directive(&self) -> String {
        self.keys
            .iter()
            .map(|key| match key.direction {
                SortDirection::Ascending => key.field.clone(),
                SortDirection::Descending => format!("-{}", key.field),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Compare two documents according to these keys
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        for key in &self.keys {
            let ord = compare_values(lookup_path(a, &key.field), lookup_path(b, &key.field));
            let ord = match key.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}
