//! Field selection (`select=name,calories`)

use super::document::copy_path;
use serde_json::{Map, Value};

/// Field that is always returned, whatever the selection
pub const ID_FIELD: &str = "id";

/// Fields to include in returned documents; empty means the whole document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<String>,
}

impl Projection {
    /// Whole-document projection
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Split a comma separated selection, skipping blanks
    pub fn parse(raw: &str) -> Self {
        let fields = raw
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(String::from)
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn is_all(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whitespace delimited form, e.g. `name calories`
    pub fn to_directive(&self) -> String {
        self.fields.join(" ")
    }

    /// Reduce a document to the selected fields (plus `id`)
    pub fn apply(&self, doc: Value) -> Value {
        if self.is_all() {
            return doc;
        }

        let mut projected = Map::new();
        copy_path(&doc, &mut projected, ID_FIELD);
        for field in &self.fields {
            copy_path(&doc, &mut projected, field);
        }
        Value::Object(projected)
    }
}
