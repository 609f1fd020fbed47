//! Raw request parameters as they arrive from the query string

use indexmap::IndexMap;

/// Parameter names that steer projection, sorting and pagination.
/// Everything else is a filter key.
pub const RESERVED_PARAMS: [&str; 4] = ["select", "sort", "page", "limit"];

/// A single parameter value; repeated keys collapse into `Multi`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Single(String),
    Multi(Vec<String>),
}

impl RawValue {
    /// First value, used for directives that take a single string
    pub fn first(&self) -> Option<&str> {
        match self {
            RawValue::Single(s) => Some(s),
            RawValue::Multi(values) => values.first().map(String::as_str),
        }
    }

    /// All values in order of appearance
    pub fn values(&self) -> Vec<&str> {
        match self {
            RawValue::Single(s) => vec![s.as_str()],
            RawValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            RawValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = RawValue::Multi(vec![first, value]);
            }
            RawValue::Multi(values) => values.push(value),
        }
    }
}

/// Ordered mapping from parameter name to value
///
/// # Example
/// ```rust,ignore
/// // GET /api/v1/foods?category=fruit&price[gt]=2&select=name,price&page=2
/// let params = RawParameters::from_pairs(pairs);
/// assert_eq!(params.get_str("page"), Some("2"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParameters {
    entries: IndexMap<String, RawValue>,
}

impl RawParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from decoded `(key, value)` query pairs, merging repeated keys
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.append(key, value);
        }
        params
    }

    /// Add a value, turning the entry into `Multi` if the key is already set
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.entries.entry(key.into()) {
            indexmap::map::Entry::Occupied(mut entry) => entry.get_mut().push(value),
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(RawValue::Single(value));
            }
        }
    }

    /// Replace any existing value for `key`
    pub fn insert(&mut self, key: impl Into<String>, value: RawValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.get(key)
    }

    /// First value for `key`
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(RawValue::first)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy of these parameters without the reserved directive names
    pub fn filter_params(&self) -> RawParameters {
        let entries = self
            .entries
            .iter()
            .filter(|(key, _)| !RESERVED_PARAMS.contains(&key.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        RawParameters { entries }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
