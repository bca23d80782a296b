use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Number of probe rounds made for numbered alternates before a repeated key
/// falls back to overwriting the original slot.
pub const COLLISION_PROBES: usize = 5;

/// A parsed audit record: insertion-ordered fields with string or nested values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Record(Record),
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    /// Plain insert that replaces any existing value for `key`
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Store a field, resolving repeated keys with numbered alternates.
    ///
    /// The first repeat of `key` lands in `key_1`, later repeats in `key_2`
    /// through `key_4`. Once those are taken the original `key` slot is
    /// overwritten and its first value is lost; `key_5` is never used.
    /// Empty keys are ignored.
    pub fn set_field(&mut self, key: &str, value: impl Into<Value>) {
        if key.is_empty() {
            return;
        }
        let value = value.into();
        if !self.fields.contains_key(key) {
            self.fields.insert(key.to_string(), value);
            return;
        }

        // The probed suffix trails the round counter by one, so the first two
        // rounds both look at `key_1`.
        let mut candidate = format!("{}_1", key);
        for round in 1..=COLLISION_PROBES {
            if !self.fields.contains_key(&candidate) {
                self.fields.insert(candidate, value);
                return;
            }
            candidate = format!("{}_{}", key, round);
        }
        self.fields.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn get_record(&self, key: &str) -> Option<&Record> {
        self.fields.get(key).and_then(Value::as_record)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Record(_) => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            Value::String(_) => None,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Record(r) => write!(f, "{}", r.to_json()),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
