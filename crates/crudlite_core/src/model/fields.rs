//! Ordered name/value mappings: insert/update payloads and equality filters.

use super::value::Value;

/// Insert or update payload: column name to value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `column` to `value`, replacing an earlier value for the same column.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        upsert(&mut self.fields, column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        lookup(&self.fields, column)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Equality filters, implicitly ANDed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    filters: Vec<(String, Value)>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `column = value`, replacing an earlier filter on the same column.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        upsert(&mut self.filters, column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        lookup(&self.filters, column)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.filters.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (column, value) in iter {
            record.set(column, value);
        }
        record
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Conditions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |conditions, (column, value)| conditions.eq(column, value))
    }
}

fn upsert(entries: &mut Vec<(String, Value)>, column: String, value: Value) {
    match entries.iter_mut().find(|(name, _)| *name == column) {
        Some(entry) => entry.1 = value,
        None => entries.push((column, value)),
    }
}

fn lookup<'a>(entries: &'a [(String, Value)], column: &str) -> Option<&'a Value> {
    entries
        .iter()
        .find(|(name, _)| name == column)
        .map(|(_, value)| value)
}
