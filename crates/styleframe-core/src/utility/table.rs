//! Ordered suffix → value tables.

use crate::value::Value;

/// A mapping of suffix to value that remembers insertion order.
///
/// Key order determines the emission order of the generated selectors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValueTable {
    entries: Vec<(String, Value)>,
}

impl ValueTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, suffix: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(suffix, value);
        self
    }

    /// Insert or replace an entry. Returns the previous value; a replaced
    /// entry keeps its position.
    pub fn insert(&mut self, suffix: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let suffix = suffix.into();
        let value = value.into();
        match self.position(&suffix) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.entries.push((suffix, value));
                None
            }
        }
    }

    /// Insert or replace an entry and return its position.
    pub fn upsert(&mut self, suffix: impl Into<String>, value: impl Into<Value>) -> usize {
        let suffix = suffix.into();
        match self.position(&suffix) {
            Some(index) => {
                self.entries[index].1 = value.into();
                index
            }
            None => {
                self.entries.push((suffix, value.into()));
                self.entries.len() - 1
            }
        }
    }

    /// Get a value by suffix.
    pub fn get(&self, suffix: &str) -> Option<&Value> {
        self.position(suffix).map(|i| &self.entries[i].1)
    }

    /// Position of `suffix` in key order.
    pub fn position(&self, suffix: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == suffix)
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (suffix, value) in iter {
            table.insert(suffix, value);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_keeps_position() {
        let mut table: ValueTable = [("sm", "4px"), ("md", "8px")].into_iter().collect();
        assert_eq!(table.insert("sm", "2px"), Some(Value::from("4px")));

        let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["sm", "md"]);
        assert_eq!(table.position("md"), Some(1));
    }
}
