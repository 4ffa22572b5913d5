//! The persisted key-value container.

use std::collections::BTreeMap;

use tracing::trace;

use crate::value::Value;

/// One stored entry: the accessor suffix it was written with, and the value.
#[derive(Debug, Clone, PartialEq)]
struct Entry {
    suffix: String,
    value: Option<Value>,
}

/// String-keyed store with one typed accessor per suffix.
///
/// A read with a suffix other than the one the entry was written with finds
/// nothing, the way the platform container logs a type warning and returns
/// null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundle {
    entries: BTreeMap<String, Entry>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// `put<Suffix>(key, value)`; `None` stores an explicit null.
    pub fn put(&mut self, suffix: &str, key: impl Into<String>, value: Option<Value>) {
        let key = key.into();
        trace!(%key, suffix, "bundle put");
        self.entries.insert(
            key,
            Entry {
                suffix: suffix.to_string(),
                value,
            },
        );
    }

    /// `get<Suffix>(key)` for reference types.
    pub fn get(&self, suffix: &str, key: &str) -> Option<&Value> {
        self.entries
            .get(key)
            .filter(|entry| entry.suffix == suffix)
            .and_then(|entry| entry.value.as_ref())
    }

    /// `get<Suffix>(key)` for primitives: the default value when missing.
    pub fn get_primitive(&self, suffix: &str, key: &str) -> Option<Value> {
        self.get(suffix, key)
            .cloned()
            .or_else(|| Value::primitive_default(suffix))
    }

    pub fn put_bundle(&mut self, key: impl Into<String>, bundle: Bundle) {
        self.put("Bundle", key, Some(Value::Bundle(bundle)));
    }

    pub fn get_bundle(&self, key: &str) -> Option<&Bundle> {
        match self.get("Bundle", key) {
            Some(Value::Bundle(bundle)) => Some(bundle),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_check_the_accessor() {
        let mut bundle = Bundle::new();
        bundle.put("Int", "count", Some(Value::Int(3)));
        assert_eq!(bundle.get("Int", "count"), Some(&Value::Int(3)));
        assert_eq!(bundle.get("Long", "count"), None);
        assert_eq!(bundle.get_primitive("Int", "missing"), Some(Value::Int(0)));
        assert_eq!(bundle.get_primitive("Long", "count"), Some(Value::Long(0)));
    }

    #[test]
    fn nested_bundles() {
        let mut inner = Bundle::new();
        inner.put("String", "name", Some("ada".into()));
        let mut outer = Bundle::new();
        outer.put_bundle("frag", inner.clone());
        assert_eq!(outer.get_bundle("frag"), Some(&inner));
        assert!(outer.get_bundle("other").is_none());
    }
}
