use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Current mapping of field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    values: IndexMap<String, Value>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `name`; `null` counts as unset.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|value| !value.is_null())
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy containing only the listed entries.
    pub fn project(&self, names: &[String]) -> Snapshot {
        let values = names
            .iter()
            .filter_map(|name| {
                self.values
                    .get(name)
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect();
        Snapshot { values }
    }

    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Value::Object(map)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(
            object
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        )
    }
}

impl FromIterator<(String, Value)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(&str, Value); N]> for Snapshot {
    fn from(entries: [(&str, Value); N]) -> Self {
        entries
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn null_entries_read_as_unset() {
        let snapshot = Snapshot::from([("a", Value::Null), ("b", json!("x"))]);
        assert!(snapshot.contains("a"));
        assert_eq!(snapshot.get("a"), None);
        assert_eq!(snapshot.get_str("b"), Some("x"));
    }

    #[test]
    fn projection_keeps_only_declared_reads() {
        let snapshot = Snapshot::from([("a", json!(1)), ("b", json!(2)), ("c", json!(3))]);
        let projected = snapshot.project(&["c".to_string(), "missing".to_string()]);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected.get("c"), Some(&json!(3)));
    }

    #[test]
    fn converts_to_and_from_json_objects() {
        let snapshot = Snapshot::from([("name", json!("Avi")), ("age", json!(3))]);
        let value = snapshot.to_value();
        assert_eq!(value, json!({"name": "Avi", "age": 3}));
        assert_eq!(Snapshot::from_value(&value), Some(snapshot));
        assert_eq!(Snapshot::from_value(&json!([1])), None);
    }
}
