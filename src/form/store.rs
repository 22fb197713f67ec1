use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use super::{snapshot::Snapshot, validation::FieldIssue};

/// Write access to form values, handed to side effects and click handlers.
pub trait ValueSetter {
    fn set_value(&mut self, name: &str, value: Value, options: SetValueOptions);
    fn value(&self, name: &str) -> Option<&Value>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetValueOptions {
    /// Track the write against the field's default.
    pub should_dirty: bool,
    /// Re-run validation after the write. Honoured by [`FormProps::set_value`].
    ///
    /// [`FormProps::set_value`]: super::FormProps::set_value
    pub should_validate: bool,
}

impl SetValueOptions {
    /// Options used for writes that originate from user input.
    pub fn edit() -> Self {
        Self {
            should_dirty: true,
            ..Self::default()
        }
    }

    pub fn validated(mut self) -> Self {
        self.should_validate = true;
        self
    }
}

/// Values, defaults, dirty flags and errors of one form.
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    defaults: Snapshot,
    values: Snapshot,
    dirty: IndexSet<String>,
    errors: IndexMap<String, String>,
    global_errors: Vec<String>,
    submit_count: usize,
    changes: Vec<(String, Value)>,
}

impl FormStore {
    pub fn new(defaults: Snapshot) -> Self {
        Self {
            values: defaults.clone(),
            defaults,
            ..Self::default()
        }
    }

    pub fn values(&self) -> &Snapshot {
        &self.values
    }

    pub fn defaults(&self) -> &Snapshot {
        &self.defaults
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn is_field_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    pub fn dirty_fields(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn errors(&self) -> &IndexMap<String, String> {
        &self.errors
    }

    pub fn global_errors(&self) -> &[String] {
        &self.global_errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.len() + self.global_errors.len()
    }

    pub fn submit_count(&self) -> usize {
        self.submit_count
    }

    /// Replaces all recorded errors; the first issue per field wins.
    pub fn apply_issues(&mut self, issues: &[FieldIssue]) {
        self.clear_errors();
        for issue in issues {
            match &issue.name {
                Some(name) => {
                    self.errors
                        .entry(name.clone())
                        .or_insert_with(|| issue.message.clone());
                }
                None => self.global_errors.push(issue.message.clone()),
            }
        }
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
        self.global_errors.clear();
    }

    pub fn reset(&mut self) {
        let previous = std::mem::replace(&mut self.values, self.defaults.clone());
        for (name, value) in previous.iter() {
            let restored = self.values.get(name).cloned().unwrap_or(Value::Null);
            if restored != *value {
                self.changes.push((name.to_string(), restored));
            }
        }
        self.dirty.clear();
        self.clear_errors();
        tracing::debug!("form reset to defaults");
    }

    pub(crate) fn record_submit_attempt(&mut self) {
        self.submit_count += 1;
    }

    pub(crate) fn take_changes(&mut self) -> Vec<(String, Value)> {
        std::mem::take(&mut self.changes)
    }

    fn matches_default(&self, name: &str, value: &Value) -> bool {
        match self.defaults.get(name) {
            Some(default) => default == value,
            None => value.is_null(),
        }
    }
}

impl ValueSetter for FormStore {
    fn set_value(&mut self, name: &str, value: Value, options: SetValueOptions) {
        tracing::trace!(field = name, value = %value, "set value");
        if options.should_dirty {
            if self.matches_default(name, &value) {
                self.dirty.shift_remove(name);
            } else {
                self.dirty.insert(name.to_string());
            }
            self.errors.shift_remove(name);
        }
        self.values.insert(name, value.clone());
        self.changes.push((name.to_string(), value));
    }

    fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn dirty_tracks_distance_from_defaults() {
        let mut store = FormStore::new(Snapshot::from([("name", json!("Avi"))]));
        assert!(!store.is_dirty());

        store.set_value("name", json!("Bob"), SetValueOptions::edit());
        assert!(store.is_field_dirty("name"));

        store.set_value("name", json!("Avi"), SetValueOptions::edit());
        assert!(!store.is_dirty());

        store.set_value("other", json!("x"), SetValueOptions::default());
        assert!(!store.is_dirty(), "untracked writes never dirty the form");
        assert_eq!(store.values().get_str("other"), Some("x"));
    }

    #[test]
    fn edits_clear_that_fields_error() {
        let mut store = FormStore::new(Snapshot::new());
        store.apply_issues(&[
            FieldIssue::field("a", "bad"),
            FieldIssue::field("a", "worse"),
            FieldIssue::field("b", "bad"),
            FieldIssue::global("broken"),
        ]);
        assert_eq!(store.error("a"), Some("bad"));
        assert_eq!(store.error_count(), 3);

        store.set_value("a", json!("fixed"), SetValueOptions::edit());
        assert_eq!(store.error("a"), None);
        assert_eq!(store.error("b"), Some("bad"));
    }

    #[test]
    fn reset_restores_defaults_and_reports_changes() {
        let mut store = FormStore::new(Snapshot::from([("name", json!("Avi"))]));
        store.set_value("name", json!("Bob"), SetValueOptions::edit());
        store.set_value("extra", json!(1), SetValueOptions::edit());
        store.take_changes();

        store.reset();
        assert_eq!(store.values(), &Snapshot::from([("name", json!("Avi"))]));
        assert!(!store.is_dirty());
        let changes = store.take_changes();
        assert_eq!(
            changes,
            vec![
                ("name".to_string(), json!("Avi")),
                ("extra".to_string(), Value::Null),
            ]
        );
    }
}
