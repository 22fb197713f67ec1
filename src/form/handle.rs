use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::SubmitHandler;

use super::{
    snapshot::Snapshot,
    store::{FormStore, SetValueOptions, ValueSetter},
    validation::{FormValidator, SubmitOutcome},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Rc<dyn Fn(&str, &Value)>;

/// Shared single-threaded access to a [`FormStore`].
///
/// Change notifications are delivered after the store borrow ends, so
/// subscribers may read from or write to the handle they observe.
#[derive(Clone, Default)]
pub struct FormHandle {
    store: Rc<RefCell<FormStore>>,
    subscribers: Rc<RefCell<Vec<(SubscriptionId, Subscriber)>>>,
    next_id: Rc<Cell<u64>>,
}

impl FormHandle {
    pub fn new(store: FormStore) -> Self {
        Self {
            store: Rc::new(RefCell::new(store)),
            ..Self::default()
        }
    }

    /// Full snapshot of the current values.
    pub fn watch(&self) -> Snapshot {
        self.store.borrow().values().clone()
    }

    pub fn get_value(&self, name: &str) -> Option<Value> {
        self.store.borrow().values().get(name).cloned()
    }

    pub fn set_value(&self, name: &str, value: Value, options: SetValueOptions) {
        self.update(|store| store.set_value(name, value, options));
    }

    pub fn read<R>(&self, f: impl FnOnce(&FormStore) -> R) -> R {
        f(&self.store.borrow())
    }

    /// Runs `f` against the store, then notifies subscribers of every write it made.
    pub fn update<R>(&self, f: impl FnOnce(&mut FormStore) -> R) -> R {
        let (result, changes) = {
            let mut store = self.store.borrow_mut();
            let result = f(&mut store);
            (result, store.take_changes())
        };
        self.notify(&changes);
        result
    }

    pub fn subscribe(&self, f: impl Fn(&str, &Value) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let subscriber: Subscriber = Rc::new(f);
        self.subscribers.borrow_mut().push((id, subscriber));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    pub fn is_dirty(&self) -> bool {
        self.store.borrow().is_dirty()
    }

    pub fn error(&self, name: &str) -> Option<String> {
        self.store.borrow().error(name).map(str::to_string)
    }

    pub fn errors(&self) -> IndexMap<String, String> {
        self.store.borrow().errors().clone()
    }

    pub fn global_errors(&self) -> Vec<String> {
        self.store.borrow().global_errors().to_vec()
    }

    pub fn error_count(&self) -> usize {
        self.store.borrow().error_count()
    }

    pub fn submit_count(&self) -> usize {
        self.store.borrow().submit_count()
    }

    pub fn reset(&self) {
        self.update(FormStore::reset);
    }

    /// Validates the current snapshot and hands it to `on_submit` when it passes.
    pub fn handle_submit(
        &self,
        validator: &FormValidator,
        on_submit: &SubmitHandler,
    ) -> SubmitOutcome {
        let snapshot = self.watch();
        let issues = validator.validate(&snapshot);
        self.update(|store| {
            store.record_submit_attempt();
            store.apply_issues(&issues);
        });
        if issues.is_empty() {
            tracing::info!(fields = snapshot.len(), "form submitted");
            on_submit.call(&snapshot);
            SubmitOutcome::Submitted(snapshot)
        } else {
            tracing::debug!(issues = issues.len(), "submission rejected");
            SubmitOutcome::Rejected(issues)
        }
    }

    fn notify(&self, changes: &[(String, Value)]) {
        if changes.is_empty() {
            return;
        }
        let subscribers = self.subscribers.borrow().clone();
        for (name, value) in changes {
            for (_, subscriber) in &subscribers {
                subscriber(name, value);
            }
        }
    }
}

impl fmt::Debug for FormHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormHandle")
            .field("store", &self.store)
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;

    #[test]
    fn subscribers_see_writes_and_may_read_back() {
        let handle = FormHandle::new(FormStore::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = handle.subscribe(move |name, value| {
            sink.lock().expect("lock").push((name.to_string(), value.clone()));
        });

        let reader = handle.clone();
        handle.subscribe(move |name, _| {
            assert!(reader.get_value(name).is_some());
        });

        handle.set_value("city", json!("Graz"), SetValueOptions::edit());
        assert_eq!(
            *seen.lock().expect("lock"),
            vec![("city".to_string(), json!("Graz"))]
        );

        assert!(handle.unsubscribe(id));
        handle.set_value("city", json!("Wien"), SetValueOptions::edit());
        assert_eq!(seen.lock().expect("lock").len(), 1);
        assert!(!handle.unsubscribe(id));
    }
}
