use std::{fmt, sync::Arc};

use serde_json::Value;

use crate::form::{Snapshot, ValueSetter};

use super::FieldOverrides;

macro_rules! callback {
    ($(#[$meta:meta])* $name:ident, Fn($($arg:ident: $ty:ty),*) $(-> $ret:ty)?) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(Arc<dyn Fn($($ty),*) $(-> $ret)? + Send + Sync>);

        impl $name {
            pub fn new(f: impl Fn($($ty),*) $(-> $ret)? + Send + Sync + 'static) -> Self {
                Self(Arc::new(f))
            }

            pub fn call(&self, $($arg: $ty),*) $(-> $ret)? {
                (self.0)($($arg),*)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($name), "(..)"))
            }
        }
    };
}

callback!(
    /// Rewrites raw text input before it reaches the store.
    Transform,
    Fn(raw: &str) -> String
);

callback!(
    /// Observes the transformed value of a text edit.
    OnChange,
    Fn(value: &Value)
);

callback!(
    /// Cross-field logic run after an edit, with write access to the store.
    SideEffect,
    Fn(setter: &mut dyn ValueSetter, value: &Value, snapshot: &Snapshot)
);

callback!(
    OnClick,
    Fn(setter: &mut dyn ValueSetter, snapshot: &Snapshot)
);

callback!(
    /// Receives the validated snapshot when a form is submitted.
    SubmitHandler,
    Fn(snapshot: &Snapshot)
);

/// Render-time overrides computed from a declared subset of the snapshot.
///
/// `compute` only ever sees the entries named in `reads`, so every value the
/// overrides depend on has to be listed up front.
#[derive(Clone)]
pub struct DerivedProps {
    reads: Vec<String>,
    compute: Arc<dyn Fn(&Snapshot) -> FieldOverrides + Send + Sync>,
}

impl DerivedProps {
    pub fn new<I, S>(
        reads: I,
        compute: impl Fn(&Snapshot) -> FieldOverrides + Send + Sync + 'static,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reads: reads.into_iter().map(Into::into).collect(),
            compute: Arc::new(compute),
        }
    }

    pub fn reads(&self) -> &[String] {
        &self.reads
    }

    pub fn evaluate(&self, snapshot: &Snapshot) -> FieldOverrides {
        let projected = snapshot.project(&self.reads);
        (self.compute)(&projected)
    }
}

impl fmt::Debug for DerivedProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedProps")
            .field("reads", &self.reads)
            .finish_non_exhaustive()
    }
}
