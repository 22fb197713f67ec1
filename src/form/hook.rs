use std::{fmt, rc::Rc};

use serde_json::Value;

use crate::{
    domain::{FieldDescriptor, FormDefinition, Propagation, SubmitHandler},
    error::FormError,
};

use super::{
    date,
    handle::FormHandle,
    snapshot::Snapshot,
    store::{FormStore, SetValueOptions},
    validation::{FieldIssue, FormValidator, SubmitOutcome},
};

/// Input of [`use_form`].
#[derive(Debug, Clone)]
pub struct FormConfig {
    pub fields: Vec<FieldDescriptor>,
    pub on_submit: SubmitHandler,
    pub initial_values: Option<Snapshot>,
    pub propagations: Vec<Propagation>,
    pub schema: Option<Value>,
    pub generate_defaults: bool,
}

impl FormConfig {
    pub fn new(
        fields: Vec<FieldDescriptor>,
        on_submit: impl Fn(&Snapshot) + Send + Sync + 'static,
    ) -> Self {
        Self::with_handler(fields, SubmitHandler::new(on_submit))
    }

    pub fn with_handler(fields: Vec<FieldDescriptor>, on_submit: SubmitHandler) -> Self {
        Self {
            fields,
            on_submit,
            initial_values: None,
            propagations: Vec::new(),
            schema: None,
            generate_defaults: false,
        }
    }

    pub fn with_initial_values(mut self, values: Snapshot) -> Self {
        self.initial_values = Some(values);
        self
    }

    pub fn with_propagation(mut self, propagation: Propagation) -> Self {
        self.propagations.push(propagation);
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Seed absent input fields with an empty value for their kind.
    pub fn with_generated_defaults(mut self, enabled: bool) -> Self {
        self.generate_defaults = enabled;
        self
    }
}

/// Everything the renderer needs: the fields plus bound accessors.
#[derive(Clone)]
pub struct FormProps {
    definition: Rc<FormDefinition>,
    handle: FormHandle,
    validator: Rc<FormValidator>,
    on_submit: SubmitHandler,
    initial_values: Option<Snapshot>,
}

impl FormProps {
    pub fn inputs(&self) -> &[FieldDescriptor] {
        self.definition.fields()
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn handle(&self) -> &FormHandle {
        &self.handle
    }

    pub fn initial_values(&self) -> Option<&Snapshot> {
        self.initial_values.as_ref()
    }

    pub fn watch(&self) -> Snapshot {
        self.handle.watch()
    }

    pub fn set_value(&self, name: &str, value: Value, options: SetValueOptions) {
        self.handle.set_value(name, value, options);
        if options.should_validate {
            self.revalidate();
        }
    }

    /// Runs validation and, when it passes, the caller's submit callback.
    pub fn submit(&self) -> SubmitOutcome {
        self.handle.handle_submit(&self.validator, &self.on_submit)
    }

    /// Refreshes field errors without submitting.
    pub fn revalidate(&self) -> Vec<FieldIssue> {
        let issues = self.validator.validate(&self.handle.watch());
        self.handle.update(|store| store.apply_issues(&issues));
        issues
    }

    pub fn reset(&self) {
        self.handle.reset();
    }
}

impl fmt::Debug for FormProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormProps")
            .field("inputs", &self.definition.len())
            .field("handle", &self.handle)
            .field("initial_values", &self.initial_values)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct UseFormResult {
    pub form_props: FormProps,
    /// Direct snapshot access for callers outside the renderer.
    pub watch: FormHandle,
}

/// Validates the field list, seeds the store and bundles the accessors.
pub fn use_form(config: FormConfig) -> Result<UseFormResult, FormError> {
    let FormConfig {
        fields,
        on_submit,
        initial_values,
        propagations,
        schema,
        generate_defaults,
    } = config;

    let definition = FormDefinition::new(fields, propagations)?;
    let validator = FormValidator::new(&definition, schema.as_ref())?;
    let defaults = seed_defaults(&definition, initial_values.as_ref(), generate_defaults);
    tracing::debug!(
        fields = definition.len(),
        seeded = defaults.len(),
        "form initialized"
    );

    let handle = FormHandle::new(FormStore::new(defaults));
    let form_props = FormProps {
        definition: Rc::new(definition),
        handle: handle.clone(),
        validator: Rc::new(validator),
        on_submit,
        initial_values,
    };
    Ok(UseFormResult {
        form_props,
        watch: handle,
    })
}

fn seed_defaults(
    definition: &FormDefinition,
    initial_values: Option<&Snapshot>,
    generate: bool,
) -> Snapshot {
    let mut defaults = initial_values.cloned().unwrap_or_default();
    for field in definition.fields() {
        match field {
            FieldDescriptor::Date(date) => {
                let seed = defaults
                    .get(&date.name)
                    .cloned()
                    .or_else(|| date.value.clone());
                if let Some(seed) = seed {
                    defaults.insert(date.name.clone(), date::normalize(&seed));
                }
            }
            FieldDescriptor::Autocomplete(autocomplete) => {
                if defaults.get(&autocomplete.name).is_none() {
                    let fallback = autocomplete
                        .value
                        .clone()
                        .or_else(|| autocomplete.style.default_value.clone());
                    if let Some(value) = fallback {
                        defaults.insert(autocomplete.name.clone(), value);
                    }
                }
            }
            _ => {}
        }

        if generate
            && let Some(name) = field.input_name()
            && !defaults.contains(name)
        {
            let empty = match field {
                FieldDescriptor::Text(_) => Value::String(String::new()),
                _ => Value::Null,
            };
            defaults.insert(name, empty);
        }
    }
    defaults
}
