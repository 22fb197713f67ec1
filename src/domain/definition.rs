use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FormError;

use super::{callback::Transform, field::FieldDescriptor};

/// Declared edge: editing `source` also writes `target`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Propagation {
    pub source: String,
    pub target: String,
    #[serde(skip)]
    pub transform: Option<Transform>,
}

impl Propagation {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            transform: None,
        }
    }

    pub fn with_transform(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.transform = Some(Transform::new(f));
        self
    }

    pub fn apply(&self, value: &Value) -> Value {
        match &self.transform {
            Some(transform) => {
                let raw = match value {
                    Value::String(text) => text.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                Value::String(transform.call(&raw))
            }
            None => value.clone(),
        }
    }
}

/// Validated field list together with its propagation edges.
#[derive(Debug, Clone)]
pub struct FormDefinition {
    fields: Vec<FieldDescriptor>,
    propagations: Vec<Propagation>,
    positions: HashMap<String, usize>,
}

impl FormDefinition {
    pub fn new(
        fields: Vec<FieldDescriptor>,
        propagations: Vec<Propagation>,
    ) -> Result<Self, FormError> {
        let mut positions = HashMap::new();
        for (index, field) in fields.iter().enumerate() {
            let Some(name) = field.input_name() else {
                continue;
            };
            if let Some(first) = positions.insert(name.to_string(), index) {
                return Err(FormError::DuplicateName {
                    name: name.to_string(),
                    first,
                    second: index,
                });
            }
        }

        let mut edges = Vec::with_capacity(propagations.len());
        for field in &fields {
            if let FieldDescriptor::Text(text) = field
                && let Some(target) = &text.listen_to
            {
                edges.push(Propagation::new(text.name.clone(), target.clone()));
            }
        }
        edges.extend(propagations);

        for edge in &edges {
            for endpoint in [&edge.source, &edge.target] {
                if !positions.contains_key(endpoint) {
                    return Err(FormError::UnknownField {
                        source_name: edge.source.clone(),
                        target: edge.target.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
            if edge.source == edge.target {
                return Err(FormError::SelfPropagation {
                    name: edge.source.clone(),
                });
            }
        }

        Ok(Self {
            fields,
            propagations: edges,
            positions,
        })
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    pub fn input(&self, name: &str) -> Option<&FieldDescriptor> {
        self.position(name).and_then(|index| self.fields.get(index))
    }

    /// List position of the input field called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(FieldDescriptor::input_name)
    }

    pub fn propagations(&self) -> &[Propagation] {
        &self.propagations
    }

    pub fn propagations_from<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a Propagation> {
        self.propagations
            .iter()
            .filter(move |edge| edge.source == source)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{AutocompleteField, DateField, TextField, factory};

    #[test]
    fn rejects_duplicate_input_names() {
        let err = FormDefinition::new(
            vec![
                factory::text_field(TextField::new("email", "Email")),
                factory::header("Contact"),
                factory::date_picker(DateField::new("email", "Email date")),
            ],
            Vec::new(),
        )
        .expect_err("duplicate");
        assert_eq!(
            err,
            FormError::DuplicateName {
                name: "email".into(),
                first: 0,
                second: 2,
            }
        );
    }

    #[test]
    fn presentational_fields_may_share_labels() {
        let definition = FormDefinition::new(
            vec![
                factory::header("Details"),
                factory::divider_header("Details"),
                factory::divider(),
                factory::divider(),
            ],
            Vec::new(),
        )
        .expect("definition");
        assert_eq!(definition.len(), 4);
        assert_eq!(definition.input_names().count(), 0);
    }

    #[test]
    fn listen_targets_become_edges() {
        let definition = FormDefinition::new(
            vec![
                factory::text_field(TextField::new("a", "A").with_listen_to("b")),
                factory::text_field(TextField::new("b", "B")),
            ],
            Vec::new(),
        )
        .expect("definition");
        let edges: Vec<_> = definition.propagations_from("a").collect();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target, "b");
        assert_eq!(definition.propagations_from("b").count(), 0);
    }

    #[test]
    fn rejects_dangling_and_self_edges() {
        let fields = vec![
            factory::text_field(TextField::new("a", "A")),
            factory::autocomplete(AutocompleteField::new("c", "C", ["x"])),
        ];
        let err = FormDefinition::new(fields.clone(), vec![Propagation::new("a", "missing")])
            .expect_err("dangling");
        assert!(matches!(err, FormError::UnknownField { ref missing, .. } if missing == "missing"));

        let err = FormDefinition::new(fields, vec![Propagation::new("c", "c")])
            .expect_err("self edge");
        assert_eq!(err, FormError::SelfPropagation { name: "c".into() });
    }

    #[test]
    fn edge_transform_applies_to_string_form() {
        let edge = Propagation::new("a", "b").with_transform(|raw| format!("{raw}!"));
        assert_eq!(edge.apply(&json!("hi")), json!("hi!"));
        assert_eq!(edge.apply(&json!(3)), json!("3!"));
        assert_eq!(Propagation::new("a", "b").apply(&json!(3)), json!(3));
    }
}
