use std::fmt;

use jsonschema::{Validator, validator_for};
use serde_json::Value;

use crate::{
    domain::{FieldDescriptor, FormDefinition},
    error::FormError,
};

use super::{date, snapshot::Snapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Field the issue belongs to; `None` for form-wide problems.
    pub name: Option<String>,
    pub message: String,
}

impl FieldIssue {
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: message.into(),
        }
    }

    pub fn global(message: impl Into<String>) -> Self {
        Self {
            name: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}: {}", self.message),
            None => write!(f, "<form>: {}", self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted(Snapshot),
    Rejected(Vec<FieldIssue>),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

#[derive(Debug, Clone)]
enum FieldRule {
    Required {
        name: String,
        label: String,
    },
    Date {
        name: String,
        disable_future: bool,
        disable_past: bool,
    },
}

/// Checks a snapshot before it is handed to the submit callback.
pub struct FormValidator {
    schema: Option<Validator>,
    rules: Vec<FieldRule>,
}

impl FormValidator {
    pub fn new(definition: &FormDefinition, schema: Option<&Value>) -> Result<Self, FormError> {
        let schema = schema
            .map(|schema| {
                validator_for(schema).map_err(|err| FormError::InvalidSchema {
                    message: err.to_string(),
                })
            })
            .transpose()?;

        let mut rules = Vec::new();
        for field in definition.fields() {
            let Some(name) = field.input_name() else {
                continue;
            };
            if field.required() {
                rules.push(FieldRule::Required {
                    name: name.to_string(),
                    label: field.label().to_string(),
                });
            }
            if let FieldDescriptor::Date(date) = field {
                rules.push(FieldRule::Date {
                    name: name.to_string(),
                    disable_future: date.disable_future,
                    disable_past: date.disable_past,
                });
            }
        }

        Ok(Self { schema, rules })
    }

    pub fn validate(&self, snapshot: &Snapshot) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        for rule in &self.rules {
            match rule {
                FieldRule::Required { name, label } => {
                    if is_blank(snapshot.get(name)) {
                        let label = if label.is_empty() { name } else { label };
                        issues.push(FieldIssue::field(name, format!("{label} is required")));
                    }
                }
                FieldRule::Date {
                    name,
                    disable_future,
                    disable_past,
                } => {
                    let Some(value) = snapshot.get(name).filter(|value| !is_blank(Some(value)))
                    else {
                        continue;
                    };
                    match date::parse_date(value) {
                        None => issues.push(FieldIssue::field(
                            name,
                            "expected a date (YYYY-MM-DD)",
                        )),
                        Some(parsed) => {
                            let today = date::today();
                            if *disable_future && parsed > today {
                                issues.push(FieldIssue::field(name, "date must not be in the future"));
                            } else if *disable_past && parsed < today {
                                issues.push(FieldIssue::field(name, "date must not be in the past"));
                            }
                        }
                    }
                }
            }
        }

        if let Some(schema) = &self.schema {
            let instance = snapshot.to_value();
            for error in schema.iter_errors(&instance) {
                let pointer = error.instance_path.to_string();
                let message = error.to_string();
                issues.push(match field_from_pointer(&pointer) {
                    Some(name) => FieldIssue::field(name, message),
                    None => FieldIssue::global(message),
                });
            }
        }

        issues
    }
}

impl fmt::Debug for FormValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormValidator")
            .field("schema", &self.schema.is_some())
            .field("rules", &self.rules)
            .finish()
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn field_from_pointer(pointer: &str) -> Option<String> {
    let segment = pointer.strip_prefix('/')?.split('/').next()?;
    if segment.is_empty() {
        return None;
    }
    Some(segment.replace("~1", "/").replace("~0", "~"))
}
