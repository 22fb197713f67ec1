use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{FieldDescriptor, Propagation, SubmitHandler},
    form::{FormConfig, Snapshot},
};

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Serializable form definition: fields, edges, seed values and an optional schema.
///
/// Callbacks cannot be expressed in a document; everything else a
/// [`FormConfig`] carries can.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub propagations: Vec<Propagation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_values: Option<Snapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl FormDocument {
    /// Layers `values` over the document's own initial values.
    pub fn with_initial_values(mut self, values: Snapshot) -> Self {
        let mut merged = self.initial_values.take().unwrap_or_default();
        for (name, value) in values.iter() {
            merged.insert(name, value.clone());
        }
        self.initial_values = Some(merged);
        self
    }

    pub fn into_config(self, on_submit: SubmitHandler) -> FormConfig {
        let FormDocument {
            title: _,
            fields,
            propagations,
            initial_values,
            schema,
        } = self;
        let mut config = FormConfig::with_handler(fields, on_submit);
        config.propagations = propagations;
        config.initial_values = initial_values;
        config.schema = schema;
        config
    }
}

pub fn form_document_from_value(value: Value) -> Result<FormDocument> {
    serde_json::from_value(value).context("invalid form document")
}

pub fn parse_form_document(contents: &str, format: DocumentFormat) -> Result<FormDocument> {
    let value = parse_document_str(contents, format)?;
    form_document_from_value(value)
}
