use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use super::DocumentFormat;

/// Destination for the submitted form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }

    /// `-` means stdout, anything else is a file path.
    pub fn from_spec(spec: &str) -> Self {
        if spec == "-" {
            OutputDestination::Stdout
        } else {
            OutputDestination::file(spec)
        }
    }

    /// Format implied by a file extension; stdout has none.
    pub fn format_hint(&self) -> Option<DocumentFormat> {
        match self {
            OutputDestination::Stdout => None,
            OutputDestination::File(path) => path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(DocumentFormat::from_extension),
        }
    }
}

/// Controls how the submitted snapshot is serialized after the UI closes.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }

    pub fn add_destination(mut self, destination: OutputDestination) -> Self {
        self.destinations.push(destination);
        self
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::Json)
    }
}

/// Serialize and write `value` to every configured destination.
pub fn emit(value: &Value, options: &OutputOptions) -> Result<()> {
    if options.destinations.is_empty() {
        return Ok(());
    }
    let payload = serialize_value(value, options)?;
    for destination in &options.destinations {
        write_payload(destination, &payload).with_context(|| match destination {
            OutputDestination::Stdout => "failed to write to stdout".to_string(),
            OutputDestination::File(path) => {
                format!("failed to write to file {}", path.display())
            }
        })?;
    }
    tracing::debug!(
        format = %options.format,
        destinations = options.destinations.len(),
        "form values emitted"
    );
    Ok(())
}

fn serialize_value(value: &Value, options: &OutputOptions) -> Result<String> {
    match options.format {
        DocumentFormat::Json => {
            if options.pretty {
                serde_json::to_string_pretty(value).context("failed to serialize JSON")
            } else {
                serde_json::to_string(value).context("failed to serialize JSON")
            }
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::to_string(value).context("failed to serialize YAML"),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => {
            let table = strip_nulls(value);
            if options.pretty {
                toml::to_string_pretty(&table).context("failed to serialize TOML")
            } else {
                toml::to_string(&table).context("failed to serialize TOML")
            }
        }
    }
}

/// TOML has no null; cleared fields are left out of the document.
#[cfg(feature = "toml")]
fn strip_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key.clone(), strip_nulls(value)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn write_payload(destination: &OutputDestination, payload: &str) -> Result<()> {
    match destination {
        OutputDestination::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(payload.as_bytes())?;
            if !payload.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
            Ok(())
        }
        OutputDestination::File(path) => {
            let mut file = File::create(path)?;
            file.write_all(payload.as_bytes())?;
            if !payload.ends_with('\n') {
                file.write_all(b"\n")?;
            }
            file.flush()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn writes_nothing_when_not_configured() {
        let options = OutputOptions::default().with_destinations(Vec::new());
        emit(&json!({"ok": true}), &options).expect("emit");
    }

    #[test]
    fn writes_to_file_destination() {
        let filename = format!(
            "gridform-test-{}.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        );
        let path = std::env::temp_dir().join(filename);
        let options = OutputOptions::default()
            .with_pretty(false)
            .with_destinations(vec![OutputDestination::file(&path)]);
        emit(&json!({"name": "Avi"}), &options).expect("emit");
        let contents = fs::read_to_string(&path).expect("read back");
        assert_eq!(contents, "{\"name\":\"Avi\"}\n");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn destinations_from_specs() {
        assert_eq!(OutputDestination::from_spec("-"), OutputDestination::Stdout);
        let file = OutputDestination::from_spec("out.JSON");
        assert_eq!(file.format_hint(), Some(DocumentFormat::Json));
        assert_eq!(OutputDestination::Stdout.format_hint(), None);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn toml_output_skips_cleared_fields() {
        let options = OutputOptions::new(DocumentFormat::Toml);
        let payload = serialize_value(&json!({"name": "Avi", "due": null}), &options)
            .expect("serialize");
        assert_eq!(payload.trim(), "name = \"Avi\"");
    }
}
