use std::fs;
use std::io::{self, Read};
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use serde_json::Value;

use gridform::{DocumentFormat, parse_document_str};

/// Where a `SPEC` argument points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Source<'a> {
    Stdin,
    File(&'a Path),
    Inline(&'a str),
}

impl<'a> Source<'a> {
    /// `-` is stdin, an existing file is read, anything else is the payload itself.
    pub(crate) fn classify(spec: &'a str) -> Self {
        let path = Path::new(spec);
        if spec == "-" {
            Source::Stdin
        } else if path.is_file() {
            Source::File(path)
        } else {
            Source::Inline(spec)
        }
    }

    /// Format named by the file extension, if any.
    pub(crate) fn declared_format(&self) -> Result<Option<DocumentFormat>> {
        let Source::File(path) = self else {
            return Ok(None);
        };
        extension_format(path)
    }

    fn read(&self) -> Result<String> {
        match self {
            Source::Stdin => {
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .wrap_err("failed to read from stdin")?;
                Ok(buffer)
            }
            Source::File(path) => fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read file {}", path.display())),
            Source::Inline(payload) => Ok((*payload).to_string()),
        }
    }
}

/// A parsed document plus the format its extension declared.
#[derive(Debug)]
pub(crate) struct Loaded {
    pub(crate) value: Value,
    pub(crate) format: Option<DocumentFormat>,
}

pub(crate) fn load(spec: &str, label: &str) -> Result<Loaded> {
    let source = Source::classify(spec);
    let format = source.declared_format()?;
    let contents = source.read()?;
    let value = match format {
        Some(format) => parse_document_str(&contents, format)
            .map_err(|err| eyre!("failed to parse {label} as {format}: {err:#}"))?,
        None => sniff(&contents, label)?,
    };
    Ok(Loaded { value, format })
}

/// Path extension to format; extensions of formats left out of the build are errors.
pub(crate) fn extension_format(path: &Path) -> Result<Option<DocumentFormat>> {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return Ok(None);
    };
    if let Some(format) = DocumentFormat::from_extension(ext) {
        return Ok(Some(format));
    }
    if let Some(feature) = missing_feature(ext) {
        bail!(
            "{} requires {feature} support, but this build lacks the '{feature}' feature",
            path.display()
        );
    }
    Ok(None)
}

fn missing_feature(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "yaml" | "yml" if !cfg!(feature = "yaml") => Some("yaml"),
        "toml" if !cfg!(feature = "toml") => Some("toml"),
        _ => None,
    }
}

/// Tries every compiled-in format, JSON first.
fn sniff(contents: &str, label: &str) -> Result<Value> {
    let formats = DocumentFormat::available_formats();
    let mut first_error = None;
    for format in &formats {
        match parse_document_str(contents, *format) {
            Ok(value) => return Ok(value),
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
    }
    let tried = formats
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    match first_error {
        Some(err) => bail!("failed to parse {label}: tried {tried} (first error: {err:#})"),
        None => bail!("failed to parse {label}: no formats available"),
    }
}
