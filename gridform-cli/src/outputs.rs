use std::path::PathBuf;

use gridform::{DocumentFormat, OutputDestination, OutputOptions};

use crate::{diagnostics::Diagnostics, source::extension_format};

/// Settings for `--output`, `--no-pretty` and `--force`.
#[derive(Debug, Default)]
pub(crate) struct OutputRequest<'a> {
    pub(crate) specs: &'a [String],
    pub(crate) pretty: bool,
    pub(crate) force: bool,
    /// Format used when every destination is stdout.
    pub(crate) fallback: Option<DocumentFormat>,
}

/// Resolves destinations and their shared format. Without `-o` values go to stdout.
pub(crate) fn plan(request: OutputRequest<'_>, diagnostics: &mut Diagnostics) -> Option<OutputOptions> {
    let start = diagnostics.count();
    let mut destinations = Vec::new();
    for spec in request.specs {
        if spec.trim().is_empty() {
            diagnostics.output("output destination cannot be empty");
        } else {
            destinations.push(OutputDestination::from_spec(spec));
        }
    }
    if request.specs.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }

    let files: Vec<PathBuf> = destinations
        .iter()
        .filter_map(|destination| match destination {
            OutputDestination::File(path) => Some(path.clone()),
            OutputDestination::Stdout => None,
        })
        .collect();

    let mut format = None;
    for path in &files {
        match extension_format(path) {
            Ok(Some(found)) => match format {
                Some(existing) if existing != found => diagnostics.output(format!(
                    "output file {} uses {found} but other destinations use {existing}; align extensions",
                    path.display()
                )),
                Some(_) => {}
                None => format = Some(found),
            },
            Ok(None) => diagnostics.output(format!(
                "cannot infer format from output file {}; use .json/.yaml/.toml",
                path.display()
            )),
            Err(err) => diagnostics.output(err.to_string()),
        }
        if !request.force && path.exists() {
            diagnostics.output(format!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
    }

    if diagnostics.count() > start || destinations.is_empty() {
        return None;
    }
    let format = format.or(request.fallback).unwrap_or_default();
    Some(
        OutputOptions::new(format)
            .with_pretty(request.pretty)
            .with_destinations(destinations),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdout_is_the_default_destination() {
        let mut diagnostics = Diagnostics::default();
        let options = plan(
            OutputRequest {
                pretty: true,
                ..OutputRequest::default()
            },
            &mut diagnostics,
        )
        .expect("options");
        assert_eq!(options.destinations, vec![OutputDestination::Stdout]);
        assert_eq!(options.format, DocumentFormat::Json);
        assert!(options.pretty);
        assert_eq!(diagnostics.count(), 0);
    }

    #[test]
    fn file_extensions_choose_the_format() {
        let specs = vec!["-".to_string(), "gridform-cli-out.json".to_string()];
        let mut diagnostics = Diagnostics::default();
        let options = plan(
            OutputRequest {
                specs: &specs,
                force: true,
                ..OutputRequest::default()
            },
            &mut diagnostics,
        )
        .expect("options");
        assert_eq!(options.format, DocumentFormat::Json);
        assert_eq!(options.destinations.len(), 2);
        assert!(!options.pretty);
    }

    #[test]
    fn unknown_extensions_and_existing_files_are_reported() {
        let manifest = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml").to_string();
        let specs = vec!["out.txt".to_string(), manifest];
        let mut diagnostics = Diagnostics::default();
        let options = plan(
            OutputRequest {
                specs: &specs,
                ..OutputRequest::default()
            },
            &mut diagnostics,
        );
        assert!(options.is_none());
        let message = diagnostics.finish().expect_err("diagnostics").to_string();
        assert!(message.contains("cannot infer format from output file out.txt"));
        assert!(message.contains("already exists"));
    }
}
