mod diagnostics;
mod outputs;
mod source;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use tracing_subscriber::EnvFilter;

use gridform::{
    FormDocument, FormUI, OutputOptions, Snapshot, SubmitHandler, form_document_from_value,
    use_form,
};

use crate::{
    diagnostics::Diagnostics,
    outputs::{OutputRequest, plan},
};

const DEFAULT_LOG_FILTER: &str = "gridform=debug";

#[derive(Debug, Parser)]
#[command(
    name = "gridform",
    version,
    about = "Render declarative form documents as interactive TUIs"
)]
struct Cli {
    /// Form document spec: file path, inline payload, or "-" for stdin
    #[arg(short = 'F', long = "form", value_name = "SPEC")]
    form: String,

    /// Initial values spec: file path, inline payload, or "-" for stdin
    #[arg(short = 'v', long = "values", alias = "data", value_name = "SPEC")]
    values: Option<String>,

    /// Title shown at the top of the UI (overrides the document title)
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Output destinations ("-" writes to stdout). Accepts multiple values per flag use.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,

    /// Write logs to this file; the terminal belongs to the UI
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    if let Some(path) = cli.log_file.as_deref() {
        init_logging(path)?;
    }

    let (document, output) = prepare(&cli)?;
    run_form(document, cli.title, output)
}

/// Loads every input and resolves outputs, failing with all problems at once.
fn prepare(cli: &Cli) -> Result<(FormDocument, Option<OutputOptions>)> {
    let mut diagnostics = Diagnostics::default();
    let both_stdin = cli.form == "-" && cli.values.as_deref() == Some("-");
    if both_stdin {
        diagnostics.input(
            "form/values",
            "cannot read form and values from stdin simultaneously; provide inline content or files",
        );
    }

    let mut form_format = None;
    let mut document = None;
    if !both_stdin {
        match source::load(&cli.form, "form") {
            Ok(loaded) => {
                form_format = loaded.format;
                match form_document_from_value(loaded.value) {
                    Ok(parsed) => document = Some(parsed),
                    Err(err) => diagnostics.input("form", format!("{err:#}")),
                }
            }
            Err(err) => diagnostics.input("form", err.to_string()),
        }
    }

    let mut values_format = None;
    let mut values = None;
    if let Some(spec) = cli.values.as_deref().filter(|_| !both_stdin) {
        match source::load(spec, "values") {
            Ok(loaded) => {
                values_format = loaded.format;
                match Snapshot::from_value(&loaded.value) {
                    Some(parsed) => values = Some(parsed),
                    None => diagnostics.input(
                        "values",
                        "initial values must be an object keyed by field name",
                    ),
                }
            }
            Err(err) => diagnostics.input("values", err.to_string()),
        }
    }

    let output = plan(
        OutputRequest {
            specs: &cli.outputs,
            pretty: !cli.no_pretty,
            force: cli.force,
            fallback: values_format.or(form_format),
        },
        &mut diagnostics,
    );

    diagnostics.finish()?;

    let document = document.ok_or_else(|| eyre!("no form document was loaded"))?;
    let document = match values {
        Some(values) => document.with_initial_values(values),
        None => document,
    };
    Ok((document, output))
}

fn run_form(
    document: FormDocument,
    title: Option<String>,
    output: Option<OutputOptions>,
) -> Result<()> {
    let title = title.or_else(|| document.title.clone());
    let config = document.into_config(SubmitHandler::new(|values| {
        tracing::info!(fields = values.len(), "form submitted");
    }));
    let form = use_form(config).wrap_err("invalid form document")?;

    let mut ui = FormUI::new(form.form_props);
    if let Some(title) = title {
        ui = ui.with_title(title);
    }
    if let Some(options) = output {
        ui = ui.with_output(options);
    }

    let _ = ui.run().map_err(|err| with_causes(&err))?;
    Ok(())
}

/// Carries the whole `context` chain of a library error into the report.
fn with_causes(err: &impl std::fmt::Display) -> Report {
    eyre!("{err:#}")
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| eyre!("failed to install log subscriber: {err}"))?;
    tracing::debug!(path = %path.display(), "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["gridform"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("arguments")
    }

    #[test]
    fn merges_values_over_document_defaults() {
        let cli = cli(&[
            "--form",
            r#"{"title":"Profile","fields":[{"fieldType":"text","name":"name","label":"Name"}],
                "initialValues":{"name":"Avi","age":3}}"#,
            "--values",
            r#"{"name":"Noa"}"#,
        ]);
        let (document, output) = prepare(&cli).expect("prepared");
        let values = document.initial_values.expect("values");
        assert_eq!(values.get_str("name"), Some("Noa"));
        assert!(values.contains("age"));
        assert_eq!(document.title.as_deref(), Some("Profile"));
        assert!(output.is_some());
    }

    #[test]
    fn reports_every_problem_together() {
        let cli = cli(&["--form", "{\"fields\":[{\"fieldType\":\"slider\"}]}", "--values", "[1]"]);
        let message = prepare(&cli).expect_err("problems").to_string();
        assert!(message.contains("1. input (form)"));
        assert!(message.contains("2. input (values): initial values must be an object"));
    }

    #[test]
    fn library_errors_keep_their_context_chain() {
        use anyhow::Context as _;

        let err = Err::<(), _>(anyhow::anyhow!("permission denied"))
            .context("failed to write to file out.json")
            .expect_err("error");
        assert_eq!(
            with_causes(&err).to_string(),
            "failed to write to file out.json: permission denied"
        );
    }

    #[test]
    fn stdin_cannot_feed_both_inputs() {
        let cli = cli(&["--form", "-", "--values", "-"]);
        let message = prepare(&cli).expect_err("conflict").to_string();
        assert!(message.contains("simultaneously"));
    }
}
