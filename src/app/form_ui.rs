use anyhow::Result;

use crate::{
    form::{FormProps, Snapshot},
    io::output::{self, OutputOptions},
};

use super::{keymap::Keymap, options::UiOptions, runtime::App};

/// Interactive terminal front end for a form built with [`use_form`].
///
/// [`use_form`]: crate::form::use_form
#[derive(Debug)]
pub struct FormUI {
    props: FormProps,
    title: Option<String>,
    options: UiOptions,
    output: Option<OutputOptions>,
}

impl FormUI {
    pub fn new(props: FormProps) -> Self {
        Self {
            props,
            title: None,
            options: UiOptions::default(),
            output: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    /// Where the submitted snapshot is written once the UI closes.
    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = Some(output);
        self
    }

    /// Runs until the form is submitted or the user quits.
    ///
    /// Quitting without a successful submit is an error.
    pub fn run(self) -> Result<Snapshot> {
        let FormUI {
            props,
            title,
            mut options,
            output,
        } = self;

        let keymap = match options.keymap.take() {
            Some(keymap) => keymap,
            None => Keymap::builtin()?,
        };
        let title = title.unwrap_or_else(|| "Form".to_string());
        let mut app = App::new(props, title, options, keymap);
        let snapshot = app.run()?;

        if let Some(output) = output {
            output::emit(&snapshot.to_value(), &output)?;
        }
        Ok(snapshot)
    }
}
