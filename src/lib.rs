#![deny(rust_2018_idioms)]

#[cfg(feature = "tui")]
pub mod app;
pub mod domain;
mod error;
pub mod form;
pub mod io;
pub mod presentation;

#[cfg(feature = "tui")]
pub use app::{FormUI, Keymap, UiOptions};
pub use domain::factory::{
    autocomplete, button, date_picker, divider, divider_header, header, text_field,
};
pub use domain::{FieldDescriptor, Propagation, SubmitHandler};
pub use error::FormError;
pub use form::{FormConfig, FormProps, Snapshot, SubmitOutcome, UseFormResult, use_form};
pub use io::{
    DocumentFormat, FormDocument, OutputDestination, OutputOptions, form_document_from_value,
    parse_document_str, parse_form_document,
};
pub use presentation::{FormView, render_form};

pub mod prelude {
    #[cfg(feature = "tui")]
    pub use super::{FormUI, UiOptions};
    pub use super::domain::{
        AutocompleteField, ButtonAction, ButtonField, DateField, DerivedProps, FieldOverrides,
        GridSpan, HeaderField, HeaderVariant, TextAlign, TextField,
    };
    pub use super::{
        FieldDescriptor, FormConfig, FormProps, Propagation, Snapshot, SubmitHandler,
        autocomplete, button, date_picker, divider, divider_header, header, render_form,
        text_field, use_form,
    };
}
