pub mod format;
pub mod input;
pub mod output;

pub use format::DocumentFormat;
pub use input::{FormDocument, form_document_from_value, parse_document_str, parse_form_document};
pub use output::{OutputDestination, OutputOptions, emit};
