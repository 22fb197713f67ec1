use thiserror::Error;

/// Faults detected while assembling a form from its descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("field name '{name}' is used by more than one input (positions {first} and {second})")]
    DuplicateName {
        name: String,
        first: usize,
        second: usize,
    },
    #[error("propagation {source_name} -> {target}: '{missing}' is not an input field")]
    UnknownField {
        source_name: String,
        target: String,
        missing: String,
    },
    #[error("field '{name}' cannot propagate into itself")]
    SelfPropagation { name: String },
    #[error("failed to compile JSON schema: {message}")]
    InvalidSchema { message: String },
}
