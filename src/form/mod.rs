pub mod binding;
pub mod date;
mod handle;
mod hook;
mod snapshot;
mod store;
mod validation;

pub use binding::ButtonOutcome;
pub use handle::{FormHandle, SubscriptionId};
pub use hook::{FormConfig, FormProps, UseFormResult, use_form};
pub use snapshot::Snapshot;
pub use store::{FormStore, SetValueOptions, ValueSetter};
pub use validation::{FieldIssue, FormValidator, SubmitOutcome};
