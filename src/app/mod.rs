mod form_ui;
mod input;
mod keymap;
mod options;
mod popup;
mod runtime;
mod status;
mod terminal;

pub use form_ui::FormUI;
pub use keymap::Keymap;
pub use options::UiOptions;
