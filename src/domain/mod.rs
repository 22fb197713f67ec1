mod callback;
mod definition;
pub mod factory;
mod field;

pub use callback::{DerivedProps, OnChange, OnClick, SideEffect, SubmitHandler, Transform};
pub use definition::{FormDefinition, Propagation};
pub use field::{
    AutocompleteField, AutocompleteOption, ButtonAction, ButtonColor, ButtonField, ButtonStyle,
    ButtonVariant, DateField, DividerField, FieldDescriptor, FieldKind, FieldOverrides, GRID_COLUMNS,
    GridSpan, HeaderField, HeaderVariant, InputStyle, TextAlign, TextField,
};
