//! Constructors that stamp a kind onto an options record.
//!
//! ```
//! use gridform::domain::{factory, AutocompleteField, TextField};
//!
//! let fields = vec![
//!     factory::header("Personal Information"),
//!     factory::text_field(TextField::new("email", "Email").with_transform(|raw| raw.trim().into())),
//!     factory::autocomplete(AutocompleteField::new("country", "Country", ["USA", "UK", "Canada"])),
//!     factory::button(Default::default()),
//! ];
//! assert_eq!(fields.len(), 4);
//! ```

use super::field::{
    AutocompleteField, ButtonField, DateField, DividerField, FieldDescriptor, HeaderField,
    TextField,
};

pub fn text_field(options: TextField) -> FieldDescriptor {
    FieldDescriptor::Text(options)
}

pub fn date_picker(options: DateField) -> FieldDescriptor {
    FieldDescriptor::Date(options)
}

pub fn autocomplete(options: AutocompleteField) -> FieldDescriptor {
    FieldDescriptor::Autocomplete(options)
}

pub fn header(options: impl Into<HeaderField>) -> FieldDescriptor {
    FieldDescriptor::Header(options.into())
}

pub fn divider_header(options: impl Into<HeaderField>) -> FieldDescriptor {
    FieldDescriptor::DividerHeader(options.into())
}

pub fn divider() -> FieldDescriptor {
    FieldDescriptor::Divider(DividerField::default())
}

pub fn button(options: ButtonField) -> FieldDescriptor {
    FieldDescriptor::Button(options)
}

impl From<&str> for HeaderField {
    fn from(label: &str) -> Self {
        HeaderField::new(label)
    }
}

impl From<String> for HeaderField {
    fn from(label: String) -> Self {
        HeaderField::new(label)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{ButtonAction, FieldKind, HeaderVariant, TextAlign};

    #[test]
    fn factories_tag_each_kind() {
        let fields = [
            text_field(TextField::new("first", "First")),
            date_picker(DateField::new("born", "Born")),
            autocomplete(AutocompleteField::new("country", "Country", ["UK"])),
            header("Header"),
            divider_header("Section"),
            divider(),
            button(ButtonField::new("Save")),
        ];
        let kinds: Vec<FieldKind> = fields.iter().map(FieldDescriptor::kind).collect();
        assert_eq!(
            kinds,
            vec![
                FieldKind::Text,
                FieldKind::Date,
                FieldKind::Autocomplete,
                FieldKind::Header,
                FieldKind::DividerHeader,
                FieldKind::Divider,
                FieldKind::Button,
            ]
        );
    }

    #[test]
    fn options_pass_through_untouched() {
        let field = text_field(TextField::new("", "").with_value(json!(42)));
        let FieldDescriptor::Text(text) = field else {
            panic!("expected text descriptor");
        };
        assert_eq!(text.name, "");
        assert_eq!(text.value, Some(json!(42)));
        assert!(text.transform.is_none());
    }

    #[test]
    fn header_and_button_defaults() {
        let FieldDescriptor::Header(header) = header("Intro") else {
            panic!("expected header");
        };
        assert_eq!(header.variant, HeaderVariant::H4);
        assert_eq!(header.align, TextAlign::Center);

        let FieldDescriptor::Button(button) = button(ButtonField::new("Go")) else {
            panic!("expected button");
        };
        assert_eq!(button.action, ButtonAction::Submit);
    }
}
