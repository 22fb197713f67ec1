use indexmap::IndexMap;
use serde_json::Value;

use crate::{
    domain::{
        AutocompleteField, ButtonAction, ButtonColor, ButtonField, ButtonVariant, DateField,
        FieldDescriptor, GridSpan, HeaderField, HeaderVariant, InputStyle, TextAlign, TextField,
    },
    form::{FormProps, Snapshot, date},
};

/// Render model of one pass over the field list.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub cells: Vec<GridCell>,
    pub global_errors: Vec<String>,
}

impl FormView {
    pub fn cell(&self, index: usize) -> Option<&GridCell> {
        self.cells.get(index)
    }

    /// Indices of cells that accept focus, in declaration order.
    pub fn focusable(&self) -> Vec<usize> {
        self.cells
            .iter()
            .filter(|cell| cell.node.is_focusable())
            .map(|cell| cell.index)
            .collect()
    }
}

/// One grid item; `index` is the descriptor's list position and doubles as its key.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub index: usize,
    pub span: GridSpan,
    pub node: FieldNode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldNode {
    TextInput(InputNode),
    DatePicker(DateNode),
    Autocomplete(AutocompleteNode),
    Header {
        label: String,
        variant: HeaderVariant,
        align: TextAlign,
    },
    DividerHeader {
        label: String,
        align: TextAlign,
    },
    Divider,
    Button(ButtonNode),
}

impl FieldNode {
    pub fn is_focusable(&self) -> bool {
        match self {
            Self::TextInput(input) => !input.disabled,
            Self::DatePicker(node) => !node.input.disabled,
            Self::Autocomplete(node) => !node.input.disabled,
            Self::Button(_) => true,
            Self::Header { .. } | Self::DividerHeader { .. } | Self::Divider => false,
        }
    }

    pub fn input(&self) -> Option<&InputNode> {
        match self {
            Self::TextInput(input) => Some(input),
            Self::DatePicker(node) => Some(&node.input),
            Self::Autocomplete(node) => Some(&node.input),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputNode {
    pub name: String,
    pub label: String,
    pub value: String,
    pub placeholder: Option<String>,
    pub helper_text: Option<String>,
    pub disabled: bool,
    pub required: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateNode {
    pub input: InputNode,
    /// The stored date in the field's display format, when it parses.
    pub formatted: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutocompleteNode {
    pub input: InputNode,
    pub options: Vec<String>,
    pub selected: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonNode {
    pub label: String,
    pub action: ButtonAction,
    pub variant: ButtonVariant,
    pub color: ButtonColor,
    pub disabled: bool,
}

/// Produces exactly one cell per descriptor from a single snapshot read.
pub fn render_form(props: &FormProps) -> FormView {
    let snapshot = props.watch();
    let errors = props.handle().errors();
    let cells = props
        .inputs()
        .iter()
        .enumerate()
        .map(|(index, field)| GridCell {
            index,
            span: field.grid(),
            node: render_field(field, &snapshot, &errors),
        })
        .collect();
    FormView {
        cells,
        global_errors: props.handle().global_errors(),
    }
}

fn render_field(
    field: &FieldDescriptor,
    snapshot: &Snapshot,
    errors: &IndexMap<String, String>,
) -> FieldNode {
    match field {
        FieldDescriptor::Text(text) => render_text(text, snapshot, errors),
        FieldDescriptor::Date(date) => render_date(date, snapshot, errors),
        FieldDescriptor::Autocomplete(autocomplete) => {
            render_autocomplete(autocomplete, snapshot, errors)
        }
        FieldDescriptor::Header(header) => render_header(header),
        FieldDescriptor::DividerHeader(header) => FieldNode::DividerHeader {
            label: header.label.clone(),
            align: header.align,
        },
        FieldDescriptor::Divider(_) => FieldNode::Divider,
        FieldDescriptor::Button(button) => render_button(button, snapshot),
    }
}

fn render_text(
    field: &TextField,
    snapshot: &Snapshot,
    errors: &IndexMap<String, String>,
) -> FieldNode {
    let value = field
        .value
        .as_ref()
        .or_else(|| snapshot.get(&field.name))
        .map(display_value)
        .unwrap_or_default();
    let mut input = base_input(&field.name, &field.label, &field.style, value, errors);

    let overrides = field.overrides(snapshot);
    if let Some(disabled) = overrides.disabled {
        input.disabled = disabled;
    }
    if let Some(required) = overrides.required {
        input.required = required;
    }
    if let Some(label) = overrides.label {
        input.label = label;
    }
    if overrides.placeholder.is_some() {
        input.placeholder = overrides.placeholder;
    }
    if overrides.helper_text.is_some() {
        input.helper_text = overrides.helper_text;
    }
    FieldNode::TextInput(input)
}

fn render_date(
    field: &DateField,
    snapshot: &Snapshot,
    errors: &IndexMap<String, String>,
) -> FieldNode {
    let stored = snapshot.get(&field.name);
    let formatted = stored
        .and_then(date::parse_date)
        .and_then(|parsed| date::try_format_date(parsed, field.display_format()));
    let value = stored.map(display_value).unwrap_or_default();
    FieldNode::DatePicker(DateNode {
        input: base_input(&field.name, &field.label, &field.style, value, errors),
        formatted,
    })
}

fn render_autocomplete(
    field: &AutocompleteField,
    snapshot: &Snapshot,
    errors: &IndexMap<String, String>,
) -> FieldNode {
    let current = snapshot.get(&field.name);
    let selected = current.and_then(|value| field.position_of(value));
    let value = match (selected, current) {
        (Some(position), _) => field.options[position].label().to_string(),
        (None, Some(value)) => display_value(value),
        (None, None) => String::new(),
    };
    FieldNode::Autocomplete(AutocompleteNode {
        input: base_input(&field.name, &field.label, &field.style, value, errors),
        options: field
            .options
            .iter()
            .map(|option| option.label().to_string())
            .collect(),
        selected,
    })
}

fn render_header(field: &HeaderField) -> FieldNode {
    FieldNode::Header {
        label: field.label.clone(),
        variant: field.variant,
        align: field.align,
    }
}

fn render_button(field: &ButtonField, snapshot: &Snapshot) -> FieldNode {
    FieldNode::Button(ButtonNode {
        label: field.label.clone(),
        action: field.action,
        variant: field.variant,
        color: field.color,
        disabled: field.is_disabled(snapshot),
    })
}

fn base_input(
    name: &str,
    label: &str,
    style: &InputStyle,
    value: String,
    errors: &IndexMap<String, String>,
) -> InputNode {
    InputNode {
        name: name.to_string(),
        label: label.to_string(),
        value,
        placeholder: style.placeholder.clone(),
        helper_text: style.helper_text.clone(),
        disabled: style.disabled,
        required: style.required,
        error: errors.get(name).cloned(),
    }
}

pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        domain::{AutocompleteOption, DerivedProps, FieldOverrides, factory},
        form::{FormConfig, SetValueOptions, use_form},
    };

    fn props(fields: Vec<FieldDescriptor>, initial: Snapshot) -> FormProps {
        use_form(FormConfig::new(fields, |_| {}).with_initial_values(initial))
            .expect("form")
            .form_props
    }

    #[test]
    fn one_cell_per_descriptor_in_order() {
        let props = props(
            vec![
                factory::header("Profile"),
                factory::text_field(TextField::new("name", "Name")),
                factory::divider(),
                factory::divider_header("More"),
                factory::header("Profile"),
                factory::button(ButtonField::new("Save")),
            ],
            Snapshot::new(),
        );
        let view = render_form(&props);
        let indices: Vec<_> = view.cells.iter().map(|cell| cell.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(matches!(view.cells[2].node, FieldNode::Divider));
        assert_eq!(view.focusable(), vec![1, 5]);
    }

    #[test]
    fn static_text_value_wins_over_snapshot() {
        let props = props(
            vec![
                factory::text_field(TextField::new("fixed", "Fixed").with_value("static")),
                factory::text_field(TextField::new("free", "Free")),
                factory::text_field(TextField::new("empty", "Empty")),
            ],
            Snapshot::from([("fixed", json!("stored")), ("free", json!("stored"))]),
        );
        let view = render_form(&props);
        let values: Vec<_> = view
            .cells
            .iter()
            .filter_map(|cell| cell.node.input())
            .map(|input| input.value.as_str())
            .collect();
        assert_eq!(values, vec!["static", "stored", ""]);
    }

    #[test]
    fn derived_props_follow_the_snapshot() {
        let props = props(
            vec![
                factory::text_field(TextField::new("country", "Country")),
                factory::text_field(TextField::new("state", "State").with_derived(
                    DerivedProps::new(["country"], |snapshot| FieldOverrides {
                        disabled: Some(snapshot.get_str("country") != Some("USA")),
                        label: snapshot.get("state").map(|_| "leaked".to_string()),
                        ..FieldOverrides::default()
                    }),
                )),
            ],
            Snapshot::from([("state", json!("TX"))]),
        );
        let state = |props: &FormProps| match &render_form(props).cells[1].node {
            FieldNode::TextInput(input) => input.clone(),
            other => panic!("unexpected node {other:?}"),
        };
        let before = state(&props);
        assert!(before.disabled);
        assert_eq!(before.label, "State");

        props.set_value("country", json!("USA"), SetValueOptions::edit());
        assert!(!state(&props).disabled);
    }

    #[test]
    fn autocomplete_resolves_selection() {
        let props = props(
            vec![
                factory::autocomplete(AutocompleteField::new(
                    "size",
                    "Size",
                    [
                        AutocompleteOption::labeled("Small", 1),
                        AutocompleteOption::labeled("Large", 2),
                    ],
                )),
                factory::autocomplete(
                    AutocompleteField::new("color", "Color", ["red"]).with_default_value("blue"),
                ),
            ],
            Snapshot::from([("size", json!(2))]),
        );
        let view = render_form(&props);
        let FieldNode::Autocomplete(size) = &view.cells[0].node else {
            panic!("expected autocomplete");
        };
        assert_eq!(size.selected, Some(1));
        assert_eq!(size.input.value, "Large");
        assert_eq!(size.options, vec!["Small", "Large"]);

        let FieldNode::Autocomplete(color) = &view.cells[1].node else {
            panic!("expected autocomplete");
        };
        assert_eq!(color.selected, None);
        assert_eq!(color.input.value, "blue");
    }

    #[test]
    fn cleared_autocomplete_renders_empty() {
        let props = props(
            vec![factory::autocomplete(
                AutocompleteField::new("color", "Color", ["red", "blue"])
                    .with_default_value("blue"),
            )],
            Snapshot::new(),
        );
        let FieldDescriptor::Autocomplete(field) = props.inputs()[0].clone() else {
            panic!("expected autocomplete");
        };
        let FieldNode::Autocomplete(seeded) = &render_form(&props).cells[0].node else {
            panic!("expected autocomplete");
        };
        assert_eq!(seeded.selected, Some(1));

        crate::form::binding::select_option(&props, &field, None);
        assert_eq!(props.watch().get("color"), None);
        let FieldNode::Autocomplete(cleared) = &render_form(&props).cells[0].node else {
            panic!("expected autocomplete");
        };
        assert_eq!(cleared.selected, None);
        assert!(cleared.input.value.is_empty());
    }

    #[test]
    fn dates_render_stored_text_and_display_format() {
        let props = props(
            vec![factory::date_picker(
                DateField::new("due", "Due").with_display_format("%d.%m.%Y"),
            )],
            Snapshot::from([("due", json!(1_709_632_800_000_i64))]),
        );
        let FieldNode::DatePicker(node) = &render_form(&props).cells[0].node else {
            panic!("expected date");
        };
        assert_eq!(node.input.value, "2024-03-05");
        assert_eq!(node.formatted.as_deref(), Some("05.03.2024"));
    }

    #[test]
    fn errors_attach_to_their_inputs() {
        let props = props(
            vec![factory::text_field(TextField::new("name", "Name").required())],
            Snapshot::new(),
        );
        assert!(!props.submit().is_submitted());
        let view = render_form(&props);
        assert_eq!(
            view.cells[0].node.input().and_then(|input| input.error.as_deref()),
            Some("Name is required")
        );
    }
}
