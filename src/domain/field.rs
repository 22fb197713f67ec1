use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::form::{Snapshot, ValueSetter};

use super::callback::{DerivedProps, OnChange, OnClick, SideEffect, Transform};

pub const GRID_COLUMNS: u16 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Date,
    Autocomplete,
    Header,
    DividerHeader,
    Divider,
    Button,
}

impl FieldKind {
    pub fn is_input(self) -> bool {
        matches!(self, Self::Text | Self::Date | Self::Autocomplete)
    }

    pub fn is_focusable(self) -> bool {
        self.is_input() || self == Self::Button
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Autocomplete => "autocomplete",
            Self::Header => "header",
            Self::DividerHeader => "dividerHeader",
            Self::Divider => "divider",
            Self::Button => "button",
        }
    }
}

/// One declared form element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "fieldType", rename_all = "camelCase")]
pub enum FieldDescriptor {
    Text(TextField),
    Date(DateField),
    Autocomplete(AutocompleteField),
    Header(HeaderField),
    DividerHeader(HeaderField),
    Divider(DividerField),
    Button(ButtonField),
}

impl FieldDescriptor {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Date(_) => FieldKind::Date,
            Self::Autocomplete(_) => FieldKind::Autocomplete,
            Self::Header(_) => FieldKind::Header,
            Self::DividerHeader(_) => FieldKind::DividerHeader,
            Self::Divider(_) => FieldKind::Divider,
            Self::Button(_) => FieldKind::Button,
        }
    }

    /// Form-state key for input fields.
    pub fn input_name(&self) -> Option<&str> {
        match self {
            Self::Text(field) => Some(&field.name),
            Self::Date(field) => Some(&field.name),
            Self::Autocomplete(field) => Some(&field.name),
            _ => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Text(field) => &field.label,
            Self::Date(field) => &field.label,
            Self::Autocomplete(field) => &field.label,
            Self::Header(field) | Self::DividerHeader(field) => &field.label,
            Self::Divider(_) => "",
            Self::Button(field) => &field.label,
        }
    }

    pub fn grid(&self) -> GridSpan {
        match self {
            Self::Text(field) => field.grid,
            Self::Date(field) => field.grid,
            Self::Autocomplete(field) => field.grid,
            Self::Header(field) | Self::DividerHeader(field) => field.grid,
            Self::Divider(field) => field.grid,
            Self::Button(field) => field.grid,
        }
    }

    pub fn required(&self) -> bool {
        match self {
            Self::Text(field) => field.style.required,
            Self::Date(field) => field.style.required,
            Self::Autocomplete(field) => field.style.required,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xs: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sm: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md: Option<u16>,
}

impl GridSpan {
    pub fn new(xs: u16, sm: u16, md: u16) -> Self {
        Self {
            xs: Some(xs),
            sm: Some(sm),
            md: Some(md),
        }
    }

    pub fn uniform(columns: u16) -> Self {
        Self::new(columns, columns, columns)
    }
}

/// Static overrides for input widgets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputStyle {
    pub disabled: bool,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

/// Overrides produced at render time by [`DerivedProps`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOverrides {
    pub disabled: Option<bool>,
    pub required: Option<bool>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub helper_text: Option<String>,
}

impl FieldOverrides {
    pub fn disabled(disabled: bool) -> Self {
        Self {
            disabled: Some(disabled),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextField {
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listen_to: Option<String>,
    #[serde(default)]
    pub grid: GridSpan,
    #[serde(default)]
    pub style: InputStyle,
    #[serde(skip)]
    pub transform: Option<Transform>,
    #[serde(skip)]
    pub on_change: Option<OnChange>,
    #[serde(skip)]
    pub on_value_change: Option<SideEffect>,
    #[serde(skip)]
    pub derived: Option<DerivedProps>,
}

impl TextField {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_listen_to(mut self, target: impl Into<String>) -> Self {
        self.listen_to = Some(target.into());
        self
    }

    pub fn with_grid(mut self, grid: GridSpan) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_style(mut self, style: InputStyle) -> Self {
        self.style = style;
        self
    }

    pub fn required(mut self) -> Self {
        self.style.required = true;
        self
    }

    pub fn with_transform(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.transform = Some(Transform::new(f));
        self
    }

    pub fn with_on_change(mut self, f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_change = Some(OnChange::new(f));
        self
    }

    pub fn with_on_value_change(
        mut self,
        f: impl Fn(&mut dyn ValueSetter, &Value, &Snapshot)
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.on_value_change = Some(SideEffect::new(f));
        self
    }

    pub fn with_derived(mut self, derived: DerivedProps) -> Self {
        self.derived = Some(derived);
        self
    }

    pub fn overrides(&self, snapshot: &Snapshot) -> FieldOverrides {
        self.derived
            .as_ref()
            .map(|derived| derived.evaluate(snapshot))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateField {
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_format: Option<String>,
    #[serde(default)]
    pub disable_future: bool,
    #[serde(default)]
    pub disable_past: bool,
    #[serde(default)]
    pub grid: GridSpan,
    #[serde(default)]
    pub style: InputStyle,
}

impl DateField {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_display_format(mut self, format: impl Into<String>) -> Self {
        self.display_format = Some(format.into());
        self
    }

    pub fn disable_future(mut self) -> Self {
        self.disable_future = true;
        self
    }

    pub fn disable_past(mut self) -> Self {
        self.disable_past = true;
        self
    }

    pub fn with_grid(mut self, grid: GridSpan) -> Self {
        self.grid = grid;
        self
    }

    pub fn required(mut self) -> Self {
        self.style.required = true;
        self
    }

    pub fn display_format(&self) -> &str {
        self.display_format.as_deref().unwrap_or("%Y-%m-%d")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AutocompleteOption {
    Plain(String),
    Labeled { label: String, value: Value },
}

impl AutocompleteOption {
    pub fn labeled(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Labeled {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Labeled { label, .. } => label,
        }
    }

    pub fn value(&self) -> Value {
        match self {
            Self::Plain(text) => Value::String(text.clone()),
            Self::Labeled { value, .. } => value.clone(),
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Plain(text) => value.as_str() == Some(text.as_str()),
            Self::Labeled { value: own, .. } => own == value,
        }
    }
}

impl From<&str> for AutocompleteOption {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_string())
    }
}

impl From<String> for AutocompleteOption {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteField {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub options: Vec<AutocompleteOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default)]
    pub grid: GridSpan,
    #[serde(default)]
    pub style: InputStyle,
    #[serde(skip)]
    pub on_value_change: Option<SideEffect>,
}

impl AutocompleteField {
    pub fn new<I, O>(name: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<AutocompleteOption>,
    {
        Self {
            name: name.into(),
            label: label.into(),
            options: options.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_default_value(mut self, value: impl Into<Value>) -> Self {
        self.style.default_value = Some(value.into());
        self
    }

    pub fn with_grid(mut self, grid: GridSpan) -> Self {
        self.grid = grid;
        self
    }

    pub fn required(mut self) -> Self {
        self.style.required = true;
        self
    }

    pub fn with_on_value_change(
        mut self,
        f: impl Fn(&mut dyn ValueSetter, &Value, &Snapshot)
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.on_value_change = Some(SideEffect::new(f));
        self
    }

    pub fn position_of(&self, value: &Value) -> Option<usize> {
        self.options.iter().position(|option| option.matches(value))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderVariant {
    H1,
    H2,
    H3,
    #[default]
    H4,
    H5,
    H6,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderField {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub variant: HeaderVariant,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub grid: GridSpan,
}

impl HeaderField {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_variant(mut self, variant: HeaderVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_grid(mut self, grid: GridSpan) -> Self {
        self.grid = grid;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DividerField {
    #[serde(default)]
    pub grid: GridSpan,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonAction {
    #[default]
    Submit,
    Button,
    Reset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    #[default]
    Outlined,
    Contained,
    Text,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonColor {
    #[default]
    Primary,
    Secondary,
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonStyle {
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonField {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub action: ButtonAction,
    #[serde(default)]
    pub variant: ButtonVariant,
    #[serde(default)]
    pub color: ButtonColor,
    #[serde(default)]
    pub grid: GridSpan,
    #[serde(default)]
    pub style: ButtonStyle,
    #[serde(skip)]
    pub on_click: Option<OnClick>,
    #[serde(skip)]
    pub derived: Option<DerivedProps>,
}

impl ButtonField {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_action(mut self, action: ButtonAction) -> Self {
        self.action = action;
        self
    }

    pub fn with_variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_color(mut self, color: ButtonColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_grid(mut self, grid: GridSpan) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_on_click(
        mut self,
        f: impl Fn(&mut dyn ValueSetter, &Snapshot) + Send + Sync + 'static,
    ) -> Self {
        self.action = ButtonAction::Button;
        self.on_click = Some(OnClick::new(f));
        self
    }

    pub fn with_derived(mut self, derived: DerivedProps) -> Self {
        self.derived = Some(derived);
        self
    }

    pub fn is_disabled(&self, snapshot: &Snapshot) -> bool {
        self.derived
            .as_ref()
            .and_then(|derived| derived.evaluate(snapshot).disabled)
            .unwrap_or(self.style.disabled)
    }
}
