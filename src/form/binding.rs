//! Edit pipelines connecting widget events to the form store.

use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::{
    AutocompleteField, AutocompleteOption, ButtonAction, ButtonField, DateField, FormDefinition,
    SideEffect, TextField,
};

use super::{
    date,
    hook::FormProps,
    store::{FormStore, SetValueOptions, ValueSetter},
    validation::SubmitOutcome,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ButtonOutcome {
    Submitted(SubmitOutcome),
    Reset,
    Clicked,
    Disabled,
}

/// Applies raw text input to a text field.
///
/// Order within one edit: transform, propagation edges, own value, change
/// callback, side effect. Returns the value written to the store.
pub fn edit_text(props: &FormProps, field: &TextField, raw: &str) -> Value {
    let updated = match &field.transform {
        Some(transform) => transform.call(raw),
        None => raw.to_string(),
    };
    let value = Value::String(updated);
    tracing::debug!(field = %field.name, "text edit");

    write_with_propagation(props, &field.name, &value);
    if let Some(on_change) = &field.on_change {
        on_change.call(&value);
    }
    if let Some(effect) = &field.on_value_change {
        run_side_effect(props, effect, &value);
    }
    value
}

/// Stores raw date input; parsing happens at validation and render time.
pub fn edit_date(props: &FormProps, field: &DateField, raw: &str) -> Value {
    let value = if raw.trim().is_empty() {
        Value::Null
    } else {
        Value::String(raw.to_string())
    };
    tracing::debug!(field = %field.name, "date edit");
    write_with_propagation(props, &field.name, &value);
    value
}

/// Moves the date by whole days, starting from today when unset or unparseable.
/// Steps past a disabled bound clamp to today.
pub fn step_date(props: &FormProps, field: &DateField, days: i64) -> Option<NaiveDate> {
    let today = date::today();
    let current = props
        .handle()
        .get_value(&field.name)
        .as_ref()
        .and_then(date::parse_date);
    let mut next = match current {
        Some(current) => date::step(current, days)?,
        None => today,
    };
    if (field.disable_future && next > today) || (field.disable_past && next < today) {
        next = today;
    }
    let value = Value::String(date::format_date(next, date::STORAGE_FORMAT));
    write_with_propagation(props, &field.name, &value);
    Some(next)
}

/// Selects an option, or clears the selection with `None`.
pub fn select_option(
    props: &FormProps,
    field: &AutocompleteField,
    option: Option<&AutocompleteOption>,
) -> Value {
    let value = option.map(AutocompleteOption::value).unwrap_or(Value::Null);
    tracing::debug!(field = %field.name, cleared = option.is_none(), "autocomplete selection");
    write_with_propagation(props, &field.name, &value);
    if let Some(effect) = &field.on_value_change {
        run_side_effect(props, effect, &value);
    }
    value
}

pub fn press_button(props: &FormProps, field: &ButtonField) -> ButtonOutcome {
    if field.is_disabled(&props.watch()) {
        return ButtonOutcome::Disabled;
    }
    if let Some(on_click) = &field.on_click {
        props.handle().update(|store| {
            let snapshot = store.values().clone();
            on_click.call(store, &snapshot);
        });
    }
    match field.action {
        ButtonAction::Submit => ButtonOutcome::Submitted(props.submit()),
        ButtonAction::Reset => {
            props.reset();
            ButtonOutcome::Reset
        }
        ButtonAction::Button => ButtonOutcome::Clicked,
    }
}

fn write_with_propagation(props: &FormProps, name: &str, value: &Value) {
    props.handle().update(|store| {
        propagate(props.definition(), store, name, value);
        store.set_value(name, value.clone(), SetValueOptions::edit());
    });
}

fn propagate(definition: &FormDefinition, store: &mut FormStore, source: &str, value: &Value) {
    for edge in definition.propagations_from(source) {
        tracing::trace!(source, target = %edge.target, "propagating value");
        store.set_value(&edge.target, edge.apply(value), SetValueOptions::edit());
    }
}

fn run_side_effect(props: &FormProps, effect: &SideEffect, value: &Value) {
    props.handle().update(|store| {
        let snapshot = store.values().clone();
        effect.call(store, value, &snapshot);
    });
}
