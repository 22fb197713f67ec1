use crate::{
    domain::{AutocompleteField, AutocompleteOption},
    presentation::PopupRender,
};

/// Option picker for the focused autocomplete field.
pub(crate) struct AutocompletePopup {
    field_index: usize,
    title: String,
    options: Vec<AutocompleteOption>,
    filter: String,
    visible: Vec<usize>,
    labels: Vec<String>,
    selected: usize,
}

impl AutocompletePopup {
    pub(crate) fn new(field_index: usize, field: &AutocompleteField, current: Option<usize>) -> Self {
        let mut popup = Self {
            field_index,
            title: field.label.clone(),
            options: field.options.clone(),
            filter: String::new(),
            visible: Vec::new(),
            labels: Vec::new(),
            selected: 0,
        };
        popup.refilter();
        if let Some(current) = current {
            popup.selected = popup
                .visible
                .iter()
                .position(|index| *index == current)
                .unwrap_or(0);
        }
        popup
    }

    pub(crate) fn field_index(&self) -> usize {
        self.field_index
    }

    pub(crate) fn push_char(&mut self, ch: char) {
        self.filter.push(ch);
        self.refilter();
    }

    pub(crate) fn pop_char(&mut self) {
        self.filter.pop();
        self.refilter();
    }

    pub(crate) fn step(&mut self, delta: i32) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let offset = (delta.unsigned_abs() as usize) % len;
        self.selected = if delta >= 0 {
            (self.selected + offset) % len
        } else {
            (self.selected + len - offset) % len
        };
    }

    pub(crate) fn selection(&self) -> Option<&AutocompleteOption> {
        self.visible
            .get(self.selected)
            .and_then(|index| self.options.get(*index))
    }

    pub(crate) fn as_render(&self) -> PopupRender<'_> {
        PopupRender {
            title: &self.title,
            filter: &self.filter,
            options: &self.labels,
            selected: self.selected,
        }
    }

    /// Case-insensitive substring match on option labels.
    fn refilter(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .options
            .iter()
            .enumerate()
            .filter(|(_, option)| option.label().to_lowercase().contains(&needle))
            .map(|(index, _)| index)
            .collect();
        self.labels = self
            .visible
            .iter()
            .map(|index| self.options[*index].label().to_string())
            .collect();
        self.selected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn popup() -> AutocompletePopup {
        let field = AutocompleteField::new("country", "Country", ["Austria", "Australia", "Chile"]);
        AutocompletePopup::new(3, &field, Some(2))
    }

    #[test]
    fn opens_on_the_current_option() {
        let popup = popup();
        assert_eq!(popup.field_index(), 3);
        assert_eq!(popup.selection().map(AutocompleteOption::label), Some("Chile"));
    }

    #[test]
    fn typing_filters_and_wraps() {
        let mut popup = popup();
        popup.push_char('A');
        popup.push_char('u');
        assert_eq!(popup.as_render().options, ["Austria", "Australia"]);
        popup.step(-1);
        assert_eq!(popup.selection().map(AutocompleteOption::label), Some("Australia"));
        popup.step(1);
        assert_eq!(popup.selection().map(AutocompleteOption::label), Some("Austria"));

        popup.push_char('z');
        assert!(popup.selection().is_none());
        popup.pop_char();
        popup.pop_char();
        popup.pop_char();
        assert_eq!(popup.as_render().options.len(), 3);
    }
}
