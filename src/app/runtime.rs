use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{Frame, layout::Rect};

use crate::{
    domain::{AutocompleteField, AutocompleteOption, ButtonField, FieldDescriptor},
    form::{
        FormProps, Snapshot, SubmitOutcome,
        binding::{self, ButtonOutcome},
    },
    presentation::{self, FormView, UiContext, display_value},
};

use super::{
    input::{KeyCommand, classify},
    keymap::{KeyAction, Keymap, KeymapContext},
    options::UiOptions,
    popup::AutocompletePopup,
    status::StatusLine,
    terminal::TerminalGuard,
};

pub(crate) struct App {
    props: FormProps,
    title: String,
    options: UiOptions,
    keymap: Keymap,
    status: StatusLine,
    focus: Option<usize>,
    scroll_row: usize,
    popup: Option<AutocompletePopup>,
    exit_armed: bool,
    should_quit: bool,
    result: Option<Snapshot>,
}

impl App {
    pub fn new(props: FormProps, title: String, options: UiOptions, keymap: Keymap) -> Self {
        let focus = presentation::render_form(&props).focusable().first().copied();
        Self {
            props,
            title,
            options,
            keymap,
            status: StatusLine::new(),
            focus,
            scroll_row: 0,
            popup: None,
            exit_armed: false,
            should_quit: false,
            result: None,
        }
    }

    pub fn run(&mut self) -> Result<Snapshot> {
        let mut terminal = TerminalGuard::new()?;
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize(width, height) => {
                    terminal.resize(Rect::new(0, 0, width, height))?;
                }
                Event::Mouse(_) => {}
                Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }

        self.result
            .take()
            .ok_or_else(|| anyhow!("user exited without submitting"))
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let view = presentation::render_form(&self.props);
        self.sync_focus(&view);
        let context = if self.popup.is_some() {
            KeymapContext::Popup
        } else {
            KeymapContext::Form
        };
        let help = if self.options.show_help {
            self.keymap.help_text(context)
        } else {
            None
        };
        let handle = self.props.handle();
        let focus_label = self
            .focus
            .and_then(|index| self.props.inputs().get(index))
            .map(FieldDescriptor::label);

        presentation::draw(
            frame,
            UiContext {
                title: &self.title,
                view: &view,
                focus: self.focus,
                focus_label,
                status_message: self.status.message(),
                dirty: handle.is_dirty(),
                error_count: handle.error_count(),
                help: help.as_deref(),
                popup: self.popup.as_ref().map(AutocompletePopup::as_render),
            },
            &mut self.scroll_row,
        );
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.popup.is_some() {
            self.handle_popup_key(&key);
            return;
        }
        match classify(&self.keymap, &key, KeymapContext::Form) {
            KeyCommand::Action(action) => self.handle_action(action),
            KeyCommand::Insert(ch) => self.edit_focused(|text| text.push(ch)),
            KeyCommand::Backspace => self.edit_focused(|text| {
                text.pop();
            }),
            KeyCommand::None => {}
        }
    }

    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Submit => {
                let outcome = self.props.submit();
                self.on_submit_outcome(outcome);
            }
            KeyAction::Reset => {
                self.props.reset();
                self.exit_armed = false;
                self.status.form_reset();
            }
            KeyAction::Quit => self.on_exit(),
            KeyAction::FocusStep(delta) => {
                self.exit_armed = false;
                self.move_focus(delta);
            }
            KeyAction::Activate => self.activate_focused(),
            KeyAction::Clear => self.clear_focused(),
            KeyAction::DateStep(days) => self.step_focused_date(days),
            KeyAction::Dismiss => {
                self.exit_armed = false;
                self.status.ready();
            }
            KeyAction::PopupStep(_) => {}
        }
    }

    fn handle_popup_key(&mut self, key: &KeyEvent) {
        let command = classify(&self.keymap, key, KeymapContext::Popup);
        let Some(popup) = self.popup.as_mut() else {
            return;
        };
        match command {
            KeyCommand::Action(KeyAction::PopupStep(delta)) => popup.step(delta),
            KeyCommand::Action(KeyAction::Activate) => {
                let index = popup.field_index();
                let selection = popup.selection().cloned();
                self.popup = None;
                match selection {
                    Some(option) => self.select_option(index, Some(&option)),
                    None => self.status.set_raw("No option matches the filter"),
                }
            }
            KeyCommand::Action(KeyAction::Dismiss) => {
                self.popup = None;
                self.status.ready();
            }
            KeyCommand::Action(KeyAction::Quit) => {
                self.popup = None;
                self.on_exit();
            }
            KeyCommand::Insert(ch) => popup.push_char(ch),
            KeyCommand::Backspace => popup.pop_char(),
            KeyCommand::Action(_) | KeyCommand::None => {}
        }
    }

    fn focused_field(&self) -> Option<(usize, FieldDescriptor)> {
        let index = self.focus?;
        self.props
            .inputs()
            .get(index)
            .cloned()
            .map(|field| (index, field))
    }

    fn sync_focus(&mut self, view: &FormView) {
        let focusable = view.focusable();
        if self.focus.is_some_and(|index| focusable.contains(&index)) {
            return;
        }
        self.focus = self
            .focus
            .and_then(|current| focusable.iter().copied().find(|index| *index > current))
            .or_else(|| focusable.first().copied());
    }

    fn move_focus(&mut self, delta: i32) {
        let focusable = presentation::render_form(&self.props).focusable();
        if focusable.is_empty() {
            self.focus = None;
            return;
        }
        let len = focusable.len() as i32;
        let position = self
            .focus
            .and_then(|focus| focusable.iter().position(|index| *index == focus))
            .map(|position| position as i32)
            .unwrap_or(if delta >= 0 { -1 } else { 0 });
        let next = (position + delta).rem_euclid(len) as usize;
        self.focus = Some(focusable[next]);
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        let Some((index, field)) = self.focused_field() else {
            return;
        };
        match &field {
            FieldDescriptor::Text(text) => {
                let mut raw = self.stored_text(&text.name);
                edit(&mut raw);
                binding::edit_text(&self.props, text, &raw);
                self.after_edit(&text.label);
            }
            FieldDescriptor::Date(date) => {
                let mut raw = self.stored_text(&date.name);
                edit(&mut raw);
                binding::edit_date(&self.props, date, &raw);
                self.after_edit(&date.label);
            }
            FieldDescriptor::Autocomplete(autocomplete) => {
                let mut filter = String::new();
                edit(&mut filter);
                self.open_popup(index, autocomplete);
                if let Some(popup) = self.popup.as_mut() {
                    filter.chars().for_each(|ch| popup.push_char(ch));
                }
            }
            FieldDescriptor::Header(_)
            | FieldDescriptor::DividerHeader(_)
            | FieldDescriptor::Divider(_)
            | FieldDescriptor::Button(_) => {}
        }
    }

    fn activate_focused(&mut self) {
        let Some((index, field)) = self.focused_field() else {
            return;
        };
        match &field {
            FieldDescriptor::Autocomplete(autocomplete) => self.open_popup(index, autocomplete),
            FieldDescriptor::Button(button) => self.press(button),
            FieldDescriptor::Text(_) | FieldDescriptor::Date(_) => self.move_focus(1),
            FieldDescriptor::Header(_)
            | FieldDescriptor::DividerHeader(_)
            | FieldDescriptor::Divider(_) => {}
        }
    }

    fn clear_focused(&mut self) {
        let Some((_, field)) = self.focused_field() else {
            return;
        };
        match &field {
            FieldDescriptor::Text(text) => {
                binding::edit_text(&self.props, text, "");
                self.after_edit(&text.label);
            }
            FieldDescriptor::Date(date) => {
                binding::edit_date(&self.props, date, "");
                self.after_edit(&date.label);
            }
            FieldDescriptor::Autocomplete(autocomplete) => {
                binding::select_option(&self.props, autocomplete, None);
                self.after_edit(&autocomplete.label);
            }
            _ => {}
        }
    }

    fn step_focused_date(&mut self, days: i64) {
        if let Some((_, FieldDescriptor::Date(date))) = self.focused_field() {
            binding::step_date(&self.props, &date, days);
            self.after_edit(&date.label);
        }
    }

    fn open_popup(&mut self, index: usize, field: &AutocompleteField) {
        if field.options.is_empty() {
            self.status.set_raw(format!("{} has no options", field.label));
            return;
        }
        let current = self
            .props
            .handle()
            .get_value(&field.name)
            .and_then(|value| field.position_of(&value));
        self.popup = Some(AutocompletePopup::new(index, field, current));
        self.status
            .set_raw("Type to filter, ↑/↓ to move, Enter to choose");
    }

    fn select_option(&mut self, index: usize, option: Option<&AutocompleteOption>) {
        let Some(FieldDescriptor::Autocomplete(field)) = self.props.inputs().get(index).cloned()
        else {
            return;
        };
        binding::select_option(&self.props, &field, option);
        self.after_edit(&field.label);
        self.status.value_updated();
    }

    fn press(&mut self, button: &ButtonField) {
        self.exit_armed = false;
        match binding::press_button(&self.props, button) {
            ButtonOutcome::Submitted(outcome) => self.on_submit_outcome(outcome),
            ButtonOutcome::Reset => self.status.form_reset(),
            ButtonOutcome::Clicked => self.status.set_raw(format!("{} pressed", button.label)),
            ButtonOutcome::Disabled => {
                self.status.set_raw(format!("{} is disabled", button.label))
            }
        }
    }

    fn after_edit(&mut self, label: &str) {
        self.exit_armed = false;
        self.status.editing(label);
        if self.options.validate_on_change {
            self.props.revalidate();
        }
    }

    fn on_submit_outcome(&mut self, outcome: SubmitOutcome) {
        match outcome {
            SubmitOutcome::Submitted(snapshot) => {
                self.result = Some(snapshot);
                self.exit_armed = false;
                self.status.submitted();
                if self.options.exit_on_submit {
                    self.should_quit = true;
                }
            }
            SubmitOutcome::Rejected(issues) => {
                self.status.issues_remaining(issues.len());
                let first_invalid = issues
                    .iter()
                    .filter_map(|issue| issue.name.as_deref())
                    .find_map(|name| self.props.definition().position(name));
                if first_invalid.is_some() {
                    self.focus = first_invalid;
                }
            }
        }
    }

    fn on_exit(&mut self) {
        let unsaved = self.props.handle().is_dirty()
            && self.result.as_ref() != Some(&self.props.watch());
        if self.options.confirm_exit && unsaved && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.should_quit = true;
    }

    fn stored_text(&self, name: &str) -> String {
        self.props
            .handle()
            .get_value(name)
            .map(|value| display_value(&value))
            .unwrap_or_default()
    }
}
