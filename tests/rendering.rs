use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
use serde_json::json;

use gridform::domain::{
    AutocompleteField, ButtonField, DateField, GridSpan, HeaderField, HeaderVariant, TextField,
};
use gridform::presentation::{Breakpoint, FieldNode, GridLayout, UiContext, draw};
use gridform::{
    FormConfig, FormProps, Snapshot, autocomplete, button, date_picker, divider, divider_header,
    header, render_form, text_field, use_form,
};

fn profile_form() -> FormProps {
    let fields = vec![
        header(HeaderField::new("Profile").with_variant(HeaderVariant::H2)),
        text_field(TextField::new("first", "First name").with_grid(GridSpan {
            xs: Some(12),
            sm: Some(6),
            md: None,
        })),
        text_field(TextField::new("last", "Last name").with_grid(GridSpan {
            xs: Some(12),
            sm: Some(6),
            md: None,
        })),
        divider_header(HeaderField::new("Details")),
        date_picker(DateField::new("born", "Born").with_display_format("%d %b %Y")),
        autocomplete(AutocompleteField::new("country", "Country", ["Austria", "Chile"])),
        divider(),
        button(ButtonField::new("Save")),
    ];
    use_form(
        FormConfig::new(fields, |_| {}).with_initial_values(Snapshot::from([
            ("first", json!("Avi")),
            ("born", json!("1990-05-17")),
        ])),
    )
    .expect("form")
    .form_props
}

fn buffer_text(buffer: &Buffer) -> String {
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn one_node_per_descriptor_in_order() {
    let view = render_form(&profile_form());
    let kinds: Vec<&str> = view
        .cells
        .iter()
        .map(|cell| match &cell.node {
            FieldNode::TextInput(_) => "text",
            FieldNode::DatePicker(_) => "date",
            FieldNode::Autocomplete(_) => "autocomplete",
            FieldNode::Header { .. } => "header",
            FieldNode::DividerHeader { .. } => "dividerHeader",
            FieldNode::Divider => "divider",
            FieldNode::Button(_) => "button",
        })
        .collect();
    assert_eq!(
        kinds,
        [
            "header",
            "text",
            "text",
            "dividerHeader",
            "date",
            "autocomplete",
            "divider",
            "button"
        ]
    );
    let indices: Vec<usize> = view.cells.iter().map(|cell| cell.index).collect();
    assert_eq!(indices, (0..8).collect::<Vec<_>>());

    let FieldNode::Autocomplete(country) = &view.cells[5].node else {
        panic!("expected autocomplete");
    };
    assert_eq!(country.selected, None);
    assert!(country.input.value.is_empty());
    let FieldNode::DatePicker(born) = &view.cells[4].node else {
        panic!("expected date picker");
    };
    assert_eq!(born.formatted.as_deref(), Some("17 May 1990"));
}

#[test]
fn spans_follow_the_breakpoint() {
    let view = render_form(&profile_form());
    let narrow = GridLayout::compute(&view.cells, 50);
    assert_eq!(narrow.breakpoint, Breakpoint::Xs);
    assert_ne!(
        narrow.placement(1).map(|p| p.row),
        narrow.placement(2).map(|p| p.row)
    );

    let wide = GridLayout::compute(&view.cells, 120);
    assert_eq!(wide.breakpoint, Breakpoint::Md);
    let first = wide.placement(1).expect("first");
    let last = wide.placement(2).expect("last");
    assert_eq!((first.row, first.span), (last.row, 6));
    assert_eq!(wide.placement(4).map(|p| p.span), Some(12));
}

#[test]
fn draws_the_form_into_a_terminal() {
    let props = profile_form();
    let view = render_form(&props);
    let mut terminal = Terminal::new(TestBackend::new(110, 40)).expect("terminal");
    let mut scroll_row = 0;
    terminal
        .draw(|frame| {
            draw(
                frame,
                UiContext {
                    title: "Signup",
                    view: &view,
                    focus: Some(1),
                    focus_label: Some("First name"),
                    status_message: "Ready",
                    dirty: false,
                    error_count: 0,
                    help: Some("Ctrl+S submit"),
                    popup: None,
                },
                &mut scroll_row,
            )
        })
        .expect("draw");

    let screen = buffer_text(terminal.backend().buffer());
    for expected in ["Signup", "Profile", "First name", "Avi", "Details", "Save", "[ok]"] {
        assert!(screen.contains(expected), "missing {expected:?} in\n{screen}");
    }
    assert_eq!(scroll_row, 0);
}
