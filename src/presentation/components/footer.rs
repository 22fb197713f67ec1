use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::super::view::UiContext;

/// Two lines: key help, then the status line with an issue badge.
pub fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let [help_row, status_row] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .areas(area);

    if let Some(help) = ctx.help {
        frame.render_widget(
            Paragraph::new(help.to_string())
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::DarkGray)),
            help_row,
        );
    }

    let mut spans = vec![issue_badge(ctx.error_count), Span::raw(" ")];
    if ctx.dirty {
        spans.push(Span::styled(
            "* ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::raw(status_text(ctx)));
    frame.render_widget(Paragraph::new(Line::from(spans)), status_row);
}

fn issue_badge(count: usize) -> Span<'static> {
    match count {
        0 => Span::styled("[ok]", Style::default().fg(Color::Green)),
        n => Span::styled(
            format!("[{n} issue{}]", if n == 1 { "" } else { "s" }),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    }
}

fn status_text(ctx: &UiContext<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if !ctx.status_message.trim().is_empty() {
        parts.push(ctx.status_message);
    }
    if let Some(error) = ctx.view.global_errors.first() {
        parts.push(error);
    }
    let mut text = if parts.is_empty() {
        "Ready".to_string()
    } else {
        parts.join(" • ")
    };
    if let Some(label) = ctx.focus_label {
        text.push_str(" • on ");
        text.push_str(label);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::FormView;

    fn context<'a>(view: &'a FormView, status: &'a str) -> UiContext<'a> {
        UiContext {
            title: "Form",
            view,
            focus: None,
            focus_label: Some("Name"),
            status_message: status,
            dirty: false,
            error_count: 0,
            help: None,
            popup: None,
        }
    }

    #[test]
    fn status_joins_message_form_error_and_focus() {
        let view = FormView {
            cells: Vec::new(),
            global_errors: vec!["start must precede end".into()],
        };
        assert_eq!(
            status_text(&context(&view, "Saved")),
            "Saved • start must precede end • on Name"
        );
        let empty = FormView {
            cells: Vec::new(),
            global_errors: Vec::new(),
        };
        assert_eq!(status_text(&context(&empty, " ")), "Ready • on Name");
    }

    #[test]
    fn badge_pluralizes_issues() {
        assert_eq!(issue_badge(1).content, "[1 issue]");
        assert_eq!(issue_badge(3).content, "[3 issues]");
    }
}
