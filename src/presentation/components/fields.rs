use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use textwrap::wrap;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::{ButtonColor, ButtonVariant, HeaderVariant, TextAlign};

use super::super::render::{ButtonNode, FieldNode, InputNode};

/// Draws one grid cell. Returns the cursor position for a focused text entry.
pub fn render_cell(
    frame: &mut Frame<'_>,
    area: Rect,
    node: &FieldNode,
    focused: bool,
) -> Option<Position> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    match node {
        FieldNode::TextInput(input) => render_input(frame, area, input, None, focused, true),
        FieldNode::DatePicker(date) => render_input(
            frame,
            area,
            &date.input,
            date.formatted.as_deref().filter(|text| *text != date.input.value),
            focused,
            true,
        ),
        FieldNode::Autocomplete(autocomplete) => {
            let suffix = if autocomplete.options.is_empty() {
                None
            } else {
                Some("▾")
            };
            render_input(frame, area, &autocomplete.input, suffix, focused, false)
        }
        FieldNode::Header {
            label,
            variant,
            align,
        } => {
            render_header(frame, area, label, *variant, *align);
            None
        }
        FieldNode::DividerHeader { label, align } => {
            let line = divider_line(label, area.width, *align);
            frame.render_widget(
                Paragraph::new(line).style(Style::default().fg(Color::Cyan)),
                area,
            );
            None
        }
        FieldNode::Divider => {
            let rule = "─".repeat(area.width as usize);
            frame.render_widget(
                Paragraph::new(rule).style(Style::default().fg(Color::DarkGray)),
                area,
            );
            None
        }
        FieldNode::Button(button) => {
            render_button(frame, area, button, focused);
            None
        }
    }
}

fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    input: &InputNode,
    hint: Option<&str>,
    focused: bool,
    editable: bool,
) -> Option<Position> {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let mut title = input.label.clone();
    if input.required {
        title.push_str(" *");
    }
    let border_style = if input.disabled {
        Style::default().fg(Color::DarkGray)
    } else if input.error.is_some() {
        Style::default().fg(Color::Red)
    } else if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(chunks[0]);

    let editing = focused && editable;
    let shown = if editing {
        visible_tail(&input.value, inner.width)
    } else {
        input.value.as_str()
    };
    let mut spans = Vec::new();
    match (input.value.is_empty(), &input.placeholder) {
        (true, Some(placeholder)) => spans.push(Span::styled(
            placeholder.clone(),
            Style::default().fg(Color::DarkGray),
        )),
        _ => spans.push(Span::styled(
            shown.to_string(),
            if input.disabled {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            },
        )),
    }
    if let Some(hint) = hint {
        spans.push(Span::styled(
            format!("  {hint}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[0]);

    if let Some(line) = message_line(input, chunks[1].width) {
        frame.render_widget(Paragraph::new(line), chunks[1]);
    }

    if !editing || inner.width == 0 || inner.height == 0 {
        return None;
    }
    let shown_width = UnicodeWidthStr::width(shown) as u16;
    Some(Position::new(
        inner.x + shown_width.min(inner.width - 1),
        inner.y,
    ))
}

/// Longest suffix of `text` that leaves one column free for the cursor.
fn visible_tail(text: &str, width: u16) -> &str {
    let budget = usize::from(width.saturating_sub(1));
    if UnicodeWidthStr::width(text) <= budget {
        return text;
    }
    let mut used = 0;
    let mut start = text.len();
    for (offset, ch) in text.char_indices().rev() {
        used += UnicodeWidthChar::width(ch).unwrap_or(0);
        if used > budget {
            break;
        }
        start = offset;
    }
    &text[start..]
}

fn message_line(input: &InputNode, width: u16) -> Option<Line<'static>> {
    let (text, style) = match (&input.error, &input.helper_text) {
        (Some(error), _) => (error, Style::default().fg(Color::Red)),
        (None, Some(helper)) => (helper, Style::default().fg(Color::Gray)),
        (None, None) => return None,
    };
    let width = (width as usize).max(4);
    let mut segments = wrap(text, width.saturating_sub(1)).into_iter();
    let mut first = segments.next()?.into_owned();
    if segments.next().is_some() {
        first.push('…');
    }
    Some(Line::from(Span::styled(format!(" {first}"), style)))
}

fn render_header(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    variant: HeaderVariant,
    align: TextAlign,
) {
    let style = match variant {
        HeaderVariant::H1 | HeaderVariant::H2 => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeaderVariant::H3 | HeaderVariant::H4 => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        HeaderVariant::H5 | HeaderVariant::H6 => Style::default().add_modifier(Modifier::BOLD),
    };
    frame.render_widget(
        Paragraph::new(label.to_string())
            .style(style)
            .alignment(alignment(align)),
        area,
    );
}

fn divider_line(label: &str, width: u16, align: TextAlign) -> String {
    let width = width as usize;
    let label = format!(" {label} ");
    let label_width = UnicodeWidthStr::width(label.as_str());
    if label_width >= width {
        return label.trim().to_string();
    }
    let fill = width - label_width;
    let left = match align {
        TextAlign::Left => 2.min(fill),
        TextAlign::Center => fill / 2,
        TextAlign::Right => fill.saturating_sub(2),
    };
    format!("{}{label}{}", "─".repeat(left), "─".repeat(fill - left))
}

fn render_button(frame: &mut Frame<'_>, area: Rect, button: &ButtonNode, focused: bool) {
    let accent = if button.disabled {
        Color::DarkGray
    } else {
        color_of(button.color)
    };
    let mut label_style = match button.variant {
        ButtonVariant::Contained => Style::default().fg(Color::Black).bg(accent),
        ButtonVariant::Outlined | ButtonVariant::Text => Style::default().fg(accent),
    };
    if focused {
        label_style = label_style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    }
    let borders = match button.variant {
        ButtonVariant::Text => Borders::NONE,
        ButtonVariant::Outlined | ButtonVariant::Contained => Borders::ALL,
    };
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(accent));
    let label = Paragraph::new(Span::styled(format!(" {} ", button.label), label_style))
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(label, area);
}

fn color_of(color: ButtonColor) -> Color {
    match color {
        ButtonColor::Primary => Color::Blue,
        ButtonColor::Secondary => Color::Magenta,
        ButtonColor::Success => Color::Green,
        ButtonColor::Error => Color::Red,
        ButtonColor::Warning => Color::Yellow,
        ButtonColor::Info => Color::Cyan,
    }
}

fn alignment(align: TextAlign) -> Alignment {
    match align {
        TextAlign::Left => Alignment::Left,
        TextAlign::Center => Alignment::Center,
        TextAlign::Right => Alignment::Right,
    }
}
