use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use super::super::view::PopupRender;

pub fn render_popup(frame: &mut Frame<'_>, popup: PopupRender<'_>) {
    let max_width = popup
        .options
        .iter()
        .map(|option| UnicodeWidthStr::width(option.as_str()))
        .chain([
            UnicodeWidthStr::width(popup.title),
            UnicodeWidthStr::width(popup.filter) + 8,
        ])
        .max()
        .unwrap_or(10) as u16;
    let width_limit = frame.area().width.saturating_sub(2).max(1);
    let width = max_width.saturating_add(6).min(width_limit);
    let height = popup
        .options
        .len()
        .max(1)
        .saturating_add(2)
        .min(frame.area().height as usize) as u16;
    let area = centered(frame.area(), width, height.max(3));
    frame.render_widget(Clear, area);

    let title = if popup.filter.is_empty() {
        popup.title.to_string()
    } else {
        format!("{} [{}]", popup.title, popup.filter)
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    if popup.options.is_empty() {
        let empty = Paragraph::new("No matching options")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem<'static>> = popup
        .options
        .iter()
        .map(|option| ListItem::new(option.clone()))
        .collect();
    let mut state = ListState::default();
    let selected = popup.selected.min(popup.options.len().saturating_sub(1));
    state.select(Some(selected));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut state);
}

/// Rectangle of at most `width` x `height` centred in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centres_and_clamps_to_the_frame() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered(area, 20, 6), Rect::new(30, 9, 20, 6));
        assert_eq!(centered(Rect::new(2, 1, 10, 2), 40, 6), Rect::new(2, 1, 10, 2));
    }
}
