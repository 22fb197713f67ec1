use ratatui::{
    Frame,
    layout::{Position, Rect},
    widgets::{Block, Borders, Paragraph},
};

use super::{super::grid::GridLayout, super::render::FormView, fields::render_cell};

/// Lays the form out on the grid and draws the visible rows.
///
/// `scroll_row` is the first visible row; it is moved to keep `focus` on screen.
pub fn render_body(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    view: &FormView,
    focus: Option<usize>,
    scroll_row: &mut usize,
    enable_cursor: bool,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.cells.is_empty() {
        frame.render_widget(Paragraph::new("This form has no fields"), inner);
        return;
    }

    let layout = GridLayout::compute(&view.cells, inner.width);
    if let Some(row) = focus
        .and_then(|index| layout.placement(index))
        .map(|placement| placement.row)
    {
        *scroll_row = layout.scroll_to(*scroll_row, row, inner.height);
    }
    *scroll_row = (*scroll_row).min(layout.rows().saturating_sub(1));

    let mut cursor: Option<Position> = None;
    for (index, rect) in layout.rects(inner, *scroll_row) {
        let Some(cell) = view.cell(index) else {
            continue;
        };
        let focused = focus == Some(index);
        if let Some(position) = render_cell(frame, rect, &cell.node, focused) {
            cursor = Some(position);
        }
    }

    if enable_cursor && let Some(position) = cursor {
        frame.set_cursor_position(position);
    }
}
