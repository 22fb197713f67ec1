use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use super::{
    components::{render_body, render_footer, render_popup},
    render::FormView,
};

pub struct UiContext<'a> {
    pub title: &'a str,
    pub view: &'a FormView,
    /// Cell index of the focused field.
    pub focus: Option<usize>,
    pub focus_label: Option<&'a str>,
    pub status_message: &'a str,
    pub dirty: bool,
    pub error_count: usize,
    pub help: Option<&'a str>,
    pub popup: Option<PopupRender<'a>>,
}

pub struct PopupRender<'a> {
    pub title: &'a str,
    pub filter: &'a str,
    pub options: &'a [String],
    pub selected: usize,
}

pub fn draw(frame: &mut Frame<'_>, ctx: UiContext<'_>, scroll_row: &mut usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(frame.area());

    let cursor_enabled = ctx.popup.is_none();
    render_body(
        frame,
        chunks[0],
        ctx.title,
        ctx.view,
        ctx.focus,
        scroll_row,
        cursor_enabled,
    );
    render_footer(frame, chunks[1], &ctx);

    if let Some(popup) = ctx.popup {
        render_popup(frame, popup);
    }
}
