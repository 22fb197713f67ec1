mod body;
mod fields;
mod footer;
mod popup;

pub use body::render_body;
pub use fields::render_cell;
pub use footer::render_footer;
pub use popup::render_popup;
