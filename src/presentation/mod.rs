mod components;
mod grid;
mod render;
mod view;

pub use components::render_cell;
pub use grid::{Breakpoint, CellPlacement, GridLayout, node_height};
pub use render::{
    AutocompleteNode, ButtonNode, DateNode, FieldNode, FormView, GridCell, InputNode, render_form,
};
pub(crate) use render::display_value;
pub use view::{PopupRender, UiContext, draw};
