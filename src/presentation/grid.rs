use ratatui::layout::Rect;

use crate::domain::{GRID_COLUMNS, GridSpan, HeaderVariant};

use super::render::{FieldNode, GridCell};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    Xs,
    Sm,
    Md,
}

impl Breakpoint {
    pub const SM_MIN_WIDTH: u16 = 60;
    pub const MD_MIN_WIDTH: u16 = 100;

    pub fn for_width(width: u16) -> Self {
        if width >= Self::MD_MIN_WIDTH {
            Self::Md
        } else if width >= Self::SM_MIN_WIDTH {
            Self::Sm
        } else {
            Self::Xs
        }
    }

    /// Columns taken by `span`; a size inherits from the next smaller one and
    /// falls back to the full row.
    pub fn columns(self, span: GridSpan) -> u16 {
        let columns = match self {
            Self::Xs => span.xs,
            Self::Sm => span.sm.or(span.xs),
            Self::Md => span.md.or(span.sm).or(span.xs),
        };
        columns.unwrap_or(GRID_COLUMNS).clamp(1, GRID_COLUMNS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlacement {
    pub index: usize,
    pub row: usize,
    pub column: u16,
    pub span: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    pub breakpoint: Breakpoint,
    pub placements: Vec<CellPlacement>,
    pub row_heights: Vec<u16>,
}

impl GridLayout {
    /// Packs cells left to right, wrapping when a span no longer fits the row.
    pub fn compute(cells: &[GridCell], width: u16) -> Self {
        let breakpoint = Breakpoint::for_width(width);
        let mut placements = Vec::with_capacity(cells.len());
        let mut row_heights: Vec<u16> = Vec::new();
        let mut row = 0usize;
        let mut column = 0u16;

        for cell in cells {
            let span = breakpoint.columns(cell.span);
            if column + span > GRID_COLUMNS {
                row += 1;
                column = 0;
            }
            let height = node_height(&cell.node);
            match row_heights.get_mut(row) {
                Some(existing) => *existing = (*existing).max(height),
                None => row_heights.push(height),
            }
            placements.push(CellPlacement {
                index: cell.index,
                row,
                column,
                span,
            });
            column += span;
        }

        Self {
            breakpoint,
            placements,
            row_heights,
        }
    }

    pub fn placement(&self, index: usize) -> Option<&CellPlacement> {
        self.placements
            .iter()
            .find(|placement| placement.index == index)
    }

    pub fn rows(&self) -> usize {
        self.row_heights.len()
    }

    /// Adjusts the first visible row so that `focused_row` fits in `viewport` lines.
    pub fn scroll_to(&self, current: usize, focused_row: usize, viewport: u16) -> usize {
        if focused_row < current {
            return focused_row;
        }
        let mut first = current.min(self.rows().saturating_sub(1));
        while first < focused_row && self.height_between(first, focused_row + 1) > viewport {
            first += 1;
        }
        first
    }

    /// Screen rectangle of each placement, given the first visible row.
    pub fn rects(&self, area: Rect, first_row: usize) -> Vec<(usize, Rect)> {
        let mut rects = Vec::new();
        for placement in &self.placements {
            if placement.row < first_row {
                continue;
            }
            let top = self.height_between(first_row, placement.row);
            if top >= area.height {
                continue;
            }
            let height = self.row_heights[placement.row].min(area.height - top);
            let x = area.x + column_offset(area.width, placement.column);
            let right = area.x + column_offset(area.width, placement.column + placement.span);
            rects.push((
                placement.index,
                Rect::new(x, area.y + top, right.saturating_sub(x), height),
            ));
        }
        rects
    }

    fn height_between(&self, from: usize, to: usize) -> u16 {
        self.row_heights
            .get(from..to.min(self.rows()))
            .map(|heights| heights.iter().sum())
            .unwrap_or(0)
    }
}

fn column_offset(width: u16, column: u16) -> u16 {
    let scaled = u32::from(width) * u32::from(column) / u32::from(GRID_COLUMNS);
    u16::try_from(scaled).unwrap_or(width)
}

/// Lines a node needs, borders included.
pub fn node_height(node: &FieldNode) -> u16 {
    match node {
        FieldNode::TextInput(_) | FieldNode::DatePicker(_) | FieldNode::Autocomplete(_) => 4,
        FieldNode::Header { variant, .. } => match variant {
            HeaderVariant::H1 | HeaderVariant::H2 => 2,
            _ => 1,
        },
        FieldNode::DividerHeader { .. } | FieldNode::Divider => 1,
        FieldNode::Button(_) => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TextAlign;

    fn cell(index: usize, span: GridSpan) -> GridCell {
        GridCell {
            index,
            span,
            node: FieldNode::Divider,
        }
    }

    #[test]
    fn breakpoints_by_width() {
        assert_eq!(Breakpoint::for_width(40), Breakpoint::Xs);
        assert_eq!(Breakpoint::for_width(60), Breakpoint::Sm);
        assert_eq!(Breakpoint::for_width(99), Breakpoint::Sm);
        assert_eq!(Breakpoint::for_width(100), Breakpoint::Md);
    }

    #[test]
    fn spans_inherit_from_smaller_sizes() {
        let span = GridSpan {
            xs: Some(12),
            sm: Some(6),
            md: None,
        };
        assert_eq!(Breakpoint::Xs.columns(span), 12);
        assert_eq!(Breakpoint::Md.columns(span), 6);
        assert_eq!(Breakpoint::Md.columns(GridSpan::default()), 12);
        assert_eq!(Breakpoint::Md.columns(GridSpan::uniform(40)), 12);
        assert_eq!(Breakpoint::Md.columns(GridSpan::uniform(0)), 1);
    }

    #[test]
    fn packs_and_wraps_rows() {
        let cells = vec![
            cell(0, GridSpan::uniform(6)),
            cell(1, GridSpan::uniform(6)),
            cell(2, GridSpan::uniform(8)),
            cell(3, GridSpan::uniform(6)),
        ];
        let layout = GridLayout::compute(&cells, 120);
        let rows: Vec<_> = layout.placements.iter().map(|p| (p.row, p.column)).collect();
        assert_eq!(rows, vec![(0, 0), (0, 6), (1, 0), (2, 0)]);

        let rects = layout.rects(Rect::new(0, 0, 120, 10), 0);
        assert_eq!(rects[1].1, Rect::new(60, 0, 60, 1));
    }

    #[test]
    fn row_height_is_tallest_node() {
        let cells = vec![
            GridCell {
                index: 0,
                span: GridSpan::uniform(6),
                node: FieldNode::DividerHeader {
                    label: "x".into(),
                    align: TextAlign::Center,
                },
            },
            GridCell {
                index: 1,
                span: GridSpan::uniform(6),
                node: FieldNode::TextInput(Default::default()),
            },
        ];
        let layout = GridLayout::compute(&cells, 120);
        assert_eq!(layout.row_heights, vec![4]);
    }

    #[test]
    fn scrolls_by_rows_to_keep_focus_visible() {
        let cells: Vec<_> = (0..6).map(|i| cell(i, GridSpan::uniform(12))).collect();
        let layout = GridLayout::compute(&cells, 80);
        assert_eq!(layout.scroll_to(0, 2, 3), 0);
        assert_eq!(layout.scroll_to(0, 4, 3), 2);
        assert_eq!(layout.scroll_to(3, 1, 3), 1);

        let rects = layout.rects(Rect::new(0, 0, 80, 3), 2);
        let visible: Vec<_> = rects.iter().map(|(index, _)| *index).collect();
        assert_eq!(visible, vec![2, 3, 4]);
    }
}
