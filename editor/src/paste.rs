//! Paste placement.

use enrichgrid_core::Range;

/// Where a pasted block lands and how much the grid must grow first.
///
/// Pure: the same block size, anchor and grid dimensions always give the
/// same plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PastePlan {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
    pub needs_new_rows: usize,
    pub needs_new_cols: usize,
}

impl PastePlan {
    /// Plan a `block_rows` x `block_cols` paste at `anchor` into a grid of
    /// `(rows, cols)`. None for an empty block.
    pub fn new(block_rows: usize, block_cols: usize, anchor: (usize, usize), dims: (usize, usize)) -> Option<Self> {
        if block_rows == 0 || block_cols == 0 {
            return None;
        }
        let (start_row, start_col) = anchor;
        let (rows, cols) = dims;
        let end_row = start_row + block_rows - 1;
        let end_col = start_col + block_cols - 1;
        Some(Self {
            start_row,
            start_col,
            end_row,
            end_col,
            needs_new_rows: (end_row + 1).saturating_sub(rows),
            needs_new_cols: (end_col + 1).saturating_sub(cols),
        })
    }

    pub fn range(&self) -> Range {
        Range::new(self.start_row, self.start_col, self.end_row, self.end_col)
    }

    pub fn needs_growth(&self) -> bool {
        self.needs_new_rows > 0 || self.needs_new_cols > 0
    }

    /// The plan cut down to fit `(rows, cols)`, for when the grid may not grow.
    /// None if the anchor itself is outside the grid.
    pub fn clipped_to(&self, dims: (usize, usize)) -> Option<Self> {
        let (rows, cols) = dims;
        if self.start_row >= rows || self.start_col >= cols {
            return None;
        }
        Some(Self {
            end_row: self.end_row.min(rows - 1),
            end_col: self.end_col.min(cols - 1),
            needs_new_rows: 0,
            needs_new_cols: 0,
            ..*self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enrichgrid_core::Selection;

    #[test]
    fn test_growth_on_ten_row_grid() {
        let dims = (10, 1);
        assert_eq!(PastePlan::new(5, 1, (5, 0), dims).unwrap().needs_new_rows, 0);
        assert_eq!(PastePlan::new(5, 1, (8, 0), dims).unwrap().needs_new_rows, 3);

        let plan = PastePlan::new(5, 1, (9, 0), dims).unwrap();
        assert_eq!(plan.needs_new_rows, 4);
        assert_eq!((plan.end_row, plan.end_col), (13, 0));
        assert_eq!(plan.needs_new_cols, 0);
    }

    #[test]
    fn test_column_growth() {
        let plan = PastePlan::new(1, 3, (0, 2), (4, 3)).unwrap();
        assert_eq!(plan.needs_new_cols, 2);
        assert!(plan.needs_growth());
        assert_eq!(plan.range(), Range::new(0, 2, 0, 4));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let a = PastePlan::new(3, 2, (4, 1), (5, 2));
        let b = PastePlan::new(3, 2, (4, 1), (5, 2));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_block_has_no_plan() {
        assert!(PastePlan::new(0, 3, (0, 0), (5, 5)).is_none());
        assert!(PastePlan::new(3, 0, (0, 0), (5, 5)).is_none());
    }

    #[test]
    fn test_anchor_ignores_selection_history() {
        // Single active cell in a discontiguous selection
        let mut sel = Selection::new(0, 0);
        sel.toggle_cell(3, 2);
        assert!(sel.is_discontiguous());
        assert_eq!(sel.cell_count(), 1);

        let plan = PastePlan::new(2, 2, sel.paste_anchor(), (10, 10)).unwrap();
        assert_eq!((plan.start_row, plan.start_col), (3, 2));

        let contiguous = Selection::new(3, 2);
        let again = PastePlan::new(2, 2, contiguous.paste_anchor(), (10, 10)).unwrap();
        assert_eq!(plan, again);
    }

    #[test]
    fn test_multi_selection_anchors_at_bounds() {
        let mut sel = Selection::new(4, 3);
        sel.extend_to(1, 1);
        let plan = PastePlan::new(1, 1, sel.paste_anchor(), (10, 10)).unwrap();
        assert_eq!((plan.start_row, plan.start_col), (1, 1));
    }

    #[test]
    fn test_clipped_plan() {
        let plan = PastePlan::new(5, 3, (8, 1), (10, 2)).unwrap();
        let clipped = plan.clipped_to((10, 2)).unwrap();
        assert_eq!((clipped.end_row, clipped.end_col), (9, 1));
        assert!(!clipped.needs_growth());

        assert!(plan.clipped_to((5, 5)).is_none());
    }
}
