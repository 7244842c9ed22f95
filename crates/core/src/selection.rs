use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// A rectangular range of cells, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Range {
    /// Create a new range, automatically normalizing so start <= end.
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self {
            start_row: r1.min(r2),
            start_col: c1.min(c2),
            end_row: r1.max(r2),
            end_col: c1.max(c2),
        }
    }

    /// Create a single-cell range.
    pub fn single(row: usize, col: usize) -> Self {
        Self {
            start_row: row,
            start_col: col,
            end_row: row,
            end_col: col,
        }
    }

    /// Check if this range contains a cell.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start_row && row <= self.end_row &&
        col >= self.start_col && col <= self.end_col
    }

    pub fn row_count(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    pub fn col_count(&self) -> usize {
        self.end_col - self.start_col + 1
    }

    /// Number of cells in this range.
    pub fn cell_count(&self) -> usize {
        self.row_count() * self.col_count()
    }

    /// Iterate over all cells in this range (row-major order).
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let start_col = self.start_col;
        let end_col = self.end_col;

        (self.start_row..=self.end_row).flat_map(move |r| {
            (start_col..=end_col).map(move |c| (r, c))
        })
    }

    /// Check if this is a single cell.
    pub fn is_single(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }

    /// Intersect with a `rows` x `cols` grid. None if nothing is left.
    pub fn clamp(&self, rows: usize, cols: usize) -> Option<Range> {
        if rows == 0 || cols == 0 || self.start_row >= rows || self.start_col >= cols {
            return None;
        }
        Some(Range {
            start_row: self.start_row,
            start_col: self.start_col,
            end_row: self.end_row.min(rows - 1),
            end_col: self.end_col.min(cols - 1),
        })
    }
}

/// What is selected right now.
///
/// Each variant carries its own anchor, so switching modes drops the
/// other mode's transient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    /// One contiguous rectangle, grown from `anchor`.
    Range { range: Range, anchor: (usize, usize) },
    /// Individually toggled cells. `anchor` is the last touched cell and
    /// drives Shift-click rectangle fills.
    Cells {
        cells: FxHashSet<(usize, usize)>,
        anchor: Option<(usize, usize)>,
    },
}

/// The selection model: range or discontiguous cells, plus the active cell.
#[derive(Debug, Clone)]
pub struct Selection {
    mode: SelectionMode,
    active: (usize, usize),
    selecting: bool,
}

impl Selection {
    /// Create a new selection with a single cell.
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            mode: SelectionMode::Range {
                range: Range::single(row, col),
                anchor: (row, col),
            },
            active: (row, col),
            selecting: false,
        }
    }

    pub fn mode(&self) -> &SelectionMode {
        &self.mode
    }

    /// The cell keyboard input targets.
    pub fn active_cell(&self) -> (usize, usize) {
        self.active
    }

    /// Anchor for Shift-extension, if the current mode has one.
    pub fn anchor(&self) -> Option<(usize, usize)> {
        match &self.mode {
            SelectionMode::Range { anchor, .. } => Some(*anchor),
            SelectionMode::Cells { anchor, .. } => *anchor,
        }
    }

    /// True while a mouse drag is in progress.
    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    pub fn is_discontiguous(&self) -> bool {
        matches!(self.mode, SelectionMode::Cells { .. })
    }

    /// Check if a cell is selected. O(1) in both modes.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        match &self.mode {
            SelectionMode::Range { range, .. } => range.contains(row, col),
            SelectionMode::Cells { cells, .. } => cells.contains(&(row, col)),
        }
    }

    /// Total number of selected cells.
    pub fn cell_count(&self) -> usize {
        match &self.mode {
            SelectionMode::Range { range, .. } => range.cell_count(),
            SelectionMode::Cells { cells, .. } => cells.len(),
        }
    }

    /// Bounding rectangle of the selection.
    ///
    /// For discontiguous selections this scans the set once, so the cost
    /// is proportional to the selection, not the grid. None when the set
    /// is empty.
    pub fn bounds(&self) -> Option<Range> {
        match &self.mode {
            SelectionMode::Range { range, .. } => Some(*range),
            SelectionMode::Cells { cells, .. } => {
                let mut iter = cells.iter();
                let &(r0, c0) = iter.next()?;
                let init = Range::single(r0, c0);
                Some(iter.fold(init, |acc, &(r, c)| Range {
                    start_row: acc.start_row.min(r),
                    start_col: acc.start_col.min(c),
                    end_row: acc.end_row.max(r),
                    end_col: acc.end_col.max(c),
                }))
            }
        }
    }

    /// All selected cells in row-major order.
    pub fn selected_cells(&self) -> Vec<(usize, usize)> {
        match &self.mode {
            SelectionMode::Range { range, .. } => range.cells().collect(),
            SelectionMode::Cells { cells, .. } => {
                let mut out: Vec<_> = cells.iter().copied().collect();
                out.sort_unstable();
                out
            }
        }
    }

    /// True if more than one cell is selected.
    pub fn is_multi(&self) -> bool {
        self.cell_count() > 1
    }

    /// Where a paste should start writing: the top-left of the selection's
    /// bounds when several cells are selected, otherwise the active cell.
    pub fn paste_anchor(&self) -> (usize, usize) {
        if self.is_multi() {
            if let Some(b) = self.bounds() {
                return (b.start_row, b.start_col);
            }
        }
        self.active
    }

    // ========================================================================
    // Pointer interaction
    // ========================================================================

    /// Set selection to a single cell (plain click).
    pub fn select_cell(&mut self, row: usize, col: usize) {
        self.mode = SelectionMode::Range {
            range: Range::single(row, col),
            anchor: (row, col),
        };
        self.active = (row, col);
        self.selecting = false;
    }

    /// Mouse down without modifiers: select the cell and start a drag.
    pub fn begin_drag(&mut self, row: usize, col: usize) {
        self.select_cell(row, col);
        self.selecting = true;
    }

    /// Mouse move while the button is held. Recomputes the range from the
    /// anchor and the cursor (four integers, no cell data touched).
    /// Returns true if the range changed.
    pub fn drag_to(&mut self, row: usize, col: usize) -> bool {
        if !self.selecting {
            return false;
        }
        match &mut self.mode {
            SelectionMode::Range { range, anchor } => {
                let next = Range::new(anchor.0, anchor.1, row, col);
                if next == *range {
                    return false;
                }
                *range = next;
                true
            }
            SelectionMode::Cells { .. } => false,
        }
    }

    /// Mouse up: the drag is over.
    pub fn end_drag(&mut self) {
        self.selecting = false;
    }

    /// Ctrl/Cmd-click: toggle one cell in the discontiguous set.
    ///
    /// Coming from range mode starts a fresh, empty set.
    pub fn toggle_cell(&mut self, row: usize, col: usize) {
        if !self.is_discontiguous() {
            self.mode = SelectionMode::Cells {
                cells: FxHashSet::default(),
                anchor: None,
            };
        }
        if let SelectionMode::Cells { cells, anchor } = &mut self.mode {
            if !cells.remove(&(row, col)) {
                cells.insert((row, col));
            }
            *anchor = Some((row, col));
        }
        self.active = (row, col);
        self.selecting = false;
    }

    /// Shift-click.
    ///
    /// In range mode the range is re-spanned from the anchor. In
    /// discontiguous mode the rectangle between the anchor and the target
    /// is added to the set; without an anchor the target is simply added.
    pub fn extend_to(&mut self, row: usize, col: usize) {
        match &mut self.mode {
            SelectionMode::Range { range, anchor } => {
                *range = Range::new(anchor.0, anchor.1, row, col);
                // Active cell stays at the anchor, like a drag.
            }
            SelectionMode::Cells { cells, anchor } => {
                match *anchor {
                    Some((ar, ac)) => cells.extend(Range::new(ar, ac, row, col).cells()),
                    None => {
                        cells.insert((row, col));
                        *anchor = Some((row, col));
                    }
                }
                self.active = (row, col);
            }
        }
        self.selecting = false;
    }

    // ========================================================================
    // Keyboard interaction
    // ========================================================================

    /// Move active cell by delta, collapsing to single cell.
    pub fn move_by(&mut self, d_row: isize, d_col: isize, max_row: usize, max_col: usize) {
        let (row, col) = self.active;
        let new_row = clamp_offset(row, d_row, max_row);
        let new_col = clamp_offset(col, d_col, max_col);
        self.select_cell(new_row, new_col);
    }

    /// Extend selection by delta from current extent (Shift+arrow).
    pub fn extend_by(&mut self, d_row: isize, d_col: isize, max_row: usize, max_col: usize) {
        if self.is_discontiguous() {
            let (row, col) = self.active;
            self.select_cell(row, col);
        }
        if let SelectionMode::Range { range, anchor } = &mut self.mode {
            // The moving corner is whichever edge the anchor isn't on
            let (anchor_row, anchor_col) = *anchor;
            let current_row = if anchor_row == range.start_row { range.end_row } else { range.start_row };
            let current_col = if anchor_col == range.start_col { range.end_col } else { range.start_col };

            let new_row = clamp_offset(current_row, d_row, max_row);
            let new_col = clamp_offset(current_col, d_col, max_col);
            *range = Range::new(anchor_row, anchor_col, new_row, new_col);
        }
    }

    /// Select every cell of a `rows` x `cols` grid.
    pub fn select_all(&mut self, rows: usize, cols: usize) {
        if rows == 0 || cols == 0 {
            self.select_cell(0, 0);
            return;
        }
        self.mode = SelectionMode::Range {
            range: Range::new(0, 0, rows - 1, cols - 1),
            anchor: (0, 0),
        };
        self.active = (0, 0);
        self.selecting = false;
    }

    /// Select an entire row.
    pub fn select_row(&mut self, row: usize, cols: usize) {
        self.mode = SelectionMode::Range {
            range: Range::new(row, 0, row, cols.saturating_sub(1)),
            anchor: (row, 0),
        };
        self.active = (row, 0);
        self.selecting = false;
    }

    /// Select an entire column.
    pub fn select_column(&mut self, col: usize, rows: usize) {
        self.mode = SelectionMode::Range {
            range: Range::new(0, col, rows.saturating_sub(1), col),
            anchor: (0, col),
        };
        self.active = (0, col);
        self.selecting = false;
    }

    /// Drop anything outside a `rows` x `cols` grid.
    ///
    /// Called after structural changes. If nothing selected survives, the
    /// selection collapses to the (clamped) active cell.
    pub fn clamp_to(&mut self, rows: usize, cols: usize) {
        let active = (
            self.active.0.min(rows.saturating_sub(1)),
            self.active.1.min(cols.saturating_sub(1)),
        );
        let survived = match &mut self.mode {
            SelectionMode::Range { range, anchor } => match range.clamp(rows, cols) {
                Some(clamped) => {
                    *range = clamped;
                    *anchor = (
                        anchor.0.clamp(clamped.start_row, clamped.end_row),
                        anchor.1.clamp(clamped.start_col, clamped.end_col),
                    );
                    true
                }
                None => false,
            },
            SelectionMode::Cells { cells, anchor } => {
                cells.retain(|&(r, c)| r < rows && c < cols);
                if anchor.is_some_and(|(r, c)| r >= rows || c >= cols) {
                    *anchor = None;
                }
                !cells.is_empty()
            }
        };
        if survived {
            self.active = active;
        } else {
            self.select_cell(active.0, active.1);
        }
        self.selecting = false;
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

fn clamp_offset(pos: usize, delta: isize, max: usize) -> usize {
    let upper = max.max(1) as isize - 1;
    (pos as isize + delta).clamp(0, upper) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_single() {
        let r = Range::single(5, 3);
        assert!(r.contains(5, 3));
        assert!(!r.contains(5, 4));
        assert!(r.is_single());
        assert_eq!(r.cell_count(), 1);
    }

    #[test]
    fn test_range_normalizes() {
        let r = Range::new(5, 5, 1, 1);
        assert_eq!(r.start_row, 1);
        assert_eq!(r.start_col, 1);
        assert_eq!(r.end_row, 5);
        assert_eq!(r.end_col, 5);
        assert_eq!(r.cell_count(), 25);
    }

    #[test]
    fn test_range_clamp() {
        let r = Range::new(2, 2, 9, 9);
        assert_eq!(r.clamp(5, 4), Some(Range::new(2, 2, 4, 3)));
        assert_eq!(r.clamp(2, 10), None);
        assert_eq!(r.clamp(0, 0), None);
    }

    #[test]
    fn test_drag_recomputes_from_anchor() {
        let mut sel = Selection::new(0, 0);
        sel.begin_drag(4, 4);
        assert!(sel.is_selecting());

        assert!(sel.drag_to(6, 2));
        assert_eq!(sel.bounds(), Some(Range::new(4, 2, 6, 4)));

        // Dragging back above/left of the anchor flips the corners
        assert!(sel.drag_to(1, 7));
        assert_eq!(sel.bounds(), Some(Range::new(1, 4, 4, 7)));
        assert_eq!(sel.active_cell(), (4, 4));

        sel.end_drag();
        assert!(!sel.is_selecting());
        assert!(!sel.drag_to(9, 9));
        assert_eq!(sel.bounds(), Some(Range::new(1, 4, 4, 7)));
    }

    #[test]
    fn test_drag_same_cell_reports_no_change() {
        let mut sel = Selection::default();
        sel.begin_drag(2, 2);
        assert!(!sel.drag_to(2, 2));
    }

    #[test]
    fn test_toggle_builds_discontiguous_set() {
        let mut sel = Selection::new(1, 1);
        sel.toggle_cell(0, 0);
        sel.toggle_cell(2, 2);

        assert!(sel.is_discontiguous());
        assert!(sel.contains(0, 0));
        assert!(sel.contains(2, 2));
        assert!(!sel.contains(1, 1));
        assert_eq!(sel.cell_count(), 2);
        assert_eq!(sel.bounds(), Some(Range::new(0, 0, 2, 2)));
        assert_eq!(sel.anchor(), Some((2, 2)));

        // Toggling again removes
        sel.toggle_cell(2, 2);
        assert!(!sel.contains(2, 2));
        assert_eq!(sel.bounds(), Some(Range::single(0, 0)));
    }

    #[test]
    fn test_empty_set_has_no_bounds() {
        let mut sel = Selection::default();
        sel.toggle_cell(3, 3);
        sel.toggle_cell(3, 3);
        assert_eq!(sel.cell_count(), 0);
        assert_eq!(sel.bounds(), None);
        assert_eq!(sel.paste_anchor(), (3, 3));
    }

    #[test]
    fn test_shift_click_fills_rectangle_additively() {
        let mut sel = Selection::default();
        sel.toggle_cell(5, 5);
        sel.toggle_cell(1, 1);
        sel.extend_to(2, 3);

        // Rectangle (1,1)..(2,3) plus the earlier (5,5)
        assert_eq!(sel.cell_count(), 7);
        assert!(sel.contains(5, 5));
        assert!(sel.contains(2, 3));
        assert!(sel.contains(1, 2));
        assert!(!sel.contains(3, 3));
    }

    #[test]
    fn test_shift_click_in_range_mode_extends_range() {
        let mut sel = Selection::new(2, 2);
        sel.extend_to(4, 5);

        assert_eq!(sel.anchor(), Some((2, 2)));
        assert!(sel.contains(3, 3));
        assert!(sel.contains(4, 5));
        assert!(!sel.contains(1, 1));
    }

    #[test]
    fn test_plain_click_leaves_discontiguous_mode() {
        let mut sel = Selection::default();
        sel.toggle_cell(1, 1);
        sel.toggle_cell(3, 3);
        sel.select_cell(0, 0);

        assert!(!sel.is_discontiguous());
        assert!(!sel.contains(3, 3));
        assert_eq!(sel.cell_count(), 1);
    }

    #[test]
    fn test_selected_cells_are_row_major() {
        let mut sel = Selection::default();
        sel.toggle_cell(2, 0);
        sel.toggle_cell(0, 2);
        sel.toggle_cell(0, 1);
        assert_eq!(sel.selected_cells(), vec![(0, 1), (0, 2), (2, 0)]);
    }

    #[test]
    fn test_paste_anchor_prefers_bounds_top_left() {
        let mut sel = Selection::default();
        sel.toggle_cell(4, 1);
        sel.toggle_cell(2, 3);
        assert_eq!(sel.paste_anchor(), (2, 1));

        let mut sel = Selection::new(3, 3);
        sel.extend_to(1, 5);
        assert_eq!(sel.paste_anchor(), (1, 3));

        let sel = Selection::new(7, 2);
        assert_eq!(sel.paste_anchor(), (7, 2));
    }

    #[test]
    fn test_move_by_clamps() {
        let mut sel = Selection::new(0, 0);
        sel.move_by(-1, -1, 10, 5);
        assert_eq!(sel.active_cell(), (0, 0));

        sel.move_by(20, 20, 10, 5);
        assert_eq!(sel.active_cell(), (9, 4));
        assert_eq!(sel.cell_count(), 1);
    }

    #[test]
    fn test_extend_by_moves_far_corner() {
        let mut sel = Selection::new(2, 2);
        sel.extend_by(1, 0, 10, 10);
        sel.extend_by(0, 2, 10, 10);
        assert_eq!(sel.bounds(), Some(Range::new(2, 2, 3, 4)));

        sel.extend_by(-3, 0, 10, 10);
        assert_eq!(sel.bounds(), Some(Range::new(0, 2, 2, 4)));
        assert_eq!(sel.anchor(), Some((2, 2)));
    }

    #[test]
    fn test_select_all_row_column() {
        let mut sel = Selection::default();
        sel.select_all(4, 3);
        assert_eq!(sel.cell_count(), 12);

        sel.select_row(2, 3);
        assert_eq!(sel.bounds(), Some(Range::new(2, 0, 2, 2)));

        sel.select_column(1, 4);
        assert_eq!(sel.bounds(), Some(Range::new(0, 1, 3, 1)));
    }

    #[test]
    fn test_clamp_to_after_shrink() {
        let mut sel = Selection::new(1, 1);
        sel.extend_to(5, 5);
        sel.clamp_to(4, 3);
        assert_eq!(sel.bounds(), Some(Range::new(1, 1, 3, 2)));

        let mut sel = Selection::default();
        sel.toggle_cell(0, 4);
        sel.toggle_cell(1, 1);
        sel.clamp_to(5, 3);
        assert_eq!(sel.selected_cells(), vec![(1, 1)]);
        assert_eq!(sel.anchor(), Some((1, 1)));

        let mut sel = Selection::new(6, 6);
        sel.clamp_to(3, 2);
        assert_eq!(sel.active_cell(), (2, 1));
        assert_eq!(sel.cell_count(), 1);
    }
}
