//! Navigation and selection operations
//!
//! Contains:
//! - Cell movement (arrow keys, Tab, Home/End, page up/down)
//! - Selection extension (Shift+Arrow) and select all
//! - Pointer selection (click, Ctrl/Cmd-click, Shift-click, drag)

use enrichgrid_core::Range;

use crate::editor::Editor;
use crate::keybindings::{Direction, Modifiers};

impl Editor {
    // =========================================================================
    // Cell Movement
    // =========================================================================

    /// Move the active cell one step, collapsing the selection. Horizontal
    /// moves skip hidden columns.
    pub fn move_active(&mut self, dir: Direction) {
        if self.mode.is_editing() { return; }

        let (rows, cols) = self.grid.dimensions();
        let (d_row, d_col) = dir.delta();
        if d_col != 0 {
            let (row, col) = self.selection.active_cell();
            let next = self.grid.step_visible_col(col.min(cols - 1), d_col);
            self.selection.select_cell(row, next);
        } else {
            self.selection.move_by(d_row, 0, rows, cols);
        }
    }

    pub fn extend_selection(&mut self, dir: Direction) {
        if self.mode.is_editing() { return; }

        let (rows, cols) = self.grid.dimensions();
        let (d_row, d_col) = dir.delta();
        self.selection.extend_by(d_row, d_col, rows, cols);
    }

    pub fn page_up(&mut self) {
        self.move_rows(-(self.page_rows as isize));
    }

    pub fn page_down(&mut self) {
        self.move_rows(self.page_rows as isize);
    }

    fn move_rows(&mut self, delta: isize) {
        if self.mode.is_editing() { return; }
        let (rows, cols) = self.grid.dimensions();
        self.selection.move_by(delta, 0, rows, cols);
    }

    /// Home: first visible column of the current row.
    pub fn move_to_row_start(&mut self) {
        if self.mode.is_editing() { return; }
        let (row, _) = self.selection.active_cell();
        let col = self.grid.visible_columns().next().unwrap_or(0);
        self.selection.select_cell(row, col);
    }

    /// End: last visible column of the current row.
    pub fn move_to_row_end(&mut self) {
        if self.mode.is_editing() { return; }
        let (row, _) = self.selection.active_cell();
        let col = self
            .grid
            .visible_columns()
            .last()
            .unwrap_or(self.grid.col_count() - 1);
        self.selection.select_cell(row, col);
    }

    pub fn select_all(&mut self) {
        if self.mode.is_editing() { return; }
        let (rows, cols) = self.grid.dimensions();
        self.selection.select_all(rows, cols);
    }

    /// Row header click.
    pub fn select_row(&mut self, row: usize) {
        if row < self.grid.row_count() {
            self.selection.select_row(row, self.grid.col_count());
        }
    }

    /// Column header click.
    pub fn select_column(&mut self, col: usize) {
        if col < self.grid.col_count() {
            self.selection.select_column(col, self.grid.row_count());
        }
    }

    /// Bounding rectangle of the current selection.
    pub fn selection_range(&self) -> Option<Range> {
        self.selection.bounds()
    }

    // =========================================================================
    // Pointer Selection
    // =========================================================================

    /// Mouse down on a cell. An edit in progress is committed first.
    ///
    /// - Ctrl/Cmd: toggle the cell in the discontiguous set
    /// - Shift: extend from the anchor
    /// - plain: select the cell and start a drag
    pub fn mouse_down(&mut self, row: usize, col: usize, modifiers: Modifiers) {
        if self.mode.is_editing() {
            self.commit_edit(None);
        }
        if !self.grid.in_bounds(row, col) {
            return;
        }

        if modifiers.primary() {
            self.selection.toggle_cell(row, col);
        } else if modifiers.shift {
            self.selection.extend_to(row, col);
        } else {
            self.selection.begin_drag(row, col);
        }
    }

    /// Mouse moved with the button held. Positions past the edge clamp to
    /// the last row/column. Returns true if the selection changed.
    pub fn mouse_move(&mut self, row: usize, col: usize) -> bool {
        let (rows, cols) = self.grid.dimensions();
        if rows == 0 {
            return false;
        }
        self.selection.drag_to(row.min(rows - 1), col.min(cols - 1))
    }

    pub fn mouse_up(&mut self) {
        self.selection.end_drag();
    }
}

#[cfg(test)]
mod tests {
    use enrichgrid_config::Settings;
    use enrichgrid_engine::Grid;

    use super::*;

    fn editor(rows: usize, cols: usize) -> Editor {
        Editor::new(Grid::new(rows, cols), Settings::default())
    }

    #[test]
    fn test_move_clamps_at_edges() {
        let mut editor = editor(3, 3);
        editor.move_active(Direction::Up);
        editor.move_active(Direction::Left);
        assert_eq!(editor.selection().active_cell(), (0, 0));

        for _ in 0..5 {
            editor.move_active(Direction::Down);
            editor.move_active(Direction::Right);
        }
        assert_eq!(editor.selection().active_cell(), (2, 2));
    }

    #[test]
    fn test_horizontal_move_skips_hidden() {
        let mut editor = editor(2, 4);
        editor.grid.set_column_hidden(1, true).unwrap();
        editor.grid.set_column_hidden(3, true).unwrap();

        editor.move_active(Direction::Right);
        assert_eq!(editor.selection().active_cell(), (0, 2));
        // Nothing visible further right
        editor.move_active(Direction::Right);
        assert_eq!(editor.selection().active_cell(), (0, 2));

        editor.move_to_row_start();
        assert_eq!(editor.selection().active_cell(), (0, 0));
        editor.move_to_row_end();
        assert_eq!(editor.selection().active_cell(), (0, 2));
    }

    #[test]
    fn test_extend_and_move_collapses() {
        let mut editor = editor(5, 5);
        editor.extend_selection(Direction::Down);
        editor.extend_selection(Direction::Right);
        assert_eq!(editor.selection_range(), Some(Range::new(0, 0, 1, 1)));

        editor.move_active(Direction::Down);
        assert_eq!(editor.selection_range(), Some(Range::single(1, 0)));
    }

    #[test]
    fn test_page_moves() {
        let mut editor = editor(50, 1);
        editor.set_page_rows(10);
        editor.page_down();
        assert_eq!(editor.selection().active_cell(), (10, 0));
        editor.page_down();
        editor.page_down();
        editor.page_down();
        editor.page_down();
        assert_eq!(editor.selection().active_cell(), (49, 0));
        editor.page_up();
        assert_eq!(editor.selection().active_cell(), (39, 0));
    }

    #[test]
    fn test_drag_selects_rectangle() {
        let mut editor = editor(5, 5);
        editor.mouse_down(1, 1, Modifiers::default());
        assert!(editor.mouse_move(3, 2));
        assert!(!editor.mouse_move(3, 2));
        // Past the edge clamps
        assert!(editor.mouse_move(99, 99));
        editor.mouse_up();

        assert_eq!(editor.selection_range(), Some(Range::new(1, 1, 4, 4)));
        assert_eq!(editor.selection().active_cell(), (1, 1));
        assert!(!editor.mouse_move(0, 0));
    }

    #[test]
    fn test_ctrl_click_toggles_and_shift_click_fills() {
        let mut editor = editor(5, 5);
        let ctrl = Modifiers { ctrl: true, ..Modifiers::default() };
        let shift = Modifiers { shift: true, ..Modifiers::default() };

        editor.mouse_down(0, 0, ctrl);
        editor.mouse_down(2, 2, ctrl);
        assert_eq!(editor.selection().cell_count(), 2);
        assert!(!editor.selection().contains(1, 1));

        editor.mouse_down(2, 2, ctrl);
        assert_eq!(editor.selection().cell_count(), 1);

        // Anchor is (2, 2) after the last toggle
        editor.mouse_down(3, 3, shift);
        assert!(editor.selection().contains(0, 0));
        assert!(editor.selection().contains(3, 3));
        assert!(editor.selection().contains(2, 3));
        assert_eq!(editor.selection().cell_count(), 5);

        // A plain click returns to a single-cell range
        editor.mouse_down(4, 4, Modifiers::default());
        editor.mouse_up();
        assert!(!editor.selection().is_discontiguous());
        assert_eq!(editor.selection().cell_count(), 1);
    }

    #[test]
    fn test_click_outside_grid_is_ignored() {
        let mut editor = editor(2, 2);
        editor.mouse_down(1, 1, Modifiers::default());
        editor.mouse_down(7, 0, Modifiers::default());
        assert_eq!(editor.selection().active_cell(), (1, 1));
    }
}
