//! Fill Down and Fill Right.

use crate::editor::{Editor, NoticeLevel};

impl Editor {
    /// Fill down: copy the first row of the selection into the rows below it.
    /// Returns the number of cells changed.
    pub fn fill_down(&mut self) -> usize {
        let Some(range) = self.selection.bounds() else { return 0 };

        // Need at least 2 rows selected
        if range.row_count() < 2 {
            self.notify(NoticeLevel::Info, "Select at least 2 rows to fill down");
            return 0;
        }

        let mut writes = Vec::new();
        for col in range.start_col..=range.end_col {
            let source = self.grid.get(range.start_row, col).clone();
            for row in (range.start_row + 1)..=range.end_row {
                writes.push((row, col, source.clone()));
            }
        }
        let changed = self.write_batch("Fill Down", writes);
        self.notify(NoticeLevel::Info, "Filled down");
        changed
    }

    /// Fill right: copy the first column of the selection into the columns
    /// to its right.
    pub fn fill_right(&mut self) -> usize {
        let Some(range) = self.selection.bounds() else { return 0 };

        // Need at least 2 columns selected
        if range.col_count() < 2 {
            self.notify(NoticeLevel::Info, "Select at least 2 columns to fill right");
            return 0;
        }

        let mut writes = Vec::new();
        for row in range.start_row..=range.end_row {
            let source = self.grid.get(row, range.start_col).clone();
            for col in (range.start_col + 1)..=range.end_col {
                writes.push((row, col, source.clone()));
            }
        }
        let changed = self.write_batch("Fill Right", writes);
        self.notify(NoticeLevel::Info, "Filled right");
        changed
    }
}

#[cfg(test)]
mod tests {
    use enrichgrid_config::Settings;
    use enrichgrid_engine::{CellValue, Grid};

    use crate::editor::Editor;

    fn editor() -> Editor {
        let mut editor = Editor::new(Grid::new(4, 3), Settings::default());
        editor.set_cell(0, 0, "a").unwrap();
        editor.set_cell(0, 1, "b").unwrap();
        editor.set_cell(1, 0, "x").unwrap();
        editor
    }

    #[test]
    fn test_fill_down_is_one_undo_step() {
        let mut editor = editor();
        editor.selection.select_cell(0, 0);
        editor.selection.extend_to(3, 1);
        let before = editor.history().undo_len();

        assert_eq!(editor.fill_down(), 6);
        for row in 0..4 {
            assert_eq!(editor.grid().get(row, 0), &CellValue::from("a"));
            assert_eq!(editor.grid().get(row, 1), &CellValue::from("b"));
        }
        assert_eq!(editor.history().undo_len(), before + 1);

        editor.undo();
        assert_eq!(editor.grid().get(1, 0), &CellValue::from("x"));
        assert_eq!(editor.grid().get(3, 1), &CellValue::Empty);
    }

    #[test]
    fn test_fill_right() {
        let mut editor = editor();
        editor.selection.select_cell(0, 0);
        editor.selection.extend_to(1, 2);

        assert_eq!(editor.fill_right(), 4);
        assert_eq!(editor.grid().get(0, 2), &CellValue::from("a"));
        assert_eq!(editor.grid().get(1, 1), &CellValue::from("x"));
    }

    #[test]
    fn test_fill_needs_two_rows() {
        let mut editor = editor();
        let before = editor.history().undo_len();
        assert_eq!(editor.fill_down(), 0);
        assert_eq!(editor.history().undo_len(), before);
        assert!(editor.notice().is_some());
    }
}
