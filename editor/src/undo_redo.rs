//! Undo/Redo operations for Editor.

use enrichgrid_core::Range;
use enrichgrid_engine::HistoryEntry;

use crate::editor::{Editor, NoticeLevel};

impl Editor {
    // Undo/Redo
    pub fn undo(&mut self) -> bool {
        if self.mode.is_editing() { return false; }

        match self.history.undo(&mut self.grid) {
            Some(entry) => {
                self.select_entry(&entry);
                self.notify(NoticeLevel::Info, format!("Undo: {}", entry.label()));
                true
            }
            None => {
                self.notify(NoticeLevel::Info, "Nothing to undo");
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.mode.is_editing() { return false; }

        match self.history.redo(&mut self.grid) {
            Some(entry) => {
                self.select_entry(&entry);
                self.notify(NoticeLevel::Info, format!("Redo: {}", entry.label()));
                true
            }
            None => {
                self.notify(NoticeLevel::Info, "Nothing to redo");
                false
            }
        }
    }

    /// Select the cells an entry touched so the change is visible.
    fn select_entry(&mut self, entry: &HistoryEntry) {
        let mut cells = entry.edits().iter().map(|e| (e.row, e.col));
        let Some((row, col)) = cells.next() else { return };
        let bounds = cells.fold(Range::single(row, col), |acc, (r, c)| {
            Range::new(
                acc.start_row.min(r),
                acc.start_col.min(c),
                acc.end_row.max(r),
                acc.end_col.max(c),
            )
        });
        let (rows, cols) = self.grid.dimensions();
        let Some(bounds) = bounds.clamp(rows, cols) else { return };
        self.selection.select_cell(bounds.start_row, bounds.start_col);
        if !bounds.is_single() {
            self.selection.extend_to(bounds.end_row, bounds.end_col);
        }
    }
}
