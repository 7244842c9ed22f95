//! Undo/Redo history for cell edits.
//!
//! Linear history: recording a new entry always drops the redo stack.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::cell::CellValue;
use crate::grid::Grid;

/// Default maximum number of undo entries.
pub const MAX_HISTORY_DEPTH: usize = 50;

#[derive(Clone, Debug, PartialEq)]
pub struct CellEdit {
    pub row: usize,
    pub col: usize,
    /// Value immediately before this edit
    pub old_value: CellValue,
    pub new_value: CellValue,
    pub timestamp: DateTime<Utc>,
}

impl CellEdit {
    pub fn new(row: usize, col: usize, old_value: CellValue, new_value: CellValue) -> Self {
        Self {
            row,
            col,
            old_value,
            new_value,
            timestamp: Utc::now(),
        }
    }

    fn is_noop(&self) -> bool {
        self.old_value == self.new_value
    }
}

/// One undoable step.
#[derive(Clone, Debug, PartialEq)]
pub enum HistoryEntry {
    Single(CellEdit),
    /// Undone and redone as one unit (paste, fill, clear, ...)
    Batch { label: String, edits: Vec<CellEdit> },
}

impl HistoryEntry {
    pub fn edits(&self) -> &[CellEdit] {
        match self {
            HistoryEntry::Single(edit) => std::slice::from_ref(edit),
            HistoryEntry::Batch { edits, .. } => edits,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            HistoryEntry::Single(_) => "Edit",
            HistoryEntry::Batch { label, .. } => label,
        }
    }

    /// Write old values back, last edit first so repeated edits to the
    /// same cell unwind correctly.
    fn apply_undo(&self, grid: &mut Grid) {
        for edit in self.edits().iter().rev() {
            write_back(grid, edit.row, edit.col, &edit.old_value);
        }
    }

    fn apply_redo(&self, grid: &mut Grid) {
        for edit in self.edits() {
            write_back(grid, edit.row, edit.col, &edit.new_value);
        }
    }
}

fn write_back(grid: &mut Grid, row: usize, col: usize, value: &CellValue) {
    if let Err(e) = grid.set(row, col, value.clone()) {
        log::warn!("History write skipped: {}", e);
    }
}

pub struct History {
    past: VecDeque<HistoryEntry>,
    future: Vec<HistoryEntry>,
    max_entries: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_HISTORY_DEPTH)
    }
}

impl History {
    pub fn new(max_entries: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Record a single cell change. No-op edits are ignored.
    pub fn record_change(&mut self, row: usize, col: usize, old_value: CellValue, new_value: CellValue) {
        let edit = CellEdit::new(row, col, old_value, new_value);
        if edit.is_noop() {
            return;
        }
        self.record_edit(HistoryEntry::Single(edit));
    }

    /// Record multiple cell changes as a single undoable operation.
    /// Unchanged cells are dropped; nothing is recorded if none changed.
    pub fn record_batch(&mut self, label: impl Into<String>, edits: Vec<CellEdit>) {
        let edits: Vec<CellEdit> = edits.into_iter().filter(|e| !e.is_noop()).collect();
        if edits.is_empty() {
            return;
        }
        self.record_edit(HistoryEntry::Batch { label: label.into(), edits });
    }

    /// Push an entry, trimming the oldest past the depth limit and
    /// clearing the redo stack.
    pub fn record_edit(&mut self, entry: HistoryEntry) {
        self.past.push_back(entry);
        self.future.clear();

        while self.past.len() > self.max_entries {
            self.past.pop_front();
            log::debug!("History full, dropped oldest entry");
        }
    }

    /// Undo the most recent entry against `grid`.
    /// Returns the entry, or None if there was nothing to undo.
    pub fn undo(&mut self, grid: &mut Grid) -> Option<HistoryEntry> {
        let entry = self.past.pop_back()?;
        entry.apply_undo(grid);
        self.future.push(entry.clone());
        Some(entry)
    }

    /// Redo the most recently undone entry against `grid`.
    /// Returns the entry, or None if there was nothing to redo.
    pub fn redo(&mut self, grid: &mut Grid) -> Option<HistoryEntry> {
        let entry = self.future.pop()?;
        entry.apply_redo(grid);
        self.past.push_back(entry.clone());
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.past.len()
    }

    pub fn redo_len(&self) -> usize {
        self.future.len()
    }

    pub fn clear(&mut self) {
        if self.can_undo() || self.can_redo() {
            log::info!("History cleared");
        }
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    /// Write through the grid and record, like the editor does.
    fn edit(grid: &mut Grid, history: &mut History, row: usize, col: usize, value: &str) {
        let old = grid.set(row, col, text(value)).unwrap();
        history.record_change(row, col, old, text(value));
    }

    #[test]
    fn test_undo_redo_single() {
        let mut grid = Grid::new(2, 2);
        let mut history = History::default();
        edit(&mut grid, &mut history, 0, 0, "v1");
        edit(&mut grid, &mut history, 0, 0, "v2");

        history.undo(&mut grid).unwrap();
        assert_eq!(grid.get(0, 0), &text("v1"));
        history.undo(&mut grid).unwrap();
        assert_eq!(grid.get(0, 0), &CellValue::Empty);
        assert!(history.undo(&mut grid).is_none());

        history.redo(&mut grid).unwrap();
        assert_eq!(grid.get(0, 0), &text("v1"));
        history.redo(&mut grid).unwrap();
        assert_eq!(grid.get(0, 0), &text("v2"));
        assert!(history.redo(&mut grid).is_none());
    }

    #[test]
    fn test_new_edit_discards_redo() {
        let mut grid = Grid::new(1, 1);
        let mut history = History::default();
        edit(&mut grid, &mut history, 0, 0, "a");
        history.undo(&mut grid);
        assert!(history.can_redo());

        edit(&mut grid, &mut history, 0, 0, "b");
        assert!(!history.can_redo());
        assert!(history.redo(&mut grid).is_none());
        assert_eq!(grid.get(0, 0), &text("b"));
    }

    #[test]
    fn test_noop_edit_not_recorded() {
        let mut history = History::default();
        history.record_change(0, 0, text("same"), text("same"));
        assert!(!history.can_undo());

        history.record_batch("Paste", vec![CellEdit::new(0, 0, CellValue::Empty, CellValue::Empty)]);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_batch_undoes_as_one_unit() {
        let mut grid = Grid::new(3, 3);
        let mut history = History::default();
        let mut edits = Vec::new();
        for r in 0..3 {
            let old = grid.set(r, 1, text("p")).unwrap();
            edits.push(CellEdit::new(r, 1, old, text("p")));
        }
        history.record_batch("Paste", edits);
        assert_eq!(history.undo_len(), 1);

        let entry = history.undo(&mut grid).unwrap();
        assert_eq!(entry.label(), "Paste");
        assert_eq!(entry.edits().len(), 3);
        for r in 0..3 {
            assert_eq!(grid.get(r, 1), &CellValue::Empty);
        }

        history.redo(&mut grid).unwrap();
        for r in 0..3 {
            assert_eq!(grid.get(r, 1), &text("p"));
        }
    }

    #[test]
    fn test_batch_with_repeated_cell_unwinds_in_reverse() {
        let mut grid = Grid::new(1, 1);
        let mut history = History::default();
        let first = grid.set(0, 0, text("x")).unwrap();
        let second = grid.set(0, 0, text("y")).unwrap();
        history.record_batch(
            "Fill",
            vec![
                CellEdit::new(0, 0, first, text("x")),
                CellEdit::new(0, 0, second, text("y")),
            ],
        );
        history.undo(&mut grid);
        assert_eq!(grid.get(0, 0), &CellValue::Empty);
        history.redo(&mut grid);
        assert_eq!(grid.get(0, 0), &text("y"));
    }

    #[test]
    fn test_depth_is_bounded() {
        let mut grid = Grid::new(1, 1);
        let mut history = History::default();
        for i in 0..60 {
            edit(&mut grid, &mut history, 0, 0, &format!("v{}", i));
        }
        assert_eq!(history.undo_len(), MAX_HISTORY_DEPTH);

        while history.undo(&mut grid).is_some() {}
        // The ten oldest entries are gone, so we stop at v9
        assert_eq!(grid.get(0, 0), &text("v9"));
    }

    #[test]
    fn test_clear() {
        let mut grid = Grid::new(1, 1);
        let mut history = History::new(5);
        edit(&mut grid, &mut history, 0, 0, "a");
        history.undo(&mut grid);
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
