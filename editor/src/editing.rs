//! Cell editing: entering Editing mode, the edit buffer, commit and cancel.

use crate::editor::{Editor, NoticeLevel};
use crate::keybindings::Direction;
use crate::mode::Mode;

impl Editor {
    /// F2: edit the active cell starting from its current text.
    pub fn start_edit(&mut self) {
        if self.mode.is_editing() { return; }

        let (row, col) = self.selection.active_cell();
        self.edit_value = self.grid.get(row, col).display();
        self.mode = Mode::Editing;
    }

    /// Typing in Navigating mode replaces the cell's content, starting
    /// with the typed character.
    pub fn begin_edit_with(&mut self, ch: char) {
        if self.mode.is_editing() { return; }

        self.edit_value.clear();
        self.edit_value.push(ch);
        self.mode = Mode::Editing;
    }

    pub fn insert_char(&mut self, ch: char) {
        if self.mode.is_editing() {
            self.edit_value.push(ch);
        }
    }

    pub fn delete_backward(&mut self) {
        if self.mode.is_editing() {
            self.edit_value.pop();
        }
    }

    /// Write the edit buffer to the active cell, return to Navigating and
    /// optionally move. Returns false if no edit was in progress.
    pub fn commit_edit(&mut self, then: Option<Direction>) -> bool {
        if !self.mode.is_editing() {
            return false;
        }
        let (row, col) = self.selection.active_cell();
        let input = std::mem::take(&mut self.edit_value);
        self.mode = Mode::Navigating;

        if let Err(e) = self.set_cell(row, col, &input) {
            log::warn!("Commit failed: {}", e);
            self.notify(NoticeLevel::Warning, e.to_string());
        }
        if let Some(dir) = then {
            self.move_active(dir);
        }
        true
    }

    /// Escape: drop the buffer without touching the grid.
    pub fn cancel_edit(&mut self) {
        if self.mode.is_editing() {
            self.edit_value.clear();
            self.mode = Mode::Navigating;
        }
    }
}
