//! Clipboard operations for Editor.
//!
//! This module contains:
//! - ClipboardProvider, the async seam to the system clipboard
//! - MemoryClipboard for headless use and tests
//! - Copy, cut, paste and delete selection

use std::cell::RefCell;
use std::future::{self, Future};

use enrichgrid_engine::CellValue;

use crate::codec;
use crate::editor::{Editor, NoticeLevel};
use crate::paste::PastePlan;

/// Why the system clipboard could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// The user or platform refused access
    PermissionDenied,
    /// Clipboard access needs a secure context (e.g. https)
    InsecureContext,
    Unavailable(String),
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::PermissionDenied => write!(f, "clipboard permission denied"),
            ClipboardError::InsecureContext => write!(f, "clipboard requires a secure context"),
            ClipboardError::Unavailable(msg) => write!(f, "clipboard unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Asynchronous text clipboard. Reads and writes may be refused at any time.
pub trait ClipboardProvider {
    fn read_text(&self) -> impl Future<Output = Result<String, ClipboardError>>;
    fn write_text(&self, text: &str) -> impl Future<Output = Result<(), ClipboardError>>;
}

/// In-process clipboard. Can be told to refuse access.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: RefCell<String>,
    failure: RefCell<Option<ClipboardError>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: RefCell::new(text.into()),
            failure: RefCell::new(None),
        }
    }

    pub fn contents(&self) -> String {
        self.text.borrow().clone()
    }

    /// Make every following read and write fail with `error`.
    pub fn fail_with(&self, error: ClipboardError) {
        *self.failure.borrow_mut() = Some(error);
    }

    pub fn restore(&self) {
        *self.failure.borrow_mut() = None;
    }

    fn check(&self) -> Result<(), ClipboardError> {
        match self.failure.borrow().as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl ClipboardProvider for MemoryClipboard {
    fn read_text(&self) -> impl Future<Output = Result<String, ClipboardError>> {
        future::ready(self.check().map(|()| self.contents()))
    }

    fn write_text(&self, text: &str) -> impl Future<Output = Result<(), ClipboardError>> {
        let result = self.check().map(|()| {
            *self.text.borrow_mut() = text.to_string();
        });
        future::ready(result)
    }
}

impl Editor {
    // Clipboard

    /// Copy the selection as tab-separated text. Returns true if the
    /// clipboard accepted it.
    pub async fn copy(&mut self, clipboard: &impl ClipboardProvider) -> bool {
        let Some(text) = codec::encode_selection(&self.grid, &self.selection) else {
            self.notify(NoticeLevel::Info, "Nothing selected");
            return false;
        };
        match clipboard.write_text(&text).await {
            Ok(()) => {
                let message = if self.selection.is_discontiguous() {
                    "Copied selected cells to clipboard"
                } else {
                    "Copied to clipboard"
                };
                self.notify(NoticeLevel::Info, message);
                true
            }
            Err(e) => {
                self.clipboard_failed("Copy", &e);
                false
            }
        }
    }

    /// Copy, then clear the selected cells as one undoable step. Nothing is
    /// cleared if the copy was refused.
    pub async fn cut(&mut self, clipboard: &impl ClipboardProvider) -> bool {
        if !self.copy(clipboard).await {
            return false;
        }
        self.clear_selected("Cut");
        self.notify(NoticeLevel::Info, "Cut to clipboard");
        true
    }

    /// Read the clipboard and paste it at the selection's anchor.
    pub async fn paste(&mut self, clipboard: &impl ClipboardProvider) -> Option<PastePlan> {
        match clipboard.read_text().await {
            Ok(text) => self.paste_text(&text),
            Err(e) => {
                self.clipboard_failed("Paste", &e);
                None
            }
        }
    }

    /// Paste already-read text.
    ///
    /// The block lands at the selection's paste anchor. The grid grows to
    /// fit unless growth is turned off in settings, in which case the block
    /// is clipped. Values are coerced by the target column's type and the
    /// whole paste is one history entry. Rows and columns added to fit the
    /// block are not part of that entry: undo restores the values and
    /// leaves the grid at its grown size.
    pub fn paste_text(&mut self, text: &str) -> Option<PastePlan> {
        if self.mode.is_editing() {
            // Only the first line goes into the edit buffer
            let normalized = codec::normalize_clipboard_text(text);
            let line = normalized.split('\n').next().unwrap_or("");
            self.edit_value.push_str(line);
            return None;
        }

        let block = codec::parse(text);
        let anchor = self.selection.paste_anchor();
        let Some(plan) = PastePlan::new(block.row_count(), block.col_count(), anchor, self.grid.dimensions()) else {
            self.notify(NoticeLevel::Info, "Clipboard is empty");
            return None;
        };

        let plan = if !plan.needs_growth() {
            plan
        } else if self.settings.paste_grows_grid {
            self.grid.add_rows(plan.needs_new_rows);
            self.grid.add_columns(plan.needs_new_cols);
            plan
        } else {
            match plan.clipped_to(self.grid.dimensions()) {
                Some(clipped) => clipped,
                None => {
                    self.notify(NoticeLevel::Warning, "Paste target is outside the grid");
                    return None;
                }
            }
        };
        log::debug!("Paste plan: {:?}", plan);

        let mut writes = Vec::new();
        for (row, fields) in (plan.start_row..=plan.end_row).zip(block.rows()) {
            for (col, field) in (plan.start_col..=plan.end_col).zip(fields) {
                writes.push((row, col, self.grid.coerce(col, field)));
            }
        }
        self.write_batch("Paste", writes);

        let range = plan.range();
        self.selection.select_cell(range.start_row, range.start_col);
        self.selection.extend_to(range.end_row, range.end_col);

        let clipped = range.row_count() < block.row_count() || range.col_count() < block.col_count();
        if clipped {
            self.notify(
                NoticeLevel::Warning,
                format!(
                    "Pasted {}x{} of {}x{} (grid growth is off)",
                    range.row_count(),
                    range.col_count(),
                    block.row_count(),
                    block.col_count()
                ),
            );
        } else {
            self.notify(
                NoticeLevel::Info,
                format!("Pasted {}x{}", range.row_count(), range.col_count()),
            );
        }
        Some(plan)
    }

    /// Clear every selected cell as one undoable step.
    /// Returns the number of cells that changed.
    pub fn delete_selection(&mut self) -> usize {
        let changed = self.clear_selected("Clear");
        if changed > 0 {
            self.notify(NoticeLevel::Info, format!("Cleared {} cell(s)", changed));
        }
        changed
    }

    fn clear_selected(&mut self, label: &str) -> usize {
        let writes = self
            .selection
            .selected_cells()
            .into_iter()
            .filter(|&(row, col)| self.grid.in_bounds(row, col))
            .map(|(row, col)| (row, col, CellValue::Empty))
            .collect();
        self.write_batch(label, writes)
    }

    fn clipboard_failed(&mut self, action: &str, error: &ClipboardError) {
        log::warn!("{} failed: {}", action, error);
        self.notify(NoticeLevel::Warning, format!("{} failed: {}", action, error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_roundtrip() {
        let clipboard = MemoryClipboard::new();
        smol::block_on(clipboard.write_text("a\tb")).unwrap();
        assert_eq!(smol::block_on(clipboard.read_text()).unwrap(), "a\tb");
    }

    #[test]
    fn test_memory_clipboard_refusal() {
        let clipboard = MemoryClipboard::with_text("kept");
        clipboard.fail_with(ClipboardError::PermissionDenied);

        assert_eq!(
            smol::block_on(clipboard.write_text("new")),
            Err(ClipboardError::PermissionDenied)
        );
        assert_eq!(
            smol::block_on(clipboard.read_text()),
            Err(ClipboardError::PermissionDenied)
        );
        assert_eq!(clipboard.contents(), "kept");

        clipboard.restore();
        assert_eq!(smol::block_on(clipboard.read_text()).unwrap(), "kept");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ClipboardError::PermissionDenied.to_string(), "clipboard permission denied");
        assert_eq!(
            ClipboardError::Unavailable("no display".into()).to_string(),
            "clipboard unavailable: no display"
        );
    }
}
