//! Row and column operations for Editor.
//!
//! Wraps the grid's structural operations so the rest of the editor state
//! follows along: when existing rows or columns shift, recorded history
//! coordinates no longer address the same cells and are dropped, and the
//! selection collapses onto a cell that still exists. Enrichment state is
//! keyed by column id, so it only resets when rows shift. Appends at the
//! edges keep history.

use enrichgrid_engine::{ColumnId, ColumnType, Grid, GridError};

use crate::editor::{Editor, NoticeLevel};

impl Editor {
    fn structural<T>(
        &mut self,
        what: &str,
        op: impl FnOnce(&mut Grid) -> Result<T, GridError>,
    ) -> Result<T, GridError> {
        if self.mode.is_editing() {
            self.commit_edit(None);
        }
        let epoch = self.grid.layout_epoch();
        let row_epoch = self.grid.row_epoch();
        let result = op(&mut self.grid);
        if let Err(e) = &result {
            log::warn!("{} failed: {}", what, e);
            self.notify(NoticeLevel::Warning, e.to_string());
            return result;
        }

        let (rows, cols) = self.grid.dimensions();
        if self.grid.layout_epoch() != epoch {
            self.history.clear();
            if self.grid.row_epoch() != row_epoch {
                self.enrichment.on_rows_shifted();
            } else {
                self.enrichment.on_columns_shifted(&self.grid);
            }
            let (row, col) = self.selection.active_cell();
            self.selection.select_cell(
                row.min(rows.saturating_sub(1)),
                col.min(cols.saturating_sub(1)),
            );
        } else {
            self.selection.clamp_to(rows, cols);
        }
        result
    }

    // Columns

    pub fn insert_column(&mut self, at: usize, name: &str, column_type: ColumnType) -> Result<ColumnId, GridError> {
        self.structural("Insert column", |grid| grid.insert_column(at, name, column_type))
    }

    pub fn add_columns(&mut self, count: usize) -> Vec<ColumnId> {
        self.structural("Add columns", |grid| Ok(grid.add_columns(count)))
            .unwrap_or_default()
    }

    /// Delete a column. Deleting the last remaining column is refused and
    /// surfaced as a warning notice.
    pub fn delete_column(&mut self, index: usize) -> Result<(), GridError> {
        let name = self.grid.column(index).map(|c| c.name.clone());
        self.structural("Delete column", |grid| grid.delete_column(index))?;
        if let Some(name) = name {
            self.notify(NoticeLevel::Info, format!("Deleted column '{}'", name));
        }
        Ok(())
    }

    pub fn move_column(&mut self, from: usize, to: usize) -> Result<(), GridError> {
        self.structural("Move column", |grid| grid.move_column(from, to))?;
        if from != to {
            self.selection.select_cell(self.selection.active_cell().0, to);
        }
        Ok(())
    }

    pub fn duplicate_column(&mut self, index: usize) -> Result<ColumnId, GridError> {
        self.structural("Duplicate column", |grid| grid.duplicate_column(index))
    }

    pub fn rename_column(&mut self, index: usize, name: &str) -> Result<(), GridError> {
        self.structural("Rename column", |grid| grid.rename_column(index, name))
    }

    pub fn set_column_type(&mut self, index: usize, column_type: ColumnType) -> Result<(), GridError> {
        self.structural("Set column type", |grid| grid.set_column_type(index, column_type))
    }

    pub fn set_column_hidden(&mut self, index: usize, hidden: bool) -> Result<(), GridError> {
        self.structural("Hide column", |grid| grid.set_column_hidden(index, hidden))
    }

    /// Resize a column; returns the width applied after clamping.
    pub fn resize_column(&mut self, index: usize, width: f32) -> Result<f32, GridError> {
        self.structural("Resize column", |grid| grid.resize_column(index, width))
    }

    // Rows

    pub fn add_rows(&mut self, count: usize) {
        // Appending can't fail
        let _ = self.structural("Add rows", |grid| {
            grid.add_rows(count);
            Ok(())
        });
    }

    pub fn insert_rows(&mut self, at: usize, count: usize) -> Result<(), GridError> {
        self.structural("Insert rows", |grid| grid.insert_rows(at, count))
    }

    pub fn remove_rows(&mut self, at: usize, count: usize) -> Result<(), GridError> {
        self.structural("Remove rows", |grid| grid.remove_rows(at, count).map(|_| ()))
    }
}
