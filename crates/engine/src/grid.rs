//! The grid model: rows of cell values plus column metadata.
//!
//! Invariants:
//! - there is always at least one column
//! - every row has exactly one cell per column
//! - column widths are keyed by `ColumnId`, so reordering never touches them
//!
//! Rows and columns live behind `Arc`s. `snapshot()` hands the renderer the
//! current version without copying; the next write copies on demand.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::cell::CellValue;
use crate::column::{ColumnDef, ColumnId, ColumnType};
use crate::error::GridError;

pub const DEFAULT_COLUMN_WIDTH: f32 = 120.0;
pub const MIN_COLUMN_WIDTH: f32 = 40.0;

static EMPTY: CellValue = CellValue::Empty;

#[derive(Debug, Clone)]
pub struct Grid {
    columns: Arc<Vec<ColumnDef>>,
    rows: Arc<Vec<Vec<CellValue>>>,
    /// User-set widths. Columns without an entry use `default_width`.
    widths: FxHashMap<ColumnId, f32>,
    default_width: f32,
    min_width: f32,
    /// Next ID to assign to a new column. Monotonically increasing, never reused.
    next_column_id: u64,
    /// Bumped by every mutation.
    revision: u64,
    /// Bumped whenever existing rows or columns change position.
    layout_epoch: u64,
    /// Bumped only when existing rows change position.
    row_epoch: u64,
    /// Revision of the last write per (row, column), since rows last shifted.
    cell_writes: FxHashMap<(usize, ColumnId), u64>,
}

/// Immutable view of one grid version, for rendering and export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSnapshot {
    pub revision: u64,
    pub columns: Arc<Vec<ColumnDef>>,
    /// Widths in column order.
    pub widths: Vec<f32>,
    pub rows: Arc<Vec<Vec<CellValue>>>,
}

impl GridSnapshot {
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Pretty JSON for export and debugging.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| e.to_string())
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

impl Grid {
    /// Create an empty grid with `rows` x `cols` cells (at least one column).
    pub fn new(rows: usize, cols: usize) -> Self {
        let cols = cols.max(1);
        let mut grid = Self::blank();
        let columns = (0..cols)
            .map(|i| {
                let id = grid.generate_column_id();
                ColumnDef::new(id, default_column_name(i), ColumnType::Text)
            })
            .collect();
        grid.columns = Arc::new(columns);
        grid.rows = Arc::new(vec![vec![CellValue::Empty; cols]; rows]);
        grid
    }

    /// Build a grid from imported headers and rows.
    ///
    /// Short rows are padded with Empty, long rows truncated to the header
    /// count. No headers means one default column.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut grid = Self::blank();
        let mut columns: Vec<ColumnDef> = headers
            .into_iter()
            .map(|name| {
                let id = grid.generate_column_id();
                ColumnDef::new(id, name, ColumnType::Text)
            })
            .collect();
        if columns.is_empty() {
            let id = grid.generate_column_id();
            columns.push(ColumnDef::new(id, default_column_name(0), ColumnType::Text));
        }
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        grid.columns = Arc::new(columns);
        grid.rows = Arc::new(rows);
        grid
    }

    fn blank() -> Self {
        Self {
            columns: Arc::new(Vec::new()),
            rows: Arc::new(Vec::new()),
            widths: FxHashMap::default(),
            default_width: DEFAULT_COLUMN_WIDTH,
            min_width: MIN_COLUMN_WIDTH,
            next_column_id: 1,
            revision: 0,
            layout_epoch: 0,
            row_epoch: 0,
            cell_writes: FxHashMap::default(),
        }
    }

    /// Override the width policy (from settings).
    pub fn set_width_policy(&mut self, default_width: f32, min_width: f32) {
        self.default_width = default_width;
        self.min_width = min_width;
    }

    /// Generate a new unique ColumnId (monotonically increasing, never reused)
    fn generate_column_id(&mut self) -> ColumnId {
        let id = ColumnId(self.next_column_id);
        self.next_column_id += 1;
        id
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    /// Existing row numbers now address different rows. Write stamps are
    /// keyed by row number, so they go too.
    fn bump_row_layout(&mut self) {
        self.revision += 1;
        self.layout_epoch += 1;
        self.row_epoch += 1;
        self.cell_writes.clear();
    }

    /// Existing column indices shifted. Stamps follow column ids and survive.
    fn bump_column_layout(&mut self) {
        self.revision += 1;
        self.layout_epoch += 1;
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn layout_epoch(&self) -> u64 {
        self.layout_epoch
    }

    pub fn row_epoch(&self) -> u64 {
        self.row_epoch
    }

    /// Cell value; Empty for out-of-range coordinates.
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows.len() && col < self.columns.len()
    }

    /// Revision of the last write to a cell (0 = not written since rows
    /// last shifted).
    pub fn last_write(&self, row: usize, col: usize) -> u64 {
        match self.columns.get(col) {
            Some(column) => self.last_write_in(row, column.id),
            None => 0,
        }
    }

    pub fn last_write_in(&self, row: usize, column: ColumnId) -> u64 {
        self.cell_writes.get(&(row, column)).copied().unwrap_or(0)
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ColumnDef> {
        self.columns.get(index)
    }

    pub fn column_index(&self, id: ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Width of the column at `index` (default width when never resized).
    pub fn column_width(&self, index: usize) -> Option<f32> {
        let column = self.columns.get(index)?;
        Some(self.widths.get(&column.id).copied().unwrap_or(self.default_width))
    }

    /// Indices of columns that are not hidden.
    pub fn visible_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.hidden)
            .map(|(i, _)| i)
    }

    /// Step `delta` visible columns from `from`, stopping at the edges.
    pub fn step_visible_col(&self, from: usize, delta: isize) -> usize {
        let mut col = from;
        let mut remaining = delta.unsigned_abs();
        while remaining > 0 {
            let next = if delta < 0 {
                (0..col).rev().find(|&c| !self.columns[c].hidden)
            } else {
                (col + 1..self.columns.len()).find(|&c| !self.columns[c].hidden)
            };
            match next {
                Some(c) => col = c,
                None => break,
            }
            remaining -= 1;
        }
        col
    }

    /// Interpret input text according to the column's declared type.
    pub fn coerce(&self, col: usize, input: &str) -> CellValue {
        match self.columns.get(col) {
            Some(column) => column.column_type.coerce(input),
            None => CellValue::from_input(input),
        }
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            revision: self.revision,
            columns: Arc::clone(&self.columns),
            widths: (0..self.columns.len())
                .filter_map(|i| self.column_width(i))
                .collect(),
            rows: Arc::clone(&self.rows),
        }
    }

    /// Structural and content equality: columns, cells and widths.
    /// Revision counters are ignored.
    pub fn content_eq(&self, other: &Grid) -> bool {
        self.columns == other.columns
            && self.rows == other.rows
            && self.snapshot().widths == other.snapshot().widths
    }

    // ========================================================================
    // Cell writes
    // ========================================================================

    /// Write a cell, returning the value it replaced.
    ///
    /// Out-of-range writes are rejected; callers grow the grid first.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) -> Result<CellValue, GridError> {
        if !self.in_bounds(row, col) {
            return Err(GridError::CellOutOfBounds {
                row,
                col,
                rows: self.rows.len(),
                cols: self.columns.len(),
            });
        }
        let old = std::mem::replace(&mut Arc::make_mut(&mut self.rows)[row][col], value);
        self.bump();
        let column = self.columns[col].id;
        self.cell_writes.insert((row, column), self.revision);
        Ok(old)
    }

    // ========================================================================
    // Rows
    // ========================================================================

    /// Append empty rows at the bottom.
    pub fn add_rows(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let width = self.columns.len();
        let rows = Arc::make_mut(&mut self.rows);
        rows.extend(std::iter::repeat_with(|| vec![CellValue::Empty; width]).take(count));
        self.bump();
        log::debug!("Added {} row(s), now {}", count, self.rows.len());
    }

    /// Insert empty rows before `at` (`at == row_count` appends).
    pub fn insert_rows(&mut self, at: usize, count: usize) -> Result<(), GridError> {
        let len = self.rows.len();
        if at > len {
            return Err(GridError::RowOutOfRange { index: at, count: len });
        }
        if at == len {
            self.add_rows(count);
            return Ok(());
        }
        if count == 0 {
            return Ok(());
        }
        let width = self.columns.len();
        let rows = Arc::make_mut(&mut self.rows);
        rows.splice(at..at, std::iter::repeat_with(|| vec![CellValue::Empty; width]).take(count));
        self.bump_row_layout();
        log::debug!("Inserted {} row(s) at {}", count, at);
        Ok(())
    }

    /// Remove `count` rows starting at `at`, returning them.
    pub fn remove_rows(&mut self, at: usize, count: usize) -> Result<Vec<Vec<CellValue>>, GridError> {
        let len = self.rows.len();
        if at >= len || count == 0 {
            return Err(GridError::RowOutOfRange { index: at, count: len });
        }
        let end = at.saturating_add(count).min(len);
        let removed: Vec<_> = Arc::make_mut(&mut self.rows).drain(at..end).collect();
        self.bump_row_layout();
        log::debug!("Removed {} row(s) at {}", removed.len(), at);
        Ok(removed)
    }

    // ========================================================================
    // Columns
    //
    // Every operation updates the column list and every row in the same
    // call. Widths follow ids, so only delete and duplicate touch them.
    // ========================================================================

    fn check_col(&self, index: usize) -> Result<(), GridError> {
        if index >= self.columns.len() {
            return Err(GridError::ColumnOutOfRange {
                index,
                count: self.columns.len(),
            });
        }
        Ok(())
    }

    /// Append empty columns at the right edge with default names.
    pub fn add_columns(&mut self, count: usize) -> Vec<ColumnId> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let index = self.columns.len();
            let id = self.generate_column_id();
            Arc::make_mut(&mut self.columns).push(ColumnDef::new(id, default_column_name(index), ColumnType::Text));
            for row in Arc::make_mut(&mut self.rows).iter_mut() {
                row.push(CellValue::Empty);
            }
            ids.push(id);
        }
        if count > 0 {
            self.bump();
            log::debug!("Added {} column(s), now {}", count, self.columns.len());
        }
        ids
    }

    /// Insert an empty column before `at` (`at == col_count` appends).
    pub fn insert_column(
        &mut self,
        at: usize,
        name: impl Into<String>,
        column_type: ColumnType,
    ) -> Result<ColumnId, GridError> {
        let len = self.columns.len();
        if at > len {
            return Err(GridError::ColumnOutOfRange { index: at, count: len });
        }
        let id = self.generate_column_id();
        Arc::make_mut(&mut self.columns).insert(at, ColumnDef::new(id, name, column_type));
        for row in Arc::make_mut(&mut self.rows).iter_mut() {
            row.insert(at, CellValue::Empty);
        }
        if at == len {
            self.bump();
        } else {
            self.bump_column_layout();
        }
        log::debug!("Inserted column {} at {}", id, at);
        Ok(id)
    }

    /// Delete the column at `index`, returning its definition and cells.
    ///
    /// The last remaining column can't be deleted.
    pub fn delete_column(&mut self, index: usize) -> Result<(ColumnDef, Vec<CellValue>), GridError> {
        self.check_col(index)?;
        if self.columns.len() <= 1 {
            log::warn!("Refusing to delete the last remaining column");
            return Err(GridError::LastColumn);
        }
        let def = Arc::make_mut(&mut self.columns).remove(index);
        let cells = Arc::make_mut(&mut self.rows)
            .iter_mut()
            .map(|row| row.remove(index))
            .collect();
        self.widths.remove(&def.id);
        self.cell_writes.retain(|(_, column), _| *column != def.id);
        self.bump_column_layout();
        log::debug!("Deleted column {} at {}", def.id, index);
        Ok((def, cells))
    }

    /// Move the column at `from` so it ends up at index `to`.
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<(), GridError> {
        self.check_col(from)?;
        self.check_col(to)?;
        if from == to {
            return Ok(());
        }
        let columns = Arc::make_mut(&mut self.columns);
        let def = columns.remove(from);
        columns.insert(to, def);
        for row in Arc::make_mut(&mut self.rows).iter_mut() {
            let cell = row.remove(from);
            row.insert(to, cell);
        }
        self.bump_column_layout();
        log::debug!("Moved column {} -> {}", from, to);
        Ok(())
    }

    /// Clone the column at `index` (new id, same name/type/width/cells)
    /// and insert the copy right after it.
    pub fn duplicate_column(&mut self, index: usize) -> Result<ColumnId, GridError> {
        self.check_col(index)?;
        let id = self.generate_column_id();
        let source = &self.columns[index];
        let copy = ColumnDef {
            id,
            name: format!("{} (copy)", source.name),
            column_type: source.column_type,
            hidden: source.hidden,
        };
        if let Some(&width) = self.widths.get(&source.id) {
            self.widths.insert(id, width);
        }
        Arc::make_mut(&mut self.columns).insert(index + 1, copy);
        for row in Arc::make_mut(&mut self.rows).iter_mut() {
            let cell = row[index].clone();
            row.insert(index + 1, cell);
        }
        self.bump_column_layout();
        log::debug!("Duplicated column {} as {}", index, id);
        Ok(id)
    }

    pub fn rename_column(&mut self, index: usize, name: impl Into<String>) -> Result<(), GridError> {
        self.check_col(index)?;
        Arc::make_mut(&mut self.columns)[index].name = name.into();
        self.bump();
        Ok(())
    }

    pub fn set_column_type(&mut self, index: usize, column_type: ColumnType) -> Result<(), GridError> {
        self.check_col(index)?;
        Arc::make_mut(&mut self.columns)[index].column_type = column_type;
        self.bump();
        Ok(())
    }

    pub fn set_column_hidden(&mut self, index: usize, hidden: bool) -> Result<(), GridError> {
        self.check_col(index)?;
        Arc::make_mut(&mut self.columns)[index].hidden = hidden;
        self.bump();
        Ok(())
    }

    /// Resize a column, clamped to the minimum width. Returns the width applied.
    pub fn resize_column(&mut self, index: usize, width: f32) -> Result<f32, GridError> {
        self.check_col(index)?;
        if !width.is_finite() {
            return Err(GridError::InvalidWidth(width));
        }
        let width = width.max(self.min_width);
        let id = self.columns[index].id;
        self.widths.insert(id, width);
        self.bump();
        Ok(width)
    }
}

/// "Column 1", "Column 2", ...
fn default_column_name(index: usize) -> String {
    format!("Column {}", index + 1)
}
