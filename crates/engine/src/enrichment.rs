//! Write-back gate for asynchronous enrichment results.
//!
//! An enrichment request takes a ticket when it is issued. When the result
//! comes back it is written only if nothing has touched the cell since:
//! no rows shifted and the column still exists, the ticket is still the
//! newest one for that cell, the cell has not been written, and it still
//! holds the expected value. Otherwise the result is discarded.
//!
//! Cells are tracked by (row, `ColumnId`), so a result follows its column
//! through inserts, moves and duplicates elsewhere in the grid. Different
//! cells never block each other.

use rustc_hash::FxHashMap;

use crate::cell::CellValue;
use crate::column::ColumnId;
use crate::error::GridError;
use crate::grid::Grid;

/// Per-cell enrichment status.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EnrichmentState {
    #[default]
    Idle,
    Pending { ticket: u64 },
    Applied,
    /// A result arrived but the cell had moved on
    Discarded,
    Failed(String),
}

/// Expectation captured when a request is issued.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentTicket {
    pub id: u64,
    pub row: usize,
    /// Column index when the request was issued
    pub col: usize,
    pub column: ColumnId,
    /// Value present when the request was issued
    pub expected: CellValue,
    write_stamp: u64,
    row_epoch: u64,
}

/// Why a result was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// A newer request for the same cell was issued (or the tracker was reset)
    Superseded,
    /// Rows shifted or the column was deleted since the request
    LayoutChanged,
    /// The cell was written since the request
    CellWritten,
    /// The cell no longer holds the expected value
    ValueChanged,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    /// Written at `col`, the column's index at completion time
    Applied { col: usize, old_value: CellValue },
    Discarded(StaleReason),
}

static IDLE: EnrichmentState = EnrichmentState::Idle;

#[derive(Debug, Default)]
pub struct EnrichmentTracker {
    cells: FxHashMap<(usize, ColumnId), EnrichmentState>,
    next_ticket: u64,
}

impl EnrichmentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for (row, col). Supersedes any pending request for
    /// the same cell.
    pub fn begin(&mut self, grid: &Grid, row: usize, col: usize) -> Result<EnrichmentTicket, GridError> {
        let column = match grid.column(col) {
            Some(def) if row < grid.row_count() => def.id,
            _ => {
                let (rows, cols) = grid.dimensions();
                return Err(GridError::CellOutOfBounds { row, col, rows, cols });
            }
        };
        self.next_ticket += 1;
        let ticket = EnrichmentTicket {
            id: self.next_ticket,
            row,
            col,
            column,
            expected: grid.get(row, col).clone(),
            write_stamp: grid.last_write_in(row, column),
            row_epoch: grid.row_epoch(),
        };
        self.cells.insert((row, column), EnrichmentState::Pending { ticket: ticket.id });
        Ok(ticket)
    }

    /// Check a ticket against the grid without writing anything. Returns
    /// the column's current index when the result may be applied.
    pub fn check(&self, grid: &Grid, ticket: &EnrichmentTicket) -> Result<usize, StaleReason> {
        if grid.row_epoch() != ticket.row_epoch {
            return Err(StaleReason::LayoutChanged);
        }
        let col = grid.column_index(ticket.column).ok_or(StaleReason::LayoutChanged)?;
        if !self.owns_cell(ticket) {
            return Err(StaleReason::Superseded);
        }
        if grid.last_write_in(ticket.row, ticket.column) != ticket.write_stamp {
            return Err(StaleReason::CellWritten);
        }
        if grid.get(ticket.row, col) != &ticket.expected {
            return Err(StaleReason::ValueChanged);
        }
        Ok(col)
    }

    fn owns_cell(&self, ticket: &EnrichmentTicket) -> bool {
        self.cells.get(&(ticket.row, ticket.column)) == Some(&EnrichmentState::Pending { ticket: ticket.id })
    }

    /// Apply a result if the ticket is still current, otherwise discard it.
    pub fn complete(
        &mut self,
        grid: &mut Grid,
        ticket: &EnrichmentTicket,
        value: CellValue,
    ) -> Result<EnrichmentOutcome, GridError> {
        let col = match self.check(grid, ticket) {
            Ok(col) => col,
            Err(reason) => {
                log::debug!(
                    "Discarding enrichment result for ({}, {}): {:?}",
                    ticket.row, ticket.col, reason
                );
                // Only the ticket that owns the cell may settle its state
                if self.owns_cell(ticket) {
                    self.cells.insert((ticket.row, ticket.column), EnrichmentState::Discarded);
                }
                return Ok(EnrichmentOutcome::Discarded(reason));
            }
        };
        let old_value = grid.set(ticket.row, col, value)?;
        self.cells.insert((ticket.row, ticket.column), EnrichmentState::Applied);
        Ok(EnrichmentOutcome::Applied { col, old_value })
    }

    /// Record that the request behind `ticket` failed. Ignored if a newer
    /// request has taken over the cell.
    pub fn fail(&mut self, ticket: &EnrichmentTicket, message: impl Into<String>) {
        if let Some(state) = self.cells.get_mut(&(ticket.row, ticket.column)) {
            if *state == (EnrichmentState::Pending { ticket: ticket.id }) {
                *state = EnrichmentState::Failed(message.into());
            }
        }
    }

    pub fn state(&self, row: usize, column: ColumnId) -> &EnrichmentState {
        self.cells.get(&(row, column)).unwrap_or(&IDLE)
    }

    /// State of the cell currently at (row, col).
    pub fn state_at(&self, grid: &Grid, row: usize, col: usize) -> &EnrichmentState {
        match grid.column(col) {
            Some(def) => self.state(row, def.id),
            None => &IDLE,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.cells
            .values()
            .filter(|s| matches!(s, EnrichmentState::Pending { .. }))
            .count()
    }

    /// Rows shifted: every entry is keyed on a row number that now names a
    /// different row. In-flight results will come back as `LayoutChanged`.
    pub fn on_rows_shifted(&mut self) {
        self.cells.clear();
    }

    /// Columns shifted: entries follow their ids, so only deleted columns
    /// are forgotten.
    pub fn on_columns_shifted(&mut self, grid: &Grid) {
        self.cells.retain(|(_, column), _| grid.column_index(*column).is_some());
    }

    /// Forget everything; any in-flight result will be discarded.
    pub fn reset(&mut self) {
        self.cells.clear();
    }
}
