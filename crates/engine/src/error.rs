/// Error type for grid mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Write outside the current bounds; the grid must be grown first
    CellOutOfBounds { row: usize, col: usize, rows: usize, cols: usize },
    /// Column index past the end
    ColumnOutOfRange { index: usize, count: usize },
    /// Row index past the end
    RowOutOfRange { index: usize, count: usize },
    /// Deleting would leave the grid without columns
    LastColumn,
    /// Width is not a finite number
    InvalidWidth(f32),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::CellOutOfBounds { row, col, rows, cols } => write!(
                f,
                "Cell ({}, {}) is outside the {}x{} grid",
                row, col, rows, cols
            ),
            GridError::ColumnOutOfRange { index, count } => {
                write!(f, "Column {} out of range ({} columns)", index, count)
            }
            GridError::RowOutOfRange { index, count } => {
                write!(f, "Row {} out of range ({} rows)", index, count)
            }
            GridError::LastColumn => write!(f, "Cannot delete the last remaining column"),
            GridError::InvalidWidth(w) => write!(f, "Invalid column width: {}", w),
        }
    }
}

impl std::error::Error for GridError {}
