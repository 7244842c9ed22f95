pub mod cell;
pub mod column;
pub mod enrichment;
pub mod error;
pub mod grid;
pub mod history;

pub use cell::CellValue;
pub use column::{ColumnDef, ColumnId, ColumnType};
pub use error::GridError;
pub use grid::{Grid, GridSnapshot};
pub use enrichment::{EnrichmentOutcome, EnrichmentState, EnrichmentTicket, EnrichmentTracker, StaleReason};
pub use history::{CellEdit, History, HistoryEntry};
