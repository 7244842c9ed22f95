//! Asynchronous enrichment results re-entering the editor.
//!
//! Requests are issued with `begin_enrichment`; whatever runs them (a
//! model call, a lookup service) hands the ticket back with the result.
//! Applied results are ordinary undoable edits.

use enrichgrid_engine::{CellValue, EnrichmentOutcome, EnrichmentState, EnrichmentTicket, GridError};

use crate::editor::Editor;

impl Editor {
    pub fn begin_enrichment(&mut self, row: usize, col: usize) -> Result<EnrichmentTicket, GridError> {
        let ticket = self.enrichment.begin(&self.grid, row, col)?;
        log::debug!("Enrichment {} issued for ({}, {})", ticket.id, row, col);
        Ok(ticket)
    }

    /// Apply a result if the cell is still as it was when the request was
    /// issued, otherwise discard it.
    pub fn complete_enrichment(
        &mut self,
        ticket: &EnrichmentTicket,
        value: CellValue,
    ) -> Result<EnrichmentOutcome, GridError> {
        let outcome = self.enrichment.complete(&mut self.grid, ticket, value.clone())?;
        if let EnrichmentOutcome::Applied { col, old_value } = &outcome {
            self.history.record_change(ticket.row, *col, old_value.clone(), value);
        }
        Ok(outcome)
    }

    pub fn fail_enrichment(&mut self, ticket: &EnrichmentTicket, message: &str) {
        log::debug!("Enrichment {} failed: {}", ticket.id, message);
        self.enrichment.fail(ticket, message);
    }

    pub fn enrichment_state(&self, row: usize, col: usize) -> &EnrichmentState {
        self.enrichment.state_at(&self.grid, row, col)
    }
}
