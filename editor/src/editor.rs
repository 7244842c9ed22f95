//! The editor: one owner for everything a grid view mutates.
//!
//! All writes (typing, paste, fill, undo, column operations, enrichment
//! results) go through `Editor`, so the grid, the selection and the
//! history can't drift apart. Behaviour is split across files by concern:
//! clipboard.rs, editing.rs, navigation.rs, fill.rs, undo_redo.rs,
//! grid_ops.rs and enrichment.rs each add an `impl Editor` block.

use enrichgrid_config::Settings;
use enrichgrid_core::Selection;
use enrichgrid_engine::{CellEdit, CellValue, EnrichmentTracker, Grid, GridError, GridSnapshot, History};

use crate::clipboard::ClipboardProvider;
use crate::keybindings::{self, KeyCommand, Keystroke, Platform};
use crate::mode::Mode;

/// Rows moved by PageUp/PageDown until the view reports its height.
pub const DEFAULT_PAGE_ROWS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A one-line status message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

pub struct Editor {
    pub(crate) grid: Grid,
    pub(crate) selection: Selection,
    pub(crate) history: History,
    pub(crate) enrichment: EnrichmentTracker,
    pub(crate) mode: Mode,
    /// Text being typed while in Editing mode
    pub(crate) edit_value: String,
    pub(crate) settings: Settings,
    pub(crate) platform: Platform,
    pub(crate) status: Option<Notice>,
    pub(crate) page_rows: usize,
}

impl Editor {
    pub fn new(mut grid: Grid, settings: Settings) -> Self {
        grid.set_width_policy(settings.default_column_width, settings.min_column_width);
        Self {
            grid,
            selection: Selection::default(),
            history: History::new(settings.history_depth),
            enrichment: EnrichmentTracker::new(),
            mode: Mode::default(),
            edit_value: String::new(),
            settings,
            platform: Platform::current(),
            status: None,
            page_rows: DEFAULT_PAGE_ROWS,
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Replace the document. History and enrichment state belong to the
    /// old grid and are dropped.
    pub fn load(&mut self, mut grid: Grid) {
        grid.set_width_policy(self.settings.default_column_width, self.settings.min_column_width);
        self.grid = grid;
        self.history.clear();
        self.enrichment.reset();
        self.mode = Mode::Navigating;
        self.edit_value.clear();
        self.selection = Selection::default();
        log::info!("Loaded {}x{} grid", self.grid.row_count(), self.grid.col_count());
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn enrichment(&self) -> &EnrichmentTracker {
        &self.enrichment
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn edit_value(&self) -> &str {
        &self.edit_value
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.status.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.status.take()
    }

    /// Current grid version for the renderer.
    pub fn snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    pub fn set_page_rows(&mut self, rows: usize) {
        self.page_rows = rows.max(1);
    }

    /// Menu label for a chord on this platform, e.g. "⌘C" or "Ctrl+C".
    pub fn shortcut_label(&self, keystroke: &Keystroke) -> String {
        keybindings::shortcut_label(self.platform, self.settings.modifier_style, keystroke)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Write user input to one cell, coerced by the column type, as a
    /// single undoable edit. Writing the value a cell already holds is a
    /// no-op and does not count as a write.
    pub fn set_cell(&mut self, row: usize, col: usize, input: &str) -> Result<(), GridError> {
        let value = self.grid.coerce(col, input);
        if self.grid.in_bounds(row, col) && self.grid.get(row, col) == &value {
            return Ok(());
        }
        let old = self.grid.set(row, col, value.clone())?;
        self.history.record_change(row, col, old, value);
        Ok(())
    }

    /// Apply several writes and record them as one history entry.
    /// Returns how many cells actually changed.
    pub(crate) fn write_batch(&mut self, label: &str, writes: Vec<(usize, usize, CellValue)>) -> usize {
        let mut edits = Vec::with_capacity(writes.len());
        for (row, col, value) in writes {
            match self.grid.set(row, col, value.clone()) {
                Ok(old) => edits.push(CellEdit::new(row, col, old, value)),
                Err(e) => log::warn!("{}: skipped write: {}", label, e),
            }
        }
        let changed = edits.iter().filter(|e| e.old_value != e.new_value).count();
        self.history.record_batch(label, edits);
        changed
    }

    pub(crate) fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.status = Some(Notice {
            level,
            message: message.into(),
        });
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    /// Route a keystroke through the dispatcher for the current mode.
    /// Returns false if the key is not bound in this mode.
    pub async fn handle_key(&mut self, keystroke: &Keystroke, clipboard: &impl ClipboardProvider) -> bool {
        let Some(command) = keybindings::dispatch(self.mode, keystroke) else {
            return false;
        };
        log::trace!("{:?} -> {:?}", keystroke, command);

        match command {
            KeyCommand::Move(dir) => self.move_active(dir),
            KeyCommand::Extend(dir) => self.extend_selection(dir),
            KeyCommand::PageUp => self.page_up(),
            KeyCommand::PageDown => self.page_down(),
            KeyCommand::RowStart => self.move_to_row_start(),
            KeyCommand::RowEnd => self.move_to_row_end(),
            KeyCommand::Copy => {
                self.copy(clipboard).await;
            }
            KeyCommand::Cut => {
                self.cut(clipboard).await;
            }
            KeyCommand::Paste => {
                self.paste(clipboard).await;
            }
            KeyCommand::Undo => {
                self.undo();
            }
            KeyCommand::Redo => {
                self.redo();
            }
            KeyCommand::SelectAll => self.select_all(),
            KeyCommand::FillDown => {
                self.fill_down();
            }
            KeyCommand::FillRight => {
                self.fill_right();
            }
            KeyCommand::ClearSelection => {
                self.delete_selection();
            }
            KeyCommand::StartEdit => self.start_edit(),
            KeyCommand::BeginEditWith(ch) => self.begin_edit_with(ch),
            KeyCommand::Commit(then) => {
                self.commit_edit(then);
            }
            KeyCommand::CancelEdit => self.cancel_edit(),
            KeyCommand::InsertChar(ch) => self.insert_char(ch),
            KeyCommand::DeleteBackward => self.delete_backward(),
        }
        true
    }
}
