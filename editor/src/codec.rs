//! Clipboard text interchange (Excel/Sheets compatible).
//!
//! Writing: the selection is projected onto its bounding rectangle, cells
//! not in the selection become empty strings, fields are joined by tabs
//! and rows by newlines. Nothing is escaped.
//!
//! Reading: tab-delimited if the text contains a tab, else comma-delimited
//! with RFC 4180 style quoting. Ragged rows are right-padded.

use enrichgrid_core::Selection;
use enrichgrid_engine::Grid;

/// A parsed, rectangular block of clipboard text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardBlock {
    rows: Vec<Vec<String>>,
}

impl ClipboardBlock {
    /// Build a block, padding short rows to the widest row.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0 || self.col_count() == 0
    }

    /// Tab/newline text for the system clipboard.
    pub fn to_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
}

impl Delimiter {
    /// Tab wins whenever one is present.
    pub fn detect(text: &str) -> Self {
        if text.contains('\t') {
            Delimiter::Tab
        } else {
            Delimiter::Comma
        }
    }
}

/// Copy the selected cells out of `grid` as a rectangular block.
/// None when nothing is selected.
pub fn selection_block(grid: &Grid, selection: &Selection) -> Option<ClipboardBlock> {
    let bounds = selection.bounds()?;
    let rows = (bounds.start_row..=bounds.end_row)
        .map(|row| {
            (bounds.start_col..=bounds.end_col)
                .map(|col| {
                    if selection.contains(row, col) {
                        grid.get(row, col).display()
                    } else {
                        String::new()
                    }
                })
                .collect()
        })
        .collect();
    Some(ClipboardBlock { rows })
}

/// Serialize the selection for the clipboard.
pub fn encode_selection(grid: &Grid, selection: &Selection) -> Option<String> {
    selection_block(grid, selection).map(|block| block.to_text())
}

/// Drop the single trailing `\r\n` that spreadsheet apps append, then
/// normalize line endings. A bare trailing `\n` is kept: it is how a
/// one-column block ending in an empty cell is written.
pub(crate) fn normalize_clipboard_text(text: &str) -> String {
    let text = text.strip_suffix("\r\n").unwrap_or(text);
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Parse pasted text into a rectangular block. Never fails; empty text
/// gives an empty block.
pub fn parse(text: &str) -> ClipboardBlock {
    let text = normalize_clipboard_text(text);
    if text.is_empty() {
        return ClipboardBlock::default();
    }
    let delimiter = Delimiter::detect(&text);
    let rows = text
        .split('\n')
        .map(|line| match delimiter {
            Delimiter::Tab => line.split('\t').map(str::to_string).collect(),
            Delimiter::Comma => parse_csv_line(line),
        })
        .collect();
    ClipboardBlock::from_rows(rows)
}

/// Split one comma-delimited line, honouring quotes.
///
/// A field that starts with `"` is quoted until the next lone `"`; inside
/// it `""` is a literal quote and commas are data. Text after a closing
/// quote is kept as-is.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }
        match ch {
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                at_field_start = true;
            }
            _ => {
                field.push(ch);
                at_field_start = false;
            }
        }
    }
    fields.push(field);
    fields
}
