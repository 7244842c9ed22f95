//! Column metadata.
//!
//! A `ColumnId` identifies a column for its whole lifetime: structural
//! operations move columns around but never change or reuse an id.

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// Stable column identity (monotonically assigned, never reused).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnId(pub(crate) u64);

impl ColumnId {
    pub fn from_raw(id: u64) -> Self {
        ColumnId(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ColumnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "col-{}", self.0)
    }
}

/// Declared column type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Url,
    Email,
    Date,
}

impl ColumnType {
    /// Turn input text into a value for a column of this type.
    ///
    /// Text-like columns keep the input verbatim ("00123" stays text),
    /// Number columns parse numbers where they can.
    pub fn coerce(&self, input: &str) -> CellValue {
        if input.trim().is_empty() {
            return CellValue::Empty;
        }
        match self {
            ColumnType::Number => CellValue::from_input(input),
            ColumnType::Text | ColumnType::Url | ColumnType::Email | ColumnType::Date => {
                CellValue::Text(input.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub id: ColumnId,
    pub name: String,
    pub column_type: ColumnType,
    #[serde(default)]
    pub hidden: bool,
}

impl ColumnDef {
    pub fn new(id: ColumnId, name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            id,
            name: name.into(),
            column_type,
            hidden: false,
        }
    }
}
