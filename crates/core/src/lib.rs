//! Core grid types shared by the engine and the editor.

pub mod selection;

pub use selection::{Range, Selection, SelectionMode};
