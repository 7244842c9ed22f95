//! Headless grid editor: the single owner of grid, selection, history and
//! enrichment state. Rendering and platform clipboard access live outside
//! and talk to it through `Editor` methods and `ClipboardProvider`.

pub mod clipboard;
pub mod codec;
pub mod editor;
pub mod keybindings;
pub mod mode;
pub mod paste;

mod editing;
mod enrichment;
mod fill;
mod grid_ops;
mod navigation;
mod undo_redo;


pub use clipboard::{ClipboardError, ClipboardProvider, MemoryClipboard};
pub use editor::{Editor, Notice, NoticeLevel};
pub use keybindings::{Direction, Key, KeyCommand, Keystroke, Modifiers, Platform};
pub use mode::Mode;
pub use paste::PastePlan;
