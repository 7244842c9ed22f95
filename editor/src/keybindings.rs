//! Key chords and the modal key dispatcher.
//!
//! `dispatch` is pure: it maps a mode and a keystroke to a `KeyCommand`
//! and leaves executing it to the editor. Ctrl and Cmd are the same
//! primary modifier here; the platform only decides how shortcuts are
//! labelled.

use enrichgrid_config::ModifierStyle;

use crate::mode::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Tab,
    Enter,
    Escape,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
    Backspace,
    F2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Ctrl or Cmd: either counts as the primary modifier.
    pub fn primary(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl Keystroke {
    pub fn new(key: Key) -> Self {
        Self { key, modifiers: Modifiers::default() }
    }

    pub fn with(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Parse a chord like "ctrl-c", "cmd-shift-z", "shift-tab" or "a".
    pub fn parse(source: &str) -> Option<Self> {
        let mut modifiers = Modifiers::default();
        let mut parts: Vec<&str> = source.split('-').collect();
        // "ctrl--" style chords: a trailing empty part means the key is '-'
        let key_name = match parts.pop()? {
            "" => "-",
            name => name,
        };
        for part in parts {
            match part {
                "ctrl" => modifiers.ctrl = true,
                "cmd" | "meta" => modifiers.meta = true,
                "shift" => modifiers.shift = true,
                "alt" => modifiers.alt = true,
                "" => {}
                _ => return None,
            }
        }
        let key = match key_name {
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "tab" => Key::Tab,
            "enter" => Key::Enter,
            "escape" => Key::Escape,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" => Key::PageUp,
            "pagedown" => Key::PageDown,
            "delete" => Key::Delete,
            "backspace" => Key::Backspace,
            "f2" => Key::F2,
            "space" => Key::Char(' '),
            name => {
                let mut chars = name.chars();
                let ch = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                Key::Char(ch)
            }
        };
        Some(Self { key, modifiers })
    }
}

/// Host platform, for shortcut labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Mac,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Other
        }
    }

    /// True when shortcuts should be shown with Cmd.
    pub fn uses_meta(&self, style: ModifierStyle) -> bool {
        matches!((self, style), (Platform::Mac, ModifierStyle::Platform))
    }
}

/// Render a primary-modifier chord for menus and hints, e.g. "⇧⌘Z" or "Ctrl+Shift+Z".
pub fn shortcut_label(platform: Platform, style: ModifierStyle, keystroke: &Keystroke) -> String {
    let key = key_label(keystroke.key);
    let mods = keystroke.modifiers;
    if platform.uses_meta(style) {
        let mut out = String::new();
        if mods.alt {
            out.push('⌥');
        }
        if mods.shift {
            out.push('⇧');
        }
        if mods.primary() {
            out.push('⌘');
        }
        out.push_str(&key);
        out
    } else {
        let mut parts = Vec::new();
        if mods.primary() {
            parts.push("Ctrl".to_string());
        }
        if mods.alt {
            parts.push("Alt".to_string());
        }
        if mods.shift {
            parts.push("Shift".to_string());
        }
        parts.push(key);
        parts.join("+")
    }
}

fn key_label(key: Key) -> String {
    match key {
        Key::Char(' ') => "Space".to_string(),
        Key::Char(c) => c.to_uppercase().to_string(),
        Key::Up => "Up".to_string(),
        Key::Down => "Down".to_string(),
        Key::Left => "Left".to_string(),
        Key::Right => "Right".to_string(),
        Key::Tab => "Tab".to_string(),
        Key::Enter => "Enter".to_string(),
        Key::Escape => "Esc".to_string(),
        Key::Home => "Home".to_string(),
        Key::End => "End".to_string(),
        Key::PageUp => "PageUp".to_string(),
        Key::PageDown => "PageDown".to_string(),
        Key::Delete => "Delete".to_string(),
        Key::Backspace => "Backspace".to_string(),
        Key::F2 => "F2".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// What the editor should do in response to a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    // Navigating
    Move(Direction),
    Extend(Direction),
    PageUp,
    PageDown,
    RowStart,
    RowEnd,
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    SelectAll,
    FillDown,
    FillRight,
    ClearSelection,
    /// F2: edit the current value
    StartEdit,
    /// Typing replaces the cell, seeded with this character
    BeginEditWith(char),

    // Editing
    /// Commit, then move the active cell (None = stay)
    Commit(Option<Direction>),
    CancelEdit,
    InsertChar(char),
    DeleteBackward,
}

/// Map a keystroke to a command for the given mode.
pub fn dispatch(mode: Mode, keystroke: &Keystroke) -> Option<KeyCommand> {
    match mode {
        Mode::Navigating => dispatch_navigating(keystroke),
        Mode::Editing => dispatch_editing(keystroke),
    }
}

fn dispatch_navigating(keystroke: &Keystroke) -> Option<KeyCommand> {
    let mods = keystroke.modifiers;

    if mods.primary() {
        let Key::Char(ch) = keystroke.key else {
            return match keystroke.key {
                Key::Home if !mods.shift => Some(KeyCommand::RowStart),
                Key::End if !mods.shift => Some(KeyCommand::RowEnd),
                _ => None,
            };
        };
        return match (ch.to_ascii_lowercase(), mods.shift) {
            ('c', false) => Some(KeyCommand::Copy),
            ('x', false) => Some(KeyCommand::Cut),
            ('v', false) => Some(KeyCommand::Paste),
            ('z', false) => Some(KeyCommand::Undo),
            ('z', true) | ('y', false) => Some(KeyCommand::Redo),
            ('a', false) => Some(KeyCommand::SelectAll),
            ('d', false) => Some(KeyCommand::FillDown),
            ('r', false) => Some(KeyCommand::FillRight),
            _ => None,
        };
    }

    let arrow = |dir| {
        if mods.shift {
            KeyCommand::Extend(dir)
        } else {
            KeyCommand::Move(dir)
        }
    };

    match keystroke.key {
        Key::Up => Some(arrow(Direction::Up)),
        Key::Down => Some(arrow(Direction::Down)),
        Key::Left => Some(arrow(Direction::Left)),
        Key::Right => Some(arrow(Direction::Right)),
        Key::Tab if mods.shift => Some(KeyCommand::Move(Direction::Left)),
        Key::Tab => Some(KeyCommand::Move(Direction::Right)),
        Key::Enter if mods.shift => Some(KeyCommand::Move(Direction::Up)),
        Key::Enter => Some(KeyCommand::Move(Direction::Down)),
        Key::Home => Some(KeyCommand::RowStart),
        Key::End => Some(KeyCommand::RowEnd),
        Key::PageUp => Some(KeyCommand::PageUp),
        Key::PageDown => Some(KeyCommand::PageDown),
        Key::Delete | Key::Backspace => Some(KeyCommand::ClearSelection),
        Key::F2 => Some(KeyCommand::StartEdit),
        Key::Char(ch) if is_printable(ch, mods) => Some(KeyCommand::BeginEditWith(ch)),
        _ => None,
    }
}

fn dispatch_editing(keystroke: &Keystroke) -> Option<KeyCommand> {
    let mods = keystroke.modifiers;
    match keystroke.key {
        Key::Enter if mods.shift => Some(KeyCommand::Commit(Some(Direction::Up))),
        Key::Enter if mods.primary() => Some(KeyCommand::Commit(None)),
        Key::Enter => Some(KeyCommand::Commit(Some(Direction::Down))),
        Key::Tab if mods.shift => Some(KeyCommand::Commit(Some(Direction::Left))),
        Key::Tab => Some(KeyCommand::Commit(Some(Direction::Right))),
        Key::Escape => Some(KeyCommand::CancelEdit),
        Key::Backspace => Some(KeyCommand::DeleteBackward),
        Key::Char(ch) if is_printable(ch, mods) => Some(KeyCommand::InsertChar(ch)),
        _ => None,
    }
}

/// A single printable character without a command modifier.
fn is_printable(ch: char, mods: Modifiers) -> bool {
    !mods.primary() && !mods.alt && !ch.is_control()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav(chord: &str) -> Option<KeyCommand> {
        dispatch(Mode::Navigating, &Keystroke::parse(chord).unwrap())
    }

    fn edit(chord: &str) -> Option<KeyCommand> {
        dispatch(Mode::Editing, &Keystroke::parse(chord).unwrap())
    }

    #[test]
    fn test_parse() {
        let k = Keystroke::parse("cmd-shift-z").unwrap();
        assert_eq!(k.key, Key::Char('z'));
        assert!(k.modifiers.meta && k.modifiers.shift && !k.modifiers.ctrl);

        assert_eq!(Keystroke::parse("ctrl--").unwrap().key, Key::Char('-'));
        assert_eq!(Keystroke::parse("space").unwrap().key, Key::Char(' '));
        assert!(Keystroke::parse("hyper-a").is_none());
        assert!(Keystroke::parse("banana").is_none());
    }

    #[test]
    fn test_ctrl_and_cmd_are_equivalent() {
        for prefix in ["ctrl", "cmd"] {
            assert_eq!(nav(&format!("{}-c", prefix)), Some(KeyCommand::Copy));
            assert_eq!(nav(&format!("{}-v", prefix)), Some(KeyCommand::Paste));
            assert_eq!(nav(&format!("{}-x", prefix)), Some(KeyCommand::Cut));
            assert_eq!(nav(&format!("{}-z", prefix)), Some(KeyCommand::Undo));
            assert_eq!(nav(&format!("{}-shift-z", prefix)), Some(KeyCommand::Redo));
            assert_eq!(nav(&format!("{}-shift-Z", prefix)), Some(KeyCommand::Redo));
        }
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(nav("up"), Some(KeyCommand::Move(Direction::Up)));
        assert_eq!(nav("shift-right"), Some(KeyCommand::Extend(Direction::Right)));
        assert_eq!(nav("tab"), Some(KeyCommand::Move(Direction::Right)));
        assert_eq!(nav("shift-tab"), Some(KeyCommand::Move(Direction::Left)));
        assert_eq!(nav("home"), Some(KeyCommand::RowStart));
        assert_eq!(nav("end"), Some(KeyCommand::RowEnd));
        assert_eq!(nav("delete"), Some(KeyCommand::ClearSelection));
        assert_eq!(nav("backspace"), Some(KeyCommand::ClearSelection));
        assert_eq!(nav("f2"), Some(KeyCommand::StartEdit));
    }

    #[test]
    fn test_printable_starts_edit() {
        assert_eq!(nav("a"), Some(KeyCommand::BeginEditWith('a')));
        assert_eq!(nav("shift-A"), Some(KeyCommand::BeginEditWith('A')));
        assert_eq!(nav("space"), Some(KeyCommand::BeginEditWith(' ')));
        assert_eq!(nav("alt-a"), None);
        assert_eq!(nav("ctrl-q"), None);
    }

    #[test]
    fn test_editing_keys() {
        assert_eq!(edit("enter"), Some(KeyCommand::Commit(Some(Direction::Down))));
        assert_eq!(edit("tab"), Some(KeyCommand::Commit(Some(Direction::Right))));
        assert_eq!(edit("escape"), Some(KeyCommand::CancelEdit));
        assert_eq!(edit("x"), Some(KeyCommand::InsertChar('x')));
        assert_eq!(edit("backspace"), Some(KeyCommand::DeleteBackward));
        // Grid commands are not routed while editing
        assert_eq!(edit("ctrl-z"), None);
        assert_eq!(edit("up"), None);
    }

    #[test]
    fn test_shortcut_labels() {
        let redo = Keystroke::parse("ctrl-shift-z").unwrap();
        assert_eq!(shortcut_label(Platform::Mac, ModifierStyle::Platform, &redo), "⇧⌘Z");
        assert_eq!(shortcut_label(Platform::Mac, ModifierStyle::Ctrl, &redo), "Ctrl+Shift+Z");
        assert_eq!(shortcut_label(Platform::Other, ModifierStyle::Platform, &redo), "Ctrl+Shift+Z");

        let copy = Keystroke::parse("cmd-c").unwrap();
        assert_eq!(shortcut_label(Platform::Other, ModifierStyle::Platform, &copy), "Ctrl+C");
    }
}
