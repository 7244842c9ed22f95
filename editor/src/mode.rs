/// Editor modes determine how keyboard input is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Navigating, // Grid focus: keystrokes move selection
    Editing,    // Cell editor focus: keystrokes edit the buffer
}

impl Mode {
    pub fn is_editing(&self) -> bool {
        matches!(self, Mode::Editing)
    }

    pub fn is_navigating(&self) -> bool {
        matches!(self, Mode::Navigating)
    }
}
