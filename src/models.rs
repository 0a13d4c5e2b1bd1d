use std::fmt;

/// Which substitution strategy the engine runs. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Dictionary,
    Generative,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Dictionary => write!(f, "dictionary"),
            Mode::Generative => write!(f, "generative"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    ConfirmQuit,
}
