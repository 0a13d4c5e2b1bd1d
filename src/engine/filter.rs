use crate::utils::strings;
use regex::Regex;
use std::sync::LazyLock;

/// `<think> ... </think>` blocks emitted by reasoning models.
const TAGGED_REASONING: &str = r"(?s)<think>.*?</think>";

/// A bare `think` marker running up to the next full-width parenthesised
/// note, e.g. `think这是思考过程（完）`.
const MARKED_REASONING: &str = r"(?s)think.*?（.*?）";

static PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(TAGGED_REASONING).expect("tagged reasoning pattern compiles"),
        Regex::new(MARKED_REASONING).expect("marked reasoning pattern compiles"),
    ]
});

/// Cleans raw model output down to the single line shown to the user.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReasoningFilter;

impl ReasoningFilter {
    /// Removes every reasoning span. Matching is non-greedy and crosses
    /// line breaks.
    pub fn strip(&self, raw: &str) -> String {
        PATTERNS.iter().fold(raw.to_string(), |text, pattern| {
            pattern.replace_all(&text, "").into_owned()
        })
    }

    /// strip → flatten newlines → trim
    pub fn clean(&self, raw: &str) -> String {
        let stripped = self.strip(raw);
        strings::flatten_lines(&stripped).trim().to_string()
    }
}
