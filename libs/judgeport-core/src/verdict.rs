//! Status-code vocabulary for judge responses.

use std::collections::HashMap;

/// Label resolved for any code the vocabulary does not know.
pub const UNKNOWN_STATUS: &str = "Unknown Status";

/// Mapping from integer status code to display text.
///
/// Passed into the decoder explicitly so callers (and tests) can substitute
/// arbitrary vocabularies; there is no process-wide mapping.
#[derive(Debug, Clone)]
pub struct ResultVocabulary {
    entries: HashMap<i64, String>,
}

impl Default for ResultVocabulary {
    fn default() -> Self {
        Self::from_entries([
            (-5, "Security Check Failed"),
            (-4, "Compile Error"),
            (-3, "Wrong Answer"),
            (1, "Accepted"),
            (2, "Real Time Limit Exceeded"),
            (3, "Memory Limit Exceeded"),
            (4, "Runtime Error"),
            (5, "System Error"),
        ])
    }
}

impl ResultVocabulary {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(code, text)| (code, text.into()))
                .collect(),
        }
    }

    /// Resolve a status code to its display text, never failing.
    pub fn resolve(&self, code: i64) -> &str {
        self.entries
            .get(&code)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_STATUS)
    }
}
