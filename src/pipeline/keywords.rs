//! Sensitive-keyword matcher.
//!
//! Case-insensitive substring search over a configured, ordered term list.
//! Plain containment, no word-boundary check: a term embedded inside a
//! longer word still matches. Pure — no I/O, no failure mode.

/// Scans text for configured sensitive terms.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    /// Lowercased terms, in match-priority order.
    keywords: Vec<String>,
}

impl KeywordMatcher {
    pub fn new(keywords: &[String]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Return the first configured term (in list order) contained in `text`,
    /// or `None` if the text is empty or no term occurs.
    pub fn find(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .find(|kw| lower.contains(kw.as_str()))
            .map(|kw| kw.as_str())
    }
}
