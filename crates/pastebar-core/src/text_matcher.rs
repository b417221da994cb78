/// Case-insensitive substring matcher for clip text and exclusion entries.
#[derive(Debug, Clone)]
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Normalize a query string into a matcher. Returns `None` for blank inputs.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_lowercase(),
        })
    }

    /// Build one matcher per non-blank entry of `queries`.
    #[must_use]
    pub fn from_list<S: AsRef<str>>(queries: &[S]) -> Vec<Self> {
        queries.iter().filter_map(|query| Self::new(query.as_ref())).collect()
    }

    /// Whether `value` contains the query.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }

    /// Whether `value` equals the query, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn matches_exactly(&self, value: &str) -> bool {
        value.trim().to_lowercase() == self.needle
    }
}
