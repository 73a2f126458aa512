//! Reader options.

/// Options for reading XPT files.
#[derive(Debug, Clone)]
pub struct XptReaderOptions {
    /// Trim trailing spaces from character values (default: true).
    pub trim_strings: bool,
}

impl Default for XptReaderOptions {
    fn default() -> Self {
        Self { trim_strings: true }
    }
}

impl XptReaderOptions {
    /// Create reader options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep character values exactly as stored, blank padding included.
    #[must_use]
    pub fn keep_padding(mut self) -> Self {
        self.trim_strings = false;
        self
    }
}
