pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;
pub mod encoding;
pub mod files;
pub mod fix;
pub mod parser;

pub use checker::{ScanError, SpellChecker};
pub use config::Config;

use checker::dictionary::Dictionary;
use once_cell::sync::OnceCell;
use std::fmt;

/// Outcome of scanning or correcting one file.
#[derive(Debug, Default)]
pub struct CheckResult {
    pub file: String,
    pub error_count: usize,
    pub fixed_count: usize,
    /// Errors resolved by adding the word to the personal word list.
    pub excluded_count: usize,
    pub errors: Vec<SpellingError>,
    /// Why the scan stopped early, if it did.
    pub failure: Option<ScanError>,
}

impl CheckResult {
    /// Whether this file makes the run exit non-zero.
    pub fn failed(&self) -> bool {
        self.error_count > self.fixed_count + self.excluded_count
            || self.failure.as_ref().is_some_and(ScanError::is_failure)
    }
}

/// A word the dictionary rejected, located in its file.
#[derive(Debug, Clone)]
pub struct SpellingError {
    pub file: String,
    pub word: String,
    /// Byte offset of the word in the decoded content.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub line_content: String,
    suggestions: OnceCell<Vec<String>>,
}

impl SpellingError {
    pub fn new(
        file: impl Into<String>,
        word: impl Into<String>,
        offset: usize,
        (line, column): (usize, usize),
        line_content: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            word: word.into(),
            offset,
            line,
            column,
            line_content: line_content.into(),
            suggestions: OnceCell::new(),
        }
    }

    /// Correction candidates, asked of `dictionary` on first use only.
    pub fn suggestions(&self, dictionary: &dyn Dictionary) -> &[String] {
        self.suggestions.get_or_init(|| dictionary.suggest(&self.word))
    }

    /// Suggestions already computed, if any.
    pub fn known_suggestions(&self) -> &[String] {
        self.suggestions.get().map(Vec::as_slice).unwrap_or(&[])
    }
}

impl fmt::Display for SpellingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Ln {} Col {}: {}",
            self.file, self.line, self.column, self.word
        )
    }
}
