//! Applying corrections to files.
//!
//! A [`Corrector`] walks the errors of one file, asks an [`Operator`] what to
//! do about each, and records the answers in a [`SourceMap`] so the file can
//! be written back with only the corrected words changed.

pub mod source_map;

use crate::checker::dictionary::Dictionary;
use crate::checker::filter::TokenFilter;
use crate::checker::SourceFile;
use crate::{files, CheckResult, SpellingError};
use anyhow::{Context, Result};
use log::{debug, warn};
pub use source_map::SourceMap;

/// What the run driver does after an error has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    NextFile,
    Quit,
}

/// An operator's answer to one spelling error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Suggestion(usize),
    Exclude,
    NextFile,
    Quit,
    Skip,
}

impl Decision {
    pub fn from_key(key: char) -> Self {
        match key {
            '0'..='9' => Decision::Suggestion(key as usize - '0' as usize),
            'a' | 'A' => Decision::Exclude,
            'n' | 'N' => Decision::NextFile,
            'q' | 'Q' => Decision::Quit,
            _ => Decision::Skip,
        }
    }
}

/// Source of decisions, usually a person at a terminal.
pub trait Operator {
    fn begin_file(&mut self, _file: &str) {}

    /// One keypress in answer to `error`.
    fn choose(&mut self, error: &SpellingError, suggestions: &[String]) -> Result<char>;

    /// The chosen suggestion number does not exist; the same error is asked
    /// about again.
    fn invalid_selection(&mut self, _index: usize, _available: usize) {}
}

/// Answers every error with its first suggestion, skipping errors that have
/// none.
pub struct FirstSuggestion;

impl Operator for FirstSuggestion {
    fn choose(&mut self, _error: &SpellingError, suggestions: &[String]) -> Result<char> {
        Ok(if suggestions.is_empty() { ' ' } else { '0' })
    }
}

/// How one error was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Corrected,
    Excluded,
    Skipped,
    NextFile,
    Quit,
}

impl Resolution {
    pub fn action(self) -> Action {
        match self {
            Resolution::NextFile => Action::NextFile,
            Resolution::Quit => Action::Quit,
            _ => Action::Continue,
        }
    }
}

/// The corrections gathered for one file.
#[derive(Debug)]
pub struct FixSession {
    pub source_map: SourceMap,
    pub dirty: bool,
    pub action: Action,
    pub result: CheckResult,
}

impl FixSession {
    /// Write the corrected content back unless the operator quit or nothing
    /// changed. Returns whether the file was written.
    pub fn commit(&self, file: &SourceFile<'_>) -> Result<bool> {
        if !self.dirty || self.action == Action::Quit {
            return Ok(false);
        }
        let content = self.source_map.serialize();
        let bytes = file.encoding.encode(&content).with_context(|| {
            format!(
                "{}: corrected text cannot be written as '{}'",
                file.relname, file.encoding
            )
        })?;
        files::write_atomic(&file.path, &bytes)?;
        debug!("{}: wrote {} corrections", file.relname, self.result.fixed_count);
        Ok(true)
    }
}

pub struct Corrector<'d> {
    dictionary: &'d dyn Dictionary,
}

impl<'d> Corrector<'d> {
    pub fn new(dictionary: &'d dyn Dictionary) -> Self {
        Self { dictionary }
    }

    /// Ask `operator` about `error` until it gives a usable answer, and apply
    /// that answer.
    pub fn handle(
        &self,
        source_map: &mut SourceMap,
        error: &SpellingError,
        operator: &mut dyn Operator,
    ) -> Result<Resolution> {
        let suggestions = error.suggestions(self.dictionary);

        loop {
            let key = operator.choose(error, suggestions)?;
            let resolution = match Decision::from_key(key) {
                Decision::Suggestion(index) => match suggestions.get(index) {
                    Some(replacement) => {
                        if source_map.apply(error.offset, replacement) {
                            Resolution::Corrected
                        } else {
                            warn!(
                                "{}: no word starts at offset {}, leaving '{}' as is",
                                error.file, error.offset, error.word
                            );
                            Resolution::Skipped
                        }
                    }
                    None => {
                        operator.invalid_selection(index, suggestions.len());
                        continue;
                    }
                },
                Decision::Exclude => {
                    if let Err(e) = self.dictionary.add(&error.word) {
                        warn!("could not save '{}' to the personal word list: {:#}", error.word, e);
                    }
                    Resolution::Excluded
                }
                Decision::NextFile => Resolution::NextFile,
                Decision::Quit => Resolution::Quit,
                Decision::Skip => Resolution::Skipped,
            };
            return Ok(resolution);
        }
    }

    /// Walk the errors of `file` in order, handling each with `operator`.
    ///
    /// Errors the operator never saw because they moved on to the next file
    /// still count towards the result.
    pub fn correct(
        &self,
        file: &SourceFile<'_>,
        filter: TokenFilter<'_>,
        operator: &mut dyn Operator,
    ) -> Result<FixSession> {
        operator.begin_file(&file.relname);

        // Words are only ever found inside checked spans, so chunks must not
        // run across their edges.
        let edges = filter
            .spans(&file.content, file.lexer())
            .filter_map(Result::ok)
            .flat_map(|span| [span.offset, span.offset + span.text.len()]);
        let mut session = FixSession {
            source_map: SourceMap::with_boundaries(&file.content, edges),
            dirty: false,
            action: Action::Continue,
            result: CheckResult {
                file: file.relname.clone(),
                ..Default::default()
            },
        };
        let mut scan = file.scan(filter, self.dictionary);

        for item in scan.by_ref() {
            let error = match item {
                Ok(error) => error,
                Err(failure) => {
                    session.result.failure = Some(failure);
                    break;
                }
            };
            session.result.error_count += 1;

            let resolution = self.handle(&mut session.source_map, &error, operator)?;
            match resolution {
                Resolution::Corrected => {
                    session.result.fixed_count += 1;
                    session.dirty = true;
                }
                Resolution::Excluded => session.result.excluded_count += 1,
                Resolution::Skipped | Resolution::NextFile | Resolution::Quit => {}
            }
            session.result.errors.push(error);

            session.action = resolution.action();
            if session.action != Action::Continue {
                break;
            }
        }

        if session.action == Action::NextFile {
            for item in scan {
                match item {
                    Ok(_) => session.result.error_count += 1,
                    Err(failure) => session.result.failure = Some(failure),
                }
            }
        }

        Ok(session)
    }
}
