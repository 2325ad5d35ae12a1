pub mod dictionary;
pub mod filter;
pub mod offsets;
pub mod suggestions;
pub mod tokenizer;

use crate::encoding::Encoding;
use crate::files;
use crate::parser::{Lexer, LexerRegistry};
use crate::{CheckResult, Config, SpellingError};
use anyhow::Result;
use dictionary::{Dictionary, FstDictionary};
use filter::{Eligible, TokenFilter};
use log::{debug, info};
use offsets::OffsetIndex;
use rayon::prelude::*;
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a file could not be scanned, or why its scan stopped early.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("{0}: File empty.")]
    EmptyFile(String),

    #[error("{file}: Couldn't decode with '{encoding}' codec.")]
    Decode { file: String, encoding: Encoding },

    #[error("No lexer found for: {0}")]
    NoLexer(String),

    #[error("{file}: Parse error at line {line}.")]
    Parse { file: String, line: usize },

    #[error("{file}: {source}")]
    Io {
        file: String,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Empty files are skipped quietly; everything else fails the run.
    pub fn is_failure(&self) -> bool {
        !matches!(self, ScanError::EmptyFile(_))
    }
}

/// A decoded file paired with the lexer chosen for it.
pub struct SourceFile<'r> {
    pub path: PathBuf,
    pub relname: String,
    pub content: String,
    pub encoding: Encoding,
    lexer: &'r dyn Lexer,
}

impl<'r> SourceFile<'r> {
    /// Read and decode `path`, then pick its lexer.
    pub fn open(
        path: &Path,
        base_dir: &Path,
        encoding: Encoding,
        registry: &'r LexerRegistry,
    ) -> Result<Self, ScanError> {
        let relname = files::relative_name(path, base_dir);
        let bytes = fs::read(path).map_err(|source| ScanError::Io {
            file: relname.clone(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(ScanError::EmptyFile(relname));
        }
        let Some(content) = encoding.decode(&bytes) else {
            return Err(ScanError::Decode {
                file: relname,
                encoding,
            });
        };
        let Some(lexer) = registry.detect(path, &content) else {
            return Err(ScanError::NoLexer(relname));
        };
        debug!("{}: lexing as {}", relname, lexer.name());

        Ok(Self {
            path: path.to_path_buf(),
            relname,
            content,
            encoding,
            lexer,
        })
    }

    /// A file that exists only in memory.
    pub fn new(relname: impl Into<String>, content: impl Into<String>, lexer: &'r dyn Lexer) -> Self {
        let relname = relname.into();
        Self {
            path: PathBuf::from(&relname),
            relname,
            content: content.into(),
            encoding: Encoding::default(),
            lexer,
        }
    }

    pub fn lexer(&self) -> &'r dyn Lexer {
        self.lexer
    }

    /// Lazily yield the misspelled words of this file in offset order.
    ///
    /// Each word is checked only when the scan reaches it, so words added
    /// to `dictionary` while the scan is under way are honoured for the rest
    /// of the file. A parse failure is yielded last.
    pub fn scan<'a>(&'a self, filter: TokenFilter<'a>, dictionary: &'a dyn Dictionary) -> Scan<'a> {
        Scan {
            file: &self.relname,
            index: OffsetIndex::build(&self.content),
            spans: filter.spans(&self.content, self.lexer),
            dictionary,
            pending: VecDeque::new(),
        }
    }
}

/// Iterator returned by [`SourceFile::scan`].
pub struct Scan<'a> {
    file: &'a str,
    index: OffsetIndex<'a>,
    spans: Eligible<'a>,
    dictionary: &'a dyn Dictionary,
    /// Candidate words of the current span, with absolute offsets.
    pending: VecDeque<(String, usize)>,
}

impl Iterator for Scan<'_> {
    type Item = Result<SpellingError, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((word, offset)) = self.pending.pop_front() {
                if self.dictionary.check(&word) {
                    continue;
                }
                let location = self.index.locate(offset);
                let line = self.index.line_text(location.0);
                return Some(Ok(SpellingError::new(self.file, word, offset, location, line)));
            }

            match self.spans.next()? {
                Ok(span) => self.pending.extend(
                    tokenizer::extract(&span.text)
                        .map(|(word, at)| (word.to_string(), span.offset + at)),
                ),
                Err(failure) => {
                    let (line, _) = self.index.locate(failure.offset);
                    return Some(Err(ScanError::Parse {
                        file: self.file.to_string(),
                        line,
                    }));
                }
            }
        }
    }
}

/// Totals over a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatus {
    pub files_checked: usize,
    pub error_count: usize,
    pub fixed_count: usize,
    pub failed_files: usize,
    /// The operator quit before every file was visited.
    pub quit: bool,
}

impl RunStatus {
    pub fn record(&mut self, result: &CheckResult) {
        self.files_checked += 1;
        self.error_count += result.error_count;
        self.fixed_count += result.fixed_count;
        if result.failed() {
            self.failed_files += 1;
        }
    }

    pub fn failed(&self) -> bool {
        self.failed_files > 0 || self.quit
    }

    pub fn exit_code(&self) -> i32 {
        i32::from(self.failed())
    }
}

/// Holds everything shared across the files of one run: the lexers, the
/// dictionary and the settings that come from [`Config`].
pub struct SpellChecker {
    registry: LexerRegistry,
    dictionary: Box<dyn Dictionary>,
    base_dir: PathBuf,
    encoding: Encoding,
    min_string_length: usize,
}

impl SpellChecker {
    pub fn new(config: &Config, base_dir: &Path, dictionary: Box<dyn Dictionary>) -> Self {
        Self {
            registry: LexerRegistry::builtin().with_declared(&config.languages),
            dictionary,
            base_dir: base_dir.to_path_buf(),
            encoding: config.encoding,
            min_string_length: config.min_string_length,
        }
    }

    /// A checker backed by the installed dictionary for the configured
    /// language and the configured personal word list.
    pub fn from_config(config: &Config, base_dir: &Path) -> Result<Self> {
        let dictionary = FstDictionary::open(
            &config.language,
            &config.excluded_words_path(base_dir),
            config.max_suggestions,
        )?;
        Ok(Self::new(config, base_dir, Box::new(dictionary)))
    }

    pub fn with_registry(mut self, registry: LexerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn dictionary(&self) -> &dyn Dictionary {
        self.dictionary.as_ref()
    }

    pub fn registry(&self) -> &LexerRegistry {
        &self.registry
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn filter(&self) -> TokenFilter<'_> {
        TokenFilter::new(&self.registry).min_string_length(self.min_string_length)
    }

    pub fn open(&self, path: &Path) -> Result<SourceFile<'_>, ScanError> {
        SourceFile::open(path, &self.base_dir, self.encoding, &self.registry)
    }

    /// Scan one file to completion, computing suggestions for every error.
    pub fn check_file(&self, path: &Path) -> CheckResult {
        let file = match self.open(path) {
            Ok(file) => file,
            Err(failure) => {
                return CheckResult {
                    file: files::relative_name(path, &self.base_dir),
                    failure: Some(failure),
                    ..Default::default()
                }
            }
        };

        let mut result = CheckResult {
            file: file.relname.clone(),
            ..Default::default()
        };
        for item in file.scan(self.filter(), self.dictionary()) {
            match item {
                Ok(error) => {
                    error.suggestions(self.dictionary());
                    result.errors.push(error);
                }
                Err(failure) => result.failure = Some(failure),
            }
        }
        result.error_count = result.errors.len();
        result
    }

    /// Scan `paths` on the current rayon pool. Results keep the order of
    /// `paths`.
    pub fn check(&self, paths: &[PathBuf]) -> Vec<CheckResult> {
        info!("checking {} files", paths.len());
        paths.par_iter().map(|path| self.check_file(path)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::dictionary::WordSet;
    use tempfile::tempdir;

    fn checker(words: &[&str]) -> SpellChecker {
        let words: Vec<String> = words.iter().map(|s| s.to_string()).collect();
        let dictionary = FstDictionary::new(WordSet::from_words(&words).unwrap(), 5);
        SpellChecker::new(&Config::default(), Path::new("."), Box::new(dictionary))
    }

    #[test]
    fn test_scan_reports_location() {
        let checker = checker(&["this", "is", "a"]);
        let rust = checker.registry().by_name("Rust").unwrap();
        let file = SourceFile::new("main.rs", "fn main() {}\n// This is a tpyo\n", rust);

        let errors: Vec<_> = file
            .scan(checker.filter(), checker.dictionary())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].word, "tpyo");
        assert_eq!((errors[0].line, errors[0].column), (2, 14));
        assert_eq!(errors[0].line_content, "// This is a tpyo");
        assert_eq!(errors[0].to_string(), "main.rs - Ln 2 Col 14: tpyo");
    }

    #[test]
    fn test_parse_error_carries_line() {
        let checker = checker(&["fine"]);
        let c = checker.registry().by_name("C").unwrap();
        let file = SourceFile::new("x.c", "// fine\nint x;\n/* never closed\n", c);

        let items: Vec<_> = file.scan(checker.filter(), checker.dictionary()).collect();
        assert_eq!(items.len(), 1);
        match &items[0] {
            Err(ScanError::Parse { file, line }) => {
                assert_eq!(file, "x.c");
                assert_eq!(*line, 3);
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_open_failures() {
        let dir = tempdir().unwrap();
        let checker = checker(&[]);

        let empty = dir.path().join("empty.rs");
        fs::write(&empty, "").unwrap();
        assert!(matches!(checker.open(&empty), Err(ScanError::EmptyFile(_))));

        let latin = dir.path().join("latin.rs");
        fs::write(&latin, [b'/', b'/', b' ', 0xe9]).unwrap();
        assert!(matches!(checker.open(&latin), Err(ScanError::Decode { .. })));

        let unknown = dir.path().join("blob.xyz");
        fs::write(&unknown, "data").unwrap();
        let failure = checker.open(&unknown).err().unwrap();
        assert!(failure.is_failure());
        assert!(failure.to_string().starts_with("No lexer found for: "));
    }

    #[test]
    fn test_check_keeps_path_order() {
        let dir = tempdir().unwrap();
        let mut paths = Vec::new();
        for (i, name) in ["a.py", "b.py", "c.py", "d.py"].iter().enumerate() {
            let path = dir.path().join(name);
            fs::write(&path, format!("# wrod{}\n", "x".repeat(i))).unwrap();
            paths.push(path);
        }

        let checker = checker(&["word"]);
        let results = checker.check(&paths);
        let words: Vec<&str> = results.iter().map(|r| r.errors[0].word.as_str()).collect();
        assert_eq!(words, vec!["wrod", "wrodx", "wrodxx", "wrodxxx"]);
        assert!(results.iter().all(CheckResult::failed));
        assert_eq!(results[0].errors[0].known_suggestions(), ["word"]);
    }

    #[test]
    fn test_run_status() {
        let mut status = RunStatus::default();
        status.record(&CheckResult::default());
        assert_eq!(status.exit_code(), 0);

        status.record(&CheckResult {
            failure: Some(ScanError::EmptyFile("x".into())),
            ..Default::default()
        });
        assert_eq!(status.exit_code(), 0);

        status.record(&CheckResult {
            error_count: 2,
            fixed_count: 1,
            excluded_count: 1,
            ..Default::default()
        });
        assert_eq!(status.exit_code(), 0);

        status.record(&CheckResult {
            failure: Some(ScanError::NoLexer("x".into())),
            ..Default::default()
        });
        assert_eq!(status.exit_code(), 1);
        assert_eq!(status.files_checked, 4);
    }
}
