use crate::checker::suggestions;
use anyhow::{Context, Result};
use dashmap::DashSet;
use fst::{Automaton, IntoStreamer, Set, SetBuilder, Streamer};
use log::{debug, warn};
use memmap2::Mmap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// The spelling dictionary the scanner and corrector consult.
///
/// `add` takes `&self`: additions made while one file is being corrected
/// must be visible to every later `check`, including checks still pending
/// in the same file's scan.
pub trait Dictionary: Send + Sync {
    fn check(&self, word: &str) -> bool;

    /// Ordered correction candidates, best first. May be empty.
    fn suggest(&self, word: &str) -> Vec<String>;

    /// Accept `word` from now on and persist it. Idempotent.
    fn add(&self, word: &str) -> Result<()>;
}

/// Bytes backing an FST set: a mapped dictionary file or one built in memory.
pub enum Backing {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl AsRef<[u8]> for Backing {
    fn as_ref(&self) -> &[u8] {
        match self {
            Backing::Mapped(map) => map,
            Backing::Owned(bytes) => bytes,
        }
    }
}

/// A sorted word set stored as a finite state transducer.
pub struct WordSet {
    set: Set<Backing>,
}

impl WordSet {
    /// Load the word set for a language, building it from a system word
    /// list, or a small bootstrap list, when no dictionary is installed.
    pub fn load(language: &str) -> Result<Self> {
        let dict_path = Self::get_dictionary_path(language)?;

        if !dict_path.exists() {
            match system_wordlist(language) {
                Some(path) => {
                    debug!("building {} from {}", dict_path.display(), path.display());
                    let words = read_wordlist(&path)?;
                    Self::build_from_words(&words, &dict_path)?;
                }
                None => {
                    warn!(
                        "no dictionary installed for {}, using a bootstrap word list; run `srcspell dict download {}`",
                        language, language
                    );
                    let words = Self::get_basic_wordlist();
                    return Self::from_words(&words);
                }
            }
        }

        Self::load_from_path(&dict_path)
    }

    /// Load dictionary from a specific path (useful for testing)
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open dictionary: {}", path.display()))?;

        // SAFETY: dictionary files are written once by `build_from_words`
        // and never modified while mapped.
        let map = unsafe { Mmap::map(&file) }
            .with_context(|| format!("Failed to map dictionary: {}", path.display()))?;
        let set = Set::new(Backing::Mapped(map)).context("Failed to parse dictionary")?;

        Ok(Self { set })
    }

    /// Build an in-memory word set.
    pub fn from_words(words: &[String]) -> Result<Self> {
        let mut builder = SetBuilder::memory();
        for word in sorted(words) {
            builder
                .insert(word.as_bytes())
                .context("Failed to insert word into dictionary")?;
        }
        let bytes = builder.into_inner().context("Failed to finalize dictionary")?;
        let set = Set::new(Backing::Owned(bytes)).context("Failed to parse dictionary")?;
        Ok(Self { set })
    }

    /// Check if word exists in dictionary
    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Get all words with a given prefix
    pub fn words_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut results = Vec::new();
        let mut stream = self
            .set
            .search(fst::automaton::Str::new(prefix).starts_with())
            .into_stream();

        while let Some(key) = stream.next() {
            if let Ok(word) = String::from_utf8(key.to_vec()) {
                results.push(word);
            }
        }

        results
    }

    /// Words whose length in bytes is within one of `len`.
    ///
    /// Walks the whole set; only used for very short words.
    pub fn words_near_length(&self, len: usize, limit: usize) -> Vec<String> {
        let mut words = Vec::new();
        let mut stream = self.set.stream();

        while let Some(key) = stream.next() {
            if key.len().abs_diff(len) <= 1 {
                if let Ok(word) = String::from_utf8(key.to_vec()) {
                    words.push(word);
                    if words.len() >= limit {
                        break;
                    }
                }
            }
        }

        words
    }

    /// Build dictionary from word list
    pub fn build_from_words(words: &[String], output_path: &Path) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).context("Failed to create data directory")?;
        }
        let file = File::create(output_path)
            .with_context(|| format!("Failed to create dictionary: {}", output_path.display()))?;

        let writer = BufWriter::new(file);
        let mut builder = SetBuilder::new(writer).context("Failed to create FST builder")?;

        for word in sorted(words) {
            builder
                .insert(word.as_bytes())
                .context("Failed to insert word into dictionary")?;
        }

        builder.finish().context("Failed to finalize dictionary")?;

        Ok(())
    }

    pub fn get_dictionary_path(language: &str) -> Result<PathBuf> {
        let data_dir = crate::config::Config::data_dir().context("Failed to get data directory")?;
        Ok(data_dir.join(format!("{}.dict", language)))
    }

    fn get_basic_wordlist() -> Vec<String> {
        [
            "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not",
            "on", "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from",
            "they", "we", "say", "her", "she", "or", "an", "will", "my", "one", "all", "would",
            "there", "their", "what", "so", "up", "out", "if", "about", "who", "get", "which",
            "go", "me", "when", "make", "can", "like", "time", "no", "just", "him", "know",
            "take", "into", "year", "your", "good", "some", "could", "them", "see", "other",
            "than", "then", "now", "look", "only", "come", "its", "over", "think", "also",
            "back", "after", "use", "two", "how", "our", "work", "first", "well", "way", "even",
            "new", "want", "because", "any", "these", "give", "day", "most", "us", "is", "are",
            "was", "were", "been", "has", "had", "does", "did", "should", "must", "may", "each",
            "file", "line", "list", "return", "returns", "value", "values", "function",
            "method", "class", "type", "string", "number", "error", "errors", "test", "tests",
            "check", "used", "set", "get", "read", "write", "call", "name", "data", "path",
            "default", "option", "options", "true", "false", "null", "none", "empty", "start",
            "end", "next", "first", "last", "input", "output", "run", "build", "version",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

fn sorted(words: &[String]) -> Vec<&str> {
    let mut sorted: Vec<&str> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}

/// A system word list for `language`, if one is installed.
fn system_wordlist(language: &str) -> Option<PathBuf> {
    let short = language.split(['_', '-']).next().unwrap_or(language);
    [
        format!("/usr/share/hunspell/{}.dic", language),
        format!("/usr/share/myspell/{}.dic", language),
        format!("/usr/share/dict/{}", language),
        format!("/usr/share/dict/{}-words", short),
    ]
    .into_iter()
    .map(PathBuf::from)
    .chain((short == "en").then(|| PathBuf::from("/usr/share/dict/words")))
    .find(|path| path.is_file())
}

/// Read a plain or hunspell `.dic` word list from disk.
pub fn read_wordlist(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read word list: {}", path.display()))?;
    Ok(parse_wordlist(&String::from_utf8_lossy(&bytes)))
}

/// One word per line. Affix flags after `/` are dropped; `#` comments and
/// the count line that opens a `.dic` file are skipped.
pub fn parse_wordlist(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let word = line.split('/').next()?.trim();
            let keep = !word.is_empty()
                && !word.starts_with('#')
                && !word.chars().all(|c| c.is_ascii_digit());
            keep.then(|| word.to_string())
        })
        .collect()
}

/// The system word set overlaid with a personal word list.
pub struct FstDictionary {
    words: WordSet,
    personal: DashSet<String>,
    personal_path: Option<PathBuf>,
    write_lock: Mutex<()>,
    max_suggestions: usize,
}

impl FstDictionary {
    pub fn new(words: WordSet, max_suggestions: usize) -> Self {
        Self {
            words,
            personal: DashSet::new(),
            personal_path: None,
            write_lock: Mutex::new(()),
            max_suggestions,
        }
    }

    /// Open the dictionary for `language` with the personal word list at
    /// `personal_path`, creating the list if it does not exist.
    pub fn open(language: &str, personal_path: &Path, max_suggestions: usize) -> Result<Self> {
        let words = WordSet::load(language)?;
        Self::new(words, max_suggestions).with_personal(personal_path)
    }

    pub fn with_personal(mut self, path: &Path) -> Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .context("Failed to create personal dictionary directory")?;
            }
            fs::write(path, "").context("Failed to create personal dictionary file")?;
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read personal dictionary: {}", path.display()))?;
        for line in content.lines() {
            let word = line.trim();
            if !word.is_empty() && !word.starts_with('#') {
                self.personal.insert(word.to_string());
            }
        }
        debug!("{} personal words from {}", self.personal.len(), path.display());

        self.personal_path = Some(path.to_path_buf());
        Ok(self)
    }

    fn known(&self, word: &str) -> bool {
        self.words.contains(word) || self.personal.contains(word)
    }

    fn persist(&self, word: &str) -> Result<()> {
        let Some(path) = &self.personal_path else {
            return Ok(());
        };
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("personal dictionary lock poisoned"))?;

        let needs_newline = fs::read(path)
            .map(|bytes| bytes.last().is_some_and(|&b| b != b'\n'))
            .unwrap_or(false);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open personal dictionary: {}", path.display()))?;
        if needs_newline {
            writeln!(file)?;
        }
        writeln!(file, "{}", word)
            .with_context(|| format!("Failed to update personal dictionary: {}", path.display()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    Lower,
    Title,
    Upper,
    Mixed,
}

fn case_of(word: &str) -> Case {
    let mut chars = word.chars().filter(|c| c.is_alphabetic());
    let Some(first) = chars.next() else {
        return Case::Lower;
    };
    let rest: Vec<char> = chars.collect();
    if first.is_lowercase() && rest.iter().all(|c| c.is_lowercase()) {
        Case::Lower
    } else if first.is_uppercase() && rest.iter().all(|c| c.is_uppercase()) {
        Case::Upper
    } else if first.is_uppercase() && rest.iter().all(|c| c.is_lowercase()) {
        Case::Title
    } else {
        Case::Mixed
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn apply_case(word: &str, case: Case) -> String {
    match case {
        Case::Title => title_case(word),
        Case::Upper => word.to_uppercase(),
        Case::Lower | Case::Mixed => word.to_string(),
    }
}

impl Dictionary for FstDictionary {
    fn check(&self, word: &str) -> bool {
        if word.chars().count() <= 1 || self.known(word) {
            return true;
        }

        let case = case_of(word);
        let lower = word.to_lowercase();
        // "Parser" and "PARSER" are fine when "parser" is; "paris" is not
        // when only "Paris" is listed.
        if matches!(case, Case::Title | Case::Upper) && self.known(&lower) {
            return true;
        }
        if case == Case::Upper && self.known(&title_case(word)) {
            return true;
        }

        for suffix in ["'s", "\u{2019}s"] {
            if let Some(stem) = word.strip_suffix(suffix) {
                return self.check(stem);
            }
        }
        false
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        let case = case_of(word);
        let lower = word.to_lowercase();

        let mut found = suggestions::generate(&lower, &self.words, self.max_suggestions);
        let mut personal: Vec<String> = self
            .personal
            .iter()
            .map(|w| w.key().clone())
            .filter(|w| suggestions::edit_distance(&lower, &w.to_lowercase()) <= 2)
            .collect();
        personal.sort();
        for candidate in personal {
            if !found.contains(&candidate) {
                found.push(candidate);
            }
        }

        let mut out: Vec<String> = Vec::new();
        for candidate in found {
            let cased = apply_case(&candidate, case);
            if cased != word && !out.contains(&cased) {
                out.push(cased);
            }
        }
        out.truncate(self.max_suggestions);
        out
    }

    fn add(&self, word: &str) -> Result<()> {
        if self.personal.insert(word.to_string()) {
            self.persist(word)?;
        }
        Ok(())
    }
}
