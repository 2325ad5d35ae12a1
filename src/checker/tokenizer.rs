//! Natural-language word extraction.
//!
//! [`word_spans`] is the single definition of where a word starts and ends.
//! The scanner and the correction source map both split on it, so an error
//! offset always names the start of a source map chunk.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::VecDeque;
use std::ops::Range;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^.+@[^.].*\.[a-z]{2,}\W?$").unwrap();
    static ref URL: Regex = Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://\S").unwrap();
    static ref WIKI_WORD: Regex = Regex::new(r"^[A-Z]\w+[A-Z]+\w+").unwrap();
}

/// Leading punctuation ignored when matching a chunk against the filters.
const OPENERS: &[char] = &['(', '[', '{', '<', '"', '\'', '`'];

/// Byte ranges of the words in `text`: maximal alphabetic runs, where an
/// apostrophe between two letters stays inside the word (`don't`).
pub fn word_spans(text: &str) -> WordSpans<'_> {
    WordSpans {
        text,
        chars: text.char_indices().peekable(),
    }
}

pub struct WordSpans<'a> {
    text: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Iterator for WordSpans<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        let start = loop {
            let (i, ch) = self.chars.next()?;
            if ch.is_alphabetic() {
                break i;
            }
        };

        let mut end = self.text.len();
        while let Some(&(i, ch)) = self.chars.peek() {
            if ch.is_alphabetic() {
                self.chars.next();
                continue;
            }
            if is_apostrophe(ch) {
                let after = i + ch.len_utf8();
                if self.text[after..].chars().next().is_some_and(char::is_alphabetic) {
                    self.chars.next();
                    continue;
                }
            }
            end = i;
            break;
        }
        Some(start..end)
    }
}

fn is_apostrophe(ch: char) -> bool {
    ch == '\'' || ch == '\u{2019}'
}

/// Lazy sequence of `(word, offset)` candidates in a token's text, offsets
/// relative to the start of `text`.
pub fn extract(text: &str) -> Words<'_> {
    Words {
        text,
        cursor: 0,
        pending: VecDeque::new(),
    }
}

pub struct Words<'a> {
    text: &'a str,
    cursor: usize,
    pending: VecDeque<Range<usize>>,
}

impl<'a> Iterator for Words<'a> {
    type Item = (&'a str, usize);

    fn next(&mut self) -> Option<(&'a str, usize)> {
        let text = self.text;
        loop {
            if let Some(span) = self.pending.pop_front() {
                return Some((&text[span.clone()], span.start));
            }
            let chunk = self.next_chunk()?;
            if is_excluded(&text[chunk.clone()]) {
                continue;
            }
            let base = chunk.start;
            self.pending.extend(
                word_spans(&text[chunk])
                    .map(|span| span.start + base..span.end + base),
            );
        }
    }
}

impl Words<'_> {
    /// Next whitespace-delimited chunk, skipping `#!` lines entirely.
    fn next_chunk(&mut self) -> Option<Range<usize>> {
        let rest = &self.text[self.cursor..];
        let skipped = rest.len() - rest.trim_start().len();
        let start = self.cursor + skipped;
        if start >= self.text.len() {
            self.cursor = self.text.len();
            return None;
        }

        let at_line_start = start == 0 || self.text[..start].ends_with(['\n', '\r']);
        if at_line_start && self.text[start..].starts_with("#!/") {
            self.cursor = self.text[start..]
                .find(['\n', '\r'])
                .map_or(self.text.len(), |i| start + i);
            return self.next_chunk();
        }

        let end = self.text[start..]
            .find(char::is_whitespace)
            .map_or(self.text.len(), |i| start + i);
        self.cursor = end;
        Some(start..end)
    }
}

/// Chunks that are not prose: email addresses, URLs and WikiWords.
fn is_excluded(chunk: &str) -> bool {
    let bare = chunk.trim_start_matches(OPENERS);
    EMAIL.is_match(bare) || URL.is_match(bare) || WIKI_WORD.is_match(bare)
}
