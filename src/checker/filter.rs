//! Which tokens get spell checked.

use crate::parser::{merge_tokens, Lexer, LexerRegistry, Merge, Token, TokenCategory};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::VecDeque;
use std::vec::IntoIter;

/// Host language -> markup language its doc-strings are written in.
pub const DOC_MARKUP: &[(&str, &str)] = &[("Python", "reStructuredText")];

lazy_static! {
    static ref RAW_STRING: Regex = Regex::new(r#"^(?:[rR][bB]?|[bB][rR])#*["']"#).unwrap();
}

/// Default minimum length, in characters, of a string literal worth checking.
pub const MIN_STRING_LENGTH: usize = 10;

/// A checkable span of text at an absolute file offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub offset: usize,
    pub text: String,
}

/// The lexer flagged invalid input starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseFailure {
    pub offset: usize,
}

#[derive(Clone, Copy)]
pub struct TokenFilter<'r> {
    registry: &'r LexerRegistry,
    min_string_length: usize,
}

impl<'r> TokenFilter<'r> {
    pub fn new(registry: &'r LexerRegistry) -> Self {
        Self {
            registry,
            min_string_length: MIN_STRING_LENGTH,
        }
    }

    pub fn min_string_length(mut self, chars: usize) -> Self {
        self.min_string_length = chars;
        self
    }

    /// Whether a merged token produced by `lexer` is spell checked.
    ///
    /// Comments and prose are; string literals only when they are long
    /// enough, not raw, and not inline literals of a markup language.
    /// Doc-strings without a markup language count as string literals.
    pub fn is_eligible(&self, token: &Token, lexer: &dyn Lexer) -> bool {
        match token.category {
            TokenCategory::Comment
            | TokenCategory::Text
            | TokenCategory::Emphasis
            | TokenCategory::Strong => true,
            TokenCategory::StringLiteral | TokenCategory::DocString => {
                token.text.chars().count() > self.min_string_length
                    && !lexer.is_markup()
                    && !RAW_STRING.is_match(&token.text)
            }
            TokenCategory::PreprocComment | TokenCategory::Other | TokenCategory::Error => false,
        }
    }

    /// The markup lexer for `lexer`'s doc-strings, if it has one.
    pub fn doc_markup(&self, lexer: &dyn Lexer) -> Option<&'r dyn Lexer> {
        let (_, markup) = DOC_MARKUP
            .iter()
            .find(|(host, _)| host.eq_ignore_ascii_case(lexer.name()))?;
        self.registry.by_name(markup)
    }

    /// Lazy sequence of checkable spans in `content`, in offset order.
    ///
    /// Doc-strings of a language listed in [`DOC_MARKUP`] are re-lexed as
    /// markup and filtered with that lexer's rules, offsets shifted to the
    /// enclosing file. An `Error` token ends the sequence with a failure.
    pub fn spans<'a>(&self, content: &str, lexer: &'a dyn Lexer) -> Eligible<'a>
    where
        'r: 'a,
    {
        Eligible {
            filter: *self,
            lexer,
            tokens: merge_tokens(lexer.tokenize(content)),
            nested: VecDeque::new(),
            failed: false,
        }
    }
}

pub struct Eligible<'a> {
    filter: TokenFilter<'a>,
    lexer: &'a dyn Lexer,
    tokens: Merge<IntoIter<Token>>,
    nested: VecDeque<Result<Span, ParseFailure>>,
    failed: bool,
}

impl Iterator for Eligible<'_> {
    type Item = Result<Span, ParseFailure>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }
            if let Some(item) = self.nested.pop_front() {
                self.failed = item.is_err();
                return Some(item);
            }

            let token = self.tokens.next()?;
            if token.category == TokenCategory::Error {
                self.failed = true;
                return Some(Err(ParseFailure {
                    offset: token.offset,
                }));
            }

            if token.category == TokenCategory::DocString {
                if let Some(markup) = self.filter.doc_markup(self.lexer) {
                    let base = token.offset;
                    self.nested
                        .extend(self.filter.spans(&token.text, markup).map(|item| match item {
                            Ok(span) => Ok(Span {
                                offset: span.offset + base,
                                text: span.text,
                            }),
                            Err(failure) => Err(ParseFailure {
                                offset: failure.offset + base,
                            }),
                        }));
                    continue;
                }
            }

            // Whitespace between code tokens lexes as `Text`.
            if token.text.trim().is_empty() {
                continue;
            }
            if self.filter.is_eligible(&token, self.lexer) {
                return Some(Ok(Span {
                    offset: token.offset,
                    text: token.text,
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(category: TokenCategory, text: &str) -> Token {
        Token::new(0, category, text)
    }

    fn spans(registry: &LexerRegistry, language: &str, content: &str) -> Vec<Result<Span, ParseFailure>> {
        let lexer = registry.by_name(language).unwrap();
        TokenFilter::new(registry).spans(content, lexer).collect()
    }

    #[test]
    fn test_category_rules() {
        let registry = LexerRegistry::builtin();
        let filter = TokenFilter::new(&registry);
        let rust = registry.by_name("Rust").unwrap();

        assert!(filter.is_eligible(&token(TokenCategory::Comment, "// x"), rust));
        assert!(filter.is_eligible(&token(TokenCategory::Text, "x"), rust));
        assert!(filter.is_eligible(&token(TokenCategory::Strong, "x"), rust));
        assert!(!filter.is_eligible(&token(TokenCategory::PreprocComment, "#include <x>"), rust));
        assert!(!filter.is_eligible(&token(TokenCategory::Other, "let"), rust));
    }

    #[test]
    fn test_string_length_threshold() {
        let registry = LexerRegistry::builtin();
        let filter = TokenFilter::new(&registry);
        let rust = registry.by_name("Rust").unwrap();

        // Ten characters is not enough, eleven is.
        assert!(!filter.is_eligible(&token(TokenCategory::StringLiteral, "\"12345678\""), rust));
        assert!(filter.is_eligible(&token(TokenCategory::StringLiteral, "\"123456789\""), rust));

        let lenient = filter.min_string_length(2);
        assert!(lenient.is_eligible(&token(TokenCategory::StringLiteral, "\"ab\""), rust));
    }

    #[test]
    fn test_raw_strings_are_skipped() {
        let registry = LexerRegistry::builtin();
        let filter = TokenFilter::new(&registry);
        let python = registry.by_name("Python").unwrap();

        assert!(!filter.is_eligible(&token(TokenCategory::StringLiteral, r#"r"\d+ matches digits""#), python));
        assert!(!filter.is_eligible(&token(TokenCategory::StringLiteral, r#"br'\x00 bytes here'"#), python));
        assert!(!filter.is_eligible(&token(TokenCategory::StringLiteral, r###"r#"raw with hashes"#"###), python));
        assert!(filter.is_eligible(&token(TokenCategory::StringLiteral, "\"regular long string\""), python));
    }

    #[test]
    fn test_markup_literals_are_skipped() {
        let registry = LexerRegistry::builtin();
        let filter = TokenFilter::new(&registry);
        let rst = registry.by_name("reStructuredText").unwrap();

        assert!(!filter.is_eligible(&token(TokenCategory::StringLiteral, "``some_function_name()``"), rst));
    }

    #[test]
    fn test_spans_skip_code() {
        let registry = LexerRegistry::builtin();
        let content = "fn main() {} // a comment\n";
        let found = spans(&registry, "Rust", content);
        assert_eq!(found.len(), 1);
        let span = found[0].as_ref().unwrap();
        assert_eq!(&content[span.offset..span.offset + span.text.len()], span.text);
        assert!(span.text.starts_with("// a comment"));
    }

    #[test]
    fn test_docstring_is_relexed_as_markup() {
        let registry = LexerRegistry::builtin();
        let content = "def f():\n    \"\"\"Frob the ``widget_name`` quickly.\"\"\"\n";
        let found: Vec<Span> = spans(&registry, "Python", content)
            .into_iter()
            .map(Result::unwrap)
            .collect();

        let checked: String = found.iter().map(|s| s.text.as_str()).collect();
        assert!(checked.contains("Frob the"));
        assert!(checked.contains("quickly."));
        assert!(!checked.contains("widget_name"));
        for span in &found {
            assert_eq!(&content[span.offset..span.offset + span.text.len()], span.text);
        }
    }

    #[test]
    fn test_error_token_stops_the_stream() {
        let registry = LexerRegistry::builtin();
        let content = "// fine\nlet s = \"never closed";
        let found = spans(&registry, "Rust", content);
        let last = found.last().unwrap();
        assert_eq!(*last, Err(ParseFailure { offset: 16 }));
        assert!(found[..found.len() - 1].iter().all(Result::is_ok));
    }
}
