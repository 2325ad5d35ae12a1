pub mod markdown;
pub mod plaintext;
pub mod rst;
pub mod source_code;

use log::debug;
use std::collections::HashMap;
use std::path::Path;

/// Syntactic category assigned to a span of source text by a lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Comment,
    /// Preprocessor directives such as `#include`. Never spell checked.
    PreprocComment,
    Text,
    Emphasis,
    Strong,
    StringLiteral,
    DocString,
    Other,
    /// Input the lexer could not make sense of.
    Error,
}

/// A span of source text with its absolute offset.
///
/// Lexers emit raw tokens of this shape; [`merge_tokens`] coalesces them into
/// maximal same-category runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub offset: usize,
    pub category: TokenCategory,
    pub text: String,
}

impl Token {
    pub fn new(offset: usize, category: TokenCategory, text: impl Into<String>) -> Self {
        Self {
            offset,
            category,
            text: text.into(),
        }
    }
}

/// A language-aware tokenizer.
///
/// Offsets of the returned tokens are byte offsets into `text`, in
/// non-decreasing order.
pub trait Lexer: Send + Sync {
    /// Canonical language name, e.g. `Python`.
    fn name(&self) -> &str;

    fn tokenize(&self, text: &str) -> Vec<Token>;

    /// Documentation markup languages (Markdown, reStructuredText).
    fn is_markup(&self) -> bool {
        false
    }

    fn aliases(&self) -> &[&str] {
        &[]
    }

    fn extensions(&self) -> &[&str] {
        &[]
    }

    fn filenames(&self) -> &[&str] {
        &[]
    }

    /// Interpreter names recognised on a `#!` line.
    fn interpreters(&self) -> &[&str] {
        &[]
    }
}

/// Lazy adapter produced by [`merge_tokens`].
pub struct Merge<I> {
    tokens: I,
    pending: Option<Token>,
}

/// Coalesce consecutive tokens of the same category into one token that
/// starts at the offset of the first.
pub fn merge_tokens<I>(tokens: I) -> Merge<I::IntoIter>
where
    I: IntoIterator<Item = Token>,
{
    Merge {
        tokens: tokens.into_iter(),
        pending: None,
    }
}

impl<I> Iterator for Merge<I>
where
    I: Iterator<Item = Token>,
{
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let Some(token) = self.tokens.next() else {
                return self.pending.take();
            };

            if let Some(run) = self
                .pending
                .as_mut()
                .filter(|run| run.category == token.category)
            {
                run.text.push_str(&token.text);
                continue;
            }

            if let Some(finished) = self.pending.replace(token) {
                return Some(finished);
            }
        }
    }
}

/// The set of lexers available to the scanner, and the rules for picking
/// one for a file.
pub struct LexerRegistry {
    lexers: Vec<Box<dyn Lexer>>,
    /// File extension -> lexer name, from configuration.
    declared: HashMap<String, String>,
}

impl Default for LexerRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LexerRegistry {
    pub fn empty() -> Self {
        Self {
            lexers: Vec::new(),
            declared: HashMap::new(),
        }
    }

    /// Every lexer shipped with the crate.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for lexer in source_code::lexers() {
            registry.register(Box::new(lexer));
        }
        registry.register(Box::new(markdown::MarkdownLexer));
        registry.register(Box::new(rst::RstLexer));
        registry.register(Box::new(plaintext::PlainTextLexer));
        registry
    }

    pub fn register(&mut self, lexer: Box<dyn Lexer>) {
        self.lexers.push(lexer);
    }

    /// Map file extensions to lexer names, overriding detection.
    pub fn with_declared(mut self, declared: &HashMap<String, String>) -> Self {
        for (ext, name) in declared {
            self.declared
                .insert(ext.trim_start_matches('.').to_lowercase(), name.clone());
        }
        self
    }

    pub fn by_name(&self, name: &str) -> Option<&dyn Lexer> {
        self.lexers
            .iter()
            .find(|lexer| {
                lexer.name().eq_ignore_ascii_case(name)
                    || lexer.aliases().iter().any(|a| a.eq_ignore_ascii_case(name))
            })
            .map(|lexer| lexer.as_ref())
    }

    /// Pick a lexer for a file: declared language, then extension or file
    /// name, then the `#!` interpreter. Files without an extension fall back
    /// to plain text.
    pub fn detect(&self, path: &Path, content: &str) -> Option<&dyn Lexer> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        if let Some(name) = ext.as_ref().and_then(|e| self.declared.get(e)) {
            match self.by_name(name) {
                Some(lexer) => return Some(lexer),
                None => debug!("declared language '{}' has no lexer", name),
            }
        }

        let found = self
            .lexers
            .iter()
            .find(|lexer| {
                ext.as_deref()
                    .is_some_and(|e| lexer.extensions().contains(&e))
                    || lexer.filenames().contains(&file_name)
            })
            .or_else(|| {
                let interpreter = shebang_interpreter(content)?;
                self.lexers.iter().find(|lexer| {
                    lexer
                        .interpreters()
                        .iter()
                        .any(|i| interpreter.starts_with(i))
                })
            })
            .map(|lexer| lexer.as_ref());

        match found {
            Some(lexer) => Some(lexer),
            None if ext.is_none() => self.by_name(plaintext::NAME),
            None => None,
        }
    }
}

/// Interpreter named on a `#!` first line: `#!/usr/bin/env python3` gives
/// `python3`.
fn shebang_interpreter(content: &str) -> Option<&str> {
    let line = content.lines().next()?.strip_prefix("#!")?;
    let mut parts = line.split_whitespace();
    let program = parts.next()?.rsplit('/').next()?;
    if program == "env" {
        parts.find(|arg| !arg.starts_with('-'))
    } else {
        Some(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn tok(offset: usize, category: TokenCategory, text: &str) -> Token {
        Token::new(offset, category, text)
    }

    #[test]
    fn test_merge_adjacent_runs() {
        let raw = vec![
            tok(0, TokenCategory::Comment, "// one"),
            tok(6, TokenCategory::Comment, "\n"),
            tok(7, TokenCategory::Other, "x"),
            tok(8, TokenCategory::Comment, "// two"),
        ];

        let merged: Vec<_> = merge_tokens(raw).collect();
        assert_eq!(
            merged,
            vec![
                tok(0, TokenCategory::Comment, "// one\n"),
                tok(7, TokenCategory::Other, "x"),
                tok(8, TokenCategory::Comment, "// two"),
            ]
        );
    }

    #[test]
    fn test_merge_empty_stream() {
        assert_eq!(merge_tokens(Vec::new()).count(), 0);
    }

    #[test]
    fn test_merge_is_lazy() {
        let endless = (0..).map(|i| {
            let category = if (i / 3) % 2 == 0 {
                TokenCategory::Text
            } else {
                TokenCategory::Other
            };
            tok(i, category, "a")
        });

        let first: Vec<_> = merge_tokens(endless).take(2).collect();
        assert_eq!(first[0], tok(0, TokenCategory::Text, "aaa"));
        assert_eq!(first[1], tok(3, TokenCategory::Other, "aaa"));
    }

    fn category() -> impl Strategy<Value = TokenCategory> {
        prop_oneof![
            Just(TokenCategory::Comment),
            Just(TokenCategory::Text),
            Just(TokenCategory::StringLiteral),
            Just(TokenCategory::Other),
        ]
    }

    proptest! {
        #[test]
        fn merging_twice_changes_nothing(parts in prop::collection::vec((category(), "[a-z ]{1,4}"), 0..40)) {
            let mut offset = 0;
            let raw: Vec<Token> = parts
                .into_iter()
                .map(|(category, text)| {
                    let token = Token::new(offset, category, text);
                    offset += token.text.len();
                    token
                })
                .collect();

            let once: Vec<_> = merge_tokens(raw).collect();
            let twice: Vec<_> = merge_tokens(once.clone()).collect();
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_detect_by_extension() {
        let registry = LexerRegistry::builtin();
        let lexer = registry.detect(&PathBuf::from("src/main.rs"), "").unwrap();
        assert_eq!(lexer.name(), "Rust");
        let lexer = registry.detect(&PathBuf::from("README.md"), "").unwrap();
        assert_eq!(lexer.name(), "Markdown");
        let lexer = registry.detect(&PathBuf::from("docs/index.rst"), "").unwrap();
        assert_eq!(lexer.name(), "reStructuredText");
    }

    #[test]
    fn test_detect_by_shebang() {
        let registry = LexerRegistry::builtin();
        let lexer = registry
            .detect(&PathBuf::from("bin/tool"), "#!/usr/bin/env python3\nprint(1)\n")
            .unwrap();
        assert_eq!(lexer.name(), "Python");
        let lexer = registry
            .detect(&PathBuf::from("run.cgi"), "#!/bin/bash\necho hi\n")
            .unwrap();
        assert_eq!(lexer.name(), "Shell");
    }

    #[test]
    fn test_detect_fallbacks() {
        let registry = LexerRegistry::builtin();
        let lexer = registry.detect(&PathBuf::from("LICENSE"), "MIT").unwrap();
        assert_eq!(lexer.name(), plaintext::NAME);
        assert!(registry
            .detect(&PathBuf::from("data.xyz"), "stuff")
            .is_none());
    }

    #[test]
    fn test_declared_language_wins() {
        let mut declared = HashMap::new();
        declared.insert(".tpl".to_string(), "markdown".to_string());
        let registry = LexerRegistry::builtin().with_declared(&declared);
        let lexer = registry.detect(&PathBuf::from("page.tpl"), "").unwrap();
        assert_eq!(lexer.name(), "Markdown");
    }
}
