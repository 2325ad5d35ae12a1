use crate::parser::{Lexer, Token, TokenCategory};
use aho_corasick::{AhoCorasick, Input, MatchKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
    Backslash,
    /// The closing quote written twice stands for itself (`@"a""b"`).
    Doubled,
    None,
}

#[derive(Debug)]
struct StringStyle {
    open: &'static str,
    close: &'static str,
    multiline: bool,
    escape: Escape,
}

const fn string(open: &'static str, multiline: bool, escape: Escape) -> StringStyle {
    StringStyle {
        open,
        close: open,
        multiline,
        escape,
    }
}

/// Comment and literal delimiters of one language.
#[derive(Debug)]
pub struct Syntax {
    name: &'static str,
    aliases: &'static [&'static str],
    extensions: &'static [&'static str],
    filenames: &'static [&'static str],
    interpreters: &'static [&'static str],
    line_comments: &'static [&'static str],
    /// Line comments only start at the beginning of a word (`$#` is not a
    /// comment in shell).
    comment_at_word_start: bool,
    block_comment: Option<(&'static str, &'static str)>,
    nested_comments: bool,
    strings: &'static [StringStyle],
    /// Letters that may precede an opening quote. Only raw prefixes stay
    /// with the literal; the rest lex as code.
    prefixes: &'static str,
    /// Rust style `r#"..."#` raw strings.
    raw_hashes: bool,
    /// Triple quoted strings opening a statement are doc-strings.
    doc_strings: bool,
    /// `#` directive lines.
    preprocessor: bool,
    /// `/.../flags` regular expression literals.
    regex_literals: bool,
    /// `1'000'000` number literals.
    digit_separators: bool,
    /// Sequences that would otherwise open a literal but are plain code.
    verbatim: &'static [&'static str],
}

const BASE: Syntax = Syntax {
    name: "",
    aliases: &[],
    extensions: &[],
    filenames: &[],
    interpreters: &[],
    line_comments: &[],
    comment_at_word_start: false,
    block_comment: None,
    nested_comments: false,
    strings: &[],
    prefixes: "",
    raw_hashes: false,
    doc_strings: false,
    preprocessor: false,
    regex_literals: false,
    digit_separators: false,
    verbatim: &[],
};

const C_STRINGS: &[StringStyle] = &[
    string("\"", false, Escape::Backslash),
    string("'", false, Escape::Backslash),
];

const JS_STRINGS: &[StringStyle] = &[
    string("\"", false, Escape::Backslash),
    string("'", false, Escape::Backslash),
    string("`", true, Escape::Backslash),
];

const SYNTAXES: &[Syntax] = &[
    Syntax {
        name: "Rust",
        aliases: &["rs"],
        extensions: &["rs"],
        line_comments: &["//"],
        block_comment: Some(("/*", "*/")),
        nested_comments: true,
        strings: &[string("\"", true, Escape::Backslash)],
        prefixes: "b",
        raw_hashes: true,
        verbatim: &["'\"'", "'\\\"'"],
        ..BASE
    },
    Syntax {
        name: "C",
        extensions: &["c", "h"],
        line_comments: &["//"],
        block_comment: Some(("/*", "*/")),
        strings: C_STRINGS,
        preprocessor: true,
        ..BASE
    },
    Syntax {
        name: "C++",
        aliases: &["cpp", "cxx"],
        extensions: &["cpp", "cc", "cxx", "hpp", "hh", "hxx"],
        line_comments: &["//"],
        block_comment: Some(("/*", "*/")),
        strings: C_STRINGS,
        prefixes: "uUL8",
        preprocessor: true,
        digit_separators: true,
        ..BASE
    },
    Syntax {
        name: "C#",
        aliases: &["csharp", "cs"],
        extensions: &["cs"],
        line_comments: &["//"],
        block_comment: Some(("/*", "*/")),
        strings: &[
            StringStyle {
                open: "@\"",
                close: "\"",
                multiline: true,
                escape: Escape::Doubled,
            },
            string("\"", false, Escape::Backslash),
            string("'", false, Escape::Backslash),
        ],
        preprocessor: true,
        ..BASE
    },
    Syntax {
        name: "Java",
        extensions: &["java"],
        line_comments: &["//"],
        block_comment: Some(("/*", "*/")),
        strings: &[
            string("\"\"\"", true, Escape::Backslash),
            string("\"", false, Escape::Backslash),
            string("'", false, Escape::Backslash),
        ],
        ..BASE
    },
    Syntax {
        name: "JavaScript",
        aliases: &["js", "node"],
        extensions: &["js", "mjs", "cjs", "jsx"],
        interpreters: &["node"],
        line_comments: &["//"],
        block_comment: Some(("/*", "*/")),
        strings: JS_STRINGS,
        regex_literals: true,
        ..BASE
    },
    Syntax {
        name: "TypeScript",
        aliases: &["ts"],
        extensions: &["ts", "mts", "cts", "tsx"],
        interpreters: &["deno", "ts-node"],
        line_comments: &["//"],
        block_comment: Some(("/*", "*/")),
        strings: JS_STRINGS,
        regex_literals: true,
        ..BASE
    },
    Syntax {
        name: "Go",
        aliases: &["golang"],
        extensions: &["go"],
        line_comments: &["//"],
        block_comment: Some(("/*", "*/")),
        strings: &[
            string("\"", false, Escape::Backslash),
            string("'", false, Escape::Backslash),
            string("`", true, Escape::None),
        ],
        ..BASE
    },
    Syntax {
        name: "Python",
        aliases: &["py", "python3"],
        extensions: &["py", "pyw", "pyi"],
        filenames: &["SConstruct", "SConscript"],
        interpreters: &["python", "pypy"],
        line_comments: &["#"],
        strings: &[
            string("\"\"\"", true, Escape::Backslash),
            string("'''", true, Escape::Backslash),
            string("\"", false, Escape::Backslash),
            string("'", false, Escape::Backslash),
        ],
        prefixes: "rRbBuUfF",
        doc_strings: true,
        ..BASE
    },
    Syntax {
        name: "Shell",
        aliases: &["bash", "sh", "zsh"],
        extensions: &["sh", "bash", "zsh", "ksh"],
        interpreters: &["sh", "bash", "zsh", "ksh", "dash"],
        line_comments: &["#"],
        comment_at_word_start: true,
        strings: &[
            string("\"", true, Escape::Backslash),
            string("'", true, Escape::None),
        ],
        ..BASE
    },
    Syntax {
        name: "Ruby",
        aliases: &["rb"],
        extensions: &["rb", "rake", "gemspec"],
        filenames: &["Rakefile", "Gemfile"],
        interpreters: &["ruby"],
        line_comments: &["#"],
        strings: &[
            string("\"", true, Escape::Backslash),
            string("'", true, Escape::Backslash),
        ],
        ..BASE
    },
    Syntax {
        name: "TOML",
        extensions: &["toml"],
        line_comments: &["#"],
        strings: &[
            string("\"\"\"", true, Escape::Backslash),
            string("'''", true, Escape::None),
            string("\"", false, Escape::Backslash),
            string("'", false, Escape::None),
        ],
        ..BASE
    },
    Syntax {
        name: "Makefile",
        aliases: &["make"],
        extensions: &["mk", "mak"],
        filenames: &["Makefile", "makefile", "GNUmakefile"],
        line_comments: &["#"],
        comment_at_word_start: true,
        ..BASE
    },
    Syntax {
        name: "Dockerfile",
        aliases: &["docker"],
        filenames: &["Dockerfile", "Containerfile"],
        line_comments: &["#"],
        comment_at_word_start: true,
        ..BASE
    },
];

#[derive(Debug, Clone, Copy)]
enum Opener {
    LineComment,
    BlockComment,
    Str(usize),
    Preprocessor,
    Regex,
    Verbatim,
}

/// A lexer for one programming language, driven by its [`Syntax`] table.
pub struct CodeLexer {
    syntax: &'static Syntax,
    matcher: AhoCorasick,
    openers: Vec<Opener>,
}

/// One lexer per supported programming language.
pub fn lexers() -> Vec<CodeLexer> {
    SYNTAXES.iter().map(CodeLexer::new).collect()
}

impl CodeLexer {
    fn new(syntax: &'static Syntax) -> Self {
        let mut patterns = Vec::new();
        let mut openers = Vec::new();

        for marker in syntax.line_comments {
            patterns.push(*marker);
            openers.push(Opener::LineComment);
        }
        if let Some((open, _)) = syntax.block_comment {
            patterns.push(open);
            openers.push(Opener::BlockComment);
        }
        for (i, style) in syntax.strings.iter().enumerate() {
            patterns.push(style.open);
            openers.push(Opener::Str(i));
        }
        if syntax.preprocessor {
            patterns.push("#");
            openers.push(Opener::Preprocessor);
        }
        if syntax.regex_literals {
            patterns.push("/");
            openers.push(Opener::Regex);
        }
        for seq in syntax.verbatim {
            patterns.push(*seq);
            openers.push(Opener::Verbatim);
        }

        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&patterns)
            .expect("delimiter tables are static and small");

        Self {
            syntax,
            matcher,
            openers,
        }
    }

    /// Start of a literal whose quote is at `quote`. Raw prefixes (`r'`,
    /// `br#"`) belong to the literal; other prefixes (`f'`, `b"`, `u8"`)
    /// are left to the surrounding code. Also returns the hash count of a
    /// Rust raw string.
    fn literal_start(&self, text: &str, floor: usize, quote: usize) -> (usize, Option<usize>) {
        let bytes = text.as_bytes();
        let mut start = quote;

        if self.syntax.raw_hashes {
            let mut hashes = 0;
            while start - hashes > floor && bytes[start - hashes - 1] == b'#' {
                hashes += 1;
            }
            let r = start - hashes;
            if r > floor && bytes[r - 1] == b'r' {
                let mut begin = r - 1;
                if begin > floor && bytes[begin - 1] == b'b' {
                    begin -= 1;
                }
                if !is_ident_byte(bytes, begin, floor) {
                    return (begin, Some(hashes));
                }
            }
        }

        let mut taken = 0;
        while taken < 2
            && start > floor
            && self.syntax.prefixes.as_bytes().contains(&bytes[start - 1])
        {
            start -= 1;
            taken += 1;
        }
        let raw = text[start..quote].contains(['r', 'R']);
        if !raw || is_ident_byte(bytes, start, floor) {
            start = quote;
        }
        (start, None)
    }

    fn block_end(&self, text: &str, from: usize) -> Option<usize> {
        let (open, close) = self.syntax.block_comment?;
        let bytes = text.as_bytes();
        let mut depth = 1;
        let mut i = from;
        while i < bytes.len() {
            if self.syntax.nested_comments && bytes[i..].starts_with(open.as_bytes()) {
                depth += 1;
                i += open.len();
            } else if bytes[i..].starts_with(close.as_bytes()) {
                depth -= 1;
                i += close.len();
                if depth == 0 {
                    return Some(i);
                }
            } else {
                i += 1;
            }
        }
        None
    }
}

impl Lexer for CodeLexer {
    fn name(&self) -> &str {
        self.syntax.name
    }

    fn aliases(&self) -> &[&str] {
        self.syntax.aliases
    }

    fn extensions(&self) -> &[&str] {
        self.syntax.extensions
    }

    fn filenames(&self) -> &[&str] {
        self.syntax.filenames
    }

    fn interpreters(&self) -> &[&str] {
        self.syntax.interpreters
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        // Start of code not yet emitted.
        let mut pos = 0;
        let mut search = 0;

        while search < text.len() {
            let Some(m) = self
                .matcher
                .find(Input::new(text).span(search..text.len()))
            else {
                break;
            };
            let start = m.start();

            match self.openers[m.pattern().as_usize()] {
                Opener::Verbatim => {
                    search = m.end();
                }
                Opener::Regex => {
                    // Emitted as code with the surrounding run.
                    search = match regex_end(text, start) {
                        Some(end) if regex_allowed(text, start) => end,
                        _ => m.end(),
                    };
                }
                Opener::LineComment => {
                    if self.syntax.comment_at_word_start && !at_word_start(text, start) {
                        search = m.end();
                        continue;
                    }
                    let end = line_end(text, start);
                    push_code(&mut tokens, text, pos, start);
                    tokens.push(Token::new(start, TokenCategory::Comment, &text[start..end]));
                    pos = end;
                    search = end;
                }
                Opener::Preprocessor => {
                    if !at_line_start(text, start) {
                        search = m.end();
                        continue;
                    }
                    let end = directive_end(text, start);
                    push_code(&mut tokens, text, pos, start);
                    tokens.push(Token::new(
                        start,
                        TokenCategory::PreprocComment,
                        &text[start..end],
                    ));
                    pos = end;
                    search = end;
                }
                Opener::BlockComment => {
                    push_code(&mut tokens, text, pos, start);
                    let Some(end) = self.block_end(text, m.end()) else {
                        tokens.push(Token::new(start, TokenCategory::Error, &text[start..]));
                        return tokens;
                    };
                    tokens.push(Token::new(start, TokenCategory::Comment, &text[start..end]));
                    pos = end;
                    search = end;
                }
                Opener::Str(i) => {
                    let style = &self.syntax.strings[i];
                    if self.syntax.digit_separators
                        && style.open == "'"
                        && in_number(text, start)
                    {
                        search = m.end();
                        continue;
                    }
                    let (lit_start, raw) = self.literal_start(text, pos, start);
                    let end = match raw {
                        Some(hashes) => {
                            let close = format!("\"{}", "#".repeat(hashes));
                            scan_literal(text, m.end(), &close, true, Escape::None)
                        }
                        None => scan_literal(
                            text,
                            m.end(),
                            style.close,
                            style.multiline,
                            style.escape,
                        ),
                    };

                    let Some(end) = end else {
                        // A quote left open on its own line is code, as
                        // in `/'/` or `1'0`; only a multi-line literal
                        // running off the end of the file is an error.
                        if !style.multiline && raw.is_none() {
                            search = m.end();
                            continue;
                        }
                        push_code(&mut tokens, text, pos, lit_start);
                        tokens.push(Token::new(lit_start, TokenCategory::Error, &text[lit_start..]));
                        return tokens;
                    };
                    push_code(&mut tokens, text, pos, lit_start);
                    let category = if self.syntax.doc_strings
                        && style.open.len() == 3
                        && at_line_start(text, lit_start)
                    {
                        TokenCategory::DocString
                    } else {
                        TokenCategory::StringLiteral
                    };
                    tokens.push(Token::new(lit_start, category, &text[lit_start..end]));
                    pos = end;
                    search = end;
                }
            }
        }

        push_code(&mut tokens, text, pos, text.len());
        tokens
    }
}

/// Emit `text[from..to]` as whitespace (`Text`) and code (`Other`) tokens.
fn push_code(tokens: &mut Vec<Token>, text: &str, from: usize, to: usize) {
    if from >= to {
        return;
    }
    let mut run_start = from;
    let mut run_space: Option<bool> = None;

    for (i, ch) in text[from..to].char_indices() {
        let space = ch.is_whitespace();
        match run_space {
            Some(prev) if prev != space => {
                push_run(tokens, text, run_start, from + i, prev);
                run_start = from + i;
            }
            _ => {}
        }
        run_space = Some(space);
    }
    if let Some(space) = run_space {
        push_run(tokens, text, run_start, to, space);
    }
}

fn push_run(tokens: &mut Vec<Token>, text: &str, from: usize, to: usize, space: bool) {
    let category = if space {
        TokenCategory::Text
    } else {
        TokenCategory::Other
    };
    tokens.push(Token::new(from, category, &text[from..to]));
}

/// End of a literal opened before `from`, just past its closing delimiter.
fn scan_literal(
    text: &str,
    from: usize,
    close: &str,
    multiline: bool,
    escape: Escape,
) -> Option<usize> {
    let bytes = text.as_bytes();
    let close = close.as_bytes();
    let mut i = from;

    while i < bytes.len() {
        if escape == Escape::Backslash && bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i..].starts_with(close) {
            if escape == Escape::Doubled && bytes[i + close.len()..].starts_with(close) {
                i += 2 * close.len();
                continue;
            }
            return Some(i + close.len());
        }
        if !multiline && bytes[i] == b'\n' {
            return None;
        }
        i += 1;
    }
    None
}

/// End of a `/.../flags` regular expression starting at `from`, if it
/// closes on the same line.
fn regex_end(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut in_class = false;
    let mut i = from + 1;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'[' => in_class = true,
            b']' => in_class = false,
            b'/' if !in_class => {
                let flags = text[i + 1..]
                    .bytes()
                    .take_while(u8::is_ascii_alphabetic)
                    .count();
                return Some(i + 1 + flags);
            }
            b'\n' => return None,
            _ => {}
        }
        i += 1;
    }
    None
}

/// Whether a `/` at `at` can open a regular expression rather than divide.
fn regex_allowed(text: &str, at: usize) -> bool {
    let before = text[..at].trim_end();
    match before.chars().next_back() {
        None => true,
        Some(c) if "(,=:[!&|?{};+-*%<>~^".contains(c) => true,
        Some(_) => ["return", "typeof", "case"].iter().any(|kw| {
            before.ends_with(kw) && !is_ident_byte(before.as_bytes(), before.len() - kw.len(), 0)
        }),
    }
}

/// Whether the quote at `at` separates digits of a number literal.
fn in_number(text: &str, at: usize) -> bool {
    let bytes = text.as_bytes();
    if !bytes.get(at + 1).is_some_and(u8::is_ascii_alphanumeric) {
        return false;
    }
    let mut start = at;
    while start > 0 && (bytes[start - 1].is_ascii_alphanumeric() || bytes[start - 1] == b'\'') {
        start -= 1;
    }
    start < at && bytes[start].is_ascii_digit()
}

fn is_ident_byte(bytes: &[u8], at: usize, floor: usize) -> bool {
    at > floor && (bytes[at - 1].is_ascii_alphanumeric() || bytes[at - 1] == b'_')
}

fn line_end(text: &str, from: usize) -> usize {
    text[from..]
        .find('\n')
        .map_or(text.len(), |i| from + i)
}

fn line_start(text: &str, at: usize) -> usize {
    text[..at].rfind('\n').map_or(0, |i| i + 1)
}

fn at_line_start(text: &str, at: usize) -> bool {
    text[line_start(text, at)..at].trim().is_empty()
}

fn at_word_start(text: &str, at: usize) -> bool {
    text[..at]
        .chars()
        .next_back()
        .map_or(true, |c| c.is_whitespace() || ";|&(".contains(c))
}

/// End of a preprocessor directive, following backslash continuations.
fn directive_end(text: &str, from: usize) -> usize {
    let mut end = line_end(text, from);
    while end < text.len() && text[..end].trim_end_matches('\r').ends_with('\\') {
        end = line_end(text, end + 1);
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexer(name: &str) -> CodeLexer {
        lexers()
            .into_iter()
            .find(|l| l.name() == name)
            .unwrap()
    }

    fn of_category(tokens: &[Token], category: TokenCategory) -> Vec<&str> {
        tokens
            .iter()
            .filter(|t| t.category == category)
            .map(|t| t.text.as_str())
            .collect()
    }

    #[test]
    fn test_c_style_comments() {
        let content = r#"
// This is a comment with words
fn main() {
    println!("A string with text");
}
"#;

        let tokens = lexer("Rust").tokenize(content);
        assert_eq!(
            of_category(&tokens, TokenCategory::Comment),
            vec!["// This is a comment with words"]
        );
        assert_eq!(
            of_category(&tokens, TokenCategory::StringLiteral),
            vec!["\"A string with text\""]
        );
    }

    #[test]
    fn test_tokens_cover_input() {
        let content = "/* block\n comment */ let x = \"s\"; // end\n";
        let tokens = lexer("Rust").tokenize(content);
        let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, content);

        let mut offset = 0;
        for token in &tokens {
            assert_eq!(token.offset, offset);
            offset += token.text.len();
        }
    }

    #[test]
    fn test_nested_block_comment() {
        let tokens = lexer("Rust").tokenize("/* outer /* inner */ still */ x");
        assert_eq!(
            of_category(&tokens, TokenCategory::Comment),
            vec!["/* outer /* inner */ still */"]
        );
    }

    #[test]
    fn test_rust_raw_strings_and_chars() {
        let tokens = lexer("Rust").tokenize("let q = '\"'; let r = r#\"a \"quoted\" b\"#;");
        assert_eq!(
            of_category(&tokens, TokenCategory::StringLiteral),
            vec!["r#\"a \"quoted\" b\"#"]
        );
    }

    #[test]
    fn test_python_comments_and_docstrings() {
        let content = r#"
# This is a Python comment
def main():
    """Run the main loop."""
    print("A string with text")
"#;

        let tokens = lexer("Python").tokenize(content);
        assert_eq!(
            of_category(&tokens, TokenCategory::Comment),
            vec!["# This is a Python comment"]
        );
        assert_eq!(
            of_category(&tokens, TokenCategory::DocString),
            vec!["\"\"\"Run the main loop.\"\"\""]
        );
        assert_eq!(
            of_category(&tokens, TokenCategory::StringLiteral),
            vec!["\"A string with text\""]
        );
    }

    #[test]
    fn test_python_prefixed_strings() {
        let tokens = lexer("Python").tokenize("x = r'\\d+' + f\"{y}\"\n");
        assert_eq!(
            of_category(&tokens, TokenCategory::StringLiteral),
            vec!["r'\\d+'", "\"{y}\""]
        );
    }

    #[test]
    fn test_string_prefix_is_code() {
        let content = "a = f'hello world'
b = u'x'
c = b'y'
";
        let tokens = lexer("Python").tokenize(content);
        assert_eq!(
            of_category(&tokens, TokenCategory::StringLiteral),
            vec!["'hello world'", "'x'", "'y'"]
        );
        let code = of_category(&tokens, TokenCategory::Other);
        for prefix in ["f", "u", "b"] {
            assert!(code.contains(&prefix));
        }

        let tokens = lexer("Rust").tokenize("let s = b\"bytes\"; let r = br\"raw\";");
        assert_eq!(
            of_category(&tokens, TokenCategory::StringLiteral),
            vec!["\"bytes\"", "br\"raw\""]
        );
    }

    #[test]
    fn test_preprocessor_lines() {
        let content = "#include <stdio.h>\n#define X \\\n  1\nint x; // note\n";
        let tokens = lexer("C").tokenize(content);
        assert_eq!(
            of_category(&tokens, TokenCategory::PreprocComment),
            vec!["#include <stdio.h>", "#define X \\\n  1"]
        );
        assert_eq!(of_category(&tokens, TokenCategory::Comment), vec!["// note"]);
    }

    #[test]
    fn test_shell_hash_inside_word() {
        let tokens = lexer("Shell").tokenize("echo $# ${#arr}\n# real comment\n");
        assert_eq!(
            of_category(&tokens, TokenCategory::Comment),
            vec!["# real comment"]
        );
    }

    #[test]
    fn test_unterminated_literal_is_error() {
        let tokens = lexer("Rust").tokenize("let s = \"oops\nfn y() {}\n");
        let last = tokens.last().unwrap();
        assert_eq!(last.category, TokenCategory::Error);
        assert_eq!(last.offset, 8);

        let tokens = lexer("Java").tokenize("/* never closed");
        assert_eq!(tokens[0].category, TokenCategory::Error);
    }

    #[test]
    fn test_quote_open_on_its_line_is_code() {
        let tokens = lexer("C").tokenize("char *s = \"oops\n// a comment here\n");
        assert!(of_category(&tokens, TokenCategory::Error).is_empty());
        assert_eq!(
            of_category(&tokens, TokenCategory::Comment),
            vec!["// a comment here"]
        );
    }

    #[test]
    fn test_javascript_regex_literals() {
        let content = "const re = /'/g;\n// a comment here\nlet q = x.split(/[/\"]+/);\n";
        let tokens = lexer("JavaScript").tokenize(content);
        assert!(of_category(&tokens, TokenCategory::Error).is_empty());
        assert!(of_category(&tokens, TokenCategory::StringLiteral).is_empty());
        assert_eq!(
            of_category(&tokens, TokenCategory::Comment),
            vec!["// a comment here"]
        );

        // Division is not a regular expression.
        let tokens = lexer("TypeScript").tokenize("let h = w / 2 / 'unit';\n");
        assert_eq!(of_category(&tokens, TokenCategory::StringLiteral), vec!["'unit'"]);
    }

    #[test]
    fn test_cpp_digit_separators() {
        let content = "int n = 1'000'000;\nint m = 0xFF'FF; char c = 'x';\n// a comment here\n";
        let tokens = lexer("C++").tokenize(content);
        assert!(of_category(&tokens, TokenCategory::Error).is_empty());
        assert_eq!(of_category(&tokens, TokenCategory::StringLiteral), vec!["'x'"]);
        assert_eq!(
            of_category(&tokens, TokenCategory::Comment),
            vec!["// a comment here"]
        );
    }

    #[test]
    fn test_csharp_verbatim_string() {
        let tokens = lexer("C#").tokenize("var s = @\"say \"\"hi\"\"\nthere\";");
        assert_eq!(
            of_category(&tokens, TokenCategory::StringLiteral),
            vec!["@\"say \"\"hi\"\"\nthere\""]
        );
    }
}
