use crate::parser::{Lexer, Token, TokenCategory};
use lazy_static::lazy_static;
use regex::Regex;

pub const NAME: &str = "reStructuredText";

lazy_static! {
    static ref INLINE: Regex = Regex::new(
        r"(?x)
        (?P<literal>``[^`]+``)
        | (?P<role>:[\w.+-]+:`[^`]*`)
        | (?P<interpreted>`[^`]+`_{0,2}(?::[\w.+-]+:)?)
        | (?P<strong>\*\*[^*\s](?:[^*]*[^*\s])?\*\*)
        | (?P<emphasis>\*[^*\s](?:[^*]*[^*\s])?\*)
        | (?P<reference>\[[\w\#*.-]+\]_|\|[^|\s][^|]*\|_{0,2})
        | (?P<field>^\s*:[^:\n]+:)"
    )
    .unwrap();
    static ref DIRECTIVE: Regex = Regex::new(r"^\s*\.\.\s+(?:[\w:-]+::|_[^:]*:|\|[^|]+\|)").unwrap();
    static ref COMMENT: Regex = Regex::new(r"^\s*\.\.(?:\s|$)").unwrap();
}

/// reStructuredText, used for Python doc-strings as well as `.rst` files.
pub struct RstLexer;

impl Lexer for RstLexer {
    fn name(&self) -> &str {
        NAME
    }

    fn aliases(&self) -> &[&str] {
        &["rst", "rest", "restructuredtext"]
    }

    fn extensions(&self) -> &[&str] {
        &["rst", "rest"]
    }

    fn is_markup(&self) -> bool {
        true
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        // Indent and category of an open literal block (after `::`) or
        // comment (after `..`). Lines indented deeper belong to it.
        let mut block: Option<(usize, TokenCategory)> = None;
        let mut offset = 0;

        for line in text.split_inclusive('\n') {
            let body = line.trim_end_matches(['\n', '\r']);
            let indent = body.len() - body.trim_start().len();
            let blank = body.trim().is_empty();

            if let Some((base, category)) = block {
                if blank || indent > base {
                    tokens.push(Token::new(offset, category, line));
                    offset += line.len();
                    continue;
                }
                block = None;
            }
            if let Some(m) = DIRECTIVE.find(body) {
                tokens.push(Token::new(offset, TokenCategory::Other, &line[..m.end()]));
                inline(&mut tokens, offset + m.end(), &line[m.end()..]);
            } else if COMMENT.is_match(body) {
                tokens.push(Token::new(offset, TokenCategory::PreprocComment, line));
                block = Some((indent, TokenCategory::PreprocComment));
                offset += line.len();
                continue;
            } else if body.trim_start().starts_with(">>>") {
                tokens.push(Token::new(offset, TokenCategory::Other, line));
            } else {
                inline(&mut tokens, offset, line);
            }

            if body.trim_end().ends_with("::") {
                block = Some((indent, TokenCategory::StringLiteral));
            }
            offset += line.len();
        }

        tokens
    }
}

/// Inline markup within one line.
fn inline(tokens: &mut Vec<Token>, offset: usize, line: &str) {
    let mut cursor = 0;
    for caps in INLINE.captures_iter(line) {
        let Some(m) = caps.get(0) else { continue };
        if m.start() > cursor {
            tokens.push(Token::new(
                offset + cursor,
                TokenCategory::Text,
                &line[cursor..m.start()],
            ));
        }
        let category = if caps.name("literal").is_some() {
            TokenCategory::StringLiteral
        } else if caps.name("strong").is_some() {
            TokenCategory::Strong
        } else if caps.name("emphasis").is_some() {
            TokenCategory::Emphasis
        } else {
            TokenCategory::Other
        };
        tokens.push(Token::new(offset + m.start(), category, m.as_str()));
        cursor = m.end();
    }
    if cursor < line.len() {
        tokens.push(Token::new(offset + cursor, TokenCategory::Text, &line[cursor..]));
    }
}
