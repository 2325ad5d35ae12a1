use crate::parser::{Lexer, Token, TokenCategory};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use std::ops::Range;

/// Markdown documents: prose is `Text`, `Emphasis` or `Strong`; code and
/// markup syntax are never checked.
pub struct MarkdownLexer;

impl Lexer for MarkdownLexer {
    fn name(&self) -> &str {
        "Markdown"
    }

    fn aliases(&self) -> &[&str] {
        &["md"]
    }

    fn extensions(&self) -> &[&str] {
        &["md", "mdx", "markdown"]
    }

    fn is_markup(&self) -> bool {
        true
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Tokens {
            text,
            cursor: 0,
            out: Vec::new(),
        };

        let mut in_code_block = false;
        let mut emphasis = 0usize;
        let mut strong = 0usize;

        let parser = Parser::new_ext(text, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
        for (event, range) in parser.into_offset_iter() {
            match event {
                Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
                Event::End(TagEnd::CodeBlock) => in_code_block = false,
                Event::Start(Tag::Emphasis) => emphasis += 1,
                Event::End(TagEnd::Emphasis) => emphasis = emphasis.saturating_sub(1),
                Event::Start(Tag::Strong) => strong += 1,
                Event::End(TagEnd::Strong) => strong = strong.saturating_sub(1),
                Event::Text(_) if in_code_block => tokens.push(range, TokenCategory::Other),
                Event::Text(_) => {
                    let category = if strong > 0 {
                        TokenCategory::Strong
                    } else if emphasis > 0 {
                        TokenCategory::Emphasis
                    } else {
                        TokenCategory::Text
                    };
                    tokens.push(range, category);
                }
                Event::SoftBreak | Event::HardBreak => tokens.push(range, TokenCategory::Text),
                Event::Code(_) => tokens.push(range, TokenCategory::StringLiteral),
                _ => {}
            }
        }

        tokens.finish()
    }
}

/// Collects tokens in offset order, filling the gaps between prose with
/// `Other` so no two unrelated runs ever merge.
struct Tokens<'a> {
    text: &'a str,
    cursor: usize,
    out: Vec<Token>,
}

impl Tokens<'_> {
    fn push(&mut self, range: Range<usize>, category: TokenCategory) {
        if range.start < self.cursor || range.end > self.text.len() || range.is_empty() {
            return;
        }
        self.gap(range.start);
        self.out
            .push(Token::new(range.start, category, &self.text[range.clone()]));
        self.cursor = range.end;
    }

    fn gap(&mut self, until: usize) {
        if until > self.cursor {
            self.out.push(Token::new(
                self.cursor,
                TokenCategory::Other,
                &self.text[self.cursor..until],
            ));
        }
    }

    fn finish(mut self) -> Vec<Token> {
        self.gap(self.text.len());
        self.out
    }
}
