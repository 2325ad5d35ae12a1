use crate::parser::{Lexer, Token, TokenCategory};

pub const NAME: &str = "Text only";

/// Plain prose: the whole file is one `Text` token.
pub struct PlainTextLexer;

impl Lexer for PlainTextLexer {
    fn name(&self) -> &str {
        NAME
    }

    fn aliases(&self) -> &[&str] {
        &["text", "txt"]
    }

    fn extensions(&self) -> &[&str] {
        &["txt", "text"]
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        if text.is_empty() {
            return Vec::new();
        }
        vec![Token::new(0, TokenCategory::Text, text)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_token() {
        let content = "First line\nSecond line\nThird line";
        let tokens = PlainTextLexer.tokenize(content);

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].offset, 0);
        assert_eq!(tokens[0].text, content);
    }

    #[test]
    fn test_empty_text() {
        assert!(PlainTextLexer.tokenize("").is_empty());
    }
}
