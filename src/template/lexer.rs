//! Lexer for statement templates using logos

use logos::Logos;

/// Byte range in template text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    // Reference openers (longer than the bare `#`/`$` text below)
    #[token("#{")]
    FieldOpen,
    #[token("${")]
    ListOpen,

    #[token("}")]
    Close,

    // Everything else is text; a lone `#` or `$` is text too
    #[regex(r"[^#$}]+", |lex| lex.slice().to_string())]
    #[regex(r"[#$]", |lex| lex.slice().to_string())]
    Text(String),
}

/// Lex template text into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Token {
        Token::Text(s.to_string())
    }

    #[test]
    fn test_reference_delimiters() {
        let tokens: Vec<_> = lex("#{id}${ids}").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::FieldOpen,
                text("id"),
                Token::Close,
                Token::ListOpen,
                text("ids"),
                Token::Close
            ]
        );
    }

    #[test]
    fn test_text_keeps_whitespace() {
        let tokens: Vec<_> = lex("a = 1\n  AND b").map(|(t, _)| t).collect();
        assert_eq!(tokens, vec![text("a = 1\n  AND b")]);
    }

    #[test]
    fn test_lone_markers_are_text() {
        let tokens: Vec<_> = lex("x#y$").map(|(t, _)| t).collect();
        assert_eq!(tokens, vec![text("x"), text("#"), text("y"), text("$")]);
    }

    #[test]
    fn test_spans() {
        let spans: Vec<_> = lex("id=#{id}").map(|(_, s)| s).collect();
        assert_eq!(spans, vec![0..3, 3..5, 5..7, 7..8]);
    }
}
