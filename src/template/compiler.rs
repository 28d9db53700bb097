//! Template compiler using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::lexer::{lex, Token};
use super::path::TemplatePath;
use crate::error::{PatternError, PatternIssue};

/// One compiled unit of a template
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Text copied into the statement verbatim
    Literal(String),
    /// `#{path}`: a single scalar member
    Field(TemplatePath),
    /// `${path}`: a list member rendered as `('a','b',...)`
    List(TemplatePath),
}

/// Compile template text into segments
///
/// Adjacent literal text is merged, so a template without references compiles
/// to at most one `Literal`.
pub fn compile(template: &str) -> Result<Vec<Segment>, PatternError> {
    let len = template.len();

    let token_iter = lex(template).map(|(tok, span)| (tok, span.into()));
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    template_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| {
            PatternError::new(template, errs.into_iter().map(PatternIssue::from).collect())
        })
}

fn template_parser<'a, I>() -> impl Parser<'a, I, Vec<Segment>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    // Path text between the delimiters; surrounding whitespace is ignored
    let path = select! {
        Token::Text(s) => s,
    }
    .try_map(|raw: String, span| {
        TemplatePath::parse(raw.trim()).map_err(|e| Rich::custom(span, e))
    });

    let field = path
        .clone()
        .delimited_by(just(Token::FieldOpen), just(Token::Close))
        .map(Segment::Field);

    let list = path
        .delimited_by(just(Token::ListOpen), just(Token::Close))
        .map(Segment::List);

    // A `}` outside of a reference is plain SQL text
    let literal = select! {
        Token::Text(s) => s,
        Token::Close => "}".to_string(),
    }
    .map(Segment::Literal);

    choice((field, list, literal))
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(merge_literals)
}

fn merge_literals(segments: Vec<Segment>) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
    for segment in segments {
        match (merged.last_mut(), segment) {
            (Some(Segment::Literal(prev)), Segment::Literal(text)) => prev.push_str(&text),
            (_, segment) => merged.push(segment),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn path(raw: &str) -> TemplatePath {
        TemplatePath::parse(raw).unwrap()
    }

    fn literal(s: &str) -> Segment {
        Segment::Literal(s.to_string())
    }

    #[test]
    fn test_literal_only() {
        let segments = compile("SELECT 1 FROM dual").unwrap();
        assert_eq!(segments, vec![literal("SELECT 1 FROM dual")]);
    }

    #[test]
    fn test_empty_template() {
        assert!(compile("").unwrap().is_empty());
    }

    #[test]
    fn test_field_and_list() {
        let segments = compile("WHERE id = #{id} AND tags IN ${tags}").unwrap();
        assert_eq!(
            segments,
            vec![
                literal("WHERE id = "),
                Segment::Field(path("id")),
                literal(" AND tags IN "),
                Segment::List(path("tags")),
            ]
        );
    }

    #[test]
    fn test_whitespace_inside_delimiters_trimmed() {
        let segments = compile("#{ user.id }").unwrap();
        assert_eq!(segments, vec![Segment::Field(path("user.id"))]);
    }

    #[test]
    fn test_stray_markers_stay_literal() {
        let segments = compile("a # b $ c } d { e").unwrap();
        assert_eq!(segments, vec![literal("a # b $ c } d { e")]);
    }

    #[test]
    fn test_adjacent_references() {
        let segments = compile("#{a}#{b}").unwrap();
        assert_eq!(
            segments,
            vec![Segment::Field(path("a")), Segment::Field(path("b"))]
        );
    }

    #[test]
    fn test_deterministic() {
        let template = "x = #{a.b[1].c} OR y IN ${list}";
        assert_eq!(compile(template).unwrap(), compile(template).unwrap());
    }

    #[test]
    fn test_unterminated_reference() {
        let err = compile("WHERE id = #{id").unwrap_err();
        assert_eq!(err.template, "WHERE id = #{id");
        assert!(!err.issues.is_empty());
    }

    #[test]
    fn test_empty_reference() {
        assert!(compile("#{}").is_err());
        assert!(compile("${  }").is_err());
    }

    #[test]
    fn test_nested_opener() {
        assert!(compile("#{a ${b}}").is_err());
    }

    #[test]
    fn test_bad_path() {
        let err = compile("id = #{items[x]}").unwrap_err();
        assert_eq!(err.template, "id = #{items[x]}");
        assert!(compile("#{a b}").is_err());
    }
}
