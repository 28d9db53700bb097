//! Error types for template compilation

use ariadne::{Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::template::lexer::Token;

/// Byte range in template text
pub type Span = std::ops::Range<usize>;

/// One problem found while compiling a template
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} at {span:?}")]
pub struct PatternIssue {
    pub span: Span,
    pub message: String,
    pub expected: Vec<String>,
}

/// A malformed template
///
/// Carries the template text and, once registered, the method name, so the
/// offending statement can be identified and reported with source context.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("malformed template{}: {}", format_method(.method), format_issues(.issues))]
pub struct PatternError {
    pub method: Option<String>,
    pub template: String,
    pub issues: Vec<PatternIssue>,
}

impl PatternError {
    pub fn new(template: &str, issues: Vec<PatternIssue>) -> Self {
        Self {
            method: None,
            template: template.to_string(),
            issues,
        }
    }

    /// Attach the name of the method the template was registered under
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Format the error with template context using ariadne
    pub fn format(&self) -> String {
        let filename = self.method.as_deref().unwrap_or("<template>");
        let mut buf = Vec::new();

        for issue in &self.issues {
            let expected_str = if issue.expected.is_empty() {
                String::new()
            } else {
                format!("\nExpected: {}", issue.expected.join(", "))
            };

            let written = Report::build(ReportKind::Error, filename, issue.span.start)
                .with_config(Config::default().with_color(false))
                .with_message(&issue.message)
                .with_label(
                    Label::new((filename, issue.span.clone()))
                        .with_message(format!("{}{}", issue.message, expected_str)),
                )
                .finish()
                .write((filename, Source::from(self.template.as_str())), &mut buf);

            if written.is_err() {
                return self.to_string();
            }
        }

        String::from_utf8_lossy(&buf).into_owned()
    }
}

fn format_method(method: &Option<String>) -> String {
    match method {
        Some(name) => format!(" for method '{}'", name),
        None => String::new(),
    }
}

fn format_issues(issues: &[PatternIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for PatternIssue {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of template".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of template".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("'{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        PatternIssue {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::FieldOpen => "'#{'".to_string(),
        Token::ListOpen => "'${'".to_string(),
        Token::Close => "'}'".to_string(),
        Token::Text(s) => format!("text \"{}\"", s),
    }
}
