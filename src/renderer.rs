//! Statement rendering: compiled segments + arguments → SQL text

use thiserror::Error;

use crate::escape::{Charset, EscapeError, Escaper};
use crate::model::Object;
use crate::resolver::{resolve_field, resolve_list, ArgumentIndex, NavError};
use crate::template::{CompiledStatement, Segment, TemplatePath};

/// Errors that can occur while rendering a statement
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("unknown statement method: {name}")]
    UnknownMethod { name: String },

    #[error("cannot resolve '{path}' in {method}: {source}")]
    Navigation {
        method: String,
        path: String,
        #[source]
        source: NavError,
    },

    #[error("cannot escape value of '{path}' in {method}: {source}")]
    Escape {
        method: String,
        path: String,
        #[source]
        source: EscapeError,
    },
}

impl RenderError {
    /// Navigation failure behind this error, if any
    pub fn nav_error(&self) -> Option<&NavError> {
        match self {
            RenderError::Navigation { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Renders compiled statements with a fixed charset and escaper
pub struct Renderer<'e> {
    charset: Charset,
    escaper: &'e dyn Escaper,
}

impl<'e> Renderer<'e> {
    pub fn new(charset: Charset, escaper: &'e dyn Escaper) -> Self {
        Self { charset, escaper }
    }

    /// Render one statement
    ///
    /// Scalars of numeric and boolean kinds are written bare; character
    /// kinds are quoted and escaped. List elements are always quoted and
    /// escaped, whatever their kind, and an empty list renders as `()`.
    /// Any failure discards the partially built statement.
    pub fn render(
        &self,
        statement: &CompiledStatement,
        args: &[&Object],
    ) -> Result<String, RenderError> {
        let index = ArgumentIndex::build(args);
        tracing::trace!(method = statement.name(), args = %index.debug_str(), "rendering");

        let mut sql = String::with_capacity(statement.template().len());
        for segment in statement.segments() {
            match segment {
                Segment::Literal(text) => sql.push_str(text),
                Segment::Field(path) => {
                    let field = index
                        .select_root(path.sections())
                        .and_then(|(root, rest)| resolve_field(root, rest))
                        .map_err(|e| nav_failure(statement, path, e))?;
                    self.append_value(&mut sql, &field.text, field.needs_quote, field.needs_escape)
                        .map_err(|e| escape_failure(statement, path, e))?;
                }
                Segment::List(path) => {
                    let values = index
                        .select_root(path.sections())
                        .and_then(|(root, rest)| resolve_list(root, rest))
                        .map_err(|e| nav_failure(statement, path, e))?;
                    sql.push('(');
                    for (i, value) in values.iter().enumerate() {
                        if i > 0 {
                            sql.push(',');
                        }
                        self.append_value(&mut sql, value, true, true)
                            .map_err(|e| escape_failure(statement, path, e))?;
                    }
                    sql.push(')');
                }
            }
        }

        tracing::trace!(method = statement.name(), %sql, "rendered");
        Ok(sql)
    }

    fn append_value(
        &self,
        sql: &mut String,
        value: &str,
        quote: bool,
        escape: bool,
    ) -> Result<(), EscapeError> {
        if quote {
            sql.push('\'');
        }
        if escape {
            sql.push_str(&self.escaper.escape(self.charset, value)?);
        } else {
            sql.push_str(value);
        }
        if quote {
            sql.push('\'');
        }
        Ok(())
    }
}

fn nav_failure(
    statement: &CompiledStatement,
    path: &TemplatePath,
    source: NavError,
) -> RenderError {
    tracing::debug!(
        method = statement.name(),
        path = path.raw(),
        error = %source,
        "path resolution failed"
    );
    RenderError::Navigation {
        method: statement.name().to_string(),
        path: path.raw().to_string(),
        source,
    }
}

fn escape_failure(
    statement: &CompiledStatement,
    path: &TemplatePath,
    source: EscapeError,
) -> RenderError {
    tracing::debug!(
        method = statement.name(),
        path = path.raw(),
        error = %source,
        "escape failed"
    );
    RenderError::Escape {
        method: statement.name().to_string(),
        path: path.raw().to_string(),
        source,
    }
}
