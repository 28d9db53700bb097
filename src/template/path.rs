//! Member paths inside template references

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors in the text of a member path
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("empty member path")]
    Empty,

    #[error("invalid index token '{token}' in '{section}'")]
    InvalidIndex { section: String, token: String },

    #[error("invalid member name '{section}'")]
    InvalidName { section: String },
}

/// One step of a member path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSection {
    /// Member (or, first in a multi-argument call, tag) name
    Name(String),
    /// `[n]` index into the list selected by the previous section
    Index(usize),
}

impl fmt::Display for PathSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSection::Name(name) => f.write_str(name),
            PathSection::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// A parsed member path such as `user.orders[0].id`
///
/// The path is split on `.`; leading and repeated dots collapse. An index can
/// stand alone (`orders.[0]`) or trail a name (`orders[0]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePath {
    raw: String,
    sections: Vec<PathSection>,
}

impl TemplatePath {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let mut sections = Vec::new();
        for piece in raw.split('.').filter(|p| !p.is_empty()) {
            split_piece(piece, &mut sections)?;
        }

        if sections.is_empty() {
            return Err(PathError::Empty);
        }

        Ok(Self {
            raw: raw.to_string(),
            sections,
        })
    }

    /// Path text as written in the template
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn sections(&self) -> &[PathSection] {
        &self.sections
    }
}

impl fmt::Display for TemplatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for TemplatePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split `name[0][1]` into a name section followed by index sections
fn split_piece(piece: &str, out: &mut Vec<PathSection>) -> Result<(), PathError> {
    let (name, mut rest) = match piece.find('[') {
        Some(pos) => piece.split_at(pos),
        None => (piece, ""),
    };

    if !name.is_empty() {
        if name.contains(|c: char| c.is_whitespace() || c == ']') {
            return Err(PathError::InvalidName {
                section: piece.to_string(),
            });
        }
        out.push(PathSection::Name(name.to_string()));
    }

    while !rest.is_empty() {
        let invalid = |token: &str| PathError::InvalidIndex {
            section: piece.to_string(),
            token: token.to_string(),
        };

        let close = match rest.find(']') {
            Some(close) if rest.starts_with('[') => close,
            _ => return Err(invalid(rest)),
        };
        let digits = &rest[1..close];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(&rest[..=close]));
        }
        let index = digits.parse().map_err(|_| invalid(&rest[..=close]))?;
        out.push(PathSection::Index(index));
        rest = &rest[close + 1..];
    }

    Ok(())
}
