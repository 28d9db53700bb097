//! Path resolution against argument objects
//!
//! A reference path is walked from a root argument with two cursors: the
//! current object, and the list selected by the previous section (if any).
//!
//! - `[n]` indexes into the selected list and clears it
//! - a scalar member ends a field path (and must be its last section)
//! - an object member is descended into
//! - a list member is selected, leaving the current object unchanged
//!
//! With a single argument the whole path is walked from that argument. With
//! several, the first section names the tag of the argument to start from.

use std::collections::HashMap;

use thiserror::Error;

use crate::model::{Model, ModelList, Object, Value};
use crate::template::PathSection;

/// Errors that can occur while walking a path
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("no arguments supplied")]
    NoArguments,

    #[error("empty path")]
    EmptyPath,

    #[error("no argument tagged '{tag}'")]
    UnknownTag { tag: String },

    #[error("no member named '{section}'")]
    UnknownMember { section: String },

    #[error("index [{index}] does not follow a list member")]
    IndexWithoutList { index: usize },

    #[error("index [{index}] out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("list element [{index}] is a scalar and cannot be navigated into")]
    ElementNotNavigable { index: usize },

    #[error("scalar member '{section}' must be the last path section")]
    ScalarNotTerminal { section: String },

    #[error("path does not end at a scalar member")]
    NotAScalar,

    #[error("path does not end at a list member")]
    NotAList,

    #[error("non-finite value {text} cannot be written as a SQL literal")]
    NonFinite { text: String },
}

/// Tag → argument lookup, rebuilt for every render call
///
/// Arguments without tags are indexed under the empty tag. When several
/// arguments share a tag, the first one supplied wins.
#[derive(Debug)]
pub struct ArgumentIndex<'a> {
    by_tag: HashMap<&'a str, &'a Object>,
    first: Option<&'a Object>,
    count: usize,
}

impl<'a> ArgumentIndex<'a> {
    pub fn build(args: &[&'a Object]) -> Self {
        let mut by_tag = HashMap::new();
        for &arg in args {
            if arg.tags().is_empty() {
                by_tag.entry("").or_insert(arg);
                continue;
            }
            for tag in arg.tags() {
                by_tag.entry(tag.as_str()).or_insert(arg);
            }
        }

        Self {
            by_tag,
            first: args.first().copied(),
            count: args.len(),
        }
    }

    /// Argument registered under `tag`
    pub fn get(&self, tag: &str) -> Option<&'a Object> {
        self.by_tag.get(tag).copied()
    }

    /// Number of arguments supplied (not of tags)
    pub fn argument_count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Pick the root object for a path and the sections left to walk
    pub fn select_root<'p>(
        &self,
        sections: &'p [PathSection],
    ) -> Result<(&'a Object, &'p [PathSection]), NavError> {
        let first = self.first.ok_or(NavError::NoArguments)?;
        if self.count == 1 {
            return Ok((first, sections));
        }

        let (head, rest) = sections.split_first().ok_or(NavError::EmptyPath)?;
        match head {
            PathSection::Name(tag) => self
                .get(tag)
                .map(|root| (root, rest))
                .ok_or_else(|| NavError::UnknownTag { tag: tag.clone() }),
            PathSection::Index(_) => Err(NavError::UnknownTag {
                tag: head.to_string(),
            }),
        }
    }

    /// `tag => members` dump for diagnostics
    pub fn debug_str(&self) -> String {
        let mut entries: Vec<String> = self
            .by_tag
            .iter()
            .map(|(tag, arg)| format!("{} => {}", tag, arg.debug_str()))
            .collect();
        entries.sort();
        entries.join("; ")
    }
}

/// A resolved scalar and how it must be spliced into SQL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub text: String,
    pub needs_quote: bool,
    pub needs_escape: bool,
}

impl ResolvedField {
    /// Bare NaN and infinities are rejected; they would not parse as SQL
    pub fn from_value(value: &Value) -> Result<Self, NavError> {
        if !value.is_finite() {
            return Err(NavError::NonFinite {
                text: value.to_string(),
            });
        }
        let textual = value.kind().is_textual();
        Ok(Self {
            text: value.to_string(),
            needs_quote: textual,
            needs_escape: textual,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Target {
    Field,
    List,
}

enum Terminal<'a> {
    Scalar(&'a Value),
    List(&'a ModelList),
}

/// Resolve a `#{...}` path to a scalar
pub fn resolve_field(root: &Object, path: &[PathSection]) -> Result<ResolvedField, NavError> {
    match walk(root, path, Target::Field)? {
        Terminal::Scalar(value) => ResolvedField::from_value(value),
        Terminal::List(_) => Err(NavError::NotAScalar),
    }
}

/// Resolve a `${...}` path to the string form of every list element
pub fn resolve_list(root: &Object, path: &[PathSection]) -> Result<Vec<String>, NavError> {
    match walk(root, path, Target::List)? {
        Terminal::List(list) => Ok(list.iter().map(|item| item.to_string()).collect()),
        Terminal::Scalar(_) => Err(NavError::NotAList),
    }
}

fn walk<'a>(
    root: &'a Object,
    path: &[PathSection],
    target: Target,
) -> Result<Terminal<'a>, NavError> {
    if path.is_empty() {
        return Err(NavError::EmptyPath);
    }

    let mut node = root;
    let mut list: Option<&'a ModelList> = None;

    for (pos, section) in path.iter().enumerate() {
        let last = pos + 1 == path.len();

        let name = match section {
            PathSection::Index(index) => {
                let index = *index;
                let current = list.take().ok_or(NavError::IndexWithoutList { index })?;
                match current.at(index) {
                    Some(Model::Object(object)) => node = object,
                    Some(Model::List(inner)) => list = Some(inner),
                    Some(Model::Scalar(_)) => return Err(NavError::ElementNotNavigable { index }),
                    None => {
                        return Err(NavError::IndexOutOfRange {
                            index,
                            len: current.len(),
                        })
                    }
                }
                continue;
            }
            PathSection::Name(name) => name,
        };

        if let Some(value) = node.get_plain(name) {
            return match target {
                Target::Field if last => Ok(Terminal::Scalar(value)),
                Target::Field => Err(NavError::ScalarNotTerminal {
                    section: name.clone(),
                }),
                Target::List => Err(NavError::NotAList),
            };
        } else if let Some(object) = node.get_object(name) {
            node = object;
            list = None;
        } else if let Some(members) = node.get_list(name) {
            list = Some(members);
        } else {
            return Err(NavError::UnknownMember {
                section: name.clone(),
            });
        }
    }

    match (target, list) {
        (Target::List, Some(members)) => Ok(Terminal::List(members)),
        (Target::List, None) => Err(NavError::NotAList),
        (Target::Field, _) => Err(NavError::NotAScalar),
    }
}
