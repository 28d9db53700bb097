//! Charset-aware escaping of SQL string values

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Connection charset a DAO renders for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Charset {
    #[default]
    Utf8,
    Gbk,
}

impl Charset {
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf8",
            Charset::Gbk => "gbk",
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown charset: {0}")]
pub struct UnknownCharset(pub String);

impl FromStr for Charset {
    type Err = UnknownCharset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" | "utf8mb4" => Ok(Charset::Utf8),
            "gbk" => Ok(Charset::Gbk),
            _ => Err(UnknownCharset(s.to_string())),
        }
    }
}

/// Errors raised when a value cannot be escaped
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EscapeError {
    #[error("character {ch:?} cannot be encoded in {charset}")]
    Unencodable { charset: Charset, ch: char },
}

/// Escapes string values before they are spliced into SQL
pub trait Escaper: Send + Sync {
    fn escape(&self, charset: Charset, raw: &str) -> Result<String, EscapeError>;
}

/// MySQL-style escaping (`mysql_real_escape_string`)
///
/// Values are already decoded text, so the multi-byte hazards of GBK do not
/// apply here. For GBK only characters outside the Basic Multilingual Plane
/// are rejected; BMP characters missing from the GBK table pass through and
/// are left to the connection to reject.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlEscaper;

impl Escaper for MysqlEscaper {
    fn escape(&self, charset: Charset, raw: &str) -> Result<String, EscapeError> {
        let mut out = String::with_capacity(raw.len() + raw.len() / 8);
        for ch in raw.chars() {
            // GBK has no four-byte forms
            if charset == Charset::Gbk && u32::from(ch) > 0xFFFF {
                return Err(EscapeError::Unencodable { charset, ch });
            }
            match ch {
                '\0' => out.push_str("\\0"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                '"' => out.push_str("\\\""),
                '\x1a' => out.push_str("\\Z"),
                _ => out.push(ch),
            }
        }
        Ok(out)
    }
}
