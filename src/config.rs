//! Mapper files and argument objects in TOML
//!
//! A mapper file names a set of statements and the charset they render for:
//!
//! ```toml
//! [mapper]
//! name = "users"
//! charset = "utf8"
//!
//! [statements]
//! find = "SELECT * FROM user WHERE id = #{id}"
//! ```
//!
//! Argument objects use plain TOML tables. Dispatch tags go in a reserved
//! `_meta` table so they never shadow a member:
//!
//! ```toml
//! id = 7
//! tags = ["a", "b"]
//!
//! [_meta]
//! tags = ["query"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::dao::Dao;
use crate::escape::Charset;
use crate::model::{Model, ModelList, Object};
use crate::template::{RegisterError, StatementRegistry};

/// Errors that can occur when loading mapper or argument files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Register(#[from] RegisterError),
    #[error("unknown charset '{0}'")]
    Charset(String),
    #[error("invalid argument object: {0}")]
    Argument(String),
}

/// A parsed mapper file
#[derive(Debug, Clone, Default)]
pub struct MapperConfig {
    /// Optional name for the mapper
    pub name: Option<String>,
    pub charset: Charset,
    /// Method name → template text
    pub statements: BTreeMap<String, String>,
}

/// TOML structure for deserializing mapper files
#[derive(Deserialize)]
struct TomlMapper {
    mapper: Option<TomlMetadata>,
    #[serde(default)]
    statements: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    charset: Option<String>,
}

impl MapperConfig {
    /// Load a mapper from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load a mapper from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlMapper = toml::from_str(content)?;
        let meta = parsed.mapper;

        let charset = match meta.as_ref().and_then(|m| m.charset.as_deref()) {
            Some(name) => name
                .parse()
                .map_err(|_| ConfigError::Charset(name.to_string()))?,
            None => Charset::default(),
        };

        Ok(MapperConfig {
            name: meta.and_then(|m| m.name),
            charset,
            statements: parsed.statements,
        })
    }

    /// Compile every statement; the first failure (in method name order) wins
    pub fn registry(&self) -> Result<StatementRegistry, RegisterError> {
        let mut registry = StatementRegistry::new();
        for (name, template) in &self.statements {
            registry.register(name.as_str(), template)?;
        }
        Ok(registry)
    }

    /// Compile every statement and collect all failures
    pub fn check(&self) -> Vec<RegisterError> {
        let mut registry = StatementRegistry::new();
        self.statements
            .iter()
            .filter_map(|(name, template)| registry.register(name.as_str(), template).err())
            .collect()
    }

    /// Compile, freeze and bind to the configured charset
    pub fn into_dao(self) -> Result<Dao, ConfigError> {
        let statements = self.registry()?.freeze();
        Ok(Dao::new(statements).with_charset(self.charset))
    }
}

/// Load an argument object from a TOML file
pub fn load_argument(path: &Path) -> Result<Object, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let table: toml::Table = toml::from_str(&content)?;
    object_from_toml(&table)
}

/// Reserved top-level table holding argument metadata
const META_KEY: &str = "_meta";

/// Convert a TOML table into an argument object
///
/// Strings become `Str`, integers `Int64`, floats `Double`, booleans `Bool`,
/// datetimes their text form; tables become objects and arrays lists. The
/// top-level `_meta` table is not a member; its `tags` array sets the tags.
pub fn object_from_toml(table: &toml::Table) -> Result<Object, ConfigError> {
    let mut object = Object::new();

    if let Some(meta) = table.get(META_KEY) {
        let meta = meta
            .as_table()
            .ok_or_else(|| ConfigError::Argument(format!("'{}' must be a table", META_KEY)))?;
        for tag in meta_tags(meta)? {
            object.add_tag(tag);
        }
    }

    fill_members(&mut object, table, true);
    Ok(object)
}

fn meta_tags(meta: &toml::Table) -> Result<Vec<&str>, ConfigError> {
    let not_strings =
        || ConfigError::Argument("'_meta.tags' must be an array of strings".to_string());
    let Some(tags) = meta.get("tags") else {
        return Ok(Vec::new());
    };
    tags.as_array()
        .ok_or_else(not_strings)?
        .iter()
        .map(|tag| tag.as_str().ok_or_else(not_strings))
        .collect()
}

fn fill_members(object: &mut Object, table: &toml::Table, top_level: bool) {
    for (name, value) in table {
        if top_level && name == META_KEY {
            continue;
        }
        match toml_to_model(value) {
            Model::Scalar(v) => object.set_plain_value(name.as_str(), v),
            Model::Object(o) => object.set_object(name.as_str(), o),
            Model::List(l) => object.set_list(name.as_str(), l),
        }
    }
}

fn toml_to_model(value: &toml::Value) -> Model {
    match value {
        toml::Value::String(s) => Model::from(s.as_str()),
        toml::Value::Integer(i) => Model::from(*i),
        toml::Value::Float(f) => Model::from(*f),
        toml::Value::Boolean(b) => Model::from(*b),
        toml::Value::Datetime(dt) => Model::from(dt.to_string()),
        toml::Value::Array(items) => {
            Model::List(items.iter().map(toml_to_model).collect::<ModelList>())
        }
        toml::Value::Table(table) => {
            let mut object = Object::new();
            fill_members(&mut object, table, false);
            Model::Object(object)
        }
    }
}
