//! Dynamic model objects used as statement arguments and query results
//!
//! Arguments reach the statement engine without any static knowledge of their
//! shape. Every argument is an [`Object`] holding named scalar, object and list
//! members, and every value inside it is one of the closed variants of
//! [`Model`]. Path navigation matches on those variants exhaustively instead of
//! inspecting types at runtime.
//!
//! # Example
//!
//! ```rust
//! use sqlmap::model::{ModelList, Object, Value};
//!
//! let user = Object::new()
//!     .with_tag("user")
//!     .with_plain("id", 7i64)
//!     .with_plain("name", "ada")
//!     .with_list("roles", ModelList::from(vec!["admin", "dev"]));
//!
//! assert_eq!(user.get_plain("id"), Some(&Value::Int64(7)));
//! assert!(user.is_list_member("roles"));
//! ```

mod object;
mod value;

pub use object::{Model, ModelKind, ModelList, Object};
pub use value::{ScalarKind, Value, ValueParseError};
