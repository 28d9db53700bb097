//! Statement templates
//!
//! A template is SQL text interleaved with references to argument members:
//!
//! ```text
//! SELECT * FROM user WHERE id = #{user.id} AND role IN ${user.roles}
//! ```
//!
//! `#{path}` renders a single scalar member, `${path}` renders a list member as
//! a parenthesized value list. Templates are compiled once into [`Segment`]s
//! when registered, and the registry is frozen into an immutable
//! [`Statements`] table before the first render.

mod compiler;
pub mod lexer;
mod path;
mod registry;

pub use compiler::{compile, Segment};
pub use path::{PathError, PathSection, TemplatePath};
pub use registry::{CompiledStatement, RegisterError, StatementRegistry, Statements};
