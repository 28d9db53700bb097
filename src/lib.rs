//! sqlmap - named SQL statements rendered from dynamic argument objects
//!
//! Statements are registered once as templates, compiled into segments and
//! frozen. Each call renders a concrete, escaped SQL string by resolving the
//! template's member paths against the supplied argument objects, and result
//! rows can be marshalled back into objects.
//!
//! # Example
//!
//! ```rust
//! use sqlmap::{Dao, StatementRegistry};
//! use sqlmap::model::Object;
//!
//! let mut registry = StatementRegistry::new();
//! registry
//!     .register(
//!         "by_owner",
//!         "SELECT * FROM repo WHERE owner = #{user.name} AND stars > #{filter.stars}",
//!     )
//!     .unwrap();
//! let dao = Dao::new(registry.freeze());
//!
//! let user = Object::new().with_tag("user").with_plain("name", "o'neil");
//! let filter = Object::new().with_tag("filter").with_plain("stars", 10i32);
//!
//! let sql = dao.render("by_owner", &[&user, &filter]).unwrap();
//! assert_eq!(sql, "SELECT * FROM repo WHERE owner = 'o\\'neil' AND stars > 10");
//! ```

pub mod config;
pub mod dao;
pub mod error;
pub mod escape;
pub mod marshal;
pub mod model;
pub mod renderer;
pub mod resolver;
pub mod template;

pub use config::{ConfigError, MapperConfig};
pub use dao::{Dao, DaoError};
pub use error::{PatternError, PatternIssue};
pub use escape::{Charset, EscapeError, Escaper, MysqlEscaper};
pub use marshal::{
    marshal_many, marshal_one, Marshal, MarshalError, ResultRow, ResultSet, RowSource,
};
pub use renderer::RenderError;
pub use resolver::NavError;
pub use template::{compile, RegisterError, Segment, StatementRegistry, Statements};
