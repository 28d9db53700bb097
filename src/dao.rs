//! DAO facade: named statements, rendering and result marshalling

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::escape::{Charset, Escaper, MysqlEscaper};
use crate::marshal::{marshal_many_with, marshal_one, Marshal, MarshalError, ResultSet, RowSource};
use crate::model::Object;
use crate::renderer::{RenderError, Renderer};
use crate::template::Statements;

/// Errors that can occur while running a statement
#[derive(Debug, Error)]
pub enum DaoError {
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The row source reported a failure; the code is passed through as is
    #[error("row fetch failed with code {code}")]
    Fetch { code: i32 },

    #[error("cannot marshal result: {0}")]
    Marshal(#[from] MarshalError),

    #[error("no row source configured")]
    NoRowSource,
}

type SharedRowSource = Arc<dyn RowSource + Send + Sync>;

/// A set of frozen statements bound to a charset, escaper and row source
///
/// # Example
///
/// ```rust
/// use sqlmap::{Dao, StatementRegistry};
/// use sqlmap::model::{ModelList, Object};
///
/// let mut registry = StatementRegistry::new();
/// registry
///     .register("find", "WHERE id = #{id} AND tags IN ${tags}")
///     .unwrap();
/// let dao = Dao::new(registry.freeze());
///
/// let arg = Object::new()
///     .with_plain("id", 7i64)
///     .with_list("tags", ModelList::from(vec!["a", "b"]));
/// let sql = dao.render("find", &[&arg]).unwrap();
/// assert_eq!(sql, "WHERE id = 7 AND tags IN ('a','b')");
/// ```
#[derive(Clone)]
pub struct Dao {
    statements: Statements,
    charset: Charset,
    escaper: Arc<dyn Escaper>,
    source: Option<SharedRowSource>,
}

impl Dao {
    /// Create a DAO over frozen statements, with UTF-8 and MySQL escaping
    pub fn new(statements: Statements) -> Self {
        Self {
            statements,
            charset: Charset::default(),
            escaper: Arc::new(MysqlEscaper),
            source: None,
        }
    }

    /// Set the charset used when escaping values
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Replace the escaper
    pub fn with_escaper(mut self, escaper: impl Escaper + 'static) -> Self {
        self.escaper = Arc::new(escaper);
        self
    }

    /// Set the row source used by `select` and `select_list`
    pub fn with_row_source(mut self, source: impl RowSource + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    pub fn statements(&self) -> &Statements {
        &self.statements
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Render the statement registered under `name`
    pub fn render(&self, name: &str, args: &[&Object]) -> Result<String, RenderError> {
        let statement = self.statements.get(name).ok_or_else(|| {
            tracing::debug!(method = name, "unknown statement method");
            RenderError::UnknownMethod {
                name: name.to_string(),
            }
        })?;
        Renderer::new(self.charset, self.escaper.as_ref()).render(statement, args)
    }

    /// Run `name` and apply the first result row to `out`
    ///
    /// Returns the row source's code: the number of rows on success, `0` when
    /// there is no data (and `out` is untouched).
    pub fn select<T: Marshal + ?Sized>(
        &self,
        name: &str,
        out: &mut T,
        args: &[&Object],
    ) -> Result<usize, DaoError> {
        let (count, rows) = self.fetch(name, args)?;
        let Some(row) = rows.first() else {
            return Ok(0);
        };
        marshal_one(row, out)?;
        Ok(count)
    }

    /// Run `name` and build one default `T` per result row
    ///
    /// Unlike [`Dao::select`], the row source's code is not returned: on
    /// success the vector holds exactly one item per row received, whatever
    /// count the source reported, and "no data" is an empty vector.
    pub fn select_list<T: Marshal + Default>(
        &self,
        name: &str,
        args: &[&Object],
    ) -> Result<Vec<T>, DaoError> {
        self.select_list_with(name, args, T::default)
    }

    /// Run `name` and build one copy of `prototype` per result row
    ///
    /// Returns items the same way as [`Dao::select_list`].
    pub fn select_list_like(
        &self,
        name: &str,
        prototype: &Object,
        args: &[&Object],
    ) -> Result<Vec<Object>, DaoError> {
        self.select_list_with(name, args, || prototype.clone())
    }

    fn select_list_with<T, F>(
        &self,
        name: &str,
        args: &[&Object],
        make: F,
    ) -> Result<Vec<T>, DaoError>
    where
        T: Marshal,
        F: FnMut() -> T,
    {
        let (_, rows) = self.fetch(name, args)?;
        Ok(marshal_many_with(&rows, make)?)
    }

    /// Render and fetch; non-positive codes short-circuit before marshalling
    fn fetch(&self, name: &str, args: &[&Object]) -> Result<(usize, ResultSet), DaoError> {
        let source = self.source.as_ref().ok_or(DaoError::NoRowSource)?;
        let sql = self.render(name, args)?;

        let mut rows = ResultSet::new();
        let code = source.fetch(&sql, &mut rows);
        if code < 0 {
            tracing::debug!(method = name, code, "row fetch failed");
            return Err(DaoError::Fetch { code });
        }
        if code == 0 {
            return Ok((0, ResultSet::new()));
        }
        Ok((code as usize, rows))
    }
}

impl fmt::Debug for Dao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dao")
            .field("statements", &self.statements.names())
            .field("charset", &self.charset)
            .field("row_source", &self.source.is_some())
            .finish()
    }
}
