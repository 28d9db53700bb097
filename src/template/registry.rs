//! Statement registry: compile once, then freeze

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use super::compiler::{compile, Segment};
use crate::error::PatternError;

/// Errors that can occur while registering statements
#[derive(Debug, Error)]
pub enum RegisterError {
    /// Template failed to compile
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A statement with the same method name already exists
    #[error("duplicate statement definition: {name}")]
    Duplicate { name: String },
}

/// A template compiled under a method name
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    name: String,
    template: String,
    segments: Vec<Segment>,
}

impl CompiledStatement {
    /// Compile `template` for method `name`
    pub fn compile(name: impl Into<String>, template: &str) -> Result<Self, PatternError> {
        let name = name.into();
        let segments = compile(template).map_err(|e| e.with_method(name.clone()))?;
        Ok(Self {
            name,
            template: template.to_string(),
            segments,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template text as registered
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Mutable registry used while a DAO is being set up
#[derive(Debug, Default)]
pub struct StatementRegistry {
    statements: HashMap<String, CompiledStatement>,
}

impl StatementRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and register a template under a method name
    pub fn register(
        &mut self,
        name: impl Into<String>,
        template: &str,
    ) -> Result<&mut Self, RegisterError> {
        let name = name.into();
        if self.statements.contains_key(&name) {
            return Err(RegisterError::Duplicate { name });
        }

        let statement = CompiledStatement::compile(name.clone(), template)?;
        tracing::debug!(
            method = %name,
            segments = statement.segments().len(),
            "registered statement"
        );
        self.statements.insert(name, statement);
        Ok(self)
    }

    /// Check if a method is registered
    pub fn contains(&self, name: &str) -> bool {
        self.statements.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Freeze into an immutable table
    pub fn freeze(self) -> Statements {
        Statements {
            statements: Arc::new(self.statements),
        }
    }
}

/// Immutable, cheaply cloneable statement table
#[derive(Debug, Clone, Default)]
pub struct Statements {
    statements: Arc<HashMap<String, CompiledStatement>>,
}

impl Statements {
    /// Get a statement by method name
    pub fn get(&self, name: &str) -> Option<&CompiledStatement> {
        self.statements.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.statements.contains_key(name)
    }

    /// All method names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.statements.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = StatementRegistry::new();
        registry
            .register("find", "SELECT * FROM t WHERE id = #{id}")
            .expect("Should register");
        assert!(registry.contains("find"));

        let statements = registry.freeze();
        let stmt = statements.get("find").expect("Should exist");
        assert_eq!(stmt.name(), "find");
        assert_eq!(stmt.segments().len(), 2);
    }

    #[test]
    fn test_registry_chained_registration() {
        let mut registry = StatementRegistry::new();
        registry
            .register("a", "SELECT 1")
            .and_then(|r| r.register("b", "SELECT 2"))
            .expect("Should register both");
        assert_eq!(registry.freeze().names(), vec!["a", "b"]);
    }

    #[test]
    fn test_registry_duplicate_error() {
        let mut registry = StatementRegistry::new();
        registry
            .register("find", "SELECT 1")
            .expect("First register should succeed");
        let result = registry.register("find", "SELECT 2");
        assert!(matches!(result, Err(RegisterError::Duplicate { .. })));
    }

    #[test]
    fn test_registry_pattern_error_names_method() {
        let mut registry = StatementRegistry::new();
        let err = registry.register("broken", "id = #{id").unwrap_err();
        match err {
            RegisterError::Pattern(e) => assert_eq!(e.method.as_deref(), Some("broken")),
            other => panic!("Expected Pattern, got {:?}", other),
        }
        assert!(!registry.contains("broken"));
    }

    #[test]
    fn test_frozen_table_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Statements>();
    }
}
