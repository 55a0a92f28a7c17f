//! Statement nodes, the leaves of the tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::entity::{CodeEntity, CoreBuilder, EntityCore, EntityKind};

/// Statement-type tag carried by every statement node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Block,
    Declaration,
    Assignment,
    Call,
    Conditional,
    Loop,
    Return,
    Throw,
    Try,
    Other,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::Block => write!(f, "block"),
            StatementKind::Declaration => write!(f, "declaration"),
            StatementKind::Assignment => write!(f, "assignment"),
            StatementKind::Call => write!(f, "call"),
            StatementKind::Conditional => write!(f, "conditional"),
            StatementKind::Loop => write!(f, "loop"),
            StatementKind::Return => write!(f, "return"),
            StatementKind::Throw => write!(f, "throw"),
            StatementKind::Try => write!(f, "try"),
            StatementKind::Other => write!(f, "other"),
        }
    }
}

/// A single statement inside a method body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(flatten)]
    pub(crate) core: EntityCore,
    pub(crate) kind: StatementKind,
}

impl Statement {
    pub fn builder(
        qualified_id: impl Into<String>,
        name: impl Into<String>,
        kind: StatementKind,
    ) -> StatementBuilder {
        StatementBuilder {
            core: CoreBuilder::new(qualified_id, name),
            kind,
        }
    }

    pub fn statement_kind(&self) -> StatementKind {
        self.kind
    }

    /// Identity, range, and metrics only; statements own no children, so
    /// this equals a deep clone minus the parent back-reference.
    pub fn shallow_clone(&self) -> Self {
        Self {
            core: self.core.detached_copy(),
            kind: self.kind,
        }
    }

    pub fn deep_clone(&self) -> Self {
        self.shallow_clone()
    }
}

impl CodeEntity for Statement {
    fn kind(&self) -> EntityKind {
        EntityKind::Statement
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }
}

/// Builder for [`Statement`].
#[derive(Debug)]
pub struct StatementBuilder {
    core: CoreBuilder,
    kind: StatementKind,
}

impl StatementBuilder {
    pub fn range(mut self, start: u32, end: u32) -> Self {
        self.core.range(start, end);
        self
    }

    pub fn metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.core.metric(name, value);
        self
    }

    pub fn build(self) -> Result<Statement, ModelError> {
        Ok(Statement {
            core: self.core.build()?,
            kind: self.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_seals_identity_and_kind() {
        let statement = Statement::builder("m$1", "return", StatementKind::Return)
            .range(12, 12)
            .metric("LOC", 1.0)
            .build()
            .unwrap();
        assert_eq!(statement.qualified_id(), "m$1");
        assert_eq!(statement.statement_kind(), StatementKind::Return);
        assert_eq!(statement.metrics().get("LOC"), Some(1.0));
    }

    #[test]
    fn builder_rejects_invalid_range() {
        let result = Statement::builder("m$1", "loop", StatementKind::Loop)
            .range(5, 2)
            .build();
        assert!(matches!(result, Err(ModelError::Range { .. })));
    }

    #[test]
    fn shallow_clone_drops_parent_reference() {
        let mut statement = Statement::builder("m$1", "call", StatementKind::Call)
            .build()
            .unwrap();
        statement.core_mut().set_parent_id(Some("m".to_string()));

        let clone = statement.shallow_clone();
        assert_eq!(clone.parent_id(), None);
        assert_eq!(clone.qualified_id(), statement.qualified_id());
        assert_eq!(statement.parent_id(), Some("m"), "source untouched");
    }
}
