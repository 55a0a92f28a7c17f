//! Method nodes: ordered parameters, ordered statements, modifier flags.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::children::ChildSet;
use crate::model::entity::{ids, CodeEntity, CoreBuilder, EntityCore, EntityKind};
use crate::model::statement::{Statement, StatementKind};

/// A formal parameter. Part of the method's identity, fixed at build time;
/// changing a signature means building a new method and replacing the old
/// one in its container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    #[serde(default)]
    pub is_collection: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_collection: false,
        }
    }

    pub fn collection(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_collection: true,
        }
    }
}

/// A method (or constructor) of a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    #[serde(flatten)]
    pub(crate) core: EntityCore,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) return_type: Option<String>,
    #[serde(default)]
    pub(crate) is_constructor: bool,
    #[serde(default)]
    pub(crate) is_abstract: bool,
    #[serde(default)]
    pub(crate) is_static: bool,
    #[serde(default)]
    pub(crate) is_final: bool,
    #[serde(default)]
    pub(crate) is_accessor: bool,
    #[serde(default, skip_serializing_if = "ChildSet::is_empty")]
    pub(crate) statements: ChildSet<Statement>,
}

impl Method {
    pub fn builder(qualified_id: impl Into<String>, name: impl Into<String>) -> MethodBuilder {
        MethodBuilder {
            core: CoreBuilder::new(qualified_id, name),
            parameters: Vec::new(),
            return_type: None,
            is_constructor: false,
            is_abstract: false,
            is_static: false,
            is_final: false,
            is_accessor: false,
            statements: Vec::new(),
        }
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn return_type(&self) -> Option<&str> {
        self.return_type.as_deref()
    }

    pub fn is_constructor(&self) -> bool {
        self.is_constructor
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn is_accessor(&self) -> bool {
        self.is_accessor
    }

    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    pub fn statement(&self, qualified_id: &str) -> Option<&Statement> {
        self.statements.get(qualified_id)
    }

    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    /// Mint a new statement under this method and return its qualified id.
    ///
    /// The id is numbered by this method's own counter: one past the
    /// highest ordinal already present, so ids stay unique even after a
    /// merge inserted statements minted elsewhere.
    pub fn mint_statement(
        &mut self,
        kind: StatementKind,
        range: Option<(u32, u32)>,
    ) -> Result<String, ModelError> {
        let qualified_id = ids::statement(self.core.qualified_id(), self.next_ordinal());
        let mut builder = Statement::builder(&qualified_id, kind.to_string(), kind);
        if let Some((start, end)) = range {
            builder = builder.range(start, end);
        }
        self.statements.attach(&self.core, builder.build()?)?;
        Ok(qualified_id)
    }

    /// Attach an externally built statement; idempotent by qualified id.
    pub fn add_statement(&mut self, statement: Statement) -> Result<bool, ModelError> {
        self.statements.attach(&self.core, statement)
    }

    pub fn remove_statement(&mut self, qualified_id: &str) -> Option<Statement> {
        self.statements.detach(qualified_id)
    }

    /// One past the highest ordinal among the owned statement ids.
    fn next_ordinal(&self) -> u32 {
        self.statements
            .iter()
            .filter_map(|statement| {
                statement
                    .qualified_id()
                    .rsplit('$')
                    .next()
                    .and_then(|suffix| suffix.parse::<u32>().ok())
            })
            .max()
            .map_or(1, |highest| highest + 1)
    }

    /// Identity, flags, parameters, range, and metrics; no statements.
    pub fn shallow_clone(&self) -> Self {
        Self {
            core: self.core.detached_copy(),
            parameters: self.parameters.clone(),
            return_type: self.return_type.clone(),
            is_constructor: self.is_constructor,
            is_abstract: self.is_abstract,
            is_static: self.is_static,
            is_final: self.is_final,
            is_accessor: self.is_accessor,
            statements: ChildSet::new(),
        }
    }

    pub fn deep_clone(&self) -> Self {
        let mut clone = self.shallow_clone();
        for statement in self.statements.iter() {
            let mut child = statement.deep_clone();
            child
                .core_mut()
                .set_parent_id(Some(clone.core.qualified_id().to_string()));
            clone.statements.insert_unchecked(child);
        }
        clone
    }
}

impl CodeEntity for Method {
    fn kind(&self) -> EntityKind {
        EntityKind::Method
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }
}

/// Builder for [`Method`].
#[derive(Debug)]
pub struct MethodBuilder {
    core: CoreBuilder,
    parameters: Vec<Parameter>,
    return_type: Option<String>,
    is_constructor: bool,
    is_abstract: bool,
    is_static: bool,
    is_final: bool,
    is_accessor: bool,
    statements: Vec<(StatementKind, Option<(u32, u32)>)>,
}

impl MethodBuilder {
    pub fn range(mut self, start: u32, end: u32) -> Self {
        self.core.range(start, end);
        self
    }

    pub fn metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.core.metric(name, value);
        self
    }

    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returns(mut self, type_name: impl Into<String>) -> Self {
        self.return_type = Some(type_name.into());
        self
    }

    pub fn constructor(mut self) -> Self {
        self.is_constructor = true;
        self
    }

    pub fn abstract_method(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn final_method(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub fn accessor(mut self) -> Self {
        self.is_accessor = true;
        self
    }

    /// Queue a statement; ids are minted in order at build time.
    pub fn statement(mut self, kind: StatementKind, range: Option<(u32, u32)>) -> Self {
        self.statements.push((kind, range));
        self
    }

    pub fn build(self) -> Result<Method, ModelError> {
        let mut method = Method {
            core: self.core.build()?,
            parameters: self.parameters,
            return_type: self.return_type,
            is_constructor: self.is_constructor,
            is_abstract: self.is_abstract,
            is_static: self.is_static,
            is_final: self.is_final,
            is_accessor: self.is_accessor,
            statements: ChildSet::new(),
        };
        for (kind, range) in self.statements {
            method.mint_statement(kind, range)?;
        }
        Ok(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method() -> Method {
        Method::builder("P:/a.java:A#m(int)", "m")
            .range(10, 20)
            .parameter(Parameter::new("n", "int"))
            .returns("void")
            .build()
            .unwrap()
    }

    #[test]
    fn minted_statements_get_successive_ordinals() {
        let mut method = method();
        let first = method
            .mint_statement(StatementKind::Declaration, Some((11, 11)))
            .unwrap();
        let second = method
            .mint_statement(StatementKind::Return, Some((12, 12)))
            .unwrap();
        assert_eq!(first, "P:/a.java:A#m(int)$1");
        assert_eq!(second, "P:/a.java:A#m(int)$2");
    }

    #[test]
    fn minting_after_foreign_insert_never_collides() {
        let mut method = method();
        // A merge can bring in a statement minted by another snapshot.
        let foreign = Statement::builder(
            "P:/a.java:A#m(int)$7",
            "call",
            StatementKind::Call,
        )
        .build()
        .unwrap();
        method.add_statement(foreign).unwrap();

        let minted = method.mint_statement(StatementKind::Return, None).unwrap();
        assert_eq!(minted, "P:/a.java:A#m(int)$8");
    }

    #[test]
    fn statement_outside_method_range_is_rejected() {
        let mut method = method();
        let result = method.mint_statement(StatementKind::Call, Some((25, 26)));
        assert!(matches!(result, Err(ModelError::OutOfRange { .. })));
        assert_eq!(method.statement_count(), 0);
    }

    #[test]
    fn shallow_clone_keeps_signature_but_no_statements() {
        let mut method = method();
        method.mint_statement(StatementKind::Return, None).unwrap();

        let clone = method.shallow_clone();
        assert_eq!(clone.parameters().len(), 1);
        assert_eq!(clone.return_type(), Some("void"));
        assert_eq!(clone.statement_count(), 0);
        assert_eq!(method.statement_count(), 1, "source untouched");
    }

    #[test]
    fn deep_clone_repoints_statement_parents_at_the_clone() {
        let mut method = method();
        method
            .mint_statement(StatementKind::Return, Some((12, 12)))
            .unwrap();

        let clone = method.deep_clone();
        assert_eq!(clone, method.deep_clone());
        let statement = clone.statements().next().unwrap();
        assert_eq!(statement.parent_id(), Some("P:/a.java:A#m(int)"));
    }
}
