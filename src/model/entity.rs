//! The contract shared by every node kind.
//!
//! All eight kinds carry the same [`EntityCore`]: a globally unique
//! qualified id, a display name, an optional line range, a metric map, and
//! a weak parent back-reference. The parent is identified by qualified id
//! only; resolving the actual parent object goes through the owning
//! tree's lookup, so ownership stays a strict tree with no reference
//! cycles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::metrics::MetricMap;
use crate::model::range::LineRange;

/// Discriminates the eight node kinds of the code tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Module,
    Namespace,
    File,
    Type,
    Method,
    Field,
    Statement,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Project => write!(f, "project"),
            EntityKind::Module => write!(f, "module"),
            EntityKind::Namespace => write!(f, "namespace"),
            EntityKind::File => write!(f, "file"),
            EntityKind::Type => write!(f, "type"),
            EntityKind::Method => write!(f, "method"),
            EntityKind::Field => write!(f, "field"),
            EntityKind::Statement => write!(f, "statement"),
        }
    }
}

/// Qualified-id composition helpers.
///
/// Ids are readable paths built by concatenating the parent's id with a
/// separator specific to the relation. They are composed once, at
/// construction, and never recomputed afterwards.
pub mod ids {
    /// Sub-project, module, or namespace under a parent scope.
    pub fn scoped(parent_id: &str, name: &str) -> String {
        format!("{}::{}", parent_id, name)
    }

    /// File under a project, module, or namespace.
    pub fn file(parent_id: &str, path: &str) -> String {
        format!("{}:{}", parent_id, path)
    }

    /// Type declared in a file.
    pub fn type_in_file(file_id: &str, name: &str) -> String {
        format!("{}:{}", file_id, name)
    }

    /// Method of a type; the parameter type list is part of the identity.
    pub fn method(type_id: &str, name: &str, parameter_types: &[&str]) -> String {
        format!("{}#{}({})", type_id, name, parameter_types.join(","))
    }

    /// Field of a type.
    pub fn field(type_id: &str, name: &str) -> String {
        format!("{}.{}", type_id, name)
    }

    /// Statement of a method, numbered by the owning method's counter.
    pub fn statement(method_id: &str, ordinal: u32) -> String {
        format!("{}${}", method_id, ordinal)
    }
}

/// The attribute block shared by every node kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityCore {
    qualified_id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<LineRange>,
    #[serde(default, skip_serializing_if = "MetricMap::is_empty")]
    metrics: MetricMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<String>,
}

impl EntityCore {
    pub(crate) fn new(qualified_id: String, name: String) -> Self {
        Self {
            qualified_id,
            name,
            range: None,
            metrics: MetricMap::new(),
            parent_id: None,
        }
    }

    pub fn qualified_id(&self) -> &str {
        &self.qualified_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range(&self) -> Option<LineRange> {
        self.range
    }

    pub fn metrics(&self) -> &MetricMap {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut MetricMap {
        &mut self.metrics
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Replace the whole line range, validating the bounds.
    pub fn set_range(&mut self, start: u32, end: u32) -> Result<(), ModelError> {
        self.range = Some(LineRange::new(start, end)?);
        Ok(())
    }

    /// Move the start line. On an entity without a range this starts a
    /// single-line range at `start`.
    pub fn set_range_start(&mut self, start: u32) -> Result<(), ModelError> {
        match self.range.as_mut() {
            Some(range) => range.set_start(start),
            None => {
                self.range = Some(LineRange::new(start, start)?);
                Ok(())
            }
        }
    }

    /// Move the end line. On an entity without a range this starts a
    /// single-line range at `end`.
    pub fn set_range_end(&mut self, end: u32) -> Result<(), ModelError> {
        match self.range.as_mut() {
            Some(range) => range.set_end(end),
            None => {
                self.range = Some(LineRange::new(end, end)?);
                Ok(())
            }
        }
    }

    pub(crate) fn set_parent_id(&mut self, parent_id: Option<String>) {
        self.parent_id = parent_id;
    }

    /// Copy for a shallow clone: identity, range, and metrics, with the
    /// parent back-reference cleared (the caller reattaches).
    pub(crate) fn detached_copy(&self) -> Self {
        Self {
            qualified_id: self.qualified_id.clone(),
            name: self.name.clone(),
            range: self.range,
            metrics: self.metrics.clone(),
            parent_id: None,
        }
    }

    /// Merge step for the shared attribute block: an incoming range
    /// overwrites, an absent incoming range leaves the target's alone, and
    /// metric maps merge with incoming-wins. Identity never changes.
    pub(crate) fn absorb(&mut self, incoming: EntityCore) {
        if let Some(range) = incoming.range {
            self.range = Some(range);
        }
        self.metrics.merge_from(incoming.metrics);
    }
}

/// Accessor capability shared by all node kinds; merge, extraction, and
/// the generic child containers are written against this.
pub trait CodeEntity {
    fn kind(&self) -> EntityKind;
    fn core(&self) -> &EntityCore;
    fn core_mut(&mut self) -> &mut EntityCore;

    fn qualified_id(&self) -> &str {
        self.core().qualified_id()
    }

    fn name(&self) -> &str {
        self.core().name()
    }

    fn range(&self) -> Option<LineRange> {
        self.core().range()
    }

    fn parent_id(&self) -> Option<&str> {
        self.core().parent_id()
    }

    fn metrics(&self) -> &MetricMap {
        self.core().metrics()
    }
}

/// Shared builder piece: accumulates the core attributes, validates at
/// seal time.
#[derive(Debug, Clone)]
pub(crate) struct CoreBuilder {
    qualified_id: String,
    name: String,
    range: Option<(u32, u32)>,
    metrics: Vec<(String, f64)>,
}

impl CoreBuilder {
    pub(crate) fn new(qualified_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualified_id: qualified_id.into(),
            name: name.into(),
            range: None,
            metrics: Vec::new(),
        }
    }

    pub(crate) fn range(&mut self, start: u32, end: u32) {
        self.range = Some((start, end));
    }

    pub(crate) fn has_range(&self) -> bool {
        self.range.is_some()
    }

    pub(crate) fn metric(&mut self, name: impl Into<String>, value: f64) {
        self.metrics.push((name.into(), value));
    }

    pub(crate) fn build(self) -> Result<EntityCore, ModelError> {
        let mut core = EntityCore::new(self.qualified_id, self.name);
        if let Some((start, end)) = self.range {
            core.set_range(start, end)?;
        }
        for (name, value) in self.metrics {
            core.metrics_mut().set(name, value);
        }
        Ok(core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_composition_uses_kind_specific_separators() {
        let project = "P";
        let file = ids::file(project, "/a.java");
        let type_id = ids::type_in_file(&file, "A");
        let method = ids::method(&type_id, "m", &["int", "String"]);
        let field = ids::field(&type_id, "count");
        let statement = ids::statement(&method, 2);

        assert_eq!(file, "P:/a.java");
        assert_eq!(type_id, "P:/a.java:A");
        assert_eq!(method, "P:/a.java:A#m(int,String)");
        assert_eq!(field, "P:/a.java:A.count");
        assert_eq!(statement, "P:/a.java:A#m(int,String)$2");
        assert_eq!(ids::scoped("P", "core"), "P::core");
    }

    #[test]
    fn set_range_rejects_inverted_bounds() {
        let mut core = EntityCore::new("id".to_string(), "id".to_string());
        assert!(core.set_range(9, 3).is_err());
        assert_eq!(core.range(), None, "failed write leaves no range behind");
    }

    #[test]
    fn set_range_start_on_rangeless_entity_opens_single_line() {
        let mut core = EntityCore::new("id".to_string(), "id".to_string());
        core.set_range_start(4).unwrap();
        let range = core.range().unwrap();
        assert_eq!((range.start(), range.end()), (4, 4));
        core.set_range_end(9).unwrap();
        assert_eq!(core.range().unwrap().end(), 9);
    }

    #[test]
    fn absorb_keeps_range_when_incoming_has_none() {
        let mut target = EntityCore::new("id".to_string(), "n".to_string());
        target.set_range(1, 10).unwrap();
        let incoming = EntityCore::new("id".to_string(), "n".to_string());
        target.absorb(incoming);
        assert!(target.range().is_some());

        let mut newer = EntityCore::new("id".to_string(), "n".to_string());
        newer.set_range(5, 25).unwrap();
        target.absorb(newer);
        let range = target.range().unwrap();
        assert_eq!((range.start(), range.end()), (5, 25));
    }
}
