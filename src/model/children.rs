//! Qualified-id-keyed child containers.
//!
//! Every parent kind owns its children through a [`ChildSet`]: an
//! insertion-ordered collection keyed strictly by qualified id. Inserting
//! an id that is already present is a no-op (idempotent insert), so a
//! container can never hold duplicates; the range-containment invariant is
//! checked at attach time, not after the fact.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::entity::{CodeEntity, EntityCore};

/// Insertion-ordered, id-keyed child collection.
///
/// Backed by a `Vec` so the fan-out order survives serialization; lookups
/// scan, which is proportionate to the per-container fan-out of a code
/// tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildSet<T> {
    items: Vec<T>,
}

impl<T> Default for ChildSet<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: CodeEntity> ChildSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, qualified_id: &str) -> bool {
        self.items.iter().any(|item| item.qualified_id() == qualified_id)
    }

    pub fn get(&self, qualified_id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.qualified_id() == qualified_id)
    }

    pub fn get_mut(&mut self, qualified_id: &str) -> Option<&mut T> {
        self.items
            .iter_mut()
            .find(|item| item.qualified_id() == qualified_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Attach a child under `parent`, keyed by the child's qualified id.
    ///
    /// Returns `Ok(false)` when the id is already present (the first
    /// inserted object stays; the duplicate is discarded). When both sides
    /// carry a range, the child's must lie within the parent's.
    pub(crate) fn attach(&mut self, parent: &EntityCore, mut child: T) -> Result<bool, ModelError> {
        if self.contains(child.qualified_id()) {
            return Ok(false);
        }
        if let (Some(parent_range), Some(child_range)) = (parent.range(), child.range()) {
            if !parent_range.encloses(&child_range) {
                return Err(ModelError::OutOfRange {
                    child: child.qualified_id().to_string(),
                    parent: parent.qualified_id().to_string(),
                });
            }
        }
        child
            .core_mut()
            .set_parent_id(Some(parent.qualified_id().to_string()));
        self.items.push(child);
        Ok(true)
    }

    /// Remove a child by id, clearing its parent back-reference.
    pub(crate) fn detach(&mut self, qualified_id: &str) -> Option<T> {
        let index = self
            .items
            .iter()
            .position(|item| item.qualified_id() == qualified_id)?;
        let mut child = self.items.remove(index);
        child.core_mut().set_parent_id(None);
        Some(child)
    }

    /// Insert without invariant checks. Only for cloning paths, where the
    /// input is a child of an already-valid container.
    pub(crate) fn insert_unchecked(&mut self, child: T) {
        self.items.push(child);
    }
}

impl<'a, T> IntoIterator for &'a ChildSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for ChildSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
