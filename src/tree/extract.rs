//! The extraction engine.
//!
//! `extract_subtree` rebuilds a minimal, independent tree around one node:
//! the ancestor chain from the root down to the node as shallow clones (no
//! sibling children), the node itself with its full subtree as a deep
//! clone. Every level is re-linked through the normal insertion API, so
//! the result carries the same invariants as a tree built from scratch.

use tracing::debug;

use crate::error::ModelError;
use crate::model::{CodeEntity, EntityNode, NodeRef};
use crate::tree::CodeTree;

impl CodeTree {
    /// Extract the minimal tree spanning the root-to-node path plus the
    /// node's own subtree.
    ///
    /// A node whose ancestor chain cannot be resolved to the root
    /// (unknown id, missing parent, or a parentless non-project on the
    /// way up) fails with [`ModelError::DetachedNode`]; the caller never
    /// receives a tree silently missing levels.
    pub fn extract_subtree(&self, qualified_id: &str) -> Result<CodeTree, ModelError> {
        let detached = || ModelError::DetachedNode {
            id: qualified_id.to_string(),
        };

        // The root is its own chain: the extract is a plain deep clone.
        if qualified_id == self.root().qualified_id() {
            return Ok(CodeTree::new(self.root().deep_clone()));
        }

        let target = self.find_entity(qualified_id).ok_or_else(detached)?;

        // Resolve the ancestor chain, innermost first, by following the
        // weak parent references through this tree's own lookup.
        let mut ancestors: Vec<NodeRef<'_>> = Vec::new();
        let mut current = target;
        loop {
            let parent_id = current.parent_id().ok_or_else(detached)?;
            let parent = self.find_entity(parent_id).ok_or_else(detached)?;
            ancestors.push(parent);
            if parent.parent_id().is_none() {
                if !matches!(parent, NodeRef::Project(_)) {
                    return Err(detached());
                }
                break;
            }
            current = parent;
        }

        // Wrap the deep-cloned target in shallow ancestor shells, inside
        // out, re-attaching each level through the insertion API.
        let mut node = target.deep_clone_node();
        for ancestor in &ancestors {
            let mut shell = ancestor.shallow_clone_node();
            shell.attach_child(node)?;
            node = shell;
        }

        match node {
            EntityNode::Project(project) => {
                debug!(
                    "extracted '{}' with {} ancestor level(s)",
                    qualified_id,
                    ancestors.len()
                );
                Ok(CodeTree::new(project))
            }
            _ => Err(detached()),
        }
    }
}
