//! JSON round-trip for whole trees.
//!
//! Encoding writes the root project; decoding parses it back and then
//! re-validates every model invariant (range validity, parent/child
//! containment, globally unique qualified ids, consistent back-references,
//! a parentless root), failing with the matching taxonomy error rather
//! than silently coercing a bad document. Live containers can never reach
//! those states; hand-written or foreign documents can.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{CodecError, ModelError};
use crate::model::{CodeEntity, NodeRef, Project};
use crate::tree::CodeTree;

/// Encode a tree as JSON.
pub fn to_json(tree: &CodeTree) -> Result<String, CodecError> {
    Ok(serde_json::to_string(tree.root())?)
}

/// Encode a tree as human-readable JSON.
pub fn to_json_pretty(tree: &CodeTree) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(tree.root())?)
}

/// Decode a tree, re-validating every invariant.
pub fn from_json(text: &str) -> Result<CodeTree, CodecError> {
    let root: Project = serde_json::from_str(text)?;
    validate(&root)?;
    let tree = CodeTree::new(root);
    debug!(
        "decoded tree '{}' with {} node(s)",
        tree.root().qualified_id(),
        tree.node_count()
    );
    Ok(tree)
}

fn validate(root: &Project) -> Result<(), ModelError> {
    if root.parent_id().is_some() {
        return Err(ModelError::DetachedNode {
            id: root.qualified_id().to_string(),
        });
    }
    let mut seen = HashSet::new();
    validate_node(NodeRef::Project(root), &mut seen)
}

fn validate_node(node: NodeRef<'_>, seen: &mut HashSet<String>) -> Result<(), ModelError> {
    if let Some(range) = node.range() {
        if !range.is_valid() {
            return Err(ModelError::Range {
                start: range.start(),
                end: range.end(),
            });
        }
    }
    if !seen.insert(node.qualified_id().to_string()) {
        return Err(ModelError::DuplicateId {
            id: node.qualified_id().to_string(),
        });
    }
    for child in node.children() {
        if child.parent_id() != Some(node.qualified_id()) {
            return Err(ModelError::DetachedNode {
                id: child.qualified_id().to_string(),
            });
        }
        if let (Some(parent_range), Some(child_range)) = (node.range(), child.range()) {
            if !parent_range.encloses(&child_range) {
                return Err(ModelError::OutOfRange {
                    child: child.qualified_id().to_string(),
                    parent: node.qualified_id().to_string(),
                });
            }
        }
        validate_node(child, seen)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::model::{ids, Method, Parameter, SourceFile, StatementKind, TypeDef};

    fn sample_tree() -> CodeTree {
        let file_id = ids::file("P", "/a.java");
        let type_id = ids::type_in_file(&file_id, "A");
        let method = Method::builder(ids::method(&type_id, "m", &["int"]), "m")
            .range(10, 20)
            .parameter(Parameter::new("n", "int"))
            .returns("void")
            .statement(StatementKind::Return, Some((19, 19)))
            .metric("LOC", 11.0)
            .build()
            .unwrap();
        let type_a = TypeDef::builder(&type_id, "A")
            .range(1, 50)
            .method(method)
            .build()
            .unwrap();
        let file = SourceFile::builder(&file_id, "a.java")
            .length(80)
            .import("java.util.List")
            .type_def(type_a)
            .build()
            .unwrap();
        CodeTree::new(Project::builder("P", "P").file(file).build().unwrap())
    }

    #[test]
    fn round_trip_preserves_the_tree() {
        let tree = sample_tree();
        let text = to_json(&tree).unwrap();
        let decoded = from_json(&text).unwrap();
        assert_eq!(decoded, tree);
    }

    #[test]
    fn inverted_range_fails_decode() {
        let doc = json!({
            "qualified_id": "P",
            "name": "P",
            "files": [{
                "qualified_id": "P:/a.java",
                "name": "a.java",
                "parent_id": "P",
                "length": 10,
                "range": {"start": 9, "end": 3}
            }]
        });
        let err = from_json(&doc.to_string()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Invalid(ModelError::Range { start: 9, end: 3 })
        ));
    }

    #[test]
    fn duplicate_child_id_fails_decode() {
        let file = json!({
            "qualified_id": "P:/a.java",
            "name": "a.java",
            "parent_id": "P",
            "length": 10
        });
        let doc = json!({
            "qualified_id": "P",
            "name": "P",
            "files": [file.clone(), file]
        });
        let err = from_json(&doc.to_string()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Invalid(ModelError::DuplicateId { .. })
        ));
    }

    #[test]
    fn child_escaping_parent_range_fails_decode() {
        let doc = json!({
            "qualified_id": "P",
            "name": "P",
            "files": [{
                "qualified_id": "P:/a.java",
                "name": "a.java",
                "parent_id": "P",
                "length": 10,
                "range": {"start": 1, "end": 10},
                "types": [{
                    "qualified_id": "P:/a.java:A",
                    "name": "A",
                    "parent_id": "P:/a.java",
                    "range": {"start": 5, "end": 40}
                }]
            }]
        });
        let err = from_json(&doc.to_string()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Invalid(ModelError::OutOfRange { .. })
        ));
    }

    #[test]
    fn stale_back_reference_fails_decode() {
        let doc = json!({
            "qualified_id": "P",
            "name": "P",
            "files": [{
                "qualified_id": "P:/a.java",
                "name": "a.java",
                "parent_id": "SOMEWHERE_ELSE",
                "length": 10
            }]
        });
        let err = from_json(&doc.to_string()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Invalid(ModelError::DetachedNode { .. })
        ));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        assert!(matches!(
            from_json("{ not json"),
            Err(CodecError::Parse(_))
        ));
    }

    #[test]
    fn extracted_subtrees_round_trip_too() {
        let tree = sample_tree();
        let extracted = tree.extract_subtree("P:/a.java:A#m(int)").unwrap();
        let decoded = from_json(&to_json(&extracted).unwrap()).unwrap();
        assert_eq!(decoded, extracted);
    }
}
