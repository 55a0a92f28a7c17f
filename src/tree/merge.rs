//! The merge engine.
//!
//! `update` reconciles an incoming node (a fresh snapshot of the same
//! entity) into an existing node with the same kind and qualified id. The
//! skeleton (range overwrite, metric merge, id-matched child recursion
//! with additive retention) is implemented once, and each kind supplies
//! only its container list. Merge is a union: children the incoming snapshot
//! does not mention are kept, modeling "this pass did not revisit that
//! subtree", never "that subtree was removed".
//!
//! Merge is not transactional. A containment violation surfaced while
//! recursing leaves the target partially updated; callers needing
//! all-or-nothing semantics merge into a deep clone and swap on success.

use tracing::debug;

use crate::error::ModelError;
use crate::model::{
    ChildSet, CodeEntity, EntityCore, EntityNode, Field, Method, Module, Namespace, Project,
    SourceFile, Statement, TypeDef,
};
use crate::tree::CodeTree;

/// Identity-matched, additive reconciliation of two same-kind subtrees.
pub trait Reconcile: CodeEntity + Sized {
    /// Merge `incoming` into `self`. The caller has already matched the
    /// pair by kind and qualified id.
    fn update(&mut self, incoming: Self) -> Result<(), ModelError>;
}

/// Shared child-container step: same-id children recurse, new children are
/// inserted as-is (ownership transfers, the back-reference re-points at
/// `parent`), and target-only children are retained.
fn merge_children<T: Reconcile>(
    parent: &EntityCore,
    target: &mut ChildSet<T>,
    incoming: ChildSet<T>,
) -> Result<(), ModelError> {
    for child in incoming {
        match target.get_mut(child.qualified_id()) {
            Some(existing) => existing.update(child)?,
            None => {
                target.attach(parent, child)?;
            }
        }
    }
    Ok(())
}

impl Reconcile for Statement {
    fn update(&mut self, incoming: Statement) -> Result<(), ModelError> {
        self.core.absorb(incoming.core);
        self.kind = incoming.kind;
        Ok(())
    }
}

impl Reconcile for Field {
    fn update(&mut self, incoming: Field) -> Result<(), ModelError> {
        self.core.absorb(incoming.core);
        Ok(())
    }
}

impl Reconcile for Method {
    fn update(&mut self, incoming: Method) -> Result<(), ModelError> {
        self.core.absorb(incoming.core);
        self.parameters = incoming.parameters;
        self.return_type = incoming.return_type;
        self.is_constructor = incoming.is_constructor;
        self.is_abstract = incoming.is_abstract;
        self.is_static = incoming.is_static;
        self.is_final = incoming.is_final;
        self.is_accessor = incoming.is_accessor;
        merge_children(&self.core, &mut self.statements, incoming.statements)
    }
}

impl Reconcile for TypeDef {
    fn update(&mut self, incoming: TypeDef) -> Result<(), ModelError> {
        self.core.absorb(incoming.core);
        self.is_interface = incoming.is_interface;
        self.is_abstract = incoming.is_abstract;
        merge_children(&self.core, &mut self.methods, incoming.methods)?;
        merge_children(&self.core, &mut self.fields, incoming.fields)
    }
}

impl Reconcile for SourceFile {
    fn update(&mut self, incoming: SourceFile) -> Result<(), ModelError> {
        self.core.absorb(incoming.core);
        self.length = incoming.length;
        for import in incoming.imports {
            self.add_import(import);
        }
        merge_children(&self.core, &mut self.types, incoming.types)
    }
}

impl Reconcile for Namespace {
    fn update(&mut self, incoming: Namespace) -> Result<(), ModelError> {
        self.core.absorb(incoming.core);
        merge_children(&self.core, &mut self.files, incoming.files)?;
        merge_children(&self.core, &mut self.namespaces, incoming.namespaces)
    }
}

impl Reconcile for Module {
    fn update(&mut self, incoming: Module) -> Result<(), ModelError> {
        self.core.absorb(incoming.core);
        merge_children(&self.core, &mut self.files, incoming.files)?;
        merge_children(&self.core, &mut self.namespaces, incoming.namespaces)
    }
}

impl Reconcile for Project {
    fn update(&mut self, incoming: Project) -> Result<(), ModelError> {
        self.core.absorb(incoming.core);
        merge_children(&self.core, &mut self.files, incoming.files)?;
        merge_children(&self.core, &mut self.modules, incoming.modules)?;
        merge_children(&self.core, &mut self.namespaces, incoming.namespaces)?;
        merge_children(&self.core, &mut self.projects, incoming.projects)
    }
}

impl EntityNode {
    /// Dynamic merge entry. Same-kind pairs delegate to the typed
    /// [`Reconcile`] impl; a cross-kind call is a caller error and fails
    /// with [`ModelError::KindMismatch`] without touching the target.
    pub fn update(&mut self, incoming: EntityNode) -> Result<(), ModelError> {
        match (self, incoming) {
            (EntityNode::Project(target), EntityNode::Project(incoming)) => {
                target.update(incoming)
            }
            (EntityNode::Module(target), EntityNode::Module(incoming)) => target.update(incoming),
            (EntityNode::Namespace(target), EntityNode::Namespace(incoming)) => {
                target.update(incoming)
            }
            (EntityNode::File(target), EntityNode::File(incoming)) => target.update(incoming),
            (EntityNode::Type(target), EntityNode::Type(incoming)) => target.update(incoming),
            (EntityNode::Method(target), EntityNode::Method(incoming)) => target.update(incoming),
            (EntityNode::Field(target), EntityNode::Field(incoming)) => target.update(incoming),
            (EntityNode::Statement(target), EntityNode::Statement(incoming)) => {
                target.update(incoming)
            }
            (target, incoming) => Err(ModelError::KindMismatch {
                expected: target.kind(),
                found: incoming.kind(),
            }),
        }
    }
}

impl CodeTree {
    /// Merge an incoming snapshot's root into this tree's root. The caller
    /// matches roots by qualified id; children reconcile recursively.
    pub fn merge_from(&mut self, incoming: CodeTree) -> Result<(), ModelError> {
        let incoming_root = incoming.into_root();
        self.root_mut().update(incoming_root)?;
        debug!(
            "merged snapshot into '{}', tree now holds {} node(s)",
            self.root().qualified_id(),
            self.node_count()
        );
        Ok(())
    }

    pub(crate) fn into_root(self) -> Project {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ids, EntityKind, Parameter, StatementKind};

    fn type_with_method(file_id: &str, method_range: (u32, u32)) -> TypeDef {
        let type_id = ids::type_in_file(file_id, "A");
        TypeDef::builder(&type_id, "A")
            .range(1, 50)
            .method(
                Method::builder(ids::method(&type_id, "m", &[]), "m")
                    .range(method_range.0, method_range.1)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn merge_is_additive_over_children() {
        let file_id = "P:/a.java";
        let type_id = ids::type_in_file(file_id, "A");

        let mut target = type_with_method(file_id, (10, 20));
        target
            .add_field(Field::builder(ids::field(&type_id, "x"), "x").build().unwrap())
            .unwrap();

        // The incoming snapshot revisits the method but not the field.
        let incoming = type_with_method(file_id, (10, 25));
        target.update(incoming).unwrap();

        assert_eq!(target.field_count(), 1, "unmentioned child retained");
        let method = target.method("P:/a.java:A#m()").unwrap();
        assert_eq!(method.range().unwrap().end(), 25, "incoming range wins");
    }

    #[test]
    fn merge_recursion_equals_direct_child_update() {
        let file_id = "P:/a.java";
        let mut via_parent = type_with_method(file_id, (10, 20));
        let mut direct = via_parent.method("P:/a.java:A#m()").unwrap().clone();

        let incoming_parent = type_with_method(file_id, (10, 25));
        let incoming_method = incoming_parent.method("P:/a.java:A#m()").unwrap().clone();

        via_parent.update(incoming_parent).unwrap();
        direct.update(incoming_method).unwrap();

        assert_eq!(via_parent.method("P:/a.java:A#m()").unwrap(), &direct);
    }

    #[test]
    fn merge_overwrites_shared_metrics_and_keeps_own() {
        let mut target = Field::builder("P:/a.java:A.x", "x").build().unwrap();
        target.core_mut().metrics_mut().set("LOC", 10.0);
        target.core_mut().metrics_mut().set("CC", 3.0);

        let mut incoming = Field::builder("P:/a.java:A.x", "x").build().unwrap();
        incoming.core_mut().metrics_mut().set("LOC", 14.0);

        target.update(incoming).unwrap();
        assert_eq!(target.metrics().get("LOC"), Some(14.0));
        assert_eq!(target.metrics().get("CC"), Some(3.0));
    }

    #[test]
    fn merge_inserts_new_children_and_repoints_their_parent() {
        let file_id = "P:/a.java";
        let type_id = ids::type_in_file(file_id, "A");
        let mut target = TypeDef::builder(&type_id, "A").range(1, 50).build().unwrap();

        let incoming = type_with_method(file_id, (10, 20));
        target.update(incoming).unwrap();

        let method = target.method("P:/a.java:A#m()").unwrap();
        assert_eq!(method.parent_id(), Some("P:/a.java:A"));
    }

    #[test]
    fn merge_keeps_target_range_when_incoming_has_none() {
        let mut target = Field::builder("P:/a.java:A.x", "x").range(4, 4).build().unwrap();
        let incoming = Field::builder("P:/a.java:A.x", "x").build().unwrap();
        target.update(incoming).unwrap();
        assert!(target.range().is_some());
    }

    #[test]
    fn merge_overwrites_signature_attributes() {
        let mut target = Method::builder("P:/a.java:A#m(int)", "m")
            .parameter(Parameter::new("n", "int"))
            .returns("int")
            .build()
            .unwrap();
        let incoming = Method::builder("P:/a.java:A#m(int)", "m")
            .parameter(Parameter::collection("ns", "int"))
            .returns("void")
            .static_method()
            .build()
            .unwrap();

        target.update(incoming).unwrap();
        assert!(target.is_static());
        assert_eq!(target.return_type(), Some("void"));
        assert!(target.parameters()[0].is_collection);
    }

    #[test]
    fn dynamic_entry_rejects_cross_kind_merge() {
        let mut target = EntityNode::Field(
            Field::builder("P:/a.java:A.x", "x").build().unwrap(),
        );
        let incoming = EntityNode::Statement(
            Statement::builder("m$1", "return", StatementKind::Return)
                .build()
                .unwrap(),
        );

        let err = target.update(incoming).unwrap_err();
        assert_eq!(
            err,
            ModelError::KindMismatch {
                expected: EntityKind::Field,
                found: EntityKind::Statement,
            }
        );
    }

    #[test]
    fn file_merge_unions_imports_and_takes_incoming_length() {
        let mut target = SourceFile::builder("P:/a.java", "a.java")
            .length(100)
            .import("java.util.List")
            .build()
            .unwrap();
        let incoming = SourceFile::builder("P:/a.java", "a.java")
            .length(120)
            .import("java.util.List")
            .import("java.io.File")
            .build()
            .unwrap();

        target.update(incoming).unwrap();
        assert_eq!(target.length(), 120);
        assert_eq!(target.imports().len(), 2);
    }

    #[test]
    fn tree_merge_reconciles_roots_recursively() {
        let file_a = SourceFile::builder(ids::file("P", "/a.java"), "a.java")
            .length(50)
            .build()
            .unwrap();
        let mut tree = CodeTree::new(Project::builder("P", "P").file(file_a).build().unwrap());

        let file_b = SourceFile::builder(ids::file("P", "/b.java"), "b.java")
            .length(30)
            .build()
            .unwrap();
        let snapshot = CodeTree::new(Project::builder("P", "P").file(file_b).build().unwrap());

        tree.merge_from(snapshot).unwrap();
        assert!(tree.find_file("P:/a.java").is_some());
        assert!(tree.find_file("P:/b.java").is_some());
        assert_eq!(tree.find_file("P:/b.java").unwrap().parent_id(), Some("P"));
    }

    #[test]
    fn failed_merge_leaves_target_partially_updated() {
        let file_id = "P:/a.java";
        let type_id = ids::type_in_file(file_id, "A");
        let mut target = TypeDef::builder(&type_id, "A").range(1, 50).build().unwrap();

        // The incoming snapshot carries no range of its own (so the
        // target keeps 1..50) plus one member that fits and one that
        // escapes the target's range. The fitting member lands before the
        // violation surfaces: no rollback.
        let incoming = TypeDef::builder(&type_id, "A")
            .method(
                Method::builder(ids::method(&type_id, "ok", &[]), "ok")
                    .range(5, 9)
                    .build()
                    .unwrap(),
            )
            .method(
                Method::builder(ids::method(&type_id, "escapes", &[]), "escapes")
                    .range(60, 70)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let err = target.update(incoming).unwrap_err();
        assert!(matches!(err, ModelError::OutOfRange { .. }));
        assert_eq!(target.method_count(), 1, "valid member was kept");
        assert!(target.method("P:/a.java:A#ok()").is_some());
        assert!(target.method("P:/a.java:A#escapes()").is_none());
    }
}
