//! Whole-tree ownership and queries.
//!
//! A [`CodeTree`] owns exactly one root [`Project`] and answers two lookup
//! families over it: identifier-based (transitive search across every
//! reachable container) and line-based (which type/method/field of a file
//! contains a given source line). The merge and extraction engines live in
//! sibling modules but hang off the same type.

mod extract;
mod merge;

pub use merge::Reconcile;

use tracing::debug;

use crate::error::ModelError;
use crate::model::{
    CodeEntity, EntityKind, Field, Method, Module, Namespace, NodeRef, Project, SourceFile,
    Statement, TypeDef,
};

/// An in-memory code structure tree rooted at a single project.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeTree {
    root: Project,
}

impl CodeTree {
    /// Take ownership of `root`. The root's parent back-reference is
    /// cleared: a project is the root iff it has no parent.
    pub fn new(mut root: Project) -> Self {
        root.core_mut().set_parent_id(None);
        Self { root }
    }

    pub fn root(&self) -> &Project {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Project {
        &mut self.root
    }

    // ==================================================================
    // Identifier-based lookup
    // ==================================================================

    /// Depth-first search for any node by qualified id.
    pub fn find_entity(&self, qualified_id: &str) -> Option<NodeRef<'_>> {
        find_ref(NodeRef::Project(&self.root), qualified_id)
    }

    pub fn find_project(&self, qualified_id: &str) -> Option<&Project> {
        match self.find_entity(qualified_id) {
            Some(NodeRef::Project(project)) => Some(project),
            _ => None,
        }
    }

    pub fn find_module(&self, qualified_id: &str) -> Option<&Module> {
        match self.find_entity(qualified_id) {
            Some(NodeRef::Module(module)) => Some(module),
            _ => None,
        }
    }

    pub fn find_namespace(&self, qualified_id: &str) -> Option<&Namespace> {
        match self.find_entity(qualified_id) {
            Some(NodeRef::Namespace(namespace)) => Some(namespace),
            _ => None,
        }
    }

    pub fn find_file(&self, qualified_id: &str) -> Option<&SourceFile> {
        match self.find_entity(qualified_id) {
            Some(NodeRef::File(file)) => Some(file),
            _ => None,
        }
    }

    pub fn find_type(&self, qualified_id: &str) -> Option<&TypeDef> {
        match self.find_entity(qualified_id) {
            Some(NodeRef::Type(type_def)) => Some(type_def),
            _ => None,
        }
    }

    pub fn find_method(&self, qualified_id: &str) -> Option<&Method> {
        match self.find_entity(qualified_id) {
            Some(NodeRef::Method(method)) => Some(method),
            _ => None,
        }
    }

    pub fn find_field(&self, qualified_id: &str) -> Option<&Field> {
        match self.find_entity(qualified_id) {
            Some(NodeRef::Field(field)) => Some(field),
            _ => None,
        }
    }

    pub fn find_statement(&self, qualified_id: &str) -> Option<&Statement> {
        match self.find_entity(qualified_id) {
            Some(NodeRef::Statement(statement)) => Some(statement),
            _ => None,
        }
    }

    // ==================================================================
    // Line-based lookup
    // ==================================================================

    /// First type of `file_id` whose range contains `line`, in insertion
    /// order. Empty result when the file is unknown, the line falls
    /// outside the file's own range, or nothing matches.
    pub fn find_type_at(&self, file_id: &str, line: u32) -> Option<&TypeDef> {
        let file = self.file_containing(file_id, line)?;
        file.types()
            .find(|type_def| type_def.range().is_some_and(|r| r.contains_line(line)))
    }

    /// First method across the file's types whose range contains `line`.
    pub fn find_method_at(&self, file_id: &str, line: u32) -> Option<&Method> {
        let file = self.file_containing(file_id, line)?;
        file.types()
            .flat_map(|type_def| type_def.methods())
            .find(|method| method.range().is_some_and(|r| r.contains_line(line)))
    }

    /// First field across the file's types whose range contains `line`.
    pub fn find_field_at(&self, file_id: &str, line: u32) -> Option<&Field> {
        let file = self.file_containing(file_id, line)?;
        file.types()
            .flat_map(|type_def| type_def.fields())
            .find(|field| field.range().is_some_and(|r| r.contains_line(line)))
    }

    /// The tightest member of `file_id` containing `line`: methods win
    /// over types, types over fields, then the smaller line extent.
    pub fn find_innermost_at(&self, file_id: &str, line: u32) -> Option<NodeRef<'_>> {
        let file = self.file_containing(file_id, line)?;

        let mut candidates: Vec<NodeRef<'_>> = Vec::new();
        for type_def in file.types() {
            if type_def.range().is_some_and(|r| r.contains_line(line)) {
                candidates.push(NodeRef::Type(type_def));
            }
            for method in type_def.methods() {
                if method.range().is_some_and(|r| r.contains_line(line)) {
                    candidates.push(NodeRef::Method(method));
                }
            }
            for field in type_def.fields() {
                if field.range().is_some_and(|r| r.contains_line(line)) {
                    candidates.push(NodeRef::Field(field));
                }
            }
        }

        let priority = |kind: EntityKind| -> u32 {
            match kind {
                EntityKind::Method => 1,
                EntityKind::Type => 2,
                _ => 10,
            }
        };

        candidates.sort_by(|a, b| {
            priority(a.kind()).cmp(&priority(b.kind())).then_with(|| {
                let span = |node: &NodeRef<'_>| {
                    node.range().map_or(u32::MAX, |r| r.line_count())
                };
                span(a).cmp(&span(b))
            })
        });
        candidates.into_iter().next()
    }

    fn file_containing(&self, file_id: &str, line: u32) -> Option<&SourceFile> {
        let file = self.find_file(file_id)?;
        match file.range() {
            Some(range) if range.contains_line(line) => Some(file),
            _ => None,
        }
    }

    // ==================================================================
    // Root-level mutation
    // ==================================================================

    pub fn add_file(&mut self, file: SourceFile) -> Result<bool, ModelError> {
        self.root.add_file(file)
    }

    pub fn remove_file(&mut self, qualified_id: &str) -> Option<SourceFile> {
        self.root.remove_file(qualified_id)
    }

    pub fn add_module(&mut self, module: Module) -> Result<bool, ModelError> {
        self.root.add_module(module)
    }

    pub fn remove_module(&mut self, qualified_id: &str) -> Option<Module> {
        self.root.remove_module(qualified_id)
    }

    pub fn add_namespace(&mut self, namespace: Namespace) -> Result<bool, ModelError> {
        self.root.add_namespace(namespace)
    }

    pub fn remove_namespace(&mut self, qualified_id: &str) -> Option<Namespace> {
        self.root.remove_namespace(qualified_id)
    }

    pub fn add_sub_project(&mut self, project: Project) -> Result<bool, ModelError> {
        self.root.add_sub_project(project)
    }

    pub fn remove_sub_project(&mut self, qualified_id: &str) -> Option<Project> {
        self.root.remove_sub_project(qualified_id)
    }

    // ==================================================================
    // Traversal
    // ==================================================================

    /// Depth-first visit of every node, parents before children.
    pub fn walk<F>(&self, visitor: &mut F)
    where
        F: FnMut(NodeRef<'_>, u32),
    {
        walk_ref(NodeRef::Project(&self.root), 0, visitor);
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_, _| count += 1);
        count
    }

    /// Number of nodes of one kind.
    pub fn count_of(&self, kind: EntityKind) -> usize {
        let mut count = 0;
        self.walk(&mut |node, _| {
            if node.kind() == kind {
                count += 1;
            }
        });
        debug!("counted {} {} node(s)", count, kind);
        count
    }
}

fn find_ref<'a>(node: NodeRef<'a>, qualified_id: &str) -> Option<NodeRef<'a>> {
    if node.qualified_id() == qualified_id {
        return Some(node);
    }
    node.children()
        .into_iter()
        .find_map(|child| find_ref(child, qualified_id))
}

fn walk_ref<F>(node: NodeRef<'_>, depth: u32, visitor: &mut F)
where
    F: FnMut(NodeRef<'_>, u32),
{
    visitor(node, depth);
    for child in node.children() {
        walk_ref(child, depth + 1, visitor);
    }
}
