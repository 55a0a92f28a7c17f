//! Kind-erased views over the eight node kinds.
//!
//! The typed model is the primary API; these tagged variants exist for the
//! places that must dispatch over "any node": the dynamic merge entry, the
//! extraction engine's ancestor chain, and whole-tree walks. One dispatch
//! table here replaces a per-kind copy of each algorithm.

use crate::error::ModelError;
use crate::model::entity::{CodeEntity, EntityKind};
use crate::model::field::Field;
use crate::model::file::SourceFile;
use crate::model::method::Method;
use crate::model::metrics::MetricMap;
use crate::model::module::Module;
use crate::model::namespace::Namespace;
use crate::model::project::Project;
use crate::model::range::LineRange;
use crate::model::statement::Statement;
use crate::model::typedef::TypeDef;

/// An owned node of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityNode {
    Project(Project),
    Module(Module),
    Namespace(Namespace),
    File(SourceFile),
    Type(TypeDef),
    Method(Method),
    Field(Field),
    Statement(Statement),
}

impl EntityNode {
    pub fn kind(&self) -> EntityKind {
        self.as_entity().kind()
    }

    pub fn qualified_id(&self) -> &str {
        self.as_entity().qualified_id()
    }

    pub fn name(&self) -> &str {
        self.as_entity().name()
    }

    pub fn range(&self) -> Option<LineRange> {
        self.as_entity().range()
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.as_entity().parent_id()
    }

    pub fn metrics(&self) -> &MetricMap {
        self.as_entity().metrics()
    }

    fn as_entity(&self) -> &dyn CodeEntity {
        match self {
            EntityNode::Project(node) => node,
            EntityNode::Module(node) => node,
            EntityNode::Namespace(node) => node,
            EntityNode::File(node) => node,
            EntityNode::Type(node) => node,
            EntityNode::Method(node) => node,
            EntityNode::Field(node) => node,
            EntityNode::Statement(node) => node,
        }
    }

    /// Attach `child` through the same insertion API the typed model uses,
    /// so the containment invariant and the parent back-reference are
    /// maintained. Pairs outside the ownership table are a kind mismatch.
    pub(crate) fn attach_child(&mut self, child: EntityNode) -> Result<(), ModelError> {
        let child_kind = child.kind();
        match (self, child) {
            (EntityNode::Project(parent), EntityNode::File(child)) => {
                parent.add_file(child)?;
            }
            (EntityNode::Project(parent), EntityNode::Module(child)) => {
                parent.add_module(child)?;
            }
            (EntityNode::Project(parent), EntityNode::Namespace(child)) => {
                parent.add_namespace(child)?;
            }
            (EntityNode::Project(parent), EntityNode::Project(child)) => {
                parent.add_sub_project(child)?;
            }
            (EntityNode::Module(parent), EntityNode::File(child)) => {
                parent.add_file(child)?;
            }
            (EntityNode::Module(parent), EntityNode::Namespace(child)) => {
                parent.add_namespace(child)?;
            }
            (EntityNode::Namespace(parent), EntityNode::File(child)) => {
                parent.add_file(child)?;
            }
            (EntityNode::Namespace(parent), EntityNode::Namespace(child)) => {
                parent.add_namespace(child)?;
            }
            (EntityNode::File(parent), EntityNode::Type(child)) => {
                parent.add_type(child)?;
            }
            (EntityNode::Type(parent), EntityNode::Method(child)) => {
                parent.add_method(child)?;
            }
            (EntityNode::Type(parent), EntityNode::Field(child)) => {
                parent.add_field(child)?;
            }
            (EntityNode::Method(parent), EntityNode::Statement(child)) => {
                parent.add_statement(child)?;
            }
            (parent, _) => {
                return Err(ModelError::KindMismatch {
                    expected: parent.kind(),
                    found: child_kind,
                });
            }
        }
        Ok(())
    }
}

/// A borrowed node of any kind.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Project(&'a Project),
    Module(&'a Module),
    Namespace(&'a Namespace),
    File(&'a SourceFile),
    Type(&'a TypeDef),
    Method(&'a Method),
    Field(&'a Field),
    Statement(&'a Statement),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> EntityKind {
        self.as_entity().kind()
    }

    pub fn qualified_id(&self) -> &'a str {
        match self {
            NodeRef::Project(node) => node.qualified_id(),
            NodeRef::Module(node) => node.qualified_id(),
            NodeRef::Namespace(node) => node.qualified_id(),
            NodeRef::File(node) => node.qualified_id(),
            NodeRef::Type(node) => node.qualified_id(),
            NodeRef::Method(node) => node.qualified_id(),
            NodeRef::Field(node) => node.qualified_id(),
            NodeRef::Statement(node) => node.qualified_id(),
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            NodeRef::Project(node) => node.name(),
            NodeRef::Module(node) => node.name(),
            NodeRef::Namespace(node) => node.name(),
            NodeRef::File(node) => node.name(),
            NodeRef::Type(node) => node.name(),
            NodeRef::Method(node) => node.name(),
            NodeRef::Field(node) => node.name(),
            NodeRef::Statement(node) => node.name(),
        }
    }

    pub fn range(&self) -> Option<LineRange> {
        self.as_entity().range()
    }

    pub fn parent_id(&self) -> Option<&'a str> {
        match self {
            NodeRef::Project(node) => node.parent_id(),
            NodeRef::Module(node) => node.parent_id(),
            NodeRef::Namespace(node) => node.parent_id(),
            NodeRef::File(node) => node.parent_id(),
            NodeRef::Type(node) => node.parent_id(),
            NodeRef::Method(node) => node.parent_id(),
            NodeRef::Field(node) => node.parent_id(),
            NodeRef::Statement(node) => node.parent_id(),
        }
    }

    pub fn metrics(&self) -> &'a MetricMap {
        match self {
            NodeRef::Project(node) => node.metrics(),
            NodeRef::Module(node) => node.metrics(),
            NodeRef::Namespace(node) => node.metrics(),
            NodeRef::File(node) => node.metrics(),
            NodeRef::Type(node) => node.metrics(),
            NodeRef::Method(node) => node.metrics(),
            NodeRef::Field(node) => node.metrics(),
            NodeRef::Statement(node) => node.metrics(),
        }
    }

    fn as_entity(&self) -> &'a dyn CodeEntity {
        match self {
            NodeRef::Project(node) => *node,
            NodeRef::Module(node) => *node,
            NodeRef::Namespace(node) => *node,
            NodeRef::File(node) => *node,
            NodeRef::Type(node) => *node,
            NodeRef::Method(node) => *node,
            NodeRef::Field(node) => *node,
            NodeRef::Statement(node) => *node,
        }
    }

    /// All direct children, container by container, in insertion order.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        let mut children = Vec::new();
        match self {
            NodeRef::Project(project) => {
                children.extend(project.files().map(NodeRef::File));
                children.extend(project.modules().map(NodeRef::Module));
                children.extend(project.namespaces().map(NodeRef::Namespace));
                children.extend(project.sub_projects().map(NodeRef::Project));
            }
            NodeRef::Module(module) => {
                children.extend(module.files().map(NodeRef::File));
                children.extend(module.namespaces().map(NodeRef::Namespace));
            }
            NodeRef::Namespace(namespace) => {
                children.extend(namespace.files().map(NodeRef::File));
                children.extend(namespace.namespaces().map(NodeRef::Namespace));
            }
            NodeRef::File(file) => {
                children.extend(file.types().map(NodeRef::Type));
            }
            NodeRef::Type(type_def) => {
                children.extend(type_def.methods().map(NodeRef::Method));
                children.extend(type_def.fields().map(NodeRef::Field));
            }
            NodeRef::Method(method) => {
                children.extend(method.statements().map(NodeRef::Statement));
            }
            NodeRef::Field(_) | NodeRef::Statement(_) => {}
        }
        children
    }

    pub fn shallow_clone_node(&self) -> EntityNode {
        match self {
            NodeRef::Project(node) => EntityNode::Project(node.shallow_clone()),
            NodeRef::Module(node) => EntityNode::Module(node.shallow_clone()),
            NodeRef::Namespace(node) => EntityNode::Namespace(node.shallow_clone()),
            NodeRef::File(node) => EntityNode::File(node.shallow_clone()),
            NodeRef::Type(node) => EntityNode::Type(node.shallow_clone()),
            NodeRef::Method(node) => EntityNode::Method(node.shallow_clone()),
            NodeRef::Field(node) => EntityNode::Field(node.shallow_clone()),
            NodeRef::Statement(node) => EntityNode::Statement(node.shallow_clone()),
        }
    }

    pub fn deep_clone_node(&self) -> EntityNode {
        match self {
            NodeRef::Project(node) => EntityNode::Project(node.deep_clone()),
            NodeRef::Module(node) => EntityNode::Module(node.deep_clone()),
            NodeRef::Namespace(node) => EntityNode::Namespace(node.deep_clone()),
            NodeRef::File(node) => EntityNode::File(node.deep_clone()),
            NodeRef::Type(node) => EntityNode::Type(node.deep_clone()),
            NodeRef::Method(node) => EntityNode::Method(node.deep_clone()),
            NodeRef::Field(node) => EntityNode::Field(node.deep_clone()),
            NodeRef::Statement(node) => EntityNode::Statement(node.deep_clone()),
        }
    }
}
