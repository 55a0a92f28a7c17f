// codetree - in-memory model of the static structure of a codebase
//
// The model is a typed, line-range-addressable tree: a project owns files,
// modules, namespaces, and sub-projects; files own types; types own
// methods and fields; methods own statements. Every node carries a
// globally unique qualified id, an optional 1-based line range, a numeric
// metric map, and a weak (id-only) parent back-reference.
//
// On top of the model sit two algorithms:
// - merge (`update`): identity-matched, additive reconciliation of a new
//   snapshot into an existing tree
// - extraction (`extract_subtree`): rebuilding a minimal tree from the
//   root-to-node ancestor path (shallow) plus the node's subtree (deep)
//
// Parsing front ends, persistence, and metric computation are external
// collaborators; they populate the tree through the per-kind builders and
// exchange it through the JSON codec.

// The entity model: node kinds, ranges, metrics, builders
pub mod model;

// Tree ownership, lookup, merge, and extraction
pub mod tree;

// JSON boundary
pub mod codec;

// Error taxonomy
pub mod error;

pub use error::{CodecError, ModelError};
pub use model::{
    ids, ChildSet, CodeEntity, EntityCore, EntityKind, EntityNode, Field, FieldBuilder,
    LineRange, Method, MethodBuilder, MetricMap, Module, ModuleBuilder, Namespace,
    NamespaceBuilder, NodeRef, Parameter, Project, ProjectBuilder, SourceFile,
    SourceFileBuilder, Statement, StatementBuilder, StatementKind, TypeDef, TypeDefBuilder,
};
pub use tree::{CodeTree, Reconcile};
