//! Module nodes.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::children::ChildSet;
use crate::model::entity::{CodeEntity, CoreBuilder, EntityCore, EntityKind};
use crate::model::file::SourceFile;
use crate::model::namespace::Namespace;

/// A module of a project: owns files and namespaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    #[serde(flatten)]
    pub(crate) core: EntityCore,
    #[serde(default, skip_serializing_if = "ChildSet::is_empty")]
    pub(crate) files: ChildSet<SourceFile>,
    #[serde(default, skip_serializing_if = "ChildSet::is_empty")]
    pub(crate) namespaces: ChildSet<Namespace>,
}

impl Module {
    pub fn builder(qualified_id: impl Into<String>, name: impl Into<String>) -> ModuleBuilder {
        ModuleBuilder {
            core: CoreBuilder::new(qualified_id, name),
            files: Vec::new(),
            namespaces: Vec::new(),
        }
    }

    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.iter()
    }

    pub fn file(&self, qualified_id: &str) -> Option<&SourceFile> {
        self.files.get(qualified_id)
    }

    pub fn namespace(&self, qualified_id: &str) -> Option<&Namespace> {
        self.namespaces.get(qualified_id)
    }

    pub fn add_file(&mut self, file: SourceFile) -> Result<bool, ModelError> {
        self.files.attach(&self.core, file)
    }

    pub fn add_namespace(&mut self, namespace: Namespace) -> Result<bool, ModelError> {
        self.namespaces.attach(&self.core, namespace)
    }

    pub fn remove_file(&mut self, qualified_id: &str) -> Option<SourceFile> {
        self.files.detach(qualified_id)
    }

    pub fn remove_namespace(&mut self, qualified_id: &str) -> Option<Namespace> {
        self.namespaces.detach(qualified_id)
    }

    pub fn shallow_clone(&self) -> Self {
        Self {
            core: self.core.detached_copy(),
            files: ChildSet::new(),
            namespaces: ChildSet::new(),
        }
    }

    pub fn deep_clone(&self) -> Self {
        let mut clone = self.shallow_clone();
        let parent_id = clone.core.qualified_id().to_string();
        for file in self.files.iter() {
            let mut child = file.deep_clone();
            child.core_mut().set_parent_id(Some(parent_id.clone()));
            clone.files.insert_unchecked(child);
        }
        for namespace in self.namespaces.iter() {
            let mut child = namespace.deep_clone();
            child.core_mut().set_parent_id(Some(parent_id.clone()));
            clone.namespaces.insert_unchecked(child);
        }
        clone
    }
}

impl CodeEntity for Module {
    fn kind(&self) -> EntityKind {
        EntityKind::Module
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }
}

/// Builder for [`Module`].
#[derive(Debug)]
pub struct ModuleBuilder {
    core: CoreBuilder,
    files: Vec<SourceFile>,
    namespaces: Vec<Namespace>,
}

impl ModuleBuilder {
    pub fn range(mut self, start: u32, end: u32) -> Self {
        self.core.range(start, end);
        self
    }

    pub fn metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.core.metric(name, value);
        self
    }

    pub fn file(mut self, file: SourceFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespaces.push(namespace);
        self
    }

    pub fn build(self) -> Result<Module, ModelError> {
        let mut module = Module {
            core: self.core.build()?,
            files: ChildSet::new(),
            namespaces: ChildSet::new(),
        };
        for file in self.files {
            module.add_file(file)?;
        }
        for namespace in self.namespaces {
            module.add_namespace(namespace)?;
        }
        Ok(module)
    }
}
