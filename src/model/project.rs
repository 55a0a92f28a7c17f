//! Project nodes, the roots of the tree.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::children::ChildSet;
use crate::model::entity::{CodeEntity, CoreBuilder, EntityCore, EntityKind};
use crate::model::file::SourceFile;
use crate::model::module::Module;
use crate::model::namespace::Namespace;

/// A project: owns files, modules, namespaces, and sub-projects. The tree
/// root is the one project whose `parent_id` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(flatten)]
    pub(crate) core: EntityCore,
    #[serde(default, skip_serializing_if = "ChildSet::is_empty")]
    pub(crate) files: ChildSet<SourceFile>,
    #[serde(default, skip_serializing_if = "ChildSet::is_empty")]
    pub(crate) modules: ChildSet<Module>,
    #[serde(default, skip_serializing_if = "ChildSet::is_empty")]
    pub(crate) namespaces: ChildSet<Namespace>,
    #[serde(default, skip_serializing_if = "ChildSet::is_empty")]
    pub(crate) projects: ChildSet<Project>,
}

impl Project {
    pub fn builder(qualified_id: impl Into<String>, name: impl Into<String>) -> ProjectBuilder {
        ProjectBuilder {
            core: CoreBuilder::new(qualified_id, name),
            files: Vec::new(),
            modules: Vec::new(),
            namespaces: Vec::new(),
            projects: Vec::new(),
        }
    }

    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.iter()
    }

    pub fn sub_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter()
    }

    pub fn file(&self, qualified_id: &str) -> Option<&SourceFile> {
        self.files.get(qualified_id)
    }

    pub fn module(&self, qualified_id: &str) -> Option<&Module> {
        self.modules.get(qualified_id)
    }

    pub fn namespace(&self, qualified_id: &str) -> Option<&Namespace> {
        self.namespaces.get(qualified_id)
    }

    pub fn sub_project(&self, qualified_id: &str) -> Option<&Project> {
        self.projects.get(qualified_id)
    }

    pub fn add_file(&mut self, file: SourceFile) -> Result<bool, ModelError> {
        self.files.attach(&self.core, file)
    }

    pub fn add_module(&mut self, module: Module) -> Result<bool, ModelError> {
        self.modules.attach(&self.core, module)
    }

    pub fn add_namespace(&mut self, namespace: Namespace) -> Result<bool, ModelError> {
        self.namespaces.attach(&self.core, namespace)
    }

    pub fn add_sub_project(&mut self, project: Project) -> Result<bool, ModelError> {
        self.projects.attach(&self.core, project)
    }

    pub fn remove_file(&mut self, qualified_id: &str) -> Option<SourceFile> {
        self.files.detach(qualified_id)
    }

    pub fn remove_module(&mut self, qualified_id: &str) -> Option<Module> {
        self.modules.detach(qualified_id)
    }

    pub fn remove_namespace(&mut self, qualified_id: &str) -> Option<Namespace> {
        self.namespaces.detach(qualified_id)
    }

    pub fn remove_sub_project(&mut self, qualified_id: &str) -> Option<Project> {
        self.projects.detach(qualified_id)
    }

    pub fn shallow_clone(&self) -> Self {
        Self {
            core: self.core.detached_copy(),
            files: ChildSet::new(),
            modules: ChildSet::new(),
            namespaces: ChildSet::new(),
            projects: ChildSet::new(),
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
        for module in self.modules.iter() {
            let mut child = module.deep_clone();
            child.core_mut().set_parent_id(Some(parent_id.clone()));
            clone.modules.insert_unchecked(child);
        }
        for namespace in self.namespaces.iter() {
            let mut child = namespace.deep_clone();
            child.core_mut().set_parent_id(Some(parent_id.clone()));
            clone.namespaces.insert_unchecked(child);
        }
        for project in self.projects.iter() {
            let mut child = project.deep_clone();
            child.core_mut().set_parent_id(Some(parent_id.clone()));
            clone.projects.insert_unchecked(child);
        }
        clone
    }
}

impl CodeEntity for Project {
    fn kind(&self) -> EntityKind {
        EntityKind::Project
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }
}

/// Builder for [`Project`].
#[derive(Debug)]
pub struct ProjectBuilder {
    core: CoreBuilder,
    files: Vec<SourceFile>,
    modules: Vec<Module>,
    namespaces: Vec<Namespace>,
    projects: Vec<Project>,
}

impl ProjectBuilder {
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

    pub fn module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespaces.push(namespace);
        self
    }

    pub fn sub_project(mut self, project: Project) -> Self {
        self.projects.push(project);
        self
    }

    pub fn build(self) -> Result<Project, ModelError> {
        let mut project = Project {
            core: self.core.build()?,
            files: ChildSet::new(),
            modules: ChildSet::new(),
            namespaces: ChildSet::new(),
            projects: ChildSet::new(),
        };
        for file in self.files {
            project.add_file(file)?;
        }
        for module in self.modules {
            project.add_module(module)?;
        }
        for namespace in self.namespaces {
            project.add_namespace(namespace)?;
        }
        for sub in self.projects {
            project.add_sub_project(sub)?;
        }
        Ok(project)
    }
}
