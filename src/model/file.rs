//! Source file nodes.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::children::ChildSet;
use crate::model::entity::{CodeEntity, CoreBuilder, EntityCore, EntityKind};
use crate::model::typedef::TypeDef;

/// A source file: owns its types and an ordered set of import strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    #[serde(flatten)]
    pub(crate) core: EntityCore,
    /// Length of the file in lines.
    #[serde(default)]
    pub(crate) length: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) imports: Vec<String>,
    #[serde(default, skip_serializing_if = "ChildSet::is_empty")]
    pub(crate) types: ChildSet<TypeDef>,
}

impl SourceFile {
    pub fn builder(qualified_id: impl Into<String>, name: impl Into<String>) -> SourceFileBuilder {
        SourceFileBuilder {
            core: CoreBuilder::new(qualified_id, name),
            length: 0,
            imports: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.iter()
    }

    pub fn type_def(&self, qualified_id: &str) -> Option<&TypeDef> {
        self.types.get(qualified_id)
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Idempotent insert; re-adding an import string is a no-op.
    pub fn add_import(&mut self, import: impl Into<String>) -> bool {
        let import = import.into();
        if self.imports.contains(&import) {
            return false;
        }
        self.imports.push(import);
        true
    }

    /// Idempotent insert keyed by the type's qualified id.
    pub fn add_type(&mut self, type_def: TypeDef) -> Result<bool, ModelError> {
        self.types.attach(&self.core, type_def)
    }

    pub fn remove_type(&mut self, qualified_id: &str) -> Option<TypeDef> {
        self.types.detach(qualified_id)
    }

    /// Identity, length, range, and metrics; no types, no imports.
    pub fn shallow_clone(&self) -> Self {
        Self {
            core: self.core.detached_copy(),
            length: self.length,
            imports: Vec::new(),
            types: ChildSet::new(),
        }
    }

    pub fn deep_clone(&self) -> Self {
        let mut clone = self.shallow_clone();
        clone.imports = self.imports.clone();
        let parent_id = clone.core.qualified_id().to_string();
        for type_def in self.types.iter() {
            let mut child = type_def.deep_clone();
            child.core_mut().set_parent_id(Some(parent_id.clone()));
            clone.types.insert_unchecked(child);
        }
        clone
    }
}

impl CodeEntity for SourceFile {
    fn kind(&self) -> EntityKind {
        EntityKind::File
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }
}

/// Builder for [`SourceFile`].
#[derive(Debug)]
pub struct SourceFileBuilder {
    core: CoreBuilder,
    length: u32,
    imports: Vec<String>,
    types: Vec<TypeDef>,
}

impl SourceFileBuilder {
    pub fn range(mut self, start: u32, end: u32) -> Self {
        self.core.range(start, end);
        self
    }

    pub fn metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.core.metric(name, value);
        self
    }

    pub fn length(mut self, lines: u32) -> Self {
        self.length = lines;
        self
    }

    pub fn import(mut self, import: impl Into<String>) -> Self {
        self.imports.push(import.into());
        self
    }

    pub fn type_def(mut self, type_def: TypeDef) -> Self {
        self.types.push(type_def);
        self
    }

    pub fn build(mut self) -> Result<SourceFile, ModelError> {
        // A file with a known length but no explicit range defaults to the
        // full-file extent.
        if !self.core.has_range() && self.length >= 1 {
            self.core.range(1, self.length);
        }
        let mut file = SourceFile {
            core: self.core.build()?,
            length: self.length,
            imports: Vec::new(),
            types: ChildSet::new(),
        };
        for import in self.imports {
            file.add_import(import);
        }
        for type_def in self.types {
            file.add_type(type_def)?;
        }
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_defaults_the_full_file_range() {
        let file = SourceFile::builder("P:/a.java", "a.java")
            .length(120)
            .build()
            .unwrap();
        let range = file.range().unwrap();
        assert_eq!((range.start(), range.end()), (1, 120));
    }

    #[test]
    fn zero_length_file_stays_rangeless() {
        let file = SourceFile::builder("P:/empty.java", "empty.java")
            .build()
            .unwrap();
        assert!(file.range().is_none());
    }

    #[test]
    fn imports_are_idempotent() {
        let mut file = SourceFile::builder("P:/a.java", "a.java").build().unwrap();
        assert!(file.add_import("java.util.List"));
        assert!(!file.add_import("java.util.List"));
        assert_eq!(file.imports(), ["java.util.List"]);
    }

    #[test]
    fn type_escaping_file_range_is_rejected() {
        let oversized = TypeDef::builder("P:/a.java:A", "A")
            .range(1, 200)
            .build()
            .unwrap();
        let result = SourceFile::builder("P:/a.java", "a.java")
            .length(120)
            .type_def(oversized)
            .build();
        assert!(matches!(result, Err(ModelError::OutOfRange { .. })));
    }

    #[test]
    fn shallow_clone_drops_types_and_imports_but_keeps_length() {
        let file = SourceFile::builder("P:/a.java", "a.java")
            .length(120)
            .import("java.util.List")
            .type_def(TypeDef::builder("P:/a.java:A", "A").range(1, 50).build().unwrap())
            .build()
            .unwrap();

        let clone = file.shallow_clone();
        assert_eq!(clone.length(), 120);
        assert_eq!(clone.type_count(), 0);
        assert!(clone.imports().is_empty());
        assert_eq!(file.type_count(), 1, "source untouched");
    }
}
