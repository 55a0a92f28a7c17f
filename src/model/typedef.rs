//! Type nodes: classes, interfaces, and their members.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::children::ChildSet;
use crate::model::entity::{CodeEntity, CoreBuilder, EntityCore, EntityKind};
use crate::model::field::Field;
use crate::model::method::Method;

/// A type declared in a file, owning its methods and fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    #[serde(flatten)]
    pub(crate) core: EntityCore,
    #[serde(default)]
    pub(crate) is_interface: bool,
    #[serde(default)]
    pub(crate) is_abstract: bool,
    #[serde(default, skip_serializing_if = "ChildSet::is_empty")]
    pub(crate) methods: ChildSet<Method>,
    #[serde(default, skip_serializing_if = "ChildSet::is_empty")]
    pub(crate) fields: ChildSet<Field>,
}

impl TypeDef {
    pub fn builder(qualified_id: impl Into<String>, name: impl Into<String>) -> TypeDefBuilder {
        TypeDefBuilder {
            core: CoreBuilder::new(qualified_id, name),
            is_interface: false,
            is_abstract: false,
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.is_interface
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn method(&self, qualified_id: &str) -> Option<&Method> {
        self.methods.get(qualified_id)
    }

    pub fn field(&self, qualified_id: &str) -> Option<&Field> {
        self.fields.get(qualified_id)
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Idempotent insert keyed by the method's qualified id.
    pub fn add_method(&mut self, method: Method) -> Result<bool, ModelError> {
        self.methods.attach(&self.core, method)
    }

    /// Idempotent insert keyed by the field's qualified id.
    pub fn add_field(&mut self, field: Field) -> Result<bool, ModelError> {
        self.fields.attach(&self.core, field)
    }

    pub fn remove_method(&mut self, qualified_id: &str) -> Option<Method> {
        self.methods.detach(qualified_id)
    }

    pub fn remove_field(&mut self, qualified_id: &str) -> Option<Field> {
        self.fields.detach(qualified_id)
    }

    pub fn shallow_clone(&self) -> Self {
        Self {
            core: self.core.detached_copy(),
            is_interface: self.is_interface,
            is_abstract: self.is_abstract,
            methods: ChildSet::new(),
            fields: ChildSet::new(),
        }
    }

    pub fn deep_clone(&self) -> Self {
        let mut clone = self.shallow_clone();
        let parent_id = clone.core.qualified_id().to_string();
        for method in self.methods.iter() {
            let mut child = method.deep_clone();
            child.core_mut().set_parent_id(Some(parent_id.clone()));
            clone.methods.insert_unchecked(child);
        }
        for field in self.fields.iter() {
            let mut child = field.deep_clone();
            child.core_mut().set_parent_id(Some(parent_id.clone()));
            clone.fields.insert_unchecked(child);
        }
        clone
    }
}

impl CodeEntity for TypeDef {
    fn kind(&self) -> EntityKind {
        EntityKind::Type
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }
}

/// Builder for [`TypeDef`].
#[derive(Debug)]
pub struct TypeDefBuilder {
    core: CoreBuilder,
    is_interface: bool,
    is_abstract: bool,
    methods: Vec<Method>,
    fields: Vec<Field>,
}

impl TypeDefBuilder {
    pub fn range(mut self, start: u32, end: u32) -> Self {
        self.core.range(start, end);
        self
    }

    pub fn metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.core.metric(name, value);
        self
    }

    pub fn interface(mut self) -> Self {
        self.is_interface = true;
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<TypeDef, ModelError> {
        let mut type_def = TypeDef {
            core: self.core.build()?,
            is_interface: self.is_interface,
            is_abstract: self.is_abstract,
            methods: ChildSet::new(),
            fields: ChildSet::new(),
        };
        for method in self.methods {
            type_def.add_method(method)?;
        }
        for field in self.fields {
            type_def.add_field(field)?;
        }
        Ok(type_def)
    }
}
