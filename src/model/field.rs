//! Field nodes.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::entity::{CodeEntity, CoreBuilder, EntityCore, EntityKind};

/// A field of a type. Carries only the shared attribute block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(flatten)]
    pub(crate) core: EntityCore,
}

impl Field {
    pub fn builder(qualified_id: impl Into<String>, name: impl Into<String>) -> FieldBuilder {
        FieldBuilder {
            core: CoreBuilder::new(qualified_id, name),
        }
    }

    pub fn shallow_clone(&self) -> Self {
        Self {
            core: self.core.detached_copy(),
        }
    }

    pub fn deep_clone(&self) -> Self {
        self.shallow_clone()
    }
}

impl CodeEntity for Field {
    fn kind(&self) -> EntityKind {
        EntityKind::Field
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }
}

/// Builder for [`Field`].
#[derive(Debug)]
pub struct FieldBuilder {
    core: CoreBuilder,
}

impl FieldBuilder {
    pub fn range(mut self, start: u32, end: u32) -> Self {
        self.core.range(start, end);
        self
    }

    pub fn metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.core.metric(name, value);
        self
    }

    pub fn build(self) -> Result<Field, ModelError> {
        Ok(Field {
            core: self.core.build()?,
        })
    }
}
