use crate::{model::entity::EntityDescriptor, traits::Entity};
use std::{any::TypeId, collections::HashMap, sync::Arc};
use thiserror::Error as ThisError;

///
/// RegistryError
///

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("type is not mapped: {path}")]
    Unmapped { path: &'static str },
}

///
/// Registry
///
/// The committed descriptor set. Built atomically by the metadata builder;
/// never mutated afterwards, so concurrent unsynchronized reads are safe.
///

#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: HashMap<TypeId, Arc<EntityDescriptor>>,
}

impl Registry {
    pub(crate) fn commit(descriptors: Vec<EntityDescriptor>) -> Self {
        let entries = descriptors
            .into_iter()
            .map(|desc| (desc.type_id, Arc::new(desc)))
            .collect();

        Self { entries }
    }

    /// Look up the descriptor for a mapped entity type.
    pub fn descriptor<E: Entity>(&self) -> Result<Arc<EntityDescriptor>, RegistryError> {
        self.entries
            .get(&TypeId::of::<E>())
            .cloned()
            .ok_or(RegistryError::Unmapped { path: E::PATH })
    }

    #[must_use]
    pub fn get(&self, id: TypeId) -> Option<&Arc<EntityDescriptor>> {
        self.entries.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<EntityDescriptor>> {
        self.entries.values()
    }
}
