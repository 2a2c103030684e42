use super::{Entity, EntityMetadata};
use crate::{err, Result};

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};
use tracing::debug;

type Slot = Arc<OnceLock<Result<Arc<dyn Any + Send + Sync>>>>;

/// Owned cache of entity metadata, keyed by entity type.
///
/// Metadata for a type is computed at most once, even when several threads
/// ask for it at the same time. The map lock is only held while fetching
/// the per-type slot; the computation itself runs under the slot's
/// `OnceLock`, so building one type never blocks lookups of another.
/// Failures are cached too: a malformed entity fails the same way on every
/// request.
#[derive(Default)]
pub struct Registry {
    slots: Mutex<HashMap<TypeId, Slot>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the metadata for `E`, computing it on first use.
    pub fn metadata<E: Entity>(&self) -> Result<Arc<EntityMetadata<E>>> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.entry(TypeId::of::<E>()).or_default().clone()
        };

        let entry = slot.get_or_init(|| {
            let metadata = EntityMetadata::<E>::build()?;
            debug!(
                entity = metadata.entity_name(),
                columns = metadata.column_count(),
                indexes = metadata.indexes().len(),
                "built entity metadata"
            );
            Ok(Arc::new(metadata) as Arc<dyn Any + Send + Sync>)
        });

        match entry {
            Ok(metadata) => metadata
                .clone()
                .downcast::<EntityMetadata<E>>()
                .map_err(|_| err!("metadata cached under a mismatched type")),
            Err(err) => Err(err.clone()),
        }
    }

    /// Number of entity types looked up so far.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("entities", &self.len())
            .finish()
    }
}
