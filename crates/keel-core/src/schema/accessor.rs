use crate::{stmt::Value, Result};

/// Reads and writes one field of one entity type.
///
/// Built once per field by the entity descriptor and reused for every row,
/// so the per-column cost is a single indirect call.
pub struct FieldAccessor<E> {
    get: fn(&E) -> Result<Value>,
    set: fn(&mut E, Value) -> Result<()>,
}

impl<E> FieldAccessor<E> {
    pub const fn new(get: fn(&E) -> Result<Value>, set: fn(&mut E, Value) -> Result<()>) -> Self {
        Self { get, set }
    }

    /// Reads the field from `instance`.
    #[inline]
    pub fn get(&self, instance: &E) -> Result<Value> {
        (self.get)(instance)
    }

    /// Writes `value` into the field of `instance`.
    #[inline]
    pub fn set(&self, instance: &mut E, value: Value) -> Result<()> {
        (self.set)(instance, value)
    }
}

impl<E> Clone for FieldAccessor<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for FieldAccessor<E> {}

impl<E> core::fmt::Debug for FieldAccessor<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FieldAccessor").finish_non_exhaustive()
    }
}
