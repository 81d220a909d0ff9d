//! Handle registry used for the duration of one document build.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::cad_object::{CadObject, ObjectVariant};
use crate::error::{DxfError, Result};
use crate::types::Handle;

/// Maps handles to the objects read so far.
///
/// Registration order is kept and becomes the arena order of the built
/// document. Lookups never fail loudly: a missing handle and a handle of the
/// wrong kind both answer `None`.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    objects: IndexMap<Handle, CadObject>,
    /// Handles in use by records that are not materialized (TABLE headers)
    reserved: HashSet<Handle>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handle` to `object`.
    ///
    /// Fails with [`DxfError::DuplicateHandle`] when the handle is already
    /// bound or reserved.
    pub fn register(&mut self, handle: Handle, object: CadObject) -> Result<()> {
        if self.is_taken(handle) {
            return Err(DxfError::DuplicateHandle(handle));
        }
        self.objects.insert(handle, object);
        Ok(())
    }

    /// Claim a handle for a record that is never materialized.
    pub fn reserve(&mut self, handle: Handle) -> Result<()> {
        if self.is_taken(handle) {
            return Err(DxfError::DuplicateHandle(handle));
        }
        self.reserved.insert(handle);
        Ok(())
    }

    fn is_taken(&self, handle: Handle) -> bool {
        self.objects.contains_key(&handle) || self.reserved.contains(&handle)
    }

    pub fn is_reserved(&self, handle: Handle) -> bool {
        self.reserved.contains(&handle)
    }

    pub fn lookup<T: ObjectVariant>(&self, handle: Handle) -> Option<&T> {
        self.objects.get(&handle).and_then(T::from_object)
    }

    pub fn lookup_mut<T: ObjectVariant>(&mut self, handle: Handle) -> Option<&mut T> {
        self.objects.get_mut(&handle).and_then(T::from_object_mut)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.objects.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Highest handle registered or reserved
    pub fn max_handle(&self) -> Handle {
        self.objects
            .keys()
            .chain(self.reserved.iter())
            .copied()
            .max()
            .unwrap_or(Handle::NULL)
    }

    pub fn remove(&mut self, handle: Handle) -> Option<CadObject> {
        self.objects.shift_remove(&handle)
    }

    /// Handles in registration order
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.objects.keys().copied()
    }

    /// Consume the registry into its arena.
    pub fn into_objects(self) -> IndexMap<Handle, CadObject> {
        self.objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EntityType, Line};
    use crate::objects::{CadDictionary, ObjectType};

    fn line(handle: u64) -> CadObject {
        let mut line = Line::new();
        line.common.handle = Handle::new(handle);
        CadObject::Entity(EntityType::Line(line))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = HandleRegistry::new();
        registry.register(Handle::new(0x10), line(0x10)).unwrap();

        assert!(registry.lookup::<Line>(Handle::new(0x10)).is_some());
        assert!(registry.lookup::<EntityType>(Handle::new(0x10)).is_some());
        assert!(registry.lookup::<CadDictionary>(Handle::new(0x10)).is_none());
        assert!(registry.lookup::<Line>(Handle::new(0x11)).is_none());
    }

    #[test]
    fn test_duplicate_handle_is_rejected() {
        let mut registry = HandleRegistry::new();
        registry.register(Handle::new(0x10), line(0x10)).unwrap();
        let err = registry.register(Handle::new(0x10), line(0x10)).unwrap_err();
        assert!(matches!(err, DxfError::DuplicateHandle(h) if h == Handle::new(0x10)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reserved_handles() {
        let mut registry = HandleRegistry::new();
        registry.reserve(Handle::new(2)).unwrap();
        assert!(registry.is_reserved(Handle::new(2)));
        assert!(!registry.contains(Handle::new(2)));
        assert!(registry.register(Handle::new(2), line(2)).is_err());
        assert_eq!(registry.max_handle(), Handle::new(2));
    }

    #[test]
    fn test_registration_order_is_kept() {
        let mut registry = HandleRegistry::new();
        registry.register(Handle::new(0x30), line(0x30)).unwrap();
        registry
            .register(
                Handle::new(0x05),
                CadObject::Object(ObjectType::Dictionary(CadDictionary::new())),
            )
            .unwrap();
        registry.register(Handle::new(0x20), line(0x20)).unwrap();

        let order: Vec<u64> = registry.handles().map(|h| h.value()).collect();
        assert_eq!(order, vec![0x30, 0x05, 0x20]);
        assert_eq!(registry.max_handle(), Handle::new(0x30));
    }
}
