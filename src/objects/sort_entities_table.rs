//! Sort entities table - draw order overrides for one block record

use crate::cad_object::ObjectCommon;
use crate::types::Handle;

/// One draw order override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sorter {
    /// Entity being reordered (331)
    pub entity: Handle,
    /// Sort key used instead of the entity's own handle (5)
    pub sort_handle: Handle,
}

/// SORTENTSTABLE object.
///
/// `block_owner` and every sorter entity are reference edges.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SortEntitiesTable {
    pub common: ObjectCommon,
    /// Block record whose entities are sorted (330 after the subclass marker)
    pub block_owner: Option<Handle>,
    pub sorters: Vec<Sorter>,
}

impl SortEntitiesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sort key of an entity, replacing an existing one.
    pub fn set_sort_handle(&mut self, entity: Handle, sort_handle: Handle) {
        match self.sorters.iter_mut().find(|s| s.entity == entity) {
            Some(sorter) => sorter.sort_handle = sort_handle,
            None => self.sorters.push(Sorter {
                entity,
                sort_handle,
            }),
        }
    }

    /// Sort key of an entity; entities without an override sort by handle.
    pub fn sort_handle(&self, entity: Handle) -> Handle {
        self.sorters
            .iter()
            .find(|s| s.entity == entity)
            .map_or(entity, |s| s.sort_handle)
    }
}
