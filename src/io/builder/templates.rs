//! Templates: the unresolved handle fields of one ingested object.
//!
//! The object itself is registered as soon as it is read; everything it
//! points at stays here as raw handles until the resolution pass runs.

use crate::types::Handle;

/// Links carried by every graphical entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityLinks {
    /// Next entity of the owner's linked chain, if the source has one
    pub next_entity: Option<Handle>,
    /// Entity lives in paper space (group code 67); used when no owner is given
    pub paper_space: bool,
}

/// Unresolved fields of a block record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockRecordLinks {
    /// First entity of a linked chain
    pub first_entity: Option<Handle>,
    /// Last entity of a linked chain
    pub last_entity: Option<Handle>,
    /// Explicit list of owned entities, used when there is no chain
    pub owned_objects: Vec<Handle>,
    pub layout: Option<Handle>,
    /// BLOCK marker
    pub block_entity: Option<Handle>,
    /// ENDBLK marker
    pub block_end: Option<Handle>,
}

impl BlockRecordLinks {
    /// Whether members come from the linked chain instead of the list.
    pub fn has_chain(&self) -> bool {
        self.first_entity.is_some() && self.last_entity.is_some()
    }
}

/// Type-specific part of a template.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateData {
    /// Any entity without further references
    Entity(EntityLinks),
    /// Block reference; the block is found by handle, else by name
    Insert {
        links: EntityLinks,
        block_record: Option<Handle>,
    },
    /// BLOCK or ENDBLK marker
    BlockMarker,
    BlockRecord(BlockRecordLinks),
    /// Dictionary entries in input order, plus the default entry of an
    /// `ACDBDICTIONARYWDFLT`
    Dictionary {
        entries: Vec<(String, Handle)>,
        default_entry: Option<Handle>,
    },
    Layout {
        block_record: Option<Handle>,
        viewport: Option<Handle>,
    },
    Group { entities: Vec<Handle> },
    /// Sorted block record and `(entity, sort handle)` pairs
    SortEntitiesTable {
        block_owner: Option<Handle>,
        sorters: Vec<(Handle, Handle)>,
    },
    /// Nothing to resolve beyond the owner
    Plain,
}

impl TemplateData {
    pub fn entity_links(&self) -> Option<&EntityLinks> {
        match self {
            TemplateData::Entity(links) | TemplateData::Insert { links, .. } => Some(links),
            _ => None,
        }
    }
}

/// One ingested object awaiting resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct CadTemplate {
    /// Handle of the object; null until a missing handle is assigned
    pub handle: Handle,
    /// Owner handle as read
    pub owner_handle: Option<Handle>,
    pub data: TemplateData,
}

impl CadTemplate {
    pub fn new(handle: Handle, owner_handle: Option<Handle>, data: TemplateData) -> Self {
        Self {
            handle,
            owner_handle,
            data,
        }
    }

    pub fn block_record_links(&self) -> Option<&BlockRecordLinks> {
        match &self.data {
            TemplateData::BlockRecord(links) => Some(links),
            _ => None,
        }
    }

    pub fn block_record_links_mut(&mut self) -> Option<&mut BlockRecordLinks> {
        match &mut self.data {
            TemplateData::BlockRecord(links) => Some(links),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_requires_both_ends() {
        let mut links = BlockRecordLinks::default();
        assert!(!links.has_chain());
        links.first_entity = Some(Handle::new(0x20));
        assert!(!links.has_chain());
        links.last_entity = Some(Handle::new(0x22));
        assert!(links.has_chain());
    }

    #[test]
    fn test_entity_links_access() {
        let insert = TemplateData::Insert {
            links: EntityLinks {
                next_entity: None,
                paper_space: true,
            },
            block_record: None,
        };
        assert!(insert.entity_links().is_some_and(|l| l.paper_space));
        assert!(TemplateData::BlockMarker.entity_links().is_none());
    }
}
