//! The closed set of persistable objects and typed lookup over it.
//!
//! Every object in a document is stored as a [`CadObject`] in a handle-keyed
//! arena. Relationships between objects are plain [`Handle`] values; typed
//! access goes through [`ObjectVariant`], which answers `None` for a handle
//! that points at the wrong kind of object instead of failing.

use crate::entities::{
    Block, BlockEnd, Circle, EntityType, Insert, Line, Point, Text, Viewport,
};
use crate::objects::{
    CadDictionary, DictionaryVariable, Group, Layout, ObjectType, OpaqueObject, PageSetup, Scale,
    SortEntitiesTable, UnknownObject, XRecord,
};
use crate::tables::{BlockRecord, Layer, TableEntryType};
use crate::types::Handle;
use crate::xdata::ExtendedData;

/// Data shared by every non-graphical object and table entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectCommon {
    pub handle: Handle,
    /// Container responsible for this object's membership
    pub owner: Option<Handle>,
    pub extended_data: ExtendedData,
}

impl ObjectCommon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle,
            ..Self::default()
        }
    }
}

/// Any object that can live in a document.
#[derive(Debug, Clone, PartialEq)]
pub enum CadObject {
    /// Graphical entity or block begin/end marker
    Entity(EntityType),
    /// Named entry of a symbol table
    TableEntry(TableEntryType),
    /// Non-graphical object, normally reached through a dictionary
    Object(ObjectType),
}

impl CadObject {
    pub fn handle(&self) -> Handle {
        match self {
            CadObject::Entity(e) => e.as_entity().common().handle,
            CadObject::TableEntry(t) => t.common().handle,
            CadObject::Object(o) => o.common().handle,
        }
    }

    pub fn set_handle(&mut self, handle: Handle) {
        match self {
            CadObject::Entity(e) => e.as_entity_mut().common_mut().handle = handle,
            CadObject::TableEntry(t) => t.common_mut().handle = handle,
            CadObject::Object(o) => o.common_mut().handle = handle,
        }
    }

    pub fn owner(&self) -> Option<Handle> {
        match self {
            CadObject::Entity(e) => e.as_entity().common().owner,
            CadObject::TableEntry(t) => t.common().owner,
            CadObject::Object(o) => o.common().owner,
        }
    }

    pub fn set_owner(&mut self, owner: Option<Handle>) {
        match self {
            CadObject::Entity(e) => e.as_entity_mut().common_mut().owner = owner,
            CadObject::TableEntry(t) => t.common_mut().owner = owner,
            CadObject::Object(o) => o.common_mut().owner = owner,
        }
    }

    pub fn extended_data(&self) -> &ExtendedData {
        match self {
            CadObject::Entity(e) => &e.as_entity().common().extended_data,
            CadObject::TableEntry(t) => &t.common().extended_data,
            CadObject::Object(o) => &o.common().extended_data,
        }
    }

    /// DXF type name, e.g. `LINE`, `BLOCK_RECORD` or `DICTIONARY`.
    pub fn object_name(&self) -> &str {
        match self {
            CadObject::Entity(e) => e.as_entity().entity_type(),
            CadObject::TableEntry(t) => t.object_name(),
            CadObject::Object(o) => o.object_name(),
        }
    }

    /// Handles of objects this one owns.
    ///
    /// Only ownership edges are reported; references such as a layout's
    /// block record or a group's members are not.
    pub fn owned_handles(&self) -> Vec<Handle> {
        match self {
            CadObject::TableEntry(TableEntryType::BlockRecord(record)) => record
                .entities
                .iter()
                .chain(record.viewports.iter())
                .copied()
                .collect(),
            CadObject::Object(ObjectType::Dictionary(dictionary)) => {
                dictionary.handles().collect()
            }
            _ => Vec::new(),
        }
    }
}

impl From<EntityType> for CadObject {
    fn from(entity: EntityType) -> Self {
        CadObject::Entity(entity)
    }
}

impl From<TableEntryType> for CadObject {
    fn from(entry: TableEntryType) -> Self {
        CadObject::TableEntry(entry)
    }
}

impl From<ObjectType> for CadObject {
    fn from(object: ObjectType) -> Self {
        CadObject::Object(object)
    }
}

/// Typed view into a [`CadObject`].
///
/// Implemented for the three variant enums and for every concrete object
/// struct, so lookups can ask for exactly the capability they need:
///
/// ```rust,ignore
/// let record: Option<&BlockRecord> = document.get::<BlockRecord>(handle);
/// let any_entity: Option<&EntityType> = document.get::<EntityType>(handle);
/// ```
pub trait ObjectVariant {
    fn from_object(object: &CadObject) -> Option<&Self>;
    fn from_object_mut(object: &mut CadObject) -> Option<&mut Self>;
}

impl ObjectVariant for CadObject {
    fn from_object(object: &CadObject) -> Option<&Self> {
        Some(object)
    }

    fn from_object_mut(object: &mut CadObject) -> Option<&mut Self> {
        Some(object)
    }
}

macro_rules! impl_enum_variant {
    ($ty:ident, $outer:ident) => {
        impl ObjectVariant for $ty {
            fn from_object(object: &CadObject) -> Option<&Self> {
                match object {
                    CadObject::$outer(value) => Some(value),
                    _ => None,
                }
            }

            fn from_object_mut(object: &mut CadObject) -> Option<&mut Self> {
                match object {
                    CadObject::$outer(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

macro_rules! impl_struct_variant {
    ($ty:ident, $outer:ident, $inner:ident :: $variant:ident) => {
        impl ObjectVariant for $ty {
            fn from_object(object: &CadObject) -> Option<&Self> {
                match object {
                    CadObject::$outer($inner::$variant(value)) => Some(value),
                    _ => None,
                }
            }

            fn from_object_mut(object: &mut CadObject) -> Option<&mut Self> {
                match object {
                    CadObject::$outer($inner::$variant(value)) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

impl_enum_variant!(EntityType, Entity);
impl_enum_variant!(TableEntryType, TableEntry);
impl_enum_variant!(ObjectType, Object);

impl_struct_variant!(Point, Entity, EntityType::Point);
impl_struct_variant!(Line, Entity, EntityType::Line);
impl_struct_variant!(Circle, Entity, EntityType::Circle);
impl_struct_variant!(Text, Entity, EntityType::Text);
impl_struct_variant!(Insert, Entity, EntityType::Insert);
impl_struct_variant!(Viewport, Entity, EntityType::Viewport);
impl_struct_variant!(Block, Entity, EntityType::Block);
impl_struct_variant!(BlockEnd, Entity, EntityType::BlockEnd);

impl_struct_variant!(BlockRecord, TableEntry, TableEntryType::BlockRecord);
impl_struct_variant!(Layer, TableEntry, TableEntryType::Layer);

impl_struct_variant!(CadDictionary, Object, ObjectType::Dictionary);
impl_struct_variant!(Layout, Object, ObjectType::Layout);
impl_struct_variant!(XRecord, Object, ObjectType::XRecord);
impl_struct_variant!(Group, Object, ObjectType::Group);
impl_struct_variant!(Scale, Object, ObjectType::Scale);
impl_struct_variant!(DictionaryVariable, Object, ObjectType::DictionaryVariable);
impl_struct_variant!(PageSetup, Object, ObjectType::PageSetup);
impl_struct_variant!(SortEntitiesTable, Object, ObjectType::SortEntitiesTable);
impl_struct_variant!(UnknownObject, Object, ObjectType::Unknown);

impl ObjectVariant for OpaqueObject {
    fn from_object(object: &CadObject) -> Option<&Self> {
        match object {
            CadObject::Object(o) => o.as_opaque(),
            _ => None,
        }
    }

    fn from_object_mut(object: &mut CadObject) -> Option<&mut Self> {
        match object {
            CadObject::Object(o) => o.as_opaque_mut(),
            _ => None,
        }
    }
}
