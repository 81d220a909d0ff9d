//! CAD document structure
//!
//! A [`CadDocument`] is the resolved object graph: an arena of
//! [`CadObject`]s keyed by handle. Ownership edges (`owner` on every object,
//! mirrored by the container collections) form a tree; every other handle
//! field is a plain reference and is never followed for removal.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;

use crate::cad_object::{CadObject, ObjectVariant};
use crate::entities::EntityType;
use crate::error::{DxfError, Result};
use crate::notification::{
    DiagnosticsSink, Notification, NotificationCollection, NotificationType,
};
use crate::objects::{CadDictionary, Group, Layout, ObjectType};
use crate::tables::{BlockRecord, Layer, Table, TableEntryType};
use crate::types::Handle;

/// Header variables carried through a read/write cycle
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderVariables {
    /// $ACADVER as read; the writer always emits `AC1032`
    pub version: String,
    /// $DWGCODEPAGE
    pub code_page: String,
    /// $HANDSEED: next handle to hand out
    pub handle_seed: Handle,
}

impl Default for HeaderVariables {
    fn default() -> Self {
        Self {
            version: "AC1032".to_string(),
            code_page: "ANSI_1252".to_string(),
            handle_seed: Handle::new(1),
        }
    }
}

/// A CAD document
#[derive(Debug, Clone)]
pub struct CadDocument {
    pub header: HeaderVariables,

    /// Layer name index
    pub layers: Table<Layer>,

    /// Block record name index
    pub block_records: Table<BlockRecord>,

    /// Notifications collected while the document was read
    pub notifications: NotificationCollection,

    /// Every object, in load or insertion order
    objects: IndexMap<Handle, CadObject>,

    root_dictionary: Option<Handle>,
    model_space: Option<Handle>,
    paper_space: Option<Handle>,
}

impl CadDocument {
    /// Create a document with the default skeleton.
    ///
    /// The skeleton holds layer `0`, the `*Model_Space` and `*Paper_Space`
    /// block records, a root dictionary with `ACAD_GROUP` and `ACAD_LAYOUT`,
    /// and the `Model` and `Layout1` layouts linked to the two spaces.
    pub fn new() -> Self {
        let mut doc = Self::empty();
        doc.initialize_defaults();
        doc
    }

    /// A document with no objects at all.
    pub(crate) fn empty() -> Self {
        CadDocument {
            header: HeaderVariables::default(),
            layers: Table::new(),
            block_records: Table::new(),
            notifications: NotificationCollection::new(),
            objects: IndexMap::new(),
            root_dictionary: None,
            model_space: None,
            paper_space: None,
        }
    }

    /// Assemble a document from an already resolved arena.
    ///
    /// Table indexes, the root dictionary and both spaces are located here;
    /// duplicate table names are reported and left out of the index.
    pub(crate) fn from_resolved(
        header: HeaderVariables,
        objects: IndexMap<Handle, CadObject>,
        layer_table: Handle,
        block_record_table: Handle,
        sink: &mut dyn DiagnosticsSink,
    ) -> Self {
        let mut doc = Self::empty();
        doc.header = header;
        doc.layers.set_handle(layer_table);
        doc.block_records.set_handle(block_record_table);
        doc.objects = objects;

        for object in doc.objects.values() {
            let indexed = match object {
                CadObject::TableEntry(TableEntryType::Layer(layer)) => doc.layers.add(layer),
                CadObject::TableEntry(TableEntryType::BlockRecord(record)) => {
                    doc.block_records.add(record)
                }
                _ => Ok(()),
            };
            if let Err(message) = indexed {
                sink.notify(
                    Notification::new(
                        NotificationType::Warning,
                        format!("{}; entry not indexed", message),
                    )
                    .with_handle(object.handle()),
                );
            }
        }

        doc.root_dictionary = doc
            .objects
            .values()
            .find(|o| matches!(o, CadObject::Object(ObjectType::Dictionary(_))) && o.owner().is_none())
            .map(|o| o.handle());
        doc.model_space = doc.block_records.get("*Model_Space");
        doc.paper_space = doc.block_records.get("*Paper_Space");

        let next = doc.max_handle().next();
        if next > doc.header.handle_seed {
            doc.header.handle_seed = next;
        }
        doc
    }

    fn initialize_defaults(&mut self) {
        let layer_table = self.allocate_handle();
        self.layers.set_handle(layer_table);
        let block_table = self.allocate_handle();
        self.block_records.set_handle(block_table);

        let mut layer0 = Layer::layer_0();
        layer0.common.handle = self.allocate_handle();
        layer0.common.owner = Some(layer_table);
        self.insert_table_entry(TableEntryType::Layer(layer0));

        let model = self.insert_block_record(BlockRecord::model_space());
        let paper = self.insert_block_record(BlockRecord::paper_space());
        self.model_space = Some(model);
        self.paper_space = Some(paper);

        let mut root = CadDictionary::new();
        root.common.handle = self.allocate_handle();
        let root_handle = root.common.handle;
        self.objects
            .insert(root_handle, CadObject::Object(ObjectType::Dictionary(root)));
        self.root_dictionary = Some(root_handle);

        self.insert_child_object(
            root_handle,
            "ACAD_GROUP",
            ObjectType::Dictionary(CadDictionary::new()),
        );
        let layouts = self.insert_child_object(
            root_handle,
            "ACAD_LAYOUT",
            ObjectType::Dictionary(CadDictionary::new()),
        );

        if let Some(layouts) = layouts {
            for (key, mut layout, record) in [
                ("Model", Layout::model(), model),
                ("Layout1", Layout::new("Layout1"), paper),
            ] {
                layout.block_record = Some(record);
                if let Some(h) = self.insert_child_object(layouts, key, ObjectType::Layout(layout)) {
                    if let Some(r) = self.get_mut::<BlockRecord>(record) {
                        r.layout = Some(h);
                    }
                }
            }
        }
    }

    /// Hand out the next free handle.
    pub fn allocate_handle(&mut self) -> Handle {
        let handle = self.header.handle_seed;
        self.header.handle_seed = handle.next();
        handle
    }

    /// The handle the next allocation will return ($HANDSEED).
    pub fn next_handle(&self) -> Handle {
        self.header.handle_seed
    }

    /// Handles of the BLOCK/ENDBLK markers embedded in block records.
    fn marker_handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.objects.values().filter_map(BlockRecord::from_object).flat_map(|r| {
            [r.block_entity.common.handle, r.block_end.common.handle]
        })
    }

    fn max_handle(&self) -> Handle {
        self.objects
            .keys()
            .copied()
            .chain(self.marker_handles())
            .chain([self.layers.handle(), self.block_records.handle()])
            .max()
            .unwrap_or(Handle::NULL)
    }

    fn claim_handle(&mut self, handle: Handle) -> Result<Handle> {
        if handle.is_null() {
            return Ok(self.allocate_handle());
        }
        if self.objects.contains_key(&handle)
            || handle == self.layers.handle()
            || handle == self.block_records.handle()
            || self.marker_handles().any(|h| h == handle)
        {
            return Err(DxfError::DuplicateHandle(handle));
        }
        if handle >= self.header.handle_seed {
            self.header.handle_seed = handle.next();
        }
        Ok(handle)
    }

    fn insert_table_entry(&mut self, entry: TableEntryType) {
        let handle = entry.common().handle;
        let indexed = match &entry {
            TableEntryType::Layer(layer) => self.layers.add(layer),
            TableEntryType::BlockRecord(record) => self.block_records.add(record),
        };
        debug_assert!(indexed.is_ok());
        self.objects.insert(handle, CadObject::TableEntry(entry));
    }

    fn insert_block_record(&mut self, mut record: BlockRecord) -> Handle {
        let handle = self.allocate_handle();
        record.common.handle = handle;
        record.common.owner = Some(self.block_records.handle());
        record.block_entity.common.handle = self.allocate_handle();
        record.block_entity.common.owner = Some(handle);
        record.block_end.common.handle = self.allocate_handle();
        record.block_end.common.owner = Some(handle);
        self.insert_table_entry(TableEntryType::BlockRecord(record));
        handle
    }

    fn insert_child_object(
        &mut self,
        dictionary: Handle,
        key: &str,
        mut object: ObjectType,
    ) -> Option<Handle> {
        let handle = self.allocate_handle();
        object.common_mut().handle = handle;
        object.common_mut().owner = Some(dictionary);
        self.get_mut::<CadDictionary>(dictionary)?.insert(key, handle);
        self.objects.insert(handle, CadObject::Object(object));
        Some(handle)
    }

    /// Add a layer to the LAYER table.
    pub fn add_layer(&mut self, mut layer: Layer) -> Result<Handle> {
        if self.layers.contains(&layer.name) {
            return Err(DxfError::Custom(format!("Layer '{}' already exists", layer.name)));
        }
        layer.common.handle = self.claim_handle(layer.common.handle)?;
        layer.common.owner = Some(self.layers.handle());
        let handle = layer.common.handle;
        self.layers.add(&layer)?;
        self.objects
            .insert(handle, CadObject::TableEntry(TableEntryType::Layer(layer)));
        Ok(handle)
    }

    /// Add a block record; its BLOCK/ENDBLK markers get handles as well.
    pub fn add_block_record(&mut self, mut record: BlockRecord) -> Result<Handle> {
        if self.block_records.contains(&record.name) {
            return Err(DxfError::Custom(format!(
                "Block record '{}' already exists",
                record.name
            )));
        }
        let handle = self.claim_handle(record.common.handle)?;
        record.common.handle = handle;
        record.common.owner = Some(self.block_records.handle());
        record.block_entity.common.handle = self.claim_handle(record.block_entity.common.handle)?;
        record.block_entity.common.owner = Some(handle);
        record.block_end.common.handle = self.claim_handle(record.block_end.common.handle)?;
        record.block_end.common.owner = Some(handle);
        record.entities.clear();
        record.viewports.clear();

        self.block_records.add(&record)?;
        if record.is_model_space() && self.model_space.is_none() {
            self.model_space = Some(handle);
        } else if record.is_paper_space() && self.paper_space.is_none() {
            self.paper_space = Some(handle);
        }
        self.objects
            .insert(handle, CadObject::TableEntry(TableEntryType::BlockRecord(record)));
        Ok(handle)
    }

    /// Add an entity to a block record.
    ///
    /// Viewports go to the record's viewport collection, everything else to
    /// its entity collection. Block markers cannot be added this way.
    pub fn add_entity(&mut self, owner: Handle, mut entity: EntityType) -> Result<Handle> {
        if entity.is_structural_marker() {
            return Err(DxfError::Custom(format!(
                "{} markers belong to their block record",
                entity.as_entity().entity_type()
            )));
        }
        if self.get::<BlockRecord>(owner).is_none() {
            return Err(DxfError::InvalidHandle(format!(
                "{} is not a block record",
                owner
            )));
        }

        let handle = self.claim_handle(entity.as_entity().handle())?;
        entity.as_entity_mut().common_mut().handle = handle;
        entity.as_entity_mut().common_mut().owner = Some(owner);
        let is_viewport = matches!(entity, EntityType::Viewport(_));

        if let Some(record) = self.get_mut::<BlockRecord>(owner) {
            if is_viewport {
                record.viewports.push(handle);
            } else {
                record.entities.push(handle);
            }
        }
        self.objects.insert(handle, CadObject::Entity(entity));
        Ok(handle)
    }

    /// Add a non-graphical object to a dictionary under `key`.
    pub fn add_object(
        &mut self,
        dictionary: Handle,
        key: impl Into<String>,
        mut object: ObjectType,
    ) -> Result<Handle> {
        if self.get::<CadDictionary>(dictionary).is_none() {
            return Err(DxfError::InvalidHandle(format!(
                "{} is not a dictionary",
                dictionary
            )));
        }
        let key = key.into();
        if self
            .get::<CadDictionary>(dictionary)
            .is_some_and(|d| d.contains_key(&key))
        {
            return Err(DxfError::Custom(format!(
                "Dictionary {} already has an entry '{}'",
                dictionary, key
            )));
        }

        let handle = self.claim_handle(object.common().handle)?;
        object.common_mut().handle = handle;
        object.common_mut().owner = Some(dictionary);
        if let Some(dict) = self.get_mut::<CadDictionary>(dictionary) {
            dict.insert(key, handle);
        }
        self.objects.insert(handle, CadObject::Object(object));
        Ok(handle)
    }

    /// Typed lookup; `None` if the handle is missing or of another kind.
    pub fn get<T: ObjectVariant>(&self, handle: Handle) -> Option<&T> {
        self.objects.get(&handle).and_then(T::from_object)
    }

    pub fn get_mut<T: ObjectVariant>(&mut self, handle: Handle) -> Option<&mut T> {
        self.objects.get_mut(&handle).and_then(T::from_object_mut)
    }

    pub fn object(&self, handle: Handle) -> Option<&CadObject> {
        self.objects.get(&handle)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.objects.contains_key(&handle)
    }

    /// All objects in arena order
    pub fn objects(&self) -> impl Iterator<Item = &CadObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn root_dictionary_handle(&self) -> Option<Handle> {
        self.root_dictionary
    }

    /// The named object dictionary
    pub fn root_dictionary(&self) -> Option<&CadDictionary> {
        self.root_dictionary.and_then(|h| self.get(h))
    }

    pub fn block_record(&self, name: &str) -> Option<&BlockRecord> {
        self.block_records.get(name).and_then(|h| self.get(h))
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name).and_then(|h| self.get(h))
    }

    pub fn model_space_handle(&self) -> Option<Handle> {
        self.model_space
    }

    pub fn paper_space_handle(&self) -> Option<Handle> {
        self.paper_space
    }

    pub fn model_space(&self) -> Option<&BlockRecord> {
        self.model_space.and_then(|h| self.get(h))
    }

    pub fn paper_space(&self) -> Option<&BlockRecord> {
        self.paper_space.and_then(|h| self.get(h))
    }

    /// Every group in the document
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.objects.values().filter_map(Group::from_object)
    }

    /// Objects whose owner is `handle`, in arena order.
    pub fn owned_children(&self, handle: Handle) -> Vec<Handle> {
        self.objects
            .values()
            .filter(|o| o.owner() == Some(handle))
            .map(|o| o.handle())
            .collect()
    }

    /// Remove an object together with everything it owns.
    ///
    /// Only ownership edges are followed. The object is detached from its
    /// owner's collection; references held elsewhere are left as they are.
    /// Returns the removed objects, the requested one first.
    pub fn remove(&mut self, handle: Handle) -> Vec<CadObject> {
        let Some(owner) = self.objects.get(&handle).map(|o| o.owner()) else {
            return Vec::new();
        };
        if let Some(owner) = owner {
            self.detach(owner, handle);
        }

        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut pending = VecDeque::from([handle]);
        while let Some(current) = pending.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            order.push(current);
            pending.extend(self.owned_children(current));
        }

        let mut removed = Vec::with_capacity(order.len());
        for h in order {
            if let Some(object) = self.objects.shift_remove(&h) {
                self.layers.remove_handle(h);
                self.block_records.remove_handle(h);
                for slot in [
                    &mut self.root_dictionary,
                    &mut self.model_space,
                    &mut self.paper_space,
                ] {
                    if *slot == Some(h) {
                        *slot = None;
                    }
                }
                removed.push(object);
            }
        }
        log::debug!("removed {} objects under {}", removed.len(), handle);
        removed
    }

    fn detach(&mut self, owner: Handle, child: Handle) {
        match self.objects.get_mut(&owner) {
            Some(CadObject::TableEntry(TableEntryType::BlockRecord(record))) => {
                record.entities.retain(|h| *h != child);
                record.viewports.retain(|h| *h != child);
            }
            Some(CadObject::Object(ObjectType::Dictionary(dict))) => {
                dict.remove_handle(child);
            }
            _ => {}
        }
    }

    /// Whether following owner links from any object never loops.
    pub fn is_ownership_acyclic(&self) -> bool {
        self.objects.values().all(|object| {
            let mut visited = HashSet::new();
            let mut current = Some(object.handle());
            while let Some(h) = current {
                if !visited.insert(h) {
                    return false;
                }
                current = self.objects.get(&h).and_then(|o| o.owner());
            }
            true
        })
    }
}

impl Default for CadDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Circle, Line, Viewport};
    use crate::objects::XRecord;
    use crate::types::Vector3;

    #[test]
    fn test_default_skeleton() {
        let doc = CadDocument::new();
        assert!(doc.layer("0").is_some());
        assert!(doc.model_space().is_some());
        assert!(doc.paper_space().is_some());

        let root = doc.root_dictionary().unwrap();
        assert!(root.contains_key("ACAD_GROUP"));
        let layouts = doc.get::<CadDictionary>(root.get("ACAD_LAYOUT").unwrap()).unwrap();
        let model_layout = doc.get::<Layout>(layouts.get("Model").unwrap()).unwrap();
        assert_eq!(model_layout.block_record, doc.model_space_handle());
        assert_eq!(
            doc.model_space().unwrap().layout,
            layouts.get("Model")
        );
        assert!(doc.is_ownership_acyclic());
    }

    #[test]
    fn test_handles_are_unique_and_sequential() {
        let mut doc = CadDocument::new();
        let seed = doc.next_handle();
        let a = doc.allocate_handle();
        let b = doc.allocate_handle();
        assert_eq!(a, seed);
        assert_eq!(b, a.next());
        assert!(!doc.contains(a));
    }

    #[test]
    fn test_add_entity_routes_viewports() {
        let mut doc = CadDocument::new();
        let paper = doc.paper_space_handle().unwrap();
        let line = doc
            .add_entity(paper, EntityType::Line(Line::new()))
            .unwrap();
        let vp = doc
            .add_entity(paper, EntityType::Viewport(Viewport::new()))
            .unwrap();

        let record = doc.paper_space().unwrap();
        assert_eq!(record.entities, vec![line]);
        assert_eq!(record.viewports, vec![vp]);
        assert_eq!(doc.object(vp).unwrap().owner(), Some(paper));
    }

    #[test]
    fn test_add_entity_rejects_non_container_owner() {
        let mut doc = CadDocument::new();
        let root = doc.root_dictionary_handle().unwrap();
        let result = doc.add_entity(root, EntityType::Line(Line::new()));
        assert!(matches!(result, Err(DxfError::InvalidHandle(_))));
    }

    #[test]
    fn test_add_entity_duplicate_handle() {
        let mut doc = CadDocument::new();
        let model = doc.model_space_handle().unwrap();
        let mut line = Line::new();
        line.common.handle = model;
        let result = doc.add_entity(model, EntityType::Line(line));
        assert!(matches!(result, Err(DxfError::DuplicateHandle(h)) if h == model));
    }

    #[test]
    fn test_remove_cascades_along_ownership_only() {
        let mut doc = CadDocument::new();
        let record = doc.add_block_record(BlockRecord::new("DOOR")).unwrap();
        let circle = doc
            .add_entity(record, EntityType::Circle(Circle::new(Vector3::ZERO, 1.0)))
            .unwrap();

        let groups = doc.root_dictionary().unwrap().get("ACAD_GROUP").unwrap();
        let mut group = Group::new("doors");
        group.add_entity(circle);
        let group = doc.add_object(groups, "G1", ObjectType::Group(group)).unwrap();

        let removed = doc.remove(record);
        assert_eq!(removed.len(), 2);
        assert!(!doc.contains(circle));
        assert!(doc.block_record("DOOR").is_none());
        assert!(doc.contains(group));
    }

    #[test]
    fn test_remove_detaches_from_dictionary() {
        let mut doc = CadDocument::new();
        let root = doc.root_dictionary_handle().unwrap();
        let xrec = doc
            .add_object(root, "MY_DATA", ObjectType::XRecord(XRecord::new()))
            .unwrap();
        doc.remove(xrec);
        assert!(!doc.root_dictionary().unwrap().contains_key("MY_DATA"));
        assert!(doc.remove(xrec).is_empty());
    }

    #[test]
    fn test_cycle_detection() {
        let mut doc = CadDocument::new();
        let root = doc.root_dictionary_handle().unwrap();
        let child = doc.root_dictionary().unwrap().get("ACAD_GROUP").unwrap();
        doc.objects.get_mut(&root).unwrap().set_owner(Some(child));
        assert!(!doc.is_ownership_acyclic());
    }

    #[test]
    fn test_duplicate_layer_name() {
        let mut doc = CadDocument::new();
        doc.add_layer(Layer::new("Walls")).unwrap();
        assert!(doc.add_layer(Layer::new("WALLS")).is_err());
    }
}
