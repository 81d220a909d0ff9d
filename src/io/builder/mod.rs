//! Document builder: resolves handle-based templates into a [`CadDocument`].
//!
//! Readers hand every object to [`CadDocumentBuilder::ingest`] together with
//! a [`TemplateData`] holding the raw handles it points at. Objects may
//! arrive in any order, so nothing is resolved during ingestion. Once input
//! is exhausted the builder runs its phases:
//!
//! 1. **Assign missing handles**: objects read with a null handle get
//!    handles above every handle seen.
//! 2. **Link owners**: entities are appended to their owner's list, ownerless
//!    entities go to model or paper space, and BLOCK/ENDBLK markers are
//!    attached to their block record.
//! 3. **Resolve templates**: every raw handle is looked up in the registry.
//!    Dangling or wrongly typed references are reported and dropped.
//! 4. **Fold markers**: BLOCK/ENDBLK markers are embedded in their records
//!    and leave the arena.
//!
//! Phases 1 and 2 run once. Phase 3 rebuilds every resolved collection from
//! the templates, so [`CadDocumentBuilder::resolve`] may be called again
//! without duplicating anything, warnings included.

pub mod registry;
pub mod templates;

use std::collections::{HashMap, HashSet};

use crate::cad_object::{CadObject, ObjectVariant};
use crate::document::{CadDocument, HeaderVariables};
use crate::entities::{Block, BlockEnd, EntityType, Insert, Viewport};
use crate::error::Result;
use crate::notification::{DiagnosticsSink, Notification, NotificationType};
use crate::objects::{CadDictionary, Group, Layout, ObjectType, SortEntitiesTable, Sorter};
use crate::tables::BlockRecord;
use crate::types::Handle;

pub use registry::HandleRegistry;
pub use templates::{BlockRecordLinks, CadTemplate, EntityLinks, TemplateData};

/// Collects objects with unresolved references and assembles a document.
pub struct CadDocumentBuilder<'a> {
    // ------------------------------------------------------------------
    // Template storage
    // ------------------------------------------------------------------
    registry: HandleRegistry,

    /// Templates in ingestion order
    templates: Vec<CadTemplate>,

    /// Position of each template by handle
    template_index: HashMap<Handle, usize>,

    /// Objects read with a null handle, keyed by template position
    unassigned: Vec<(usize, CadObject)>,

    // ------------------------------------------------------------------
    // Working state
    // ------------------------------------------------------------------
    /// Block record each entity has been attached to
    attached: HashMap<Handle, Handle>,

    /// Block records by upper-cased name
    record_names: HashMap<String, Handle>,

    header: HeaderVariables,
    layer_table: Handle,
    block_record_table: Handle,

    /// Phases 1 and 2 have run
    prepared: bool,

    /// Warnings already sent, so repeated resolves do not report twice
    reported: HashSet<(Handle, String)>,

    sink: &'a mut dyn DiagnosticsSink,
}

impl<'a> CadDocumentBuilder<'a> {
    pub fn new(sink: &'a mut dyn DiagnosticsSink) -> Self {
        Self {
            registry: HandleRegistry::new(),
            templates: Vec::new(),
            template_index: HashMap::new(),
            unassigned: Vec::new(),
            attached: HashMap::new(),
            record_names: HashMap::new(),
            header: HeaderVariables::default(),
            layer_table: Handle::NULL,
            block_record_table: Handle::NULL,
            prepared: false,
            reported: HashSet::new(),
            sink,
        }
    }

    // ------------------------------------------------------------------
    // Ingestion
    // ------------------------------------------------------------------

    /// Register an object and its unresolved references.
    ///
    /// The owner is taken from the object itself. Returns the object's
    /// handle, or [`Handle::NULL`] when one will be assigned during
    /// resolution. A handle that is already taken fails the whole load.
    pub fn ingest(&mut self, object: CadObject, data: TemplateData) -> Result<Handle> {
        let handle = object.handle();
        let template = CadTemplate::new(handle, object.owner(), data);

        if handle.is_null() {
            self.unassigned.push((self.templates.len(), object));
            self.templates.push(template);
            return Ok(Handle::NULL);
        }

        self.registry.register(handle, object)?;
        self.template_index.insert(handle, self.templates.len());
        self.templates.push(template);
        Ok(handle)
    }

    /// Record the handle of a symbol table header.
    ///
    /// Table headers are not objects of their own, but entries name them as
    /// owner, so the handle is reserved.
    pub fn register_table(&mut self, table_name: &str, handle: Handle) -> Result<()> {
        if handle.is_null() {
            return Ok(());
        }
        self.registry.reserve(handle)?;
        match table_name.to_ascii_uppercase().as_str() {
            "LAYER" => self.layer_table = handle,
            "BLOCK_RECORD" => self.block_record_table = handle,
            _ => {}
        }
        Ok(())
    }

    pub fn set_header(&mut self, header: HeaderVariables) {
        self.header = header;
    }

    pub fn header(&self) -> &HeaderVariables {
        &self.header
    }

    /// Forward a notification to the caller's sink.
    pub fn notify(&mut self, notification: Notification) {
        self.sink.notify(notification);
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    pub fn template(&self, handle: Handle) -> Option<&CadTemplate> {
        self.template_index
            .get(&handle)
            .map(|&index| &self.templates[index])
    }

    /// Handle of a registered block record, matched case-insensitively.
    pub fn block_record_by_name(&self, name: &str) -> Option<Handle> {
        self.registry.handles().find(|&h| {
            self.registry
                .lookup::<BlockRecord>(h)
                .is_some_and(|r| r.name.eq_ignore_ascii_case(name))
        })
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    fn warn(&mut self, handle: Handle, message: impl Into<String>) {
        let message = message.into();
        if !self.reported.insert((handle, message.clone())) {
            return;
        }
        self.sink.notify(
            Notification::new(NotificationType::Warning, message).with_handle(handle),
        );
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    /// Resolve every template against the registry.
    ///
    /// Safe to call more than once; collections are rebuilt, not appended.
    pub fn resolve(&mut self) {
        if !self.prepared {
            self.assign_missing_handles();
            self.index_record_names();
            self.link_owners();
            self.prepared = true;
        }

        for index in 0..self.templates.len() {
            self.resolve_template(index);
        }
        self.reconcile_owners();

        log::debug!(
            "resolved {} templates, {} objects registered",
            self.templates.len(),
            self.registry.len()
        );
    }

    /// Resolve and assemble the final document.
    pub fn build_document(mut self) -> CadDocument {
        self.resolve();
        self.fold_markers();
        self.fill_missing_markers();
        self.fill_table_handles();

        let Self {
            registry,
            header,
            layer_table,
            block_record_table,
            sink,
            ..
        } = self;

        CadDocument::from_resolved(
            header,
            registry.into_objects(),
            layer_table,
            block_record_table,
            sink,
        )
    }

    fn assign_missing_handles(&mut self) {
        if self.unassigned.is_empty() {
            return;
        }

        let mut next = self.registry.max_handle().next();
        for (index, mut object) in std::mem::take(&mut self.unassigned) {
            let handle = next;
            next = next.next();

            object.set_handle(handle);
            if let Err(e) = self.registry.register(handle, object) {
                self.sink
                    .notify(Notification::new(NotificationType::Error, e.to_string()));
                continue;
            }
            self.templates[index].handle = handle;
            self.template_index.insert(handle, index);
            log::trace!("assigned handle {} to template {}", handle, index);
        }
    }

    fn index_record_names(&mut self) {
        self.record_names = self
            .registry
            .handles()
            .filter_map(|h| {
                self.registry
                    .lookup::<BlockRecord>(h)
                    .map(|r| (r.name.to_uppercase(), h))
            })
            .collect();
    }

    fn space_record(&self, paper_space: bool) -> Option<Handle> {
        let name = if paper_space {
            "*PAPER_SPACE"
        } else {
            "*MODEL_SPACE"
        };
        self.record_names.get(name).copied()
    }

    fn is_record_template(&self, handle: Handle) -> Option<usize> {
        self.template_index
            .get(&handle)
            .copied()
            .filter(|&i| matches!(self.templates[i].data, TemplateData::BlockRecord(_)))
    }

    // ------------------------------------------------------------------
    // Phase 2: owners
    // ------------------------------------------------------------------

    fn link_owners(&mut self) {
        let mut listed: HashSet<(Handle, Handle)> = HashSet::new();
        for template in &self.templates {
            if let Some(links) = template.block_record_links() {
                listed.extend(links.owned_objects.iter().map(|&e| (template.handle, e)));
            }
        }

        for index in 0..self.templates.len() {
            let handle = self.templates[index].handle;
            if handle.is_null() {
                continue;
            }

            let paper_space = match &self.templates[index].data {
                TemplateData::BlockMarker => {
                    self.link_marker(index);
                    continue;
                }
                data => match data.entity_links() {
                    Some(links) => links.paper_space,
                    None => continue,
                },
            };
            self.link_entity(index, paper_space, &mut listed);
        }
    }

    fn link_entity(
        &mut self,
        index: usize,
        paper_space: bool,
        listed: &mut HashSet<(Handle, Handle)>,
    ) {
        let handle = self.templates[index].handle;

        let owner = match self.templates[index].owner_handle {
            Some(owner) => owner,
            None => match self.space_record(paper_space) {
                Some(space) => {
                    self.set_owner(index, Some(space));
                    space
                }
                None => {
                    let space = if paper_space { "paper" } else { "model" };
                    self.warn(
                        handle,
                        format!(
                            "entity {} has no owner and there is no {} space record",
                            handle, space
                        ),
                    );
                    return;
                }
            },
        };

        match self.is_record_template(owner) {
            Some(owner_index) => {
                if let Some(links) = self.templates[owner_index].block_record_links_mut() {
                    if !links.has_chain() && listed.insert((owner, handle)) {
                        links.owned_objects.push(handle);
                    }
                }
            }
            None => {
                let reason = if self.registry.contains(owner) || self.registry.is_reserved(owner)
                {
                    "is not a block record"
                } else {
                    "does not exist"
                };
                self.warn(
                    handle,
                    format!(
                        "owner {} of entity {} {}; entity not attached",
                        owner, handle, reason
                    ),
                );
                self.set_owner(index, None);
            }
        }
    }

    fn link_marker(&mut self, index: usize) {
        let handle = self.templates[index].handle;
        let begin_name = self
            .registry
            .lookup::<Block>(handle)
            .map(|b| b.name.to_uppercase());
        let is_begin = begin_name.is_some();

        let owner = self.templates[index].owner_handle.or_else(|| {
            begin_name
                .as_ref()
                .and_then(|name| self.record_names.get(name).copied())
        });

        let Some(record_index) = owner.and_then(|o| self.is_record_template(o)) else {
            self.warn(
                handle,
                format!("block marker {} has no block record; dropped", handle),
            );
            return;
        };
        let record = self.templates[record_index].handle;

        if let Some(links) = self.templates[record_index].block_record_links_mut() {
            let slot = if is_begin {
                &mut links.block_entity
            } else {
                &mut links.block_end
            };
            if slot.is_none() {
                *slot = Some(handle);
            }
        }
        if let Some(name) = begin_name.filter(|n| !n.is_empty()) {
            self.record_names.entry(name).or_insert(record);
        }
        self.set_owner(index, Some(record));
    }

    fn set_owner(&mut self, index: usize, owner: Option<Handle>) {
        let handle = self.templates[index].handle;
        self.templates[index].owner_handle = owner;
        if let Some(object) = self.registry.lookup_mut::<CadObject>(handle) {
            object.set_owner(owner);
        }
    }

    // ------------------------------------------------------------------
    // Phase 3: templates
    // ------------------------------------------------------------------

    fn resolve_template(&mut self, index: usize) {
        let handle = self.templates[index].handle;
        if handle.is_null() {
            return;
        }
        self.validate_owner(handle);

        let data = std::mem::replace(&mut self.templates[index].data, TemplateData::Plain);
        match &data {
            TemplateData::Insert { block_record, .. } => {
                self.resolve_insert(handle, *block_record)
            }
            TemplateData::BlockRecord(links) => self.resolve_block_record(handle, links),
            TemplateData::Dictionary {
                entries,
                default_entry,
            } => self.resolve_dictionary(handle, entries, *default_entry),
            TemplateData::Layout {
                block_record,
                viewport,
            } => self.resolve_layout(handle, *block_record, *viewport),
            TemplateData::Group { entities } => self.resolve_group(handle, entities),
            TemplateData::SortEntitiesTable {
                block_owner,
                sorters,
            } => self.resolve_sort_entities_table(handle, *block_owner, sorters),
            TemplateData::Entity(_) | TemplateData::BlockMarker | TemplateData::Plain => {}
        }
        self.templates[index].data = data;
    }

    /// Clear an owner that names nothing known.
    fn validate_owner(&mut self, handle: Handle) {
        let Some(owner) = self
            .registry
            .lookup::<CadObject>(handle)
            .and_then(|o| o.owner())
        else {
            return;
        };
        if self.registry.contains(owner) || self.registry.is_reserved(owner) {
            return;
        }

        self.warn(
            handle,
            format!("owner {} of {} does not resolve; owner cleared", owner, handle),
        );
        if let Some(object) = self.registry.lookup_mut::<CadObject>(handle) {
            object.set_owner(None);
        }
    }

    /// Check a single reference against the registry.
    fn resolve_reference<T: ObjectVariant>(
        &mut self,
        source: Handle,
        reference: Option<Handle>,
        what: &str,
    ) -> Option<Handle> {
        let handle = reference?;
        if self.registry.lookup::<T>(handle).is_some() {
            return Some(handle);
        }
        self.warn(
            source,
            format!("{} {} referenced by {} does not resolve", what, handle, source),
        );
        None
    }

    fn resolve_insert(&mut self, handle: Handle, block_record: Option<Handle>) {
        let Some(name) = self
            .registry
            .lookup::<Insert>(handle)
            .map(|i| i.block_name.clone())
        else {
            return;
        };

        let by_handle = match block_record {
            Some(_) => self.resolve_reference::<BlockRecord>(handle, block_record, "block record"),
            None => None,
        };
        let resolved = by_handle.or_else(|| self.record_names.get(&name.to_uppercase()).copied());

        if resolved.is_none() {
            self.warn(
                handle,
                format!("block '{}' referenced by insert {} not found", name, handle),
            );
        }
        if let Some(insert) = self.registry.lookup_mut::<Insert>(handle) {
            insert.block_record = resolved;
        }
    }

    fn resolve_block_record(&mut self, handle: Handle, links: &BlockRecordLinks) {
        let layout = self.resolve_reference::<Layout>(handle, links.layout, "layout");

        let members = match (links.first_entity, links.last_entity) {
            (Some(first), Some(last)) => self.walk_chain(handle, first, last),
            _ => links.owned_objects.clone(),
        };

        let mut seen = HashSet::new();
        let mut entities = Vec::new();
        let mut viewports = Vec::new();
        for member in members {
            if !seen.insert(member) {
                continue;
            }
            let is_viewport = match self.registry.lookup::<EntityType>(member) {
                Some(entity) if entity.is_structural_marker() => continue,
                Some(EntityType::Viewport(_)) => true,
                Some(_) => false,
                None => {
                    self.warn(
                        handle,
                        format!(
                            "member {} of block record {} is not an entity; skipped",
                            member, handle
                        ),
                    );
                    continue;
                }
            };

            if let Some(&other) = self.attached.get(&member) {
                if other != handle {
                    self.warn(
                        member,
                        format!(
                            "entity {} already belongs to block record {}; not added to {}",
                            member, other, handle
                        ),
                    );
                    continue;
                }
            }
            self.attached.insert(member, handle);
            if let Some(object) = self.registry.lookup_mut::<CadObject>(member) {
                object.set_owner(Some(handle));
            }

            if is_viewport {
                viewports.push(member);
            } else {
                entities.push(member);
            }
        }

        let begin = match links.block_entity {
            Some(h) => self.registry.lookup::<Block>(h).cloned(),
            None => None,
        };
        let end = match links.block_end {
            Some(h) => self.registry.lookup::<BlockEnd>(h).cloned(),
            None => None,
        };

        if let Some(record) = self.registry.lookup_mut::<BlockRecord>(handle) {
            record.layout = layout;
            record.entities = entities;
            record.viewports = viewports;
            if let Some(begin) = &begin {
                record.attach_block_begin(begin);
                record.block_entity.common.owner = Some(handle);
            }
            if let Some(end) = &end {
                record.attach_block_end(end);
                record.block_end.common.owner = Some(handle);
            }
        }
    }

    /// Follow `next_entity` links from `first` to `last`.
    fn walk_chain(&mut self, record: Handle, first: Handle, last: Handle) -> Vec<Handle> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = first;

        loop {
            if !visited.insert(current) {
                self.warn(
                    record,
                    format!("entity chain of {} loops at {}; walk stopped", record, current),
                );
                break;
            }
            if !self.registry.contains(current) {
                self.warn(
                    record,
                    format!(
                        "entity chain of {} references missing entity {}; walk stopped",
                        record, current
                    ),
                );
                break;
            }
            chain.push(current);
            if current == last {
                break;
            }

            let next = self
                .template_index
                .get(&current)
                .and_then(|&i| self.templates[i].data.entity_links())
                .and_then(|links| links.next_entity);
            match next {
                Some(next) => current = next,
                None => {
                    self.warn(
                        record,
                        format!(
                            "entity chain of {} ends at {} before reaching {}",
                            record, current, last
                        ),
                    );
                    break;
                }
            }
        }
        chain
    }

    fn resolve_dictionary(
        &mut self,
        handle: Handle,
        entries: &[(String, Handle)],
        default_entry: Option<Handle>,
    ) {
        let default_entry =
            self.resolve_reference::<ObjectType>(handle, default_entry, "default entry");

        let mut kept = Vec::with_capacity(entries.len());
        for (key, member) in entries {
            if *member == handle || self.registry.lookup::<ObjectType>(*member).is_none() {
                self.warn(
                    handle,
                    format!(
                        "entry '{}' of dictionary {} points at {}, which is not a member object; dropped",
                        key, handle, member
                    ),
                );
                continue;
            }
            kept.push((key.clone(), *member));

            let unowned = self
                .registry
                .lookup::<CadObject>(*member)
                .is_some_and(|o| o.owner().is_none());
            if unowned && !self.owner_chain_contains(handle, *member) {
                if let Some(object) = self.registry.lookup_mut::<CadObject>(*member) {
                    object.set_owner(Some(handle));
                }
            }
        }

        if let Some(dictionary) = self.registry.lookup_mut::<CadDictionary>(handle) {
            dictionary.clear();
            for (key, member) in kept {
                dictionary.insert(key, member);
            }
            dictionary.default_entry = default_entry;
        }
    }

    /// Whether `target` is `start` or one of its owners.
    fn owner_chain_contains(&self, start: Handle, target: Handle) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(start);
        while let Some(handle) = current {
            if handle == target {
                return true;
            }
            if !visited.insert(handle) {
                return false;
            }
            current = self
                .registry
                .lookup::<CadObject>(handle)
                .and_then(|o| o.owner());
        }
        false
    }

    fn resolve_layout(
        &mut self,
        handle: Handle,
        block_record: Option<Handle>,
        viewport: Option<Handle>,
    ) {
        let block_record =
            self.resolve_reference::<BlockRecord>(handle, block_record, "block record");
        let viewport = self.resolve_reference::<Viewport>(handle, viewport, "viewport");
        if let Some(layout) = self.registry.lookup_mut::<Layout>(handle) {
            layout.block_record = block_record;
            layout.viewport = viewport;
        }
    }

    fn resolve_group(&mut self, handle: Handle, members: &[Handle]) {
        let mut entities = Vec::with_capacity(members.len());
        for &member in members {
            if let Some(member) = self.resolve_reference::<EntityType>(handle, Some(member), "entity")
            {
                entities.push(member);
            }
        }
        if let Some(group) = self.registry.lookup_mut::<Group>(handle) {
            group.entities = entities;
        }
    }

    fn resolve_sort_entities_table(
        &mut self,
        handle: Handle,
        block_owner: Option<Handle>,
        sorters: &[(Handle, Handle)],
    ) {
        let block_owner =
            self.resolve_reference::<BlockRecord>(handle, block_owner, "block record");
        let mut resolved = Vec::with_capacity(sorters.len());
        for &(entity, sort_handle) in sorters {
            if let Some(entity) = self.resolve_reference::<EntityType>(handle, Some(entity), "entity")
            {
                resolved.push(Sorter {
                    entity,
                    sort_handle,
                });
            }
        }
        if let Some(table) = self.registry.lookup_mut::<SortEntitiesTable>(handle) {
            table.block_owner = block_owner;
            table.sorters = resolved;
        }
    }

    /// Entities that name a block record as owner but were not collected by
    /// it (e.g. left out of its entity chain) are appended to it.
    fn reconcile_owners(&mut self) {
        let collected: HashSet<Handle> = self
            .registry
            .handles()
            .filter_map(|h| self.registry.lookup::<BlockRecord>(h))
            .flat_map(|r| r.entities.iter().chain(r.viewports.iter()).copied())
            .collect();

        for index in 0..self.templates.len() {
            let template = &self.templates[index];
            if template.handle.is_null() || template.data.entity_links().is_none() {
                continue;
            }
            let handle = template.handle;
            let Some(owner) = self
                .registry
                .lookup::<CadObject>(handle)
                .and_then(|o| o.owner())
            else {
                continue;
            };
            if collected.contains(&handle) || self.registry.lookup::<BlockRecord>(owner).is_none()
            {
                continue;
            }

            match self.attached.get(&handle) {
                Some(&other) if other != owner => {
                    if let Some(object) = self.registry.lookup_mut::<CadObject>(handle) {
                        object.set_owner(Some(other));
                    }
                    continue;
                }
                _ => {}
            }

            self.warn(
                handle,
                format!(
                    "entity {} is owned by {} but missing from its entity chain; appended",
                    handle, owner
                ),
            );
            let is_viewport = self.registry.lookup::<Viewport>(handle).is_some();
            self.attached.insert(handle, owner);
            if let Some(record) = self.registry.lookup_mut::<BlockRecord>(owner) {
                if is_viewport {
                    record.viewports.push(handle);
                } else {
                    record.entities.push(handle);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Phase 4: markers
    // ------------------------------------------------------------------

    /// Remove BLOCK/ENDBLK markers from the arena; they live in their record.
    fn fold_markers(&mut self) {
        let mut embedded = HashSet::new();
        let mut markers = Vec::new();
        for handle in self.registry.handles() {
            match self.registry.lookup::<CadObject>(handle) {
                Some(CadObject::TableEntry(_)) => {
                    if let Some(record) = self.registry.lookup::<BlockRecord>(handle) {
                        embedded.insert(record.block_entity.common.handle);
                        embedded.insert(record.block_end.common.handle);
                    }
                }
                Some(CadObject::Entity(entity)) if entity.is_structural_marker() => {
                    markers.push(handle)
                }
                _ => {}
            }
        }

        for marker in markers {
            self.registry.remove(marker);
            if !embedded.contains(&marker) {
                self.warn(
                    marker,
                    format!("block marker {} was not claimed by any block record", marker),
                );
            }
        }
    }

    /// Give records read without BLOCK/ENDBLK markers fresh marker handles.
    fn fill_missing_markers(&mut self) {
        let mut next = self.registry.max_handle().next();
        let records: Vec<Handle> = self
            .registry
            .handles()
            .filter(|&h| self.registry.lookup::<BlockRecord>(h).is_some())
            .collect();

        for handle in records {
            if let Some(record) = self.registry.lookup_mut::<BlockRecord>(handle) {
                for common in [
                    &mut record.block_entity.common,
                    &mut record.block_end.common,
                ] {
                    if common.handle.is_null() {
                        common.handle = next;
                        next = next.next();
                    }
                    common.owner = Some(handle);
                }
            }
        }
    }

    fn fill_table_handles(&mut self) {
        if self.layer_table.is_null() {
            let handle = self.registry.max_handle().next();
            if self.registry.reserve(handle).is_ok() {
                self.layer_table = handle;
            }
        }
        if self.block_record_table.is_null() {
            let handle = self.registry.max_handle().next();
            if self.registry.reserve(handle).is_ok() {
                self.block_record_table = handle;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Line;
    use crate::notification::NotificationCollection;
    use crate::types::Vector3;

    fn line(handle: u64, owner: Option<u64>) -> CadObject {
        let mut line = Line::from_points(Vector3::ZERO, Vector3::new(1.0, 1.0, 0.0));
        line.common.handle = Handle::new(handle);
        line.common.owner = owner.map(Handle::new);
        CadObject::Entity(EntityType::Line(line))
    }

    fn record(handle: u64, name: &str) -> CadObject {
        let mut record = BlockRecord::new(name);
        record.common.handle = Handle::new(handle);
        CadObject::TableEntry(crate::tables::TableEntryType::BlockRecord(record))
    }

    #[test]
    fn test_missing_handles_are_assigned_above_max() {
        let mut sink = NotificationCollection::new();
        let mut builder = CadDocumentBuilder::new(&mut sink);
        builder
            .ingest(record(0x10, "*Model_Space"), TemplateData::BlockRecord(Default::default()))
            .unwrap();
        let assigned = builder
            .ingest(line(0, None), TemplateData::Entity(EntityLinks::default()))
            .unwrap();
        assert!(assigned.is_null());

        builder.resolve();
        assert!(builder.registry().contains(Handle::new(0x11)));
        let space = builder.registry().lookup::<BlockRecord>(Handle::new(0x10)).unwrap();
        assert_eq!(space.entities, vec![Handle::new(0x11)]);
    }

    #[test]
    fn test_duplicate_handle_is_fatal() {
        let mut sink = NotificationCollection::new();
        let mut builder = CadDocumentBuilder::new(&mut sink);
        builder
            .ingest(line(0x20, None), TemplateData::Entity(EntityLinks::default()))
            .unwrap();
        let err = builder
            .ingest(line(0x20, None), TemplateData::Entity(EntityLinks::default()))
            .unwrap_err();
        assert!(matches!(err, crate::error::DxfError::DuplicateHandle(h) if h == Handle::new(0x20)));
    }

    #[test]
    fn test_table_handle_is_reserved() {
        let mut sink = NotificationCollection::new();
        let mut builder = CadDocumentBuilder::new(&mut sink);
        builder.register_table("LAYER", Handle::new(0x2)).unwrap();
        assert!(builder
            .ingest(line(0x2, None), TemplateData::Entity(EntityLinks::default()))
            .is_err());
    }

    #[test]
    fn test_chain_loop_stops_walk() {
        let mut sink = NotificationCollection::new();
        {
            let mut builder = CadDocumentBuilder::new(&mut sink);
            let links = BlockRecordLinks {
                first_entity: Some(Handle::new(0x20)),
                last_entity: Some(Handle::new(0x22)),
                ..Default::default()
            };
            builder
                .ingest(record(0x10, "DOOR"), TemplateData::BlockRecord(links))
                .unwrap();
            for (handle, next) in [(0x20, 0x21), (0x21, 0x20)] {
                builder
                    .ingest(
                        line(handle, Some(0x10)),
                        TemplateData::Entity(EntityLinks {
                            next_entity: Some(Handle::new(next)),
                            paper_space: false,
                        }),
                    )
                    .unwrap();
            }
            builder.resolve();
            let door = builder.registry().lookup::<BlockRecord>(Handle::new(0x10)).unwrap();
            assert_eq!(door.entities, vec![Handle::new(0x20), Handle::new(0x21)]);
        }
        assert!(sink
            .of_type(NotificationType::Warning)
            .iter()
            .any(|n| n.message.contains("loops")));
    }

    #[test]
    fn test_entity_outside_chain_is_appended_and_reported_once() {
        let mut sink = NotificationCollection::new();
        {
            let mut builder = CadDocumentBuilder::new(&mut sink);
            let links = BlockRecordLinks {
                first_entity: Some(Handle::new(0x20)),
                last_entity: Some(Handle::new(0x20)),
                ..Default::default()
            };
            builder
                .ingest(record(0x10, "DOOR"), TemplateData::BlockRecord(links))
                .unwrap();
            builder
                .ingest(line(0x20, Some(0x10)), TemplateData::Entity(EntityLinks::default()))
                .unwrap();
            builder
                .ingest(line(0x21, Some(0x10)), TemplateData::Entity(EntityLinks::default()))
                .unwrap();

            builder.resolve();
            builder.resolve();
            builder.resolve();
            let door = builder.registry().lookup::<BlockRecord>(Handle::new(0x10)).unwrap();
            assert_eq!(door.entities, vec![Handle::new(0x20), Handle::new(0x21)]);
        }

        let reported = sink.for_handle(Handle::new(0x21));
        assert_eq!(reported.len(), 1, "{:?}", reported);
        assert!(reported[0].message.contains("appended"));
    }

    #[test]
    fn test_dangling_references_are_reported_once_across_resolves() {
        let mut sink = NotificationCollection::new();
        {
            let mut builder = CadDocumentBuilder::new(&mut sink);
            let mut dictionary = CadDictionary::new();
            dictionary.common.handle = Handle::new(0xC);
            builder
                .ingest(
                    CadObject::Object(ObjectType::Dictionary(dictionary)),
                    TemplateData::Dictionary {
                        entries: vec![("GONE".to_string(), Handle::new(0x77))],
                        default_entry: Some(Handle::new(0x78)),
                    },
                )
                .unwrap();
            builder.resolve();
            builder.resolve();
        }
        assert_eq!(sink.for_handle(Handle::new(0xC)).len(), 2);
    }
}
