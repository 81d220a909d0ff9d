//! Symbol tables and their entries.
//!
//! Table entries live in the document arena like every other object. A
//! [`Table`] is only the name index over them: a case-insensitive map from
//! entry name to handle, in insertion order.

use std::marker::PhantomData;

use indexmap::IndexMap;

use crate::cad_object::ObjectCommon;
use crate::types::Handle;

pub mod block_record;
pub mod layer;

pub use block_record::{merge_block_begin, BlockRecord};
pub use layer::{Layer, LayerFlags};

/// Base trait for all table entries
pub trait TableEntry {
    fn common(&self) -> &ObjectCommon;

    fn name(&self) -> &str;

    /// DXF name of the table this entry belongs to
    fn table_name() -> &'static str
    where
        Self: Sized;

    fn handle(&self) -> Handle {
        self.common().handle
    }
}

/// Entry of any supported table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEntryType {
    BlockRecord(BlockRecord),
    Layer(Layer),
}

impl TableEntryType {
    pub fn common(&self) -> &ObjectCommon {
        match self {
            TableEntryType::BlockRecord(e) => &e.common,
            TableEntryType::Layer(e) => &e.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut ObjectCommon {
        match self {
            TableEntryType::BlockRecord(e) => &mut e.common,
            TableEntryType::Layer(e) => &mut e.common,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TableEntryType::BlockRecord(e) => &e.name,
            TableEntryType::Layer(e) => &e.name,
        }
    }

    pub fn object_name(&self) -> &'static str {
        match self {
            TableEntryType::BlockRecord(_) => BlockRecord::table_name(),
            TableEntryType::Layer(_) => Layer::table_name(),
        }
    }
}

/// Name index of one symbol table.
#[derive(Debug, Clone)]
pub struct Table<T: TableEntry> {
    /// Entry handles keyed by uppercase name
    entries: IndexMap<String, Handle>,
    /// Handle of the TABLE record itself
    handle: Handle,
    _entry: PhantomData<T>,
}

impl<T: TableEntry> Table<T> {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::with_handle(Handle::NULL)
    }

    /// Create a table with a specific handle
    pub fn with_handle(handle: Handle) -> Self {
        Table {
            entries: IndexMap::new(),
            handle,
            _entry: PhantomData,
        }
    }

    /// Get the table's handle
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Set the table's handle
    pub fn set_handle(&mut self, handle: Handle) {
        self.handle = handle;
    }

    /// Index an entry under its name.
    ///
    /// Fails when the name is already taken (names are case-insensitive).
    pub fn add(&mut self, entry: &T) -> Result<(), String> {
        let key = entry.name().to_uppercase();
        if self.entries.contains_key(&key) {
            return Err(format!(
                "Entry '{}' already exists in table {}",
                entry.name(),
                T::table_name()
            ));
        }
        self.entries.insert(key, entry.handle());
        Ok(())
    }

    /// Get an entry handle by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<Handle> {
        self.entries.get(&name.to_uppercase()).copied()
    }

    /// Check if an entry exists (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_uppercase())
    }

    /// Drop an entry from the index by handle.
    pub fn remove_handle(&mut self, handle: Handle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|_, h| *h != handle);
        before != self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry handles in insertion order
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.entries.values().copied()
    }
}

impl<T: TableEntry> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}
