//! FIFO of objects waiting to be written to the OBJECTS section.

use crate::cad_object::CadObject;
use crate::types::Handle;
use std::collections::{HashSet, VecDeque};

/// Breadth-first emission order over borrowed document objects.
///
/// A handle is accepted at most once over the lifetime of the queue, so
/// cyclic or shared dictionary membership cannot emit an object twice or
/// keep the drain loop alive.
#[derive(Debug, Default)]
pub struct EmissionQueue<'a> {
    pending: VecDeque<&'a CadObject>,
    seen: HashSet<Handle>,
    dequeued: usize,
}

impl<'a> EmissionQueue<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an object; `false` if its handle was queued before.
    pub fn enqueue(&mut self, object: &'a CadObject) -> bool {
        if !self.seen.insert(object.handle()) {
            return false;
        }
        self.pending.push_back(object);
        true
    }

    pub fn dequeue(&mut self) -> Option<&'a CadObject> {
        let object = self.pending.pop_front()?;
        self.dequeued += 1;
        Some(object)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Objects still waiting
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Number of objects handed out so far
    pub fn dequeued(&self) -> usize {
        self.dequeued
    }
}
