//! Group object - named selection of entities

use crate::cad_object::ObjectCommon;
use crate::types::Handle;

/// A named set of entities.
///
/// Members are referenced, not owned: removing a group leaves its entities
/// in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub common: ObjectCommon,
    /// Group description (group code 300)
    pub description: String,
    /// Member entity handles (group code 340)
    pub entities: Vec<Handle>,
    /// Group is selectable (group code 71)
    pub selectable: bool,
    /// Unnamed group (group code 70)
    pub unnamed: bool,
}

impl Group {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            common: ObjectCommon::new(),
            description: description.into(),
            entities: Vec::new(),
            selectable: true,
            unnamed: false,
        }
    }

    /// Add an entity, ignoring handles already present
    pub fn add_entity(&mut self, handle: Handle) {
        if !self.entities.contains(&handle) {
            self.entities.push(handle);
        }
    }
}
