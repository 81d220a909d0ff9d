//! XRecord object - opaque application data

use super::DictionaryCloningFlags;
use crate::cad_object::ObjectCommon;
use crate::types::Handle;

/// Typed value of one xrecord entry.
#[derive(Debug, Clone, PartialEq)]
pub enum XRecordValue {
    String(String),
    Double(f64),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Bool(bool),
    /// Handle-valued codes (320-369, 390-399, 480-481); not resolved
    Handle(Handle),
    /// Binary chunk (310-319)
    Chunk(Vec<u8>),
}

/// One group code / value pair of an xrecord.
#[derive(Debug, Clone, PartialEq)]
pub struct XRecordEntry {
    pub code: i32,
    pub value: XRecordValue,
}

/// Application data carried through a document without interpretation.
///
/// Xrecords are the "opaque record" variant: writers may be configured to
/// leave them out entirely.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XRecord {
    pub common: ObjectCommon,
    pub cloning: DictionaryCloningFlags,
    pub entries: Vec<XRecordEntry>,
}

impl XRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, code: i32, value: XRecordValue) {
        self.entries.push(XRecordEntry { code, value });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
