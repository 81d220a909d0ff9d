//! DictionaryVariable object - a named string value

use crate::cad_object::ObjectCommon;

/// Value stored under a key of the `AcDbVariableDictionary`.
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryVariable {
    pub common: ObjectCommon,
    /// Object schema number (group code 280)
    pub schema_number: i16,
    /// Value (group code 1)
    pub value: String,
}

impl DictionaryVariable {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            common: ObjectCommon::new(),
            schema_number: 0,
            value: value.into(),
        }
    }
}
