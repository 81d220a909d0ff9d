//! Extended data (XDATA) attached to any object.
//!
//! Stored in DXF under group codes 1000-1071, introduced per application by
//! a 1001 application name. Records keep their input order so that a
//! reloaded document writes them back unchanged.

use crate::types::{Handle, Vector3};

/// One extended data value, tagged by the group code it is written under.
#[derive(Debug, Clone, PartialEq)]
pub enum XDataValue {
    /// 1000
    String(String),
    /// 1002, either "{" or "}"
    ControlString(String),
    /// 1003
    LayerName(String),
    /// 1004
    BinaryData(Vec<u8>),
    /// 1005
    Handle(Handle),
    /// 1010/1020/1030
    Point3D(Vector3),
    /// 1011/1021/1031
    Position3D(Vector3),
    /// 1012/1022/1032
    Displacement3D(Vector3),
    /// 1013/1023/1033
    Direction3D(Vector3),
    /// 1040
    Real(f64),
    /// 1041
    Distance(f64),
    /// 1042
    ScaleFactor(f64),
    /// 1070
    Integer16(i16),
    /// 1071
    Integer32(i32),
}

impl XDataValue {
    /// Group code the value is written under (X code for points).
    pub fn code(&self) -> i32 {
        match self {
            XDataValue::String(_) => 1000,
            XDataValue::ControlString(_) => 1002,
            XDataValue::LayerName(_) => 1003,
            XDataValue::BinaryData(_) => 1004,
            XDataValue::Handle(_) => 1005,
            XDataValue::Point3D(_) => 1010,
            XDataValue::Position3D(_) => 1011,
            XDataValue::Displacement3D(_) => 1012,
            XDataValue::Direction3D(_) => 1013,
            XDataValue::Real(_) => 1040,
            XDataValue::Distance(_) => 1041,
            XDataValue::ScaleFactor(_) => 1042,
            XDataValue::Integer16(_) => 1070,
            XDataValue::Integer32(_) => 1071,
        }
    }
}

/// Extended data of a single registered application.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedDataRecord {
    /// Application name (group code 1001)
    pub application_name: String,
    pub values: Vec<XDataValue>,
}

impl ExtendedDataRecord {
    /// Create an empty record for an application.
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            values: Vec::new(),
        }
    }

    pub fn add_value(&mut self, value: XDataValue) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// All extended data of one object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendedData {
    records: Vec<ExtendedDataRecord>,
}

impl ExtendedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, merging into an existing record of the same application.
    pub fn add_record(&mut self, record: ExtendedDataRecord) {
        match self
            .records
            .iter_mut()
            .find(|r| r.application_name == record.application_name)
        {
            Some(existing) => existing.values.extend(record.values),
            None => self.records.push(record),
        }
    }

    pub fn records(&self) -> &[ExtendedDataRecord] {
        &self.records
    }

    /// Get a record by application name
    pub fn get_record(&self, application_name: &str) -> Option<&ExtendedDataRecord> {
        self.records
            .iter()
            .find(|r| r.application_name == application_name)
    }

    /// Handles referenced through 1005 values.
    ///
    /// These are reference edges only; they never imply ownership.
    pub fn referenced_handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.records.iter().flat_map(|r| {
            r.values.iter().filter_map(|v| match v {
                XDataValue::Handle(h) => Some(*h),
                _ => None,
            })
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
