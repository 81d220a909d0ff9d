//! DXF stream reader trait and common types

use encoding_rs::Encoding;

use crate::error::{DxfError, Result};
use crate::io::dxf::GroupCodeValueType;
use crate::types::{Handle, Vector3};

/// A DXF code/value pair
#[derive(Debug, Clone, PartialEq)]
pub struct DxfCodePair {
    /// The DXF group code
    pub code: i32,

    /// The value type
    pub value_type: GroupCodeValueType,

    /// String representation of the value
    pub value_string: String,
}

impl DxfCodePair {
    /// Create a new code/value pair.
    ///
    /// Fails with [`DxfError::InvalidGroupCode`] for a code outside every
    /// known range.
    pub fn new(code: i32, value_string: impl Into<String>) -> Result<Self> {
        let value_type =
            GroupCodeValueType::from_code(code).ok_or(DxfError::InvalidGroupCode(code))?;
        Ok(Self {
            code,
            value_type,
            value_string: value_string.into(),
        })
    }

    /// Whether this pair has the given code and value.
    pub fn is(&self, code: i32, value: &str) -> bool {
        self.code == code && self.value_string == value
    }

    pub fn as_str(&self) -> &str {
        &self.value_string
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value_string.trim().parse::<i64>().ok()
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.as_i64().and_then(|v| i32::try_from(v).ok())
    }

    pub fn as_i16(&self) -> Option<i16> {
        self.as_i64().and_then(|v| i16::try_from(v).ok())
    }

    pub fn as_double(&self) -> Option<f64> {
        self.value_string.trim().parse::<f64>().ok()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_i64().map(|v| v != 0)
    }

    /// Parse the value as a hexadecimal handle.
    pub fn as_handle(&self) -> Option<Handle> {
        Handle::parse_hex(&self.value_string)
    }

    /// Parse the value as a reference; handle 0 means "none".
    pub fn as_reference(&self) -> Option<Handle> {
        self.as_handle().and_then(|h| Handle::from_raw(h.value()))
    }

    /// Decode a hex chunk (group codes 310-319 and 1004).
    pub fn as_bytes(&self) -> Vec<u8> {
        let text = self.value_string.trim();
        (0..text.len())
            .step_by(2)
            .filter_map(|i| {
                let end = (i + 2).min(text.len());
                text.get(i..end)
                    .and_then(|byte| u8::from_str_radix(byte, 16).ok())
            })
            .collect()
    }
}

/// Trait for reading DXF code/value pairs from a stream
pub trait DxfStreamReader {
    /// Read the next code/value pair; `None` at end of input
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>>;

    /// Peek at the next code without consuming it
    fn peek_code(&mut self) -> Result<Option<i32>>;

    /// Push a pair back to be read again on next read_pair call
    fn push_back(&mut self, pair: DxfCodePair);

    /// Reset the reader to the beginning
    fn reset(&mut self) -> Result<()>;

    /// Fallback encoding for non UTF-8 strings of pre-2007 files
    fn set_encoding(&mut self, encoding: &'static Encoding);
}

/// Helper for reading 3D points from consecutive code pairs
#[derive(Debug, Default)]
pub struct PointReader {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    group: Option<i32>,
}

impl PointReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a coordinate value; `false` if the pair is not part of this point.
    pub fn add_coordinate(&mut self, pair: &DxfCodePair) -> bool {
        let (Some(axis), Some(group)) = (
            GroupCodeValueType::coordinate_axis(pair.code),
            GroupCodeValueType::coordinate_group(pair.code),
        ) else {
            return false;
        };
        if self.group.is_some_and(|g| g != group) {
            return false;
        }
        let Some(value) = pair.as_double() else {
            return false;
        };

        self.group = Some(group);
        match axis {
            0 => self.x = Some(value),
            1 => self.y = Some(value),
            _ => self.z = Some(value),
        }
        true
    }

    /// The point, with z = 0 when no Z was given
    pub fn get_point(&self) -> Option<Vector3> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Vector3::new(x, y, self.z.unwrap_or(0.0))),
            _ => None,
        }
    }
}
