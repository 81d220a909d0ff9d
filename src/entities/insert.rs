//! Insert entity (block reference)

use super::EntityCommon;
use crate::types::{Handle, Vector3};

/// Reference to a block definition placed in another block.
///
/// The DXF form names the block (group code 2); once loaded,
/// `block_record` holds the handle of the referenced [`BlockRecord`].
/// That handle is a reference edge, the insert does not own the record.
///
/// [`BlockRecord`]: crate::tables::BlockRecord
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub common: EntityCommon,
    /// Name of the referenced block as read or last written
    pub block_name: String,
    /// Resolved block record
    pub block_record: Option<Handle>,
    pub insert_point: Vector3,
    pub x_scale: f64,
    pub y_scale: f64,
    pub z_scale: f64,
    /// Rotation angle in degrees
    pub rotation: f64,
}

impl Insert {
    pub fn new(block_name: impl Into<String>, insert_point: Vector3) -> Self {
        Insert {
            common: EntityCommon::new(),
            block_name: block_name.into(),
            block_record: None,
            insert_point,
            x_scale: 1.0,
            y_scale: 1.0,
            z_scale: 1.0,
            rotation: 0.0,
        }
    }
}

super::impl_entity!(Insert, "INSERT");
