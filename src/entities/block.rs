//! Block begin/end markers
//!
//! In the DXF stream every block definition is framed by a BLOCK and an
//! ENDBLK record. Once a document is built both markers are folded into the
//! owning [`BlockRecord`](crate::tables::BlockRecord).

use bitflags::bitflags;

use super::EntityCommon;
use crate::types::Vector3;

bitflags! {
    /// Block-type flags (group code 70 of BLOCK)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlockTypeFlags: i16 {
        const ANONYMOUS = 1;
        const HAS_ATTRIBUTES = 2;
        const XREF = 4;
        const XREF_OVERLAY = 8;
        const EXTERNALLY_DEPENDENT = 16;
        const RESOLVED_XREF = 32;
        const REFERENCED_XREF = 64;
    }
}

/// Block definition begin marker
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub common: EntityCommon,
    /// Block name (mirrors the BlockRecord name)
    pub name: String,
    pub flags: BlockTypeFlags,
    pub base_point: Vector3,
    /// Free-form comments (group code 4)
    pub description: String,
    /// External reference path (group code 1)
    pub xref_path: String,
}

impl Block {
    pub fn new(name: impl Into<String>, base_point: Vector3) -> Self {
        Self {
            common: EntityCommon::default(),
            name: name.into(),
            flags: BlockTypeFlags::empty(),
            base_point,
            description: String::new(),
            xref_path: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_xref_path(mut self, xref_path: impl Into<String>) -> Self {
        self.xref_path = xref_path.into();
        self
    }
}

/// Block definition end marker
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockEnd {
    pub common: EntityCommon,
}

impl BlockEnd {
    pub fn new() -> Self {
        Self::default()
    }
}

super::impl_entity!(Block, "BLOCK");
super::impl_entity!(BlockEnd, "ENDBLK");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_builders() {
        let block = Block::new("WINDOW", Vector3::new(1.0, 1.0, 0.0))
            .with_description("double hung")
            .with_xref_path("lib/window.dwg");
        assert_eq!(block.name, "WINDOW");
        assert_eq!(block.description, "double hung");
        assert_eq!(block.xref_path, "lib/window.dwg");
        assert!(block.flags.is_empty());
    }

    #[test]
    fn test_flags_keep_unknown_bits() {
        let flags = BlockTypeFlags::from_bits_retain(0x104);
        assert!(flags.contains(BlockTypeFlags::XREF));
        assert_eq!(flags.bits(), 0x104);
    }
}
