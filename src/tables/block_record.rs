//! Block record table entry

use super::TableEntry;
use crate::cad_object::ObjectCommon;
use crate::entities::{Block, BlockEnd};
use crate::types::{Handle, Vector3};

const MODEL_SPACE: &str = "*Model_Space";
const PAPER_SPACE: &str = "*Paper_Space";

/// A block definition: the owner of a set of entities.
///
/// Entities and viewports are held by handle in two disjoint collections.
/// The BLOCK/ENDBLK markers that frame the definition in DXF are embedded by
/// value; see [`merge_block_begin`].
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRecord {
    pub common: ObjectCommon,
    pub name: String,
    /// Insertion units (group code 70)
    pub units: i16,
    pub explodable: bool,
    pub scale_uniformly: bool,
    /// Begin marker carrying flags, base point, xref path and comments
    pub block_entity: Block,
    /// End marker
    pub block_end: BlockEnd,
    /// Owned entities other than viewports, in drawing order
    pub entities: Vec<Handle>,
    /// Owned viewports
    pub viewports: Vec<Handle>,
    /// Associated layout (reference, not owned)
    pub layout: Option<Handle>,
}

impl BlockRecord {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        BlockRecord {
            common: ObjectCommon::new(),
            block_entity: Block::new(name.clone(), Vector3::ZERO),
            name,
            units: 0,
            explodable: true,
            scale_uniformly: false,
            block_end: BlockEnd::new(),
            entities: Vec::new(),
            viewports: Vec::new(),
            layout: None,
        }
    }

    /// Create the model space block record
    pub fn model_space() -> Self {
        Self::new(MODEL_SPACE)
    }

    /// Create the paper space block record
    pub fn paper_space() -> Self {
        Self::new(PAPER_SPACE)
    }

    pub fn is_model_space(&self) -> bool {
        self.name.eq_ignore_ascii_case(MODEL_SPACE)
    }

    /// Paper space records are `*Paper_Space`, `*Paper_Space0`, ...
    pub fn is_paper_space(&self) -> bool {
        self.name
            .get(..PAPER_SPACE.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(PAPER_SPACE))
    }

    /// Whether the handle is in either owned collection.
    pub fn owns(&self, handle: Handle) -> bool {
        self.entities.contains(&handle) || self.viewports.contains(&handle)
    }

    /// Fold a BLOCK marker into this record.
    pub fn attach_block_begin(&mut self, begin: &Block) {
        let merged = merge_block_begin(&self.block_entity, begin);
        self.name = merged.name.clone();
        self.block_entity = merged;
    }

    /// Fold an ENDBLK marker into this record.
    pub fn attach_block_end(&mut self, end: &BlockEnd) {
        self.block_end = end.clone();
    }
}

/// Combine the record's current begin marker with a BLOCK read from input.
///
/// The result takes identity, flags, base point, xref path and comments
/// from `begin`. The name of `begin` wins only when it is non-empty.
/// Applying the same `begin` twice yields the same marker.
pub fn merge_block_begin(current: &Block, begin: &Block) -> Block {
    Block {
        common: begin.common.clone(),
        name: if begin.name.is_empty() {
            current.name.clone()
        } else {
            begin.name.clone()
        },
        flags: begin.flags,
        base_point: begin.base_point,
        description: begin.description.clone(),
        xref_path: begin.xref_path.clone(),
    }
}

impl TableEntry for BlockRecord {
    fn common(&self) -> &ObjectCommon {
        &self.common
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn table_name() -> &'static str {
        "BLOCK_RECORD"
    }
}
