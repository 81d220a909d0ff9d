//! Graphical entities and the block begin/end markers.

use crate::types::{Color, Handle};
use crate::xdata::ExtendedData;

pub mod block;
pub mod circle;
pub mod insert;
pub mod line;
pub mod point;
pub mod text;
pub mod viewport;

pub use block::{Block, BlockEnd, BlockTypeFlags};
pub use circle::Circle;
pub use insert::Insert;
pub use line::Line;
pub use point::Point;
pub use text::Text;
pub use viewport::Viewport;

/// Behaviour shared by every entity.
pub trait Entity {
    fn common(&self) -> &EntityCommon;

    fn common_mut(&mut self) -> &mut EntityCommon;

    /// DXF type name written under group code 0
    fn entity_type(&self) -> &'static str;

    fn handle(&self) -> Handle {
        self.common().handle
    }

    fn layer(&self) -> &str {
        &self.common().layer
    }

    fn color(&self) -> Color {
        self.common().color
    }
}

/// Common entity data shared by all entities
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommon {
    pub handle: Handle,
    /// Block record the entity belongs to
    pub owner: Option<Handle>,
    /// Layer name
    pub layer: String,
    pub color: Color,
    /// Visibility flag (group code 60)
    pub invisible: bool,
    pub extended_data: ExtendedData,
}

impl EntityCommon {
    /// Create new common entity data on layer "0"
    pub fn new() -> Self {
        EntityCommon {
            handle: Handle::NULL,
            owner: None,
            layer: "0".to_string(),
            color: Color::ByLayer,
            invisible: false,
            extended_data: ExtendedData::new(),
        }
    }

    /// Create with a specific layer
    pub fn with_layer(layer: impl Into<String>) -> Self {
        EntityCommon {
            layer: layer.into(),
            ..Self::new()
        }
    }
}

impl Default for EntityCommon {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! impl_entity {
    ($ty:ident, $name:literal) => {
        impl $crate::entities::Entity for $ty {
            fn common(&self) -> &$crate::entities::EntityCommon {
                &self.common
            }

            fn common_mut(&mut self) -> &mut $crate::entities::EntityCommon {
                &mut self.common
            }

            fn entity_type(&self) -> &'static str {
                $name
            }
        }
    };
}

pub(crate) use impl_entity;

/// Enumeration of all entity types for type-safe storage
#[derive(Debug, Clone, PartialEq)]
pub enum EntityType {
    Point(Point),
    Line(Line),
    Circle(Circle),
    Text(Text),
    /// Block reference
    Insert(Insert),
    /// Paper space viewport, kept apart from the other entities of a block
    Viewport(Viewport),
    /// Block definition begin marker
    Block(Block),
    /// Block definition end marker
    BlockEnd(BlockEnd),
}

impl EntityType {
    /// Get a reference to the entity trait object
    pub fn as_entity(&self) -> &dyn Entity {
        match self {
            EntityType::Point(e) => e,
            EntityType::Line(e) => e,
            EntityType::Circle(e) => e,
            EntityType::Text(e) => e,
            EntityType::Insert(e) => e,
            EntityType::Viewport(e) => e,
            EntityType::Block(e) => e,
            EntityType::BlockEnd(e) => e,
        }
    }

    /// Get a mutable reference to the entity trait object
    pub fn as_entity_mut(&mut self) -> &mut dyn Entity {
        match self {
            EntityType::Point(e) => e,
            EntityType::Line(e) => e,
            EntityType::Circle(e) => e,
            EntityType::Text(e) => e,
            EntityType::Insert(e) => e,
            EntityType::Viewport(e) => e,
            EntityType::Block(e) => e,
            EntityType::BlockEnd(e) => e,
        }
    }

    /// Whether this is a block begin/end marker rather than drawable content.
    pub fn is_structural_marker(&self) -> bool {
        matches!(self, EntityType::Block(_) | EntityType::BlockEnd(_))
    }
}
