//! # acadgraph
//!
//! Reads and writes CAD documents in DXF format (ASCII and binary) as a
//! graph of handle-linked objects.
//!
//! Every object of a file carries a handle; ownership and references
//! between objects are stored as handles and only resolved once the whole
//! file has been read. The resolved document keeps all objects in a single
//! arena, and writing walks that arena without copying it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use acadgraph::{read_dxf, DxfWriter, EntityType, Line};
//!
//! let mut document = read_dxf("sample.dxf")?;
//! for notification in document.notifications.iter() {
//!     println!("{}", notification);
//! }
//!
//! let model = document.model_space_handle().unwrap();
//! document.add_entity(model, EntityType::Line(Line::new()))?;
//! DxfWriter::new(&document).write_to_file("output.dxf")?;
//! # Ok::<(), acadgraph::DxfError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`CadObject`] - closed variant over entities, table entries and objects
//! - [`ObjectVariant`] - typed lookup into the arena
//! - [`io::builder::CadDocumentBuilder`] - two-phase load: ingest, then resolve
//! - [`CadDocument`] - the resolved object graph
//! - [`io::dxf::EmissionQueue`] - breadth-first order of the OBJECTS section

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cad_object;
pub mod document;
pub mod entities;
pub mod error;
pub mod io;
pub mod notification;
pub mod objects;
pub mod tables;
pub mod types;
pub mod xdata;

// Re-export commonly used types
pub use cad_object::{CadObject, ObjectCommon, ObjectVariant};
pub use error::{DxfError, Result};
pub use types::{Color, Handle, Vector2, Vector3};

// Re-export entity types
pub use entities::{
    Block, BlockEnd, Circle, Entity, EntityCommon, EntityType, Insert, Line, Point, Text, Viewport,
};

// Re-export table types
pub use tables::{BlockRecord, Layer, Table, TableEntry, TableEntryType};

// Re-export object types
pub use objects::{CadDictionary, Group, Layout, ObjectType, XRecord};

// Re-export document
pub use document::{CadDocument, HeaderVariables};
pub use notification::{DiagnosticsSink, Notification, NotificationCollection, NotificationType};

// Re-export I/O types
pub use io::dxf::{
    read_dxf, write_binary_dxf, write_dxf, DxfReader, DxfReaderConfiguration, DxfWriter,
    DxfWriterConfiguration,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_cad_document_creation() {
        let doc = CadDocument::new();
        assert_eq!(doc.header.version, "AC1032");
        assert!(doc.model_space().is_some());
        assert!(doc.paper_space().is_some());
        assert!(doc.root_dictionary().is_some());
    }
}
