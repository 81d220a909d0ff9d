//! DXF writer module

mod binary_writer;
mod emission_queue;
mod objects_writer;
mod section_writer;
mod stream_writer;
mod text_writer;

pub use binary_writer::DxfBinaryWriter;
pub use emission_queue::EmissionQueue;
pub use section_writer::SectionWriter;
pub use stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
pub use text_writer::DxfTextWriter;

use crate::document::CadDocument;
use crate::error::Result;
use crate::notification::NotificationCollection;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Configuration for the DXF writer.
#[derive(Debug, Clone, Default)]
pub struct DxfWriterConfiguration {
    /// Leave every XRECORD out of the OBJECTS section, together with the
    /// dictionary entries pointing at them.
    pub suppress_opaque_records: bool,
}

/// DXF file writer
///
/// The document is borrowed; objects are written straight from its arena.
pub struct DxfWriter<'a> {
    document: &'a CadDocument,
    /// Whether to write binary DXF format
    pub binary: bool,
    config: DxfWriterConfiguration,
    notifications: NotificationCollection,
}

impl<'a> DxfWriter<'a> {
    /// Create a new DXF writer for ASCII output
    pub fn new(document: &'a CadDocument) -> Self {
        Self {
            document,
            binary: false,
            config: DxfWriterConfiguration::default(),
            notifications: NotificationCollection::new(),
        }
    }

    /// Create a new DXF writer for binary output
    pub fn new_binary(document: &'a CadDocument) -> Self {
        Self {
            binary: true,
            ..Self::new(document)
        }
    }

    /// Set the writer configuration.
    pub fn with_configuration(mut self, config: DxfWriterConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Set whether to write binary format
    pub fn set_binary(&mut self, binary: bool) {
        self.binary = binary;
    }

    /// Notifications raised by the last write.
    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }

    /// Write to a file
    pub fn write_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to_writer(BufWriter::new(file))
    }

    /// Write to any writer
    pub fn write_to_writer<W: Write>(&mut self, writer: W) -> Result<()> {
        if self.binary {
            let mut stream_writer = DxfBinaryWriter::new(writer)?;
            self.write_with_sink(&mut stream_writer)
        } else {
            let mut stream_writer = DxfTextWriter::new(writer);
            self.write_with_sink(&mut stream_writer)
        }
    }

    /// Write to a byte vector (useful for testing)
    pub fn write_to_vec(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to_writer(&mut buffer)?;
        Ok(buffer)
    }

    /// Write all sections through any stream writer.
    pub fn write_with_sink<S: DxfStreamWriter>(&mut self, writer: &mut S) -> Result<()> {
        self.notifications = NotificationCollection::new();
        {
            let mut sections =
                SectionWriter::new(writer, self.document, &self.config, &mut self.notifications);
            sections.write_header()?;
            sections.write_tables()?;
            sections.write_blocks()?;
            sections.write_entities()?;
            sections.write_objects()?;
        }

        writer.write_eof()?;
        writer.flush()?;
        log::debug!(
            "document written with {} notifications",
            self.notifications.len()
        );
        Ok(())
    }

    /// Get a reference to the document
    pub fn document(&self) -> &CadDocument {
        self.document
    }
}

/// Write a document to an ASCII DXF file.
pub fn write_dxf<P: AsRef<Path>>(document: &CadDocument, path: P) -> Result<()> {
    DxfWriter::new(document).write_to_file(path)
}

/// Write a document to a binary DXF file.
pub fn write_binary_dxf<P: AsRef<Path>>(document: &CadDocument, path: P) -> Result<()> {
    DxfWriter::new_binary(document).write_to_file(path)
}
