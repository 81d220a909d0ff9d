//! I/O: the document builder and the DXF reader and writer

pub mod builder;
pub mod dxf;

pub use builder::CadDocumentBuilder;
pub use dxf::{
    read_dxf, write_binary_dxf, write_dxf, DxfReader, DxfReaderConfiguration, DxfWriter,
    DxfWriterConfiguration,
};
