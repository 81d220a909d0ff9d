//! DXF (Drawing Exchange Format) reading and writing

mod code_page;
mod group_code_value;
mod reader;
mod writer;

pub use code_page::encoding_from_code_page;
pub use group_code_value::GroupCodeValueType;
pub use reader::{
    read_dxf, DxfBinaryReader, DxfCodePair, DxfReader, DxfReaderConfiguration, DxfStreamReader,
    DxfTextReader, BINARY_DXF_SENTINEL,
};
pub use writer::{
    write_binary_dxf, write_dxf, DxfBinaryWriter, DxfStreamWriter, DxfStreamWriterExt,
    DxfTextWriter, DxfWriter, DxfWriterConfiguration, EmissionQueue, SectionWriter,
};
