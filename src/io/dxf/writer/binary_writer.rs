//! Binary DXF writer

use super::stream_writer::DxfStreamWriter;
use crate::error::{DxfError, Result};
use crate::io::dxf::reader::BINARY_DXF_SENTINEL;
use crate::io::dxf::GroupCodeValueType;
use crate::types::Handle;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

/// Binary DXF stream writer.
///
/// The binary layout of a value follows its group code, not the method it
/// was written through, so `write_i16(290, 1)` still produces a single byte.
pub struct DxfBinaryWriter<W: Write> {
    writer: W,
}

impl<W: Write> DxfBinaryWriter<W> {
    /// Create a new binary DXF writer; the sentinel is written immediately.
    pub fn new(mut writer: W) -> Result<Self> {
        writer.write_all(BINARY_DXF_SENTINEL)?;
        Ok(Self { writer })
    }

    /// Write a group code as 16-bit little-endian and return its value type
    fn write_code(&mut self, code: i32) -> Result<GroupCodeValueType> {
        let value_type =
            GroupCodeValueType::from_code(code).ok_or(DxfError::InvalidGroupCode(code))?;
        // Codes above 32767 wrap to negative values
        self.writer.write_i16::<LittleEndian>(code as u16 as i16)?;
        Ok(value_type)
    }

    fn write_null_string(&mut self, value: &str) -> Result<()> {
        self.writer.write_all(value.as_bytes())?;
        self.writer.write_u8(0)?;
        Ok(())
    }

    fn write_integer(&mut self, code: i32, value: i64) -> Result<()> {
        match self.write_code(code)? {
            GroupCodeValueType::Int32 => self.writer.write_i32::<LittleEndian>(value as i32)?,
            GroupCodeValueType::Int64 => self.writer.write_i64::<LittleEndian>(value)?,
            GroupCodeValueType::Bool => self.writer.write_u8(u8::from(value != 0))?,
            GroupCodeValueType::Double => self.writer.write_f64::<LittleEndian>(value as f64)?,
            GroupCodeValueType::String | GroupCodeValueType::Handle => {
                self.write_null_string(&value.to_string())?
            }
            // 280-289 are bytes on the wire of text files only
            GroupCodeValueType::Int16 | GroupCodeValueType::Byte | GroupCodeValueType::Chunk => {
                self.writer.write_i16::<LittleEndian>(value as i16)?
            }
        }
        Ok(())
    }

    /// Get the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DxfStreamWriter for DxfBinaryWriter<W> {
    fn write_string(&mut self, code: i32, value: &str) -> Result<()> {
        self.write_code(code)?;
        self.write_null_string(value)
    }

    fn write_byte(&mut self, code: i32, value: u8) -> Result<()> {
        self.write_integer(code, i64::from(value))
    }

    fn write_i16(&mut self, code: i32, value: i16) -> Result<()> {
        self.write_integer(code, i64::from(value))
    }

    fn write_i32(&mut self, code: i32, value: i32) -> Result<()> {
        self.write_integer(code, i64::from(value))
    }

    fn write_i64(&mut self, code: i32, value: i64) -> Result<()> {
        self.write_integer(code, value)
    }

    fn write_double(&mut self, code: i32, value: f64) -> Result<()> {
        self.write_code(code)?;
        self.writer.write_f64::<LittleEndian>(value)?;
        Ok(())
    }

    fn write_bool(&mut self, code: i32, value: bool) -> Result<()> {
        self.write_integer(code, i64::from(value))
    }

    fn write_handle(&mut self, code: i32, handle: Handle) -> Result<()> {
        // Handles stay hexadecimal text in binary files
        self.write_code(code)?;
        self.write_null_string(&format!("{:X}", handle.value()))
    }

    fn write_binary(&mut self, code: i32, data: &[u8]) -> Result<()> {
        let len = u8::try_from(data.len()).map_err(|_| {
            DxfError::Encoding(format!(
                "binary chunk of {} bytes under code {} exceeds 255 bytes",
                data.len(),
                code
            ))
        })?;
        self.write_code(code)?;
        self.writer.write_u8(len)?;
        self.writer.write_all(data)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
