//! ASCII DXF writer

use super::stream_writer::DxfStreamWriter;
use crate::error::Result;
use crate::types::Handle;
use std::io::Write;

/// ASCII DXF stream writer
pub struct DxfTextWriter<W: Write> {
    writer: W,
}

impl<W: Write> DxfTextWriter<W> {
    /// Create a new ASCII DXF writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a DXF code right-aligned in a 3-character field
    fn write_code(&mut self, code: i32) -> Result<()> {
        writeln!(self.writer, "{:>3}", code)?;
        Ok(())
    }

    fn write_line(&mut self, code: i32, value: impl std::fmt::Display) -> Result<()> {
        self.write_code(code)?;
        writeln!(self.writer, "{}", value)?;
        Ok(())
    }

    /// Get the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Caret-escape the characters that would break the line structure.
pub(crate) fn escape(value: &str) -> std::borrow::Cow<'_, str> {
    if !value.contains(['^', '\n', '\r', '\t']) {
        return std::borrow::Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        match c {
            '^' => out.push_str("^ "),
            '\n' => out.push_str("^J"),
            '\r' => out.push_str("^M"),
            '\t' => out.push_str("^I"),
            _ => out.push(c),
        }
    }
    std::borrow::Cow::Owned(out)
}

/// Shortest text that parses back to the same value; integral values keep
/// one decimal.
pub(crate) fn format_double(value: f64) -> String {
    if value.is_finite() && value == value.trunc() {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

impl<W: Write> DxfStreamWriter for DxfTextWriter<W> {
    fn write_string(&mut self, code: i32, value: &str) -> Result<()> {
        self.write_line(code, escape(value))
    }

    fn write_byte(&mut self, code: i32, value: u8) -> Result<()> {
        self.write_line(code, value)
    }

    fn write_i16(&mut self, code: i32, value: i16) -> Result<()> {
        self.write_line(code, value)
    }

    fn write_i32(&mut self, code: i32, value: i32) -> Result<()> {
        self.write_line(code, value)
    }

    fn write_i64(&mut self, code: i32, value: i64) -> Result<()> {
        self.write_line(code, value)
    }

    fn write_double(&mut self, code: i32, value: f64) -> Result<()> {
        self.write_line(code, format_double(value))
    }

    fn write_bool(&mut self, code: i32, value: bool) -> Result<()> {
        self.write_line(code, u8::from(value))
    }

    fn write_handle(&mut self, code: i32, handle: Handle) -> Result<()> {
        self.write_line(code, format_args!("{:X}", handle.value()))
    }

    fn write_binary(&mut self, code: i32, data: &[u8]) -> Result<()> {
        self.write_code(code)?;
        for byte in data {
            write!(self.writer, "{:02X}", byte)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
