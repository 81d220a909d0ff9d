//! DXF stream writer trait and common helpers

use crate::error::Result;
use crate::types::{Color, Handle, Vector2, Vector3};
use crate::xdata::{ExtendedData, XDataValue};

/// Trait for writing DXF code/value pairs
pub trait DxfStreamWriter {
    /// Write a code/value pair with a string value
    fn write_string(&mut self, code: i32, value: &str) -> Result<()>;

    /// Write a code/value pair with a byte value (for codes 280-289)
    fn write_byte(&mut self, code: i32, value: u8) -> Result<()>;

    /// Write a code/value pair with an integer value
    fn write_i16(&mut self, code: i32, value: i16) -> Result<()>;

    /// Write a code/value pair with an i32 value
    fn write_i32(&mut self, code: i32, value: i32) -> Result<()>;

    /// Write a code/value pair with an i64 value
    fn write_i64(&mut self, code: i32, value: i64) -> Result<()>;

    /// Write a code/value pair with a double value
    fn write_double(&mut self, code: i32, value: f64) -> Result<()>;

    /// Write a code/value pair with a boolean value
    fn write_bool(&mut self, code: i32, value: bool) -> Result<()>;

    /// Write a handle as its bare hexadecimal value; `0` for none
    fn write_handle(&mut self, code: i32, handle: Handle) -> Result<()>;

    /// Write binary data
    fn write_binary(&mut self, code: i32, data: &[u8]) -> Result<()>;

    /// Flush the writer
    fn flush(&mut self) -> Result<()>;
}

/// Extension trait for convenient writing operations
pub trait DxfStreamWriterExt: DxfStreamWriter {
    /// Write a 2D point (codes 10/20 or similar)
    fn write_point2d(&mut self, x_code: i32, point: Vector2) -> Result<()> {
        self.write_double(x_code, point.x)?;
        self.write_double(x_code + 10, point.y)?;
        Ok(())
    }

    /// Write a 3D point (codes 10/20/30 or similar)
    fn write_point3d(&mut self, x_code: i32, point: Vector3) -> Result<()> {
        self.write_double(x_code, point.x)?;
        self.write_double(x_code + 10, point.y)?;
        self.write_double(x_code + 20, point.z)?;
        Ok(())
    }

    /// Write an optional reference, `0` standing for none
    fn write_reference(&mut self, code: i32, handle: Option<Handle>) -> Result<()> {
        self.write_handle(code, handle.unwrap_or(Handle::NULL))
    }

    /// Write an entity color: nothing for ByLayer, 62 otherwise, plus 420
    /// for true colors.
    fn write_color(&mut self, color: Color) -> Result<()> {
        if color == Color::ByLayer {
            return Ok(());
        }
        self.write_i16(62, color.approximate_index())?;
        if let Some(rgb) = color.true_color() {
            self.write_i32(420, rgb)?;
        }
        Ok(())
    }

    /// Write the type name of a record
    fn write_entity_type(&mut self, entity_type: &str) -> Result<()> {
        self.write_string(0, entity_type)
    }

    /// Write a subclass marker
    fn write_subclass(&mut self, marker: &str) -> Result<()> {
        self.write_string(100, marker)
    }

    /// Write section start
    fn write_section_start(&mut self, section_name: &str) -> Result<()> {
        log::trace!("writing section {}", section_name);
        self.write_string(0, "SECTION")?;
        self.write_string(2, section_name)?;
        Ok(())
    }

    /// Write section end
    fn write_section_end(&mut self) -> Result<()> {
        self.write_string(0, "ENDSEC")
    }

    /// Write end of file
    fn write_eof(&mut self) -> Result<()> {
        self.write_string(0, "EOF")
    }

    /// Write the extended data of an object, one 1001 group per application
    fn write_extended_data(&mut self, xdata: &ExtendedData) -> Result<()> {
        for record in xdata.records() {
            self.write_string(1001, &record.application_name)?;

            for value in &record.values {
                let code = value.code();
                match value {
                    XDataValue::String(s)
                    | XDataValue::ControlString(s)
                    | XDataValue::LayerName(s) => self.write_string(code, s)?,
                    XDataValue::BinaryData(data) => self.write_binary(code, data)?,
                    XDataValue::Handle(h) => self.write_handle(code, *h)?,
                    XDataValue::Point3D(p)
                    | XDataValue::Position3D(p)
                    | XDataValue::Displacement3D(p)
                    | XDataValue::Direction3D(p) => self.write_point3d(code, *p)?,
                    XDataValue::Real(v) | XDataValue::Distance(v) | XDataValue::ScaleFactor(v) => {
                        self.write_double(code, *v)?
                    }
                    XDataValue::Integer16(i) => self.write_i16(code, *i)?,
                    XDataValue::Integer32(i) => self.write_i32(code, *i)?,
                }
            }
        }
        Ok(())
    }
}

// Auto-implement the extension trait for all stream writers
impl<T: DxfStreamWriter + ?Sized> DxfStreamWriterExt for T {}
