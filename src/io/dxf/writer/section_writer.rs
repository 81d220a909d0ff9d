//! DXF section writers
//!
//! HEADER, TABLES, BLOCKS and ENTITIES are written here; the OBJECTS
//! section lives in `objects_writer`.

use super::stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
use super::DxfWriterConfiguration;
use crate::document::CadDocument;
use crate::entities::*;
use crate::error::Result;
use crate::notification::{DiagnosticsSink, Notification};
use crate::tables::{BlockRecord, Layer};
use crate::types::Handle;

/// Writes all DXF sections of one document
pub struct SectionWriter<'a, W: DxfStreamWriter> {
    pub(super) writer: &'a mut W,
    pub(super) document: &'a CadDocument,
    pub(super) config: &'a DxfWriterConfiguration,
    sink: &'a mut dyn DiagnosticsSink,
}

impl<'a, W: DxfStreamWriter> SectionWriter<'a, W> {
    /// Create a new section writer
    pub fn new(
        writer: &'a mut W,
        document: &'a CadDocument,
        config: &'a DxfWriterConfiguration,
        sink: &'a mut dyn DiagnosticsSink,
    ) -> Self {
        Self {
            writer,
            document,
            config,
            sink,
        }
    }

    pub(super) fn notify(&mut self, notification: Notification) {
        self.sink.notify(notification);
    }

    /// Write the HEADER section
    pub fn write_header(&mut self) -> Result<()> {
        let document = self.document;
        let header = &document.header;
        self.writer.write_section_start("HEADER")?;

        self.write_header_variable("$ACADVER", |w| w.write_string(1, &header.version))?;
        self.write_header_variable("$DWGCODEPAGE", |w| w.write_string(3, &header.code_page))?;
        self.write_header_variable("$HANDSEED", |w| {
            w.write_handle(5, header.handle_seed)
        })?;

        self.writer.write_section_end()
    }

    /// Write a header variable
    fn write_header_variable<F>(&mut self, name: &str, write_value: F) -> Result<()>
    where
        F: FnOnce(&mut W) -> Result<()>,
    {
        self.writer.write_string(9, name)?;
        write_value(self.writer)
    }

    /// Write the TABLES section: LAYER, then BLOCK_RECORD
    pub fn write_tables(&mut self) -> Result<()> {
        let document = self.document;
        self.writer.write_section_start("TABLES")?;

        let layer_table = document.layers.handle();
        self.write_table_start("LAYER", layer_table, document.layers.len())?;
        for handle in document.layers.handles() {
            if let Some(layer) = document.get::<Layer>(handle) {
                self.write_layer(layer, layer_table)?;
            }
        }
        self.writer.write_string(0, "ENDTAB")?;

        let record_table = document.block_records.handle();
        self.write_table_start("BLOCK_RECORD", record_table, document.block_records.len())?;
        for handle in document.block_records.handles() {
            if let Some(record) = document.get::<BlockRecord>(handle) {
                self.write_block_record(record, record_table)?;
            }
        }
        self.writer.write_string(0, "ENDTAB")?;

        self.writer.write_section_end()
    }

    fn write_table_start(&mut self, name: &str, handle: Handle, count: usize) -> Result<()> {
        self.writer.write_string(0, "TABLE")?;
        self.writer.write_string(2, name)?;
        self.writer.write_handle(5, handle)?;
        self.writer.write_handle(330, Handle::NULL)?;
        self.writer.write_subclass("AcDbSymbolTable")?;
        self.writer
            .write_i16(70, i16::try_from(count).unwrap_or(i16::MAX))
    }

    fn write_layer(&mut self, layer: &Layer, table: Handle) -> Result<()> {
        self.writer.write_entity_type("LAYER")?;
        self.writer.write_handle(5, layer.common.handle)?;
        self.writer
            .write_handle(330, layer.common.owner.unwrap_or(table))?;
        self.writer.write_subclass("AcDbSymbolTableRecord")?;
        self.writer.write_subclass("AcDbLayerTableRecord")?;
        self.writer.write_string(2, &layer.name)?;
        self.writer.write_i16(70, layer.flags.bits())?;

        // A negative index marks a layer that is off
        let index = layer.color.approximate_index();
        self.writer
            .write_i16(62, if layer.off { -index } else { index })?;
        if let Some(rgb) = layer.color.true_color() {
            self.writer.write_i32(420, rgb)?;
        }
        self.writer.write_string(6, &layer.line_type)?;
        self.writer.write_bool(290, layer.is_plottable)?;

        self.writer.write_extended_data(&layer.common.extended_data)
    }

    fn write_block_record(&mut self, record: &BlockRecord, table: Handle) -> Result<()> {
        self.writer.write_entity_type("BLOCK_RECORD")?;
        self.writer.write_handle(5, record.common.handle)?;
        self.writer
            .write_handle(330, record.common.owner.unwrap_or(table))?;
        self.writer.write_subclass("AcDbSymbolTableRecord")?;
        self.writer.write_subclass("AcDbBlockTableRecord")?;
        self.writer.write_string(2, &record.name)?;
        self.writer.write_reference(340, record.layout)?;
        self.writer.write_i16(70, record.units)?;
        self.writer.write_byte(280, u8::from(record.explodable))?;
        self.writer
            .write_byte(281, u8::from(record.scale_uniformly))?;

        self.writer.write_extended_data(&record.common.extended_data)
    }

    /// Write the BLOCKS section.
    ///
    /// Every record gets its BLOCK/ENDBLK pair; the content of the model and
    /// paper space records goes to the ENTITIES section instead.
    pub fn write_blocks(&mut self) -> Result<()> {
        let document = self.document;
        self.writer.write_section_start("BLOCKS")?;

        for handle in document.block_records.handles() {
            let Some(record) = document.get::<BlockRecord>(handle) else {
                continue;
            };
            self.write_block_begin(record)?;
            if !self.is_layout_space(handle) {
                self.write_record_content(record)?;
            }
            self.write_block_end(record)?;
        }

        self.writer.write_section_end()
    }

    fn is_layout_space(&self, handle: Handle) -> bool {
        Some(handle) == self.document.model_space_handle()
            || Some(handle) == self.document.paper_space_handle()
    }

    fn write_block_begin(&mut self, record: &BlockRecord) -> Result<()> {
        let block = &record.block_entity;
        self.writer.write_entity_type("BLOCK")?;
        self.write_common_entity_data(&block.common, record)?;
        self.writer.write_subclass("AcDbBlockBegin")?;
        self.writer.write_string(2, &record.name)?;
        self.writer.write_i16(70, block.flags.bits())?;
        self.writer.write_point3d(10, block.base_point)?;
        self.writer.write_string(3, &record.name)?;
        self.writer.write_string(1, &block.xref_path)?;
        if !block.description.is_empty() {
            self.writer.write_string(4, &block.description)?;
        }

        self.writer.write_extended_data(&block.common.extended_data)
    }

    fn write_block_end(&mut self, record: &BlockRecord) -> Result<()> {
        let end = &record.block_end;
        self.writer.write_entity_type("ENDBLK")?;
        self.write_common_entity_data(&end.common, record)?;
        self.writer.write_subclass("AcDbBlockEnd")?;

        self.writer.write_extended_data(&end.common.extended_data)
    }

    /// Write the ENTITIES section: model space, then paper space
    pub fn write_entities(&mut self) -> Result<()> {
        let document = self.document;
        self.writer.write_section_start("ENTITIES")?;

        for record in [document.model_space(), document.paper_space()]
            .into_iter()
            .flatten()
        {
            self.write_record_content(record)?;
        }

        self.writer.write_section_end()
    }

    /// Entities of a record, then its viewports.
    fn write_record_content(&mut self, record: &BlockRecord) -> Result<()> {
        let document = self.document;
        for handle in record.entities.iter().chain(record.viewports.iter()) {
            match document.get::<EntityType>(*handle) {
                Some(entity) => self.write_entity(entity, record)?,
                None => log::trace!("{} not in the document, skipped", handle),
            }
        }
        Ok(())
    }

    fn write_entity(&mut self, entity: &EntityType, owner: &BlockRecord) -> Result<()> {
        match entity {
            EntityType::Point(point) => self.write_point(point, owner)?,
            EntityType::Line(line) => self.write_line(line, owner)?,
            EntityType::Circle(circle) => self.write_circle(circle, owner)?,
            EntityType::Text(text) => self.write_text(text, owner)?,
            EntityType::Insert(insert) => self.write_insert(insert, owner)?,
            EntityType::Viewport(viewport) => self.write_viewport(viewport, owner)?,
            // Markers only appear embedded in their record
            EntityType::Block(_) | EntityType::BlockEnd(_) => return Ok(()),
        }
        self.writer
            .write_extended_data(&entity.as_entity().common().extended_data)
    }

    /// Write common entity data
    fn write_common_entity_data(&mut self, common: &EntityCommon, owner: &BlockRecord) -> Result<()> {
        self.writer.write_handle(5, common.handle)?;
        self.writer.write_handle(330, owner.common.handle)?;
        self.writer.write_subclass("AcDbEntity")?;
        if owner.is_paper_space() {
            self.writer.write_i16(67, 1)?;
        }
        self.writer.write_string(8, &common.layer)?;
        self.writer.write_color(common.color)?;
        if common.invisible {
            self.writer.write_i16(60, 1)?;
        }
        Ok(())
    }

    /// Write POINT entity
    fn write_point(&mut self, point: &Point, owner: &BlockRecord) -> Result<()> {
        self.writer.write_entity_type("POINT")?;
        self.write_common_entity_data(&point.common, owner)?;
        self.writer.write_subclass("AcDbPoint")?;
        self.writer.write_point3d(10, point.location)?;
        if point.thickness != 0.0 {
            self.writer.write_double(39, point.thickness)?;
        }
        Ok(())
    }

    /// Write LINE entity
    fn write_line(&mut self, line: &Line, owner: &BlockRecord) -> Result<()> {
        self.writer.write_entity_type("LINE")?;
        self.write_common_entity_data(&line.common, owner)?;
        self.writer.write_subclass("AcDbLine")?;
        self.writer.write_point3d(10, line.start)?;
        self.writer.write_point3d(11, line.end)?;
        if line.thickness != 0.0 {
            self.writer.write_double(39, line.thickness)?;
        }
        Ok(())
    }

    /// Write CIRCLE entity
    fn write_circle(&mut self, circle: &Circle, owner: &BlockRecord) -> Result<()> {
        self.writer.write_entity_type("CIRCLE")?;
        self.write_common_entity_data(&circle.common, owner)?;
        self.writer.write_subclass("AcDbCircle")?;
        self.writer.write_point3d(10, circle.center)?;
        if circle.thickness != 0.0 {
            self.writer.write_double(39, circle.thickness)?;
        }
        self.writer.write_double(40, circle.radius)?;
        Ok(())
    }

    /// Write TEXT entity
    fn write_text(&mut self, text: &Text, owner: &BlockRecord) -> Result<()> {
        self.writer.write_entity_type("TEXT")?;
        self.write_common_entity_data(&text.common, owner)?;
        self.writer.write_subclass("AcDbText")?;
        self.writer.write_point3d(10, text.insertion_point)?;
        self.writer.write_double(40, text.height)?;
        self.writer.write_string(1, &text.value)?;
        if text.rotation != 0.0 {
            self.writer.write_double(50, text.rotation)?;
        }
        self.writer.write_string(7, &text.style)?;
        self.writer.write_subclass("AcDbText")?;
        Ok(())
    }

    /// Write INSERT entity; the resolved record's name wins over the stored one
    fn write_insert(&mut self, insert: &Insert, owner: &BlockRecord) -> Result<()> {
        let document = self.document;
        let block_name = insert
            .block_record
            .and_then(|handle| document.get::<BlockRecord>(handle))
            .map_or(insert.block_name.as_str(), |record| record.name.as_str());

        self.writer.write_entity_type("INSERT")?;
        self.write_common_entity_data(&insert.common, owner)?;
        self.writer.write_subclass("AcDbBlockReference")?;
        self.writer.write_string(2, block_name)?;
        self.writer.write_point3d(10, insert.insert_point)?;
        if insert.x_scale != 1.0 {
            self.writer.write_double(41, insert.x_scale)?;
        }
        if insert.y_scale != 1.0 {
            self.writer.write_double(42, insert.y_scale)?;
        }
        if insert.z_scale != 1.0 {
            self.writer.write_double(43, insert.z_scale)?;
        }
        if insert.rotation != 0.0 {
            self.writer.write_double(50, insert.rotation)?;
        }
        Ok(())
    }

    /// Write VIEWPORT entity
    fn write_viewport(&mut self, viewport: &Viewport, owner: &BlockRecord) -> Result<()> {
        self.writer.write_entity_type("VIEWPORT")?;
        self.write_common_entity_data(&viewport.common, owner)?;
        self.writer.write_subclass("AcDbViewport")?;
        self.writer.write_point3d(10, viewport.center)?;
        self.writer.write_double(40, viewport.width)?;
        self.writer.write_double(41, viewport.height)?;
        self.writer.write_i16(69, viewport.id)?;
        self.writer.write_point2d(12, viewport.view_center)?;
        self.writer.write_double(45, viewport.view_height)?;
        Ok(())
    }
}
