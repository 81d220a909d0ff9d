//! OBJECTS section
//!
//! Objects are written in breadth-first order starting at the root
//! dictionary. Anything not reachable through dictionary membership is not
//! written.

use super::emission_queue::EmissionQueue;
use super::section_writer::SectionWriter;
use super::stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
use crate::cad_object::{CadObject, ObjectCommon};
use crate::error::{DxfError, Result};
use crate::notification::{Notification, NotificationType};
use crate::objects::*;
use crate::types::Handle;

impl<'a, W: DxfStreamWriter> SectionWriter<'a, W> {
    /// Write the OBJECTS section
    pub fn write_objects(&mut self) -> Result<()> {
        self.writer.write_section_start("OBJECTS")?;

        let document = self.document;
        let mut queue = EmissionQueue::new();
        if let Some(root) = document
            .root_dictionary_handle()
            .and_then(|handle| document.object(handle))
        {
            queue.enqueue(root);
        }

        while let Some(object) = queue.dequeue() {
            if let CadObject::Object(ObjectType::Dictionary(dictionary)) = object {
                for (key, handle) in dictionary.entries() {
                    match document.object(handle) {
                        Some(member) => {
                            queue.enqueue(member);
                        }
                        None => self.notify(
                            Notification::new(
                                NotificationType::Warning,
                                format!("dictionary entry '{}' refers to a missing object", key),
                            )
                            .with_handle(handle),
                        ),
                    }
                }
            }
            self.write_object(object)?;
        }

        log::debug!("{} objects visited", queue.dequeued());
        self.writer.write_section_end()?;
        Ok(())
    }

    /// Whether an object produces a record in the OBJECTS section.
    fn is_emittable(&self, object: &CadObject) -> bool {
        match object {
            CadObject::Object(ObjectType::XRecord(_)) => !self.config.suppress_opaque_records,
            CadObject::Object(object) => object.as_opaque().is_none(),
            _ => true,
        }
    }

    fn write_object(&mut self, object: &CadObject) -> Result<()> {
        let object = match object {
            CadObject::Object(object) => object,
            other => {
                return Err(DxfError::UnsupportedObject {
                    handle: other.handle(),
                    object_name: other.object_name().to_string(),
                })
            }
        };

        match object {
            ObjectType::Dictionary(dictionary) => self.write_dictionary(dictionary),
            ObjectType::Layout(layout) => self.write_layout(layout),
            ObjectType::XRecord(xrecord) => {
                if self.config.suppress_opaque_records {
                    log::trace!("xrecord {} suppressed", xrecord.common.handle);
                    return Ok(());
                }
                self.write_xrecord(xrecord)
            }
            ObjectType::Group(group) => self.write_group(group),
            ObjectType::Scale(scale) => self.write_scale(scale),
            ObjectType::DictionaryVariable(variable) => self.write_dictionary_variable(variable),
            ObjectType::PageSetup(page_setup) => self.write_page_setup(page_setup),
            ObjectType::SortEntitiesTable(table) => self.write_sort_entities_table(table),
            ObjectType::Material(_)
            | ObjectType::VisualStyle(_)
            | ObjectType::PlaceHolder(_)
            | ObjectType::MLineStyle(_)
            | ObjectType::ImageDefinition(_)
            | ObjectType::BookColor(_)
            | ObjectType::MultiLeaderStyle(_) => {
                self.notify(
                    Notification::new(
                        NotificationType::NotImplemented,
                        format!("object {} not written", object.object_name()),
                    )
                    .with_handle(object.common().handle),
                );
                Ok(())
            }
            ObjectType::Unknown(unknown) => Err(DxfError::UnsupportedObject {
                handle: unknown.common.handle,
                object_name: unknown.object_name.clone(),
            }),
        }
    }

    fn write_object_start(&mut self, name: &str, common: &ObjectCommon) -> Result<()> {
        self.writer.write_entity_type(name)?;
        self.writer.write_handle(5, common.handle)?;
        self.writer.write_reference(330, common.owner)?;
        Ok(())
    }

    /// Whether `handle` names an object that is written out.
    fn is_written(&self, handle: Handle) -> bool {
        self.document
            .object(handle)
            .is_some_and(|object| self.is_emittable(object))
    }

    fn write_dictionary(&mut self, dictionary: &CadDictionary) -> Result<()> {
        let name = if dictionary.with_default {
            "ACDBDICTIONARYWDFLT"
        } else {
            "DICTIONARY"
        };
        self.write_object_start(name, &dictionary.common)?;
        self.writer.write_subclass("AcDbDictionary")?;
        self.writer.write_byte(280, u8::from(dictionary.hard_owner))?;
        self.writer
            .write_byte(281, dictionary.cloning.to_value() as u8)?;

        let owner_code = if dictionary.hard_owner { 360 } else { 350 };
        for (key, handle) in dictionary.entries() {
            if !self.is_written(handle) {
                continue;
            }
            self.writer.write_string(3, key)?;
            self.writer.write_handle(owner_code, handle)?;
        }

        if dictionary.with_default {
            let default_entry = dictionary.default_entry.filter(|&h| self.is_written(h));
            self.writer.write_subclass("AcDbDictionaryWithDefault")?;
            self.writer.write_reference(340, default_entry)?;
        }

        self.writer
            .write_extended_data(&dictionary.common.extended_data)
    }

    fn write_layout(&mut self, layout: &Layout) -> Result<()> {
        self.write_object_start("LAYOUT", &layout.common)?;
        self.write_plot_settings(&layout.plot_settings)?;

        self.writer.write_subclass("AcDbLayout")?;
        self.writer.write_string(1, &layout.name)?;
        self.writer.write_i16(70, layout.flags)?;
        self.writer.write_i16(71, layout.tab_order)?;
        self.writer.write_point2d(10, layout.min_limits)?;
        self.writer.write_point2d(11, layout.max_limits)?;
        self.writer.write_point3d(12, layout.insertion_base)?;
        self.writer.write_point3d(13, layout.origin)?;
        self.writer.write_point3d(14, layout.min_extents)?;
        self.writer.write_point3d(15, layout.max_extents)?;
        self.writer.write_point3d(16, layout.x_axis)?;
        self.writer.write_point3d(17, layout.y_axis)?;
        self.writer.write_double(146, layout.elevation)?;
        self.writer.write_reference(330, layout.block_record)?;
        self.writer.write_reference(331, layout.viewport)?;

        self.writer.write_extended_data(&layout.common.extended_data)
    }

    fn write_plot_settings(&mut self, settings: &PlotSettings) -> Result<()> {
        self.writer.write_subclass("AcDbPlotSettings")?;
        self.writer.write_string(1, &settings.page_name)?;
        self.writer.write_string(2, &settings.printer_name)?;
        self.writer.write_string(4, &settings.paper_size)?;
        self.writer.write_string(6, &settings.plot_view_name)?;
        self.writer.write_string(7, &settings.style_sheet)?;

        let margin = settings.unprintable_margin;
        self.writer.write_double(40, margin.left)?;
        self.writer.write_double(41, margin.bottom)?;
        self.writer.write_double(42, margin.right)?;
        self.writer.write_double(43, margin.top)?;
        self.writer.write_double(44, settings.paper_width)?;
        self.writer.write_double(45, settings.paper_height)?;
        self.writer.write_double(46, settings.plot_origin.x)?;
        self.writer.write_double(47, settings.plot_origin.y)?;
        self.writer.write_double(48, settings.window_lower_left.x)?;
        self.writer.write_double(49, settings.window_lower_left.y)?;
        self.writer.write_double(140, settings.window_upper_right.x)?;
        self.writer.write_double(141, settings.window_upper_right.y)?;
        self.writer.write_double(142, settings.numerator_scale)?;
        self.writer.write_double(143, settings.denominator_scale)?;

        self.writer.write_i16(70, settings.flags.bits())?;
        self.writer.write_i16(72, settings.paper_units)?;
        self.writer.write_i16(73, settings.paper_rotation)?;
        self.writer.write_i16(74, settings.plot_type)?;
        self.writer.write_i16(75, settings.standard_scale_type)?;
        self.writer.write_i16(76, settings.shade_plot_mode)?;
        self.writer.write_i16(77, settings.shade_plot_resolution)?;
        self.writer.write_i16(78, settings.shade_plot_dpi)?;
        self.writer.write_double(147, settings.print_scale)?;
        self.writer.write_double(148, settings.paper_image_origin.x)?;
        self.writer.write_double(149, settings.paper_image_origin.y)?;
        Ok(())
    }

    fn write_page_setup(&mut self, page_setup: &PageSetup) -> Result<()> {
        self.write_object_start("PLOTSETTINGS", &page_setup.common)?;
        self.write_plot_settings(&page_setup.settings)?;

        self.writer
            .write_extended_data(&page_setup.common.extended_data)
    }

    fn write_sort_entities_table(&mut self, table: &SortEntitiesTable) -> Result<()> {
        self.write_object_start("SORTENTSTABLE", &table.common)?;
        self.writer.write_subclass("AcDbSortentsTable")?;
        self.writer.write_reference(330, table.block_owner)?;
        for sorter in &table.sorters {
            self.writer.write_handle(331, sorter.entity)?;
            self.writer.write_handle(5, sorter.sort_handle)?;
        }

        self.writer.write_extended_data(&table.common.extended_data)
    }

    fn write_xrecord(&mut self, xrecord: &XRecord) -> Result<()> {
        self.write_object_start("XRECORD", &xrecord.common)?;
        self.writer.write_subclass("AcDbXrecord")?;
        self.writer
            .write_i16(280, xrecord.cloning.to_value())?;

        for entry in &xrecord.entries {
            let code = entry.code;
            match &entry.value {
                XRecordValue::String(value) => self.writer.write_string(code, value)?,
                XRecordValue::Double(value) => self.writer.write_double(code, *value)?,
                XRecordValue::Int16(value) => self.writer.write_i16(code, *value)?,
                XRecordValue::Int32(value) => self.writer.write_i32(code, *value)?,
                XRecordValue::Int64(value) => self.writer.write_i64(code, *value)?,
                XRecordValue::Bool(value) => self.writer.write_bool(code, *value)?,
                XRecordValue::Handle(handle) => self.writer.write_handle(code, *handle)?,
                XRecordValue::Chunk(data) => self.writer.write_binary(code, data)?,
            }
        }

        self.writer.write_extended_data(&xrecord.common.extended_data)
    }

    fn write_group(&mut self, group: &Group) -> Result<()> {
        self.write_object_start("GROUP", &group.common)?;
        self.writer.write_subclass("AcDbGroup")?;
        self.writer.write_string(300, &group.description)?;
        self.writer.write_i16(70, i16::from(group.unnamed))?;
        self.writer.write_i16(71, i16::from(group.selectable))?;
        for handle in &group.entities {
            self.writer.write_handle(340, *handle)?;
        }

        self.writer.write_extended_data(&group.common.extended_data)
    }

    fn write_scale(&mut self, scale: &Scale) -> Result<()> {
        self.write_object_start("SCALE", &scale.common)?;
        self.writer.write_subclass("AcDbScale")?;
        self.writer.write_string(300, &scale.name)?;
        self.writer.write_double(140, scale.paper_units)?;
        self.writer.write_double(141, scale.drawing_units)?;
        self.writer.write_bool(290, scale.is_unit_scale)?;

        self.writer.write_extended_data(&scale.common.extended_data)
    }

    fn write_dictionary_variable(&mut self, variable: &DictionaryVariable) -> Result<()> {
        self.write_object_start("DICTIONARYVAR", &variable.common)?;
        self.writer.write_subclass("DictionaryVariables")?;
        self.writer.write_i16(280, variable.schema_number)?;
        self.writer.write_string(1, &variable.value)?;

        self.writer
            .write_extended_data(&variable.common.extended_data)
    }
}
