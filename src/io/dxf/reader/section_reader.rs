//! DXF section readers
//!
//! Each section is parsed into objects whose references are left as raw
//! handles; everything is handed to the [`CadDocumentBuilder`], which links
//! the graph once the whole file has been read.

use super::stream_reader::{DxfCodePair, DxfStreamReader, PointReader};
use crate::cad_object::{CadObject, ObjectCommon};
use crate::entities::*;
use crate::error::Result;
use crate::io::builder::{BlockRecordLinks, CadDocumentBuilder, EntityLinks, TemplateData};
use crate::notification::{Notification, NotificationType};
use crate::objects::*;
use crate::tables::{BlockRecord, Layer, LayerFlags, TableEntryType};
use crate::types::{Color, Handle, Vector3};
use crate::xdata::{ExtendedData, ExtendedDataRecord, XDataValue};

use crate::io::dxf::GroupCodeValueType;

/// Section reader for parsing DXF sections
pub struct SectionReader<'a, 'b> {
    reader: &'a mut dyn DxfStreamReader,
    builder: &'a mut CadDocumentBuilder<'b>,
    keep_unknown_objects: bool,
}

/// Fields shared by every entity, collected while the entity is read.
#[derive(Default)]
struct EntityHeader {
    common: EntityCommon,
    links: EntityLinks,
    color_index: Option<i16>,
    true_color: Option<i32>,
}

impl EntityHeader {
    fn apply(&mut self, pair: &DxfCodePair) -> bool {
        match pair.code {
            5 => {
                if let Some(handle) = pair.as_handle() {
                    self.common.handle = handle;
                }
            }
            330 => self.common.owner = pair.as_reference(),
            8 => self.common.layer = pair.value_string.clone(),
            62 => self.color_index = pair.as_i16(),
            420 => self.true_color = pair.as_i32(),
            60 => self.common.invisible = pair.as_bool().unwrap_or(false),
            67 => self.links.paper_space = pair.as_bool().unwrap_or(false),
            _ => return false,
        }
        true
    }

    /// A 420 true color overrides the 62 index.
    fn finish(
        self,
        extended_data: ExtendedData,
        default_owner: Option<Handle>,
    ) -> (EntityCommon, EntityLinks) {
        let mut common = self.common;
        common.color = match (self.true_color, self.color_index) {
            (Some(rgb), _) => Color::from_true_color(rgb),
            (None, Some(index)) => Color::from_index(index),
            (None, None) => Color::ByLayer,
        };
        common.owner = common.owner.or(default_owner);
        common.extended_data = extended_data;
        (common, self.links)
    }
}

/// Fields shared by table entries and non-graphical objects.
///
/// Handle and owner come before the first subclass marker; after it the
/// same codes belong to the object's own data.
#[derive(Default)]
struct ObjectHeader {
    common: ObjectCommon,
    subclass: Option<String>,
}

impl ObjectHeader {
    fn apply(&mut self, pair: &DxfCodePair) -> bool {
        match pair.code {
            100 => self.subclass = Some(pair.value_string.clone()),
            5 if self.subclass.is_none() => {
                if let Some(handle) = pair.as_handle() {
                    self.common.handle = handle;
                }
            }
            330 if self.subclass.is_none() => self.common.owner = pair.as_reference(),
            _ => return false,
        }
        true
    }

    fn in_subclass(&self, name: &str) -> bool {
        self.subclass.as_deref() == Some(name)
    }

    fn finish(self, extended_data: ExtendedData) -> ObjectCommon {
        ObjectCommon {
            extended_data,
            ..self.common
        }
    }
}

fn set_f64(target: &mut f64, pair: &DxfCodePair) -> bool {
    match pair.as_double() {
        Some(value) => {
            *target = value;
            true
        }
        None => false,
    }
}

fn set_i16(target: &mut i16, pair: &DxfCodePair) -> bool {
    match pair.as_i16() {
        Some(value) => {
            *target = value;
            true
        }
        None => false,
    }
}

fn set_string(target: &mut String, pair: &DxfCodePair) -> bool {
    target.clone_from(&pair.value_string);
    true
}

/// AcDbPlotSettings fields, shared by layouts and page setups.
fn apply_plot_settings(settings: &mut PlotSettings, pair: &DxfCodePair) -> bool {
    match pair.code {
        1 => set_string(&mut settings.page_name, pair),
        2 => set_string(&mut settings.printer_name, pair),
        4 => set_string(&mut settings.paper_size, pair),
        6 => set_string(&mut settings.plot_view_name, pair),
        7 => set_string(&mut settings.style_sheet, pair),
        40 => set_f64(&mut settings.unprintable_margin.left, pair),
        41 => set_f64(&mut settings.unprintable_margin.bottom, pair),
        42 => set_f64(&mut settings.unprintable_margin.right, pair),
        43 => set_f64(&mut settings.unprintable_margin.top, pair),
        44 => set_f64(&mut settings.paper_width, pair),
        45 => set_f64(&mut settings.paper_height, pair),
        46 => set_f64(&mut settings.plot_origin.x, pair),
        47 => set_f64(&mut settings.plot_origin.y, pair),
        48 => set_f64(&mut settings.window_lower_left.x, pair),
        49 => set_f64(&mut settings.window_lower_left.y, pair),
        140 => set_f64(&mut settings.window_upper_right.x, pair),
        141 => set_f64(&mut settings.window_upper_right.y, pair),
        142 => set_f64(&mut settings.numerator_scale, pair),
        143 => set_f64(&mut settings.denominator_scale, pair),
        70 => match pair.as_i16() {
            Some(flags) => {
                settings.flags = PlotFlags::from_bits_retain(flags);
                true
            }
            None => false,
        },
        72 => set_i16(&mut settings.paper_units, pair),
        73 => set_i16(&mut settings.paper_rotation, pair),
        74 => set_i16(&mut settings.plot_type, pair),
        75 => set_i16(&mut settings.standard_scale_type, pair),
        76 => set_i16(&mut settings.shade_plot_mode, pair),
        77 => set_i16(&mut settings.shade_plot_resolution, pair),
        78 => set_i16(&mut settings.shade_plot_dpi, pair),
        147 => set_f64(&mut settings.print_scale, pair),
        148 => set_f64(&mut settings.paper_image_origin.x, pair),
        149 => set_f64(&mut settings.paper_image_origin.y, pair),
        _ => false,
    }
}

impl<'a, 'b> SectionReader<'a, 'b> {
    pub fn new(
        reader: &'a mut dyn DxfStreamReader,
        builder: &'a mut CadDocumentBuilder<'b>,
        keep_unknown_objects: bool,
    ) -> Self {
        Self {
            reader,
            builder,
            keep_unknown_objects,
        }
    }

    fn notify(&mut self, notification_type: NotificationType, message: String) {
        self.builder
            .notify(Notification::new(notification_type, message));
    }

    // ------------------------------------------------------------------
    // Field helpers
    // ------------------------------------------------------------------

    /// Next pair of the current record; `None` at the next code 0.
    fn next_field(&mut self) -> Result<Option<DxfCodePair>> {
        match self.reader.read_pair()? {
            Some(pair) if pair.code == 0 => {
                self.reader.push_back(pair);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Feed every field of the current record to `apply`.
    ///
    /// Application groups (`102 {...}`) are skipped and extended data is
    /// collected and returned.
    fn read_fields(
        &mut self,
        mut apply: impl FnMut(&DxfCodePair) -> bool,
    ) -> Result<ExtendedData> {
        let mut extended_data = ExtendedData::new();
        while let Some(pair) = self.next_field()? {
            match pair.code {
                102 if pair.value_string.starts_with('{') => self.skip_group()?,
                1001 => {
                    self.reader.push_back(pair);
                    for record in self.read_extended_data()?.records() {
                        extended_data.add_record(record.clone());
                    }
                }
                _ => {
                    apply(&pair);
                }
            }
        }
        Ok(extended_data)
    }

    fn skip_group(&mut self) -> Result<()> {
        while let Some(pair) = self.next_field()? {
            if pair.is(102, "}") {
                break;
            }
        }
        Ok(())
    }

    /// Skip the remaining fields of the current record.
    fn skip_record(&mut self) -> Result<()> {
        while self.next_field()?.is_some() {}
        Ok(())
    }

    /// Skip to the end of the current section.
    pub fn skip_section(&mut self, name: &str) -> Result<()> {
        self.notify(
            NotificationType::NotSupported,
            format!("section {} skipped", name),
        );
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "ENDSEC") {
                break;
            }
        }
        Ok(())
    }

    /// Read 1001-1071 groups until a pair that is not extended data.
    fn read_extended_data(&mut self) -> Result<ExtendedData> {
        let mut xdata = ExtendedData::new();
        let mut current: Option<ExtendedDataRecord> = None;

        while let Some(pair) = self.next_field()? {
            if pair.code == 1001 {
                if let Some(record) = current.take() {
                    xdata.add_record(record);
                }
                current = Some(ExtendedDataRecord::new(pair.value_string.clone()));
                continue;
            }
            if pair.code < 1000 {
                self.reader.push_back(pair);
                break;
            }
            let Some(record) = current.as_mut() else {
                continue;
            };

            let value = match pair.code {
                1000 => XDataValue::String(pair.value_string.clone()),
                1002 => XDataValue::ControlString(pair.value_string.clone()),
                1003 => XDataValue::LayerName(pair.value_string.clone()),
                1004 => XDataValue::BinaryData(pair.as_bytes()),
                1005 => XDataValue::Handle(pair.as_handle().unwrap_or(Handle::NULL)),
                1010..=1013 => {
                    let x = pair.as_double().unwrap_or(0.0);
                    let point = self.read_xdata_point(pair.code, x)?;
                    match pair.code {
                        1010 => XDataValue::Point3D(point),
                        1011 => XDataValue::Position3D(point),
                        1012 => XDataValue::Displacement3D(point),
                        _ => XDataValue::Direction3D(point),
                    }
                }
                1040 => XDataValue::Real(pair.as_double().unwrap_or(0.0)),
                1041 => XDataValue::Distance(pair.as_double().unwrap_or(0.0)),
                1042 => XDataValue::ScaleFactor(pair.as_double().unwrap_or(0.0)),
                1070 => XDataValue::Integer16(pair.as_i16().unwrap_or(0)),
                1071 => XDataValue::Integer32(pair.as_i32().unwrap_or(0)),
                _ => continue,
            };
            record.add_value(value);
        }

        if let Some(record) = current.take() {
            xdata.add_record(record);
        }
        Ok(xdata)
    }

    fn read_xdata_point(&mut self, x_code: i32, x: f64) -> Result<Vector3> {
        let mut point = Vector3::new(x, 0.0, 0.0);
        for (offset, axis) in [(10, 1), (20, 2)] {
            if self.reader.peek_code()? != Some(x_code + offset) {
                break;
            }
            if let Some(pair) = self.reader.read_pair()? {
                let value = pair.as_double().unwrap_or(0.0);
                if axis == 1 {
                    point.y = value;
                } else {
                    point.z = value;
                }
            }
        }
        Ok(point)
    }

    // ------------------------------------------------------------------
    // HEADER
    // ------------------------------------------------------------------

    /// Read the HEADER section
    pub fn read_header(&mut self) -> Result<()> {
        let mut header = self.builder.header().clone();
        let mut variable = String::new();

        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "ENDSEC") {
                break;
            }
            if pair.code == 9 {
                variable = pair.value_string;
                continue;
            }
            match (pair.code, variable.as_str()) {
                (1, "$ACADVER") => header.version = pair.value_string,
                (3, "$DWGCODEPAGE") => header.code_page = pair.value_string,
                (5, "$HANDSEED") => {
                    if let Some(seed) = pair.as_handle() {
                        header.handle_seed = seed;
                    }
                }
                _ => {}
            }
        }

        self.builder.set_header(header);
        Ok(())
    }

    // ------------------------------------------------------------------
    // TABLES
    // ------------------------------------------------------------------

    /// Read the TABLES section
    pub fn read_tables(&mut self) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "ENDSEC") {
                break;
            }
            if !pair.is(0, "TABLE") {
                continue;
            }
            match self.next_field()? {
                Some(name) if name.code == 2 => self.read_table(&name.value_string)?,
                _ => self.skip_record()?,
            }
        }
        Ok(())
    }

    fn read_table(&mut self, name: &str) -> Result<()> {
        let mut handle = None;
        self.read_fields(|pair| {
            if pair.code == 5 {
                handle = pair.as_handle();
            }
            true
        })?;
        if let Some(handle) = handle {
            self.builder.register_table(name, handle)?;
        }

        let supported = matches!(name, "LAYER" | "BLOCK_RECORD");
        if !supported {
            self.notify(
                NotificationType::NotSupported,
                format!("table {} skipped", name),
            );
        }

        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "ENDTAB") {
                break;
            }
            if pair.is(0, "ENDSEC") {
                self.reader.push_back(pair);
                break;
            }
            if pair.code != 0 {
                continue;
            }
            match (name, pair.value_string.as_str()) {
                ("LAYER", "LAYER") => self.read_layer()?,
                ("BLOCK_RECORD", "BLOCK_RECORD") => self.read_block_record()?,
                _ => self.skip_record()?,
            }
        }
        Ok(())
    }

    fn read_layer(&mut self) -> Result<()> {
        let mut header = ObjectHeader::default();
        let mut layer = Layer::new("");
        let mut color_index = None;
        let mut true_color = None;

        let xdata = self.read_fields(|pair| {
            header.apply(pair)
                || match pair.code {
                    2 => set_string(&mut layer.name, pair),
                    70 => {
                        if let Some(flags) = pair.as_i16() {
                            layer.flags = LayerFlags::from_bits_retain(flags);
                        }
                        true
                    }
                    62 => {
                        color_index = pair.as_i16();
                        true
                    }
                    420 => {
                        true_color = pair.as_i32();
                        true
                    }
                    6 => set_string(&mut layer.line_type, pair),
                    290 => {
                        layer.is_plottable = pair.as_bool().unwrap_or(true);
                        true
                    }
                    _ => false,
                }
        })?;

        if let Some(index) = color_index {
            layer.off = index < 0;
            layer.color = Color::from_index(index);
        }
        if let Some(rgb) = true_color {
            layer.color = Color::from_true_color(rgb);
        }
        layer.common = header.finish(xdata);

        self.builder.ingest(
            CadObject::TableEntry(TableEntryType::Layer(layer)),
            TemplateData::Plain,
        )?;
        Ok(())
    }

    fn read_block_record(&mut self) -> Result<()> {
        let mut header = ObjectHeader::default();
        let mut name = String::new();
        let mut links = BlockRecordLinks::default();
        let mut units = 0;
        let mut explodable = true;
        let mut scale_uniformly = false;

        let xdata = self.read_fields(|pair| {
            header.apply(pair)
                || match pair.code {
                    2 => set_string(&mut name, pair),
                    340 => {
                        links.layout = pair.as_reference();
                        true
                    }
                    70 => set_i16(&mut units, pair),
                    280 => {
                        explodable = pair.as_bool().unwrap_or(true);
                        true
                    }
                    281 => {
                        scale_uniformly = pair.as_bool().unwrap_or(false);
                        true
                    }
                    _ => false,
                }
        })?;

        let mut record = BlockRecord::new(name);
        record.common = header.finish(xdata);
        record.units = units;
        record.explodable = explodable;
        record.scale_uniformly = scale_uniformly;

        self.builder.ingest(
            CadObject::TableEntry(TableEntryType::BlockRecord(record)),
            TemplateData::BlockRecord(links),
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // BLOCKS
    // ------------------------------------------------------------------

    /// Read the BLOCKS section
    pub fn read_blocks(&mut self) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "ENDSEC") {
                break;
            }
            if pair.is(0, "BLOCK") {
                self.read_block()?;
            }
        }
        Ok(())
    }

    /// Read a single BLOCK...ENDBLK definition
    fn read_block(&mut self) -> Result<()> {
        let mut header = EntityHeader::default();
        let mut block = Block::new("", Vector3::ZERO);
        let mut base_point = PointReader::new();
        let mut second_name = String::new();

        let xdata = self.read_fields(|pair| {
            header.apply(pair)
                || match pair.code {
                    2 => set_string(&mut block.name, pair),
                    3 => set_string(&mut second_name, pair),
                    70 => {
                        if let Some(flags) = pair.as_i16() {
                            block.flags = BlockTypeFlags::from_bits_retain(flags);
                        }
                        true
                    }
                    10 | 20 | 30 => base_point.add_coordinate(pair),
                    1 => set_string(&mut block.xref_path, pair),
                    4 => set_string(&mut block.description, pair),
                    _ => false,
                }
        })?;

        if block.name.is_empty() {
            block.name = second_name;
        }
        if let Some(point) = base_point.get_point() {
            block.base_point = point;
        }
        let (common, _) = header.finish(xdata, None);
        block.common = common;

        let owner = block
            .common
            .owner
            .or_else(|| self.builder.block_record_by_name(&block.name));
        let name = block.name.clone();
        self.builder.ingest(
            CadObject::Entity(EntityType::Block(block)),
            TemplateData::BlockMarker,
        )?;

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code != 0 {
                continue;
            }
            match pair.value_string.as_str() {
                "ENDBLK" => return self.read_block_end(owner),
                "ENDSEC" | "BLOCK" => {
                    self.reader.push_back(pair);
                    self.notify(
                        NotificationType::Warning,
                        format!("block '{}' has no ENDBLK", name),
                    );
                    return Ok(());
                }
                _ => {
                    let entity_type = pair.value_string;
                    self.read_entity(&entity_type, owner)?;
                }
            }
        }
        Ok(())
    }

    fn read_block_end(&mut self, owner: Option<Handle>) -> Result<()> {
        let mut header = EntityHeader::default();
        let xdata = self.read_fields(|pair| header.apply(pair))?;
        let (common, _) = header.finish(xdata, owner);

        let mut end = BlockEnd::new();
        end.common = common;
        self.builder.ingest(
            CadObject::Entity(EntityType::BlockEnd(end)),
            TemplateData::BlockMarker,
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // ENTITIES
    // ------------------------------------------------------------------

    /// Read the ENTITIES section
    pub fn read_entities(&mut self) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "ENDSEC") {
                break;
            }
            if pair.code == 0 {
                let entity_type = pair.value_string;
                self.read_entity(&entity_type, None)?;
            }
        }
        Ok(())
    }

    /// Read one entity; `default_owner` applies when it has no 330.
    fn read_entity(&mut self, entity_type: &str, default_owner: Option<Handle>) -> Result<()> {
        match entity_type {
            "POINT" => self.read_point(default_owner),
            "LINE" => self.read_line(default_owner),
            "CIRCLE" => self.read_circle(default_owner),
            "TEXT" => self.read_text(default_owner),
            "INSERT" => self.read_insert(default_owner),
            "VIEWPORT" => self.read_viewport(default_owner),
            _ => {
                self.notify(
                    NotificationType::NotSupported,
                    format!("entity {} skipped", entity_type),
                );
                self.skip_record()
            }
        }
    }

    fn ingest_entity(
        &mut self,
        entity: EntityType,
        data: TemplateData,
    ) -> Result<()> {
        self.builder.ingest(CadObject::Entity(entity), data)?;
        Ok(())
    }

    /// Read a POINT entity
    fn read_point(&mut self, default_owner: Option<Handle>) -> Result<()> {
        let mut header = EntityHeader::default();
        let mut point = Point::new(Vector3::ZERO);
        let mut location = PointReader::new();

        let xdata = self.read_fields(|pair| {
            header.apply(pair)
                || match pair.code {
                    10 | 20 | 30 => location.add_coordinate(pair),
                    39 => set_f64(&mut point.thickness, pair),
                    _ => false,
                }
        })?;

        if let Some(pt) = location.get_point() {
            point.location = pt;
        }
        let (common, links) = header.finish(xdata, default_owner);
        point.common = common;
        self.ingest_entity(EntityType::Point(point), TemplateData::Entity(links))
    }

    /// Read a LINE entity
    fn read_line(&mut self, default_owner: Option<Handle>) -> Result<()> {
        let mut header = EntityHeader::default();
        let mut line = Line::new();
        let mut start = PointReader::new();
        let mut end = PointReader::new();

        let xdata = self.read_fields(|pair| {
            header.apply(pair)
                || match pair.code {
                    10 | 20 | 30 => start.add_coordinate(pair),
                    11 | 21 | 31 => end.add_coordinate(pair),
                    39 => set_f64(&mut line.thickness, pair),
                    _ => false,
                }
        })?;

        if let Some(pt) = start.get_point() {
            line.start = pt;
        }
        if let Some(pt) = end.get_point() {
            line.end = pt;
        }
        let (common, links) = header.finish(xdata, default_owner);
        line.common = common;
        self.ingest_entity(EntityType::Line(line), TemplateData::Entity(links))
    }

    /// Read a CIRCLE entity
    fn read_circle(&mut self, default_owner: Option<Handle>) -> Result<()> {
        let mut header = EntityHeader::default();
        let mut circle = Circle::new(Vector3::ZERO, 0.0);
        let mut center = PointReader::new();

        let xdata = self.read_fields(|pair| {
            header.apply(pair)
                || match pair.code {
                    10 | 20 | 30 => center.add_coordinate(pair),
                    40 => set_f64(&mut circle.radius, pair),
                    39 => set_f64(&mut circle.thickness, pair),
                    _ => false,
                }
        })?;

        if let Some(pt) = center.get_point() {
            circle.center = pt;
        }
        let (common, links) = header.finish(xdata, default_owner);
        circle.common = common;
        self.ingest_entity(EntityType::Circle(circle), TemplateData::Entity(links))
    }

    /// Read a TEXT entity
    fn read_text(&mut self, default_owner: Option<Handle>) -> Result<()> {
        let mut header = EntityHeader::default();
        let mut text = Text::default();
        let mut insertion = PointReader::new();

        let xdata = self.read_fields(|pair| {
            header.apply(pair)
                || match pair.code {
                    10 | 20 | 30 => insertion.add_coordinate(pair),
                    40 => set_f64(&mut text.height, pair),
                    1 => set_string(&mut text.value, pair),
                    50 => set_f64(&mut text.rotation, pair),
                    7 => set_string(&mut text.style, pair),
                    _ => false,
                }
        })?;

        if let Some(pt) = insertion.get_point() {
            text.insertion_point = pt;
        }
        let (common, links) = header.finish(xdata, default_owner);
        text.common = common;
        self.ingest_entity(EntityType::Text(text), TemplateData::Entity(links))
    }

    /// Read an INSERT entity; the block is resolved by name later.
    fn read_insert(&mut self, default_owner: Option<Handle>) -> Result<()> {
        let mut header = EntityHeader::default();
        let mut insert = Insert::new("", Vector3::ZERO);
        let mut location = PointReader::new();

        let xdata = self.read_fields(|pair| {
            header.apply(pair)
                || match pair.code {
                    2 => set_string(&mut insert.block_name, pair),
                    10 | 20 | 30 => location.add_coordinate(pair),
                    41 => set_f64(&mut insert.x_scale, pair),
                    42 => set_f64(&mut insert.y_scale, pair),
                    43 => set_f64(&mut insert.z_scale, pair),
                    50 => set_f64(&mut insert.rotation, pair),
                    _ => false,
                }
        })?;

        if let Some(pt) = location.get_point() {
            insert.insert_point = pt;
        }
        let (common, links) = header.finish(xdata, default_owner);
        insert.common = common;
        self.ingest_entity(
            EntityType::Insert(insert),
            TemplateData::Insert {
                links,
                block_record: None,
            },
        )
    }

    /// Read a VIEWPORT entity
    fn read_viewport(&mut self, default_owner: Option<Handle>) -> Result<()> {
        let mut header = EntityHeader::default();
        let mut viewport = Viewport::new();
        let mut center = PointReader::new();
        let mut view_center = PointReader::new();

        let xdata = self.read_fields(|pair| {
            header.apply(pair)
                || match pair.code {
                    10 | 20 | 30 => center.add_coordinate(pair),
                    12 | 22 => view_center.add_coordinate(pair),
                    40 => set_f64(&mut viewport.width, pair),
                    41 => set_f64(&mut viewport.height, pair),
                    45 => set_f64(&mut viewport.view_height, pair),
                    69 => set_i16(&mut viewport.id, pair),
                    _ => false,
                }
        })?;

        if let Some(pt) = center.get_point() {
            viewport.center = pt;
        }
        if let Some(pt) = view_center.get_point() {
            viewport.view_center = pt.xy();
        }
        let (common, links) = header.finish(xdata, default_owner);
        viewport.common = common;
        self.ingest_entity(EntityType::Viewport(viewport), TemplateData::Entity(links))
    }

    // ------------------------------------------------------------------
    // OBJECTS
    // ------------------------------------------------------------------

    /// Read the OBJECTS section
    pub fn read_objects(&mut self) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "ENDSEC") {
                break;
            }
            if pair.code != 0 {
                continue;
            }

            let object_name = pair.value_string;
            match object_name.as_str() {
                "DICTIONARY" => self.read_dictionary(false)?,
                "ACDBDICTIONARYWDFLT" => self.read_dictionary(true)?,
                "LAYOUT" => self.read_layout()?,
                "PLOTSETTINGS" => self.read_page_setup()?,
                "SORTENTSTABLE" => self.read_sort_entities_table()?,
                "XRECORD" => self.read_xrecord()?,
                "GROUP" => self.read_group()?,
                "SCALE" => self.read_scale()?,
                "DICTIONARYVAR" => self.read_dictionary_variable()?,
                _ => match ObjectType::opaque_from_name(&object_name) {
                    Some(object) => self.read_common_only(object)?,
                    None if self.keep_unknown_objects => {
                        let object = ObjectType::Unknown(UnknownObject::new(object_name));
                        self.read_common_only(object)?
                    }
                    None => {
                        self.notify(
                            NotificationType::NotSupported,
                            format!("object {} skipped", object_name),
                        );
                        self.skip_record()?
                    }
                },
            }
        }
        Ok(())
    }

    fn ingest_object(&mut self, object: ObjectType, data: TemplateData) -> Result<()> {
        self.builder.ingest(CadObject::Object(object), data)?;
        Ok(())
    }

    /// Read a DICTIONARY or ACDBDICTIONARYWDFLT object
    fn read_dictionary(&mut self, with_default: bool) -> Result<()> {
        let mut header = ObjectHeader::default();
        let mut dictionary = CadDictionary::new();
        dictionary.with_default = with_default;
        let mut entries = Vec::new();
        let mut default_entry = None;
        let mut current_key: Option<String> = None;

        let xdata = self.read_fields(|pair| {
            if header.apply(pair) {
                return true;
            }
            if header.in_subclass("AcDbDictionaryWithDefault") {
                if pair.code == 340 {
                    default_entry = pair.as_reference();
                    return true;
                }
                return false;
            }
            match pair.code {
                280 => {
                    dictionary.hard_owner = pair.as_bool().unwrap_or(false);
                    true
                }
                281 => {
                    if let Some(value) = pair.as_i16() {
                        dictionary.cloning = DictionaryCloningFlags::from_value(value);
                    }
                    true
                }
                3 => {
                    current_key = Some(pair.value_string.clone());
                    true
                }
                // 350 soft owner, 360 hard owner
                350 | 360 => {
                    if let (Some(key), Some(handle)) = (current_key.take(), pair.as_reference())
                    {
                        entries.push((key, handle));
                    }
                    true
                }
                _ => false,
            }
        })?;

        dictionary.common = header.finish(xdata);
        self.ingest_object(
            ObjectType::Dictionary(dictionary),
            TemplateData::Dictionary {
                entries,
                default_entry,
            },
        )
    }

    /// Read a LAYOUT object
    fn read_layout(&mut self) -> Result<()> {
        let mut header = ObjectHeader::default();
        let mut layout = Layout::new("");
        let mut block_record = None;
        let mut viewport = None;
        let mut min_limits = PointReader::new();
        let mut max_limits = PointReader::new();
        let mut insertion_base = PointReader::new();
        let mut min_extents = PointReader::new();
        let mut max_extents = PointReader::new();
        let mut origin = PointReader::new();
        let mut x_axis = PointReader::new();
        let mut y_axis = PointReader::new();

        let xdata = self.read_fields(|pair| {
            if header.apply(pair) {
                return true;
            }
            if header.in_subclass("AcDbPlotSettings") {
                return apply_plot_settings(&mut layout.plot_settings, pair);
            }
            if !header.in_subclass("AcDbLayout") {
                return false;
            }
            match pair.code {
                1 => set_string(&mut layout.name, pair),
                70 => set_i16(&mut layout.flags, pair),
                71 => set_i16(&mut layout.tab_order, pair),
                10 | 20 => min_limits.add_coordinate(pair),
                11 | 21 => max_limits.add_coordinate(pair),
                12 | 22 | 32 => insertion_base.add_coordinate(pair),
                13 | 23 | 33 => origin.add_coordinate(pair),
                14 | 24 | 34 => min_extents.add_coordinate(pair),
                15 | 25 | 35 => max_extents.add_coordinate(pair),
                16 | 26 | 36 => x_axis.add_coordinate(pair),
                17 | 27 | 37 => y_axis.add_coordinate(pair),
                146 => set_f64(&mut layout.elevation, pair),
                330 => {
                    block_record = pair.as_reference();
                    true
                }
                331 => {
                    viewport = pair.as_reference();
                    true
                }
                _ => false,
            }
        })?;

        if let Some(pt) = min_limits.get_point() {
            layout.min_limits = pt.xy();
        }
        if let Some(pt) = max_limits.get_point() {
            layout.max_limits = pt.xy();
        }
        if let Some(pt) = insertion_base.get_point() {
            layout.insertion_base = pt;
        }
        if let Some(pt) = min_extents.get_point() {
            layout.min_extents = pt;
        }
        if let Some(pt) = max_extents.get_point() {
            layout.max_extents = pt;
        }
        if let Some(pt) = origin.get_point() {
            layout.origin = pt;
        }
        if let Some(pt) = x_axis.get_point() {
            layout.x_axis = pt;
        }
        if let Some(pt) = y_axis.get_point() {
            layout.y_axis = pt;
        }
        layout.common = header.finish(xdata);

        self.ingest_object(
            ObjectType::Layout(layout),
            TemplateData::Layout {
                block_record,
                viewport,
            },
        )
    }

    /// Read a PLOTSETTINGS object
    fn read_page_setup(&mut self) -> Result<()> {
        let mut header = ObjectHeader::default();
        let mut page_setup = PageSetup::default();

        let xdata = self.read_fields(|pair| {
            header.apply(pair)
                || (header.in_subclass("AcDbPlotSettings")
                    && apply_plot_settings(&mut page_setup.settings, pair))
        })?;

        page_setup.common = header.finish(xdata);
        self.ingest_object(ObjectType::PageSetup(page_setup), TemplateData::Plain)
    }

    /// Read a SORTENTSTABLE object
    ///
    /// After the subclass marker, 330 names the sorted block record and each
    /// 331 entity is followed by its 5 sort handle.
    fn read_sort_entities_table(&mut self) -> Result<()> {
        let mut header = ObjectHeader::default();
        let mut block_owner = None;
        let mut sorters = Vec::new();
        let mut pending_entity: Option<Handle> = None;

        let xdata = self.read_fields(|pair| {
            if header.apply(pair) {
                return true;
            }
            if !header.in_subclass("AcDbSortentsTable") {
                return false;
            }
            match pair.code {
                330 => {
                    block_owner = pair.as_reference();
                    true
                }
                331 => {
                    pending_entity = pair.as_reference();
                    true
                }
                5 => {
                    if let (Some(entity), Some(sort_handle)) =
                        (pending_entity.take(), pair.as_handle())
                    {
                        sorters.push((entity, sort_handle));
                    }
                    true
                }
                _ => false,
            }
        })?;

        let mut table = SortEntitiesTable::new();
        table.common = header.finish(xdata);
        self.ingest_object(
            ObjectType::SortEntitiesTable(table),
            TemplateData::SortEntitiesTable {
                block_owner,
                sorters,
            },
        )
    }

    /// Read an XRECORD object; data pairs are kept with their codes.
    fn read_xrecord(&mut self) -> Result<()> {
        let mut header = ObjectHeader::default();
        let mut xrecord = XRecord::new();
        let mut cloning_read = false;

        let xdata = self.read_fields(|pair| {
            if header.apply(pair) {
                return true;
            }
            if !header.in_subclass("AcDbXrecord") {
                return false;
            }
            if pair.code == 280 && !cloning_read {
                cloning_read = true;
                if let Some(value) = pair.as_i16() {
                    xrecord.cloning = DictionaryCloningFlags::from_value(value);
                }
                return true;
            }

            let value = match pair.value_type {
                GroupCodeValueType::String => XRecordValue::String(pair.value_string.clone()),
                GroupCodeValueType::Double => {
                    XRecordValue::Double(pair.as_double().unwrap_or(0.0))
                }
                GroupCodeValueType::Int16 | GroupCodeValueType::Byte => {
                    XRecordValue::Int16(pair.as_i16().unwrap_or(0))
                }
                GroupCodeValueType::Int32 => XRecordValue::Int32(pair.as_i32().unwrap_or(0)),
                GroupCodeValueType::Int64 => XRecordValue::Int64(pair.as_i64().unwrap_or(0)),
                GroupCodeValueType::Bool => XRecordValue::Bool(pair.as_bool().unwrap_or(false)),
                GroupCodeValueType::Handle => {
                    XRecordValue::Handle(pair.as_handle().unwrap_or(Handle::NULL))
                }
                GroupCodeValueType::Chunk => XRecordValue::Chunk(pair.as_bytes()),
            };
            xrecord.push(pair.code, value);
            true
        })?;

        xrecord.common = header.finish(xdata);
        self.ingest_object(ObjectType::XRecord(xrecord), TemplateData::Plain)
    }

    /// Read a GROUP object
    fn read_group(&mut self) -> Result<()> {
        let mut header = ObjectHeader::default();
        let mut group = Group::new("");
        let mut entities = Vec::new();

        let xdata = self.read_fields(|pair| {
            header.apply(pair)
                || match pair.code {
                    300 => set_string(&mut group.description, pair),
                    70 => {
                        group.unnamed = pair.as_bool().unwrap_or(false);
                        true
                    }
                    71 => {
                        group.selectable = pair.as_bool().unwrap_or(true);
                        true
                    }
                    340 => {
                        if let Some(handle) = pair.as_reference() {
                            entities.push(handle);
                        }
                        true
                    }
                    _ => false,
                }
        })?;

        group.common = header.finish(xdata);
        self.ingest_object(ObjectType::Group(group), TemplateData::Group { entities })
    }

    /// Read a SCALE object
    fn read_scale(&mut self) -> Result<()> {
        let mut header = ObjectHeader::default();
        let mut scale = Scale::new("", 1.0, 1.0);

        let xdata = self.read_fields(|pair| {
            header.apply(pair)
                || match pair.code {
                    300 => set_string(&mut scale.name, pair),
                    140 => set_f64(&mut scale.paper_units, pair),
                    141 => set_f64(&mut scale.drawing_units, pair),
                    290 => {
                        scale.is_unit_scale = pair.as_bool().unwrap_or(false);
                        true
                    }
                    _ => false,
                }
        })?;

        scale.common = header.finish(xdata);
        self.ingest_object(ObjectType::Scale(scale), TemplateData::Plain)
    }

    /// Read a DICTIONARYVAR object
    fn read_dictionary_variable(&mut self) -> Result<()> {
        let mut header = ObjectHeader::default();
        let mut variable = DictionaryVariable::new("");

        let xdata = self.read_fields(|pair| {
            header.apply(pair)
                || match pair.code {
                    280 => set_i16(&mut variable.schema_number, pair),
                    1 => set_string(&mut variable.value, pair),
                    _ => false,
                }
        })?;

        variable.common = header.finish(xdata);
        self.ingest_object(ObjectType::DictionaryVariable(variable), TemplateData::Plain)
    }

    /// Keep an object's identity and owner; its own data is not retained.
    fn read_common_only(&mut self, mut object: ObjectType) -> Result<()> {
        let mut header = ObjectHeader::default();
        let xdata = self.read_fields(|pair| header.apply(pair))?;
        *object.common_mut() = header.finish(xdata);
        self.ingest_object(object, TemplateData::Plain)
    }
}

#[cfg(test)]
mod tests {
    use super::super::text_reader::DxfTextReader;
    use super::*;
    use crate::notification::NotificationCollection;
    use std::io::{BufReader, Cursor};

    fn text_reader(data: &str) -> DxfTextReader<Cursor<Vec<u8>>> {
        DxfTextReader::new(BufReader::new(Cursor::new(data.as_bytes().to_vec())))
    }

    #[test]
    fn test_entity_color_and_xdata() {
        let data = "  5\n2A\n330\n1F\n  8\nWALLS\n 62\n1\n420\n16711680\n 10\n1.0\n 20\n2.0\n 11\n3.0\n 21\n4.0\n\
                    1001\nACME\n1000\nnote\n1010\n1.0\n1020\n2.0\n1030\n3.0\n  0\nEOF\n";
        let mut stream = text_reader(data);
        let mut sink = NotificationCollection::new();
        let mut builder = CadDocumentBuilder::new(&mut sink);
        {
            let mut section = SectionReader::new(&mut stream, &mut builder, false);
            section.read_entity("LINE", None).unwrap();
        }

        let line = builder.registry().lookup::<Line>(Handle::new(0x2A)).unwrap();
        assert_eq!(line.common.owner, Some(Handle::new(0x1F)));
        assert_eq!(line.common.layer, "WALLS");
        assert_eq!(line.common.color, Color::Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(line.end, Vector3::new(3.0, 4.0, 0.0));

        let record = &line.common.extended_data.records()[0];
        assert_eq!(record.application_name, "ACME");
        assert_eq!(
            record.values,
            vec![
                XDataValue::String("note".into()),
                XDataValue::Point3D(Vector3::new(1.0, 2.0, 3.0)),
            ]
        );
    }

    #[test]
    fn test_unknown_entity_is_skipped_with_notice() {
        let data = "  5\n2A\n 10\n0.0\n  0\nLINE\n  5\n2B\n  0\nEOF\n";
        let mut stream = text_reader(data);
        let mut sink = NotificationCollection::new();
        {
            let mut builder = CadDocumentBuilder::new(&mut sink);
            let mut section = SectionReader::new(&mut stream, &mut builder, false);
            section.read_entity("SPLINE", None).unwrap();
        }
        assert!(sink.has_type(NotificationType::NotSupported));
        assert_eq!(stream.read_pair().unwrap().unwrap().value_string, "LINE");
    }

    #[test]
    fn test_layout_subclass_codes() {
        let data = "  5\n40\n330\n1A\n100\nAcDbPlotSettings\n  1\nSetup A\n  4\nA4\n\
                    100\nAcDbLayout\n  1\nLayout1\n 71\n1\n330\n1E\n331\n0\n  0\nEOF\n";
        let mut stream = text_reader(data);
        let mut sink = NotificationCollection::new();
        let mut builder = CadDocumentBuilder::new(&mut sink);
        {
            let mut section = SectionReader::new(&mut stream, &mut builder, false);
            section.read_layout().unwrap();
        }

        let layout = builder.registry().lookup::<Layout>(Handle::new(0x40)).unwrap();
        assert_eq!(layout.common.owner, Some(Handle::new(0x1A)));
        assert_eq!(layout.plot_settings.page_name, "Setup A");
        assert_eq!(layout.plot_settings.paper_size, "A4");
        assert_eq!(layout.name, "Layout1");
        assert_eq!(layout.tab_order, 1);
        assert_eq!(
            builder.template(Handle::new(0x40)).map(|t| t.data.clone()),
            Some(TemplateData::Layout {
                block_record: Some(Handle::new(0x1E)),
                viewport: None,
            })
        );
    }

    #[test]
    fn test_xrecord_entries_keep_codes() {
        let data = "  5\n50\n102\n{ACAD_REACTORS\n330\n1A\n102\n}\n330\n1A\n100\nAcDbXrecord\n\
                    280\n1\n  1\nhello\n 40\n2.5\n280\n3\n340\n2B\n  0\nEOF\n";
        let mut stream = text_reader(data);
        let mut sink = NotificationCollection::new();
        let mut builder = CadDocumentBuilder::new(&mut sink);
        {
            let mut section = SectionReader::new(&mut stream, &mut builder, false);
            section.read_xrecord().unwrap();
        }

        let xrecord = builder.registry().lookup::<XRecord>(Handle::new(0x50)).unwrap();
        assert_eq!(xrecord.common.owner, Some(Handle::new(0x1A)));
        assert_eq!(xrecord.cloning, DictionaryCloningFlags::KeepExisting);
        let codes: Vec<i32> = xrecord.entries.iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![1, 40, 280, 340]);
        assert_eq!(xrecord.entries[3].value, XRecordValue::Handle(Handle::new(0x2B)));
    }
}
