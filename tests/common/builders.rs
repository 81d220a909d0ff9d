//! Test document builders.
//!
//! `create_sample_document()` exercises every object kind the writer
//! supports: custom layers and blocks, entities in both spaces, extended
//! data, groups, nested dictionaries holding xrecords and scales, a
//! dictionary with a default entry, a page setup and a draw order table.

#![allow(dead_code)]

use acadgraph::entities::*;
use acadgraph::objects::*;
use acadgraph::tables::{BlockRecord, Layer};
use acadgraph::types::{Color, Handle, Vector2, Vector3};
use acadgraph::xdata::{ExtendedDataRecord, XDataValue};
use acadgraph::CadDocument;

/// Handles of the interesting objects of the sample document.
pub struct SampleHandles {
    pub door: Handle,
    pub model_line: Handle,
    pub model_circle: Handle,
    pub insert: Handle,
    pub paper_viewport: Handle,
    pub group: Handle,
    pub settings: Handle,
    pub acme_dictionary: Handle,
    pub scale: Handle,
    pub plot_styles: Handle,
    pub normal_style: Handle,
    pub page_setup: Handle,
    pub sort_table: Handle,
}

pub fn create_sample_document() -> (CadDocument, SampleHandles) {
    let mut doc = CadDocument::new();
    let model = doc.model_space_handle().unwrap();
    let paper = doc.paper_space_handle().unwrap();
    let root = doc.root_dictionary_handle().unwrap();

    // Tables
    let mut walls = Layer::new("WALLS");
    walls.color = Color::Rgb { r: 200, g: 40, b: 40 };
    walls.line_type = "DASHED".to_string();
    doc.add_layer(walls).unwrap();

    let mut hidden = Layer::new("HIDDEN");
    hidden.color = Color::Index(5);
    hidden.off = true;
    hidden.is_plottable = false;
    doc.add_layer(hidden).unwrap();

    let mut door_record = BlockRecord::new("DOOR");
    door_record.block_entity.base_point = Vector3::new(1.0, 0.5, 0.0);
    door_record.block_entity.description = "single leaf door".to_string();
    door_record.units = 4;
    let door = doc.add_block_record(door_record).unwrap();
    doc.add_entity(
        door,
        EntityType::Line(Line::from_points(Vector3::ZERO, Vector3::new(0.0, 2.1, 0.0))),
    )
    .unwrap();
    doc.add_entity(door, EntityType::Circle(Circle::new(Vector3::ZERO, 0.9)))
        .unwrap();

    // Model space
    let mut line = Line::from_points(Vector3::new(0.0, 0.0, 0.0), Vector3::new(10.0, 0.0, 0.0));
    line.common.layer = "WALLS".to_string();
    line.thickness = 0.25;
    let mut xdata = ExtendedDataRecord::new("ACME");
    xdata.add_value(XDataValue::String("load bearing".into()));
    xdata.add_value(XDataValue::Integer16(3));
    xdata.add_value(XDataValue::Point3D(Vector3::new(1.0, 2.0, 3.0)));
    xdata.add_value(XDataValue::Real(1.0 / 3.0));
    line.common.extended_data.add_record(xdata);
    let model_line = doc.add_entity(model, EntityType::Line(line)).unwrap();

    let mut circle = Circle::new(Vector3::new(5.0, 5.0, 0.0), 2.5);
    circle.common.color = Color::Index(1);
    let model_circle = doc.add_entity(model, EntityType::Circle(circle)).unwrap();

    let mut text = Text::new("Ground floor\tplan ^1", Vector3::new(0.0, -2.0, 0.0), 0.35);
    text.rotation = 12.5;
    doc.add_entity(model, EntityType::Text(text)).unwrap();

    let mut point = Point::new(Vector3::new(-1.0, -1.0, 0.0));
    point.common.invisible = true;
    point.common.color = Color::ByBlock;
    doc.add_entity(model, EntityType::Point(point)).unwrap();

    let mut insert = Insert::new("DOOR", Vector3::new(3.0, 0.0, 0.0));
    insert.block_record = Some(door);
    insert.rotation = 90.0;
    insert.x_scale = 2.0;
    let insert = doc.add_entity(model, EntityType::Insert(insert)).unwrap();

    // Paper space
    let mut viewport = Viewport::new();
    viewport.center = Vector3::new(148.5, 105.0, 0.0);
    viewport.view_center = Vector2::new(5.0, 5.0);
    let paper_viewport = doc.add_entity(paper, EntityType::Viewport(viewport)).unwrap();
    doc.add_entity(
        paper,
        EntityType::Text(Text::new("Title", Vector3::new(10.0, 10.0, 0.0), 5.0)),
    )
    .unwrap();

    // Objects
    let groups = doc.root_dictionary().unwrap().get("ACAD_GROUP").unwrap();
    let mut group = Group::new("walls and openings");
    group.add_entity(model_line);
    group.add_entity(insert);
    let group = doc
        .add_object(groups, "WALLS_GROUP", ObjectType::Group(group))
        .unwrap();

    let mut settings = XRecord::new();
    settings.push(1, XRecordValue::String("metric".into()));
    settings.push(40, XRecordValue::Double(0.001));
    settings.push(70, XRecordValue::Int16(12));
    settings.push(90, XRecordValue::Int32(100_000));
    settings.push(160, XRecordValue::Int64(1 << 40));
    settings.push(290, XRecordValue::Bool(true));
    settings.push(340, XRecordValue::Handle(model_line));
    settings.push(310, XRecordValue::Chunk(vec![0xDE, 0xAD, 0xBE, 0xEF]));
    let settings = doc
        .add_object(root, "ACME_SETTINGS", ObjectType::XRecord(settings))
        .unwrap();

    let acme_dictionary = doc
        .add_object(root, "ACME_DICT", ObjectType::Dictionary(CadDictionary::new()))
        .unwrap();
    let scale = doc
        .add_object(
            acme_dictionary,
            "1:100",
            ObjectType::Scale(Scale::new("1:100", 1.0, 100.0)),
        )
        .unwrap();
    doc.add_object(
        acme_dictionary,
        "UNITS",
        ObjectType::DictionaryVariable(DictionaryVariable::new("mm")),
    )
    .unwrap();

    let plot_styles = doc
        .add_object(
            root,
            "ACAD_PLOTSTYLENAME",
            ObjectType::Dictionary(CadDictionary::with_default(None)),
        )
        .unwrap();
    let normal_style = doc
        .add_object(
            plot_styles,
            "Normal",
            ObjectType::DictionaryVariable(DictionaryVariable::new("Normal")),
        )
        .unwrap();
    doc.get_mut::<CadDictionary>(plot_styles).unwrap().default_entry = Some(normal_style);

    let page_setups = doc
        .add_object(
            root,
            "ACAD_PLOTSETTINGS",
            ObjectType::Dictionary(CadDictionary::new()),
        )
        .unwrap();
    let mut page_setup = PageSetup::new("A3 plot");
    let plot = &mut page_setup.settings;
    plot.printer_name = "DWG To PDF.pc3".to_string();
    plot.paper_size = "ISO_A3_(420.00_x_297.00_MM)".to_string();
    plot.style_sheet = "monochrome.ctb".to_string();
    plot.unprintable_margin = PaperMargin {
        left: 7.5,
        bottom: 20.0,
        right: 7.5,
        top: 20.0,
    };
    plot.paper_width = 420.0;
    plot.paper_height = 297.0;
    plot.plot_origin = Vector2::new(11.25, 0.5);
    plot.flags = PlotFlags::PLOT_CENTERED | PlotFlags::USE_STANDARD_SCALE;
    plot.paper_units = 1;
    plot.paper_rotation = 1;
    plot.plot_type = 1;
    plot.standard_scale_type = 16;
    plot.print_scale = 0.5;
    plot.paper_image_origin = Vector2::new(1.5, 2.5);
    let page_setup = doc
        .add_object(page_setups, "A3 plot", ObjectType::PageSetup(page_setup))
        .unwrap();

    // Draw the circle below the line.
    let mut sort_table = SortEntitiesTable::new();
    sort_table.block_owner = Some(model);
    sort_table.set_sort_handle(model_line, model_circle);
    sort_table.set_sort_handle(model_circle, model_line);
    let sort_table = doc
        .add_object(
            root,
            "ACAD_SORTENTS",
            ObjectType::SortEntitiesTable(sort_table),
        )
        .unwrap();

    let handles = SampleHandles {
        door,
        model_line,
        model_circle,
        insert,
        paper_viewport,
        group,
        settings,
        acme_dictionary,
        scale,
        plot_styles,
        normal_style,
        page_setup,
        sort_table,
    };
    (doc, handles)
}
