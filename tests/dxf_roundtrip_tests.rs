//! Write/read/write round trips through both DXF encodings.

mod common;

use acadgraph::entities::{EntityType, Insert, Line, Text};
use acadgraph::io::dxf::{DxfReaderConfiguration, DxfWriter, DxfWriterConfiguration};
use acadgraph::objects::{
    CadDictionary, ObjectType, OpaqueObject, PageSetup, PlotFlags, Scale, SortEntitiesTable, XRecord,
    XRecordValue,
};
use acadgraph::{
    BlockRecord, CadDocument, DxfError, Handle, NotificationType, Vector2, Vector3,
};
use common::builders::create_sample_document;
use common::*;

#[test]
fn test_text_rewrite_is_byte_identical() {
    let (document, _) = create_sample_document();
    let first = write_text(&document);
    let loaded = read_bytes(first.clone());
    let second = write_text(&loaded);

    assert_eq!(
        String::from_utf8_lossy(&first),
        String::from_utf8_lossy(&second)
    );
}

#[test]
fn test_binary_rewrite_is_byte_identical() {
    let (document, _) = create_sample_document();
    let first = write_binary(&document);
    let loaded = read_bytes(first.clone());
    let second = write_binary(&loaded);

    assert_eq!(first.len(), second.len());
    assert!(first == second, "binary output changed on rewrite");
}

#[test]
fn test_text_and_binary_load_the_same_graph() {
    let (document, _) = create_sample_document();
    let from_text = read_bytes(write_text(&document));
    let from_binary = read_bytes(write_binary(&document));

    assert_eq!(from_text.len(), from_binary.len());
    for object in from_text.objects() {
        assert_eq!(from_binary.object(object.handle()), Some(object));
    }
}

#[test]
fn test_loaded_objects_match_the_written_ones() {
    let (document, handles) = create_sample_document();
    let loaded = read_bytes(write_text(&document));

    assert!(loaded.notifications.is_empty(), "{:?}", loaded.notifications);
    assert_eq!(loaded.len(), document.len());
    for object in document.objects() {
        assert_eq!(
            loaded.object(object.handle()),
            Some(object),
            "object {} changed",
            object.handle()
        );
    }

    let line = loaded.get::<Line>(handles.model_line).unwrap();
    let xdata = line.common.extended_data.get_record("ACME").unwrap();
    assert_eq!(xdata.len(), 4);

    let insert = loaded.get::<Insert>(handles.insert).unwrap();
    assert_eq!(insert.block_record, Some(handles.door));

    let settings = loaded.get::<XRecord>(handles.settings).unwrap();
    assert_eq!(
        settings.entries.last().map(|e| &e.value),
        Some(&XRecordValue::Chunk(vec![0xDE, 0xAD, 0xBE, 0xEF]))
    );
    assert_eq!(
        loaded.get::<Scale>(handles.scale).map(|s| s.name.as_str()),
        Some("1:100")
    );
}

#[test]
fn test_loaded_document_keeps_spaces_and_tables() {
    let (document, handles) = create_sample_document();
    let loaded = read_bytes(write_text(&document));

    assert_eq!(loaded.model_space_handle(), document.model_space_handle());
    assert_eq!(loaded.paper_space_handle(), document.paper_space_handle());
    assert_eq!(loaded.root_dictionary_handle(), document.root_dictionary_handle());
    assert_eq!(loaded.next_handle(), document.next_handle());

    let paper = loaded.paper_space().unwrap();
    assert_eq!(paper.viewports, vec![handles.paper_viewport]);
    assert_eq!(paper.entities.len(), 1);
    assert!(loaded.get::<Text>(paper.entities[0]).is_some());

    let model = loaded.model_space().unwrap();
    assert_eq!(model.entities.len(), 5);
    assert_eq!(model.entities[0], handles.model_line);
    assert_eq!(model.entities[1], handles.model_circle);

    let names: Vec<&str> = loaded
        .block_records
        .handles()
        .filter_map(|h| loaded.get::<BlockRecord>(h))
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, ["*Model_Space", "*Paper_Space", "DOOR"]);

    let hidden = loaded.layer("HIDDEN").unwrap();
    assert!(hidden.off);
    assert!(!hidden.is_plottable);
}

#[test]
fn test_multibyte_block_name_survives_a_round_trip() {
    let mut document = CadDocument::new();
    let record = document
        .add_block_record(BlockRecord::new("A会议室平面"))
        .unwrap();
    let line = document
        .add_entity(
            record,
            EntityType::Line(Line::from_points(Vector3::ZERO, Vector3::new(1.0, 0.0, 0.0))),
        )
        .unwrap();
    let paper = document.paper_space_handle();

    let output = write_text(&document);
    let loaded = read_bytes(output.clone());

    let loaded_record = loaded.block_record("A会议室平面").unwrap();
    assert_eq!(loaded_record.common.handle, record);
    assert_eq!(loaded_record.entities, vec![line]);
    assert_eq!(loaded.paper_space_handle(), paper);
    assert_eq!(write_text(&loaded), output);
}

#[test]
fn test_page_setup_and_draw_order_survive_a_round_trip() {
    let (document, handles) = create_sample_document();
    let loaded = read_bytes(write_binary(&document));

    let page_setup = loaded.get::<PageSetup>(handles.page_setup).unwrap();
    let plot = &page_setup.settings;
    assert_eq!(plot.page_name, "A3 plot");
    assert_eq!(plot.paper_size, "ISO_A3_(420.00_x_297.00_MM)");
    assert_eq!(plot.unprintable_margin.bottom, 20.0);
    assert_eq!(plot.flags, PlotFlags::PLOT_CENTERED | PlotFlags::USE_STANDARD_SCALE);
    assert_eq!(plot.print_scale, 0.5);
    assert_eq!(plot.paper_image_origin, Vector2::new(1.5, 2.5));

    let table = loaded.get::<SortEntitiesTable>(handles.sort_table).unwrap();
    assert_eq!(table.block_owner, loaded.model_space_handle());
    assert_eq!(table.sort_handle(handles.model_line), handles.model_circle);
    assert_eq!(table.sort_handle(handles.model_circle), handles.model_line);

    let styles = loaded.get::<CadDictionary>(handles.plot_styles).unwrap();
    assert!(styles.with_default);
    assert_eq!(styles.default_entry, Some(handles.normal_style));
}

#[test]
fn test_dictionary_with_default_keeps_its_type() {
    let text = DxfText::new()
        .header("AC1032", "ANSI_1252")
        .block_record_table(1, &[(0x1F, "*Model_Space")])
        .section("OBJECTS")
        .dictionary(0xC, 0, &[("ACAD_PLOTSTYLENAME", 0xE)])
        .record("ACDBDICTIONARYWDFLT", 0xE, 0xC)
        .pair(100, "AcDbDictionary")
        .pair(281, 1)
        .pair(3, "Normal")
        .pair(350, "F")
        .pair(100, "AcDbDictionaryWithDefault")
        .pair(340, "F")
        .record("DICTIONARYVAR", 0xF, 0xE)
        .pair(100, "DictionaryVariables")
        .pair(280, 0)
        .pair(1, "Normal")
        .end_section()
        .finish();
    let document = read_str(&text);

    assert!(document.notifications.is_empty(), "{:?}", document.notifications);
    let styles = document.get::<CadDictionary>(Handle::new(0xE)).unwrap();
    assert!(styles.with_default);
    assert_eq!(styles.default_entry, Some(Handle::new(0xF)));
    assert_eq!(styles.get("Normal"), Some(Handle::new(0xF)));

    let output = write_text(&document);
    assert_eq!(count_records(&output, "ACDBDICTIONARYWDFLT"), 1);
    assert!(String::from_utf8_lossy(&output).contains("100\nAcDbDictionaryWithDefault\n340\nF\n"));

    let reloaded = read_bytes(output);
    assert_eq!(
        reloaded.object(Handle::new(0xE)),
        document.object(Handle::new(0xE))
    );
}

#[test]
fn test_shared_dictionary_member_is_written_once() {
    let mut document = CadDocument::new();
    let root = document.root_dictionary_handle().unwrap();
    let first = document
        .add_object(root, "FIRST", ObjectType::Dictionary(CadDictionary::new()))
        .unwrap();
    let second = document
        .add_object(root, "SECOND", ObjectType::Dictionary(CadDictionary::new()))
        .unwrap();
    let mut xrecord = XRecord::new();
    xrecord.push(1, XRecordValue::String("shared".into()));
    let shared = document
        .add_object(first, "DATA", ObjectType::XRecord(xrecord))
        .unwrap();

    let dictionary = document.get_mut::<CadDictionary>(second).unwrap();
    dictionary.insert("DATA", shared);
    dictionary.insert("BACK", root);

    let output = write_text(&document);
    assert_eq!(count_records(&output, "XRECORD"), 1);
    assert_eq!(count_definitions(&output, shared), 1);
    assert_eq!(count_definitions(&output, root), 1);

    // Both entries survive even though the object was written once.
    let text = String::from_utf8_lossy(&output);
    let entry = format!("  3\nDATA\n350\n{:X}\n", shared.value());
    assert_eq!(text.matches(&entry).count(), 2);
}

#[test]
fn test_suppressed_records_leave_no_dangling_entries() {
    let (document, handles) = create_sample_document();
    let config = DxfWriterConfiguration {
        suppress_opaque_records: true,
    };
    let output = DxfWriter::new(&document)
        .with_configuration(config)
        .write_to_vec()
        .unwrap();

    assert_eq!(count_records(&output, "XRECORD"), 0);
    assert!(!String::from_utf8_lossy(&output).contains("ACME_SETTINGS"));

    let loaded = read_bytes(output);
    assert!(loaded.object(handles.settings).is_none());
    assert!(loaded.notifications.is_empty(), "{:?}", loaded.notifications);
    assert!(loaded.get::<Scale>(handles.scale).is_some());
}

/// Root dictionary 0xC holding one extra object 0x40 of type `object_type`.
fn document_with_object(object_type: &str) -> String {
    DxfText::new()
        .header("AC1032", "ANSI_1252")
        .block_record_table(1, &[(0x1F, "*Model_Space")])
        .section("OBJECTS")
        .dictionary(0xC, 0, &[("EXTRA", 0x40)])
        .record(object_type, 0x40, 0xC)
        .pair(100, "AcDbSomething")
        .pair(1, "ignored")
        .end_section()
        .finish()
}

#[test]
fn test_opaque_object_is_read_and_skipped_on_write() {
    let document = read_str(&document_with_object("MATERIAL"));
    let material = Handle::new(0x40);
    assert!(matches!(
        document.object(material),
        Some(acadgraph::CadObject::Object(ObjectType::Material(_)))
    ));

    let mut writer = DxfWriter::new(&document);
    let output = writer.write_to_vec().unwrap();
    assert_eq!(count_records(&output, "MATERIAL"), 0);
    assert!(!String::from_utf8_lossy(&output).contains("EXTRA"));

    let reported = writer.notifications().for_handle(material);
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].notification_type, NotificationType::NotImplemented);
}

#[test]
fn test_recognized_styles_are_soft_skipped() {
    for name in ["MLINESTYLE", "IMAGEDEF", "DBCOLOR", "MLEADERSTYLE"] {
        let document = read_str(&document_with_object(name));
        let handle = Handle::new(0x40);
        assert!(document.get::<OpaqueObject>(handle).is_some(), "{} not kept", name);

        let mut writer = DxfWriter::new(&document);
        let output = writer.write_to_vec().unwrap();
        assert_eq!(count_records(&output, name), 0);

        let reported = writer.notifications().for_handle(handle);
        assert_eq!(reported.len(), 1, "{}", name);
        assert_eq!(reported[0].notification_type, NotificationType::NotImplemented);
    }
}

#[test]
fn test_unknown_object_is_skipped_unless_kept() {
    let text = document_with_object("ACME_THING");

    let document = read_str(&text);
    assert!(document.object(Handle::new(0x40)).is_none());
    assert!(document.notifications.has_type(NotificationType::NotSupported));
    assert!(!write_text(&document).is_empty());

    let config = DxfReaderConfiguration {
        keep_unknown_objects: true,
        ..Default::default()
    };
    let kept = read_bytes_with(text.into_bytes(), config);
    assert!(kept.object(Handle::new(0x40)).is_some());

    match DxfWriter::new(&kept).write_to_vec() {
        Err(DxfError::UnsupportedObject {
            handle,
            object_name,
        }) => {
            assert_eq!(handle, Handle::new(0x40));
            assert_eq!(object_name, "ACME_THING");
        }
        other => panic!("expected UnsupportedObject, got {:?}", other.map(|v| v.len())),
    }
}
