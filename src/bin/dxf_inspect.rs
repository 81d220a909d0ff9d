//! Load a DXF file, report what was read and optionally write it back.
//!
//! Usage: `dxf_inspect <input.dxf> [output.dxf] [--failsafe] [--keep-unknown] [--binary]`
//!
//! Set `RUST_LOG=debug` for progress output.

use acadgraph::io::dxf::{DxfReader, DxfReaderConfiguration, DxfWriter};
use acadgraph::{CadObject, NotificationType};
use std::collections::BTreeMap;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut paths = Vec::new();
    let mut config = DxfReaderConfiguration::default();
    let mut binary = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--failsafe" => config.failsafe = true,
            "--keep-unknown" => config.keep_unknown_objects = true,
            "--binary" => binary = true,
            _ => paths.push(arg),
        }
    }

    let Some(input) = paths.first() else {
        eprintln!("usage: dxf_inspect <input.dxf> [output.dxf] [--failsafe] [--keep-unknown] [--binary]");
        return ExitCode::FAILURE;
    };

    let document = match DxfReader::from_file(input).and_then(|r| r.with_configuration(config).read())
    {
        Ok(document) => document,
        Err(e) => {
            eprintln!("{input}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for object in document.objects() {
        *counts.entry(object.object_name().to_string()).or_default() += 1;
    }

    println!("{input}: version {}, {} objects", document.header.version, document.len());
    for (name, count) in &counts {
        println!("  {name:<20} {count}");
    }
    let space_entities = |record: Option<&acadgraph::BlockRecord>| {
        record.map_or(0, |r| r.entities.len() + r.viewports.len())
    };
    println!(
        "  model space: {} entities, paper space: {} entities",
        space_entities(document.model_space()),
        space_entities(document.paper_space())
    );
    let dictionaries = document
        .objects()
        .filter(|o| matches!(o, CadObject::Object(acadgraph::ObjectType::Dictionary(_))))
        .count();
    println!("  dictionaries: {dictionaries}, layers: {}", document.layers.len());

    if !document.notifications.is_empty() {
        println!("\n--- Notifications ({}) ---", document.notifications.len());
        for notification in document.notifications.iter() {
            println!("  {notification}");
        }
    }

    let Some(output) = paths.get(1) else {
        return ExitCode::SUCCESS;
    };

    let mut writer = DxfWriter::new(&document);
    writer.set_binary(binary);
    if let Err(e) = writer.write_to_file(output) {
        eprintln!("{output}: {e}");
        return ExitCode::FAILURE;
    }
    println!("\nwritten to {output}");
    for notification in writer.notifications().iter() {
        println!("  {notification}");
    }

    if document.notifications.has_type(NotificationType::Error) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
