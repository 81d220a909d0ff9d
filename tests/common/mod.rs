//! Shared test utilities for acadgraph integration tests.
//!
//! Read/write helpers and a small writer for hand-made DXF text that all
//! test crates import via `mod common;`.

#![allow(dead_code)]

pub mod builders;

use acadgraph::io::dxf::{DxfReader, DxfReaderConfiguration, DxfWriter};
use acadgraph::CadDocument;
use std::io::Cursor;

// ===========================================================================
// Read / write helpers
// ===========================================================================

/// Write a document as ASCII DXF.
pub fn write_text(document: &CadDocument) -> Vec<u8> {
    DxfWriter::new(document)
        .write_to_vec()
        .expect("ASCII write failed")
}

/// Write a document as binary DXF.
pub fn write_binary(document: &CadDocument) -> Vec<u8> {
    DxfWriter::new_binary(document)
        .write_to_vec()
        .expect("binary write failed")
}

/// Read a document from bytes with the default configuration.
pub fn read_bytes(bytes: Vec<u8>) -> CadDocument {
    read_bytes_with(bytes, DxfReaderConfiguration::default())
}

pub fn read_bytes_with(bytes: Vec<u8>, config: DxfReaderConfiguration) -> CadDocument {
    DxfReader::from_reader(Cursor::new(bytes))
        .expect("reader creation failed")
        .with_configuration(config)
        .read()
        .expect("read failed")
}

/// Read a document from hand-made DXF text.
pub fn read_str(text: &str) -> CadDocument {
    read_bytes(text.as_bytes().to_vec())
}

/// Number of records of a type in ASCII output, e.g. `count_records(out, "LINE")`.
pub fn count_records(output: &[u8], record_type: &str) -> usize {
    let text = String::from_utf8_lossy(output);
    text.matches(&format!("  0\n{}\n", record_type)).count()
}

/// Number of times a handle is written as a record's own handle.
pub fn count_definitions(output: &[u8], handle: acadgraph::Handle) -> usize {
    let text = String::from_utf8_lossy(output);
    text.matches(&format!("\n  5\n{:X}\n", handle.value())).count()
}

// ===========================================================================
// Hand-made DXF text
// ===========================================================================

/// Minimal ASCII DXF writer for inputs the library would never produce.
#[derive(Default)]
pub struct DxfText {
    text: String,
}

impl DxfText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one code/value pair.
    pub fn pair(mut self, code: i32, value: impl std::fmt::Display) -> Self {
        self.text.push_str(&format!("{:>3}\n{}\n", code, value));
        self
    }

    pub fn section(self, name: &str) -> Self {
        self.pair(0, "SECTION").pair(2, name)
    }

    pub fn end_section(self) -> Self {
        self.pair(0, "ENDSEC")
    }

    /// Start a record with its handle and owner.
    pub fn record(self, record_type: &str, handle: u64, owner: u64) -> Self {
        self.pair(0, record_type)
            .pair(5, format!("{:X}", handle))
            .pair(330, format!("{:X}", owner))
    }

    /// HEADER section with `$ACADVER` and `$DWGCODEPAGE`.
    pub fn header(self, version: &str, code_page: &str) -> Self {
        self.section("HEADER")
            .pair(9, "$ACADVER")
            .pair(1, version)
            .pair(9, "$DWGCODEPAGE")
            .pair(3, code_page)
            .end_section()
    }

    /// BLOCK_RECORD table with the given `(handle, name)` entries.
    pub fn block_record_table(mut self, table: u64, records: &[(u64, &str)]) -> Self {
        self = self
            .section("TABLES")
            .pair(0, "TABLE")
            .pair(2, "BLOCK_RECORD")
            .pair(5, format!("{:X}", table))
            .pair(70, records.len());
        for (handle, name) in records {
            self = self
                .record("BLOCK_RECORD", *handle, table)
                .pair(100, "AcDbSymbolTableRecord")
                .pair(100, "AcDbBlockTableRecord")
                .pair(2, name);
        }
        self.pair(0, "ENDTAB").end_section()
    }

    /// A LINE owned by `owner`.
    pub fn line(self, handle: u64, owner: u64) -> Self {
        self.record("LINE", handle, owner)
            .pair(100, "AcDbEntity")
            .pair(8, "0")
            .pair(100, "AcDbLine")
            .pair(10, "0.0")
            .pair(20, "0.0")
            .pair(30, "0.0")
            .pair(11, "1.0")
            .pair(21, "1.0")
            .pair(31, "0.0")
    }

    /// A DICTIONARY with `(key, handle)` entries.
    pub fn dictionary(mut self, handle: u64, owner: u64, entries: &[(&str, u64)]) -> Self {
        self = self
            .record("DICTIONARY", handle, owner)
            .pair(100, "AcDbDictionary")
            .pair(280, 0)
            .pair(281, 1);
        for (key, member) in entries {
            self = self.pair(3, key).pair(350, format!("{:X}", member));
        }
        self
    }

    pub fn finish(self) -> String {
        self.pair(0, "EOF").text
    }
}
