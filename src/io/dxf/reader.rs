//! DXF file reader

mod binary_reader;
mod section_reader;
mod stream_reader;
mod text_reader;

pub use binary_reader::{DxfBinaryReader, BINARY_DXF_SENTINEL};
pub use stream_reader::{DxfCodePair, DxfStreamReader};
pub use text_reader::DxfTextReader;

use section_reader::SectionReader;

use crate::document::CadDocument;
use crate::error::{DxfError, Result};
use crate::io::builder::CadDocumentBuilder;
use crate::io::dxf::code_page::encoding_from_code_page;
use crate::notification::{Notification, NotificationCollection, NotificationType};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// First version whose strings are always UTF-8
const FIRST_UNICODE_VERSION: &str = "AC1021";

/// Configuration for the DXF reader.
#[derive(Debug, Clone, Default)]
pub struct DxfReaderConfiguration {
    /// When `true`, parse errors within a section are reported as `Error`
    /// notifications and the rest of the section is skipped instead of
    /// aborting the read. Duplicate handles always abort.
    pub failsafe: bool,

    /// Keep objects of unrecognized types as [`crate::objects::UnknownObject`]
    /// instead of skipping them.
    pub keep_unknown_objects: bool,
}

/// DXF file reader
pub struct DxfReader {
    reader: Box<dyn DxfStreamReader>,
    version: String,
    config: DxfReaderConfiguration,
}

impl DxfReader {
    /// Create a new DXF reader from any seekable source
    pub fn from_reader<R: Read + Seek + 'static>(reader: R) -> Result<Self> {
        let mut buf_reader = BufReader::new(reader);

        let reader: Box<dyn DxfStreamReader> = if Self::is_binary(&mut buf_reader)? {
            Box::new(DxfBinaryReader::new(buf_reader)?)
        } else {
            Box::new(DxfTextReader::new(buf_reader))
        };

        Ok(Self {
            reader,
            version: String::new(),
            config: DxfReaderConfiguration::default(),
        })
    }

    /// Create a new DXF reader from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Check whether a stream starts with the binary sentinel.
    ///
    /// The stream is left at its start either way.
    fn is_binary<R: Read + Seek>(reader: &mut R) -> Result<bool> {
        let mut buffer = vec![0u8; BINARY_DXF_SENTINEL.len()];
        let mut filled = 0;
        while filled < buffer.len() {
            let read = reader.read(&mut buffer[filled..])?;
            if read == 0 {
                break;
            }
            filled += read;
        }
        reader.seek(SeekFrom::Start(0))?;

        Ok(filled == buffer.len() && buffer == BINARY_DXF_SENTINEL)
    }

    /// Set the reader configuration.
    pub fn with_configuration(mut self, config: DxfReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// `$ACADVER` found by the pre-scan; empty before [`DxfReader::read`].
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Read the whole stream and build the document graph.
    ///
    /// Notifications raised while reading and resolving end up in
    /// [`CadDocument::notifications`].
    pub fn read(mut self) -> Result<CadDocument> {
        self.read_version()?;

        let mut notifications = NotificationCollection::new();
        let mut builder = CadDocumentBuilder::new(&mut notifications);

        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "EOF") {
                break;
            }
            if !pair.is(0, "SECTION") {
                continue;
            }
            let section_name = match self.reader.read_pair()? {
                Some(name) if name.code == 2 => name.value_string.trim().to_string(),
                Some(other) => {
                    self.reader.push_back(other);
                    continue;
                }
                None => break,
            };
            log::debug!("reading section {}", section_name);

            let result = self.read_section(&section_name, &mut builder);
            match result {
                Ok(()) => {}
                Err(DxfError::DuplicateHandle(handle)) => {
                    return Err(DxfError::DuplicateHandle(handle));
                }
                Err(e) if self.config.failsafe => {
                    builder.notify(Notification::new(
                        NotificationType::Error,
                        format!("error reading {} section: {}", section_name, e),
                    ));
                    self.skip_to_section_end()?;
                }
                Err(e) => return Err(e),
            }
        }

        log::debug!("{} objects read, resolving", builder.template_count());
        let mut document = builder.build_document();
        document.notifications = notifications;
        Ok(document)
    }

    fn read_section(&mut self, name: &str, builder: &mut CadDocumentBuilder<'_>) -> Result<()> {
        let mut section =
            SectionReader::new(self.reader.as_mut(), builder, self.config.keep_unknown_objects);
        match name {
            "HEADER" => section.read_header(),
            "TABLES" => section.read_tables(),
            "BLOCKS" => section.read_blocks(),
            "ENTITIES" => section.read_entities(),
            "OBJECTS" => section.read_objects(),
            _ => section.skip_section(name),
        }
    }

    /// Pre-scan the HEADER section for `$ACADVER` and `$DWGCODEPAGE`.
    ///
    /// Files older than AC1021 store strings in their code page, which
    /// becomes the reader's fallback encoding. The stream is rewound
    /// afterwards.
    fn read_version(&mut self) -> Result<()> {
        let mut code_page: Option<String> = None;
        let mut in_header = false;
        let mut variable = String::new();

        while let Some(pair) = self.reader.read_pair()? {
            match pair.code {
                0 if in_header => break,
                2 if pair.value_string.trim() == "HEADER" => in_header = true,
                9 if in_header => variable = pair.value_string,
                1 if in_header && variable == "$ACADVER" => self.version = pair.value_string,
                3 if in_header && variable == "$DWGCODEPAGE" => code_page = Some(pair.value_string),
                _ => {}
            }
        }

        if self.version.as_str() < FIRST_UNICODE_VERSION {
            if let Some(encoding) = code_page.as_deref().and_then(encoding_from_code_page) {
                self.reader.set_encoding(encoding);
            }
        }

        self.reader.reset()
    }

    fn skip_to_section_end(&mut self) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is(0, "ENDSEC") {
                break;
            }
        }
        Ok(())
    }
}

/// Read a DXF file (ASCII or binary) with the default configuration.
pub fn read_dxf<P: AsRef<Path>>(path: P) -> Result<CadDocument> {
    DxfReader::from_file(path)?.read()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(data: &str) -> DxfReader {
        DxfReader::from_reader(Cursor::new(data.as_bytes().to_vec())).unwrap()
    }

    #[test]
    fn test_text_is_not_binary() {
        let mut cursor = Cursor::new(b"  0\nSECTION\n".to_vec());
        assert!(!DxfReader::is_binary(&mut cursor).unwrap());
        assert_eq!(cursor.position(), 0);

        let mut cursor = Cursor::new(BINARY_DXF_SENTINEL.to_vec());
        assert!(DxfReader::is_binary(&mut cursor).unwrap());
    }

    #[test]
    fn test_version_prescan() {
        let data = "  0\nSECTION\n  2\nHEADER\n  9\n$ACADVER\n  1\nAC1015\n  9\n$DWGCODEPAGE\n  3\nANSI_1252\n  0\nENDSEC\n  0\nEOF\n";
        let mut reader = reader(data);
        reader.read_version().unwrap();
        assert_eq!(reader.version(), "AC1015");
        assert!(reader.reader.read_pair().unwrap().unwrap().is(0, "SECTION"));
    }

    #[test]
    fn test_unknown_section_is_skipped() {
        let data = "  0\nSECTION\n  2\nTHUMBNAILIMAGE\n 90\n0\n  0\nENDSEC\n  0\nEOF\n";
        let document = reader(data).read().unwrap();
        assert!(document
            .notifications
            .has_type(NotificationType::NotSupported));
    }

    #[test]
    fn test_failsafe_turns_errors_into_notifications() {
        let data = "  0\nSECTION\n  2\nENTITIES\n  0\nLINE\n  5\n2A\n 10\nnot a number\n  0\nENDSEC\n  0\nEOF\n";
        let strict = reader(data).read();
        assert!(strict.is_ok());

        let broken = "  0\nSECTION\n  2\nENTITIES\n  0\nLINE\n150\n1\n  0\nENDSEC\n  0\nEOF\n";
        assert!(matches!(
            reader(broken).read(),
            Err(DxfError::InvalidGroupCode(150))
        ));

        let config = DxfReaderConfiguration {
            failsafe: true,
            ..Default::default()
        };
        let document = reader(broken).with_configuration(config).read().unwrap();
        assert!(document.notifications.has_type(NotificationType::Error));
    }
}
