//! DXF binary reader

use std::fmt::Write as _;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::Encoding;

use super::stream_reader::{DxfCodePair, DxfStreamReader};
use crate::error::{DxfError, Result};
use crate::io::dxf::GroupCodeValueType;

/// Sentinel at the start of every binary DXF file
pub const BINARY_DXF_SENTINEL: &[u8] = b"AutoCAD Binary DXF\r\n\x1a\x00";

/// Binary DXF stream reader.
///
/// Values are converted to the same textual form the ASCII reader produces,
/// so section parsing does not care which flavor it reads.
pub struct DxfBinaryReader<R: Read + Seek> {
    reader: BufReader<R>,
    peeked_pair: Option<DxfCodePair>,
    encoding: Option<&'static Encoding>,
}

impl<R: Read + Seek> DxfBinaryReader<R> {
    /// Create a reader positioned after the sentinel.
    pub fn new(mut reader: BufReader<R>) -> Result<Self> {
        Self::read_sentinel(&mut reader)?;
        Ok(Self {
            reader,
            peeked_pair: None,
            encoding: None,
        })
    }

    fn read_sentinel(reader: &mut BufReader<R>) -> Result<()> {
        reader.seek(SeekFrom::Start(0))?;
        let mut sentinel = [0u8; BINARY_DXF_SENTINEL.len()];
        reader.read_exact(&mut sentinel)?;
        if sentinel != BINARY_DXF_SENTINEL {
            return Err(DxfError::InvalidSentinel(
                String::from_utf8_lossy(&sentinel).into_owned(),
            ));
        }
        Ok(())
    }

    fn read_null_string(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        self.reader.read_until(0, &mut bytes)?;
        if bytes.pop() != Some(0) {
            return Err(DxfError::Parse("Unterminated string in binary DXF".into()));
        }

        Ok(match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => {
                let bytes = e.into_bytes();
                match self.encoding {
                    Some(enc) => enc.decode(&bytes).0.into_owned(),
                    None => bytes.iter().map(|&b| b as char).collect(),
                }
            }
        })
    }

    fn read_pair_internal(&mut self) -> Result<Option<DxfCodePair>> {
        let code = match self.reader.read_i16::<LittleEndian>() {
            Ok(code) => i32::from(code),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        // Codes above 32767 are stored as negative i16 values
        let code = if code < 0 { code + 65536 } else { code };

        let value_type =
            GroupCodeValueType::from_code(code).ok_or(DxfError::InvalidGroupCode(code))?;
        let value = match value_type {
            GroupCodeValueType::String | GroupCodeValueType::Handle => self.read_null_string()?,
            GroupCodeValueType::Double => self.reader.read_f64::<LittleEndian>()?.to_string(),
            GroupCodeValueType::Int16 | GroupCodeValueType::Byte => {
                self.reader.read_i16::<LittleEndian>()?.to_string()
            }
            GroupCodeValueType::Int32 => self.reader.read_i32::<LittleEndian>()?.to_string(),
            GroupCodeValueType::Int64 => self.reader.read_i64::<LittleEndian>()?.to_string(),
            GroupCodeValueType::Bool => self.reader.read_u8()?.to_string(),
            GroupCodeValueType::Chunk => {
                let len = self.reader.read_u8()? as usize;
                let mut data = vec![0u8; len];
                self.reader.read_exact(&mut data)?;
                let mut hex = String::with_capacity(len * 2);
                for byte in data {
                    let _ = write!(hex, "{:02X}", byte);
                }
                hex
            }
        };

        DxfCodePair::new(code, value).map(Some)
    }
}

impl<R: Read + Seek> DxfStreamReader for DxfBinaryReader<R> {
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>> {
        if let Some(pair) = self.peeked_pair.take() {
            return Ok(Some(pair));
        }
        self.read_pair_internal()
    }

    fn peek_code(&mut self) -> Result<Option<i32>> {
        if let Some(ref pair) = self.peeked_pair {
            return Ok(Some(pair.code));
        }
        match self.read_pair_internal()? {
            Some(pair) => {
                let code = pair.code;
                self.peeked_pair = Some(pair);
                Ok(Some(code))
            }
            None => Ok(None),
        }
    }

    fn push_back(&mut self, pair: DxfCodePair) {
        self.peeked_pair = Some(pair);
    }

    fn reset(&mut self) -> Result<()> {
        self.peeked_pair = None;
        Self::read_sentinel(&mut self.reader)
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}
