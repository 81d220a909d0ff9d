//! DXF ASCII text reader

use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

use encoding_rs::Encoding;

use super::stream_reader::{DxfCodePair, DxfStreamReader};
use crate::error::{DxfError, Result};
use crate::io::dxf::GroupCodeValueType;

/// DXF ASCII text file reader
pub struct DxfTextReader<R: Read + Seek> {
    reader: BufReader<R>,
    line_number: usize,
    peeked_pair: Option<DxfCodePair>,
    /// Non-UTF8 fallback encoding. `None` means Latin-1 (byte-to-char).
    encoding: Option<&'static Encoding>,
}

impl<R: Read + Seek> DxfTextReader<R> {
    pub fn new(reader: BufReader<R>) -> Self {
        Self {
            reader,
            line_number: 0,
            peeked_pair: None,
            encoding: None,
        }
    }

    /// Read one line without its line terminator.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut bytes = Vec::new();
        if self.reader.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        if bytes.last() == Some(&b'\n') {
            bytes.pop();
        }
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }

        let line = match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => {
                let bytes = e.into_bytes();
                match self.encoding {
                    Some(enc) => enc.decode(&bytes).0.into_owned(),
                    // Latin-1 maps bytes 0-255 to the same code points
                    None => bytes.iter().map(|&b| b as char).collect(),
                }
            }
        };
        Ok(Some(line))
    }

    fn read_pair_internal(&mut self) -> Result<Option<DxfCodePair>> {
        loop {
            let code_line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            };
            let code = code_line.trim().parse::<i32>().map_err(|_| {
                DxfError::Parse(format!(
                    "Invalid DXF code at line {}: '{}'",
                    self.line_number, code_line
                ))
            })?;

            let value_line = self.read_line()?.ok_or_else(|| {
                DxfError::Parse(format!(
                    "Unexpected EOF after code {} at line {}",
                    code, self.line_number
                ))
            })?;

            if code == 999 {
                continue;
            }

            let pair = DxfCodePair::new(code, value_line)?;
            let pair = match pair.value_type {
                // Record types and header variable names never carry spaces
                GroupCodeValueType::String if code == 0 || code == 9 => DxfCodePair {
                    value_string: pair.value_string.trim().to_string(),
                    ..pair
                },
                GroupCodeValueType::String => DxfCodePair {
                    value_string: unescape(&pair.value_string),
                    ..pair
                },
                _ => DxfCodePair {
                    value_string: pair.value_string.trim().to_string(),
                    ..pair
                },
            };
            return Ok(Some(pair));
        }
    }
}

/// Undo the caret escapes of DXF strings: `^J`, `^M`, `^I` and `^ `.
pub(crate) fn unescape(value: &str) -> String {
    if !value.contains('^') {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '^' {
            out.push(c);
            continue;
        }
        let replacement = match chars.peek() {
            Some('J') => '\n',
            Some('M') => '\r',
            Some('I') => '\t',
            Some(' ') => '^',
            _ => {
                out.push('^');
                continue;
            }
        };
        chars.next();
        out.push(replacement);
    }
    out
}

impl<R: Read + Seek> DxfStreamReader for DxfTextReader<R> {
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
        self.reader.seek(SeekFrom::Start(0))?;
        self.line_number = 0;
        self.peeked_pair = None;
        Ok(())
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(data: &str) -> DxfTextReader<Cursor<Vec<u8>>> {
        DxfTextReader::new(BufReader::new(Cursor::new(data.as_bytes().to_vec())))
    }

    #[test]
    fn test_read_simple_pair() {
        let mut reader = reader("  0\r\nSECTION\r\n");
        let pair = reader.read_pair().unwrap().unwrap();
        assert_eq!(pair.code, 0);
        assert_eq!(pair.value_string, "SECTION");
    }

    #[test]
    fn test_read_double_pair() {
        let mut reader = reader(" 10\n123.456\n");
        let pair = reader.read_pair().unwrap().unwrap();
        assert_eq!(pair.code, 10);
        assert_eq!(pair.as_double(), Some(123.456));
    }

    #[test]
    fn test_string_keeps_leading_spaces() {
        let mut reader = reader("  1\n  indented\n");
        let pair = reader.read_pair().unwrap().unwrap();
        assert_eq!(pair.value_string, "  indented");
    }

    #[test]
    fn test_record_type_is_trimmed() {
        let mut reader = reader("  0\nENDSEC \r\n  9\n$ACADVER\t\n  1\n  kept \n");
        assert!(reader.read_pair().unwrap().unwrap().is(0, "ENDSEC"));
        assert_eq!(reader.read_pair().unwrap().unwrap().value_string, "$ACADVER");
        assert_eq!(reader.read_pair().unwrap().unwrap().value_string, "  kept ");
    }

    #[test]
    fn test_comments_are_skipped() {
        let mut reader = reader("999\nwritten by hand\n  0\nEOF\n");
        let pair = reader.read_pair().unwrap().unwrap();
        assert!(pair.is(0, "EOF"));
    }

    #[test]
    fn test_peek_then_read() {
        let mut reader = reader("  0\nSECTION\n  2\nHEADER\n");
        assert_eq!(reader.peek_code().unwrap(), Some(0));
        assert_eq!(reader.read_pair().unwrap().unwrap().code, 0);
        assert_eq!(reader.peek_code().unwrap(), Some(2));
    }

    #[test]
    fn test_invalid_code_is_an_error() {
        let mut reader = reader("abc\nLINE\n");
        assert!(matches!(reader.read_pair(), Err(DxfError::Parse(_))));

        let mut reader = self::reader("150\nLINE\n");
        assert!(matches!(reader.read_pair(), Err(DxfError::InvalidGroupCode(150))));
    }

    #[test]
    fn test_special_characters() {
        let mut reader = reader("  1\nLine1^JLine2^MLine3^ J\n");
        let pair = reader.read_pair().unwrap().unwrap();
        assert_eq!(pair.value_string, "Line1\nLine2\rLine3^J");
    }

    #[test]
    fn test_latin1_fallback_and_encoding() {
        let mut data = b"  1\n".to_vec();
        data.extend_from_slice(&[0x43, 0x61, 0x66, 0xE9]);
        data.push(b'\n');

        let mut latin = DxfTextReader::new(BufReader::new(Cursor::new(data.clone())));
        assert_eq!(latin.read_pair().unwrap().unwrap().value_string, "Café");

        let mut cp1252 = DxfTextReader::new(BufReader::new(Cursor::new(data)));
        cp1252.set_encoding(encoding_rs::WINDOWS_1252);
        assert_eq!(cp1252.read_pair().unwrap().unwrap().value_string, "Café");
    }
}
