//! Value types of DXF group codes.
//!
//! Every group code belongs to a fixed range that decides how its value is
//! stored in both the text and the binary form. Codes outside these ranges
//! are rejected.

/// Storage type of a group code's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupCodeValueType {
    String,
    /// Hexadecimal handle, stored as a string
    Handle,
    Double,
    Int16,
    Int32,
    Int64,
    /// 280-289; an 8-bit value written as a 16-bit integer in binary files
    Byte,
    /// 290-299
    Bool,
    /// Binary chunk, hex text in ASCII files
    Chunk,
}

impl GroupCodeValueType {
    /// Value type of a group code, or `None` for a code outside every range.
    pub fn from_code(code: i32) -> Option<Self> {
        let value_type = match code {
            0..=4 | 6..=9 => Self::String,
            5 => Self::Handle,
            10..=59 => Self::Double,
            60..=79 => Self::Int16,
            90..=99 => Self::Int32,
            100..=102 => Self::String,
            105 => Self::Handle,
            110..=149 => Self::Double,
            160..=169 => Self::Int64,
            170..=179 => Self::Int16,
            210..=239 => Self::Double,
            270..=279 => Self::Int16,
            280..=289 => Self::Byte,
            290..=299 => Self::Bool,
            300..=309 => Self::String,
            310..=319 => Self::Chunk,
            320..=369 => Self::Handle,
            370..=389 => Self::Int16,
            390..=399 => Self::Handle,
            400..=409 => Self::Int16,
            410..=419 => Self::String,
            420..=429 => Self::Int32,
            430..=439 => Self::String,
            440..=459 => Self::Int32,
            460..=469 => Self::Double,
            470..=479 => Self::String,
            480..=481 => Self::Handle,
            999 => Self::String,
            1000..=1003 => Self::String,
            1004 => Self::Chunk,
            1005 => Self::Handle,
            1006..=1009 => Self::String,
            1010..=1059 => Self::Double,
            1060..=1070 => Self::Int16,
            1071 => Self::Int32,
            _ => return None,
        };
        Some(value_type)
    }

    /// Whether values of this type are parsed as integers.
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Int16 | Self::Int32 | Self::Int64 | Self::Byte)
    }

    /// Axis (0 = X, 1 = Y, 2 = Z) of a coordinate code such as 10, 21 or 1030.
    pub fn coordinate_axis(code: i32) -> Option<usize> {
        let base = Self::coordinate_base(code)?;
        Some((base / 10 - 1) as usize)
    }

    /// Point a coordinate code belongs to; 10, 20 and 30 share group 0.
    pub fn coordinate_group(code: i32) -> Option<i32> {
        let base = Self::coordinate_base(code)?;
        Some(base % 10)
    }

    fn coordinate_base(code: i32) -> Option<i32> {
        let base = if (1010..=1039).contains(&code) {
            code - 1000
        } else {
            code
        };
        (10..=39).contains(&base).then_some(base)
    }
}
