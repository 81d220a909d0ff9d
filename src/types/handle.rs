//! Handle type for CAD objects
//!
//! Handles are the only cross-reference mechanism between objects: owners,
//! dictionary members and block references are all stored as handles and
//! resolved against the document arena.

use std::fmt;

/// A unique identifier for a CAD object within one document.
///
/// Handle 0 is reserved and means "no reference". Relational fields use
/// `Option<Handle>` instead of storing the null handle, see
/// [`Handle::from_raw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl Handle {
    /// The null handle (0)
    pub const NULL: Handle = Handle(0);

    /// Create a new handle from a u64 value
    #[inline]
    pub const fn new(value: u64) -> Self {
        Handle(value)
    }

    /// Convert a raw value into a reference, mapping 0 to `None`.
    #[inline]
    pub const fn from_raw(value: u64) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Handle(value))
        }
    }

    /// Parse the hexadecimal form used by group codes 5, 105 and 320-369.
    ///
    /// Returns `None` for text that is not hexadecimal.
    pub fn parse_hex(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        u64::from_str_radix(trimmed, 16).ok().map(Handle)
    }

    /// Get the raw u64 value
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Check if this is the null handle
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// The handle directly after this one.
    #[inline]
    pub const fn next(&self) -> Handle {
        Handle(self.0 + 1)
    }
}

impl Default for Handle {
    fn default() -> Self {
        Handle::NULL
    }
}

impl From<u64> for Handle {
    fn from(value: u64) -> Self {
        Handle(value)
    }
}

impl From<Handle> for u64 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#X}", self.0)
    }
}

impl fmt::UpperHex for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}
