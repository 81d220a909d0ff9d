//! Entity and layer colors

use std::fmt;

/// Color of an entity or layer.
///
/// Written as an AutoCAD Color Index under group code 62, with true colors
/// additionally carried under group code 420.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Color by layer (index 256)
    #[default]
    ByLayer,
    /// Color by block (index 0)
    ByBlock,
    /// AutoCAD Color Index (1-255)
    Index(u8),
    /// True color
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    /// Create a color from an AutoCAD Color Index read from code 62.
    ///
    /// Negative values mark a layer that is turned off; the magnitude is
    /// the color.
    pub fn from_index(index: i16) -> Self {
        match index.unsigned_abs() {
            0 => Color::ByBlock,
            256 => Color::ByLayer,
            i @ 1..=255 => Color::Index(i as u8),
            _ => Color::Index(7),
        }
    }

    /// Decode the packed `0x00RRGGBB` value of group code 420.
    pub fn from_true_color(value: i32) -> Self {
        Color::Rgb {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Packed `0x00RRGGBB` value for group code 420, if this is a true color.
    pub fn true_color(&self) -> Option<i32> {
        match self {
            Color::Rgb { r, g, b } => Some(((*r as i32) << 16) | ((*g as i32) << 8) | *b as i32),
            _ => None,
        }
    }

    /// Index written under group code 62.
    ///
    /// True colors are approximated by brightness and dominant channel.
    pub fn approximate_index(&self) -> i16 {
        match self {
            Color::ByBlock => 0,
            Color::ByLayer => 256,
            Color::Index(i) => *i as i16,
            Color::Rgb { r, g, b } => {
                let (r, g, b) = (*r as u16, *g as u16, *b as u16);
                let brightness = (r + g + b) / 3;
                if brightness < 32 {
                    8
                } else if brightness > 224 {
                    7
                } else if r > g && r > b {
                    1
                } else if g > r && g > b {
                    3
                } else if b > r && b > g {
                    5
                } else {
                    7
                }
            }
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::ByLayer => write!(f, "ByLayer"),
            Color::ByBlock => write!(f, "ByBlock"),
            Color::Index(i) => write!(f, "Index({})", i),
            Color::Rgb { r, g, b } => write!(f, "RGB({}, {}, {})", r, g, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_index() {
        assert_eq!(Color::from_index(0), Color::ByBlock);
        assert_eq!(Color::from_index(256), Color::ByLayer);
        assert_eq!(Color::from_index(1), Color::Index(1));
        assert_eq!(Color::from_index(-3), Color::Index(3));
    }

    #[test]
    fn test_true_color_packing() {
        let color = Color::from_true_color(0x00FF8040);
        assert_eq!(color, Color::Rgb { r: 0xFF, g: 0x80, b: 0x40 });
        assert_eq!(color.true_color(), Some(0x00FF8040));
        assert_eq!(Color::Index(5).true_color(), None);
    }

    #[test]
    fn test_approximate_index() {
        assert_eq!(Color::ByLayer.approximate_index(), 256);
        assert_eq!(Color::Rgb { r: 200, g: 10, b: 10 }.approximate_index(), 1);
        assert_eq!(Color::Rgb { r: 0, g: 0, b: 0 }.approximate_index(), 8);
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::ByLayer.to_string(), "ByLayer");
        assert_eq!(Color::Rgb { r: 255, g: 0, b: 0 }.to_string(), "RGB(255, 0, 0)");
    }
}
