// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

use serde::{Deserialize, Serialize};

/// An 8-bit RGB color as stored in a component's color table.
///
/// Serialized as `{"R": .., "G": .., "B": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RgbTriple", into = "RgbTriple")]
pub struct Color(pub u8, pub u8, pub u8);

#[derive(Serialize, Deserialize)]
struct RgbTriple {
    #[serde(rename = "R")]
    r: u8,
    #[serde(rename = "G")]
    g: u8,
    #[serde(rename = "B")]
    b: u8,
}

impl From<RgbTriple> for Color {
    fn from(c: RgbTriple) -> Self {
        Self(c.r, c.g, c.b)
    }
}

impl From<Color> for RgbTriple {
    fn from(c: Color) -> Self {
        Self {
            r: c.0,
            g: c.1,
            b: c.2,
        }
    }
}

impl Color {
    /// Red color.
    pub const RED: Self = Self(255, 0, 0);
    /// Green color.
    pub const GREEN: Self = Self(0, 255, 0);
    /// Blue color.
    pub const BLUE: Self = Self(0, 0, 255);
    /// White color.
    pub const WHITE: Self = Self(255, 255, 255);
    /// Black color.
    pub const BLACK: Self = Self(0, 0, 0);

    /// Create a new color from RGB values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b)
    }

    /// Get a color from the pose palette by index.
    #[must_use]
    pub const fn from_pose_index(index: usize) -> Self {
        let color = POSE_COLORS[index % POSE_COLORS.len()];
        Self(color[0], color[1], color[2])
    }

    /// Look up `index` in a color table, wrapping modulo its length.
    ///
    /// An empty table falls back to the pose palette.
    #[must_use]
    pub fn from_table(table: &[Self], index: usize) -> Self {
        if table.is_empty() {
            Self::from_pose_index(index)
        } else {
            table[index % table.len()]
        }
    }

    /// Channel-wise arithmetic mean of two colors.
    #[must_use]
    pub fn mean(self, other: Self) -> Rgb {
        Rgb {
            r: (f32::from(self.0) + f32::from(other.0)) / 2.0,
            g: (f32::from(self.1) + f32::from(other.1)) / 2.0,
            b: (f32::from(self.2) + f32::from(other.2)) / 2.0,
        }
    }
}

/// An RGB color with fractional channels, produced when colors are mixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    /// Round each channel to the nearest 8-bit value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_u8(self) -> [u8; 3] {
        [self.r, self.g, self.b].map(|c| c.round().clamp(0.0, 255.0) as u8)
    }
}

impl From<Color> for Rgb {
    fn from(c: Color) -> Self {
        Self {
            r: f32::from(c.0),
            g: f32::from(c.1),
            b: f32::from(c.2),
        }
    }
}

/// Pose keypoint color palette
pub const POSE_COLORS: [[u8; 3]; 20] = [
    [255, 128, 0],   // #ff8000
    [255, 153, 51],  // #ff9933
    [255, 178, 102], // #ffb266
    [230, 230, 0],   // #e6e600
    [255, 153, 255], // #ff99ff
    [153, 204, 255], // #99ccff
    [255, 102, 255], // #ff66ff
    [255, 51, 255],  // #ff33ff
    [102, 178, 255], // #66b2ff
    [51, 153, 255],  // #3399ff
    [255, 153, 153], // #ff9999
    [255, 102, 102], // #ff6666
    [255, 51, 51],   // #ff3333
    [153, 255, 153], // #99ff99
    [102, 255, 102], // #66ff66
    [51, 255, 51],   // #33ff33
    [0, 255, 0],     // #00ff00
    [0, 0, 255],     // #0000ff
    [255, 0, 0],     // #ff0000
    [255, 255, 255], // #ffffff
];
