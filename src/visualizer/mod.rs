// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

//! Colors, the COCO skeleton and the playback window.

/// Color definitions and palettes.
pub mod color;

/// COCO-17 topology and the demo document.
pub mod skeleton;

#[cfg(feature = "visualize")]
pub mod viewer;

pub use color::{Color, Rgb};

#[cfg(feature = "visualize")]
pub use viewer::Viewer;
