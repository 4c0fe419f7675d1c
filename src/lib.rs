// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Pose Viewer
//!
//! Animate and render skeletal pose sequences. A pose document holds a canvas
//! size, named body components (joint names, limb topology, color table) and a
//! sequence of frames, each listing tracked people. The viewer loads a
//! document, plays it back at its declared frame rate and renders the current
//! frame as SVG: joints as circles, limbs as lines, with opacity taken from
//! joint confidence.
//!
//! ## Quick Start (Library)
//!
//! ```no_run
//! use std::time::Duration;
//! use pose_viewer::{DefaultLoader, PoseViewer, ViewerConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut viewer = PoseViewer::new("walk.json", ViewerConfig::default());
//!     viewer.mount_blocking(&DefaultLoader::default())?;
//!
//!     // Frame 0 is shown right away; every timer tick advances one frame.
//!     println!("{}", viewer.render_svg());
//!     while viewer.wait(Duration::from_secs(1))? {
//!         println!("{}", viewer.render_svg());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Rendering is a pure function of a frame and the document header:
//!
//! ```
//! use pose_viewer::{PoseDocument, render, to_svg};
//!
//! let pose = PoseDocument::from_json_str(r#"{
//!     "header": {"width": 20, "height": 10, "components": [{
//!         "name": "pose", "limbs": [{"from": 0, "to": 1}],
//!         "colors": [{"R": 255, "G": 0, "B": 0}]
//!     }]},
//!     "body": {"fps": 25, "frames": [{"people": [{"pose": [
//!         {"X": 0, "Y": 0, "C": 1.0}, {"X": 10, "Y": 0, "C": 1.0}
//!     ]}]}]}
//! }"#).unwrap();
//!
//! let tree = render(&pose.body.frames[0], &pose.header);
//! assert_eq!(tree.joints().count(), 2);
//! assert_eq!(tree.lines().count(), 1);
//! assert!(to_svg(&tree).contains("stroke: rgb(255, 0, 0)"));
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Render frame 0 of the built-in demo
//! pose-viewer render
//!
//! # Render every frame of a document as PNG
//! pose-viewer render --source walk.json --all --format png
//!
//! # Play three loops and save each displayed frame
//! pose-viewer play --source https://example.com/walk.json --loops 3 --save
//!
//! # Print a summary and validation report
//! pose-viewer inspect --source walk.json
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`component`] | [`PoseViewer`] lifecycle: load, play, render, detach |
//! | [`pose`] | Document model ([`PoseDocument`], [`PoseFrame`], ...) and validation |
//! | [`source`] | Source identifiers ([`PoseSource`]) and loaders ([`PoseLoader`]) |
//! | [`scheduler`] | [`FrameCursor`], [`PlaybackMode`] and interval timers |
//! | [`render`] | Frame to [`DrawTree`] rendering |
//! | [`svg`] | SVG serialization |
//! | [`config`] | [`ViewerConfig`] builder |
//! | [`io`] | Saving frames to disk |
//! | [`error`] | Error types ([`PoseError`], [`Result`]) |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `raster` | PNG output via `image` and `imageproc` (default) |
//! | `visualize` | Playback in a desktop window via `minifb` |

// Modules
pub mod cli;
pub mod component;
pub mod config;
pub mod download;
pub mod error;
pub mod io;
pub mod pose;
#[cfg(feature = "raster")]
pub mod raster;
pub mod render;
pub mod scheduler;
pub mod source;
pub mod svg;
pub mod visualizer;

// Re-export main types for convenience
pub use component::{PoseViewer, ViewerEvent, ViewerState};
pub use config::ViewerConfig;
pub use error::{PoseError, Result};
pub use pose::{
    PoseBody, PoseComponent, PoseDocument, PoseFrame, PoseHeader, PoseLimb, PosePerson,
    PosePoint, ValidationIssue,
};
pub use render::{DrawTree, JointMarker, LimbLine, Renderer, Shape, render};
pub use scheduler::{
    FrameCursor, IntervalTimer, ManualTimer, PlaybackMode, ThreadTimer, TimerHandle,
};
pub use source::{DefaultLoader, PoseLoader, PoseSource};
pub use svg::to_svg;
pub use visualizer::Color;

#[cfg(feature = "raster")]
pub use raster::rasterize;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
