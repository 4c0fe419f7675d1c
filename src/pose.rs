// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

//! Pose document model.
//!
//! A [`PoseDocument`] is a header describing the canvas and the tracked body
//! components, plus a body holding the frame rate and the time-ordered
//! frames. Documents are immutable once loaded.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::visualizer::Color;

/// A single tracked point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PosePoint {
    /// Horizontal position in canvas pixels.
    #[serde(rename = "X")]
    pub x: f32,
    /// Vertical position in canvas pixels.
    #[serde(rename = "Y")]
    pub y: f32,
    /// Depth, when the source tracks it. Not drawn.
    #[serde(rename = "Z", default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
    /// Confidence. Points without one are untracked.
    #[serde(rename = "C", default)]
    pub c: f32,
}

impl PosePoint {
    /// Create a 2D point with a confidence.
    #[must_use]
    pub const fn new(x: f32, y: f32, c: f32) -> Self {
        Self { x, y, z: None, c }
    }

    /// A point is valid iff its confidence is strictly positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.c > 0.0
    }
}

/// A connection between two points of the same component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoseLimb {
    pub from: usize,
    pub to: usize,
}

impl PoseLimb {
    #[must_use]
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

/// A named body component (body, hand, face, ...) with its topology.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseComponent {
    pub name: String,
    /// Point layout descriptor, e.g. `XYC`.
    #[serde(default)]
    pub format: String,
    /// Point names, in joint order.
    #[serde(default)]
    pub points: Vec<String>,
    #[serde(default)]
    pub limbs: Vec<PoseLimb>,
    /// Colors indexed by joint index modulo length.
    #[serde(default)]
    pub colors: Vec<Color>,
}

/// Canvas size and the components every person is tracked with.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseHeader {
    #[serde(default)]
    pub version: f32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub depth: u32,
    pub components: Vec<PoseComponent>,
}

impl PoseHeader {
    /// Find a component by name.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&PoseComponent> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// One tracked person: component name to that component's points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PosePerson {
    pub components: HashMap<String, Vec<PosePoint>>,
}

impl PosePerson {
    /// Points tracked for `component`, if present.
    #[must_use]
    pub fn points(&self, component: &str) -> Option<&[PosePoint]> {
        self.components.get(component).map(Vec::as_slice)
    }

    /// Builder-style insert, mostly for constructing documents in code.
    #[must_use]
    pub fn with(mut self, component: impl Into<String>, points: Vec<PosePoint>) -> Self {
        self.components.insert(component.into(), points);
        self
    }
}

/// One time sample.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseFrame {
    pub people: Vec<PosePerson>,
}

/// Frame rate and frames.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseBody {
    pub fps: f32,
    pub frames: Vec<PoseFrame>,
}

impl PoseBody {
    /// Time between frames, `None` when fps is not a positive finite number.
    #[must_use]
    pub fn frame_period(&self) -> Option<Duration> {
        frame_period(self.fps)
    }
}

/// Period of a timer ticking `fps` times per second.
#[must_use]
pub fn frame_period(fps: f32) -> Option<Duration> {
    if fps.is_finite() && fps > 0.0 {
        Duration::try_from_secs_f64(1.0 / f64::from(fps)).ok()
    } else {
        None
    }
}

/// A complete pose document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseDocument {
    pub header: PoseHeader,
    pub body: PoseBody,
}

impl PoseDocument {
    /// Decode a document from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PoseError::ParseError`] if the bytes are not a valid document.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Decode a document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PoseError::ParseError`] if the text is not a valid document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode the document as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PoseError::ParseError`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Number of frames in the body.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.body.frames.len()
    }

    /// Frame at `index`, if in range.
    #[must_use]
    pub fn frame(&self, index: usize) -> Option<&PoseFrame> {
        self.body.frames.get(index)
    }

    /// Largest number of people in any frame.
    #[must_use]
    pub fn max_people(&self) -> usize {
        self.body.frames.iter().map(|f| f.people.len()).max().unwrap_or(0)
    }

    /// Check the document for references the renderer cannot resolve.
    ///
    /// Nothing here is enforced on load; the renderer skips whatever it
    /// cannot resolve.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.frame_count() > 1 && self.body.frame_period().is_none() {
            issues.push(ValidationIssue::InvalidFps(self.body.fps));
        }

        for component in &self.header.components {
            if component.colors.is_empty() {
                issues.push(ValidationIssue::EmptyColorTable {
                    component: component.name.clone(),
                });
            }
        }

        for (frame_idx, frame) in self.body.frames.iter().enumerate() {
            for (person, people) in frame.people.iter().enumerate() {
                for component in &self.header.components {
                    let Some(points) = people.points(&component.name) else {
                        issues.push(ValidationIssue::MissingComponent {
                            frame: frame_idx,
                            person,
                            component: component.name.clone(),
                        });
                        continue;
                    };
                    for limb in &component.limbs {
                        if limb.from >= points.len() || limb.to >= points.len() {
                            issues.push(ValidationIssue::LimbOutOfRange {
                                frame: frame_idx,
                                person,
                                component: component.name.clone(),
                                limb: *limb,
                                points: points.len(),
                            });
                        }
                    }
                }
            }
        }

        issues
    }
}

/// A structural problem found by [`PoseDocument::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    /// Multi-frame document whose fps cannot drive a timer.
    InvalidFps(f32),
    /// A component declares no colors.
    EmptyColorTable { component: String },
    /// A person lacks points for a declared component.
    MissingComponent {
        frame: usize,
        person: usize,
        component: String,
    },
    /// A limb references a point the person does not have.
    LimbOutOfRange {
        frame: usize,
        person: usize,
        component: String,
        limb: PoseLimb,
        points: usize,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFps(fps) => write!(f, "fps {fps} cannot drive playback"),
            Self::EmptyColorTable { component } => {
                write!(f, "component '{component}' has no colors")
            }
            Self::MissingComponent {
                frame,
                person,
                component,
            } => write!(f, "frame {frame} person {person}: missing component '{component}'"),
            Self::LimbOutOfRange {
                frame,
                person,
                component,
                limb,
                points,
            } => write!(
                f,
                "frame {frame} person {person}: limb ({}, {}) of '{component}' exceeds {points} points",
                limb.from, limb.to
            ),
        }
    }
}
