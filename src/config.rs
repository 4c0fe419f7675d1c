// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

//! Viewer configuration.
//!
//! [`ViewerConfig`] controls how documents are fetched, played back and
//! drawn. It uses a builder pattern for convenient construction.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use pose_viewer::ViewerConfig;
//!
//! let config = ViewerConfig::new()
//!     .with_joint_radius(6.0)
//!     .with_fps(12.0)
//!     .with_connect_timeout(Duration::from_secs(5));
//! ```

use std::time::Duration;

use crate::error::{PoseError, Result};
use crate::render::{DEFAULT_JOINT_RADIUS, Renderer};
use crate::visualizer::Color;

/// Connection timeout for remote documents.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Body read timeout for remote documents.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for the pose viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerConfig {
    /// Radius of joint markers.
    pub joint_radius: f32,
    /// Playback rate replacing the document's declared fps.
    pub fps: Option<f32>,
    /// Connection timeout when fetching over HTTP.
    pub connect_timeout: Duration,
    /// Timeout for reading a fetched document body.
    pub read_timeout: Duration,
    /// Canvas color for rasterized frames.
    pub background: Color,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            joint_radius: DEFAULT_JOINT_RADIUS,
            fps: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            background: Color::WHITE,
        }
    }
}

impl ViewerConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the joint marker radius.
    #[must_use]
    pub const fn with_joint_radius(mut self, radius: f32) -> Self {
        self.joint_radius = radius;
        self
    }

    /// Override the playback rate.
    #[must_use]
    pub const fn with_fps(mut self, fps: f32) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Set the HTTP connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the HTTP body read timeout.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the raster background color.
    #[must_use]
    pub const fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Renderer matching this configuration.
    #[must_use]
    pub const fn renderer(&self) -> Renderer {
        Renderer::new(self.joint_radius)
    }

    /// Check values that would make rendering or playback meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ConfigError`] for a non-positive radius or fps.
    pub fn validate(&self) -> Result<()> {
        if !(self.joint_radius.is_finite() && self.joint_radius > 0.0) {
            return Err(PoseError::ConfigError(format!(
                "joint radius must be positive, got {}",
                self.joint_radius
            )));
        }
        if let Some(fps) = self.fps
            && !(fps.is_finite() && fps > 0.0)
        {
            return Err(PoseError::ConfigError(format!(
                "fps must be positive, got {fps}"
            )));
        }
        Ok(())
    }
}
