// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

//! Error types for the pose viewer.

use std::fmt;

/// Result type alias for pose viewer operations.
pub type Result<T> = std::result::Result<T, PoseError>;

/// Main error type for the pose viewer.
#[derive(Debug)]
pub enum PoseError {
    /// Error fetching or reading a pose document.
    LoadError(String),
    /// The pose document could not be decoded.
    ParseError(String),
    /// Invalid configuration provided.
    ConfigError(String),
    /// IO error (file not found, permission denied, etc.).
    IoError(String),
    /// Error producing rendered output.
    RenderError(String),
    /// Visualizer error.
    VisualizerError(String),
    /// Frame timer could not be started.
    TimerError(String),
    /// Feature not enabled.
    FeatureNotEnabled(String),
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadError(msg) => write!(f, "Load error: {msg}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
            Self::RenderError(msg) => write!(f, "Render error: {msg}"),
            Self::VisualizerError(msg) => write!(f, "Visualizer error: {msg}"),
            Self::TimerError(msg) => write!(f, "Timer error: {msg}"),
            Self::FeatureNotEnabled(msg) => write!(f, "Feature not enabled: {msg}"),
        }
    }
}

impl std::error::Error for PoseError {}

impl From<std::io::Error> for PoseError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for PoseError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

#[cfg(feature = "raster")]
impl From<image::ImageError> for PoseError {
    fn from(err: image::ImageError) -> Self {
        Self::RenderError(err.to_string())
    }
}
