// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

//! Pose document sources and loading.
//!
//! A source identifier is classified into a [`PoseSource`]; a [`PoseLoader`]
//! turns a source into a [`PoseDocument`]. [`DefaultLoader`] handles local
//! files, HTTP(S) URLs and the built-in demo.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT, ViewerConfig};
use crate::download;
use crate::error::{PoseError, Result};
use crate::pose::PoseDocument;
use crate::visualizer::skeleton::{DEMO_FPS, DEMO_FRAMES, demo_document};

/// Identifier that selects the built-in demo document.
pub const DEMO_SOURCE: &str = "demo";

/// Where a pose document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoseSource {
    /// Path to a local JSON document.
    File(PathBuf),
    /// HTTP/HTTPS URL of a JSON document.
    Url(String),
    /// The built-in demo animation.
    Demo,
}

impl PoseSource {
    /// Check if this source needs the network.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Url(_))
    }

    /// Get the path if this source has one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(p) => Some(p),
            _ => None,
        }
    }

    /// Check if the identifier names a binary `.pose` file.
    fn is_binary_pose(s: &str) -> bool {
        let lower = s.to_lowercase();
        let path_part = lower.split('?').next().unwrap_or(&lower);
        path_part.ends_with(".pose")
    }
}

impl fmt::Display for PoseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(p) => write!(f, "{}", p.display()),
            Self::Url(u) => write!(f, "{u}"),
            Self::Demo => write!(f, "{DEMO_SOURCE}"),
        }
    }
}

/// Convert from a source identifier to `PoseSource`.
impl From<&str> for PoseSource {
    fn from(s: &str) -> Self {
        if s == DEMO_SOURCE {
            return Self::Demo;
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            return Self::Url(s.to_string());
        }
        let path = s.strip_prefix("file://").unwrap_or(s);
        Self::File(PathBuf::from(path))
    }
}

impl From<String> for PoseSource {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<PathBuf> for PoseSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for PoseSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

/// Capability that fetches and decodes pose documents.
///
/// Loaders run off the component's thread, hence `Send + Sync`.
pub trait PoseLoader: Send + Sync {
    /// Load the document at `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be fetched or decoded.
    fn load(&self, source: &PoseSource) -> Result<PoseDocument>;
}

/// Loader for files, HTTP(S) URLs and the demo document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultLoader {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for DefaultLoader {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl DefaultLoader {
    /// Loader using the timeouts from `config`.
    #[must_use]
    pub const fn from_config(config: &ViewerConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout,
            read_timeout: config.read_timeout,
        }
    }
}

impl PoseLoader for DefaultLoader {
    fn load(&self, source: &PoseSource) -> Result<PoseDocument> {
        let bytes = match source {
            PoseSource::Demo => return Ok(demo_document(DEMO_FRAMES, DEMO_FPS)),
            PoseSource::File(path) => {
                if PoseSource::is_binary_pose(&path.to_string_lossy()) {
                    return Err(binary_unsupported(source));
                }
                fs::read(path).map_err(|e| {
                    PoseError::LoadError(format!("Failed to read {}: {e}", path.display()))
                })?
            }
            PoseSource::Url(url) => {
                if PoseSource::is_binary_pose(url) {
                    return Err(binary_unsupported(source));
                }
                download::fetch(url, self.connect_timeout, self.read_timeout)?
            }
        };

        PoseDocument::from_json_slice(&bytes)
            .map_err(|e| PoseError::ParseError(format!("{source}: {e}")))
    }
}

fn binary_unsupported(source: &PoseSource) -> PoseError {
    PoseError::FeatureNotEnabled(format!(
        "{source}: binary .pose documents are not supported, provide the JSON rendition"
    ))
}
