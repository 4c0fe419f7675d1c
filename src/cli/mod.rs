// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

//! Command-line interface for rendering and playing pose documents.
//!
//! This module contains argument parsing, the console logging macros and the
//! `render`, `play` and `inspect` command implementations.

use crate::source::{DEMO_SOURCE, PoseSource};
use crate::warn;

/// CLI arguments.
pub mod args;

/// Logging macros and verbosity control.
pub mod logging;

/// Render command.
pub mod render;

/// Play command.
pub mod play;

/// Inspect command.
pub mod inspect;

/// Resolve the `--source` argument, falling back to the built-in demo.
pub(crate) fn resolve_source(source: Option<&str>, verbose: bool) -> PoseSource {
    source.map_or_else(
        || {
            if verbose {
                warn!("'source' argument is missing. Using the built-in '{DEMO_SOURCE}' animation");
            }
            PoseSource::Demo
        },
        PoseSource::from,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_source() {
        assert_eq!(resolve_source(None, false), PoseSource::Demo);
        assert_eq!(
            resolve_source(Some("walk.json"), false),
            PoseSource::File("walk.json".into())
        );
    }
}
