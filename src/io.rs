// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

//! Saving rendered frames to disk.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PoseError, Result};
use crate::render::DrawTree;
use crate::svg::to_svg;
use crate::visualizer::color::Color;

/// Parent directory for saved renders.
pub const RUNS_DIR: &str = "runs/render";

/// Find the next available run directory (`render`, `render2`, `render3`, ...).
#[must_use]
pub fn find_next_run_dir(base: &str, prefix: &str) -> PathBuf {
    let base_path = Path::new(base);

    let first = base_path.join(prefix);
    if !first.exists() {
        return first;
    }

    (2..)
        .map(|i| base_path.join(format!("{prefix}{i}")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}

/// On-disk encoding of a saved frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrameFormat {
    /// SVG markup.
    #[default]
    Svg,
    /// Rasterized PNG image.
    Png,
}

impl FrameFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Write a single draw tree to `path` in the given format.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written, or if PNG
/// output is requested without the `raster` feature.
pub fn write_frame(path: &Path, tree: &DrawTree, format: FrameFormat, background: Color) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            PoseError::IoError(format!("Failed to create directory {}: {e}", parent.display()))
        })?;
    }

    match format {
        FrameFormat::Svg => fs::write(path, to_svg(tree))
            .map_err(|e| PoseError::IoError(format!("Failed to write {}: {e}", path.display()))),
        FrameFormat::Png => write_png(path, tree, background),
    }
}

#[cfg(feature = "raster")]
fn write_png(path: &Path, tree: &DrawTree, background: Color) -> Result<()> {
    crate::raster::rasterize(tree, background).save(path)?;
    Ok(())
}

#[cfg(not(feature = "raster"))]
fn write_png(_path: &Path, _tree: &DrawTree, _background: Color) -> Result<()> {
    Err(PoseError::FeatureNotEnabled(
        "PNG output requires the 'raster' feature. Compile with --features raster".to_string(),
    ))
}

/// Saves numbered frames (`frame_0000.svg`, ...) into one directory.
#[derive(Debug, Clone)]
pub struct FrameWriter {
    dir: PathBuf,
    format: FrameFormat,
    background: Color,
    saved: usize,
}

impl FrameWriter {
    /// Create a writer for `dir`. The directory is created on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, format: FrameFormat, background: Color) -> Self {
        Self {
            dir: dir.into(),
            format,
            background,
            saved: 0,
        }
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of frames written so far.
    #[must_use]
    pub const fn saved(&self) -> usize {
        self.saved
    }

    /// Path a frame index is written to.
    #[must_use]
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir
            .join(format!("frame_{index:04}.{}", self.format.extension()))
    }

    /// Save the draw tree of frame `index`. Saving an index twice overwrites it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails; see [`write_frame`].
    pub fn save(&mut self, index: usize, tree: &DrawTree) -> Result<PathBuf> {
        let path = self.frame_path(index);
        write_frame(&path, tree, self.format, self.background)?;
        self.saved += 1;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{JointMarker, Shape};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pose_viewer_io_{}_{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn tree() -> DrawTree {
        DrawTree {
            width: 8,
            height: 8,
            shapes: vec![Shape::Joint(JointMarker {
                cx: 4.0,
                cy: 4.0,
                r: 2.0,
                fill: Color::GREEN.into(),
                opacity: 1.0,
                id: 3,
            })],
        }
    }

    #[test]
    fn test_find_next_run_dir() {
        let base = scratch_dir("runs");
        let base_str = base.to_string_lossy().to_string();

        let first = find_next_run_dir(&base_str, "render");
        assert_eq!(first, base.join("render"));

        fs::create_dir_all(&first).unwrap();
        assert_eq!(find_next_run_dir(&base_str, "render"), base.join("render2"));

        fs::create_dir_all(base.join("render2")).unwrap();
        assert_eq!(find_next_run_dir(&base_str, "render"), base.join("render3"));

        let _ = fs::remove_dir_all(base);
    }

    #[test]
    fn test_frame_format() {
        assert_eq!(FrameFormat::default(), FrameFormat::Svg);
        assert_eq!(FrameFormat::Png.to_string(), "png");
    }

    #[test]
    fn test_write_failure_is_io_error() {
        let dir = scratch_dir("blocked");
        fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("not_a_dir");
        fs::write(&blocker, "x").unwrap();

        let err = write_frame(&blocker.join("frame.svg"), &tree(), FrameFormat::Svg, Color::BLACK)
            .unwrap_err();
        assert!(matches!(err, PoseError::IoError(_)));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_frame_writer_svg() {
        let dir = scratch_dir("svg");
        let mut writer = FrameWriter::new(&dir, FrameFormat::Svg, Color::BLACK);
        assert_eq!(writer.frame_path(7), dir.join("frame_0007.svg"));

        let path = writer.save(0, &tree()).unwrap();
        assert_eq!(writer.saved(), 1);
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("<svg"));
        assert!(text.contains(r#"data-id="3""#));

        let _ = fs::remove_dir_all(dir);
    }

    #[cfg(feature = "raster")]
    #[test]
    fn test_frame_writer_png() {
        let dir = scratch_dir("png");
        let mut writer = FrameWriter::new(&dir, FrameFormat::Png, Color::BLACK);
        let path = writer.save(1, &tree()).unwrap();
        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (8, 8));
        assert_eq!(img.get_pixel(4, 4).0, [0, 255, 0]);
        let _ = fs::remove_dir_all(dir);
    }

    #[cfg(not(feature = "raster"))]
    #[test]
    fn test_png_requires_raster() {
        let dir = scratch_dir("png_off");
        let err = FrameWriter::new(&dir, FrameFormat::Png, Color::BLACK)
            .save(0, &tree())
            .unwrap_err();
        assert!(matches!(err, PoseError::FeatureNotEnabled(_)));
    }
}
