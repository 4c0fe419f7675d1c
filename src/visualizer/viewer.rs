// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

//! Window for watching pose playback.

use std::time::{Duration, Instant};

use image::DynamicImage;
use minifb::{Key, Window, WindowOptions};

use crate::error::{PoseError, Result};

/// Playback window using minifb. The title shows the displayed frame.
pub struct Viewer {
    window: Window,
    title: String,
    pub width: usize,
    pub height: usize,
    buffer: Vec<u32>,
}

impl Viewer {
    /// Create a new viewer window.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::VisualizerError`] if the window cannot be opened.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(
            title,
            width.max(1),
            height.max(1),
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| PoseError::VisualizerError(format!("Failed to create window: {e}")))?;

        // ~60 Hz
        window.limit_update_rate(Some(Duration::from_micros(16600)));

        Ok(Self {
            window,
            title: title.to_string(),
            width,
            height,
            buffer: Vec::new(),
        })
    }

    /// Whether the window is still open and no quit key is held.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.window.is_open()
            && !self.window.is_key_down(Key::Escape)
            && !self.window.is_key_down(Key::Q)
    }

    /// Show a rasterized frame, captioned `frame N/M` in the title.
    ///
    /// Returns `false` once the user closed the window.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::VisualizerError`] if the window rejects the buffer.
    pub fn show_frame(&mut self, image: &DynamicImage, index: usize, count: usize) -> Result<bool> {
        if !self.is_open() {
            return Ok(false);
        }
        self.window
            .set_title(&format!("{} - frame {}/{count}", self.title, index + 1));

        let rgb = image.to_rgb8();
        let (w, h) = (rgb.width() as usize, rgb.height() as usize);
        self.buffer.clear();
        // 0x00RRGGBB
        self.buffer.extend(
            rgb.pixels()
                .map(|p| (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2])),
        );
        self.width = w;
        self.height = h;

        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|e| PoseError::VisualizerError(format!("Failed to update window: {e}")))?;

        Ok(true)
    }

    /// Keep the window responsive for `duration`. Returns `false` once closed.
    pub fn idle(&mut self, duration: Duration) -> bool {
        let start = Instant::now();
        while start.elapsed() < duration {
            if !self.is_open() {
                return false;
            }
            if self.buffer.is_empty() {
                self.window.update();
            } else {
                let _ = self
                    .window
                    .update_with_buffer(&self.buffer, self.width, self.height);
            }
        }
        self.is_open()
    }
}
