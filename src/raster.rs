// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

//! Rasterize draw trees onto images.

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{Blend, draw_filled_circle_mut, draw_line_segment_mut};

use crate::render::{DrawTree, Shape};
use crate::visualizer::color::{Color, Rgb};

/// Map an opacity to an 8-bit alpha, clamping to `[0, 1]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha(opacity: f32) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn rgba(color: Rgb, opacity: f32) -> Rgba<u8> {
    let [r, g, b] = color.to_u8();
    Rgba([r, g, b, alpha(opacity)])
}

/// Paint `tree` over a solid `background`, blending by opacity.
///
/// Shapes are painted in tree order, so joints end up above their limbs.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn rasterize(tree: &DrawTree, background: Color) -> DynamicImage {
    let Color(r, g, b) = background;
    let mut canvas = Blend(RgbaImage::from_pixel(
        tree.width,
        tree.height,
        Rgba([r, g, b, 255]),
    ));

    for shape in &tree.shapes {
        match shape {
            Shape::Line(line) => draw_line_segment_mut(
                &mut canvas,
                (line.x1, line.y1),
                (line.x2, line.y2),
                rgba(line.stroke, line.opacity),
            ),
            Shape::Joint(joint) => draw_filled_circle_mut(
                &mut canvas,
                (joint.cx.round() as i32, joint.cy.round() as i32),
                joint.r.round().max(1.0) as i32,
                rgba(joint.fill, joint.opacity),
            ),
        }
    }

    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas.0).to_rgb8())
}
