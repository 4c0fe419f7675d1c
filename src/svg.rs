// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

//! SVG serialization of a [`DrawTree`].

use std::fmt::Write;

use crate::render::{DrawTree, JOINT_CLASS, JointMarker, LimbLine, Shape};
use crate::visualizer::color::Rgb;

/// SVG namespace.
const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Serialize a draw tree as a standalone SVG document.
#[must_use]
pub fn to_svg(tree: &DrawTree) -> String {
    let mut out = String::with_capacity(64 + tree.shapes.len() * 128);
    // Writing into a String cannot fail.
    let _ = write!(
        out,
        r#"<svg xmlns="{SVG_NS}" width="{}" height="{}"><g>"#,
        tree.width, tree.height
    );
    for shape in &tree.shapes {
        match shape {
            Shape::Line(line) => write_line(&mut out, line),
            Shape::Joint(joint) => write_joint(&mut out, joint),
        }
    }
    out.push_str("</g></svg>");
    out
}

fn rgb(color: Rgb) -> String {
    format!("rgb({}, {}, {})", color.r, color.g, color.b)
}

fn write_line(out: &mut String, line: &LimbLine) {
    let _ = write!(
        out,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" style="stroke: {}; opacity: {}"></line>"#,
        line.x1,
        line.y1,
        line.x2,
        line.y2,
        rgb(line.stroke),
        line.opacity
    );
}

fn write_joint(out: &mut String, joint: &JointMarker) {
    let _ = write!(
        out,
        r#"<circle cx="{}" cy="{}" r="{}" class="{JOINT_CLASS}" style="fill: {}; opacity: {}" data-id="{}"></circle>"#,
        joint.cx,
        joint.cy,
        joint.r,
        rgb(joint.fill),
        joint.opacity,
        joint.id
    );
}
