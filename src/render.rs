// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

//! Frame rendering.
//!
//! [`render`] turns one frame plus the document header into a [`DrawTree`]:
//! a flat, ordered list of limb lines and joint circles. It is a pure
//! function; serializing the tree (SVG, raster) happens elsewhere.

use crate::pose::{PoseComponent, PoseFrame, PoseHeader, PosePoint};
use crate::visualizer::color::{Color, Rgb};

/// Radius of a joint marker.
pub const DEFAULT_JOINT_RADIUS: f32 = 4.0;

/// Class names carried by every joint marker.
pub const JOINT_CLASS: &str = "joint draggable";

/// A straight limb between two joints.
#[derive(Debug, Clone, PartialEq)]
pub struct LimbLine {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub stroke: Rgb,
    pub opacity: f32,
}

/// A circle marking one joint.
#[derive(Debug, Clone, PartialEq)]
pub struct JointMarker {
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
    pub fill: Rgb,
    pub opacity: f32,
    /// Index of the joint in the component's unfiltered point list.
    pub id: usize,
}

/// A drawable primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line(LimbLine),
    Joint(JointMarker),
}

/// The drawing for one frame, in paint order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawTree {
    pub width: u32,
    pub height: u32,
    pub shapes: Vec<Shape>,
}

impl DrawTree {
    /// Iterate the joint markers.
    pub fn joints(&self) -> impl Iterator<Item = &JointMarker> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Joint(j) => Some(j),
            Shape::Line(_) => None,
        })
    }

    /// Iterate the limb lines.
    pub fn lines(&self) -> impl Iterator<Item = &LimbLine> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Line(l) => Some(l),
            Shape::Joint(_) => None,
        })
    }
}

/// Renders frames with a configurable joint radius.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub joint_radius: f32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            joint_radius: DEFAULT_JOINT_RADIUS,
        }
    }
}

impl Renderer {
    #[must_use]
    pub const fn new(joint_radius: f32) -> Self {
        Self { joint_radius }
    }

    /// Draw every person's components: limbs first, then joints on top.
    ///
    /// A person without points for a declared component contributes nothing
    /// for it.
    #[must_use]
    pub fn render(&self, frame: &PoseFrame, header: &PoseHeader) -> DrawTree {
        let mut shapes = Vec::new();

        for person in &frame.people {
            for component in &header.components {
                let Some(joints) = person.points(&component.name) else {
                    continue;
                };
                shapes.extend(render_limbs(component, joints).map(Shape::Line));
                shapes.extend(self.render_joints(component, joints).map(Shape::Joint));
            }
        }

        DrawTree {
            width: header.width,
            height: header.height,
            shapes,
        }
    }

    /// Markers for the valid joints, colored by their original index.
    pub fn render_joints<'a>(
        &self,
        component: &'a PoseComponent,
        joints: &'a [PosePoint],
    ) -> impl Iterator<Item = JointMarker> + 'a {
        let r = self.joint_radius;
        joints
            .iter()
            .enumerate()
            .filter(|(_, joint)| joint.is_valid())
            .map(move |(i, joint)| JointMarker {
                cx: joint.x,
                cy: joint.y,
                r,
                fill: Color::from_table(&component.colors, i).into(),
                opacity: joint.c,
                id: i,
            })
    }
}

/// Draw `frame` with the default joint radius.
#[must_use]
pub fn render(frame: &PoseFrame, header: &PoseHeader) -> DrawTree {
    Renderer::default().render(frame, header)
}

/// Lines for the limbs whose endpoints are both valid.
///
/// An endpoint index outside `joints` counts as an invalid joint.
pub fn render_limbs<'a>(
    component: &'a PoseComponent,
    joints: &'a [PosePoint],
) -> impl Iterator<Item = LimbLine> + 'a {
    component.limbs.iter().filter_map(move |limb| {
        let a = joints.get(limb.from).filter(|j| j.is_valid())?;
        let b = joints.get(limb.to).filter(|j| j.is_valid())?;

        let c1 = Color::from_table(&component.colors, limb.from);
        let c2 = Color::from_table(&component.colors, limb.to);

        Some(LimbLine {
            x1: a.x,
            y1: a.y,
            x2: b.x,
            y2: b.y,
            stroke: c1.mean(c2),
            opacity: (a.c + b.c) / 2.0,
        })
    })
}
