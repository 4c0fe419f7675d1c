// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

//! COCO-17 body topology and the built-in demo document.

use std::f32::consts::{PI, TAU};

use crate::pose::{
    PoseBody, PoseComponent, PoseDocument, PoseFrame, PoseHeader, PoseLimb, PosePerson, PosePoint,
};
use crate::visualizer::Color;

/// Name of the single component in the demo document.
pub const DEMO_COMPONENT: &str = "pose";

/// Frames in the demo animation.
pub const DEMO_FRAMES: usize = 30;

/// Frame rate of the demo animation.
pub const DEMO_FPS: f32 = 15.0;

/// COCO-Pose keypoint names, in index order.
pub const KEYPOINT_NAMES: [&str; 17] = [
    "nose",
    "left_eye",
    "right_eye",
    "left_ear",
    "right_ear",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_hip",
    "right_hip",
    "left_knee",
    "right_knee",
    "left_ankle",
    "right_ankle",
];

/// COCO-Pose dataset skeleton structure (pairs of keypoint indices)
pub const SKELETON: [[usize; 2]; 19] = [
    [15, 13], // left ankle to left knee
    [13, 11], // left knee to left hip
    [16, 14], // right ankle to right knee
    [14, 12], // right knee to right hip
    [11, 12], // left hip to right hip
    [5, 11],  // left shoulder to left hip
    [6, 12],  // right shoulder to right hip
    [5, 6],   // left shoulder to right shoulder
    [5, 7],   // left shoulder to left elbow
    [6, 8],   // right shoulder to right elbow
    [7, 9],   // left elbow to left wrist
    [8, 10],  // right elbow to right wrist
    [1, 2],   // left eye to right eye
    [0, 1],   // nose to left eye
    [0, 2],   // nose to right eye
    [1, 3],   // left eye to left ear
    [2, 4],   // right eye to right ear
    [3, 5],   // left ear to left shoulder
    [4, 6],   // right ear to right shoulder
];

/// Keypoint color indices mapping to `POSE_COLORS`
/// Mapping: arms=blue, legs=orange, face=green
pub const KPT_COLOR_INDICES: [usize; 17] = [16, 16, 16, 16, 16, 9, 9, 9, 9, 9, 9, 0, 0, 0, 0, 0, 0];

/// Resting position of each keypoint on a 640x480 canvas.
const REST: [(f32, f32); 17] = [
    (320.0, 100.0),
    (330.0, 90.0),
    (310.0, 90.0),
    (340.0, 95.0),
    (300.0, 95.0),
    (360.0, 150.0),
    (280.0, 150.0),
    (380.0, 210.0),
    (255.0, 190.0),
    (390.0, 270.0),
    (230.0, 140.0),
    (345.0, 280.0),
    (295.0, 280.0),
    (350.0, 360.0),
    (290.0, 360.0),
    (352.0, 440.0),
    (288.0, 440.0),
];

const RIGHT_ELBOW: usize = 8;
const RIGHT_WRIST: usize = 10;
const LEFT_EAR: usize = 3;
const FOREARM: f32 = 55.0;

/// The COCO-17 body component: keypoint names, limbs and colors.
#[must_use]
pub fn coco_component(name: &str) -> PoseComponent {
    PoseComponent {
        name: name.to_string(),
        format: "XYC".to_string(),
        points: KEYPOINT_NAMES.iter().map(ToString::to_string).collect(),
        limbs: SKELETON.iter().map(|[a, b]| PoseLimb::new(*a, *b)).collect(),
        colors: KPT_COLOR_INDICES
            .iter()
            .map(|&i| Color::from_pose_index(i))
            .collect(),
    }
}

/// One person waving their right forearm, `frames` frames long.
///
/// The left ear drops out every third frame so untracked joints show up
/// in playback.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn demo_document(frames: usize, fps: f32) -> PoseDocument {
    let frames = (0..frames)
        .map(|t| {
            let phase = if frames > 1 { t as f32 / frames as f32 } else { 0.0 };
            let angle = 0.6f32.mul_add((TAU * phase).sin(), -PI * 0.7);
            let (ex, ey) = REST[RIGHT_ELBOW];

            let points = REST
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| match i {
                    RIGHT_WRIST => PosePoint::new(
                        FOREARM.mul_add(angle.cos(), ex),
                        FOREARM.mul_add(angle.sin(), ey),
                        1.0,
                    ),
                    LEFT_EAR if t % 3 == 2 => PosePoint::new(x, y, 0.0),
                    0..=4 => PosePoint::new(x, y, 0.8),
                    _ => PosePoint::new(x, y, 1.0),
                })
                .collect();

            PoseFrame {
                people: vec![PosePerson::default().with(DEMO_COMPONENT, points)],
            }
        })
        .collect();

    PoseDocument {
        header: PoseHeader {
            version: 0.1,
            width: 640,
            height: 480,
            depth: 0,
            components: vec![coco_component(DEMO_COMPONENT)],
        },
        body: PoseBody { fps, frames },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coco_component_shape() {
        let component = coco_component("body");
        assert_eq!(component.points.len(), 17);
        assert_eq!(component.limbs.len(), SKELETON.len());
        assert_eq!(component.colors.len(), 17);
        assert_eq!(component.colors[0], Color(0, 255, 0));
        assert!(component.limbs.iter().all(|l| l.from < 17 && l.to < 17));
    }

    #[test]
    fn test_demo_document_is_valid() {
        let doc = demo_document(DEMO_FRAMES, DEMO_FPS);
        assert_eq!(doc.frame_count(), DEMO_FRAMES);
        assert!(doc.validate().is_empty());
    }

    #[test]
    fn test_demo_left_ear_drops_out() {
        let doc = demo_document(6, DEMO_FPS);
        let ear = |t: usize| doc.frame(t).unwrap().people[0].points(DEMO_COMPONENT).unwrap()[LEFT_EAR];
        assert!(ear(0).is_valid());
        assert!(!ear(2).is_valid());
        assert!(!ear(5).is_valid());
    }

    #[test]
    fn test_demo_wrist_moves() {
        let doc = demo_document(4, DEMO_FPS);
        let wrist = |t: usize| doc.frame(t).unwrap().people[0].points(DEMO_COMPONENT).unwrap()[RIGHT_WRIST];
        assert!((wrist(0).x - wrist(1).x).abs() > 1.0 || (wrist(0).y - wrist(1).y).abs() > 1.0);
    }
}
