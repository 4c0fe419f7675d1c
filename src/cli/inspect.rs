// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

use std::process;

use crate::cli::args::InspectArgs;
use crate::cli::resolve_source;
use crate::pose::PoseDocument;
use crate::source::{DefaultLoader, PoseLoader};
use crate::{VERSION, error, info, section, success, warn};

/// Print a summary of a pose document and its validation report.
pub fn run_inspect(args: &InspectArgs) {
    let source = resolve_source(args.source.as_deref(), args.verbose);
    section!("Pose Viewer {VERSION} 🚀 inspect");

    let pose = match DefaultLoader::default().load(&source) {
        Ok(pose) => pose,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    info!("Source: {source}");
    for line in summary(&pose) {
        info!("{line}");
    }

    let issues = pose.validate();
    if issues.is_empty() {
        success!("No issues found");
    } else {
        for issue in &issues {
            warn!("{issue}");
        }
        warn!("{} issue(s) found", issues.len());
    }
}

/// Human-readable summary lines for a document.
pub(crate) fn summary(pose: &PoseDocument) -> Vec<String> {
    let header = &pose.header;
    let mut lines = vec![
        format!("Canvas: {}x{}", header.width, header.height),
        format!(
            "Frames: {} at {} fps, up to {} person(s) per frame",
            pose.frame_count(),
            pose.body.fps,
            pose.max_people()
        ),
    ];
    lines.extend(header.components.iter().map(|c| {
        format!(
            "Component '{}': {} point name(s), {} limb(s), {} color(s)",
            c.name,
            c.points.len(),
            c.limbs.len(),
            c.colors.len()
        )
    }));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PoseSource;
    use crate::visualizer::skeleton::{DEMO_FPS, DEMO_FRAMES, demo_document};

    #[test]
    fn test_summary_lines() {
        let lines = summary(&demo_document(DEMO_FRAMES, DEMO_FPS));
        assert_eq!(lines[0], "Canvas: 640x480");
        assert!(lines[1].starts_with(&format!("Frames: {DEMO_FRAMES} at 15 fps")));
        assert!(lines[2].contains("'pose'"));
        assert!(lines[2].contains("17 point name(s)"));
    }

    #[test]
    fn test_inspect_demo_is_clean() {
        let pose = DefaultLoader::default().load(&PoseSource::Demo).unwrap();
        assert!(pose.validate().is_empty());
    }
}
