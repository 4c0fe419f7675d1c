// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use crate::cli::args::RenderArgs;
use crate::cli::resolve_source;
use crate::config::ViewerConfig;
use crate::error::Result;
use crate::io::{FrameFormat, FrameWriter, RUNS_DIR, find_next_run_dir, write_frame};
use crate::scheduler::FrameCursor;
use crate::source::{DefaultLoader, PoseLoader};
use crate::{VERSION, error, section, success, verbose, warn};

/// Render frames of a pose document to SVG or PNG files.
pub fn run_render(args: &RenderArgs) {
    match render_frames(args) {
        Ok(Some(path)) => success!("Results saved to {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}

/// Returns the written file (single frame) or directory (`--all`), or `None`
/// for a document without frames.
pub(crate) fn render_frames(args: &RenderArgs) -> Result<Option<PathBuf>> {
    let config = ViewerConfig::new().with_joint_radius(args.radius);
    config.validate()?;

    let source = resolve_source(args.source.as_deref(), args.verbose);
    section!("Pose Viewer {VERSION} 🚀 render");
    verbose!("Source: {source}");

    let start = Instant::now();
    let pose = DefaultLoader::from_config(&config).load(&source)?;
    let count = pose.frame_count();
    verbose!(
        "Loaded {}x{} document: {count} frame(s) at {} fps, {} component(s) in {:.1}ms",
        pose.header.width,
        pose.header.height,
        pose.body.fps,
        pose.header.components.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    let Some(mut cursor) = FrameCursor::new(count) else {
        warn!("{source} has no frames, nothing to render");
        return Ok(None);
    };

    let format = FrameFormat::from(args.format);
    let renderer = config.renderer();

    if args.all {
        let dir = args
            .output
            .clone()
            .unwrap_or_else(|| find_next_run_dir(RUNS_DIR, "render"));
        let mut writer = FrameWriter::new(dir, format, config.background);
        for (index, frame) in pose.body.frames.iter().enumerate() {
            let tree = renderer.render(frame, &pose.header);
            let path = writer.save(index, &tree)?;
            verbose!("frame {}/{count} {}: {} shapes", index + 1, path.display(), tree.shapes.len());
        }
        return Ok(Some(writer.dir().to_path_buf()));
    }

    let index = cursor.select(args.frame);
    if index != args.frame {
        warn!("Frame {} is out of range, wrapped to {index}", args.frame);
    }
    let Some(frame) = pose.frame(index) else {
        return Ok(None);
    };
    let tree = renderer.render(frame, &pose.header);
    let path = args.output.clone().unwrap_or_else(|| {
        find_next_run_dir(RUNS_DIR, "render").join(format!("frame_{index:04}.{format}"))
    });
    write_frame(&path, &tree, format, config.background)?;
    verbose!(
        "frame {}/{count}: {} joints, {} limbs",
        index + 1,
        tree.joints().count(),
        tree.lines().count()
    );
    Ok(Some(path))
}
