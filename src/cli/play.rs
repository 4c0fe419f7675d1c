// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cli::args::PlayArgs;
use crate::cli::resolve_source;
use crate::component::{PoseViewer, ViewerState};
use crate::config::ViewerConfig;
use crate::error::Result;
use crate::io::{FrameFormat, FrameWriter, RUNS_DIR, find_next_run_dir};
use crate::scheduler::PlaybackMode;
use crate::source::DefaultLoader;
use crate::{VERSION, error, section, success, verbose, warn};

#[cfg(feature = "visualize")]
use crate::visualizer::Viewer;

/// How long to wait for the loader before reporting progress again.
const LOAD_POLL: Duration = Duration::from_millis(100);

/// Play a pose document through the viewer component.
pub fn run_play(args: &PlayArgs) {
    match play(args) {
        Ok(shown) => {
            success!("Displayed {shown} frame(s)");
        }
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}

/// Mount the component, play the requested loops and return the number of
/// displayed frames.
#[allow(clippy::too_many_lines)]
pub(crate) fn play(args: &PlayArgs) -> Result<u64> {
    let mut config = ViewerConfig::new();
    if let Some(fps) = args.fps {
        config = config.with_fps(fps);
    }
    config.validate()?;

    let source = resolve_source(args.source.as_deref(), args.verbose);
    section!("Pose Viewer {VERSION} 🚀 play");

    let mut viewer = PoseViewer::new(source.to_string(), config);
    viewer.mount(Arc::new(DefaultLoader::from_config(&config)))?;

    let start = Instant::now();
    while viewer.state() == ViewerState::Loading {
        if !viewer.wait(LOAD_POLL)? && start.elapsed() > config.read_timeout {
            break;
        }
    }

    let Some(pose) = viewer.pose() else {
        return Ok(0);
    };
    let count = pose.frame_count();
    let (width, height) = (pose.header.width, pose.header.height);
    if count == 0 {
        warn!("{source} has no frames, nothing to play");
        return Ok(0);
    }
    verbose!(
        "Loaded {width}x{height} document: {count} frame(s) in {:.1}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    let mut writer = args.save.then(|| {
        FrameWriter::new(
            find_next_run_dir(RUNS_DIR, "play"),
            FrameFormat::Svg,
            config.background,
        )
    });

    #[cfg(feature = "visualize")]
    let mut window = if args.show {
        Some(Viewer::new("Pose Viewer", width as usize, height as usize)?)
    } else {
        None
    };
    #[cfg(not(feature = "visualize"))]
    if args.show {
        warn!("--show requires the 'visualize' feature. Compile with --features visualize to enable display.");
    }

    let mut present = |viewer: &PoseViewer| -> Result<bool> {
        let (Some(index), Some(tree)) = (viewer.frame_index(), viewer.render()) else {
            return Ok(true);
        };
        verbose!(
            "frame {}/{count}: {} joints, {} limbs",
            index + 1,
            tree.joints().count(),
            tree.lines().count()
        );
        if let Some(w) = writer.as_mut() {
            w.save(index, &tree)?;
        }
        #[cfg(feature = "visualize")]
        if let Some(win) = window.as_mut() {
            let image = crate::raster::rasterize(&tree, viewer.config().background);
            return win.show_frame(&image, index, count);
        }
        Ok(true)
    };

    let mut shown: u64 = 1;
    let mut open = present(&viewer)?;

    let period = match viewer.mode() {
        PlaybackMode::Looping { period } => period,
        PlaybackMode::Static => {
            #[cfg(feature = "visualize")]
            if let Some(win) = window.as_mut() {
                while win.idle(LOAD_POLL) {}
            }
            finish(writer.as_ref());
            return Ok(shown);
        }
    };

    let target = (args.loops as u64).saturating_mul(count as u64);
    let until_closed = args.show && cfg!(feature = "visualize");
    while open && (until_closed || shown < target) {
        if viewer.wait(period.saturating_mul(4))? {
            shown += 1;
            open = present(&viewer)?;
        }
    }

    viewer.detach();
    finish(writer.as_ref());
    Ok(shown)
}

fn finish(writer: Option<&FrameWriter>) {
    if let Some(w) = writer {
        verbose!("{} frame(s) saved to {}", w.saved(), w.dir().display());
    }
}
