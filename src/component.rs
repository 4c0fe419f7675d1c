// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

//! The pose viewer component.
//!
//! [`PoseViewer`] ties the pieces together: it loads a document from its
//! `src`, picks a [`PlaybackMode`], advances a [`FrameCursor`] on every timer
//! tick and renders the current frame on demand.
//!
//! The component is owned by one thread. The loader worker and the timer only
//! send [`ViewerEvent`]s into the component's channel; the owner applies them
//! with [`PoseViewer::pump`] or [`PoseViewer::wait`].
//!
//! ```no_run
//! use std::time::Duration;
//! use pose_viewer::{DefaultLoader, PoseViewer, ViewerConfig};
//!
//! # fn main() -> pose_viewer::Result<()> {
//! let mut viewer = PoseViewer::new("pose.json", ViewerConfig::default());
//! viewer.mount_blocking(&DefaultLoader::default())?;
//! while viewer.wait(Duration::from_secs(1))? {
//!     println!("{}", viewer.render_svg());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::config::ViewerConfig;
use crate::error::{PoseError, Result};
use crate::pose::{PoseDocument, PoseFrame};
use crate::render::DrawTree;
use crate::scheduler::{FrameCursor, IntervalTimer, PlaybackMode, ThreadTimer, TimerHandle};
use crate::source::{PoseLoader, PoseSource};
use crate::svg::to_svg;
use crate::{verbose, warn};

/// Messages delivered to the component's owning thread.
#[derive(Debug)]
pub enum ViewerEvent {
    /// The document load finished.
    Loaded(Result<PoseDocument>),
    /// The frame timer fired. Carries the generation of the timer that sent it.
    Tick(u64),
}

/// Where the component is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    /// Created, not mounted yet.
    Idle,
    /// Waiting for the document.
    Loading,
    /// Document loaded; frames are displayed.
    Ready,
    /// The load failed. Nothing is ever shown.
    Failed,
    /// Removed from its host. The timer is stopped.
    Detached,
}

/// Animated pose viewer.
pub struct PoseViewer {
    src: String,
    edit: bool,
    config: ViewerConfig,
    state: ViewerState,
    pose: Option<Arc<PoseDocument>>,
    cursor: Option<FrameCursor>,
    mode: PlaybackMode,
    timer: Box<dyn IntervalTimer>,
    handle: Option<TimerHandle>,
    generation: u64,
    events_tx: Sender<ViewerEvent>,
    events_rx: Receiver<ViewerEvent>,
    redraws: u64,
}

impl PoseViewer {
    /// Create a viewer for `src` driven by a [`ThreadTimer`].
    #[must_use]
    pub fn new(src: impl Into<String>, config: ViewerConfig) -> Self {
        Self::with_timer(src, config, Box::new(ThreadTimer))
    }

    /// Create a viewer with a custom interval timer.
    #[must_use]
    pub fn with_timer(
        src: impl Into<String>,
        config: ViewerConfig,
        timer: Box<dyn IntervalTimer>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            src: src.into(),
            edit: false,
            config,
            state: ViewerState::Idle,
            pose: None,
            cursor: None,
            mode: PlaybackMode::Static,
            timer,
            handle: None,
            generation: 0,
            events_tx,
            events_rx,
            redraws: 0,
        }
    }

    /// Set the edit flag. Reserved for draggable-joint editing; it changes nothing yet.
    #[must_use]
    pub fn with_edit(mut self, edit: bool) -> Self {
        self.edit = edit;
        self
    }

    #[must_use]
    pub fn src(&self) -> &str {
        &self.src
    }

    #[must_use]
    pub const fn edit(&self) -> bool {
        self.edit
    }

    #[must_use]
    pub const fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> ViewerState {
        self.state
    }

    /// The loaded document.
    #[must_use]
    pub fn pose(&self) -> Option<&PoseDocument> {
        self.pose.as_deref()
    }

    /// Index of the displayed frame.
    #[must_use]
    pub fn frame_index(&self) -> Option<usize> {
        self.cursor.map(|c| c.index())
    }

    /// The displayed frame.
    #[must_use]
    pub fn frame(&self) -> Option<&PoseFrame> {
        let index = self.frame_index()?;
        self.pose.as_ref()?.frame(index)
    }

    #[must_use]
    pub const fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Whether a frame timer is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_cancelled())
    }

    /// How many times the displayed frame changed.
    #[must_use]
    pub const fn redraw_count(&self) -> u64 {
        self.redraws
    }

    /// Start loading the document on a worker thread.
    ///
    /// The result arrives as [`ViewerEvent::Loaded`]; apply it with
    /// [`pump`](Self::pump) or [`wait`](Self::wait).
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::LoadError`] if the worker cannot be spawned.
    pub fn mount(&mut self, loader: Arc<dyn PoseLoader>) -> Result<()> {
        let source = PoseSource::from(self.src.as_str());
        let tx = self.events_tx.clone();
        self.state = ViewerState::Loading;
        verbose!("Loading pose document from {source}");

        thread::Builder::new()
            .name("pose-viewer-loader".to_string())
            .spawn(move || {
                // The viewer may be gone by now; nothing to report to.
                let _ = tx.send(ViewerEvent::Loaded(loader.load(&source)));
            })
            .map_err(|e| PoseError::LoadError(format!("Failed to spawn loader thread: {e}")))?;
        Ok(())
    }

    /// Load the document on the calling thread, then show frame 0.
    ///
    /// # Errors
    ///
    /// Returns the loader's error. The viewer then stays empty.
    pub fn mount_blocking(&mut self, loader: &dyn PoseLoader) -> Result<()> {
        self.state = ViewerState::Loading;
        let result = loader.load(&PoseSource::from(self.src.as_str()));
        self.handle_event(ViewerEvent::Loaded(result)).map(|_| ())
    }

    /// Show an already loaded document.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::TimerError`] if the frame timer cannot start.
    pub fn set_document(&mut self, pose: PoseDocument) -> Result<()> {
        self.handle_event(ViewerEvent::Loaded(Ok(pose))).map(|_| ())
    }

    /// Apply one event. Returns whether the displayed frame changed.
    ///
    /// # Errors
    ///
    /// A failed load is returned here, once; later loads are then ignored.
    /// The timer start error is returned as [`PoseError::TimerError`].
    pub fn handle_event(&mut self, event: ViewerEvent) -> Result<bool> {
        match event {
            ViewerEvent::Loaded(_)
                if matches!(self.state, ViewerState::Detached | ViewerState::Failed) =>
            {
                Ok(false)
            }
            ViewerEvent::Loaded(Ok(pose)) => self.on_loaded(pose),
            ViewerEvent::Loaded(Err(e)) => {
                self.state = ViewerState::Failed;
                Err(e)
            }
            // Queued by a timer that has since been replaced or stopped.
            ViewerEvent::Tick(generation) if generation != self.generation => Ok(false),
            ViewerEvent::Tick(_) => Ok(self.tick()),
        }
    }

    /// Apply every queued event without blocking. Returns the number of redraws.
    ///
    /// # Errors
    ///
    /// Stops at the first event that fails, see [`handle_event`](Self::handle_event).
    pub fn pump(&mut self) -> Result<usize> {
        let mut redraws = 0;
        loop {
            match self.events_rx.try_recv() {
                Ok(event) => {
                    if self.handle_event(event)? {
                        redraws += 1;
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return Ok(redraws),
            }
        }
    }

    /// Wait up to `timeout` for the next event and apply it.
    ///
    /// Returns `true` if it changed the displayed frame.
    ///
    /// # Errors
    ///
    /// See [`handle_event`](Self::handle_event).
    pub fn wait(&mut self, timeout: Duration) -> Result<bool> {
        match self.events_rx.recv_timeout(timeout) {
            Ok(event) => self.handle_event(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => Ok(false),
        }
    }

    fn on_loaded(&mut self, pose: PoseDocument) -> Result<bool> {
        self.stop_timer();
        let count = pose.frame_count();
        self.mode = PlaybackMode::for_body(&pose.body, self.config.fps);
        self.cursor = FrameCursor::new(count);
        self.pose = Some(Arc::new(pose));
        self.state = ViewerState::Ready;

        if count > 1 && !self.mode.is_looping() {
            warn!(
                "{}: fps {} cannot drive playback, showing frame 0 only",
                self.src,
                self.config.fps.unwrap_or(self.pose().map_or(0.0, |p| p.body.fps))
            );
        }

        if let PlaybackMode::Looping { period } = self.mode {
            self.start_loop(period)?;
        }

        if self.cursor.is_some() {
            self.redraws += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn start_loop(&mut self, period: Duration) -> Result<()> {
        self.stop_timer();
        let tx = self.events_tx.clone();
        let generation = self.generation;
        let handle = self.timer.start(
            period,
            Box::new(move || tx.send(ViewerEvent::Tick(generation)).is_ok()),
        )?;
        verbose!("Playing at {:.1} fps", 1.0 / period.as_secs_f64());
        self.handle = Some(handle);
        Ok(())
    }

    /// Cancel the running timer and invalidate its queued ticks.
    fn stop_timer(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    /// Advance to the next frame. Returns `false` if there is nothing to advance.
    pub fn tick(&mut self) -> bool {
        if self.state != ViewerState::Ready {
            return false;
        }
        match self.cursor.as_mut() {
            Some(cursor) if cursor.count() > 1 => {
                cursor.advance();
                self.redraws += 1;
                true
            }
            _ => false,
        }
    }

    /// Remove the viewer from its host: stop the timer and ignore late loads.
    ///
    /// Safe to call more than once.
    pub fn detach(&mut self) {
        self.stop_timer();
        self.state = ViewerState::Detached;
    }

    /// Draw the displayed frame, or `None` before a frame is available.
    #[must_use]
    pub fn render(&self) -> Option<DrawTree> {
        let frame = self.frame()?;
        let pose = self.pose.as_ref()?;
        Some(self.config.renderer().render(frame, &pose.header))
    }

    /// SVG markup for the displayed frame; empty before a frame is available.
    #[must_use]
    pub fn render_svg(&self) -> String {
        self.render().as_ref().map(to_svg).unwrap_or_default()
    }
}

impl Drop for PoseViewer {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{PoseBody, PoseComponent, PoseHeader, PoseLimb, PosePerson, PosePoint};
    use crate::scheduler::ManualTimer;
    use crate::visualizer::Color;

    struct StaticLoader(Result<PoseDocument>);

    impl PoseLoader for StaticLoader {
        fn load(&self, _source: &PoseSource) -> Result<PoseDocument> {
            match &self.0 {
                Ok(doc) => Ok(doc.clone()),
                Err(e) => Err(PoseError::LoadError(e.to_string())),
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn document(frames: usize, fps: f32) -> PoseDocument {
        let frames = (0..frames)
            .map(|t| PoseFrame {
                people: vec![PosePerson::default().with(
                    "pose",
                    vec![
                        PosePoint::new(t as f32, 0.0, 1.0),
                        PosePoint::new(10.0, 0.0, 1.0),
                    ],
                )],
            })
            .collect();
        PoseDocument {
            header: PoseHeader {
                width: 20,
                height: 10,
                components: vec![PoseComponent {
                    name: "pose".to_string(),
                    limbs: vec![PoseLimb::new(0, 1)],
                    colors: vec![Color::RED],
                    ..PoseComponent::default()
                }],
                ..PoseHeader::default()
            },
            body: PoseBody { fps, frames },
        }
    }

    fn viewer(timer: &ManualTimer) -> PoseViewer {
        PoseViewer::with_timer("test.json", ViewerConfig::default(), Box::new(timer.clone()))
    }

    #[test]
    fn test_renders_nothing_before_load() {
        let timer = ManualTimer::new();
        let viewer = viewer(&timer);
        assert_eq!(viewer.state(), ViewerState::Idle);
        assert!(viewer.render().is_none());
        assert_eq!(viewer.render_svg(), "");
    }

    #[test]
    fn test_single_frame_renders_once_without_timer() {
        let timer = ManualTimer::new();
        let mut viewer = viewer(&timer);
        viewer
            .mount_blocking(&StaticLoader(Ok(document(1, 25.0))))
            .unwrap();

        assert_eq!(viewer.state(), ViewerState::Ready);
        assert_eq!(viewer.mode(), PlaybackMode::Static);
        assert_eq!(viewer.redraw_count(), 1);
        assert!(timer.periods().is_empty());
        assert!(!viewer.is_playing());
        assert!(!viewer.tick());
        assert_eq!(viewer.redraw_count(), 1);
        assert!(viewer.render_svg().starts_with("<svg"));
    }

    #[test]
    fn test_multi_frame_schedules_period_and_advances() {
        let timer = ManualTimer::new();
        let mut viewer = viewer(&timer);
        viewer
            .mount_blocking(&StaticLoader(Ok(document(3, 25.0))))
            .unwrap();

        assert_eq!(timer.periods(), vec![Duration::from_millis(40)]);
        assert!(viewer.is_playing());
        assert_eq!(viewer.frame_index(), Some(0));

        assert!(timer.fire());
        assert_eq!(viewer.pump().unwrap(), 1);
        assert_eq!(viewer.frame_index(), Some(1));

        assert!(timer.fire());
        assert!(timer.fire());
        assert_eq!(viewer.pump().unwrap(), 2);
        assert_eq!(viewer.frame_index(), Some(0));
        assert_eq!(viewer.redraw_count(), 4);
    }

    #[test]
    fn test_rendered_frame_follows_cursor() {
        let timer = ManualTimer::new();
        let mut viewer = viewer(&timer);
        viewer.set_document(document(2, 10.0)).unwrap();

        let first = viewer.render().unwrap();
        assert!((first.joints().next().unwrap().cx - 0.0).abs() < f32::EPSILON);

        timer.fire();
        viewer.pump().unwrap();
        let second = viewer.render().unwrap();
        assert!((second.joints().next().unwrap().cx - 1.0).abs() < f32::EPSILON);
        assert_eq!((second.width, second.height), (20, 10));
    }

    #[test]
    fn test_fps_override() {
        let timer = ManualTimer::new();
        let mut viewer = PoseViewer::with_timer(
            "x",
            ViewerConfig::default().with_fps(5.0),
            Box::new(timer.clone()),
        );
        viewer.set_document(document(2, 25.0)).unwrap();
        assert_eq!(timer.periods(), vec![Duration::from_millis(200)]);
    }

    #[test]
    fn test_reload_cancels_previous_timer() {
        let timer = ManualTimer::new();
        let mut viewer = viewer(&timer);
        viewer.set_document(document(2, 25.0)).unwrap();
        let first = viewer.handle.as_ref().map(TimerHandle::is_cancelled);
        assert_eq!(first, Some(false));

        viewer.set_document(document(3, 50.0)).unwrap();
        assert_eq!(timer.periods().len(), 2);
        assert!(viewer.is_playing());
        assert_eq!(viewer.frame_index(), Some(0));
    }

    #[test]
    fn test_static_reload_stops_previous_timer() {
        let timer = ManualTimer::new();
        let mut viewer = viewer(&timer);
        viewer.set_document(document(2, 25.0)).unwrap();
        assert!(timer.is_running());

        viewer.set_document(document(3, 0.0)).unwrap();
        assert_eq!(viewer.mode(), PlaybackMode::Static);
        assert!(!timer.is_running());
        assert!(!viewer.is_playing());

        assert!(!timer.fire());
        assert_eq!(viewer.pump().unwrap(), 0);
        assert_eq!(viewer.frame_index(), Some(0));
    }

    #[test]
    fn test_reload_drops_ticks_from_previous_timer() {
        let timer = ManualTimer::new();
        let mut viewer = viewer(&timer);
        viewer.set_document(document(2, 25.0)).unwrap();
        assert!(timer.fire());

        viewer.set_document(document(3, 25.0)).unwrap();
        assert_eq!(viewer.pump().unwrap(), 0);
        assert_eq!(viewer.frame_index(), Some(0));

        assert!(timer.fire());
        assert_eq!(viewer.pump().unwrap(), 1);
        assert_eq!(viewer.frame_index(), Some(1));
    }

    #[test]
    fn test_stale_tick_event_is_ignored() {
        let timer = ManualTimer::new();
        let mut viewer = viewer(&timer);
        viewer.set_document(document(3, 25.0)).unwrap();
        let current = viewer.generation;
        assert!(!viewer.handle_event(ViewerEvent::Tick(current.wrapping_sub(1))).unwrap());
        assert!(viewer.handle_event(ViewerEvent::Tick(current)).unwrap());
        assert_eq!(viewer.frame_index(), Some(1));
    }

    #[test]
    fn test_detach_stops_timer_and_is_idempotent() {
        let timer = ManualTimer::new();
        let mut viewer = viewer(&timer);
        viewer.set_document(document(4, 25.0)).unwrap();
        assert!(timer.is_running());

        viewer.detach();
        assert!(!timer.is_running());
        assert!(!viewer.is_playing());
        viewer.detach();
        assert_eq!(viewer.state(), ViewerState::Detached);
        assert!(!timer.fire());
        assert!(!viewer.tick());
    }

    #[test]
    fn test_drop_detaches() {
        let timer = ManualTimer::new();
        let mut viewer = viewer(&timer);
        viewer.set_document(document(4, 25.0)).unwrap();
        drop(viewer);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_failed_load_stays_empty() {
        let timer = ManualTimer::new();
        let mut viewer = viewer(&timer);
        let err = viewer
            .mount_blocking(&StaticLoader(Err(PoseError::LoadError("offline".to_string()))))
            .unwrap_err();

        assert!(err.to_string().contains("offline"));
        assert_eq!(viewer.state(), ViewerState::Failed);
        assert!(viewer.render().is_none());
        assert!(timer.periods().is_empty());

        viewer.set_document(document(3, 25.0)).unwrap();
        assert_eq!(viewer.state(), ViewerState::Failed);
        assert!(viewer.pose().is_none());
        assert!(viewer.render().is_none());
        assert!(timer.periods().is_empty());
    }

    #[test]
    fn test_load_after_detach_is_ignored() {
        let timer = ManualTimer::new();
        let mut viewer = viewer(&timer);
        viewer.detach();
        let changed = viewer
            .handle_event(ViewerEvent::Loaded(Ok(document(3, 25.0))))
            .unwrap();
        assert!(!changed);
        assert!(viewer.pose().is_none());
        assert!(timer.periods().is_empty());
    }

    #[test]
    fn test_empty_document_renders_nothing() {
        let timer = ManualTimer::new();
        let mut viewer = viewer(&timer);
        viewer.set_document(document(0, 25.0)).unwrap();
        assert_eq!(viewer.state(), ViewerState::Ready);
        assert!(viewer.render().is_none());
        assert_eq!(viewer.redraw_count(), 0);
        assert!(timer.periods().is_empty());
    }

    #[test]
    fn test_invalid_fps_plays_static() {
        let timer = ManualTimer::new();
        let mut viewer = viewer(&timer);
        viewer.set_document(document(3, 0.0)).unwrap();
        assert_eq!(viewer.mode(), PlaybackMode::Static);
        assert!(timer.periods().is_empty());
        assert_eq!(viewer.frame_index(), Some(0));
    }

    #[test]
    fn test_background_mount() {
        let timer = ManualTimer::new();
        let mut viewer = viewer(&timer);
        viewer
            .mount(Arc::new(StaticLoader(Ok(document(2, 25.0)))))
            .unwrap();
        assert_eq!(viewer.state(), ViewerState::Loading);
        assert!(viewer.render().is_none());

        assert!(viewer.wait(Duration::from_secs(5)).unwrap());
        assert_eq!(viewer.state(), ViewerState::Ready);
        assert_eq!(viewer.frame_index(), Some(0));
    }

    #[test]
    fn test_edit_flag_has_no_effect() {
        let timer = ManualTimer::new();
        let mut plain = viewer(&timer);
        let mut editing = viewer(&timer).with_edit(true);
        assert!(editing.edit());
        plain.set_document(document(1, 25.0)).unwrap();
        editing.set_document(document(1, 25.0)).unwrap();
        assert_eq!(plain.render_svg(), editing.render_svg());
    }
}
