// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

//! Frame scheduling: the frame cursor, playback mode and interval timers.
//!
//! A document with one frame is shown once ([`PlaybackMode::Static`]). A
//! longer document loops forever, advancing the [`FrameCursor`] by one frame
//! every `1 / fps` seconds ([`PlaybackMode::Looping`]).
//!
//! Timers only produce ticks. Whatever owns the cursor applies them, so
//! cursor state never leaves the owning thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{PoseError, Result};
use crate::pose::{PoseBody, frame_period};

/// Position in a frame sequence, always in `[0, count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCursor {
    index: usize,
    count: usize,
}

impl FrameCursor {
    /// Cursor at frame 0, or `None` for an empty sequence.
    #[must_use]
    pub const fn new(count: usize) -> Option<Self> {
        if count == 0 {
            None
        } else {
            Some(Self { index: 0, count })
        }
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Step to the next frame, wrapping to 0 after the last.
    pub const fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.count;
        self.index
    }

    /// Jump to `index`, wrapping modulo the frame count.
    pub const fn select(&mut self, index: usize) -> usize {
        self.index = index % self.count;
        self.index
    }
}

/// How a loaded document is played back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Show the current frame once; no timer.
    Static,
    /// Advance one frame every `period`.
    Looping { period: Duration },
}

impl PlaybackMode {
    /// Pick the mode for `body`, optionally overriding its frame rate.
    ///
    /// Multi-frame bodies whose rate cannot drive a timer play as
    /// [`PlaybackMode::Static`].
    #[must_use]
    pub fn for_body(body: &PoseBody, fps_override: Option<f32>) -> Self {
        if body.frames.len() <= 1 {
            return Self::Static;
        }
        let fps = fps_override.unwrap_or(body.fps);
        frame_period(fps).map_or(Self::Static, |period| Self::Looping { period })
    }

    #[must_use]
    pub const fn is_looping(&self) -> bool {
        matches!(self, Self::Looping { .. })
    }
}

/// Tick callback. Returning `false` stops the timer.
pub type TickFn = Box<dyn FnMut() -> bool + Send>;

/// Cancellation handle for a running timer.
///
/// Cancelling is idempotent, and dropping the handle cancels the timer.
#[derive(Debug)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
    thread: Option<thread::Thread>,
}

impl TimerHandle {
    fn new(cancelled: Arc<AtomicBool>, thread: Option<thread::Thread>) -> Self {
        Self { cancelled, thread }
    }

    /// Stop the timer. Returns `true` only for the call that stopped it.
    pub fn cancel(&self) -> bool {
        let first = !self.cancelled.swap(true, Ordering::AcqRel);
        if first && let Some(thread) = &self.thread {
            thread.unpark();
        }
        first
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A repeating timer.
pub trait IntervalTimer: Send {
    /// Call `on_tick` every `period` until cancelled or until it returns `false`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::TimerError`] if the timer cannot be started.
    fn start(&mut self, period: Duration, on_tick: TickFn) -> Result<TimerHandle>;
}

/// Timer backed by a dedicated thread.
///
/// Deadlines are computed from the start time, so ticks do not drift. After a
/// stall the schedule restarts from now rather than firing a burst of late
/// ticks.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadTimer;

impl IntervalTimer for ThreadTimer {
    fn start(&mut self, period: Duration, mut on_tick: TickFn) -> Result<TimerHandle> {
        if period.is_zero() {
            return Err(PoseError::TimerError("period must be non-zero".to_string()));
        }

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let join = thread::Builder::new()
            .name("pose-viewer-timer".to_string())
            .spawn(move || {
                let mut deadline = Instant::now() + period;
                loop {
                    loop {
                        if flag.load(Ordering::Acquire) {
                            return;
                        }
                        let now = Instant::now();
                        if now >= deadline {
                            break;
                        }
                        thread::park_timeout(deadline - now);
                    }
                    if !on_tick() {
                        return;
                    }
                    deadline += period;
                    let now = Instant::now();
                    if deadline <= now {
                        deadline = now + period;
                    }
                }
            })
            .map_err(|e| PoseError::TimerError(format!("Failed to spawn timer thread: {e}")))?;

        Ok(TimerHandle::new(cancelled, Some(join.thread().clone())))
    }
}

#[derive(Default)]
struct ManualState {
    periods: Vec<Duration>,
    active: Option<(Arc<AtomicBool>, TickFn)>,
}

/// Timer whose ticks are fired explicitly with [`ManualTimer::fire`].
///
/// Clones share state, so a host can keep one clone and hand another to the
/// component.
#[derive(Clone, Default)]
pub struct ManualTimer {
    state: Arc<Mutex<ManualState>>,
}

impl ManualTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire one tick on the most recently started timer.
    ///
    /// Returns `false` if no live timer received it.
    pub fn fire(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let live = match state.active.as_mut() {
            None => return false,
            Some((cancelled, _)) if cancelled.load(Ordering::Acquire) => false,
            Some((cancelled, on_tick)) => {
                let keep = on_tick();
                if !keep {
                    cancelled.store(true, Ordering::Release);
                }
                keep
            }
        };
        if !live {
            state.active = None;
        }
        live
    }

    /// Periods of every `start` call so far.
    #[must_use]
    pub fn periods(&self) -> Vec<Duration> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .periods
            .clone()
    }

    /// Whether a started timer is still live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active
            .as_ref()
            .is_some_and(|(cancelled, _)| !cancelled.load(Ordering::Acquire))
    }
}

impl IntervalTimer for ManualTimer {
    fn start(&mut self, period: Duration, on_tick: TickFn) -> Result<TimerHandle> {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.periods.push(period);
        state.active = Some((Arc::clone(&cancelled), on_tick));
        Ok(TimerHandle::new(cancelled, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::PoseFrame;
    use proptest::prelude::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;

    fn body(frames: usize, fps: f32) -> PoseBody {
        PoseBody {
            fps,
            frames: vec![PoseFrame::default(); frames],
        }
    }

    #[test]
    fn test_cursor_empty() {
        assert!(FrameCursor::new(0).is_none());
    }

    #[test]
    fn test_cursor_advance_wraps() {
        let mut cursor = FrameCursor::new(3).unwrap();
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.advance(), 1);
        assert_eq!(cursor.advance(), 2);
        assert_eq!(cursor.advance(), 0);
        assert_eq!(cursor.select(7), 1);
        assert_eq!(cursor.count(), 3);
    }

    #[test]
    fn test_cursor_single_frame_stays() {
        let mut cursor = FrameCursor::new(1).unwrap();
        assert_eq!(cursor.advance(), 0);
        assert_eq!(cursor.advance(), 0);
    }

    proptest! {
        #[test]
        fn prop_full_cycle_returns_to_start(count in 1usize..200, start in 0usize..1000) {
            let mut cursor = FrameCursor::new(count).unwrap();
            let i = cursor.select(start);
            prop_assert!(i < count);
            for _ in 0..count {
                let next = cursor.advance();
                prop_assert!(next < count);
            }
            prop_assert_eq!(cursor.index(), i);
        }
    }

    #[test]
    fn test_playback_mode() {
        assert_eq!(PlaybackMode::for_body(&body(1, 25.0), None), PlaybackMode::Static);
        assert_eq!(PlaybackMode::for_body(&body(0, 25.0), None), PlaybackMode::Static);
        assert_eq!(
            PlaybackMode::for_body(&body(2, 25.0), None),
            PlaybackMode::Looping {
                period: Duration::from_millis(40)
            }
        );
        assert_eq!(
            PlaybackMode::for_body(&body(2, 25.0), Some(10.0)),
            PlaybackMode::Looping {
                period: Duration::from_millis(100)
            }
        );
        assert_eq!(PlaybackMode::for_body(&body(5, 0.0), None), PlaybackMode::Static);
        assert!(!PlaybackMode::Static.is_looping());
    }

    #[test]
    fn test_handle_cancel_is_idempotent() {
        let mut timer = ManualTimer::new();
        let handle = timer.start(Duration::from_millis(10), Box::new(|| true)).unwrap();
        assert!(!handle.is_cancelled());
        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert!(handle.is_cancelled());
        assert!(!timer.is_running());
    }

    #[test]
    fn test_manual_timer_fires_until_cancelled() {
        let mut timer = ManualTimer::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let handle = timer
            .start(
                Duration::from_millis(40),
                Box::new(move || {
                    c.fetch_add(1, Ordering::SeqCst);
                    true
                }),
            )
            .unwrap();

        assert!(timer.is_running());
        assert!(timer.fire());
        assert!(timer.fire());
        drop(handle);
        assert!(!timer.fire());
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(timer.periods(), vec![Duration::from_millis(40)]);
    }

    #[test]
    fn test_manual_timer_stops_when_callback_declines() {
        let mut timer = ManualTimer::new();
        let _handle = timer.start(Duration::from_millis(1), Box::new(|| false)).unwrap();
        assert!(!timer.fire());
        assert!(!timer.is_running());
    }

    #[test]
    fn test_thread_timer_ticks_and_cancels() {
        let (tx, rx) = mpsc::channel();
        let handle = ThreadTimer
            .start(
                Duration::from_millis(5),
                Box::new(move || tx.send(()).is_ok()),
            )
            .unwrap();

        for _ in 0..3 {
            rx.recv_timeout(Duration::from_secs(5)).unwrap();
        }
        assert!(handle.cancel());
        // Drain anything in flight; the sender is dropped once the thread exits.
        while rx.recv_timeout(Duration::from_secs(5)).is_ok() {}
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_thread_timer_rejects_zero_period() {
        let err = ThreadTimer.start(Duration::ZERO, Box::new(|| true)).unwrap_err();
        assert!(matches!(err, PoseError::TimerError(_)));
    }
}
