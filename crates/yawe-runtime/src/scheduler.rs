#![forbid(unsafe_code)]

//! Cancelable deadlines for resize debouncing and caret blinking.
//!
//! Nothing here owns a clock or a thread. Hosts call the `*_at(now)`
//! methods from their event loop (or the plain variants, which read
//! [`Instant::now`]) and repaint when a tick reports a change.

use tracing::{debug, trace};
use web_time::{Duration, Instant};

/// A single pending deadline that can be rescheduled or canceled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduledTask {
    deadline: Option<Instant>,
}

impl ScheduledTask {
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the task to fire `delay` after `now`, replacing any pending
    /// deadline.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline (zero once it has passed).
    #[must_use]
    pub fn time_until(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Fire if the deadline has passed. A fired task is disarmed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Outcome of feeding a resize event or a tick to a [`ResizeDebouncer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeAction {
    /// Nothing to do.
    None,
    /// A relayout is pending; the quiet period (re)started.
    Scheduled,
    /// The quiet period elapsed: relayout at `width`.
    Apply { width: f32, elapsed: Duration },
}

/// Coalesces bursts of viewport resizes into one relayout.
///
/// Only width changes matter to wrapping, so heights are not tracked.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    debounce: Duration,
    task: ScheduledTask,
    last_resize: Option<Instant>,
    pending_width: Option<f32>,
    applied_width: f32,
}

impl ResizeDebouncer {
    #[must_use]
    pub fn new(debounce: Duration, initial_width: f32) -> Self {
        Self {
            debounce,
            task: ScheduledTask::new(),
            last_resize: None,
            pending_width: None,
            applied_width: initial_width,
        }
    }

    /// Width currently laid out.
    #[must_use]
    pub fn applied_width(&self) -> f32 {
        self.applied_width
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.task.is_pending()
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    pub fn handle_resize(&mut self, width: f32) -> ResizeAction {
        self.handle_resize_at(width, Instant::now())
    }

    /// Record a resize to `width`. A width equal to the last one seen is
    /// ignored; any other restarts the quiet period.
    pub fn handle_resize_at(&mut self, width: f32, now: Instant) -> ResizeAction {
        let seen = self.pending_width.unwrap_or(self.applied_width);
        if width == seen {
            return ResizeAction::None;
        }
        trace!(width, "resize pending");
        self.pending_width = Some(width);
        self.last_resize = Some(now);
        self.task.schedule(now, self.debounce);
        ResizeAction::Scheduled
    }

    pub fn tick(&mut self) -> ResizeAction {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> ResizeAction {
        if !self.task.poll(now) {
            return ResizeAction::None;
        }
        let Some(width) = self.pending_width.take() else {
            return ResizeAction::None;
        };
        let elapsed = self
            .last_resize
            .take()
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.applied_width = width;
        debug!(width, ?elapsed, "resize applied");
        ResizeAction::Apply { width, elapsed }
    }

    #[must_use]
    pub fn time_until_apply(&self, now: Instant) -> Option<Duration> {
        self.task.time_until(now)
    }
}

/// Fixed-interval caret blink.
///
/// Focus shows the caret and starts blinking; blur hides it and stops.
#[derive(Debug, Clone)]
pub struct BlinkTimer {
    interval: Duration,
    task: ScheduledTask,
    visible: bool,
}

impl BlinkTimer {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            task: ScheduledTask::new(),
            visible: false,
        }
    }

    #[must_use]
    pub fn caret_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.is_pending()
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the interval; a running timer is restarted with it.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        if self.task.is_pending() {
            self.task.schedule(now, interval);
        }
    }

    pub fn focus_at(&mut self, now: Instant) {
        self.visible = true;
        self.task.schedule(now, self.interval);
    }

    pub fn blur(&mut self) {
        self.visible = false;
        self.task.cancel();
    }

    /// Toggle the caret if the interval elapsed. Returns whether it changed.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if !self.task.poll(now) {
            return false;
        }
        self.visible = !self.visible;
        self.task.schedule(now, self.interval);
        true
    }

    #[must_use]
    pub fn time_until_toggle(&self, now: Instant) -> Option<Duration> {
        self.task.time_until(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn task_fires_once() {
        let start = Instant::now();
        let mut task = ScheduledTask::new();
        assert!(!task.poll(start));
        task.schedule(start, ms(10));
        assert!(!task.poll(start + ms(9)));
        assert_eq!(task.time_until(start + ms(4)), Some(ms(6)));
        assert!(task.poll(start + ms(10)));
        assert!(!task.is_pending());
        assert!(!task.poll(start + ms(20)));
    }

    #[test]
    fn task_cancel_and_reschedule() {
        let start = Instant::now();
        let mut task = ScheduledTask::new();
        task.schedule(start, ms(10));
        task.schedule(start + ms(5), ms(10));
        assert!(!task.poll(start + ms(12)));
        task.cancel();
        assert!(!task.poll(start + ms(100)));
        assert_eq!(task.time_until(start), None);
    }

    #[test]
    fn debouncer_ignores_same_width() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::new(ms(100), 800.0);
        assert_eq!(debouncer.handle_resize_at(800.0, start), ResizeAction::None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn debouncer_applies_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::new(ms(100), 800.0);
        assert_eq!(
            debouncer.handle_resize_at(640.0, start),
            ResizeAction::Scheduled
        );
        assert_eq!(debouncer.tick_at(start + ms(50)), ResizeAction::None);
        assert_eq!(
            debouncer.tick_at(start + ms(100)),
            ResizeAction::Apply {
                width: 640.0,
                elapsed: ms(100)
            }
        );
        assert_eq!(debouncer.applied_width(), 640.0);
        assert_eq!(debouncer.tick_at(start + ms(300)), ResizeAction::None);
    }

    #[test]
    fn new_resize_restarts_timer() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::new(ms(100), 800.0);
        debouncer.handle_resize_at(700.0, start);
        debouncer.handle_resize_at(600.0, start + ms(80));
        assert_eq!(debouncer.tick_at(start + ms(120)), ResizeAction::None);
        assert_eq!(
            debouncer.time_until_apply(start + ms(120)),
            Some(ms(60))
        );
        assert!(matches!(
            debouncer.tick_at(start + ms(180)),
            ResizeAction::Apply { width, .. } if width == 600.0
        ));
    }

    #[test]
    fn returning_to_pending_width_is_ignored() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::new(ms(100), 800.0);
        debouncer.handle_resize_at(700.0, start);
        assert_eq!(
            debouncer.handle_resize_at(700.0, start + ms(90)),
            ResizeAction::None
        );
        assert!(matches!(
            debouncer.tick_at(start + ms(100)),
            ResizeAction::Apply { .. }
        ));
    }

    #[test]
    fn blink_toggles_while_focused() {
        let start = Instant::now();
        let mut blink = BlinkTimer::new(ms(500));
        assert!(!blink.caret_visible());
        blink.focus_at(start);
        assert!(blink.caret_visible());
        assert!(!blink.tick_at(start + ms(499)));
        assert!(blink.tick_at(start + ms(500)));
        assert!(!blink.caret_visible());
        assert!(blink.tick_at(start + ms(1000)));
        assert!(blink.caret_visible());
    }

    #[test]
    fn blur_stops_and_hides() {
        let start = Instant::now();
        let mut blink = BlinkTimer::new(ms(500));
        blink.focus_at(start);
        blink.blur();
        assert!(!blink.caret_visible());
        assert!(!blink.is_running());
        assert!(!blink.tick_at(start + ms(2000)));
    }

    #[test]
    fn refocus_restarts_visible() {
        let start = Instant::now();
        let mut blink = BlinkTimer::new(ms(500));
        blink.focus_at(start);
        blink.tick_at(start + ms(500));
        assert!(!blink.caret_visible());
        blink.focus_at(start + ms(600));
        assert!(blink.caret_visible());
        assert_eq!(blink.time_until_toggle(start + ms(600)), Some(ms(500)));
    }

    #[test]
    fn set_interval_restarts_running_timer() {
        let start = Instant::now();
        let mut blink = BlinkTimer::new(ms(500));
        blink.set_interval(ms(200), start);
        assert!(!blink.is_running());
        blink.focus_at(start);
        blink.set_interval(ms(100), start + ms(50));
        assert!(blink.tick_at(start + ms(150)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn burst_applies_last_width_once(
            mut widths in prop::collection::vec(100u16..2000, 1..20),
            gaps in prop::collection::vec(0u64..99, 20),
        ) {
            widths.dedup();
            let start = Instant::now();
            let mut debouncer = ResizeDebouncer::new(Duration::from_millis(100), 50.0);
            let mut now = start;
            for (width, gap) in widths.iter().zip(&gaps) {
                now += Duration::from_millis(*gap);
                debouncer.handle_resize_at(f32::from(*width), now);
                prop_assert_eq!(debouncer.applied_width(), 50.0);
            }
            let last = f32::from(*widths.last().unwrap());

            prop_assert_eq!(
                debouncer.tick_at(now + Duration::from_millis(99)),
                ResizeAction::None
            );
            let applied = debouncer.tick_at(now + Duration::from_millis(100));
            prop_assert!(
                matches!(applied, ResizeAction::Apply { width, .. } if width == last),
                "expected Apply with last width {}, got {:?}", last, applied
            );
            prop_assert_eq!(debouncer.applied_width(), last);
            prop_assert_eq!(
                debouncer.tick_at(now + Duration::from_millis(500)),
                ResizeAction::None
            );
        }

        #[test]
        fn blink_alternates_each_interval(ticks in 1u32..30, interval in 1u64..1000) {
            let start = Instant::now();
            let step = Duration::from_millis(interval);
            let mut blink = BlinkTimer::new(step);
            blink.focus_at(start);
            for n in 1..=ticks {
                prop_assert!(blink.tick_at(start + step * n));
                prop_assert_eq!(blink.caret_visible(), n % 2 == 0);
            }
        }
    }
}
