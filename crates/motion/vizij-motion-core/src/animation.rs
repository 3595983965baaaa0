//! Single timed interpolation of a subset of an item's state.
//!
//! Lifecycle: unstarted (`start == None`) -> scheduled (`start = tick + delay`,
//! not yet due) -> active (`tick >= start`) -> ended (`end()` resets `start`).

use crate::easing::{linear, EasingFn};
use crate::error::{MotionError, Result};
use crate::events::{Emitter, EventKind, MotionEvent};
use crate::ids::ListenerId;
use crate::state::{TransformDelta, TransformState};
use crate::Tick;

pub const DEFAULT_DURATION_MS: f64 = 500.0;

/// Resolved duration/delay/easing for one unit.
///
/// Built through [`Timing::new`] or `Default` only, so `duration` is always
/// a whole number of milliseconds `>= 1`.
#[derive(Clone, Copy, Debug)]
pub struct Timing {
    duration: f64,
    delay: f64,
    easing: EasingFn,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION_MS,
            delay: 0.0,
            easing: linear,
        }
    }
}

impl Timing {
    /// Build with coercion: durations are whole milliseconds and never zero.
    pub fn new(duration: f64, delay: f64, easing: EasingFn) -> Self {
        Self {
            duration: coerce_duration(duration, DEFAULT_DURATION_MS),
            delay: coerce_delay(delay),
            easing,
        }
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[inline]
    pub fn delay(&self) -> f64 {
        self.delay
    }

    #[inline]
    pub fn easing(&self) -> EasingFn {
        self.easing
    }
}

/// Truncate to whole ms; zero, negative or non-finite falls back.
pub fn coerce_duration(ms: f64, fallback: f64) -> f64 {
    let ms = if ms.is_finite() { ms.trunc() } else { 0.0 };
    if ms > 0.0 {
        ms
    } else if fallback.is_finite() && fallback.trunc() > 0.0 {
        fallback.trunc()
    } else {
        DEFAULT_DURATION_MS
    }
}

/// Truncate to whole ms; negative or non-finite becomes 0.
pub fn coerce_delay(ms: f64) -> f64 {
    if ms.is_finite() && ms > 0.0 {
        ms.trunc()
    } else {
        0.0
    }
}

#[derive(Debug)]
pub struct Animation {
    delta: TransformDelta,
    timing: Timing,
    start: Option<Tick>,
    initial: Option<TransformState>,
    /// Elapsed offset captured by `pause`.
    paused: Option<f64>,
    events: Emitter,
}

impl Animation {
    pub fn new(delta: TransformDelta, timing: Timing) -> Self {
        Self {
            delta,
            timing,
            start: None,
            initial: None,
            paused: None,
            events: Emitter::new(),
        }
    }

    #[inline]
    pub fn delta(&self) -> &TransformDelta {
        &self.delta
    }

    #[inline]
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.timing.duration
    }

    #[inline]
    pub fn delay(&self) -> f64 {
        self.timing.delay
    }

    #[inline]
    pub fn start(&self) -> Option<Tick> {
        self.start
    }

    #[inline]
    pub fn initial(&self) -> Option<&TransformState> {
        self.initial.as_ref()
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused.is_some()
    }

    pub fn on(&mut self, kind: EventKind, listener: impl FnMut(&MotionEvent) + 'static) -> ListenerId {
        self.events.on(kind, listener)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    /// Anchor at `tick + delay` and snapshot `state`. No-op once started
    /// unless `force`. Returns the active start tick.
    pub fn init(&mut self, tick: Tick, state: &TransformState, force: bool) -> Tick {
        if let (Some(start), false) = (self.start, force) {
            return start;
        }
        let start = tick + self.timing.delay;
        self.start = Some(start);
        self.initial = Some(*state);
        self.paused = None;
        log::debug!("animation start at {start} (init tick {tick})");
        self.events.emit(&MotionEvent::Started { start });
        start
    }

    /// Eased progress at `tick`. Not clamped: may exceed 1 past the end.
    pub fn progress(&self, tick: Tick) -> Option<f64> {
        self.start
            .map(|start| (self.timing.easing)((tick - start) / self.timing.duration))
    }

    /// Interpolate toward the end state for `tick`. Still-delayed and paused
    /// animations are left alone.
    pub fn run(&mut self, tick: Tick, state: &mut TransformState) -> Result<()> {
        let start = self
            .start
            .ok_or_else(|| MotionError::InvalidState("animation run before init".into()))?;
        if tick < start || self.paused.is_some() {
            return Ok(());
        }
        let percent = (self.timing.easing)((tick - start) / self.timing.duration);
        if !percent.is_finite() {
            return Err(MotionError::InvalidState(format!(
                "easing produced {percent} at tick {tick}"
            )));
        }
        self.transform(percent, state)
    }

    /// Write the state at `percent`, always relative to the start snapshot.
    pub fn transform(&self, percent: f64, state: &mut TransformState) -> Result<()> {
        let initial = self
            .initial
            .as_ref()
            .ok_or_else(|| MotionError::InvalidState("animation transform before init".into()))?;
        self.delta.apply(initial, percent, state);
        Ok(())
    }

    /// Finish. Unless aborting, snap to exactly `percent = 1`; a unit that
    /// never started snaps relative to the current state.
    pub fn end(&mut self, abort: bool, state: &mut TransformState) {
        if !abort {
            let initial = *self.initial.get_or_insert(*state);
            self.delta.apply(&initial, 1.0, state);
        }
        self.start = None;
        self.paused = None;
        log::debug!("animation end (aborted: {abort})");
        self.events.emit(&MotionEvent::Ended { aborted: abort });
    }

    pub fn pause(&mut self, tick: Tick) {
        if let (Some(start), None) = (self.start, self.paused) {
            self.paused = Some(tick - start);
        }
    }

    /// Continue from the paused visual position.
    pub fn resume(&mut self, tick: Tick) {
        if let (Some(_), Some(diff)) = (self.start, self.paused.take()) {
            self.start = Some(tick - diff);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn mk(delta: TransformDelta, duration: f64, delay: f64) -> Animation {
        Animation::new(delta, Timing::new(duration, delay, linear))
    }

    #[test]
    fn timing_coercion() {
        assert_eq!(Timing::new(0.0, 0.0, linear).duration(), 500.0);
        assert_eq!(Timing::new(-20.0, 0.0, linear).duration(), 500.0);
        assert_eq!(Timing::new(f64::NAN, 0.0, linear).duration(), 500.0);
        assert_eq!(Timing::new(0.4, 0.0, linear).duration(), 500.0);
        assert_eq!(Timing::new(250.9, 0.0, linear).duration(), 250.0);
        assert_eq!(Timing::new(100.0, -5.0, linear).delay(), 0.0);
        assert_eq!(Timing::new(100.0, 12.7, linear).delay(), 12.0);
        assert_eq!(coerce_duration(0.0, 300.0), 300.0);
    }

    #[test]
    fn zero_duration_never_reaches_an_animation() {
        for ms in [0.0, -1.0, 0.9, f64::NAN, f64::NEG_INFINITY] {
            let a = mk(TransformDelta::opacity(0.0), ms, 0.0);
            assert_eq!(a.duration(), DEFAULT_DURATION_MS, "{ms}");
        }
        assert_eq!(Timing::default().duration(), DEFAULT_DURATION_MS);
    }

    #[test]
    fn run_before_init_is_invalid_state() {
        let mut a = mk(TransformDelta::translate([1.0, 0.0, 0.0]), 100.0, 0.0);
        let mut s = TransformState::default();
        assert!(matches!(a.run(0.0, &mut s), Err(MotionError::InvalidState(_))));
        assert!(matches!(a.transform(0.5, &mut s), Err(MotionError::InvalidState(_))));
    }

    #[test]
    fn init_is_idempotent_unless_forced() {
        let mut a = mk(TransformDelta::translate([1.0, 0.0, 0.0]), 100.0, 50.0);
        let s = TransformState::default();
        assert_eq!(a.init(10.0, &s, false), 60.0);
        assert_eq!(a.init(99.0, &s, false), 60.0);
        assert_eq!(a.init(99.0, &s, true), 149.0);
    }

    #[test]
    fn delayed_run_is_noop() {
        let mut a = mk(TransformDelta::translate([10.0, 0.0, 0.0]), 100.0, 50.0);
        let mut s = TransformState::default();
        a.init(0.0, &s, false);
        a.run(49.0, &mut s).unwrap();
        assert_eq!(s.translate, [0.0; 3]);
        a.run(100.0, &mut s).unwrap();
        assert_eq!(s.translate, [5.0, 0.0, 0.0]);
    }

    #[test]
    fn transform_twice_is_identical() {
        let mut a = mk(TransformDelta::rotate([0.0, 0.0, 90.0]), 100.0, 0.0);
        let mut s = TransformState::default();
        a.init(0.0, &s, false);
        a.transform(0.37, &mut s).unwrap();
        let first = s;
        a.transform(0.37, &mut s).unwrap();
        assert_eq!(first, s);
    }

    #[test]
    fn end_snaps_abort_does_not() {
        let mut a = mk(TransformDelta::translate([10.0, 0.0, 0.0]), 100.0, 0.0);
        let mut s = TransformState::default();
        a.init(0.0, &s, false);
        a.run(30.0, &mut s).unwrap();
        a.end(true, &mut s);
        assert_eq!(s.translate, [3.0, 0.0, 0.0]);
        assert_eq!(a.start(), None);

        let mut b = mk(TransformDelta::translate([10.0, 0.0, 0.0]), 100.0, 0.0);
        b.init(0.0, &s, false);
        b.run(30.0, &mut s).unwrap();
        b.end(false, &mut s);
        assert_eq!(s.translate, [13.0, 0.0, 0.0]);
    }

    #[test]
    fn end_without_start_snaps_from_current() {
        let mut a = mk(TransformDelta::opacity(0.25), 100.0, 0.0);
        let mut s = TransformState::default();
        a.end(false, &mut s);
        assert_eq!(s.opacity, 0.25);
    }

    #[test]
    fn pause_resume_keeps_position() {
        let mut a = mk(TransformDelta::translate([100.0, 0.0, 0.0]), 100.0, 0.0);
        let mut s = TransformState::default();
        a.init(0.0, &s, false);
        a.run(40.0, &mut s).unwrap();
        a.pause(40.0);
        a.run(90.0, &mut s).unwrap();
        assert_eq!(s.translate[0], 40.0);
        a.resume(1000.0);
        assert_eq!(a.start(), Some(960.0));
        a.run(1010.0, &mut s).unwrap();
        assert_eq!(s.translate[0], 50.0);
    }

    #[test]
    fn non_finite_easing_is_rejected() {
        fn broken(_: f64) -> f64 {
            f64::NAN
        }
        let mut a = Animation::new(
            TransformDelta::translate([1.0, 0.0, 0.0]),
            Timing::new(100.0, 0.0, broken),
        );
        let mut s = TransformState::default();
        a.init(0.0, &s, false);
        assert!(a.run(10.0, &mut s).is_err());
        assert!(s.is_finite());
    }

    #[test]
    fn emits_start_and_end() {
        let starts = Rc::new(Cell::new(0));
        let ends = Rc::new(Cell::new(0));
        let mut a = mk(TransformDelta::opacity(0.0), 100.0, 0.0);
        let c = starts.clone();
        a.on(EventKind::Start, move |_| c.set(c.get() + 1));
        let c = ends.clone();
        a.on(EventKind::End, move |_| c.set(c.get() + 1));
        let mut s = TransformState::default();
        a.init(0.0, &s, false);
        a.init(5.0, &s, false);
        a.end(false, &mut s);
        assert_eq!((starts.get(), ends.get()), (1, 1));
    }
}
