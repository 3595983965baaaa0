//! Item: one transform state plus a FIFO queue of units.
//!
//! Only the queue head mutates `state` at any tick. Two playback paths share
//! the queue:
//! - [`Item::advance`]: forward-only, lazily anchors the head at the live tick.
//! - [`Item::seek`]: clears the state and replays the queue from a virtual
//!   origin up to the requested tick, so any tick (including earlier ones)
//!   yields the same state every time.

use std::collections::VecDeque;

use crate::error::{MotionError, Result};
use crate::events::{Emitter, EventKind, MotionEvent};
use crate::ids::{ItemId, ListenerId};
use crate::math::vec3::{self, Vec3};
use crate::math::Matrix4;
use crate::outputs::RenderFrame;
use crate::state::TransformState;
use crate::unit::{Playable, Unit};
use crate::Tick;

#[derive(Debug)]
pub struct Item {
    id: ItemId,
    state: TransformState,
    queue: VecDeque<Unit>,
    running: bool,
    paused: bool,
    infinite: bool,
    /// `run()` was called and the first tick has not been seen yet.
    announce: bool,
    events: Emitter,
    /// Item-level events not yet collected by a scheduler.
    journal: Vec<MotionEvent>,
}

fn finite_tick(tick: Tick) -> Result<()> {
    if tick.is_finite() {
        Ok(())
    } else {
        Err(MotionError::InvalidState(format!("non-finite tick {tick}")))
    }
}

/// `origin` moved `passes` times by the offset one pass produced (`once - origin`).
fn stride(origin: Vec3, once: Vec3, passes: f64) -> Vec3 {
    [
        origin[0] + (once[0] - origin[0]) * passes,
        origin[1] + (once[1] - origin[1]) * passes,
        origin[2] + (once[2] - origin[2]) * passes,
    ]
}

fn finite3(v: Vec3, field: &'static str) -> Result<Vec3> {
    if vec3::is_finite(v) {
        Ok(v)
    } else {
        Err(MotionError::NonFinite { field })
    }
}

impl Item {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            state: TransformState::default(),
            queue: VecDeque::new(),
            running: false,
            paused: false,
            infinite: false,
            announce: false,
            events: Emitter::new(),
            journal: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[inline]
    pub fn state(&self) -> &TransformState {
        &self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.infinite
    }

    /// Cycle the whole queue: ended heads are re-appended instead of dropped.
    pub fn set_infinite(&mut self, infinite: bool) -> &mut Self {
        self.infinite = infinite;
        self
    }

    #[inline]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Length of one pass over the queue (`sum(delay + duration)`).
    pub fn total_duration(&self) -> f64 {
        self.queue.iter().map(|u| u.delay() + u.duration()).sum()
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.queue.iter()
    }

    pub fn push(&mut self, unit: impl Into<Unit>) -> &mut Self {
        self.queue.push_back(unit.into());
        self
    }

    pub fn on(&mut self, kind: EventKind, listener: impl FnMut(&MotionEvent) + 'static) -> ListenerId {
        self.events.on(kind, listener)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    fn emit(&mut self, event: MotionEvent) {
        self.events.emit(&event);
        self.journal.push(event);
    }

    /// Take item-level events raised since the last call.
    pub fn drain_events(&mut self) -> Vec<MotionEvent> {
        std::mem::take(&mut self.journal)
    }

    // --- direct edits -----------------------------------------------------

    pub fn translate_by(&mut self, d: Vec3) -> Result<&mut Self> {
        let d = finite3(d, "translate")?;
        self.state.translate = finite3(add3(self.state.translate, d), "translate")?;
        Ok(self)
    }

    pub fn rotate_by(&mut self, d: Vec3) -> Result<&mut Self> {
        let d = finite3(d, "rotate")?;
        self.state.rotate = finite3(add3(self.state.rotate, d), "rotate")?;
        Ok(self)
    }

    pub fn scale_by(&mut self, d: Vec3) -> Result<&mut Self> {
        let d = finite3(d, "scale")?;
        self.state.scale = finite3(add3(self.state.scale, d), "scale")?;
        Ok(self)
    }

    pub fn set_translate(&mut self, v: Vec3) -> Result<&mut Self> {
        self.state.translate = finite3(v, "translate")?;
        Ok(self)
    }

    pub fn set_rotate(&mut self, v: Vec3) -> Result<&mut Self> {
        self.state.rotate = finite3(v, "rotate")?;
        Ok(self)
    }

    pub fn set_scale(&mut self, v: Vec3) -> Result<&mut Self> {
        self.state.scale = finite3(v, "scale")?;
        Ok(self)
    }

    pub fn set_opacity(&mut self, opacity: f64) -> Result<&mut Self> {
        if !opacity.is_finite() {
            return Err(MotionError::NonFinite { field: "opacity" });
        }
        self.state.opacity = opacity;
        Ok(self)
    }

    /// Reset to translate 0, rotate 0, scale 1, opacity 1.
    pub fn clear(&mut self) -> &mut Self {
        self.state.clear();
        self
    }

    // --- rendering --------------------------------------------------------

    pub fn matrix(&self) -> Matrix4 {
        self.state.matrix()
    }

    #[inline]
    pub fn opacity(&self) -> f64 {
        self.state.opacity
    }

    pub fn frame(&self) -> RenderFrame {
        RenderFrame {
            item: self.id,
            matrix: self.matrix(),
            opacity: self.state.opacity,
        }
    }

    // --- scheduling -------------------------------------------------------

    /// Start free-running playback of the queue.
    pub fn run(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Err(MotionError::InvalidState(format!(
                "item {:?} has nothing queued",
                self.id
            )));
        }
        if !self.running {
            self.running = true;
            self.paused = false;
            self.announce = true;
            log::debug!("item {:?} running ({} units)", self.id, self.queue.len());
        }
        Ok(())
    }

    /// Per-tick entry used by the free-running scheduler.
    pub fn update(&mut self, tick: Tick) -> Result<()> {
        if !self.running || self.paused {
            return Ok(());
        }
        finite_tick(tick)?;
        if std::mem::take(&mut self.announce) {
            self.emit(MotionEvent::Started { start: tick });
        }
        self.advance(tick)
    }

    /// Forward playback: progress only the queue head.
    ///
    /// Heads whose window has elapsed are ended (snapped) and popped, or
    /// re-appended when infinite, until a head is still in progress at `tick`.
    pub fn advance(&mut self, tick: Tick) -> Result<()> {
        finite_tick(tick)?;
        loop {
            let Some(head) = self.queue.front_mut() else {
                if self.running {
                    self.running = false;
                    log::debug!("item {:?} queue drained at {tick}", self.id);
                    self.emit(MotionEvent::Ended { aborted: false });
                }
                return Ok(());
            };
            let start = head.init(tick, &self.state, false);
            if start + head.duration() <= tick {
                if let Some(mut done) = self.queue.pop_front() {
                    done.end(false, &mut self.state);
                    if self.infinite {
                        self.queue.push_back(done);
                    }
                }
                continue;
            }
            return head.run(tick, &mut self.state);
        }
    }

    /// Deterministic replay to `tick` from the cleared origin.
    ///
    /// Each unit is re-anchored at a virtual offset that accumulates
    /// `delay + duration` of the units before it. Units whose window ended by
    /// `tick` are snapped to their end; the first unit still in progress is
    /// run at `tick` and later units are not touched. Infinite items skip
    /// whole passes over the queue, then replay the pass under `tick`.
    pub fn seek(&mut self, tick: Tick) -> Result<()> {
        if self.queue.is_empty() {
            return Err(MotionError::InvalidState(format!(
                "item {:?} seek with nothing queued",
                self.id
            )));
        }
        finite_tick(tick)?;
        log::trace!("item {:?} seek to {tick}", self.id);
        self.state.clear();
        let mut time = if self.infinite {
            self.skip_passes(tick)
        } else {
            0.0
        };
        let len = self.queue.len();
        let mut index = 0;
        loop {
            let unit = &mut self.queue[index % len];
            let start = unit.init(time, &self.state, true);
            if start + unit.duration() > tick {
                return unit.run(tick, &mut self.state);
            }
            unit.end(false, &mut self.state);
            let next = time + unit.delay() + unit.duration();
            if next <= time {
                return Err(MotionError::InvalidState(format!(
                    "tick {tick} is beyond the timeline's millisecond resolution"
                )));
            }
            time = next;
            index += 1;
            if index == len && !self.infinite {
                return Ok(());
            }
        }
    }

    /// Jump an infinite queue over the whole passes before `tick`.
    ///
    /// Every pass adds the same offset to the vector fields, and opacity ends
    /// every pass at the value the first pass left. The state after `n`
    /// passes is therefore computed from a single replayed pass. Returns the
    /// virtual time the remaining pass starts at. Fewer than two whole passes
    /// are left to the regular replay.
    fn skip_passes(&mut self, tick: Tick) -> Tick {
        let pass = self.total_duration();
        if pass <= 0.0 {
            return 0.0;
        }
        let mut passes = (tick / pass).floor();
        if passes * pass > tick {
            passes -= 1.0;
        }
        if passes < 2.0 {
            return 0.0;
        }
        let origin = self.state;
        let mut time = 0.0;
        for unit in self.queue.iter_mut() {
            unit.init(time, &self.state, true);
            unit.end(false, &mut self.state);
            time += unit.delay() + unit.duration();
        }
        let once = self.state;
        self.state = TransformState {
            translate: stride(origin.translate, once.translate, passes),
            rotate: stride(origin.rotate, once.rotate, passes),
            scale: stride(origin.scale, once.scale, passes),
            opacity: once.opacity,
        };
        log::trace!("item {:?} skipped {passes} passes of {pass}", self.id);
        passes * pass
    }

    /// Pause the in-flight head.
    pub fn pause(&mut self, tick: Tick) {
        if let Some(head) = self.queue.front_mut() {
            head.pause(tick);
        }
        self.paused = true;
    }

    pub fn resume(&mut self, tick: Tick) {
        if let Some(head) = self.queue.front_mut() {
            head.resume(tick);
        }
        self.paused = false;
    }

    /// End every queued unit in order and empty the queue. `abort` leaves the
    /// state where it is; otherwise each unit snaps to its end in sequence.
    pub fn finish(&mut self, abort: bool) {
        for mut unit in self.queue.drain(..) {
            unit.end(abort, &mut self.state);
        }
        self.infinite = false;
        self.paused = false;
        self.announce = false;
        let was_running = std::mem::replace(&mut self.running, false);
        if was_running {
            log::debug!("item {:?} finished (aborted: {abort})", self.id);
            self.emit(MotionEvent::Ended { aborted: abort });
        }
    }

    /// Cancel immediately without interpolating.
    pub fn stop(&mut self) {
        self.finish(true);
    }
}

#[inline]
fn add3(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}
