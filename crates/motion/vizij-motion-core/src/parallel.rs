//! A fixed set of animations sharing one start tick.
//!
//! Each child keeps its own delay/duration/easing. The group lasts until the
//! last child finishes: `duration = max(child.delay + child.duration)`.

use crate::animation::{Animation, Timing};
use crate::descriptor::AnimationDesc;
use crate::easing::EasingTable;
use crate::error::{MotionError, Result};
use crate::events::{Emitter, EventKind, MotionEvent};
use crate::ids::ListenerId;
use crate::state::TransformState;
use crate::Tick;

#[derive(Debug)]
pub struct ParallelAnimation {
    children: Vec<Animation>,
    /// Children still interpolating in the current run.
    live: Vec<bool>,
    duration: f64,
    start: Option<Tick>,
    paused: Option<f64>,
    events: Emitter,
}

impl ParallelAnimation {
    /// Group prebuilt children. An empty group has no duration and is rejected.
    pub fn new(children: Vec<Animation>) -> Result<Self> {
        if children.is_empty() {
            return Err(MotionError::InvalidDescriptor(
                "parallel group needs at least one animation".into(),
            ));
        }
        let duration = children
            .iter()
            .map(|c| c.delay() + c.duration())
            .fold(0.0, f64::max);
        Ok(Self {
            live: vec![false; children.len()],
            children,
            duration,
            start: None,
            paused: None,
            events: Emitter::new(),
        })
    }

    /// Build every child eagerly. A child's own duration/delay/ease wins,
    /// otherwise the group `defaults` apply.
    pub fn from_descs(
        descs: &[AnimationDesc],
        defaults: &Timing,
        easings: &EasingTable,
    ) -> Result<Self> {
        let children = descs
            .iter()
            .map(|d| d.build(defaults, easings))
            .collect::<Result<Vec<_>>>()?;
        Self::new(children)
    }

    #[inline]
    pub fn children(&self) -> &[Animation] {
        &self.children
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[inline]
    pub fn start(&self) -> Option<Tick> {
        self.start
    }

    pub fn live_count(&self) -> usize {
        self.live.iter().filter(|l| **l).count()
    }

    pub fn on(&mut self, kind: EventKind, listener: impl FnMut(&MotionEvent) + 'static) -> ListenerId {
        self.events.on(kind, listener)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    /// Anchor the group and every child at `tick`. No-op once started unless `force`.
    pub fn init(&mut self, tick: Tick, state: &TransformState, force: bool) -> Tick {
        if let (Some(start), false) = (self.start, force) {
            return start;
        }
        for (child, live) in self.children.iter_mut().zip(self.live.iter_mut()) {
            child.init(tick, state, true);
            *live = true;
        }
        self.start = Some(tick);
        self.paused = None;
        log::debug!(
            "parallel group start at {tick} ({} children)",
            self.children.len()
        );
        self.events.emit(&MotionEvent::Started { start: tick });
        tick
    }

    /// Retire children whose window has elapsed (snapped to their end), run the rest.
    pub fn run(&mut self, tick: Tick, state: &mut TransformState) -> Result<()> {
        if self.start.is_none() {
            return Err(MotionError::InvalidState(
                "parallel group run before init".into(),
            ));
        }
        if self.paused.is_some() {
            return Ok(());
        }
        for (child, live) in self.children.iter_mut().zip(self.live.iter_mut()) {
            if !*live {
                continue;
            }
            match child.start() {
                Some(start) if start + child.duration() <= tick => {
                    child.end(false, state);
                    *live = false;
                }
                _ => child.run(tick, state)?,
            }
        }
        Ok(())
    }

    /// Force-end every remaining child. A group that never started ends all of them.
    pub fn end(&mut self, abort: bool, state: &mut TransformState) {
        if self.start.is_none() {
            self.live.iter_mut().for_each(|l| *l = true);
        }
        for (child, live) in self.children.iter_mut().zip(self.live.iter_mut()) {
            if *live {
                child.end(abort, state);
                *live = false;
            }
        }
        self.start = None;
        self.paused = None;
        log::debug!("parallel group end (aborted: {abort})");
        self.events.emit(&MotionEvent::Ended { aborted: abort });
    }

    pub fn pause(&mut self, tick: Tick) {
        let Some(start) = self.start else {
            return;
        };
        if self.paused.is_some() {
            return;
        }
        self.paused = Some(tick - start);
        for (child, _) in self.children.iter_mut().zip(&self.live).filter(|(_, l)| **l) {
            child.pause(tick);
        }
    }

    pub fn resume(&mut self, tick: Tick) {
        let Some(diff) = self.paused.take() else {
            return;
        };
        self.start = Some(tick - diff);
        for (child, _) in self.children.iter_mut().zip(&self.live).filter(|(_, l)| **l) {
            child.resume(tick);
        }
    }
}
