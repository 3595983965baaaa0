//! Queue units: a single animation or a parallel group behind one interface.

use crate::animation::Animation;
use crate::error::Result;
use crate::parallel::ParallelAnimation;
use crate::state::TransformState;
use crate::Tick;

/// Lifecycle shared by everything an item can queue.
pub trait Playable {
    /// Anchor at `tick` (plus own delay) and snapshot `state`; returns the start tick.
    fn init(&mut self, tick: Tick, state: &TransformState, force: bool) -> Tick;
    fn run(&mut self, tick: Tick, state: &mut TransformState) -> Result<()>;
    fn end(&mut self, abort: bool, state: &mut TransformState);
    fn pause(&mut self, tick: Tick);
    fn resume(&mut self, tick: Tick);
    fn start(&self) -> Option<Tick>;
    fn delay(&self) -> f64;
    fn duration(&self) -> f64;
}

impl Playable for Animation {
    fn init(&mut self, tick: Tick, state: &TransformState, force: bool) -> Tick {
        Animation::init(self, tick, state, force)
    }
    fn run(&mut self, tick: Tick, state: &mut TransformState) -> Result<()> {
        Animation::run(self, tick, state)
    }
    fn end(&mut self, abort: bool, state: &mut TransformState) {
        Animation::end(self, abort, state)
    }
    fn pause(&mut self, tick: Tick) {
        Animation::pause(self, tick)
    }
    fn resume(&mut self, tick: Tick) {
        Animation::resume(self, tick)
    }
    fn start(&self) -> Option<Tick> {
        Animation::start(self)
    }
    fn delay(&self) -> f64 {
        Animation::delay(self)
    }
    fn duration(&self) -> f64 {
        Animation::duration(self)
    }
}

impl Playable for ParallelAnimation {
    fn init(&mut self, tick: Tick, state: &TransformState, force: bool) -> Tick {
        ParallelAnimation::init(self, tick, state, force)
    }
    fn run(&mut self, tick: Tick, state: &mut TransformState) -> Result<()> {
        ParallelAnimation::run(self, tick, state)
    }
    fn end(&mut self, abort: bool, state: &mut TransformState) {
        ParallelAnimation::end(self, abort, state)
    }
    fn pause(&mut self, tick: Tick) {
        ParallelAnimation::pause(self, tick)
    }
    fn resume(&mut self, tick: Tick) {
        ParallelAnimation::resume(self, tick)
    }
    fn start(&self) -> Option<Tick> {
        ParallelAnimation::start(self)
    }
    /// Children carry their own delays; the group starts immediately.
    fn delay(&self) -> f64 {
        0.0
    }
    fn duration(&self) -> f64 {
        ParallelAnimation::duration(self)
    }
}

#[derive(Debug)]
pub enum Unit {
    Single(Animation),
    Parallel(ParallelAnimation),
}

impl Unit {
    #[inline]
    fn inner(&self) -> &dyn Playable {
        match self {
            Unit::Single(a) => a,
            Unit::Parallel(p) => p,
        }
    }

    #[inline]
    fn inner_mut(&mut self) -> &mut dyn Playable {
        match self {
            Unit::Single(a) => a,
            Unit::Parallel(p) => p,
        }
    }

    /// Tick at which the current run is over, if anchored.
    #[inline]
    pub fn end_tick(&self) -> Option<Tick> {
        self.start().map(|s| s + self.duration())
    }
}

impl Playable for Unit {
    fn init(&mut self, tick: Tick, state: &TransformState, force: bool) -> Tick {
        self.inner_mut().init(tick, state, force)
    }
    fn run(&mut self, tick: Tick, state: &mut TransformState) -> Result<()> {
        self.inner_mut().run(tick, state)
    }
    fn end(&mut self, abort: bool, state: &mut TransformState) {
        self.inner_mut().end(abort, state)
    }
    fn pause(&mut self, tick: Tick) {
        self.inner_mut().pause(tick)
    }
    fn resume(&mut self, tick: Tick) {
        self.inner_mut().resume(tick)
    }
    fn start(&self) -> Option<Tick> {
        self.inner().start()
    }
    fn delay(&self) -> f64 {
        self.inner().delay()
    }
    fn duration(&self) -> f64 {
        self.inner().duration()
    }
}

impl From<Animation> for Unit {
    fn from(a: Animation) -> Self {
        Unit::Single(a)
    }
}

impl From<ParallelAnimation> for Unit {
    fn from(p: ParallelAnimation) -> Self {
        Unit::Parallel(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Timing;
    use crate::easing::linear;
    use crate::state::TransformDelta;

    #[test]
    fn single_and_group_share_window_math() {
        let single: Unit = Animation::new(
            TransformDelta::translate([1.0, 0.0, 0.0]),
            Timing::new(100.0, 40.0, linear),
        )
        .into();
        let group: Unit = ParallelAnimation::new(vec![Animation::new(
            TransformDelta::translate([1.0, 0.0, 0.0]),
            Timing::new(100.0, 40.0, linear),
        )])
        .unwrap()
        .into();

        let s = TransformState::default();
        for mut unit in [single, group] {
            assert_eq!(unit.end_tick(), None);
            unit.init(10.0, &s, false);
            assert_eq!(unit.delay() + unit.duration(), 140.0);
            assert_eq!(unit.end_tick(), Some(150.0));
        }
    }
}
