//! Scrubbable scheduler.
//!
//! The timeline keeps its own virtual `current_time`, decoupled from the
//! host clock. While playing, each host tick moves `current_time` forward by
//! the host time elapsed since playback (re)started. Items are replayed with
//! [`Item::seek`] whenever the virtual time changed; otherwise the last state
//! is re-rendered as is.

use crate::config::Config;
use crate::descriptor::UnitDesc;
use crate::easing::EasingTable;
use crate::error::Result;
use crate::ids::ItemId;
use crate::item::Item;
use crate::outputs::Outputs;
use crate::stage::{error_event, Stage};
use crate::world::{FrameScheduler, FrameToken, ManualFrames};
use crate::Tick;

#[derive(Debug)]
pub struct Timeline<F: FrameScheduler = ManualFrames> {
    stage: Stage,
    frames: F,
    pending: Option<FrameToken>,
    current_time: Tick,
    running: bool,
    /// Virtual time changed since the last replay.
    dirty: bool,
    /// (host tick, virtual time) pair playback is measured from.
    anchor: Option<(Tick, Tick)>,
    outputs: Outputs,
}

impl Timeline<ManualFrames> {
    pub fn new(cfg: Config) -> Self {
        Self::with_frames(cfg, EasingTable::default(), ManualFrames::new())
    }
}

impl<F: FrameScheduler> Timeline<F> {
    pub fn with_frames(cfg: Config, easings: EasingTable, frames: F) -> Self {
        Self {
            stage: Stage::new(cfg, easings),
            frames,
            pending: None,
            current_time: 0.0,
            running: false,
            dirty: true,
            anchor: None,
            outputs: Outputs::default(),
        }
    }

    #[inline]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    #[inline]
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    #[inline]
    pub fn frames(&self) -> &F {
        &self.frames
    }

    #[inline]
    pub fn current_time(&self) -> Tick {
        self.current_time
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Longest single pass over any item's queue.
    pub fn duration(&self) -> f64 {
        self.stage
            .items()
            .iter()
            .map(Item::total_duration)
            .fold(0.0, f64::max)
    }

    pub fn add_item(&mut self) -> ItemId {
        self.dirty = true;
        self.stage.add_item()
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.stage.item(id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.dirty = true;
        self.stage.item_mut(id)
    }

    pub fn animate(&mut self, id: ItemId, desc: &UnitDesc) -> Result<()> {
        self.dirty = true;
        self.stage.animate(id, desc)
    }

    fn request(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(self.frames.request_frame());
        }
    }

    fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            self.frames.cancel_frame(token);
        }
    }

    /// Play from the stored `current_time`.
    pub fn play(&mut self) {
        if !self.running {
            self.running = true;
            self.anchor = None;
            log::debug!("timeline play from {}", self.current_time);
        }
        self.request();
    }

    /// Freeze `current_time`.
    pub fn pause(&mut self) {
        self.running = false;
        self.anchor = None;
        self.cancel();
        log::debug!("timeline paused at {}", self.current_time);
    }

    /// Halt and rewind to 0. One more frame is requested to render the rewind.
    pub fn stop(&mut self) {
        self.running = false;
        self.anchor = None;
        self.current_time = 0.0;
        self.dirty = true;
        log::debug!("timeline stopped");
        self.request();
    }

    /// Jump to `time`, playing or not.
    pub fn seek(&mut self, time: Tick) {
        self.current_time = time;
        self.dirty = true;
        if self.running {
            self.anchor = None;
        }
        self.request();
    }

    /// Drive one host tick: advance virtual time if playing, replay items
    /// if needed, and collect every item's frame.
    pub fn update(&mut self, host_tick: Tick) -> &Outputs {
        self.outputs.clear();
        self.pending = None;

        if self.running {
            let (host_origin, time_origin) =
                *self.anchor.get_or_insert((host_tick, self.current_time));
            self.current_time = time_origin + (host_tick - host_origin);
            self.dirty = true;
        }

        if self.dirty {
            let time = self.current_time;
            for item in self.stage.items_mut() {
                if item.queue_len() == 0 {
                    continue;
                }
                if let Err(err) = item.seek(time) {
                    self.outputs.push_event(error_event(item.id(), &err));
                }
            }
            self.dirty = false;
        }
        self.stage.collect(&mut self.outputs);

        if self.running {
            self.request();
        }
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::AnimationDesc;

    fn slide(x: f64, duration: f64) -> UnitDesc {
        AnimationDesc {
            translate: Some([x, 0.0, 0.0]),
            duration: Some(duration),
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn play_tracks_host_elapsed_time() {
        let mut tl = Timeline::new(Config::default());
        let id = tl.add_item();
        tl.animate(id, &slide(100.0, 100.0)).unwrap();
        tl.play();
        tl.update(5000.0);
        assert_eq!(tl.current_time(), 0.0);
        let out = tl.update(5050.0);
        assert_eq!(out.frame(id).unwrap().matrix.0[12], 50.0);
        assert_eq!(tl.current_time(), 50.0);

        tl.pause();
        tl.update(9000.0);
        assert_eq!(tl.current_time(), 50.0);

        tl.play();
        tl.update(9000.0);
        tl.update(9025.0);
        assert_eq!(tl.current_time(), 75.0);
    }

    #[test]
    fn seek_backward_while_paused() {
        let mut tl = Timeline::new(Config::default());
        let id = tl.add_item();
        tl.animate(id, &slide(100.0, 100.0)).unwrap();
        tl.seek(80.0);
        assert!(tl.is_dirty());
        tl.update(0.0);
        assert!(!tl.is_dirty());
        assert_eq!(tl.item(id).unwrap().state().translate[0], 80.0);
        tl.seek(20.0);
        tl.update(1.0);
        assert_eq!(tl.item(id).unwrap().state().translate[0], 20.0);
    }

    #[test]
    fn seek_while_playing_continues_from_target() {
        let mut tl = Timeline::new(Config::default());
        let id = tl.add_item();
        tl.animate(id, &slide(100.0, 1000.0)).unwrap();
        tl.play();
        tl.update(0.0);
        tl.update(100.0);
        tl.seek(500.0);
        tl.update(200.0);
        assert_eq!(tl.current_time(), 500.0);
        tl.update(300.0);
        assert_eq!(tl.current_time(), 600.0);
    }

    #[test]
    fn stop_rewinds() {
        let mut tl = Timeline::new(Config::default());
        let id = tl.add_item();
        tl.animate(id, &slide(100.0, 100.0)).unwrap();
        tl.seek(100.0);
        tl.update(0.0);
        tl.stop();
        assert_eq!(tl.current_time(), 0.0);
        tl.update(10.0);
        assert_eq!(tl.item(id).unwrap().state().translate[0], 0.0);
        assert!(!tl.is_running());
    }

    #[test]
    fn empty_items_are_skipped() {
        let mut tl = Timeline::new(Config::default());
        let idle = tl.add_item();
        tl.item_mut(idle).unwrap().set_opacity(0.3).unwrap();
        tl.seek(10.0);
        let out = tl.update(0.0);
        assert!(out.events.is_empty());
        assert_eq!(out.frame(idle).unwrap().opacity, 0.3);
    }

    #[test]
    fn duration_is_longest_queue() {
        let mut tl = Timeline::new(Config::default());
        let a = tl.add_item();
        let b = tl.add_item();
        tl.animate(a, &slide(1.0, 300.0)).unwrap();
        tl.animate(b, &slide(1.0, 100.0)).unwrap();
        tl.animate(b, &slide(1.0, 100.0)).unwrap();
        assert_eq!(tl.duration(), 300.0);
    }
}
