//! Free-running scheduler.
//!
//! The host calls [`World::update`] once per display refresh with its own
//! monotonically increasing tick. Each running item advances its queue head,
//! then every item's frame is collected into [`Outputs`]. After a tick the
//! world asks its [`FrameScheduler`] for exactly one more call while running.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::descriptor::UnitDesc;
use crate::easing::EasingTable;
use crate::error::Result;
use crate::ids::ItemId;
use crate::item::Item;
use crate::outputs::Outputs;
use crate::stage::{error_event, Stage};
use crate::Tick;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FrameToken(pub u64);

/// Host primitive behind "please call me again".
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameToken;
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Bookkeeping scheduler for hosts that drive ticks themselves.
#[derive(Debug, Default)]
pub struct ManualFrames {
    next: u64,
    pending: Option<FrameToken>,
    requested: u64,
    cancelled: u64,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outstanding request, if any.
    #[inline]
    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    #[inline]
    pub fn requested(&self) -> u64 {
        self.requested
    }

    #[inline]
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next);
        self.next = self.next.wrapping_add(1);
        self.requested += 1;
        self.pending = Some(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending == Some(token) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

#[derive(Debug)]
pub struct World<F: FrameScheduler = ManualFrames> {
    stage: Stage,
    frames: F,
    pending: Option<FrameToken>,
    running: bool,
    last_tick: Option<Tick>,
    outputs: Outputs,
}

impl World<ManualFrames> {
    pub fn new(cfg: Config) -> Self {
        Self::with_frames(cfg, EasingTable::default(), ManualFrames::new())
    }
}

impl<F: FrameScheduler> World<F> {
    pub fn with_frames(cfg: Config, easings: EasingTable, frames: F) -> Self {
        Self {
            stage: Stage::new(cfg, easings),
            frames,
            pending: None,
            running: false,
            last_tick: None,
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
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Last tick passed to `update`.
    #[inline]
    pub fn last_tick(&self) -> Option<Tick> {
        self.last_tick
    }

    pub fn add_item(&mut self) -> ItemId {
        self.stage.add_item()
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.stage.item(id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.stage.item_mut(id)
    }

    pub fn animate(&mut self, id: ItemId, desc: &UnitDesc) -> Result<()> {
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

    /// Run every item that has work queued and start the frame loop. Idle
    /// items are left alone.
    pub fn start(&mut self) {
        for item in self.stage.items_mut() {
            if item.is_running() || item.queue_len() == 0 {
                continue;
            }
            if let Err(err) = item.run() {
                log::warn!("item {:?} not started ({}): {err}", item.id(), err.category());
            }
        }
        self.running = true;
        log::debug!("world started");
        self.request();
    }

    /// Advance every item to `tick` (registration order) and collect frames.
    pub fn update(&mut self, tick: Tick) -> &Outputs {
        self.outputs.clear();
        self.pending = None;
        self.last_tick = Some(tick);

        for item in self.stage.items_mut() {
            if let Err(err) = item.update(tick) {
                self.outputs.push_event(error_event(item.id(), &err));
            }
        }
        self.stage.collect(&mut self.outputs);

        if self.running {
            self.request();
        }
        &self.outputs
    }

    /// Pause every item at `tick` and cancel the pending frame.
    pub fn pause(&mut self, tick: Tick) {
        for item in self.stage.items_mut() {
            item.pause(tick);
        }
        self.running = false;
        self.cancel();
        log::debug!("world paused at {tick}");
    }

    /// Resume items from their paused positions and restart the frame loop.
    pub fn resume(&mut self, tick: Tick) {
        for item in self.stage.items_mut() {
            item.resume(tick);
        }
        self.running = true;
        log::debug!("world resumed at {tick}");
        self.request();
    }

    /// Abort every item (no snapping) and cancel the pending frame.
    pub fn stop(&mut self) {
        for item in self.stage.items_mut() {
            item.stop();
        }
        self.running = false;
        self.cancel();
        log::debug!("world stopped");
    }
}
