//! Output contracts from the schedulers.
//!
//! Outputs carry, per tick, the renderable matrix/opacity of every item and
//! the item-level events raised during the tick. Rendering adapters turn
//! frames into platform styles (see [`crate::math::codec`]).

use serde::{Deserialize, Serialize};

use crate::events::MotionEvent;
use crate::ids::ItemId;
use crate::math::{codec, Matrix4};

/// Current transform of one item.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub item: ItemId,
    pub matrix: Matrix4,
    pub opacity: f64,
}

impl RenderFrame {
    /// `matrix3d(...)` text for style-based hosts.
    pub fn style(&self) -> String {
        codec::stringify(&self.matrix)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ItemEventKind {
    Motion(MotionEvent),
    /// The item's update failed this tick; its state was left as it was.
    Error { message: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemEvent {
    pub item: ItemId,
    pub kind: ItemEventKind,
}

/// Outputs returned by World::update() / Timeline::update().
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub frames: Vec<RenderFrame>,
    #[serde(default)]
    pub events: Vec<ItemEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.frames.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_frame(&mut self, frame: RenderFrame) {
        self.frames.push(frame);
    }

    #[inline]
    pub fn push_event(&mut self, event: ItemEvent) {
        self.events.push(event);
    }

    pub fn frame(&self, item: ItemId) -> Option<&RenderFrame> {
        self.frames.iter().find(|f| f.item == item)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty() && self.events.is_empty()
    }
}
