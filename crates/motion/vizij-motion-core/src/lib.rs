//! Vizij Motion Core (engine-agnostic)
//!
//! Transform/timeline engine for independent items. Each item owns a
//! translate/rotate/scale/opacity state and a FIFO queue of timed units that
//! interpolate it. Two schedulers drive items from a host tick:
//! - [`World`]: free-running playback, one queue head progresses per tick.
//! - [`Timeline`]: scrubbable virtual clock, state replayed from the origin.
//!
//! The affine math used to turn a state into a renderable matrix lives in
//! [`math`], together with the `matrix(...)`/`matrix3d(...)` style-string codec.

pub mod animation;
pub mod config;
pub mod descriptor;
pub mod easing;
pub mod error;
pub mod events;
pub mod ids;
pub mod item;
pub mod math;
pub mod outputs;
pub mod parallel;
pub mod stage;
pub mod state;
pub mod timeline;
pub mod unit;
pub mod world;

/// Host time value. The engine treats it as milliseconds.
pub type Tick = f64;

// Re-exports for consumers (adapters)
pub use animation::{Animation, Timing};
pub use config::Config;
pub use descriptor::{parse_units_json, AnimationDesc, ParallelDesc, UnitDesc};
pub use easing::{linear, EasingFn, EasingTable};
pub use error::{MotionError, Result};
pub use events::{Emitter, EventKind, MotionEvent};
pub use ids::{ItemId, ListenerId};
pub use item::Item;
pub use math::{Decomposed, Matrix4, Vec3};
pub use outputs::{ItemEvent, ItemEventKind, Outputs, RenderFrame};
pub use parallel::ParallelAnimation;
pub use stage::Stage;
pub use state::{TransformDelta, TransformState};
pub use timeline::Timeline;
pub use unit::{Playable, Unit};
pub use world::{FrameScheduler, FrameToken, ManualFrames, World};
