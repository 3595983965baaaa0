//! Construction input for queue units.
//!
//! JSON shapes:
//! - single: `{ "translate": [dx, dy, dz], "opacity": 0.5, "duration": 300, "delay": 50, "ease": "linear" }`
//! - group: `{ "parallel": [ {..}, {..} ], "duration": 400, "ease": "..." }` where the
//!   group-level timing is the default for children that omit their own.

use serde::{Deserialize, Serialize};

use crate::animation::{coerce_delay, coerce_duration, Animation, Timing};
use crate::config::Config;
use crate::easing::EasingTable;
use crate::error::{MotionError, Result};
use crate::math::Vec3;
use crate::parallel::ParallelAnimation;
use crate::state::TransformDelta;
use crate::unit::Unit;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationDesc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3>,
    /// Absolute opacity target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParallelDesc {
    pub parallel: Vec<AnimationDesc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitDesc {
    Parallel(ParallelDesc),
    Single(AnimationDesc),
}

/// Engine-wide default timing from config.
pub fn default_timing(cfg: &Config, easings: &EasingTable) -> Timing {
    Timing::new(
        cfg.default_duration_ms,
        cfg.default_delay_ms,
        easings.resolve(&cfg.default_easing),
    )
}

/// Own value first, then `defaults`.
fn resolve_timing(
    duration: Option<f64>,
    delay: Option<f64>,
    ease: Option<&str>,
    defaults: &Timing,
    easings: &EasingTable,
) -> Timing {
    Timing::new(
        duration.map_or(defaults.duration(), |d| coerce_duration(d, defaults.duration())),
        delay.map_or(defaults.delay(), coerce_delay),
        ease.map_or(defaults.easing(), |name| easings.resolve(name)),
    )
}

impl AnimationDesc {
    pub fn delta(&self) -> TransformDelta {
        TransformDelta {
            translate: self.translate,
            rotate: self.rotate,
            scale: self.scale,
            opacity: self.opacity,
        }
    }

    pub fn timing(&self, defaults: &Timing, easings: &EasingTable) -> Timing {
        resolve_timing(
            self.duration,
            self.delay,
            self.ease.as_deref(),
            defaults,
            easings,
        )
    }

    pub fn build(&self, defaults: &Timing, easings: &EasingTable) -> Result<Animation> {
        let delta = self.delta();
        delta
            .validate()
            .map_err(|e| MotionError::InvalidDescriptor(e.to_string()))?;
        if delta.is_empty() {
            log::debug!("animation descriptor has no visible effect");
        }
        Ok(Animation::new(delta, self.timing(defaults, easings)))
    }
}

impl ParallelDesc {
    pub fn build(&self, defaults: &Timing, easings: &EasingTable) -> Result<ParallelAnimation> {
        let group = resolve_timing(
            self.duration,
            self.delay,
            self.ease.as_deref(),
            defaults,
            easings,
        );
        ParallelAnimation::from_descs(&self.parallel, &group, easings)
    }
}

impl UnitDesc {
    pub fn build(&self, defaults: &Timing, easings: &EasingTable) -> Result<Unit> {
        Ok(match self {
            UnitDesc::Single(d) => Unit::Single(d.build(defaults, easings)?),
            UnitDesc::Parallel(p) => Unit::Parallel(p.build(defaults, easings)?),
        })
    }
}

impl From<AnimationDesc> for UnitDesc {
    fn from(d: AnimationDesc) -> Self {
        UnitDesc::Single(d)
    }
}

impl From<ParallelDesc> for UnitDesc {
    fn from(p: ParallelDesc) -> Self {
        UnitDesc::Parallel(p)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<UnitDesc>),
    One(UnitDesc),
}

/// Parse one unit descriptor or an array of them.
pub fn parse_units_json(s: &str) -> Result<Vec<UnitDesc>> {
    let parsed: OneOrMany = serde_json::from_str(s)?;
    Ok(match parsed {
        OneOrMany::Many(units) => units,
        OneOrMany::One(unit) => vec![unit],
    })
}
