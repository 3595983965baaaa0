//! Per-item transform state and the deltas animations apply to it.

use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};
use crate::math::vec3::{self, Vec3};
use crate::math::Matrix4;

/// Translate/rotate (degrees)/scale/opacity owned by one item.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    pub translate: Vec3,
    pub rotate: Vec3,
    pub scale: Vec3,
    pub opacity: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            translate: [0.0; 3],
            rotate: [0.0; 3],
            scale: [1.0; 3],
            opacity: 1.0,
        }
    }
}

impl TransformState {
    /// Reset to the cleared origin.
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Composed TRS matrix for rendering.
    pub fn matrix(&self) -> Matrix4 {
        Matrix4::compose(self.translate, self.rotate, self.scale)
    }

    pub fn is_finite(&self) -> bool {
        vec3::is_finite(self.translate)
            && vec3::is_finite(self.rotate)
            && vec3::is_finite(self.scale)
            && self.opacity.is_finite()
    }
}

/// What an animation touches. Vector fields are deltas added to the state
/// captured at start; `opacity` is an absolute target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// A vector delta only applies when at least one axis moves.
#[inline]
fn active(delta: Option<Vec3>) -> Option<Vec3> {
    delta.filter(|d| d.iter().any(|c| *c != 0.0))
}

#[inline]
fn offset(initial: Vec3, delta: Vec3, percent: f64) -> Vec3 {
    [
        initial[0] + delta[0] * percent,
        initial[1] + delta[1] * percent,
        initial[2] + delta[2] * percent,
    ]
}

impl TransformDelta {
    pub fn translate(v: Vec3) -> Self {
        Self {
            translate: Some(v),
            ..Self::default()
        }
    }

    pub fn rotate(v: Vec3) -> Self {
        Self {
            rotate: Some(v),
            ..Self::default()
        }
    }

    pub fn scale(v: Vec3) -> Self {
        Self {
            scale: Some(v),
            ..Self::default()
        }
    }

    pub fn opacity(target: f64) -> Self {
        Self {
            opacity: Some(target),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        active(self.translate).is_none()
            && active(self.rotate).is_none()
            && active(self.scale).is_none()
            && self.opacity.is_none()
    }

    /// Reject NaN/inf anywhere in the delta.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("translate", self.translate.map_or(true, vec3::is_finite)),
            ("rotate", self.rotate.map_or(true, vec3::is_finite)),
            ("scale", self.scale.map_or(true, vec3::is_finite)),
            ("opacity", self.opacity.map_or(true, f64::is_finite)),
        ];
        match checks.iter().find(|(_, ok)| !ok) {
            Some((field, _)) => Err(MotionError::NonFinite { field: *field }),
            None => Ok(()),
        }
    }

    /// Write `initial` moved `percent` of the way along this delta into `state`.
    /// Fields the delta does not touch are left as they are in `state`.
    pub fn apply(&self, initial: &TransformState, percent: f64, state: &mut TransformState) {
        if let Some(d) = active(self.translate) {
            state.translate = offset(initial.translate, d, percent);
        }
        if let Some(d) = active(self.rotate) {
            state.rotate = offset(initial.rotate, d, percent);
        }
        if let Some(d) = active(self.scale) {
            state.scale = offset(initial.scale, d, percent);
        }
        if let Some(target) = self.opacity {
            state.opacity = initial.opacity + (target - initial.opacity) * percent;
        }
    }
}
