//! 4x4 affine matrices.
//!
//! Storage is 16 `f64` in the same order as the `matrix3d(...)` style string.
//! Points are row vectors (`p' = p · M`): rows 0..2 hold the basis vectors and
//! indices 12..14 hold the translation. Angles are degrees at the API surface.
//!
//! Constructors return [`Matrix4::identity`] when every argument equals its
//! identity value. An explicit zero is a real zero: `scale(0, 0, 0)` collapses
//! to a point.

use std::ops::Mul;

use serde::{Deserialize, Serialize};

use super::vec3::{self, Vec3};
use crate::error::{MotionError, Result};

const IDENTITY: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Nudge applied to the view direction when `up` is parallel to it.
const LOOK_AT_NUDGE: f64 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matrix4(pub [f64; 16]);

/// Translation, Euler rotation (degrees) and scale recovered from a matrix.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decomposed {
    pub translate: Vec3,
    pub rotate: Vec3,
    pub scale: Vec3,
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix4 {
    #[inline]
    pub const fn identity() -> Self {
        Self(IDENTITY)
    }

    #[inline]
    pub fn as_array(&self) -> &[f64; 16] {
        &self.0
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.0 == IDENTITY
    }

    pub fn translate(x: f64, y: f64, z: f64) -> Self {
        if x == 0.0 && y == 0.0 && z == 0.0 {
            return Self::identity();
        }
        let mut m = IDENTITY;
        m[12] = x;
        m[13] = y;
        m[14] = z;
        Self(m)
    }

    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        if x == 1.0 && y == 1.0 && z == 1.0 {
            return Self::identity();
        }
        let mut m = IDENTITY;
        m[0] = x;
        m[5] = y;
        m[10] = z;
        Self(m)
    }

    /// Euler rotation applied X, then Y, then Z (`Rx · Ry · Rz` for row vectors).
    pub fn rotate(ax: f64, ay: f64, az: f64) -> Self {
        if ax == 0.0 && ay == 0.0 && az == 0.0 {
            return Self::identity();
        }
        let (sx, cx) = ax.to_radians().sin_cos();
        let (sy, cy) = ay.to_radians().sin_cos();
        let (sz, cz) = az.to_radians().sin_cos();
        Self([
            cy * cz,
            cy * sz,
            -sy,
            0.0,
            sx * sy * cz - cx * sz,
            sx * sy * sz + cx * cz,
            sx * cy,
            0.0,
            cx * sy * cz + sx * sz,
            cx * sy * sz - sx * cz,
            cx * cy,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    /// Rodrigues rotation of `angle_deg` around `(x, y, z)`.
    /// A zero-length axis falls back to +Z.
    pub fn rotate_about_axis(x: f64, y: f64, z: f64, angle_deg: f64) -> Self {
        if angle_deg == 0.0 {
            return Self::identity();
        }
        let axis = if vec3::length([x, y, z]) > 0.0 {
            vec3::normalize([x, y, z])
        } else {
            [0.0, 0.0, 1.0]
        };
        let [x, y, z] = axis;
        let (s, c) = angle_deg.to_radians().sin_cos();
        let t = 1.0 - c;
        Self([
            c + x * x * t,
            x * y * t + z * s,
            x * z * t - y * s,
            0.0,
            x * y * t - z * s,
            c + y * y * t,
            y * z * t + x * s,
            0.0,
            x * z * t + y * s,
            y * z * t - x * s,
            c + z * z * t,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    /// 2D shear by angles (degrees) along X and Y.
    pub fn skew(ax: f64, ay: f64) -> Self {
        if ax == 0.0 && ay == 0.0 {
            return Self::identity();
        }
        let mut m = IDENTITY;
        m[1] = ay.to_radians().tan();
        m[4] = ax.to_radians().tan();
        Self(m)
    }

    /// Perspective projection with viewer distance `d`. `d == 0` means none.
    pub fn perspective(d: f64) -> Self {
        if d == 0.0 {
            return Self::identity();
        }
        let mut m = IDENTITY;
        m[11] = -1.0 / d;
        Self(m)
    }

    /// `self · other`: applies `self` first, then `other`.
    pub fn multiply(&self, other: &Matrix4) -> Self {
        let a = &self.0;
        let b = &other.0;
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = a[row * 4] * b[col]
                    + a[row * 4 + 1] * b[4 + col]
                    + a[row * 4 + 2] * b[8 + col]
                    + a[row * 4 + 3] * b[12 + col];
            }
        }
        Self(out)
    }

    /// Left fold: `multiply_all(&[a, b, c]) == a · b · c`. Empty input is identity.
    pub fn multiply_all(ms: &[Matrix4]) -> Self {
        ms.iter()
            .fold(Self::identity(), |acc, m| acc.multiply(m))
    }

    /// Determinant of the 3x3 rotation/scale block.
    pub fn determinant3(&self) -> f64 {
        let m = &self.0;
        m[0] * (m[5] * m[10] - m[6] * m[9]) - m[1] * (m[4] * m[10] - m[6] * m[8])
            + m[2] * (m[4] * m[9] - m[5] * m[8])
    }

    /// Closed-form affine inverse. Perspective terms are not inverted.
    ///
    /// Fails with [`MotionError::SingularMatrix`] when the 3x3 block has a zero
    /// (or non-finite) determinant, e.g. after a zero scale.
    pub fn inverse(&self) -> Result<Self> {
        let det = self.determinant3();
        if det == 0.0 || !det.is_finite() {
            return Err(MotionError::SingularMatrix { det });
        }
        let m = &self.0;
        let (a, b, c) = (m[0], m[1], m[2]);
        let (d, e, f) = (m[4], m[5], m[6]);
        let (g, h, i) = (m[8], m[9], m[10]);
        let inv_det = det.recip();
        let r = [
            (e * i - f * h) * inv_det,
            (c * h - b * i) * inv_det,
            (b * f - c * e) * inv_det,
            (f * g - d * i) * inv_det,
            (a * i - c * g) * inv_det,
            (c * d - a * f) * inv_det,
            (d * h - e * g) * inv_det,
            (b * g - a * h) * inv_det,
            (a * e - b * d) * inv_det,
        ];
        let (tx, ty, tz) = (m[12], m[13], m[14]);
        Ok(Self([
            r[0],
            r[1],
            r[2],
            0.0,
            r[3],
            r[4],
            r[5],
            0.0,
            r[6],
            r[7],
            r[8],
            0.0,
            -(tx * r[0] + ty * r[3] + tz * r[6]),
            -(tx * r[1] + ty * r[4] + tz * r[7]),
            -(tx * r[2] + ty * r[5] + tz * r[8]),
            1.0,
        ]))
    }

    /// Canonical TRS composition: rotate, scale the rotated axes, translate.
    pub fn compose(translate: Vec3, rotate: Vec3, scale: Vec3) -> Self {
        let mut m = Self::rotate(rotate[0], rotate[1], rotate[2]).0;
        for (row, s) in scale.iter().enumerate() {
            m[row * 4] *= s;
            m[row * 4 + 1] *= s;
            m[row * 4 + 2] *= s;
        }
        m[12] = translate[0];
        m[13] = translate[1];
        m[14] = translate[2];
        Self(m)
    }

    /// Inverse of [`Matrix4::compose`].
    ///
    /// Scale is the length of each basis row; a negative determinant is
    /// attributed to X. When the rotation block hits gimbal lock (the `asin`
    /// term is ±1) X is pinned to 0 and the remaining angle goes to Z.
    pub fn decompose(&self) -> Decomposed {
        let m = &self.0;
        let mut scale = [
            vec3::length([m[0], m[1], m[2]]),
            vec3::length([m[4], m[5], m[6]]),
            vec3::length([m[8], m[9], m[10]]),
        ];
        if self.determinant3() < 0.0 {
            scale[0] = -scale[0];
        }

        let mut r = [0.0; 9];
        for row in 0..3 {
            let s = scale[row];
            for col in 0..3 {
                let v = m[row * 4 + col];
                r[row * 3 + col] = if s != 0.0 { v / s } else { v };
            }
        }

        let sy = (-r[2]).clamp(-1.0, 1.0);
        let ry = sy.asin();
        let (rx, rz) = if sy.abs() == 1.0 {
            (0.0, (-r[3]).atan2(r[4]))
        } else {
            (r[5].atan2(r[8]), r[1].atan2(r[0]))
        };

        Decomposed {
            translate: [m[12], m[13], m[14]],
            rotate: [rx.to_degrees(), ry.to_degrees(), rz.to_degrees()],
            scale,
        }
    }

    /// Orientation basis looking from `eye` toward `target`.
    ///
    /// Translation is left at zero. Coincident `eye`/`target` look down -Z,
    /// a zero `up` is treated as +Y, and an `up` parallel to the view
    /// direction nudges the direction slightly so the basis stays defined.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let up = if vec3::length(up) > 0.0 {
            up
        } else {
            [0.0, 1.0, 0.0]
        };
        let mut z = vec3::sub(eye, target);
        if vec3::length(z) == 0.0 {
            z = [0.0, 0.0, 1.0];
        }
        z = vec3::normalize(z);

        let mut x = vec3::cross(up, z);
        if vec3::length(x) == 0.0 {
            if vec3::normalize(up)[2].abs() == 1.0 {
                z[0] += LOOK_AT_NUDGE;
            } else {
                z[2] += LOOK_AT_NUDGE;
            }
            z = vec3::normalize(z);
            x = vec3::cross(up, z);
        }
        let x = vec3::normalize(x);
        let y = vec3::cross(z, x);

        Self([
            x[0], x[1], x[2], 0.0, //
            y[0], y[1], y[2], 0.0, //
            z[0], z[1], z[2], 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// `p · M` for an affine matrix (w is ignored).
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.0;
        [
            p[0] * m[0] + p[1] * m[4] + p[2] * m[8] + m[12],
            p[0] * m[1] + p[1] * m[5] + p[2] * m[9] + m[13],
            p[0] * m[2] + p[1] * m[6] + p[2] * m[10] + m[14],
        ]
    }

    /// True when no out-of-plane term is set (fits the 6-value `matrix(...)` form).
    pub fn is_affine_2d(&self) -> bool {
        let m = &self.0;
        [2, 3, 6, 7, 8, 9, 11, 14].iter().all(|&i| m[i] == 0.0) && m[10] == 1.0 && m[15] == 1.0
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        self.multiply(&rhs)
    }
}
