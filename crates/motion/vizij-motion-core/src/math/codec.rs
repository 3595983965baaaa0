//! Style-string codec for the rendering side.
//!
//! `matrix3d(a1, ..., a16)` carries the full 16 values in storage order;
//! `matrix(a, b, c, d, e, f)` is the 2D shorthand for
//! `matrix3d(a, b, 0, 0, c, d, 0, 0, 0, 0, 1, 0, e, f, 0, 1)`.

use super::matrix::Matrix4;
use crate::error::{MotionError, Result};

/// Components with a smaller magnitude are emitted as exactly `0`.
pub const SNAP_EPSILON: f64 = 1e-6;

#[inline]
fn snap(v: f64) -> f64 {
    if v.abs() < SNAP_EPSILON {
        0.0
    } else {
        v
    }
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn snapped(m: &Matrix4) -> Matrix4 {
    let mut out = m.0;
    for v in out.iter_mut() {
        *v = snap(*v);
    }
    Matrix4(out)
}

/// Render as `matrix3d(...)`.
pub fn stringify(m: &Matrix4) -> String {
    format!("matrix3d({})", join(&snapped(m).0))
}

/// Render as `matrix(...)` when the matrix is purely 2D, else `matrix3d(...)`.
pub fn to_test_string(m: &Matrix4) -> String {
    let s = snapped(m);
    if s.is_affine_2d() {
        let v = &s.0;
        format!("matrix({})", join(&[v[0], v[1], v[4], v[5], v[12], v[13]]))
    } else {
        format!("matrix3d({})", join(&s.0))
    }
}

/// Parse `matrix(...)`, `matrix3d(...)`, a bare comma list of 6 or 16
/// numbers, or `none` (identity).
pub fn parse(style: &str) -> Result<Matrix4> {
    let s = style.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("none") {
        return Ok(Matrix4::identity());
    }
    let body = if let Some(rest) = s.strip_prefix("matrix3d(") {
        rest.strip_suffix(')')
    } else if let Some(rest) = s.strip_prefix("matrix(") {
        rest.strip_suffix(')')
    } else {
        Some(s)
    };
    let body = body.ok_or_else(|| MotionError::Parse(format!("unterminated matrix: {s}")))?;

    let values = body
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| MotionError::Parse(format!("bad component {part:?}: {e}")))
        })
        .collect::<Result<Vec<f64>>>()?;

    match values.as_slice() {
        [a, b, c, d, e, f] => Ok(Matrix4([
            *a, *b, 0.0, 0.0, //
            *c, *d, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            *e, *f, 0.0, 1.0,
        ])),
        all if all.len() == 16 => {
            let mut m = [0.0; 16];
            m.copy_from_slice(all);
            Ok(Matrix4(m))
        }
        other => Err(MotionError::Parse(format!(
            "expected 6 or 16 components, got {}",
            other.len()
        ))),
    }
}
