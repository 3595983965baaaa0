//! Affine math:
//! - vec3 (length/normalize/cross/sub on `[f64; 3]`)
//! - matrix (4x4 construction, multiply, inverse, compose/decompose, look-at)
//! - codec (`matrix(...)` / `matrix3d(...)` style strings)

pub mod codec;
pub mod matrix;
pub mod vec3;

pub use codec::{parse, stringify, to_test_string};
pub use matrix::{Decomposed, Matrix4};
pub use vec3::Vec3;
