//! Vector helpers shared by geometry and materials.
//!
//! `Vector`, `Point` and `Color` are the same `DVec3` used with different
//! intent; all operations produce new values.

use glam::DVec3;

/// A direction or displacement in 3D space.
pub type Vector = DVec3;

/// A position in 3D space.
pub type Point = DVec3;

/// Linear RGB radiance, channels typically in [0, 1].
pub type Color = DVec3;

/// Normalize `v`. The input must have non-zero length.
#[inline]
pub fn unit(v: Vector) -> Vector {
    debug_assert!(
        v.length_squared() > 0.0,
        "cannot normalize a zero-length vector"
    );
    v / v.length()
}

/// True if every component is close to zero.
#[inline]
pub fn near_zero(v: Vector) -> bool {
    const S: f64 = 1e-8;
    v.x.abs() < S && v.y.abs() < S && v.z.abs() < S
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vector, n: Vector) -> Vector {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with unit normal `n`.
///
/// `etai_over_etat` is the ratio of refractive indices across the surface.
#[inline]
pub fn refract(uv: Vector, n: Vector, etai_over_etat: f64) -> Vector {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
