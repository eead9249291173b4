//! Hittable trait and HitRecord for ray-object intersection.

use prism_math::{Interval, Point, Ray, Vector};

/// Handle to a material stored in a [`Scene`](crate::Scene)'s registry.
///
/// A handle is only valid for the scene that issued it. The default handle
/// is never issued by any scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaterialId {
    pub(crate) scene: u64,
    pub(crate) index: usize,
}

impl MaterialId {
    /// Position of the material in its scene's registry.
    pub fn index(self) -> usize {
        self.index
    }
}

/// Record of a ray-object intersection.
///
/// Only meaningful after a `hit` call returned true.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Point,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vector,
    /// Material that shades this hit
    pub material: MaterialId,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl HitRecord {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// `outward_normal` must have unit length. The stored normal always
    /// points against the ray.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vector) {
        debug_assert!(
            (outward_normal.length() - 1.0).abs() < 1e-5,
            "outward normal must be unit length, got {}",
            outward_normal.length()
        );

        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the given interval.
    ///
    /// Returns true if hit, and fills in the hit record with the nearest
    /// intersection. The record is left untouched on a miss.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_face_from_outside() {
        let ray = Ray::new(Point::new(0.0, 0.0, 2.0), Vector::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        rec.set_face_normal(&ray, Vector::Z);

        assert!(rec.front_face);
        assert_eq!(rec.normal, Vector::Z);
    }

    #[test]
    fn test_back_face_flips_normal() {
        let ray = Ray::new(Point::ZERO, Vector::new(0.0, 0.0, 1.0));
        let mut rec = HitRecord::default();
        rec.set_face_normal(&ray, Vector::Z);

        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vector::Z);
    }

    #[test]
    fn test_normal_always_opposes_ray() {
        let normals = [Vector::X, -Vector::X, Vector::Y, Vector::new(0.6, 0.8, 0.0)];
        let directions = [
            Vector::new(1.0, 2.0, 3.0),
            Vector::new(-1.0, 0.5, 0.0),
            Vector::new(0.0, -4.0, 1.0),
        ];

        for n in normals {
            for d in directions {
                let ray = Ray::new(Point::ZERO, d);
                let mut rec = HitRecord::default();
                rec.set_face_normal(&ray, n);

                assert_eq!(rec.front_face, d.dot(n) < 0.0);
                assert!(d.dot(rec.normal) <= 0.0);
            }
        }
    }
}
