//! Materials describing how light scatters off surfaces.

use crate::{hittable::HitRecord, Ray, SceneError};
use prism_math::sampling::{gen_f64, random_unit_vector};
use prism_math::{near_zero, reflect, refract, unit, Color};
use rand::RngCore;

/// Outcome of a successful scatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Color the scattered light is multiplied by
    pub attenuation: Color,
    /// Continuation ray leaving the surface
    pub scattered: Ray,
}

/// Surface response to an incoming ray.
pub trait Scatter {
    /// Scatter an incoming ray.
    ///
    /// Returns `Some` if the ray scatters, or `None` if it is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore)
        -> Option<ScatterResult>;
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matte {
    albedo: Color,
}

impl Matte {
    /// Create a new diffuse material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }
}

impl Scatter for Matte {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }
}

impl Scatter for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = unit(reflect(ray_in.direction(), rec.normal));
        let direction = reflected + self.fuzz * random_unit_vector(rng);

        // A fuzzed ray pointing into the surface is absorbed
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glass {
    /// Index of refraction
    ior: f64,
}

impl Glass {
    /// Create a new Glass material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    ///
    /// Values below 1 model a denser medium inside a lighter one, such as an
    /// air bubble in glass.
    pub fn new(ior: f64) -> Result<Self, SceneError> {
        if !(ior.is_finite() && ior > 0.0) {
            return Err(SceneError::InvalidIor(ior));
        }
        Ok(Self { ior })
    }

    pub fn ior(&self) -> f64 {
        self.ior
    }

    /// Schlick's approximation for reflectance.
    pub fn reflectance(cosine: f64, refraction_ratio: f64) -> f64 {
        let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Scatter for Glass {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = unit(ray_in.direction());
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Check for total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f64(rng) {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, refraction_ratio)
            };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// The closed set of surface materials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    Matte(Matte),
    Metal(Metal),
    Glass(Glass),
}

impl Material {
    pub fn matte(albedo: Color) -> Self {
        Material::Matte(Matte::new(albedo))
    }

    pub fn metal(albedo: Color, fuzz: f64) -> Self {
        Material::Metal(Metal::new(albedo, fuzz))
    }

    pub fn glass(ior: f64) -> Result<Self, SceneError> {
        Glass::new(ior).map(Material::Glass)
    }
}

impl Scatter for Material {
    #[inline]
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Matte(m) => m.scatter(ray_in, rec, rng),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Glass(m) => m.scatter(ray_in, rec, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_math::{Point, Vector};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(normal: Vector, front_face: bool) -> HitRecord {
        HitRecord {
            p: Point::ZERO,
            normal,
            front_face,
            t: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_matte_always_scatters_into_hemisphere() {
        let mut rng = StdRng::seed_from_u64(5);
        let matte = Material::matte(Color::new(0.8, 0.3, 0.1));
        let rec = record(Vector::Y, true);
        let ray = Ray::new(Point::new(0.0, 1.0, 0.0), -Vector::Y);

        for _ in 0..500 {
            let result = matte.scatter(&ray, &rec, &mut rng).expect("matte scatters");
            assert_eq!(result.attenuation, Color::new(0.8, 0.3, 0.1));
            assert_eq!(result.scattered.origin(), rec.p);
            assert!(result.scattered.direction().dot(rec.normal) >= 0.0);
            assert!(result.scattered.direction().length_squared() > 0.0);
        }
    }

    /// Generator that replays a fixed sequence of words.
    struct Scripted {
        words: Vec<u64>,
        next: usize,
    }

    impl RngCore for Scripted {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            let word = self.words[self.next % self.words.len()];
            self.next += 1;
            word
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_matte_degenerate_direction_falls_back_to_normal() {
        // Draws 0.5, 0.0, 0.5: the unit vector (0, -1, 0) cancels the normal
        let mut rng = Scripted {
            words: vec![1 << 63, 0, 1 << 63],
            next: 0,
        };
        let matte = Matte::new(Color::splat(0.5));
        let rec = record(Vector::Y, true);
        let ray = Ray::new(Point::new(0.0, 1.0, 0.0), -Vector::Y);

        let result = matte.scatter(&ray, &rec, &mut rng).expect("matte scatters");
        assert_eq!(result.scattered.direction(), rec.normal);
        assert_eq!(result.scattered.origin(), rec.p);
    }

    #[test]
    fn test_glass_rejects_invalid_ior() {
        for ior in [0.0, -1.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(Glass::new(ior), Err(SceneError::InvalidIor(_))));
            assert!(Material::glass(ior).is_err());
        }
        assert_eq!(Glass::new(1.0 / 1.5).unwrap().ior(), 1.0 / 1.5);
    }

    #[test]
    fn test_perfect_mirror() {
        let mut rng = StdRng::seed_from_u64(5);
        let metal = Metal::new(Color::splat(0.9), 0.0);
        let rec = record(Vector::Y, true);
        let ray = Ray::new(Point::new(-1.0, 1.0, 0.0), Vector::new(1.0, -1.0, 0.0));

        let result = metal.scatter(&ray, &rec, &mut rng).expect("mirror reflects");
        let expected = unit(Vector::new(1.0, 1.0, 0.0));
        assert!((result.scattered.direction() - expected).length() < 1e-12);
        assert_eq!(result.attenuation, Color::splat(0.9));
    }

    #[test]
    fn test_fuzz_is_clamped() {
        assert_eq!(Metal::new(Color::ONE, 3.0).fuzz(), 1.0);
        assert_eq!(Metal::new(Color::ONE, -1.0).fuzz(), 0.0);
    }

    #[test]
    fn test_rough_metal_at_grazing_angle_sometimes_absorbs() {
        let mut rng = StdRng::seed_from_u64(9);
        let metal = Material::metal(Color::ONE, 1.0);
        let rec = record(Vector::Y, true);
        let ray = Ray::new(Point::ZERO, Vector::new(1.0, -0.01, 0.0));

        let mut absorbed = 0;
        for _ in 0..500 {
            match metal.scatter(&ray, &rec, &mut rng) {
                Some(result) => assert!(result.scattered.direction().dot(rec.normal) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_schlick_reflectance() {
        // Head-on reflectance of glass is about 4%
        let r = Glass::reflectance(1.0, 1.0 / 1.5);
        assert!((r - 0.04).abs() < 1e-9);
        // Grazing incidence reflects everything
        assert!((Glass::reflectance(0.0, 1.0 / 1.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_glass_total_internal_reflection() {
        let mut rng = StdRng::seed_from_u64(1);
        let glass = Glass::new(1.5).unwrap();
        // Leaving the glass at a steep angle: sin_theta * 1.5 > 1
        let rec = record(-Vector::Y, false);
        let direction = unit(Vector::new(1.0, 0.3, 0.0));
        let ray = Ray::new(Point::new(-1.0, -0.3, 0.0), direction);

        for _ in 0..100 {
            let result = glass.scatter(&ray, &rec, &mut rng).expect("glass scatters");
            let expected = reflect(direction, rec.normal);
            assert!((result.scattered.direction() - expected).length() < 1e-12);
            assert_eq!(result.attenuation, Color::ONE);
        }
    }

    #[test]
    fn test_glass_mostly_refracts_head_on() {
        let mut rng = StdRng::seed_from_u64(2);
        let glass = Material::glass(1.5).unwrap();
        let rec = record(Vector::Y, true);
        let ray = Ray::new(Point::new(0.0, 1.0, 0.0), -Vector::Y);

        let refracted = (0..1000)
            .filter_map(|_| glass.scatter(&ray, &rec, &mut rng))
            .filter(|result| result.scattered.direction().y < 0.0)
            .count();

        // About 96% transmission
        assert!(refracted > 900, "refracted {refracted} of 1000");
    }
}
