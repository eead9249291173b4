//! Random sampling helpers.
//!
//! Every helper draws from the caller's generator so that each worker can
//! own its RNG.

use crate::Vector;
use glam::DVec3;
use rand::{Rng, RngCore};

/// Random f64 in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Random f64 in [min, max).
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * gen_f64(rng)
}

/// Random vector with each component in [min, max).
pub fn random_vector(rng: &mut dyn RngCore, min: f64, max: f64) -> Vector {
    DVec3::new(
        gen_range(rng, min, max),
        gen_range(rng, min, max),
        gen_range(rng, min, max),
    )
}

/// Sample a random point in the square [-0.5, 0.5] x [-0.5, 0.5] (z = 0).
pub fn sample_square(rng: &mut dyn RngCore) -> Vector {
    DVec3::new(gen_f64(rng) - 0.5, gen_f64(rng) - 0.5, 0.0)
}

/// Sample a random point in the unit disk (z = 0).
///
/// Rejection sampling on the enclosing square.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vector {
    loop {
        let p = DVec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Generate a random unit vector, uniform on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vector {
    // Use rejection sampling for uniform distribution on sphere
    loop {
        let v = random_vector(rng, -1.0, 1.0);
        let len_sq = v.length_squared();
        if len_sq > 1e-160 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_square_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let p = sample_square(&mut rng);
            assert!((-0.5..0.5).contains(&p.x));
            assert!((-0.5..0.5).contains(&p.y));
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_random_in_unit_disk() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let p = random_in_unit_disk(&mut rng);
            assert!(p.length_squared() < 1.0);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_gen_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let x = gen_range(&mut rng, 0.5, 1.0);
            assert!((0.5..=1.0).contains(&x));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        assert_eq!(random_unit_vector(&mut a), random_unit_vector(&mut b));
    }
}
