//! Core ray tracing renderer.
//!
//! Implements forward Monte Carlo ray tracing with:
//! - Recursive ray tracing with configurable depth
//! - Anti-aliasing via jittered multi-sampling
//! - Depth of field via defocus-disk sampling
//! - Gamma correction
//!
//! Rows are traced in parallel with rayon. Each row owns a generator seeded
//! from the render seed, the pass number and the row index, so a seeded
//! render does not depend on thread scheduling.

use crate::camera::{CameraGeometry, Lens};
use crate::{
    Color, ConfigError, HitRecord, Hittable, ImageBuffer, ImageSink, RenderError, RenderSettings,
    Scatter, Scene,
};
use prism_math::{Interval, Point, Ray, Vector};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Minimum hit distance; avoids re-hitting the surface a ray leaves from.
pub const HIT_EPSILON: f64 = 1e-4;

/// Background color toward the horizon.
pub const HORIZON: Color = Color::new(1.0, 1.0, 1.0);

/// Background color toward the zenith.
pub const ZENITH: Color = Color::new(0.5, 0.7, 1.0);

/// Camera, sampling parameters and the geometry derived from them.
///
/// Parameters are public. After changing any of them call
/// [`Renderer::configure`] again; the derived geometry is not refreshed
/// automatically.
#[derive(Debug, Clone)]
pub struct Renderer {
    image_width: u32,
    image_height: u32,

    /// Samples per pixel for anti-aliasing
    pub samples_num: u32,
    /// Maximum ray bounce depth
    pub render_depth: u32,
    /// Vertical field of view in degrees
    pub vfov: f64,
    pub lookfrom: Point,
    pub lookat: Point,
    pub vup: Vector,
    pub defocus_angle: f64,
    pub focus_dist: f64,
    /// Base seed for sampling; a fresh one is drawn per pass when `None`
    pub seed: Option<u64>,

    geometry: CameraGeometry,
}

/// Summary of a finished render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub elapsed: Duration,
}

impl RenderStats {
    /// Number of camera rays traced.
    pub fn primary_rays(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.samples_per_pixel as u64
    }
}

/// Result of one pass; rows skipped after cancellation stay black.
struct PassOutput {
    colors: Vec<Color>,
    rows_done: usize,
    stats: RenderStats,
}

/// Running per-pixel radiance sums for progressive rendering.
#[derive(Debug, Clone)]
pub struct Accumulator {
    width: u32,
    height: u32,
    sums: Vec<Color>,
    samples: u32,
}

impl Accumulator {
    /// Create an empty accumulator.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            sums: vec![Color::ZERO; width as usize * height as usize],
            samples: 0,
        }
    }

    /// Samples accumulated per pixel so far.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Finalize the current average of every pixel into `sink`.
    ///
    /// Pixels are emitted once each in row-major order. With no samples yet
    /// every pixel is black.
    pub fn resolve<S: ImageSink + ?Sized>(&self, sink: &mut S) {
        let samples = self.samples.max(1);
        let width = self.width as usize;
        for (i, sum) in self.sums.iter().enumerate() {
            let x = (i % width) as u32;
            let y = (i / width) as u32;
            sink.put_pixel(x, y, finalize_pixel(*sum, samples));
        }
    }

    fn add_pass(&mut self, pass: &[Color], samples: u32) {
        for (sum, color) in self.sums.iter_mut().zip(pass) {
            *sum += *color;
        }
        self.samples += samples;
    }
}

impl Renderer {
    /// Create a renderer with the default camera and configure it.
    pub fn new(image_width: u32, image_height: u32) -> Result<Self, ConfigError> {
        Self::from_settings(&RenderSettings {
            image_width,
            image_height,
            ..RenderSettings::default()
        })
    }

    /// Create a configured renderer from settings.
    pub fn from_settings(settings: &RenderSettings) -> Result<Self, ConfigError> {
        if settings.image_width == 0 || settings.image_height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: settings.image_width,
                height: settings.image_height,
            });
        }

        let lens = Lens {
            image_width: settings.image_width,
            image_height: settings.image_height,
            vfov: settings.vfov,
            lookfrom: settings.lookfrom,
            lookat: settings.lookat,
            vup: settings.vup,
            defocus_angle: settings.defocus_angle,
            focus_dist: settings.focus_dist,
        };
        validate(&lens, settings.samples_num)?;

        Ok(Self {
            image_width: settings.image_width,
            image_height: settings.image_height,
            samples_num: settings.samples_num,
            render_depth: settings.render_depth,
            vfov: settings.vfov,
            lookfrom: settings.lookfrom,
            lookat: settings.lookat,
            vup: settings.vup,
            defocus_angle: settings.defocus_angle,
            focus_dist: settings.focus_dist,
            seed: settings.seed,
            geometry: CameraGeometry::derive(&lens),
        })
    }

    /// Validate the parameters and derive the camera geometry from them.
    ///
    /// On error the previous geometry is kept.
    pub fn configure(&mut self) -> Result<(), ConfigError> {
        let lens = Lens {
            image_width: self.image_width,
            image_height: self.image_height,
            vfov: self.vfov,
            lookfrom: self.lookfrom,
            lookat: self.lookat,
            vup: self.vup,
            defocus_angle: self.defocus_angle,
            focus_dist: self.focus_dist,
        };
        validate(&lens, self.samples_num)?;
        self.geometry = CameraGeometry::derive(&lens);

        log::debug!(
            "Configured {}x{} camera: vfov={} lookfrom={} lookat={} defocus_angle={} focus_dist={}",
            self.image_width,
            self.image_height,
            self.vfov,
            self.lookfrom,
            self.lookat,
            self.defocus_angle,
            self.focus_dist
        );
        Ok(())
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Geometry derived by the last successful [`Renderer::configure`].
    pub fn geometry(&self) -> &CameraGeometry {
        &self.geometry
    }

    /// Generate a jittered camera ray for pixel (x, y).
    pub fn get_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        self.geometry.get_ray(x, y, rng)
    }

    /// Render the scene and emit every pixel to `sink`.
    pub fn render<S: ImageSink + ?Sized>(&self, world: &Scene, sink: &mut S) -> RenderStats {
        let mut acc = Accumulator::new(self.image_width, self.image_height);
        let output = self.trace_pass(world, self.samples_num, 0, None);
        acc.add_pass(&output.colors, self.samples_num);
        acc.resolve(sink);
        output.stats
    }

    /// Render into a new in-memory image.
    pub fn render_to_buffer(&self, world: &Scene) -> ImageBuffer {
        let mut image = ImageBuffer::new(self.image_width, self.image_height);
        self.render(world, &mut image);
        image
    }

    /// Render with cooperative cancellation.
    ///
    /// `cancel` is checked before each row. A cancelled render emits nothing
    /// to `sink`.
    pub fn render_with_cancel<S: ImageSink + ?Sized>(
        &self,
        world: &Scene,
        sink: &mut S,
        cancel: &AtomicBool,
    ) -> Result<RenderStats, RenderError> {
        let mut acc = Accumulator::new(self.image_width, self.image_height);
        let stats = self.accumulate(world, &mut acc, self.samples_num, 0, cancel)?;
        acc.resolve(sink);
        Ok(stats)
    }

    /// Add `samples` samples per pixel to `acc`.
    ///
    /// `pass` distinguishes successive passes so they draw different
    /// samples. A cancelled pass leaves `acc` untouched.
    pub fn accumulate(
        &self,
        world: &Scene,
        acc: &mut Accumulator,
        samples: u32,
        pass: u64,
        cancel: &AtomicBool,
    ) -> Result<RenderStats, RenderError> {
        if acc.width != self.image_width || acc.height != self.image_height {
            return Err(RenderError::SizeMismatch {
                width: self.image_width,
                height: self.image_height,
                found_width: acc.width,
                found_height: acc.height,
            });
        }

        let output = self.trace_pass(world, samples, pass, Some(cancel));
        let rows_total = self.image_height as usize;
        let rows_done = output.rows_done;
        if rows_done < rows_total {
            log::warn!("Render cancelled after {} of {} rows", rows_done, rows_total);
            return Err(RenderError::Cancelled {
                rows_done,
                rows_total,
            });
        }

        acc.add_pass(&output.colors, samples);
        Ok(output.stats)
    }

    /// Trace one pass over the image, one rayon task per row.
    fn trace_pass(
        &self,
        world: &Scene,
        samples: u32,
        pass: u64,
        cancel: Option<&AtomicBool>,
    ) -> PassOutput {
        let start = Instant::now();
        let width = self.image_width as usize;
        let height = self.image_height as usize;
        let base_seed = self.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let finished_rows = AtomicUsize::new(0);

        log::info!(
            "Rendering {}x{} @ {} spp, depth {}, {} objects",
            width,
            height,
            samples,
            self.render_depth,
            world.len()
        );

        let mut buffer = vec![Color::ZERO; width * height];
        buffer
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                    return;
                }

                let mut rng = StdRng::seed_from_u64(row_seed(base_seed, pass, y as u64));
                self.trace_row(world, y as u32, samples, &mut rng, row);

                let done = finished_rows.fetch_add(1, Ordering::Relaxed) + 1;
                log::debug!("Finished {} out of {} rows", done, height);
            });

        let rows_done = finished_rows.into_inner();
        let stats = RenderStats {
            width: self.image_width,
            height: self.image_height,
            samples_per_pixel: samples,
            elapsed: start.elapsed(),
        };
        log::info!("Rendered {} of {} rows in {:?}", rows_done, height, stats.elapsed);

        PassOutput {
            colors: buffer,
            rows_done,
            stats,
        }
    }

    /// Accumulate `samples` radiance samples into each pixel of row `y`.
    fn trace_row(
        &self,
        world: &Scene,
        y: u32,
        samples: u32,
        rng: &mut dyn RngCore,
        row: &mut [Color],
    ) {
        for (x, pixel) in row.iter_mut().enumerate() {
            for _ in 0..samples {
                let ray = self.geometry.get_ray(x as u32, y, rng);
                *pixel += ray_color(&ray, world, self.render_depth, rng);
            }
        }
    }
}

/// Reject parameters that would produce a degenerate camera.
fn validate(lens: &Lens, samples_num: u32) -> Result<(), ConfigError> {
    if samples_num == 0 {
        return Err(ConfigError::NoSamples);
    }
    if !(lens.vfov > 0.0 && lens.vfov < 180.0) {
        return Err(ConfigError::InvalidFov(lens.vfov));
    }
    if !(lens.focus_dist > 0.0 && lens.focus_dist.is_finite()) {
        return Err(ConfigError::InvalidFocusDistance(lens.focus_dist));
    }
    if !(lens.defocus_angle >= 0.0 && lens.defocus_angle < 180.0) {
        return Err(ConfigError::InvalidDefocusAngle(lens.defocus_angle));
    }

    let view = lens.lookfrom - lens.lookat;
    if !view.is_finite() || view.length_squared() == 0.0 {
        return Err(ConfigError::DegenerateView);
    }
    let up_sq = lens.vup.length_squared();
    if lens.vup.cross(view).length_squared() <= 1e-12 * view.length_squared() * up_sq {
        return Err(ConfigError::ParallelUp);
    }
    Ok(())
}

/// Seed for one row of one pass.
///
/// Rows fit in the low 32 bits and the pass goes above them, so every
/// (pass, row) pair under one base is distinct. `seed_from_u64` does the
/// scrambling.
fn row_seed(base: u64, pass: u64, row: u64) -> u64 {
    debug_assert!(row <= u32::MAX as u64);
    base ^ ((pass << 32) | row)
}

/// Compute the color seen by a ray.
///
/// Traces the ray through the scene, bouncing off surfaces until a
/// material absorbs it, it escapes to the background, or `depth` runs out.
pub fn ray_color(ray: &Ray, world: &Scene, depth: u32, rng: &mut dyn RngCore) -> Color {
    // Out of bounces: no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();
    if !world.hit(ray, Interval::new(HIT_EPSILON, f64::INFINITY), &mut rec) {
        return background(ray);
    }

    let material = world.material(rec.material);
    debug_assert!(
        material.is_some(),
        "hit names unregistered material {:?}",
        rec.material
    );
    let Some(material) = material else {
        return Color::ZERO;
    };

    match material.scatter(ray, &rec, rng) {
        Some(result) => result.attenuation * ray_color(&result.scattered, world, depth - 1, rng),
        None => Color::ZERO,
    }
}

/// Sky gradient from [`HORIZON`] to [`ZENITH`] by the ray's vertical direction.
pub fn background(ray: &Ray) -> Color {
    let unit_direction = prism_math::unit(ray.direction());
    let a = 0.5 * (unit_direction.y + 1.0);
    (1.0 - a) * HORIZON + a * ZENITH
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Average a pixel's accumulated radiance, gamma-correct, clamp and quantize.
pub fn finalize_pixel(sum: Color, samples: u32) -> [u8; 3] {
    debug_assert!(samples > 0, "pixel finalized without samples");
    let color = sum / samples as f64;
    let channel = |c: f64| (Interval::UNIT.clamp(linear_to_gamma(c)) * 255.0) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Material;

    fn single_sphere_scene() -> Scene {
        let mut scene = Scene::new();
        let mat = scene.register_material(Material::matte(Color::splat(0.5)));
        scene.add_sphere(Point::new(0.0, 0.0, -1.0), 0.5, mat).unwrap();
        scene
    }

    #[test]
    fn test_depth_zero_is_black() {
        let scene = single_sphere_scene();
        let mut rng = StdRng::seed_from_u64(0);

        for direction in [Vector::NEG_Z, Vector::Y, Vector::new(1.0, -1.0, 0.3)] {
            let ray = Ray::new(Point::ZERO, direction);
            assert_eq!(ray_color(&ray, &scene, 0, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = single_sphere_scene();
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new(Point::ZERO, Vector::Y);

        assert_eq!(ray_color(&ray, &scene, 10, &mut rng), background(&ray));
    }

    #[test]
    fn test_sky_gradient_endpoints() {
        let up = background(&Ray::new(Point::ZERO, Vector::new(0.0, 3.0, 0.0)));
        let down = background(&Ray::new(Point::ZERO, Vector::new(0.0, -2.0, 0.0)));

        assert!((up - ZENITH).length() < 1e-12);
        assert!((down - HORIZON).length() < 1e-12);
    }

    #[test]
    fn test_sky_gradient_is_convex_combination() {
        let mut rng = StdRng::seed_from_u64(77);
        for _ in 0..500 {
            let direction = prism_math::sampling::random_unit_vector(&mut rng);
            let color = background(&Ray::new(Point::ZERO, direction));
            for i in 0..3 {
                let lo = HORIZON[i].min(ZENITH[i]);
                let hi = HORIZON[i].max(ZENITH[i]);
                assert!(color[i] >= lo - 1e-12 && color[i] <= hi + 1e-12);
            }
        }
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-12);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_finalize_pixel_clamps() {
        assert_eq!(finalize_pixel(Color::ZERO, 4), [0, 0, 0]);
        assert_eq!(finalize_pixel(Color::splat(4.0), 4), [255, 255, 255]);
        assert_eq!(finalize_pixel(Color::splat(1e9), 1), [255, 255, 255]);
        assert_eq!(finalize_pixel(Color::splat(-3.0), 1), [0, 0, 0]);
        assert_eq!(finalize_pixel(Color::new(f64::NAN, 0.25, 1.0), 1), [0, 127, 255]);
    }

    #[test]
    fn test_finalize_pixel_is_monotonic() {
        let mut previous = 0;
        for i in 0..=2000 {
            let value = i as f64 / 1000.0;
            let [r, _, _] = finalize_pixel(Color::new(value, 0.0, 0.0), 1);
            assert!(r >= previous);
            previous = r;
        }
        assert_eq!(previous, 255);
    }

    #[test]
    fn test_row_seeds_differ() {
        assert_ne!(row_seed(1, 0, 0), row_seed(1, 0, 1));
        assert_ne!(row_seed(1, 0, 0), row_seed(1, 1, 0));
        assert_eq!(row_seed(9, 2, 3), row_seed(9, 2, 3));
    }

    #[test]
    fn test_row_seeds_unique_within_base() {
        let seeds: std::collections::HashSet<u64> = (0..8u64)
            .flat_map(|pass| (0..512u64).map(move |row| row_seed(42, pass, row)))
            .collect();
        assert_eq!(seeds.len(), 8 * 512);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            Renderer::new(0, 10).unwrap_err(),
            ConfigError::ZeroDimension { width: 0, height: 10 }
        );
        assert!(Renderer::new(10, 0).is_err());
    }

    #[test]
    fn test_configure_rejects_bad_parameters() {
        let mut renderer = Renderer::new(16, 9).unwrap();
        let good = *renderer.geometry();

        renderer.vfov = 180.0;
        assert_eq!(renderer.configure(), Err(ConfigError::InvalidFov(180.0)));
        renderer.vfov = 40.0;

        renderer.samples_num = 0;
        assert_eq!(renderer.configure(), Err(ConfigError::NoSamples));
        renderer.samples_num = 1;

        renderer.focus_dist = 0.0;
        assert_eq!(renderer.configure(), Err(ConfigError::InvalidFocusDistance(0.0)));
        renderer.focus_dist = 10.0;

        renderer.defocus_angle = -1.0;
        assert_eq!(renderer.configure(), Err(ConfigError::InvalidDefocusAngle(-1.0)));
        renderer.defocus_angle = 0.0;

        renderer.lookat = renderer.lookfrom;
        assert_eq!(renderer.configure(), Err(ConfigError::DegenerateView));

        renderer.lookfrom = Point::new(0.0, 5.0, 0.0);
        renderer.lookat = Point::ZERO;
        assert_eq!(renderer.configure(), Err(ConfigError::ParallelUp));

        // Failed configuration keeps the last good geometry
        assert_eq!(*renderer.geometry(), good);
    }

    #[test]
    fn test_geometry_is_stale_until_configured() {
        let mut renderer = Renderer::new(16, 9).unwrap();
        let before = *renderer.geometry();

        renderer.lookfrom = Point::new(3.0, 1.0, 4.0);
        assert_eq!(*renderer.geometry(), before);

        renderer.configure().unwrap();
        assert_ne!(*renderer.geometry(), before);
        assert_eq!(renderer.geometry().center, Point::new(3.0, 1.0, 4.0));
    }

    #[test]
    fn test_accumulator_size_mismatch() {
        let renderer = Renderer::new(4, 4).unwrap();
        let mut acc = Accumulator::new(5, 4);
        let cancel = AtomicBool::new(false);

        let err = renderer
            .accumulate(&Scene::new(), &mut acc, 1, 0, &cancel)
            .unwrap_err();
        assert!(matches!(err, RenderError::SizeMismatch { found_width: 5, .. }));
    }

    #[test]
    fn test_empty_accumulator_resolves_black() {
        let acc = Accumulator::new(2, 2);
        let mut image = ImageBuffer::new(2, 2);
        image.pixels.fill([9, 9, 9]);

        acc.resolve(&mut image);
        assert!(image.pixels.iter().all(|p| *p == [0, 0, 0]));
    }
}
