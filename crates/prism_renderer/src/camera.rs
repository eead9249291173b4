//! Camera geometry for ray generation.

use crate::Ray;
use prism_math::sampling::{random_in_unit_disk, sample_square};
use prism_math::{unit, Point, Vector};
use rand::RngCore;

/// Viewport geometry derived from the camera parameters.
///
/// Produced by [`Renderer::configure`](crate::Renderer::configure) and
/// never updated on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraGeometry {
    /// Eye point (lookfrom)
    pub center: Point,
    /// Center of the upper-left pixel
    pub pixel00_loc: Point,
    /// Offset from pixel to pixel, left to right
    pub pixel_delta_x: Vector,
    /// Offset from pixel to pixel, top to bottom
    pub pixel_delta_y: Vector,
    // Camera frame basis vectors
    pub u: Vector,
    pub v: Vector,
    pub w: Vector,
    /// Defocus disk horizontal radius
    pub defocus_disk_u: Vector,
    /// Defocus disk vertical radius
    pub defocus_disk_v: Vector,
    /// Whether rays start on the defocus disk instead of the eye point
    pub defocus: bool,
}

/// Inputs for [`CameraGeometry::derive`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lens {
    pub image_width: u32,
    pub image_height: u32,
    pub vfov: f64,
    pub lookfrom: Point,
    pub lookat: Point,
    pub vup: Vector,
    pub defocus_angle: f64,
    pub focus_dist: f64,
}

impl CameraGeometry {
    /// Derive viewport geometry. Inputs must already be validated.
    pub(crate) fn derive(lens: &Lens) -> Self {
        let center = lens.lookfrom;

        // Determine viewport dimensions
        let theta = lens.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * lens.focus_dist;
        let viewport_width =
            viewport_height * (lens.image_width as f64 / lens.image_height as f64);

        // Calculate the u,v,w unit basis vectors for the camera coordinate frame
        let w = unit(lens.lookfrom - lens.lookat);
        let u = unit(lens.vup.cross(w));
        let v = w.cross(u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        let pixel_delta_x = viewport_u / lens.image_width as f64;
        let pixel_delta_y = viewport_v / lens.image_height as f64;

        let viewport_upper_left =
            center - lens.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_x + pixel_delta_y);

        let defocus_radius = lens.focus_dist * (lens.defocus_angle / 2.0).to_radians().tan();

        Self {
            center,
            pixel00_loc,
            pixel_delta_x,
            pixel_delta_y,
            u,
            v,
            w,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
            defocus: lens.defocus_angle > 0.0,
        }
    }

    /// Center of pixel (x, y) on the focus plane.
    pub fn pixel_center(&self, x: u32, y: u32) -> Point {
        self.pixel00_loc + (x as f64) * self.pixel_delta_x + (y as f64) * self.pixel_delta_y
    }

    /// Generate a jittered ray through pixel (x, y).
    ///
    /// The sample point is uniform over the pixel square; the origin is the
    /// eye point or, with defocus enabled, a point on the defocus disk.
    pub fn get_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);
        let pixel_sample = self.pixel_center(x, y)
            + offset.x * self.pixel_delta_x
            + offset.y * self.pixel_delta_y;

        let ray_origin = if self.defocus {
            self.defocus_disk_sample(rng)
        } else {
            self.center
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}
