//! Serializable render settings.

use prism_math::{Point, Vector};
use serde::{Deserialize, Serialize};

/// Every renderer parameter in one value.
///
/// Missing fields take their defaults when deserialized, so a settings file
/// only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub image_width: u32,
    pub image_height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_num: u32,
    /// Maximum ray bounce depth
    pub render_depth: u32,
    /// Vertical field of view in degrees
    pub vfov: f64,
    pub lookfrom: Point,
    pub lookat: Point,
    pub vup: Vector,
    /// Variation angle of rays through each pixel, 0 disables depth of field
    pub defocus_angle: f64,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f64,
    /// Base seed for the per-row generators; random when absent
    pub seed: Option<u64>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            image_width: 800,
            image_height: 450,
            samples_num: 100,
            render_depth: 50,
            vfov: 90.0,
            lookfrom: Point::new(0.0, 0.0, 1.0),
            lookat: Point::ZERO,
            vup: Vector::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            seed: None,
        }
    }
}
