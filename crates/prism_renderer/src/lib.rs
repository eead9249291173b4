//! prism renderer - CPU ray tracing
//!
//! A forward Monte Carlo ray tracer: camera rays are jittered per pixel,
//! traced recursively through a [`Scene`] of spheres, scattered by
//! Matte/Metal/Glass materials and averaged into 8-bit RGB pixels handed to
//! an [`ImageSink`].
//!
//! ```
//! use prism_renderer::{Color, Material, Point, Renderer, Scene};
//!
//! let mut scene = Scene::new();
//! let gray = scene.register_material(Material::matte(Color::splat(0.5)));
//! scene.add_sphere(Point::new(0.0, 0.0, -1.0), 0.5, gray).unwrap();
//!
//! let mut renderer = Renderer::new(8, 8).unwrap();
//! renderer.samples_num = 2;
//! renderer.render_depth = 4;
//! renderer.lookfrom = Point::ZERO;
//! renderer.lookat = Point::new(0.0, 0.0, -1.0);
//! renderer.configure().unwrap();
//!
//! let image = renderer.render_to_buffer(&scene);
//! assert_eq!(image.pixels.len(), 64);
//! ```

mod camera;
mod error;
mod hittable;
mod image;
mod material;
mod renderer;
mod scene;
mod settings;
mod sphere;

pub use camera::CameraGeometry;
pub use error::{ConfigError, RenderError, SceneError};
pub use hittable::{HitRecord, Hittable, MaterialId};
pub use image::{ImageBuffer, ImageSink};
pub use material::{Glass, Material, Matte, Metal, Scatter, ScatterResult};
pub use renderer::{
    background, finalize_pixel, linear_to_gamma, ray_color, Accumulator, RenderStats, Renderer,
    HIT_EPSILON, HORIZON, ZENITH,
};
pub use scene::Scene;
pub use settings::RenderSettings;
pub use sphere::Sphere;

/// Re-export the math types from prism_math
pub use prism_math::{Color, Interval, Point, Ray, Vector};
