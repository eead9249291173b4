// Re-export glam for convenience
pub use glam;
pub use glam::{DVec2, DVec3};

// prism math types
mod interval;
mod ray;
pub mod sampling;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{near_zero, reflect, refract, unit, Color, Point, Vector};
