//! Error types for scene construction, renderer configuration and rendering.

use crate::MaterialId;
use thiserror::Error;

/// Rejected renderer configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Image dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("Sample count must be at least 1")]
    NoSamples,

    #[error("Vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFov(f64),

    #[error("Camera position and look-at point coincide")]
    DegenerateView,

    #[error("Up vector is parallel to the view direction")]
    ParallelUp,

    #[error("Focus distance must be positive, got {0}")]
    InvalidFocusDistance(f64),

    #[error("Defocus angle must be non-negative, got {0}")]
    InvalidDefocusAngle(f64),
}

/// Rejected scene content.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Material {0:?} is not registered with this scene")]
    UnknownMaterial(MaterialId),

    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("Index of refraction must be positive and finite, got {0}")]
    InvalidIor(f64),
}

/// Failure of a render pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Render cancelled after {rows_done} of {rows_total} rows")]
    Cancelled { rows_done: usize, rows_total: usize },

    #[error("Accumulator is {found_width}x{found_height}, renderer is {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        found_width: u32,
        found_height: u32,
    },
}
