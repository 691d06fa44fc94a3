//! Math utilities and types
//!
//! Provides the fundamental math types shared by the spatial grid and the
//! physics simulation. Everything is `f32`; positions and velocities use the
//! same vector type.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Math utility functions
pub mod utils {
    use super::Vec3;

    /// Euclidean distance between two points
    pub fn distance(a: Vec3, b: Vec3) -> f32 {
        (a - b).magnitude()
    }

    /// Squared Euclidean distance, for comparisons that do not need the root
    pub fn distance_squared(a: Vec3, b: Vec3) -> f32 {
        (a - b).magnitude_squared()
    }
}
