//! Physics module for motion integration and collision response
//!
//! Provides per-tick gravity and velocity integration for free bodies and
//! vertical overlap resolution against neighboring bounding boxes. Broad
//! phase narrowing is the grid's job; bodies only consume the bounds they
//! are handed.

mod body;

pub use body::{Body, BodyKey, GRAVITY};
