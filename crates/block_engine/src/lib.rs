//! # Block Engine
//!
//! A uniform spatial grid and entity simulation core for block-world sandboxes.
//!
//! ## Features
//!
//! - **Uniform Spatial Grid**: Fixed lattice of cubic cells with O(1) position-to-cell mapping
//! - **AABB Collision**: Inclusive axis-aligned overlap tests and overlap regions
//! - **Motion Integration**: Per-tick gravity and velocity integration for free bodies
//! - **Cell Membership**: Incremental, minimal cell occupancy maintained as bodies move
//! - **Headless**: No rendering or input dependencies; drive it from any front end
//!
//! ## Quick Start
//!
//! ```rust
//! use block_engine::prelude::*;
//!
//! fn main() -> Result<(), GridError> {
//!     let mut world = World::new(WorldConfig::default())?;
//!
//!     let _platform = world.spawn(Body::anchored(
//!         Vec3::new(128.0, 2.0, 128.0),
//!         Vec3::new(128.0, 2.0, 128.0),
//!     ));
//!     let block = world.spawn(Body::new(
//!         Vec3::new(128.0, 40.0, 128.0),
//!         Vec3::new(2.0, 2.0, 2.0),
//!     ));
//!
//!     for _ in 0..300 {
//!         world.step(1.0);
//!     }
//!
//!     assert!(world.body(block).map_or(false, Body::is_grounded));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;

pub mod config;
pub mod physics;
pub mod spatial;

mod world;

#[cfg(test)]
mod tests;

pub use world::{World, WorldConfig};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        foundation::{math::Vec3, time::Timer},
        physics::{Body, BodyKey},
        spatial::{Aabb, Cell, CellIndex, Grid, GridConfig, GridError, NeighborScan},
        World, WorldConfig,
    };
}
