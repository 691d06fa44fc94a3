//! Spatial partitioning data structures
//!
//! Provides the uniform cell lattice used for neighbor and membership
//! queries, plus the axis-aligned bounding volumes everything is measured
//! with. The lattice is built once and its geometry never changes; only
//! cell membership lists are updated as bodies move.

mod bounds;
mod cell;
mod grid;

pub use bounds::Aabb;
pub use cell::{Cell, CellIndex};
pub use grid::{Grid, GridConfig, GridError, NeighborScan};
