//! Uniform spatial grid
//!
//! Divides the world into a fixed lattice of cubic cells for fast neighbor
//! and membership queries. The lattice is allocated once at build time; the
//! mapping between world positions and lattice coordinates is a single
//! closed formula, so a cell's center always maps back to its own index.

use crate::foundation::math::Vec3;
use crate::spatial::bounds::Aabb;
use crate::spatial::cell::{Cell, CellIndex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by grid construction and lookup
#[derive(Error, Debug)]
pub enum GridError {
    /// Invalid build parameters
    #[error("Invalid grid configuration: {0}")]
    Configuration(String),

    /// Cell lookup outside the lattice
    #[error("Cell index {index:?} is outside the {cells_per_axis}^3 lattice")]
    IndexOutOfRange {
        /// The rejected lattice coordinates
        index: CellIndex,
        /// Number of cells along each axis of the lattice
        cells_per_axis: usize,
    },
}

/// Candidate enumeration strategy for cell membership scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborScan {
    /// Block of cells spanning the body's bounds, widened by one cell on
    /// every side
    ///
    /// Cost scales with the number of cells the bounds span; complete for
    /// bodies of any extent.
    Block,

    /// Full-lattice filter keeping every cell whose bounds intersect the
    /// body's
    ///
    /// Linear in lattice size and exact by construction; the brute-force
    /// cross-check for `Block`.
    Exhaustive,
}

impl Default for NeighborScan {
    fn default() -> Self {
        Self::Block
    }
}

/// Configuration for grid construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// World edge length covered along each axis
    pub width: f32,

    /// Cell edge length
    pub cell_size: f32,

    /// World-space position of the lattice minimum corner
    pub origin: Vec3,

    /// Candidate enumeration strategy for membership scans
    pub scan: NeighborScan,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 256.0,
            cell_size: 64.0,
            origin: Vec3::zeros(),
            scan: NeighborScan::Block,
        }
    }
}

/// Uniform 3D lattice of cubic cells
///
/// Cell `(i, j, k)` spans the cube from `origin + cell_size * (i, j, k)` to
/// `origin + cell_size * (i + 1, j + 1, k + 1)`; its center sits half a cell
/// above the minimum corner on every axis. [`Grid::index_of`] inverts that
/// placement exactly, so it doubles as the containment map for positions.
#[derive(Debug, Clone)]
pub struct Grid {
    origin: Vec3,
    cell_size: f32,
    cells_per_axis: usize,
    cells: Vec<Cell>,
    scan: NeighborScan,
}

impl Grid {
    /// Build a grid covering `width` world units per axis, anchored at the
    /// world origin
    ///
    /// One boundary layer of cells is allocated beyond `width / cell_size`
    /// so the covered span includes both edges of the world.
    pub fn build(width: f32, cell_size: f32) -> Result<Self, GridError> {
        Self::from_config(&GridConfig {
            width,
            cell_size,
            ..GridConfig::default()
        })
    }

    /// Build a grid from a configuration
    pub fn from_config(config: &GridConfig) -> Result<Self, GridError> {
        if !config.width.is_finite() || config.width <= 0.0 {
            return Err(GridError::Configuration(format!(
                "width must be positive and finite, got {}",
                config.width
            )));
        }
        if !config.cell_size.is_finite() || config.cell_size <= 0.0 {
            return Err(GridError::Configuration(format!(
                "cell size must be positive and finite, got {}",
                config.cell_size
            )));
        }

        let cells_per_axis = (config.width / config.cell_size).floor() as usize + 1;
        let half = config.cell_size * 0.5;

        let mut cells = Vec::with_capacity(cells_per_axis.pow(3));
        for i in 0..cells_per_axis {
            for j in 0..cells_per_axis {
                for k in 0..cells_per_axis {
                    let center = Vec3::new(
                        config.origin.x + config.cell_size * i as f32 + half,
                        config.origin.y + config.cell_size * j as f32 + half,
                        config.origin.z + config.cell_size * k as f32 + half,
                    );
                    cells.push(Cell::new(
                        CellIndex::new(i as i32, j as i32, k as i32),
                        center,
                        config.cell_size,
                    ));
                }
            }
        }

        log::info!(
            "Built {}x{}x{} cell lattice ({} cells of edge {})",
            cells_per_axis,
            cells_per_axis,
            cells_per_axis,
            cells.len(),
            config.cell_size
        );

        Ok(Self {
            origin: config.origin,
            cell_size: config.cell_size,
            cells_per_axis,
            cells,
            scan: config.scan,
        })
    }

    /// Map a world-space position to the lattice coordinates of the cell
    /// containing it
    ///
    /// Positions outside the covered span map to coordinates outside the
    /// lattice; [`Grid::cell_at`] rejects those on lookup.
    pub fn index_of(&self, position: Vec3) -> CellIndex {
        CellIndex::new(
            ((position.x - self.origin.x) / self.cell_size).floor() as i32,
            ((position.y - self.origin.y) / self.cell_size).floor() as i32,
            ((position.z - self.origin.z) / self.cell_size).floor() as i32,
        )
    }

    /// Look up the cell at the given lattice coordinates
    pub fn cell_at(&self, index: CellIndex) -> Result<&Cell, GridError> {
        match self.offset_of(index) {
            Some(offset) => Ok(&self.cells[offset]),
            None => Err(GridError::IndexOutOfRange {
                index,
                cells_per_axis: self.cells_per_axis,
            }),
        }
    }

    /// Look up the cell at the given lattice coordinates, mutably
    pub fn cell_at_mut(&mut self, index: CellIndex) -> Result<&mut Cell, GridError> {
        let cells_per_axis = self.cells_per_axis;
        match self.offset_of(index) {
            Some(offset) => Ok(&mut self.cells[offset]),
            None => Err(GridError::IndexOutOfRange {
                index,
                cells_per_axis,
            }),
        }
    }

    /// Enumerate the in-range cells that `bounds` may overlap
    ///
    /// The strategy comes from the grid configuration. Both strategies
    /// cover bodies of any extent: the result is a superset of the cells
    /// actually intersecting `bounds`, and callers filter by cell bounds
    /// when registering. Out-of-range coordinates are dropped here, so a
    /// body straddling the edge of the world simply gets fewer candidates.
    pub fn candidate_cells(&self, bounds: &Aabb) -> Vec<CellIndex> {
        match self.scan {
            NeighborScan::Block => self.block_candidates(bounds),
            NeighborScan::Exhaustive => self.exhaustive_candidates(bounds),
        }
    }

    /// Advance every cell's per-tick hook
    ///
    /// Cells are visited in storage (row-major) order, so runs over the
    /// same world are reproducible.
    pub fn tick(&mut self, dt: f32) {
        for cell in &mut self.cells {
            cell.update(dt);
        }
    }

    /// Get the world-space position of the lattice minimum corner
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the cell edge length
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Get the number of cells along each axis
    pub fn cells_per_axis(&self) -> usize {
        self.cells_per_axis
    }

    /// Get the total number of cells in the lattice
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check whether the lattice holds no cells
    ///
    /// Never true for a built grid; present to pair with [`Grid::len`].
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over every cell in storage order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Flat storage offset for in-range lattice coordinates
    fn offset_of(&self, index: CellIndex) -> Option<usize> {
        let bound = self.cells_per_axis as i32;
        if index.i < 0 || index.i >= bound
            || index.j < 0 || index.j >= bound
            || index.k < 0 || index.k >= bound
        {
            return None;
        }

        let n = self.cells_per_axis;
        Some((index.i as usize * n + index.j as usize) * n + index.k as usize)
    }

    /// Block of in-range cells spanning `bounds`
    ///
    /// The lattice range comes from the corner indices of the bounds,
    /// widened by one cell per side so cells touching the bounds only on a
    /// shared face are still enumerated.
    fn block_candidates(&self, bounds: &Aabb) -> Vec<CellIndex> {
        let lo = self.index_of(bounds.min);
        let hi = self.index_of(bounds.max);

        let mut candidates = Vec::with_capacity(
            ((hi.i - lo.i + 3) * (hi.j - lo.j + 3) * (hi.k - lo.k + 3)) as usize,
        );
        for i in (lo.i - 1)..=(hi.i + 1) {
            for j in (lo.j - 1)..=(hi.j + 1) {
                for k in (lo.k - 1)..=(hi.k + 1) {
                    let index = CellIndex::new(i, j, k);
                    if self.offset_of(index).is_some() {
                        candidates.push(index);
                    }
                }
            }
        }
        candidates
    }

    /// Every cell in the lattice whose bounds intersect `bounds`
    fn exhaustive_candidates(&self, bounds: &Aabb) -> Vec<CellIndex> {
        self.cells
            .iter()
            .filter(|cell| cell.bounds().intersects(bounds))
            .map(Cell::index)
            .collect()
    }
}
