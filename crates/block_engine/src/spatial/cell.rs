//! Grid cells and their membership lists
//!
//! A cell is a fixed cubic sub-region of the world. Cells are created once
//! by [`Grid::build`](crate::spatial::Grid::build) and never move or resize;
//! the only mutable state is the list of body keys currently overlapping the
//! cell and a tick counter driven by the grid.

use crate::foundation::math::Vec3;
use crate::physics::BodyKey;
use crate::spatial::bounds::Aabb;

/// Lattice coordinates of a cell
///
/// Components are signed so positions outside the world map to coordinates
/// outside the lattice instead of wrapping; lookups reject those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellIndex {
    /// Index along the X axis
    pub i: i32,
    /// Index along the Y axis
    pub j: i32,
    /// Index along the Z axis
    pub k: i32,
}

impl CellIndex {
    /// Create a new lattice index
    pub fn new(i: i32, j: i32, k: i32) -> Self {
        Self { i, j, k }
    }
}

/// Fixed cubic sub-region of the world with a list of overlapping bodies
#[derive(Debug, Clone)]
pub struct Cell {
    index: CellIndex,
    center: Vec3,
    size: f32,
    bounds: Aabb,
    members: Vec<BodyKey>,
    tick_count: u64,
}

impl Cell {
    /// Create a new empty cell
    ///
    /// Cells are normally created by grid construction; the bounds are the
    /// cube of edge `size` centered at `center`.
    pub fn new(index: CellIndex, center: Vec3, size: f32) -> Self {
        let half = size * 0.5;
        Self {
            index,
            center,
            size,
            bounds: Aabb::from_center_extents(center, Vec3::new(half, half, half)),
            members: Vec::new(),
            tick_count: 0,
        }
    }

    /// Get the lattice coordinates of this cell
    pub fn index(&self) -> CellIndex {
        self.index
    }

    /// Get the world-space center of this cell
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Get the edge length of this cell
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Get the world-space bounds of this cell
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Register a body in this cell
    ///
    /// Inserting a key that is already present is a no-op; the member list
    /// never holds duplicates. Returns whether the key was newly added.
    pub fn insert(&mut self, key: BodyKey) -> bool {
        if self.members.contains(&key) {
            return false;
        }
        self.members.push(key);
        true
    }

    /// Remove a body from this cell
    ///
    /// Removing a key that is not present is a no-op. Returns whether the
    /// key was found.
    pub fn remove(&mut self, key: BodyKey) -> bool {
        if let Some(position) = self.members.iter().position(|member| *member == key) {
            self.members.swap_remove(position);
            return true;
        }
        false
    }

    /// Check whether a body is registered in this cell
    pub fn contains(&self, key: BodyKey) -> bool {
        self.members.contains(&key)
    }

    /// Iterate over the keys of all bodies registered in this cell
    ///
    /// The list is snapshotted when called; the iterator owns its keys, so
    /// later inserts and removals do not show up in it.
    pub fn members(&self) -> impl Iterator<Item = BodyKey> {
        self.members.clone().into_iter()
    }

    /// Get the number of bodies registered in this cell
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check whether no bodies are registered in this cell
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Per-tick cell hook
    ///
    /// Driven once per tick by [`Grid::tick`](crate::spatial::Grid::tick).
    /// The hook never moves bodies; motion integration belongs to the world
    /// update. It only records that it ran, which makes tick coverage
    /// observable.
    pub fn update(&mut self, _dt: f32) {
        self.tick_count += 1;
    }

    /// Get the number of ticks this cell has seen
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
