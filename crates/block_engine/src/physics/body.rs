//! Simulated bodies and their per-tick update cycle
//!
//! A body is the unit of simulation: a position, a velocity, an axis-aligned
//! bounding box derived from the position, and the set of grid cells the box
//! currently overlaps. Free bodies integrate motion every tick; anchored
//! bodies never move but still occupy cells and block falling neighbors.

use crate::foundation::math::{utils, Vec3};
use crate::spatial::{Aabb, CellIndex, Grid};

slotmap::new_key_type! {
    /// Stable generational handle to a body stored in a world
    pub struct BodyKey;
}

/// Default per-tick downward impulse applied to free bodies
///
/// Gravity in this engine is a fixed velocity decrement per tick, not an
/// acceleration scaled by elapsed time.
pub const GRAVITY: f32 = 0.01;

/// Unit of simulation: position, velocity, bounds, and cell membership
///
/// A free body falls: gravity decreases its vertical velocity every tick
/// until a vertical overlap is resolved, which zeroes the vertical velocity
/// and marks the body grounded. The body leaves the grounded state on the
/// first tick without an overlap. Anchored bodies sit outside this cycle.
#[derive(Debug, Clone)]
pub struct Body {
    key: BodyKey,
    position: Vec3,
    velocity: Vec3,
    half_extents: Vec3,
    bounds: Aabb,
    current_cells: Vec<CellIndex>,
    previous_cells: Vec<CellIndex>,
    anchored: bool,
    grounded: bool,
}

impl Body {
    /// Create a free body centered at `position`
    pub fn new(position: Vec3, half_extents: Vec3) -> Self {
        Self {
            key: BodyKey::default(),
            position,
            velocity: Vec3::zeros(),
            half_extents,
            bounds: Aabb::from_center_extents(position, half_extents),
            current_cells: Vec::new(),
            previous_cells: Vec::new(),
            anchored: false,
            grounded: false,
        }
    }

    /// Create a free body with an initial velocity
    pub fn with_velocity(position: Vec3, half_extents: Vec3, velocity: Vec3) -> Self {
        let mut body = Self::new(position, half_extents);
        body.velocity = velocity;
        body
    }

    /// Create an anchored body
    ///
    /// Anchored bodies never integrate motion, never ground, and ignore
    /// collision resolution; they exist to occupy cells and stop falling
    /// neighbors. Baseplates and fixed obstacles use this.
    pub fn anchored(position: Vec3, half_extents: Vec3) -> Self {
        let mut body = Self::new(position, half_extents);
        body.anchored = true;
        body
    }

    /// Get the key assigned by the owning world
    ///
    /// The null key until the body has been spawned.
    pub fn key(&self) -> BodyKey {
        self.key
    }

    /// Get the body's center position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the body's center, recomputing its bounds
    ///
    /// Cell membership catches up on the next refresh.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.refresh_bounds();
    }

    /// Get the body's velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Set the body's velocity
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Add to the body's velocity
    pub fn add_velocity(&mut self, delta_velocity: Vec3) {
        self.velocity += delta_velocity;
    }

    /// Get the body's half-extents
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// Get a copy of the body's current bounding box
    pub fn bounding_volume(&self) -> Aabb {
        self.bounds
    }

    /// Check whether the body is anchored
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Check whether the body ended the last collision pass grounded
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Get the cells the body was registered in at the last refresh
    pub fn current_cells(&self) -> &[CellIndex] {
        &self.current_cells
    }

    /// Get the cells the body was registered in one refresh earlier
    pub fn previous_cells(&self) -> &[CellIndex] {
        &self.previous_cells
    }

    /// Apply one tick of motion
    ///
    /// Gravity is a fixed per-tick impulse on the vertical velocity; `dt`
    /// scales only the positional step. The bounds are recomputed from the
    /// new position. Anchored bodies do not move.
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        if self.anchored {
            return;
        }

        self.velocity.y -= gravity;
        self.position += self.velocity * dt;
        self.refresh_bounds();
    }

    /// Push the body up and out of vertical overlap with its neighbors
    ///
    /// Every box in `others` that overlaps the body contributes its full
    /// vertical overlap depth, measured against the body's bounds as of
    /// entry; the body is then displaced upward by the sum once. When
    /// several neighbors overlap at the same height the displacements add,
    /// so the body can end the pass above the tallest of them; later ticks
    /// re-resolve it downward. Any overlap zeroes the vertical velocity and
    /// grounds the body; no overlap releases a previously grounded body.
    ///
    /// Returns whether the body ended the pass grounded. Anchored bodies
    /// ignore the pass entirely.
    pub fn resolve_vertical_collision<'a, I>(&mut self, others: I) -> bool
    where
        I: IntoIterator<Item = &'a Aabb>,
    {
        if self.anchored {
            return false;
        }

        // Depths are measured against the bounds at entry so the result is
        // independent of the order overlaps are visited in.
        let entry_bounds = self.bounds;
        let mut lift = 0.0;
        let mut contacts = 0usize;
        for other in others {
            if let Some(region) = entry_bounds.intersection(other) {
                lift += region.height();
                contacts += 1;
            }
        }

        if contacts == 0 {
            self.grounded = false;
            return false;
        }

        self.position.y += lift;
        self.velocity.y = 0.0;
        self.grounded = true;
        self.refresh_bounds();
        true
    }

    /// Re-index the body into the cells its bounds now overlap
    ///
    /// The previous tick's cell set is swapped out and the body's key is
    /// removed from each of those cells; the key is then inserted into every
    /// candidate cell whose bounds intersect the body's. A body partially or
    /// fully outside the lattice simply lands in however many in-range cells
    /// it overlaps, possibly none.
    pub fn refresh_cell_membership(&mut self, grid: &mut Grid) {
        std::mem::swap(&mut self.current_cells, &mut self.previous_cells);
        self.current_cells.clear();

        for &index in &self.previous_cells {
            if let Ok(cell) = grid.cell_at_mut(index) {
                cell.remove(self.key);
            }
        }

        for index in grid.candidate_cells(&self.bounds) {
            if let Ok(cell) = grid.cell_at_mut(index) {
                if cell.bounds().intersects(&self.bounds) {
                    cell.insert(self.key);
                    self.current_cells.push(index);
                }
            }
        }
    }

    /// Remove the body's key from every cell it occupies
    ///
    /// Used when a body leaves the world; afterwards no cell holds the key
    /// and both cell sets are empty.
    pub fn clear_cell_membership(&mut self, grid: &mut Grid) {
        for &index in &self.current_cells {
            if let Ok(cell) = grid.cell_at_mut(index) {
                cell.remove(self.key);
            }
        }
        self.current_cells.clear();
        self.previous_cells.clear();
    }

    /// Scale horizontal velocity, leaving vertical motion alone
    ///
    /// Drivers call this to bleed off steering input, e.g. multiplying by
    /// `0.75` every tick a control is released. Anchored bodies ignore it.
    pub fn damp_horizontal(&mut self, factor: f32) {
        if self.anchored {
            return;
        }
        self.velocity.x *= factor;
        self.velocity.z *= factor;
    }

    /// Distance between this body's center and another's
    pub fn distance_to(&self, other: &Self) -> f32 {
        utils::distance(self.position, other.position)
    }

    /// Distance between this body's center and a point
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        utils::distance(self.position, point)
    }

    /// Stamp the key assigned by the owning world
    pub(crate) fn assign_key(&mut self, key: BodyKey) {
        self.key = key;
    }

    fn refresh_bounds(&mut self) {
        self.bounds = Aabb::from_center_extents(self.position, self.half_extents);
    }
}
