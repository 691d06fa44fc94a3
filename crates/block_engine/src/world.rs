//! World orchestration
//!
//! [`World`] owns the grid and every body and advances the whole simulation
//! one tick at a time. It is the single entry point for motion integration;
//! cell hooks never move anything.

use crate::config::Config;
use crate::physics::{Body, BodyKey, GRAVITY};
use crate::spatial::{Aabb, Grid, GridConfig, GridError};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

/// World configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Per-tick downward impulse applied to free bodies
    pub gravity: f32,

    /// Grid construction parameters
    pub grid: GridConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            grid: GridConfig::default(),
        }
    }
}

impl Config for WorldConfig {}

/// Simulation world owning the grid and all bodies
pub struct World {
    grid: Grid,
    bodies: SlotMap<BodyKey, Body>,
    gravity: f32,
    tick_count: u64,

    /// Bounds of every body as of tick start, rebuilt each step
    snapshot: Vec<(BodyKey, Aabb)>,
}

impl World {
    /// Create a world from a configuration
    pub fn new(config: WorldConfig) -> Result<Self, GridError> {
        let grid = Grid::from_config(&config.grid)?;
        log::info!(
            "World ready: {} cells, gravity {} per tick",
            grid.len(),
            config.gravity
        );

        Ok(Self {
            grid,
            bodies: SlotMap::with_key(),
            gravity: config.gravity,
            tick_count: 0,
            snapshot: Vec::new(),
        })
    }

    /// Add a body to the world
    ///
    /// The body receives its key and is indexed into the grid immediately.
    pub fn spawn(&mut self, body: Body) -> BodyKey {
        let key = self.bodies.insert(body);
        let grid = &mut self.grid;
        let body = &mut self.bodies[key];
        body.assign_key(key);
        body.refresh_cell_membership(grid);

        log::debug!(
            "Spawned body {:?} at {:?} occupying {} cells",
            key,
            body.position(),
            body.current_cells().len()
        );
        key
    }

    /// Remove a body from the world
    ///
    /// The body's key is evicted from every cell it occupies before the
    /// body is released; no cell ever holds a key for a removed body.
    pub fn despawn(&mut self, key: BodyKey) -> Option<Body> {
        let grid = &mut self.grid;
        let body = self.bodies.get_mut(key)?;
        body.clear_cell_membership(grid);

        log::debug!("Despawned body {:?}", key);
        self.bodies.remove(key)
    }

    /// Advance the whole simulation by one tick
    ///
    /// Every free body integrates motion and resolves vertical collisions
    /// against a snapshot of all bounds taken at tick start, then every
    /// body refreshes its cell membership from its post-motion bounds, and
    /// finally every cell's hook runs. Collision therefore sees neighbor
    /// bounds as they were when the tick began, so the per-body order
    /// cannot change the outcome; membership always reflects this tick's
    /// motion.
    pub fn step(&mut self, dt: f32) {
        self.tick_count += 1;
        let tick = self.tick_count;

        self.snapshot.clear();
        self.snapshot.extend(
            self.bodies
                .iter()
                .map(|(key, body)| (key, body.bounding_volume())),
        );

        let gravity = self.gravity;
        let snapshot = &self.snapshot;
        for (key, body) in &mut self.bodies {
            if body.is_anchored() {
                continue;
            }

            body.integrate(dt, gravity);

            let was_grounded = body.is_grounded();
            let others = snapshot
                .iter()
                .filter(|(other, _)| *other != key)
                .map(|(_, bounds)| bounds);
            let grounded = body.resolve_vertical_collision(others);

            if grounded != was_grounded {
                log::debug!(
                    "Body {:?} {} at tick {}",
                    key,
                    if grounded { "grounded" } else { "airborne" },
                    tick
                );
            }
        }

        let grid = &mut self.grid;
        for body in self.bodies.values_mut() {
            body.refresh_cell_membership(grid);
        }

        self.grid.tick(dt);
        log::trace!("Tick {} complete: {} bodies", tick, self.bodies.len());
    }

    /// Get a body by key
    pub fn body(&self, key: BodyKey) -> Option<&Body> {
        self.bodies.get(key)
    }

    /// Get a body by key, mutably
    ///
    /// Position or velocity changes made through this are picked up by the
    /// next step's collision and membership passes.
    pub fn body_mut(&mut self, key: BodyKey) -> Option<&mut Body> {
        self.bodies.get_mut(key)
    }

    /// Iterate over every body with its key
    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &Body)> {
        self.bodies.iter()
    }

    /// Get the spatial grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Get the number of bodies in the world
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Check whether the world holds no bodies
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Get the number of ticks stepped so far
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Get the configured per-tick gravity impulse
    pub fn gravity(&self) -> f32 {
        self.gravity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::spatial::{Cell, CellIndex};
    use approx::assert_relative_eq;

    fn flat_world() -> (World, BodyKey) {
        // Default lattice spans 320 units per axis from the origin; the
        // plate covers the floor of it with its top face at y = 4.
        let mut world = World::new(WorldConfig::default()).unwrap();
        let plate = world.spawn(Body::anchored(
            Vec3::new(128.0, 2.0, 128.0),
            Vec3::new(128.0, 2.0, 128.0),
        ));
        (world, plate)
    }

    #[test]
    fn test_world_from_default_config() {
        let world = World::new(WorldConfig::default()).unwrap();

        assert!(world.is_empty());
        assert_eq!(world.len(), 0);
        assert_eq!(world.tick_count(), 0);
        assert_eq!(world.grid().len(), 125);
        assert_eq!(world.gravity(), GRAVITY);
    }

    #[test]
    fn test_rejects_invalid_grid_config() {
        let config = WorldConfig {
            grid: GridConfig {
                width: -10.0,
                ..GridConfig::default()
            },
            ..WorldConfig::default()
        };

        assert!(matches!(
            World::new(config),
            Err(GridError::Configuration(_))
        ));
    }

    #[test]
    fn test_spawn_assigns_key_and_indexes() {
        let mut world = World::new(WorldConfig::default()).unwrap();
        let key = world.spawn(Body::new(Vec3::new(32.0, 32.0, 32.0), Vec3::new(8.0, 8.0, 8.0)));

        let body = world.body(key).unwrap();
        assert_eq!(body.key(), key);
        assert!(!body.current_cells().is_empty());
        for index in body.current_cells() {
            assert!(world.grid().cell_at(*index).unwrap().contains(key));
        }
    }

    #[test]
    fn test_despawn_evicts_from_all_cells() {
        let mut world = World::new(WorldConfig::default()).unwrap();
        let key = world.spawn(Body::new(Vec3::new(32.0, 32.0, 32.0), Vec3::new(8.0, 8.0, 8.0)));

        let body = world.despawn(key).unwrap();
        assert!(body.current_cells().is_empty());
        assert!(world.is_empty());
        assert!(world.body(key).is_none());
        assert!(world.grid().cells().all(|cell| !cell.contains(key)));
    }

    #[test]
    fn test_step_applies_gravity_to_free_bodies() {
        let mut world = World::new(WorldConfig::default()).unwrap();
        let key = world.spawn(Body::new(Vec3::new(64.0, 200.0, 64.0), Vec3::new(1.0, 1.0, 1.0)));

        world.step(1.0);
        world.step(1.0);
        world.step(1.0);

        let body = world.body(key).unwrap();
        assert_relative_eq!(body.velocity().y, -3.0 * GRAVITY, epsilon = 1e-6);
        assert!(body.position().y < 200.0);
    }

    #[test]
    fn test_anchored_bodies_never_move() {
        let (mut world, plate) = flat_world();

        for _ in 0..50 {
            world.step(1.0);
        }

        let body = world.body(plate).unwrap();
        assert_eq!(body.position(), Vec3::new(128.0, 2.0, 128.0));
        assert_eq!(body.velocity(), Vec3::zeros());
        assert!(!body.is_grounded());
    }

    #[test]
    fn test_anchored_plate_occupies_every_overlapping_cell() {
        let (world, plate) = flat_world();
        let bounds = world.body(plate).unwrap().bounding_volume();

        // The plate's footprint spans the whole 5x5 floor of the lattice,
        // including the row of cells it only touches at x = 256 or z = 256.
        let mut expected: Vec<CellIndex> = world
            .grid()
            .cells()
            .filter(|cell| cell.bounds().intersects(&bounds))
            .map(Cell::index)
            .collect();
        expected.sort();
        assert_eq!(expected.len(), 25);

        let mut occupied = world.body(plate).unwrap().current_cells().to_vec();
        occupied.sort();
        assert_eq!(occupied, expected);
    }

    #[test]
    fn test_falling_body_lands_and_stays() {
        let (mut world, _plate) = flat_world();
        let block = world.spawn(Body::new(Vec3::new(64.0, 30.0, 64.0), Vec3::new(2.0, 2.0, 2.0)));

        for _ in 0..500 {
            world.step(1.0);
            // The plate's top face is at y = 4; the block never ends a tick
            // sunk into it.
            let bottom = world.body(block).unwrap().bounding_volume().min.y;
            assert!(bottom >= 4.0 - 1e-3, "block sank to {}", bottom);
        }

        let body = world.body(block).unwrap();
        assert!(body.is_grounded());
        assert_eq!(body.velocity().y, 0.0);
        assert_relative_eq!(body.bounding_volume().min.y, 4.0, epsilon = 1e-3);
    }

    #[test]
    fn test_grounded_released_when_support_despawned() {
        let (mut world, plate) = flat_world();
        let block = world.spawn(Body::new(Vec3::new(64.0, 10.0, 64.0), Vec3::new(2.0, 2.0, 2.0)));

        for _ in 0..200 {
            world.step(1.0);
        }
        assert!(world.body(block).unwrap().is_grounded());

        world.despawn(plate);
        world.step(1.0);

        let body = world.body(block).unwrap();
        assert!(!body.is_grounded());
        assert!(body.velocity().y < 0.0);
    }

    #[test]
    fn test_step_ticks_every_cell() {
        let mut world = World::new(WorldConfig::default()).unwrap();

        world.step(1.0);
        world.step(1.0);

        assert!(world.grid().cells().all(|cell| cell.tick_count() == 2));
        assert_eq!(world.tick_count(), 2);
    }

    #[test]
    fn test_bodies_iterator() {
        let mut world = World::new(WorldConfig::default()).unwrap();
        world.spawn(Body::new(Vec3::new(16.0, 16.0, 16.0), Vec3::new(1.0, 1.0, 1.0)));
        world.spawn(Body::new(Vec3::new(48.0, 16.0, 16.0), Vec3::new(1.0, 1.0, 1.0)));

        assert_eq!(world.bodies().count(), 2);
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn test_config_round_trips_toml() {
        let config = WorldConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let restored: WorldConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(restored.gravity, config.gravity);
        assert_eq!(restored.grid.width, config.grid.width);
        assert_eq!(restored.grid.cell_size, config.grid.cell_size);
        assert_eq!(restored.grid.origin, config.grid.origin);
        assert_eq!(restored.grid.scan, config.grid.scan);
    }

    #[test]
    fn test_config_round_trips_ron() {
        let config = WorldConfig::default();
        let serialized = ron::to_string(&config).unwrap();
        let restored: WorldConfig = ron::from_str(&serialized).unwrap();

        assert_eq!(restored.gravity, config.gravity);
        assert_eq!(restored.grid.cell_size, config.grid.cell_size);
    }

    #[test]
    fn test_config_load_or_default_on_missing_file() {
        let path = std::env::temp_dir().join(format!(
            "block_engine_missing_{}.toml",
            std::process::id()
        ));
        let config = WorldConfig::load_or_default(path.to_str().unwrap());

        assert_eq!(config.gravity, GRAVITY);
        assert_eq!(config.grid.width, GridConfig::default().width);
    }
}
