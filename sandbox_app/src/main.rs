//! Sandbox simulation demo
//!
//! Headless driver for the block engine: drops a handful of blocks onto an
//! anchored baseplate and logs how they settle into the grid.

use block_engine::foundation::logging;
use block_engine::prelude::*;

const TICKS: u64 = 600;
const DT: f32 = 1.0;

struct SandboxApp {
    world: World,
    timer: Timer,
    blocks: Vec<(&'static str, BodyKey)>,
    slider: BodyKey,
}

impl SandboxApp {
    fn new(config: WorldConfig) -> Result<Self, GridError> {
        let mut world = World::new(config)?;

        // Anchored baseplate covering the whole lattice floor.
        world.spawn(Body::anchored(
            Vec3::new(128.0, 2.0, 128.0),
            Vec3::new(128.0, 2.0, 128.0),
        ));

        let mut blocks = Vec::new();
        blocks.push((
            "crate",
            world.spawn(Body::new(
                Vec3::new(96.0, 40.0, 96.0),
                Vec3::new(2.0, 2.0, 2.0),
            )),
        ));
        blocks.push((
            "boulder",
            world.spawn(Body::new(
                Vec3::new(160.0, 80.0, 160.0),
                Vec3::new(4.0, 4.0, 4.0),
            )),
        ));

        let slider = world.spawn(Body::new(
            Vec3::new(48.0, 30.0, 128.0),
            Vec3::new(2.0, 2.0, 2.0),
        ));
        if let Some(body) = world.body_mut(slider) {
            body.set_velocity(Vec3::new(1.5, 0.0, 0.0));
        }
        blocks.push(("slider", slider));

        let grid = world.grid();
        log::info!(
            "Arena spans {:.0} units per axis from ({:.0}, {:.0}, {:.0})",
            grid.cell_size() * grid.cells_per_axis() as f32,
            grid.origin().x,
            grid.origin().y,
            grid.origin().z
        );

        Ok(Self {
            world,
            timer: Timer::new(),
            blocks,
            slider,
        })
    }

    fn run(&mut self) {
        for tick in 1..=TICKS {
            self.world.step(DT);
            self.timer.update();

            // Bleed off the slider's horizontal speed once it lands.
            if self.world.body(self.slider).map_or(false, Body::is_grounded) {
                if let Some(body) = self.world.body_mut(self.slider) {
                    body.damp_horizontal(0.75);
                }
            }

            // Shove the settled slider sideways partway through the run.
            if tick == 240 {
                if let Some(body) = self.world.body_mut(self.slider) {
                    body.add_velocity(Vec3::new(0.0, 0.0, 1.0));
                }
            }

            if tick % 60 == 0 {
                self.log_status(tick);
            }
        }

        let occupied = self
            .world
            .grid()
            .cells()
            .filter(|cell| !cell.is_empty())
            .count();
        log::info!(
            "Simulation done: {} ticks, {} of {} cells occupied, {:.0} ticks/s",
            self.world.tick_count(),
            occupied,
            self.world.grid().len(),
            self.timer.average_tick_rate()
        );
        self.log_slider_neighbors();
    }

    /// Neighbor lookup through the grid: every body sharing a cell with
    /// the slider at the end of the run.
    fn log_slider_neighbors(&self) {
        if let Some(body) = self.world.body(self.slider) {
            let mut neighbors: Vec<BodyKey> = Vec::new();
            for &index in body.current_cells() {
                if let Ok(cell) = self.world.grid().cell_at(index) {
                    for key in cell.members() {
                        if key != self.slider && !neighbors.contains(&key) {
                            neighbors.push(key);
                        }
                    }
                }
            }
            log::info!("Slider shares cells with {} other bodies", neighbors.len());
        }
    }

    fn log_status(&self, tick: u64) {
        for (name, key) in &self.blocks {
            if let Some(body) = self.world.body(*key) {
                log::info!(
                    "[{:>4}] {:<8} y {:7.2}  vy {:6.3}  grounded {:<5}  cells {}",
                    tick,
                    name,
                    body.position().y,
                    body.velocity().y,
                    body.is_grounded(),
                    body.current_cells().len()
                );
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_default("info");

    log::info!("Starting sandbox demo");
    let config = WorldConfig::load_or_default("world.toml");
    let mut app = SandboxApp::new(config)?;
    app.run();

    log::info!("Sandbox demo completed successfully");
    Ok(())
}
