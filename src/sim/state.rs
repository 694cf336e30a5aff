//! Simulation state and per-frame driving
//!
//! The frame loop owns one `Simulation` for the lifetime of the process and
//! feeds it a `FrameInput` plus the elapsed time every frame.

use glam::IVec2;
use rand_pcg::Pcg32;

use super::coin;
use super::grid::Grid;
use super::material::Material;
use super::paint::paint;
use super::step::step;
use crate::settings::Settings;

/// Input gathered by the frame loop for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Pointer position in grid cells (None when the pointer is unknown)
    pub pointer: Option<IVec2>,
    /// Primary button held: paint the selected material
    pub paint_primary: bool,
    /// Secondary button held: paint the secondary material
    pub paint_secondary: bool,
    /// Material chosen this frame (digit keys)
    pub select: Option<Material>,
    /// Wipe the grid
    pub clear: bool,
}

/// What happened during one `Simulation::frame` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Cells overwritten by the brush
    pub painted: usize,
    /// Whether a physics tick ran
    pub ticked: bool,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct Simulation {
    /// The cell grid
    pub grid: Grid,
    /// Seconds of simulated time owed to the stepper
    pub accumulator: f32,
    /// Material painted by the primary button
    pub selected: Material,
    /// Material painted by the secondary button
    pub secondary: Material,
    /// Brush side length in cells
    pub brush_size: i32,
    /// Fixed physics timestep in seconds
    pub timestep: f32,
    /// Physics ticks run so far
    pub ticks: u64,
    /// Seed the tie-break RNG was created from
    pub seed: u64,
    rng: Pcg32,
}

impl Simulation {
    /// Create an all-empty simulation from settings and a seed
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            grid: Grid::new(settings.grid_width, settings.grid_height),
            accumulator: 0.0,
            selected: settings.initial_material,
            secondary: settings.right_button_material,
            brush_size: settings.brush_size as i32,
            timestep: settings.timestep(),
            ticks: 0,
            seed,
            rng: coin::seeded(seed),
        }
    }

    /// Add elapsed time and run at most one physics tick
    ///
    /// The accumulator is decremented by one timestep, keeping the remainder.
    /// No catch-up loop: under slow frames the simulation falls behind real
    /// time and drains the backlog one tick per frame.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.accumulator += dt;
        if self.accumulator >= self.timestep {
            self.accumulator -= self.timestep;
            step(&mut self.grid, &mut self.rng);
            self.ticks += 1;
            true
        } else {
            false
        }
    }

    /// Apply one frame of input, then advance physics
    pub fn frame(&mut self, dt: f32, input: &FrameInput) -> FrameOutcome {
        if let Some(material) = input.select {
            if material != self.selected {
                log::debug!("Selected {}", material.name());
            }
            self.selected = material;
        }

        if input.clear {
            self.reset();
            log::debug!("Grid cleared");
        }

        let mut painted = 0;
        if let Some(cell) = input.pointer {
            if input.paint_primary {
                painted += self.paint_at(cell, self.selected);
            }
            if input.paint_secondary {
                painted += self.paint_at(cell, self.secondary);
            }
        }

        let ticked = self.advance(dt);
        FrameOutcome { painted, ticked }
    }

    /// Paint the current brush at a grid cell
    pub fn paint_at(&mut self, cell: IVec2, material: Material) -> usize {
        paint(&mut self.grid, cell.x, cell.y, self.brush_size, material)
    }

    /// Reset grid, accumulator and tick count, keeping the RNG stream
    pub fn reset(&mut self) {
        self.grid.clear();
        self.accumulator = 0.0;
        self.ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PHYSICS_DT;

    fn small_settings() -> Settings {
        Settings {
            grid_width: 10,
            grid_height: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_simulation_is_empty() {
        let sim = Simulation::new(&Settings::default(), 1);
        assert_eq!(sim.accumulator, 0.0);
        assert_eq!(sim.ticks, 0);
        assert_eq!(sim.selected, Material::Sand);
        assert_eq!(sim.secondary, Material::Water);
        assert_eq!(
            sim.grid.count(Material::Empty),
            (sim.grid.width() * sim.grid.height()) as usize
        );
    }

    #[test]
    fn test_four_short_frames_make_one_tick() {
        let mut sim = Simulation::new(&small_settings(), 1);
        assert_eq!(sim.timestep, PHYSICS_DT);

        let ticks: Vec<bool> = (0..4).map(|_| sim.advance(0.005)).collect();
        assert_eq!(ticks, vec![false, false, false, true]);
        assert_eq!(sim.ticks, 1);
        assert!(sim.accumulator.abs() < 1e-6);
    }

    #[test]
    fn test_remainder_carries_over() {
        let mut sim = Simulation::new(&small_settings(), 1);
        assert!(sim.advance(0.03));
        assert!((sim.accumulator - 0.01).abs() < 1e-6);
        assert!(!sim.advance(0.005));
        assert!(sim.advance(0.008));
        assert_eq!(sim.ticks, 2);
    }

    #[test]
    fn test_no_catch_up_on_long_frame() {
        let mut sim = Simulation::new(&small_settings(), 1);
        // A quarter-second frame still runs a single tick
        assert!(sim.advance(0.25));
        assert_eq!(sim.ticks, 1);
        assert!((sim.accumulator - 0.23).abs() < 1e-5);
        // The backlog drains one tick per frame
        assert!(sim.advance(0.0));
        assert_eq!(sim.ticks, 2);
    }

    #[test]
    fn test_frame_paints_then_steps() {
        let mut sim = Simulation::new(&small_settings(), 1);
        let input = FrameInput {
            pointer: Some(IVec2::new(5, 2)),
            paint_primary: true,
            ..Default::default()
        };
        let out = sim.frame(PHYSICS_DT, &input);
        assert_eq!(out, FrameOutcome { painted: 16, ticked: true });
        assert_eq!(sim.grid.count(Material::Sand), 16);
        // The 4x4 block at rows 0..4 fell one row
        assert_eq!(sim.grid.get(5, 0), Some(Material::Empty));
        assert_eq!(sim.grid.get(5, 4), Some(Material::Sand));
    }

    #[test]
    fn test_secondary_button_paints_water() {
        let mut sim = Simulation::new(&small_settings(), 1);
        let input = FrameInput {
            pointer: Some(IVec2::new(5, 8)),
            paint_secondary: true,
            ..Default::default()
        };
        let out = sim.frame(0.0, &input);
        assert!(!out.ticked);
        assert_eq!(sim.grid.count(Material::Water), 16);
    }

    #[test]
    fn test_select_then_paint_uses_new_material() {
        let mut sim = Simulation::new(&small_settings(), 1);
        let input = FrameInput {
            pointer: Some(IVec2::new(5, 5)),
            paint_primary: true,
            select: Some(Material::Stone),
            ..Default::default()
        };
        sim.frame(0.0, &input);
        assert_eq!(sim.selected, Material::Stone);
        assert_eq!(sim.grid.count(Material::Stone), 16);
    }

    #[test]
    fn test_paint_without_pointer_is_noop() {
        let mut sim = Simulation::new(&small_settings(), 1);
        let input = FrameInput {
            paint_primary: true,
            ..Default::default()
        };
        assert_eq!(sim.frame(0.0, &input).painted, 0);
    }

    #[test]
    fn test_clear_input_resets_simulation() {
        let mut sim = Simulation::new(&small_settings(), 1);
        sim.paint_at(IVec2::new(3, 3), Material::Stone);
        sim.advance(0.05);
        assert_eq!(sim.ticks, 1);

        // Clearing drops the owed time too, so no tick runs this frame
        let out = sim.frame(0.01, &FrameInput { clear: true, ..Default::default() });
        assert!(!out.ticked);
        assert_eq!(sim.grid.count(Material::Stone), 0);
        assert_eq!(sim.ticks, 0);
        assert!((sim.accumulator - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let run = |seed| {
            let mut sim = Simulation::new(&small_settings(), seed);
            let pour = FrameInput {
                pointer: Some(IVec2::new(5, 1)),
                paint_primary: true,
                ..Default::default()
            };
            for i in 0..40 {
                let input = if i < 10 { pour.clone() } else { FrameInput::default() };
                sim.frame(PHYSICS_DT, &input);
            }
            sim.grid.to_string()
        };
        assert_eq!(run(99), run(99));
    }
}
