//! Deterministic falling sand simulation
//!
//! All cell logic lives here. This module must stay pure:
//! - Fixed timestep only
//! - Seeded coin flips only
//! - Bottom-to-top, left-to-right scan order
//! - No rendering or platform dependencies

pub mod coin;
pub mod grid;
pub mod material;
pub mod paint;
pub mod state;
pub mod step;

pub use coin::{AlternatingCoin, CoinFlip, FixedCoin};
pub use grid::Grid;
pub use material::Material;
pub use paint::paint;
pub use state::{FrameInput, FrameOutcome, Simulation};
pub use step::step;
