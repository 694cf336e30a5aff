//! Uniform boolean source for movement tie-breaks
//!
//! The stepper never touches an RNG directly. Production code flips a seeded
//! `Pcg32`; tests plug in a fixed or alternating coin to get exact outcomes.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A fair two-way choice. `true` means "go west".
pub trait CoinFlip {
    fn flip(&mut self) -> bool;
}

impl CoinFlip for Pcg32 {
    #[inline]
    fn flip(&mut self) -> bool {
        self.random_bool(0.5)
    }
}

/// Seeded production coin
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Always lands the same way
#[derive(Debug, Clone, Copy)]
pub struct FixedCoin(pub bool);

impl CoinFlip for FixedCoin {
    #[inline]
    fn flip(&mut self) -> bool {
        self.0
    }
}

/// Alternates west/east, starting with `next`; counts flips
#[derive(Debug, Clone, Default)]
pub struct AlternatingCoin {
    pub next: bool,
    pub flips: u32,
}

impl CoinFlip for AlternatingCoin {
    fn flip(&mut self) -> bool {
        let out = self.next;
        self.next = !self.next;
        self.flips += 1;
        out
    }
}
