//! Cell materials
//!
//! A cell carries nothing but its material: no velocity, age or identity.

use serde::{Deserialize, Serialize};

/// The material occupying a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Material {
    /// Absence of material, never inspected by the stepper
    #[default]
    Empty,
    /// Falls straight down, then diagonally; sinks through water
    Sand,
    /// Falls straight down, then diagonally, then spreads sideways
    Water,
    /// Immovable
    Stone,
}

impl Material {
    /// Every material, in digit-key order
    pub const ALL: [Material; 4] = [
        Material::Empty,
        Material::Sand,
        Material::Water,
        Material::Stone,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Material::Empty => "Empty",
            Material::Sand => "Sand",
            Material::Water => "Water",
            Material::Stone => "Stone",
        }
    }

    /// Material bound to a number key (0 erases)
    pub fn from_digit(c: char) -> Option<Self> {
        match c {
            '0' => Some(Material::Empty),
            '1' => Some(Material::Sand),
            '2' => Some(Material::Water),
            '3' => Some(Material::Stone),
            _ => None,
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Material::Empty
    }

    /// Single-character form used by the ASCII grid dump
    pub fn symbol(&self) -> char {
        match self {
            Material::Empty => '.',
            Material::Sand => 's',
            Material::Water => '~',
            Material::Stone => '#',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '.' | ' ' => Some(Material::Empty),
            's' => Some(Material::Sand),
            '~' => Some(Material::Water),
            '#' => Some(Material::Stone),
            _ => None,
        }
    }
}
