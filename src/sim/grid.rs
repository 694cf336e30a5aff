//! Fixed-size cell grid
//!
//! Cells are stored row-major in one flat `Vec`. `index` is the only place
//! the bounds invariant is checked; everything else goes through it.

use std::fmt;

use super::material::Material;
use crate::consts::MAX_GRID_SIZE;

/// A fixed-size 2D grid of materials, `y` growing downward
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Material>,
}

impl Grid {
    /// Create a grid with every cell `Empty`
    ///
    /// Dimensions are clamped to `1..=MAX_GRID_SIZE` cells per axis.
    pub fn new(width: u32, height: u32) -> Self {
        if width > MAX_GRID_SIZE || height > MAX_GRID_SIZE {
            log::warn!("Grid {}x{} too large, clamping to {}", width, height, MAX_GRID_SIZE);
        }
        let width = width.clamp(1, MAX_GRID_SIZE) as i32;
        let height = height.clamp(1, MAX_GRID_SIZE) as i32;
        Self {
            width,
            height,
            cells: vec![Material::Empty; width as usize * height as usize],
        }
    }

    /// Build a grid from rows of material symbols (see [`Material::symbol`])
    ///
    /// Returns `None` for no rows, ragged rows or unknown symbols.
    pub fn from_ascii(rows: &[&str]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.chars().count();
        if width == 0 {
            return None;
        }

        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            if row.chars().count() != width {
                return None;
            }
            for c in row.chars() {
                cells.push(Material::from_symbol(c)?);
            }
        }

        Some(Self {
            width: width as i32,
            height: height as i32,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Material at `(x, y)`, or `None` outside the grid
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Material> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Overwrite `(x, y)`; returns `false` (and writes nothing) outside the grid
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, material: Material) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = material;
                true
            }
            None => false,
        }
    }

    /// True when `(x, y)` is inside the grid and holds `Empty`
    #[inline]
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(Material::is_empty)
    }

    /// Exchange two cells; both must be in bounds
    pub fn swap(&mut self, a: (i32, i32), b: (i32, i32)) -> bool {
        match (self.index(a.0, a.1), self.index(b.0, b.1)) {
            (Some(i), Some(j)) => {
                self.cells.swap(i, j);
                true
            }
            _ => false,
        }
    }

    /// Reset every cell to `Empty`
    pub fn clear(&mut self) {
        self.cells.fill(Material::Empty);
    }

    /// Number of cells holding `material`
    pub fn count(&self, material: Material) -> usize {
        self.cells.iter().filter(|&&m| m == material).count()
    }

    /// Iterate `(x, y, material)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, Material)> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &m)| ((i % width) as i32, (i / width) as i32, m))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width as usize) {
            let line: String = row.iter().map(Material::symbol).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
