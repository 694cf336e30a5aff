//! Square brush painting

use super::grid::Grid;
use super::material::Material;

/// Overwrite the square brush centered at `(center_x, center_y)` with `material`
///
/// The brush covers offsets `[-size/2, size/2)` on both axes using truncating
/// division, so odd sizes lose their last row and column and a size of 1
/// paints nothing. Cells outside the grid are skipped, never clamped.
///
/// Returns the number of cells written.
pub fn paint(grid: &mut Grid, center_x: i32, center_y: i32, size: i32, material: Material) -> usize {
    let half = size / 2;
    let mut written = 0;

    for dx in -half..half {
        for dy in -half..half {
            let x = center_x.saturating_add(dx);
            let y = center_y.saturating_add(dy);
            if grid.set(x, y, material) {
                written += 1;
            }
        }
    }

    written
}
