//! One physics tick over the whole grid
//!
//! Scan order matters. Rows go bottom to top and columns left to right,
//! mutating a single buffer in place. A cell that falls lands on a row that
//! was already scanned, so it moves at most one row per tick. Water that
//! spreads east lands on a column that is still ahead in the row scan and
//! is visited again in the same tick.

use super::coin::CoinFlip;
use super::grid::Grid;
use super::material::Material;

/// Advance `grid` by exactly one tick
pub fn step<C: CoinFlip + ?Sized>(grid: &mut Grid, coin: &mut C) {
    for y in (0..grid.height()).rev() {
        for x in 0..grid.width() {
            if grid.get(x, y) == Some(Material::Sand) {
                step_sand(grid, x, y, coin);
            }
            // Also catches water that sinking sand just pushed up into this cell
            if grid.get(x, y) == Some(Material::Water) {
                step_water(grid, x, y, coin);
            }
            // Stone never moves; Empty is never inspected
        }
    }
}

fn step_sand<C: CoinFlip + ?Sized>(grid: &mut Grid, x: i32, y: i32, coin: &mut C) {
    let below = y + 1;
    match grid.get(x, below) {
        // Bottom row
        None => {}
        Some(Material::Empty) => relocate(grid, (x, y), (x, below)),
        // Sink through water
        Some(Material::Water) => {
            grid.swap((x, y), (x, below));
        }
        Some(Material::Sand) | Some(Material::Stone) => {
            let west = grid.is_open(x - 1, below);
            let east = grid.is_open(x + 1, below);
            if let Some(dx) = pick_side(west, east, coin) {
                relocate(grid, (x, y), (x + dx, below));
            }
        }
    }
}

fn step_water<C: CoinFlip + ?Sized>(grid: &mut Grid, x: i32, y: i32, coin: &mut C) {
    let below = y + 1;
    if grid.is_open(x, below) {
        relocate(grid, (x, y), (x, below));
        return;
    }

    let west = grid.is_open(x - 1, below);
    let east = grid.is_open(x + 1, below);
    if let Some(dx) = pick_side(west, east, coin) {
        relocate(grid, (x, y), (x + dx, below));
        return;
    }

    // Diagonals are not retried after a sideways move
    let west = grid.is_open(x - 1, y);
    let east = grid.is_open(x + 1, y);
    if let Some(dx) = pick_side(west, east, coin) {
        relocate(grid, (x, y), (x + dx, y));
    }
}

/// Column offset to move toward, flipping the coin only when both sides are open
#[inline]
fn pick_side<C: CoinFlip + ?Sized>(west: bool, east: bool, coin: &mut C) -> Option<i32> {
    match (west, east) {
        (true, true) => Some(if coin.flip() { -1 } else { 1 }),
        (true, false) => Some(-1),
        (false, true) => Some(1),
        (false, false) => None,
    }
}

/// Move the material at `from` into the empty cell `to`
#[inline]
fn relocate(grid: &mut Grid, from: (i32, i32), to: (i32, i32)) {
    grid.swap(from, to);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::coin::{AlternatingCoin, FixedCoin, seeded};
    use proptest::prelude::*;

    const WEST: FixedCoin = FixedCoin(true);
    const EAST: FixedCoin = FixedCoin(false);

    fn grid(rows: &[&str]) -> Grid {
        Grid::from_ascii(rows).expect("valid test grid")
    }

    fn stepped(rows: &[&str], mut coin: impl CoinFlip) -> String {
        let mut g = grid(rows);
        step(&mut g, &mut coin);
        g.to_string()
    }

    #[test]
    fn test_sand_falls_one_row() {
        let out = stepped(&["...", ".s.", "..."], WEST);
        assert_eq!(out, "...\n...\n.s.\n");
    }

    #[test]
    fn test_sand_falls_one_row_per_tick_only() {
        let mut g = grid(&["s", ".", ".", ".", "."]);
        let mut coin = WEST;
        step(&mut g, &mut coin);
        assert_eq!(g.get(0, 1), Some(Material::Sand));
        assert_eq!(g.count(Material::Sand), 1);
    }

    #[test]
    fn test_sand_stack_falls_together() {
        let out = stepped(&["s", "s", ".", "."], WEST);
        assert_eq!(out, ".\ns\ns\n.\n");
    }

    #[test]
    fn test_sand_rests_on_bottom_row() {
        let out = stepped(&["...", "...", "s.."], WEST);
        assert_eq!(out, "...\n...\ns..\n");
    }

    #[test]
    fn test_sand_sinks_through_water() {
        let out = stepped(&["s", "~"], WEST);
        assert_eq!(out, "~\ns\n");
    }

    #[test]
    fn test_sand_swaps_with_walled_water() {
        // Displaced water flows on in the same visit
        let out = stepped(&["...", ".s.", "#~#"], WEST);
        assert_eq!(out, "...\n~..\n#s#\n");
    }

    #[test]
    fn test_displaced_water_spreads_over_stone_floor() {
        let out = stepped(&["...", ".s.", "#~#", "###"], WEST);
        assert_eq!(out, "...\n~..\n#s#\n###\n");
    }

    #[test]
    fn test_displaced_water_falls_diagonally() {
        // Water pushed up by the sand finds the open south-east cell
        let out = stepped(&[".s.", "#~.", "###"], WEST);
        assert_eq!(out, "...\n#s~\n###\n");
    }

    #[test]
    fn test_sand_slides_diagonally_with_coin() {
        assert_eq!(stepped(&["...", ".s.", ".s."], WEST), "...\n...\nss.\n");
        assert_eq!(stepped(&["...", ".s.", ".s."], EAST), "...\n...\n.ss\n");
    }

    #[test]
    fn test_sand_takes_only_open_diagonal() {
        // Coin says west but west is blocked
        assert_eq!(stepped(&[".s.", "##."], WEST), "...\n##s\n");
        assert_eq!(stepped(&[".s.", ".##"], EAST), "...\ns##\n");
    }

    #[test]
    fn test_sand_blocked_stays() {
        assert_eq!(stepped(&[".s.", "###"], WEST), ".s.\n###\n");
        assert_eq!(stepped(&["s", "#"], WEST), "s\n#\n");
    }

    #[test]
    fn test_sand_does_not_slide_into_water_diagonally() {
        assert_eq!(stepped(&[".s.", "~#~"], WEST), ".s.\n~#~\n");
    }

    #[test]
    fn test_sand_at_edge_only_checks_in_bounds_diagonal() {
        assert_eq!(stepped(&["s.", "#."], WEST), "..\n#s\n");
    }

    #[test]
    fn test_water_falls() {
        assert_eq!(stepped(&["~", "."], WEST), ".\n~\n");
    }

    #[test]
    fn test_water_does_not_fall_into_sand() {
        assert_eq!(stepped(&["~", "s"], WEST), "~\ns\n");
    }

    #[test]
    fn test_water_prefers_diagonal_over_sideways() {
        assert_eq!(stepped(&[".~.", "##."], WEST), "...\n##~\n");
    }

    #[test]
    fn test_water_diagonal_tie_break() {
        assert_eq!(stepped(&[".~.", ".#."], WEST), "...\n~#.\n");
        assert_eq!(stepped(&[".~.", ".#."], EAST), "...\n.#~\n");
    }

    #[test]
    fn test_water_spreads_west() {
        let out = stepped(&[".~#", "###"], EAST);
        assert_eq!(out, "~.#\n###\n");
    }

    #[test]
    fn test_water_blocked_stays() {
        assert_eq!(stepped(&["#~#", "###"], WEST), "#~#\n###\n");
        assert_eq!(stepped(&["~"], WEST), "~\n");
    }

    #[test]
    fn test_water_spread_east_is_revisited_in_same_tick() {
        // Each eastward move lands on a column the row scan has not reached
        let out = stepped(&["~...", "####"], EAST);
        assert_eq!(out, "..~.\n####\n");
    }

    #[test]
    fn test_one_flip_per_ambiguous_move() {
        let mut g = grid(&["~...", "####"]);
        let mut coin = AlternatingCoin::default();
        step(&mut g, &mut coin);
        // x=0: only east open, no flip. x=1: both open, east. x=2: both open, west.
        assert_eq!(coin.flips, 2);
        assert_eq!(g.to_string(), ".~..\n####\n");
    }

    #[test]
    fn test_water_on_bottom_row_spreads_and_bounces() {
        // East twice, then back west off the wall within one tick
        assert_eq!(stepped(&["...", "~.."], EAST), "...\n.~.\n");
    }

    #[test]
    fn test_stone_never_moves() {
        let rows = ["#..", "...", "..."];
        assert_eq!(stepped(&rows, WEST), "#..\n...\n...\n");
    }

    #[test]
    fn test_water_pools_on_floor() {
        let mut g = Grid::new(7, 4);
        g.set(3, 0, Material::Water);
        g.set(3, 1, Material::Water);
        g.set(3, 2, Material::Water);
        let mut coin = seeded(3);
        for _ in 0..50 {
            step(&mut g, &mut coin);
        }
        assert_eq!(g.count(Material::Water), 3);
        for x in 0..7 {
            assert_ne!(g.get(x, 0), Some(Material::Water));
        }
    }

    fn material() -> impl Strategy<Value = Material> {
        prop::sample::select(Material::ALL.to_vec())
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (1u32..12, 1u32..12)
            .prop_flat_map(|(w, h)| {
                (
                    Just(w),
                    Just(h),
                    prop::collection::vec(material(), (w * h) as usize),
                )
            })
            .prop_map(|(w, h, cells)| {
                let mut g = Grid::new(w, h);
                for (i, m) in cells.into_iter().enumerate() {
                    g.set(i as i32 % w as i32, i as i32 / w as i32, m);
                }
                g
            })
    }

    proptest! {
        #[test]
        fn prop_step_conserves_every_material(g in arb_grid(), seed in any::<u64>()) {
            let mut after = g.clone();
            step(&mut after, &mut seeded(seed));
            for m in Material::ALL {
                prop_assert_eq!(g.count(m), after.count(m));
            }
        }

        #[test]
        fn prop_step_conserves_with_fixed_coin(g in arb_grid(), west in any::<bool>()) {
            let mut after = g.clone();
            step(&mut after, &mut FixedCoin(west));
            for m in Material::ALL {
                prop_assert_eq!(g.count(m), after.count(m));
            }
        }

        #[test]
        fn prop_stone_is_invariant(g in arb_grid(), seed in any::<u64>(), ticks in 1usize..20) {
            let stones: Vec<_> = g.iter().filter(|(_, _, m)| *m == Material::Stone).collect();
            let mut after = g.clone();
            let mut coin = seeded(seed);
            for _ in 0..ticks {
                step(&mut after, &mut coin);
            }
            let stones_after: Vec<_> = after.iter().filter(|(_, _, m)| *m == Material::Stone).collect();
            prop_assert_eq!(stones, stones_after);
        }
    }
}
