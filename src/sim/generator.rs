//! Obstacle field generation
//!
//! Obstacles are laid out on every second line across the travel axis,
//! starting three lines in from the start side and stopping five lines short
//! of the goal side. Each line gets a level-dependent number of random
//! columns; duplicates collapse, so dense levels rarely fill a line.

use std::collections::{BTreeSet, HashMap, HashSet};

use glam::IVec2;
use rand::Rng;

use super::grid::{Cell, GridSize, Orientation};
use super::state::Obstacle;
use crate::consts::{FIRST_LINE, GOAL_END_RESERVE, OBSTACLE_DENSITY};

/// Chance of an extra obstacle on the first column (level 1)
const LOW_BORDER_CHANCE: f32 = 0.2;
/// Draws at or above this add an extra obstacle on the last column (level 1)
const HIGH_BORDER_THRESHOLD: f32 = 0.8;

/// Generate obstacle cells for a new game
///
/// Deterministic for a given RNG state. Never places an obstacle on the
/// start cell or inside the goal.
pub fn generate<R: Rng + ?Sized>(size: GridSize, level: u32, rng: &mut R) -> HashSet<Cell> {
    let level = if level == 0 {
        log::warn!("Level 0 requested, generating level 1");
        1
    } else {
        level
    };
    let orientation = size.orientation();
    let last_line = size.long_extent() - GOAL_END_RESERVE;
    let line_width = size.short_extent() - 2;
    let per_line = obstacles_per_line(line_width, level);

    log::debug!(
        "Generating field {}x{} level {}: lines {}..={} width {} per line {}",
        size.width,
        size.height,
        level,
        FIRST_LINE,
        last_line,
        line_width,
        per_line
    );

    let mut cells = HashSet::new();
    // Ordered so that the same draws always yield the same insertion order
    let mut columns = BTreeSet::new();

    for line in (FIRST_LINE..=last_line).step_by(2) {
        columns.clear();
        for _ in 0..per_line {
            columns.insert(rng.random_range(1..=line_width));
        }

        let (low, high) = border_columns(level, rng);
        if low {
            columns.insert(1);
        }
        if high {
            columns.insert(line_width);
        }

        cells.extend(columns.iter().map(|&column| to_cell(orientation, line, column)));
    }

    cells
}

/// Generate a full set of hidden obstacles keyed by cell
pub fn generate_obstacles<R: Rng + ?Sized>(
    size: GridSize,
    level: u32,
    rng: &mut R,
) -> HashMap<Cell, Obstacle> {
    generate(size, level, rng)
        .into_iter()
        .map(|cell| (cell, Obstacle::new(cell)))
        .collect()
}

/// Number of random draws per line
pub fn obstacles_per_line(line_width: i32, level: u32) -> u32 {
    (OBSTACLE_DENSITY * line_width as f64 * level as f64) as u32
}

/// Extra edge obstacles for the easiest level, so the outer lanes are not
/// free highways. Two independent draws; consumes no randomness above level 1.
fn border_columns<R: Rng + ?Sized>(level: u32, rng: &mut R) -> (bool, bool) {
    if level != 1 {
        return (false, false);
    }
    let low = rng.random::<f32>() < LOW_BORDER_CHANCE;
    let high = rng.random::<f32>() >= HIGH_BORDER_THRESHOLD;
    (low, high)
}

fn to_cell(orientation: Orientation, line: i32, column: i32) -> Cell {
    match orientation {
        Orientation::Portrait => IVec2::new(column, line),
        Orientation::Landscape => IVec2::new(line, column),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::START_CELL;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng(seed: u64) -> Pcg32 {
        Pcg32::seed_from_u64(seed)
    }

    #[test]
    fn test_obstacles_per_line() {
        assert_eq!(obstacles_per_line(10, 1), 3);
        assert_eq!(obstacles_per_line(10, 2), 6);
        assert_eq!(obstacles_per_line(12, 3), 10);
        assert_eq!(obstacles_per_line(3, 1), 0);
    }

    #[test]
    fn test_portrait_lines_are_rows() {
        let size = GridSize::new(12, 23).unwrap();
        let cells = generate(size, 2, &mut rng(7));
        assert!(!cells.is_empty());
        for cell in &cells {
            // Rows 3, 5, ..., 17 (23 - 5 = 18 is the last allowed, even rows skipped)
            assert!(cell.y >= 3 && cell.y <= 18 && cell.y % 2 == 1, "{cell}");
            assert!(cell.x >= 1 && cell.x <= 10, "{cell}");
        }
    }

    #[test]
    fn test_landscape_lines_are_columns() {
        let size = GridSize::new(23, 12).unwrap();
        let cells = generate(size, 2, &mut rng(7));
        assert!(!cells.is_empty());
        for cell in &cells {
            assert!(cell.x >= 3 && cell.x <= 18 && cell.x % 2 == 1, "{cell}");
            assert!(cell.y >= 1 && cell.y <= 10, "{cell}");
        }
    }

    #[test]
    fn test_level_one_border_draws_consume_rng() {
        let mut a = rng(3);
        let mut b = rng(3);
        let _ = border_columns(1, &mut a);
        assert_ne!(a.random::<u64>(), b.random::<u64>());
    }

    #[test]
    fn test_higher_levels_skip_border_augmentation() {
        for level in 2..=5 {
            let mut a = rng(11);
            let mut b = rng(11);
            assert_eq!(border_columns(level, &mut a), (false, false));
            // No randomness consumed
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn test_level_one_border_frequencies() {
        let mut r = rng(2024);
        let trials = 10_000;
        let (mut low, mut high) = (0, 0);
        for _ in 0..trials {
            let (l, h) = border_columns(1, &mut r);
            low += l as u32;
            high += h as u32;
        }
        // Both near 20%
        assert!((1700..2300).contains(&low), "low {low}");
        assert!((1700..2300).contains(&high), "high {high}");
    }

    #[test]
    fn test_generate_obstacles_all_hidden() {
        let size = GridSize::new(15, 27).unwrap();
        let obstacles = generate_obstacles(size, 1, &mut rng(5));
        assert!(obstacles.iter().all(|(cell, o)| *cell == o.cell && !o.is_visible()));
    }

    #[test]
    fn test_level_zero_generates_level_one() {
        let size = GridSize::new(12, 23).unwrap();
        assert_eq!(generate(size, 0, &mut rng(8)), generate(size, 1, &mut rng(8)));
    }

    #[test]
    fn test_minimum_field_has_no_lines() {
        // 5 - 5 = 0 < first line: nothing to place
        let size = GridSize::new(5, 5).unwrap();
        assert!(generate(size, 3, &mut rng(1)).is_empty());
    }

    proptest! {
        #[test]
        fn prop_generation_is_deterministic(
            width in 5i32..40,
            height in 5i32..40,
            level in 1u32..=3,
            seed in any::<u64>(),
        ) {
            let size = GridSize::new(width, height).unwrap();
            let a = generate(size, level, &mut rng(seed));
            let b = generate(size, level, &mut rng(seed));
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_start_and_goal_stay_clear(
            width in 5i32..40,
            height in 5i32..40,
            level in 1u32..=3,
            seed in any::<u64>(),
        ) {
            let size = GridSize::new(width, height).unwrap();
            let goal = size.goal();
            for cell in generate(size, level, &mut rng(seed)) {
                prop_assert_ne!(cell, START_CELL);
                prop_assert!(!goal.contains(cell));
                prop_assert!(size.is_playable(cell));
            }
        }
    }
}
