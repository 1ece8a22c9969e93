//! Grid geometry
//!
//! The simulation only ever works in whole cells. Pixels show up once, when a
//! host turns its viewport into a [`FieldLayout`].

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::{MIN_FIELD_CELLS, OBSTACLE_ROWS};
use crate::error::{GameError, Result};

/// A cell position (x to the right, y downward)
pub type Cell = IVec2;

/// Where the player enters the field
pub const START_CELL: Cell = IVec2::new(1, 1);

/// Axis-aligned rectangle, `min` inclusive and `max` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub min: IVec2,
    pub max: IVec2,
}

impl GridRect {
    pub const fn new(min: IVec2, max: IVec2) -> Self {
        Self { min, max }
    }

    /// Rectangle covering exactly one cell
    pub fn cell(cell: Cell) -> Self {
        Self::new(cell, cell + IVec2::ONE)
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, point: IVec2) -> bool {
        point.x >= self.min.x
            && point.x < self.max.x
            && point.y >= self.min.y
            && point.y < self.max.y
    }

    /// Strict overlap; touching edges do not count
    pub fn intersects(&self, other: &GridRect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Shrink by `d` on every side
    pub fn inset(&self, d: i32) -> Self {
        Self::new(self.min + IVec2::splat(d), self.max - IVec2::splat(d))
    }

    /// Scale a cell rectangle to pixels
    pub fn to_pixels(&self, cell_side: i32) -> Self {
        Self::new(self.min * cell_side, self.max * cell_side)
    }

    /// Iterate all cells covered by this rectangle
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.min.y..self.max.y)
            .flat_map(move |y| (self.min.x..self.max.x).map(move |x| IVec2::new(x, y)))
    }
}

/// Which way obstacle lines run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Taller than wide: lines are rows
    Portrait,
    /// Wider than tall (or square): lines are columns
    Landscape,
}

/// Field size in whole cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: i32,
    pub height: i32,
}

impl GridSize {
    /// Create a grid size, rejecting fields too small to hold a game
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width < MIN_FIELD_CELLS || height < MIN_FIELD_CELLS {
            return Err(GameError::GenerationImpossible { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn orientation(&self) -> Orientation {
        if self.height > self.width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    /// Cell count along the long axis (the travel axis)
    pub fn long_extent(&self) -> i32 {
        match self.orientation() {
            Orientation::Portrait => self.height,
            Orientation::Landscape => self.width,
        }
    }

    /// Cell count along the short axis
    pub fn short_extent(&self) -> i32 {
        match self.orientation() {
            Orientation::Portrait => self.width,
            Orientation::Landscape => self.height,
        }
    }

    /// Whether the player may stand on `cell` (the outer ring is wall)
    pub fn is_playable(&self, cell: Cell) -> bool {
        cell.x > 0 && cell.y > 0 && cell.x < self.width - 1 && cell.y < self.height - 1
    }

    /// The 2x2 goal block in the far interior corner
    pub fn goal(&self) -> GridRect {
        GridRect::new(
            IVec2::new(self.width - 3, self.height - 3),
            IVec2::new(self.width - 1, self.height - 1),
        )
    }

    /// The whole field
    pub fn bounds(&self) -> GridRect {
        GridRect::new(IVec2::ZERO, IVec2::new(self.width, self.height))
    }
}

/// Pixel layout of the field inside a host viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldLayout {
    pub tier: u32,
    /// Side length of one cell in pixels
    pub cell_side: i32,
    pub size: GridSize,
    /// Offset that centers the field in the viewport
    pub offset: Vec2,
}

impl FieldLayout {
    /// Fit the field of a size tier into a viewport
    ///
    /// The cell side is chosen so the long axis holds `2 * rows + 7` cells;
    /// leftover pixels are split evenly around the field.
    pub fn from_viewport(view_width: u32, view_height: u32, tier: u32) -> Result<Self> {
        let tier = crate::sanitize_tier(tier);
        let rows = OBSTACLE_ROWS[(tier - 1) as usize];
        let cell_side = (view_width.max(view_height) / (2 * rows + 7)) as i32;
        if cell_side == 0 {
            return Err(GameError::GenerationImpossible {
                width: 0,
                height: 0,
            });
        }

        let size = GridSize::new(view_width as i32 / cell_side, view_height as i32 / cell_side)?;
        let offset = Vec2::new(
            (view_width as i32 - size.width * cell_side) as f32 / 2.0,
            (view_height as i32 - size.height * cell_side) as f32 / 2.0,
        );

        Ok(Self {
            tier,
            cell_side,
            size,
            offset,
        })
    }

    /// Field rectangle in pixels (before applying `offset`)
    pub fn field_pixels(&self) -> GridRect {
        self.size.bounds().to_pixels(self.cell_side)
    }

    /// Border outline in pixels, drawn half a cell inside the field edge
    pub fn border_pixels(&self) -> GridRect {
        self.field_pixels().inset(self.cell_side / 2)
    }

    /// Whether a drag has covered enough of a cell to count as a move
    pub fn drag_triggers_move(&self, delta: Vec2) -> bool {
        let side = self.cell_side as f32;
        delta.length_squared() > crate::consts::DRAG_MOVE_THRESHOLD * side * side
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size_minimum() {
        assert!(GridSize::new(5, 5).is_ok());
        assert!(matches!(
            GridSize::new(4, 20),
            Err(GameError::GenerationImpossible { width: 4, height: 20 })
        ));
    }

    #[test]
    fn test_orientation() {
        let portrait = GridSize::new(12, 23).unwrap();
        assert_eq!(portrait.orientation(), Orientation::Portrait);
        assert_eq!(portrait.long_extent(), 23);
        assert_eq!(portrait.short_extent(), 12);

        let square = GridSize::new(10, 10).unwrap();
        assert_eq!(square.orientation(), Orientation::Landscape);
    }

    #[test]
    fn test_playable_interior() {
        let size = GridSize::new(10, 8).unwrap();
        assert!(size.is_playable(START_CELL));
        assert!(size.is_playable(IVec2::new(8, 6)));
        assert!(!size.is_playable(IVec2::new(0, 3)));
        assert!(!size.is_playable(IVec2::new(3, 0)));
        assert!(!size.is_playable(IVec2::new(9, 3)));
        assert!(!size.is_playable(IVec2::new(3, 7)));
    }

    #[test]
    fn test_goal_is_corner_block() {
        let size = GridSize::new(10, 8).unwrap();
        let goal = size.goal();
        assert_eq!(goal.width(), 2);
        assert_eq!(goal.height(), 2);
        let cells: Vec<Cell> = goal.cells().collect();
        assert_eq!(
            cells,
            vec![IVec2::new(7, 5), IVec2::new(8, 5), IVec2::new(7, 6), IVec2::new(8, 6)]
        );
        assert!(cells.iter().all(|&c| size.is_playable(c)));
        assert!(!goal.contains(START_CELL));
    }

    #[test]
    fn test_rect_intersects_is_strict() {
        let a = GridRect::cell(IVec2::new(2, 2));
        let b = GridRect::cell(IVec2::new(3, 2));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&GridRect::new(IVec2::new(1, 1), IVec2::new(3, 3))));
    }

    #[test]
    fn test_layout_from_viewport() {
        // 480x800 portrait, tier 1: side = 800 / 23 = 34
        let layout = FieldLayout::from_viewport(480, 800, 1).unwrap();
        assert_eq!(layout.cell_side, 34);
        assert_eq!(layout.size, GridSize { width: 14, height: 23 });
        assert_eq!(
            layout.offset,
            Vec2::new((480.0 - 14.0 * 34.0) / 2.0, (800.0 - 23.0 * 34.0) / 2.0)
        );
        assert_eq!(layout.border_pixels().min, IVec2::splat(17));
    }

    #[test]
    fn test_layout_tiers_grow_monotonically() {
        let cells: Vec<i32> = (1..=3)
            .map(|tier| FieldLayout::from_viewport(600, 1000, tier).unwrap().size.height)
            .collect();
        assert!(cells.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_layout_out_of_range_tier_clamps() {
        let layout = FieldLayout::from_viewport(600, 1000, 9).unwrap();
        assert_eq!(layout.tier, 3);
    }

    #[test]
    fn test_layout_too_small() {
        assert!(FieldLayout::from_viewport(10, 10, 1).is_err());
        // A sliver: long axis fine, short axis under the minimum
        assert!(FieldLayout::from_viewport(1000, 60, 1).is_err());
    }

    #[test]
    fn test_drag_threshold() {
        let layout = FieldLayout::from_viewport(480, 800, 1).unwrap();
        assert!(!layout.drag_triggers_move(Vec2::new(10.0, 10.0)));
        assert!(layout.drag_triggers_move(Vec2::new(30.0, 0.0)));
    }
}
