//! Blind Man - walk a token across a field of obstacles you only see once
//!
//! Core modules:
//! - `sim`: Deterministic simulation (field generation, moves, game state)
//! - `effects`: Sound/haptic/flash cues derived from simulation events
//! - `palette`: Customisable colours of the field parts
//! - `settings`: Player preferences
//! - `persistence`: Versioned save envelope
//! - `platform`: Browser/native platform abstraction

pub mod effects;
pub mod error;
pub mod palette;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{GameError, Result};
pub use palette::{ColoredPart, Palette, Rgb};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Selectable life limits. 0 means unlimited.
    pub const ALLOWED_LIVES: [u32; 8] = [1, 2, 3, 4, 6, 9, 12, 0];
    pub const DEFAULT_LIVES: u32 = ALLOWED_LIVES[2];

    /// Obstacle rows per size tier (tier 1 is index 0)
    pub const OBSTACLE_ROWS: [u32; 3] = [8, 11, 15];
    pub const DEFAULT_TIER: u32 = 1;

    /// Difficulty range
    pub const MIN_LEVEL: u32 = 1;
    pub const MAX_LEVEL: u32 = 3;
    pub const DEFAULT_LEVEL: u32 = MIN_LEVEL;

    /// Field background alpha per background setting
    pub const BACKGROUND_ALPHA: [u8; 3] = [0, 0x40, 0x80];
    pub const DEFAULT_BACKGROUND: usize = 1;

    /// Smallest field (in cells, per axis) that still leaves room for
    /// start cell, one obstacle line and the goal
    pub const MIN_FIELD_CELLS: i32 = 5;

    /// Share of a line's width drawn as obstacles per level
    pub const OBSTACLE_DENSITY: f64 = 0.3;
    /// First obstacle line index
    pub const FIRST_LINE: i32 = 3;
    /// Lines kept free at the goal end of the field
    pub const GOAL_END_RESERVE: i32 = 5;

    /// Squared drag distance (in cell sides squared) that triggers a move
    pub const DRAG_MOVE_THRESHOLD: f32 = 0.4;
}

/// Resolve a lives value to an allowed one, falling back to the default
pub fn sanitize_lives(lives: u32) -> u32 {
    if consts::ALLOWED_LIVES.contains(&lives) {
        lives
    } else {
        log::warn!("Lives {} not allowed, using {}", lives, consts::DEFAULT_LIVES);
        consts::DEFAULT_LIVES
    }
}

/// Clamp a level to the playable range
pub fn sanitize_level(level: u32) -> u32 {
    let clamped = level.clamp(consts::MIN_LEVEL, consts::MAX_LEVEL);
    if clamped != level {
        log::warn!("Level {} out of range, using {}", level, clamped);
    }
    clamped
}

/// Clamp a size tier to the tier table
pub fn sanitize_tier(tier: u32) -> u32 {
    let clamped = tier.clamp(1, consts::OBSTACLE_ROWS.len() as u32);
    if clamped != tier {
        log::warn!("Size tier {} out of range, using {}", tier, clamped);
    }
    clamped
}
