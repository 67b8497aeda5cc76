//! Star Barrage - a vertically scrolling arcade space shooter.
//!
//! Core modules:
//! - `sim`: deterministic fixed-timestep simulation (entities, motion,
//!   collision, power-ups, scoring, wave spawning)
//! - `highscores`: append-only per-level score log
//! - `tuning`: data-driven game balance
//! - `error`: error taxonomy
//!
//! Rendering, raw input polling, and menus are external collaborators:
//! pressed keys arrive as a [`sim::TickInput`] once per frame, and drawing
//! reads a [`sim::Snapshot`] after each tick.

pub mod error;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use error::GameError;
pub use highscores::{MemScoreLog, ScoreLog, ScoreStore};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate; the driver sends one tick per frame.
    pub const TICKS_PER_SECOND: u32 = 30;

    /// Viewport dimensions in world pixels.
    pub const VIEW_WIDTH: f32 = 400.0;
    pub const VIEW_HEIGHT: f32 = 600.0;

    /// Entity footprints (square hitboxes).
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const ENEMY_SIZE: f32 = 30.0;
    pub const BULLET_SIZE: f32 = 5.0;
    pub const POWERUP_SIZE: f32 = 10.0;

    /// Kill award per point of initial enemy hp.
    pub const SCORE_PER_HP: u32 = 10;
}
