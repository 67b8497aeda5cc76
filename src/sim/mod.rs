//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, one discrete tick per frame signal
//! - Seeded RNG only
//! - Stable id-ordered iteration with deferred removal
//! - No rendering or platform dependencies; persistence enters through the
//!   `ScoreStore` seam only

pub mod collision;
pub mod level;
pub mod motion;
pub mod powerup;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use level::{SpawnOp, level_script, run_script};
pub use motion::{AxisWave, MoverMotion};
pub use powerup::BuffState;
pub use snapshot::Snapshot;
pub use state::{
    Enemy, EnemyKind, GamePhase, Player, PowerUp, PowerUpKind, Projectile, SimState,
};
pub use tick::{GameEvent, TickInput, tick};
