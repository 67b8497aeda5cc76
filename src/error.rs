//! Error taxonomy for the simulation core.
//!
//! Three classes of failure, handled very differently:
//! - [`GameError::Configuration`] is fatal at spawn/load time; bad data never
//!   enters the registries.
//! - [`GameError::Persistence`] is never fatal to gameplay; callers recover by
//!   treating the high score as 0 or skipping the append.
//! - Invariant violations inside a tick are debug assertions (see
//!   `SimState::debug_validate`); release builds clamp via the cleanup rules.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// Invalid spawn parameters or tuning data, rejected before use.
    #[error("configuration: {0}")]
    Configuration(String),

    /// Score log could not be read or written.
    #[error("score log: {0}")]
    Persistence(#[from] std::io::Error),
}
