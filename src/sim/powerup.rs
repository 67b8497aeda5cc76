//! Power-up effect state machine.
//!
//! At most one timed effect runs at a time. On pickup the player's live
//! stats are snapshotted, the effect mutates them, and expiry restores the
//! snapshot verbatim — reversal is exact by construction rather than by
//! arithmetic inversion, so halving an odd fire interval can't drift the
//! base value. Health is an instant effect and never enters `Active`.
//! Strength's pierce bonus (and the bullet speed doubling under Speed/Super)
//! are derived at fire time and need no reversal.

use serde::{Deserialize, Serialize};

use super::state::{Player, PowerUpKind};
use crate::tuning::Tuning;

/// Player stats captured at buff entry and restored at expiry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatSnapshot {
    pub move_speed: f32,
    pub fire_interval: u32,
}

/// The player's active-effect state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BuffState {
    Inactive,
    Active {
        kind: PowerUpKind,
        /// Ticks since pickup; the effect reverts when this reaches the
        /// configured buff duration.
        timer: u32,
        saved: StatSnapshot,
    },
}

impl BuffState {
    pub fn is_active(&self) -> bool {
        matches!(self, BuffState::Active { .. })
    }

    pub fn active_kind(&self) -> Option<PowerUpKind> {
        match self {
            BuffState::Active { kind, .. } => Some(*kind),
            BuffState::Inactive => None,
        }
    }

    /// Ticks left before the current effect reverts, if one is running.
    pub fn remaining(&self, buff_ticks: u32) -> Option<u32> {
        match self {
            BuffState::Active { timer, .. } => Some(buff_ticks.saturating_sub(*timer)),
            BuffState::Inactive => None,
        }
    }
}

/// Consume a picked-up item. Health applies instantly; any other kind
/// starts a timed effect if none is running (the caller already guarantees
/// that via the pickup rule, but re-application is a no-op here too).
pub fn apply_pickup(player: &mut Player, buff: &mut BuffState, tuning: &Tuning, kind: PowerUpKind) {
    if kind == PowerUpKind::Health {
        player.hp = tuning.player_hp;
        return;
    }
    if buff.is_active() {
        return;
    }

    let saved = StatSnapshot {
        move_speed: player.move_speed,
        fire_interval: player.fire_interval,
    };
    match kind {
        PowerUpKind::Strength => {}
        PowerUpKind::RapidFire => {
            player.fire_interval = (player.fire_interval / 2).max(1);
        }
        PowerUpKind::Speed => {
            player.move_speed *= 2.0;
        }
        PowerUpKind::Super => {
            player.fire_interval = (player.fire_interval / 2).max(1);
            player.move_speed *= 2.0;
        }
        PowerUpKind::Health => unreachable!("handled above"),
    }
    *buff = BuffState::Active {
        kind,
        timer: 0,
        saved,
    };
}

/// Advance the buff timer one tick; restores the stat snapshot and returns
/// the expired kind when the duration is reached.
pub fn advance_buff(player: &mut Player, buff: &mut BuffState, tuning: &Tuning) -> Option<PowerUpKind> {
    if let BuffState::Active { kind, timer, saved } = buff {
        *timer += 1;
        if *timer >= tuning.buff_ticks {
            player.move_speed = saved.move_speed;
            player.fire_interval = saved.fire_interval;
            let expired = *kind;
            *buff = BuffState::Inactive;
            return Some(expired);
        }
    }
    None
}

/// Pierce of a freshly fired bullet under the current buff.
pub fn bullet_pierce(buff: &BuffState, base: i32) -> i32 {
    match buff.active_kind() {
        Some(PowerUpKind::Strength) | Some(PowerUpKind::Super) => base + 1,
        _ => base,
    }
}

/// Speed of a freshly fired bullet under the current buff.
pub fn bullet_speed(buff: &BuffState, base: f32) -> f32 {
    match buff.active_kind() {
        Some(PowerUpKind::Speed) | Some(PowerUpKind::Super) => base * 2.0,
        _ => base,
    }
}
