//! Data-driven gameplay balance.
//!
//! Everything the simulation treats as a knob rather than a structural
//! constant lives here, so balance passes don't touch sim code. Defaults
//! reproduce the shipped balance; a JSON file with the same shape can
//! override them.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Weighted drop table rolled once per enemy kill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropWeights {
    pub super_combo: u32,
    pub strength: u32,
    pub rapid_fire: u32,
    pub speed: u32,
    pub health: u32,
    pub nothing: u32,
}

impl DropWeights {
    pub fn total(&self) -> u32 {
        self.super_combo + self.strength + self.rapid_fire + self.speed + self.health + self.nothing
    }
}

impl Default for DropWeights {
    fn default() -> Self {
        // 1:5:5:5:5:179 out of 200
        Self {
            super_combo: 1,
            strength: 5,
            rapid_fire: 5,
            speed: 5,
            health: 5,
            nothing: 179,
        }
    }
}

/// Gameplay balance knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Player starting (and maximum) hit points.
    pub player_hp: i32,
    /// Player movement in pixels per tick.
    pub player_move_speed: f32,
    /// Ticks between shots while the fire button is held.
    pub fire_interval: u32,
    /// Invincibility window after taking contact damage, in ticks.
    pub invincibility_ticks: u32,
    /// Duration of a timed power-up effect, in ticks.
    pub buff_ticks: u32,
    /// Upward bullet speed in pixels per tick.
    pub bullet_speed: f32,
    /// Base pierce of a player bullet.
    pub bullet_pierce: i32,
    /// Upward viewport scroll in pixels per tick.
    pub scroll_speed: f32,
    /// Power-up drop distribution.
    pub drops: DropWeights,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_hp: 10,
            player_move_speed: 5.0,
            fire_interval: 10,
            invincibility_ticks: 30,
            buff_ticks: 60,
            bullet_speed: 10.0,
            bullet_pierce: 1,
            scroll_speed: 2.0,
            drops: DropWeights::default(),
        }
    }
}

impl Tuning {
    /// Parse a tuning override from JSON, then validate it.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let tuning: Tuning = serde_json::from_str(json)
            .map_err(|e| GameError::Configuration(format!("tuning parse: {e}")))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.player_hp <= 0 {
            return Err(GameError::Configuration("player_hp must be positive".into()));
        }
        if self.fire_interval == 0 {
            return Err(GameError::Configuration("fire_interval must be positive".into()));
        }
        if self.invincibility_ticks == 0 {
            return Err(GameError::Configuration(
                "invincibility_ticks must be positive".into(),
            ));
        }
        if self.buff_ticks == 0 {
            return Err(GameError::Configuration("buff_ticks must be positive".into()));
        }
        if self.bullet_pierce < 1 {
            return Err(GameError::Configuration("bullet_pierce must be at least 1".into()));
        }
        if self.drops.total() == 0 {
            return Err(GameError::Configuration("drop weights sum to zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
        assert_eq!(Tuning::default().drops.total(), 200);
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning::default();
        let json = serde_json::to_string(&tuning).unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(tuning, back);
    }

    #[test]
    fn test_rejects_zero_fire_interval() {
        let tuning = Tuning {
            fire_interval: 0,
            ..Tuning::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_garbage_json() {
        assert!(Tuning::from_json("not json").is_err());
    }
}
