//! Game state and entity registries.
//!
//! `SimState` owns every entity and is mutated only inside a tick. Entities
//! live in plain id-ordered vectors; passes mark damage on the entities and
//! compaction happens at the end of a stage with `retain`, so no entity is
//! skipped or visited twice within a pass. Ids are allocated from a
//! monotonically increasing counter and never reused within a run.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::motion::MoverMotion;
use super::powerup::BuffState;
use crate::consts::*;
use crate::error::GameError;
use crate::tuning::Tuning;

/// Current phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No level selected; registries are empty.
    NotStarted,
    /// A level is in progress.
    Running,
    /// Level cleared; waiting for acknowledgment.
    Won,
    /// Player destroyed; waiting for acknowledgment.
    Lost,
}

/// Power-up kinds, both as world items and as active effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Immediate full heal; never becomes a timed effect.
    Health,
    /// +1 bullet pierce, applied at fire time.
    Strength,
    /// Fire interval halved.
    RapidFire,
    /// Move speed doubled.
    Speed,
    /// Strength + RapidFire + Speed combined.
    Super,
}

/// Enemy movement archetypes.
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyKind {
    /// Holds position; the scroll brings it to the player.
    Basic,
    /// Follows a per-axis sine wave around its spawn point.
    Mover(MoverMotion),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub half: Vec2,
    pub hp: i32,
    /// Awarded on kill; fixed at spawn as 10x initial hp.
    pub score_value: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub half: Vec2,
    pub vel: Vec2,
    /// Remaining enemies this bullet may still damage.
    pub pierce: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub half: Vec2,
}

/// The player ship. Exactly one exists while alive; `SimState.player` is
/// `None` after death.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub half: Vec2,
    pub hp: i32,
    /// Counts ticks while the fire button is held; shots land on multiples
    /// of the fire interval.
    pub fire_timer: u32,
    /// Invincibility-frame counter, see the contact rule in `collision`.
    pub hurt_timer: u32,
    pub move_speed: f32,
    pub fire_interval: u32,
    pub score: u64,
    /// Applied to kill awards; grows with kills, resets to 1.0 on damage.
    pub multiplier: f32,
    /// Guards the one-time score append on win or death.
    pub score_saved: bool,
}

/// Complete simulation state, exclusively owned by the tick orchestrator.
#[derive(Debug, Clone)]
pub struct SimState {
    pub seed: u64,
    pub rng: Pcg32,
    pub tick: u64,
    pub phase: GamePhase,
    pub paused: bool,
    /// Key of the level in progress, `None` while `NotStarted`.
    pub level_key: Option<String>,
    /// Best recorded score for the current level, read once at level start.
    pub high_score: u64,
    /// Y coordinate of the viewport's top edge; decreases as the level
    /// scrolls upward.
    pub camera_top: f32,
    pub tuning: Tuning,
    pub player: Option<Player>,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Projectile>,
    pub powerups: Vec<PowerUp>,
    pub buff: BuffState,
    /// Score at the moment the player died, kept for the HUD.
    pub final_score: u64,
    next_id: u32,
}

impl SimState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tick: 0,
            phase: GamePhase::NotStarted,
            paused: false,
            level_key: None,
            high_score: 0,
            camera_top: 0.0,
            tuning,
            player: None,
            enemies: Vec::new(),
            bullets: Vec::new(),
            powerups: Vec::new(),
            buff: BuffState::Inactive,
            final_score: 0,
            next_id: 1,
        }
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Clear all entities and per-level state; keeps rng, tuning, and seed.
    pub fn clear_level(&mut self) {
        self.player = None;
        self.enemies.clear();
        self.bullets.clear();
        self.powerups.clear();
        self.buff = BuffState::Inactive;
        self.level_key = None;
        self.high_score = 0;
        self.camera_top = 0.0;
        self.paused = false;
    }

    /// Spawn the player ship centered at the bottom of the viewport.
    pub fn spawn_player(&mut self) {
        let half = Vec2::splat(PLAYER_SIZE / 2.0);
        self.player = Some(Player {
            pos: Vec2::new(VIEW_WIDTH / 2.0, self.camera_top + VIEW_HEIGHT - half.y),
            half,
            hp: self.tuning.player_hp,
            fire_timer: 0,
            hurt_timer: 0,
            move_speed: self.tuning.player_move_speed,
            fire_interval: self.tuning.fire_interval,
            score: 0,
            multiplier: 1.0,
            score_saved: false,
        });
    }

    pub fn spawn_basic_enemy(&mut self, pos: Vec2, hp: i32) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            kind: EnemyKind::Basic,
            pos,
            half: Vec2::splat(ENEMY_SIZE / 2.0),
            hp,
            score_value: hp.max(0) as u32 * SCORE_PER_HP,
        });
        id
    }

    /// Spawn a mover; a zero period is rejected before anything enters the
    /// registry.
    pub fn spawn_mover_enemy(
        &mut self,
        pos: Vec2,
        hp: i32,
        amplitude: Vec2,
        period: (u32, u32),
        phase: (f32, f32),
    ) -> Result<u32, GameError> {
        let motion = MoverMotion::new(pos, amplitude, period, phase)?;
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            kind: EnemyKind::Mover(motion),
            pos: motion.sample(),
            half: Vec2::splat(ENEMY_SIZE / 2.0),
            hp,
            score_value: hp.max(0) as u32 * SCORE_PER_HP,
        });
        Ok(id)
    }

    pub fn spawn_bullet(&mut self, pos: Vec2, vel: Vec2, pierce: i32) -> u32 {
        let id = self.next_entity_id();
        self.bullets.push(Projectile {
            id,
            pos,
            half: Vec2::splat(BULLET_SIZE / 2.0),
            vel,
            pierce,
        });
        id
    }

    pub fn spawn_power_up(&mut self, pos: Vec2, kind: PowerUpKind) -> u32 {
        let id = self.next_entity_id();
        self.powerups.push(PowerUp {
            id,
            kind,
            pos,
            half: Vec2::splat(POWERUP_SIZE / 2.0),
        });
        id
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn basic_count(&self) -> usize {
        self.enemies
            .iter()
            .filter(|e| matches!(e.kind, EnemyKind::Basic))
            .count()
    }

    pub fn mover_count(&self) -> usize {
        self.enemies
            .iter()
            .filter(|e| matches!(e.kind, EnemyKind::Mover(_)))
            .count()
    }

    /// Y coordinate of the viewport's bottom edge.
    pub fn view_bottom(&self) -> f32 {
        self.camera_top + VIEW_HEIGHT
    }

    /// Current score, surviving the player entity itself.
    pub fn score(&self) -> u64 {
        self.player.as_ref().map_or(self.final_score, |p| p.score)
    }

    /// Post-tick invariant checks. Active only in debug builds; a failure
    /// here means a resolver-ordering bug, since release builds clamp these
    /// during cleanup.
    pub fn debug_validate(&self) {
        debug_assert!(
            self.enemies.iter().all(|e| e.hp > 0),
            "dead enemy survived cleanup"
        );
        debug_assert!(
            self.bullets.iter().all(|b| b.pierce > 0),
            "spent bullet survived cleanup"
        );
        if let Some(player) = &self.player {
            debug_assert!(player.hp > 0, "dead player not removed");
            debug_assert!(player.multiplier >= 1.0, "multiplier below 1.0");
        }
        debug_assert!(
            self.enemies.iter().all(|e| match &e.kind {
                EnemyKind::Basic => true,
                EnemyKind::Mover(m) => m.x.timer < m.x.period && m.y.timer < m.y.period,
            }),
            "mover timer escaped its period"
        );
    }
}
