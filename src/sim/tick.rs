//! Fixed timestep simulation tick.
//!
//! The orchestrator advances the whole simulation by exactly one discrete
//! step per external frame signal and reports what happened as events. The
//! per-tick order is fixed and load-bearing: input, scroll, motion, culling,
//! the four collision rules, the buff timer, then win/loss evaluation. A
//! tick never panics in release builds and always leaves a consistent state.

use glam::Vec2;

use super::collision::{self, Aabb};
use super::level;
use super::motion::step_linear;
use super::powerup;
use super::state::{EnemyKind, GamePhase, PowerUpKind, SimState};
use crate::consts::*;
use crate::highscores::ScoreStore;

/// Input commands for a single tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire button held; shots follow the fire-interval cadence.
    pub fire: bool,
    /// Toggle pause (edge, not level).
    pub pause: bool,
    /// Leave the Won/Lost banner back to the level select.
    pub acknowledge: bool,
    /// Level key to start while idle.
    pub select_level: Option<String>,
}

/// Externally visible things that happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LevelStarted { level: String },
    PlayerDamaged { hp: i32 },
    PlayerDestroyed,
    EnemyDestroyed { enemy_id: u32, awarded: u64 },
    PowerUpCollected { kind: PowerUpKind },
    BuffExpired { kind: PowerUpKind },
    /// The one-time score append for this run.
    ScoreRecorded { level: String, score: u64 },
    LevelWon,
    LevelLost,
}

/// Advance the simulation by one tick.
pub fn tick(
    state: &mut SimState,
    input: &TickInput,
    store: &mut dyn ScoreStore,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    match state.phase {
        GamePhase::NotStarted => start_level(state, input, store, &mut events),
        GamePhase::Won | GamePhase::Lost => {
            if input.acknowledge {
                state.clear_level();
                state.phase = GamePhase::NotStarted;
            }
        }
        GamePhase::Running => run_tick(state, input, store, &mut events),
    }
    state.debug_validate();
    events
}

/// Idle phase: registries stay empty until a known level key arrives.
fn start_level(
    state: &mut SimState,
    input: &TickInput,
    store: &mut dyn ScoreStore,
    events: &mut Vec<GameEvent>,
) {
    state.clear_level();
    let Some(key) = input.select_level.as_deref() else {
        return;
    };
    let Some(ops) = level::level_script(key, &mut state.rng) else {
        log::warn!("unknown level key {key:?}");
        return;
    };
    if let Err(e) = level::run_script(state, &ops) {
        log::error!("level {key:?} failed to load: {e}");
        state.clear_level();
        return;
    }
    state.spawn_player();
    state.level_key = Some(key.to_string());
    state.high_score = store.high_score(key);
    state.phase = GamePhase::Running;
    log::info!(
        "level {key} started: {} enemies, high score {}",
        state.enemy_count(),
        state.high_score
    );
    events.push(GameEvent::LevelStarted {
        level: key.to_string(),
    });
}

fn run_tick(
    state: &mut SimState,
    input: &TickInput,
    store: &mut dyn ScoreStore,
    events: &mut Vec<GameEvent>,
) {
    if input.pause {
        state.paused = !state.paused;
    }
    if state.paused {
        return;
    }
    state.tick += 1;

    // The viewport and the player ride the scroll together.
    let scroll = state.tuning.scroll_speed;
    state.camera_top -= scroll;
    if let Some(player) = state.player.as_mut() {
        player.pos.y -= scroll;
    }

    apply_player_input(state, input);

    // Motion: bullets fly straight, movers trace their waves.
    for bullet in &mut state.bullets {
        step_linear(&mut bullet.pos, bullet.vel);
    }
    for enemy in &mut state.enemies {
        if let EnemyKind::Mover(motion) = &mut enemy.kind {
            enemy.pos = motion.sample();
            motion.advance();
        }
    }

    // Culling. Bullets die as soon as any part leaves the viewport; enemies
    // and items are only dropped once fully past the bottom bound, so
    // off-screen-top waves survive for the scroll to reveal. Scroll-culled
    // enemies are not kills: no score, no drop.
    let view = Aabb::new(
        Vec2::new(VIEW_WIDTH / 2.0, state.camera_top + VIEW_HEIGHT / 2.0),
        Vec2::new(VIEW_WIDTH / 2.0, VIEW_HEIGHT / 2.0),
    );
    state
        .bullets
        .retain(|b| view.contains(&Aabb::new(b.pos, b.half)));
    let bottom = state.view_bottom();
    state.enemies.retain(|e| e.pos.y - e.half.y <= bottom);
    state.powerups.retain(|i| i.pos.y - i.half.y <= bottom);

    // Collision rules in their fixed order.
    if collision::resolve_player_contact(state) {
        if let Some(player) = state.player.as_ref() {
            events.push(GameEvent::PlayerDamaged { hp: player.hp });
        }
    }
    if state.player.as_ref().is_some_and(|p| p.hp <= 0) {
        save_score(state, store, events);
        if let Some(player) = state.player.take() {
            state.final_score = player.score;
        }
        events.push(GameEvent::PlayerDestroyed);
    }

    collision::resolve_bullet_hits(state);
    for kill in collision::cleanup_destroyed(state) {
        events.push(GameEvent::EnemyDestroyed {
            enemy_id: kill.enemy_id,
            awarded: kill.awarded,
        });
    }
    if let Some(kind) = collision::resolve_pickups(state) {
        events.push(GameEvent::PowerUpCollected { kind });
    }

    // Buff timer.
    if let Some(player) = state.player.as_mut() {
        if let Some(kind) = powerup::advance_buff(player, &mut state.buff, &state.tuning) {
            events.push(GameEvent::BuffExpired { kind });
        }
    }

    // Win/loss evaluation closes the tick.
    if state.player.is_none() {
        state.phase = GamePhase::Lost;
        log::info!("run over with score {}", state.score());
        events.push(GameEvent::LevelLost);
    } else if state.enemies.is_empty() {
        save_score(state, store, events);
        state.phase = GamePhase::Won;
        log::info!("level cleared with score {}", state.score());
        events.push(GameEvent::LevelWon);
    }
}

/// Movement clamped to the viewport, plus the fire cadence: the fire timer
/// counts ticks while the button is held and a shot lands on every multiple
/// of the fire interval; releasing the button resets the cadence.
fn apply_player_input(state: &mut SimState, input: &TickInput) {
    let cam_top = state.camera_top;
    let cam_bottom = cam_top + VIEW_HEIGHT;
    let pierce = powerup::bullet_pierce(&state.buff, state.tuning.bullet_pierce);
    let bullet_speed = powerup::bullet_speed(&state.buff, state.tuning.bullet_speed);

    let mut shot = None;
    if let Some(player) = state.player.as_mut() {
        let speed = player.move_speed;
        if input.up && player.pos.y - player.half.y > cam_top {
            player.pos.y -= speed;
        }
        if input.down && player.pos.y + player.half.y < cam_bottom {
            player.pos.y += speed;
        }
        if input.right && player.pos.x + player.half.x < VIEW_WIDTH {
            player.pos.x += speed;
        }
        if input.left && player.pos.x - player.half.x > 0.0 {
            player.pos.x -= speed;
        }

        if input.fire {
            if player.fire_timer % player.fire_interval == 0 {
                shot = Some(player.pos);
            }
            player.fire_timer += 1;
        } else {
            player.fire_timer = 0;
        }
    }
    if let Some(pos) = shot {
        state.spawn_bullet(pos, Vec2::new(0.0, -bullet_speed), pierce);
    }
}

/// Append the run's score exactly once; the `score_saved` flag makes this
/// idempotent across the tick the win/loss condition first holds and any
/// later call. Append failures are logged and swallowed.
fn save_score(state: &mut SimState, store: &mut dyn ScoreStore, events: &mut Vec<GameEvent>) {
    let Some(level) = state.level_key.clone() else {
        return;
    };
    let Some(player) = state.player.as_mut() else {
        return;
    };
    if player.score_saved {
        return;
    }
    player.score_saved = true;
    let score = player.score;
    if let Err(e) = store.append(&level, score) {
        log::warn!("failed to append score for level {level}: {e}");
    }
    events.push(GameEvent::ScoreRecorded { level, score });
}
