//! Collision detection and damage resolution.
//!
//! All "touches" checks are axis-aligned box overlaps with open intervals:
//! boxes that merely share an edge do not count, coincident centers do. The
//! four resolution rules run once per tick in a fixed order; later rules read
//! state the earlier ones mutated, so the order is load-bearing:
//!
//! 1. player vs enemies (contact damage under invincibility frames)
//! 2. bullets vs enemies (pierce bookkeeping)
//! 3. cleanup of spent bullets and dead enemies (score awards, drop rolls)
//! 4. player vs power-up items (pickup)

use glam::Vec2;

use super::level::roll_drop;
use super::powerup;
use super::state::{PowerUpKind, SimState};

/// Axis-aligned box given as center + half-extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Strict overlap on both axes; edge touching is not a hit.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() < self.half.x + other.half.x
            && (self.center.y - other.center.y).abs() < self.half.y + other.half.y
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() + other.half.x <= self.half.x
            && (self.center.y - other.center.y).abs() + other.half.y <= self.half.y
    }
}

/// Rule 1: contact damage. Touching any live enemy is a single condition,
/// not per-enemy. Damage lands only when the hurt timer sits on a multiple
/// of the invincibility window; out of contact the timer runs back to 0 at
/// the next multiple, re-arming vulnerability.
///
/// Returns `true` if damage landed this tick.
pub fn resolve_player_contact(state: &mut SimState) -> bool {
    let in_contact = match state.player.as_ref() {
        Some(p) => {
            let player_box = Aabb::new(p.pos, p.half);
            state
                .enemies
                .iter()
                .any(|e| player_box.overlaps(&Aabb::new(e.pos, e.half)))
        }
        None => return false,
    };

    let iframes = state.tuning.invincibility_ticks;
    let Some(player) = state.player.as_mut() else {
        return false;
    };

    if in_contact {
        if player.hurt_timer % iframes == 0 {
            player.hp -= 1;
            player.multiplier = 1.0;
            player.hurt_timer += 1;
            return true;
        }
        player.hurt_timer += 1;
    } else if player.hurt_timer % iframes == 0 {
        player.hurt_timer = 0;
    } else {
        player.hurt_timer += 1;
    }
    false
}

/// Rule 2: every overlapping (bullet, enemy) pair costs one pierce and one
/// hp, in id order. A bullet stops dealing damage the moment its pierce is
/// exhausted, so a pierce-p bullet can never damage more than p enemies over
/// its lifetime.
pub fn resolve_bullet_hits(state: &mut SimState) {
    for bi in 0..state.bullets.len() {
        for ei in 0..state.enemies.len() {
            if state.bullets[bi].pierce <= 0 {
                break;
            }
            let bullet_box = Aabb::new(state.bullets[bi].pos, state.bullets[bi].half);
            let enemy_box = Aabb::new(state.enemies[ei].pos, state.enemies[ei].half);
            if bullet_box.overlaps(&enemy_box) {
                state.bullets[bi].pierce -= 1;
                state.enemies[ei].hp -= 1;
            }
        }
    }
}

/// A kill produced by rule 3.
#[derive(Debug, Clone, PartialEq)]
pub struct Kill {
    pub enemy_id: u32,
    pub pos: Vec2,
    pub awarded: u64,
}

/// Rule 3: compact spent bullets and dead enemies. Each dead enemy is a
/// single kill regardless of how many hits landed this tick: one score
/// award, one multiplier bump, one weighted drop roll at its last position.
pub fn cleanup_destroyed(state: &mut SimState) -> Vec<Kill> {
    state.bullets.retain(|b| b.pierce > 0);

    let mut dead: Vec<(u32, Vec2, u32)> = Vec::new();
    state.enemies.retain(|e| {
        if e.hp <= 0 {
            dead.push((e.id, e.pos, e.score_value));
            false
        } else {
            true
        }
    });

    let mut kills = Vec::with_capacity(dead.len());
    for (enemy_id, pos, value) in dead {
        let awarded = match state.player.as_mut() {
            Some(player) => {
                let awarded = (value as f32 * player.multiplier) as u64;
                player.score += awarded;
                player.multiplier += value as f32 / 100.0;
                awarded
            }
            None => 0,
        };
        if let Some(kind) = roll_drop(&mut state.rng, &state.tuning.drops) {
            state.spawn_power_up(pos, kind);
        }
        kills.push(Kill {
            enemy_id,
            pos,
            awarded,
        });
    }
    kills
}

/// Rule 4: pickup. Items are only consumed while no buff timer is running;
/// with a buff active the item stays in the world for later. When several
/// items overlap the player in one tick the last one wins (single pending
/// effect by construction).
pub fn resolve_pickups(state: &mut SimState) -> Option<PowerUpKind> {
    if state.buff.is_active() {
        return None;
    }
    let player_box = match state.player.as_ref() {
        Some(p) => Aabb::new(p.pos, p.half),
        None => return None,
    };

    let mut picked = None;
    state.powerups.retain(|item| {
        if player_box.overlaps(&Aabb::new(item.pos, item.half)) {
            picked = Some(item.kind);
            false
        } else {
            true
        }
    });

    if let Some(kind) = picked {
        if let Some(player) = state.player.as_mut() {
            powerup::apply_pickup(player, &mut state.buff, &state.tuning, kind);
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn quiet_state() -> SimState {
        // No scroll so contact scenarios hold still across many ticks, and no
        // drops so cleanup tests stay deterministic regardless of rng state.
        let mut tuning = Tuning {
            scroll_speed: 0.0,
            ..Tuning::default()
        };
        tuning.drops.super_combo = 0;
        tuning.drops.strength = 0;
        tuning.drops.rapid_fire = 0;
        tuning.drops.speed = 0;
        tuning.drops.health = 0;
        SimState::new(1, tuning)
    }

    #[test]
    fn test_edge_touching_is_not_overlap() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::splat(10.0));
        let b = Aabb::new(Vec2::new(20.0, 0.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&b));
        let c = Aabb::new(Vec2::new(19.9, 0.0), Vec2::splat(10.0));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_coincident_centers_overlap() {
        let a = Aabb::new(Vec2::new(5.0, 5.0), Vec2::splat(1.0));
        let b = Aabb::new(Vec2::new(5.0, 5.0), Vec2::splat(3.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_contact_damage_respects_invincibility_frames() {
        let mut state = quiet_state();
        state.spawn_player();
        let pos = state.player.as_ref().unwrap().pos;
        state.spawn_basic_enemy(pos, 100);

        // Tick 0: timer at 0, damage lands and the multiplier resets.
        state.player.as_mut().unwrap().multiplier = 2.5;
        assert!(resolve_player_contact(&mut state));
        let p = state.player.as_ref().unwrap();
        assert_eq!(p.hp, 9);
        assert_eq!(p.multiplier, 1.0);

        // Ticks 1..29: still touching, no further damage.
        for _ in 1..30 {
            assert!(!resolve_player_contact(&mut state));
        }
        assert_eq!(state.player.as_ref().unwrap().hp, 9);

        // Tick 30: window over, damage lands again.
        assert!(resolve_player_contact(&mut state));
        assert_eq!(state.player.as_ref().unwrap().hp, 8);
    }

    #[test]
    fn test_hurt_timer_rearms_out_of_contact() {
        let mut state = quiet_state();
        state.spawn_player();
        let pos = state.player.as_ref().unwrap().pos;
        state.spawn_basic_enemy(pos, 100);

        assert!(resolve_player_contact(&mut state));
        state.enemies.clear();
        // Run the timer out of contact until it resets at the next multiple.
        for _ in 1..=30 {
            assert!(!resolve_player_contact(&mut state));
        }
        assert_eq!(state.player.as_ref().unwrap().hurt_timer, 0);

        // Vulnerable again immediately.
        state.spawn_basic_enemy(pos, 100);
        assert!(resolve_player_contact(&mut state));
        assert_eq!(state.player.as_ref().unwrap().hp, 8);
    }

    #[test]
    fn test_pierce_caps_total_damage() {
        let mut state = quiet_state();
        let spot = Vec2::new(100.0, 100.0);
        state.spawn_basic_enemy(spot, 2);
        state.spawn_basic_enemy(spot, 2);
        state.spawn_basic_enemy(spot, 2);
        state.spawn_bullet(spot, Vec2::new(0.0, -10.0), 2);

        resolve_bullet_hits(&mut state);

        let damaged: i32 = state.enemies.iter().map(|e| 2 - e.hp).sum();
        assert_eq!(damaged, 2, "pierce-2 bullet must damage exactly 2 enemies");
        assert_eq!(state.bullets[0].pierce, 0);
    }

    #[test]
    fn test_two_hits_one_kill_event() {
        let mut state = quiet_state();
        state.spawn_player();
        // Keep the enemy away from the player so only bullets touch it.
        let spot = Vec2::new(100.0, 100.0);
        state.spawn_basic_enemy(spot, 2);
        state.spawn_bullet(spot, Vec2::new(0.0, -10.0), 1);
        state.spawn_bullet(spot, Vec2::new(0.0, -10.0), 1);

        resolve_bullet_hits(&mut state);
        assert_eq!(state.enemies[0].hp, 0);

        let kills = cleanup_destroyed(&mut state);
        assert_eq!(kills.len(), 1);
        assert_eq!(kills[0].awarded, 20);
        assert_eq!(state.enemy_count(), 0);
        assert!(state.bullets.is_empty());
        let p = state.player.as_ref().unwrap();
        assert_eq!(p.score, 20);
        assert_eq!(p.multiplier, 1.2);
    }

    #[test]
    fn test_kill_award_truncates_multiplied_score() {
        let mut state = quiet_state();
        state.spawn_player();
        state.player.as_mut().unwrap().multiplier = 1.15;
        let spot = Vec2::new(100.0, 100.0);
        state.spawn_basic_enemy(spot, 1);
        state.enemies[0].hp = 0;

        let kills = cleanup_destroyed(&mut state);
        // 10 * 1.15 = 11.5, truncated.
        assert_eq!(kills[0].awarded, 11);
    }

    #[test]
    fn test_pickup_ignored_while_buff_active_item_stays() {
        let mut state = quiet_state();
        state.spawn_player();
        let pos = state.player.as_ref().unwrap().pos;
        state.spawn_power_up(pos, PowerUpKind::Speed);

        assert_eq!(resolve_pickups(&mut state), Some(PowerUpKind::Speed));
        assert!(state.powerups.is_empty());

        // Buff now running: a second item is neither consumed nor applied.
        state.spawn_power_up(pos, PowerUpKind::RapidFire);
        assert_eq!(resolve_pickups(&mut state), None);
        assert_eq!(state.powerups.len(), 1);
    }
}
