//! Read-only render snapshot.
//!
//! The renderer never touches `SimState` directly; once per tick it takes a
//! `Snapshot`, a plain copy of everything drawable plus the HUD numbers, and
//! holds no entity references across tick boundaries.

use glam::Vec2;
use serde::Serialize;

use super::state::{EnemyKind, GamePhase, PowerUpKind, SimState};

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub half: Vec2,
    pub hp: i32,
    pub max_hp: i32,
    /// True while invincibility frames are live; the renderer marks the ship.
    pub invincible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub pos: Vec2,
    pub half: Vec2,
    pub hp: i32,
    pub mover: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulletView {
    pub pos: Vec2,
    pub half: Vec2,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub pos: Vec2,
    pub half: Vec2,
    pub kind: PowerUpKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuffView {
    pub kind: PowerUpKind,
    pub remaining_ticks: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hud {
    pub score: u64,
    pub multiplier: f32,
    /// Best of the stored high score and the live score, like an arcade
    /// cabinet's top line.
    pub high_score: u64,
    pub buff: Option<BuffView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub paused: bool,
    pub camera_top: f32,
    pub player: Option<PlayerView>,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<BulletView>,
    pub powerups: Vec<ItemView>,
    pub hud: Hud,
}

impl SimState {
    pub fn snapshot(&self) -> Snapshot {
        let iframes = self.tuning.invincibility_ticks;
        let player = self.player.as_ref().map(|p| PlayerView {
            pos: p.pos,
            half: p.half,
            hp: p.hp,
            max_hp: self.tuning.player_hp,
            // The tail of the window is left unmarked so the player sees
            // vulnerability coming back.
            invincible: matches!(p.hurt_timer % iframes, t if t > 0 && t < iframes.saturating_sub(5)),
        });

        Snapshot {
            phase: self.phase,
            paused: self.paused,
            camera_top: self.camera_top,
            player,
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemyView {
                    pos: e.pos,
                    half: e.half,
                    hp: e.hp,
                    mover: matches!(e.kind, EnemyKind::Mover(_)),
                })
                .collect(),
            bullets: self
                .bullets
                .iter()
                .map(|b| BulletView {
                    pos: b.pos,
                    half: b.half,
                })
                .collect(),
            powerups: self
                .powerups
                .iter()
                .map(|i| ItemView {
                    pos: i.pos,
                    half: i.half,
                    kind: i.kind,
                })
                .collect(),
            hud: Hud {
                score: self.score(),
                multiplier: self
                    .player
                    .as_ref()
                    .map_or(1.0, |p| p.multiplier),
                high_score: self.high_score.max(self.score()),
                buff: self.buff.active_kind().map(|kind| BuffView {
                    kind,
                    remaining_ticks: self
                        .buff
                        .remaining(self.tuning.buff_ticks)
                        .unwrap_or(0),
                }),
            },
        }
    }
}
