//! Star Barrage entry point.
//!
//! Headless driver: starts a level, runs a scripted autopilot at the fixed
//! tick rate, and prints externally visible events. Real input and rendering
//! collaborators replace this loop in a full build; the simulation API they
//! drive is exactly the one used here.

use std::env;

use star_barrage::Tuning;
use star_barrage::consts::TICKS_PER_SECOND;
use star_barrage::highscores::{DEFAULT_LOG_FILE, ScoreLog};
use star_barrage::sim::{GameEvent, GamePhase, SimState, TickInput, tick};

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let level = args.next().unwrap_or_else(|| "1".to_string());
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);

    let mut state = SimState::new(seed, Tuning::default());
    let mut store = ScoreLog::new(DEFAULT_LOG_FILE);

    let start = TickInput {
        select_level: Some(level.clone()),
        ..Default::default()
    };
    let events = tick(&mut state, &start, &mut store);
    if !events
        .iter()
        .any(|e| matches!(e, GameEvent::LevelStarted { .. }))
    {
        eprintln!("unknown level {level:?} (known levels: 1, 2, TEST)");
        std::process::exit(1);
    }

    // Autopilot: hold fire and sweep side to side. Five minutes of sim time
    // is far past the end of every authored level.
    let max_ticks = TICKS_PER_SECOND as u64 * 60 * 5;
    while state.phase == GamePhase::Running && state.tick < max_ticks {
        let sweep_left = (state.tick / 40) % 2 == 0;
        let input = TickInput {
            fire: true,
            left: sweep_left,
            right: !sweep_left,
            ..Default::default()
        };
        for event in tick(&mut state, &input, &mut store) {
            match event {
                GameEvent::PlayerDamaged { hp } => {
                    println!("tick {:>5}: hit, {hp} hp left", state.tick);
                }
                GameEvent::EnemyDestroyed { awarded, .. } => {
                    println!("tick {:>5}: kill, +{awarded}", state.tick);
                }
                GameEvent::PowerUpCollected { kind } => {
                    println!("tick {:>5}: picked up {kind:?}", state.tick);
                }
                GameEvent::BuffExpired { kind } => {
                    println!("tick {:>5}: {kind:?} wore off", state.tick);
                }
                GameEvent::ScoreRecorded { level, score } => {
                    println!("recorded score {score} for level {level}");
                }
                _ => {}
            }
        }
    }

    let hud = state.snapshot().hud;
    match state.phase {
        GamePhase::Won => println!("YOU WIN - score {} (high score {})", hud.score, hud.high_score),
        GamePhase::Lost => println!("GAME OVER - score {} (high score {})", hud.score, hud.high_score),
        _ => println!("time limit reached with score {}", hud.score),
    }
}
