//! Frontier Runner headless driver
//!
//! Runs a session with a simple autopilot and logs a summary. Usage:
//! `frontier-runner [settings.json] [seconds]`

use frontier_runner::audio::{CueRecorder, SoundCue};
use frontier_runner::consts::*;
use frontier_runner::highscores::{HighScoreStore, JsonFileHighScores, MemoryHighScores};
use frontier_runner::sim::Snapshot;
use frontier_runner::{Action, GamePhase, Settings, Simulation};

/// Simulated seconds when none are given
const DEFAULT_RUN_SECONDS: u32 = 120;
/// Horizontal lookahead for jumping over obstacles
const JUMP_LOOKAHEAD: f32 = 70.0;
/// Shooting range
const SHOOT_RANGE: f32 = 320.0;

/// Pick the next action from a snapshot, like an idle/demo player would
fn autopilot(snap: &Snapshot) -> Vec<Action> {
    match snap.phase {
        GamePhase::ThemeSelection => return vec![Action::SelectTheme(snap.theme_id.clone())],
        GamePhase::Start | GamePhase::GameOver => return vec![Action::Start],
        GamePhase::LevelComplete => {
            return snap
                .state
                .available_buffs
                .first()
                .map(|b| vec![Action::ChooseBuff(b.id.clone())])
                .unwrap_or_default();
        }
        GamePhase::Paused => return vec![Action::Resume],
        GamePhase::Playing => {}
    }

    let player = &snap.player;
    let front = player.pos.x + player.size.x;
    let mut actions = Vec::new();

    // Nearest obstacle ahead that occupies the player's height band
    let threat = snap
        .obstacles
        .iter()
        .filter(|o| !o.is_collectible() && o.pos.x + o.size.x > player.pos.x)
        .filter(|o| o.pos.y + o.size.y > player.pos.y)
        .min_by(|a, b| a.pos.x.partial_cmp(&b.pos.x).unwrap_or(std::cmp::Ordering::Equal));

    if let Some(threat) = threat {
        let gap = threat.pos.x - front;
        if gap < JUMP_LOOKAHEAD && player.grounded {
            actions.push(Action::StartJump);
        }
        if gap < SHOOT_RANGE && snap.state.ammo > 0 && snap.time_ticks % 12 == 0 {
            actions.push(Action::Shoot);
        }
    }
    if player.holding_jump && player.vel.y > -2.0 {
        actions.push(Action::StopJump);
    }
    actions
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let seconds = args
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(DEFAULT_RUN_SECONDS);

    let store: Box<dyn HighScoreStore> = match settings.high_score_path.as_ref().map(JsonFileHighScores::open) {
        Some(Ok(store)) => Box::new(store),
        Some(Err(e)) => {
            log::warn!("High score file unavailable ({}), keeping scores in memory", e);
            Box::new(MemoryHighScores::new())
        }
        None => Box::new(MemoryHighScores::new()),
    };
    let cues = CueRecorder::default();

    log::info!("Frontier Runner (headless) starting, seed {}", settings.seed);
    let mut sim = Simulation::new(settings, store, Box::new(cues.clone()));

    let frames = (f64::from(seconds) * 1000.0 / FIXED_STEP_MS) as u64;
    let mut runs = 0u32;
    let mut best = 0u64;
    let (mut jumps, mut shots, mut bosses) = (0usize, 0usize, 0usize);
    for _ in 0..frames {
        let snap = sim.snapshot();
        for action in autopilot(&snap) {
            if action == Action::Start {
                runs += 1;
            }
            sim.apply(action);
        }
        sim.frame(FIXED_STEP_MS);
        best = best.max(sim.state().score);
        for cue in cues.take() {
            match cue {
                SoundCue::Jump => jumps += 1,
                SoundCue::Shoot => shots += 1,
                SoundCue::BossSpawn => bosses += 1,
                _ => {}
            }
        }
    }

    let state = sim.state();
    log::info!(
        "Done after {} runs: phase {:?}, level {}, score {}, best {}, high score {}",
        runs,
        sim.phase(),
        state.level,
        state.score,
        best,
        sim.high_score()
    );
    println!(
        "runs={} best={} level={} defeated={} avoided={} jumps={} shots={} bosses={}",
        runs,
        best,
        state.level,
        state.enemies_defeated,
        state.obstacles_avoided,
        jumps,
        shots,
        bosses,
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Frontends embed the library directly
}
