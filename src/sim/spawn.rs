//! Obstacle spawning
//!
//! One countdown decides when to spawn; one uniform sample decides what.
//! Both the category mix and the cadence tighten as the level rises.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{EntityStore, Obstacle, ObstacleCategory, ObstacleKind};
use super::state::GameState;
use super::timer::Timer;
use crate::consts::*;
use crate::theme::{EnemySpec, Placement, ThemeConfig};

/// Chance that a spawn is an ammo box (while boxes remain this level)
pub const AMMO_BOX_CHANCE: f32 = 0.08;

/// Fraction of the base interval removed at the difficulty asymptote
const TIMER_REDUCTION: f32 = 0.65;
/// How quickly the interval approaches its asymptote per level
const TIMER_CURVE: f32 = 0.25;
/// Intervals never fall below this fraction of the base
const TIMER_FLOOR_FRACTION: f32 = 0.25;

/// Band order for the cumulative draw
const BAND_ORDER: [ObstacleCategory; 6] = [
    ObstacleCategory::Boss,
    ObstacleCategory::Flying,
    ObstacleCategory::Medium,
    ObstacleCategory::Human,
    ObstacleCategory::Static,
    ObstacleCategory::Rock,
];

/// Spawn interval (base, min) in ticks per category
pub fn timer_range(category: ObstacleCategory) -> (u32, u32) {
    match category {
        ObstacleCategory::AmmoBox => (100, 40),
        ObstacleCategory::Boss => (180, 50),
        ObstacleCategory::Flying => (100, 20),
        ObstacleCategory::Medium => (120, 30),
        ObstacleCategory::Human => (100, 20),
        ObstacleCategory::Static => (80, 20),
        ObstacleCategory::Rock => (70, 15),
    }
}

/// Ticks until the next spawn after spawning `category` at `level`
pub fn effective_timer(category: ObstacleCategory, level: u32) -> u32 {
    let (base, min) = timer_range(category);
    let base_f = base as f32;
    let reduction = base_f * TIMER_REDUCTION * (1.0 - (-TIMER_CURVE * level as f32).exp());
    let scaled = (base_f - reduction).floor() as u32;
    let floor = min.max((base_f * TIMER_FLOOR_FRACTION).floor() as u32);
    scaled.max(floor)
}

/// Per-category weights for `level`, in band order, summing to 1
pub fn spawn_weights(level: u32) -> [(ObstacleCategory, f32); 6] {
    let l = level as f32;
    let boss = (0.05 + 0.02 * l).min(0.30);
    let flying = (0.08 + 0.01 * l).min(0.35);
    let medium = (0.07 + 0.008 * l).min(0.30);
    let human = (0.06 + 0.006 * l).min(0.10);
    let static_ = 0.5;

    let named = boss + flying + medium + human + static_;
    let filler = (1.0 - named).max(0.0);
    let total = named + filler;
    // Scale down when the named chances alone exceed 1
    let scale = if total > 1.0 { 1.0 / total } else { 1.0 };

    let raw = [boss, flying, medium, human, static_, filler];
    let mut weights = [(ObstacleCategory::Rock, 0.0); 6];
    for (slot, (category, weight)) in weights.iter_mut().zip(BAND_ORDER.iter().zip(raw)) {
        *slot = (*category, weight * scale);
    }
    weights
}

/// Map a uniform sample in [0, 1) to a band
pub fn pick_category(r: f32, level: u32) -> ObstacleCategory {
    let mut cumulative = 0.0;
    for (category, weight) in spawn_weights(level) {
        cumulative += weight;
        if r < cumulative {
            return category;
        }
    }
    // Float round-off at the top of the range
    ObstacleCategory::Rock
}

/// Spawn cadence owner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnScheduler {
    timer: Timer,
    pub log_spawns: bool,
}

impl SpawnScheduler {
    pub fn new(log_spawns: bool) -> Self {
        Self {
            timer: Timer::default(),
            log_spawns,
        }
    }

    /// Spawn immediately on the next update
    pub fn reset(&mut self) {
        self.timer.clear();
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Run one tick of the scheduler; returns the category spawned, if any
    pub fn update<R: Rng>(
        &mut self,
        entities: &mut EntityStore,
        state: &mut GameState,
        theme: &ThemeConfig,
        rng: &mut R,
    ) -> Option<ObstacleCategory> {
        let mut spawned = None;
        if self.timer.expired() {
            let r: f32 = rng.random();
            let category = if r < AMMO_BOX_CHANCE && state.boxes_found_this_level < MAX_AMMO_BOXES_PER_LEVEL {
                state.boxes_found_this_level += 1;
                ObstacleCategory::AmmoBox
            } else {
                pick_category(r, state.level)
            };

            let id = spawn_obstacle(entities, theme, category, theme.enemies.get(category), rng);
            if self.log_spawns {
                log::info!(
                    "Spawned {} #{} ({}) at level {}",
                    theme.enemies.get(category).name,
                    id,
                    category.as_str(),
                    state.level
                );
            } else {
                log::debug!("Spawned {} #{}", category.as_str(), id);
            }
            self.timer.arm(effective_timer(category, state.level));
            spawned = Some(category);
        }
        self.timer.tick();
        spawned
    }

    /// Spawn a theme enemy by name; unknown names fall back to the filler kind
    pub fn spawn_named<R: Rng>(
        &self,
        name: &str,
        entities: &mut EntityStore,
        theme: &ThemeConfig,
        rng: &mut R,
    ) -> ObstacleCategory {
        let (category, spec) = match theme.enemies.find(name) {
            Some(found) => found,
            None => {
                log::warn!("Unknown enemy '{}' in theme '{}', spawning filler", name, theme.id);
                (ObstacleCategory::Rock, &theme.enemies.rock)
            }
        };
        spawn_obstacle(entities, theme, category, spec, rng);
        category
    }
}

/// Build an obstacle at the right edge and push it to the store
fn spawn_obstacle<R: Rng>(
    entities: &mut EntityStore,
    theme: &ThemeConfig,
    category: ObstacleCategory,
    spec: &EnemySpec,
    rng: &mut R,
) -> u32 {
    let y = match spec.placement {
        Placement::Ground => GROUND_Y - spec.size.y,
        Placement::Air => {
            let (low, high) = theme.flying_band;
            low + rng.random::<f32>() * (high - low)
        }
    };

    let kind = match category {
        ObstacleCategory::AmmoBox => ObstacleKind::AmmoBox { reward: spec.reward },
        ObstacleCategory::Boss => ObstacleKind::Boss {
            vertical_velocity: 0.0,
            jump_timer: Timer::new(BOSS_JUMP_TIMER_MIN + rng.random_range(0..BOSS_JUMP_TIMER_SPAN)),
        },
        ObstacleCategory::Flying => ObstacleKind::Flying,
        ObstacleCategory::Medium => ObstacleKind::Medium,
        ObstacleCategory::Human => ObstacleKind::Human,
        ObstacleCategory::Static => ObstacleKind::Static,
        ObstacleCategory::Rock => ObstacleKind::Rock,
    };

    let id = entities.next_entity_id();
    entities.obstacles.push(Obstacle {
        id,
        name: spec.name.clone(),
        kind,
        pos: Vec2::new(ARENA_WIDTH, y),
        size: spec.size,
        health: spec.health,
        max_health: spec.health,
        passed: false,
        anim_time: rng.random::<f32>() * 1000.0,
    });
    id
}
