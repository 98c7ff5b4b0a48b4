//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use rand::Rng;

use super::entity::{EntityStore, ObstacleCategory, ObstacleKind};
use super::phase::GamePhase;
use super::physics;
use super::progression::{self, Completion};
use super::session::Simulation;
use super::state::GameState;
use crate::audio::SoundCue;
use crate::consts::*;

/// Rounding slack when comparing the accumulator against a step
const STEP_EPSILON_MS: f64 = 1e-6;

/// Wall-clock to tick accumulator
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    accumulator: f64,
    max_ticks: u32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(MAX_TICKS_PER_FRAME)
    }
}

impl FixedTimestep {
    pub fn new(max_ticks: u32) -> Self {
        Self {
            accumulator: 0.0,
            max_ticks: max_ticks.max(1),
        }
    }

    /// Add a frame delta, clamped to [0, MAX_FRAME_DELTA_MS]
    pub fn accumulate(&mut self, delta_ms: f64) {
        if delta_ms.is_finite() {
            self.accumulator += delta_ms.clamp(0.0, MAX_FRAME_DELTA_MS);
        }
    }

    /// Consume one step if enough time has built up and the cap allows it
    pub fn take_tick(&mut self, ticks_this_frame: u32) -> bool {
        if self.accumulator + STEP_EPSILON_MS >= FIXED_STEP_MS && ticks_this_frame < self.max_ticks {
            self.accumulator = (self.accumulator - FIXED_STEP_MS).max(0.0);
            true
        } else {
            false
        }
    }

    /// Drop whole steps the tick cap left behind
    pub fn drop_excess(&mut self) {
        let whole = ((self.accumulator + STEP_EPSILON_MS) / FIXED_STEP_MS).floor();
        if whole >= 1.0 {
            log::debug!("Dropping {:.1} ms of simulation time", whole * FIXED_STEP_MS);
            self.accumulator = (self.accumulator - whole * FIXED_STEP_MS).max(0.0);
        }
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Fraction of a step left over, for render interpolation
    pub fn interpolation(&self) -> f32 {
        ((self.accumulator / FIXED_STEP_MS) as f32).clamp(0.0, 1.0 - f32::EPSILON)
    }
}

/// Translate obstacles and bullets and run per-kind animation/AI
pub fn move_entities<R: Rng>(entities: &mut EntityStore, state: &GameState, rng: &mut R) {
    for obstacle in entities.obstacles.iter_mut() {
        obstacle.pos.x -= state.game_speed;
        obstacle.anim_time += OBSTACLE_ANIM_STEP;
        let floor = (GROUND_Y - obstacle.size.y).max(0.0);

        match &mut obstacle.kind {
            ObstacleKind::Boss {
                vertical_velocity,
                jump_timer,
            } => {
                jump_timer.tick();
                let grounded = obstacle.pos.y >= floor;
                if jump_timer.expired() && grounded {
                    *vertical_velocity = BOSS_JUMP_VELOCITY;
                    jump_timer.arm(BOSS_JUMP_TIMER_MIN + rng.random_range(0..BOSS_JUMP_TIMER_SPAN));
                }
                if *vertical_velocity != 0.0 || !grounded {
                    *vertical_velocity += BOSS_GRAVITY;
                    obstacle.pos.y += *vertical_velocity;
                    if obstacle.pos.y >= floor {
                        obstacle.pos.y = floor;
                        *vertical_velocity = 0.0;
                    }
                }
            }
            ObstacleKind::Flying => {
                obstacle.pos.y = (obstacle.pos.y + (obstacle.anim_time * 0.01).sin() * 1.5).clamp(0.0, floor);
            }
            ObstacleKind::AmmoBox { .. } => {
                obstacle.pos.y = (obstacle.pos.y + (obstacle.anim_time * 0.003).sin() * 2.0).clamp(0.0, floor);
            }
            ObstacleKind::Medium | ObstacleKind::Human | ObstacleKind::Static | ObstacleKind::Rock => {}
        }
    }

    for bullet in entities.bullets.iter_mut() {
        bullet.pos.x += bullet.speed;
    }
}

/// Remove what left the arena, enforce caps, repair drift
fn housekeeping(entities: &mut EntityStore, state: &mut GameState, max_obstacles: usize, max_bullets: usize) {
    entities.cull_off_screen();
    entities.enforce_caps(max_obstacles, max_bullets);
    for obstacle in entities.obstacles.iter_mut() {
        obstacle.health = obstacle.health.min(obstacle.max_health);
    }
    state.clamp_invariants();
}

impl Simulation {
    /// Advance the game by one fixed timestep
    ///
    /// Order: physics, spawning, entity motion, collisions, progression,
    /// then housekeeping. Does nothing unless Playing.
    pub fn tick(&mut self) {
        if !self.machine.running() {
            return;
        }
        self.time_ticks += 1;

        physics::update(&mut self.entities.player, &mut self.state, self.held);

        let spawned = self
            .spawner
            .update(&mut self.entities, &mut self.state, &self.theme, &mut self.rng);
        if spawned == Some(ObstacleCategory::Boss) {
            self.audio.play(SoundCue::BossSpawn);
        }

        move_entities(&mut self.entities, &self.state, &mut self.rng);

        let outcome = self.collisions.update(&mut self.entities, &mut self.state, &self.theme);
        if outcome.collected > 0 {
            self.audio.play(SoundCue::Collect);
        }
        if outcome.player_hit {
            self.audio.play(SoundCue::Hit);
        }
        for _ in &outcome.destroyed {
            self.audio.play(SoundCue::Hit);
        }

        let (max_obstacles, max_bullets) = (self.settings.max_obstacles, self.settings.max_bullets);
        if outcome.player_died {
            housekeeping(&mut self.entities, &mut self.state, max_obstacles, max_bullets);
            self.game_over();
            return;
        }

        let events = progression::update(&mut self.entities, &mut self.state, &self.theme, &outcome.destroyed);
        if events.bonus_lives > 0 {
            self.audio.play(SoundCue::PowerUp);
        }

        housekeeping(&mut self.entities, &mut self.state, max_obstacles, max_bullets);

        if events.completion == Some(Completion::AwaitingBuff) {
            self.audio.play(SoundCue::LevelComplete);
            self.machine.enter(GamePhase::LevelComplete);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Bullet, Facing, Obstacle};
    use crate::sim::spawn::SpawnScheduler;
    use crate::sim::timer::Timer;
    use crate::theme::ThemeConfig;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn boss(store: &mut EntityStore, timer: u32) {
        let id = store.next_entity_id();
        store.obstacles.push(Obstacle {
            id,
            name: "boss".into(),
            kind: ObstacleKind::Boss {
                vertical_velocity: 0.0,
                jump_timer: Timer::new(timer),
            },
            pos: Vec2::new(600.0, GROUND_Y - 57.0),
            size: Vec2::new(63.0, 57.0),
            health: 6,
            max_health: 6,
            passed: false,
            anim_time: 0.0,
        });
    }

    #[test]
    fn test_timestep_accumulates_and_caps() {
        let mut clock = FixedTimestep::new(5);
        clock.accumulate(FIXED_STEP_MS * 2.5);
        let mut ticks = 0;
        while clock.take_tick(ticks) {
            ticks += 1;
        }
        assert_eq!(ticks, 2);
        assert!((clock.interpolation() - 0.5).abs() < 1e-4);

        clock.reset();
        clock.accumulate(-5.0);
        clock.accumulate(f64::NAN);
        assert_eq!(clock.interpolation(), 0.0);
    }

    #[test]
    fn test_excess_steps_dropped() {
        let mut clock = FixedTimestep::new(2);
        clock.accumulate(FIXED_STEP_MS * 4.25);
        let mut ticks = 0;
        while clock.take_tick(ticks) {
            ticks += 1;
        }
        assert_eq!(ticks, 2);
        clock.drop_excess();
        assert!((clock.interpolation() - 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_capped_frame_leaves_no_whole_step() {
        // 100 ms is six steps up to rounding; the sixth must be dropped
        let mut clock = FixedTimestep::new(5);
        clock.accumulate(100.0);
        let mut ticks = 0;
        while clock.take_tick(ticks) {
            ticks += 1;
        }
        assert_eq!(ticks, 5);
        clock.drop_excess();
        assert!(clock.interpolation() < 1.0);
        assert!(clock.interpolation() < 1e-3);

        clock.reset();
        clock.accumulate(FIXED_STEP_MS * 3.0);
        let mut ticks = 0;
        while clock.take_tick(ticks) {
            ticks += 1;
        }
        assert_eq!(ticks, 3);
        assert!(clock.interpolation() < 1e-3);
    }

    #[test]
    fn test_oversized_flyer_does_not_panic() {
        let mut theme = ThemeConfig::cowboy();
        theme.enemies.flying.size.y = GROUND_Y + 36.0;
        let state = GameState::new(&theme);
        let mut store = EntityStore::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let spawner = SpawnScheduler::new(false);
        spawner.spawn_named("vulture", &mut store, &theme, &mut rng);
        for _ in 0..10 {
            move_entities(&mut store, &state, &mut rng);
        }
        assert_eq!(store.obstacles[0].pos.y, 0.0);
    }

    #[test]
    fn test_motion() {
        let theme = ThemeConfig::cowboy();
        let state = GameState::new(&theme);
        let mut store = EntityStore::new();
        let mut rng = Pcg32::seed_from_u64(1);
        boss(&mut store, 50);
        store.bullets.push(Bullet {
            id: 9,
            pos: Vec2::new(100.0, 300.0),
            speed: -BULLET_SPEED,
            enhanced: false,
            direction: Facing::Left,
        });

        move_entities(&mut store, &state, &mut rng);
        assert_eq!(store.obstacles[0].pos.x, 600.0 - INITIAL_GAME_SPEED);
        assert_eq!(store.obstacles[0].anim_time, OBSTACLE_ANIM_STEP);
        assert_eq!(store.bullets[0].pos.x, 90.0);
    }

    #[test]
    fn test_boss_jumps_and_lands() {
        let theme = ThemeConfig::cowboy();
        let state = GameState::new(&theme);
        let mut store = EntityStore::new();
        let mut rng = Pcg32::seed_from_u64(1);
        boss(&mut store, 1);
        let floor = GROUND_Y - 57.0;

        move_entities(&mut store, &state, &mut rng);
        assert!(store.obstacles[0].pos.y < floor);
        match store.obstacles[0].kind {
            ObstacleKind::Boss { jump_timer, .. } => assert!(jump_timer.remaining() >= BOSS_JUMP_TIMER_MIN),
            _ => unreachable!(),
        }

        for _ in 0..60 {
            move_entities(&mut store, &state, &mut rng);
        }
        assert_eq!(store.obstacles[0].pos.y, floor);
    }

    #[test]
    fn test_flying_stays_in_arena() {
        let theme = ThemeConfig::cowboy();
        let state = GameState::new(&theme);
        let mut store = EntityStore::new();
        let mut rng = Pcg32::seed_from_u64(2);
        let spawner = SpawnScheduler::new(false);
        spawner.spawn_named("vulture", &mut store, &theme, &mut rng);
        for _ in 0..300 {
            move_entities(&mut store, &state, &mut rng);
            let y = store.obstacles[0].pos.y;
            assert!(y >= 0.0 && y <= GROUND_Y - 24.0);
        }
    }
}
