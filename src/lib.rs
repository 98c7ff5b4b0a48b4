//! Frontier Runner - side-scrolling obstacle-avoidance game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, progression)
//! - `theme`: Read-only per-theme data (enemy table, buff catalog, labels)
//! - `settings`: Session configuration
//! - `highscores`: High score persistence collaborator
//! - `audio`: Sound cue collaborator
//!
//! Rendering, HUD and sound synthesis live outside this crate and only read
//! snapshots or deliver actions.

pub mod audio;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod theme;

pub use error::{Result, RunnerError};
pub use settings::Settings;
pub use sim::{Action, GamePhase, Simulation};
pub use theme::ThemeConfig;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const FIXED_STEP_MS: f64 = 1000.0 / 60.0;
    /// Maximum ticks per frame; excess time is dropped
    pub const MAX_TICKS_PER_FRAME: u32 = 5;
    /// Longest frame delta accepted by the accumulator
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 500.0;
    /// Floor plane (top of the ground strip)
    pub const GROUND_Y: f32 = 364.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_START_X: f32 = 120.0;
    pub const PLAYER_MOVE_SPEED: f32 = 4.0;

    /// Gravity while falling or resting
    pub const GRAVITY: f32 = 1.5;
    /// Gravity while ascending (variable jump height)
    pub const LIGHT_GRAVITY: f32 = 0.4;
    pub const JUMP_STRENGTH: f32 = -8.0;
    pub const DOUBLE_JUMP_STRENGTH: f32 = -6.0;
    /// Ticks the jump button can extend a jump
    pub const MAX_JUMP_HOLD_TIME: u32 = 90;
    /// Extra upward impulse per held tick at the start of a jump
    pub const JUMP_HOLD_BOOST: f32 = 0.3;

    /// Bullets
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_WIDTH: f32 = 8.0;
    pub const BULLET_HEIGHT: f32 = 4.0;
    /// Bullets are culled this far past either arena edge
    pub const BULLET_CULL_MARGIN: f32 = 50.0;
    pub const MULTI_SHOT_COUNT: u32 = 3;
    pub const MULTI_SHOT_SPACING: f32 = 8.0;

    /// Invulnerability durations (ticks)
    pub const DAMAGE_RESISTANCE_TIME: u32 = 60;
    pub const POST_BUFF_INVULNERABILITY: u32 = 120;
    pub const POST_DAMAGE_INVULNERABILITY: u32 = 60;
    /// Blink half-period for the invulnerability flash (ticks)
    pub const BLINK_FREQUENCY: u32 = 8;

    /// Session start values
    pub const INITIAL_LIVES: u32 = 4;
    pub const INITIAL_AMMO: u32 = 5;
    pub const INITIAL_GAME_SPEED: f32 = 2.0;

    /// Level progression
    pub const MAX_LEVEL_PROGRESS: u32 = 100;
    /// Tolerated overshoot before clamping
    pub const LEVEL_PROGRESS_SLACK: u32 = 10;
    /// Progress a fresh level starts with
    pub const LEVEL_PROGRESS_BASELINE: u32 = 1;
    pub const PROGRESS_PER_PASS: u32 = 2;
    pub const PROGRESS_PER_KILL: u32 = 3;
    pub const SPEED_INCREMENT_PER_LEVEL: f32 = 0.6;
    pub const AMMO_PER_LEVEL: u32 = 12;
    /// Buff offers appear every n-th level
    pub const BUFF_LEVEL_INTERVAL: u32 = 2;

    /// Rewards
    pub const POINTS_PER_OBSTACLE_AVOIDED: u64 = 10;
    pub const OBSTACLES_FOR_AMMO_BONUS: u32 = 10;
    pub const AMMO_PER_AVOIDANCE_BONUS: u32 = 5;
    pub const AMMO_PER_BOX: u32 = 6;
    pub const MAX_AMMO_BOXES_PER_LEVEL: u32 = 2;
    pub const POINTS_LEVEL_BONUS: u64 = 5;

    /// Bullet kills needed for a bonus life
    pub const DEFAULT_HITS_FOR_LIFE: u32 = 15;
    pub const BUFFED_HITS_FOR_LIFE: u32 = 10;

    /// Spatial grid cell size
    pub const GRID_CELL_SIZE: f32 = 64.0;
    /// Chain strike reach and limits
    pub const CHAIN_RADIUS: f32 = 80.0;
    pub const CHAIN_MAX_TARGETS: usize = 2;
    pub const CHAIN_DAMAGE: u32 = 1;

    /// Obstacle animation clock advance per tick (ms-scaled)
    pub const OBSTACLE_ANIM_STEP: f32 = 16.0;
    /// Boss jump AI
    pub const BOSS_JUMP_VELOCITY: f32 = -15.0;
    pub const BOSS_GRAVITY: f32 = 0.8;
    pub const BOSS_JUMP_TIMER_MIN: u32 = 180;
    pub const BOSS_JUMP_TIMER_SPAN: u32 = 240;
}

/// Axis-aligned box used for every overlap test
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: glam::Vec2,
    pub size: glam::Vec2,
}

impl Rect {
    #[inline]
    pub fn new(min: glam::Vec2, size: glam::Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> glam::Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> glam::Vec2 {
        self.min + self.size * 0.5
    }

    /// Half-open overlap test: touching edges do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}
