//! Session state: score, lives, ammo, level and buffs
//!
//! Everything here resets when a session starts or restarts. Entities live
//! in [`super::entity::EntityStore`].

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ability::AbilitySet;
use super::timer::Timer;
use crate::consts::*;
use crate::theme::{BuffOffer, ThemeConfig};

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Fresh generator for this seed. Each session restart draws the next
    /// stream so restarts do not replay the previous run.
    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed.wrapping_add(self.stream))
    }
}

/// Complete per-session game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    pub lives: u32,
    pub max_lives: u32,
    pub ammo: u32,
    pub level: u32,
    pub level_progress: u32,
    /// Scroll speed of obstacles (units per tick)
    pub game_speed: f32,
    pub enemies_defeated: u32,
    pub obstacles_avoided: u32,
    /// Bullet kills since the last damage or bonus life
    pub bullets_hit: u32,
    pub levels_completed: u32,
    pub boxes_found_this_level: u32,
    /// Grace period after choosing a buff
    pub post_buff_grace: Timer,
    /// Grace period after taking damage
    pub post_damage_grace: Timer,
    pub active_buffs: AbilitySet,
    /// Offers not yet taken this session
    pub available_buffs: Vec<BuffOffer>,
}

impl GameState {
    /// Fresh session state for a theme
    pub fn new(theme: &ThemeConfig) -> Self {
        Self {
            score: 0,
            lives: INITIAL_LIVES,
            max_lives: INITIAL_LIVES,
            ammo: INITIAL_AMMO,
            level: 1,
            level_progress: 0,
            game_speed: INITIAL_GAME_SPEED,
            enemies_defeated: 0,
            obstacles_avoided: 0,
            bullets_hit: 0,
            levels_completed: 0,
            boxes_found_this_level: 0,
            post_buff_grace: Timer::default(),
            post_damage_grace: Timer::default(),
            active_buffs: AbilitySet::new(),
            available_buffs: theme.buffs.clone(),
        }
    }

    /// Grant a life, raising the cap if needed
    pub fn add_life(&mut self) {
        self.lives += 1;
        if self.lives > self.max_lives {
            self.max_lives = self.lives;
        }
    }

    /// Take a life. Returns true when none are left.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    /// Add level progress, never past the tolerated overshoot
    pub fn add_progress(&mut self, amount: u32) {
        self.level_progress = (self.level_progress + amount).min(MAX_LEVEL_PROGRESS + LEVEL_PROGRESS_SLACK);
    }

    /// Repair any counter that drifted out of range
    pub fn clamp_invariants(&mut self) {
        if self.lives > self.max_lives {
            log::warn!("lives {} above max {}, clamping", self.lives, self.max_lives);
            self.lives = self.max_lives;
        }
        self.level = self.level.max(1);
        self.level_progress = self.level_progress.min(MAX_LEVEL_PROGRESS + LEVEL_PROGRESS_SLACK);
        if !self.game_speed.is_finite() || self.game_speed < INITIAL_GAME_SPEED {
            self.game_speed = INITIAL_GAME_SPEED;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_values() {
        let state = GameState::new(&ThemeConfig::cowboy());
        assert_eq!(state.lives, 4);
        assert_eq!(state.max_lives, 4);
        assert_eq!(state.ammo, 5);
        assert_eq!(state.level, 1);
        assert_eq!(state.level_progress, 0);
        assert_eq!(state.game_speed, 2.0);
        assert_eq!(state.available_buffs.len(), 3);
        assert!(state.active_buffs.is_empty());
    }

    #[test]
    fn test_add_life_raises_cap() {
        let mut state = GameState::new(&ThemeConfig::cowboy());
        state.add_life();
        assert_eq!(state.lives, 5);
        assert_eq!(state.max_lives, 5);
    }

    #[test]
    fn test_lose_life_saturates() {
        let mut state = GameState::new(&ThemeConfig::cowboy());
        state.lives = 1;
        assert!(state.lose_life());
        assert!(state.lose_life());
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_clamp_invariants() {
        let mut state = GameState::new(&ThemeConfig::cowboy());
        state.lives = 9;
        state.level = 0;
        state.level_progress = 500;
        state.clamp_invariants();
        assert_eq!(state.lives, state.max_lives);
        assert_eq!(state.level, 1);
        assert_eq!(state.level_progress, MAX_LEVEL_PROGRESS + LEVEL_PROGRESS_SLACK);
    }

    #[test]
    fn test_rng_streams_differ() {
        use rand::Rng;
        let mut a = RngState::new(7);
        let first: u32 = a.to_rng().random();
        a.stream += 1;
        let second: u32 = a.to_rng().random();
        assert_ne!(first, second);
        assert_eq!(RngState::new(7).to_rng().random::<u32>(), first);
    }
}
