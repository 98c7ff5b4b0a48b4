//! Entities owned by the simulation: the player, obstacles and bullets
//!
//! Obstacles and bullets are kept in spawn order (ascending id) so every
//! pass over them is deterministic.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::timer::Timer;
use crate::Rect;
use crate::consts::*;

/// Horizontal facing of the player (and the direction a bullet was fired)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// +1 for right, -1 for left
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// The player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub jumping: bool,
    pub grounded: bool,
    /// Jump button still held (variable jump height)
    pub holding_jump: bool,
    pub double_jump_used: bool,
    pub facing: Facing,
    /// Ticks the current jump has been extended
    pub jump_hold_time: u32,
    pub damage_resistance: Timer,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, GROUND_Y - PLAYER_HEIGHT),
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            jumping: false,
            grounded: true,
            holding_jump: false,
            double_jump_used: false,
            facing: Facing::Right,
            jump_hold_time: 0,
            damage_resistance: Timer::default(),
        }
    }
}

impl Player {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Put the player back on the floor at the spawn point
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Top of the floor for this player's height
    #[inline]
    pub fn floor_y(&self) -> f32 {
        GROUND_Y - self.size.y
    }

    /// X coordinate of the edge the player faces
    #[inline]
    pub fn leading_x(&self) -> f32 {
        match self.facing {
            Facing::Right => self.pos.x + self.size.x,
            Facing::Left => self.pos.x,
        }
    }
}

/// Spawn category an obstacle was drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleCategory {
    AmmoBox,
    Boss,
    Flying,
    Medium,
    Human,
    Static,
    /// Filler kind; also the fallback for unknown names
    Rock,
}

impl ObstacleCategory {
    pub const ALL: [ObstacleCategory; 7] = [
        ObstacleCategory::AmmoBox,
        ObstacleCategory::Boss,
        ObstacleCategory::Flying,
        ObstacleCategory::Medium,
        ObstacleCategory::Human,
        ObstacleCategory::Static,
        ObstacleCategory::Rock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleCategory::AmmoBox => "ammoBox",
            ObstacleCategory::Boss => "boss",
            ObstacleCategory::Flying => "flying",
            ObstacleCategory::Medium => "medium",
            ObstacleCategory::Human => "human",
            ObstacleCategory::Static => "static",
            ObstacleCategory::Rock => "rock",
        }
    }
}

/// Per-kind obstacle data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Collectible ammo crate
    AmmoBox { reward: u32 },
    /// Jumping boss
    Boss {
        vertical_velocity: f32,
        jump_timer: Timer,
    },
    Flying,
    Medium,
    Human,
    Static,
    Rock,
}

impl ObstacleKind {
    pub fn category(&self) -> ObstacleCategory {
        match self {
            ObstacleKind::AmmoBox { .. } => ObstacleCategory::AmmoBox,
            ObstacleKind::Boss { .. } => ObstacleCategory::Boss,
            ObstacleKind::Flying => ObstacleCategory::Flying,
            ObstacleKind::Medium => ObstacleCategory::Medium,
            ObstacleKind::Human => ObstacleCategory::Human,
            ObstacleKind::Static => ObstacleCategory::Static,
            ObstacleKind::Rock => ObstacleCategory::Rock,
        }
    }
}

/// A hazard or pickup scrolling towards the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Theme enemy name (for renderers)
    pub name: String,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub health: u32,
    pub max_health: u32,
    /// Already counted as avoided
    pub passed: bool,
    /// Animation clock
    pub anim_time: f32,
}

impl Obstacle {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    #[inline]
    pub fn category(&self) -> ObstacleCategory {
        self.kind.category()
    }

    #[inline]
    pub fn is_collectible(&self) -> bool {
        matches!(self.kind, ObstacleKind::AmmoBox { .. })
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Apply damage; health saturates at zero.
    ///
    /// Returns true only for the hit that takes health from positive to zero.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.health == 0 {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }
}

/// A projectile fired by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    /// Signed horizontal speed
    pub speed: f32,
    /// Multi-shot bullets deal double damage
    pub enhanced: bool,
    pub direction: Facing,
}

impl Bullet {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT))
    }

    pub fn damage(&self) -> u32 {
        if self.enhanced { 2 } else { 1 }
    }

    pub fn off_screen(&self) -> bool {
        self.pos.x > ARENA_WIDTH + BULLET_CULL_MARGIN || self.pos.x < -BULLET_CULL_MARGIN
    }
}

/// Owner of every live entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    pub player: Player,
    /// Sorted by id
    pub obstacles: Vec<Obstacle>,
    /// Sorted by id
    pub bullets: Vec<Bullet>,
    next_id: u32,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self {
            player: Player::default(),
            obstacles: Vec::new(),
            bullets: Vec::new(),
            next_id: 1,
        }
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Drop everything and put the player back at the spawn point
    pub fn clear(&mut self) {
        self.player.reset();
        self.obstacles.clear();
        self.bullets.clear();
        self.next_id = 1;
    }

    pub fn remove_obstacles(&mut self, ids: &[u32]) {
        if ids.is_empty() {
            return;
        }
        self.obstacles.retain(|o| !ids.contains(&o.id));
    }

    /// Remove obstacles that scrolled past the left edge and stray bullets
    pub fn cull_off_screen(&mut self) {
        self.obstacles.retain(|o| o.pos.x + o.size.x >= 0.0);
        self.bullets.retain(|b| !b.off_screen());
    }

    /// Drop the oldest entities beyond the caps
    pub fn enforce_caps(&mut self, max_obstacles: usize, max_bullets: usize) {
        if self.obstacles.len() > max_obstacles {
            let excess = self.obstacles.len() - max_obstacles;
            log::debug!("Obstacle cap reached, dropping {} oldest", excess);
            self.obstacles.drain(..excess);
        }
        if self.bullets.len() > max_bullets {
            let excess = self.bullets.len() - max_bullets;
            self.bullets.drain(..excess);
        }
    }
}
