//! Collision detection and resolution
//!
//! Obstacles are bucketed into a uniform hash grid every tick. The player and
//! each bullet only test the obstacles sharing their cells, so cost stays
//! close to linear in entity count.

use std::collections::HashMap;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::entity::{EntityStore, Obstacle, ObstacleCategory, ObstacleKind};
use super::physics;
use super::state::GameState;
use crate::Rect;
use crate::consts::*;
use crate::theme::ThemeConfig;

/// Uniform grid keyed by cell coordinate, storing obstacle indices
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<IVec2, Vec<usize>>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(GRID_CELL_SIZE)
    }
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: HashMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    #[inline]
    fn cell_of(&self, p: Vec2) -> IVec2 {
        IVec2::new(
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }

    /// Insert into every cell the box overlaps
    pub fn insert(&mut self, index: usize, rect: Rect) {
        let lo = self.cell_of(rect.min);
        let hi = self.cell_of(rect.max());
        for cx in lo.x..=hi.x {
            for cy in lo.y..=hi.y {
                self.cells.entry(IVec2::new(cx, cy)).or_default().push(index);
            }
        }
    }

    pub fn rebuild(&mut self, obstacles: &[Obstacle]) {
        self.clear();
        for (index, obstacle) in obstacles.iter().enumerate() {
            self.insert(index, obstacle.rect());
        }
    }

    /// Indices sharing a cell with `rect`, de-duplicated, in obstacle order
    pub fn query_rect(&self, rect: Rect) -> Vec<usize> {
        self.collect_cells(self.cell_of(rect.min), self.cell_of(rect.max()))
    }

    /// Indices in cells that may lie within `radius` of `center`
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<usize> {
        let r = Vec2::splat(radius);
        self.collect_cells(self.cell_of(center - r), self.cell_of(center + r))
    }

    fn collect_cells(&self, lo: IVec2, hi: IVec2) -> Vec<usize> {
        let mut found = Vec::new();
        for cx in lo.x..=hi.x {
            for cy in lo.y..=hi.y {
                if let Some(indices) = self.cells.get(&IVec2::new(cx, cy)) {
                    found.extend_from_slice(indices);
                }
            }
        }
        found.sort_unstable();
        found.dedup();
        found
    }
}

/// An obstacle killed this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyedObstacle {
    pub id: u32,
    pub category: ObstacleCategory,
    /// Killed by a chain strike rather than a bullet
    pub chained: bool,
}

/// Everything collision resolution did this tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    pub destroyed: Vec<DestroyedObstacle>,
    pub player_hit: bool,
    pub player_died: bool,
    /// Ammo picked up from collectibles
    pub collected: u32,
}

/// Collision pass owner; the grid is reused across ticks
#[derive(Debug, Clone, Default)]
pub struct CollisionEngine {
    grid: SpatialGrid,
    /// Ignore contact damage (debug)
    pub god_mode: bool,
}

impl CollisionEngine {
    pub fn new(god_mode: bool) -> Self {
        Self {
            grid: SpatialGrid::default(),
            god_mode,
        }
    }

    pub fn update(&mut self, entities: &mut EntityStore, state: &mut GameState, theme: &ThemeConfig) -> CollisionOutcome {
        let mut outcome = CollisionOutcome::default();
        self.grid.rebuild(&entities.obstacles);
        let mut removed = vec![false; entities.obstacles.len()];

        self.resolve_player(entities, state, &mut removed, &mut outcome);
        if !outcome.player_died {
            self.resolve_bullets(entities, theme, &mut removed, &mut outcome);
        }

        let mut index = 0;
        entities.obstacles.retain(|_| {
            let keep = !removed[index];
            index += 1;
            keep
        });
        outcome
    }

    /// First overlapping obstacle only; at most one player collision per tick
    fn resolve_player(
        &self,
        entities: &mut EntityStore,
        state: &mut GameState,
        removed: &mut [bool],
        outcome: &mut CollisionOutcome,
    ) {
        if physics::is_invulnerable(&entities.player, state) {
            return;
        }
        let player_rect = entities.player.rect();
        for index in self.grid.query_rect(player_rect) {
            let obstacle = &entities.obstacles[index];
            if !obstacle.rect().overlaps(&player_rect) {
                continue;
            }
            if let ObstacleKind::AmmoBox { reward } = obstacle.kind {
                state.ammo += reward;
                outcome.collected += reward;
                removed[index] = true;
                log::debug!("Collected ammo box #{} (+{})", obstacle.id, reward);
                return;
            }
            if self.god_mode {
                continue;
            }

            removed[index] = true;
            outcome.player_hit = true;
            state.bullets_hit = 0;
            physics::arm_damage_grace(&mut entities.player, state);
            if state.lose_life() {
                outcome.player_died = true;
            }
            log::debug!("Player hit by {} #{}, lives {}", obstacle.name, obstacle.id, state.lives);
            return;
        }
    }

    fn resolve_bullets(
        &self,
        entities: &mut EntityStore,
        theme: &ThemeConfig,
        removed: &mut [bool],
        outcome: &mut CollisionOutcome,
    ) {
        let EntityStore { obstacles, bullets, .. } = entities;
        bullets.retain(|bullet| {
            let bullet_rect = bullet.rect();
            let target = self.grid.query_rect(bullet_rect).into_iter().find(|&i| {
                let o = &obstacles[i];
                !removed[i] && !o.is_collectible() && o.rect().overlaps(&bullet_rect)
            });
            let Some(index) = target else {
                return true;
            };

            if obstacles[index].take_damage(bullet.damage()) {
                removed[index] = true;
                outcome.destroyed.push(DestroyedObstacle {
                    id: obstacles[index].id,
                    category: obstacles[index].category(),
                    chained: false,
                });
                if bullet.enhanced && theme.chain_strikes {
                    self.chain_strike(obstacles, index, removed, outcome);
                }
            }
            false
        });
    }

    /// Arc from a killed obstacle to its nearest-by-order neighbours
    fn chain_strike(
        &self,
        obstacles: &mut [Obstacle],
        source: usize,
        removed: &mut [bool],
        outcome: &mut CollisionOutcome,
    ) {
        let center = obstacles[source].rect().center();
        let targets: Vec<usize> = self
            .grid
            .query_radius(center, CHAIN_RADIUS)
            .into_iter()
            .filter(|&i| {
                i != source
                    && !removed[i]
                    && !obstacles[i].is_collectible()
                    && obstacles[i].rect().center().distance(center) <= CHAIN_RADIUS
            })
            .take(CHAIN_MAX_TARGETS)
            .collect();

        for index in targets {
            let obstacle = &mut obstacles[index];
            if obstacle.take_damage(CHAIN_DAMAGE) {
                removed[index] = true;
                outcome.destroyed.push(DestroyedObstacle {
                    id: obstacle.id,
                    category: obstacle.category(),
                    chained: true,
                });
            }
        }
    }
}
