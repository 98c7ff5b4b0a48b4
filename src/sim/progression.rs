//! Scoring, level progress, bonus lives and buff selection

use super::ability::{Ability, AbilitySet};
use super::collision::DestroyedObstacle;
use super::entity::EntityStore;
use super::state::GameState;
use crate::consts::*;
use crate::theme::ThemeConfig;

/// What the level threshold triggered this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Halt and offer a buff
    AwaitingBuff,
    /// Moved straight on to the next level
    Advanced,
}

/// Progression results for one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressionEvents {
    pub passed: u32,
    pub ammo_bonus: bool,
    pub bonus_lives: u32,
    pub completion: Option<Completion>,
}

/// Kills needed for a bonus life with the given abilities
pub fn hits_for_life(abilities: &AbilitySet) -> u32 {
    if abilities.contains(Ability::ExtraLife) {
        BUFFED_HITS_FOR_LIFE
    } else {
        DEFAULT_HITS_FOR_LIFE
    }
}

/// Points for destroying an obstacle of `category` at the current level
pub fn kill_points(theme: &ThemeConfig, state: &GameState, destroyed: &DestroyedObstacle) -> u64 {
    theme.enemies.points(destroyed.category) + u64::from(state.level - 1) * POINTS_LEVEL_BONUS
}

/// Count passes, score kills, then check the level threshold
pub fn update(
    entities: &mut EntityStore,
    state: &mut GameState,
    theme: &ThemeConfig,
    destroyed: &[DestroyedObstacle],
) -> ProgressionEvents {
    let mut events = ProgressionEvents::default();
    let player_x = entities.player.pos.x;

    for obstacle in entities.obstacles.iter_mut() {
        if obstacle.passed || obstacle.is_collectible() || obstacle.pos.x + obstacle.size.x >= player_x {
            continue;
        }
        obstacle.passed = true;
        events.passed += 1;
        state.obstacles_avoided += 1;
        state.score += POINTS_PER_OBSTACLE_AVOIDED;
        state.add_progress(PROGRESS_PER_PASS);
        if state.obstacles_avoided % OBSTACLES_FOR_AMMO_BONUS == 0 {
            state.ammo += AMMO_PER_AVOIDANCE_BONUS;
            events.ammo_bonus = true;
            log::debug!("Avoidance bonus: +{} ammo", AMMO_PER_AVOIDANCE_BONUS);
        }
    }

    for kill in destroyed {
        let points = kill_points(theme, state, kill);
        state.score += points;
        state.enemies_defeated += 1;
        state.add_progress(PROGRESS_PER_KILL);
        state.bullets_hit += 1;
        if state.bullets_hit >= hits_for_life(&state.active_buffs) {
            state.add_life();
            state.bullets_hit = 0;
            events.bonus_lives += 1;
            log::info!("Bonus life! lives {}", state.lives);
        }
    }

    if state.level_progress >= MAX_LEVEL_PROGRESS {
        if state.level % BUFF_LEVEL_INTERVAL == 0 && !state.available_buffs.is_empty() {
            log::info!("Level {} complete, awaiting buff choice", state.level);
            events.completion = Some(Completion::AwaitingBuff);
        } else {
            advance_level(state);
            events.completion = Some(Completion::Advanced);
        }
    }

    events
}

/// Move to the next level
pub fn advance_level(state: &mut GameState) {
    state.level += 1;
    state.level_progress = LEVEL_PROGRESS_BASELINE;
    state.boxes_found_this_level = 0;
    state.game_speed += SPEED_INCREMENT_PER_LEVEL;
    state.levels_completed += 1;
    state.ammo += AMMO_PER_LEVEL;
    log::info!("Level {} (speed {:.1})", state.level, state.game_speed);
}

/// Take a buff offer by id, then advance. Returns None for ids not on offer.
pub fn choose_buff(state: &mut GameState, id: &str) -> Option<Ability> {
    let Some(position) = state.available_buffs.iter().position(|b| b.id == id) else {
        log::warn!("Buff '{}' is not on offer", id);
        return None;
    };
    let Some(ability) = state.available_buffs[position].ability() else {
        log::warn!("Buff '{}' maps to no ability", id);
        return None;
    };

    let offer = state.available_buffs.remove(position);
    if !state.active_buffs.insert(ability) {
        log::debug!("{} already active", ability.key());
    }
    log::info!("Buff selected: {} ({})", offer.title, ability.key());
    advance_level(state);
    state.post_buff_grace.arm(POST_BUFF_INVULNERABILITY);
    Some(ability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Obstacle, ObstacleCategory, ObstacleKind};
    use glam::Vec2;

    fn passed_rock(store: &mut EntityStore) {
        let id = store.next_entity_id();
        store.obstacles.push(Obstacle {
            id,
            name: "rock".into(),
            kind: ObstacleKind::Rock,
            pos: Vec2::new(10.0, 324.0),
            size: Vec2::new(40.0, 40.0),
            health: 1,
            max_health: 1,
            passed: false,
            anim_time: 0.0,
        });
    }

    fn kill(category: ObstacleCategory) -> DestroyedObstacle {
        DestroyedObstacle {
            id: 0,
            category,
            chained: false,
        }
    }

    #[test]
    fn test_tenth_avoidance_grants_ammo() {
        let theme = ThemeConfig::cowboy();
        let mut store = EntityStore::new();
        let mut state = GameState::new(&theme);
        state.obstacles_avoided = 9;
        passed_rock(&mut store);

        let events = update(&mut store, &mut state, &theme, &[]);
        assert_eq!(events.passed, 1);
        assert!(events.ammo_bonus);
        assert_eq!(state.obstacles_avoided, 10);
        assert_eq!(state.ammo, INITIAL_AMMO + 5);
        assert_eq!(state.score, 10);
        assert_eq!(state.level_progress, 2);

        // Counted once
        let events = update(&mut store, &mut state, &theme, &[]);
        assert_eq!(events.passed, 0);
    }

    #[test]
    fn test_collectibles_never_pass() {
        let theme = ThemeConfig::cowboy();
        let mut store = EntityStore::new();
        let mut state = GameState::new(&theme);
        passed_rock(&mut store);
        store.obstacles[0].kind = ObstacleKind::AmmoBox { reward: 6 };
        let events = update(&mut store, &mut state, &theme, &[]);
        assert_eq!(events.passed, 0);
    }

    #[test]
    fn test_kill_scoring_scales_with_level() {
        let theme = ThemeConfig::cowboy();
        let mut store = EntityStore::new();
        let mut state = GameState::new(&theme);
        state.level = 3;
        update(&mut store, &mut state, &theme, &[kill(ObstacleCategory::Boss)]);
        assert_eq!(state.score, 100 + 2 * 5);
        assert_eq!(state.enemies_defeated, 1);
        assert_eq!(state.level_progress, 3);
        assert_eq!(state.bullets_hit, 1);
    }

    #[test]
    fn test_streak_bonus_life() {
        let theme = ThemeConfig::cowboy();
        let mut store = EntityStore::new();
        let mut state = GameState::new(&theme);
        state.bullets_hit = 14;
        let events = update(&mut store, &mut state, &theme, &[kill(ObstacleCategory::Rock)]);
        assert_eq!(events.bonus_lives, 1);
        assert_eq!(state.lives, 5);
        assert_eq!(state.max_lives, 5);
        assert_eq!(state.bullets_hit, 0);

        state.active_buffs.insert(Ability::ExtraLife);
        state.bullets_hit = 9;
        let events = update(&mut store, &mut state, &theme, &[kill(ObstacleCategory::Rock)]);
        assert_eq!(events.bonus_lives, 1);
    }

    #[test]
    fn test_even_level_waits_for_buff() {
        let theme = ThemeConfig::cowboy();
        let mut store = EntityStore::new();
        let mut state = GameState::new(&theme);
        state.level = 2;
        state.level_progress = 100;
        let events = update(&mut store, &mut state, &theme, &[]);
        assert_eq!(events.completion, Some(Completion::AwaitingBuff));
        assert_eq!(state.level, 2);
    }

    #[test]
    fn test_odd_level_auto_advances() {
        let theme = ThemeConfig::cowboy();
        let mut store = EntityStore::new();
        let mut state = GameState::new(&theme);
        state.level_progress = 99;
        state.boxes_found_this_level = 2;
        update(&mut store, &mut state, &theme, &[kill(ObstacleCategory::Rock)]);
        assert_eq!(state.level, 2);
        assert_eq!(state.level_progress, LEVEL_PROGRESS_BASELINE);
        assert_eq!(state.boxes_found_this_level, 0);
        assert_eq!(state.levels_completed, 1);
        assert_eq!(state.ammo, INITIAL_AMMO + AMMO_PER_LEVEL);
        assert!((state.game_speed - 2.6).abs() < 1e-6);
    }

    #[test]
    fn test_even_level_without_offers_advances() {
        let theme = ThemeConfig::cowboy();
        let mut store = EntityStore::new();
        let mut state = GameState::new(&theme);
        state.level = 4;
        state.level_progress = 100;
        state.available_buffs.clear();
        let events = update(&mut store, &mut state, &theme, &[]);
        assert_eq!(events.completion, Some(Completion::Advanced));
        assert_eq!(state.level, 5);
    }

    #[test]
    fn test_choose_buff() {
        let theme = ThemeConfig::dungeon();
        let mut state = GameState::new(&theme);
        state.level = 2;
        state.level_progress = 100;

        assert_eq!(choose_buff(&mut state, "multiShot"), None);
        assert_eq!(state.level, 2);

        assert_eq!(choose_buff(&mut state, "shadowLeap"), Some(Ability::DoubleJump));
        assert!(state.active_buffs.contains(Ability::DoubleJump));
        assert_eq!(state.available_buffs.len(), 2);
        assert_eq!(state.level, 3);
        assert_eq!(state.post_buff_grace.remaining(), POST_BUFF_INVULNERABILITY);

        // Offer consumed
        assert_eq!(choose_buff(&mut state, "shadowLeap"), None);
    }
}
