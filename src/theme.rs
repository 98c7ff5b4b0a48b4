//! Theme data
//!
//! A theme is read-only data injected into a session: the enemy table
//! (names, geometry, health, points per category), the buff catalog, HUD
//! labels and a palette. Two themes are built in; custom ones load from JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_WIDTH, GROUND_Y};
use crate::error::{Result, RunnerError};
use crate::sim::ObstacleCategory;
use crate::sim::ability::Ability;

/// Id of the theme used when none (or an unknown one) is requested
pub const DEFAULT_THEME_ID: &str = "cowboy";

/// Where a spawned obstacle is placed vertically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    /// Standing on the floor
    #[default]
    Ground,
    /// Random altitude within the theme's flying band
    Air,
}

/// One entry of the enemy table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemySpec {
    pub name: String,
    pub size: Vec2,
    pub health: u32,
    /// Base points for destroying it
    #[serde(default)]
    pub points: u64,
    #[serde(default)]
    pub placement: Placement,
    /// Ammo granted on pickup (collectibles only)
    #[serde(default)]
    pub reward: u32,
}

impl EnemySpec {
    fn new(name: &str, w: f32, h: f32, health: u32, points: u64) -> Self {
        Self {
            name: name.to_string(),
            size: Vec2::new(w, h),
            health,
            points,
            placement: Placement::Ground,
            reward: 0,
        }
    }

    fn airborne(mut self) -> Self {
        self.placement = Placement::Air;
        self
    }

    fn reward(mut self, reward: u32) -> Self {
        self.reward = reward;
        self
    }
}

/// Enemy table, one spec per spawn category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyTable {
    pub ammo_box: EnemySpec,
    pub boss: EnemySpec,
    pub flying: EnemySpec,
    pub medium: EnemySpec,
    pub human: EnemySpec,
    #[serde(rename = "static")]
    pub static_: EnemySpec,
    pub rock: EnemySpec,
}

impl EnemyTable {
    pub fn get(&self, category: ObstacleCategory) -> &EnemySpec {
        match category {
            ObstacleCategory::AmmoBox => &self.ammo_box,
            ObstacleCategory::Boss => &self.boss,
            ObstacleCategory::Flying => &self.flying,
            ObstacleCategory::Medium => &self.medium,
            ObstacleCategory::Human => &self.human,
            ObstacleCategory::Static => &self.static_,
            ObstacleCategory::Rock => &self.rock,
        }
    }

    /// Look up an enemy by its theme name
    pub fn find(&self, name: &str) -> Option<(ObstacleCategory, &EnemySpec)> {
        ObstacleCategory::ALL
            .into_iter()
            .map(|c| (c, self.get(c)))
            .find(|(_, spec)| spec.name == name)
    }

    pub fn points(&self, category: ObstacleCategory) -> u64 {
        self.get(category).points
    }
}

/// A buff offered at level completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffOffer {
    pub id: String,
    pub title: String,
    pub desc: String,
}

impl BuffOffer {
    fn new(id: &str, title: &str, desc: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            desc: desc.to_string(),
        }
    }

    /// Canonical ability this offer grants
    pub fn ability(&self) -> Option<Ability> {
        Ability::from_buff_id(&self.id)
    }
}

/// HUD wording
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Labels {
    pub score: String,
    pub level: String,
    pub bullets: String,
    pub lives: String,
    pub high_score: String,
    pub enemies: String,
    pub game_over: String,
    pub final_score: String,
}

/// Colors as CSS hex strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub ground: String,
    pub floor_detail: String,
    pub sky_gradient: Vec<String>,
    pub bullet: String,
    pub enhanced_bullet: String,
}

/// Complete theme definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub id: String,
    pub name: String,
    pub title: String,
    pub labels: Labels,
    pub palette: Palette,
    pub enemies: EnemyTable,
    pub buffs: Vec<BuffOffer>,
    /// Altitude band (top edge) for airborne enemies
    #[serde(default = "default_flying_band")]
    pub flying_band: (f32, f32),
    /// Enhanced kills arc to nearby enemies
    #[serde(default)]
    pub chain_strikes: bool,
}

fn default_flying_band() -> (f32, f32) {
    (140.0, 280.0)
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self::cowboy()
    }
}

impl ThemeConfig {
    /// Desert Cowboy
    pub fn cowboy() -> Self {
        Self {
            id: "cowboy".into(),
            name: "Desert Cowboy".into(),
            title: "Desert Cowboy Runner".into(),
            labels: Labels {
                score: "Score".into(),
                level: "Level".into(),
                bullets: "Bullets".into(),
                lives: "Lives".into(),
                high_score: "High Score".into(),
                enemies: "Enemies".into(),
                game_over: "Game Over!".into(),
                final_score: "Final Score".into(),
            },
            palette: Palette {
                ground: "#A17F53".into(),
                floor_detail: "#D2B48C".into(),
                sky_gradient: vec!["#87CEEB".into(), "#F4A460".into(), "#A17F53".into()],
                bullet: "#FFD700".into(),
                enhanced_bullet: "#FF4500".into(),
            },
            enemies: EnemyTable {
                ammo_box: EnemySpec::new("bulletBox", 24.0, 16.0, 1, 0).reward(crate::consts::AMMO_PER_BOX),
                boss: EnemySpec::new("boss", 63.0, 57.0, 6, 100),
                flying: EnemySpec::new("vulture", 42.0, 24.0, 1, 40).airborne(),
                medium: EnemySpec::new("bull", 42.0, 38.0, 2, 50),
                human: EnemySpec::new("prisoner", 40.0, 60.0, 2, 25),
                static_: EnemySpec::new("cactus", 32.0, 60.0, 1, 15),
                rock: EnemySpec::new("rock", 40.0, 40.0, 1, 10),
            },
            buffs: vec![
                BuffOffer::new(
                    "multiShot",
                    "Multi-Shot",
                    "Fire 3 bullets at once and deal extra damage per shot",
                ),
                BuffOffer::new("toughHide", "Tough Hide", "Gain extra life every 10 (15) bullet hits"),
                BuffOffer::new(
                    "doubleJump",
                    "Sky Walker",
                    "Unlock double jump ability and increased mobility",
                ),
            ],
            flying_band: default_flying_band(),
            chain_strikes: false,
        }
    }

    /// Dungeon's Escape
    pub fn dungeon() -> Self {
        Self {
            id: "Dungeon".into(),
            name: "Dungeon's Escape".into(),
            title: "Dungeon's Escape".into(),
            labels: Labels {
                score: "Souls".into(),
                level: "Floor".into(),
                bullets: "Bolts".into(),
                lives: "Lives".into(),
                high_score: "High Score".into(),
                enemies: "Monsters".into(),
                game_over: "Final Death!".into(),
                final_score: "Final Souls".into(),
            },
            palette: Palette {
                ground: "#2F2F2F".into(),
                floor_detail: "#1A1A1A".into(),
                sky_gradient: vec!["#0a0a0f".into(), "#1b1b1d".into(), "#000000".into()],
                bullet: "#00FFFF".into(),
                enhanced_bullet: "#FF4500".into(),
            },
            enemies: EnemyTable {
                ammo_box: EnemySpec::new("boltBox", 24.0, 16.0, 1, 0).reward(crate::consts::AMMO_PER_BOX),
                boss: EnemySpec::new("alphaWolf", 63.0, 51.0, 6, 100),
                flying: EnemySpec::new("bat", 38.0, 20.0, 1, 40).airborne(),
                medium: EnemySpec::new("spider", 42.0, 28.0, 2, 50),
                human: EnemySpec::new("vampire", 40.0, 60.0, 2, 25),
                static_: EnemySpec::new("skeleton", 40.0, 60.0, 1, 20),
                rock: EnemySpec::new("rock", 40.0, 40.0, 1, 10),
            },
            buffs: vec![
                BuffOffer::new(
                    "chainLightning",
                    "Chain Lightning",
                    "Unleash 3 bolts at once that arc between enemies",
                ),
                BuffOffer::new(
                    "undeadResilience",
                    "Undead Vigor",
                    "Gain extra life every 10 (15) bullet hits",
                ),
                BuffOffer::new(
                    "shadowLeap",
                    "Shadow Leap",
                    "Unlock double jump with ethereal shadow form",
                ),
            ],
            flying_band: default_flying_band(),
            chain_strikes: true,
        }
    }

    /// Ids of the built-in themes
    pub fn builtin_ids() -> [&'static str; 2] {
        ["cowboy", "Dungeon"]
    }

    /// Built-in theme by id; `dungeon` is accepted for `Dungeon`
    pub fn by_id(id: &str) -> Option<Self> {
        match id {
            "cowboy" => Some(Self::cowboy()),
            "Dungeon" | "dungeon" => Some(Self::dungeon()),
            _ => None,
        }
    }

    /// Built-in theme by id, falling back to the default theme
    pub fn by_id_or_default(id: &str) -> Self {
        Self::by_id(id).unwrap_or_else(|| {
            log::warn!("Unknown theme '{}', falling back to '{}'", id, DEFAULT_THEME_ID);
            Self::cowboy()
        })
    }

    /// Parse and validate a theme from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let theme: Self = serde_json::from_str(json)?;
        theme.validate()?;
        Ok(theme)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Persistence key for this theme's high score
    pub fn high_score_key(&self) -> String {
        format!("{}HighScore", self.id)
    }

    pub fn find_buff(&self, id: &str) -> Option<&BuffOffer> {
        self.buffs.iter().find(|b| b.id == id)
    }

    fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(RunnerError::invalid_theme("empty theme id"));
        }
        for category in ObstacleCategory::ALL {
            let spec = self.enemies.get(category);
            if spec.size.x <= 0.0 || spec.size.y <= 0.0 {
                return Err(RunnerError::invalid_theme(format!(
                    "enemy '{}' has non-positive size",
                    spec.name
                )));
            }
            if !(0.0..=ARENA_WIDTH).contains(&spec.size.x) || !(0.0..=GROUND_Y).contains(&spec.size.y) {
                return Err(RunnerError::invalid_theme(format!(
                    "enemy '{}' does not fit the arena",
                    spec.name
                )));
            }
            if spec.health == 0 {
                return Err(RunnerError::invalid_theme(format!("enemy '{}' has zero health", spec.name)));
            }
        }
        if let Some(buff) = self.buffs.iter().find(|b| b.ability().is_none()) {
            return Err(RunnerError::invalid_theme(format!("unknown buff '{}'", buff.id)));
        }
        let (low, high) = self.flying_band;
        if low > high {
            return Err(RunnerError::invalid_theme("flying band is inverted"));
        }
        if !(0.0..=GROUND_Y).contains(&low) || !(0.0..=GROUND_Y).contains(&high) {
            return Err(RunnerError::invalid_theme("flying band leaves the arena"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup_and_alias() {
        assert_eq!(ThemeConfig::by_id("dungeon").map(|t| t.id), Some("Dungeon".to_string()));
        assert!(ThemeConfig::by_id("space").is_none());
        assert_eq!(ThemeConfig::by_id_or_default("space").id, DEFAULT_THEME_ID);
    }

    #[test]
    fn test_high_score_keys() {
        assert_eq!(ThemeConfig::cowboy().high_score_key(), "cowboyHighScore");
        assert_eq!(ThemeConfig::dungeon().high_score_key(), "DungeonHighScore");
    }

    #[test]
    fn test_enemy_table_find() {
        let theme = ThemeConfig::dungeon();
        let (category, spec) = theme.enemies.find("alphaWolf").unwrap();
        assert_eq!(category, ObstacleCategory::Boss);
        assert_eq!(spec.health, 6);
        assert!(theme.enemies.find("cactus").is_none());
        assert_eq!(theme.enemies.points(ObstacleCategory::Static), 20);
    }

    #[test]
    fn test_every_builtin_buff_maps_to_ability() {
        for id in ThemeConfig::builtin_ids() {
            let theme = ThemeConfig::by_id(id).unwrap();
            assert_eq!(theme.buffs.len(), 3);
            assert!(theme.buffs.iter().all(|b| b.ability().is_some()));
        }
    }

    #[test]
    fn test_json_round_trip() {
        let json = ThemeConfig::dungeon().to_json().unwrap();
        let parsed = ThemeConfig::from_json(&json).unwrap();
        assert_eq!(parsed, ThemeConfig::dungeon());
    }

    #[test]
    fn test_json_rejects_bad_theme() {
        let mut theme = ThemeConfig::cowboy();
        theme.enemies.rock.health = 0;
        let json = serde_json::to_string(&theme).unwrap();
        assert!(matches!(ThemeConfig::from_json(&json), Err(RunnerError::InvalidTheme(_))));

        let mut theme = ThemeConfig::cowboy();
        theme.enemies.flying.size.y = GROUND_Y + 36.0;
        let json = serde_json::to_string(&theme).unwrap();
        assert!(matches!(ThemeConfig::from_json(&json), Err(RunnerError::InvalidTheme(_))));

        let mut theme = ThemeConfig::cowboy();
        theme.flying_band = (-10.0, 100.0);
        let json = serde_json::to_string(&theme).unwrap();
        assert!(matches!(ThemeConfig::from_json(&json), Err(RunnerError::InvalidTheme(_))));

        assert!(matches!(
            ThemeConfig::from_json("{ not json"),
            Err(RunnerError::Serialization(_))
        ));
    }
}
