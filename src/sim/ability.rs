//! Abilities granted by buffs
//!
//! Themes present buffs under their own ids ("toughHide", "shadowLeap", ...);
//! every id resolves to one of a fixed set of canonical abilities.

use serde::{Deserialize, Serialize};

/// Canonical ability kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    /// Three enhanced bullets per shot (chain strikes in chain themes)
    MultiShot,
    /// Lower bullet-hit threshold for bonus lives
    ExtraLife,
    /// One extra jump per airtime
    DoubleJump,
}

impl Ability {
    pub const ALL: [Ability; 3] = [Ability::MultiShot, Ability::ExtraLife, Ability::DoubleJump];

    /// Resolve a theme buff id (or a canonical key) to its ability
    pub fn from_buff_id(id: &str) -> Option<Self> {
        match id {
            "multiShot" | "chainLightning" => Some(Ability::MultiShot),
            "extraLife" | "toughHide" | "undeadResilience" => Some(Ability::ExtraLife),
            "doubleJump" | "skyWalker" | "shadowLeap" => Some(Ability::DoubleJump),
            _ => None,
        }
    }

    /// Canonical key string
    pub fn key(&self) -> &'static str {
        match self {
            Ability::MultiShot => "multiShot",
            Ability::ExtraLife => "extraLife",
            Ability::DoubleJump => "doubleJump",
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        match self {
            Ability::MultiShot => 1,
            Ability::ExtraLife => 1 << 1,
            Ability::DoubleJump => 1 << 2,
        }
    }
}

/// Set of active abilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySet {
    bits: u8,
}

impl AbilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate an ability. Returns false if it was already active.
    pub fn insert(&mut self, ability: Ability) -> bool {
        let was_active = self.contains(ability);
        self.bits |= ability.bit();
        !was_active
    }

    #[inline]
    pub fn contains(&self, ability: Ability) -> bool {
        self.bits & ability.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = Ability> + '_ {
        Ability::ALL.into_iter().filter(|a| self.contains(*a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_aliases_share_key() {
        let cowboy = Ability::from_buff_id("toughHide");
        let dungeon = Ability::from_buff_id("undeadResilience");
        assert_eq!(cowboy, Some(Ability::ExtraLife));
        assert_eq!(cowboy, dungeon);

        let mut set = AbilitySet::new();
        assert!(set.insert(cowboy.unwrap()));
        assert!(!set.insert(dungeon.unwrap()));
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Ability::ExtraLife]);
    }

    #[test]
    fn test_jump_and_shot_aliases() {
        for id in ["doubleJump", "skyWalker", "shadowLeap"] {
            assert_eq!(Ability::from_buff_id(id), Some(Ability::DoubleJump));
        }
        assert_eq!(Ability::from_buff_id("chainLightning"), Some(Ability::MultiShot));
        assert_eq!(Ability::from_buff_id("laserEyes"), None);
    }

    #[test]
    fn test_key_round_trip() {
        for ability in Ability::ALL {
            assert_eq!(Ability::from_buff_id(ability.key()), Some(ability));
        }
    }
}
