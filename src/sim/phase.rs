//! Game phases and action validation

use serde::{Deserialize, Serialize};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Picking a theme
    #[default]
    ThemeSelection,
    /// Title screen for the chosen theme
    Start,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Waiting for a buff choice
    LevelComplete,
    /// Run ended
    GameOver,
}

/// Discrete player or menu action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    StartJump,
    StopJump,
    Shoot,
    /// Left button held (true) or released (false)
    MoveLeft(bool),
    MoveRight(bool),
    Pause,
    Resume,
    ChooseBuff(String),
    SelectTheme(String),
    Start,
    BackToThemeSelection,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::StartJump => "startJump",
            Action::StopJump => "stopJump",
            Action::Shoot => "shoot",
            Action::MoveLeft(_) => "moveLeft",
            Action::MoveRight(_) => "moveRight",
            Action::Pause => "pause",
            Action::Resume => "resume",
            Action::ChooseBuff(_) => "chooseBuff",
            Action::SelectTheme(_) => "selectTheme",
            Action::Start => "start",
            Action::BackToThemeSelection => "backToThemeSelection",
        }
    }
}

/// Phase holder; the only place `running` is written
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateMachine {
    phase: GamePhase,
    running: bool,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// True only while Playing
    #[inline]
    pub fn running(&self) -> bool {
        self.running
    }

    /// Whether `action` is valid in the current phase
    pub fn accepts(&self, action: &Action) -> bool {
        use Action::*;
        match self.phase {
            GamePhase::ThemeSelection => matches!(action, SelectTheme(_)),
            GamePhase::Start | GamePhase::GameOver => {
                matches!(action, Start | StartJump | BackToThemeSelection)
            }
            GamePhase::Playing => matches!(
                action,
                StartJump | StopJump | Shoot | MoveLeft(_) | MoveRight(_) | Pause
            ),
            GamePhase::Paused => matches!(
                action,
                Resume | StopJump | MoveLeft(_) | MoveRight(_) | BackToThemeSelection
            ),
            GamePhase::LevelComplete => {
                matches!(action, ChooseBuff(_) | StopJump | MoveLeft(_) | MoveRight(_))
            }
        }
    }

    /// Switch phase; returns the previous one
    pub fn enter(&mut self, phase: GamePhase) -> GamePhase {
        let previous = self.phase;
        if previous != phase {
            log::info!("Phase {:?} -> {:?}", previous, phase);
        }
        self.phase = phase;
        self.running = phase == GamePhase::Playing;
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_follows_phase() {
        let mut machine = StateMachine::new();
        assert!(!machine.running());
        machine.enter(GamePhase::Playing);
        assert!(machine.running());
        for phase in [GamePhase::Paused, GamePhase::LevelComplete, GamePhase::GameOver, GamePhase::Start] {
            machine.enter(phase);
            assert!(!machine.running());
        }
    }

    #[test]
    fn test_action_validity() {
        let mut machine = StateMachine::new();
        assert!(machine.accepts(&Action::SelectTheme("cowboy".into())));
        assert!(!machine.accepts(&Action::Shoot));

        machine.enter(GamePhase::Playing);
        assert!(machine.accepts(&Action::Shoot));
        assert!(machine.accepts(&Action::Pause));
        assert!(!machine.accepts(&Action::Resume));
        assert!(!machine.accepts(&Action::ChooseBuff("multiShot".into())));

        machine.enter(GamePhase::Paused);
        assert!(machine.accepts(&Action::Resume));
        assert!(machine.accepts(&Action::MoveLeft(false)));
        assert!(!machine.accepts(&Action::Shoot));
        assert!(!machine.accepts(&Action::StartJump));

        machine.enter(GamePhase::LevelComplete);
        assert!(machine.accepts(&Action::ChooseBuff("multiShot".into())));
        assert!(machine.accepts(&Action::MoveRight(false)));
        assert!(machine.accepts(&Action::StopJump));
        assert!(!machine.accepts(&Action::Pause));

        machine.enter(GamePhase::GameOver);
        assert!(machine.accepts(&Action::StartJump));
        assert!(!machine.accepts(&Action::Shoot));
    }
}
