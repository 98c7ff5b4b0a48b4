//! The simulation owner
//!
//! `Simulation` holds every piece of mutable game state and is the only
//! thing that mutates it. Frontends deliver [`Action`]s, feed frame deltas
//! and read snapshots between ticks.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::ability::Ability;
use super::collision::CollisionEngine;
use super::entity::{Bullet, EntityStore, Facing, Obstacle, Player};
use super::phase::{Action, GamePhase, StateMachine};
use super::physics::{self, HeldInput};
use super::progression;
use super::spawn::SpawnScheduler;
use super::state::{GameState, RngState};
use super::tick::FixedTimestep;
use crate::audio::{AudioSink, SoundCue};
use crate::consts::*;
use crate::highscores::HighScoreStore;
use crate::settings::Settings;
use crate::theme::ThemeConfig;

/// Read-only view of a session between ticks
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub running: bool,
    pub theme_id: String,
    pub time_ticks: u64,
    pub high_score: u64,
    pub interpolation: f32,
    pub player_visible: bool,
    pub state: GameState,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub bullets: Vec<Bullet>,
}

/// A complete game session
pub struct Simulation {
    pub(super) settings: Settings,
    pub(super) theme: ThemeConfig,
    pub(super) machine: StateMachine,
    pub(super) state: GameState,
    pub(super) entities: EntityStore,
    pub(super) held: HeldInput,
    pub(super) spawner: SpawnScheduler,
    pub(super) collisions: CollisionEngine,
    pub(super) clock: FixedTimestep,
    pub(super) rng_state: RngState,
    pub(super) rng: Pcg32,
    pub(super) high_score: u64,
    pub(super) store: Box<dyn HighScoreStore>,
    pub(super) audio: Box<dyn AudioSink>,
    pub(super) time_ticks: u64,
}

impl Simulation {
    /// New session in theme selection, with the settings' theme preloaded
    pub fn new(settings: Settings, store: Box<dyn HighScoreStore>, audio: Box<dyn AudioSink>) -> Self {
        let theme = ThemeConfig::by_id_or_default(&settings.theme);
        let rng_state = RngState::new(settings.seed);
        Self {
            state: GameState::new(&theme),
            entities: EntityStore::new(),
            machine: StateMachine::new(),
            held: HeldInput::default(),
            spawner: SpawnScheduler::new(settings.log_spawns),
            collisions: CollisionEngine::new(settings.god_mode),
            clock: FixedTimestep::new(settings.max_ticks_per_frame),
            rng: rng_state.to_rng(),
            rng_state,
            high_score: 0,
            store,
            audio,
            time_ticks: 0,
            theme,
            settings,
        }
    }

    /// Install a custom theme; selecting its id keeps it
    pub fn with_theme(mut self, theme: ThemeConfig) -> Self {
        self.state = GameState::new(&theme);
        self.theme = theme;
        self
    }

    // --- Accessors ---

    pub fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    pub fn is_running(&self) -> bool {
        self.machine.running()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    pub fn theme(&self) -> &ThemeConfig {
        &self.theme
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn high_score_store(&self) -> &dyn HighScoreStore {
        self.store.as_ref()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Render interpolation factor in [0, 1)
    pub fn interpolation(&self) -> f32 {
        self.clock.interpolation()
    }

    pub fn player_visible(&self) -> bool {
        physics::player_visible(&self.entities.player, &self.state)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase(),
            running: self.is_running(),
            theme_id: self.theme.id.clone(),
            time_ticks: self.time_ticks,
            high_score: self.high_score,
            interpolation: self.interpolation(),
            player_visible: self.player_visible(),
            state: self.state.clone(),
            player: self.entities.player.clone(),
            obstacles: self.entities.obstacles.clone(),
            bullets: self.entities.bullets.clone(),
        }
    }

    // --- Input ---

    /// Deliver an action. Returns false if it was ignored.
    pub fn apply(&mut self, action: Action) -> bool {
        if !self.machine.accepts(&action) {
            log::debug!("Ignoring {} in {:?}", action.name(), self.phase());
            return false;
        }

        match action {
            Action::SelectTheme(id) => {
                self.select_theme(&id);
                self.enter_start();
            }
            Action::Start | Action::StartJump if self.phase() != GamePhase::Playing => {
                if self.phase() == GamePhase::GameOver {
                    self.enter_start();
                }
                self.start_session();
            }
            Action::StartJump => {
                if physics::start_jump(&mut self.entities.player, &self.state.active_buffs) {
                    self.audio.play(SoundCue::Jump);
                }
            }
            Action::StopJump => physics::stop_jump(&mut self.entities.player),
            Action::Shoot => return self.shoot(),
            Action::MoveLeft(held) => self.held.left = held,
            Action::MoveRight(held) => self.held.right = held,
            Action::Pause => {
                self.machine.enter(GamePhase::Paused);
            }
            Action::Resume => {
                self.machine.enter(GamePhase::Playing);
            }
            Action::ChooseBuff(id) => {
                if progression::choose_buff(&mut self.state, &id).is_none() {
                    return false;
                }
                self.audio.play(SoundCue::PowerUp);
                self.machine.enter(GamePhase::Playing);
            }
            Action::BackToThemeSelection => {
                self.entities.clear();
                self.held = HeldInput::default();
                self.machine.enter(GamePhase::ThemeSelection);
            }
            // Not accepted while Playing
            Action::Start => return false,
        }
        true
    }

    // --- Time ---

    /// Advance by a wall-clock frame delta; returns ticks run
    pub fn frame(&mut self, delta_ms: f64) -> u32 {
        if !self.machine.running() {
            self.clock.reset();
            return 0;
        }
        self.clock.accumulate(delta_ms);
        let mut ticks = 0;
        while self.machine.running() && self.clock.take_tick(ticks) {
            self.tick();
            ticks += 1;
        }
        if self.machine.running() {
            self.clock.drop_excess();
        } else {
            self.clock.reset();
        }
        ticks
    }

    // --- Transitions ---

    fn select_theme(&mut self, id: &str) {
        if id != self.theme.id {
            self.theme = ThemeConfig::by_id_or_default(id);
        }
        log::info!("Theme selected: {}", self.theme.name);
    }

    /// Title screen: reload the high score for the theme
    fn enter_start(&mut self) {
        self.machine.enter(GamePhase::Start);
        let key = self.theme.high_score_key();
        self.high_score = match self.store.load_high_score(&key) {
            Ok(score) => score,
            Err(e) => {
                log::warn!("Could not load high score '{}': {}", key, e);
                0
            }
        };
        self.state = GameState::new(&self.theme);
        self.entities.clear();
    }

    /// Fresh run in the current theme
    fn start_session(&mut self) {
        self.state = GameState::new(&self.theme);
        self.entities.clear();
        self.held = HeldInput::default();
        self.spawner.reset();
        self.clock.reset();
        self.rng_state.stream += 1;
        self.rng = self.rng_state.to_rng();
        self.time_ticks = 0;
        log::info!("Session started (theme {}, seed {})", self.theme.id, self.rng_state.seed);
        self.machine.enter(GamePhase::Playing);
    }

    pub(super) fn game_over(&mut self) {
        self.machine.enter(GamePhase::GameOver);
        self.audio.play(SoundCue::Death);
        log::info!(
            "Game over: score {}, level {}, defeated {}",
            self.state.score,
            self.state.level,
            self.state.enemies_defeated
        );
        if self.state.score > self.high_score {
            let key = self.theme.high_score_key();
            match self.store.save_high_score(&key, self.state.score) {
                Ok(()) => log::info!("New high score {}", self.state.score),
                Err(e) => log::warn!("Could not save high score '{}': {}", key, e),
            }
            self.high_score = self.state.score;
        }
    }

    fn shoot(&mut self) -> bool {
        let ammo = self.state.ammo;
        if ammo == 0 {
            log::debug!("Out of ammo");
            return false;
        }
        let multi = self.state.active_buffs.contains(Ability::MultiShot) && ammo >= MULTI_SHOT_COUNT;

        let player = &self.entities.player;
        let x = match player.facing {
            Facing::Right => player.leading_x(),
            Facing::Left => player.leading_x() - BULLET_WIDTH,
        };
        let y = player.pos.y + player.size.y / 1.5;
        let facing = player.facing;
        let speed = BULLET_SPEED * facing.sign();

        const SPREAD: [f32; 3] = [-MULTI_SHOT_SPACING, 0.0, MULTI_SHOT_SPACING];
        let offsets: &[f32] = if multi { &SPREAD } else { &[0.0] };
        for offset in offsets {
            let id = self.entities.next_entity_id();
            self.entities.bullets.push(Bullet {
                id,
                pos: Vec2::new(x, y + offset),
                speed,
                enhanced: multi,
                direction: facing,
            });
        }
        self.state.ammo -= offsets.len() as u32;
        self.audio.play(SoundCue::Shoot);
        true
    }
}
