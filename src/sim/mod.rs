//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ability;
pub mod collision;
pub mod entity;
pub mod phase;
pub mod physics;
pub mod progression;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use ability::{Ability, AbilitySet};
pub use collision::{CollisionEngine, CollisionOutcome, DestroyedObstacle, SpatialGrid};
pub use entity::{Bullet, EntityStore, Facing, Obstacle, ObstacleCategory, ObstacleKind, Player};
pub use phase::{Action, GamePhase, StateMachine};
pub use physics::HeldInput;
pub use progression::{Completion, ProgressionEvents};
pub use session::{Simulation, Snapshot};
pub use spawn::{SpawnScheduler, effective_timer, spawn_weights};
pub use state::{GameState, RngState};
pub use tick::FixedTimestep;
pub use timer::Timer;
