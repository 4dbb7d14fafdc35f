//! Simulation module
//!
//! All gameplay logic lives here:
//! - Sparse grid of cells, created on first lookup
//! - Closed table of object kinds and their behaviors
//! - Player state machine (active / failed) driven by `tick` and `commit_move`
//! - No rendering or platform dependencies

pub mod clock;
pub mod dispatch;
pub mod error;
pub mod grid;
pub mod object;
pub mod state;
pub mod tick;
pub mod world;

pub use clock::{Heading, SimulationClock};
pub use dispatch::{Encounter, Interaction, activate_cell, meet_cell};
pub use error::{SimError, SimResult};
pub use grid::{Grid, GridIndex};
pub use object::{Cutout, ObjectKind, ObjectParams, ObjectType, ObjectTypeTable, SpriteLayout};
pub use state::{Color, Direction, GameEvent, GamePhase, GameState, PlayerState};
pub use tick::{CommitOutcome, TickInput, advance, autoplay_wants_commit, commit_move, tick};
pub use world::{GameObject, ObjectId, World};
