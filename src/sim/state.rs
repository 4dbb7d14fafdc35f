//! Game state and core simulation types

use glam::IVec2;
use num_bigint::BigUint;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::SimulationClock;
use super::error::SimResult;
use super::object::{ObjectKind, ObjectParams};
use super::world::{ObjectId, World};
use crate::consts::*;
use crate::settings::Settings;

/// 24-bit RGB color, written as `"#rrggbb"` in config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u32);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub fn r(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn g(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn b(&self) -> u8 {
        self.0 as u8
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6)
            .ok_or_else(|| format!("expected #rrggbb, got {:?}", s))?;
        u32::from_str_radix(hex, 16)
            .map(Color)
            .map_err(|e| format!("{:?}: {}", s, e))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        format!("#{:06x}", c.0)
    }
}

/// Rotation direction of the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Angle increases (sign +1)
    #[default]
    Forward,
    /// Angle decreases (sign -1)
    Reverse,
}

impl Direction {
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Pointer rotating, moves accepted
    #[default]
    Active,
    /// Run ended; only a restart leaves this phase
    Failed,
}

/// Authoritative player state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Cell the player occupies
    pub target: IVec2,
    /// Pointer angle (radians, normalized to [0, 2π))
    pub angle: f32,
    pub direction: Direction,
    /// Current orbit in [0, orbit_count)
    pub orbit_index: u8,
    /// 2 or 3
    pub orbit_count: u8,
    pub phase: GamePhase,
    pub currency: BigUint,
    pub misses: u64,
    /// Beats per minute
    pub tempo: f32,
    /// Colors indexed by orbit index
    pub palette: Vec<Color>,
}

impl PlayerState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            target: IVec2::ZERO,
            angle: START_ANGLE,
            direction: Direction::Forward,
            orbit_index: 0,
            orbit_count: settings.initial_orbit_count,
            phase: GamePhase::Active,
            currency: BigUint::default(),
            misses: 0,
            tempo: settings.initial_bpm,
            palette: settings.palette.clone(),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.phase == GamePhase::Failed
    }

    /// Enter the failed phase. Returns false if already failed.
    pub fn fail(&mut self) -> bool {
        if self.is_failed() {
            return false;
        }
        self.phase = GamePhase::Failed;
        self.misses += 1;
        true
    }

    pub fn flip_direction(&mut self) -> Direction {
        self.direction = self.direction.flipped();
        self.direction
    }

    /// Set the tempo, returning the previous one
    pub fn set_tempo(&mut self, bpm: f32) -> f32 {
        std::mem::replace(&mut self.tempo, bpm)
    }

    pub fn add_currency(&mut self, amount: u32) -> &BigUint {
        self.currency += amount;
        &self.currency
    }

    /// Move to the next orbit
    pub fn advance_orbit(&mut self) {
        self.orbit_index = (self.orbit_index + 1) % self.orbit_count;
    }

    /// Switch between two and three orbits, returning the new count
    pub fn toggle_orbit_count(&mut self) -> u8 {
        self.orbit_count = if self.orbit_count == 2 { 3 } else { 2 };
        if self.orbit_index >= self.orbit_count {
            self.orbit_index = 0;
        }
        self.orbit_count
    }

    /// Color of the planet the player stands on
    pub fn center_color(&self) -> Color {
        self.palette_color(self.orbit_index as usize)
    }

    /// Color of the orbiting planet
    pub fn moving_color(&self) -> Color {
        self.palette_color(self.orbit_index as usize + 1)
    }

    fn palette_color(&self, index: usize) -> Color {
        // Palette is never empty (validated settings, validated recolor params)
        self.palette[index % self.palette.len()]
    }
}

/// Observable transitions, drained by the host each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player committed a move; the renderer clears its trail
    Moved { from: IVec2, to: IVec2 },
    /// Commit ignored: pointer not aligned with a heading
    CommitRejected { angle: f32 },
    /// An object's passive hook ran
    Met { object: ObjectId, kind: ObjectKind },
    /// An object's active hook ran
    Activated { object: ObjectId, kind: ObjectKind },
    CoinCollected { total: BigUint },
    Failed { cell: IVec2, misses: u64 },
    TempoChanged { from: f32, to: f32 },
    PaletteChanged,
    OrbitCountChanged { orbit_count: u8, orbit_index: u8 },
    DirectionFlipped { direction: Direction },
    Restarted { objects: usize },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Placement seed for this session
    pub seed: u64,
    pub player: PlayerState,
    pub world: World,
    pub clock: SimulationClock,
    /// Lookahead cell met on the previous tick, if any
    pub(crate) approach: Option<IVec2>,
    /// Cell the player left on the last committed move
    pub(crate) came_from: Option<IVec2>,
    /// Number of restarts so far
    pub restarts: u32,
    /// Pending events, oldest first. Hosts drain these every frame.
    events: Vec<GameEvent>,
    rng: Pcg32,
}

impl GameState {
    /// Create a session and place its first population
    ///
    /// Fails with `SimError::Config` when the settings do not validate.
    pub fn new(settings: Settings) -> SimResult<Self> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut state = Self {
            player: PlayerState::new(&settings),
            world: World::new(seed ^ 0x9e37_79b9_7f4a_7c15),
            clock: SimulationClock::new(settings.lookahead_tolerance, settings.commit_tolerance),
            approach: None,
            came_from: None,
            restarts: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            settings,
            seed,
        };
        state.populate();
        log::info!(
            "Session started with seed {} ({} objects)",
            seed,
            state.world.len()
        );
        Ok(state)
    }

    /// Reset the player and regenerate the object population
    pub fn restart(&mut self) {
        self.player = PlayerState::new(&self.settings);
        self.clock.reset();
        self.approach = None;
        self.came_from = None;
        self.world.clear();
        self.populate();
        self.restarts += 1;
        let objects = self.world.len();
        log::info!("Restarted (#{}, {} objects)", self.restarts, objects);
        self.push_event(GameEvent::Restarted { objects });
    }

    /// Scatter `objects_per_type` instances of every kind around the origin
    fn populate(&mut self) {
        let extent = self.settings.spawn_half_extent;
        for _ in 0..self.settings.objects_per_type {
            for kind in ObjectKind::ALL {
                let cell = IVec2::new(
                    self.rng.random_range(-extent..extent),
                    self.rng.random_range(-extent..extent),
                );
                let params = self.random_params(kind);
                self.world.spawn(cell, kind, params);
            }
        }
    }

    fn random_params(&mut self, kind: ObjectKind) -> ObjectParams {
        match kind {
            ObjectKind::Speed => ObjectParams::Speed {
                bpm: self
                    .rng
                    .random_range(self.settings.speed_bpm_min..self.settings.speed_bpm_max)
                    as f32,
            },
            ObjectKind::RecolorTrack => ObjectParams::Recolor {
                palette: (0..3)
                    .map(|_| Color(self.rng.random_range(0..=0xff_ffff)))
                    .collect(),
            },
            _ => ObjectParams::None,
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all events emitted since the last drain
    ///
    /// Hosts that never drain keep only the newest `MAX_PENDING_EVENTS`.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop the oldest pending events beyond `MAX_PENDING_EVENTS`
    pub(crate) fn trim_events(&mut self) {
        if self.events.len() > MAX_PENDING_EVENTS {
            let excess = self.events.len() - MAX_PENDING_EVENTS;
            log::warn!("Event queue full, dropping {} oldest events", excess);
            self.events.drain(..excess);
        }
    }

    /// Split borrow used by the dispatcher
    pub(crate) fn parts_mut(&mut self) -> (&mut World, &mut PlayerState, &mut Vec<GameEvent>) {
        (&mut self.world, &mut self.player, &mut self.events)
    }
}
