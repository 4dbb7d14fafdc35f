//! Object types and their behaviors
//!
//! Every object placed on the grid is one of a closed set of kinds. Each kind
//! has a static descriptor listing what it can do: a passive `meet` hook
//! (fired as the pointer sweeps past the cell), an `activate` hook (fired when
//! the player commits into the cell), plus render metadata. Hook fallbacks are
//! resolved when the table is built, not on every call.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::dispatch::Interaction;
use super::error::{SimError, SimResult};
use super::state::{Color, GameEvent};

/// Object behavior variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectKind {
    /// Flips the pointer's rotation direction
    Swirl = 0,
    /// Currency pickup
    Coin = 1,
    /// Hazard: ends the run
    Stab = 2,
    /// Sets the tempo
    Speed = 3,
    /// Replaces the palette
    RecolorTrack = 4,
    /// Toggles between two and three orbits
    Multiplanet = 5,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 6] = [
        ObjectKind::Swirl,
        ObjectKind::Coin,
        ObjectKind::Stab,
        ObjectKind::Speed,
        ObjectKind::RecolorTrack,
        ObjectKind::Multiplanet,
    ];

    /// Registry name, also the default asset key
    pub const fn name(&self) -> &'static str {
        match self {
            ObjectKind::Swirl => "swirl",
            ObjectKind::Coin => "coin",
            ObjectKind::Stab => "stab",
            ObjectKind::Speed => "speed",
            ObjectKind::RecolorTrack => "recolorTrack",
            ObjectKind::Multiplanet => "multiplanet",
        }
    }

    pub fn from_name(name: &str) -> SimResult<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| SimError::UnknownObjectType(name.to_string()))
    }
}

/// Per-instance parameters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum ObjectParams {
    #[default]
    None,
    /// Target tempo for a speed object
    Speed { bpm: f32 },
    /// Replacement palette for a recolor object
    Recolor { palette: Vec<Color> },
}

/// Normalized atlas rectangle (0..1 on both axes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cutout {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Cutout {
    /// The whole image
    pub const FULL: Cutout = Cutout {
        origin: Vec2::ZERO,
        size: Vec2::ONE,
    };
}

/// Sprite sheet tiled row-major into `columns x rows` frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteLayout {
    pub columns: u32,
    pub rows: u32,
    pub frame_count: u32,
    /// Seconds for one pass through all frames
    pub cycle_secs: f32,
}

impl SpriteLayout {
    /// Frame shown after `timer` seconds
    pub fn frame_at(&self, timer: f32) -> u32 {
        let phase = (timer / self.cycle_secs).rem_euclid(1.0);
        // phase can round up to 1.0 for tiny negative remainders
        ((phase * self.frame_count as f32) as u32).min(self.frame_count - 1)
    }

    /// Atlas rectangle of a frame
    pub fn cutout(&self, frame: u32) -> Cutout {
        let size = Vec2::new(1.0 / self.columns as f32, 1.0 / self.rows as f32);
        let col = frame % self.columns;
        let row = frame / self.columns;
        Cutout {
            origin: Vec2::new(col as f32 * size.x, row as f32 * size.y),
            size,
        }
    }
}

/// Behavior hook. Receives a mutation handle scoped to one object.
pub type Hook = fn(&mut Interaction<'_>) -> SimResult<()>;

/// Asset selection for a kind
#[derive(Clone, Copy)]
pub enum AssetKey {
    Fixed(&'static str),
    /// Chosen from instance params and the current tempo
    Select(fn(&ObjectParams, f32) -> &'static str),
}

/// Static capability descriptor for one kind
#[derive(Clone, Copy)]
pub struct ObjectType {
    pub kind: ObjectKind,
    /// Hook run on a passive meet (own meet, else activate)
    pub on_meet: Option<Hook>,
    /// Hook run on a committed activation (own activate, else meet)
    pub on_activate: Option<Hook>,
    /// True when `on_meet` is the activate hook standing in
    pub meet_is_fallback: bool,
    pub hide_grid: bool,
    /// Rendered size multiplier
    pub size: f32,
    pub sprite: Option<SpriteLayout>,
    pub asset: AssetKey,
}

impl std::fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectType")
            .field("kind", &self.kind)
            .field("meets", &self.on_meet.is_some())
            .field("activates", &self.on_activate.is_some())
            .field("meet_is_fallback", &self.meet_is_fallback)
            .field("hide_grid", &self.hide_grid)
            .field("size", &self.size)
            .field("sprite", &self.sprite)
            .finish()
    }
}

impl ObjectType {
    const fn new(kind: ObjectKind, meet: Option<Hook>, activate: Option<Hook>) -> Self {
        let (on_meet, meet_is_fallback) = match (meet, activate) {
            (Some(m), _) => (Some(m), false),
            (None, Some(a)) => (Some(a), true),
            (None, None) => (None, false),
        };
        let on_activate = match (activate, meet) {
            (Some(a), _) => Some(a),
            (None, m) => m,
        };
        Self {
            kind,
            on_meet,
            on_activate,
            meet_is_fallback,
            hide_grid: false,
            size: 1.0,
            sprite: None,
            asset: AssetKey::Fixed(kind.name()),
        }
    }

    const fn hiding_grid(mut self) -> Self {
        self.hide_grid = true;
        self
    }

    const fn sized(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    const fn animated(mut self, sprite: SpriteLayout) -> Self {
        self.sprite = Some(sprite);
        self
    }

    const fn selecting(mut self, select: fn(&ObjectParams, f32) -> &'static str) -> Self {
        self.asset = AssetKey::Select(select);
        self
    }

    /// Asset key for an instance given the current tempo
    pub fn asset_key(&self, params: &ObjectParams, tempo: f32) -> &'static str {
        match self.asset {
            AssetKey::Fixed(key) => key,
            AssetKey::Select(select) => select(params, tempo),
        }
    }
}

/// Closed registry of object descriptors, indexed by kind
#[derive(Debug)]
pub struct ObjectTypeTable {
    types: [ObjectType; 6],
}

static STANDARD: ObjectTypeTable = ObjectTypeTable {
    types: [
        ObjectType::new(ObjectKind::Swirl, None, Some(swirl_activate)),
        ObjectType::new(ObjectKind::Coin, Some(coin_meet), None).animated(SpriteLayout {
            columns: 3,
            rows: 3,
            frame_count: 9,
            cycle_secs: 2.0,
        }),
        ObjectType::new(ObjectKind::Stab, Some(stab_meet), None)
            .hiding_grid()
            .sized(1.5),
        ObjectType::new(ObjectKind::Speed, None, Some(speed_activate)).selecting(speed_asset),
        ObjectType::new(ObjectKind::RecolorTrack, None, Some(recolor_activate)),
        ObjectType::new(ObjectKind::Multiplanet, None, Some(multiplanet_activate)),
    ],
};

impl ObjectTypeTable {
    /// The game's built-in table
    pub fn standard() -> &'static ObjectTypeTable {
        &STANDARD
    }

    pub fn get(&self, kind: ObjectKind) -> &ObjectType {
        &self.types[kind as usize]
    }

    /// Descriptor by registry name
    pub fn lookup(&self, name: &str) -> SimResult<&ObjectType> {
        ObjectKind::from_name(name).map(|kind| self.get(kind))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectType> {
        self.types.iter()
    }
}

/// Tempo ratio at or below which a speed object reads as a speed-up
pub const SPEED_UP_RATIO: f32 = 0.97;
/// Tempo ratio at or above which a speed object reads as a slow-down
pub const SPEED_DOWN_RATIO: f32 = 1.03;

fn speed_asset(params: &ObjectParams, tempo: f32) -> &'static str {
    let ObjectParams::Speed { bpm } = params else {
        return "sameSpeed";
    };
    let ratio = tempo / bpm;
    if ratio <= SPEED_UP_RATIO {
        "speedUp"
    } else if ratio >= SPEED_DOWN_RATIO {
        "speedDown"
    } else {
        "sameSpeed"
    }
}

// === Behaviors ===

fn swirl_activate(ix: &mut Interaction<'_>) -> SimResult<()> {
    let direction = ix.player().flip_direction();
    log::debug!("Swirl {}: direction now {:?}", ix.object(), direction);
    ix.emit(GameEvent::DirectionFlipped { direction });
    Ok(())
}

fn coin_meet(ix: &mut Interaction<'_>) -> SimResult<()> {
    ix.remove_self();
    let total = ix.player().add_currency(1u32).clone();
    log::debug!("Coin {} collected, total {}", ix.object(), total);
    ix.emit(GameEvent::CoinCollected { total });
    Ok(())
}

fn stab_meet(ix: &mut Interaction<'_>) -> SimResult<()> {
    let player = ix.player();
    if player.fail() {
        let cell = player.target;
        let misses = player.misses;
        log::info!("Hit hazard at ({}, {}), misses: {}", cell.x, cell.y, misses);
        ix.emit(GameEvent::Failed { cell, misses });
    }
    Ok(())
}

fn speed_activate(ix: &mut Interaction<'_>) -> SimResult<()> {
    let ObjectParams::Speed { bpm } = *ix.params() else {
        return Err(ix.invalid_params());
    };
    let from = ix.player().set_tempo(bpm);
    log::debug!("Tempo {} -> {}", from, bpm);
    ix.emit(GameEvent::TempoChanged { from, to: bpm });
    Ok(())
}

fn recolor_activate(ix: &mut Interaction<'_>) -> SimResult<()> {
    let palette = match ix.params() {
        ObjectParams::Recolor { palette } if !palette.is_empty() => palette.clone(),
        _ => return Err(ix.invalid_params()),
    };
    log::debug!("Palette -> {:?}", palette);
    ix.player().palette = palette;
    ix.emit(GameEvent::PaletteChanged);
    Ok(())
}

fn multiplanet_activate(ix: &mut Interaction<'_>) -> SimResult<()> {
    let player = ix.player();
    let orbit_count = player.toggle_orbit_count();
    let orbit_index = player.orbit_index;
    log::debug!("Orbit count -> {} (index {})", orbit_count, orbit_index);
    ix.emit(GameEvent::OrbitCountChanged {
        orbit_count,
        orbit_index,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_kind() {
        let table = ObjectTypeTable::standard();
        for kind in ObjectKind::ALL {
            assert_eq!(table.get(kind).kind, kind);
            assert_eq!(table.lookup(kind.name()).unwrap().kind, kind);
        }
    }

    #[test]
    fn test_fixed_asset_key_is_registry_name() {
        for object_type in ObjectTypeTable::standard().iter() {
            if let AssetKey::Fixed(key) = object_type.asset {
                assert_eq!(key, object_type.kind.name());
            }
        }
        const COIN: &str = ObjectKind::Coin.name();
        assert_eq!(COIN, "coin");
    }

    #[test]
    fn test_lookup_unknown_name() {
        let err = ObjectTypeTable::standard().lookup("portal").unwrap_err();
        assert!(matches!(err, SimError::UnknownObjectType(name) if name == "portal"));
    }

    #[test]
    fn test_capabilities() {
        let table = ObjectTypeTable::standard();

        let coin = table.get(ObjectKind::Coin);
        assert!(coin.on_meet.is_some() && !coin.meet_is_fallback);
        // Activate falls back to meet
        assert!(coin.on_activate.is_some());

        let swirl = table.get(ObjectKind::Swirl);
        assert!(swirl.on_meet.is_some() && swirl.meet_is_fallback);

        let stab = table.get(ObjectKind::Stab);
        assert!(stab.hide_grid);
        assert_eq!(stab.size, 1.5);

        assert!(table.iter().filter(|t| t.hide_grid).count() == 1);
        assert!(table.iter().all(|t| t.on_activate.is_some()));
    }

    #[test]
    fn test_speed_asset_thresholds() {
        let speed = ObjectTypeTable::standard().get(ObjectKind::Speed);
        let params = ObjectParams::Speed { bpm: 200.0 };
        assert_eq!(speed.asset_key(&params, 180.0), "speedUp");
        assert_eq!(speed.asset_key(&params, 200.0), "sameSpeed");
        assert_eq!(speed.asset_key(&params, 240.0), "speedDown");
        // Within ±3% reads as unchanged
        assert_eq!(speed.asset_key(&params, 201.0), "sameSpeed");

        let coin = ObjectTypeTable::standard().get(ObjectKind::Coin);
        assert_eq!(coin.asset_key(&ObjectParams::None, 180.0), "coin");
    }

    #[test]
    fn test_sprite_frames_follow_timer() {
        let layout = ObjectTypeTable::standard()
            .get(ObjectKind::Coin)
            .sprite
            .unwrap();
        assert_eq!(layout.frame_at(0.0), 0);
        // 9 frames over 2 seconds
        assert_eq!(layout.frame_at(0.25), 1);
        assert_eq!(layout.frame_at(1.0), 4);
        assert_eq!(layout.frame_at(1.99), 8);
        // Wraps each cycle
        assert_eq!(layout.frame_at(2.25), 1);

        let cutout = layout.cutout(4);
        assert!((cutout.origin - Vec2::new(1.0 / 3.0, 1.0 / 3.0)).length() < 1e-6);
        assert!((cutout.size - Vec2::splat(1.0 / 3.0)).length() < 1e-6);

        let last = layout.cutout(8);
        assert!((last.origin - Vec2::new(2.0 / 3.0, 2.0 / 3.0)).length() < 1e-6);
    }
}
