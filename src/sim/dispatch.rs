//! Interaction dispatch
//!
//! Runs object hooks for a cell. Passive meets come from the per-tick
//! lookahead; activations come from committed moves. Both iterate a snapshot
//! of the cell's membership so a hook that removes its own object cannot
//! change which objects the current dispatch visits.

use glam::IVec2;

use super::error::{SimError, SimResult};
use super::object::{Hook, ObjectKind, ObjectParams};
use super::state::{GameEvent, PlayerState};
use super::world::{ObjectId, World};

/// Mutation handle passed to a behavior hook
pub struct Interaction<'a> {
    player: &'a mut PlayerState,
    events: &'a mut Vec<GameEvent>,
    object: ObjectId,
    kind: ObjectKind,
    params: &'a ObjectParams,
    remove_self: bool,
}

impl<'a> Interaction<'a> {
    pub fn player(&mut self) -> &mut PlayerState {
        self.player
    }

    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn params(&self) -> &ObjectParams {
        self.params
    }

    /// Remove the object once the hook returns
    pub fn remove_self(&mut self) {
        self.remove_self = true;
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn invalid_params(&self) -> SimError {
        SimError::InvalidParams {
            id: self.object,
            kind: self.kind,
        }
    }
}

/// Kind of encounter being dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encounter {
    /// Pointer sweeping past the cell
    Meet,
    /// Player committing into the cell
    Activate,
}

/// Meet every object in `cell`.
///
/// Kinds without their own meet hook fall back to their activate hook, but
/// only on a fresh approach (the first tick the lookahead lands on this
/// cell), so a persistent object is not re-triggered on every tick of the
/// same sweep. Returns the number of hooks run.
pub fn meet_cell(
    world: &mut World,
    player: &mut PlayerState,
    events: &mut Vec<GameEvent>,
    cell: IVec2,
    fresh_approach: bool,
) -> SimResult<usize> {
    let mut fired = 0;
    for id in world.snapshot(cell) {
        let object_type = world
            .get(id)
            .ok_or(SimError::ObjectNotFound(id))?
            .descriptor();
        let Some(hook) = object_type.on_meet else {
            continue;
        };
        if object_type.meet_is_fallback && !fresh_approach {
            continue;
        }
        invoke(world, player, events, id, hook, Encounter::Meet)?;
        fired += 1;
    }
    Ok(fired)
}

/// Activate every object in `cell`. Returns the number of hooks run.
pub fn activate_cell(
    world: &mut World,
    player: &mut PlayerState,
    events: &mut Vec<GameEvent>,
    cell: IVec2,
) -> SimResult<usize> {
    let mut fired = 0;
    for id in world.snapshot(cell) {
        let object_type = world
            .get(id)
            .ok_or(SimError::ObjectNotFound(id))?
            .descriptor();
        if let Some(hook) = object_type.on_activate {
            invoke(world, player, events, id, hook, Encounter::Activate)?;
            fired += 1;
        }
    }
    Ok(fired)
}

fn invoke(
    world: &mut World,
    player: &mut PlayerState,
    events: &mut Vec<GameEvent>,
    id: ObjectId,
    hook: Hook,
    encounter: Encounter,
) -> SimResult<()> {
    let object = world.get(id).ok_or(SimError::ObjectNotFound(id))?;
    let kind = object.kind;
    events.push(match encounter {
        Encounter::Meet => GameEvent::Met { object: id, kind },
        Encounter::Activate => GameEvent::Activated { object: id, kind },
    });

    let remove = {
        let mut ix = Interaction {
            player,
            events,
            object: id,
            kind,
            params: &object.params,
            remove_self: false,
        };
        hook(&mut ix)?;
        ix.remove_self
    };

    if remove {
        world.remove(id)?;
    }
    Ok(())
}
