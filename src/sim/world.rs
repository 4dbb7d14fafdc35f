//! Live object registry
//!
//! `World` owns the grid index and the flat list of live objects. Spawning and
//! removal go through here so an object is always registered in exactly one
//! cell and the registry, or in neither.

use std::collections::BTreeMap;
use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::error::{SimError, SimResult};
use super::grid::{Grid, GridIndex};
use super::object::{Cutout, ObjectKind, ObjectParams, ObjectType, ObjectTypeTable};

/// Stable object handle, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An object instance bound to one cell
#[derive(Debug, Clone)]
pub struct GameObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    /// Owning cell
    pub cell: IVec2,
    pub params: ObjectParams,
    /// Seconds of animation accumulated since creation
    timer: f32,
}

impl GameObject {
    pub fn descriptor(&self) -> &'static ObjectType {
        ObjectTypeTable::standard().get(self.kind)
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Advance the animation timer (only animated kinds keep time)
    ///
    /// The timer never runs backwards; non-positive and NaN `dt` are ignored.
    pub fn tick(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        if self.descriptor().sprite.is_some() {
            self.timer += dt;
        }
    }

    /// Current sprite frame, if the kind is animated
    pub fn frame(&self) -> Option<u32> {
        self.descriptor()
            .sprite
            .map(|layout| layout.frame_at(self.timer))
    }

    /// Atlas rectangle to draw this frame
    pub fn cutout(&self) -> Cutout {
        match self.descriptor().sprite {
            Some(layout) => layout.cutout(layout.frame_at(self.timer)),
            None => Cutout::FULL,
        }
    }

    pub fn asset_key(&self, tempo: f32) -> &'static str {
        self.descriptor().asset_key(&self.params, tempo)
    }

    pub fn size(&self) -> f32 {
        self.descriptor().size
    }
}

/// Grid index plus the registry of live objects
#[derive(Debug, Clone)]
pub struct World {
    grid: GridIndex,
    objects: BTreeMap<ObjectId, GameObject>,
    next_id: u32,
}

impl World {
    pub fn new(seed: u64) -> Self {
        Self {
            grid: GridIndex::new(seed),
            objects: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    /// Cell at `coord`, created on first access
    pub fn cell(&mut self, coord: IVec2) -> &mut Grid {
        self.grid.find(coord)
    }

    /// Allocate a new object ID
    fn next_object_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create an object and register it in its cell and the registry
    pub fn spawn(&mut self, cell: IVec2, kind: ObjectKind, params: ObjectParams) -> ObjectId {
        let id = self.next_object_id();
        let object = GameObject {
            id,
            kind,
            cell,
            params,
            timer: 0.0,
        };
        self.grid.find(cell).add_object(id, object.descriptor());
        self.objects.insert(id, object);
        id
    }

    /// Detach an object from its cell and the registry
    pub fn remove(&mut self, id: ObjectId) -> SimResult<GameObject> {
        let object = self.objects.remove(&id).ok_or(SimError::ObjectNotFound(id))?;
        if !self.grid.find(object.cell).remove_object(id) {
            return Err(SimError::ObjectNotFound(id));
        }
        Ok(object)
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.get(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Live objects in ID order
    pub fn objects(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Membership of a cell as it stands now
    pub fn snapshot(&mut self, coord: IVec2) -> Vec<ObjectId> {
        self.grid.find(coord).snapshot()
    }

    /// Advance every object's animation timer
    pub fn animate(&mut self, dt: f32) {
        for object in self.objects.values_mut() {
            object.tick(dt);
        }
    }

    /// Drop every object and clear all cell state; cells stay cached
    pub fn clear(&mut self) {
        self.objects.clear();
        self.grid.reset();
    }
}
