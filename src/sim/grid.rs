//! Sparse grid index
//!
//! The world is an unbounded integer grid. Cells are created lazily on first
//! lookup and kept for the whole session, so a coordinate always maps to the
//! same `Grid`.

use std::collections::{BTreeMap, HashMap};

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::object::ObjectType;
use super::world::ObjectId;

/// Side length (pixels) of the square the cosmetic texture offset is drawn from
pub const TEXTURE_EXTENT: f32 = 1920.0;

/// One integer-addressed cell
#[derive(Debug, Clone)]
pub struct Grid {
    coord: IVec2,
    /// Creation order within its index, stable for the session
    serial: u32,
    /// Resident objects with their hide-grid flag
    members: BTreeMap<ObjectId, bool>,
    visible: bool,
    reached: bool,
    /// Render-only texture offset, drawn once at creation
    texture_offset: Vec2,
}

impl Grid {
    fn new(coord: IVec2, serial: u32, texture_offset: Vec2) -> Self {
        Self {
            coord,
            serial,
            members: BTreeMap::new(),
            visible: true,
            reached: false,
            texture_offset,
        }
    }

    pub fn coord(&self) -> IVec2 {
        self.coord
    }

    pub fn serial(&self) -> u32 {
        self.serial
    }

    /// False iff any resident object hides the grid
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the player has committed into this cell since the last restart
    pub fn is_reached(&self) -> bool {
        self.reached
    }

    pub fn texture_offset(&self) -> Vec2 {
        self.texture_offset
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.members.contains_key(&id)
    }

    /// Resident object IDs in ascending order
    pub fn objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.members.keys().copied()
    }

    /// Copy of the current membership, safe to iterate while behaviors mutate the cell
    pub fn snapshot(&self) -> Vec<ObjectId> {
        self.members.keys().copied().collect()
    }

    pub(crate) fn mark_reached(&mut self) {
        self.reached = true;
    }

    pub(crate) fn add_object(&mut self, id: ObjectId, object_type: &ObjectType) {
        self.members.insert(id, object_type.hide_grid);
        self.update_visibility();
    }

    /// Returns false if the object was not a member
    pub(crate) fn remove_object(&mut self, id: ObjectId) -> bool {
        let removed = self.members.remove(&id).is_some();
        self.update_visibility();
        removed
    }

    /// Drop all members and the reached flag (restart)
    pub(crate) fn reset(&mut self) {
        self.members.clear();
        self.reached = false;
        self.update_visibility();
    }

    fn update_visibility(&mut self) {
        self.visible = !self.members.values().any(|&hides| hides);
    }
}

/// Memoized coordinate → cell map
#[derive(Debug, Clone)]
pub struct GridIndex {
    cells: HashMap<IVec2, Grid>,
    next_serial: u32,
    texture_rng: Pcg32,
}

impl GridIndex {
    pub fn new(seed: u64) -> Self {
        Self {
            cells: HashMap::new(),
            next_serial: 0,
            texture_rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Cell at `coord`, created and cached on first access
    pub fn find(&mut self, coord: IVec2) -> &mut Grid {
        let Self {
            cells,
            next_serial,
            texture_rng,
        } = self;
        cells.entry(coord).or_insert_with(|| {
            let serial = *next_serial;
            *next_serial += 1;
            let offset = Vec2::new(
                texture_rng.random_range(0.0..TEXTURE_EXTENT),
                texture_rng.random_range(0.0..TEXTURE_EXTENT),
            );
            Grid::new(coord, serial, offset)
        })
    }

    /// Cell at `coord` if it has been created
    pub fn get(&self, coord: IVec2) -> Option<&Grid> {
        self.cells.get(&coord)
    }

    /// Number of cells created so far
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Grid> {
        self.cells.values()
    }

    /// Clear membership and reached flags of every cached cell
    pub(crate) fn reset(&mut self) {
        for grid in self.cells.values_mut() {
            grid.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::object::{ObjectKind, ObjectTypeTable};
    use proptest::prelude::*;

    #[test]
    fn test_find_creates_lazily() {
        let mut index = GridIndex::new(1);
        assert!(index.is_empty());
        assert!(index.get(IVec2::new(3, -4)).is_none());

        let grid = index.find(IVec2::new(3, -4));
        assert_eq!(grid.coord(), IVec2::new(3, -4));
        assert!(grid.is_visible());
        assert!(!grid.is_reached());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_find_is_memoized() {
        let mut index = GridIndex::new(1);
        let first = index.find(IVec2::new(0, 0)).serial();
        let offset = index.find(IVec2::new(0, 0)).texture_offset();
        index.find(IVec2::new(0, 0)).mark_reached();

        // Creating other cells must not disturb the original
        for x in 1..50 {
            index.find(IVec2::new(x, x));
        }

        let again = index.find(IVec2::new(0, 0));
        assert_eq!(again.serial(), first);
        assert_eq!(again.texture_offset(), offset);
        assert!(again.is_reached());
        assert_eq!(index.len(), 50);
    }

    #[test]
    fn test_hazard_hides_grid() {
        let table = ObjectTypeTable::standard();
        let mut index = GridIndex::new(1);
        let grid = index.find(IVec2::ZERO);

        grid.add_object(ObjectId(1), table.get(ObjectKind::Coin));
        assert!(grid.is_visible());

        grid.add_object(ObjectId(2), table.get(ObjectKind::Stab));
        assert!(!grid.is_visible());

        assert!(grid.remove_object(ObjectId(2)));
        assert!(grid.is_visible());
        assert!(!grid.remove_object(ObjectId(2)));
    }

    #[test]
    fn test_reset_clears_members_and_reached() {
        let table = ObjectTypeTable::standard();
        let mut index = GridIndex::new(1);
        let grid = index.find(IVec2::new(2, 2));
        grid.add_object(ObjectId(1), table.get(ObjectKind::Stab));
        grid.mark_reached();

        index.reset();

        let grid = index.find(IVec2::new(2, 2));
        assert!(grid.is_empty());
        assert!(grid.is_visible());
        assert!(!grid.is_reached());
        assert_eq!(index.len(), 1);
    }

    fn arb_kind() -> impl Strategy<Value = ObjectKind> {
        prop::sample::select(ObjectKind::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_find_returns_same_cell(x in -1000i32..1000, y in -1000i32..1000) {
            let mut index = GridIndex::new(7);
            let serial = index.find(IVec2::new(x, y)).serial();
            index.find(IVec2::new(x + 1, y));
            prop_assert_eq!(index.find(IVec2::new(x, y)).serial(), serial);
            prop_assert_eq!(index.len(), 2);
        }

        #[test]
        fn prop_visibility_tracks_membership(
            ops in prop::collection::vec((any::<bool>(), 0u32..8, arb_kind()), 0..40)
        ) {
            let table = ObjectTypeTable::standard();
            let mut index = GridIndex::new(7);
            let mut model: BTreeMap<u32, ObjectKind> = BTreeMap::new();

            for (add, id, kind) in ops {
                let grid = index.find(IVec2::ZERO);
                if add && !model.contains_key(&id) {
                    grid.add_object(ObjectId(id), table.get(kind));
                    model.insert(id, kind);
                } else if !add {
                    grid.remove_object(ObjectId(id));
                    model.remove(&id);
                }
                let expect_hidden = model.values().any(|k| table.get(*k).hide_grid);
                prop_assert_eq!(grid.is_visible(), !expect_hidden);
                prop_assert_eq!(grid.len(), model.len());
            }
        }
    }
}
