//! Broadphase collision detection using a uniform spatial hash grid.

use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::aabb::Aabb;
use crate::collider::Collider;
use crate::error::{CollisionError, CollisionResult};
use crate::transform::Transform2D;

/// Grid cell coordinates packed into one integer.
type CellKey = i64;

#[inline]
fn pack(x: i32, y: i32) -> CellKey {
    (i64::from(x) << 32) | i64::from(y as u32)
}

/// Stored collider with its pose and the box it was hashed under.
#[derive(Debug, Clone)]
struct Entry {
    collider: Collider,
    transform: Transform2D,
    aabb: Aabb,
}

/// Uniform grid mapping cells to the ids whose boxes touch them.
///
/// Ids are caller-supplied and unique. Inserting an id again replaces its
/// collider and pose but does not remove it from the cells it was hashed into
/// before; stale cells are filtered out by the box check on retrieval and
/// dropped on [`SpatialHash::clear`]. The intended use is to clear and
/// re-insert every frame.
#[derive(Debug, Clone)]
pub struct SpatialHash<T> {
    cell_size: f32,
    cells: FxHashMap<CellKey, FxHashSet<T>>,
    entries: FxHashMap<T, Entry>,
    min_cell: (i32, i32),
    max_cell: (i32, i32),
}

impl<T> SpatialHash<T>
where
    T: Eq + Hash + Clone,
{
    /// Create an empty hash. The cell size must be finite and positive.
    pub fn new(cell_size: f32) -> CollisionResult<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(CollisionError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            cells: FxHashMap::default(),
            entries: FxHashMap::default(),
            min_cell: (i32::MAX, i32::MAX),
            max_cell: (i32::MIN, i32::MIN),
        })
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of distinct ids currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collider and pose stored under `id`.
    pub fn get(&self, id: &T) -> Option<(&Collider, &Transform2D)> {
        self.entries
            .get(id)
            .map(|entry| (&entry.collider, &entry.transform))
    }

    /// Every stored id with its collider and pose, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, &Collider, &Transform2D)> + '_ {
        self.entries
            .iter()
            .map(|(id, entry)| (id, &entry.collider, &entry.transform))
    }

    /// Compute cell coordinates for a point.
    #[inline]
    fn cell_coords(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    /// Add `id` to every cell its bounding box touches.
    pub fn insert(&mut self, id: T, collider: impl Into<Collider>, transform: Transform2D) {
        let collider = collider.into();
        let aabb = collider.bounding_box(&transform);
        let min = self.cell_coords(aabb.min.x, aabb.min.y);
        let max = self.cell_coords(aabb.max.x, aabb.max.y);

        for x in min.0..=max.0 {
            for y in min.1..=max.1 {
                self.cells.entry(pack(x, y)).or_default().insert(id.clone());
            }
        }

        self.min_cell = (self.min_cell.0.min(min.0), self.min_cell.1.min(min.1));
        self.max_cell = (self.max_cell.0.max(max.0), self.max_cell.1.max(max.1));

        trace!("Inserted collider into cells {:?}..={:?}", min, max);

        self.entries.insert(
            id,
            Entry {
                collider,
                transform,
                aabb,
            },
        );
    }

    /// Everything whose stored box overlaps the box of `collider` at
    /// `transform`, excluding `id` itself. Each candidate appears once.
    pub fn retrieve<'a>(
        &'a self,
        id: &T,
        collider: &Collider,
        transform: &Transform2D,
    ) -> impl Iterator<Item = (&'a T, &'a Collider, &'a Transform2D)> + 'a {
        self.candidates(collider.bounding_box(transform), Some(id.clone()))
    }

    /// Everything whose stored box overlaps `aabb`.
    pub fn retrieve_aabb(
        &self,
        aabb: Aabb,
    ) -> impl Iterator<Item = (&T, &Collider, &Transform2D)> + '_ {
        self.candidates(aabb, None)
    }

    fn candidates(
        &self,
        aabb: Aabb,
        exclude: Option<T>,
    ) -> impl Iterator<Item = (&T, &Collider, &Transform2D)> + '_ {
        // Nothing was ever inserted outside the tracked bounds.
        let query_min = self.cell_coords(aabb.min.x, aabb.min.y);
        let query_max = self.cell_coords(aabb.max.x, aabb.max.y);
        let min = (
            query_min.0.max(self.min_cell.0),
            query_min.1.max(self.min_cell.1),
        );
        let max = (
            query_max.0.min(self.max_cell.0),
            query_max.1.min(self.max_cell.1),
        );

        let mut seen: FxHashSet<&T> = FxHashSet::default();

        (min.0..=max.0)
            .flat_map(move |x| (min.1..=max.1).map(move |y| pack(x, y)))
            .filter_map(move |key| self.cells.get(&key))
            .flat_map(|ids| ids.iter())
            .filter(move |id| exclude.as_ref() != Some(*id))
            .filter(move |id| seen.insert(*id))
            .filter_map(move |id| {
                let entry = self.entries.get(id)?;
                entry
                    .aabb
                    .overlaps(&aabb)
                    .then_some((id, &entry.collider, &entry.transform))
            })
    }

    /// Remove every entry. Cell storage is kept for reuse.
    pub fn clear(&mut self) {
        debug!(
            "Clearing spatial hash: {} entries, {} cells",
            self.entries.len(),
            self.cells.len()
        );
        // Cells left empty by the previous frame are dropped; the rest keep
        // their allocation for the next one.
        self.cells.retain(|_, ids| !ids.is_empty());
        for ids in self.cells.values_mut() {
            ids.clear();
        }
        self.entries.clear();
        self.min_cell = (i32::MAX, i32::MAX);
        self.max_cell = (i32::MIN, i32::MIN);
    }
}
