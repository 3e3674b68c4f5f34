use detour_core::{
    bounding_box::BoundingBox,
    closure::{Closure, ClosureId},
};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use rstar::{
    RTree,
    primitives::{GeomWithData, Rectangle},
};

type IndexedClosure = GeomWithData<Rectangle<[f64; 2]>, ClosureId>;

fn indexed(closure: &Closure) -> IndexedClosure {
    IndexedClosure::new(
        Rectangle::from_aabb(closure.geometry.envelope()),
        closure.id,
    )
}

#[derive(Default)]
struct StoreInner {
    closures: FxHashMap<ClosureId, Closure>,
    index: RTree<IndexedClosure>,
    selected: Option<ClosureId>,
}

/// Closures currently known to the application, shared behind an `Arc`.
#[derive(Default)]
pub struct ClosureStore {
    inner: RwLock<StoreInner>,
}

impl ClosureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps the whole content, typically with the result of a viewport
    /// fetch. The last closure wins when an id repeats. The selection
    /// survives if its closure is still present.
    pub fn replace_all(&self, closures: Vec<Closure>) {
        let closures: FxHashMap<ClosureId, Closure> = closures
            .into_iter()
            .map(|closure| (closure.id, closure))
            .collect();
        let index = RTree::bulk_load(closures.values().map(indexed).collect());

        let mut inner = self.inner.write();
        let selected = inner.selected.filter(|id| closures.contains_key(id));

        *inner = StoreInner {
            closures,
            index,
            selected,
        };
    }

    /// Returns the previous version of the closure, if any.
    pub fn upsert(&self, closure: Closure) -> Option<Closure> {
        let mut inner = self.inner.write();

        inner.index.insert(indexed(&closure));
        let previous = inner.closures.insert(closure.id, closure);

        if let Some(previous) = &previous {
            inner.index.remove(&indexed(previous));
        }

        previous
    }

    pub fn remove(&self, id: ClosureId) -> Option<Closure> {
        let mut inner = self.inner.write();

        let removed = inner.closures.remove(&id)?;
        inner.index.remove(&indexed(&removed));
        if inner.selected == Some(id) {
            inner.selected = None;
        }

        Some(removed)
    }

    pub fn get(&self, id: ClosureId) -> Option<Closure> {
        self.inner.read().closures.get(&id).cloned()
    }

    /// Selects a known closure, `None` clears the selection. Returns `false`
    /// for unknown ids.
    pub fn select(&self, id: Option<ClosureId>) -> bool {
        let mut inner = self.inner.write();

        match id {
            Some(id) if !inner.closures.contains_key(&id) => false,
            id => {
                inner.selected = id;
                true
            }
        }
    }

    pub fn selected(&self) -> Option<Closure> {
        let inner = self.inner.read();
        inner
            .selected
            .and_then(|id| inner.closures.get(&id))
            .cloned()
    }

    /// Closures whose extent intersects `bbox`, ordered by id.
    pub fn in_bbox(&self, bbox: &BoundingBox) -> Vec<Closure> {
        let inner = self.inner.read();

        let mut closures: Vec<Closure> = inner
            .index
            .locate_in_envelope_intersecting(&bbox.envelope())
            .filter_map(|indexed| inner.closures.get(&indexed.data))
            .cloned()
            .collect();
        closures.sort_by_key(|closure| closure.id);

        closures
    }

    pub fn len(&self) -> usize {
        self.inner.read().closures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every closure, ordered by id.
    pub fn snapshot(&self) -> Vec<Closure> {
        let mut closures: Vec<Closure> = self.inner.read().closures.values().cloned().collect();
        closures.sort_by_key(|closure| closure.id);
        closures
    }
}
