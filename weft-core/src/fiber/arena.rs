//! Fiber arena
//!
//! All live fibers — the committed tree and, while a cycle is active, the
//! work-in-progress tree — are owned by a single generational arena. Links
//! between fibers are arena keys, so the "previous tree" relationship stays
//! an explicit lookup: freeing a tree invalidates its keys rather than
//! leaving dangling references behind.

use slotmap::SlotMap;
use smallvec::SmallVec;

use super::node::{Fiber, FiberKey};

/// Owner of every live fiber.
pub struct FiberArena<H> {
    fibers: SlotMap<FiberKey, Fiber<H>>,
}

impl<H: Clone> FiberArena<H> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            fibers: SlotMap::with_key(),
        }
    }

    /// Insert a fiber, returning its key.
    pub fn insert(&mut self, fiber: Fiber<H>) -> FiberKey {
        self.fibers.insert(fiber)
    }

    /// Look up a fiber. Returns `None` for keys of freed trees.
    pub fn get(&self, key: FiberKey) -> Option<&Fiber<H>> {
        self.fibers.get(key)
    }

    /// Mutable lookup.
    pub fn get_mut(&mut self, key: FiberKey) -> Option<&mut Fiber<H>> {
        self.fibers.get_mut(key)
    }

    /// True if the key names a live fiber.
    pub fn contains(&self, key: FiberKey) -> bool {
        self.fibers.contains_key(key)
    }

    /// Number of live fibers across both trees.
    pub fn len(&self) -> usize {
        self.fibers.len()
    }

    /// True if no fibers are live.
    pub fn is_empty(&self) -> bool {
        self.fibers.is_empty()
    }

    /// The keys of a fiber's children, in sibling order.
    pub fn child_keys(&self, key: FiberKey) -> SmallVec<[FiberKey; 4]> {
        let mut keys = SmallVec::new();
        let mut cursor = self.get(key).and_then(|fiber| fiber.child);
        while let Some(child) = cursor {
            keys.push(child);
            cursor = self.get(child).and_then(|fiber| fiber.sibling);
        }
        keys
    }

    /// Resolve the nearest ancestor render-target handle.
    ///
    /// Walks `parent` links upward, skipping fibers without a handle
    /// (component fibers and unmounted primitives). Every fiber of a rooted
    /// tree resolves to a handle because the root holds the container.
    pub fn host_parent(&self, key: FiberKey) -> Option<H> {
        let mut cursor = self.get(key).and_then(|fiber| fiber.parent);
        while let Some(ancestor) = cursor {
            let fiber = self.get(ancestor)?;
            if let Some(handle) = &fiber.host_node {
                return Some(handle.clone());
            }
            cursor = fiber.parent;
        }
        None
    }

    /// The render-target handle owned by a fiber or its nearest descendant.
    ///
    /// Component fibers own no handle, so the search descends through
    /// `child` links until a mounted fiber is found.
    pub fn host_node_within(&self, key: FiberKey) -> Option<H> {
        let mut cursor = Some(key);
        while let Some(current) = cursor {
            let fiber = self.get(current)?;
            if let Some(handle) = &fiber.host_node {
                return Some(handle.clone());
            }
            cursor = fiber.child;
        }
        None
    }

    /// Remove a whole tree from the arena, returning the number of fibers
    /// freed. Keys into the freed tree become stale.
    pub fn free_tree(&mut self, root: FiberKey) -> usize {
        let mut stack = vec![root];
        let mut freed = 0;
        while let Some(key) = stack.pop() {
            stack.extend(self.child_keys(key));
            if self.fibers.remove(key).is_some() {
                freed += 1;
            }
        }
        freed
    }
}

impl<H: Clone> Default for FiberArena<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> std::ops::Index<FiberKey> for FiberArena<H> {
    type Output = Fiber<H>;

    fn index(&self, key: FiberKey) -> &Fiber<H> {
        &self.fibers[key]
    }
}

impl<H> std::ops::IndexMut<FiberKey> for FiberArena<H> {
    fn index_mut(&mut self, key: FiberKey) -> &mut Fiber<H> {
        &mut self.fibers[key]
    }
}
