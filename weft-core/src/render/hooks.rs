//! Hook Store
//!
//! Hooks let stateless rendering functions retain state across re-renders.
//! Each component fiber carries an ordered sequence of cells, one per hook
//! request, matched to the previous render's cells *by position*: identity
//! is the call index, not a name. Requesting hooks in a different order
//! between renders reads the wrong cell — a hard contract inherited from
//! the positional model (see the diagnostics below).
//!
//! # Update model
//!
//! A cell is `{ state, pending update queue }`. State writes are never
//! applied synchronously: a [`StateHandle`] enqueues a pure transform onto
//! the cell's queue and raises the renderer's invalidation flag. The queue
//! is shared (`Rc`) between the cell and every handle ever produced for it
//! and is carried forward across renders, so an update enqueued from an
//! event handler long after its render landed still reaches the cell the
//! next render folds. On the next render that observes them, pending
//! transforms are applied left-to-right in request order, exactly once.
//!
//! # Scope
//!
//! The render scope is the positional cursor. The reconciler constructs one
//! around each rendering-function invocation and passes it in by `&mut`
//! reference; hook calls are therefore only possible synchronously inside a
//! render, and the cursor cannot leak past the invocation.
//!
//! # Diagnostics
//!
//! Conditional hook calls are not detected in general (positions simply
//! shift), but their two observable symptoms are reported via
//! `tracing::warn!`: a render that requests fewer hooks than the previous
//! one, and a typed read that does not match the stored state (the cell is
//! then reseeded from the supplied initial value).

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use tracing::warn;

use super::scheduler::InvalidationHandle;

/// Type-erased pending state transform.
pub(crate) type UpdateFn = Box<dyn FnOnce(&Rc<dyn Any>) -> Rc<dyn Any>>;

/// Shared pending-update queue of one cell.
pub(crate) type UpdateQueue = Rc<RefCell<Vec<UpdateFn>>>;

/// One positional local-state slot of a component fiber.
#[derive(Clone)]
pub struct HookCell {
    state: Rc<dyn Any>,
    queue: UpdateQueue,
}

impl HookCell {
    fn seeded<T: 'static>(initial: T) -> Self {
        Self {
            state: Rc::new(initial),
            queue: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Carry the cell forward: fold every pending transform into the state,
    /// in request order, and keep the (now empty) shared queue.
    fn folded(&self) -> Self {
        // Drain before running user transforms so a transform that enqueues
        // further updates targets the next render, not this fold.
        let pending: Vec<UpdateFn> = self.queue.borrow_mut().drain(..).collect();
        let mut state = Rc::clone(&self.state);
        for update in pending {
            state = update(&state);
        }
        Self {
            state,
            queue: Rc::clone(&self.queue),
        }
    }

    #[cfg(test)]
    pub(crate) fn pending_updates(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl fmt::Debug for HookCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookCell")
            .field("pending", &self.queue.borrow().len())
            .finish()
    }
}

/// The enqueue side of a hook cell.
///
/// Clonable and free of lifetime ties to the renderer; typically captured by
/// event-handler closures. Writes are queued, never applied synchronously —
/// the new state is observable only on the next scheduled render pass.
pub struct StateHandle<T> {
    queue: UpdateQueue,
    invalidation: InvalidationHandle,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> StateHandle<T> {
    /// Queue a transform of the current state and request a re-render.
    pub fn update<F>(&self, transform: F)
    where
        F: FnOnce(&T) -> T + 'static,
    {
        let update: UpdateFn = Box::new(move |state: &Rc<dyn Any>| {
            match state.downcast_ref::<T>() {
                Some(value) => Rc::new(transform(value)) as Rc<dyn Any>,
                None => {
                    warn!("queued state update dropped: cell holds a different type");
                    Rc::clone(state)
                }
            }
        });
        self.queue.borrow_mut().push(update);
        self.invalidation.raise();
    }

    /// Queue a replacement of the current state and request a re-render.
    pub fn set(&self, value: T) {
        self.update(move |_| value);
    }
}

impl<T> Clone for StateHandle<T> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
            invalidation: self.invalidation.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for StateHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StateHandle")
    }
}

/// Positional hook cursor for one rendering-function invocation.
pub struct RenderScope<'a> {
    prev: &'a [HookCell],
    hooks: &'a mut Vec<HookCell>,
    invalidation: InvalidationHandle,
}

impl<'a> RenderScope<'a> {
    pub(crate) fn new(
        prev: &'a [HookCell],
        hooks: &'a mut Vec<HookCell>,
        invalidation: InvalidationHandle,
    ) -> Self {
        Self {
            prev,
            hooks,
            invalidation,
        }
    }

    /// Read (and lazily seed) the local-state cell at the current position.
    ///
    /// If the previous render produced a cell at this position, its pending
    /// updates are folded into the state first; otherwise the cell is seeded
    /// with `initial`. Returns the resulting value and the handle for
    /// queuing further updates. Each call advances the cursor by one.
    pub fn use_state<T>(&mut self, initial: T) -> (T, StateHandle<T>)
    where
        T: Clone + 'static,
    {
        let index = self.hooks.len();
        let mut cell = match self.prev.get(index) {
            Some(prev) => prev.folded(),
            None => HookCell::seeded(initial.clone()),
        };

        let value = match cell.state.downcast_ref::<T>() {
            Some(value) => value.clone(),
            None => {
                warn!(
                    index,
                    "hook state type changed between renders; reseeding (conditional hook call?)"
                );
                cell = HookCell::seeded(initial.clone());
                initial
            }
        };

        let handle = StateHandle {
            queue: Rc::clone(&cell.queue),
            invalidation: self.invalidation.clone(),
            _marker: PhantomData,
        };
        self.hooks.push(cell);
        (value, handle)
    }

    /// Number of hooks requested so far in this invocation.
    pub(crate) fn requested(&self) -> usize {
        self.hooks.len()
    }

    /// Number of cells the previous render produced.
    pub(crate) fn carried(&self) -> usize {
        self.prev.len()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
