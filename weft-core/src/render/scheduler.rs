//! Work Scheduler
//!
//! The scheduler is a cooperative, single-threaded, time-sliced driver. The
//! host invokes [`Renderer::tick`] whenever it is otherwise idle, passing a
//! [`Deadline`] that answers "how much time is left". Each tick seeds a
//! pending cycle if one is due, expands one fiber at a time while the
//! deadline allows, and commits when no work remains. Hosts re-arm their
//! idle callback unconditionally after every pass — the renderer polls, it
//! does not call back.
//!
//! Expansion steps are atomic: a rendering function is never interrupted
//! mid-invocation. The only suspension point in the whole engine is between
//! fibers, when the deadline drops below [`YIELD_THRESHOLD`].
//!
//! # Overlap policy
//!
//! Requesting a render while a cycle is in flight returns
//! [`Error::RenderInFlight`]. State updates are different: they raise the
//! shared invalidation flag, which coalesces — however many updates arrive
//! while a cycle runs, exactly one follow-up cycle is seeded once the
//! renderer is next idle, starting from the committed root's props so the
//! whole tree is reconciled.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::element::{Element, Props};
use crate::error::Error;
use crate::fiber::{Fiber, FiberArena, FiberKey};
use crate::host::RenderHost;

/// Minimum remaining time required to start another expansion step.
pub const YIELD_THRESHOLD: Duration = Duration::from_millis(1);

/// Host-supplied view of the time remaining in the current idle period.
pub trait Deadline {
    /// Time left before the host wants control back.
    fn time_remaining(&self) -> Duration;
}

/// A deadline that never expires; drives a cycle to completion in one pass.
pub struct NeverYield;

impl Deadline for NeverYield {
    fn time_remaining(&self) -> Duration {
        Duration::MAX
    }
}

/// A wall-clock budget measured from its creation.
pub struct FrameBudget {
    expires: Instant,
}

impl FrameBudget {
    /// A deadline expiring `budget` from now.
    pub fn new(budget: Duration) -> Self {
        Self {
            expires: Instant::now() + budget,
        }
    }
}

impl Deadline for FrameBudget {
    fn time_remaining(&self) -> Duration {
        self.expires.saturating_duration_since(Instant::now())
    }
}

/// Shared re-render request flag.
///
/// Raised by state handles (and clonable anywhere else a re-render trigger
/// is needed); consumed by the scheduler when it seeds the next cycle.
/// Raising an already-raised flag is a no-op, which is what coalesces any
/// number of state updates into a single follow-up cycle.
#[derive(Clone, Debug)]
pub struct InvalidationHandle {
    flag: Rc<Cell<bool>>,
}

impl InvalidationHandle {
    pub(crate) fn new() -> Self {
        Self {
            flag: Rc::new(Cell::new(false)),
        }
    }

    /// Request a re-render of the committed tree.
    pub fn raise(&self) {
        self.flag.set(true);
    }

    /// True if a re-render has been requested and not yet consumed.
    pub fn is_raised(&self) -> bool {
        self.flag.get()
    }

    /// Consume the request, returning whether one was pending.
    pub(crate) fn take(&self) -> bool {
        self.flag.replace(false)
    }
}

/// The reconciler context: one renderer per container.
///
/// Owns the fiber arena, the committed and work-in-progress roots, the
/// expansion cursor, the pending-deletions list, and the invalidation flag.
/// Gathering this state into one object keeps the engine free of hidden
/// module-wide coupling while preserving its single-threaded semantics.
pub struct Renderer<H: RenderHost> {
    pub(crate) host: H,
    pub(crate) arena: FiberArena<H::Handle>,
    container: H::Handle,
    /// Root of the tree matching the render target. `None` before the first
    /// commit.
    pub(crate) committed: Option<FiberKey>,
    /// Root of the active cycle's tree. `None` while idle.
    pub(crate) wip_root: Option<FiberKey>,
    /// Next fiber to expand within the active cycle.
    pub(crate) next_unit: Option<FiberKey>,
    /// Previous-tree fibers awaiting detachment, reset at cycle seed.
    pub(crate) deletions: Vec<FiberKey>,
    invalidation: InvalidationHandle,
}

impl<H: RenderHost> Renderer<H> {
    /// Create a renderer targeting `container` in the given host.
    pub fn new(host: H, container: H::Handle) -> Self {
        Self {
            host,
            arena: FiberArena::new(),
            container,
            committed: None,
            wip_root: None,
            next_unit: None,
            deletions: Vec::new(),
            invalidation: InvalidationHandle::new(),
        }
    }

    /// The host, for inspection.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access, e.g. for dispatching events in tests.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// True while a reconciliation cycle is in flight.
    pub fn cycle_in_flight(&self) -> bool {
        self.wip_root.is_some()
    }

    /// True if a tick could make progress: a cycle is in flight or a
    /// re-render request is pending.
    pub fn has_work(&self) -> bool {
        self.wip_root.is_some() || self.invalidation.is_raised()
    }

    /// Request a render of `element` into the container.
    ///
    /// Seeds a work-in-progress root whose props children are `[element]`
    /// and whose alternate is the committed root; the tree is built and
    /// committed by subsequent [`tick`](Self::tick) calls. Returns
    /// [`Error::RenderInFlight`] if a cycle is already active.
    pub fn render(&mut self, element: Element) -> Result<(), Error> {
        if self.cycle_in_flight() {
            return Err(Error::RenderInFlight);
        }
        let mut props = Props::new();
        props.children.push(element);
        self.seed_root(props);
        Ok(())
    }

    /// One cooperative pass: seed if due, expand until the deadline runs
    /// short, commit if expansion is exhausted.
    ///
    /// Returns whether work remains. Hosts should re-arm their idle callback
    /// after every pass regardless of the return value.
    pub fn tick(&mut self, deadline: &impl Deadline) -> bool {
        if self.wip_root.is_none() && self.invalidation.is_raised() {
            if let Some(committed) = self.committed {
                self.invalidation.take();
                let props = self.arena[committed].props.clone();
                self.seed_root(props);
            }
        }

        while let Some(unit) = self.next_unit {
            if deadline.time_remaining() < YIELD_THRESHOLD {
                break;
            }
            self.next_unit = self.perform_unit(unit);
        }

        if self.next_unit.is_none() && self.wip_root.is_some() {
            self.commit();
        }

        self.has_work()
    }

    /// Run ticks with a never-expiring deadline until the renderer is idle.
    pub fn flush(&mut self) {
        while self.has_work() {
            self.tick(&NeverYield);
        }
    }

    pub(crate) fn invalidation_handle(&self) -> InvalidationHandle {
        self.invalidation.clone()
    }

    fn seed_root(&mut self, props: Props) {
        self.deletions.clear();
        let root = Fiber::root(self.container.clone(), props, self.committed);
        let key = self.arena.insert(root);
        self.wip_root = Some(key);
        self.next_unit = Some(key);
        debug!(live_fibers = self.arena.len(), "work-in-progress root seeded");
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, Props};
    use crate::host::MemoryHost;

    fn renderer() -> Renderer<MemoryHost> {
        let mut host = MemoryHost::new();
        let container = host.create_element("root");
        let mut renderer = Renderer::new(host, container);
        renderer.host_mut().take_journal();
        renderer
    }

    fn tree() -> Element {
        Element::node(
            "div",
            Props::new(),
            vec![Element::text("a"), Element::text("b")],
        )
    }

    /// A deterministic deadline granting a fixed number of expansion steps.
    struct StepLimit {
        remaining: Cell<usize>,
    }

    impl StepLimit {
        fn new(steps: usize) -> Self {
            Self {
                remaining: Cell::new(steps),
            }
        }
    }

    impl Deadline for StepLimit {
        fn time_remaining(&self) -> Duration {
            let left = self.remaining.get();
            if left == 0 {
                Duration::ZERO
            } else {
                self.remaining.set(left - 1);
                Duration::from_millis(10)
            }
        }
    }

    #[test]
    fn render_seeds_and_flush_commits() {
        let mut r = renderer();
        r.render(tree()).unwrap();
        assert!(r.cycle_in_flight());

        r.flush();
        assert!(!r.cycle_in_flight());
        assert!(!r.has_work());
        assert!(r.committed.is_some());
    }

    #[test]
    fn exhausted_deadline_makes_no_progress() {
        let mut r = renderer();
        r.render(tree()).unwrap();

        let more = r.tick(&StepLimit::new(0));
        assert!(more);
        assert!(r.cycle_in_flight());
        // Nothing committed, nothing mutated.
        assert!(r.host().journal().is_empty());
    }

    #[test]
    fn partial_progress_commits_nothing_until_exhaustion() {
        let mut r = renderer();
        r.render(tree()).unwrap();

        r.tick(&StepLimit::new(2));
        assert!(r.cycle_in_flight());
        assert!(r.host().journal().is_empty());

        r.flush();
        assert!(!r.cycle_in_flight());
        assert!(!r.host().journal().is_empty());
    }

    #[test]
    fn render_while_in_flight_is_rejected() {
        let mut r = renderer();
        r.render(tree()).unwrap();
        r.tick(&StepLimit::new(1));

        let second = r.render(Element::text("late"));
        assert!(matches!(second, Err(Error::RenderInFlight)));

        // The in-flight cycle is unaffected.
        r.flush();
        assert!(r.committed.is_some());
    }

    #[test]
    fn invalidation_without_a_committed_tree_is_inert() {
        let mut r = renderer();
        r.invalidation_handle().raise();

        // No committed tree to re-render; the tick stays a no-op.
        let more = r.tick(&NeverYield);
        assert!(more);
        assert!(r.committed.is_none());
    }

    #[test]
    fn invalidation_reseeds_from_the_committed_root() {
        let mut r = renderer();
        r.render(tree()).unwrap();
        r.flush();
        let first_commit = r.committed;

        r.invalidation_handle().raise();
        assert!(r.has_work());
        r.flush();

        assert!(!r.has_work());
        assert_ne!(r.committed, first_commit);
    }

    #[test]
    fn repeated_invalidations_coalesce() {
        let mut r = renderer();
        r.render(tree()).unwrap();
        r.flush();

        let handle = r.invalidation_handle();
        handle.raise();
        handle.raise();
        handle.raise();

        r.tick(&NeverYield);
        // One cycle consumed every pending request.
        assert!(!r.has_work());
    }
}
