//! Fiber Tree
//!
//! The fiber tree is the engine's unit-of-work representation: a mutable,
//! linked (parent / first-child / next-sibling) tree mirroring the element
//! tree, with per-fiber bookkeeping — the effect tag, the render-target
//! handle of mounted primitives, the hook cells of component fibers, and the
//! `alternate` link to the fiber holding the same position in the previously
//! committed tree.
//!
//! Two trees exist at most: the committed tree matching the render target,
//! and the work-in-progress tree being built by the reconciler. Both live in
//! one generational [`FiberArena`]; promotion at commit frees the old tree
//! wholesale and leaves its keys stale rather than dangling.

mod arena;
mod node;

pub use arena::FiberArena;
pub use node::{EffectTag, Fiber, FiberKey};
