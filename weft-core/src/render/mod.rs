//! Rendering Engine
//!
//! This module houses the reconciliation pipeline:
//!
//! - `scheduler`: the [`Renderer`] context object and the cooperative,
//!   deadline-driven work loop.
//! - `reconciler`: fiber expansion and the positional child diff.
//! - `commit`: the synchronous mutation pass against the render target.
//! - `hooks`: positional local-state cells for component fibers.
//!
//! A render request seeds a work-in-progress root fiber; ticks expand it one
//! fiber at a time, diffing against the committed tree and queuing
//! deletions; when expansion is exhausted, commit applies the minimal
//! mutation set and promotes the work-in-progress tree to committed.

mod commit;
pub(crate) mod hooks;
mod reconciler;
mod scheduler;

pub use hooks::{HookCell, RenderScope, StateHandle};
pub use scheduler::{
    Deadline, FrameBudget, InvalidationHandle, NeverYield, Renderer, YIELD_THRESHOLD,
};
