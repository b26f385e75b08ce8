//! Weft Core
//!
//! This crate provides the core runtime for the Weft UI framework: a
//! fiber-based reconciler that turns declarative element trees into
//! incremental mutations of a persistent render target. It implements:
//!
//! - An immutable element model with lazily resolved component tags
//! - A linked fiber tree in a generational arena, diffed positionally
//!   against the previously committed tree
//! - A cooperative, deadline-driven work scheduler
//! - A synchronous commit phase applying a minimal mutation set
//! - Positional local-state hooks for component functions
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `element`: immutable tree descriptions (tags, props, components)
//! - `fiber`: the mutable unit-of-work tree and its arena
//! - `render`: scheduler, reconciler, commit engine, and hook store
//! - `host`: the render-target trait seam and an in-memory reference host
//! - `error`: the public error type
//!
//! # Example
//!
//! ```rust,ignore
//! use weft_core::{Component, Element, MemoryHost, Props, Renderer, RenderHost};
//!
//! let counter = Component::new("Counter", |scope, _props| {
//!     let (count, set_count) = scope.use_state(0_i32);
//!     let bump = { let s = set_count.clone(); move || s.update(|n| n + 1) };
//!     Element::node(
//!         "button",
//!         Props::new().listener("onClick", bump),
//!         vec![Element::text(count)],
//!     )
//! });
//!
//! let mut host = MemoryHost::new();
//! let container = host.create_element("root");
//! let mut renderer = Renderer::new(host, container);
//!
//! renderer.render(Element::component(counter, Props::new(), vec![]))?;
//! renderer.flush();
//!
//! // Clicking the button queues a state update; the next ticks re-render.
//! renderer.host().dispatch(renderer.host().children(container)[0], "click");
//! renderer.flush();
//! ```

pub mod element;
pub mod error;
pub mod fiber;
pub mod host;
pub mod render;

pub use element::{
    create_element, event_name, is_listener_name, Component, Element, EventHandler, PropValue,
    Props, Tag, EVENT_MARKER, NODE_VALUE,
};
pub use error::Error;
pub use fiber::{EffectTag, Fiber, FiberArena, FiberKey};
pub use host::{MemoryHost, MemoryNodeId, Mutation, RenderHost};
pub use render::{
    Deadline, FrameBudget, InvalidationHandle, NeverYield, Renderer, RenderScope, StateHandle,
};
