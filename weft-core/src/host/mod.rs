//! Render-target seam
//!
//! The engine never mutates a render target directly; it goes through
//! [`RenderHost`], the trait boundary to the environment that owns the
//! persistent node tree (a document object tree, a terminal buffer, a test
//! double). The eight primitives are assumed synchronous and infallible once
//! their preconditions hold — the engine neither retries nor catches.
//!
//! [`memory::MemoryHost`] is a retained in-memory implementation used by the
//! crate's tests and benches.

pub mod memory;

pub use memory::{MemoryHost, MemoryNodeId, Mutation};

use crate::element::{EventHandler, PropValue};

/// The mutation primitives of a persistent render target.
///
/// Handles are cheap, clonable names for render-target nodes; the engine
/// stores them on mounted fibers and passes them back for every mutation.
pub trait RenderHost {
    /// The host's node handle type.
    type Handle: Clone;

    /// Create a detached text node.
    fn create_text_node(&mut self, text: &str) -> Self::Handle;

    /// Create a detached element node.
    fn create_element(&mut self, tag: &str) -> Self::Handle;

    /// Set or replace a plain property.
    fn set_property(&mut self, node: &Self::Handle, name: &str, value: &PropValue);

    /// Remove a plain property.
    fn remove_property(&mut self, node: &Self::Handle, name: &str);

    /// Register a listener for the given event.
    fn add_listener(&mut self, node: &Self::Handle, event: &str, handler: &EventHandler);

    /// Unregister a listener previously registered for the event.
    fn remove_listener(&mut self, node: &Self::Handle, event: &str, handler: &EventHandler);

    /// Insert `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Handle, child: &Self::Handle);

    /// Detach `child` from `parent`.
    fn remove_child(&mut self, parent: &Self::Handle, child: &Self::Handle);
}
