//! Reconciler
//!
//! Expansion turns one fiber into its reconciled children and picks the next
//! unit of work. Component fibers invoke their rendering function (through
//! the hook contract) and reconcile the single element it returns; primitive,
//! text, and root fibers reconcile the children of their own props.
//!
//! The diff is positional: the new element sequence and the previous child
//! chain are walked in lockstep by index, with tag equality as the *only*
//! reuse criterion. There is no key support and no move detection — changing
//! the tag at a position always produces a create+delete pair, even if the
//! "same" element merely moved.

use tracing::{trace, warn};

use crate::element::{Element, Tag};
use crate::fiber::{EffectTag, Fiber, FiberKey};
use crate::host::RenderHost;

use super::hooks::{HookCell, RenderScope};
use super::scheduler::Renderer;

impl<H: RenderHost> Renderer<H> {
    /// Expand one fiber and return the next unit of work: its first child,
    /// else the nearest ancestor's next sibling, else `None` when the tree
    /// is exhausted.
    pub(crate) fn perform_unit(&mut self, key: FiberKey) -> Option<FiberKey> {
        let children = if self.arena[key].is_component() {
            vec![self.run_component(key)]
        } else {
            self.arena[key].props.children.clone()
        };
        self.reconcile_children(key, &children);

        if let Some(child) = self.arena[key].child {
            return Some(child);
        }
        let mut cursor = key;
        loop {
            let fiber = &self.arena[cursor];
            if let Some(sibling) = fiber.sibling {
                return Some(sibling);
            }
            match fiber.parent {
                Some(parent) => cursor = parent,
                None => return None,
            }
        }
    }

    /// Invoke a component fiber's rendering function with a fresh hook
    /// scope, storing the cells it requests on the fiber.
    fn run_component(&mut self, key: FiberKey) -> Element {
        let (component, props) = {
            let fiber = &self.arena[key];
            match &fiber.tag {
                Some(Tag::Component(component)) => (component.clone(), fiber.props.clone()),
                _ => unreachable!("expanding a non-component fiber as a component"),
            }
        };
        let prev_hooks: Vec<HookCell> = self.arena[key]
            .alternate
            .and_then(|alt| self.arena.get(alt))
            .map(|alt| alt.hooks.clone())
            .unwrap_or_default();

        let mut hooks = Vec::new();
        let element = {
            let mut scope = RenderScope::new(&prev_hooks, &mut hooks, self.invalidation_handle());
            let element = component.invoke(&mut scope, &props);
            if scope.requested() < scope.carried() {
                warn!(
                    component = component.name(),
                    requested = scope.requested(),
                    carried = scope.carried(),
                    "render requested fewer hooks than the previous one (conditional hook call?)"
                );
            }
            element
        };
        trace!(component = component.name(), hooks = hooks.len(), "component rendered");
        self.arena[key].hooks = hooks;
        element
    }

    /// Rebuild a fiber's child chain against the new element sequence.
    ///
    /// Walks both sequences in lockstep. Same tag at a position emits an
    /// Update fiber reusing the old render-target handle; a new element with
    /// a differing or missing counterpart emits a Create fiber; an old fiber
    /// with a differing or missing counterpart is tagged Delete and appended
    /// to the pending-deletions list. Both cursors advance every iteration.
    pub(crate) fn reconcile_children(&mut self, wip: FiberKey, elements: &[Element]) {
        let mut old_key = self.arena[wip]
            .alternate
            .and_then(|alt| self.arena.get(alt))
            .and_then(|alt| alt.child);
        let mut prev_sibling: Option<FiberKey> = None;
        let mut index = 0;

        while index < elements.len() || old_key.is_some() {
            let element = elements.get(index);
            let same_tag = match (element, old_key) {
                (Some(el), Some(old)) => self.arena[old].tag.as_ref() == Some(&el.tag),
                _ => false,
            };

            let new_key = element.map(|el| {
                let fiber = if same_tag {
                    let old = old_key.expect("same_tag implies an old fiber");
                    let host_node = self.arena[old].host_node.clone();
                    Fiber::updated(el.tag.clone(), el.props.clone(), wip, host_node, old)
                } else {
                    Fiber::created(el.tag.clone(), el.props.clone(), wip)
                };
                self.arena.insert(fiber)
            });

            if let Some(old) = old_key {
                if !same_tag {
                    self.arena[old].effect = EffectTag::Delete;
                    self.deletions.push(old);
                }
                old_key = self.arena[old].sibling;
            }

            if index == 0 {
                self.arena[wip].child = new_key;
            } else if let Some(prev) = prev_sibling {
                self.arena[prev].sibling = new_key;
            }
            if new_key.is_some() {
                prev_sibling = new_key;
            }
            index += 1;
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
