//! Fiber records
//!
//! A fiber is the mutable unit of reconciliation work for one tree position.
//! It mirrors an element's tag and props and adds the bookkeeping the engine
//! needs: tree links, the render-target handle for mounted primitives, the
//! link to the fiber that held the same position in the previously committed
//! tree, the hook cells of component fibers, and the effect tag that tells
//! the commit phase what to do.

use slotmap::new_key_type;

use crate::element::{Props, Tag};
use crate::render::hooks::HookCell;

new_key_type! {
    /// Generational key of a fiber in a [`FiberArena`](super::FiberArena).
    ///
    /// Keys outlive the fibers they name: once a tree is freed, lookups with
    /// its keys resolve to `None` instead of aliasing a recycled slot. This
    /// is what makes the `alternate` link safe to keep across commits.
    pub struct FiberKey;
}

/// What a fiber requires at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectTag {
    /// Materialize a render-target node and insert it under the host parent.
    Create,

    /// Diff-patch the retained render-target node against the alternate's
    /// props.
    Update,

    /// Detach from the render target. Delete-tagged fibers belong to the
    /// previous tree and are reachable only through the deletions list,
    /// never as children of the new tree.
    Delete,

    /// The container anchor. Never mutated by the commit walk.
    Root,
}

/// A mutable unit of reconciliation work.
///
/// Field layout follows the linked shape of the tree: `parent` is an upward
/// back-reference, `child` points at the first child, `sibling` at the next
/// child of the same parent.
pub struct Fiber<H> {
    /// Mirrors the element's tag. `None` only on the root fiber.
    pub tag: Option<Tag>,

    /// The element's property bag, children included.
    pub props: Props,

    /// Upward link, used for host-parent resolution and traversal.
    pub parent: Option<FiberKey>,

    /// First child.
    pub child: Option<FiberKey>,

    /// Next sibling under the same parent.
    pub sibling: Option<FiberKey>,

    /// Render-target handle. Present on the root and on mounted primitive
    /// and text fibers; component fibers never receive one.
    pub host_node: Option<H>,

    /// The fiber that occupied this structural position in the previously
    /// committed tree. A lookup key, never an ownership edge; stale after
    /// that tree is freed.
    pub alternate: Option<FiberKey>,

    /// Hook cells in call order. Non-empty only on component fibers.
    pub hooks: Vec<HookCell>,

    /// What the commit phase must do with this fiber.
    pub effect: EffectTag,
}

impl<H> Fiber<H> {
    /// The root fiber anchoring a work-in-progress tree to the container.
    pub fn root(container: H, props: Props, alternate: Option<FiberKey>) -> Self {
        Self {
            tag: None,
            props,
            parent: None,
            child: None,
            sibling: None,
            host_node: Some(container),
            alternate,
            hooks: Vec::new(),
            effect: EffectTag::Root,
        }
    }

    /// A freshly created fiber with no previous-tree counterpart.
    pub fn created(tag: Tag, props: Props, parent: FiberKey) -> Self {
        Self {
            tag: Some(tag),
            props,
            parent: Some(parent),
            child: None,
            sibling: None,
            host_node: None,
            alternate: None,
            hooks: Vec::new(),
            effect: EffectTag::Create,
        }
    }

    /// A fiber reusing the render-target handle of its previous-tree
    /// counterpart.
    pub fn updated(
        tag: Tag,
        props: Props,
        parent: FiberKey,
        host_node: Option<H>,
        alternate: FiberKey,
    ) -> Self {
        Self {
            tag: Some(tag),
            props,
            parent: Some(parent),
            child: None,
            sibling: None,
            host_node,
            alternate: Some(alternate),
            hooks: Vec::new(),
            effect: EffectTag::Update,
        }
    }

    /// True for fibers whose tag is a rendering function.
    pub fn is_component(&self) -> bool {
        matches!(self.tag, Some(Tag::Component(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Component;
    use crate::element::Element;

    #[test]
    fn root_fiber_carries_the_container() {
        let fiber: Fiber<u32> = Fiber::root(7, Props::new(), None);
        assert_eq!(fiber.effect, EffectTag::Root);
        assert_eq!(fiber.host_node, Some(7));
        assert!(fiber.tag.is_none());
        assert!(!fiber.is_component());
    }

    #[test]
    fn created_fiber_has_no_alternate_and_no_handle() {
        let parent = FiberKey::default();
        let fiber: Fiber<u32> = Fiber::created(Tag::Host("div".into()), Props::new(), parent);
        assert_eq!(fiber.effect, EffectTag::Create);
        assert!(fiber.host_node.is_none());
        assert!(fiber.alternate.is_none());
    }

    #[test]
    fn component_fibers_are_recognized() {
        let parent = FiberKey::default();
        let component = Component::new("C", |_, _| Element::text(""));
        let fiber: Fiber<u32> =
            Fiber::created(Tag::Component(component), Props::new(), parent);
        assert!(fiber.is_component());
    }
}
