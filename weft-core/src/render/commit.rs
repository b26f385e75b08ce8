//! Commit Engine
//!
//! Commit applies a completed work-in-progress tree to the render target in
//! one synchronous pass: queued deletions detach first, then a depth-first
//! pre-order walk materializes Create fibers and diff-patches Update fibers.
//! Afterwards the work-in-progress root is promoted to committed and the
//! previous tree is freed from the arena.
//!
//! Nothing here is retried or recoverable. Host mutations are infallible by
//! contract, and a fiber without a host ancestor can only mean a corrupted
//! tree — an invariant violation, not an error condition.

use tracing::debug;

use crate::element::{event_name, PropValue, Props, Tag};
use crate::fiber::{EffectTag, FiberKey};
use crate::host::RenderHost;

use super::scheduler::Renderer;

/// Apply the property delta between two bags to a render-target node.
///
/// Old listeners that are gone or replaced are detached, old plain
/// properties that are gone are removed, new or changed plain properties are
/// set, and new or replaced listeners are attached — partitioned by the
/// event-marker convention. Children never pass through here; they are a
/// separate field, not a reserved key.
pub(crate) fn patch_props<H: RenderHost>(
    host: &mut H,
    handle: &H::Handle,
    old: &Props,
    new: &Props,
) {
    for (name, value) in old.listeners() {
        let gone_or_replaced = new.get(name) != Some(value);
        if gone_or_replaced {
            if let PropValue::Handler(handler) = value {
                host.remove_listener(handle, &event_name(name), handler);
            }
        }
    }

    for (name, _) in old.plain() {
        if new.get(name).is_none() {
            host.remove_property(handle, name);
        }
    }

    for (name, value) in new.plain() {
        if old.get(name) != Some(value) {
            host.set_property(handle, name, value);
        }
    }

    for (name, value) in new.listeners() {
        if old.get(name) != Some(value) {
            if let PropValue::Handler(handler) = value {
                host.add_listener(handle, &event_name(name), handler);
            }
        }
    }
}

impl<H: RenderHost> Renderer<H> {
    /// Apply the work-in-progress tree: deletions, then the pre-order walk,
    /// then promotion.
    pub(crate) fn commit(&mut self) {
        let Some(wip) = self.wip_root.take() else {
            return;
        };
        self.next_unit = None;

        let deletions = std::mem::take(&mut self.deletions);
        let deleted = deletions.len();
        for key in deletions {
            self.commit_deletion(key);
        }

        let mut created = 0;
        let mut updated = 0;
        if let Some(child) = self.arena[wip].child {
            self.commit_node(child, &mut created, &mut updated);
        }

        let previous = self.committed.replace(wip);
        if let Some(old_root) = previous {
            self.arena.free_tree(old_root);
        }
        debug!(created, updated, deleted, "commit applied");
    }

    /// Detach one previous-tree fiber from the render target.
    ///
    /// The node to remove is the fiber's own handle or, for component
    /// fibers, the nearest descendant handle; the parent is the nearest
    /// ancestor handle.
    fn commit_deletion(&mut self, key: FiberKey) {
        let Some(parent) = self.arena.host_parent(key) else {
            unreachable!("deleted fiber has no host ancestor");
        };
        if let Some(node) = self.arena.host_node_within(key) {
            self.host.remove_child(&parent, &node);
        }
    }

    fn commit_node(&mut self, key: FiberKey, created: &mut usize, updated: &mut usize) {
        match self.arena[key].effect {
            EffectTag::Create => {
                self.mount(key);
                *created += 1;
            }
            EffectTag::Update => {
                if let Some(handle) = self.arena[key].host_node.clone() {
                    let old_props = self.arena[key]
                        .alternate
                        .and_then(|alt| self.arena.get(alt))
                        .map(|alt| alt.props.clone())
                        .unwrap_or_default();
                    let new_props = self.arena[key].props.clone();
                    patch_props(&mut self.host, &handle, &old_props, &new_props);
                    *updated += 1;
                }
            }
            // Delete-tagged fibers live only in the deletions list and were
            // detached in the first pass.
            EffectTag::Delete => {}
            EffectTag::Root => {}
        }

        if let Some(child) = self.arena[key].child {
            self.commit_node(child, created, updated);
        }
        if let Some(sibling) = self.arena[key].sibling {
            self.commit_node(sibling, created, updated);
        }
    }

    /// Materialize a Create fiber's render-target node, apply its entire
    /// prop bag against an empty baseline, and insert it under the nearest
    /// ancestor handle. Component fibers own no node and are skipped.
    fn mount(&mut self, key: FiberKey) {
        let handle = match self.arena[key].tag.clone() {
            Some(Tag::Text) => self.host.create_text_node(""),
            Some(Tag::Host(tag)) => self.host.create_element(&tag),
            Some(Tag::Component(_)) | None => return,
        };

        let props = self.arena[key].props.clone();
        patch_props(&mut self.host, &handle, &Props::new(), &props);
        self.arena[key].host_node = Some(handle.clone());

        let Some(parent) = self.arena.host_parent(key) else {
            unreachable!("mounted fiber has no host ancestor");
        };
        self.host.append_child(&parent, &handle);
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, EventHandler};
    use crate::host::{MemoryHost, Mutation};
    use crate::render::Renderer;

    fn patched(old: Props, new: Props) -> Vec<Mutation> {
        let mut host = MemoryHost::new();
        let node = host.create_element("div");
        host.take_journal();
        patch_props(&mut host, &node, &old, &new);
        host.take_journal()
    }

    #[test]
    fn unchanged_props_journal_nothing() {
        let old = Props::new().attr("id", "app").attr("title", "t");
        let new = old.clone();
        assert!(patched(old, new).is_empty());
    }

    #[test]
    fn changed_and_removed_properties_patch_minimally() {
        let old = Props::new().attr("id", "app").attr("title", "t");
        let new = Props::new().attr("id", "app2");

        let journal = patched(old, new);
        assert_eq!(journal.len(), 2);
        assert!(matches!(&journal[0], Mutation::RemoveProperty(_, name) if name == "title"));
        assert!(
            matches!(&journal[1], Mutation::SetProperty(_, name, value) if name == "id" && value == "app2")
        );
    }

    #[test]
    fn replaced_listener_detaches_before_attaching() {
        let first = EventHandler::new(|| {});
        let second = EventHandler::new(|| {});
        let old = Props::new().attr("onClick", first);
        let new = Props::new().attr("onClick", second);

        let journal = patched(old, new);
        assert_eq!(
            journal,
            vec![
                Mutation::RemoveListener(journal_node(&journal), "click".into()),
                Mutation::AddListener(journal_node(&journal), "click".into()),
            ]
        );
    }

    #[test]
    fn identical_listener_is_left_alone() {
        let handler = EventHandler::new(|| {});
        let old = Props::new().attr("onClick", handler.clone());
        let new = Props::new().attr("onClick", handler);
        assert!(patched(old, new).is_empty());
    }

    fn journal_node(journal: &[Mutation]) -> crate::host::MemoryNodeId {
        match &journal[0] {
            Mutation::RemoveListener(node, _) | Mutation::AddListener(node, _) => *node,
            other => panic!("unexpected first mutation: {other:?}"),
        }
    }

    #[test]
    fn commit_clears_the_cursor_and_promotes() {
        let mut host = MemoryHost::new();
        let container = host.create_element("root");
        let mut r = Renderer::new(host, container);

        r.render(Element::text("hi")).unwrap();
        r.flush();

        assert!(!r.cycle_in_flight());
        assert!(r.next_unit.is_none());
        let committed = r.committed.unwrap();
        let text = r.arena[committed].child.unwrap();
        assert_eq!(r.arena[text].effect, EffectTag::Create);
        assert_eq!(r.host().dump(container), "<root>hi</root>");
    }
}
