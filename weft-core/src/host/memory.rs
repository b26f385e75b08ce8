//! In-memory render target
//!
//! A retained node store implementing [`RenderHost`], used by unit tests,
//! the integration suite, and benches. Besides the node tree it keeps a
//! journal of every mutation applied, which is what lets tests assert the
//! minimal-patch properties of the commit phase (an idempotent re-render
//! journals nothing).
//!
//! Property values are stored stringified, matching the coercion rule for
//! values reaching the render target.

use indexmap::IndexMap;
use slotmap::SlotMap;

use crate::element::{EventHandler, PropValue};

use super::RenderHost;

slotmap::new_key_type! {
    /// Handle to a node in a [`MemoryHost`].
    pub struct MemoryNodeId;
}

/// One applied mutation, in application order.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateText(MemoryNodeId),
    CreateElement(MemoryNodeId, String),
    SetProperty(MemoryNodeId, String, String),
    RemoveProperty(MemoryNodeId, String),
    AddListener(MemoryNodeId, String),
    RemoveListener(MemoryNodeId, String),
    AppendChild(MemoryNodeId, MemoryNodeId),
    RemoveChild(MemoryNodeId, MemoryNodeId),
}

enum NodeKind {
    Text,
    Element(String),
}

struct MemoryNode {
    kind: NodeKind,
    attributes: IndexMap<String, String>,
    listeners: IndexMap<String, EventHandler>,
    children: Vec<MemoryNodeId>,
}

impl MemoryNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attributes: IndexMap::new(),
            listeners: IndexMap::new(),
            children: Vec::new(),
        }
    }
}

/// Retained in-memory render target with a mutation journal.
pub struct MemoryHost {
    nodes: SlotMap<MemoryNodeId, MemoryNode>,
    journal: Vec<Mutation>,
}

impl MemoryHost {
    /// An empty host with no nodes.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            journal: Vec::new(),
        }
    }

    /// True if the node exists (created and not dropped by removal).
    pub fn contains(&self, node: MemoryNodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Element tag of the node, `None` for text nodes.
    pub fn tag(&self, node: MemoryNodeId) -> Option<&str> {
        match &self.nodes.get(node)?.kind {
            NodeKind::Element(tag) => Some(tag),
            NodeKind::Text => None,
        }
    }

    /// True if the node is a text node.
    pub fn is_text(&self, node: MemoryNodeId) -> bool {
        matches!(self.nodes.get(node).map(|n| &n.kind), Some(NodeKind::Text))
    }

    /// Current text of a text node (its `nodeValue` property).
    pub fn text(&self, node: MemoryNodeId) -> Option<&str> {
        self.attribute(node, crate::element::NODE_VALUE)
    }

    /// A stored property value, stringified.
    pub fn attribute(&self, node: MemoryNodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node)?
            .attributes
            .get(name)
            .map(String::as_str)
    }

    /// Children of the node in insertion order.
    pub fn children(&self, node: MemoryNodeId) -> &[MemoryNodeId] {
        self.nodes
            .get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// The listener registered for an event, if any.
    pub fn listener(&self, node: MemoryNodeId, event: &str) -> Option<EventHandler> {
        self.nodes.get(node)?.listeners.get(event).cloned()
    }

    /// Invoke the listener registered for an event. Returns true if one ran.
    pub fn dispatch(&self, node: MemoryNodeId, event: &str) -> bool {
        match self.listener(node, event) {
            Some(handler) => {
                handler.call();
                true
            }
            None => false,
        }
    }

    /// Every mutation applied so far, oldest first.
    pub fn journal(&self) -> &[Mutation] {
        &self.journal
    }

    /// Drain the journal, leaving it empty.
    pub fn take_journal(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }

    /// Textual snapshot of a subtree, for test assertions.
    ///
    /// Text nodes render as their value; elements as
    /// `<tag attr="value">…</tag>`.
    pub fn dump(&self, node: MemoryNodeId) -> String {
        let Some(entry) = self.nodes.get(node) else {
            return String::new();
        };
        match &entry.kind {
            NodeKind::Text => entry
                .attributes
                .get(crate::element::NODE_VALUE)
                .cloned()
                .unwrap_or_default(),
            NodeKind::Element(tag) => {
                let mut out = String::new();
                out.push('<');
                out.push_str(tag);
                for (name, value) in &entry.attributes {
                    out.push_str(&format!(" {name}=\"{value}\""));
                }
                out.push('>');
                for child in &entry.children {
                    out.push_str(&self.dump(*child));
                }
                out.push_str(&format!("</{tag}>"));
                out
            }
        }
    }

    fn drop_subtree(&mut self, node: MemoryNodeId) {
        if let Some(entry) = self.nodes.remove(node) {
            for child in entry.children {
                self.drop_subtree(child);
            }
        }
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderHost for MemoryHost {
    type Handle = MemoryNodeId;

    fn create_text_node(&mut self, text: &str) -> MemoryNodeId {
        let mut node = MemoryNode::new(NodeKind::Text);
        if !text.is_empty() {
            node.attributes
                .insert(crate::element::NODE_VALUE.to_string(), text.to_string());
        }
        let id = self.nodes.insert(node);
        self.journal.push(Mutation::CreateText(id));
        id
    }

    fn create_element(&mut self, tag: &str) -> MemoryNodeId {
        let id = self.nodes.insert(MemoryNode::new(NodeKind::Element(tag.to_string())));
        self.journal.push(Mutation::CreateElement(id, tag.to_string()));
        id
    }

    fn set_property(&mut self, node: &MemoryNodeId, name: &str, value: &PropValue) {
        if let Some(entry) = self.nodes.get_mut(*node) {
            entry
                .attributes
                .insert(name.to_string(), value.to_string());
            self.journal
                .push(Mutation::SetProperty(*node, name.to_string(), value.to_string()));
        }
    }

    fn remove_property(&mut self, node: &MemoryNodeId, name: &str) {
        if let Some(entry) = self.nodes.get_mut(*node) {
            entry.attributes.shift_remove(name);
            self.journal
                .push(Mutation::RemoveProperty(*node, name.to_string()));
        }
    }

    fn add_listener(&mut self, node: &MemoryNodeId, event: &str, handler: &EventHandler) {
        if let Some(entry) = self.nodes.get_mut(*node) {
            entry.listeners.insert(event.to_string(), handler.clone());
            self.journal
                .push(Mutation::AddListener(*node, event.to_string()));
        }
    }

    fn remove_listener(&mut self, node: &MemoryNodeId, event: &str, _handler: &EventHandler) {
        if let Some(entry) = self.nodes.get_mut(*node) {
            entry.listeners.shift_remove(event);
            self.journal
                .push(Mutation::RemoveListener(*node, event.to_string()));
        }
    }

    fn append_child(&mut self, parent: &MemoryNodeId, child: &MemoryNodeId) {
        if let Some(entry) = self.nodes.get_mut(*parent) {
            entry.children.push(*child);
            self.journal.push(Mutation::AppendChild(*parent, *child));
        }
    }

    fn remove_child(&mut self, parent: &MemoryNodeId, child: &MemoryNodeId) {
        if let Some(entry) = self.nodes.get_mut(*parent) {
            entry.children.retain(|c| c != child);
            self.journal.push(Mutation::RemoveChild(*parent, *child));
        }
        self.drop_subtree(*child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_and_properties_round_trip() {
        let mut host = MemoryHost::new();
        let div = host.create_element("div");
        host.set_property(&div, "id", &PropValue::Text("app".into()));

        assert_eq!(host.tag(div), Some("div"));
        assert_eq!(host.attribute(div, "id"), Some("app"));

        host.remove_property(&div, "id");
        assert_eq!(host.attribute(div, "id"), None);
    }

    #[test]
    fn removal_drops_the_whole_subtree() {
        let mut host = MemoryHost::new();
        let parent = host.create_element("div");
        let child = host.create_element("span");
        let grandchild = host.create_text_node("hi");
        host.append_child(&parent, &child);
        host.append_child(&child, &grandchild);

        host.remove_child(&parent, &child);

        assert!(host.children(parent).is_empty());
        assert!(!host.contains(child));
        assert!(!host.contains(grandchild));
    }

    #[test]
    fn dispatch_runs_the_registered_listener() {
        use std::cell::Cell;
        use std::rc::Rc;

        let mut host = MemoryHost::new();
        let button = host.create_element("button");
        let fired = Rc::new(Cell::new(0));
        let handler = {
            let fired = Rc::clone(&fired);
            EventHandler::new(move || fired.set(fired.get() + 1))
        };
        host.add_listener(&button, "click", &handler);

        assert!(host.dispatch(button, "click"));
        assert_eq!(fired.get(), 1);

        host.remove_listener(&button, "click", &handler);
        assert!(!host.dispatch(button, "click"));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn journal_records_mutations_in_order() {
        let mut host = MemoryHost::new();
        let div = host.create_element("div");
        let text = host.create_text_node("");
        host.append_child(&div, &text);

        assert_eq!(
            host.take_journal(),
            vec![
                Mutation::CreateElement(div, "div".to_string()),
                Mutation::CreateText(text),
                Mutation::AppendChild(div, text),
            ]
        );
        assert!(host.journal().is_empty());
    }

    #[test]
    fn dump_renders_a_readable_snapshot() {
        let mut host = MemoryHost::new();
        let div = host.create_element("div");
        host.set_property(&div, "id", &PropValue::Text("app".into()));
        let text = host.create_text_node("hello");
        host.append_child(&div, &text);

        assert_eq!(host.dump(div), "<div id=\"app\">hello</div>");
    }
}
