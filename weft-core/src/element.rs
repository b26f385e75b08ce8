//! Element Model
//!
//! Elements are immutable descriptions of a tree node: a tag plus a property
//! bag with an ordered list of child elements. They are produced fresh on
//! every render call and never mutated afterwards.
//!
//! # Tags
//!
//! A tag is one of three things:
//!
//! - A primitive target-element name (`Tag::Host`), e.g. `"div"`.
//! - The reserved text marker (`Tag::Text`), carrying its value in the
//!   `nodeValue` property.
//! - A rendering function (`Tag::Component`). Constructing an element never
//!   inspects or calls the function; resolution is deferred until the
//!   reconciler expands the corresponding fiber.
//!
//! # Listener convention
//!
//! Property names prefixed with `on` denote listener bindings rather than
//! plain attributes. The bound event is the lower-cased remainder of the
//! name: `onClick` binds `click`.
//!
//! # Identity
//!
//! Elements are cheaply clonable; component functions and event handlers are
//! shared behind `Rc`, and their equality is pointer equality. Cloning an
//! element therefore preserves the identities the reconciler keys its reuse
//! decisions on.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::render::RenderScope;

/// Prefix marking a property name as a listener binding.
pub const EVENT_MARKER: &str = "on";

/// Property carrying the value of a text node.
pub const NODE_VALUE: &str = "nodeValue";

/// Returns true if the property name denotes a listener binding.
pub fn is_listener_name(name: &str) -> bool {
    name.starts_with(EVENT_MARKER)
}

/// Derive the event name bound by a listener property.
///
/// The event is the lower-cased remainder after the marker: `onClick`
/// becomes `click`.
pub fn event_name(name: &str) -> String {
    name[EVENT_MARKER.len()..].to_ascii_lowercase()
}

// ----------------------------------------------------------------------------
// Handlers and components
// ----------------------------------------------------------------------------

/// A listener callback attached to a primitive element.
///
/// Handlers compare by pointer identity; replacing a handler with a new
/// closure is observed as a change even if the closures are textually
/// identical.
#[derive(Clone)]
pub struct EventHandler {
    callback: Rc<dyn Fn()>,
}

impl EventHandler {
    /// Wrap a callback as an event handler.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Invoke the handler.
    pub fn call(&self) {
        (self.callback)();
    }

    /// Pointer-identity comparison.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventHandler")
    }
}

/// The signature of a rendering function.
///
/// Rendering functions receive the hook scope for the current invocation and
/// their props, and return the single element they resolve to.
pub type RenderFn = dyn Fn(&mut RenderScope<'_>, &Props) -> Element;

/// A rendering function usable as an element tag.
///
/// Identity is pointer identity of the shared closure: two elements carry
/// the same component only if they were built from clones of the same
/// `Component`. This is the reuse criterion the reconciler applies to
/// function tags.
#[derive(Clone)]
pub struct Component {
    name: &'static str,
    render: Rc<RenderFn>,
}

impl Component {
    /// Create a named component from a rendering function.
    ///
    /// The name is used for diagnostics only and plays no part in identity.
    pub fn new<F>(name: &'static str, render: F) -> Self
    where
        F: Fn(&mut RenderScope<'_>, &Props) -> Element + 'static,
    {
        Self {
            name,
            render: Rc::new(render),
        }
    }

    /// The component's diagnostic name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invoke the rendering function.
    pub fn invoke(&self, scope: &mut RenderScope<'_>, props: &Props) -> Element {
        (self.render)(scope, props)
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.render, &other.render)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.name).finish()
    }
}

// ----------------------------------------------------------------------------
// Tags and property values
// ----------------------------------------------------------------------------

/// What an element describes: a primitive node, a text leaf, or a component.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    /// A primitive target-element name, e.g. `"div"`.
    Host(String),

    /// The reserved text marker. The value lives in the `nodeValue` prop.
    Text,

    /// A rendering function, resolved lazily at reconciliation time.
    Component(Component),
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Tag::Host(name.to_string())
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Tag::Host(name)
    }
}

impl From<Component> for Tag {
    fn from(component: Component) -> Self {
        Tag::Component(component)
    }
}

/// A property value.
///
/// Non-handler values stringify via `Display` when they reach the render
/// target; handlers compare by pointer identity.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Handler(EventHandler),
}

impl PropValue {
    /// Returns true for listener values.
    pub fn is_handler(&self) -> bool {
        matches!(self, PropValue::Handler(_))
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Text(value) => f.write_str(value),
            PropValue::Number(value) => write!(f, "{value}"),
            PropValue::Bool(value) => write!(f, "{value}"),
            PropValue::Handler(_) => f.write_str("<listener>"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(handler: EventHandler) -> Self {
        PropValue::Handler(handler)
    }
}

// ----------------------------------------------------------------------------
// Props
// ----------------------------------------------------------------------------

/// The property bag of an element.
///
/// Attributes keep insertion order so the commit-phase diff walks them
/// deterministically. Children are a dedicated field rather than a reserved
/// key in the map, which makes their exclusion from attribute and listener
/// handling structural instead of a runtime filter.
#[derive(Debug, Clone, Default)]
pub struct Props {
    attributes: IndexMap<String, PropValue>,
    /// The ordered child elements. Always present, possibly empty.
    pub children: Vec<Element>,
}

impl Props {
    /// An empty property bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute insertion.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder-style listener insertion.
    ///
    /// The name must carry the event marker, e.g. `onClick`.
    pub fn listener<F>(mut self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        let name = name.into();
        debug_assert!(
            is_listener_name(&name),
            "listener property {name:?} lacks the {EVENT_MARKER:?} marker"
        );
        self.attributes
            .insert(name, PropValue::Handler(EventHandler::new(callback)));
        self
    }

    /// Insert or replace an attribute.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Look up an attribute by name.
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.attributes.get(name)
    }

    /// All attributes in insertion order, listeners included.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Attributes whose names carry the event marker.
    pub fn listeners(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.attributes().filter(|(name, _)| is_listener_name(name))
    }

    /// Attributes whose names do not carry the event marker.
    pub fn plain(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.attributes().filter(|(name, _)| !is_listener_name(name))
    }
}

// ----------------------------------------------------------------------------
// Elements
// ----------------------------------------------------------------------------

/// An immutable description of a tree node.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: Tag,
    pub props: Props,
}

impl Element {
    /// A primitive element with the given tag, props, and children.
    pub fn node(tag: impl Into<String>, props: Props, children: Vec<Element>) -> Self {
        create_element(Tag::Host(tag.into()), props, children)
    }

    /// A component element. The rendering function is not called here.
    pub fn component(component: Component, props: Props, children: Vec<Element>) -> Self {
        create_element(Tag::Component(component), props, children)
    }

    /// A text leaf. Any displayable value is coerced via stringification.
    pub fn text(value: impl fmt::Display) -> Self {
        Self {
            tag: Tag::Text,
            props: Props::new().attr(NODE_VALUE, value.to_string()),
        }
    }
}

/// Construct an element from a tag, props, and children.
///
/// The children are attached to the props; component tags are stored
/// untouched for the reconciler to resolve later.
pub fn create_element(
    tag: impl Into<Tag>,
    mut props: Props,
    children: impl IntoIterator<Item = Element>,
) -> Element {
    props.children.extend(children);
    Element {
        tag: tag.into(),
        props,
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::text(value)
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::text(value)
    }
}

impl From<i32> for Element {
    fn from(value: i32) -> Self {
        Element::text(value)
    }
}

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Element::text(value)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_name_derivation() {
        assert!(is_listener_name("onClick"));
        assert!(!is_listener_name("id"));
        assert_eq!(event_name("onClick"), "click");
        assert_eq!(event_name("onMouseDown"), "mousedown");
    }

    #[test]
    fn text_coercion_stringifies() {
        let number = Element::text(42);
        assert_eq!(number.tag, Tag::Text);
        assert_eq!(
            number.props.get(NODE_VALUE),
            Some(&PropValue::Text("42".to_string()))
        );

        let from_str: Element = "hello".into();
        assert_eq!(from_str.tag, Tag::Text);
    }

    #[test]
    fn children_live_outside_the_attribute_map() {
        let element = Element::node(
            "div",
            Props::new().attr("id", "app"),
            vec![Element::text("child")],
        );

        assert_eq!(element.props.children.len(), 1);
        assert!(element.props.get("children").is_none());
        assert_eq!(element.props.attributes().count(), 1);
    }

    #[test]
    fn handler_equality_is_pointer_identity() {
        let a = EventHandler::new(|| {});
        let b = a.clone();
        let c = EventHandler::new(|| {});

        assert_eq!(PropValue::Handler(a.clone()), PropValue::Handler(b));
        assert_ne!(PropValue::Handler(a), PropValue::Handler(c));
    }

    #[test]
    fn component_equality_is_pointer_identity() {
        let a = Component::new("A", |_, _| Element::text(""));
        let b = a.clone();
        let c = Component::new("A", |_, _| Element::text(""));

        assert_eq!(Tag::Component(a.clone()), Tag::Component(b));
        assert_ne!(Tag::Component(a), Tag::Component(c));
    }

    #[test]
    fn cloning_preserves_handler_identity() {
        let element = Element::node(
            "button",
            Props::new().listener("onClick", || {}),
            Vec::new(),
        );
        let copy = element.clone();

        assert_eq!(element.props.get("onClick"), copy.props.get("onClick"));
    }

    #[test]
    fn construction_never_invokes_components() {
        use std::cell::Cell;
        use std::rc::Rc;

        let invoked = Rc::new(Cell::new(false));
        let probe = {
            let invoked = Rc::clone(&invoked);
            Component::new("Probe", move |_, _| {
                invoked.set(true);
                Element::text("")
            })
        };

        let _element = Element::component(probe, Props::new(), vec![Element::text("child")]);
        assert!(!invoked.get());
    }

    #[test]
    fn listener_partition() {
        let props = Props::new()
            .attr("id", "app")
            .listener("onClick", || {})
            .attr("title", "t");

        let listeners: Vec<_> = props.listeners().map(|(n, _)| n).collect();
        let plain: Vec<_> = props.plain().map(|(n, _)| n).collect();

        assert_eq!(listeners, vec!["onClick"]);
        assert_eq!(plain, vec!["id", "title"]);
    }
}
