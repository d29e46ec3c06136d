//! Virtual node model.
//!
//! A [`VNode`] is either a primitive text leaf or an element with a tag,
//! an attribute map and ordered children. Attribute kind (plain, boolean
//! property, event binding, ref hook) is decided once at construction and
//! carried as a tagged [`AttrValue`], so the differ matches on the variant
//! instead of re-inspecting names on every pass. The reconciliation key is
//! a dedicated field, not an attribute, and is never mirrored onto the
//! live target.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use tuidom_types::{is_property_attr, EventKind, UiEvent};

use crate::live::NodeHandle;

/// Handler bound to an event attribute.
///
/// Handlers compare by reference, not structure: the differ swaps a
/// listener only when the underlying closure is a different allocation.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&UiEvent)>);

impl EventHandler {
    pub fn new(f: impl Fn(&UiEvent) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &UiEvent) {
        (self.0)(event)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
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

/// One-shot callback invoked with the live node right after it is
/// materialized. The only sanctioned imperative exit from the declarative
/// model: it fires on mount, never on update, and is never stored on the
/// target.
#[derive(Clone)]
pub struct RefHook(Rc<dyn Fn(&NodeHandle)>);

impl RefHook {
    pub fn new(f: impl Fn(&NodeHandle) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, node: &NodeHandle) {
        (self.0)(node)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for RefHook {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for RefHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefHook")
    }
}

/// Attribute value, tagged by kind at construction time.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Generic serialized attribute.
    Plain(String),
    /// Live property for the fixed boolean set ("checked", "disabled").
    Property(bool),
    /// Event binding, stored under the canonical `on<kind>` name.
    Event { kind: EventKind, handler: EventHandler },
    /// Post-mount hook, stored under `ref`.
    Ref(RefHook),
}

/// How an element's child list reconciles on update. Decided while the
/// list is built and never re-inspected by the differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    /// Children pair up by position.
    #[default]
    Positional,
    /// Children pair up by key; surviving nodes keep their identity
    /// across reorders.
    Keyed,
}

/// An element node: tag, attributes, optional key, ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct VElement {
    pub tag: String,
    pub attrs: BTreeMap<String, AttrValue>,
    pub key: Option<String>,
    pub children: Vec<VNode>,
    /// Switches to [`ListMode::Keyed`] the moment a keyed child is
    /// appended, and stays there.
    pub list_mode: ListMode,
}

impl VElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            key: None,
            children: Vec::new(),
            list_mode: ListMode::Positional,
        }
    }

    /// Set a plain attribute. Names in the fixed boolean-property set
    /// route to the property variant (`"true"` enables it); everything
    /// else passes through unvalidated to the target's generic attribute
    /// setter.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if is_property_attr(&name) {
            return self.prop(name, value == "true");
        }
        self.attrs.insert(name, AttrValue::Plain(value));
        self
    }

    /// Set a boolean property attribute ("checked", "disabled").
    pub fn prop(mut self, name: impl Into<String>, value: bool) -> Self {
        self.attrs.insert(name.into(), AttrValue::Property(value));
        self
    }

    /// Bind an event handler.
    pub fn on(mut self, kind: EventKind, f: impl Fn(&UiEvent) + 'static) -> Self {
        self.attrs.insert(
            kind.attr_name(),
            AttrValue::Event {
                kind,
                handler: EventHandler::new(f),
            },
        );
        self
    }

    /// Bind an already-built handler (lets callers share one closure
    /// across renders so the differ sees an unchanged binding).
    pub fn on_handler(mut self, kind: EventKind, handler: EventHandler) -> Self {
        self.attrs
            .insert(kind.attr_name(), AttrValue::Event { kind, handler });
        self
    }

    /// Attach a post-mount ref hook.
    pub fn hook(mut self, f: impl Fn(&NodeHandle) + 'static) -> Self {
        self.attrs.insert("ref".to_string(), AttrValue::Ref(RefHook::new(f)));
        self
    }

    /// Set the reconciliation key. Keys must be unique among siblings;
    /// duplicates are not validated and the last one wins in the keyed
    /// reconciler's index maps.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Append one child. Nested sequences flatten, absent entries drop.
    pub fn child(mut self, child: impl Into<Child>) -> Self {
        let from = self.children.len();
        push_flat(&mut self.children, child.into());
        self.absorb_list_mode(from);
        self
    }

    /// Append a sequence of children, flattened.
    pub fn children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Child>,
    {
        let from = self.children.len();
        for child in children {
            push_flat(&mut self.children, child.into());
        }
        self.absorb_list_mode(from);
        self
    }

    fn absorb_list_mode(&mut self, from: usize) {
        if self.list_mode == ListMode::Positional
            && self.children[from..].iter().any(|c| c.key().is_some())
        {
            self.list_mode = ListMode::Keyed;
        }
    }
}

/// A tree node: primitive text leaf or element.
#[derive(Debug, Clone, PartialEq)]
pub enum VNode {
    Text(String),
    Element(VElement),
}

impl VNode {
    /// Build a text leaf from any displayable scalar.
    pub fn text(value: impl fmt::Display) -> Self {
        VNode::Text(value.to_string())
    }

    pub fn as_element(&self) -> Option<&VElement> {
        match self {
            VNode::Element(el) => Some(el),
            VNode::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, VNode::Text(_))
    }

    /// Reconciliation key, if this is a keyed element.
    pub fn key(&self) -> Option<&str> {
        match self {
            VNode::Element(el) => el.key.as_deref(),
            VNode::Text(_) => None,
        }
    }
}

impl From<VElement> for VNode {
    fn from(el: VElement) -> Self {
        VNode::Element(el)
    }
}

/// Construction-time child value: a node, a nested sequence, or nothing.
///
/// Sequences collapse recursively and `Empty` entries are filtered out, so
/// every stored children list contains only rendering-eligible nodes.
pub enum Child {
    Node(VNode),
    Many(Vec<Child>),
    Empty,
}

fn push_flat(out: &mut Vec<VNode>, child: Child) {
    match child {
        Child::Node(node) => out.push(node),
        Child::Many(list) => {
            for c in list {
                push_flat(out, c);
            }
        }
        Child::Empty => {}
    }
}

impl From<VNode> for Child {
    fn from(node: VNode) -> Self {
        Child::Node(node)
    }
}

impl From<VElement> for Child {
    fn from(el: VElement) -> Self {
        Child::Node(VNode::Element(el))
    }
}

impl From<&str> for Child {
    fn from(s: &str) -> Self {
        Child::Node(VNode::Text(s.to_string()))
    }
}

impl From<String> for Child {
    fn from(s: String) -> Self {
        Child::Node(VNode::Text(s))
    }
}

macro_rules! child_from_display {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Child {
            fn from(v: $ty) -> Self {
                Child::Node(VNode::text(v))
            }
        })*
    };
}

child_from_display!(i32, i64, u32, u64, usize, f64, bool, char);

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Child::Empty,
        }
    }
}

impl<T: Into<Child>> From<Vec<T>> for Child {
    fn from(list: Vec<T>) -> Self {
        Child::Many(list.into_iter().map(Into::into).collect())
    }
}

/// Shorthand element constructor.
pub fn el(tag: impl Into<String>) -> VElement {
    VElement::new(tag)
}

/// Shorthand text constructor.
pub fn text(value: impl fmt::Display) -> VNode {
    VNode::text(value)
}
