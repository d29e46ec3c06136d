//! Live render target: the retained node tree the renderer patches.
//!
//! [`Document`] is an explicit instance (no process globals) that hands
//! out reference-counted node handles and exposes the host surface the
//! renderer consumes: element/text creation with a namespace switch,
//! attribute and property access, listener add/remove, child
//! append/insert/replace/remove/move, indexed enumeration, event
//! dispatch and the child lookups the removal paths rely on.
//!
//! Every mutating call bumps a counter on the document; tests assert
//! patch minimality by counter deltas. Operations addressed at a node of
//! the wrong kind, or at a child that is not present, are silent no-ops:
//! the runtime neither raises nor logs for missing targets.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use tuidom_types::{EventKind, Namespace, NodeId, UiEvent, CLASS_ATTR};

use crate::vnode::EventHandler;

/// Shared handle to a live node. Identity is `Rc` identity: a moved node
/// keeps its handle and its id.
pub type NodeHandle = Rc<RefCell<LiveNode>>;

/// A live text node.
#[derive(Debug)]
pub struct LiveText {
    pub id: NodeId,
    pub data: String,
}

/// A live element node.
#[derive(Debug)]
pub struct LiveElement {
    pub id: NodeId,
    pub tag: String,
    pub namespace: Namespace,
    /// Reconciliation key recorded at mount. Runtime metadata, not an
    /// attribute: it never serializes and the keyed reconciler's move and
    /// removal passes both locate nodes through it.
    pub key: Option<String>,
    attrs: BTreeMap<String, String>,
    props: BTreeMap<String, bool>,
    listeners: Vec<(EventKind, EventHandler)>,
    children: Vec<NodeHandle>,
}

impl LiveElement {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attrs.keys().map(String::as_str)
    }

    pub fn property(&self, name: &str) -> bool {
        self.props.get(name).copied().unwrap_or(false)
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    fn first_class_token(&self) -> Option<&str> {
        self.attrs
            .get(CLASS_ATTR)
            .and_then(|c| c.split_whitespace().next())
    }
}

/// A live node: text leaf or element.
#[derive(Debug)]
pub enum LiveNode {
    Text(LiveText),
    Element(LiveElement),
}

impl LiveNode {
    pub fn id(&self) -> NodeId {
        match self {
            LiveNode::Text(t) => t.id,
            LiveNode::Element(e) => e.id,
        }
    }

    pub fn as_element(&self) -> Option<&LiveElement> {
        match self {
            LiveNode::Element(e) => Some(e),
            LiveNode::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, LiveNode::Text(_))
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            LiveNode::Element(e) => Some(&e.tag),
            LiveNode::Text(_) => None,
        }
    }
}

/// Identity of a live node behind its handle.
pub fn node_id(handle: &NodeHandle) -> NodeId {
    handle.borrow().id()
}

#[derive(Default)]
struct DocumentInner {
    next_id: Cell<u64>,
    mutations: Cell<u64>,
}

/// The live tree's host environment. Cheap to clone; all clones share the
/// same id sequence and mutation counter.
#[derive(Clone, Default)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of mutating host calls so far. Node creation is not
    /// counted; everything that touches an existing node or a child list
    /// is.
    pub fn mutations(&self) -> u64 {
        self.inner.mutations.get()
    }

    fn bump(&self) {
        self.inner.mutations.set(self.inner.mutations.get() + 1);
    }

    fn next_id(&self) -> NodeId {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        NodeId(id)
    }

    /// Create a detached element. The namespace is selected by the fixed
    /// vector-graphics tag allow-list.
    pub fn create_element(&self, tag: &str) -> NodeHandle {
        Rc::new(RefCell::new(LiveNode::Element(LiveElement {
            id: self.next_id(),
            tag: tag.to_string(),
            namespace: Namespace::for_tag(tag),
            key: None,
            attrs: BTreeMap::new(),
            props: BTreeMap::new(),
            listeners: Vec::new(),
            children: Vec::new(),
        })))
    }

    /// Create a detached text node.
    pub fn create_text(&self, data: &str) -> NodeHandle {
        Rc::new(RefCell::new(LiveNode::Text(LiveText {
            id: self.next_id(),
            data: data.to_string(),
        })))
    }

    // Attributes and properties.

    pub fn set_attribute(&self, node: &NodeHandle, name: &str, value: &str) {
        if let LiveNode::Element(el) = &mut *node.borrow_mut() {
            el.attrs.insert(name.to_string(), value.to_string());
            self.bump();
        }
    }

    pub fn remove_attribute(&self, node: &NodeHandle, name: &str) {
        if let LiveNode::Element(el) = &mut *node.borrow_mut() {
            if el.attrs.remove(name).is_some() {
                self.bump();
            }
        }
    }

    pub fn attribute(&self, node: &NodeHandle, name: &str) -> Option<String> {
        match &*node.borrow() {
            LiveNode::Element(el) => el.attrs.get(name).cloned(),
            LiveNode::Text(_) => None,
        }
    }

    pub fn set_property(&self, node: &NodeHandle, name: &str, value: bool) {
        if let LiveNode::Element(el) = &mut *node.borrow_mut() {
            el.props.insert(name.to_string(), value);
            self.bump();
        }
    }

    pub fn property(&self, node: &NodeHandle, name: &str) -> bool {
        match &*node.borrow() {
            LiveNode::Element(el) => el.property(name),
            LiveNode::Text(_) => false,
        }
    }

    /// Record the reconciliation key on a live element. Metadata only;
    /// not a host mutation.
    pub fn set_key(&self, node: &NodeHandle, key: Option<String>) {
        if let LiveNode::Element(el) = &mut *node.borrow_mut() {
            el.key = key;
        }
    }

    pub fn key_of(&self, node: &NodeHandle) -> Option<String> {
        match &*node.borrow() {
            LiveNode::Element(el) => el.key.clone(),
            LiveNode::Text(_) => None,
        }
    }

    // Listeners.

    pub fn add_listener(&self, node: &NodeHandle, kind: EventKind, handler: EventHandler) {
        if let LiveNode::Element(el) = &mut *node.borrow_mut() {
            el.listeners.push((kind, handler));
            self.bump();
        }
    }

    /// Remove a listener by kind and handler reference. Unknown handlers
    /// are a no-op.
    pub fn remove_listener(&self, node: &NodeHandle, kind: EventKind, handler: &EventHandler) {
        if let LiveNode::Element(el) = &mut *node.borrow_mut() {
            let before = el.listeners.len();
            el.listeners
                .retain(|(k, h)| !(*k == kind && h.ptr_eq(handler)));
            if el.listeners.len() != before {
                self.bump();
            }
        }
    }

    pub fn listener_count(&self, node: &NodeHandle, kind: EventKind) -> usize {
        match &*node.borrow() {
            LiveNode::Element(el) => el.listener_count(kind),
            LiveNode::Text(_) => 0,
        }
    }

    /// Deliver an event to the node's listeners of the matching kind, in
    /// registration order. The listener list is captured up front, so
    /// handlers may freely mutate the tree (or their own registration)
    /// while the dispatch runs.
    pub fn dispatch(&self, node: &NodeHandle, event: &UiEvent) {
        let handlers: Vec<EventHandler> = match &*node.borrow() {
            LiveNode::Element(el) => el
                .listeners
                .iter()
                .filter(|(k, _)| *k == event.kind)
                .map(|(_, h)| h.clone())
                .collect(),
            LiveNode::Text(_) => Vec::new(),
        };
        for handler in handlers {
            handler.call(event);
        }
    }

    // Text.

    pub fn set_text(&self, node: &NodeHandle, data: &str) {
        if let LiveNode::Text(t) = &mut *node.borrow_mut() {
            t.data = data.to_string();
            self.bump();
        }
    }

    /// Concatenated text of the node and its descendants.
    pub fn text_content(&self, node: &NodeHandle) -> String {
        match &*node.borrow() {
            LiveNode::Text(t) => t.data.clone(),
            LiveNode::Element(el) => {
                let mut out = String::new();
                for child in &el.children {
                    out.push_str(&self.text_content(child));
                }
                out
            }
        }
    }

    // Child list operations.

    pub fn append_child(&self, parent: &NodeHandle, child: NodeHandle) {
        if let LiveNode::Element(el) = &mut *parent.borrow_mut() {
            el.children.push(child);
            self.bump();
        }
    }

    /// Insert before the current occupant of `index`; appends when
    /// `index` is past the end.
    pub fn insert_before(&self, parent: &NodeHandle, child: NodeHandle, index: usize) {
        if let LiveNode::Element(el) = &mut *parent.borrow_mut() {
            let at = index.min(el.children.len());
            el.children.insert(at, child);
            self.bump();
        }
    }

    /// Replace the child at `index`, returning the displaced node. A
    /// missing index is a silent no-op.
    pub fn replace_child(
        &self,
        parent: &NodeHandle,
        index: usize,
        new: NodeHandle,
    ) -> Option<NodeHandle> {
        if let LiveNode::Element(el) = &mut *parent.borrow_mut() {
            if index < el.children.len() {
                let old = std::mem::replace(&mut el.children[index], new);
                self.bump();
                return Some(old);
            }
        }
        None
    }

    /// Remove a child by handle identity. Returns false (no-op) when the
    /// node is not a direct child.
    pub fn remove_child(&self, parent: &NodeHandle, child: &NodeHandle) -> bool {
        if let LiveNode::Element(el) = &mut *parent.borrow_mut() {
            if let Some(pos) = el.children.iter().position(|c| Rc::ptr_eq(c, child)) {
                el.children.remove(pos);
                self.bump();
                return true;
            }
        }
        false
    }

    pub fn remove_child_at(&self, parent: &NodeHandle, index: usize) -> Option<NodeHandle> {
        if let LiveNode::Element(el) = &mut *parent.borrow_mut() {
            if index < el.children.len() {
                let removed = el.children.remove(index);
                self.bump();
                return Some(removed);
            }
        }
        None
    }

    /// Move an existing child so it ends up at `to_index` (clamped to the
    /// list length after detachment). No-op when the child is already in
    /// place or is not a direct child; identity is preserved.
    pub fn move_child(&self, parent: &NodeHandle, child: &NodeHandle, to_index: usize) {
        if let LiveNode::Element(el) = &mut *parent.borrow_mut() {
            let Some(pos) = el.children.iter().position(|c| Rc::ptr_eq(c, child)) else {
                return;
            };
            if pos == to_index {
                return;
            }
            let node = el.children.remove(pos);
            let at = to_index.min(el.children.len());
            el.children.insert(at, node);
            self.bump();
        }
    }

    pub fn clear_children(&self, parent: &NodeHandle) {
        if let LiveNode::Element(el) = &mut *parent.borrow_mut() {
            if !el.children.is_empty() {
                el.children.clear();
                self.bump();
            }
        }
    }

    pub fn child_at(&self, parent: &NodeHandle, index: usize) -> Option<NodeHandle> {
        match &*parent.borrow() {
            LiveNode::Element(el) => el.children.get(index).cloned(),
            LiveNode::Text(_) => None,
        }
    }

    pub fn child_count(&self, parent: &NodeHandle) -> usize {
        match &*parent.borrow() {
            LiveNode::Element(el) => el.children.len(),
            LiveNode::Text(_) => 0,
        }
    }

    pub fn children(&self, parent: &NodeHandle) -> Vec<NodeHandle> {
        match &*parent.borrow() {
            LiveNode::Element(el) => el.children.clone(),
            LiveNode::Text(_) => Vec::new(),
        }
    }

    pub fn position_of(&self, parent: &NodeHandle, child: &NodeHandle) -> Option<usize> {
        match &*parent.borrow() {
            LiveNode::Element(el) => el.children.iter().position(|c| Rc::ptr_eq(c, child)),
            LiveNode::Text(_) => None,
        }
    }

    // Lookups over direct children, used by the removal paths.

    pub fn find_child_by_attr(
        &self,
        parent: &NodeHandle,
        name: &str,
        value: &str,
    ) -> Option<NodeHandle> {
        match &*parent.borrow() {
            LiveNode::Element(el) => el
                .children
                .iter()
                .find(|c| {
                    c.borrow()
                        .as_element()
                        .and_then(|e| e.attribute(name))
                        .is_some_and(|v| v == value)
                })
                .cloned(),
            LiveNode::Text(_) => None,
        }
    }

    /// CSS-like `tag.class` lookup against the first class token.
    pub fn find_child_by_tag_class(
        &self,
        parent: &NodeHandle,
        tag: &str,
        class_token: &str,
    ) -> Option<NodeHandle> {
        match &*parent.borrow() {
            LiveNode::Element(el) => el
                .children
                .iter()
                .find(|c| {
                    c.borrow().as_element().is_some_and(|e| {
                        e.tag == tag && e.first_class_token() == Some(class_token)
                    })
                })
                .cloned(),
            LiveNode::Text(_) => None,
        }
    }

    pub fn find_child_by_key(&self, parent: &NodeHandle, key: &str) -> Option<NodeHandle> {
        match &*parent.borrow() {
            LiveNode::Element(el) => el
                .children
                .iter()
                .find(|c| {
                    c.borrow()
                        .as_element()
                        .is_some_and(|e| e.key.as_deref() == Some(key))
                })
                .cloned(),
            LiveNode::Text(_) => None,
        }
    }
}
