//! First paint: materialize a virtual tree into live nodes.

use tuidom_core::live::{Document, NodeHandle};
use tuidom_core::vnode::{AttrValue, VNode};

/// Materialize `node` into a detached live subtree.
///
/// Text leaves become text nodes. Elements are created in the namespace
/// their tag selects, attributes apply by kind, the ref hook (if any)
/// fires synchronously with the fresh handle, and children mount
/// recursively in order. The element's key is recorded as live metadata
/// so later keyed passes can locate the node.
///
/// This has no failure modes of its own; it mirrors whatever the host
/// element-creation surface does.
pub fn mount(doc: &Document, node: &VNode) -> NodeHandle {
    match node {
        VNode::Text(data) => doc.create_text(data),
        VNode::Element(v) => {
            let el = doc.create_element(&v.tag);
            for value in v.attrs.iter() {
                apply_attr(doc, &el, value);
            }
            doc.set_key(&el, v.key.clone());
            for child in &v.children {
                let live = mount(doc, child);
                doc.append_child(&el, live);
            }
            el
        }
    }
}

fn apply_attr(doc: &Document, el: &NodeHandle, (name, value): (&String, &AttrValue)) {
    match value {
        AttrValue::Plain(s) => doc.set_attribute(el, name, s),
        AttrValue::Property(b) => doc.set_property(el, name, *b),
        AttrValue::Event { kind, handler } => doc.add_listener(el, *kind, handler.clone()),
        AttrValue::Ref(hook) => hook.call(el),
    }
}
