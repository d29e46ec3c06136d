//! Tree reconciliation: compare a new virtual tree against the last
//! rendered snapshot and patch the live target in place.

use std::collections::HashMap;

use tuidom_core::live::{node_id, Document, NodeHandle};
use tuidom_core::vnode::{AttrValue, ListMode, VElement, VNode};
use tuidom_types::{NodeId, CLASS_ATTR, DATA_ID_ATTR, ID_ATTR};

use crate::mount::mount;

/// Whether two nodes are different enough to force a wholesale replace:
/// differing kind, differing text, or differing tag. Same-tag elements
/// are *not* changed; their attributes and children reconcile in place.
pub fn changed(new: &VNode, old: &VNode) -> bool {
    match (new, old) {
        (VNode::Text(a), VNode::Text(b)) => a != b,
        (VNode::Element(a), VNode::Element(b)) => a.tag != b.tag,
        _ => true,
    }
}

/// Diff/patch driver. Owns one snapshot of the last rendered tree per
/// render target, keyed by the target's node id. Snapshots are replaced,
/// never mutated: each successful render stores a fresh deep clone.
pub struct Renderer {
    doc: Document,
    snapshots: HashMap<NodeId, VNode>,
}

impl Renderer {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            snapshots: HashMap::new(),
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    /// Render `tree` into `target`.
    ///
    /// First render into a target clears it and mounts the whole tree;
    /// later renders reconcile against the stored snapshot, mutating only
    /// what changed. The snapshot is swapped for a clone of `tree` once
    /// patching completes.
    pub fn render(&mut self, tree: &VNode, target: &NodeHandle) {
        let target_id = node_id(target);
        match self.snapshots.remove(&target_id) {
            None => {
                self.doc.clear_children(target);
                let live = mount(&self.doc, tree);
                self.doc.append_child(target, live);
            }
            Some(old) => {
                self.update_element(target, Some(tree), Some(&old), 0);
            }
        }
        self.snapshots.insert(target_id, tree.clone());
    }

    /// Drop the snapshot for a target, forcing the next render to be a
    /// full mount. Used when a target's contents were mutated outside the
    /// renderer (e.g. an imperative teardown).
    pub fn invalidate(&mut self, target: &NodeHandle) {
        self.snapshots.remove(&node_id(target));
    }

    /// Reconcile the child slot `index` of `parent`.
    pub(crate) fn update_element(
        &self,
        parent: &NodeHandle,
        new: Option<&VNode>,
        old: Option<&VNode>,
        index: usize,
    ) {
        let (new, old) = match (new, old) {
            (None, None) => return,
            // Net insertion at the tail of a positional list.
            (Some(n), None) => {
                let live = mount(&self.doc, n);
                self.doc.append_child(parent, live);
                return;
            }
            // Net removal.
            (None, Some(o)) => {
                self.remove_stale_child(parent, o, index);
                return;
            }
            (Some(n), Some(o)) => (n, o),
        };

        if changed(new, old) {
            // No partial reuse across a kind or tag change: replace the
            // whole subtree at this slot. A missing slot is a no-op.
            if self.doc.child_at(parent, index).is_some() {
                let fresh = mount(&self.doc, new);
                self.doc.replace_child(parent, index, fresh);
            }
            return;
        }

        let (VNode::Element(new_el), VNode::Element(old_el)) = (new, old) else {
            // Equal primitives: nothing to patch.
            return;
        };

        let Some(live) = self.doc.child_at(parent, index) else {
            return;
        };

        self.update_attrs(&live, new_el, old_el);

        // Keyed-vs-positional is an all-or-nothing decision per list,
        // recorded on the element while its child list was built.
        if new_el.list_mode == ListMode::Keyed || old_el.list_mode == ListMode::Keyed {
            self.update_keyed_children(&live, &new_el.children, &old_el.children);
            return;
        }

        let new_len = new_el.children.len();
        for i in 0..new_len {
            self.update_element(&live, new_el.children.get(i), old_el.children.get(i), i);
        }
        // Net removals run highest-index first: each removal shifts the
        // live list left, so ascending order would walk the positional
        // fallback off target and strand every other trailing child.
        for i in (new_len..old_el.children.len()).rev() {
            self.update_element(&live, None, old_el.children.get(i), i);
        }
    }

    /// Remove the live child corresponding to a vanished vnode. Lookup
    /// priority: explicit identity attribute, id attribute, tag + first
    /// class token, then positional fallback. No match anywhere is a
    /// silent no-op.
    fn remove_stale_child(&self, parent: &NodeHandle, old: &VNode, index: usize) {
        let by_identity = old.as_element().and_then(|el| {
            plain_attr(el, DATA_ID_ATTR)
                .and_then(|v| self.doc.find_child_by_attr(parent, DATA_ID_ATTR, v))
                .or_else(|| {
                    plain_attr(el, ID_ATTR)
                        .and_then(|v| self.doc.find_child_by_attr(parent, ID_ATTR, v))
                })
                .or_else(|| {
                    plain_attr(el, CLASS_ATTR)
                        .and_then(|c| c.split_whitespace().next())
                        .and_then(|token| self.doc.find_child_by_tag_class(parent, &el.tag, token))
                })
        });

        let target = by_identity.or_else(|| self.doc.child_at(parent, index));
        if let Some(node) = target {
            self.doc.remove_child(parent, &node);
        }
    }

    /// Attribute reconciliation between two same-tag elements.
    ///
    /// New-side walk: listeners are added when the binding is new (a
    /// changed handler is swapped in the old-side walk); plain and
    /// property values go through their kind-specific setter only when
    /// they differ. Ref hooks are mount-only and never re-fire. Old-side
    /// walk: vanished attributes are removed (properties reset to false,
    /// listeners detached); a binding whose handler identity changed is
    /// swapped. The key lives outside the attribute map, so it can never
    /// be mirrored or removed here.
    fn update_attrs(&self, live: &NodeHandle, new_el: &VElement, old_el: &VElement) {
        for (name, value) in &new_el.attrs {
            match value {
                AttrValue::Event { kind, handler } => {
                    if !old_el.attrs.contains_key(name) {
                        self.doc.add_listener(live, *kind, handler.clone());
                    }
                }
                AttrValue::Ref(_) => {}
                AttrValue::Plain(s) => {
                    if old_el.attrs.get(name) != Some(value) {
                        self.doc.set_attribute(live, name, s);
                    }
                }
                AttrValue::Property(b) => {
                    if old_el.attrs.get(name) != Some(value) {
                        self.doc.set_property(live, name, *b);
                    }
                }
            }
        }

        for (name, value) in &old_el.attrs {
            match value {
                AttrValue::Event { kind, handler } => match new_el.attrs.get(name) {
                    Some(AttrValue::Event {
                        kind: new_kind,
                        handler: new_handler,
                    }) => {
                        if !handler.ptr_eq(new_handler) {
                            self.doc.remove_listener(live, *kind, handler);
                            self.doc.add_listener(live, *new_kind, new_handler.clone());
                        }
                    }
                    _ => self.doc.remove_listener(live, *kind, handler),
                },
                AttrValue::Ref(_) => {}
                AttrValue::Plain(_) => {
                    if !new_el.attrs.contains_key(name) {
                        self.doc.remove_attribute(live, name);
                    }
                }
                AttrValue::Property(_) => {
                    if !new_el.attrs.contains_key(name) {
                        self.doc.set_property(live, name, false);
                    }
                }
            }
        }
    }
}

fn plain_attr<'a>(el: &'a VElement, name: &str) -> Option<&'a str> {
    match el.attrs.get(name) {
        Some(AttrValue::Plain(s)) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuidom_core::vnode::{el, text};

    #[test]
    fn changed_detects_kind_text_and_tag_differences() {
        assert!(changed(&text("a"), &el("div").into()));
        assert!(changed(&text("a"), &text("b")));
        assert!(!changed(&text("a"), &text("a")));
        assert!(changed(&el("div").into(), &el("span").into()));
        // Same tag, different attrs: not a replace, attrs reconcile.
        assert!(!changed(
            &el("div").attr("class", "a").into(),
            &el("div").attr("class", "b").into()
        ));
    }

    #[test]
    fn first_render_clears_and_mounts() {
        let doc = Document::new();
        let mut renderer = Renderer::new(doc.clone());
        let target = doc.create_element("root");
        let leftover = doc.create_text("stale");
        doc.append_child(&target, leftover);

        renderer.render(&el("div").child("hello").into(), &target);
        assert_eq!(doc.child_count(&target), 1);
        assert_eq!(doc.text_content(&target), "hello");
    }

    #[test]
    fn snapshots_are_per_target() {
        let doc = Document::new();
        let mut renderer = Renderer::new(doc.clone());
        let a = doc.create_element("root");
        let b = doc.create_element("root");

        renderer.render(&el("div").child("a").into(), &a);
        renderer.render(&el("div").child("b").into(), &b);
        assert_eq!(doc.text_content(&a), "a");
        assert_eq!(doc.text_content(&b), "b");

        // Updating one target leaves the other untouched.
        renderer.render(&el("div").child("a2").into(), &a);
        assert_eq!(doc.text_content(&a), "a2");
        assert_eq!(doc.text_content(&b), "b");
    }

    #[test]
    fn invalidate_forces_full_remount() {
        let doc = Document::new();
        let mut renderer = Renderer::new(doc.clone());
        let target = doc.create_element("root");

        renderer.render(&el("div").into(), &target);
        let first = doc.child_at(&target, 0).map(|n| node_id(&n));

        renderer.invalidate(&target);
        renderer.render(&el("div").into(), &target);
        let second = doc.child_at(&target, 0).map(|n| node_id(&n));
        assert_ne!(first, second);
    }

    #[test]
    fn removal_prefers_identity_attribute_over_position() {
        let doc = Document::new();
        let mut renderer = Renderer::new(doc.clone());
        let target = doc.create_element("root");

        let two = |a: &str, b: &str| -> VNode {
            el("div")
                .child(el("p").attr(DATA_ID_ATTR, a.to_string()).child(a.to_string()))
                .child(el("p").attr(DATA_ID_ATTR, b.to_string()).child(b.to_string()))
                .into()
        };
        renderer.render(&two("x", "y"), &target);

        // Drop the second child; the stale vnode names data-id "y", so
        // the removal must hit "y" even though positional fallback would
        // also land on index 1 here.
        let one: VNode = el("div")
            .child(el("p").attr(DATA_ID_ATTR, "x").child("x"))
            .into();
        renderer.render(&one, &target);

        let container = doc.child_at(&target, 0).unwrap();
        assert_eq!(doc.child_count(&container), 1);
        assert_eq!(doc.text_content(&container), "x");
    }

    #[test]
    fn shrinking_by_several_children_drops_the_whole_tail() {
        let doc = Document::new();
        let mut renderer = Renderer::new(doc.clone());
        let target = doc.create_element("root");

        let list = |n: usize| -> VNode {
            el("ul")
                .children((0..n).map(|i| el("li").child(format!("item {i}"))))
                .into()
        };
        renderer.render(&list(4), &target);
        let ul = doc.child_at(&target, 0).unwrap();
        assert_eq!(doc.child_count(&ul), 4);

        // No identity attributes anywhere: every removal falls back to
        // position, and three children vanish in one pass.
        renderer.render(&list(1), &target);
        assert_eq!(doc.child_count(&ul), 1);
        assert_eq!(doc.text_content(&ul), "item 0");
    }

    #[test]
    fn removal_with_no_match_is_a_silent_noop() {
        let doc = Document::new();
        let renderer = Renderer::new(doc.clone());
        let parent = doc.create_element("div");
        let stale: VNode = el("p").attr(DATA_ID_ATTR, "ghost").into();
        // Index 7 does not exist and no child carries the attribute.
        renderer.update_element(&parent, None, Some(&stale), 7);
        assert_eq!(doc.mutations(), 0);
    }
}
