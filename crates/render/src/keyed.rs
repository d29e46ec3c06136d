//! Keyed child-list reconciliation.
//!
//! Three passes: update-and-move for surviving keys, insert for new
//! keys, remove for vanished keys. Both the move and the removal passes
//! locate live nodes by the key recorded on them at mount, so identity
//! is tracked by the same token throughout and a reorder can never
//! orphan a node. Unkeyed entries mixed into a keyed list are tolerated
//! but not specially handled: they remount through the insert pass and
//! their relative order carries no guarantee.

use std::collections::HashMap;

use tuidom_core::live::NodeHandle;
use tuidom_core::vnode::VNode;

use crate::diff::Renderer;
use crate::mount::mount;

impl Renderer {
    /// Reconcile the children of `parent` by key.
    ///
    /// After all three passes the live child order matches
    /// `new_children` for every surviving key, and surviving nodes keep
    /// their handle (no remount, no lost focus/animation state).
    pub(crate) fn update_keyed_children(
        &self,
        parent: &NodeHandle,
        new_children: &[VNode],
        old_children: &[VNode],
    ) {
        // Key -> index maps. Duplicate keys are not validated; the last
        // occurrence wins.
        let old_keys: HashMap<&str, usize> = old_children
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.key().map(|k| (k, i)))
            .collect();
        let new_keys: HashMap<&str, usize> = new_children
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.key().map(|k| (k, i)))
            .collect();

        // Pass 1: update surviving nodes in place, then move them to
        // their new position (insert-before-successor; append past the
        // end).
        for (new_index, new_child) in new_children.iter().enumerate() {
            let Some(key) = new_child.key() else { continue };
            let Some(&old_index) = old_keys.get(key) else {
                continue;
            };
            let Some(live) = self.doc().find_child_by_key(parent, key) else {
                continue;
            };
            let live_index = self
                .doc()
                .position_of(parent, &live)
                .unwrap_or(old_index);
            self.update_element(
                parent,
                Some(new_child),
                Some(&old_children[old_index]),
                live_index,
            );
            if live_index != new_index {
                self.doc().move_child(parent, &live, new_index);
            }
        }

        // Pass 2: mount entries whose key did not exist before (and
        // unkeyed entries) at their new index.
        for (new_index, new_child) in new_children.iter().enumerate() {
            let is_new = match new_child.key() {
                Some(key) => !old_keys.contains_key(key),
                None => true,
            };
            if !is_new {
                continue;
            }
            let live = mount(self.doc(), new_child);
            if new_index >= self.doc().child_count(parent) {
                self.doc().append_child(parent, live);
            } else {
                self.doc().insert_before(parent, live, new_index);
            }
        }

        // Pass 3: remove nodes whose key vanished, located by their live
        // key.
        for old_child in old_children {
            let Some(key) = old_child.key() else { continue };
            if new_keys.contains_key(key) {
                continue;
            }
            if let Some(live) = self.doc().find_child_by_key(parent, key) {
                self.doc().remove_child(parent, &live);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuidom_core::live::{node_id, Document};
    use tuidom_core::vnode::el;
    use tuidom_types::NodeId;

    fn keyed_list(keys: &[&str]) -> VNode {
        el("ul")
            .children(keys.iter().map(|k| el("li").key(*k).child(k.to_string())))
            .into()
    }

    fn child_ids(doc: &Document, list: &NodeHandle) -> Vec<NodeId> {
        doc.children(list).iter().map(node_id).collect()
    }

    #[test]
    fn reorder_preserves_every_node_identity() {
        let doc = Document::new();
        let mut renderer = Renderer::new(doc.clone());
        let target = doc.create_element("root");

        renderer.render(&keyed_list(&["a", "b", "c"]), &target);
        let list = doc.child_at(&target, 0).unwrap();
        let before = child_ids(&doc, &list);

        renderer.render(&keyed_list(&["c", "a", "b"]), &target);
        let after = child_ids(&doc, &list);

        assert_eq!(after, vec![before[2], before[0], before[1]]);
        assert_eq!(doc.text_content(&list), "cab");
    }

    #[test]
    fn middle_insert_lands_between_existing_nodes() {
        let doc = Document::new();
        let mut renderer = Renderer::new(doc.clone());
        let target = doc.create_element("root");

        renderer.render(&keyed_list(&["a", "c"]), &target);
        let list = doc.child_at(&target, 0).unwrap();
        let before = child_ids(&doc, &list);

        renderer.render(&keyed_list(&["a", "b", "c"]), &target);
        let after = child_ids(&doc, &list);

        assert_eq!(after.len(), 3);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[1]);
        assert_eq!(doc.text_content(&list), "abc");
    }

    #[test]
    fn vanished_key_removes_exactly_that_node() {
        let doc = Document::new();
        let mut renderer = Renderer::new(doc.clone());
        let target = doc.create_element("root");

        renderer.render(&keyed_list(&["a", "b", "c"]), &target);
        let list = doc.child_at(&target, 0).unwrap();
        let before = child_ids(&doc, &list);

        renderer.render(&keyed_list(&["a", "c"]), &target);
        let after = child_ids(&doc, &list);

        assert_eq!(after, vec![before[0], before[2]]);
        assert_eq!(doc.text_content(&list), "ac");
    }

    #[test]
    fn removal_finds_node_even_when_data_id_diverges_from_key() {
        let doc = Document::new();
        let mut renderer = Renderer::new(doc.clone());
        let target = doc.create_element("root");

        // data-id deliberately disagrees with the key.
        let list_of = |keys: &[&str]| -> VNode {
            el("ul")
                .children(keys.iter().map(|k| {
                    el("li")
                        .key(*k)
                        .attr("data-id", format!("other-{k}"))
                        .child(k.to_string())
                }))
                .into()
        };

        renderer.render(&list_of(&["a", "b"]), &target);
        let list = doc.child_at(&target, 0).unwrap();

        renderer.render(&list_of(&["a"]), &target);
        assert_eq!(doc.child_count(&list), 1);
        assert_eq!(doc.text_content(&list), "a");
    }

    #[test]
    fn surviving_nodes_are_patched_not_remounted() {
        let doc = Document::new();
        let mut renderer = Renderer::new(doc.clone());
        let target = doc.create_element("root");

        let list_of = |label: &str| -> VNode {
            el("ul")
                .child(el("li").key("a").attr("class", label.to_string()).child("a"))
                .into()
        };

        renderer.render(&list_of("old"), &target);
        let list = doc.child_at(&target, 0).unwrap();
        let item = doc.child_at(&list, 0).unwrap();

        renderer.render(&list_of("new"), &target);
        let patched = doc.child_at(&list, 0).unwrap();
        assert_eq!(node_id(&item), node_id(&patched));
        assert_eq!(doc.attribute(&patched, "class").as_deref(), Some("new"));
    }
}
