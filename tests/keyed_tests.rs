//! Keyed reconciliation through the workspace facade.

use tuidom::core::{el, node_id, Document, NodeHandle, VNode};
use tuidom::render::Renderer;
use tuidom::types::NodeId;

fn keyed_list(keys: &[&str]) -> VNode {
    el("ul")
        .children(
            keys.iter()
                .map(|k| el("li").key(*k).child(format!("row {k}"))),
        )
        .into()
}

fn setup() -> (Document, Renderer, NodeHandle) {
    let doc = Document::new();
    let root = doc.create_element("div");
    let renderer = Renderer::new(doc.clone());
    (doc, renderer, root)
}

fn ids_by_key(doc: &Document, ul: &NodeHandle) -> Vec<(String, NodeId)> {
    doc.children(ul)
        .iter()
        .map(|c| (doc.key_of(c).unwrap_or_default(), node_id(c)))
        .collect()
}

#[test]
fn reorder_moves_nodes_without_remounting() {
    let (doc, mut renderer, root) = setup();
    renderer.render(&keyed_list(&["a", "b", "c"]), &root);
    let ul = doc.child_at(&root, 0).unwrap();
    let before = ids_by_key(&doc, &ul);

    renderer.render(&keyed_list(&["c", "a", "b"]), &root);
    let after = ids_by_key(&doc, &ul);

    let order: Vec<&str> = after.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(order, vec!["c", "a", "b"]);
    // Same live nodes, new positions.
    for (key, id) in &after {
        let old = before.iter().find(|(k, _)| k == key).unwrap();
        assert_eq!(*id, old.1, "node for key {key} was remounted");
    }
}

#[test]
fn insertion_in_the_middle_keeps_neighbors_alive() {
    let (doc, mut renderer, root) = setup();
    renderer.render(&keyed_list(&["a", "c"]), &root);
    let ul = doc.child_at(&root, 0).unwrap();
    let before = ids_by_key(&doc, &ul);

    renderer.render(&keyed_list(&["a", "b", "c"]), &root);
    let after = ids_by_key(&doc, &ul);

    assert_eq!(after.len(), 3);
    assert_eq!(after[1].0, "b");
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[1]);
}

#[test]
fn vanished_keys_are_removed() {
    let (doc, mut renderer, root) = setup();
    renderer.render(&keyed_list(&["a", "b", "c"]), &root);
    let ul = doc.child_at(&root, 0).unwrap();

    renderer.render(&keyed_list(&["a", "c"]), &root);
    let order: Vec<String> = ids_by_key(&doc, &ul).into_iter().map(|(k, _)| k).collect();
    assert_eq!(order, vec!["a", "c"]);
}

#[test]
fn removal_follows_the_key_even_when_data_id_differs() {
    let (doc, mut renderer, root) = setup();
    let row = |key: &str, data_id: &str| {
        el("li")
            .key(key)
            .attr("data-id", data_id.to_string())
            .child(format!("row {key}"))
    };

    renderer.render(
        &el("ul")
            .child(row("a", "7"))
            .child(row("b", "a"))
            .into(),
        &root,
    );
    let ul = doc.child_at(&root, 0).unwrap();

    // Drop the first row. Its data-id points elsewhere; the node is still
    // located by its key, so the survivor must be "b".
    renderer.render(&el("ul").child(row("b", "a")).into(), &root);
    let survivors = ids_by_key(&doc, &ul);
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].0, "b");
}

#[test]
fn surviving_rows_are_patched_in_place() {
    let (doc, mut renderer, root) = setup();
    renderer.render(
        &el("ul")
            .child(el("li").key("a").attr("class", "idle").child("row a"))
            .into(),
        &root,
    );
    let ul = doc.child_at(&root, 0).unwrap();
    let id = node_id(&doc.child_at(&ul, 0).unwrap());

    renderer.render(
        &el("ul")
            .child(el("li").key("a").attr("class", "active").child("row a"))
            .into(),
        &root,
    );
    let li = doc.child_at(&ul, 0).unwrap();
    assert_eq!(node_id(&li), id);
    assert_eq!(doc.attribute(&li, "class").as_deref(), Some("active"));
}
