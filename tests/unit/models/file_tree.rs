use super::*;

fn sample_tree() -> Vec<Node> {
    vec![Node::folder(
        "root",
        "workspace",
        vec![
            Node::folder(
                "src",
                "src",
                vec![
                    Node::file("main.rs", "main.rs", "fn main() {}"),
                    Node::folder(
                        "nested",
                        "nested",
                        vec![Node::file("deep.rs", "deep.rs", "// deep")],
                    ),
                ],
            ),
            Node::file("README.md", "README.md", "# readme"),
        ],
    )]
}

fn id(value: &str) -> NodeId {
    NodeId::from(value)
}

#[test]
fn test_find_is_preorder_and_reaches_any_depth() {
    let tree = sample_tree();
    assert_eq!(find(&tree, &id("deep.rs")).map(|n| n.name.as_str()), Some("deep.rs"));
    assert_eq!(find(&tree, &id("root")).map(Node::kind), Some(NodeKind::Folder));
    assert!(find(&tree, &id("missing")).is_none());
}

#[test]
fn test_find_returns_first_match_for_duplicate_ids() {
    let tree = vec![
        Node::folder("a", "a", vec![Node::file("dup", "inner", "")]),
        Node::file("dup", "outer", ""),
    ];
    assert_eq!(find(&tree, &id("dup")).map(|n| n.name.as_str()), Some("inner"));
}

#[test]
fn test_mutations_with_missing_id_return_equal_tree() {
    let tree = sample_tree();
    let missing = id("missing");

    assert_eq!(rename(&tree, &missing, "x"), tree);
    assert_eq!(delete(&tree, &missing), tree);
    assert_eq!(update_content(&tree, &missing, "x"), tree);
    assert_eq!(insert_child(&tree, &missing, Node::file("n", "n", "")), tree);
}

#[test]
fn test_insert_child_appends_and_opens_parent() {
    let tree = sample_tree();
    let next = insert_child(&tree, &id("src"), Node::file("lib.rs", "lib.rs", ""));

    let src = find(&next, &id("src")).unwrap();
    assert!(src.is_open());
    let names: Vec<&str> = src.children().unwrap().iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["main.rs", "nested", "lib.rs"]);

    // 原树不变
    assert!(find(&tree, &id("lib.rs")).is_none());
    assert!(!find(&tree, &id("src")).unwrap().is_open());
}

#[test]
fn test_insert_child_under_file_is_noop() {
    let tree = sample_tree();
    let next = insert_child(&tree, &id("main.rs"), Node::file("x", "x", ""));
    assert_eq!(next, tree);
}

#[test]
fn test_rename_keeps_id_content_and_language() {
    let tree = sample_tree();
    let next = rename(&tree, &id("main.rs"), "lib.ts");
    let node = find(&next, &id("main.rs")).unwrap();
    assert_eq!(node.name, "lib.ts");
    assert_eq!(node.content(), Some("fn main() {}"));
    assert_eq!(node.language(), Some("rust"));
}

#[test]
fn test_rename_allows_duplicate_sibling_names() {
    let tree = sample_tree();
    let next = rename(&tree, &id("README.md"), "src");
    let root = find(&next, &id("root")).unwrap();
    let names: Vec<&str> = root.children().unwrap().iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["src", "src"]);
}

#[test]
fn test_delete_cascades_to_descendants() {
    let tree = sample_tree();
    let removed = collect_subtree_ids(find(&tree, &id("src")).unwrap());
    assert_eq!(removed.len(), 4);

    let next = delete(&tree, &id("src"));
    for gone in &removed {
        assert!(find(&next, gone).is_none(), "{gone} should be gone");
    }
    assert!(find(&next, &id("README.md")).is_some());
    assert_eq!(count_nodes(&next), 2);
}

#[test]
fn test_delete_top_level_node() {
    let tree = sample_tree();
    assert!(delete(&tree, &id("root")).is_empty());
}

#[test]
fn test_update_content_ignores_folders() {
    let tree = sample_tree();
    assert_eq!(update_content(&tree, &id("src"), "text"), tree);

    let next = update_content(&tree, &id("deep.rs"), "fn deep() {}");
    assert_eq!(find(&next, &id("deep.rs")).unwrap().content(), Some("fn deep() {}"));
}

#[test]
fn test_language_for_name() {
    assert_eq!(language_for_name("token.sol"), "sol");
    assert_eq!(language_for_name("main.rs"), "rust");
    assert_eq!(language_for_name("index.ts"), "typescript");
    assert_eq!(language_for_name("app.js"), "javascript");
    assert_eq!(language_for_name("Makefile"), "plaintext");
}

#[test]
fn test_create_assigns_kind_specific_body() {
    let file = Node::create(NodeKind::File, "main.rs");
    assert!(file.id.as_str().starts_with("main.rs-"));
    assert_eq!(file.content(), Some(""));
    assert!(file.children().is_none());

    let folder = Node::create(NodeKind::Folder, "src");
    assert!(folder.content().is_none());
    assert_eq!(folder.children().map(<[Node]>::len), Some(0));
    assert!(folder.language().is_none());
}

#[test]
fn test_files_lists_only_files_in_preorder() {
    let tree = sample_tree();
    let names: Vec<&str> = files(&tree).iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["main.rs", "deep.rs", "README.md"]);
    assert_eq!(find_file_by_name(&tree, "deep.rs").map(|n| n.id.as_str()), Some("deep.rs"));
    assert!(find_file_by_name(&tree, "src").is_none());
}

#[test]
fn test_node_json_shape() {
    let tree = vec![Node::folder("root", "ws", vec![Node::file("a", "a.rs", "x")])];
    let value = serde_json::to_value(&tree).unwrap();
    assert_eq!(value[0]["type"], "folder");
    assert_eq!(value[0]["isOpen"], false);
    assert_eq!(value[0]["children"][0]["type"], "file");
    assert_eq!(value[0]["children"][0]["language"], "rust");
    assert!(value[0].get("content").is_none());

    let back: Vec<Node> = serde_json::from_value(value).unwrap();
    assert_eq!(back, tree);
}

#[test]
fn test_snapshot_equality_is_structural() {
    let a = Snapshot::new(sample_tree());
    let b = Snapshot::new(sample_tree());
    assert_eq!(a, b);
    assert!(!Snapshot::ptr_eq(&a, &b));
    assert!(Snapshot::ptr_eq(&a, &a.clone()));
}
