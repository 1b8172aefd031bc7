use super::*;
use std::io::Read;
use zip_next::ZipArchive;

fn tree() -> Vec<Node> {
    vec![Node::folder(
        "root",
        "demo",
        vec![
            Node::folder(
                "src",
                "src",
                vec![Node::file("main", "main.rs", "fn main() {}")],
            ),
            Node::folder("empty", "empty", Vec::new()),
            Node::file("readme", "README.md", "# demo"),
        ],
    )]
}

#[test]
fn test_export_entry_names() {
    let bytes = export_workspace(&tree()).unwrap();
    let mut zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut names: Vec<String> = (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "demo/",
            "demo/README.md",
            "demo/empty/",
            "demo/src/",
            "demo/src/main.rs",
        ]
    );
}

#[test]
fn test_export_preserves_content() {
    let bytes = export_workspace(&tree()).unwrap();
    let mut zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = zip.by_name("demo/src/main.rs").unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    assert_eq!(content, "fn main() {}");
}

#[test]
fn test_export_empty_tree_is_valid_archive() {
    let bytes = export_workspace(&[]).unwrap();
    let zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(zip.len(), 0);
}

#[test]
fn test_archive_file_name() {
    assert_eq!(archive_file_name("default_workspace"), "default_workspace.zip");
}

#[test]
fn test_export_renames_duplicate_siblings() {
    let tree = vec![Node::folder(
        "root",
        "ws",
        vec![
            Node::file("a1", "a.rs", "one"),
            Node::file("a2", "a.rs", "two"),
            Node::folder("d1", "lib", vec![Node::file("x1", "x", "first")]),
            Node::folder("d2", "lib", vec![Node::file("x2", "x", "second")]),
        ],
    )];
    let bytes = export_workspace(&tree).unwrap();
    let mut zip = ZipArchive::new(Cursor::new(bytes)).unwrap();

    let read = |zip: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str| {
        let mut content = String::new();
        zip.by_name(name).unwrap().read_to_string(&mut content).unwrap();
        content
    };
    assert_eq!(read(&mut zip, "ws/a.rs"), "one");
    assert_eq!(read(&mut zip, "ws/a (2).rs"), "two");
    assert_eq!(read(&mut zip, "ws/lib/x"), "first");
    assert_eq!(read(&mut zip, "ws/lib (2)/x"), "second");
    assert_eq!(zip.len(), 7);
}
