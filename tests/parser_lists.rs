//! Integration tests for list containers and the `*` item shorthand:
//! implicit closes, explicit `[/*]`, nested lists, and stray items.

use bbtree::{parse, Node, ParseOptions, TagNode};
use rstest::rstest;

fn parse_default(input: &str) -> Vec<Node> {
    parse(input, &ParseOptions::default()).expect("parse should succeed")
}

fn item_texts(list: &TagNode) -> Vec<String> {
    list.content
        .iter()
        .filter_map(Node::as_tag)
        .filter(|tag| tag.tag_normalized == "*")
        .map(|item| {
            item.content
                .iter()
                .filter_map(Node::as_text)
                .map(|text| text.display_text())
                .collect::<String>()
        })
        .collect()
}

#[test]
fn test_items_split_implicitly() {
    let nodes = parse_default("[list][*]A[*]B[/list]");
    assert_eq!(nodes.len(), 1);

    let list = nodes[0].as_tag().unwrap();
    assert_eq!(list.tag_normalized, "list");
    assert!(list.properly_closed);
    assert_eq!(item_texts(list), vec!["A", "B"]);

    // The first item was closed implicitly when the second began.
    let first = list.content[0].as_tag().unwrap();
    assert!(first.properly_closed);
    let second = list.content[1].as_tag().unwrap();
    assert!(!second.properly_closed);
}

#[test]
fn test_explicit_item_close() {
    let nodes = parse_default("[list][*]A[/*][*]B[/*][/list]");
    let list = nodes[0].as_tag().unwrap();
    assert_eq!(item_texts(list), vec!["A", "B"]);
    assert!(list
        .content
        .iter()
        .filter_map(Node::as_tag)
        .all(|item| item.properly_closed));
}

#[rstest]
#[case("list")]
#[case("ordered-list")]
#[case("olist")]
#[case("unordered-list")]
#[case("ulist")]
fn test_all_container_synonyms(#[case] container: &str) {
    let input = format!("[{container}][*]A[/{container}]");
    let nodes = parse_default(&input);
    let list = nodes[0].as_tag().unwrap();
    assert!(list.properly_closed);
    assert_eq!(item_texts(list), vec!["A"]);
}

#[test]
fn test_item_cuts_open_formatting() {
    // The unclosed [b] stays inside the first item; the new item starts
    // clean at container level.
    let nodes = parse_default("[list][*]A[b]x[*]B[/list]");
    let list = nodes[0].as_tag().unwrap();
    assert_eq!(list.content.len(), 2);

    let first = list.content[0].as_tag().unwrap();
    assert!(first.properly_closed);
    let bold = first.content[1].as_tag().unwrap();
    assert_eq!(bold.tag_normalized, "b");
    assert!(!bold.properly_closed);
    assert_eq!(bold.content[0].as_text().unwrap().raw_text, "x");

    let second = list.content[1].as_tag().unwrap();
    assert_eq!(second.content[0].as_text().unwrap().raw_text, "B");
}

#[test]
fn test_stray_item_degrades() {
    let nodes = parse_default("a[*]b");
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].as_text().unwrap().raw_text, "a[*]b");
}

#[test]
fn test_stray_item_inside_non_list_tag_degrades() {
    let nodes = parse_default("[b][*]x[/b]");
    let b = nodes[0].as_tag().unwrap();
    assert_eq!(b.content.len(), 1);
    assert_eq!(b.content[0].as_text().unwrap().raw_text, "[*]x");
}

#[test]
fn test_nested_list() {
    let nodes = parse_default("[list][*]A[list][*]inner[/list][*]B[/list]");
    let outer = nodes[0].as_tag().unwrap();
    assert_eq!(outer.content.len(), 2);

    let first = outer.content[0].as_tag().unwrap();
    let inner = first
        .content
        .iter()
        .filter_map(Node::as_tag)
        .find(|tag| tag.tag_normalized == "list")
        .unwrap();
    assert!(inner.properly_closed);
    assert_eq!(item_texts(inner), vec!["inner"]);

    let second = outer.content[1].as_tag().unwrap();
    assert_eq!(second.content[0].as_text().unwrap().raw_text, "B");
}

#[test]
fn test_double_item_close_in_inner_list_stays_inner() {
    // The second [/*] reaches the inner list container while searching and
    // must degrade instead of closing the outer item.
    let nodes = parse_default("[list][*]A[list][*]x[/*][/*][/list][/list]");
    let outer = nodes[0].as_tag().unwrap();
    assert!(outer.properly_closed);

    let item = outer.content[0].as_tag().unwrap();
    let inner = item
        .content
        .iter()
        .filter_map(Node::as_tag)
        .find(|tag| tag.tag_normalized == "list")
        .unwrap();
    // The stray close token survives as literal text inside the inner list.
    assert!(inner
        .content
        .iter()
        .filter_map(Node::as_text)
        .any(|text| text.raw_text == "[/*]"));
}

#[test]
fn test_container_close_ends_open_item() {
    let nodes = parse_default("[list][*]A[/list]");
    let list = nodes[0].as_tag().unwrap();
    assert!(list.properly_closed);

    let item = list.content[0].as_tag().unwrap();
    // Popped by the container close, not by an item rule.
    assert!(!item.properly_closed);
    assert_eq!(item.content[0].as_text().unwrap().raw_text, "A");
}
