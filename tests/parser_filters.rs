//! Integration tests for tag filtering: whitelists, blacklists, overrides,
//! root-scope seeds, and the exempt-tag escape hatch.

use std::sync::Arc;

use bbtree::{parse, BlacklistEntry, Node, ParseOptions, TagDefinition, TagRegistry};

fn parse_default(input: &str) -> Vec<Node> {
    parse(input, &ParseOptions::default()).expect("parse should succeed")
}

#[test]
fn test_no_parse_suppresses_nested_tags() {
    let nodes = parse_default("[no-parse][b]x[/b][/no-parse]");
    assert_eq!(nodes.len(), 1);

    let no_parse = nodes[0].as_tag().unwrap();
    assert_eq!(no_parse.tag_normalized, "no-parse");
    assert!(no_parse.properly_closed);

    assert_eq!(no_parse.content.len(), 1);
    assert_eq!(no_parse.content[0].as_text().unwrap().raw_text, "[b]x[/b]");
}

#[test]
fn test_code_suppresses_nested_tags() {
    let nodes = parse_default("[code][i]x[/i][/code]");
    let code = nodes[0].as_tag().unwrap();
    assert!(code.properly_closed);
    assert_eq!(code.content[0].as_text().unwrap().raw_text, "[i]x[/i]");
}

#[test]
fn test_no_parse_opens_inside_code_via_exemption() {
    // code declares an empty whitelist, but no-parse ignores filters.
    let nodes = parse_default("[code][no-parse]x[/no-parse][/code]");
    let code = nodes[0].as_tag().unwrap();
    let inner = code.content[0].as_tag().unwrap();
    assert_eq!(inner.tag_normalized, "no-parse");
}

#[test]
fn test_enforcement_disables_exemption() {
    let options = ParseOptions {
        enforce_filter_on_exempt_tags: true,
        ..Default::default()
    };
    let nodes = parse("[code][no-parse]x[/no-parse][/code]", &options).unwrap();
    let code = nodes[0].as_tag().unwrap();
    assert_eq!(code.content.len(), 1);
    assert_eq!(
        code.content[0].as_text().unwrap().raw_text,
        "[no-parse]x[/no-parse]"
    );
}

#[test]
fn test_root_blacklist_seed() {
    let options = ParseOptions {
        tag_blacklist: vec!["img".to_string()],
        ..Default::default()
    };
    let nodes = parse("[img]x[/img][b]y[/b]", &options).unwrap();
    assert_eq!(nodes[0].as_text().unwrap().raw_text, "[img]x[/img]");
    assert_eq!(nodes[1].as_tag().unwrap().tag_normalized, "b");
}

#[test]
fn test_root_whitelist_seed() {
    let options = ParseOptions {
        tag_whitelist: Some(vec!["b".to_string(), "i".to_string()]),
        ..Default::default()
    };
    let nodes = parse("[b]x[/b][u]y[/u]", &options).unwrap();
    assert!(nodes[0].is_tag());
    assert_eq!(nodes[1].as_text().unwrap().raw_text, "[u]y[/u]");
}

#[test]
fn test_blacklist_override_reenables_tag() {
    let mut registry = TagRegistry::with_parent(TagRegistry::standard());
    registry.register(
        TagDefinition::new("quote")
            .with_blacklist(vec![BlacklistEntry::new("img").overridden_by(&["url"])]),
    );
    let options = ParseOptions {
        registry: Some(Arc::new(registry)),
        ..Default::default()
    };

    // Directly inside quote, img is banned.
    let nodes = parse("[quote][img]x[/img][/quote]", &options).unwrap();
    let quote = nodes[0].as_tag().unwrap();
    assert!(quote.content[0].is_text());

    // Under an open url, the ban is overridden.
    let nodes = parse(
        "[quote][url=https://example.com][img]x[/img][/url][/quote]",
        &options,
    )
    .unwrap();
    let quote = nodes[0].as_tag().unwrap();
    let url = quote.content[0].as_tag().unwrap();
    assert_eq!(url.content[0].as_tag().unwrap().tag_normalized, "img");
}

#[test]
fn test_filtered_close_of_top_still_works() {
    // Inside no-parse every tag is filtered, yet its own close must pass.
    let nodes = parse_default("[no-parse]x[/no-parse]y");
    assert!(nodes[0].is_tag());
    assert_eq!(nodes[1].as_text().unwrap().raw_text, "y");
}

#[test]
fn test_universal_close_passes_filter_for_top() {
    let nodes = parse_default("[no-parse]x[/]y");
    let no_parse = nodes[0].as_tag().unwrap();
    assert!(no_parse.properly_closed);
    assert_eq!(nodes[1].as_text().unwrap().raw_text, "y");
}

#[test]
fn test_close_of_non_top_tag_is_filtered_inside_whitelist() {
    // [/b] inside no-parse is not a close of the top tag and stays literal.
    let nodes = parse_default("[b][no-parse][/b][/no-parse][/b]");
    let b = nodes[0].as_tag().unwrap();
    assert!(b.properly_closed);
    let no_parse = b.content[0].as_tag().unwrap();
    assert_eq!(no_parse.content[0].as_text().unwrap().raw_text, "[/b]");
}
