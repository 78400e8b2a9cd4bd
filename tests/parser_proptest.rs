//! Property tests: the parser must accept arbitrary input without panicking,
//! account for every input byte, and invert the escape helper.

use bbtree::render::to_markup;
use bbtree::{escape, parse, Node, ParseError, ParseOptions};
use proptest::prelude::*;

/// Strings biased towards bracket soup: fragments of tag tokens, backslashes,
/// and plain text glued together.
fn markup_soup() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("[b]".to_string()),
        Just("[/b]".to_string()),
        Just("[/]".to_string()),
        Just("[*]".to_string()),
        Just("[/*]".to_string()),
        Just("[list]".to_string()),
        Just("[/list]".to_string()),
        Just("[no-parse]".to_string()),
        Just("[url=x]".to_string()),
        Just("[".to_string()),
        Just("]".to_string()),
        Just("\\".to_string()),
        Just("\\[".to_string()),
        "[a-z ]{0,6}",
    ];
    prop::collection::vec(fragment, 0..24).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn prop_parse_never_panics(input in ".*") {
        match parse(&input, &ParseOptions::default()) {
            Ok(_) | Err(ParseError::DepthExceeded { .. }) => {}
        }
    }

    #[test]
    fn prop_markup_soup_never_panics(input in markup_soup()) {
        match parse(&input, &ParseOptions::default()) {
            Ok(_) | Err(ParseError::DepthExceeded { .. }) => {}
        }
    }

    #[test]
    fn prop_positions_cover_input(input in markup_soup()) {
        if let Ok(nodes) = parse(&input, &ParseOptions::default()) {
            if let (Some(first), Some(last)) = (nodes.first(), nodes.last()) {
                prop_assert_eq!(first.position().start, 0);
                prop_assert_eq!(last.position().end, input.len());
            }
            for pair in nodes.windows(2) {
                prop_assert_eq!(pair[0].position().end, pair[1].position().start);
            }
        }
    }

    #[test]
    fn prop_escape_then_parse_is_identity(input in ".*") {
        let nodes = parse(&escape(&input), &ParseOptions::default())
            .expect("escaped text cannot nest");
        prop_assert!(nodes.iter().all(Node::is_text));
        let display: String = nodes
            .iter()
            .filter_map(Node::as_text)
            .map(|text| text.display_text())
            .collect();
        prop_assert_eq!(display, input);
    }

    #[test]
    fn prop_markup_serialization_is_fixed_point(input in markup_soup()) {
        if let Ok(first) = parse(&input, &ParseOptions::default()) {
            let once = to_markup(&first);
            let reparsed = parse(&once, &ParseOptions::default())
                .expect("serialized markup stays within depth");
            prop_assert_eq!(once, to_markup(&reparsed));
        }
    }
}
