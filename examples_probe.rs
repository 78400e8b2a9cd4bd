use bbtree::{parse, ParseOptions, Node};
fn depth_of(s: &str) -> (bool, i32) {
    match parse(s, &ParseOptions::default()) {
        Ok(nodes) => {
            let mut current = &nodes;
            let mut depth = 0;
            while let Some(tag) = current.first().and_then(Node::as_tag) {
                depth += 1;
                current = &tag.content;
            }
            (true, depth)
        }
        Err(_) => (false, -1),
    }
}
fn main() {
    for n in [2, 3, 4, 127, 128, 129] {
        let s = "[b]".repeat(n);
        println!("n={} -> {:?}", n, depth_of(&s));
    }
}
