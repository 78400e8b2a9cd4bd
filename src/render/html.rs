//! HTML generation.
//!
//! Dispatches per tag on `tag_normalized`; tags without a special case (and
//! the filtering-only `no-parse`) render as their content with no wrapper.
//! Option values are validated here, not in the parser: an unusable URL,
//! color, font, or size falls back to a safe default instead of failing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{Node, TagNode};
use crate::render::text::to_text;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?|file|c):(?:/{1,3}|\\{1})[-a-zA-Z0-9:;,@#%&()~_?+=/\\.]*$")
        .expect("url pattern")
});

static COLOR_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:aliceblue|antiquewhite|aqua|aquamarine|azure|beige|bisque|black|blanchedalmond|blue|blueviolet|brown|burlywood|cadetblue|chartreuse|chocolate|coral|cornflowerblue|cornsilk|crimson|cyan|darkblue|darkcyan|darkgoldenrod|darkgray|darkgreen|darkkhaki|darkmagenta|darkolivegreen|darkorange|darkorchid|darkred|darksalmon|darkseagreen|darkslateblue|darkslategray|darkturquoise|darkviolet|deeppink|deepskyblue|dimgray|dodgerblue|firebrick|floralwhite|forestgreen|fuchsia|gainsboro|ghostwhite|gold|goldenrod|gray|green|greenyellow|honeydew|hotpink|indianred|indigo|ivory|khaki|lavender|lavenderblush|lawngreen|lemonchiffon|lightblue|lightcoral|lightcyan|lightgoldenrodyellow|lightgray|lightgreen|lightpink|lightsalmon|lightseagreen|lightskyblue|lightslategray|lightsteelblue|lightyellow|lime|limegreen|linen|magenta|maroon|mediumaquamarine|mediumblue|mediumorchid|mediumpurple|mediumseagreen|mediumslateblue|mediumspringgreen|mediumturquoise|mediumvioletred|midnightblue|mintcream|mistyrose|moccasin|navajowhite|navy|oldlace|olive|olivedrab|orange|orangered|orchid|palegoldenrod|palegreen|paleturquoise|palevioletred|papayawhip|peachpuff|peru|pink|plum|powderblue|purple|red|rosybrown|royalblue|saddlebrown|salmon|sandybrown|seagreen|seashell|sienna|silver|skyblue|slateblue|slategray|snow|springgreen|steelblue|tan|teal|thistle|tomato|turquoise|violet|wheat|white|whitesmoke|yellow|yellowgreen)$")
        .expect("color name pattern")
});

static COLOR_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?([a-fA-F0-9]{6}|[a-fA-F0-9]{8})$").expect("color code pattern"));

static FONT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^([a-z][a-z0-9_]+|"[a-z][a-z0-9_\s]+")(, ?[a-z0-9\-]+)*$"#)
        .expect("font pattern")
});

const SIZE_STEPS: [&str; 9] = [
    "50%", "70%", "80%", "90%", "100%", "120%", "140%", "160%", "180%",
];

fn escape_text(text: &str) -> String {
    html_escape::encode_text(text).replace('\n', "<br>")
}

fn escape_attribute(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

fn class_span(class: &str) -> String {
    format!("<span class=\"xbbcode-tag xbbcode-tag-{class}\">")
}

fn resolve_color(options: Option<&str>) -> String {
    let options = options.unwrap_or("black");
    let color = if COLOR_NAME.is_match(options) {
        options.to_string()
    } else if COLOR_CODE.is_match(options) {
        if options.starts_with('#') {
            options.to_string()
        } else {
            format!("#{options}")
        }
    } else {
        "black".to_string()
    };
    color.to_ascii_lowercase()
}

fn resolve_font(options: Option<&str>) -> String {
    let font = options.unwrap_or("inherit");
    if FONT_PATTERN.is_match(font) {
        font.replace('"', "'")
    } else {
        "inherit".to_string()
    }
}

fn resolve_size(options: Option<&str>) -> String {
    let options = options.unwrap_or("");
    if ["px", "vp", "em", "rem", "%"]
        .iter()
        .any(|unit| options.ends_with(unit))
        && !options.is_empty()
    {
        return options.replace('"', "");
    }
    let step = options.parse::<usize>().unwrap_or(5).max(1) - 1;
    SIZE_STEPS[step.min(SIZE_STEPS.len() - 1)].to_string()
}

fn resolve_url(tag: &TagNode) -> String {
    let target = match tag.options.as_deref() {
        Some(options) => options.to_string(),
        None => to_text(&tag.content),
    };
    if URL_PATTERN.is_match(&target) {
        target
    } else {
        "#".to_string()
    }
}

/// How a tag contributes to the output stream.
enum Emit {
    /// Opening markup now, closing markup after the children.
    Wrap(String),
    /// A complete fragment; children are not rendered separately.
    Atom(String),
    /// No markup of its own; children render in place.
    Transparent,
}

fn enter_markup(tag: &TagNode) -> Emit {
    match tag.tag_normalized.as_str() {
        "b" | "bold" | "strong" => Emit::Wrap(class_span("bold")),
        "i" | "italic" => Emit::Wrap(class_span("italic")),
        "u" | "underlined" => Emit::Wrap(class_span("underlined")),
        "s" | "strikethrough" => Emit::Wrap(class_span("strikethrough")),
        "c" | "center" => Emit::Wrap(class_span("center")),
        "r" | "right" => Emit::Wrap(class_span("right")),
        "l" | "left" => Emit::Wrap(class_span("left")),
        "code" | "icode" | "i-code" => {
            let class = if tag.tag_normalized == "code" {
                "xbbcode-tag-code"
            } else {
                "xbbcode-tag-inline-code"
            };
            let code_type = escape_attribute(tag.options.as_deref().unwrap_or(""));
            Emit::Wrap(format!(
                "<code class=\"xbbcode-tag {class}\" x-code-type=\"{code_type}\">"
            ))
        }
        "color" => Emit::Wrap(format!(
            "<span class=\"xbbcode-tag xbbcode-tag-color\" style=\"color: {}\">",
            resolve_color(tag.options.as_deref())
        )),
        "bg-color" | "bgcolor" => Emit::Wrap(format!(
            "<div class=\"xbbcode-tag xbbcode-tag-bgcolor\" style=\"background: {}\">",
            resolve_color(tag.options.as_deref())
        )),
        "face" | "font" => Emit::Wrap(format!(
            "<span style=\"font-family:{};\">",
            resolve_font(tag.options.as_deref())
        )),
        "size" => Emit::Wrap(format!(
            "<span class=\"xbbcode-tag xbbcode-tag-size\" style=\"font-size: {}\">",
            resolve_size(tag.options.as_deref())
        )),
        "url" => Emit::Wrap(format!(
            "<a class=\"xbbcode-tag xbbcode-tag-url\" href=\"{}\" target=\"_blank\">",
            escape_attribute(&resolve_url(tag))
        )),
        "img" => {
            let title = to_text(&tag.content);
            Emit::Atom(format!(
                "<img class=\"xbbcode-tag xbbcode-tag-img\" src=\"{}\" title=\"{}\"/>",
                escape_attribute(&resolve_url(tag)),
                escape_attribute(&title)
            ))
        }
        "sub" => Emit::Wrap("<sub>".to_string()),
        "sup" => Emit::Wrap("<sup>".to_string()),
        "hr" => Emit::Atom("<hr>".to_string()),
        "br" => Emit::Atom("<br>".to_string()),
        "list" | "unordered-list" | "ulist" => {
            Emit::Wrap("<ul class=\"xbbcode-tag xbbcode-tag-list\">".to_string())
        }
        "ordered-list" | "olist" => {
            Emit::Wrap("<ol class=\"xbbcode-tag xbbcode-tag-list\">".to_string())
        }
        "*" => Emit::Wrap("<li>".to_string()),
        _ => Emit::Transparent,
    }
}

fn exit_markup(tag: &TagNode) -> &'static str {
    match tag.tag_normalized.as_str() {
        "b" | "bold" | "strong" | "i" | "italic" | "u" | "underlined" | "s" | "strikethrough"
        | "c" | "center" | "r" | "right" | "l" | "left" | "color" | "face" | "font" | "size" => {
            "</span>"
        }
        "bg-color" | "bgcolor" => "</div>",
        "code" | "icode" | "i-code" => "</code>",
        "url" => "</a>",
        "sub" => "</sub>",
        "sup" => "</sup>",
        "list" | "unordered-list" | "ulist" => "</ul>",
        "ordered-list" | "olist" => "</ol>",
        "*" => "</li>",
        _ => "",
    }
}

enum Step<'a> {
    Enter(&'a Node),
    Exit(&'a TagNode),
}

/// Renders the tree as an HTML fragment.
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    let mut work: Vec<Step> = nodes.iter().rev().map(Step::Enter).collect();
    while let Some(step) = work.pop() {
        match step {
            Step::Enter(Node::Text(text)) => out.push_str(&escape_text(&text.display_text())),
            Step::Enter(Node::Tag(tag)) => match enter_markup(tag) {
                Emit::Atom(fragment) => out.push_str(&fragment),
                Emit::Wrap(open) => {
                    out.push_str(&open);
                    work.push(Step::Exit(tag));
                    for child in tag.content.iter().rev() {
                        work.push(Step::Enter(child));
                    }
                }
                Emit::Transparent => {
                    for child in tag.content.iter().rev() {
                        work.push(Step::Enter(child));
                    }
                }
            },
            Step::Exit(tag) => out.push_str(exit_markup(tag)),
        }
    }
    out
}
