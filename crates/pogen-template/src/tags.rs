//! Static HTML tag tables.

/// Standard HTML element names. Anything else is treated as a component tag.
pub const STANDARD_TAGS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col",
    "colgroup", "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt",
    "em", "embed", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4",
    "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input", "ins",
    "kbd", "label", "legend", "li", "link", "main", "map", "mark", "math", "menu", "menuitem",
    "meta", "meter", "nav", "noscript", "object", "ol", "optgroup", "option", "output", "p",
    "param", "picture", "pre", "progress", "q", "rb", "rp", "rt", "rtc", "ruby", "s", "samp",
    "script", "search", "section", "select", "slot", "small", "source", "span", "strong",
    "style", "sub", "summary", "sup", "svg", "table", "tbody", "td", "template", "textarea",
    "tfoot", "th", "thead", "time", "title", "tr", "track", "u", "ul", "var", "video", "wbr",
];

/// Elements that never have content or an end tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_TAGS: &[&str] = &["script", "style", "textarea", "title"];

/// Elements whose end tag may be omitted.
const OPTIONAL_END_TAGS: &[&str] = &[
    "li", "dt", "dd", "p", "option", "optgroup", "tr", "td", "th", "thead", "tbody", "tfoot",
    "rt", "rp",
];

/// Block-level elements that implicitly close an open `<p>`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "dialog", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hgroup", "hr", "main", "menu", "nav", "ol", "p", "pre", "section", "table", "ul",
];

pub fn is_standard_tag(name: &str) -> bool {
    STANDARD_TAGS.contains(&name)
}

pub fn is_void_tag(name: &str) -> bool {
    VOID_TAGS.iter().any(|t| t.eq_ignore_ascii_case(name))
}

pub fn is_raw_text_tag(name: &str) -> bool {
    RAW_TEXT_TAGS.iter().any(|t| t.eq_ignore_ascii_case(name))
}

pub fn has_optional_end_tag(name: &str) -> bool {
    OPTIONAL_END_TAGS.iter().any(|t| t.eq_ignore_ascii_case(name))
}

/// Whether opening `next` while `open` is the innermost element ends `open`.
pub fn is_implicitly_closed_by(open: &str, next: &str) -> bool {
    let open = open.to_ascii_lowercase();
    let next = next.to_ascii_lowercase();
    match open.as_str() {
        "li" => next == "li",
        "dt" | "dd" => next == "dt" || next == "dd",
        "option" => next == "option" || next == "optgroup",
        "optgroup" => next == "optgroup",
        "tr" => next == "tr" || next == "tbody" || next == "tfoot",
        "td" | "th" => next == "td" || next == "th" || next == "tr",
        "thead" | "tbody" => next == "tbody" || next == "tfoot",
        "rt" | "rp" => next == "rt" || next == "rp",
        "p" => CLOSES_PARAGRAPH.contains(&next.as_str()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_standard_tags() {
        assert!(is_standard_tag("input"));
        assert!(is_standard_tag("main"));
        assert!(!is_standard_tag("app-header"));
        assert!(!is_standard_tag("ng-container"));
    }

    #[test]
    fn paragraph_closed_by_block_elements() {
        assert!(is_implicitly_closed_by("p", "div"));
        assert!(!is_implicitly_closed_by("p", "span"));
        assert!(is_implicitly_closed_by("li", "li"));
        assert!(!is_implicitly_closed_by("div", "div"));
    }
}
