//! Case-preserving HTML template parser.
//!
//! Angular templates are case sensitive (`_nameInput`, `[(ngModel)]`,
//! `app-Header`), so names are kept exactly as written. Problems are collected
//! as [`Diagnostic`]s and reported together rather than stopping at the first.

use std::fmt;

use crate::tags::{
    has_optional_end_tag, is_implicitly_closed_by, is_raw_text_tag, is_void_tag,
};

/// A 1-based position in the template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An element attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute name as written
    pub name: String,

    /// Value without quotes, `None` for valueless attributes
    pub value: Option<String>,

    pub location: Location,
}

/// A markup element and its content.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name as written
    pub name: String,

    pub attrs: Vec<Attribute>,

    pub children: Vec<Node>,

    /// Position of the opening `<`
    pub location: Location,
}

impl Element {
    /// Look up an attribute by exact name.
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|a| a.name == name)
    }

    /// Iterate over direct child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }
}

/// A node in the markup tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }
}

/// A parsed template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    /// Iterate over top-level elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.nodes.iter().filter_map(Node::as_element)
    }
}

/// A single markup problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub location: Location,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.location)
    }
}

/// The template could not be parsed. Always carries at least one diagnostic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} markup error(s) in template", .diagnostics.len())]
pub struct MarkupError {
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse template markup into a [`Document`].
pub fn parse_markup(source: &str) -> Result<Document, MarkupError> {
    MarkupParser::new(source).run()
}

struct MarkupParser<'s> {
    source: &'s str,
    pos: usize,
    line_starts: Vec<usize>,
    /// Open elements, innermost last
    stack: Vec<Element>,
    roots: Vec<Node>,
    diagnostics: Vec<Diagnostic>,
}

impl<'s> MarkupParser<'s> {
    fn new(source: &'s str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Self {
            source,
            pos: 0,
            line_starts,
            stack: Vec::new(),
            roots: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Document, MarkupError> {
        while self.pos < self.source.len() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.parse_comment();
            } else if rest.starts_with("<![CDATA[") {
                self.skip_past("]]>", "Unterminated CDATA section");
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.skip_past(">", "Unterminated declaration");
            } else if rest.starts_with("</") {
                self.parse_end_tag();
            } else if self.is_start_tag(self.pos) {
                self.parse_start_tag();
            } else {
                self.parse_text();
            }
        }

        self.finish()
    }

    fn finish(mut self) -> Result<Document, MarkupError> {
        // Elements still open at end of input are closed implicitly.
        while !self.stack.is_empty() {
            self.pop_element();
        }

        if self.diagnostics.is_empty() {
            Ok(Document { nodes: self.roots })
        } else {
            self.diagnostics.sort_by_key(|d| d.location);
            Err(MarkupError {
                diagnostics: self.diagnostics,
            })
        }
    }

    fn rest(&self) -> &'s str {
        &self.source[self.pos..]
    }

    fn location(&self, offset: usize) -> Location {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let column = self.source[self.line_starts[line]..offset].chars().count() + 1;
        Location {
            line: line + 1,
            column,
        }
    }

    fn error(&mut self, offset: usize, message: impl Into<String>) {
        let location = self.location(offset);
        self.diagnostics.push(Diagnostic {
            message: message.into(),
            location,
        });
    }

    fn push_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn pop_element(&mut self) {
        if let Some(element) = self.stack.pop() {
            self.push_node(Node::Element(element));
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'s str {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn skip_past(&mut self, terminator: &str, message: &str) {
        match self.rest().find(terminator) {
            Some(end) => self.pos += end + terminator.len(),
            None => {
                self.error(self.pos, message);
                self.pos = self.source.len();
            }
        }
    }

    fn is_start_tag(&self, offset: usize) -> bool {
        let bytes = self.source.as_bytes();
        bytes[offset] == b'<' && bytes.get(offset + 1).is_some_and(u8::is_ascii_alphabetic)
    }

    fn parse_comment(&mut self) {
        let start = self.pos;
        match self.source[start + 4..].find("-->") {
            Some(end) => {
                let text = &self.source[start + 4..start + 4 + end];
                self.push_node(Node::Comment(text.to_string()));
                self.pos = start + 4 + end + 3;
            }
            None => {
                self.error(start, "Unterminated comment");
                self.pos = self.source.len();
            }
        }
    }

    fn parse_text(&mut self) {
        let start = self.pos;
        let bytes = self.source.as_bytes();
        let mut i = start;

        while i < bytes.len() {
            // Interpolations may contain `<` and `>` in expressions.
            if bytes[i..].starts_with(b"{{") {
                i = match self.source[i + 2..].find("}}") {
                    Some(end) => i + 2 + end + 2,
                    None => bytes.len(),
                };
                continue;
            }
            if i > start
                && bytes[i] == b'<'
                && (self.is_start_tag(i) || matches!(bytes.get(i + 1).copied(), Some(b'/' | b'!' | b'?')))
            {
                break;
            }
            i += 1;
        }

        self.pos = i;
        self.push_node(Node::Text(self.source[start..i].to_string()));
    }

    fn parse_start_tag(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let name = self.take_while(|c| !c.is_whitespace() && !matches!(c, '/' | '>' | '<'));

        let mut element = Element {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
            location: self.location(start),
        };
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            let rest = self.rest();

            if rest.is_empty() {
                self.error(
                    start,
                    format!("Unexpected end of input inside tag <{}>", element.name),
                );
                return;
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                self_closing = true;
                break;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }
            if rest.starts_with('<') {
                self.error(
                    self.pos,
                    format!("Unexpected character \"<\" inside tag <{}>", element.name),
                );
                break;
            }
            if let Some(attr) = self.parse_attribute() {
                element.attrs.push(attr);
            }
        }

        while self
            .stack
            .last()
            .is_some_and(|open| is_implicitly_closed_by(&open.name, &element.name))
        {
            self.pop_element();
        }

        if self_closing || is_void_tag(&element.name) {
            self.push_node(Node::Element(element));
        } else if is_raw_text_tag(&element.name) {
            self.parse_raw_text(element);
        } else {
            self.stack.push(element);
        }
    }

    fn parse_attribute(&mut self) -> Option<Attribute> {
        let start = self.pos;
        let name = self.take_while(|c| {
            !c.is_whitespace() && !matches!(c, '=' | '>' | '<' | '/' | '"' | '\'')
        });

        if name.is_empty() {
            let c = self.rest().chars().next()?;
            self.pos += c.len_utf8();
            self.error(start, format!("Unexpected character \"{c}\" in attribute name"));
            return None;
        }

        let location = self.location(start);
        let after_name = self.pos;
        self.skip_whitespace();
        if !self.rest().starts_with('=') {
            self.pos = after_name;
            return Some(Attribute {
                name: name.to_string(),
                value: None,
                location,
            });
        }

        self.pos += 1;
        self.skip_whitespace();
        let value = match self.rest().chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let value_start = self.pos + 1;
                match self.source[value_start..].find(quote) {
                    Some(end) => {
                        self.pos = value_start + end + 1;
                        self.source[value_start..value_start + end].to_string()
                    }
                    None => {
                        self.error(start, format!("Unterminated value for attribute \"{name}\""));
                        self.pos = self.source.len();
                        self.source[value_start..].to_string()
                    }
                }
            }
            _ => self
                .take_while(|c| {
                    !c.is_whitespace() && !matches!(c, '>' | '/' | '<' | '=' | '"' | '\'' | '`')
                })
                .to_string(),
        };

        Some(Attribute {
            name: name.to_string(),
            value: Some(value),
            location,
        })
    }

    fn parse_raw_text(&mut self, mut element: Element) {
        let close = format!("</{}", element.name.to_ascii_lowercase());
        let rest = self.rest();

        match rest.to_ascii_lowercase().find(&close) {
            Some(end) => {
                if end > 0 {
                    element.children.push(Node::Text(rest[..end].to_string()));
                }
                self.pos += end;
                self.skip_past(">", "Unterminated end tag");
            }
            None => {
                if !rest.is_empty() {
                    element.children.push(Node::Text(rest.to_string()));
                }
                self.pos = self.source.len();
            }
        }

        self.push_node(Node::Element(element));
    }

    fn parse_end_tag(&mut self) {
        let start = self.pos;
        self.pos += 2;
        let name = self
            .take_while(|c| !c.is_whitespace() && !matches!(c, '>' | '<'))
            .to_string();
        self.skip_whitespace();

        if self.rest().starts_with('>') {
            self.pos += 1;
        } else {
            self.error(start, format!("Unterminated end tag </{name}>"));
        }

        if name.is_empty() {
            self.error(start, "End tag without a name");
            return;
        }
        if is_void_tag(&name) {
            self.error(start, format!("Void elements do not have end tags \"{name}\""));
            return;
        }

        let open = self
            .stack
            .iter()
            .rposition(|e| e.name.eq_ignore_ascii_case(&name));
        match open {
            Some(index)
                if self.stack[index + 1..]
                    .iter()
                    .all(|e| has_optional_end_tag(&e.name)) =>
            {
                while self.stack.len() > index {
                    self.pop_element();
                }
            }
            _ => self.error(
                start,
                format!(
                    "Unexpected closing tag \"{name}\". It may happen when the tag has already been closed by another tag"
                ),
            ),
        }
    }
}
