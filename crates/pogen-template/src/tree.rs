//! Template tree builder.
//!
//! Walks a parsed [`Document`] and keeps only the elements marked with the
//! configured attribute prefix. Each marked element becomes a [`NodeInfo`]
//! whose selector path is relative to its nearest marked ancestor.

use crate::markup::{parse_markup, Attribute, Document, Element, MarkupError};
use crate::naming::{class_name_for, convert_name};

/// Grouping tag that is always looked through.
pub const CONTAINER_TAG: &str = "ng-container";

/// Tag name given to the template root.
pub const ROOT_NODE_TYPE: &str = "body";

/// Separator between selector path segments.
pub const SELECTOR_SEPARATOR: &str = " > ";

/// Marker name suffix that requests a list accessor.
const LIST_SUFFIX: &str = "_list";

/// Marker name (after the prefix) that makes an element transparent.
const IGNORE_MARKER: &str = "_ignore";

const IGNORE_OPTION: &str = "ignore";
const LIST_OPTION: &str = "list";

/// Leading segment of a nested scope; renders as a leading child combinator.
const SCOPE_ANCHOR: &str = "";

/// Options for building template trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Prefix of the marker attribute, e.g. `_` in `_nameInput`
    pub attribute_prefix: String,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            attribute_prefix: "_".to_string(),
        }
    }
}

/// One addressable template node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo<'a> {
    /// Accessor identifier derived from the marker
    pub prop_name: String,

    /// Generated class name, present iff the node has children (always on the root)
    pub class_name: Option<String>,

    /// Tag name
    pub node_type: String,

    /// Value of the `type` attribute
    pub type_attr: Option<String>,

    /// Prop names from the root down to this node
    pub name_path: Vec<String>,

    /// Raw marker attribute name, `None` on the root
    pub selector: Option<String>,

    /// Selector segments from the nearest addressable ancestor
    pub selector_path: Vec<String>,

    /// Comma-separated modifiers from the marker value
    pub options: Vec<String>,

    pub children: Vec<NodeInfo<'a>>,

    /// Source element, `None` on the root
    pub node: Option<&'a Element>,
}

impl<'a> NodeInfo<'a> {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Whether this node is accessed as a list of elements.
    pub fn is_list(&self) -> bool {
        self.selector
            .as_deref()
            .is_some_and(|s| s.ends_with(LIST_SUFFIX))
            || self.has_option(LIST_OPTION)
    }

    /// Name of the accessor generated for this node in its parent class.
    pub fn accessor_name(&self) -> String {
        if self.is_list() {
            format!("{}List", self.prop_name)
        } else {
            self.prop_name.clone()
        }
    }

    /// Selector relative to the parent page object.
    pub fn selector_string(&self) -> String {
        self.selector_path
            .join(SELECTOR_SEPARATOR)
            .trim()
            .to_string()
    }

    /// All descendants in pre-order, excluding `self`.
    pub fn descendants(&self) -> Vec<&NodeInfo<'a>> {
        let mut out = Vec::new();
        for child in &self.children {
            child.collect_pre_order(&mut out);
        }
        out
    }

    /// `self` and all nodes below it that have children, in pre-order.
    pub fn class_nodes(&self) -> Vec<&NodeInfo<'a>> {
        let mut out = Vec::new();
        self.collect_pre_order(&mut out);
        out.retain(|n| n.class_name.is_some());
        out
    }

    fn collect_pre_order<'n>(&'n self, out: &mut Vec<&'n NodeInfo<'a>>) {
        out.push(self);
        for child in &self.children {
            child.collect_pre_order(out);
        }
    }
}

/// Builds [`NodeInfo`] trees from template markup.
#[derive(Debug, Clone, Default)]
pub struct TemplateParser {
    options: ParserOptions,
}

impl TemplateParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parse markup text. The returned document is borrowed by [`Self::build_tree`].
    pub fn parse_document(&self, template_text: &str) -> Result<Document, MarkupError> {
        parse_markup(template_text)
    }

    /// Build the node tree for a template named `template_name`.
    pub fn build_tree<'a>(&self, template_name: &str, document: &'a Document) -> NodeInfo<'a> {
        let prop_name = convert_name(template_name);
        let name_path = vec![prop_name.clone()];
        let mut root = NodeInfo {
            prop_name,
            class_name: Some(class_name_for(&name_path)),
            node_type: ROOT_NODE_TYPE.to_string(),
            type_attr: None,
            name_path,
            selector: None,
            selector_path: Vec::new(),
            options: Vec::new(),
            children: Vec::new(),
            node: None,
        };

        self.collect_children(&mut root, document.elements(), &[]);

        tracing::debug!(
            template = template_name,
            nodes = root.descendants().len(),
            "built template tree"
        );

        root
    }

    fn collect_children<'a>(
        &self,
        parent: &mut NodeInfo<'a>,
        elements: impl Iterator<Item = &'a Element>,
        path: &[String],
    ) {
        let prefix = self.options.attribute_prefix.as_str();

        for element in elements {
            let marker = element.attrs.iter().find(|a| a.name.starts_with(prefix));

            if element.name == CONTAINER_TAG || marker.is_some_and(|m| self.is_ignore_marker(m)) {
                self.collect_children(parent, element.child_elements(), path);
                continue;
            }

            match marker {
                Some(marker) => {
                    let child = self.addressable_node(parent, element, marker, path);
                    parent.children.push(child);
                }
                None => {
                    let mut nested = path.to_vec();
                    nested.push(element.name.clone());
                    self.collect_children(parent, element.child_elements(), &nested);
                }
            }
        }
    }

    fn addressable_node<'a>(
        &self,
        parent: &NodeInfo<'a>,
        element: &'a Element,
        marker: &Attribute,
        path: &[String],
    ) -> NodeInfo<'a> {
        let raw = &marker.name[self.options.attribute_prefix.len()..];
        let prop_name = convert_name(raw.strip_suffix(LIST_SUFFIX).unwrap_or(raw));

        let mut name_path = parent.name_path.clone();
        name_path.push(prop_name.clone());

        let mut selector_path = path.to_vec();
        selector_path.push(format!("{}[{}]", element.name, marker.name));

        let mut info = NodeInfo {
            prop_name,
            class_name: None,
            node_type: element.name.clone(),
            type_attr: element.attr("type").and_then(|a| a.value.clone()),
            name_path,
            selector: Some(marker.name.clone()),
            selector_path,
            options: parse_options(marker.value.as_deref()),
            children: Vec::new(),
            node: Some(element),
        };

        self.collect_children(&mut info, element.child_elements(), &[SCOPE_ANCHOR.to_string()]);

        if info.has_children() {
            info.class_name = Some(class_name_for(&info.name_path));
        }

        info
    }

    fn is_ignore_marker(&self, marker: &Attribute) -> bool {
        let ignore_name = format!("{}{}", self.options.attribute_prefix, IGNORE_MARKER);
        marker.name == ignore_name
            || parse_options(marker.value.as_deref())
                .iter()
                .any(|o| o == IGNORE_OPTION)
    }
}

/// Split a marker value into trimmed, non-empty option tokens.
fn parse_options(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
