//! Decides which page object class each template node instantiates.
//!
//! Rules are tried in order and the first match wins:
//!
//! 1. an option naming a builtin kind (`text-input`, `button`, ...)
//! 2. an explicit `class=Name` option
//! 3. a component tag (non-standard tag, or a bare `class` option)
//! 4. a leaf element, inferred from its tag and `type` attribute
//! 5. otherwise the node's own nested class

use pogen_template::{capitalize, class_name_for, convert_name, is_standard_tag, NodeInfo, CLASS_SUFFIX};

/// Base class of every generated page object.
pub const BASE_CLASS: &str = "PageObject";

const CLASS_OPTION: &str = "class";
const CLASS_ASSIGN_PREFIX: &str = "class=";

/// Interaction primitives exported by the page object library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    Text,
    TextInput,
    TextArea,
    Button,
    Checkbox,
    RadioButton,
    Dropdown,
}

impl BuiltinKind {
    /// Parse a marker option naming a builtin kind.
    pub fn from_alias(alias: &str) -> Option<Self> {
        match alias {
            "text" => Some(Self::Text),
            "text-input" => Some(Self::TextInput),
            "text-area" => Some(Self::TextArea),
            "button" => Some(Self::Button),
            "checkbox" => Some(Self::Checkbox),
            "radio-button" => Some(Self::RadioButton),
            "dropdown" | "select" => Some(Self::Dropdown),
            _ => None,
        }
    }

    /// Class exported by the library for this kind.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Text => "TextObject",
            Self::TextInput => "TextInputObject",
            Self::TextArea => "TextAreaObject",
            Self::Button => "ButtonObject",
            Self::Checkbox => "CheckboxObject",
            Self::RadioButton => "RadioButtonObject",
            Self::Dropdown => "DropdownObject",
        }
    }

    /// Infer the kind of a childless standard element.
    fn for_leaf(tag: &str, type_attr: Option<&str>) -> Self {
        match (tag, type_attr) {
            ("input", Some("checkbox")) => Self::Checkbox,
            ("input", Some("radio")) => Self::RadioButton,
            ("input", _) => Self::TextInput,
            ("button", _) => Self::Button,
            ("textarea", _) => Self::TextArea,
            ("select", _) => Self::Dropdown,
            _ => Self::Text,
        }
    }
}

/// Where a target class comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Exported by the page object library
    Builtin,
    /// Written elsewhere: another generated file or hand-written code
    External,
    /// Generated in the same file as a nested class
    New,
}

/// The class a node's accessor instantiates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub class_name: String,
    pub origin: Origin,
}

impl Target {
    fn builtin(kind: BuiltinKind) -> Self {
        Self {
            class_name: kind.class_name().to_string(),
            origin: Origin::Builtin,
        }
    }

    fn external(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            origin: Origin::External,
        }
    }
}

type Rule = fn(&NodeInfo<'_>, &str) -> Option<Target>;

const RULES: [Rule; 4] = [explicit_builtin, explicit_class, component_tag, leaf_element];

/// Resolves template nodes to target classes.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    /// Component tag prefix stripped when inferring class names (e.g. `app-`)
    selector_prefix: String,
}

impl Resolver {
    pub fn new(selector_prefix: impl Into<String>) -> Self {
        Self {
            selector_prefix: selector_prefix.into(),
        }
    }

    pub fn resolve(&self, node: &NodeInfo<'_>) -> Target {
        RULES
            .iter()
            .find_map(|rule| rule(node, &self.selector_prefix))
            .unwrap_or_else(|| nested_class(node))
    }
}

fn explicit_builtin(node: &NodeInfo<'_>, _prefix: &str) -> Option<Target> {
    node.options
        .iter()
        .find_map(|o| BuiltinKind::from_alias(o))
        .map(Target::builtin)
}

fn explicit_class(node: &NodeInfo<'_>, _prefix: &str) -> Option<Target> {
    node.options
        .iter()
        .filter_map(|o| o.strip_prefix(CLASS_ASSIGN_PREFIX))
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(Target::external)
}

fn component_tag(node: &NodeInfo<'_>, prefix: &str) -> Option<Target> {
    if is_standard_tag(&node.node_type) && !node.has_option(CLASS_OPTION) {
        return None;
    }
    let tag = node.node_type.strip_prefix(prefix).unwrap_or(&node.node_type);
    Some(Target::external(format!(
        "{}{}",
        capitalize(&convert_name(tag)),
        CLASS_SUFFIX
    )))
}

fn leaf_element(node: &NodeInfo<'_>, _prefix: &str) -> Option<Target> {
    if node.has_children() {
        return None;
    }
    Some(Target::builtin(BuiltinKind::for_leaf(
        &node.node_type,
        node.type_attr.as_deref(),
    )))
}

fn nested_class(node: &NodeInfo<'_>) -> Target {
    Target {
        class_name: node
            .class_name
            .clone()
            .unwrap_or_else(|| class_name_for(&node.name_path)),
        origin: Origin::New,
    }
}
