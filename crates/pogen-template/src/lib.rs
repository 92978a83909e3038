//! Angular template parsing for page object generation.
//!
//! This crate parses component templates into a tree of addressable nodes:
//! elements carrying a marker attribute (`_name` by default) together with the
//! selector path that locates each one relative to its addressable parent.

pub mod markup;
pub mod naming;
pub mod tags;
pub mod tree;

pub use markup::{parse_markup, Attribute, Diagnostic, Document, Element, Location, MarkupError, Node};
pub use naming::{capitalize, class_name_for, component_class_name, convert_name, CLASS_SUFFIX};
pub use tags::is_standard_tag;
pub use tree::{NodeInfo, ParserOptions, TemplateParser, SELECTOR_SEPARATOR};
