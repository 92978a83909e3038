//! Page object code generator.
//!
//! Renders one TypeScript module per template: the import block followed by
//! one class per node with children, root first. When a previously generated
//! module is supplied its imports and custom class code are carried over.

use std::fmt;
use std::str::FromStr;

use pogen_template::NodeInfo;

use crate::merge::TypeScriptAnalyzer;
use crate::paths::{module_specifier, relative_path};
use crate::registry::ComponentRegistry;
use crate::resolver::{Origin, Resolver, BASE_CLASS};
use crate::traits::{MergeContext, MergeError, SourceAnalyzer};

/// Module that exports [`BASE_CLASS`] and the builtin page objects.
pub const DEFAULT_LIBRARY: &str = "puppeteer-page-objects";

/// Line ending used in generated files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Unix,
    Win,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unix => "\n",
            Self::Win => "\r\n",
        }
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unix" => Ok(Self::Unix),
            "win" => Ok(Self::Win),
            other => Err(format!("unknown line ending '{other}', expected 'unix' or 'win'")),
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unix => "unix",
            Self::Win => "win",
        })
    }
}

/// Options for code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub eol: LineEnding,

    /// Component tag prefix stripped when inferring class names
    pub selector_prefix: String,

    /// Module imported for [`BASE_CLASS`] and builtin page objects
    pub lib: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            eol: LineEnding::default(),
            selector_prefix: String::new(),
            lib: DEFAULT_LIBRARY.to_string(),
        }
    }
}

/// Errors that can occur while generating a page object.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// Class names referenced by accessors, in first-occurrence order.
#[derive(Debug, Default, PartialEq, Eq)]
struct UsedClasses {
    builtins: Vec<String>,
    externals: Vec<String>,
}

impl UsedClasses {
    fn add(list: &mut Vec<String>, name: &str) {
        if !list.iter().any(|n| n == name) {
            list.push(name.to_string());
        }
    }
}

/// Generates page object modules from template trees.
pub struct CodeGenerator {
    options: GeneratorOptions,
    resolver: Resolver,
    analyzer: Box<dyn SourceAnalyzer>,
}

impl CodeGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self::with_analyzer(options, Box::new(TypeScriptAnalyzer::new()))
    }

    pub fn with_analyzer(options: GeneratorOptions, analyzer: Box<dyn SourceAnalyzer>) -> Self {
        Self {
            resolver: Resolver::new(options.selector_prefix.clone()),
            options,
            analyzer,
        }
    }

    /// Generate the module for `root`.
    ///
    /// `path_items` is the directory of the generated module relative to the
    /// output root; imports of other components are computed from it.
    /// `prior` is the current content of the module, if any. A prior module
    /// that cannot be analyzed fails generation.
    pub fn generate(
        &self,
        prior: Option<&str>,
        root: &NodeInfo<'_>,
        path_items: &[String],
        registry: &ComponentRegistry,
    ) -> Result<String, GenerateError> {
        let context = match prior {
            Some(source) => {
                tracing::debug!(analyzer = self.analyzer.name(), "merging with existing page object");
                self.analyzer.analyze(source)?
            }
            None => MergeContext::default(),
        };

        Ok(self.render(&context, root, path_items, registry))
    }

    /// Render the module for `root` on top of an already analyzed prior module.
    pub fn render(
        &self,
        context: &MergeContext,
        root: &NodeInfo<'_>,
        path_items: &[String],
        registry: &ComponentRegistry,
    ) -> String {
        let eol = self.options.eol.as_str();
        let classes = root.class_nodes();
        let declared: Vec<&str> = classes.iter().filter_map(|n| n.class_name.as_deref()).collect();
        let used = self.used_classes(root);
        let mut out = String::new();

        for import in &context.imported_code {
            out.push_str(import);
            out.push_str(eol);
        }

        let lib_names: Vec<&str> = used
            .builtins
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(BASE_CLASS))
            .filter(|name| !context.imported_symbols.contains(*name))
            .collect();
        if !lib_names.is_empty() {
            out.push_str(&format!(
                "import {{ {} }} from '{}';{eol}",
                lib_names.join(", "),
                self.options.lib
            ));
        }

        for name in &used.externals {
            if context.imported_symbols.contains(name) || declared.contains(&name.as_str()) {
                continue;
            }
            let Some(component) = registry.get(name) else {
                tracing::debug!(class = %name, "no generated page object found, import left to the user");
                continue;
            };
            let dir = relative_path(path_items, &component.path_items);
            out.push_str(&format!(
                "import {{ {name} }} from '{}';{eol}",
                module_specifier(&dir, &component.name)
            ));
        }

        for node in classes {
            self.write_class(&mut out, node, context);
        }

        out
    }

    fn used_classes(&self, root: &NodeInfo<'_>) -> UsedClasses {
        let mut used = UsedClasses::default();
        for node in root.descendants() {
            let target = self.resolver.resolve(node);
            match target.origin {
                Origin::Builtin => UsedClasses::add(&mut used.builtins, &target.class_name),
                Origin::External => UsedClasses::add(&mut used.externals, &target.class_name),
                Origin::New => {}
            }
        }
        used
    }

    fn write_class(&self, out: &mut String, node: &NodeInfo<'_>, context: &MergeContext) {
        let eol = self.options.eol.as_str();
        let Some(class_name) = node.class_name.as_deref() else {
            return;
        };

        out.push_str(eol);
        out.push_str(&format!("export class {class_name} extends {BASE_CLASS} {{{eol}"));

        for child in &node.children {
            let target = self.resolver.resolve(child);
            let method = if child.is_list() { "createList" } else { "createChild" };
            out.push_str(&format!(
                "  get {}() {{ return this.{method}({}, '{}'); }}{eol}",
                child.accessor_name(),
                target.class_name,
                child.selector_string()
            ));
        }

        match context.keep_code.get(class_name) {
            Some(kept) => out.push_str(kept),
            None => out.push('}'),
        }
        out.push_str(eol);
    }
}
