//! Component registry for cross-file page object imports.
//!
//! Scans a source directory for component templates and maps each generated
//! class name to the component that produces it, so accessors referring to
//! another component's page object can import it from the right module.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pogen_template::component_class_name;
use walkdir::WalkDir;

const TEMPLATE_EXTENSION: &str = "html";
const COMPONENT_SUFFIX: &str = ".component";

/// A discovered component template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentInfo {
    /// Base name, e.g. `todo-item` for `todo-item.component.html`
    pub name: String,

    /// Class name of the page object generated for it
    pub class_name: String,

    /// Directory segments relative to the source root
    pub path_items: Vec<String>,

    /// Template file path
    pub path: PathBuf,
}

impl ComponentInfo {
    pub fn new(name: impl Into<String>, path_items: Vec<String>, path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        Self {
            class_name: component_class_name(&name),
            name,
            path_items,
            path: path.into(),
        }
    }
}

/// Discovered components, in discovery order, indexed by class name.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: Vec<ComponentInfo>,
    by_class: HashMap<String, usize>,
}

impl ComponentRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_components(components: impl IntoIterator<Item = ComponentInfo>) -> Self {
        let mut registry = Self::new();
        for component in components {
            registry.insert(component);
        }
        registry
    }

    /// Register a component. A later component with the same class name
    /// replaces the lookup entry of the earlier one.
    pub fn insert(&mut self, component: ComponentInfo) {
        let index = self.components.len();
        if let Some(previous) = self.by_class.insert(component.class_name.clone(), index) {
            tracing::warn!(
                class = %component.class_name,
                previous = %self.components[previous].path.display(),
                current = %component.path.display(),
                "duplicate component class name"
            );
        }
        self.components.push(component);
    }

    /// Scan a directory for component templates and populate the registry.
    pub fn scan(&mut self, source_dir: &Path) -> Result<usize, RegistryError> {
        if !source_dir.is_dir() {
            return Err(RegistryError::DirectoryNotFound(
                source_dir.display().to_string(),
            ));
        }

        let mut count = 0;

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| RegistryError::Walk(e.to_string()))?;
            let path = entry.path();

            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION)
            {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let name = stem.strip_suffix(COMPONENT_SUFFIX).unwrap_or(stem);

            let path_items: Vec<String> = path
                .parent()
                .and_then(|p| p.strip_prefix(source_dir).ok())
                .map(|rel| {
                    rel.components()
                        .map(|c| c.as_os_str().to_string_lossy().into_owned())
                        .collect()
                })
                .unwrap_or_default();

            self.insert(ComponentInfo::new(name, path_items, path));
            count += 1;
        }

        tracing::debug!(dir = %source_dir.display(), count, "scanned component templates");

        Ok(count)
    }

    /// Look up a component by the class name of its page object.
    pub fn get(&self, class_name: &str) -> Option<&ComponentInfo> {
        self.by_class.get(class_name).map(|&i| &self.components[i])
    }

    /// All components in discovery order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentInfo> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Errors that can occur with the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Source directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Failed to scan source directory: {0}")]
    Walk(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn scans_templates_in_sorted_order() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("special/footer")).unwrap();
        fs::write(root.join("todo-list.component.html"), "<div></div>").unwrap();
        fs::write(root.join("app.component.html"), "<div></div>").unwrap();
        fs::write(root.join("special/footer/special-footer.html"), "").unwrap();
        fs::write(root.join("app.component.ts"), "export class App {}").unwrap();

        let mut registry = ComponentRegistry::new();
        let count = registry.scan(root).unwrap();

        assert_eq!(count, 3);
        let names: Vec<_> = registry.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["app", "special-footer", "todo-list"]);

        let footer = registry.get("SpecialFooterObject").unwrap();
        assert_eq!(footer.path_items, vec!["special", "footer"]);
        assert_eq!(footer.path, root.join("special/footer/special-footer.html"));

        let list = registry.get("TodoListObject").unwrap();
        assert!(list.path_items.is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = tempdir().unwrap();
        let mut registry = ComponentRegistry::new();

        let result = registry.scan(&temp.path().join("nope"));

        assert!(matches!(result, Err(RegistryError::DirectoryNotFound(_))));
    }

    #[test]
    fn later_duplicates_win_lookup() {
        let registry = ComponentRegistry::from_components([
            ComponentInfo::new("header", vec!["a".to_string()], "a/header.html"),
            ComponentInfo::new("header", vec!["b".to_string()], "b/header.html"),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("HeaderObject").unwrap().path_items, vec!["b"]);
        assert!(registry.get("FooterObject").is_none());
    }
}
