//! Identifier derivation shared by the tree builder, resolver and discovery.

/// Suffix appended to every generated or inferred page object class name.
pub const CLASS_SUFFIX: &str = "Object";

/// Capitalize first letter of a string.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Convert `snake_case` and `kebab-case` names to camelCase.
///
/// A leading delimiter is dropped without capitalizing the next character,
/// so `_name` becomes `name` rather than `Name`.
pub fn convert_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut upper_next = false;

    for (i, c) in name.chars().enumerate() {
        if c == '_' || c == '-' {
            upper_next = i != 0;
            continue;
        }
        if upper_next {
            result.extend(c.to_uppercase());
            upper_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Build a class name from a chain of prop names: `["list", "main"]` -> `ListMainObject`.
pub fn class_name_for<S: AsRef<str>>(name_path: &[S]) -> String {
    let mut name: String = name_path.iter().map(|p| capitalize(p.as_ref())).collect();
    name.push_str(CLASS_SUFFIX);
    name
}

/// Class name of the page object generated for a component with the given base name.
pub fn component_class_name(component_name: &str) -> String {
    class_name_for(&[convert_name(component_name)])
}
