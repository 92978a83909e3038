//! Relative module paths between generated files.

/// Module suffix of generated page object files, without the extension.
pub const MODULE_SUFFIX: &str = ".po";

/// File name of the page object generated for component `name`.
pub fn output_file_name(name: &str) -> String {
    format!("{name}{MODULE_SUFFIX}.ts")
}

/// Module specifier of component `name` inside directory `dir`.
pub fn module_specifier(dir: &str, name: &str) -> String {
    format!("{dir}/{name}{MODULE_SUFFIX}")
}

/// Path from directory `from` to directory `to`, both given as segments
/// relative to the same root.
///
/// The result always starts with `.` or `..` so it can be used as an ES
/// module specifier.
pub fn relative_path<S: AsRef<str>>(from: &[S], to: &[S]) -> String {
    let common = from
        .iter()
        .zip(to)
        .take_while(|(a, b)| a.as_ref() == b.as_ref())
        .count();

    let mut segments: Vec<&str> = if common == from.len() {
        vec!["."]
    } else {
        vec![".."; from.len() - common]
    };
    segments.extend(to[common..].iter().map(AsRef::as_ref));

    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: [&str; 0] = [];

    #[test]
    fn descends_from_root() {
        assert_eq!(relative_path(&EMPTY, &["special", "footer"]), "./special/footer");
    }

    #[test]
    fn climbs_to_sibling() {
        assert_eq!(relative_path(&["a", "b"], &["a", "c"]), "../c");
        assert_eq!(relative_path(&["a", "b", "c"], &["d"]), "../../../d");
    }

    #[test]
    fn same_directory_is_dot() {
        assert_eq!(relative_path(&["a"], &["a"]), ".");
        assert_eq!(relative_path(&EMPTY, &EMPTY), ".");
    }

    #[test]
    fn climbs_to_ancestor() {
        assert_eq!(relative_path(&["a", "b"], &["a"]), "..");
    }

    #[test]
    fn builds_module_specifiers() {
        assert_eq!(module_specifier(".", "header"), "./header.po");
        assert_eq!(module_specifier("../shared", "todo-item"), "../shared/todo-item.po");
        assert_eq!(output_file_name("custom"), "custom.po.ts");
    }
}
