//! Generates every fixture template and compares against the expected module.

use std::fs;
use std::path::PathBuf;

use pogen_codegen::{CodeGenerator, ComponentInfo, ComponentRegistry, GeneratorOptions};
use pogen_template::TemplateParser;
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> Option<String> {
    fs::read_to_string(fixture(name)).ok()
}

fn run_case(case: &str, registry: &ComponentRegistry) {
    let markup = read_fixture(&format!("{case}.html")).unwrap();
    let expected = read_fixture(&format!("{case}.output.ts")).unwrap();
    let prior = read_fixture(&format!("{case}.input.ts"));

    let parser = TemplateParser::default();
    let doc = parser.parse_document(&markup).unwrap();
    let root = parser.build_tree(case, &doc);

    let generator = CodeGenerator::new(GeneratorOptions {
        lib: "puppeteer-objects".to_string(),
        ..Default::default()
    });
    let actual = generator
        .generate(prior.as_deref(), &root, &[], registry)
        .unwrap();

    assert_eq!(actual, expected, "fixture {case}");

    // The generated module must regenerate to itself.
    let again = generator
        .generate(Some(&actual), &root, &[], registry)
        .unwrap();
    assert_eq!(again, actual, "fixture {case} regenerated");
}

#[test]
fn basic() {
    run_case("basic", &ComponentRegistry::new());
}

#[test]
fn basic_explicit() {
    run_case("basic-explicit", &ComponentRegistry::new());
}

#[test]
fn list() {
    run_case("list", &ComponentRegistry::new());
}

#[test]
fn custom() {
    run_case("custom", &ComponentRegistry::new());
}

#[test]
fn custom_with_refs() {
    let registry = ComponentRegistry::from_components([
        ComponentInfo::new("custom-with-refs", Vec::new(), "custom-with-refs.html"),
        ComponentInfo::new(
            "special-footer",
            vec!["special".to_string(), "footer".to_string()],
            "special/footer/special-footer.html",
        ),
    ]);
    run_case("custom-with-refs", &registry);
}

#[test]
fn merge_imports() {
    run_case("merge-imports", &ComponentRegistry::new());
}

#[test]
fn merge_code() {
    run_case("merge-code", &ComponentRegistry::new());
}
