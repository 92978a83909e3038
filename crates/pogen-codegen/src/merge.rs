//! TypeScript analysis of previously generated page objects.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Class, Declaration, ExportDefaultDeclarationKind, ImportDeclarationSpecifier, Statement,
};
use oxc_parser::Parser;
use oxc_span::{SourceType, Span};

use crate::traits::{MergeContext, MergeError, SourceAnalyzer};

/// [`SourceAnalyzer`] for TypeScript page objects, backed by oxc.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeScriptAnalyzer;

impl TypeScriptAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl SourceAnalyzer for TypeScriptAnalyzer {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn analyze(&self, source: &str) -> Result<MergeContext, MergeError> {
        let allocator = Allocator::default();
        let source_type = SourceType::default()
            .with_module(true)
            .with_typescript(true);
        let ret = Parser::new(&allocator, source, source_type).parse();

        if ret.panicked || !ret.errors.is_empty() {
            let mut messages: Vec<String> = ret.errors.iter().map(|e| e.to_string()).collect();
            if messages.is_empty() {
                messages.push("parser aborted".to_string());
            }
            return Err(MergeError::Parse(messages));
        }

        let mut context = MergeContext::default();

        let line_comments: Vec<u32> = ret
            .program
            .comments
            .iter()
            .filter(|c| c.is_line())
            .map(|c| c.span.start)
            .collect();

        for stmt in &ret.program.body {
            match stmt {
                Statement::ImportDeclaration(import_decl) => {
                    // Type-only imports do not provide the runtime value.
                    if let Some(specifiers) = import_decl
                        .specifiers
                        .as_ref()
                        .filter(|_| !import_decl.import_kind.is_type())
                    {
                        for specifier in specifiers.iter().filter(|s| !is_type_only(s)) {
                            context.imported_symbols.insert(local_name(specifier));
                        }
                    }
                    context
                        .imported_code
                        .push(span_text(source, import_decl.span).to_string());
                }
                Statement::ClassDeclaration(class) => {
                    keep_custom_code(source, class, &line_comments, &mut context);
                }
                Statement::ExportNamedDeclaration(export) => {
                    if let Some(Declaration::ClassDeclaration(class)) = &export.declaration {
                        keep_custom_code(source, class, &line_comments, &mut context);
                    }
                }
                Statement::ExportDefaultDeclaration(export) => {
                    if let ExportDefaultDeclarationKind::ClassDeclaration(class) =
                        &export.declaration
                    {
                        keep_custom_code(source, class, &line_comments, &mut context);
                    }
                }
                _ => {}
            }
        }

        tracing::debug!(
            imports = context.imported_code.len(),
            custom_blocks = context.keep_code.len(),
            "analyzed existing page object"
        );

        Ok(context)
    }
}

fn local_name(specifier: &ImportDeclarationSpecifier) -> String {
    match specifier {
        ImportDeclarationSpecifier::ImportSpecifier(s) => s.local.name.to_string(),
        ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => s.local.name.to_string(),
        ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => s.local.name.to_string(),
    }
}

fn is_type_only(specifier: &ImportDeclarationSpecifier) -> bool {
    matches!(specifier, ImportDeclarationSpecifier::ImportSpecifier(s) if s.import_kind.is_type())
}

fn span_text(source: &str, span: Span) -> &str {
    &source[span.start as usize..span.end as usize]
}

/// Record everything from the first own-line comment in `class` to its closing brace.
///
/// `line_comments` holds the start offsets of all `//` comments, in source order.
fn keep_custom_code(source: &str, class: &Class, line_comments: &[u32], context: &mut MergeContext) {
    let Some(id) = &class.id else {
        return;
    };

    let (start, end) = (class.span.start as usize, class.span.end as usize);
    let marker = line_comments
        .iter()
        .map(|&offset| offset as usize)
        .filter(|&offset| offset > start && offset < end)
        .find_map(|offset| own_line_start(source, offset));

    if let Some(line_start) = marker {
        context
            .keep_code
            .insert(id.name.to_string(), source[line_start..end].to_string());
    }
}

/// Start of the line holding the comment at `offset`, if only indentation precedes it.
fn own_line_start(source: &str, offset: usize) -> Option<usize> {
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let before = &source[line_start..offset];
    let before = before.strip_suffix("//").unwrap_or(before);
    before
        .chars()
        .all(|c| c == ' ' || c == '\t')
        .then_some(line_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PRIOR: &str = r#"import { TextObject, TextInputObject, PageObject } from 'puppeteer-objects';
import Default from './default.po';
import * as helpers from '../helpers';
import './side-effect';

export class MergeCodeObject extends PageObject {
  get header() { return this.createChild(TextObject, 'header[_header]'); }
}

export class MergeCodeMainObject extends PageObject {
  get itemList() { return this.createList(MergeCodeMainItemObject, '> div[_item_list]'); }
  // custom
  get firstItem() { return this.itemList.get(0); }
}

class LocalObject extends PageObject {
  get url() { return 'http://example.com'; } // trailing comments do not count
}
"#;

    #[test]
    fn collects_imports_verbatim() {
        let context = TypeScriptAnalyzer::new().analyze(PRIOR).unwrap();

        assert_eq!(
            context.imported_code,
            vec![
                "import { TextObject, TextInputObject, PageObject } from 'puppeteer-objects';",
                "import Default from './default.po';",
                "import * as helpers from '../helpers';",
                "import './side-effect';",
            ]
        );
        for symbol in ["TextObject", "TextInputObject", "PageObject", "Default", "helpers"] {
            assert!(context.imported_symbols.contains(symbol), "missing {symbol}");
        }
        assert_eq!(context.imported_symbols.len(), 5);
    }

    #[test]
    fn keeps_code_from_first_comment_to_class_end() {
        let context = TypeScriptAnalyzer::new().analyze(PRIOR).unwrap();

        assert_eq!(context.keep_code.len(), 1);
        assert_eq!(
            context.keep_code["MergeCodeMainObject"],
            "  // custom\n  get firstItem() { return this.itemList.get(0); }\n}"
        );
    }

    #[test]
    fn keeps_code_of_default_exported_classes() {
        let source = "export default class AppObject {\n  // mine\n  x = 1;\n}\n";
        let context = TypeScriptAnalyzer::new().analyze(source).unwrap();

        assert_eq!(context.keep_code["AppObject"], "  // mine\n  x = 1;\n}");
    }

    #[test]
    fn comment_markers_inside_strings_are_ignored() {
        let source = "export class AObject extends PageObject {\n  get tpl() { return `\n// not code\n`; }\n  // custom\n  get x() { return 1; }\n}\n";
        let context = TypeScriptAnalyzer::new().analyze(source).unwrap();

        assert_eq!(context.keep_code["AObject"], "  // custom\n  get x() { return 1; }\n}");
    }

    #[test]
    fn type_only_imports_do_not_count_as_imported() {
        let source = "import type { TextObject } from 'a';\nimport { type ButtonObject, PageObject } from 'b';\n";
        let context = TypeScriptAnalyzer::new().analyze(source).unwrap();

        assert_eq!(context.imported_code.len(), 2);
        assert_eq!(context.imported_symbols.len(), 1);
        assert!(context.imported_symbols.contains("PageObject"));
    }

    #[test]
    fn preserves_windows_line_endings() {
        let source = "export class AObject extends PageObject {\r\n  // custom\r\n  get b() { return 1; }\r\n}\r\n";
        let context = TypeScriptAnalyzer::new().analyze(source).unwrap();

        assert_eq!(
            context.keep_code["AObject"],
            "  // custom\r\n  get b() { return 1; }\r\n}"
        );
    }

    #[test]
    fn rejects_unparseable_source() {
        let result = TypeScriptAnalyzer::new().analyze("export class Broken extends PageObject {");

        assert!(matches!(result, Err(MergeError::Parse(ref messages)) if !messages.is_empty()));
    }
}
