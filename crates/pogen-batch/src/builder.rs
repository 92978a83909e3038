//! Batch page object builder.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use pogen_codegen::{
    output_file_name, CodeGenerator, ComponentInfo, ComponentRegistry, GenerateError,
    GeneratorOptions, LineEnding, RegistryError, DEFAULT_LIBRARY,
};
use pogen_template::{MarkupError, ParserOptions, TemplateParser};

/// Configuration for a generation run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory scanned for component templates
    pub source_dir: PathBuf,

    /// Root of the generated page objects, mirroring the source layout
    pub output_dir: PathBuf,

    /// Prefix of marker attributes
    pub attribute_prefix: String,

    /// Component tag prefix stripped when inferring class names
    pub selector_prefix: String,

    /// Module exporting the base and builtin page objects
    pub lib: String,

    pub eol: LineEnding,

    /// Ignore existing output instead of merging with it
    pub overwrite: bool,

    /// Process templates on the rayon thread pool
    pub parallel: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            attribute_prefix: ParserOptions::default().attribute_prefix,
            selector_prefix: String::new(),
            lib: DEFAULT_LIBRARY.to_string(),
            eol: LineEnding::default(),
            overwrite: false,
            parallel: false,
        }
    }
}

/// Errors that can occur during a run.
///
/// Only [`BatchError::Discovery`] aborts a run; the others are reported per
/// template.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error(transparent)]
    Discovery(#[from] RegistryError),

    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse template {}: {source}", path.display())]
    Markup { path: PathBuf, source: MarkupError },

    #[error("Failed to merge with {}: {source}", path.display())]
    Merge { path: PathBuf, source: GenerateError },

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl BatchError {
    /// Individual problems behind this error, one line each.
    pub fn diagnostics(&self) -> Vec<String> {
        match self {
            Self::Markup { source, .. } => {
                source.diagnostics.iter().map(ToString::to_string).collect()
            }
            Self::Merge {
                source: GenerateError::Merge(pogen_codegen::MergeError::Parse(messages)),
                ..
            } => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

/// What happened to one template.
#[derive(Debug)]
pub enum Outcome {
    /// A new or changed page object was written
    Written,
    /// The existing page object already matched
    Unchanged,
    Failed(BatchError),
}

/// Result of processing one template.
#[derive(Debug)]
pub struct TemplateReport {
    pub name: String,

    pub template_path: PathBuf,

    pub output_path: PathBuf,

    pub outcome: Outcome,
}

impl TemplateReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed(_))
    }
}

/// Result of a run.
#[derive(Debug)]
pub struct BatchResult {
    /// One report per template, in discovery order
    pub reports: Vec<TemplateReport>,

    pub written: usize,

    pub unchanged: usize,

    pub failed: usize,

    /// Total run time in milliseconds
    pub duration_ms: u64,
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Generates page objects for every template below a source directory.
pub struct BatchRunner {
    config: BatchConfig,
    parser: TemplateParser,
    generator: CodeGenerator,
}

impl BatchRunner {
    pub fn new(config: BatchConfig) -> Self {
        let parser = TemplateParser::new(ParserOptions {
            attribute_prefix: config.attribute_prefix.clone(),
        });
        let generator = CodeGenerator::new(GeneratorOptions {
            eol: config.eol,
            selector_prefix: config.selector_prefix.clone(),
            lib: config.lib.clone(),
        });

        Self {
            config,
            parser,
            generator,
        }
    }

    /// Discover templates and generate a page object for each.
    pub fn run(&self) -> Result<BatchResult, BatchError> {
        let mut registry = ComponentRegistry::new();
        let count = registry.scan(&self.config.source_dir)?;
        tracing::debug!(
            "Found {} templates in {}",
            count,
            self.config.source_dir.display()
        );

        Ok(self.run_with(&registry))
    }

    /// Generate a page object for every component in `registry`.
    pub fn run_with(&self, registry: &ComponentRegistry) -> BatchResult {
        let start = Instant::now();
        let components: Vec<&ComponentInfo> = registry.iter().collect();

        let reports: Vec<TemplateReport> = if self.config.parallel {
            components
                .par_iter()
                .map(|component| self.process(component, registry))
                .collect()
        } else {
            components
                .iter()
                .map(|component| self.process(component, registry))
                .collect()
        };

        let mut result = BatchResult {
            reports,
            written: 0,
            unchanged: 0,
            failed: 0,
            duration_ms: 0,
        };
        for report in &result.reports {
            match report.outcome {
                Outcome::Written => result.written += 1,
                Outcome::Unchanged => result.unchanged += 1,
                Outcome::Failed(_) => result.failed += 1,
            }
        }
        result.duration_ms = start.elapsed().as_millis() as u64;

        result
    }

    /// Where the page object of `component` is written.
    pub fn output_path(&self, component: &ComponentInfo) -> PathBuf {
        let mut path = self.config.output_dir.clone();
        path.extend(&component.path_items);
        path.push(output_file_name(&component.name));
        path
    }

    fn process(&self, component: &ComponentInfo, registry: &ComponentRegistry) -> TemplateReport {
        let output_path = self.output_path(component);
        let outcome = match self.generate(component, &output_path, registry) {
            Ok(outcome) => {
                tracing::info!("• {}", component.name);
                outcome
            }
            Err(e) => {
                tracing::error!("• {}: {}", component.name, e);
                for diagnostic in e.diagnostics() {
                    tracing::error!("    {}", diagnostic);
                }
                Outcome::Failed(e)
            }
        };

        TemplateReport {
            name: component.name.clone(),
            template_path: component.path.clone(),
            output_path,
            outcome,
        }
    }

    fn generate(
        &self,
        component: &ComponentInfo,
        output_path: &Path,
        registry: &ComponentRegistry,
    ) -> Result<Outcome, BatchError> {
        let markup = fs::read_to_string(&component.path).map_err(|source| BatchError::Read {
            path: component.path.clone(),
            source,
        })?;

        let document = self
            .parser
            .parse_document(&markup)
            .map_err(|source| BatchError::Markup {
                path: component.path.clone(),
                source,
            })?;
        let root = self.parser.build_tree(&component.name, &document);

        let prior = self.read_prior(output_path)?;
        let generated = self
            .generator
            .generate(prior.as_deref(), &root, &component.path_items, registry)
            .map_err(|source| BatchError::Merge {
                path: output_path.to_path_buf(),
                source,
            })?;

        if prior.as_deref() == Some(generated.as_str()) {
            tracing::debug!(path = %output_path.display(), "page object unchanged");
            return Ok(Outcome::Unchanged);
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|source| BatchError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(output_path, generated).map_err(|source| BatchError::Write {
            path: output_path.to_path_buf(),
            source,
        })?;

        Ok(Outcome::Written)
    }

    /// Existing page object at `path`, unless overwriting. A missing file is not an error.
    fn read_prior(&self, path: &Path) -> Result<Option<String>, BatchError> {
        if self.config.overwrite {
            return Ok(None);
        }
        match fs::read_to_string(path) {
            Ok(source) => Ok(Some(source)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(BatchError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn config_for(root: &Path) -> BatchConfig {
        BatchConfig {
            source_dir: root.join("src"),
            output_dir: root.join("po"),
            lib: "puppeteer-objects".to_string(),
            ..Default::default()
        }
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn outcomes(result: &BatchResult) -> Vec<(&str, &'static str)> {
        result
            .reports
            .iter()
            .map(|r| {
                let outcome = match r.outcome {
                    Outcome::Written => "written",
                    Outcome::Unchanged => "unchanged",
                    Outcome::Failed(_) => "failed",
                };
                (r.name.as_str(), outcome)
            })
            .collect()
    }

    #[test]
    fn generates_page_objects_mirroring_source_layout() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        write(
            &src.join("app.component.html"),
            r#"<app-special-footer _footer></app-special-footer>"#,
        );
        write(
            &src.join("special/footer/special-footer.component.html"),
            "<button _ok>OK</button>",
        );

        let runner = BatchRunner::new(BatchConfig {
            selector_prefix: "app-".to_string(),
            ..config_for(temp.path())
        });
        let result = runner.run().unwrap();

        assert!(result.is_success());
        assert_eq!(result.written, 2);
        assert_eq!(
            outcomes(&result),
            vec![("app", "written"), ("special-footer", "written")]
        );

        let app = fs::read_to_string(temp.path().join("po/app.po.ts")).unwrap();
        assert_eq!(
            app,
            "import { PageObject } from 'puppeteer-objects';\n\
             import { SpecialFooterObject } from './special/footer/special-footer.po';\n\n\
             export class AppObject extends PageObject {\n  \
             get footer() { return this.createChild(SpecialFooterObject, 'app-special-footer[_footer]'); }\n}\n"
        );
        assert!(temp
            .path()
            .join("po/special/footer/special-footer.po.ts")
            .is_file());
    }

    #[test]
    fn second_run_leaves_files_unchanged() {
        let temp = tempdir().unwrap();
        write(&temp.path().join("src/home.html"), "<input _name>");
        let runner = BatchRunner::new(config_for(temp.path()));

        runner.run().unwrap();
        let result = runner.run().unwrap();

        assert_eq!(outcomes(&result), vec![("home", "unchanged")]);
    }

    #[test]
    fn keeps_custom_code_unless_overwriting() {
        let temp = tempdir().unwrap();
        write(&temp.path().join("src/home.html"), "<main _main><input _name></main>");
        let output = temp.path().join("po/home.po.ts");
        write(
            &output,
            "import { PageObject } from 'puppeteer-objects';\n\n\
             export class HomeMainObject extends PageObject {\n  // custom\n  get x() { return 1; }\n}\n",
        );

        BatchRunner::new(config_for(temp.path())).run().unwrap();
        let merged = fs::read_to_string(&output).unwrap();
        assert!(merged.contains("  // custom\n  get x() { return 1; }\n}\n"));

        BatchRunner::new(BatchConfig {
            overwrite: true,
            ..config_for(temp.path())
        })
        .run()
        .unwrap();
        let overwritten = fs::read_to_string(&output).unwrap();
        assert!(!overwritten.contains("// custom"));
    }

    #[test]
    fn failures_do_not_stop_the_batch() {
        let temp = tempdir().unwrap();
        write(&temp.path().join("src/a.html"), "<span _broken></div>");
        write(&temp.path().join("src/b.html"), "<span _ok></span>");
        write(&temp.path().join("src/c.html"), "<span _ok></span>");
        let broken_prior = "export class COb {";
        write(&temp.path().join("po/c.po.ts"), broken_prior);

        let result = BatchRunner::new(config_for(temp.path())).run().unwrap();

        assert!(!result.is_success());
        assert_eq!(result.failed, 2);
        assert_eq!(
            outcomes(&result),
            vec![("a", "failed"), ("b", "written"), ("c", "failed")]
        );

        let Outcome::Failed(err) = &result.reports[0].outcome else {
            panic!("expected failure");
        };
        assert!(matches!(err, BatchError::Markup { .. }));
        assert!(err.diagnostics()[0].contains("Unexpected closing tag \"div\""));

        assert!(matches!(result.reports[2].outcome, Outcome::Failed(BatchError::Merge { .. })));
        let prior = fs::read_to_string(temp.path().join("po/c.po.ts")).unwrap();
        assert_eq!(prior, broken_prior);
    }

    #[test]
    fn reports_write_failures_and_continues() {
        let temp = tempdir().unwrap();
        write(&temp.path().join("src/a.html"), "<input _name>");
        write(&temp.path().join("src/b.html"), "<input _name>");
        fs::create_dir_all(temp.path().join("po/b.po.ts")).unwrap();

        let result = BatchRunner::new(BatchConfig {
            overwrite: true,
            ..config_for(temp.path())
        })
        .run()
        .unwrap();

        assert_eq!(outcomes(&result), vec![("a", "written"), ("b", "failed")]);
        let Outcome::Failed(err) = &result.reports[1].outcome else {
            panic!("expected failure");
        };
        assert!(matches!(err, BatchError::Write { path, .. } if path.ends_with("po/b.po.ts")));
        assert!(temp.path().join("po/a.po.ts").is_file());
    }

    #[test]
    fn unreadable_prior_file_is_reported() {
        let temp = tempdir().unwrap();
        write(&temp.path().join("src/a.html"), "<input _name>");
        fs::create_dir_all(temp.path().join("po/a.po.ts")).unwrap();

        let result = BatchRunner::new(config_for(temp.path())).run().unwrap();

        assert_eq!(result.failed, 1);
        let Outcome::Failed(err) = &result.reports[0].outcome else {
            panic!("expected failure");
        };
        assert!(matches!(err, BatchError::Read { path, .. } if path.ends_with("po/a.po.ts")));
    }

    #[test]
    fn parallel_run_reports_in_discovery_order() {
        let temp = tempdir().unwrap();
        for name in ["d", "a", "c", "b"] {
            write(&temp.path().join(format!("src/{name}/{name}.html")), "<p _text></p>");
        }

        let result = BatchRunner::new(BatchConfig {
            parallel: true,
            ..config_for(temp.path())
        })
        .run()
        .unwrap();

        let names: Vec<_> = result.reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
        assert_eq!(result.written, 4);
        assert_eq!(
            result.reports[0].output_path,
            temp.path().join("po/a/a.po.ts")
        );
    }

    #[test]
    fn missing_source_directory_fails_the_run() {
        let temp = tempdir().unwrap();
        let result = BatchRunner::new(config_for(temp.path())).run();

        assert!(matches!(result, Err(BatchError::Discovery(_))));
    }
}
