//! Page object code generation.
//!
//! This crate turns template trees into TypeScript page object modules,
//! resolving the class behind each accessor, importing page objects of other
//! components, and carrying custom code over from previously generated files.

pub mod generator;
pub mod merge;
pub mod paths;
pub mod registry;
pub mod resolver;
pub mod traits;

pub use generator::{CodeGenerator, GenerateError, GeneratorOptions, LineEnding, DEFAULT_LIBRARY};
pub use merge::TypeScriptAnalyzer;
pub use paths::{output_file_name, relative_path};
pub use registry::{ComponentInfo, ComponentRegistry, RegistryError};
pub use resolver::{BuiltinKind, Origin, Resolver, Target, BASE_CLASS};
pub use traits::{MergeContext, MergeError, SourceAnalyzer};
