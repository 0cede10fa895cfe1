//! # Component Injection Generator
//!
//! Generates the code that fills marked members of a component class from the
//! scene graph. The host front end supplies the declaration tree (see
//! [`syntax`]) and a [`SemanticModel`]; the generator answers with one
//! augmenting partial class per enclosing type.
//!
//! ## Pipeline
//!
//! 1. **Scan** ([`discovery`]): members carrying a strategy marker, grouped by
//!    enclosing type, in source order.
//! 2. **Analyze** ([`analyzer`]): closed strategy/modifier enums, member
//!    signature, strategy parameter.
//! 3. **Shape** ([`shape`]): scalar / array / collection, enclosing type
//!    descriptor and namespace path.
//! 4. **Emit** ([`codegen`]): one fragment per member.
//! 5. **Assemble** ([`finalize`]): one unit keyed `{TypeName}_codegen`.
//!
//! ## Markers
//!
//! Strategies: `get`, `get-by-name`, `get-by-tag`, `get-in-assets`,
//! `get-in-children`, `get-in-parent`. Modifiers: `ignore-self`,
//! `skip-null-check`, `include-inactive`, `inject-in-play`. Matching ignores
//! case, surrounding whitespace and `-`/`_` separators, so the attribute form
//! `GetInChildren` works as well.
//!
//! ## Failure Model
//!
//! A member that cannot be resolved is skipped and reported; it never stops
//! its siblings or other types. Only malformed input documents and
//! cancellation end a pass early.

pub mod analyzer;
pub mod codegen;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod finalize;
pub mod generator;
pub mod options;
pub mod semantic;
pub mod shape;
pub mod syntax;
pub mod visitor;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod safety_tests;

pub use diagnostics::{DiagnosticSink, FileSink, NoopSink};
pub use error::{GeneratorError, Result, SkipReason, Skipped};
pub use finalize::GeneratedUnit;
pub use generator::{GenerationReport, Generator};
pub use options::GeneratorOptions;
pub use semantic::{AttributeData, SemanticModel, SyntaxSemanticModel};
pub use syntax::Compilation;

/// One-call entry point for hosts talking JSON.
///
/// Attribute data is read from the syntax itself ([`SyntaxSemanticModel`]).
pub fn generate_from_json(
    compilation_json: &str,
    options_json: Option<&str>,
) -> Result<GenerationReport> {
    let options = match options_json {
        Some(json) => GeneratorOptions::from_json(json)?,
        None => GeneratorOptions::default(),
    };
    let compilation = Compilation::from_json(compilation_json)?;
    Generator::new(options).generate(&compilation, &SyntaxSemanticModel)
}
