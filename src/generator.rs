//! Generation driver
//!
//! Scan → analyze → resolve shape → emit → assemble, one unit per enclosing
//! type. Units are independent and may be produced on the rayon pool; the
//! report keeps discovery order regardless.

use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analyzer::{analyze_markers, member_signature, strategy_parameter};
use crate::codegen::{emit_fragment, Declaration, Fragment};
use crate::diagnostics::{DiagnosticSink, FileSink, NoopSink};
use crate::discovery::{scan, ScannedType};
use crate::error::{GeneratorError, Result, SkipReason, Skipped};
use crate::finalize::{assemble_unit, disambiguate_keys, GeneratedUnit};
use crate::options::GeneratorOptions;
use crate::semantic::SemanticModel;
use crate::shape::{classify, namespace_path, TypeDescriptor};
use crate::syntax::{Compilation, SyntaxNode};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub units: Vec<GeneratedUnit>,
    pub skipped: Vec<Skipped>,
}

impl GenerationReport {
    pub fn unit(&self, key: &str) -> Option<&GeneratedUnit> {
        self.units.iter().find(|u| u.key == key)
    }
}

struct TypeOutcome {
    unit: Option<GeneratedUnit>,
    skipped: Vec<Skipped>,
}

pub struct Generator {
    options: GeneratorOptions,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

impl Generator {
    /// Diagnostics go to `options.log_path` when set, nowhere otherwise.
    pub fn new(options: GeneratorOptions) -> Self {
        let sink: Arc<dyn DiagnosticSink> = match &options.log_path {
            Some(path) => Arc::new(FileSink::new(path.clone())),
            None => Arc::new(NoopSink),
        };
        Self { options, sink }
    }

    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn generate(
        &self,
        compilation: &Compilation,
        model: &dyn SemanticModel,
    ) -> Result<GenerationReport> {
        self.run(compilation, model, None)
    }

    /// Like [`Generator::generate`], checking `cancel` before each candidate.
    pub fn generate_with_cancel(
        &self,
        compilation: &Compilation,
        model: &dyn SemanticModel,
        cancel: &AtomicBool,
    ) -> Result<GenerationReport> {
        self.run(compilation, model, Some(cancel))
    }

    fn run(
        &self,
        compilation: &Compilation,
        model: &dyn SemanticModel,
        cancel: Option<&AtomicBool>,
    ) -> Result<GenerationReport> {
        let scanned = scan(compilation);
        debug!(types = scanned.len(), "scanned compilation");

        let outcomes: Vec<TypeOutcome> = if self.options.parallel {
            scanned
                .par_iter()
                .map(|ty| self.generate_type(ty, model, cancel))
                .collect::<Result<Vec<_>>>()?
        } else {
            scanned
                .iter()
                .map(|ty| self.generate_type(ty, model, cancel))
                .collect::<Result<Vec<_>>>()?
        };

        let mut report = GenerationReport::default();
        for outcome in outcomes {
            report.units.extend(outcome.unit);
            report.skipped.extend(outcome.skipped);
        }

        let renamed = disambiguate_keys(&mut report.units);
        if renamed > 0 {
            warn!(units = renamed, "type names shared across namespaces, using qualified keys");
        }
        for unit in &report.units {
            self.sink.write(&format!(
                "generated {} ({} fragments, hook {})",
                unit.key, unit.fragment_count, unit.hook
            ));
        }

        info!(
            units = report.units.len(),
            skipped = report.skipped.len(),
            "generation finished"
        );
        Ok(report)
    }

    fn generate_type(
        &self,
        scanned: &ScannedType<'_>,
        model: &dyn SemanticModel,
        cancel: Option<&AtomicBool>,
    ) -> Result<TypeOutcome> {
        let desc = TypeDescriptor::resolve(
            &scanned.parts,
            &scanned.containers,
            namespace_path(&scanned.namespaces),
            &scanned.usings,
        );
        let mut skipped = Vec::new();

        if self.options.require_partial && !desc.is_partial() {
            let skip = Skipped::unit(
                SkipReason::NotPartial,
                desc.name(),
                scanned.file_path,
                scanned.node.location.clone(),
            );
            self.report_skip(&skip);
            skipped.push(skip);
            return Ok(TypeOutcome {
                unit: None,
                skipped,
            });
        }

        let mut fragments: Vec<Fragment> = Vec::with_capacity(scanned.candidates.len());
        for candidate in &scanned.candidates {
            if cancel.map_or(false, |flag| flag.load(Ordering::Relaxed)) {
                return Err(GeneratorError::Cancelled);
            }

            match self.resolve_declaration(desc.name(), candidate.node, model) {
                Ok(Some(decl)) => {
                    let fragment = emit_fragment(&decl);
                    debug!(
                        ty = %desc.qualified_name(),
                        member = %decl.member.name,
                        strategy = decl.markers.strategy.marker_name(),
                        "emitted fragment"
                    );
                    fragments.push(fragment);
                }
                Ok(None) => {}
                Err(reason) => {
                    let skip = Skipped::member(
                        reason,
                        desc.name(),
                        &candidate.node.display_name(),
                        candidate.file_path,
                        candidate.node.location(),
                    );
                    self.report_skip(&skip);
                    skipped.push(skip);
                }
            }
        }

        if fragments.is_empty() {
            return Ok(TypeOutcome {
                unit: None,
                skipped,
            });
        }

        let unit = assemble_unit(&desc, &fragments, &self.options);
        debug!(key = %unit.key, hook = %unit.hook, fragments = unit.fragment_count, "assembled unit");

        Ok(TypeOutcome {
            unit: Some(unit),
            skipped,
        })
    }

    /// Resolves one candidate member into emitter input.
    ///
    /// `Ok(None)` for members without a strategy marker.
    pub fn resolve_declaration(
        &self,
        type_name: &str,
        node: &SyntaxNode,
        model: &dyn SemanticModel,
    ) -> std::result::Result<Option<Declaration>, SkipReason> {
        let markers = match analyze_markers(node.attributes())? {
            Some(markers) => markers,
            None => return Ok(None),
        };
        let member = member_signature(node)?;
        let attributes = model
            .attributes(node)
            .ok_or(SkipReason::UnresolvedSymbol)?;

        let parameter = markers
            .strategy
            .parameter_name()
            .and_then(|name| strategy_parameter(&attributes, markers.strategy, name));
        let shape = classify(&member.type_text, &self.options.collection_marker);

        Ok(Some(Declaration {
            type_name: type_name.to_string(),
            member,
            shape,
            markers,
            parameter,
        }))
    }

    fn report_skip(&self, skip: &Skipped) {
        warn!(code = skip.code, ty = %skip.type_name, member = ?skip.member, "{}", skip.reason.describe());
        self.sink.write(&skip.message());
    }
}
