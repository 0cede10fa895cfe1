//! Finalize Module for the injection generator
//!
//! Assembles the fragments of one enclosing type into a complete unit:
//! header, usings, optional namespace block, the partial declarations of any
//! containing types, the augmenting partial declaration and its single
//! injection hook.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::codegen::Fragment;
use crate::options::GeneratorOptions;
use crate::shape::{TypeDescriptor, TypeHeader};

pub const OUTPUT_SUFFIX: &str = "_codegen";
pub const BASELINE_USINGS: [&str; 2] = ["using UnityEngine;", "using System.Linq;"];
const HEADER: &str = "// <auto-generated/>";
const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedUnit {
    /// `{TypeName}_codegen`, or the qualified form when two types share a name.
    pub key: String,
    pub type_name: String,
    /// `Namespace.Outer.TypeName`
    pub qualified_name: String,
    pub namespace: String,
    pub hook: String,
    pub fragment_count: usize,
    pub text: String,
}

impl GeneratedUnit {
    pub fn file_name(&self) -> String {
        format!("{}.cs", self.key)
    }
}

pub fn output_key(type_name: &str) -> String {
    format!("{}{}", type_name, OUTPUT_SUFFIX)
}

/// `A.B.Player` becomes `A_B_Player_codegen`.
pub fn qualified_output_key(qualified_name: &str) -> String {
    output_key(&qualified_name.replace('.', "_"))
}

/// Gives every unit whose `{TypeName}_codegen` key is shared with another
/// unit its qualified key instead. Returns the number of renamed units.
pub fn disambiguate_keys(units: &mut [GeneratedUnit]) -> usize {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for unit in units.iter() {
        *counts.entry(unit.key.clone()).or_default() += 1;
    }

    let mut renamed = 0;
    for unit in units.iter_mut() {
        if counts.get(&unit.key).copied().unwrap_or(0) > 1 {
            unit.key = qualified_output_key(&unit.qualified_name);
            renamed += 1;
        }
    }
    renamed
}

// ═══════════════════════════════════════════════════════════════════════════════
// WRITER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct CodeWriter {
    out: String,
    depth: usize,
}

impl CodeWriter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self, header: &str) {
        self.line(header);
        self.line("{");
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    fn finish(self) -> String {
        self.out
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ASSEMBLY
// ═══════════════════════════════════════════════════════════════════════════════

/// Baseline usings followed by the source usings, first occurrence kept.
pub fn emit_usings(source_usings: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    BASELINE_USINGS
        .iter()
        .map(|u| u.to_string())
        .chain(source_usings.iter().map(|u| u.trim().to_string()))
        .filter(|u| seen.insert(u.clone()))
        .collect()
}

fn type_header(header: &TypeHeader) -> String {
    let mut text = String::from(header.accessibility.keyword());
    if header.is_sealed {
        text.push_str(" sealed");
    }
    text.push_str(" partial class ");
    text.push_str(&header.name);
    if !header.type_parameters.is_empty() {
        text.push('<');
        text.push_str(&header.type_parameters.join(", "));
        text.push('>');
    }
    text
}

/// Deferred injection for the whole unit as soon as one fragment asks for it.
pub fn is_deferred(fragments: &[Fragment]) -> bool {
    fragments.iter().any(|f| f.inject_in_play)
}

pub fn assemble_unit(
    desc: &TypeDescriptor,
    fragments: &[Fragment],
    options: &GeneratorOptions,
) -> GeneratedUnit {
    let hook = options.hook(is_deferred(fragments)).to_string();
    let mut w = CodeWriter::default();

    w.line(HEADER);
    for using in emit_usings(&desc.usings) {
        w.line(&using);
    }
    w.blank();

    let namespaced = !desc.namespace.is_empty();
    if namespaced {
        w.open(&format!("namespace {}", desc.namespace));
    }

    for container in &desc.containers {
        w.open(&type_header(container));
    }
    w.open(&type_header(&desc.header));
    w.open(&format!("private void {}()", hook));
    for fragment in fragments {
        for statement in fragment.lines() {
            w.line(&statement);
        }
    }
    w.close();
    w.close();
    for _ in &desc.containers {
        w.close();
    }

    if namespaced {
        w.close();
    }

    GeneratedUnit {
        key: output_key(desc.name()),
        type_name: desc.name().to_string(),
        qualified_name: desc.qualified_name(),
        namespace: desc.namespace.clone(),
        hook,
        fragment_count: fragments.len(),
        text: w.finish(),
    }
}
