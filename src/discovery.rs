//! Declaration scanner
//!
//! Walks every tree of a compilation and collects, per enclosing type, the
//! members that carry a strategy marker. Candidate order is source order.

use std::collections::HashMap;

use crate::analyzer::parse_strategy;
use crate::syntax::{Compilation, NamespaceNode, SyntaxNode, SyntaxTree, TypeNode, UsingDirective};
use crate::visitor::{walk_namespace, walk_tree, walk_type, DeclarationVisitor};

/// True iff the node carries at least one strategy marker.
pub fn is_candidate(node: &SyntaxNode) -> bool {
    node.attributes()
        .iter()
        .any(|attr| parse_strategy(&attr.name).is_some())
}

/// An enclosing type and its candidate members, as discovered.
#[derive(Debug, Clone)]
pub struct ScannedType<'a> {
    /// First declaration seen. Locations of unit-level skips point here.
    pub node: &'a TypeNode,
    /// Every partial declaration of the type, in discovery order.
    pub parts: Vec<&'a TypeNode>,
    /// Declarations of each containing type, outermost first.
    pub containers: Vec<Vec<&'a TypeNode>>,
    pub namespaces: Vec<&'a str>,
    pub file_path: &'a str,
    /// Top-level usings of every file declaring the type, in discovery order.
    pub usings: Vec<&'a UsingDirective>,
    pub candidates: Vec<Candidate<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub node: &'a SyntaxNode,
    pub file_path: &'a str,
}

#[derive(Default)]
struct Scanner<'a> {
    file_path: &'a str,
    file_usings: Vec<&'a UsingDirective>,
    namespaces: Vec<&'a str>,
    /// Names of the enclosing types, outermost first.
    type_names: Vec<&'a str>,
    /// Indices into `found` for the enclosing types.
    type_stack: Vec<usize>,
    found: Vec<ScannedType<'a>>,
    /// Containing type of each entry in `found`.
    parents: Vec<Option<usize>>,
    index: HashMap<String, usize>,
    /// Files whose usings were already merged into a type.
    merged_files: HashMap<usize, Vec<&'a str>>,
}

impl<'a> Scanner<'a> {
    fn type_key(&self, name: &str) -> String {
        let mut key = self.namespaces.join(".");
        for outer in &self.type_names {
            key.push('+');
            key.push_str(outer);
        }
        key.push('+');
        key.push_str(name.trim());
        key
    }

    /// Declarations of every containing type of `idx`, outermost first.
    fn containers_of(&self, idx: usize) -> Vec<Vec<&'a TypeNode>> {
        let mut chain = Vec::new();
        let mut parent = self.parents[idx];
        while let Some(p) = parent {
            chain.push(self.found[p].parts.clone());
            parent = self.parents[p];
        }
        chain.reverse();
        chain
    }
}

impl<'a> DeclarationVisitor<'a> for Scanner<'a> {
    fn visit_tree(&mut self, tree: &'a SyntaxTree) {
        self.file_path = tree.file_path.as_str();
        self.file_usings = tree.top_level_usings().collect();
        walk_tree(self, tree);
    }

    fn visit_namespace(&mut self, namespace: &'a NamespaceNode) {
        self.namespaces.push(&namespace.name);
        walk_namespace(self, namespace);
        self.namespaces.pop();
    }

    fn visit_type(&mut self, ty: &'a TypeNode) {
        let key = self.type_key(&ty.name);
        let idx = match self.index.get(&key) {
            Some(&idx) => {
                self.found[idx].parts.push(ty);
                idx
            }
            None => {
                self.found.push(ScannedType {
                    node: ty,
                    parts: vec![ty],
                    containers: Vec::new(),
                    namespaces: self.namespaces.clone(),
                    file_path: self.file_path,
                    usings: Vec::new(),
                    candidates: Vec::new(),
                });
                let idx = self.found.len() - 1;
                self.parents.push(self.type_stack.last().copied());
                self.index.insert(key, idx);
                idx
            }
        };

        let merged = self.merged_files.entry(idx).or_default();
        if !merged.contains(&self.file_path) {
            merged.push(self.file_path);
            self.found[idx].usings.extend(self.file_usings.iter().copied());
        }

        self.type_stack.push(idx);
        self.type_names.push(ty.name.trim());
        walk_type(self, ty);
        self.type_names.pop();
        self.type_stack.pop();
    }

    fn visit_member(&mut self, member: &'a SyntaxNode) {
        if !is_candidate(member) {
            return;
        }
        if let Some(&idx) = self.type_stack.last() {
            self.found[idx].candidates.push(Candidate {
                node: member,
                file_path: self.file_path,
            });
        }
    }
}

/// Scans a compilation. Types without candidates are dropped; the rest keep
/// discovery order.
pub fn scan(compilation: &Compilation) -> Vec<ScannedType<'_>> {
    let mut scanner = Scanner::default();
    for tree in &compilation.trees {
        scanner.visit_tree(tree);
    }

    // Containers are resolved last so that they see every partial part.
    let containers: Vec<_> = (0..scanner.found.len())
        .map(|idx| scanner.containers_of(idx))
        .collect();
    scanner
        .found
        .into_iter()
        .zip(containers)
        .filter(|(t, _)| !t.candidates.is_empty())
        .map(|(mut t, chain)| {
            t.containers = chain;
            t
        })
        .collect()
}
