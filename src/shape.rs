//! Declaration shape resolution: collection/array classification of member
//! types and the descriptor of the enclosing type.

use lazy_static::lazy_static;
use regex::Regex;

use crate::syntax::{TypeNode, UsingDirective};

lazy_static! {
    /// `T[]`, allowing whitespace inside the brackets. Single dimension only.
    static ref ARRAY_TYPE_RE: Regex = Regex::new(r"^(.+?)\s*\[\s*\]$").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// MEMBER SHAPE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    /// Fixed array; holds the element type.
    Array(String),
    /// Dynamic collection; holds the element type.
    Collection(String),
}

impl Shape {
    pub fn is_many(&self) -> bool {
        !matches!(self, Shape::Scalar)
    }

    pub fn element_type(&self) -> Option<&str> {
        match self {
            Shape::Scalar => None,
            Shape::Array(elem) | Shape::Collection(elem) => Some(elem),
        }
    }
}

pub fn is_array_type(type_text: &str) -> bool {
    ARRAY_TYPE_RE.is_match(type_text.trim())
}

pub fn is_collection_type(type_text: &str, collection_marker: &str) -> bool {
    !collection_marker.is_empty() && type_text.contains(collection_marker)
}

fn array_element(type_text: &str) -> Option<String> {
    ARRAY_TYPE_RE
        .captures(type_text.trim())
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Argument list of the first occurrence of `marker` that is directly followed
/// by `<`. `Dictionary<string, List<int>>` with marker `List` yields `int`.
fn generic_argument(type_text: &str, marker: &str) -> Option<String> {
    type_text.match_indices(marker).find_map(|(idx, _)| {
        let rest = type_text[idx + marker.len()..].trim_start();
        let inner = rest.strip_prefix('<')?;
        let mut depth = 0usize;
        for (pos, c) in inner.char_indices() {
            match c {
                '<' => depth += 1,
                '>' if depth == 0 => {
                    let arg = inner[..pos].trim();
                    return (!arg.is_empty()).then(|| arg.to_string());
                }
                '>' => depth -= 1,
                _ => {}
            }
        }
        None
    })
}

/// Classifies a declared type. Array shape takes precedence over collection
/// shape; a collection type without a generic argument is treated as scalar.
pub fn classify(type_text: &str, collection_marker: &str) -> Shape {
    let array = is_array_type(type_text);
    let collection = is_collection_type(type_text, collection_marker);

    if array {
        if let Some(elem) = array_element(type_text) {
            return Shape::Array(elem);
        }
    }
    if collection {
        if let Some(elem) = generic_argument(type_text, collection_marker) {
            return Shape::Collection(elem);
        }
    }
    Shape::Scalar
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENCLOSING TYPE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessibility {
    Public,
    Private,
    Internal,
}

impl Accessibility {
    pub fn keyword(self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Private => "private",
            Accessibility::Internal => "internal",
        }
    }
}

/// First match wins: public, then private, otherwise internal.
pub fn resolve_accessibility(modifiers: &[String]) -> Accessibility {
    let has = |keyword: &str| modifiers.iter().any(|m| m.trim() == keyword);
    if has("public") {
        Accessibility::Public
    } else if has("private") {
        Accessibility::Private
    } else {
        Accessibility::Internal
    }
}

/// Joins enclosing namespace names, outermost first. Empty without namespaces.
pub fn namespace_path<S: AsRef<str>>(namespaces: &[S]) -> String {
    namespaces
        .iter()
        .map(|ns| ns.as_ref().trim())
        .filter(|ns| !ns.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// Declaration header of a type, merged over all of its partial parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHeader {
    pub name: String,
    pub type_parameters: Vec<String>,
    pub accessibility: Accessibility,
    pub is_sealed: bool,
    pub is_partial: bool,
}

impl TypeHeader {
    /// Parts may each spell only some modifiers: the type is public (or
    /// private) if any part says so, sealed if any part says so, and partial
    /// only if every part says so.
    pub fn merge(parts: &[&TypeNode]) -> Self {
        let modifiers: Vec<String> = parts.iter().flat_map(|p| p.modifiers.iter().cloned()).collect();
        let name = parts
            .first()
            .map(|p| p.name.trim().to_string())
            .unwrap_or_default();
        let type_parameters: Vec<String> = parts
            .iter()
            .map(|p| &p.type_parameters)
            .find(|params| !params.is_empty())
            .map(|params| params.iter().map(|p| p.trim().to_string()).collect())
            .unwrap_or_default();

        Self {
            name,
            type_parameters,
            accessibility: resolve_accessibility(&modifiers),
            is_sealed: parts.iter().any(|p| p.has_modifier("sealed")),
            is_partial: !parts.is_empty() && parts.iter().all(|p| p.has_modifier("partial")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub header: TypeHeader,
    /// Headers of the containing types, outermost first. Empty for top-level types.
    pub containers: Vec<TypeHeader>,
    pub namespace: String,
    /// Rendered top-level using directives of the declaring file(s), in order.
    pub usings: Vec<String>,
}

impl TypeDescriptor {
    pub fn resolve(
        parts: &[&TypeNode],
        containers: &[Vec<&TypeNode>],
        namespace: String,
        usings: &[&UsingDirective],
    ) -> Self {
        Self {
            header: TypeHeader::merge(parts),
            containers: containers.iter().map(|c| TypeHeader::merge(c)).collect(),
            namespace,
            usings: usings.iter().map(|u| u.render()).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// True when the type and every containing type are declared partial.
    pub fn is_partial(&self) -> bool {
        self.header.is_partial && self.containers.iter().all(|c| c.is_partial)
    }

    /// Namespace- and container-qualified name, `A.B.Outer.Inner`.
    pub fn qualified_name(&self) -> String {
        let mut segments: Vec<&str> = Vec::with_capacity(self.containers.len() + 2);
        if !self.namespace.is_empty() {
            segments.push(&self.namespace);
        }
        segments.extend(self.containers.iter().map(|c| c.name.as_str()));
        segments.push(&self.header.name);
        segments.join(".")
    }
}
