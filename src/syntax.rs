//! Declaration tree handed over by the host front end.
//!
//! The generator never parses source text itself. The host serializes its
//! syntax tree into these types (usually as JSON) and the pipeline walks them.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILATION
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Compilation {
    pub trees: Vec<SyntaxTree>,
}

impl Compilation {
    pub fn new(trees: Vec<SyntaxTree>) -> Self {
        Self { trees }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// One source file worth of declarations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxTree {
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub members: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Using directives at the compilation-unit level, in source order.
    pub fn top_level_usings(&self) -> impl Iterator<Item = &UsingDirective> {
        self.members.iter().filter_map(|node| match node {
            SyntaxNode::Using(using) => Some(using),
            _ => None,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SyntaxNode {
    Namespace(NamespaceNode),
    Class(TypeNode),
    Field(FieldNode),
    Property(PropertyNode),
    Method(MethodNode),
    Using(UsingDirective),
    #[serde(other)]
    Unknown,
}

impl SyntaxNode {
    /// Attribute syntax written on the node, empty for kinds that cannot carry any.
    pub fn attributes(&self) -> &[AttributeSyntax] {
        match self {
            SyntaxNode::Field(f) => &f.attributes,
            SyntaxNode::Property(p) => &p.attributes,
            SyntaxNode::Method(m) => &m.attributes,
            _ => &[],
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            SyntaxNode::Namespace(n) => n.location.clone(),
            SyntaxNode::Class(t) => t.location.clone(),
            SyntaxNode::Field(f) => f.location.clone(),
            SyntaxNode::Property(p) => p.location.clone(),
            SyntaxNode::Method(m) => m.location.clone(),
            SyntaxNode::Using(u) => u.location.clone(),
            SyntaxNode::Unknown => SourceLocation::default(),
        }
    }

    /// Best-effort display name for diagnostics.
    pub fn display_name(&self) -> String {
        match self {
            SyntaxNode::Namespace(n) => n.name.clone(),
            SyntaxNode::Class(t) => t.name.clone(),
            SyntaxNode::Field(f) => f.variables.join(", "),
            SyntaxNode::Property(p) => p.name.clone(),
            SyntaxNode::Method(m) => m.name.clone(),
            SyntaxNode::Using(u) => u.name.clone(),
            SyntaxNode::Unknown => "<unknown>".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceNode {
    /// May be dotted (`A.B`), which also covers file-scoped namespaces.
    pub name: String,
    #[serde(default)]
    pub members: Vec<SyntaxNode>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeNode {
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub members: Vec<SyntaxNode>,
    #[serde(default)]
    pub location: SourceLocation,
}

impl TypeNode {
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m.trim() == modifier)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNode {
    #[serde(rename = "type")]
    pub type_text: String,
    pub variables: Vec<String>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeSyntax>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyNode {
    #[serde(rename = "type")]
    pub type_text: String,
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeSyntax>,
    #[serde(default = "default_true")]
    pub has_setter: bool,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodNode {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeSyntax>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsingDirective {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub location: SourceLocation,
}

impl UsingDirective {
    pub fn render(&self) -> String {
        let mut out = String::from("using ");
        if self.is_static {
            out.push_str("static ");
        }
        if let Some(alias) = &self.alias {
            out.push_str(alias.trim());
            out.push_str(" = ");
        }
        out.push_str(self.name.trim());
        out.push(';');
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSyntax {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<AttributeArgumentSyntax>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeArgumentSyntax {
    /// Present for `name = value` arguments.
    #[serde(default)]
    pub name: Option<String>,
    pub value: String,
}

fn default_true() -> bool {
    true
}
