//! Hand-built declaration trees shared by the test modules.

use crate::generator::Generator;
use crate::options::GeneratorOptions;
use crate::syntax::{
    AttributeArgumentSyntax, AttributeSyntax, Compilation, FieldNode, MethodNode, NamespaceNode,
    PropertyNode, SourceLocation, SyntaxNode, SyntaxTree, TypeNode, UsingDirective,
};

pub fn mock_loc() -> SourceLocation {
    SourceLocation { line: 1, column: 1 }
}

pub fn attr(name: &str) -> AttributeSyntax {
    AttributeSyntax {
        name: name.to_string(),
        arguments: vec![],
    }
}

/// `(None, v)` is positional, `(Some(k), v)` is `k = v`.
pub fn attr_with(name: &str, args: &[(Option<&str>, &str)]) -> AttributeSyntax {
    AttributeSyntax {
        name: name.to_string(),
        arguments: args
            .iter()
            .map(|(key, value)| AttributeArgumentSyntax {
                name: key.map(|k| k.to_string()),
                value: value.to_string(),
            })
            .collect(),
    }
}

pub fn markers(names: &[&str]) -> Vec<AttributeSyntax> {
    names.iter().map(|n| attr(n)).collect()
}

pub fn field(type_text: &str, name: &str, attributes: Vec<AttributeSyntax>) -> SyntaxNode {
    SyntaxNode::Field(FieldNode {
        type_text: type_text.to_string(),
        variables: vec![name.to_string()],
        modifiers: vec!["private".to_string()],
        attributes,
        location: mock_loc(),
    })
}

pub fn property(type_text: &str, name: &str, attributes: Vec<AttributeSyntax>) -> SyntaxNode {
    SyntaxNode::Property(PropertyNode {
        type_text: type_text.to_string(),
        name: name.to_string(),
        modifiers: vec!["public".to_string()],
        attributes,
        has_setter: true,
        location: mock_loc(),
    })
}

pub fn method(name: &str, attributes: Vec<AttributeSyntax>) -> SyntaxNode {
    SyntaxNode::Method(MethodNode {
        name: name.to_string(),
        attributes,
        location: mock_loc(),
    })
}

pub fn class(name: &str, modifiers: &[&str], members: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::Class(TypeNode {
        name: name.to_string(),
        modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
        type_parameters: vec![],
        members,
        location: mock_loc(),
    })
}

pub fn namespace(name: &str, members: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::Namespace(NamespaceNode {
        name: name.to_string(),
        members,
        location: mock_loc(),
    })
}

pub fn using(name: &str) -> SyntaxNode {
    SyntaxNode::Using(UsingDirective {
        name: name.to_string(),
        alias: None,
        is_static: false,
        location: mock_loc(),
    })
}

pub fn tree(path: &str, members: Vec<SyntaxNode>) -> SyntaxTree {
    SyntaxTree {
        file_path: path.to_string(),
        members,
    }
}

pub fn compilation(trees: Vec<SyntaxTree>) -> Compilation {
    Compilation::new(trees)
}

/// Generator on the calling thread, no diagnostics.
pub fn sequential() -> Generator {
    Generator::new(GeneratorOptions {
        parallel: false,
        ..GeneratorOptions::default()
    })
}
