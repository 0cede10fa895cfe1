use crate::syntax::{NamespaceNode, SyntaxNode, SyntaxTree, TypeNode, UsingDirective};

/// The DeclarationVisitor trait defines the single authoritative traversal mechanism for declaration trees.
///
/// Rules:
/// 1. Traversal order is source order and fixed.
/// 2. Implementers override `visit_*` methods to add behavior.
/// 3. Implementers MUST call `walk_*` functions to continue traversal unless pruning is intended.
/// 4. No manual recursion outside of this system.
pub trait DeclarationVisitor<'a> {
    fn visit_tree(&mut self, tree: &'a SyntaxTree) {
        walk_tree(self, tree);
    }

    fn visit_node(&mut self, node: &'a SyntaxNode) {
        walk_node(self, node);
    }

    fn visit_namespace(&mut self, namespace: &'a NamespaceNode) {
        walk_namespace(self, namespace);
    }

    fn visit_type(&mut self, ty: &'a TypeNode) {
        walk_type(self, ty);
    }

    /// Fields, properties and methods. Leaf.
    fn visit_member(&mut self, _member: &'a SyntaxNode) {}

    fn visit_using(&mut self, _using: &'a UsingDirective) {
        // Leaf node, nothing to walk by default
    }

    fn visit_children(&mut self, children: &'a [SyntaxNode]) {
        walk_children(self, children);
    }
}

pub fn walk_tree<'a, V: DeclarationVisitor<'a> + ?Sized>(visitor: &mut V, tree: &'a SyntaxTree) {
    visitor.visit_children(&tree.members);
}

pub fn walk_children<'a, V: DeclarationVisitor<'a> + ?Sized>(
    visitor: &mut V,
    children: &'a [SyntaxNode],
) {
    for node in children {
        visitor.visit_node(node);
    }
}

pub fn walk_node<'a, V: DeclarationVisitor<'a> + ?Sized>(visitor: &mut V, node: &'a SyntaxNode) {
    match node {
        SyntaxNode::Namespace(ns) => visitor.visit_namespace(ns),
        SyntaxNode::Class(ty) => visitor.visit_type(ty),
        SyntaxNode::Field(_) | SyntaxNode::Property(_) | SyntaxNode::Method(_) => {
            visitor.visit_member(node)
        }
        SyntaxNode::Using(u) => visitor.visit_using(u),
        SyntaxNode::Unknown => {}
    }
}

pub fn walk_namespace<'a, V: DeclarationVisitor<'a> + ?Sized>(
    visitor: &mut V,
    namespace: &'a NamespaceNode,
) {
    visitor.visit_children(&namespace.members);
}

pub fn walk_type<'a, V: DeclarationVisitor<'a> + ?Sized>(visitor: &mut V, ty: &'a TypeNode) {
    visitor.visit_children(&ty.members);
}
