//! Semantic attribute data as resolved by the host compiler.

use std::iter::Peekable;
use std::str::Chars;

use crate::syntax::SyntaxNode;

/// Attribute bound to a member symbol, with constant argument values already evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeData {
    pub name: String,
    pub constructor_arguments: Vec<String>,
    pub named_arguments: Vec<(String, String)>,
}

impl AttributeData {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_argument(mut self, value: &str) -> Self {
        self.constructor_arguments.push(value.to_string());
        self
    }

    pub fn with_named_argument(mut self, key: &str, value: &str) -> Self {
        self.named_arguments
            .push((key.to_string(), value.to_string()));
        self
    }
}

/// Maps a declaration node to the attribute data attached to its symbol.
///
/// `None` means the host could not resolve a symbol for the node; the member
/// is then skipped.
pub trait SemanticModel: Sync {
    fn attributes(&self, node: &SyntaxNode) -> Option<Vec<AttributeData>>;
}

/// Semantic model that reads attribute arguments straight off the syntax.
///
/// Unnamed arguments become constructor arguments, `name = value` pairs become
/// named arguments. String literal values (regular and `@` verbatim) are
/// decoded to the text they denote.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxSemanticModel;

impl SemanticModel for SyntaxSemanticModel {
    fn attributes(&self, node: &SyntaxNode) -> Option<Vec<AttributeData>> {
        let attrs = node
            .attributes()
            .iter()
            .map(|attr| {
                let mut data = AttributeData::new(&attr.name);
                for arg in &attr.arguments {
                    let value = unquote(&arg.value);
                    match &arg.name {
                        Some(key) => data.named_arguments.push((key.clone(), value)),
                        None => data.constructor_arguments.push(value),
                    }
                }
                data
            })
            .collect();
        Some(attrs)
    }
}

impl<F> SemanticModel for F
where
    F: Fn(&SyntaxNode) -> Option<Vec<AttributeData>> + Sync,
{
    fn attributes(&self, node: &SyntaxNode) -> Option<Vec<AttributeData>> {
        self(node)
    }
}

fn unquote(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(body) = trimmed.strip_prefix("@\"").and_then(|r| r.strip_suffix('"')) {
        return body.replace("\"\"", "\"");
    }
    match trimmed.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        Some(body) => unescape(body),
        None => trimmed.to_string(),
    }
}

/// Decodes the escape sequences of a regular string literal body. Malformed
/// escapes are kept as written.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(kind) = chars.next() else {
            out.push('\\');
            break;
        };
        let simple = match kind {
            '\'' => Some('\''),
            '"' => Some('"'),
            '\\' => Some('\\'),
            '0' => Some('\0'),
            'a' => Some('\u{7}'),
            'b' => Some('\u{8}'),
            'f' => Some('\u{c}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\u{b}'),
            _ => None,
        };
        if let Some(decoded) = simple {
            out.push(decoded);
            continue;
        }
        let (min, max) = match kind {
            'u' => (4, 4),
            'U' => (8, 8),
            'x' => (1, 4),
            other => {
                out.push('\\');
                out.push(other);
                continue;
            }
        };
        let digits = take_hex(&mut chars, max);
        let decoded = (digits.len() >= min)
            .then(|| u32::from_str_radix(&digits, 16).ok())
            .flatten()
            .and_then(char::from_u32);
        match decoded {
            Some(ch) => out.push(ch),
            None => {
                out.push('\\');
                out.push(kind);
                out.push_str(&digits);
            }
        }
    }
    out
}

fn take_hex(chars: &mut Peekable<Chars<'_>>, max: usize) -> String {
    let mut digits = String::new();
    while digits.len() < max {
        match chars.peek() {
            Some(c) if c.is_ascii_hexdigit() => {
                digits.push(*c);
                chars.next();
            }
            _ => break,
        }
    }
    digits
}
