//! Marker analysis: turns raw attribute names into a closed [`MarkerSet`] and
//! pulls strategy parameters out of the semantic attribute data.
//!
//! Everything downstream of this module works on the enums only and never
//! looks at marker text again.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::error::SkipReason;
use crate::semantic::AttributeData;
use crate::syntax::{AttributeSyntax, SyntaxNode};

// ═══════════════════════════════════════════════════════════════════════════════
// MARKER VOCABULARY
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Get,
    GetByName,
    GetByTag,
    GetInAssets,
    GetInChildren,
    GetInParent,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::Get,
        Strategy::GetByName,
        Strategy::GetByTag,
        Strategy::GetInAssets,
        Strategy::GetInChildren,
        Strategy::GetInParent,
    ];

    pub fn marker_name(self) -> &'static str {
        match self {
            Strategy::Get => "get",
            Strategy::GetByName => "get-by-name",
            Strategy::GetByTag => "get-by-tag",
            Strategy::GetInAssets => "get-in-assets",
            Strategy::GetInChildren => "get-in-children",
            Strategy::GetInParent => "get-in-parent",
        }
    }

    /// Named-argument key consulted when the marker has no positional argument.
    pub fn parameter_name(self) -> Option<&'static str> {
        match self {
            Strategy::GetByName | Strategy::GetInAssets => Some("name"),
            Strategy::GetByTag => Some("tag"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    IgnoreSelf,
    SkipNullCheck,
    IncludeInactive,
    InjectInPlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Strategy(Strategy),
    Modifier(Modifier),
}

lazy_static! {
    /// Canonical (separator-free, lowercase) marker spellings.
    static ref MARKERS: HashMap<&'static str, Marker> = {
        let mut m = HashMap::new();
        m.insert("get", Marker::Strategy(Strategy::Get));
        m.insert("getbyname", Marker::Strategy(Strategy::GetByName));
        m.insert("getbytag", Marker::Strategy(Strategy::GetByTag));
        m.insert("getinassets", Marker::Strategy(Strategy::GetInAssets));
        m.insert("getinchildren", Marker::Strategy(Strategy::GetInChildren));
        m.insert("getinparent", Marker::Strategy(Strategy::GetInParent));
        m.insert("ignoreself", Marker::Modifier(Modifier::IgnoreSelf));
        m.insert("skipnullcheck", Marker::Modifier(Modifier::SkipNullCheck));
        m.insert("includeinactive", Marker::Modifier(Modifier::IncludeInactive));
        m.insert("injectinplay", Marker::Modifier(Modifier::InjectInPlay));
        m
    };
}

/// Canonical key for a marker spelling: trimmed, lowercased, `-`/`_` removed
/// and a trailing `Attribute` suffix dropped.
fn canonical(name: &str) -> String {
    let key: String = name
        .trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect();
    match key.strip_suffix("attribute") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => key,
    }
}

impl Marker {
    pub fn parse(name: &str) -> Option<Marker> {
        MARKERS.get(canonical(name).as_str()).copied()
    }
}

pub fn parse_strategy(name: &str) -> Option<Strategy> {
    match Marker::parse(name) {
        Some(Marker::Strategy(s)) => Some(s),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MARKER SET
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ignore_self: bool,
    pub skip_null_check: bool,
    pub include_inactive: bool,
    pub inject_in_play: bool,
}

impl Modifiers {
    fn set(&mut self, modifier: Modifier) {
        match modifier {
            Modifier::IgnoreSelf => self.ignore_self = true,
            Modifier::SkipNullCheck => self.skip_null_check = true,
            Modifier::IncludeInactive => self.include_inactive = true,
            Modifier::InjectInPlay => self.inject_in_play = true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerSet {
    pub strategy: Strategy,
    pub modifiers: Modifiers,
}

/// Builds the marker set of one member.
///
/// `Ok(None)` when no strategy marker is present (not a candidate). Two
/// different strategies on one member is a conflict; the same strategy spelled
/// twice counts once.
pub fn analyze_markers(attributes: &[AttributeSyntax]) -> Result<Option<MarkerSet>, SkipReason> {
    let mut strategy: Option<Strategy> = None;
    let mut modifiers = Modifiers::default();

    for attr in attributes {
        match Marker::parse(&attr.name) {
            Some(Marker::Strategy(s)) => match strategy {
                Some(existing) if existing != s => return Err(SkipReason::ConflictingStrategies),
                _ => strategy = Some(s),
            },
            Some(Marker::Modifier(m)) => modifiers.set(m),
            None => {}
        }
    }

    Ok(strategy.map(|strategy| MarkerSet {
        strategy,
        modifiers,
    }))
}

// ═══════════════════════════════════════════════════════════════════════════════
// MEMBER SIGNATURE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSignature {
    pub type_text: String,
    pub name: String,
}

/// Declared type text and member name of a field or property node.
pub fn member_signature(node: &SyntaxNode) -> Result<MemberSignature, SkipReason> {
    match node {
        SyntaxNode::Field(field) => {
            if field.variables.len() != 1 {
                return Err(SkipReason::MultipleVariables);
            }
            if field
                .modifiers
                .iter()
                .any(|m| matches!(m.trim(), "const" | "readonly"))
            {
                return Err(SkipReason::NotAssignable);
            }
            Ok(MemberSignature {
                type_text: field.type_text.trim().to_string(),
                name: field.variables[0].trim().to_string(),
            })
        }
        SyntaxNode::Property(prop) => {
            if !prop.has_setter {
                return Err(SkipReason::NotAssignable);
            }
            Ok(MemberSignature {
                type_text: prop.type_text.trim().to_string(),
                name: prop.name.trim().to_string(),
            })
        }
        _ => Err(SkipReason::UnsupportedMemberKind),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STRATEGY PARAMETERS
// ═══════════════════════════════════════════════════════════════════════════════

fn find_attribute(attributes: &[AttributeData], strategy: Strategy) -> Option<&AttributeData> {
    attributes
        .iter()
        .find(|attr| parse_strategy(&attr.name) == Some(strategy))
}

/// First constructor argument of the strategy's attribute.
///
/// Named-only attributes yield nothing here even when named arguments exist.
pub fn positional_argument(attributes: &[AttributeData], strategy: Strategy) -> Option<String> {
    find_attribute(attributes, strategy)?
        .constructor_arguments
        .first()
        .cloned()
}

/// Literal parameter of a strategy marker.
///
/// The first positional argument wins. Named arguments are only scanned when
/// the attribute has no positional argument at all, matching on the trimmed
/// key.
pub fn strategy_parameter(
    attributes: &[AttributeData],
    strategy: Strategy,
    parameter: &str,
) -> Option<String> {
    if let Some(first) = positional_argument(attributes, strategy) {
        return Some(first);
    }
    find_attribute(attributes, strategy)?
        .named_arguments
        .iter()
        .find(|(key, _)| key.trim() == parameter.trim())
        .map(|(_, value)| value.clone())
}
