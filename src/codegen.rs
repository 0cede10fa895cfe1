//! Codegen module for the injection generator
//!
//! Turns one resolved declaration into a fragment: a lookup expression, the
//! assignment into the member, and an optional guard statement. Fragments are
//! typed values; text only appears when [`Fragment::lines`] renders them.

use crate::analyzer::{MarkerSet, MemberSignature, Strategy};
use crate::shape::Shape;

// ═══════════════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything the emitter needs about one member, already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub type_name: String,
    pub member: MemberSignature,
    pub shape: Shape,
    pub markers: MarkerSet,
    pub parameter: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOOKUP EXPRESSIONS
// ═══════════════════════════════════════════════════════════════════════════════

const UNITY_OBJECT: &str = "UnityEngine.Object";
const RESOURCES: &str = "Resources";
const NOT_SELF: &str = "c => c.gameObject != gameObject";

/// What a lookup expression evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Yields {
    Single,
    Array,
    /// Lazy sequence, needs materializing before assignment.
    Sequence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Call {
    receiver: Option<&'static str>,
    method: &'static str,
    type_argument: String,
    arguments: Vec<String>,
}

impl Call {
    fn new(method: &'static str, type_argument: &str) -> Self {
        Self {
            receiver: None,
            method,
            type_argument: type_argument.to_string(),
            arguments: Vec::new(),
        }
    }

    fn on(mut self, receiver: &'static str) -> Self {
        self.receiver = Some(receiver);
        self
    }

    fn arg(mut self, argument: String) -> Self {
        self.arguments.push(argument);
        self
    }

    fn render(&self) -> String {
        let mut out = String::new();
        if let Some(receiver) = self.receiver {
            out.push_str(receiver);
            out.push('.');
        }
        out.push_str(self.method);
        out.push('<');
        out.push_str(&self.type_argument);
        out.push_str(">(");
        out.push_str(&self.arguments.join(", "));
        out.push(')');
        out
    }
}

/// A trailing LINQ operator applied to a call result.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Operator {
    method: &'static str,
    predicate: Option<String>,
}

impl Operator {
    fn first(predicate: Option<String>) -> Self {
        Self {
            method: "FirstOrDefault",
            predicate,
        }
    }

    fn filter(predicate: String) -> Self {
        Self {
            method: "Where",
            predicate: Some(predicate),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    call: Call,
    operator: Option<Operator>,
    pub yields: Yields,
}

impl Lookup {
    fn direct(call: Call, yields: Yields) -> Self {
        Self {
            call,
            operator: None,
            yields,
        }
    }

    fn then(call: Call, operator: Operator) -> Self {
        let yields = if operator.method == "Where" {
            Yields::Sequence
        } else {
            Yields::Single
        };
        Self {
            call,
            operator: Some(operator),
            yields,
        }
    }

    pub fn render(&self) -> String {
        let mut out = self.call.render();
        if let Some(op) = &self.operator {
            out.push('.');
            out.push_str(op.method);
            out.push('(');
            if let Some(predicate) = &op.predicate {
                out.push_str(predicate);
            }
            out.push(')');
        }
        out
    }
}

/// Escaped C# string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn bool_literal(value: bool) -> String {
    let literal = if value { "true" } else { "false" };
    literal.to_string()
}

/// Lookup expression for a declaration. `target` is the declared type for
/// scalar members and the element type for arrays and collections.
pub fn build_lookup(decl: &Declaration, target: &str) -> Lookup {
    let many = decl.shape.is_many();
    let mods = decl.markers.modifiers;
    let inactive = bool_literal(mods.include_inactive);

    match decl.markers.strategy {
        Strategy::Get => {
            if many {
                Lookup::direct(Call::new("GetComponents", target), Yields::Array)
            } else {
                Lookup::direct(Call::new("GetComponent", target), Yields::Single)
            }
        }
        Strategy::GetInChildren => match (many, mods.ignore_self) {
            (false, false) => Lookup::direct(
                Call::new("GetComponentInChildren", target).arg(inactive),
                Yields::Single,
            ),
            (false, true) => Lookup::then(
                Call::new("GetComponentsInChildren", target).arg(inactive),
                Operator::first(Some(NOT_SELF.to_string())),
            ),
            (true, false) => Lookup::direct(
                Call::new("GetComponentsInChildren", target).arg(inactive),
                Yields::Array,
            ),
            (true, true) => Lookup::then(
                Call::new("GetComponentsInChildren", target).arg(inactive),
                Operator::filter(NOT_SELF.to_string()),
            ),
        },
        Strategy::GetInParent => {
            if many {
                Lookup::direct(
                    Call::new("GetComponentsInParent", target).arg(inactive),
                    Yields::Array,
                )
            } else {
                Lookup::direct(
                    Call::new("GetComponentInParent", target).arg(inactive),
                    Yields::Single,
                )
            }
        }
        Strategy::GetByName => {
            let name = decl
                .parameter
                .clone()
                .unwrap_or_else(|| decl.member.name.clone());
            let predicate = format!("c => c.name == {}", string_literal(&name));
            let call = Call::new("FindObjectsOfType", target).on(UNITY_OBJECT);
            if many {
                Lookup::then(call, Operator::filter(predicate))
            } else {
                Lookup::then(call, Operator::first(Some(predicate)))
            }
        }
        Strategy::GetByTag => match &decl.parameter {
            Some(tag) => {
                let predicate = format!("c => c.CompareTag({})", string_literal(tag));
                let call = Call::new("FindObjectsOfType", target).on(UNITY_OBJECT);
                if many {
                    Lookup::then(call, Operator::filter(predicate))
                } else {
                    Lookup::then(call, Operator::first(Some(predicate)))
                }
            }
            None => {
                if many {
                    Lookup::direct(
                        Call::new("FindObjectsOfType", target).on(UNITY_OBJECT),
                        Yields::Array,
                    )
                } else {
                    Lookup::direct(
                        Call::new("FindObjectOfType", target).on(UNITY_OBJECT),
                        Yields::Single,
                    )
                }
            }
        },
        Strategy::GetInAssets => match &decl.parameter {
            Some(name) => {
                if many {
                    Lookup::direct(
                        Call::new("LoadAll", target)
                            .on(RESOURCES)
                            .arg(string_literal(name)),
                        Yields::Array,
                    )
                } else {
                    Lookup::direct(
                        Call::new("Load", target)
                            .on(RESOURCES)
                            .arg(string_literal(name)),
                        Yields::Single,
                    )
                }
            }
            None => {
                let call = Call::new("FindObjectsOfTypeAll", target).on(RESOURCES);
                if many {
                    Lookup::direct(call, Yields::Array)
                } else {
                    Lookup::then(call, Operator::first(None))
                }
            }
        },
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FRAGMENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Post-lookup check that logs when nothing was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    member: String,
    /// `Length` for arrays, `Count` for collections.
    count_property: Option<&'static str>,
    message: String,
}

impl Guard {
    pub fn render(&self) -> String {
        let condition = match self.count_property {
            Some(count) => format!(
                "{m} == null || {m}.{count} == 0",
                m = self.member,
                count = count
            ),
            None => format!("{} == null", self.member),
        };
        format!(
            "if ({}) UnityEngine.Debug.LogError({}, this);",
            condition,
            string_literal(&self.message)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub member: String,
    pub value: String,
    pub guard: Option<Guard>,
    /// Requests the deferred hook for the whole unit.
    pub inject_in_play: bool,
}

impl Fragment {
    /// Statements of the fragment, unindented.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("{} = {};", self.member, self.value)];
        if let Some(guard) = &self.guard {
            lines.push(guard.render());
        }
        lines
    }
}

/// Emits the fragment for one declaration.
pub fn emit_fragment(decl: &Declaration) -> Fragment {
    let target = decl
        .shape
        .element_type()
        .unwrap_or(&decl.member.type_text)
        .to_string();
    let lookup = build_lookup(decl, &target);

    let mut value = lookup.render();
    match (&decl.shape, lookup.yields) {
        (Shape::Array(_), Yields::Sequence) => value.push_str(".ToArray()"),
        (Shape::Collection(_), _) => value.push_str(".ToList()"),
        _ => {}
    }

    let guard = if decl.markers.modifiers.skip_null_check {
        None
    } else {
        Some(Guard {
            member: decl.member.name.clone(),
            count_property: match decl.shape {
                Shape::Scalar => None,
                Shape::Array(_) => Some("Length"),
                Shape::Collection(_) => Some("Count"),
            },
            message: format!(
                "{}.{}: no {} found ({})",
                decl.type_name,
                decl.member.name,
                target,
                decl.markers.strategy.marker_name()
            ),
        })
    };

    Fragment {
        member: decl.member.name.clone(),
        value,
        guard,
        inject_in_play: decl.markers.modifiers.inject_in_play,
    }
}
