use serde::Serialize;
use thiserror::Error;

use crate::syntax::SourceLocation;

// ═══════════════════════════════════════════════════════════════════════════════
// SKIP CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const SKIP_CONFLICTING_STRATEGIES: &str = "INJ001";
pub const SKIP_UNSUPPORTED_MEMBER: &str = "INJ002";
pub const SKIP_MULTIPLE_VARIABLES: &str = "INJ003";
pub const SKIP_UNRESOLVED_SYMBOL: &str = "INJ004";
pub const SKIP_NOT_ASSIGNABLE: &str = "INJ005";
pub const SKIP_NOT_PARTIAL: &str = "INJ006";

/// Why a declaration (or a whole unit) produced no output.
///
/// None of these abort generation; siblings keep generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    ConflictingStrategies,
    UnsupportedMemberKind,
    MultipleVariables,
    UnresolvedSymbol,
    NotAssignable,
    NotPartial,
}

impl SkipReason {
    pub fn code(self) -> &'static str {
        match self {
            SkipReason::ConflictingStrategies => SKIP_CONFLICTING_STRATEGIES,
            SkipReason::UnsupportedMemberKind => SKIP_UNSUPPORTED_MEMBER,
            SkipReason::MultipleVariables => SKIP_MULTIPLE_VARIABLES,
            SkipReason::UnresolvedSymbol => SKIP_UNRESOLVED_SYMBOL,
            SkipReason::NotAssignable => SKIP_NOT_ASSIGNABLE,
            SkipReason::NotPartial => SKIP_NOT_PARTIAL,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            SkipReason::ConflictingStrategies => {
                "More than one lookup strategy marker on a single member."
            }
            SkipReason::UnsupportedMemberKind => "Only fields and properties can be injected.",
            SkipReason::MultipleVariables => "Injected fields must declare exactly one variable.",
            SkipReason::UnresolvedSymbol => "The semantic model returned no symbol for the member.",
            SkipReason::NotAssignable => "Member is const, readonly or has no setter.",
            SkipReason::NotPartial => "Enclosing type or one of its containing types is not declared partial.",
        }
    }
}

/// A skipped declaration or unit, as reported back to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Skipped {
    pub code: &'static str,
    pub reason: SkipReason,
    pub type_name: String,
    pub member: Option<String>,
    pub file: String,
    pub location: SourceLocation,
}

impl Skipped {
    pub fn member(
        reason: SkipReason,
        type_name: &str,
        member: &str,
        file: &str,
        location: SourceLocation,
    ) -> Self {
        Self {
            code: reason.code(),
            reason,
            type_name: type_name.to_string(),
            member: Some(member.to_string()),
            file: file.to_string(),
            location,
        }
    }

    pub fn unit(reason: SkipReason, type_name: &str, file: &str, location: SourceLocation) -> Self {
        Self {
            code: reason.code(),
            reason,
            type_name: type_name.to_string(),
            member: None,
            file: file.to_string(),
            location,
        }
    }

    /// One-line diagnostic text, the format written to the diagnostic sink.
    pub fn message(&self) -> String {
        let target = match &self.member {
            Some(member) => format!("{}.{}", self.type_name, member),
            None => self.type_name.clone(),
        };
        format!(
            "[{}] skipped {} ({}:{}:{}): {}",
            self.code,
            target,
            self.file,
            self.location.line,
            self.location.column,
            self.reason.describe()
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GENERATOR ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors that stop a whole generation pass. Everything local is a [`Skipped`].
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Invalid input document: {0}")]
    InvalidInput(#[from] serde_json::Error),

    #[error("Generation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
