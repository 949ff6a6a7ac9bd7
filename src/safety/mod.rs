//! Query safety validation module.
//!
//! Parses, classifies, permission-checks, and risk-scores SQL before it is
//! allowed to touch a live database. The validator is stateless per call and
//! holds only immutable configuration, so it is safe to share across threads.

mod patterns;
pub mod permissions;
mod validator;

pub use patterns::PatternSet;
pub use permissions::{PermissionLevel, PermissionManager, RolePermissions};
pub use validator::QueryValidator;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The recognized SQL statement categories, determined once per query from
/// its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Drop,
    Alter,
    Truncate,
    Grant,
    Revoke,
    Unknown,
}

impl QueryType {
    /// All classifiable types in prefix-match order. First match wins;
    /// UNKNOWN is the fallback and never matched by prefix.
    pub const CLASSIFIABLE: [QueryType; 10] = [
        Self::Select,
        Self::Insert,
        Self::Update,
        Self::Delete,
        Self::Create,
        Self::Drop,
        Self::Alter,
        Self::Truncate,
        Self::Grant,
        Self::Revoke,
    ];

    /// Returns the uppercase SQL keyword for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
            Self::Drop => "DROP",
            Self::Alter => "ALTER",
            Self::Truncate => "TRUNCATE",
            Self::Grant => "GRANT",
            Self::Revoke => "REVOKE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns true for data-modification statements that get the deep
    /// modification check (INSERT, UPDATE, DELETE).
    pub fn is_modification(&self) -> bool {
        matches!(self, Self::Insert | Self::Update | Self::Delete)
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered risk severity for impact estimation and confirmation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "NONE",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        };
        write!(f, "{s}")
    }
}

/// Coarse estimate of how many rows a query touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RowsAffected {
    None,
    Unknown,
    All,
}

impl fmt::Display for RowsAffected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "NONE",
            Self::Unknown => "UNKNOWN",
            Self::All => "ALL",
        };
        write!(f, "{s}")
    }
}

/// Outcome of a validation stage (or of the whole pipeline).
///
/// A value object: constructed once, never mutated. Warnings may be present
/// even when the result passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub is_valid: bool,
    /// Human-readable reason for failure; present only when invalid.
    pub error_message: Option<String>,
    /// Ordered, non-fatal advisory messages.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Creates a passing result with no warnings.
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error_message: None,
            warnings: Vec::new(),
        }
    }

    /// Creates a passing result carrying advisory warnings.
    pub fn ok_with_warnings(warnings: Vec<String>) -> Self {
        Self {
            is_valid: true,
            error_message: None,
            warnings,
        }
    }

    /// Creates a failing result with the given reason.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error_message: Some(message.into()),
            warnings: Vec::new(),
        }
    }

    /// Returns true if validation passed.
    pub fn is_ok(&self) -> bool {
        self.is_valid
    }
}

/// Risk metadata for a specific query, independent of whether it validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactEstimate {
    /// Classified statement type.
    pub query_type: QueryType,
    /// Overall risk severity.
    pub risk_level: RiskLevel,
    /// Coarse row-count estimate.
    pub estimated_rows_affected: RowsAffected,
    /// Whether the caller should require explicit confirmation.
    pub requires_confirmation: bool,
    /// False for operations whose effects cannot be undone.
    pub reversible: bool,
}
