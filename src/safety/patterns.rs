//! Regex signature tables for the safety scanner.
//!
//! Patterns live in explicit, ordered tables so the denylist can be audited
//! and extended without touching the scanner's control flow. Dangerous
//! signatures reject a query outright; suspicious signatures only warn.

use regex::{Regex, RegexBuilder};

use crate::error::{Result, SentinelError};

/// A single regex signature with a short description for audit purposes.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    /// The regex source, reported back in rejection/warning messages.
    pub pattern: &'static str,
    /// What the signature catches.
    pub description: &'static str,
}

/// Signatures for classic injection and evasion techniques. Checked in
/// order; the first match rejects the query.
pub const DANGEROUS_PATTERNS: &[Signature] = &[
    Signature {
        pattern: r"--.*DROP",
        description: "DROP hidden in a line comment",
    },
    Signature {
        pattern: r"/\*.*DROP.*\*/",
        description: "DROP hidden in a block comment",
    },
    Signature {
        pattern: r";\s*DROP",
        description: "DROP chained after a statement terminator",
    },
    Signature {
        pattern: r"UNION.*SELECT.*FROM.*INFORMATION_SCHEMA",
        description: "UNION-based schema exfiltration",
    },
    Signature {
        pattern: r"EXEC\s*\(",
        description: "stored procedure execution",
    },
    Signature {
        pattern: r"EXECUTE\s*\(",
        description: "stored procedure execution",
    },
    Signature {
        pattern: r"SP_EXECUTESQL",
        description: "dynamic SQL execution",
    },
    Signature {
        pattern: r"XP_CMDSHELL",
        description: "OS command execution",
    },
    Signature {
        pattern: r"OPENROWSET",
        description: "external data access",
    },
    Signature {
        pattern: r"OPENDATASOURCE",
        description: "external data access",
    },
];

/// Signatures that merit a warning but not a rejection.
pub const SUSPICIOUS_PATTERNS: &[Signature] = &[
    Signature {
        pattern: r"WHERE\s+1\s*=\s*1",
        description: "tautological WHERE clause",
    },
    Signature {
        pattern: r"WHERE\s+.*\s+OR\s+.*\s*=\s*.*",
        description: "OR-based always-true condition",
    },
    Signature {
        pattern: r"UNION\s+SELECT",
        description: "UNION-based injection shape",
    },
    Signature {
        pattern: r"/\*.*\*/",
        description: "block comment that may hide content",
    },
];

/// Primary/foreign key reassignment shapes in UPDATE ... SET clauses. The
/// second shape matches an `_id` column anywhere in the assignment list, not
/// just the first position.
const PK_UPDATE_PATTERNS: &[&str] = &[r"SET\s+id\s*=", r"SET\s+.*\b\w*_id\s*="];

/// All signature tables, compiled once at validator construction.
#[derive(Debug)]
pub struct PatternSet {
    dangerous: Vec<(Regex, &'static Signature)>,
    suspicious: Vec<(Regex, &'static Signature)>,
    pk_update: Vec<Regex>,
    values_clause: Regex,
}

impl PatternSet {
    /// Compiles every signature table. Fails only if a table entry is not a
    /// valid regex, which indicates a broken build rather than bad input.
    pub fn compile() -> Result<Self> {
        let dangerous = DANGEROUS_PATTERNS
            .iter()
            .map(|sig| Ok((compile_signature(sig.pattern)?, sig)))
            .collect::<Result<Vec<_>>>()?;

        let suspicious = SUSPICIOUS_PATTERNS
            .iter()
            .map(|sig| Ok((compile_signature(sig.pattern)?, sig)))
            .collect::<Result<Vec<_>>>()?;

        let pk_update = PK_UPDATE_PATTERNS
            .iter()
            .map(|p| compile_signature(p))
            .collect::<Result<Vec<_>>>()?;

        let values_clause = compile_signature(r"VALUES\s*\(")?;

        Ok(Self {
            dangerous,
            suspicious,
            pk_update,
            values_clause,
        })
    }

    /// Returns the first dangerous signature matching the text, if any.
    pub fn find_dangerous(&self, text: &str) -> Option<&'static Signature> {
        self.dangerous
            .iter()
            .find(|(re, _)| re.is_match(text))
            .map(|(_, sig)| *sig)
    }

    /// Returns every suspicious signature matching the text, in table order.
    pub fn find_suspicious(&self, text: &str) -> Vec<&'static Signature> {
        self.suspicious
            .iter()
            .filter(|(re, _)| re.is_match(text))
            .map(|(_, sig)| *sig)
            .collect()
    }

    /// Returns true if the text reassigns an id-shaped column in a SET clause.
    pub fn updates_primary_key(&self, text: &str) -> bool {
        self.pk_update.iter().any(|re| re.is_match(text))
    }

    /// Returns true if the text contains a VALUES (...) clause.
    pub fn has_values_clause(&self, text: &str) -> bool {
        self.values_clause.is_match(text)
    }
}

fn compile_signature(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
        .map_err(|e| SentinelError::internal(format!("invalid signature '{pattern}': {e}")))
}
