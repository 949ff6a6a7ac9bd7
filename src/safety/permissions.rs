//! Role permission introspection.
//!
//! Wraps the role configuration with the queries the application layer needs:
//! permission levels, result caps, and human-readable summaries. The
//! validator performs its own lookups; this module exists for UI and audit
//! surfaces.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::config::SafetyConfig;

use super::QueryType;

/// Coarse permission tier for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    None,
    Read,
    Write,
    Admin,
}

impl PermissionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolved permissions for a single role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePermissions {
    pub role: String,
    pub allowed_operations: Vec<String>,
    pub max_results: usize,
    pub level: PermissionLevel,
}

/// Read-only view over the role configuration.
#[derive(Debug)]
pub struct PermissionManager {
    config: SafetyConfig,
}

impl PermissionManager {
    pub fn new(config: SafetyConfig) -> Self {
        Self { config }
    }

    /// Checks whether the role may run the given operation, with an audit
    /// log line for each check.
    pub fn check_operation(&self, role: &str, operation: QueryType) -> bool {
        let allowed = self
            .config
            .role(role)
            .map(|r| {
                r.allowed_operations
                    .iter()
                    .any(|op| op.eq_ignore_ascii_case(operation.as_str()))
            })
            .unwrap_or(false);

        info!(
            role,
            operation = %operation,
            result = allowed,
            "permission check"
        );
        allowed
    }

    /// Resolves the full permission set for a role.
    ///
    /// Unrecognized roles resolve through the same `"user"` fallback the
    /// validator uses; if even that is absent, the result is an empty
    /// read-level template.
    pub fn permissions(&self, role: &str) -> RolePermissions {
        match self.config.role(role) {
            Some(template) => RolePermissions {
                role: role.to_string(),
                allowed_operations: template.allowed_operations.clone(),
                max_results: template.max_results,
                level: self.level(role),
            },
            None => RolePermissions {
                role: role.to_string(),
                allowed_operations: Vec::new(),
                max_results: 100,
                level: PermissionLevel::Read,
            },
        }
    }

    /// Returns the permission tier for a role.
    pub fn level(&self, role: &str) -> PermissionLevel {
        match role {
            "viewer" => PermissionLevel::Read,
            "user" => PermissionLevel::Write,
            "admin" => PermissionLevel::Admin,
            _ => PermissionLevel::Read,
        }
    }

    /// Maximum result rows for a role. Conservative cap when the role table
    /// has no usable entry.
    pub fn max_results(&self, role: &str) -> usize {
        self.config.role(role).map(|r| r.max_results).unwrap_or(100)
    }

    /// Returns true if the role is configured explicitly (no fallback).
    pub fn is_known_role(&self, role: &str) -> bool {
        self.config.roles.contains_key(role)
    }

    /// All configured role names, sorted for stable output.
    pub fn available_roles(&self) -> Vec<String> {
        let mut roles: Vec<String> = self.config.roles.keys().cloned().collect();
        roles.sort();
        roles
    }

    /// Human-readable permission summary for display.
    pub fn summary(&self, role: &str) -> String {
        let permissions = self.permissions(role);
        format!(
            "Permission summary for role '{}':\n\
             - Allowed operations: {}\n\
             - Max results: {}\n\
             - Permission level: {}",
            permissions.role,
            if permissions.allowed_operations.is_empty() {
                "none".to_string()
            } else {
                permissions.allowed_operations.join(", ")
            },
            permissions.max_results,
            permissions.level,
        )
    }
}
