//! Configuration management for Sentinel.
//!
//! Handles loading configuration from TOML files, covering the safety policy
//! (roles, forbidden keywords, confirmation rules), LLM provider settings,
//! and the CRM business context used for prompt assembly.

use crate::error::{Result, SentinelError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main configuration structure for Sentinel.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM provider configuration.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Safety policy configuration.
    #[serde(default)]
    pub safety: SafetyConfig,

    /// CRM business context used when assembling prompts.
    #[serde(default)]
    pub crm: CrmContext,
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// LLM provider: "openai", "anthropic", or "mock".
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name (e.g., "gpt-4o", "claude-3-5-sonnet-latest").
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_provider() -> String {
    "mock".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
        }
    }
}

/// Safety policy configuration consumed by the query validator.
///
/// Immutable after load; validators take a clone at construction and never
/// mutate or reload it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Keywords whose presence anywhere in a query blocks execution.
    #[serde(default = "default_forbidden_keywords")]
    pub forbidden_keywords: Vec<String>,

    /// Operations that always require user confirmation before execution.
    #[serde(default = "default_require_confirmation")]
    pub require_confirmation: Vec<String>,

    /// Queries longer than this are rejected before any parsing.
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,

    /// Role name to permission template.
    #[serde(default = "default_roles")]
    pub roles: HashMap<String, RoleConfig>,
}

/// Permission template for a single role.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RoleConfig {
    /// SQL operations this role may execute (e.g., "SELECT", "INSERT").
    #[serde(default)]
    pub allowed_operations: Vec<String>,

    /// Maximum number of result rows returned to this role.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_forbidden_keywords() -> Vec<String> {
    [
        "DROP",
        "EXEC",
        "EXECUTE",
        "SP_EXECUTESQL",
        "XP_CMDSHELL",
        "OPENROWSET",
        "OPENDATASOURCE",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_require_confirmation() -> Vec<String> {
    ["INSERT", "UPDATE", "DELETE", "DROP", "TRUNCATE"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_query_length() -> usize {
    10_000
}

fn default_max_results() -> usize {
    1000
}

fn default_roles() -> HashMap<String, RoleConfig> {
    let mut roles = HashMap::new();
    roles.insert(
        "viewer".to_string(),
        RoleConfig {
            allowed_operations: vec!["SELECT".to_string()],
            max_results: 100,
        },
    );
    roles.insert(
        "user".to_string(),
        RoleConfig {
            allowed_operations: ["SELECT", "INSERT", "UPDATE", "DELETE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_results: 1000,
        },
    );
    roles.insert(
        "admin".to_string(),
        RoleConfig {
            allowed_operations: ["SELECT", "INSERT", "UPDATE", "DELETE", "DROP", "TRUNCATE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_results: 10_000,
        },
    );
    roles
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            forbidden_keywords: default_forbidden_keywords(),
            require_confirmation: default_require_confirmation(),
            max_query_length: default_max_query_length(),
            roles: default_roles(),
        }
    }
}

impl SafetyConfig {
    /// Looks up a role's permission template, falling back to the `"user"`
    /// template for unrecognized roles.
    ///
    /// Unknown roles get the least-trusted standard template rather than
    /// full access. Returns None only when the fallback role is also absent
    /// (possible with override configs), which callers treat as deny-all.
    pub fn role(&self, name: &str) -> Option<&RoleConfig> {
        self.roles.get(name).or_else(|| self.roles.get("user"))
    }

    /// Returns true if the named operation requires confirmation.
    pub fn needs_confirmation(&self, operation: &str) -> bool {
        self.require_confirmation
            .iter()
            .any(|op| op.eq_ignore_ascii_case(operation))
    }
}

/// Business context for the CRM schema, used by the prompt builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmContext {
    /// One-line description of the system.
    #[serde(default = "default_crm_description")]
    pub description: String,

    /// Table name to human description.
    #[serde(default = "default_crm_tables")]
    pub tables: HashMap<String, String>,
}

fn default_crm_description() -> String {
    "Customer Relationship Management system for tracking customers, orders, \
     employees, products, offices, and payments."
        .to_string()
}

fn default_crm_tables() -> HashMap<String, String> {
    [
        ("customers", "Customer information and contact details"),
        ("orders", "Customer purchase orders"),
        ("employees", "Company staff and sales representatives"),
        ("products", "Product catalog and inventory"),
        ("offices", "Company office locations"),
        ("payments", "Customer payment records"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for CrmContext {
    fn default() -> Self {
        Self {
            description: default_crm_description(),
            tables: default_crm_tables(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sentinel")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SentinelError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            SentinelError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
