//! LLM integration for Sentinel.
//!
//! The SQL generator is an external collaborator: given a business question
//! and the CRM context, it produces a raw SQL string. Everything it returns
//! goes through the safety validator before execution, so implementations
//! are trusted for usefulness, never for safety.

pub mod mock;
pub mod prompt;

pub use mock::MockLlmClient;
pub use prompt::build_prompt;

use async_trait::async_trait;
use std::str::FromStr;

use crate::error::{Result, SentinelError};

/// Trait for clients that turn natural-language questions into SQL.
///
/// Implementations must be thread-safe (Send + Sync) to support async
/// request handlers.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generates a raw SQL string for the given prompt.
    async fn generate_sql(&self, prompt: &str) -> Result<String>;
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// OpenAI (GPT-4 class models)
    OpenAi,
    /// Anthropic (Claude)
    Anthropic,
    /// Mock client for testing (no API key required)
    #[default]
    Mock,
}

impl LlmProvider {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown LLM provider: {s}")),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Creates an LLM client for the given provider.
///
/// Only the mock backend is bundled; the hosted providers live behind the
/// (out of scope) API deployment and are rejected here with a clear error.
pub fn create_client(provider: LlmProvider) -> Result<Box<dyn LlmClient>> {
    match provider {
        LlmProvider::Mock => Ok(Box::new(MockLlmClient::new())),
        other => Err(SentinelError::llm(format!(
            "Provider '{other}' is not bundled with this build; use 'mock'"
        ))),
    }
}
