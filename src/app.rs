//! The question-to-result pipeline.
//!
//! Glues the external collaborators together: the LLM generates SQL, the
//! safety validator vets it, and only validated queries that need no
//! confirmation reach the database. Queries requiring confirmation are
//! returned unexecuted so the caller can ask the user first.

use tracing::info;

use crate::config::Config;
use crate::db::{DatabaseClient, QueryResult};
use crate::error::Result;
use crate::llm::{build_prompt, LlmClient};
use crate::safety::{
    ImpactEstimate, PermissionManager, QueryValidator, ValidationResult,
};

/// Everything the application layer needs to present one answered question.
#[derive(Debug)]
pub struct QueryOutcome {
    /// The SQL the LLM produced.
    pub sql: String,
    /// Verdict of the validation pipeline.
    pub validation: ValidationResult,
    /// Risk metadata, present regardless of the verdict.
    pub impact: ImpactEstimate,
    /// Advisory improvement suggestions.
    pub suggestions: Vec<String>,
    /// Rows, when the query was executed. None if validation failed or
    /// confirmation is required.
    pub result: Option<QueryResult>,
}

/// Orchestrates question answering over the LLM/validator/database seams.
pub struct QueryService {
    config: Config,
    validator: QueryValidator,
    permissions: PermissionManager,
    llm: Box<dyn LlmClient>,
    db: Box<dyn DatabaseClient>,
}

impl QueryService {
    /// Creates a service over the given collaborators.
    pub fn new(config: Config, llm: Box<dyn LlmClient>, db: Box<dyn DatabaseClient>) -> Result<Self> {
        let validator = QueryValidator::new(config.safety.clone())?;
        let permissions = PermissionManager::new(config.safety.clone());
        Ok(Self {
            config,
            validator,
            permissions,
            llm,
            db,
        })
    }

    /// Answers a natural-language question for the given role.
    ///
    /// Generated SQL that fails validation, or that requires confirmation,
    /// is returned without touching the database.
    pub async fn ask(&self, question: &str, role: &str) -> Result<QueryOutcome> {
        let prompt = build_prompt(&self.config.crm, question);
        let sql = self.llm.generate_sql(&prompt).await?;
        info!(role, sql = %sql, "generated SQL");

        let validation = self.validator.validate(&sql, role);
        let impact = self.validator.estimate_impact(&sql);
        let suggestions = self.validator.suggestions(&sql);

        let result = if validation.is_ok() && !impact.requires_confirmation {
            Some(self.execute(&sql, role).await?)
        } else {
            None
        };

        Ok(QueryOutcome {
            sql,
            validation,
            impact,
            suggestions,
            result,
        })
    }

    /// Executes SQL the user has already confirmed.
    ///
    /// Re-validates first: confirmation does not bypass the safety pipeline.
    pub async fn execute_confirmed(&self, sql: &str, role: &str) -> Result<QueryOutcome> {
        let validation = self.validator.validate(sql, role);
        let impact = self.validator.estimate_impact(sql);
        let suggestions = self.validator.suggestions(sql);

        let result = if validation.is_ok() {
            Some(self.execute(sql, role).await?)
        } else {
            None
        };

        Ok(QueryOutcome {
            sql: sql.to_string(),
            validation,
            impact,
            suggestions,
            result,
        })
    }

    /// Access to the validator for impact/suggestion display.
    pub fn validator(&self) -> &QueryValidator {
        &self.validator
    }

    /// Access to role introspection.
    pub fn permissions(&self) -> &PermissionManager {
        &self.permissions
    }

    async fn execute(&self, sql: &str, role: &str) -> Result<QueryResult> {
        let max_rows = self.permissions.max_results(role);
        Ok(self.db.execute_query(sql).await?.truncate_to(max_rows))
    }
}
