//! Mock LLM client for testing.
//!
//! Provides deterministic SQL responses based on input patterns, so the
//! full question-to-verdict pipeline can be exercised without API calls.

use async_trait::async_trait;

use crate::error::Result;
use crate::llm::LlmClient;

/// Mock LLM client that returns canned SQL based on input patterns.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> SQL).
    custom_responses: Vec<(String, String)>,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the input contains `pattern`, the mock will return `sql`.
    pub fn with_response(mut self, pattern: impl Into<String>, sql: impl Into<String>) -> Self {
        self.custom_responses.push((pattern.into(), sql.into()));
        self
    }

    fn mock_sql(&self, input: &str) -> String {
        // Prompts embed the table catalog, so match against the question
        // section only; raw questions pass through unchanged.
        let question = input.rsplit("QUESTION:").next().unwrap_or(input);
        let question_lower = question.to_lowercase();

        for (pattern, sql) in &self.custom_responses {
            if question_lower.contains(&pattern.to_lowercase()) {
                return sql.clone();
            }
        }

        if question_lower.contains("delete") {
            return "DELETE FROM customers WHERE id = 1;".to_string();
        }

        if (question_lower.contains("count") || question_lower.contains("how many"))
            && question_lower.contains("order")
        {
            return "SELECT COUNT(*) FROM orders;".to_string();
        }

        if question_lower.contains("customer") && question_lower.contains("payment") {
            return "SELECT c.name, p.amount FROM customers c \
                    JOIN payments p ON c.id = p.customer_id ORDER BY p.amount DESC LIMIT 100;"
                .to_string();
        }

        if question_lower.contains("customer") {
            return "SELECT * FROM customers LIMIT 100;".to_string();
        }

        if question_lower.contains("employee") {
            return "SELECT * FROM employees LIMIT 100;".to_string();
        }

        "SELECT 1;".to_string()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate_sql(&self, prompt: &str) -> Result<String> {
        Ok(self.mock_sql(prompt))
    }
}
