//! Prompt construction for LLM requests.
//!
//! Builds the generation prompt from the CRM business context and the
//! user's question.

use crate::config::CrmContext;

/// Prompt template for the SQL assistant.
const PROMPT_TEMPLATE: &str = r#"You are a SQL assistant for a CRM database.

BUSINESS CONTEXT:
{description}

TABLES:
{tables}

INSTRUCTIONS:
- Generate only a single valid SQL statement
- Return ONLY the SQL query, no explanations
- Limit results to 100 rows unless the question specifies otherwise
- Never generate DROP, TRUNCATE, or other destructive operations

QUESTION:
{question}"#;

/// Builds the generation prompt for a question.
///
/// Tables are listed in sorted order so prompts are stable across runs.
pub fn build_prompt(context: &CrmContext, question: &str) -> String {
    let mut tables: Vec<(&String, &String)> = context.tables.iter().collect();
    tables.sort_by_key(|(name, _)| name.as_str());

    let table_lines = tables
        .iter()
        .map(|(name, description)| format!("- {name}: {description}"))
        .collect::<Vec<_>>()
        .join("\n");

    PROMPT_TEMPLATE
        .replace("{description}", &context.description)
        .replace("{tables}", &table_lines)
        .replace("{question}", question)
}
