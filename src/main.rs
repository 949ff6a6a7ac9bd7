//! Sentinel - natural-language SQL assistant with a safety validation engine.

use anyhow::Context;
use tracing::error;

use db_sentinel::app::QueryService;
use db_sentinel::cli::{Cli, Command};
use db_sentinel::config::Config;
use db_sentinel::db::MockDatabaseClient;
use db_sentinel::llm::{create_client, LlmProvider};
use db_sentinel::logging;
use db_sentinel::safety::{PermissionManager, QueryValidator};

#[tokio::main]
async fn main() {
    logging::init_stderr_logging();

    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{e:#}");
            std::process::exit(1);
        }
    }
}

async fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse_args();
    let config = Config::load_from_file(&cli.config_path()).context("loading configuration")?;

    match &cli.command {
        Command::Validate { sql } => {
            let validator = QueryValidator::new(config.safety.clone())?;
            let result = validator.validate(sql, &cli.role);
            for warning in &result.warnings {
                println!("warning: {warning}");
            }
            if result.is_ok() {
                println!("valid");
                Ok(0)
            } else {
                println!(
                    "rejected: {}",
                    result.error_message.as_deref().unwrap_or("unknown reason")
                );
                Ok(2)
            }
        }
        Command::Impact { sql } => {
            let validator = QueryValidator::new(config.safety.clone())?;
            let impact = validator.estimate_impact(sql);
            println!("{}", serde_json::to_string_pretty(&impact)?);
            Ok(0)
        }
        Command::Suggest { sql } => {
            let validator = QueryValidator::new(config.safety.clone())?;
            let suggestions = validator.suggestions(sql);
            if suggestions.is_empty() {
                println!("no suggestions");
            }
            for suggestion in suggestions {
                println!("- {suggestion}");
            }
            Ok(0)
        }
        Command::Permissions { name } => {
            let manager = PermissionManager::new(config.safety.clone());
            let role = name.as_deref().unwrap_or(&cli.role);
            println!("{}", manager.summary(role));
            Ok(0)
        }
        Command::Ask { question } => {
            let provider: LlmProvider = config
                .llm
                .provider
                .parse()
                .map_err(anyhow::Error::msg)
                .context("resolving LLM provider")?;
            let llm = create_client(provider)?;
            let service =
                QueryService::new(config, llm, Box::new(MockDatabaseClient::new()))?;

            let outcome = service.ask(question, &cli.role).await?;
            println!("sql: {}", outcome.sql);

            if !outcome.validation.is_ok() {
                println!(
                    "rejected: {}",
                    outcome
                        .validation
                        .error_message
                        .as_deref()
                        .unwrap_or("unknown reason")
                );
                return Ok(2);
            }
            for warning in &outcome.validation.warnings {
                println!("warning: {warning}");
            }
            println!(
                "risk: {} (rows: {}, confirmation: {})",
                outcome.impact.risk_level,
                outcome.impact.estimated_rows_affected,
                outcome.impact.requires_confirmation
            );
            for suggestion in &outcome.suggestions {
                println!("suggestion: {suggestion}");
            }
            match outcome.result {
                Some(result) => println!("rows returned: {}", result.row_count),
                None => println!("not executed: confirmation required"),
            }
            Ok(0)
        }
    }
}
