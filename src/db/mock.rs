//! Mock database clients for testing.

use async_trait::async_trait;
use serde_json::json;

use crate::db::{ColumnInfo, DatabaseClient, QueryResult};
use crate::error::{Result, SentinelError};

/// In-memory database client returning canned CRM rows.
#[derive(Debug, Clone, Default)]
pub struct MockDatabaseClient;

impl MockDatabaseClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let upper = sql.to_uppercase();

        if upper.contains("COUNT") {
            return Ok(QueryResult::with_data(
                vec![ColumnInfo::new("count", "integer")],
                vec![vec![json!(42)]],
            ));
        }

        if upper.contains("CUSTOMERS") {
            return Ok(QueryResult::with_data(
                vec![
                    ColumnInfo::new("id", "integer"),
                    ColumnInfo::new("name", "text"),
                    ColumnInfo::new("city", "text"),
                ],
                vec![
                    vec![json!(1), json!("Atelier graphique"), json!("Nantes")],
                    vec![json!(2), json!("Signal Gift Stores"), json!("Las Vegas")],
                ],
            ));
        }

        Ok(QueryResult::with_data(
            vec![ColumnInfo::new("result", "integer")],
            vec![vec![json!(1)]],
        ))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Database client whose every call fails, for error-path tests.
#[derive(Debug, Clone, Default)]
pub struct FailingDatabaseClient;

impl FailingDatabaseClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(SentinelError::query("mock execution failure"))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
