//! Database abstraction layer for Sentinel.
//!
//! The execution layer is an external collaborator: it runs SQL that has
//! already passed validation and returns rows. Only the trait seam and a
//! mock backend live here; real drivers belong to the deployment, not to
//! this crate.

mod mock;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use types::{ColumnInfo, QueryResult, Row};

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the interface for database clients.
///
/// Callers must validate SQL before passing it in; implementations execute
/// what they are given.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a SQL query and returns the results.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}
