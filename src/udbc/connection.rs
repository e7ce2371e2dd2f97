use crate::error::DbError;
use crate::udbc::statement::Statement;
use crate::udbc::value::Value;
use crate::udbc::{ErrorInfo, ParamType};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

#[async_trait]
pub trait Connection: Send + Sync {
    // ---------- transaction ----------
    async fn begin(&self) -> Result<(), DbError>;
    async fn commit(&self) -> Result<(), DbError>;
    async fn rollback(&self) -> Result<(), DbError>;

    // ---------- diagnostics ----------
    async fn error_code(&self) -> Result<i32, DbError>;
    async fn error_info(&self) -> Result<ErrorInfo, DbError>;

    // ---------- statements ----------
    async fn prepare(&self, sql: &str) -> Result<Box<dyn Statement>, DbError>;

    async fn last_insert_id(&self, name: Option<&str>) -> Result<Value, DbError>;

    async fn quote(&self, value: &Value, hint: ParamType) -> Result<String, DbError>;

    /// Prepares and executes `sql` without parameters, returning the executed statement.
    async fn query(&self, sql: &str) -> Result<Box<dyn Statement>, DbError> {
        let stmt = self.prepare(sql).await?;
        stmt.execute(&[]).await?;
        Ok(stmt)
    }

    /// Executes `sql` without parameters and returns the affected row count.
    async fn exec(&self, sql: &str) -> Result<u64, DbError> {
        let start = Instant::now();
        let result = self.execute(sql, &[]).await;
        let elapsed_ms = start.elapsed().as_millis();
        let affected = result.as_ref().ok();
        let err = result.as_ref().err().map(|e| e.to_string());
        debug!(
            "exec: sql={}, elapsed_ms={}, affected={:?}, error={:?}",
            sql, elapsed_ms, affected, err
        );
        result
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64, DbError> {
        let stmt = self.prepare(sql).await?;
        stmt.execute(args).await?;
        stmt.row_count().await
    }

    async fn fetch_all(
        &self,
        sql: &str,
        args: &[Value],
    ) -> Result<Vec<HashMap<String, Value>>, DbError> {
        let stmt = self.prepare(sql).await?;
        stmt.execute(args).await?;
        stmt.fetch_all().await
    }
}
