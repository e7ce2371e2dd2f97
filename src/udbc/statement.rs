use crate::error::DbError;
use crate::udbc::value::Value;
use async_trait::async_trait;
use std::collections::HashMap;

/// A prepared unit of SQL bound to one session.
///
/// Rows are returned as column name to [`Value`] maps, in the order the
/// server produces them.
#[async_trait]
pub trait Statement: Send + Sync {
    /// The source text this statement was prepared from.
    fn sql(&self) -> &str;

    /// Binds `params` positionally and executes the statement.
    async fn execute(&self, params: &[Value]) -> Result<(), DbError>;

    /// Rows affected by the last execution (rows produced, for queries).
    async fn row_count(&self) -> Result<u64, DbError>;

    /// Advances to the next row. `Ok(None)` once the result set is exhausted.
    async fn fetch(&self) -> Result<Option<HashMap<String, Value>>, DbError>;

    /// Advances to the next row and returns its column at `index`.
    async fn fetch_column(&self, index: usize) -> Result<Option<Value>, DbError>;

    async fn fetch_all(&self) -> Result<Vec<HashMap<String, Value>>, DbError> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetch().await? {
            rows.push(row);
        }
        Ok(rows)
    }
}
