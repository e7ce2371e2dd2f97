use crate::error::DbError;
use crate::udbc::connection::Connection;
use crate::udbc::value::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Scoped manual-commit transaction on one connection.
///
/// Dropping it before [`commit`](Self::commit) or [`rollback`](Self::rollback)
/// schedules a rollback on the current runtime.
pub struct TransactionContext {
    conn: Arc<dyn Connection>,
    finished: bool,
}

impl TransactionContext {
    pub async fn begin(conn: Arc<dyn Connection>) -> Result<Self, DbError> {
        conn.begin().await?;
        Ok(Self {
            conn,
            finished: false,
        })
    }

    pub async fn commit(&mut self) -> Result<(), DbError> {
        let r = self.conn.commit().await;
        self.finish(&r);
        r
    }

    pub async fn rollback(&mut self) -> Result<(), DbError> {
        let r = self.conn.rollback().await;
        self.finish(&r);
        r
    }

    // A failed autocommit restore still means the transaction is over.
    fn finish(&mut self, r: &Result<(), DbError>) {
        if matches!(r, Ok(()) | Err(DbError::AutocommitRestore { .. })) {
            self.finished = true;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.conn
    }

    pub async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64, DbError> {
        self.conn.execute(sql, args).await
    }

    pub async fn fetch_all(
        &self,
        sql: &str,
        args: &[Value],
    ) -> Result<Vec<HashMap<String, Value>>, DbError> {
        self.conn.fetch_all(sql, args).await
    }

    pub async fn last_insert_id(&self, name: Option<&str>) -> Result<Value, DbError> {
        self.conn.last_insert_id(name).await
    }
}

impl Drop for TransactionContext {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(rt) => {
                warn!("transaction dropped without commit, rolling back");
                let conn = self.conn.clone();
                rt.spawn(async move {
                    if let Err(e) = conn.rollback().await {
                        warn!(error = %e, "rollback of dropped transaction failed");
                    }
                });
            }
            Err(_) => warn!("transaction dropped outside a runtime, rollback skipped"),
        }
    }
}
