use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::error::DbError;
use crate::udbc::statement::Statement;
use crate::udbc::value::Value;
use crate::udbc_sqlanywhere::api::{DataValue, SqlAnywhereApi};
use crate::udbc_sqlanywhere::{blocking, release};
use crate::udbc_sqlanywhere::connection::Handle;
use crate::udbc_sqlanywhere::error::from_api;
use crate::udbc_sqlanywhere::value_codec::{from_sa_value, to_sa_value};

/// Native statement plus its execution state.
///
/// Owns a reference to the session so the statement is always freed, under
/// the session lock, before the session can be disconnected.
struct Cursor<A: SqlAnywhereApi> {
    session: Arc<Mutex<Handle<A>>>,
    stmt: Option<A::Statement>,
    executed: bool,
}

impl<A: SqlAnywhereApi> Cursor<A> {
    fn stmt(&mut self) -> Result<&mut A::Statement, DbError> {
        self.stmt
            .as_mut()
            .ok_or_else(|| DbError::Query("Statement handle already released".into()))
    }

    fn executed_stmt(&mut self) -> Result<&mut A::Statement, DbError> {
        if !self.executed {
            return Err(DbError::Query("Statement has not been executed".into()));
        }
        self.stmt()
    }
}

impl<A: SqlAnywhereApi> Drop for Cursor<A> {
    fn drop(&mut self) {
        let Some(stmt) = self.stmt.take() else {
            return;
        };
        let session = self.session.clone();
        release(move || {
            session.blocking_lock().api.free_stmt(stmt);
            trace!("statement freed");
        });
    }
}

/// Statement prepared on a SQL Anywhere session.
///
/// Holds the session alive; every call takes the session lock first and the
/// statement lock second.
pub struct SqlAnywhereStatement<A: SqlAnywhereApi> {
    sql: String,
    session: Arc<Mutex<Handle<A>>>,
    cursor: Arc<Mutex<Cursor<A>>>,
}

impl<A: SqlAnywhereApi> SqlAnywhereStatement<A> {
    pub(crate) fn new(session: Arc<Mutex<Handle<A>>>, stmt: A::Statement, sql: String) -> Self {
        let cursor = Cursor {
            session: session.clone(),
            stmt: Some(stmt),
            executed: false,
        };
        Self {
            sql,
            session,
            cursor: Arc::new(Mutex::new(cursor)),
        }
    }

    async fn with_cursor<R, F>(&self, f: F) -> Result<R, DbError>
    where
        F: FnOnce(&mut Handle<A>, &mut Cursor<A>) -> Result<R, DbError> + Send + 'static,
        R: Send + 'static,
    {
        let session = self.session.clone();
        let cursor = self.cursor.clone();
        blocking(move || {
            let mut h = session.blocking_lock();
            let mut c = cursor.blocking_lock();
            f(&mut h, &mut c)
        })
        .await
    }

    fn read_row(
        api: &A,
        raw: &A::Connection,
        stmt: &A::Statement,
    ) -> Result<HashMap<String, Value>, DbError> {
        let cols = api.num_cols(stmt);
        let mut out = HashMap::with_capacity(cols as usize);
        for i in 0..cols {
            let name = api.column_name(stmt, i).unwrap_or_else(|| i.to_string());
            let value = api
                .get_column(stmt, i)
                .ok_or_else(|| from_api(api, Some(raw), Some(stmt)))?;
            out.insert(name, from_sa_value(&value));
        }
        Ok(out)
    }
}

#[async_trait]
impl<A: SqlAnywhereApi> Statement for SqlAnywhereStatement<A> {
    fn sql(&self) -> &str {
        &self.sql
    }

    async fn execute(&self, params: &[Value]) -> Result<(), DbError> {
        let params: Vec<DataValue> = params.iter().map(to_sa_value).collect();
        let param_count = params.len();
        let start = Instant::now();
        let result = self
            .with_cursor(move |h, c| {
                let (api, raw) = h.parts()?;
                let stmt = c.stmt()?;
                for (i, p) in params.iter().enumerate() {
                    if !api.bind_param(stmt, i as u32, p) {
                        return Err(from_api(api, Some(&*raw), Some(&*stmt)).into());
                    }
                }
                if !api.execute(raw, stmt) {
                    return Err(from_api(api, Some(&*raw), Some(&*stmt)).into());
                }
                c.executed = true;
                Ok(())
            })
            .await;
        let elapsed_ms = start.elapsed().as_millis();
        let err = result.as_ref().err().map(|e| e.to_string());
        debug!(
            "execute: sql={}, params={}, elapsed_ms={}, error={:?}",
            self.sql, param_count, elapsed_ms, err
        );
        result
    }

    async fn row_count(&self) -> Result<u64, DbError> {
        self.with_cursor(|h, c| {
            let stmt = c.executed_stmt()?;
            Ok(u64::try_from(h.api.affected_rows(stmt)).unwrap_or(0))
        })
        .await
    }

    async fn fetch(&self) -> Result<Option<HashMap<String, Value>>, DbError> {
        self.with_cursor(|h, c| {
            let (api, raw) = h.parts()?;
            let stmt = c.executed_stmt()?;
            if !api.fetch_next(stmt) {
                return Ok(None);
            }
            Self::read_row(api, raw, stmt).map(Some)
        })
        .await
    }

    async fn fetch_column(&self, index: usize) -> Result<Option<Value>, DbError> {
        self.with_cursor(move |h, c| {
            let (api, raw) = h.parts()?;
            let stmt = c.executed_stmt()?;
            if !api.fetch_next(stmt) {
                return Ok(None);
            }
            let cols = api.num_cols(stmt) as usize;
            if index >= cols {
                return Err(DbError::Query(format!(
                    "Column index {} out of range, row has {} columns",
                    index, cols
                )));
            }
            let value = api
                .get_column(stmt, index as u32)
                .ok_or_else(|| from_api(api, Some(&*raw), Some(&*stmt)))?;
            Ok(Some(from_sa_value(&value)))
        })
        .await
    }
}
