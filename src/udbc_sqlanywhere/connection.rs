use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

use crate::error::{DbError, TransactionEnd};
use crate::udbc::connection::Connection;
use crate::udbc::statement::Statement;
use crate::udbc::value::Value;
use crate::udbc::{ErrorInfo, ParamType};
use crate::udbc_sqlanywhere::api::{SessionOption, SqlAnywhereApi, TransactionMode};
use crate::udbc_sqlanywhere::{blocking, release};
use crate::udbc_sqlanywhere::error::from_api;
use crate::udbc_sqlanywhere::statement::SqlAnywhereStatement;

/// Options every new session starts with, applied in order.
const SESSION_DEFAULTS: [SessionOption; 3] = [
    SessionOption::VerboseErrors(false),
    SessionOption::AutoCommit(true),
    SessionOption::RowCounts(true),
];

/// Owned native connection resource.
///
/// Transient sessions are always disconnected on drop. Persistent sessions
/// are left open for reuse, unless setup never completed. Statements keep
/// the handle alive, so every statement is freed before its session goes.
pub(crate) struct Handle<A: SqlAnywhereApi> {
    pub(crate) api: Arc<A>,
    raw: Option<A::Connection>,
    persistent: bool,
    ready: bool,
}

impl<A: SqlAnywhereApi> Handle<A> {
    /// The library and the live connection, borrowed together.
    pub(crate) fn parts(&mut self) -> Result<(&A, &mut A::Connection), DbError> {
        match self.raw.as_mut() {
            Some(raw) => Ok((self.api.as_ref(), raw)),
            None => Err(DbError::General("Session already released".into())),
        }
    }

    fn set_option(&mut self, option: SessionOption) -> Result<(), DbError> {
        trace!(
            option = option.name(),
            enabled = option.enabled(),
            "set session option"
        );
        let (api, raw) = self.parts()?;
        if api.set_option(raw, option) {
            Ok(())
        } else {
            Err(from_api(api, Some(&*raw), None).into())
        }
    }
}

impl<A: SqlAnywhereApi> Drop for Handle<A> {
    fn drop(&mut self) {
        if self.persistent && self.ready {
            return;
        }
        let Some(mut raw) = self.raw.take() else {
            return;
        };
        let api = self.api.clone();
        let persistent = self.persistent;
        release(move || {
            api.disconnect(&mut raw);
            debug!(persistent, "SQL Anywhere session released");
        });
    }
}

pub struct SqlAnywhereConnection<A: SqlAnywhereApi> {
    handle: Arc<Mutex<Handle<A>>>,
}

impl<A: SqlAnywhereApi> SqlAnywhereConnection<A> {
    /// Opens a session for `dsn` and applies the session defaults
    /// (no verbose errors, autocommit on, exact row counts).
    pub async fn connect(
        api: Arc<A>,
        dsn: impl Into<String>,
        persistent: bool,
    ) -> Result<Self, DbError> {
        let dsn = dsn.into();
        let handle = blocking(move || Self::open(api, &dsn, persistent)).await?;
        info!(persistent, "connected to SQL Anywhere");
        Ok(Self {
            handle: Arc::new(Mutex::new(handle)),
        })
    }

    fn open(api: Arc<A>, dsn: &str, persistent: bool) -> Result<Handle<A>, DbError> {
        let raw = if persistent {
            api.pconnect(dsn)
        } else {
            api.connect(dsn)
        };
        let Some(raw) = raw else {
            return Err(from_api(api.as_ref(), None, None).into());
        };

        // From here on a failure drops `handle`, which disconnects it.
        let mut handle = Handle {
            api,
            raw: Some(raw),
            persistent,
            ready: false,
        };
        for option in SESSION_DEFAULTS {
            handle.set_option(option)?;
        }
        handle.ready = true;
        Ok(handle)
    }

    async fn with_handle<R, F>(&self, f: F) -> Result<R, DbError>
    where
        F: FnOnce(&mut Handle<A>) -> Result<R, DbError> + Send + 'static,
        R: Send + 'static,
    {
        let handle = self.handle.clone();
        blocking(move || {
            let mut guard = handle.blocking_lock();
            f(&mut guard)
        })
        .await
    }

    async fn end_transaction(&self, end: TransactionEnd) -> Result<(), DbError> {
        self.with_handle(move |h| {
            let (api, raw) = h.parts()?;
            let done = match end {
                TransactionEnd::Commit => api.commit(raw),
                TransactionEnd::Rollback => api.rollback(raw),
            };
            if !done {
                return Err(from_api(api, Some(&*raw), None).into());
            }
            h.set_option(TransactionMode::AutoCommit.option())
                .map_err(|e| match e {
                    DbError::Connection(source) => {
                        warn!(%end, code = source.code, "autocommit restore failed");
                        DbError::AutocommitRestore { after: end, source }
                    }
                    other => other,
                })
        })
        .await?;
        debug!(%end, "transaction finished");
        Ok(())
    }

    async fn escape(&self, text: String) -> Result<String, DbError> {
        self.with_handle(move |h| {
            let (api, raw) = h.parts()?;
            Ok(format!("'{}'", api.escape_string(raw, &text)))
        })
        .await
    }
}

#[async_trait]
impl<A: SqlAnywhereApi> Connection for SqlAnywhereConnection<A> {
    async fn begin(&self) -> Result<(), DbError> {
        self.with_handle(|h| h.set_option(TransactionMode::Manual.option()))
            .await?;
        debug!("transaction started");
        Ok(())
    }

    async fn commit(&self) -> Result<(), DbError> {
        self.end_transaction(TransactionEnd::Commit).await
    }

    async fn rollback(&self) -> Result<(), DbError> {
        self.end_transaction(TransactionEnd::Rollback).await
    }

    async fn error_code(&self) -> Result<i32, DbError> {
        self.with_handle(|h| {
            let (api, raw) = h.parts()?;
            Ok(api.error_code(Some(&*raw)))
        })
        .await
    }

    async fn error_info(&self) -> Result<ErrorInfo, DbError> {
        self.with_handle(|h| {
            let (api, raw) = h.parts()?;
            let raw = &*raw;
            Ok(ErrorInfo {
                sqlstate: api.sqlstate(Some(raw)),
                code: api.error_code(Some(raw)),
                message: api.error_message(Some(raw)),
            })
        })
        .await
    }

    async fn prepare(&self, sql: &str) -> Result<Box<dyn Statement>, DbError> {
        let text = sql.to_string();
        let raw = self
            .with_handle(move |h| {
                let (api, raw) = h.parts()?;
                match api.prepare(raw, &text) {
                    Some(stmt) => Ok(stmt),
                    None => Err(from_api(api, Some(&*raw), None).into()),
                }
            })
            .await?;
        Ok(Box::new(SqlAnywhereStatement::new(
            self.handle.clone(),
            raw,
            sql.to_string(),
        )))
    }

    async fn last_insert_id(&self, name: Option<&str>) -> Result<Value, DbError> {
        let Some(name) = name else {
            return self
                .with_handle(|h| {
                    let (api, raw) = h.parts()?;
                    Ok(Value::from_u64(api.insert_id(raw)))
                })
                .await;
        };

        check_sequence_name(name)?;
        let stmt = self.query(&format!("SELECT {}.CURRVAL", name)).await?;
        stmt.fetch_column(0)
            .await?
            .ok_or_else(|| DbError::Query(format!("Sequence {} returned no value", name)))
    }

    async fn quote(&self, value: &Value, hint: ParamType) -> Result<String, DbError> {
        if let Some(literal) = value.numeric_literal()? {
            return Ok(literal);
        }
        match (value, hint) {
            (Value::Null, _) => Ok("NULL".to_string()),
            (Value::Bool(b), _) => Ok(if *b { "1" } else { "0" }.to_string()),
            (Value::Bytes(b), _) => Ok(hex_literal(b)),
            (Value::Str(s), ParamType::LargeObject) => Ok(hex_literal(s.as_bytes())),
            (Value::Str(s), _) => self.escape(s.clone()).await,
            (other, _) => {
                let text = other
                    .temporal_text()
                    .ok_or_else(|| DbError::Value(format!("Cannot quote {:?}", other)))?;
                self.escape(text).await
            }
        }
    }
}

fn hex_literal(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "CAST('' AS BINARY)".to_string();
    }
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

/// Sequence names are spliced into SQL text, so only identifiers pass.
fn check_sequence_name(name: &str) -> Result<(), DbError> {
    let valid = !name.is_empty() && name.split('.').all(is_identifier);
    if valid {
        Ok(())
    } else {
        Err(DbError::Query(format!("Invalid sequence name: {:?}", name)))
    }
}

fn is_identifier(segment: &str) -> bool {
    if let Some(inner) = segment
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    {
        return !inner.is_empty() && !inner.contains('"');
    }
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '#' | '@'))
}
