//! SAP SQL Anywhere adapter for the udbc interfaces.

pub mod api;
pub mod connection;
pub mod driver;
pub mod error;
pub mod statement;
pub mod value_codec;

use crate::error::DbError;

/// Runs a blocking native-library call on tokio's blocking pool.
pub(crate) async fn blocking<R, F>(f: F) -> Result<R, DbError>
where
    F: FnOnce() -> Result<R, DbError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

/// Runs a native release call from a `Drop` impl.
///
/// Inside a runtime the call goes to the blocking pool; outside one it runs
/// on the current thread.
pub(crate) fn release<F>(f: F)
where
    F: FnOnce() + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(rt) => {
            rt.spawn_blocking(f);
        }
        Err(_) => f(),
    }
}
