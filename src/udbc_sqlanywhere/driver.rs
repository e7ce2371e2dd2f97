use crate::error::DbError;
use crate::models::db_config::SqlAnywhereOptions;
use crate::udbc::DEFAULT_DB_NAME;
use crate::udbc::connection::Connection;
use crate::udbc::driver::Driver;
use crate::udbc_sqlanywhere::api::SqlAnywhereApi;
use crate::udbc_sqlanywhere::connection::SqlAnywhereConnection;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

const SQLANYWHERE_TYPE: &str = "sqlanywhere";

pub struct SqlAnywhereDriver<A: SqlAnywhereApi> {
    api: Arc<A>,
    name: String,
    r#type: String,
    options: SqlAnywhereOptions,
    dsn: Option<String>,
}

impl<A: SqlAnywhereApi> SqlAnywhereDriver<A> {
    pub fn new(api: Arc<A>, options: SqlAnywhereOptions) -> Self {
        Self {
            api,
            name: DEFAULT_DB_NAME.to_string(),
            r#type: SQLANYWHERE_TYPE.to_string(),
            options,
            dsn: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Renders the connection string; required before [`Driver::connection`].
    pub fn build(mut self) -> Result<Self, DbError> {
        self.dsn = Some(self.options.to_dsn()?);
        Ok(self)
    }

    pub fn options(&self) -> &SqlAnywhereOptions {
        &self.options
    }
}

#[async_trait]
impl<A: SqlAnywhereApi> Driver for SqlAnywhereDriver<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn r#type(&self) -> &str {
        &self.r#type
    }

    fn placeholder(&self, _param_seq: usize, _param_name: &str) -> String {
        "?".to_string()
    }

    async fn connection(&self) -> Result<Arc<dyn Connection>, DbError> {
        let dsn = self
            .dsn
            .as_ref()
            .ok_or_else(|| DbError::General("Driver not built".to_string()))?;
        let conn =
            SqlAnywhereConnection::connect(self.api.clone(), dsn.clone(), self.options.persistent)
                .await?;
        Ok(Arc::new(conn))
    }

    async fn close(&self) -> Result<(), DbError> {
        // Sessions are released by their owners; there is no pool to drain.
        debug!(name = %self.name, "driver closed");
        Ok(())
    }
}
