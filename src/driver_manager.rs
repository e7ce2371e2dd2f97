use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use tracing::debug;

use crate::error::DbError;
use crate::transaction::TransactionContext;
use crate::udbc::connection::Connection;
use crate::udbc::driver::Driver;

// 全局单例
pub static UDBC: LazyLock<DriverManager> = LazyLock::new(DriverManager::new);

/// 数据库驱动管理器
/// Registry of named drivers
pub struct DriverManager {
    drivers: DashMap<String, Arc<dyn Driver>>,
}

impl Default for DriverManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverManager {
    pub fn new() -> Self {
        Self {
            drivers: DashMap::new(),
        }
    }

    /// 注册驱动，同名驱动会被替换
    pub fn register(&self, driver: impl Driver + 'static) -> Result<(), DbError> {
        debug!(name = driver.name(), kind = driver.r#type(), "driver registered");
        self.drivers
            .insert(driver.name().to_string(), Arc::new(driver));
        Ok(())
    }

    pub fn driver(&self, name: &str) -> Option<Arc<dyn Driver>> {
        self.drivers.get(name).map(|v| v.value().clone())
    }

    /// 通过指定驱动打开新连接
    pub async fn connection(&self, name: &str) -> Result<Arc<dyn Connection>, DbError> {
        let driver = self
            .driver(name)
            .ok_or_else(|| DbError::DriverNotFound(name.to_string()))?;
        driver.connection().await
    }

    /// 打开新连接并开启事务
    pub async fn begin(&self, name: &str) -> Result<TransactionContext, DbError> {
        let conn = self.connection(name).await?;
        TransactionContext::begin(conn).await
    }

    /// 注销并关闭驱动
    pub async fn close(&self, name: &str) -> Result<(), DbError> {
        let (_, driver) = self
            .drivers
            .remove(name)
            .ok_or_else(|| DbError::DriverNotFound(name.to_string()))?;
        driver.close().await
    }
}
