use crate::error::DbError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 2638;

/// SQL Anywhere 连接参数
/// Connection parameters, rendered into a native connection string by [`to_dsn`](Self::to_dsn).
#[derive(Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SqlAnywhereOptions {
    pub host: String,
    pub port: u16,
    /// 数据库服务名，可选
    pub server: Option<String>,
    pub dbname: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub persistent: bool,
    /// 额外的连接参数，按键名排序追加
    pub driver_options: BTreeMap<String, String>,
    /// 原始连接串，设置后忽略其他字段
    pub dsn: Option<String>,
}

impl Default for SqlAnywhereOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            server: None,
            dbname: None,
            user: None,
            password: None,
            persistent: false,
            driver_options: BTreeMap::new(),
            dsn: None,
        }
    }
}

impl fmt::Debug for SqlAnywhereOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlAnywhereOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("server", &self.server)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("persistent", &self.persistent)
            .field("driver_options", &self.driver_options)
            .field("dsn", &self.dsn.as_ref().map(|_| "***"))
            .finish()
    }
}

impl SqlAnywhereOptions {
    pub fn new(dbname: impl Into<String>) -> Self {
        SqlAnywhereOptions {
            dbname: Some(dbname.into()),
            ..Default::default()
        }
    }

    /// 直接使用原生连接串
    pub fn from_dsn(dsn: impl Into<String>) -> Self {
        SqlAnywhereOptions {
            dsn: Some(dsn.into()),
            ..Default::default()
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    pub fn driver_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.driver_options.insert(key.into(), value.into());
        self
    }

    /// 生成连接串：`HOST=h:p[;ServerName=s];DBN=d[;UID=u][;PWD=p][;k=v...]`
    pub fn to_dsn(&self) -> Result<String, DbError> {
        if let Some(dsn) = &self.dsn {
            if dsn.trim().is_empty() {
                return Err(DbError::InvalidOptions("dsn is empty".into()));
            }
            return Ok(dsn.clone());
        }

        let dbname = self
            .dbname
            .as_deref()
            .filter(|d| !d.is_empty())
            .ok_or_else(|| DbError::InvalidOptions("dbname is required".into()))?;
        let host = if self.host.is_empty() {
            DEFAULT_HOST
        } else {
            self.host.as_str()
        };
        let port = if self.port == 0 { DEFAULT_PORT } else { self.port };

        let mut parts = vec![format!("HOST={}:{}", checked("host", host)?, port)];
        if let Some(server) = self.server.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("ServerName={}", checked("server", server)?));
        }
        parts.push(format!("DBN={}", checked("dbname", dbname)?));
        if let Some(user) = &self.user {
            parts.push(format!("UID={}", checked("user", user)?));
        }
        if let Some(password) = &self.password {
            parts.push(format!("PWD={}", checked("password", password)?));
        }
        for (key, value) in &self.driver_options {
            parts.push(format!("{}={}", checked(key, key)?, checked(key, value)?));
        }
        Ok(parts.join(";"))
    }
}

fn checked<'a>(field: &str, value: &'a str) -> Result<&'a str, DbError> {
    if value.contains(';') {
        return Err(DbError::InvalidOptions(format!(
            "{} must not contain ';'",
            field
        )));
    }
    Ok(value)
}
