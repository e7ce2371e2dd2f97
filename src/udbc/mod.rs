pub mod value;

pub mod connection;
pub mod driver;
pub mod statement;

pub const DEFAULT_DB_NAME: &str = "default";

/// 绑定或转义值时使用的类型提示
/// Type hint used when quoting or binding a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamType {
    Null,
    Bool,
    Integer,
    #[default]
    Str,
    /// Binary payloads, rendered as hex literals when quoted.
    LargeObject,
}

/// 会话最近一次错误，由原生客户端库原样返回
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorInfo {
    pub sqlstate: String,
    pub code: i32,
    pub message: String,
}
